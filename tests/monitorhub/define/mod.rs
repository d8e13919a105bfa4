mod custom_flow;
mod persistence;
