/*
 * Copyright (C) 2024 The Monitorhub Authors
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 * http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

pub mod param;
pub mod protocol;

use crate::monitorhub::define::job::{Metric, ParamDefine};
use crate::monitorhub::util::error::BoxError;

use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum DispatchError {
    UnknownParamType(String),
    UnknownProtocol(String),
}

impl Display for DispatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchError::UnknownParamType(tag) => {
                write!(f, "no handler registered for param type '{}'", tag)
            }
            DispatchError::UnknownProtocol(tag) => {
                write!(f, "no handler registered for protocol '{}'", tag)
            }
        }
    }
}

impl Error for DispatchError {}

/// Renders a typed parameter definition into the loosely-typed fragment
/// written to the parameter document. Scalar fields shared by every
/// parameter type (field, name, required, defaultValue) are attached by
/// the persistence writer, not here.
pub trait ParamTypeHandler: Send + Sync {
    fn tag(&self) -> &'static str;
    fn render(&self, param: &ParamDefine) -> Mapping;
}

/// Renders a metric definition into the document fragment stored under
/// the schema document's `metrics` section.
pub trait ProtocolTypeHandler: Send + Sync {
    fn tag(&self) -> &'static str;
    fn render(&self, metric: &Metric) -> Result<Value, BoxError>;
}

/// Tag-indexed handler tables, built once at startup from the explicit
/// registration lists in `param` and `protocol`. New monitor kinds plug
/// in by adding a handler there plus a matching base document; nothing
/// in the registry core changes.
pub struct HandlerRegistry {
    param_types: HashMap<&'static str, Box<dyn ParamTypeHandler>>,
    protocol_types: HashMap<&'static str, Box<dyn ProtocolTypeHandler>>,
}

impl HandlerRegistry {
    pub fn builtin() -> Self {
        let mut registry = HandlerRegistry {
            param_types: HashMap::new(),
            protocol_types: HashMap::new(),
        };
        for handler in param::builtin_handlers() {
            registry.param_types.insert(handler.tag(), handler);
        }
        for handler in protocol::builtin_handlers() {
            registry.protocol_types.insert(handler.tag(), handler);
        }
        registry
    }

    pub fn resolve_param(&self, tag: &str) -> Result<&dyn ParamTypeHandler, DispatchError> {
        self.param_types
            .get(tag)
            .map(|handler| handler.as_ref())
            .ok_or_else(|| DispatchError::UnknownParamType(tag.to_string()))
    }

    pub fn resolve_protocol(&self, tag: &str) -> Result<&dyn ProtocolTypeHandler, DispatchError> {
        self.protocol_types
            .get(tag)
            .map(|handler| handler.as_ref())
            .ok_or_else(|| DispatchError::UnknownProtocol(tag.to_string()))
    }

    pub fn param_tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<&'static str> = self.param_types.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    pub fn protocol_tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<&'static str> = self.protocol_types.keys().copied().collect();
        tags.sort_unstable();
        tags
    }
}
