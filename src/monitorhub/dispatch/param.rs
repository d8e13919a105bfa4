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

use super::ParamTypeHandler;
use crate::monitorhub::define::job::ParamDefine;

use serde_yaml::{Mapping, Value};

/// Explicit registration list of the shipped parameter types.
pub fn builtin_handlers() -> Vec<Box<dyn ParamTypeHandler>> {
    vec![
        Box::new(TextParam),
        Box::new(NumberParam),
        Box::new(PasswordParam),
        Box::new(BooleanParam),
        Box::new(HostParam),
        Box::new(RadioParam),
    ]
}

fn base_fragment(tag: &str) -> Mapping {
    let mut fragment = Mapping::new();
    fragment.insert(
        Value::String("type".to_string()),
        Value::String(tag.to_string()),
    );
    fragment
}

/// Free-form string input, optionally length-limited.
struct TextParam;

impl ParamTypeHandler for TextParam {
    fn tag(&self) -> &'static str {
        "text"
    }

    fn render(&self, param: &ParamDefine) -> Mapping {
        let mut fragment = base_fragment(self.tag());
        if let Some(limit) = param.limit {
            fragment.insert(
                Value::String("limit".to_string()),
                Value::Number(limit.into()),
            );
        }
        fragment
    }
}

/// Numeric input with an optional inclusive range expression.
struct NumberParam;

impl ParamTypeHandler for NumberParam {
    fn tag(&self) -> &'static str {
        "number"
    }

    fn render(&self, param: &ParamDefine) -> Mapping {
        let mut fragment = base_fragment(self.tag());
        if let Some(range) = &param.range {
            fragment.insert(
                Value::String("range".to_string()),
                Value::String(range.clone()),
            );
        }
        fragment
    }
}

/// Masked string input; never carries extra attributes.
struct PasswordParam;

impl ParamTypeHandler for PasswordParam {
    fn tag(&self) -> &'static str {
        "password"
    }

    fn render(&self, _param: &ParamDefine) -> Mapping {
        base_fragment(self.tag())
    }
}

struct BooleanParam;

impl ParamTypeHandler for BooleanParam {
    fn tag(&self) -> &'static str {
        "boolean"
    }

    fn render(&self, _param: &ParamDefine) -> Mapping {
        base_fragment(self.tag())
    }
}

/// Hostname or IP of the monitored target.
struct HostParam;

impl ParamTypeHandler for HostParam {
    fn tag(&self) -> &'static str {
        "host"
    }

    fn render(&self, _param: &ParamDefine) -> Mapping {
        base_fragment(self.tag())
    }
}

/// Single choice out of a fixed option list.
struct RadioParam;

impl ParamTypeHandler for RadioParam {
    fn tag(&self) -> &'static str {
        "radio"
    }

    fn render(&self, param: &ParamDefine) -> Mapping {
        let mut fragment = base_fragment(self.tag());
        let options: Vec<Value> = param
            .options
            .iter()
            .map(|option| {
                let mut entry = Mapping::new();
                entry.insert(
                    Value::String("label".to_string()),
                    Value::String(option.label.clone()),
                );
                entry.insert(
                    Value::String("value".to_string()),
                    Value::String(option.value.clone()),
                );
                Value::Mapping(entry)
            })
            .collect();
        fragment.insert(
            Value::String("options".to_string()),
            Value::Sequence(options),
        );
        fragment
    }
}
