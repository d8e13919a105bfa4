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

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Locale tag to display label. A BTreeMap keeps fallback resolution
/// deterministic: the lexicographically smallest locale wins when the
/// requested one is absent.
pub type NameMap = BTreeMap<String, String>;

/// Declarative schema of one monitored-resource type ("app"): which
/// metrics it exposes and which fields each metric carries.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Job {
    pub app: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub name: NameMap,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<Metric>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metric {
    pub name: String,
    /// Protocol tag selecting the collection handler (http, jdbc, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Field {
    pub field: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<bool>,
}

/// One connection/config parameter the user must supply for an app.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParamDefine {
    pub field: String,
    /// Parameter-type tag selecting the render handler (text, number, ...).
    #[serde(rename = "type")]
    pub param_type: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub name: NameMap,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Numeric bound expression used by the `number` type, e.g. `[0,65535]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    /// Maximum input length, used by the `text` type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Choice list, used by the `radio` type.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ParamOption>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamOption {
    pub label: String,
    pub value: String,
}

/// On-disk shape of a parameter document: `param-<app>.yml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamDefineDoc {
    pub app: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub param: Vec<ParamDefine>,
}
