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

use super::ProtocolTypeHandler;
use crate::monitorhub::define::job::Metric;
use crate::monitorhub::util::error::{with_context, BoxError};

use serde_yaml::Value;

/// Explicit registration list of the shipped protocol types.
pub fn builtin_handlers() -> Vec<Box<dyn ProtocolTypeHandler>> {
    vec![
        Box::new(HttpProtocol),
        Box::new(JdbcProtocol),
        Box::new(SshProtocol),
        Box::new(SnmpProtocol),
    ]
}

/// Serializes the metric generically and pins the `protocol` key to the
/// handler's tag so a mislabeled in-memory value cannot leak into the
/// persisted document.
fn render_metric(tag: &'static str, metric: &Metric) -> Result<Value, BoxError> {
    let mut value = serde_yaml::to_value(metric)
        .map_err(|err| with_context(err, format!("serializing metric '{}'", metric.name)))?;
    if let Value::Mapping(mapping) = &mut value {
        mapping.insert(
            Value::String("protocol".to_string()),
            Value::String(tag.to_string()),
        );
    }
    Ok(value)
}

struct HttpProtocol;

impl ProtocolTypeHandler for HttpProtocol {
    fn tag(&self) -> &'static str {
        "http"
    }

    fn render(&self, metric: &Metric) -> Result<Value, BoxError> {
        render_metric(self.tag(), metric)
    }
}

struct JdbcProtocol;

impl ProtocolTypeHandler for JdbcProtocol {
    fn tag(&self) -> &'static str {
        "jdbc"
    }

    fn render(&self, metric: &Metric) -> Result<Value, BoxError> {
        render_metric(self.tag(), metric)
    }
}

struct SshProtocol;

impl ProtocolTypeHandler for SshProtocol {
    fn tag(&self) -> &'static str {
        "ssh"
    }

    fn render(&self, metric: &Metric) -> Result<Value, BoxError> {
        render_metric(self.tag(), metric)
    }
}

struct SnmpProtocol;

impl ProtocolTypeHandler for SnmpProtocol {
    fn tag(&self) -> &'static str {
        "snmp"
    }

    fn render(&self, metric: &Metric) -> Result<Value, BoxError> {
        render_metric(self.tag(), metric)
    }
}
