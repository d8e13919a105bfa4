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

use super::custom::CustomTemplate;
use super::job::{Job, ParamDefineDoc};
use super::registry::normalize_app;
use super::TemplateError;
use crate::monitorhub::config::Config;
use crate::monitorhub::dispatch::HandlerRegistry;
use crate::monitorhub::logger::log_debug;
use crate::monitorhub::util::error::{new_error, with_context, BoxError};

use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

const COMPONENT: &str = "define.store";

pub fn app_document_path(app: &str) -> PathBuf {
    Config::DefineAppDir
        .get_path()
        .join(format!("app-{}.yml", normalize_app(app)))
}

pub fn param_document_path(app: &str) -> PathBuf {
    Config::DefineParamDir
        .get_path()
        .join(format!("param-{}.yml", normalize_app(app)))
}

/// Writes whichever documents the composite carries. The schema document
/// goes first so a failure on the related parameter document still
/// leaves the pair no more inconsistent than before the call.
pub fn persist_custom(
    template: &CustomTemplate,
    handlers: &HandlerRegistry,
) -> Result<(), TemplateError> {
    if let Some(job) = &template.define {
        persist_schema(job, handlers)?;
    }
    if let Some(params) = &template.params {
        persist_params(params, handlers)?;
    }
    Ok(())
}

pub fn persist_params(
    doc: &ParamDefineDoc,
    handlers: &HandlerRegistry,
) -> Result<(), TemplateError> {
    let rendered = render_param_document(doc, handlers)?;
    let path = param_document_path(&doc.app);
    write_document(&path, &rendered).map_err(TemplateError::persistence_box)?;
    log_debug(
        COMPONENT,
        "parameter document written",
        &[("app", &doc.app), ("path", &path.display().to_string())],
    );
    Ok(())
}

pub fn persist_schema(job: &Job, handlers: &HandlerRegistry) -> Result<(), TemplateError> {
    let rendered = render_schema_document(job, handlers)?;
    let path = app_document_path(&job.app);
    write_document(&path, &rendered).map_err(TemplateError::persistence_box)?;
    log_debug(
        COMPONENT,
        "schema document written",
        &[("app", &job.app), ("path", &path.display().to_string())],
    );
    Ok(())
}

/// Maps each parameter through its type handler, then attaches the
/// scalar fields every parameter shares, yielding the `param-<app>.yml`
/// document body.
pub fn render_param_document(
    doc: &ParamDefineDoc,
    handlers: &HandlerRegistry,
) -> Result<Value, TemplateError> {
    let mut entries = Vec::with_capacity(doc.param.len());
    for param in &doc.param {
        let handler = handlers.resolve_param(&param.param_type)?;
        let mut fragment = handler.render(param);
        fragment.insert(
            Value::String("field".to_string()),
            Value::String(param.field.clone()),
        );
        let name = serde_yaml::to_value(&param.name).map_err(|err| {
            TemplateError::persistence_box(with_context(
                err,
                format!("serializing names of param '{}'", param.field),
            ))
        })?;
        fragment.insert(Value::String("name".to_string()), name);
        fragment.insert(
            Value::String("required".to_string()),
            Value::Bool(param.required),
        );
        if let Some(default_value) = &param.default_value {
            fragment.insert(
                Value::String("defaultValue".to_string()),
                Value::String(default_value.clone()),
            );
        }
        entries.push(Value::Mapping(fragment));
    }

    let mut root = Mapping::new();
    root.insert(
        Value::String("app".to_string()),
        Value::String(doc.app.clone()),
    );
    root.insert(
        Value::String("param".to_string()),
        Value::Sequence(entries),
    );
    Ok(Value::Mapping(root))
}

/// Serializes the schema generically, then replaces each entry of the
/// `metrics` section with its protocol handler's rendering.
pub fn render_schema_document(
    job: &Job,
    handlers: &HandlerRegistry,
) -> Result<Value, TemplateError> {
    let mut document = serde_yaml::to_value(job).map_err(|err| {
        TemplateError::persistence_box(with_context(
            err,
            format!("serializing schema of app '{}'", job.app),
        ))
    })?;

    if let Value::Mapping(mapping) = &mut document {
        if mapping.contains_key(Value::String("metrics".to_string())) {
            let mut rendered = Vec::with_capacity(job.metrics.len());
            for metric in &job.metrics {
                let tag = metric.protocol.as_deref().unwrap_or("");
                let handler = handlers.resolve_protocol(tag)?;
                let fragment = handler
                    .render(metric)
                    .map_err(TemplateError::persistence_box)?;
                rendered.push(fragment);
            }
            mapping.insert(
                Value::String("metrics".to_string()),
                Value::Sequence(rendered),
            );
        }
    }
    Ok(document)
}

/// Temp-file-and-rename so readers of the define directory never see a
/// half-written document.
fn write_document(path: &Path, value: &Value) -> Result<(), BoxError> {
    let parent = path
        .parent()
        .ok_or_else(|| new_error(format!("document path '{}' has no parent", path.display())))?;
    fs::create_dir_all(parent)
        .map_err(|err| with_context(err, format!("creating '{}'", parent.display())))?;

    let body = serde_yaml::to_string(value)
        .map_err(|err| with_context(err, format!("encoding '{}'", path.display())))?;

    let staged = path.with_extension("yml.tmp");
    fs::write(&staged, body)
        .map_err(|err| with_context(err, format!("writing '{}'", staged.display())))?;
    fs::rename(&staged, path)
        .map_err(|err| with_context(err, format!("renaming into '{}'", path.display())))?;
    Ok(())
}
