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

use super::bundled;
use super::custom::CustomTemplate;
use super::job::{Job, ParamDefine, ParamDefineDoc};
use super::registry::{normalize_app, TemplateRegistry};
use crate::monitorhub::config::Config;
use crate::monitorhub::logger::log_info;
use crate::monitorhub::util::error::{new_error, with_context, BoxError};

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const COMPONENT: &str = "define.loader";

/// Where the base definitions come from. A deployed define directory
/// wins when it is present and non-empty; otherwise the embedded set
/// bundled into the binary is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefineSource {
    Disk {
        app_dir: PathBuf,
        param_dir: PathBuf,
    },
    Bundled,
}

impl DefineSource {
    pub fn resolve() -> Self {
        let app_dir = Config::DefineAppDir.get_path();
        if dir_has_entries(&app_dir) {
            DefineSource::Disk {
                app_dir,
                param_dir: Config::DefineParamDir.get_path(),
            }
        } else {
            DefineSource::Bundled
        }
    }
}

fn dir_has_entries(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yml") | Some("yaml")
    )
}

/// Loads all base app schema documents. Any malformed document aborts
/// the whole load; an empty result is the caller's bootstrap failure.
pub fn load_app_defines(source: &DefineSource) -> Result<HashMap<String, Job>, BoxError> {
    let mut defines = HashMap::new();
    for (origin, body) in schema_documents(source)? {
        let job: Job = serde_yaml::from_str(&body)
            .map_err(|err| with_context(err, format!("parsing app definition '{}'", origin)))?;
        if job.app.trim().is_empty() {
            return Err(new_error(format!(
                "app definition '{}' is missing its `app` identifier",
                origin
            )));
        }
        defines.insert(normalize_app(&job.app), job);
    }
    Ok(defines)
}

/// Loads all base parameter documents. A missing on-disk param directory
/// is fatal: the deployment shipped a define tree but lost half of it.
pub fn load_param_defines(
    source: &DefineSource,
) -> Result<HashMap<String, Vec<ParamDefine>>, BoxError> {
    let mut defines = HashMap::new();
    for (origin, body) in param_documents(source)? {
        let doc: ParamDefineDoc = serde_yaml::from_str(&body)
            .map_err(|err| with_context(err, format!("parsing param definition '{}'", origin)))?;
        if doc.app.trim().is_empty() {
            return Err(new_error(format!(
                "param definition '{}' is missing its `app` identifier",
                origin
            )));
        }
        defines.insert(normalize_app(&doc.app), doc.param);
    }
    Ok(defines)
}

fn schema_documents(source: &DefineSource) -> Result<Vec<(String, String)>, BoxError> {
    match source {
        DefineSource::Disk { app_dir, .. } => read_documents(app_dir),
        DefineSource::Bundled => Ok(embedded_documents(bundled::APP_DEFINES)),
    }
}

fn param_documents(source: &DefineSource) -> Result<Vec<(String, String)>, BoxError> {
    match source {
        DefineSource::Disk { param_dir, .. } => {
            if !param_dir.is_dir() {
                return Err(new_error(format!(
                    "define param directory does not exist: '{}'",
                    param_dir.display()
                )));
            }
            read_documents(param_dir)
        }
        DefineSource::Bundled => Ok(embedded_documents(bundled::PARAM_DEFINES)),
    }
}

fn embedded_documents(set: &[(&str, &str)]) -> Vec<(String, String)> {
    set.iter()
        .map(|(name, body)| (name.to_string(), body.to_string()))
        .collect()
}

fn read_documents(dir: &Path) -> Result<Vec<(String, String)>, BoxError> {
    let entries = fs::read_dir(dir)
        .map_err(|err| with_context(err, format!("reading define directory '{}'", dir.display())))?;

    let mut documents = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|err| with_context(err, format!("listing '{}'", dir.display())))?;
        let path = entry.path();
        if !path.is_file() || !is_yaml(&path) {
            continue;
        }
        let body = fs::read_to_string(&path)
            .map_err(|err| with_context(err, format!("reading '{}'", path.display())))?;
        documents.push((path.display().to_string(), body));
    }
    documents.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(documents)
}

/// Bootstrap: load both base sets and build a ready registry, seeding a
/// custom composite for every base app so read APIs can serve composite
/// views immediately. Any failure here must abort process startup.
pub fn bootstrap() -> Result<TemplateRegistry, BoxError> {
    let source = DefineSource::resolve();
    match &source {
        DefineSource::Disk { app_dir, .. } => log_info(
            COMPONENT,
            "loading definitions from disk",
            &[("path", &app_dir.display().to_string())],
        ),
        DefineSource::Bundled => log_info(COMPONENT, "loading bundled definitions", &[]),
    }

    let apps = load_app_defines(&source)?;
    if apps.is_empty() {
        return Err(new_error(
            "no app definitions found; refusing to start with an empty registry",
        ));
    }
    let params = load_param_defines(&source)?;

    let registry = TemplateRegistry::new();
    for job in apps.values() {
        registry.upsert_custom(CustomTemplate {
            app: job.app.clone(),
            name: job.name.clone(),
            category: job.category.clone(),
            params: None,
            define: Some(job.clone()),
        });
        registry.set_app_define(job.clone());
    }
    for (app, list) in &params {
        registry.set_param_defines(app, list.clone());
        if let Some(mut template) = registry.get_custom(app) {
            template.params = Some(ParamDefineDoc {
                app: template.app.clone(),
                param: list.clone(),
            });
            registry.upsert_custom(template);
        }
    }

    log_info(
        COMPONENT,
        "registry bootstrapped",
        &[
            ("apps", &apps.len().to_string()),
            ("param_sets", &params.len().to_string()),
        ],
    );
    Ok(registry)
}
