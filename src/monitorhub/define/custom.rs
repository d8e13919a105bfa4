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

use super::job::{Job, NameMap, ParamDefine, ParamDefineDoc};
use super::registry::{normalize_app, TemplateRegistry};
use super::store;
use super::TemplateError;
use crate::monitorhub::dispatch::HandlerRegistry;
use crate::monitorhub::logger::{log_info, log_warn};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const COMPONENT: &str = "define.custom";

/// User-editable composite overlay for one app: immutable identity
/// fields plus two independently attached facets. Facets only ever move
/// from absent to present; nothing in this manager clears them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomTemplate {
    pub app: String,
    #[serde(skip_serializing_if = "NameMap::is_empty")]
    pub name: NameMap,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<ParamDefineDoc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub define: Option<Job>,
}

/// Validates, merges and commits user-authored template edits. Updates
/// land in the registry first and are persisted afterwards
/// (write-behind): a failed write is reported to the caller but the
/// accepted edit stays visible to readers, who may retry persistence
/// without resubmitting.
pub struct CustomManager {
    registry: Arc<TemplateRegistry>,
    handlers: Arc<HandlerRegistry>,
    /// Per-app writer serialization; writers to different apps proceed
    /// independently.
    write_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl CustomManager {
    pub fn new(registry: Arc<TemplateRegistry>, handlers: Arc<HandlerRegistry>) -> Self {
        CustomManager {
            registry,
            handlers,
            write_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    fn writer_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.write_locks.lock().expect("writer lock map poisoned");
        locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Creates the identity facet. Fails with Conflict when the app
    /// identifier is already taken, case-insensitively.
    pub fn create_custom(
        &self,
        app: &str,
        name: NameMap,
        category: &str,
    ) -> Result<CustomTemplate, TemplateError> {
        if app.trim().is_empty() || name.is_empty() || category.trim().is_empty() {
            return Err(TemplateError::Invalid(
                "custom template `app`, `name` and `category` must not be empty".to_string(),
            ));
        }

        let key = normalize_app(app);
        let lock = self.writer_lock(&key);
        let _guard = lock.lock().expect("writer lock poisoned");

        if self.registry.contains_app(&key) {
            return Err(TemplateError::Conflict(format!(
                "an app named '{}' already exists",
                app
            )));
        }

        let template = CustomTemplate {
            app: app.to_string(),
            name,
            category: category.to_string(),
            params: None,
            define: None,
        };
        self.registry.upsert_custom(template.clone());
        log_info(COMPONENT, "custom template created", &[("app", &key)]);
        Ok(template)
    }

    /// Replaces the parameter facet wholesale and persists the parameter
    /// document only.
    pub fn attach_params(&self, app: &str, params: Vec<ParamDefine>) -> Result<(), TemplateError> {
        let key = normalize_app(app);
        let lock = self.writer_lock(&key);
        let _guard = lock.lock().expect("writer lock poisoned");

        let mut template = self.require_custom(&key, app)?;
        let doc = ParamDefineDoc {
            app: template.app.clone(),
            param: params.clone(),
        };
        template.params = Some(doc.clone());

        self.registry.upsert_custom(template);
        self.registry.set_param_defines(&key, params);

        store::persist_params(&doc, &self.handlers).inspect_err(|_| {
            log_warn(
                COMPONENT,
                "parameter document write failed; in-memory state retained",
                &[("app", &key)],
            );
        })
    }

    /// Replaces the schema facet wholesale and persists both documents so
    /// the on-disk pair stays consistent.
    pub fn attach_schema(&self, app: &str, mut define: Job) -> Result<(), TemplateError> {
        let key = normalize_app(app);
        let lock = self.writer_lock(&key);
        let _guard = lock.lock().expect("writer lock poisoned");

        let mut template = self.require_custom(&key, app)?;
        // The schema is stored under the template's identity regardless
        // of the app named inside the submitted document.
        define.app = template.app.clone();
        template.define = Some(define.clone());

        self.registry.upsert_custom(template.clone());
        self.registry.set_app_define(define);

        store::persist_custom(&template, &self.handlers).inspect_err(|_| {
            log_warn(
                COMPONENT,
                "schema document write failed; in-memory state retained",
                &[("app", &key)],
            );
        })
    }

    /// Full replace of whichever facets the input supplies; absent
    /// facets keep their stored value. Always runs a persistence cycle
    /// over both documents.
    pub fn update_custom(&self, update: CustomTemplate) -> Result<(), TemplateError> {
        let key = normalize_app(&update.app);
        let lock = self.writer_lock(&key);
        let _guard = lock.lock().expect("writer lock poisoned");

        let mut template = self.require_custom(&key, &update.app)?;
        if let Some(params) = update.params {
            template.params = Some(ParamDefineDoc {
                app: template.app.clone(),
                param: params.param,
            });
        }
        if let Some(mut define) = update.define {
            define.app = template.app.clone();
            template.define = Some(define);
        }

        self.registry.upsert_custom(template.clone());
        if let Some(doc) = &template.params {
            self.registry.set_param_defines(&key, doc.param.clone());
        }
        if let Some(define) = &template.define {
            self.registry.set_app_define(define.clone());
        }

        store::persist_custom(&template, &self.handlers).inspect_err(|_| {
            log_warn(
                COMPONENT,
                "custom template write failed; in-memory state retained",
                &[("app", &key)],
            );
        })
    }

    pub fn all_custom_info(&self) -> Vec<CustomTemplate> {
        self.registry.list_custom()
    }

    pub fn one_custom_info(&self, app: &str) -> Result<CustomTemplate, TemplateError> {
        self.registry
            .get_custom(app)
            .ok_or_else(|| TemplateError::NotFound(format!("The app '{}' is not supported", app)))
    }

    fn require_custom(&self, key: &str, app: &str) -> Result<CustomTemplate, TemplateError> {
        self.registry.get_custom(key).ok_or_else(|| {
            TemplateError::NotFound(format!("no custom template created for app '{}'", app))
        })
    }
}
