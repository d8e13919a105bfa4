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
use super::job::{Job, ParamDefine};
use super::TemplateError;

use std::collections::HashMap;
use std::sync::RwLock;

/// App identifiers are case-insensitive; every lookup and insert goes
/// through this normalization.
pub fn normalize_app(app: &str) -> String {
    app.trim().to_lowercase()
}

/// In-memory template store. All reads clone values out so callers can
/// never mutate shared state; all writes replace whole values under
/// their key, which keeps readers lock-free of torn updates.
pub struct TemplateRegistry {
    app_defines: RwLock<HashMap<String, Job>>,
    param_defines: RwLock<HashMap<String, Vec<ParamDefine>>>,
    custom_defines: RwLock<HashMap<String, CustomTemplate>>,
    /// Derived index: metric names per app, in declared order. Rebuilt
    /// whenever a schema is replaced.
    metric_names: RwLock<HashMap<String, Vec<String>>>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        TemplateRegistry {
            app_defines: RwLock::new(HashMap::new()),
            param_defines: RwLock::new(HashMap::new()),
            custom_defines: RwLock::new(HashMap::new()),
            metric_names: RwLock::new(HashMap::new()),
        }
    }

    /// Empty (never an error) when the app declares no parameters.
    pub fn get_param_defines(&self, app: &str) -> Vec<ParamDefine> {
        let params = self.param_defines.read().expect("registry lock poisoned");
        params.get(&normalize_app(app)).cloned().unwrap_or_default()
    }

    pub fn get_app_define(&self, app: &str) -> Result<Job, TemplateError> {
        let defines = self.app_defines.read().expect("registry lock poisoned");
        defines
            .get(&normalize_app(app))
            .cloned()
            .ok_or_else(|| TemplateError::NotFound(format!("The app '{}' is not supported", app)))
    }

    /// With an app given, that app's metric names in declared order;
    /// without one, the union across all registered apps.
    pub fn get_metric_names(&self, app: Option<&str>) -> Result<Vec<String>, TemplateError> {
        let index = self.metric_names.read().expect("registry lock poisoned");
        match app {
            Some(app) => index
                .get(&normalize_app(app))
                .cloned()
                .ok_or_else(|| {
                    TemplateError::NotFound(format!("The app '{}' is not supported", app))
                }),
            None => Ok(index.values().flatten().cloned().collect()),
        }
    }

    /// Whole-value replacement of an app schema; refreshes the derived
    /// metric-name index under the same key.
    pub fn set_app_define(&self, job: Job) {
        let key = normalize_app(&job.app);
        let names: Vec<String> = job.metrics.iter().map(|m| m.name.clone()).collect();
        {
            let mut defines = self.app_defines.write().expect("registry lock poisoned");
            defines.insert(key.clone(), job);
        }
        let mut index = self.metric_names.write().expect("registry lock poisoned");
        index.insert(key, names);
    }

    pub fn set_param_defines(&self, app: &str, params: Vec<ParamDefine>) {
        let mut defines = self.param_defines.write().expect("registry lock poisoned");
        defines.insert(normalize_app(app), params);
    }

    /// Replaces the stored composite wholesale; facet merging is the
    /// custom manager's job.
    pub fn upsert_custom(&self, template: CustomTemplate) {
        let key = normalize_app(&template.app);
        let mut customs = self.custom_defines.write().expect("registry lock poisoned");
        customs.insert(key, template);
    }

    pub fn get_custom(&self, app: &str) -> Option<CustomTemplate> {
        let customs = self.custom_defines.read().expect("registry lock poisoned");
        customs.get(&normalize_app(app)).cloned()
    }

    pub fn list_custom(&self) -> Vec<CustomTemplate> {
        let customs = self.custom_defines.read().expect("registry lock poisoned");
        let mut all: Vec<CustomTemplate> = customs.values().cloned().collect();
        all.sort_by(|a, b| a.app.cmp(&b.app));
        all
    }

    /// Conflict probe used on custom creation: an identifier is taken if
    /// any store knows it.
    pub fn contains_app(&self, app: &str) -> bool {
        let key = normalize_app(app);
        let in_defines = {
            let defines = self.app_defines.read().expect("registry lock poisoned");
            defines.contains_key(&key)
        };
        if in_defines {
            return true;
        }
        let customs = self.custom_defines.read().expect("registry lock poisoned");
        customs.contains_key(&key)
    }

    /// Snapshot of every parameter set with its app key, sorted by key.
    /// Parameter sets live independently of schemas; a custom app may
    /// carry one before any schema is attached.
    pub fn all_param_defines(&self) -> Vec<(String, Vec<ParamDefine>)> {
        let params = self.param_defines.read().expect("registry lock poisoned");
        let mut all: Vec<(String, Vec<ParamDefine>)> = params
            .iter()
            .map(|(app, defines)| (app.clone(), defines.clone()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    /// Snapshot of all app schemas, sorted by key for stable iteration.
    pub fn all_app_defines(&self) -> Vec<Job> {
        let defines = self.app_defines.read().expect("registry lock poisoned");
        let mut all: Vec<Job> = defines.values().cloned().collect();
        all.sort_by(|a, b| normalize_app(&a.app).cmp(&normalize_app(&b.app)));
        all
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}
