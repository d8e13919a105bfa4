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

use super::custom::{CustomManager, CustomTemplate};
use super::hierarchy::{self, HierarchyNode};
use super::job::{Job, NameMap, ParamDefine};
use super::loader;
use super::registry::TemplateRegistry;
use super::TemplateError;
use crate::monitorhub::dispatch::HandlerRegistry;
use crate::monitorhub::util::error::BoxError;

use std::collections::BTreeMap;
use std::sync::Arc;

/// Facade over the registry, handler table and custom manager: the
/// surface schedulers, UI layers and the administrative front end talk
/// to. Construction runs the full bootstrap; a failure there means the
/// process must not start serving.
pub struct TemplateService {
    registry: Arc<TemplateRegistry>,
    customs: CustomManager,
}

impl TemplateService {
    pub fn bootstrap() -> Result<Self, BoxError> {
        let registry = Arc::new(loader::bootstrap()?);
        let handlers = Arc::new(HandlerRegistry::builtin());
        let customs = CustomManager::new(registry.clone(), handlers);
        Ok(TemplateService { registry, customs })
    }

    /// Wires a service from pre-built parts; used by tests and by
    /// embedders that load definitions themselves.
    pub fn from_parts(registry: Arc<TemplateRegistry>, handlers: Arc<HandlerRegistry>) -> Self {
        let customs = CustomManager::new(registry.clone(), handlers);
        TemplateService { registry, customs }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    // Read surface.

    pub fn get_app_define(&self, app: &str) -> Result<Job, TemplateError> {
        self.registry.get_app_define(app)
    }

    pub fn get_param_defines(&self, app: &str) -> Vec<ParamDefine> {
        self.registry.get_param_defines(app)
    }

    pub fn get_metric_names(&self, app: Option<&str>) -> Result<Vec<String>, TemplateError> {
        self.registry.get_metric_names(app)
    }

    pub fn get_i18n_resources(&self, locale: &str) -> BTreeMap<String, String> {
        hierarchy::i18n_resources(&self.registry, locale)
    }

    pub fn get_all_app_hierarchy(&self, locale: &str) -> Vec<HierarchyNode> {
        hierarchy::build_hierarchy(&self.registry, locale)
    }

    pub fn get_all_custom_info(&self) -> Vec<CustomTemplate> {
        self.customs.all_custom_info()
    }

    pub fn get_one_custom_info(&self, app: &str) -> Result<CustomTemplate, TemplateError> {
        self.customs.one_custom_info(app)
    }

    // Write surface.

    pub fn set_custom_info(
        &self,
        app: &str,
        name: NameMap,
        category: &str,
    ) -> Result<CustomTemplate, TemplateError> {
        self.customs.create_custom(app, name, category)
    }

    pub fn set_custom_param_info(
        &self,
        app: &str,
        params: Vec<ParamDefine>,
    ) -> Result<(), TemplateError> {
        self.customs.attach_params(app, params)
    }

    pub fn set_custom_defined_info(&self, app: &str, define: Job) -> Result<(), TemplateError> {
        self.customs.attach_schema(app, define)
    }

    pub fn update_custom_info(&self, template: CustomTemplate) -> Result<(), TemplateError> {
        self.customs.update_custom(template)
    }
}
