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

use super::job::NameMap;
use super::registry::TemplateRegistry;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One node of the app -> metric -> field navigation tree. Purely
/// derived from registry contents, never persisted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HierarchyNode {
    pub value: String,
    pub label: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub category: String,
    pub is_leaf: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchyNode>,
}

/// Resolves a display label: exact locale hit first, then the value of
/// the lexicographically smallest locale key. None only for an empty
/// mapping.
pub fn localize(names: &NameMap, locale: &str) -> Option<String> {
    if let Some(hit) = names.get(locale) {
        return Some(hit.clone());
    }
    names.values().next().cloned()
}

/// Builds the full navigation tree for every registered app. Metric and
/// field labels are their raw names; only app labels are localized.
pub fn build_hierarchy(registry: &TemplateRegistry, locale: &str) -> Vec<HierarchyNode> {
    let mut nodes = Vec::new();
    for job in registry.all_app_defines() {
        let metrics = job
            .metrics
            .iter()
            .map(|metric| {
                let fields = metric
                    .fields
                    .iter()
                    .map(|field| HierarchyNode {
                        value: field.field.clone(),
                        label: field.field.clone(),
                        is_leaf: true,
                        ..Default::default()
                    })
                    .collect();
                HierarchyNode {
                    value: metric.name.clone(),
                    label: metric.name.clone(),
                    is_leaf: false,
                    children: fields,
                    ..Default::default()
                }
            })
            .collect();
        nodes.push(HierarchyNode {
            value: job.app.clone(),
            label: localize(&job.name, locale).unwrap_or_else(|| job.app.clone()),
            category: job.category.clone(),
            is_leaf: false,
            children: metrics,
        });
    }
    nodes
}

/// Flat localization resource map consumed by UI layers:
/// `monitor.app.<app>` for app names and
/// `monitor.app.<app>.param.<field>` for parameter names.
pub fn i18n_resources(registry: &TemplateRegistry, locale: &str) -> BTreeMap<String, String> {
    let mut resources = BTreeMap::new();
    for job in registry.all_app_defines() {
        if let Some(label) = localize(&job.name, locale) {
            resources.insert(format!("monitor.app.{}", job.app), label);
        }
    }
    // Walked separately from the schemas: an app can hold parameters
    // without a schema being attached yet.
    for (app, params) in registry.all_param_defines() {
        for param in params {
            if let Some(label) = localize(&param.name, locale) {
                resources.insert(format!("monitor.app.{}.param.{}", app, param.field), label);
            }
        }
    }
    resources
}
