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

// Embedded fallback definitions used when no define directory is
// deployed next to the binary. One entry per document, mirroring the
// on-disk `app-<app>.yml` / `param-<app>.yml` layout.

pub const APP_DEFINES: &[(&str, &str)] = &[
    ("app-mysql.yml", include_str!("bundled/app-mysql.yml")),
    ("app-website.yml", include_str!("bundled/app-website.yml")),
];

pub const PARAM_DEFINES: &[(&str, &str)] = &[
    ("param-mysql.yml", include_str!("bundled/param-mysql.yml")),
    ("param-website.yml", include_str!("bundled/param-website.yml")),
];
