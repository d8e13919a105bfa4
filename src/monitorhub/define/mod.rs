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

mod bundled;
pub mod custom;
pub mod hierarchy;
pub mod job;
pub mod loader;
pub mod registry;
pub mod service;
pub mod store;

use crate::monitorhub::dispatch::DispatchError;
use crate::monitorhub::util::error::BoxError;

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum TemplateError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
    UnknownHandler(String),
    Persistence(BoxError),
}

impl Display for TemplateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::NotFound(msg)
            | TemplateError::Conflict(msg)
            | TemplateError::Invalid(msg)
            | TemplateError::UnknownHandler(msg) => f.write_str(msg),
            TemplateError::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TemplateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TemplateError::Persistence(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<DispatchError> for TemplateError {
    fn from(err: DispatchError) -> Self {
        TemplateError::UnknownHandler(err.to_string())
    }
}

impl TemplateError {
    pub fn persistence_box(err: BoxError) -> Self {
        Self::Persistence(err)
    }
}
