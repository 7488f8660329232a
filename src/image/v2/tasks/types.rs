// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0
//! Image task types.
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use openstack_api_types::error::BuilderError;
use openstack_api_types::time::flexible_option;

/// Status of an image task.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Processing,
    Success,
    Failure,
}

/// Query parameters of the task listing.
#[derive(Builder, Clone, Debug, Default, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct ListOpts {
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// ID of the last task of the previous page.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
    /// `asc` or `desc` (default).
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_dir: Option<String>,
    /// One of `created_at` (default), `expires_at`, `status`, `type` or
    /// `updated_at`.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[builder(default)]
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

/// Asynchronous image operation.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Task {
    pub id: String,
    /// `import` is the only type known so far.
    #[serde(rename = "type")]
    pub task_type: String,
    pub status: TaskStatus,
    /// Parameters the task was created with.
    #[serde(default)]
    pub input: Option<Map<String, Value>>,
    /// Outcome of a finished task.
    #[serde(default)]
    pub result: Option<Map<String, Value>>,
    #[serde(default)]
    pub owner: String,
    /// Failure description.
    #[serde(default)]
    pub message: String,
    #[serde(default, with = "flexible_option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "flexible_option")]
    pub updated_at: Option<DateTime<Utc>>,
    /// When the task is purged.
    #[serde(default, with = "flexible_option")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Relative url of the task.
    #[serde(rename = "self", default)]
    pub self_link: String,
    #[serde(default)]
    pub schema: String,
}

/// Task creation data.
#[derive(Builder, Clone, Debug, Default, PartialEq, Serialize, Validate)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct CreateOpts {
    #[serde(rename = "type")]
    #[validate(length(min = 1))]
    pub task_type: String,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Map<String, Value>>,
}
