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
//! Share snapshot types.
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use openstack_api_types::error::BuilderError;
use openstack_api_types::time::flexible_option;

/// Query parameters of the snapshot listing.
#[derive(Builder, Clone, Debug, Default, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct ListOpts {
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_id: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Page size. Without a limit everything comes in one page.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Number of snapshots to skip.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_dir: Option<String>,
    /// Name substring filter.
    #[builder(default)]
    #[serde(rename = "name~", skip_serializing_if = "Option::is_none")]
    pub name_pattern: Option<String>,
    /// Description substring filter.
    #[builder(default)]
    #[serde(rename = "description~", skip_serializing_if = "Option::is_none")]
    pub description_pattern: Option<String>,
    /// List the snapshots of every project (admin only).
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_tenants: Option<bool>,
}

/// Share snapshot.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Snapshot {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Share the snapshot was taken of.
    pub share_id: String,
    /// File system protocol of the share.
    #[serde(default)]
    pub share_proto: String,
    /// Size of the share in GiB.
    #[serde(default)]
    pub share_size: u64,
    /// Size of the snapshot in GiB.
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default, with = "flexible_option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub links: Vec<Value>,
}

/// Snapshot creation data.
#[derive(Builder, Clone, Debug, Default, PartialEq, Serialize, Validate)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct CreateOpts {
    /// Share to take the snapshot of.
    #[validate(length(min = 1))]
    pub share_id: String,
    /// Snapshot a share that is busy.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_description: Option<String>,
}

/// Snapshot update data.
#[derive(Builder, Clone, Debug, Default, PartialEq, Serialize, Validate)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct UpdateOpts {
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_description: Option<String>,
}

/// Target of a status reset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Validate)]
pub struct ResetStatusOpts {
    /// `available`, `error`, `creating`, `deleting` or `error_deleting`.
    #[validate(length(min = 1))]
    pub status: String,
}

impl ResetStatusOpts {
    pub fn new<S: Into<String>>(status: S) -> Self {
        Self {
            status: status.into(),
        }
    }
}
