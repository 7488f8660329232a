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
//! Container types.
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use openstack_api_types::error::BuilderError;
use openstack_api_types::time::flexible_option;

/// Query parameters of the container listing. `format=json` is always sent.
#[derive(Builder, Clone, Debug, Default, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct ListOpts {
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Return containers sorted after this name.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
    /// Return containers sorted before this name.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_marker: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
}

/// Container entry of the account listing.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Container {
    pub name: String,
    /// Number of objects.
    #[serde(default)]
    pub count: u64,
    /// Total size of the objects in bytes.
    #[serde(default)]
    pub bytes: u64,
    #[serde(default, with = "flexible_option")]
    pub last_modified: Option<DateTime<Utc>>,
}

/// Container creation data, sent as request headers.
#[derive(Builder, Clone, Debug, Default, PartialEq)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct CreateOpts {
    /// Sent as `X-Container-Meta-<key>`.
    #[builder(default)]
    pub metadata: HashMap<String, String>,
    /// Read ACL (`X-Container-Read`).
    #[builder(default)]
    pub container_read: Option<String>,
    /// Write ACL (`X-Container-Write`).
    #[builder(default)]
    pub container_write: Option<String>,
    #[builder(default)]
    pub container_sync_to: Option<String>,
    #[builder(default)]
    pub container_sync_key: Option<String>,
    #[builder(default)]
    pub versions_location: Option<String>,
    #[builder(default)]
    pub history_location: Option<String>,
    #[builder(default)]
    pub storage_policy: Option<String>,
    #[builder(default)]
    pub versions_enabled: Option<bool>,
    #[builder(default)]
    pub content_type: Option<String>,
    #[builder(default)]
    pub detect_content_type: Option<bool>,
}

/// Container update data, sent as request headers.
#[derive(Builder, Clone, Debug, Default, PartialEq)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct UpdateOpts {
    /// Metadata to set or overwrite.
    #[builder(default)]
    pub metadata: HashMap<String, String>,
    /// Metadata keys to remove (`X-Remove-Container-Meta-<key>`).
    #[builder(default)]
    pub remove_metadata: Vec<String>,
    #[builder(default)]
    pub container_read: Option<String>,
    #[builder(default)]
    pub remove_container_read: bool,
    #[builder(default)]
    pub container_write: Option<String>,
    #[builder(default)]
    pub remove_container_write: bool,
    #[builder(default)]
    pub container_sync_to: Option<String>,
    #[builder(default)]
    pub container_sync_key: Option<String>,
    #[builder(default)]
    pub versions_location: Option<String>,
    #[builder(default)]
    pub remove_versions_location: bool,
    #[builder(default)]
    pub history_location: Option<String>,
    #[builder(default)]
    pub remove_history_location: bool,
    #[builder(default)]
    pub versions_enabled: Option<bool>,
    #[builder(default)]
    pub content_type: Option<String>,
    #[builder(default)]
    pub detect_content_type: Option<bool>,
}

/// Options of a container `HEAD` request.
#[derive(Builder, Clone, Debug, Default, PartialEq)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct GetOpts {
    /// Ask for the most recent replica (`X-Newest`).
    #[builder(default)]
    pub newest: bool,
}

/// Outcome of a bulk delete.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct BulkDeleteResponse {
    #[serde(rename = "Response Status", default)]
    pub response_status: String,
    #[serde(rename = "Response Body", default)]
    pub response_body: String,
    /// `[name, status]` pairs of the entries that failed.
    #[serde(rename = "Errors", default)]
    pub errors: Vec<Vec<String>>,
    #[serde(rename = "Number Deleted", default)]
    pub number_deleted: u64,
    #[serde(rename = "Number Not Found", default)]
    pub number_not_found: u64,
}

/// Container properties returned by a `HEAD` request.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ContainerInfo {
    pub bytes_used: u64,
    pub object_count: u64,
    /// Read ACL entries.
    pub read: Vec<String>,
    /// Write ACL entries.
    pub write: Vec<String>,
    pub storage_policy: Option<String>,
    pub versions_location: Option<String>,
    pub history_location: Option<String>,
    pub versions_enabled: bool,
    pub content_type: Option<String>,
    /// `X-Timestamp` as seconds since the epoch.
    pub timestamp: Option<f64>,
    pub trans_id: Option<String>,
    /// `X-Container-Meta-*` values keyed by the lower case suffix.
    pub metadata: HashMap<String, String>,
}
