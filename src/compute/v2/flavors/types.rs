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
//! Flavor types.
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use openstack_api_types::de::int_or_empty;
use openstack_api_types::error::BuilderError;

/// Flavor visibility filter.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub enum AccessType {
    /// Public flavors only.
    #[serde(rename = "true")]
    Public,
    /// Private flavors only.
    #[serde(rename = "false")]
    Private,
    /// Public and private flavors.
    #[serde(rename = "None")]
    All,
}

/// Query parameters of the flavor listing.
#[derive(Builder, Clone, Debug, Default, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct ListOpts {
    /// Only flavors changed after the given time (ISO 8601).
    #[builder(default)]
    #[serde(rename = "changes-since", skip_serializing_if = "Option::is_none")]
    pub changes_since: Option<String>,

    /// Minimal disk size in GiB.
    #[builder(default)]
    #[serde(rename = "minDisk", skip_serializing_if = "Option::is_none")]
    pub min_disk: Option<u64>,

    /// Minimal memory in MiB.
    #[builder(default)]
    #[serde(rename = "minRam", skip_serializing_if = "Option::is_none")]
    pub min_ram: Option<u64>,

    /// `asc` or `desc`.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_dir: Option<String>,

    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,

    /// ID of the last flavor of the previous page.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,

    /// Page size.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Visibility filter. Without it only public flavors are listed, admins
    /// see private ones too.
    #[builder(default)]
    #[serde(rename = "is_public", skip_serializing_if = "Option::is_none")]
    pub access_type: Option<AccessType>,
}

/// Compute flavor.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Flavor {
    pub id: String,

    /// Root disk size in GiB.
    #[serde(default)]
    pub disk: u64,

    /// Memory in MiB.
    #[serde(default)]
    pub ram: u64,

    pub name: String,

    #[serde(default)]
    pub rxtx_factor: f64,

    /// Swap size in MiB. Flavors without swap report an empty string.
    #[serde(default, deserialize_with = "int_or_empty")]
    pub swap: i64,

    #[serde(default)]
    pub vcpus: u32,

    /// Whether every project can use the flavor.
    #[serde(rename = "os-flavor-access:is_public", default)]
    pub is_public: bool,

    /// Ephemeral disk size in GiB.
    #[serde(rename = "OS-FLV-EXT-DATA:ephemeral", default)]
    pub ephemeral: u64,

    #[serde(default)]
    pub description: Option<String>,

    /// Extra specs, reported by microversion 2.61 and later.
    #[serde(default)]
    pub extra_specs: Option<HashMap<String, String>>,
}

/// Flavor creation data.
#[derive(Builder, Clone, Debug, Default, PartialEq, Serialize, Validate)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct CreateOpts {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Memory in MiB.
    #[validate(range(min = 1))]
    pub ram: u64,

    #[validate(range(min = 1))]
    pub vcpus: u32,

    /// Root disk size in GiB. 0 means the image size.
    pub disk: u64,

    /// ID of the flavor, generated by the server when unset.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Swap size in MiB.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap: Option<u64>,

    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rxtx_factor: Option<f64>,

    #[builder(default)]
    #[serde(
        rename = "os-flavor-access:is_public",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_public: Option<bool>,

    /// Ephemeral disk size in GiB.
    #[builder(default)]
    #[serde(
        rename = "OS-FLV-EXT-DATA:ephemeral",
        skip_serializing_if = "Option::is_none"
    )]
    pub ephemeral: Option<u64>,

    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 65535))]
    pub description: Option<String>,
}

/// Flavor update data.
#[derive(Builder, Clone, Debug, Default, PartialEq, Serialize, Validate)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(into))]
pub struct UpdateOpts {
    /// New description. Required.
    #[validate(length(max = 65535))]
    pub description: String,
}

/// Access of a project to a private flavor.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct FlavorAccess {
    pub flavor_id: String,
    pub tenant_id: String,
}

/// Tenant referenced by the flavor access actions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Validate)]
pub struct TenantAccess {
    #[validate(length(min = 1))]
    pub tenant: String,
}

impl TenantAccess {
    pub fn new<S: Into<String>>(tenant: S) -> Self {
        Self {
            tenant: tenant.into(),
        }
    }
}

/// Flavor extra specs.
pub type ExtraSpecs = HashMap<String, String>;
