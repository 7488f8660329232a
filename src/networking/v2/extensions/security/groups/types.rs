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
//! Security group types.
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use validator::Validate;

use openstack_api_types::error::BuilderError;
use openstack_api_types::time::flexible_option;

/// Query parameters of the security group listing.
#[derive(Builder, Clone, Debug, Default, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct ListOpts {
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stateful: Option<bool>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_dir: Option<String>,
    /// Groups carrying all the tags.
    #[builder(default)]
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::params::csv::serialize"
    )]
    pub tags: Option<Vec<String>>,
    /// Groups carrying any of the tags.
    #[builder(default)]
    #[serde(
        rename = "tags-any",
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::params::csv::serialize"
    )]
    pub tags_any: Option<Vec<String>>,
    #[builder(default)]
    #[serde(
        rename = "not-tags",
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::params::csv::serialize"
    )]
    pub not_tags: Option<Vec<String>>,
    #[builder(default)]
    #[serde(
        rename = "not-tags-any",
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::params::csv::serialize"
    )]
    pub not_tags_any: Option<Vec<String>>,
}

/// Rule of a security group.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct SecGroupRule {
    pub id: String,
    /// `ingress` or `egress`.
    pub direction: String,
    #[serde(default)]
    pub description: Option<String>,
    /// `IPv4` or `IPv6`.
    #[serde(default)]
    pub ethertype: String,
    pub security_group_id: String,
    #[serde(default)]
    pub port_range_min: Option<u16>,
    #[serde(default)]
    pub port_range_max: Option<u16>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub remote_group_id: Option<String>,
    #[serde(default)]
    pub remote_ip_prefix: Option<String>,
    #[serde(default)]
    pub tenant_id: String,
    #[serde(default)]
    pub project_id: String,
}

/// Security group.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct SecGroup {
    pub id: String,

    /// Name of the group, not necessarily unique.
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Rules describing the permitted traffic.
    #[serde(rename = "security_group_rules", default)]
    pub rules: Vec<SecGroupRule>,

    /// Whether the group tracks connections.
    #[serde(default)]
    pub stateful: bool,

    #[serde(default)]
    pub tenant_id: String,

    #[serde(default)]
    pub project_id: String,

    /// Older Neutron releases send the time without a zone.
    #[serde(default, with = "flexible_option")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, with = "flexible_option")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub tags: Vec<String>,
}

/// Security group creation data.
#[derive(Builder, Clone, Debug, Default, PartialEq, Serialize, Validate)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct CreateOpts {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 255))]
    pub description: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stateful: Option<bool>,
}

/// Security group update data.
#[derive(Builder, Clone, Debug, Default, PartialEq, Serialize, Validate)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct UpdateOpts {
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 255))]
    pub description: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stateful: Option<bool>,
}
