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
//! Hypervisor types.
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use openstack_api_types::de::{object_or_json_string, string_or_int};
use openstack_api_types::error::BuilderError;

/// Query parameters of the hypervisor listing.
#[derive(Builder, Clone, Debug, Default, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct ListOpts {
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// ID of the last hypervisor of the previous page.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,

    /// Hypervisor host name pattern (microversion 2.53).
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hypervisor_hostname_pattern: Option<String>,

    /// Include the instances hosted by each hypervisor (microversion 2.53).
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_servers: Option<bool>,
}

/// Topology of the host CPUs.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Topology {
    #[serde(default)]
    pub sockets: u32,
    #[serde(default)]
    pub cores: u32,
    #[serde(default)]
    pub threads: u32,
}

/// CPU of the host. Old releases serialize it into a JSON string.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct CpuInfo {
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub arch: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub topology: Topology,
}

/// Compute service running on the hypervisor host.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Service {
    #[serde(default)]
    pub host: String,
    #[serde(default, deserialize_with = "string_or_int")]
    pub id: String,
    #[serde(default)]
    pub disabled_reason: Option<String>,
}

/// Instance hosted by the hypervisor.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Server {
    pub name: String,
    pub uuid: String,
}

/// Compute hypervisor. Resource usage fields are gone since microversion
/// 2.88 and default to 0.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Hypervisor {
    /// Integer before microversion 2.53, UUID afterwards.
    #[serde(deserialize_with = "string_or_int")]
    pub id: String,

    #[serde(default, deserialize_with = "object_or_json_string")]
    pub cpu_info: CpuInfo,

    #[serde(default)]
    pub current_workload: i64,

    /// `enabled` or `disabled`.
    #[serde(default)]
    pub status: String,

    /// `up` or `down`.
    #[serde(default)]
    pub state: String,

    #[serde(default)]
    pub disk_available_least: Option<i64>,

    #[serde(default)]
    pub host_ip: Option<String>,

    #[serde(default)]
    pub free_disk_gb: i64,

    #[serde(default)]
    pub free_ram_mb: i64,

    pub hypervisor_hostname: String,

    #[serde(default)]
    pub hypervisor_type: String,

    #[serde(default)]
    pub hypervisor_version: i64,

    #[serde(default)]
    pub local_gb: i64,

    #[serde(default)]
    pub local_gb_used: i64,

    #[serde(default)]
    pub memory_mb: i64,

    #[serde(default)]
    pub memory_mb_used: i64,

    #[serde(default)]
    pub running_vms: i64,

    #[serde(default)]
    pub service: Service,

    /// Hosted instances, reported when requested.
    #[serde(default)]
    pub servers: Option<Vec<Server>>,

    #[serde(default)]
    pub vcpus: i64,

    #[serde(default)]
    pub vcpus_used: i64,
}

/// Summary of all hypervisors.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Statistics {
    pub count: i64,
    pub current_workload: i64,
    #[serde(default)]
    pub disk_available_least: i64,
    pub free_disk_gb: i64,
    pub free_ram_mb: i64,
    pub local_gb: i64,
    pub local_gb_used: i64,
    pub memory_mb: i64,
    pub memory_mb_used: i64,
    pub running_vms: i64,
    pub vcpus: i64,
    pub vcpus_used: i64,
}

/// Uptime of a hypervisor.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Uptime {
    pub hypervisor_hostname: String,
    #[serde(deserialize_with = "string_or_int")]
    pub id: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub status: String,
    /// Output of the `uptime` command on the host.
    #[serde(default)]
    pub uptime: String,
}
