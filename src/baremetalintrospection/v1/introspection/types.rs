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
//! Introspection types.
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use openstack_api_types::Link;
use openstack_api_types::error::BuilderError;
use openstack_api_types::time::flexible_option;

/// Query parameters of the introspection listing.
#[derive(Builder, Clone, Debug, Default, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct ListIntrospectionsOpts {
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// UUID of the last introspection seen.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
}

/// Introspection state of a node.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Introspection {
    /// Node UUID.
    pub uuid: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub finished: bool,
    /// Error message, `None` while running or on success.
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, with = "flexible_option")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, with = "flexible_option")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub links: Vec<Link>,
}

/// Options of a new introspection.
#[derive(Builder, Clone, Debug, Default, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct StartOpts {
    /// Whether the inspector manages the PXE boot of the node.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manage_boot: Option<bool>,
}

/// Network interface reported by the ramdisk.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct BaseInterface {
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default)]
    pub pxe: bool,
    #[serde(default)]
    pub client_id: Option<String>,
    /// Processed LLDP values keyed by TLV name.
    #[serde(default)]
    pub lldp_processed: Map<String, Value>,
}

/// Disk chosen as the root device.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct RootDisk {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub rotational: bool,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub wwn: Option<String>,
    #[serde(default)]
    pub hctl: Option<String>,
    #[serde(default)]
    pub by_path: Option<String>,
}

/// Data stored after a successful introspection.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Data {
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub all_interfaces: HashMap<String, BaseInterface>,
    #[serde(default)]
    pub interfaces: HashMap<String, BaseInterface>,
    #[serde(default)]
    pub boot_interface: Option<String>,
    #[serde(default)]
    pub cpu_arch: Option<String>,
    #[serde(default)]
    pub cpus: u32,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub ipmi_address: Option<String>,
    #[serde(default)]
    pub local_gb: u64,
    #[serde(default)]
    pub macs: Vec<String>,
    #[serde(default)]
    pub memory_mb: u64,
    #[serde(default)]
    pub root_disk: Option<RootDisk>,
    /// Raw hardware inventory as reported by the ramdisk.
    #[serde(default)]
    pub inventory: Map<String, Value>,
    #[serde(default)]
    pub extra: Map<String, Value>,
    #[serde(default)]
    pub numa_topology: Map<String, Value>,
    #[serde(default)]
    pub raw_lldp: HashMap<String, Vec<Value>>,
}
