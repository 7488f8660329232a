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
//! # OpenStack client
//!
//! Typed bindings for the OpenStack REST APIs. Every resource module builds
//! the request urls of one API resource, turns option structs into query
//! strings or JSON bodies, sends them through a shared [`client::ServiceClient`]
//! and decodes the responses into typed structs.
//!
//! Collections are walked with a [`pagination::Pager`]:
//!
//! ```no_run
//! # async fn example() -> Result<(), openstack_client::error::OpenStackError> {
//! use openstack_client::client::ProviderClient;
//! use openstack_client::compute::v2::flavors;
//! use openstack_client::config::Config;
//! use tokio_util::sync::CancellationToken;
//!
//! let provider = ProviderClient::from_config(&Config::from_env()?).await?;
//! let compute = provider.compute_v2().await?;
//! let pager = flavors::list_detail(&compute, None)?;
//! pager
//!     .each_page(&CancellationToken::new(), |page| {
//!         for flavor in page.items()? {
//!             println!("{} {}", flavor.id, flavor.name);
//!         }
//!         Ok(true)
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! Supported services:
//!
//! - compute v2: flavors, hypervisors
//! - identity v3: EC2 credentials
//! - image v2: tasks
//! - networking v2: FWaaS v2 firewall policies, security groups
//! - load balancer v2: listeners
//! - shared file systems v2: snapshots, user messages
//! - object storage v1: containers
//! - bare metal introspection v1
//! - workflow v2: workflows

pub mod baremetalintrospection;
pub mod client;
pub mod compute;
pub mod config;
pub mod error;
pub mod identity;
pub mod image;
pub mod loadbalancer;
pub mod networking;
pub mod objectstorage;
pub mod pagination;
pub mod params;
pub mod sharedfilesystems;
pub mod workflow;

#[cfg(test)]
mod tests;
