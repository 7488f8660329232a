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
//! # Hypervisors
use url::Url;

use crate::client::{RequestOpts, ServiceClient};
use crate::error::OpenStackError;
use crate::pagination::{Collection, LinkedPage, Pager};
use crate::params::with_query;

mod types;

pub use types::*;

fn hypervisors_url(client: &ServiceClient, parts: &[&str]) -> Result<Url, OpenStackError> {
    let mut all = vec!["os-hypervisors"];
    all.extend_from_slice(parts);
    client.service_url(&all)
}

/// `hypervisors` collection.
pub struct Hypervisors;

impl Collection for Hypervisors {
    type Item = Hypervisor;
    const KEY: &'static str = "hypervisors";
}

pub type HypervisorPage = LinkedPage<Hypervisors>;

/// List hypervisors with their details.
pub fn list(
    client: &ServiceClient,
    opts: Option<&ListOpts>,
) -> Result<Pager<HypervisorPage>, OpenStackError> {
    let url = with_query(hypervisors_url(client, &["detail"])?, opts)?;
    Ok(Pager::new(client, url, HypervisorPage::new))
}

/// Resource usage summed over all hypervisors.
#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn get_statistics(client: &ServiceClient) -> Result<Statistics, OpenStackError> {
    client
        .get(hypervisors_url(client, &["statistics"])?, RequestOpts::default())
        .await?
        .extract("hypervisor_statistics")
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn get(client: &ServiceClient, id: &str) -> Result<Hypervisor, OpenStackError> {
    client
        .get(hypervisors_url(client, &[id])?, RequestOpts::default())
        .await?
        .extract("hypervisor")
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn get_uptime(client: &ServiceClient, id: &str) -> Result<Uptime, OpenStackError> {
    client
        .get(hypervisors_url(client, &[id, "uptime"])?, RequestOpts::default())
        .await?
        .extract("hypervisor")
}
