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
//! # Security groups
use url::Url;

use crate::client::{RequestOpts, ServiceClient};
use crate::error::OpenStackError;
use crate::pagination::{Collection, LinkedPage, Pager};
use crate::params::{build_request_body, with_query};

mod types;

pub use types::*;

fn groups_url(client: &ServiceClient, parts: &[&str]) -> Result<Url, OpenStackError> {
    let mut all = vec!["security-groups"];
    all.extend_from_slice(parts);
    client.service_url(&all)
}

/// `security_groups` collection.
pub struct SecGroups;

impl Collection for SecGroups {
    type Item = SecGroup;
    const KEY: &'static str = "security_groups";
}

/// Linked page of security groups. A `204 No Content` answer is empty.
pub type SecGroupPage = LinkedPage<SecGroups>;

pub fn list(client: &ServiceClient, opts: Option<&ListOpts>) -> Result<Pager<SecGroupPage>, OpenStackError> {
    let url = with_query(groups_url(client, &[])?, opts)?;
    Ok(Pager::new(client, url, SecGroupPage::new))
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn get(client: &ServiceClient, id: &str) -> Result<SecGroup, OpenStackError> {
    client
        .get(groups_url(client, &[id])?, RequestOpts::default())
        .await?
        .extract("security_group")
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn create(client: &ServiceClient, opts: &CreateOpts) -> Result<SecGroup, OpenStackError> {
    let body = build_request_body(opts, "security_group")?;
    client
        .post(
            groups_url(client, &[])?,
            RequestOpts::default().with_json(body).with_ok_codes(&[201]),
        )
        .await?
        .extract("security_group")
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn update(
    client: &ServiceClient,
    id: &str,
    opts: &UpdateOpts,
) -> Result<SecGroup, OpenStackError> {
    let body = build_request_body(opts, "security_group")?;
    client
        .put(
            groups_url(client, &[id])?,
            RequestOpts::default().with_json(body).with_ok_codes(&[200]),
        )
        .await?
        .extract("security_group")
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn delete(client: &ServiceClient, id: &str) -> Result<(), OpenStackError> {
    client
        .delete(groups_url(client, &[id])?, RequestOpts::default().with_ok_codes(&[204]))
        .await?;
    Ok(())
}
