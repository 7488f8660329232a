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
//! # Listeners
//!
//! `lbaas/listeners` of the Octavia API.
use url::Url;

use crate::client::{RequestOpts, ServiceClient};
use crate::error::OpenStackError;
use crate::pagination::{Collection, LinkedPage, Pager};
use crate::params::{build_request_body, with_query};

mod types;

pub use types::*;

fn listeners_url(client: &ServiceClient, parts: &[&str]) -> Result<Url, OpenStackError> {
    let mut all = vec!["lbaas", "listeners"];
    all.extend_from_slice(parts);
    client.service_url(&all)
}

/// `listeners` collection.
pub struct Listeners;

impl Collection for Listeners {
    type Item = Listener;
    const KEY: &'static str = "listeners";
}

pub type ListenerPage = LinkedPage<Listeners>;

pub fn list(client: &ServiceClient, opts: Option<&ListOpts>) -> Result<Pager<ListenerPage>, OpenStackError> {
    let url = with_query(listeners_url(client, &[])?, opts)?;
    Ok(Pager::new(client, url, ListenerPage::new))
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn get(client: &ServiceClient, id: &str) -> Result<Listener, OpenStackError> {
    client
        .get(listeners_url(client, &[id])?, RequestOpts::default())
        .await?
        .extract("listener")
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn create(client: &ServiceClient, opts: &CreateOpts) -> Result<Listener, OpenStackError> {
    let body = build_request_body(opts, "listener")?;
    client
        .post(
            listeners_url(client, &[])?,
            RequestOpts::default().with_json(body).with_ok_codes(&[201]),
        )
        .await?
        .extract("listener")
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn update(
    client: &ServiceClient,
    id: &str,
    opts: &UpdateOpts,
) -> Result<Listener, OpenStackError> {
    let body = build_request_body(opts, "listener")?;
    client
        .put(
            listeners_url(client, &[id])?,
            RequestOpts::default().with_json(body).with_ok_codes(&[200, 202]),
        )
        .await?
        .extract("listener")
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn delete(client: &ServiceClient, id: &str) -> Result<(), OpenStackError> {
    client
        .delete(listeners_url(client, &[id])?, RequestOpts::default().with_ok_codes(&[204]))
        .await?;
    Ok(())
}

/// Traffic counters of the listener.
#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn get_stats(client: &ServiceClient, id: &str) -> Result<Stats, OpenStackError> {
    client
        .get(listeners_url(client, &[id, "stats"])?, RequestOpts::default())
        .await?
        .extract("stats")
}
