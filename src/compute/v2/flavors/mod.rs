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
//! # Flavors
//!
//! Compute flavors, their project access list and their extra specs.
use serde_json::{Map, Value, json};
use url::Url;

use crate::client::{RequestOpts, ServiceClient};
use crate::error::OpenStackError;
use crate::pagination::{Collection, LinkedPage, Pager, SinglePage};
use crate::params::{build_request_body, with_query};

mod types;

pub use types::*;

fn flavors_url(client: &ServiceClient, parts: &[&str]) -> Result<Url, OpenStackError> {
    let mut all = vec!["flavors"];
    all.extend_from_slice(parts);
    client.service_url(&all)
}

/// `flavors` collection.
pub struct Flavors;

impl Collection for Flavors {
    type Item = Flavor;
    const KEY: &'static str = "flavors";
}

pub type FlavorPage = LinkedPage<Flavors>;

/// `flavor_access` collection.
pub struct FlavorAccesses;

impl Collection for FlavorAccesses {
    type Item = FlavorAccess;
    const KEY: &'static str = "flavor_access";
}

pub type FlavorAccessPage = SinglePage<FlavorAccesses>;

/// List flavors with their details.
pub fn list_detail(
    client: &ServiceClient,
    opts: Option<&ListOpts>,
) -> Result<Pager<FlavorPage>, OpenStackError> {
    let url = with_query(flavors_url(client, &["detail"])?, opts)?;
    Ok(Pager::new(client, url, FlavorPage::new))
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn get(client: &ServiceClient, id: &str) -> Result<Flavor, OpenStackError> {
    client
        .get(flavors_url(client, &[id])?, RequestOpts::default())
        .await?
        .extract("flavor")
}

#[tracing::instrument(level = "debug", skip(client, opts), err(Debug))]
pub async fn create(client: &ServiceClient, opts: &CreateOpts) -> Result<Flavor, OpenStackError> {
    let body = build_request_body(opts, "flavor")?;
    client
        .post(
            flavors_url(client, &[])?,
            RequestOpts::default().with_json(body).with_ok_codes(&[200, 201]),
        )
        .await?
        .extract("flavor")
}

/// Update the flavor description.
#[tracing::instrument(level = "debug", skip(client, opts), err(Debug))]
pub async fn update(
    client: &ServiceClient,
    id: &str,
    opts: &UpdateOpts,
) -> Result<Flavor, OpenStackError> {
    let body = build_request_body(opts, "flavor")?;
    client
        .put(
            flavors_url(client, &[id])?,
            RequestOpts::default().with_json(body).with_ok_codes(&[200]),
        )
        .await?
        .extract("flavor")
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn delete(client: &ServiceClient, id: &str) -> Result<(), OpenStackError> {
    client
        .delete(flavors_url(client, &[id])?, RequestOpts::default())
        .await?;
    Ok(())
}

/// List the projects that can use a private flavor.
pub fn list_accesses(
    client: &ServiceClient,
    id: &str,
) -> Result<Pager<FlavorAccessPage>, OpenStackError> {
    Ok(Pager::new(
        client,
        flavors_url(client, &[id, "os-flavor-access"])?,
        FlavorAccessPage::new,
    ))
}

async fn access_action(
    client: &ServiceClient,
    id: &str,
    action: &str,
    opts: &TenantAccess,
) -> Result<Vec<FlavorAccess>, OpenStackError> {
    let body = build_request_body(opts, action)?;
    client
        .post(
            flavors_url(client, &[id, "action"])?,
            RequestOpts::default().with_json(body).with_ok_codes(&[200]),
        )
        .await?
        .extract("flavor_access")
}

/// Grant the project access to the flavor. Returns the resulting access list.
#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn add_access(
    client: &ServiceClient,
    id: &str,
    opts: &TenantAccess,
) -> Result<Vec<FlavorAccess>, OpenStackError> {
    access_action(client, id, "addTenantAccess", opts).await
}

/// Revoke the access of the project. Returns the resulting access list.
#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn remove_access(
    client: &ServiceClient,
    id: &str,
    opts: &TenantAccess,
) -> Result<Vec<FlavorAccess>, OpenStackError> {
    access_action(client, id, "removeTenantAccess", opts).await
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn list_extra_specs(client: &ServiceClient, id: &str) -> Result<ExtraSpecs, OpenStackError> {
    client
        .get(flavors_url(client, &[id, "os-extra_specs"])?, RequestOpts::default())
        .await?
        .extract("extra_specs")
}

/// Single extra spec, returned as a one entry map.
#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn get_extra_spec(
    client: &ServiceClient,
    id: &str,
    key: &str,
) -> Result<ExtraSpecs, OpenStackError> {
    client
        .get(
            flavors_url(client, &[id, "os-extra_specs", key])?,
            RequestOpts::default(),
        )
        .await?
        .json()
}

/// Add extra specs. Existing keys are overwritten.
#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn create_extra_specs(
    client: &ServiceClient,
    id: &str,
    specs: &ExtraSpecs,
) -> Result<ExtraSpecs, OpenStackError> {
    if specs.is_empty() {
        return Err(OpenStackError::MissingInput("extra_specs".into()));
    }
    client
        .post(
            flavors_url(client, &[id, "os-extra_specs"])?,
            RequestOpts::default()
                .with_json(json!({ "extra_specs": specs }))
                .with_ok_codes(&[200]),
        )
        .await?
        .extract("extra_specs")
}

/// Set a single extra spec.
#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn update_extra_spec(
    client: &ServiceClient,
    id: &str,
    key: &str,
    value: &str,
) -> Result<ExtraSpecs, OpenStackError> {
    if key.is_empty() {
        return Err(OpenStackError::MissingInput("key".into()));
    }
    let body = Value::Object(Map::from_iter([(key.to_string(), Value::from(value))]));
    client
        .put(
            flavors_url(client, &[id, "os-extra_specs", key])?,
            RequestOpts::default().with_json(body).with_ok_codes(&[200]),
        )
        .await?
        .json()
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn delete_extra_spec(client: &ServiceClient, id: &str, key: &str) -> Result<(), OpenStackError> {
    client
        .delete(
            flavors_url(client, &[id, "os-extra_specs", key])?,
            RequestOpts::default().with_ok_codes(&[200]),
        )
        .await?;
    Ok(())
}
