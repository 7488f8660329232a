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
//! # Firewall policies
//!
//! `fwaas/firewall_policies` of the Neutron FWaaS v2 extension.
use serde_json::Value;
use url::Url;

use crate::client::{ApiResponse, RequestOpts, ServiceClient};
use crate::error::OpenStackError;
use crate::pagination::{Collection, LinkedPage, Pager};
use crate::params::{build_request_body, with_query};

mod types;

pub use types::*;

fn policies_url(client: &ServiceClient, parts: &[&str]) -> Result<Url, OpenStackError> {
    let mut all = vec!["fwaas", "firewall_policies"];
    all.extend_from_slice(parts);
    client.service_url(&all)
}

/// `firewall_policies` collection.
pub struct Policies;

impl Collection for Policies {
    type Item = Policy;
    const KEY: &'static str = "firewall_policies";
}

pub type PolicyPage = LinkedPage<Policies>;

pub fn list(client: &ServiceClient, opts: Option<&ListOpts>) -> Result<Pager<PolicyPage>, OpenStackError> {
    let url = with_query(policies_url(client, &[])?, opts)?;
    Ok(Pager::new(client, url, PolicyPage::new))
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn get(client: &ServiceClient, id: &str) -> Result<Policy, OpenStackError> {
    client
        .get(policies_url(client, &[id])?, RequestOpts::default())
        .await?
        .extract("firewall_policy")
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn create(client: &ServiceClient, opts: &CreateOpts) -> Result<Policy, OpenStackError> {
    let body = build_request_body(opts, "firewall_policy")?;
    client
        .post(policies_url(client, &[])?, RequestOpts::default().with_json(body))
        .await?
        .extract("firewall_policy")
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn update(
    client: &ServiceClient,
    id: &str,
    opts: &UpdateOpts,
) -> Result<Policy, OpenStackError> {
    let body = build_request_body(opts, "firewall_policy")?;
    client
        .put(
            policies_url(client, &[id])?,
            RequestOpts::default().with_json(body).with_ok_codes(&[200]),
        )
        .await?
        .extract("firewall_policy")
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn delete(client: &ServiceClient, id: &str) -> Result<(), OpenStackError> {
    client
        .delete(
            policies_url(client, &[id])?,
            RequestOpts::default().with_ok_codes(&[204]),
        )
        .await?;
    Ok(())
}

/// Rule actions answer with the policy, wrapped or not depending on the
/// release.
fn extract_policy(rsp: ApiResponse) -> Result<Policy, OpenStackError> {
    let mut body: Value = rsp.json()?;
    let policy = match body.get_mut("firewall_policy") {
        Some(inner) if inner.is_object() => inner.take(),
        _ => body,
    };
    Ok(serde_json::from_value(policy)?)
}

/// Insert a rule into the policy.
#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn insert_rule(
    client: &ServiceClient,
    id: &str,
    opts: &InsertRuleOpts,
) -> Result<Policy, OpenStackError> {
    if opts.insert_before.is_some() && opts.insert_after.is_some() {
        return Err(OpenStackError::invalid_input(
            "insert_after",
            "only one of insert_before and insert_after can be set",
        ));
    }
    let body = build_request_body(opts, "")?;
    extract_policy(
        client
            .put(
                policies_url(client, &[id, "insert_rule"])?,
                RequestOpts::default().with_json(body).with_ok_codes(&[200]),
            )
            .await?,
    )
}

/// Remove a rule from the policy.
#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn remove_rule(
    client: &ServiceClient,
    id: &str,
    rule_id: &str,
) -> Result<Policy, OpenStackError> {
    let body = build_request_body(
        &RemoveRuleOpts {
            id: rule_id.to_string(),
        },
        "",
    )?;
    extract_policy(
        client
            .put(
                policies_url(client, &[id, "remove_rule"])?,
                RequestOpts::default().with_json(body).with_ok_codes(&[200]),
            )
            .await?,
    )
}
