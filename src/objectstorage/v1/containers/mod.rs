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
//! # Containers
//!
//! Container properties travel as HTTP headers. Names are single path
//! segments, a `/` is rejected before any request is sent.
use std::collections::HashMap;
use std::str::FromStr;

use url::Url;

use crate::client::{ApiResponse, RequestOpts, ServiceClient};
use crate::error::OpenStackError;
use crate::pagination::{Collection, MarkedCollection, MarkerPage, Pager, set_query_param};
use crate::params::with_query;

mod types;

pub use types::*;

const META_PREFIX: &str = "x-container-meta-";

fn check_name(name: &str) -> Result<(), OpenStackError> {
    if name.is_empty() {
        return Err(OpenStackError::MissingInput("container name".into()));
    }
    if name.contains('/') {
        return Err(OpenStackError::invalid_input(
            "container name",
            format!("{name} must not contain `/`"),
        ));
    }
    Ok(())
}

fn container_url(client: &ServiceClient, name: &str) -> Result<Url, OpenStackError> {
    check_name(name)?;
    client.service_url(&[name])
}

/// Account listing: a top level array of containers.
pub struct Containers;

impl Collection for Containers {
    type Item = Container;
    const KEY: &'static str = "";
}

impl MarkedCollection for Containers {
    fn marker(item: &Container) -> String {
        item.name.clone()
    }
}

pub type ContainerPage = MarkerPage<Containers>;

pub fn list(client: &ServiceClient, opts: Option<&ListOpts>) -> Result<Pager<ContainerPage>, OpenStackError> {
    let url = set_query_param(&client.service_url(&[])?, "format", "json");
    let url = with_query(url, opts)?;
    Ok(Pager::new(client, url, ContainerPage::new))
}

fn bool_header(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

fn with_headers<'a, I>(mut opts: RequestOpts, headers: I) -> Result<RequestOpts, OpenStackError>
where
    I: IntoIterator<Item = (String, &'a str)>,
{
    for (name, value) in headers {
        opts = opts.with_header(&name, value)?;
    }
    Ok(opts)
}

fn create_headers(opts: &CreateOpts) -> Vec<(String, &str)> {
    let mut headers: Vec<(String, &str)> = opts
        .metadata
        .iter()
        .map(|(key, val)| (format!("{META_PREFIX}{key}"), val.as_str()))
        .collect();
    let optional = [
        ("x-container-read", opts.container_read.as_deref()),
        ("x-container-write", opts.container_write.as_deref()),
        ("x-container-sync-to", opts.container_sync_to.as_deref()),
        ("x-container-sync-key", opts.container_sync_key.as_deref()),
        ("x-versions-location", opts.versions_location.as_deref()),
        ("x-history-location", opts.history_location.as_deref()),
        ("x-storage-policy", opts.storage_policy.as_deref()),
        ("content-type", opts.content_type.as_deref()),
        ("x-versions-enabled", opts.versions_enabled.map(bool_header)),
        ("x-detect-content-type", opts.detect_content_type.map(bool_header)),
    ];
    headers.extend(
        optional
            .into_iter()
            .filter_map(|(name, val)| val.map(|val| (name.to_string(), val))),
    );
    headers
}

fn update_headers(opts: &UpdateOpts) -> Vec<(String, &str)> {
    let mut headers: Vec<(String, &str)> = opts
        .metadata
        .iter()
        .map(|(key, val)| (format!("{META_PREFIX}{key}"), val.as_str()))
        .collect();
    headers.extend(
        opts.remove_metadata
            .iter()
            .map(|key| (format!("x-remove-container-meta-{key}"), "x")),
    );
    let optional = [
        ("x-container-read", opts.container_read.as_deref()),
        ("x-container-write", opts.container_write.as_deref()),
        ("x-container-sync-to", opts.container_sync_to.as_deref()),
        ("x-container-sync-key", opts.container_sync_key.as_deref()),
        ("x-versions-location", opts.versions_location.as_deref()),
        ("x-history-location", opts.history_location.as_deref()),
        ("content-type", opts.content_type.as_deref()),
        ("x-versions-enabled", opts.versions_enabled.map(bool_header)),
        ("x-detect-content-type", opts.detect_content_type.map(bool_header)),
        ("x-remove-container-read", opts.remove_container_read.then_some("x")),
        ("x-remove-container-write", opts.remove_container_write.then_some("x")),
        ("x-remove-versions-location", opts.remove_versions_location.then_some("x")),
        ("x-remove-history-location", opts.remove_history_location.then_some("x")),
    ];
    headers.extend(
        optional
            .into_iter()
            .filter_map(|(name, val)| val.map(|val| (name.to_string(), val))),
    );
    headers
}

/// Create the container, or update the given properties if it exists.
#[tracing::instrument(level = "debug", skip(client, opts), err(Debug))]
pub async fn create(client: &ServiceClient, name: &str, opts: Option<&CreateOpts>) -> Result<(), OpenStackError> {
    let url = container_url(client, name)?;
    let mut request = RequestOpts::default().with_ok_codes(&[201, 202, 204]);
    if let Some(opts) = opts {
        request = with_headers(request, create_headers(opts))?;
    }
    client.put(url, request).await?;
    Ok(())
}

/// Delete an empty container.
#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn delete(client: &ServiceClient, name: &str) -> Result<(), OpenStackError> {
    client
        .delete(container_url(client, name)?, RequestOpts::default().with_ok_codes(&[204]))
        .await?;
    Ok(())
}

#[tracing::instrument(level = "debug", skip(client, opts), err(Debug))]
pub async fn update(client: &ServiceClient, name: &str, opts: &UpdateOpts) -> Result<(), OpenStackError> {
    let url = container_url(client, name)?;
    let request = with_headers(
        RequestOpts::default().with_ok_codes(&[201, 202, 204]),
        update_headers(opts),
    )?;
    client.post(url, request).await?;
    Ok(())
}

fn parsed_header<T: FromStr>(rsp: &ApiResponse, name: &str) -> Result<Option<T>, OpenStackError> {
    rsp.header(name)
        .map(|raw| {
            raw.trim().parse().map_err(|_| OpenStackError::MalformedHeader {
                name: name.into(),
                value: raw.into(),
            })
        })
        .transpose()
}

fn acl_header(rsp: &ApiResponse, name: &str) -> Vec<String> {
    rsp.header(name)
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

impl ContainerInfo {
    /// Interpret the headers of a container `HEAD` response.
    pub fn from_response(rsp: &ApiResponse) -> Result<Self, OpenStackError> {
        let metadata: HashMap<String, String> = rsp
            .headers
            .iter()
            .filter_map(|(name, val)| {
                let key = name.as_str().strip_prefix(META_PREFIX)?;
                Some((key.to_string(), val.to_str().ok()?.to_string()))
            })
            .collect();
        Ok(Self {
            bytes_used: parsed_header(rsp, "x-container-bytes-used")?.unwrap_or_default(),
            object_count: parsed_header(rsp, "x-container-object-count")?.unwrap_or_default(),
            read: acl_header(rsp, "x-container-read"),
            write: acl_header(rsp, "x-container-write"),
            storage_policy: rsp.header("x-storage-policy").map(String::from),
            versions_location: rsp.header("x-versions-location").map(String::from),
            history_location: rsp.header("x-history-location").map(String::from),
            versions_enabled: rsp
                .header("x-versions-enabled")
                .is_some_and(|val| val.trim().eq_ignore_ascii_case("true")),
            content_type: rsp.header("content-type").map(String::from),
            timestamp: parsed_header(rsp, "x-timestamp")?,
            trans_id: rsp.header("x-trans-id").map(String::from),
            metadata,
        })
    }
}

/// Container properties and metadata.
#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn get(
    client: &ServiceClient,
    name: &str,
    opts: Option<&GetOpts>,
) -> Result<ContainerInfo, OpenStackError> {
    let mut request = RequestOpts::default().with_ok_codes(&[200, 204]);
    if opts.is_some_and(|opts| opts.newest) {
        request = request.with_header("x-newest", "true")?;
    }
    let rsp = client.head(container_url(client, name)?, request).await?;
    ContainerInfo::from_response(&rsp)
}

/// Delete several empty containers with one request of the bulk middleware.
/// The body lists one escaped container name per line.
#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn bulk_delete<S: AsRef<str> + std::fmt::Debug>(
    client: &ServiceClient,
    names: &[S],
) -> Result<BulkDeleteResponse, OpenStackError> {
    if names.is_empty() {
        return Err(OpenStackError::MissingInput("container names".into()));
    }
    let mut lines = Vec::with_capacity(names.len());
    for name in names {
        let url = container_url(client, name.as_ref())?;
        if let Some(escaped) = url.path_segments().and_then(|mut segments| segments.next_back()) {
            lines.push(escaped.to_string());
        }
    }
    let url = set_query_param(&client.service_url(&[])?, "bulk-delete", "true");
    client
        .post(
            url,
            RequestOpts::default()
                .with_raw("text/plain", lines.join("\n").into_bytes())
                .with_ok_codes(&[200]),
        )
        .await?
        .json()
}
