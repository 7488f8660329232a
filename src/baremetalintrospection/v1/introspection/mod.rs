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
//! # Introspections
//!
//! Hardware introspection of bare metal nodes.
use url::Url;

use crate::client::{RequestOpts, ServiceClient};
use crate::error::OpenStackError;
use crate::pagination::{Collection, LinkedPage, Pager};
use crate::params::with_query;

mod types;

pub use types::*;

fn introspection_url(client: &ServiceClient, parts: &[&str]) -> Result<Url, OpenStackError> {
    let mut all = vec!["introspection"];
    all.extend_from_slice(parts);
    client.service_url(&all)
}

/// `introspection` collection. The next page link lives in the top level `links`.
pub struct Introspections;

impl Collection for Introspections {
    type Item = Introspection;
    const KEY: &'static str = "introspection";

    fn links_key() -> String {
        "links".into()
    }
}

pub type IntrospectionPage = LinkedPage<Introspections>;

pub fn list_introspections(
    client: &ServiceClient,
    opts: Option<&ListIntrospectionsOpts>,
) -> Result<Pager<IntrospectionPage>, OpenStackError> {
    let url = with_query(introspection_url(client, &[])?, opts)?;
    Ok(Pager::new(client, url, IntrospectionPage::new))
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn get_introspection_status(
    client: &ServiceClient,
    node_id: &str,
) -> Result<Introspection, OpenStackError> {
    client
        .get(
            introspection_url(client, &[node_id])?,
            RequestOpts::default().with_ok_codes(&[200]),
        )
        .await?
        .json()
}

/// Start the introspection of a node. Power management must be configured beforehand.
#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn start_introspection(
    client: &ServiceClient,
    node_id: &str,
    opts: Option<&StartOpts>,
) -> Result<(), OpenStackError> {
    let url = with_query(introspection_url(client, &[node_id])?, opts)?;
    client
        .post(url, RequestOpts::default().with_ok_codes(&[202]))
        .await?;
    Ok(())
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn abort_introspection(client: &ServiceClient, node_id: &str) -> Result<(), OpenStackError> {
    client
        .post(
            introspection_url(client, &[node_id, "abort"])?,
            RequestOpts::default().with_ok_codes(&[202]),
        )
        .await?;
    Ok(())
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn get_introspection_data(client: &ServiceClient, node_id: &str) -> Result<Data, OpenStackError> {
    client
        .get(
            introspection_url(client, &[node_id, "data"])?,
            RequestOpts::default().with_ok_codes(&[200]),
        )
        .await?
        .json()
}

/// Rerun the processing of the stored unprocessed data. No body is sent.
#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn reapply_introspection(client: &ServiceClient, node_id: &str) -> Result<(), OpenStackError> {
    client
        .post(
            introspection_url(client, &[node_id, "data", "unprocessed"])?,
            RequestOpts::default().with_ok_codes(&[202]),
        )
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use httpmock::MockServer;
    use serde_json::{Value, json};
    use tokio_util::sync::CancellationToken;
    use tracing_test::traced_test;

    use super::*;
    use crate::tests::api::get_typed_service_client;

    const NODE_ID: &str = "05ccda19-581b-49bf-8f5a-6ded99701d87";

    fn client(server: &MockServer) -> ServiceClient {
        get_typed_service_client(server, "baremetal-introspection", "/")
            .with_resource_base("v1/")
            .unwrap()
    }

    fn introspection_json(server: &MockServer, uuid: &str, finished: bool) -> Value {
        let finished_at = if finished {
            json!("2017-08-17T11:36:16")
        } else {
            Value::Null
        };
        let state = if finished { "finished" } else { "waiting" };
        json!({
            "error": null,
            "finished": finished,
            "finished_at": finished_at,
            "links": [{"href": server.url(format!("/v1/introspection/{uuid}")), "rel": "self"}],
            "started_at": "2017-08-17T11:33:43",
            "state": state,
            "uuid": uuid
        })
    }

    #[tokio::test]
    #[traced_test]
    async fn test_list_introspections() {
        let server = MockServer::start_async().await;
        let first = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/v1/introspection")
                    .query_param("limit", "1")
                    .query_param_missing("marker");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "introspection": [introspection_json(&server, NODE_ID, true)],
                        "links": [{"rel": "next", "href": server.url(format!("/v1/introspection?limit=1&marker={NODE_ID}"))}]
                    }));
            })
            .await;
        let second = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/v1/introspection")
                    .query_param("marker", NODE_ID);
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "introspection": [introspection_json(&server, "c244557e-899f-46fa-a1ff-5b2c6718616b", false)]
                    }));
            })
            .await;
        let client = client(&server);
        let opts = ListIntrospectionsOptsBuilder::default().limit(1u32).build().unwrap();
        let all = list_introspections(&client, Some(&opts))
            .unwrap()
            .all_pages(&CancellationToken::new())
            .await
            .unwrap();
        let items = all.items().unwrap();
        assert_eq!(2, items.len());
        assert!(items[0].finished);
        assert_eq!(
            Some(Utc.with_ymd_and_hms(2017, 8, 17, 11, 36, 16).unwrap()),
            items[0].finished_at
        );
        assert_eq!("waiting", items[1].state);
        assert_eq!(None, items[1].finished_at);
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    #[traced_test]
    async fn test_get_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path(format!("/v1/introspection/{NODE_ID}"));
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(introspection_json(&server, NODE_ID, true));
            })
            .await;
        let client = client(&server);
        let status = get_introspection_status(&client, NODE_ID).await.unwrap();
        assert_eq!(NODE_ID, status.uuid);
        assert_eq!("finished", status.state);
        assert_eq!(None, status.error);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_start_abort_reapply() {
        let server = MockServer::start_async().await;
        let start = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path(format!("/v1/introspection/{NODE_ID}"))
                    .query_param("manage_boot", "false")
                    .header("x-openstack-ironic-inspector-api-version", "1.12");
                then.status(202);
            })
            .await;
        let abort = server
            .mock_async(|when, then| {
                when.method("POST").path(format!("/v1/introspection/{NODE_ID}/abort"));
                then.status(202);
            })
            .await;
        let reapply = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path(format!("/v1/introspection/{NODE_ID}/data/unprocessed"));
                then.status(202);
            })
            .await;
        let client = client(&server).with_microversion("1.12");
        let opts = StartOptsBuilder::default().manage_boot(false).build().unwrap();
        start_introspection(&client, NODE_ID, Some(&opts)).await.unwrap();
        abort_introspection(&client, NODE_ID).await.unwrap();
        reapply_introspection(&client, NODE_ID).await.unwrap();
        start.assert_async().await;
        abort.assert_async().await;
        reapply.assert_async().await;
    }

    #[tokio::test]
    #[traced_test]
    async fn test_get_data() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path(format!("/v1/introspection/{NODE_ID}/data"));
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "all_interfaces": {
                            "eth0": {"ip": "172.24.42.100", "mac": "52:54:00:4e:3d:30", "pxe": true}
                        },
                        "boot_interface": "52:54:00:4e:3d:30",
                        "cpu_arch": "x86_64",
                        "cpus": 2,
                        "error": null,
                        "interfaces": {
                            "eth0": {"ip": "172.24.42.100", "mac": "52:54:00:4e:3d:30", "pxe": true}
                        },
                        "inventory": {"cpu": {"architecture": "x86_64", "count": 2}},
                        "ipmi_address": "192.167.2.134",
                        "local_gb": 12,
                        "macs": ["52:54:00:4e:3d:30"],
                        "memory_mb": 2048,
                        "root_disk": {"name": "/dev/vda", "rotational": true, "size": 13958643712u64},
                        "uuid": NODE_ID
                    }));
            })
            .await;
        let client = client(&server);
        let data = get_introspection_data(&client, NODE_ID).await.unwrap();
        assert_eq!(Some("x86_64".to_string()), data.cpu_arch);
        assert_eq!(2048, data.memory_mb);
        assert!(data.interfaces["eth0"].pxe);
        assert_eq!("/dev/vda", data.root_disk.unwrap().name);
        assert_eq!(vec!["52:54:00:4e:3d:30"], data.macs);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_start_conflict() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("POST").path(format!("/v1/introspection/{NODE_ID}"));
                then.status(409)
                    .header("content-type", "application/json")
                    .json_body(json!({"error": {"message": "Node is locked"}}));
            })
            .await;
        let client = client(&server);
        let err = start_introspection(&client, NODE_ID, None).await.unwrap_err();
        assert_eq!(Some(reqwest::StatusCode::CONFLICT), err.status());
    }
}
