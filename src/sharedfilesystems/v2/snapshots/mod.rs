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
//! # Share snapshots
//!
//! The listing pages with `limit` and `offset`: each following page moves
//! the offset by the limit until a page comes back empty.
use serde_json::json;
use url::Url;

use crate::client::{RequestOpts, ServiceClient};
use crate::error::OpenStackError;
use crate::pagination::{Page, PageResult, Pager, set_query_param};
use crate::params::{build_request_body, with_query};

mod types;

pub use types::*;

fn snapshots_url(client: &ServiceClient, parts: &[&str]) -> Result<Url, OpenStackError> {
    let mut all = vec!["snapshots"];
    all.extend_from_slice(parts);
    client.service_url(&all)
}

/// Page of snapshots addressed by `limit` and `offset`.
#[derive(Debug)]
pub struct SnapshotPage {
    result: PageResult,
}

impl SnapshotPage {
    pub fn new(result: PageResult) -> Self {
        Self { result }
    }

    pub fn items(&self) -> Result<Vec<Snapshot>, OpenStackError> {
        self.result.extract_collection("snapshots")
    }

    /// Offset of the following page, `None` when the listing is not limited.
    fn next_offset(&self) -> Result<Option<u64>, OpenStackError> {
        let Some(limit) = self.result.query_param("limit") else {
            return Ok(None);
        };
        let limit: u64 = limit
            .parse()
            .map_err(|_| OpenStackError::invalid_input("limit", "not an integer"))?;
        let offset: u64 = match self.result.query_param("offset") {
            Some(offset) => offset
                .parse()
                .map_err(|_| OpenStackError::invalid_input("offset", "not an integer"))?,
            None => 0,
        };
        offset
            .checked_add(limit)
            .map(Some)
            .ok_or_else(|| OpenStackError::invalid_input("offset", "offset plus limit overflows"))
    }
}

impl Page for SnapshotPage {
    fn result(&self) -> &PageResult {
        &self.result
    }

    fn is_empty(&self) -> Result<bool, OpenStackError> {
        Ok(self.result.collection("snapshots").is_empty())
    }

    fn next_page_url(&self) -> Result<Option<Url>, OpenStackError> {
        if self.is_empty()? {
            return Ok(None);
        }
        Ok(self
            .next_offset()?
            .map(|offset| set_query_param(&self.result.url, "offset", &offset.to_string())))
    }
}

/// Take a snapshot of a share.
#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn create(client: &ServiceClient, opts: &CreateOpts) -> Result<Snapshot, OpenStackError> {
    let body = build_request_body(opts, "snapshot")?;
    client
        .post(
            snapshots_url(client, &[])?,
            RequestOpts::default().with_json(body).with_ok_codes(&[202]),
        )
        .await?
        .extract("snapshot")
}

/// List snapshots with their details.
pub fn list_detail(
    client: &ServiceClient,
    opts: Option<&ListOpts>,
) -> Result<Pager<SnapshotPage>, OpenStackError> {
    let url = with_query(snapshots_url(client, &["detail"])?, opts)?;
    Ok(Pager::new(client, url, SnapshotPage::new))
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn get(client: &ServiceClient, id: &str) -> Result<Snapshot, OpenStackError> {
    client
        .get(snapshots_url(client, &[id])?, RequestOpts::default())
        .await?
        .extract("snapshot")
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn update(
    client: &ServiceClient,
    id: &str,
    opts: &UpdateOpts,
) -> Result<Snapshot, OpenStackError> {
    let body = build_request_body(opts, "snapshot")?;
    client
        .put(
            snapshots_url(client, &[id])?,
            RequestOpts::default().with_json(body).with_ok_codes(&[200]),
        )
        .await?
        .extract("snapshot")
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn delete(client: &ServiceClient, id: &str) -> Result<(), OpenStackError> {
    client
        .delete(
            snapshots_url(client, &[id])?,
            RequestOpts::default().with_ok_codes(&[202]),
        )
        .await?;
    Ok(())
}

/// Set the snapshot status in the database (admin only).
#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn reset_status(
    client: &ServiceClient,
    id: &str,
    opts: &ResetStatusOpts,
) -> Result<(), OpenStackError> {
    let body = build_request_body(opts, "reset_status")?;
    client
        .post(
            snapshots_url(client, &[id, "action"])?,
            RequestOpts::default().with_json(body).with_ok_codes(&[202]),
        )
        .await?;
    Ok(())
}

/// Delete the snapshot whatever its status (admin only).
#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn force_delete(client: &ServiceClient, id: &str) -> Result<(), OpenStackError> {
    client
        .post(
            snapshots_url(client, &[id, "action"])?,
            RequestOpts::default()
                .with_json(json!({"force_delete": null}))
                .with_ok_codes(&[202]),
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

    const SNAPSHOT_ID: &str = "bc082e99-3bdb-4400-b95e-b85c7a41622c";

    fn snapshot_json(id: &str) -> Value {
        json!({
            "id": id,
            "share_id": "19865c43-3b91-48c9-85a0-7ac4d6bb0efe",
            "share_proto": "NFS",
            "share_size": 1,
            "size": 1,
            "status": "available",
            "name": "new_app_snapshot",
            "description": null,
            "project_id": "16e1ab15c35a457e9c2b2aa189f544e1",
            "created_at": "2019-01-06T11:11:02.000000",
            "links": []
        })
    }

    #[test]
    fn test_next_offset_overflow() {
        let page = SnapshotPage::new(PageResult {
            url: Url::parse(&format!(
                "http://manila/v2/snapshots/detail?limit=10&offset={}",
                u64::MAX - 5
            ))
            .unwrap(),
            status: reqwest::StatusCode::OK,
            headers: reqwest::header::HeaderMap::new(),
            body: json!({"snapshots": [snapshot_json(SNAPSHOT_ID)]}),
        });
        assert!(matches!(
            page.next_page_url(),
            Err(OpenStackError::InvalidInput { .. })
        ));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_create() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/snapshots")
                    .header("x-openstack-manila-api-version", "2.7")
                    .json_body(json!({"snapshot": {
                        "share_id": "19865c43-3b91-48c9-85a0-7ac4d6bb0efe",
                        "name": "new_app_snapshot"
                    }}));
                then.status(202)
                    .header("content-type", "application/json")
                    .json_body(json!({"snapshot": snapshot_json(SNAPSHOT_ID)}));
            })
            .await;
        let client = get_typed_service_client(&server, "sharev2", "/").with_microversion("2.7");
        let opts = CreateOptsBuilder::default()
            .share_id("19865c43-3b91-48c9-85a0-7ac4d6bb0efe")
            .name("new_app_snapshot")
            .build()
            .unwrap();
        let snapshot = create(&client, &opts).await.unwrap();
        assert_eq!(SNAPSHOT_ID, snapshot.id);
        assert_eq!(
            Some(Utc.with_ymd_and_hms(2019, 1, 6, 11, 11, 2).unwrap()),
            snapshot.created_at
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    #[traced_test]
    async fn test_list_detail_offset_paging() {
        let server = MockServer::start_async().await;
        let first = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/snapshots/detail")
                    .query_param("limit", "2")
                    .query_param_missing("offset");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"snapshots": [snapshot_json("1"), snapshot_json("2")]}));
            })
            .await;
        let second = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/snapshots/detail")
                    .query_param("limit", "2")
                    .query_param("offset", "2");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"snapshots": [snapshot_json("3")]}));
            })
            .await;
        let third = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/snapshots/detail")
                    .query_param("limit", "2")
                    .query_param("offset", "4");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"snapshots": []}));
            })
            .await;
        let client = get_typed_service_client(&server, "sharev2", "/");
        let opts = ListOptsBuilder::default().limit(2u32).build().unwrap();
        let all = list_detail(&client, Some(&opts))
            .unwrap()
            .all_pages(&CancellationToken::new())
            .await
            .unwrap();
        let ids: Vec<String> = all.items().unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(vec!["1", "2", "3"], ids);
        first.assert_async().await;
        second.assert_async().await;
        third.assert_async().await;
    }

    #[tokio::test]
    #[traced_test]
    async fn test_list_detail_without_limit() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/snapshots/detail");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"snapshots": [snapshot_json("1")]}));
            })
            .await;
        let client = get_typed_service_client(&server, "sharev2", "/");
        let all = list_detail(&client, None)
            .unwrap()
            .all_pages(&CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(1, all.items().unwrap().len());
        mock.assert_calls_async(1).await;
    }

    #[tokio::test]
    #[traced_test]
    async fn test_get_update_delete() {
        let server = MockServer::start_async().await;
        let path = format!("/snapshots/{SNAPSHOT_ID}");
        server
            .mock_async(|when, then| {
                when.method("GET").path(path.clone());
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"snapshot": snapshot_json(SNAPSHOT_ID)}));
            })
            .await;
        let update_mock = server
            .mock_async(|when, then| {
                when.method("PUT")
                    .path(path.clone())
                    .json_body(json!({"snapshot": {"display_name": "my_new_test_snapshot"}}));
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"snapshot": snapshot_json(SNAPSHOT_ID)}));
            })
            .await;
        let delete_mock = server
            .mock_async(|when, then| {
                when.method("DELETE").path(path.clone());
                then.status(202);
            })
            .await;
        let client = get_typed_service_client(&server, "sharev2", "/");
        let snapshot = get(&client, SNAPSHOT_ID).await.unwrap();
        assert_eq!("NFS", snapshot.share_proto);
        let opts = UpdateOptsBuilder::default()
            .display_name("my_new_test_snapshot")
            .build()
            .unwrap();
        update(&client, SNAPSHOT_ID, &opts).await.unwrap();
        delete(&client, SNAPSHOT_ID).await.unwrap();
        update_mock.assert_async().await;
        delete_mock.assert_async().await;
    }

    #[tokio::test]
    #[traced_test]
    async fn test_actions() {
        let server = MockServer::start_async().await;
        let path = format!("/snapshots/{SNAPSHOT_ID}/action");
        let reset = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path(path.clone())
                    .json_body(json!({"reset_status": {"status": "error"}}));
                then.status(202);
            })
            .await;
        let force = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path(path.clone())
                    .json_body(json!({"force_delete": null}));
                then.status(202);
            })
            .await;
        let client = get_typed_service_client(&server, "sharev2", "/");
        reset_status(&client, SNAPSHOT_ID, &ResetStatusOpts::new("error"))
            .await
            .unwrap();
        force_delete(&client, SNAPSHOT_ID).await.unwrap();
        reset.assert_async().await;
        force.assert_async().await;
    }
}
