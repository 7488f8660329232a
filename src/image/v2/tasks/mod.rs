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
//! # Image tasks
//!
//! The listing reports the following page in a top level `next` field
//! holding a path that already contains the API version, so it is resolved
//! against the endpoint without its version.
use reqwest::StatusCode;
use url::Url;

use crate::client::{RequestOpts, ServiceClient, base_endpoint};
use crate::error::OpenStackError;
use crate::pagination::{Page, PageResult, Pager};
use crate::params::{build_request_body, with_query};

mod types;

pub use types::*;

fn tasks_url(client: &ServiceClient, parts: &[&str]) -> Result<Url, OpenStackError> {
    let mut all = vec!["tasks"];
    all.extend_from_slice(parts);
    client.service_url(&all)
}

/// Page of tasks.
#[derive(Debug)]
pub struct TaskPage {
    result: PageResult,
    service_url: Url,
}

impl TaskPage {
    pub fn items(&self) -> Result<Vec<Task>, OpenStackError> {
        self.result.extract_collection("tasks")
    }
}

/// Resolve `next` (path and query) against the endpoint root.
fn next_page_url(service_url: &Url, next: &str) -> Result<Url, OpenStackError> {
    let base = base_endpoint(service_url);
    let requested = base.join(next)?;
    let mut url = base.join(requested.path().trim_start_matches('/'))?;
    url.set_query(requested.query());
    Ok(url)
}

impl Page for TaskPage {
    fn result(&self) -> &PageResult {
        &self.result
    }

    fn is_empty(&self) -> Result<bool, OpenStackError> {
        Ok(self.result.status == StatusCode::NO_CONTENT
            || self.result.collection("tasks").is_empty())
    }

    fn next_page_url(&self) -> Result<Option<Url>, OpenStackError> {
        match self.result.extract_key::<Option<String>>("next")? {
            Some(next) if !next.is_empty() => Ok(Some(next_page_url(&self.service_url, &next)?)),
            _ => Ok(None),
        }
    }
}

/// List image tasks.
pub fn list(client: &ServiceClient, opts: Option<&ListOpts>) -> Result<Pager<TaskPage>, OpenStackError> {
    let url = with_query(tasks_url(client, &[])?, opts)?;
    let service_url = client.resource_base_url().clone();
    Ok(Pager::new(client, url, move |result| TaskPage {
        result,
        service_url: service_url.clone(),
    }))
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn get(client: &ServiceClient, id: &str) -> Result<Task, OpenStackError> {
    client
        .get(tasks_url(client, &[id])?, RequestOpts::default())
        .await?
        .json()
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn create(client: &ServiceClient, opts: &CreateOpts) -> Result<Task, OpenStackError> {
    let body = build_request_body(opts, "")?;
    client
        .post(
            tasks_url(client, &[])?,
            RequestOpts::default().with_json(body).with_ok_codes(&[201]),
        )
        .await?
        .json()
}

#[cfg(test)]
mod tests {
    use httpmock::MockServer;
    use serde_json::{Value, json};
    use tokio_util::sync::CancellationToken;
    use tracing_test::traced_test;

    use super::*;
    use crate::tests::api::get_typed_service_client;

    fn task_json(id: &str, status: &str) -> Value {
        json!({
            "id": id,
            "type": "import",
            "status": status,
            "owner": "424e7cf0243c468ca61732ba45973b3e",
            "message": "",
            "created_at": "2018-07-25T08:59:13Z",
            "updated_at": "2018-07-25T08:59:14Z",
            "expires_at": "2018-07-27T08:59:14Z",
            "self": format!("/v2/tasks/{id}"),
            "schema": "/v2/schemas/task",
            "input": {
                "image_properties": {"container_format": "bare", "disk_format": "raw"},
                "import_from_format": "raw",
                "import_from": "https://cloud-images.ubuntu.com/bionic/current/bionic-server-cloudimg-amd64.img"
            },
            "result": null
        })
    }

    #[test]
    fn test_next_page_url() {
        let service = Url::parse("http://glance:9292/v2/").unwrap();
        assert_eq!(
            "http://glance:9292/v2/tasks?limit=1&marker=abc",
            next_page_url(&service, "/v2/tasks?limit=1&marker=abc")
                .unwrap()
                .as_str()
        );
        let service = Url::parse("http://cloud/image/v2/").unwrap();
        assert_eq!(
            "http://cloud/image/v2/tasks?marker=abc",
            next_page_url(&service, "/v2/tasks?marker=abc").unwrap().as_str()
        );
    }

    #[tokio::test]
    #[traced_test]
    async fn test_list() {
        let server = MockServer::start_async().await;
        let first = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/v2/tasks")
                    .query_param("limit", "1")
                    .query_param_missing("marker");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "tasks": [task_json("1252f636-1246-4319-bfba-c47cde0efbe0", "pending")],
                        "next": "/v2/tasks?limit=1&marker=1252f636-1246-4319-bfba-c47cde0efbe0",
                        "first": "/v2/tasks?limit=1",
                        "schema": "/v2/schemas/tasks"
                    }));
            })
            .await;
        let second = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/v2/tasks")
                    .query_param("marker", "1252f636-1246-4319-bfba-c47cde0efbe0");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "tasks": [task_json("cb1a2b01-52b7-4b2d-a5a0-d09e6d2d1a51", "success")],
                        "first": "/v2/tasks?limit=1",
                        "schema": "/v2/schemas/tasks"
                    }));
            })
            .await;
        let client = get_typed_service_client(&server, "image", "/")
            .with_resource_base("v2/")
            .unwrap();
        let opts = ListOptsBuilder::default().limit(1u32).build().unwrap();
        let all = list(&client, Some(&opts))
            .unwrap()
            .all_pages(&CancellationToken::new())
            .await
            .unwrap();
        let tasks = all.items().unwrap();
        assert_eq!(2, tasks.len());
        assert_eq!(TaskStatus::Pending, tasks[0].status);
        assert_eq!(TaskStatus::Success, tasks[1].status);
        assert_eq!(None, tasks[0].result);
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    #[traced_test]
    async fn test_get_and_create() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/v2/tasks/1252f636-1246-4319-bfba-c47cde0efbe0");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(task_json("1252f636-1246-4319-bfba-c47cde0efbe0", "pending"));
            })
            .await;
        let create_mock = server
            .mock_async(|when, then| {
                when.method("POST").path("/v2/tasks").json_body(json!({
                    "type": "import",
                    "input": {"import_from": "https://cloud-images.ubuntu.com/bionic/current/bionic-server-cloudimg-amd64.img"}
                }));
                then.status(201)
                    .header("content-type", "application/json")
                    .json_body(task_json("d550c87d-86ed-430a-9895-c7a1f5ce87e9", "pending"));
            })
            .await;
        let client = get_typed_service_client(&server, "image", "/")
            .with_resource_base("v2/")
            .unwrap();
        let task = get(&client, "1252f636-1246-4319-bfba-c47cde0efbe0").await.unwrap();
        assert_eq!("import", task.task_type);
        assert_eq!("/v2/tasks/1252f636-1246-4319-bfba-c47cde0efbe0", task.self_link);

        let input = json!({"import_from": "https://cloud-images.ubuntu.com/bionic/current/bionic-server-cloudimg-amd64.img"});
        let opts = CreateOptsBuilder::default()
            .task_type("import")
            .input(input.as_object().unwrap().clone())
            .build()
            .unwrap();
        let task = create(&client, &opts).await.unwrap();
        assert_eq!("d550c87d-86ed-430a-9895-c7a1f5ce87e9", task.id);
        create_mock.assert_async().await;

        let err = create(&client, &CreateOpts::default()).await.unwrap_err();
        assert!(matches!(err, OpenStackError::Validation { .. }));
    }
}
