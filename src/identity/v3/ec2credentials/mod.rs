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
//! # EC2 credentials
//!
//! `users/{user_id}/credentials/OS-EC2` of the Identity v3 API.
use url::Url;

use crate::client::{RequestOpts, ServiceClient};
use crate::error::OpenStackError;
use crate::pagination::{Collection, Pager, SinglePage};
use crate::params::build_request_body;

mod types;

pub use types::*;

fn list_url(client: &ServiceClient, user_id: &str) -> Result<Url, OpenStackError> {
    client.service_url(&["users", user_id, "credentials", "OS-EC2"])
}

fn resource_url(client: &ServiceClient, user_id: &str, id: &str) -> Result<Url, OpenStackError> {
    client.service_url(&["users", user_id, "credentials", "OS-EC2", id])
}

/// `credentials` collection.
pub struct Credentials;

impl Collection for Credentials {
    type Item = Credential;
    const KEY: &'static str = "credentials";
}

/// All EC2 credentials of a user arrive in one response.
pub type CredentialPage = SinglePage<Credentials>;

/// List the EC2 credentials of the user.
pub fn list(client: &ServiceClient, user_id: &str) -> Result<Pager<CredentialPage>, OpenStackError> {
    Ok(Pager::new(
        client,
        list_url(client, user_id)?,
        CredentialPage::new,
    ))
}

/// Get the EC2 credential by its access key.
#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn get(
    client: &ServiceClient,
    user_id: &str,
    id: &str,
) -> Result<Credential, OpenStackError> {
    client
        .get(resource_url(client, user_id, id)?, RequestOpts::default())
        .await?
        .extract("credential")
}

/// Create an EC2 credential for the user.
#[tracing::instrument(level = "debug", skip(client, opts), err(Debug))]
pub async fn create(
    client: &ServiceClient,
    user_id: &str,
    opts: &CreateOpts,
) -> Result<Credential, OpenStackError> {
    let body = build_request_body(opts, "")?;
    client
        .post(
            list_url(client, user_id)?,
            RequestOpts::default().with_json(body).with_ok_codes(&[201]),
        )
        .await?
        .extract("credential")
}

/// Delete the EC2 credential.
#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn delete(client: &ServiceClient, user_id: &str, id: &str) -> Result<(), OpenStackError> {
    client
        .delete(
            resource_url(client, user_id, id)?,
            RequestOpts::default().with_ok_codes(&[204]),
        )
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use httpmock::MockServer;
    use secrecy::ExposeSecret;
    use serde_json::json;
    use tokio_util::sync::CancellationToken;
    use tracing_test::traced_test;

    use super::*;
    use crate::pagination::Page;
    use crate::tests::api::{TOKEN_ID, get_service_client};

    const USER_ID: &str = "2844b2a08be147a08ef58317d6471f1f";

    fn credential_json() -> serde_json::Value {
        json!({
            "user_id": USER_ID,
            "links": {
                "self": "http://identity:5000/v3/users/2844b2a08be147a08ef58317d6471f1f/credentials/OS-EC2/f741662395b249c9b8acdebf1722c5ae"
            },
            "tenant_id": "6238dee2fec940a6bf31e49e9faf995a",
            "access": "f741662395b249c9b8acdebf1722c5ae",
            "secret": "6a61eb0296034c89b49cc51dad3d6a06",
            "trust_id": null
        })
    }

    #[tokio::test]
    #[traced_test]
    async fn test_list() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path(format!("/users/{USER_ID}/credentials/OS-EC2"))
                    .header("x-auth-token", TOKEN_ID);
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"credentials": [credential_json()]}));
            })
            .await;
        let client = get_service_client(&server);
        let page = list(&client, USER_ID)
            .unwrap()
            .all_pages(&CancellationToken::new())
            .await
            .unwrap();
        let credentials = page.items().unwrap();
        assert_eq!(1, credentials.len());
        assert_eq!("f741662395b249c9b8acdebf1722c5ae", credentials[0].access);
        assert_eq!(
            "6a61eb0296034c89b49cc51dad3d6a06",
            credentials[0].secret.expose_secret()
        );
        assert!(page.next_page_url().unwrap().is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    #[traced_test]
    async fn test_create() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path(format!("/users/{USER_ID}/credentials/OS-EC2"))
                    .json_body(json!({"tenant_id": "6238dee2fec940a6bf31e49e9faf995a"}));
                then.status(201)
                    .header("content-type", "application/json")
                    .json_body(json!({"credential": credential_json()}));
            })
            .await;
        let client = get_service_client(&server);
        let opts = CreateOptsBuilder::default()
            .tenant_id("6238dee2fec940a6bf31e49e9faf995a")
            .build()
            .unwrap();
        let credential = create(&client, USER_ID, &opts).await.unwrap();
        assert_eq!("6238dee2fec940a6bf31e49e9faf995a", credential.tenant_id);
        assert_eq!(None, credential.trust_id);
        mock.assert_async().await;
    }

    #[tokio::test]
    #[traced_test]
    async fn test_create_requires_tenant() {
        let server = MockServer::start_async().await;
        let client = get_service_client(&server);
        assert!(CreateOptsBuilder::default().build().is_err());
        let err = create(&client, USER_ID, &CreateOpts::default())
            .await
            .unwrap_err();
        assert!(matches!(err, OpenStackError::Validation { .. }));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_get_and_delete() {
        let server = MockServer::start_async().await;
        let path = format!("/users/{USER_ID}/credentials/OS-EC2/f741662395b249c9b8acdebf1722c5ae");
        let get_mock = server
            .mock_async(|when, then| {
                when.method("GET").path(path.clone());
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"credential": credential_json()}));
            })
            .await;
        let delete_mock = server
            .mock_async(|when, then| {
                when.method("DELETE").path(path.clone());
                then.status(204);
            })
            .await;
        let client = get_service_client(&server);
        let credential = get(&client, USER_ID, "f741662395b249c9b8acdebf1722c5ae")
            .await
            .unwrap();
        assert_eq!(USER_ID, credential.user_id);
        delete(&client, USER_ID, "f741662395b249c9b8acdebf1722c5ae")
            .await
            .unwrap();
        get_mock.assert_async().await;
        delete_mock.assert_async().await;
    }
}
