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
//! # Identity v3 authentication
//!
//! Token issuance against `POST /v3/auth/tokens` with the password or the
//! token method. The token comes back in the `X-Subject-Token` header, the
//! service catalog in the body.
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;
use url::Url;

use openstack_api_types::error::BuilderError;

use crate::client::catalog::Catalog;
use crate::config::Config;
use crate::error::OpenStackError;

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

/// Authentication request.
#[derive(Clone, Debug, Serialize)]
pub struct AuthRequest {
    pub auth: AuthRequestInner,
}

/// Authentication request content.
#[derive(Builder, Clone, Debug, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct AuthRequestInner {
    /// Identity to authenticate.
    pub identity: Identity,
    /// Requested token scope.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
}

/// Identity with the authentication methods.
#[derive(Builder, Clone, Debug, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct Identity {
    /// Authentication methods.
    pub methods: Vec<String>,
    /// Password method data.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<PasswordAuth>,
    /// Token method data.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenAuth>,
}

/// Password method data.
#[derive(Builder, Clone, Debug, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct PasswordAuth {
    pub user: UserPassword,
}

/// User identified by ID or by name and domain.
#[derive(Builder, Clone, Debug, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct UserPassword {
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
}

/// Token method data.
#[derive(Clone, Debug, Serialize)]
pub struct TokenAuth {
    #[serde(serialize_with = "expose")]
    pub id: SecretString,
}

/// Domain reference.
#[derive(Builder, Clone, Debug, Default, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct Domain {
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Domain {
    fn from_parts(id: Option<&String>, name: Option<&String>) -> Option<Self> {
        match (id, name) {
            (None, None) => None,
            (id, name) => Some(Self {
                id: id.cloned(),
                name: name.cloned(),
            }),
        }
    }
}

/// Project reference.
#[derive(Builder, Clone, Debug, Default, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct ScopeProject {
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
}

/// Token scope.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Project(ScopeProject),
    Domain(Domain),
}

/// Token response body.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
    pub token: Token,
}

/// Issued token information.
#[derive(Clone, Debug, Deserialize)]
pub struct Token {
    /// Token expiration.
    #[serde(with = "openstack_api_types::time::flexible")]
    pub expires_at: DateTime<Utc>,
    /// Authentication methods used.
    #[serde(default)]
    pub methods: Vec<String>,
    /// Service catalog.
    #[serde(default)]
    pub catalog: Option<Catalog>,
}

impl AuthRequest {
    /// Prepare the authentication request out of the configuration. A token
    /// takes precedence over the password.
    pub fn from_config(config: &Config) -> Result<Self, OpenStackError> {
        let user_domain =
            Domain::from_parts(config.user_domain_id.as_ref(), config.user_domain_name.as_ref());

        let identity = if let Some(token) = &config.token {
            IdentityBuilder::default()
                .methods(vec!["token".into()])
                .token(TokenAuth { id: token.clone() })
                .build()?
        } else if let Some(password) = &config.password {
            if config.user_id.is_none() && config.username.is_none() {
                return Err(OpenStackError::MissingInput("username".into()));
            }
            let mut user = UserPasswordBuilder::default();
            user.password(password.clone());
            if let Some(user_id) = &config.user_id {
                user.id(user_id);
            } else if let Some(name) = &config.username {
                user.name(name);
                if let Some(domain) = &user_domain {
                    user.domain(domain.clone());
                }
            }
            IdentityBuilder::default()
                .methods(vec!["password".into()])
                .password(PasswordAuthBuilder::default().user(user.build()?).build()?)
                .build()?
        } else {
            return Err(OpenStackError::MissingCredentials);
        };

        let scope = if let Some(project_id) = &config.project_id {
            Some(Scope::Project(
                ScopeProjectBuilder::default().id(project_id).build()?,
            ))
        } else if let Some(project_name) = &config.project_name {
            let domain = Domain::from_parts(
                config.project_domain_id.as_ref(),
                config.project_domain_name.as_ref(),
            )
            .or(user_domain);
            let mut project = ScopeProjectBuilder::default();
            project.name(project_name);
            if let Some(domain) = domain {
                project.domain(domain);
            }
            Some(Scope::Project(project.build()?))
        } else {
            Domain::from_parts(config.domain_id.as_ref(), config.domain_name.as_ref())
                .map(Scope::Domain)
        };

        let mut inner = AuthRequestInnerBuilder::default();
        inner.identity(identity);
        if let Some(scope) = scope {
            inner.scope(scope);
        }
        Ok(Self {
            auth: inner.build()?,
        })
    }

    /// Whether the request can be replayed to get a fresh token.
    pub fn is_renewable(&self) -> bool {
        self.auth.identity.password.is_some()
    }
}

/// Identity v3 root for the configured `auth_url`, with a trailing slash.
pub fn identity_v3_url(auth_url: &Url) -> Result<Url, OpenStackError> {
    let mut raw = auth_url.as_str().trim_end_matches('/').to_string();
    if !raw.ends_with("/v3") {
        raw.push_str("/v3");
    }
    raw.push('/');
    Ok(Url::parse(&raw)?)
}

/// Issue a new token.
#[tracing::instrument(name = "identity.issue_token", level = "debug", skip_all, err(Debug))]
pub async fn issue_token(
    http: &Client,
    identity_url: &Url,
    request: &AuthRequest,
) -> Result<(SecretString, Token), OpenStackError> {
    let url = identity_url.join("auth/tokens")?;
    let rsp = http.post(url.clone()).json(request).send().await?;

    let status = rsp.status();
    if status != StatusCode::CREATED && status != StatusCode::OK {
        return Err(OpenStackError::UnexpectedResponseCode {
            method: reqwest::Method::POST,
            url,
            expected: vec![200, 201],
            status,
            body: rsp.text().await.unwrap_or_default(),
        });
    }

    let token = rsp
        .headers()
        .get("X-Subject-Token")
        .ok_or(OpenStackError::MissingSubjectToken)?
        .to_str()
        .map_err(|_| OpenStackError::MissingSubjectToken)?
        .to_string();
    let body: TokenResponse = rsp.json().await?;
    debug!(
        "issued token valid till {} with methods {:?}",
        body.token.expires_at, body.token.methods
    );
    Ok((SecretString::from(token), body.token))
}
