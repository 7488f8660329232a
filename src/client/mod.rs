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
//! # Service clients
//!
//! [`ProviderClient`] owns the HTTP client, the token and the service
//! catalog. [`ServiceClient`] binds a provider to the endpoint of one
//! service and performs the requests of the resource modules.
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::{Client, Method, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, trace};
use url::Url;

pub mod auth;
pub mod catalog;
pub mod request;
pub mod response;

pub use catalog::{Catalog, EndpointOpts, Interface};
pub use request::{RequestBody, RequestOpts};
pub use response::ApiResponse;

use crate::client::auth::{AuthRequest, identity_v3_url, issue_token};
use crate::config::Config;
use crate::error::OpenStackError;

/// Header carrying the token.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Shared connection state: HTTP client, token, catalog.
#[derive(Clone, Debug)]
pub struct ProviderClient {
    inner: Arc<ProviderState>,
}

#[derive(Debug)]
struct ProviderState {
    http: Client,
    identity_url: Url,
    user_agent: String,
    region: Option<String>,
    interface: Interface,
    endpoint_overrides: HashMap<String, Url>,
    auth_request: Option<AuthRequest>,
    token: RwLock<Option<SecretString>>,
    catalog: RwLock<Catalog>,
}

impl ProviderClient {
    /// Prepare the provider out of the configuration without authenticating.
    pub fn new(config: &Config) -> Result<Self, OpenStackError> {
        let auth_url = config
            .auth_url
            .as_ref()
            .ok_or_else(|| OpenStackError::MissingInput("auth_url".into()))?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .tcp_keepalive(Duration::from_secs(60))
            .gzip(true)
            .deflate(true)
            .build()?;
        let auth_request = AuthRequest::from_config(config)?;
        Ok(Self {
            inner: Arc::new(ProviderState {
                http,
                identity_url: identity_v3_url(auth_url)?,
                user_agent: config.user_agent.clone(),
                region: config.region_name.clone(),
                interface: config.interface,
                endpoint_overrides: config.endpoint_override.clone(),
                auth_request: Some(auth_request),
                token: RwLock::new(None),
                catalog: RwLock::new(Catalog::default()),
            }),
        })
    }

    /// Prepare the provider and authenticate it.
    pub async fn from_config(config: &Config) -> Result<Self, OpenStackError> {
        let provider = Self::new(config)?;
        provider.authenticate().await?;
        Ok(provider)
    }

    /// Provider using a pre-issued token and explicit endpoints. There is no
    /// catalog, so every service needs an entry in `endpoints`.
    pub fn with_token(
        identity_url: Url,
        token: SecretString,
        endpoints: HashMap<String, Url>,
    ) -> Result<Self, OpenStackError> {
        Ok(Self {
            inner: Arc::new(ProviderState {
                http: Client::builder().build()?,
                identity_url: identity_v3_url(&identity_url)?,
                user_agent: format!("openstack-client/{}", env!("CARGO_PKG_VERSION")),
                region: None,
                interface: Interface::Public,
                endpoint_overrides: endpoints,
                auth_request: None,
                token: RwLock::new(Some(token)),
                catalog: RwLock::new(Catalog::default()),
            }),
        })
    }

    /// Issue a token with the stored credentials and refresh the catalog.
    #[tracing::instrument(name = "provider.authenticate", level = "debug", skip(self), err(Debug))]
    pub async fn authenticate(&self) -> Result<(), OpenStackError> {
        let request = self
            .inner
            .auth_request
            .as_ref()
            .ok_or(OpenStackError::MissingCredentials)?;
        let (token, info) = issue_token(&self.inner.http, &self.inner.identity_url, request).await?;
        *self.inner.token.write().await = Some(token);
        if let Some(catalog) = info.catalog {
            *self.inner.catalog.write().await = catalog;
        }
        Ok(())
    }

    /// Whether a rejected token can be replaced by authenticating again.
    pub fn can_reauthenticate(&self) -> bool {
        self.inner
            .auth_request
            .as_ref()
            .is_some_and(AuthRequest::is_renewable)
    }

    pub async fn token(&self) -> Option<SecretString> {
        self.inner.token.read().await.clone()
    }

    pub fn http(&self) -> &Client {
        &self.inner.http
    }

    pub fn identity_url(&self) -> &Url {
        &self.inner.identity_url
    }

    /// Resolve the endpoint: the override for the service type first, the
    /// catalog otherwise. Region and interface default to the configured
    /// ones.
    pub async fn endpoint_for(&self, opts: &EndpointOpts) -> Result<Url, OpenStackError> {
        if let Some(url) = self.inner.endpoint_overrides.get(&opts.service_type) {
            return Ok(url.clone());
        }
        let mut opts = opts.clone();
        if opts.region.is_none() {
            opts.region = self.inner.region.clone();
        }
        let catalog = self.inner.catalog.read().await;
        let endpoint = catalog
            .find_endpoint(&opts)
            .ok_or_else(|| OpenStackError::EndpointNotFound {
                service_type: opts.service_type.clone(),
            })?;
        Ok(Url::parse(&endpoint.url)?)
    }

    async fn service_client(
        &self,
        service_type: &str,
        resource_base: Option<&str>,
    ) -> Result<ServiceClient, OpenStackError> {
        let opts = EndpointOpts::new(service_type).with_interface(self.inner.interface);
        let endpoint = self.endpoint_for(&opts).await?;
        let client = ServiceClient::new(self.clone(), endpoint, service_type);
        match resource_base {
            Some(suffix) => client.with_resource_base(suffix),
            None => Ok(client),
        }
    }

    /// Compute v2 client.
    pub async fn compute_v2(&self) -> Result<ServiceClient, OpenStackError> {
        self.service_client("compute", None).await
    }

    /// Identity v3 client.
    pub async fn identity_v3(&self) -> Result<ServiceClient, OpenStackError> {
        Ok(ServiceClient::new(
            self.clone(),
            self.inner.identity_url.clone(),
            "identity",
        ))
    }

    /// Image v2 client.
    pub async fn image_v2(&self) -> Result<ServiceClient, OpenStackError> {
        self.service_client("image", Some("v2/")).await
    }

    /// Networking v2 client.
    pub async fn network_v2(&self) -> Result<ServiceClient, OpenStackError> {
        self.service_client("network", Some("v2.0/")).await
    }

    /// Load balancer v2 client.
    pub async fn load_balancer_v2(&self) -> Result<ServiceClient, OpenStackError> {
        self.service_client("load-balancer", Some("v2/")).await
    }

    /// Shared file systems v2 client.
    pub async fn shared_file_system_v2(&self) -> Result<ServiceClient, OpenStackError> {
        self.service_client("sharev2", None).await
    }

    /// Object storage v1 client.
    pub async fn object_storage_v1(&self) -> Result<ServiceClient, OpenStackError> {
        self.service_client("object-store", None).await
    }

    /// Bare metal introspection v1 client.
    pub async fn baremetal_introspection_v1(&self) -> Result<ServiceClient, OpenStackError> {
        self.service_client("baremetal-introspection", Some("v1/"))
            .await
    }

    /// Workflow v2 client.
    pub async fn workflow_v2(&self) -> Result<ServiceClient, OpenStackError> {
        self.service_client("workflowv2", None).await
    }
}

/// Strip the API version (`v2`, `v2.1`, ...) and everything after it from
/// the url path.
pub fn base_endpoint(url: &Url) -> Url {
    let mut base = url.clone();
    let segments: Vec<String> = url
        .path_segments()
        .map(|segments| {
            segments
                .take_while(|segment| !is_version(segment))
                .filter(|segment| !segment.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();
    base.set_query(None);
    base.set_fragment(None);
    base.set_path(&format!("{}/", segments.join("/")));
    base
}

fn is_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .and_then(|rest| rest.split('.').next())
        .is_some_and(|major| !major.is_empty() && major.chars().all(|c| c.is_ascii_digit()))
}

/// Client for one service endpoint.
#[derive(Clone, Debug)]
pub struct ServiceClient {
    provider: ProviderClient,
    endpoint: Url,
    resource_base: Option<Url>,
    service_type: String,
    microversion: Option<String>,
    more_headers: HeaderMap,
}

/// Make sure the url ends with `/` so joining keeps the last segment.
fn normalize(url: Url) -> Result<Url, OpenStackError> {
    if url.path().ends_with('/') {
        Ok(url)
    } else {
        Ok(Url::parse(&format!("{}/", url.as_str().trim_end_matches('/')))?)
    }
}

impl ServiceClient {
    pub fn new<S: Into<String>>(provider: ProviderClient, endpoint: Url, service_type: S) -> Self {
        let endpoint = normalize(endpoint.clone()).unwrap_or(endpoint);
        Self {
            provider,
            endpoint,
            resource_base: None,
            service_type: service_type.into(),
            microversion: None,
            more_headers: HeaderMap::new(),
        }
    }

    /// Resources live under `suffix` relative to the endpoint (for example
    /// `v2.0/` for networking).
    pub fn with_resource_base(mut self, suffix: &str) -> Result<Self, OpenStackError> {
        let last_segment = self
            .endpoint
            .path_segments()
            .and_then(|mut segments| segments.rfind(|segment| !segment.is_empty()));
        if last_segment == Some(suffix.trim_matches('/')) {
            return Ok(self);
        }
        self.resource_base = Some(normalize(self.endpoint.join(suffix)?)?);
        Ok(self)
    }

    /// Request the given API microversion.
    pub fn with_microversion<S: Into<String>>(mut self, microversion: S) -> Self {
        self.microversion = Some(microversion.into());
        self
    }

    /// Header sent with every request of this client.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.more_headers.insert(name, value);
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn resource_base_url(&self) -> &Url {
        self.resource_base.as_ref().unwrap_or(&self.endpoint)
    }

    pub fn service_type(&self) -> &str {
        &self.service_type
    }

    pub fn microversion(&self) -> Option<&str> {
        self.microversion.as_deref()
    }

    pub fn provider(&self) -> &ProviderClient {
        &self.provider
    }

    /// Url of a resource: the resource base followed by `parts`, each part
    /// being one escaped path segment.
    pub fn service_url(&self, parts: &[&str]) -> Result<Url, OpenStackError> {
        let mut url = self.resource_base_url().clone();
        url.path_segments_mut()
            .map_err(|_| OpenStackError::invalid_input("endpoint", "url can not be a base"))?
            .pop_if_empty()
            .extend(parts);
        Ok(url)
    }

    fn microversion_headers(&self, headers: &mut HeaderMap) -> Result<(), OpenStackError> {
        let Some(microversion) = &self.microversion else {
            return Ok(());
        };
        let service_header = match self.service_type.as_str() {
            "compute" => Some("x-openstack-nova-api-version"),
            "sharev2" => Some("x-openstack-manila-api-version"),
            "volume" => Some("x-openstack-volume-api-version"),
            "baremetal" => Some("x-openstack-ironic-api-version"),
            "baremetal-introspection" => Some("x-openstack-ironic-inspector-api-version"),
            _ => None,
        };
        if let Some(name) = service_header {
            headers.insert(
                HeaderName::from_static(name),
                HeaderValue::from_str(microversion)?,
            );
        }
        if !self.service_type.is_empty() {
            headers.insert(
                HeaderName::from_static("openstack-api-version"),
                HeaderValue::from_str(&format!("{} {}", self.service_type, microversion))?,
            );
        }
        Ok(())
    }

    async fn send(
        &self,
        method: &Method,
        url: &Url,
        opts: &RequestOpts,
    ) -> Result<Response, OpenStackError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_str(&self.provider.inner.user_agent)?);
        if let Some(token) = self.provider.token().await {
            let mut value = HeaderValue::from_str(token.expose_secret())?;
            value.set_sensitive(true);
            headers.insert(HeaderName::from_static(AUTH_TOKEN_HEADER), value);
        }
        self.microversion_headers(&mut headers)?;
        headers.extend(self.more_headers.clone());

        let mut builder = self.provider.http().request(method.clone(), url.clone());
        match &opts.body {
            Some(RequestBody::Json(body)) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                builder = builder.body(serde_json::to_vec(body)?);
            }
            Some(RequestBody::Raw { content_type, data }) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type)?);
                builder = builder.body(data.clone());
            }
            None => {}
        }
        headers.extend(opts.more_headers.clone());

        Ok(builder.headers(headers).send().await?)
    }

    /// Perform the request and check the status code. A 401 is answered by
    /// authenticating again and repeating the request once.
    #[tracing::instrument(
        name = "client.request",
        level = "debug",
        skip_all,
        fields(%method, %url, status = tracing::field::Empty),
        err(Debug)
    )]
    pub async fn request(
        &self,
        method: Method,
        url: Url,
        opts: RequestOpts,
    ) -> Result<ApiResponse, OpenStackError> {
        let ok_codes = opts.effective_ok_codes(&method);
        let mut response = self.send(&method, &url, &opts).await?;
        if response.status() == StatusCode::UNAUTHORIZED
            && !ok_codes.contains(&StatusCode::UNAUTHORIZED.as_u16())
            && self.provider.can_reauthenticate()
        {
            debug!("token rejected, authenticating again");
            self.provider.authenticate().await?;
            response = self.send(&method, &url, &opts).await?;
        }

        let status = response.status();
        tracing::Span::current().record("status", status.as_u16());
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        let rsp = ApiResponse {
            status,
            headers,
            body,
        };
        debug!(
            "{method} {url} answered {status} (request id {:?})",
            rsp.request_id()
        );
        trace!("response body: {}", rsp.text());

        if !ok_codes.contains(&status.as_u16()) {
            return Err(OpenStackError::UnexpectedResponseCode {
                method,
                url,
                expected: ok_codes,
                status,
                body: rsp.text(),
            });
        }
        Ok(rsp)
    }

    pub async fn get(&self, url: Url, opts: RequestOpts) -> Result<ApiResponse, OpenStackError> {
        self.request(Method::GET, url, opts).await
    }

    pub async fn post(&self, url: Url, opts: RequestOpts) -> Result<ApiResponse, OpenStackError> {
        self.request(Method::POST, url, opts).await
    }

    pub async fn put(&self, url: Url, opts: RequestOpts) -> Result<ApiResponse, OpenStackError> {
        self.request(Method::PUT, url, opts).await
    }

    pub async fn patch(&self, url: Url, opts: RequestOpts) -> Result<ApiResponse, OpenStackError> {
        self.request(Method::PATCH, url, opts).await
    }

    pub async fn delete(&self, url: Url, opts: RequestOpts) -> Result<ApiResponse, OpenStackError> {
        self.request(Method::DELETE, url, opts).await
    }

    pub async fn head(&self, url: Url, opts: RequestOpts) -> Result<ApiResponse, OpenStackError> {
        self.request(Method::HEAD, url, opts).await
    }
}
