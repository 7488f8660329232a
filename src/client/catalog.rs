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
//! # Service catalog
//!
//! Endpoint discovery from the catalog that Keystone returns together with a
//! token.
use serde::{Deserialize, Serialize};

/// Endpoint interface.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Interface {
    /// Public.
    #[default]
    Public,
    /// Internal.
    Internal,
    /// Admin.
    Admin,
}

impl std::fmt::Display for Interface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Public => "public",
            Self::Internal => "internal",
            Self::Admin => "admin",
        })
    }
}

/// A catalog object.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Catalog(pub Vec<CatalogService>);

/// Single service in the catalog.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct CatalogService {
    /// Service ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Service name.
    #[serde(default)]
    pub name: Option<String>,
    /// Service type.
    pub r#type: String,
    /// Service endpoints.
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

/// Catalog endpoint.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Endpoint {
    /// Endpoint ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Endpoint interface.
    pub interface: Interface,
    /// Region name.
    #[serde(default)]
    pub region: Option<String>,
    /// Region ID.
    #[serde(default)]
    pub region_id: Option<String>,
    /// Endpoint url.
    pub url: String,
}

/// Criteria to pick one endpoint out of the catalog.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EndpointOpts {
    /// Service type (`compute`, `network`, ...).
    pub service_type: String,
    /// Service name, when several services share a type.
    pub name: Option<String>,
    /// Region name or ID.
    pub region: Option<String>,
    /// Endpoint interface.
    pub interface: Interface,
}

impl EndpointOpts {
    pub fn new<S: Into<String>>(service_type: S) -> Self {
        Self {
            service_type: service_type.into(),
            ..Default::default()
        }
    }

    pub fn with_region<S: Into<String>>(mut self, region: Option<S>) -> Self {
        self.region = region.map(Into::into);
        self
    }

    pub fn with_interface(mut self, interface: Interface) -> Self {
        self.interface = interface;
        self
    }
}

impl Catalog {
    /// Find the first endpoint matching the criteria.
    pub fn find_endpoint(&self, opts: &EndpointOpts) -> Option<&Endpoint> {
        self.0
            .iter()
            .filter(|svc| svc.r#type == opts.service_type)
            .filter(|svc| {
                opts.name
                    .as_ref()
                    .is_none_or(|name| svc.name.as_ref() == Some(name))
            })
            .flat_map(|svc| svc.endpoints.iter())
            .filter(|ep| ep.interface == opts.interface)
            .find(|ep| {
                opts.region.as_ref().is_none_or(|region| {
                    ep.region.as_ref() == Some(region) || ep.region_id.as_ref() == Some(region)
                })
            })
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
