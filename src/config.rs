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
//! # Cloud configuration
//!
//! Connection settings are layered: built-in defaults, then an optional file
//! (the format follows the file extension), then the well known `OS_*`
//! environment variables (`OS_AUTH_URL`, `OS_USERNAME`, `OS_PASSWORD`,
//! `OS_PROJECT_NAME`, `OS_REGION_NAME`, ...).
use config::{Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use url::Url;

use crate::client::Interface;
use crate::error::OpenStackError;

/// Cloud connection configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Identity service url.
    pub auth_url: Option<Url>,

    /// User name for the password authentication.
    pub username: Option<String>,
    /// User ID for the password authentication.
    pub user_id: Option<String>,
    /// User password.
    pub password: Option<SecretString>,
    /// Name of the domain owning the user.
    pub user_domain_name: Option<String>,
    /// ID of the domain owning the user.
    pub user_domain_id: Option<String>,

    /// Project to scope the token to.
    pub project_name: Option<String>,
    pub project_id: Option<String>,
    pub project_domain_name: Option<String>,
    pub project_domain_id: Option<String>,

    /// Domain to scope the token to when no project is given.
    pub domain_name: Option<String>,
    pub domain_id: Option<String>,

    /// Pre-issued token. Takes precedence over the password.
    pub token: Option<SecretString>,

    /// Region for the endpoint lookup.
    pub region_name: Option<String>,

    /// Endpoint interface for the endpoint lookup.
    #[serde(default)]
    pub interface: Interface,

    /// Endpoint overrides keyed by the service type.
    #[serde(default)]
    pub endpoint_override: HashMap<String, Url>,

    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_user_agent() -> String {
    format!("openstack-client/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout() -> u64 {
    60
}

impl Config {
    /// Load the configuration file (when it exists) and apply the `OS_*`
    /// environment on top.
    pub fn new<P: AsRef<Path>>(path: Option<P>) -> Result<Self, OpenStackError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path
            && path.as_ref().is_file()
        {
            builder = builder.add_source(File::from(path.as_ref()));
        }
        builder = builder.add_source(
            Environment::with_prefix("OS")
                .prefix_separator("_")
                .ignore_empty(true),
        );

        builder.try_into()
    }

    /// Configuration from the `OS_*` environment only.
    pub fn from_env() -> Result<Self, OpenStackError> {
        Self::new(None::<&Path>)
    }
}

impl TryFrom<config::ConfigBuilder<config::builder::DefaultState>> for Config {
    type Error = OpenStackError;
    fn try_from(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, Self::Error> {
        let builder = builder
            .set_default("interface", "public")?
            .set_default("timeout", default_timeout())?
            .set_default("user_agent", default_user_agent())?;

        Ok(builder.build()?.try_deserialize()?)
    }
}
