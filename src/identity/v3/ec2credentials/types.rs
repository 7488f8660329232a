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
//! EC2 credential types.
use derive_builder::Builder;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use openstack_api_types::error::BuilderError;

/// EC2 credential of a user.
#[derive(Clone, Debug, Deserialize)]
pub struct Credential {
    /// ID of the user owning the credential.
    pub user_id: String,

    /// Project the credential is scoped to.
    pub tenant_id: String,

    /// Access key.
    pub access: String,

    /// Secret key.
    pub secret: SecretString,

    /// Trust the credential was created for.
    #[serde(default)]
    pub trust_id: Option<String>,

    /// Links of the credential.
    #[serde(default)]
    pub links: Option<Value>,
}

/// EC2 credential creation data.
#[derive(Builder, Clone, Debug, Default, Serialize, Validate)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct CreateOpts {
    /// Project the credential is scoped to.
    #[validate(length(min = 1, max = 64))]
    pub tenant_id: String,

    /// Trust to bind the credential to.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trust_id: Option<String>,
}
