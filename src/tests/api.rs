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
use httpmock::MockServer;
use secrecy::SecretString;
use std::collections::HashMap;
use url::Url;

use crate::client::{ProviderClient, ServiceClient};

/// Token every fake client authenticates with.
pub(crate) const TOKEN_ID: &str = "cbc36478b0bd8e67e89469c7749d4127";

/// Provider bound to the mock server with a fixed token.
pub(crate) fn get_provider(server: &MockServer) -> ProviderClient {
    let base = Url::parse(&server.base_url()).unwrap();
    ProviderClient::with_token(base, SecretString::from(TOKEN_ID), HashMap::new()).unwrap()
}

/// Service client whose endpoint is the root of the mock server.
pub(crate) fn get_service_client(server: &MockServer) -> ServiceClient {
    ServiceClient::new(
        get_provider(server),
        Url::parse(&server.base_url()).unwrap(),
        "",
    )
}

/// Service client of the given type rooted at `path` on the mock server.
pub(crate) fn get_typed_service_client(
    server: &MockServer,
    service_type: &str,
    path: &str,
) -> ServiceClient {
    ServiceClient::new(
        get_provider(server),
        Url::parse(&server.url(path)).unwrap(),
        service_type,
    )
}
