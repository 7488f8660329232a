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
//! # Request options
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

use crate::error::OpenStackError;

/// Request body.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    /// JSON document.
    Json(Value),
    /// Opaque payload with its content type.
    Raw {
        /// Content type of the payload.
        content_type: String,
        /// Payload.
        data: Vec<u8>,
    },
}

/// Per-request options.
#[derive(Clone, Debug, Default)]
pub struct RequestOpts {
    /// Request body.
    pub body: Option<RequestBody>,
    /// Accepted status codes. Defaults depend on the method.
    pub ok_codes: Option<Vec<u16>>,
    /// Additional headers, set after the default ones.
    pub more_headers: HeaderMap,
}

impl RequestOpts {
    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn with_raw<C: Into<String>>(mut self, content_type: C, data: Vec<u8>) -> Self {
        self.body = Some(RequestBody::Raw {
            content_type: content_type.into(),
            data,
        });
        self
    }

    pub fn with_ok_codes(mut self, codes: &[u16]) -> Self {
        self.ok_codes = Some(codes.to_vec());
        self
    }

    /// Add a header. Invalid names or values are rejected.
    pub fn with_header<V: AsRef<str>>(mut self, name: &str, value: V) -> Result<Self, OpenStackError> {
        self.more_headers.insert(
            HeaderName::from_bytes(name.as_bytes())?,
            HeaderValue::from_str(value.as_ref())?,
        );
        Ok(self)
    }

    /// Status codes accepted for the method unless overridden.
    pub fn effective_ok_codes(&self, method: &Method) -> Vec<u16> {
        self.ok_codes
            .clone()
            .unwrap_or_else(|| default_ok_codes(method).to_vec())
    }
}

/// Status codes the OpenStack APIs answer with on success, per method.
pub fn default_ok_codes(method: &Method) -> &'static [u16] {
    match *method {
        Method::GET => &[200],
        Method::POST => &[201, 202],
        Method::PUT => &[201, 202],
        Method::PATCH => &[200, 202, 204],
        Method::DELETE => &[202, 204],
        Method::HEAD => &[204],
        _ => &[200],
    }
}
