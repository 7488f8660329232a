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
//! # Raw API response
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::OpenStackError;

/// Name of the header carrying the request ID assigned by the service.
pub const REQUEST_ID_HEADER: &str = "x-openstack-request-id";

/// Finished HTTP exchange: status, headers and the body bytes.
#[derive(Clone, Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Deserialize the whole body.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, OpenStackError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Deserialize the value under the top level `key` of the body.
    pub fn extract<T: DeserializeOwned>(&self, key: &str) -> Result<T, OpenStackError> {
        let mut body: Value = self.json()?;
        let value = body
            .as_object_mut()
            .and_then(|obj| obj.remove(key))
            .unwrap_or(Value::Null);
        Ok(serde_json::from_value(value)?)
    }

    /// Body as text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Whether the response carries a JSON document.
    pub fn is_json(&self) -> bool {
        self.header("content-type")
            .is_some_and(|ct| ct.contains("json"))
    }

    /// Header value as a string, when present and printable.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|val| val.to_str().ok())
    }

    pub fn request_id(&self) -> Option<&str> {
        self.header(REQUEST_ID_HEADER)
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: String,
    }

    fn response(body: Value) -> ApiResponse {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("req-1"));
        ApiResponse {
            status: StatusCode::OK,
            headers,
            body: serde_json::to_vec(&body).unwrap(),
        }
    }

    #[test]
    fn test_extract() {
        let rsp = response(json!({"item": {"id": "1"}}));
        assert_eq!(Item { id: "1".into() }, rsp.extract("item").unwrap());
        assert_eq!(None, rsp.extract::<Option<Item>>("other").unwrap());
        assert!(rsp.extract::<Item>("other").is_err());
        assert!(rsp.is_json());
        assert_eq!(Some("req-1"), rsp.request_id());
    }
}
