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
//! # Request marshaling
//!
//! Option structs are plain serde structures: unset values are `None` and
//! skipped, key names come from `#[serde(rename)]`. Query options go through
//! `serde_urlencoded`, bodies through `serde_json` after `validator` checks
//! the required fields.
use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;
use validator::Validate;

use crate::error::OpenStackError;

/// Format the option struct as a query string: `""` when nothing is set,
/// `"?key=value&..."` otherwise.
pub fn build_query_string<T: Serialize + ?Sized>(opts: &T) -> Result<String, OpenStackError> {
    let query = serde_urlencoded::to_string(opts)?;
    Ok(if query.is_empty() {
        String::new()
    } else {
        format!("?{query}")
    })
}

/// Append the query options to the url. Parameters already present on the
/// url are kept.
pub fn with_query<T: Serialize + ?Sized>(
    mut url: Url,
    opts: Option<&T>,
) -> Result<Url, OpenStackError> {
    if let Some(opts) = opts {
        let query = serde_urlencoded::to_string(opts)?;
        if !query.is_empty() {
            let merged = match url.query() {
                Some(existing) if !existing.is_empty() => format!("{existing}&{query}"),
                _ => query,
            };
            url.set_query(Some(&merged));
        }
    }
    Ok(url)
}

/// Validate the option struct and turn it into a JSON request body, nested
/// under `parent` unless it is empty.
pub fn build_request_body<T: Serialize + Validate>(
    opts: &T,
    parent: &str,
) -> Result<Value, OpenStackError> {
    opts.validate()?;
    let body = serde_json::to_value(opts)?;
    Ok(if parent.is_empty() {
        body
    } else {
        Value::Object(Map::from_iter([(parent.to_string(), body)]))
    })
}

/// Serialize an optional list as a single comma separated value, the way
/// Neutron and Mistral expect list filters.
pub mod csv {
    use serde::Serializer;

    pub fn serialize<S>(value: &Option<Vec<String>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(items) => serializer.serialize_str(&items.join(",")),
            None => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Default, Serialize, Validate)]
    struct ListOpts {
        #[serde(skip_serializing_if = "Option::is_none")]
        limit: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        marker: Option<String>,
        #[serde(rename = "changes-since", skip_serializing_if = "Option::is_none")]
        changes_since: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none", with = "csv")]
        tags: Option<Vec<String>>,
    }

    #[derive(Serialize, Validate)]
    struct CreateOpts {
        #[validate(length(min = 1))]
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    }

    #[test]
    fn test_build_query_string() {
        assert_eq!("", build_query_string(&ListOpts::default()).unwrap());
        assert_eq!(
            "?limit=2&changes-since=2024-01-01&tags=a%2Cb",
            build_query_string(&ListOpts {
                limit: Some(2),
                changes_since: Some("2024-01-01".into()),
                tags: Some(vec!["a".into(), "b".into()]),
                ..Default::default()
            })
            .unwrap()
        );
    }

    #[test]
    fn test_with_query() {
        let url = Url::parse("http://localhost/v2/snapshots/detail?all_tenants=1").unwrap();
        let opts = ListOpts {
            marker: Some("m".into()),
            ..Default::default()
        };
        assert_eq!(
            "http://localhost/v2/snapshots/detail?all_tenants=1&marker=m",
            with_query(url.clone(), Some(&opts)).unwrap().as_str()
        );
        assert_eq!(url, with_query(url.clone(), None::<&ListOpts>).unwrap());
        assert_eq!(
            url,
            with_query(url.clone(), Some(&ListOpts::default())).unwrap()
        );
    }

    #[test]
    fn test_build_request_body() {
        let opts = CreateOpts {
            name: "sg".into(),
            description: None,
        };
        assert_eq!(
            json!({"security_group": {"name": "sg"}}),
            build_request_body(&opts, "security_group").unwrap()
        );
        assert_eq!(json!({"name": "sg"}), build_request_body(&opts, "").unwrap());
    }

    #[test]
    fn test_build_request_body_required() {
        let opts = CreateOpts {
            name: String::new(),
            description: Some("foo".into()),
        };
        match build_request_body(&opts, "security_group") {
            Err(OpenStackError::Validation { .. }) => {}
            other => panic!("unexpected result {other:?}"),
        }
    }
}
