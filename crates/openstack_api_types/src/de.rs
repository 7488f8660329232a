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
//! # Lenient decoding helpers
//!
//! Helpers for fields whose JSON type differs between services or releases.
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode an integer that may also be sent as a string. An empty string
/// (Nova sends `"swap": ""` for flavors without swap) decodes to 0.
pub fn int_or_empty<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0),
        Value::Number(num) => num
            .as_i64()
            .ok_or_else(|| de::Error::custom(format!("{num} is not an integer"))),
        Value::String(raw) if raw.trim().is_empty() => Ok(0),
        Value::String(raw) => raw.trim().parse().map_err(de::Error::custom),
        other => Err(de::Error::custom(format!(
            "expected an integer or a string, got {other}"
        ))),
    }
}

/// Decode an identifier sent either as a string or as a number.
pub fn string_or_int<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(raw) => Ok(raw),
        Value::Number(num) => Ok(num.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(de::Error::custom(format!(
            "expected a string or a number, got {other}"
        ))),
    }
}

/// Decode an object that older APIs serialize into a JSON string. `null` and
/// an empty string decode to the default value.
pub fn object_or_json_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(T::default()),
        Value::String(raw) if raw.trim().is_empty() => Ok(T::default()),
        Value::String(raw) => serde_json::from_str(&raw).map_err(de::Error::custom),
        other => serde_json::from_value(other).map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde::Deserialize;
    use std::collections::HashMap;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Sot {
        #[serde(default, deserialize_with = "int_or_empty")]
        swap: i64,
        #[serde(default, deserialize_with = "string_or_int")]
        id: String,
        #[serde(default, deserialize_with = "object_or_json_string")]
        info: HashMap<String, String>,
    }

    #[rstest]
    #[case(r#"{"swap": ""}"#, 0)]
    #[case(r#"{"swap": 1000}"#, 1000)]
    #[case(r#"{"swap": "512"}"#, 512)]
    #[case(r#"{"swap": null}"#, 0)]
    #[case(r#"{}"#, 0)]
    fn test_int_or_empty(#[case] raw: &str, #[case] expected: i64) {
        let sot: Sot = serde_json::from_str(raw).unwrap();
        assert_eq!(expected, sot.swap);
    }

    #[test]
    fn test_int_or_empty_rejects_bool() {
        assert!(serde_json::from_str::<Sot>(r#"{"swap": true}"#).is_err());
    }

    #[rstest]
    #[case(r#"{"id": 1}"#, "1")]
    #[case(r#"{"id": "c48f6247-abe4-4a24-824e-ea39e108874f"}"#, "c48f6247-abe4-4a24-824e-ea39e108874f")]
    fn test_string_or_int(#[case] raw: &str, #[case] expected: &str) {
        let sot: Sot = serde_json::from_str(raw).unwrap();
        assert_eq!(expected, sot.id);
    }

    #[test]
    fn test_object_or_json_string() {
        let sot: Sot = serde_json::from_str(r#"{"info": "{\"arch\": \"x86_64\"}"}"#).unwrap();
        assert_eq!(Some(&"x86_64".to_string()), sot.info.get("arch"));
        let sot: Sot = serde_json::from_str(r#"{"info": {"arch": "aarch64"}}"#).unwrap();
        assert_eq!(Some(&"aarch64".to_string()), sot.info.get("arch"));
        let sot: Sot = serde_json::from_str(r#"{"info": ""}"#).unwrap();
        assert!(sot.info.is_empty());
    }
}
