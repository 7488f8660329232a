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
//! # Error
//!
//! Errors that can occur while talking to an OpenStack API.
use reqwest::{Method, StatusCode};
use thiserror::Error;
use url::Url;

use openstack_api_types::error::BuilderError;

/// OpenStack client error.
#[derive(Debug, Error)]
pub enum OpenStackError {
    /// The server answered with a status code the operation does not accept.
    #[error(
        "expected HTTP response code {expected:?} when accessing [{method} {url}], but got {status} instead: {body}"
    )]
    UnexpectedResponseCode {
        /// Request method.
        method: Method,
        /// Request url.
        url: Url,
        /// Accepted status codes.
        expected: Vec<u16>,
        /// Actual status code.
        status: StatusCode,
        /// Response body.
        body: String,
    },

    /// Iteration was cancelled by the caller.
    #[error("operation cancelled")]
    Cancelled,

    /// A mandatory argument is missing.
    #[error("missing input for argument [{0}]")]
    MissingInput(String),

    /// An argument holds a value the API can not accept.
    #[error("invalid input provided for argument [{argument}]: {reason}")]
    InvalidInput {
        /// Argument name.
        argument: String,
        /// Why the value is rejected.
        reason: String,
    },

    /// No endpoint in the catalog (or in the overrides) matches.
    #[error("no suitable endpoint could be found for the {service_type} service")]
    EndpointNotFound {
        /// Service type that was looked up.
        service_type: String,
    },

    /// Authentication response has no token.
    #[error("missing x-subject-token header in the authentication response")]
    MissingSubjectToken,

    /// No credentials to authenticate with.
    #[error("either a token or a password must be configured for authentication")]
    MissingCredentials,

    /// Builder error.
    #[error(transparent)]
    Builder {
        /// The source of the error.
        #[from]
        source: BuilderError,
    },

    /// Configuration error.
    #[error("configuration error: {}", source)]
    Config {
        /// The source of the error.
        #[from]
        source: config::ConfigError,
    },

    /// HTTP client error.
    #[error(transparent)]
    Http {
        /// The source of the error.
        #[from]
        source: reqwest::Error,
    },

    /// Invalid header name.
    #[error(transparent)]
    InvalidHeaderName {
        /// The source of the error.
        #[from]
        source: reqwest::header::InvalidHeaderName,
    },

    /// Invalid header value.
    #[error(transparent)]
    InvalidHeaderValue {
        /// The source of the error.
        #[from]
        source: reqwest::header::InvalidHeaderValue,
    },

    /// A response header can not be interpreted.
    #[error("malformed response header {name}: {value}")]
    MalformedHeader {
        /// Header name.
        name: String,
        /// Raw header value.
        value: String,
    },

    /// Json serialization error.
    #[error("json serde error: {}", source)]
    Json {
        /// The source of the error.
        #[from]
        source: serde_json::Error,
    },

    /// Query string serialization error.
    #[error("query string error: {}", source)]
    QueryString {
        /// The source of the error.
        #[from]
        source: serde_urlencoded::ser::Error,
    },

    /// Url parsing error.
    #[error(transparent)]
    UrlParse {
        /// The source of the error.
        #[from]
        source: url::ParseError,
    },

    /// Request validation error.
    #[error("request validation failed: {source}")]
    Validation {
        /// The source of the error.
        #[from]
        source: validator::ValidationErrors,
    },
}

impl OpenStackError {
    /// Status code of the failed response, if the error comes from one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::UnexpectedResponseCode { status, .. } => Some(*status),
            Self::Http { source } => source.status(),
            _ => None,
        }
    }

    /// Whether the server reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    pub(crate) fn invalid_input<A: Into<String>, R: Into<String>>(argument: A, reason: R) -> Self {
        Self::InvalidInput {
            argument: argument.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_response_code() {
        let err = OpenStackError::UnexpectedResponseCode {
            method: Method::GET,
            url: Url::parse("http://localhost/flavors/1").unwrap(),
            expected: vec![200],
            status: StatusCode::NOT_FOUND,
            body: "flavor 1 could not be found".into(),
        };
        assert!(err.is_not_found());
        assert_eq!(Some(StatusCode::NOT_FOUND), err.status());
        assert_eq!(
            "expected HTTP response code [200] when accessing [GET http://localhost/flavors/1], but got 404 Not Found instead: flavor 1 could not be found",
            err.to_string()
        );
    }

    #[test]
    fn test_status_absent() {
        assert_eq!(None, OpenStackError::Cancelled.status());
        assert!(!OpenStackError::MissingInput("name".into()).is_not_found());
    }
}
