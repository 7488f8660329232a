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

//! # OpenStack API types
//!
//! This crate defines reusable wire types that the OpenStack REST API
//! bindings share across services.

use serde::{Deserialize, Serialize};
use validator::Validate;

pub mod de;
pub mod error;
pub mod time;

/// Link object.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize, Validate)]
pub struct Link {
    /// Link rel attribute.
    #[validate(length(max = 16))]
    pub rel: String,
    /// link href attribute.
    #[validate(url)]
    pub href: String,
}

/// Find the href of the `rel = "next"` entry in a collection links list.
///
/// An empty href is treated the same as an absent link.
pub fn next_link_href(links: &[Link]) -> Option<&str> {
    links
        .iter()
        .find(|link| link.rel == "next")
        .map(|link| link.href.as_str())
        .filter(|href| !href.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(rel: &str, href: &str) -> Link {
        Link {
            rel: rel.into(),
            href: href.into(),
        }
    }

    #[test]
    fn test_next_link_href() {
        let links = vec![
            link("self", "http://localhost/v2/flavors"),
            link("next", "http://localhost/v2/flavors?marker=2"),
        ];
        assert_eq!(
            Some("http://localhost/v2/flavors?marker=2"),
            next_link_href(&links)
        );
    }

    #[test]
    fn test_next_link_href_missing() {
        assert_eq!(None, next_link_href(&[link("self", "http://localhost")]));
        assert_eq!(None, next_link_href(&[link("next", "")]));
        assert_eq!(None, next_link_href(&[]));
    }
}
