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
//! Pages linked by a `rel = "next"` entry of the collection links list.
use std::marker::PhantomData;
use url::Url;

use openstack_api_types::{Link, next_link_href};

use super::{Collection, Page, PageResult};
use crate::error::OpenStackError;

/// Page whose successor is announced in the `"<collection>_links"` list. A
/// `204 No Content` page is empty.
#[derive(Debug)]
pub struct LinkedPage<C> {
    result: PageResult,
    _collection: PhantomData<fn() -> C>,
}

impl<C: Collection> LinkedPage<C> {
    pub fn new(result: PageResult) -> Self {
        Self {
            result,
            _collection: PhantomData,
        }
    }

    /// Items of the page.
    pub fn items(&self) -> Result<Vec<C::Item>, OpenStackError> {
        self.result.extract_collection(C::KEY)
    }
}

impl<C: Collection> Page for LinkedPage<C> {
    fn result(&self) -> &PageResult {
        &self.result
    }

    fn is_empty(&self) -> Result<bool, OpenStackError> {
        Ok(self.result.status == reqwest::StatusCode::NO_CONTENT
            || self.result.collection(C::KEY).is_empty())
    }

    fn next_page_url(&self) -> Result<Option<Url>, OpenStackError> {
        let links: Vec<Link> = self
            .result
            .extract_key::<Option<Vec<Link>>>(&C::links_key())?
            .unwrap_or_default();
        next_link_href(&links)
            .map(|href| self.result.url.join(href).map_err(OpenStackError::from))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use reqwest::header::HeaderMap;
    use serde_json::{Value, json};

    use super::*;

    struct Servers;

    impl Collection for Servers {
        type Item = Value;
        const KEY: &'static str = "servers";
    }

    struct Introspections;

    impl Collection for Introspections {
        type Item = Value;
        const KEY: &'static str = "introspection";
        fn links_key() -> String {
            "links".into()
        }
    }

    fn result(status: StatusCode, body: Value) -> PageResult {
        PageResult {
            url: Url::parse("http://localhost/v2.1/servers").unwrap(),
            status,
            headers: HeaderMap::new(),
            body,
        }
    }

    #[test]
    fn test_next_page_url() {
        let page = LinkedPage::<Servers>::new(result(
            StatusCode::OK,
            json!({
                "servers": [{"id": 1}],
                "servers_links": [{"rel": "next", "href": "servers?marker=1"}]
            }),
        ));
        assert!(!page.is_empty().unwrap());
        assert_eq!(
            "http://localhost/v2.1/servers?marker=1",
            page.next_page_url().unwrap().unwrap().as_str()
        );

        let page = LinkedPage::<Servers>::new(result(StatusCode::OK, json!({"servers": [{"id": 1}]})));
        assert_eq!(None, page.next_page_url().unwrap());
    }

    #[test]
    fn test_custom_links_key() {
        let page = LinkedPage::<Introspections>::new(result(
            StatusCode::OK,
            json!({
                "introspection": [{"uuid": "a"}],
                "links": [{"rel": "next", "href": "http://localhost/v1/introspection?marker=a"}]
            }),
        ));
        assert_eq!(
            "http://localhost/v1/introspection?marker=a",
            page.next_page_url().unwrap().unwrap().as_str()
        );
    }

    #[test]
    fn test_no_content_is_empty() {
        let page = LinkedPage::<Servers>::new(result(StatusCode::NO_CONTENT, Value::Null));
        assert!(page.is_empty().unwrap());
        assert_eq!(None, page.next_page_url().unwrap());
    }
}
