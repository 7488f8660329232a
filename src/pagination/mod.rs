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
//! # Pagination
//!
//! OpenStack collections come in three flavors: everything in a single
//! response, a `"<collection>_links"` list pointing at the next page, or a
//! `marker` query parameter set to the identifier of the last item seen.
//! Each flavor is a [`Page`] implementation; the [`Pager`] drives any of them
//! with the same loop.
//!
//! Pages are fetched one at a time. A [`CancellationToken`] is checked before
//! every fetch and raced against the request in flight.
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};
use url::Url;

use crate::client::{ApiResponse, RequestOpts, ServiceClient};
use crate::error::OpenStackError;

mod linked;
mod marker;
mod single;

pub use linked::LinkedPage;
pub use marker::{MarkedCollection, MarkerPage};
pub use single::SinglePage;

/// Status codes a page fetch accepts.
pub const PAGE_OK_CODES: &[u16] = &[200, 204, 300];

/// One fetched page: the request url and the parsed response.
#[derive(Clone, Debug)]
pub struct PageResult {
    /// Url the page was fetched from.
    pub url: Url,
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// JSON document, the text of a non JSON response, or `Null` for an
    /// empty body.
    pub body: Value,
}

impl PageResult {
    pub fn from_response(url: Url, rsp: ApiResponse) -> Result<Self, OpenStackError> {
        let body = if rsp.body.is_empty() {
            Value::Null
        } else if rsp.is_json() {
            rsp.json()?
        } else {
            Value::String(rsp.text())
        };
        Ok(Self {
            url,
            status: rsp.status,
            headers: rsp.headers,
            body,
        })
    }

    /// Raw collection array under `key`. An empty key addresses a top level
    /// array. A missing or `null` collection is empty.
    pub fn collection(&self, key: &str) -> &[Value] {
        let value = if key.is_empty() {
            Some(&self.body)
        } else {
            self.body.get(key)
        };
        value
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Deserialize the collection under `key`.
    pub fn extract_collection<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Vec<T>, OpenStackError> {
        self.collection(key)
            .iter()
            .map(|item| Ok(serde_json::from_value(item.clone())?))
            .collect()
    }

    /// Deserialize the value under the top level `key`.
    pub fn extract_key<T: DeserializeOwned>(&self, key: &str) -> Result<T, OpenStackError> {
        Ok(serde_json::from_value(
            self.body.get(key).cloned().unwrap_or(Value::Null),
        )?)
    }

    /// Value of a query parameter of the page url.
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, val)| val.into_owned())
    }
}

/// A page of a collection.
pub trait Page: Send + Sync {
    /// The response the page was built from.
    fn result(&self) -> &PageResult;

    /// Whether the page holds no items. Iteration ends on an empty page.
    fn is_empty(&self) -> Result<bool, OpenStackError>;

    /// Url of the following page, `None` on the last one.
    fn next_page_url(&self) -> Result<Option<Url>, OpenStackError>;
}

/// A collection carried in a response body.
pub trait Collection {
    /// Collection item.
    type Item: DeserializeOwned;

    /// Key of the collection array. Empty for a top level array.
    const KEY: &'static str;

    /// Key of the pagination links list.
    fn links_key() -> String {
        format!("{}_links", Self::KEY)
    }
}

/// Replace (or add) a query parameter.
pub fn set_query_param(url: &Url, name: &str, value: &str) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != name)
        .map(|(key, val)| (key.into_owned(), val.into_owned()))
        .collect();
    let mut url = url.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair(name, value);
    url
}

type PageFactory<P> = Arc<dyn Fn(PageResult) -> P + Send + Sync>;

/// Walks a paginated collection.
pub struct Pager<P: Page> {
    client: ServiceClient,
    initial_url: Url,
    headers: HeaderMap,
    create_page: PageFactory<P>,
}

impl<P: Page> Clone for Pager<P> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            initial_url: self.initial_url.clone(),
            headers: self.headers.clone(),
            create_page: self.create_page.clone(),
        }
    }
}

impl<P: Page> std::fmt::Debug for Pager<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pager")
            .field("initial_url", &self.initial_url.as_str())
            .finish()
    }
}

impl<P: Page> Pager<P> {
    pub fn new<F>(client: &ServiceClient, initial_url: Url, create_page: F) -> Self
    where
        F: Fn(PageResult) -> P + Send + Sync + 'static,
    {
        Self {
            client: client.clone(),
            initial_url,
            headers: HeaderMap::new(),
            create_page: Arc::new(create_page),
        }
    }

    /// Extra headers sent with every page request.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn initial_url(&self) -> &Url {
        &self.initial_url
    }

    async fn fetch_page(
        &self,
        cancel: &CancellationToken,
        url: Url,
    ) -> Result<PageResult, OpenStackError> {
        debug!(%url, "fetching page");
        let opts = RequestOpts {
            ok_codes: Some(PAGE_OK_CODES.to_vec()),
            more_headers: self.headers.clone(),
            ..Default::default()
        };
        let rsp = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(OpenStackError::Cancelled),
            rsp = self.client.get(url.clone(), opts) => rsp?,
        };
        PageResult::from_response(url, rsp)
    }

    /// Fetch the pages in order and hand each non empty one to `visit`.
    ///
    /// Iteration ends when `visit` returns `false`, a page is empty, there is
    /// no next page or the next url was already fetched. The first error
    /// aborts iteration and is returned as is.
    pub async fn each_page<F>(
        &self,
        cancel: &CancellationToken,
        mut visit: F,
    ) -> Result<(), OpenStackError>
    where
        F: FnMut(&P) -> Result<bool, OpenStackError>,
    {
        let mut url = self.initial_url.clone();
        let mut fetched: HashSet<String> = HashSet::new();
        loop {
            if cancel.is_cancelled() {
                return Err(OpenStackError::Cancelled);
            }
            if !fetched.insert(url.to_string()) {
                trace!(%url, "page already fetched, stopping");
                return Ok(());
            }
            let page = (self.create_page)(self.fetch_page(cancel, url).await?);
            if page.is_empty()? {
                trace!("empty page, stopping");
                return Ok(());
            }
            if !visit(&page)? {
                trace!("visitor stopped the iteration");
                return Ok(());
            }
            match page.next_page_url()? {
                Some(next) => url = next,
                None => {
                    trace!("last page reached");
                    return Ok(());
                }
            }
        }
    }

    /// Fetch every page and merge them into a single page.
    pub async fn all_pages(&self, cancel: &CancellationToken) -> Result<P, OpenStackError> {
        let mut merged: Option<Value> = None;
        let mut first: Option<(StatusCode, HeaderMap)> = None;
        self.each_page(cancel, |page| {
            let result = page.result();
            if first.is_none() {
                first = Some((result.status, result.headers.clone()));
            }
            merge_body(&mut merged, &result.body);
            Ok(true)
        })
        .await?;
        let (status, headers) = first.unwrap_or((StatusCode::OK, HeaderMap::new()));
        Ok((self.create_page)(PageResult {
            url: self.initial_url.clone(),
            status,
            headers,
            body: merged.unwrap_or_else(|| Value::Object(Map::new())),
        }))
    }
}

/// Append one page body to the merged body: collection arrays of objects
/// (skipping `*links` keys), top level arrays, text joined by newlines.
fn merge_body(merged: &mut Option<Value>, body: &Value) {
    match (merged.as_mut(), body) {
        (None, Value::Object(obj)) => {
            *merged = Some(Value::Object(
                obj.iter()
                    .filter(|(key, val)| !key.ends_with("links") && val.is_array())
                    .map(|(key, val)| (key.clone(), val.clone()))
                    .collect(),
            ));
        }
        (Some(Value::Object(acc)), Value::Object(obj)) => {
            for (key, val) in obj {
                if key.ends_with("links") {
                    continue;
                }
                if let Value::Array(items) = val {
                    match acc.get_mut(key) {
                        Some(Value::Array(existing)) => existing.extend(items.iter().cloned()),
                        _ => {
                            acc.insert(key.clone(), val.clone());
                        }
                    }
                }
            }
        }
        (None, Value::Array(_)) => *merged = Some(body.clone()),
        (Some(Value::Array(acc)), Value::Array(items)) => acc.extend(items.iter().cloned()),
        (None, Value::String(_)) => *merged = Some(body.clone()),
        (Some(Value::String(acc)), Value::String(text)) => {
            acc.push('\n');
            acc.push_str(text);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use httpmock::MockServer;
    use serde::Deserialize;
    use serde_json::json;
    use tracing_test::traced_test;

    use super::*;
    use crate::tests::api::get_service_client;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Thing {
        id: String,
    }

    struct Things;

    impl Collection for Things {
        type Item = Thing;
        const KEY: &'static str = "things";
    }

    impl MarkedCollection for Things {
        fn marker(item: &Thing) -> String {
            item.id.clone()
        }
    }

    fn ids(page: &impl Page) -> Vec<String> {
        page.result()
            .extract_collection::<Thing>("things")
            .unwrap()
            .into_iter()
            .map(|thing| thing.id)
            .collect()
    }

    #[test]
    fn test_set_query_param() {
        let url = Url::parse("http://localhost/things?limit=2&marker=a").unwrap();
        assert_eq!(
            "http://localhost/things?limit=2&marker=b",
            set_query_param(&url, "marker", "b").as_str()
        );
    }

    #[test]
    fn test_merge_body() {
        let mut merged = None;
        merge_body(&mut merged, &json!({"things": [1], "things_links": [], "count": 2}));
        merge_body(&mut merged, &json!({"things": [2, 3]}));
        assert_eq!(Some(json!({"things": [1, 2, 3]})), merged);

        let mut merged = None;
        merge_body(&mut merged, &json!([1]));
        merge_body(&mut merged, &json!([2]));
        assert_eq!(Some(json!([1, 2])), merged);

        let mut merged = None;
        merge_body(&mut merged, &json!("a"));
        merge_body(&mut merged, &json!("b"));
        assert_eq!(Some(json!("a\nb")), merged);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_linked_all_pages() {
        let server = MockServer::start_async().await;
        let p1 = server
            .mock_async(|when, then| {
                when.method("GET").path("/things").query_param_missing("page");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "things": [{"id": "1"}, {"id": "2"}],
                        "things_links": [{"rel": "next", "href": server.url("/things?page=2")}]
                    }));
            })
            .await;
        let p2 = server
            .mock_async(|when, then| {
                when.method("GET").path("/things").query_param("page", "2");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "things": [{"id": "3"}],
                        "things_links": [{"rel": "next", "href": server.url("/things?page=3")}]
                    }));
            })
            .await;
        let p3 = server
            .mock_async(|when, then| {
                when.method("GET").path("/things").query_param("page", "3");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"things": [{"id": "4"}, {"id": "5"}]}));
            })
            .await;

        let client = get_service_client(&server);
        let pager = Pager::new(
            &client,
            client.service_url(&["things"]).unwrap(),
            LinkedPage::<Things>::new,
        );
        let all = pager.all_pages(&CancellationToken::new()).await.unwrap();
        assert_eq!(vec!["1", "2", "3", "4", "5"], ids(&all));
        p1.assert_async().await;
        p2.assert_async().await;
        p3.assert_async().await;
    }

    #[tokio::test]
    #[traced_test]
    async fn test_empty_page_stops() {
        let server = MockServer::start_async().await;
        let p1 = server
            .mock_async(|when, then| {
                when.method("GET").path("/things").query_param_missing("page");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "things": [{"id": "1"}],
                        "things_links": [{"rel": "next", "href": server.url("/things?page=2")}]
                    }));
            })
            .await;
        let p2 = server
            .mock_async(|when, then| {
                when.method("GET").path("/things").query_param("page", "2");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "things": [],
                        "things_links": [{"rel": "next", "href": server.url("/things?page=3")}]
                    }));
            })
            .await;
        let p3 = server
            .mock_async(|when, then| {
                when.method("GET").path("/things").query_param("page", "3");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"things": [{"id": "3"}]}));
            })
            .await;

        let client = get_service_client(&server);
        let pager = Pager::new(
            &client,
            client.service_url(&["things"]).unwrap(),
            LinkedPage::<Things>::new,
        );
        let mut visits = 0;
        pager
            .each_page(&CancellationToken::new(), |_| {
                visits += 1;
                Ok(true)
            })
            .await
            .unwrap();
        assert_eq!(1, visits);
        p1.assert_async().await;
        p2.assert_async().await;
        p3.assert_calls_async(0).await;
    }

    #[tokio::test]
    #[traced_test]
    async fn test_empty_first_page() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/things");
                then.status(204);
            })
            .await;
        let client = get_service_client(&server);
        let pager = Pager::new(
            &client,
            client.service_url(&["things"]).unwrap(),
            LinkedPage::<Things>::new,
        );
        let mut visits = 0;
        pager
            .each_page(&CancellationToken::new(), |_| {
                visits += 1;
                Ok(true)
            })
            .await
            .unwrap();
        assert_eq!(0, visits);
        let all = pager.all_pages(&CancellationToken::new()).await.unwrap();
        assert_eq!(json!({}), all.result().body);
        assert!(ids(&all).is_empty());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_marker_pages() {
        let server = MockServer::start_async().await;
        let p1 = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/things")
                    .query_param("limit", "2")
                    .query_param_missing("marker");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"things": [{"id": "a"}, {"id": "b"}]}));
            })
            .await;
        let p2 = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/things")
                    .query_param("limit", "2")
                    .query_param("marker", "b");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"things": [{"id": "c"}, {"id": "d"}]}));
            })
            .await;
        let p3 = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/things")
                    .query_param("limit", "2")
                    .query_param("marker", "d");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"things": [{"id": "e"}]}));
            })
            .await;

        let client = get_service_client(&server);
        let url = Url::parse(&server.url("/things?limit=2")).unwrap();
        let pager = Pager::new(&client, url, MarkerPage::<Things>::new);
        let mut seen = Vec::new();
        pager
            .each_page(&CancellationToken::new(), |page| {
                seen.extend(ids(page));
                Ok(true)
            })
            .await
            .unwrap();
        assert_eq!(vec!["a", "b", "c", "d", "e"], seen);
        p1.assert_async().await;
        p2.assert_async().await;
        p3.assert_async().await;
    }

    #[tokio::test]
    #[traced_test]
    async fn test_visitor_stops() {
        let server = MockServer::start_async().await;
        let p1 = server
            .mock_async(|when, then| {
                when.method("GET").path("/things").query_param_missing("page");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "things": [{"id": "1"}],
                        "things_links": [{"rel": "next", "href": server.url("/things?page=2")}]
                    }));
            })
            .await;
        let p2 = server
            .mock_async(|when, then| {
                when.method("GET").path("/things").query_param("page", "2");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"things": [{"id": "2"}]}));
            })
            .await;

        let client = get_service_client(&server);
        let pager = Pager::new(
            &client,
            client.service_url(&["things"]).unwrap(),
            LinkedPage::<Things>::new,
        );
        let mut visits = 0;
        pager
            .each_page(&CancellationToken::new(), |_| {
                visits += 1;
                Ok(false)
            })
            .await
            .unwrap();
        assert_eq!(1, visits);
        p1.assert_async().await;
        p2.assert_calls_async(0).await;
    }

    #[tokio::test]
    #[traced_test]
    async fn test_error_aborts() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/things").query_param_missing("page");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "things": [{"id": "1"}],
                        "things_links": [{"rel": "next", "href": server.url("/things?page=2")}]
                    }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/things").query_param("page", "2");
                then.status(500).body("boom");
            })
            .await;

        let client = get_service_client(&server);
        let pager = Pager::new(
            &client,
            client.service_url(&["things"]).unwrap(),
            LinkedPage::<Things>::new,
        );
        let mut visits = 0;
        let err = pager
            .each_page(&CancellationToken::new(), |_| {
                visits += 1;
                Ok(true)
            })
            .await
            .unwrap_err();
        assert_eq!(1, visits);
        match err {
            OpenStackError::UnexpectedResponseCode {
                status, expected, body, ..
            } => {
                assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status);
                assert_eq!(PAGE_OK_CODES.to_vec(), expected);
                assert_eq!("boom", body);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(pager.all_pages(&CancellationToken::new()).await.is_err());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_visitor_error_aborts() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/things");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"things": [{"id": "1"}]}));
            })
            .await;
        let client = get_service_client(&server);
        let pager = Pager::new(
            &client,
            client.service_url(&["things"]).unwrap(),
            SinglePage::<Things>::new,
        );
        let err = pager
            .each_page(&CancellationToken::new(), |_| {
                Err(OpenStackError::MissingInput("stop".into()))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, OpenStackError::MissingInput(name) if name == "stop"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_cancelled_before_fetch() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/things");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"things": [{"id": "1"}]}));
            })
            .await;
        let client = get_service_client(&server);
        let pager = Pager::new(
            &client,
            client.service_url(&["things"]).unwrap(),
            SinglePage::<Things>::new,
        );
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(matches!(
            pager.all_pages(&cancel).await,
            Err(OpenStackError::Cancelled)
        ));
        mock.assert_calls_async(0).await;
    }

    #[tokio::test]
    #[traced_test]
    async fn test_page_not_fetched_twice() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/things");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "things": [{"id": "1"}],
                        "things_links": [{"rel": "next", "href": server.url("/things")}]
                    }));
            })
            .await;
        let client = get_service_client(&server);
        let pager = Pager::new(
            &client,
            client.service_url(&["things"]).unwrap(),
            LinkedPage::<Things>::new,
        );
        let all = pager.all_pages(&CancellationToken::new()).await.unwrap();
        assert_eq!(vec!["1"], ids(&all));
        mock.assert_calls_async(1).await;
    }
}
