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
//! Pages addressed by a `marker` query parameter.
use std::marker::PhantomData;
use url::Url;

use super::{Collection, Page, PageResult, set_query_param};
use crate::error::OpenStackError;

/// Collection whose items provide the marker of the next page.
pub trait MarkedCollection: Collection {
    /// Marker value identifying `item`, usually its ID or name.
    fn marker(item: &Self::Item) -> String;
}

/// Page whose successor is the same url with `marker` set to the last item
/// of this page.
///
/// When the url carries a `limit` a short page is the last one. Without a
/// limit iteration goes on until an empty page comes back.
#[derive(Debug)]
pub struct MarkerPage<C> {
    result: PageResult,
    _collection: PhantomData<fn() -> C>,
}

impl<C: MarkedCollection> MarkerPage<C> {
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

impl<C: MarkedCollection> Page for MarkerPage<C> {
    fn result(&self) -> &PageResult {
        &self.result
    }

    fn is_empty(&self) -> Result<bool, OpenStackError> {
        Ok(self.result.collection(C::KEY).is_empty())
    }

    fn next_page_url(&self) -> Result<Option<Url>, OpenStackError> {
        let items = self.items()?;
        let Some(last) = items.last() else {
            return Ok(None);
        };
        if let Some(limit) = self
            .result
            .query_param("limit")
            .and_then(|limit| limit.parse::<usize>().ok())
            && items.len() < limit
        {
            return Ok(None);
        }
        Ok(Some(set_query_param(
            &self.result.url,
            "marker",
            &C::marker(last),
        )))
    }
}
