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
//! Collections returned in one response.
use std::marker::PhantomData;
use url::Url;

use super::{Collection, Page, PageResult};
use crate::error::OpenStackError;

/// The only page of a collection.
#[derive(Debug)]
pub struct SinglePage<C> {
    result: PageResult,
    _collection: PhantomData<fn() -> C>,
}

impl<C: Collection> SinglePage<C> {
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

impl<C: Collection> Page for SinglePage<C> {
    fn result(&self) -> &PageResult {
        &self.result
    }

    fn is_empty(&self) -> Result<bool, OpenStackError> {
        Ok(self.result.collection(C::KEY).is_empty())
    }

    fn next_page_url(&self) -> Result<Option<Url>, OpenStackError> {
        Ok(None)
    }
}
