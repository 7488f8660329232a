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
//! # Workflows
//!
//! Creation takes the YAML definition as a `text/plain` body and returns
//! every workflow declared in it.
use reqwest::StatusCode;
use url::Url;

use crate::client::{RequestOpts, ServiceClient};
use crate::error::OpenStackError;
use crate::pagination::{Page, PageResult, Pager};
use crate::params::with_query;

mod types;

pub use types::*;

fn workflows_url(client: &ServiceClient, parts: &[&str]) -> Result<Url, OpenStackError> {
    let mut all = vec!["workflows"];
    all.extend_from_slice(parts);
    client.service_url(&all)
}

/// Page of workflows. The following page is the top level `next` URL.
#[derive(Debug)]
pub struct WorkflowPage {
    result: PageResult,
}

impl WorkflowPage {
    pub fn new(result: PageResult) -> Self {
        Self { result }
    }

    pub fn items(&self) -> Result<Vec<Workflow>, OpenStackError> {
        self.result.extract_collection("workflows")
    }
}

impl Page for WorkflowPage {
    fn result(&self) -> &PageResult {
        &self.result
    }

    fn is_empty(&self) -> Result<bool, OpenStackError> {
        Ok(self.result.status == StatusCode::NO_CONTENT
            || self.result.collection("workflows").is_empty())
    }

    fn next_page_url(&self) -> Result<Option<Url>, OpenStackError> {
        match self.result.extract_key::<Option<String>>("next")? {
            Some(next) if !next.is_empty() => Ok(Some(self.result.url.join(&next)?)),
            _ => Ok(None),
        }
    }
}

#[tracing::instrument(level = "debug", skip(client, opts), err(Debug))]
pub async fn create(client: &ServiceClient, opts: &CreateOpts) -> Result<Vec<Workflow>, OpenStackError> {
    if opts.definition.trim().is_empty() {
        return Err(OpenStackError::MissingInput("definition".into()));
    }
    let url = with_query(workflows_url(client, &[])?, Some(opts))?;
    client
        .post(
            url,
            RequestOpts::default()
                .with_raw("text/plain", opts.definition.clone().into_bytes())
                .with_ok_codes(&[201]),
        )
        .await?
        .extract("workflows")
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn delete(client: &ServiceClient, id: &str) -> Result<(), OpenStackError> {
    client
        .delete(workflows_url(client, &[id])?, RequestOpts::default().with_ok_codes(&[204]))
        .await?;
    Ok(())
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn get(client: &ServiceClient, id: &str) -> Result<Workflow, OpenStackError> {
    client
        .get(workflows_url(client, &[id])?, RequestOpts::default())
        .await?
        .json()
}

pub fn list(client: &ServiceClient, opts: Option<&ListOpts>) -> Result<Pager<WorkflowPage>, OpenStackError> {
    let url = with_query(workflows_url(client, &[])?, opts)?;
    Ok(Pager::new(client, url, WorkflowPage::new))
}
