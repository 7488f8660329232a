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
//! # User messages
use url::Url;

use crate::client::{RequestOpts, ServiceClient};
use crate::error::OpenStackError;
use crate::pagination::{Collection, Pager, SinglePage};
use crate::params::with_query;

mod types;

pub use types::*;

fn messages_url(client: &ServiceClient, parts: &[&str]) -> Result<Url, OpenStackError> {
    let mut all = vec!["messages"];
    all.extend_from_slice(parts);
    client.service_url(&all)
}

/// `messages` collection.
pub struct Messages;

impl Collection for Messages {
    type Item = Message;
    const KEY: &'static str = "messages";
}

pub type MessagePage = SinglePage<Messages>;

/// List the user messages.
pub fn list(client: &ServiceClient, opts: Option<&ListOpts>) -> Result<Pager<MessagePage>, OpenStackError> {
    let url = with_query(messages_url(client, &[])?, opts)?;
    Ok(Pager::new(client, url, MessagePage::new))
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn get(client: &ServiceClient, id: &str) -> Result<Message, OpenStackError> {
    client
        .get(messages_url(client, &[id])?, RequestOpts::default())
        .await?
        .extract("message")
}

#[tracing::instrument(level = "debug", skip(client), err(Debug))]
pub async fn delete(client: &ServiceClient, id: &str) -> Result<(), OpenStackError> {
    client
        .delete(messages_url(client, &[id])?, RequestOpts::default().with_ok_codes(&[204]))
        .await?;
    Ok(())
}
