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
//! Command line client.
//!
//! Lists and shows resources of an OpenStack cloud as JSON.

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Report, Result};
use eyre::WrapErr;
use serde::Serialize;
use std::future::Future;
use std::io;
use std::path::PathBuf;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{Level, debug, error};
use tracing_subscriber::{
    Layer,
    filter::{LevelFilter, Targets},
    prelude::*,
};

use openstack_client::baremetalintrospection::v1::introspection;
use openstack_client::client::ProviderClient;
use openstack_client::compute::v2::{flavors, hypervisors};
use openstack_client::config::Config;
use openstack_client::error::OpenStackError;
use openstack_client::image::v2::tasks;
use openstack_client::loadbalancer::v2::listeners;
use openstack_client::networking::v2::extensions::fwaas_v2::policies;
use openstack_client::networking::v2::extensions::security::groups;
use openstack_client::objectstorage::v1::containers;
use openstack_client::pagination::{Page, Pager};
use openstack_client::sharedfilesystems::v2::{messages, snapshots};
use openstack_client::workflow::v2::workflows;

/// OpenStack command line client.
///
/// Credentials come from the configuration file and the `OS_*` environment.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the client config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbosity level. Repeat to increase level.
    #[arg(short, long, global=true, action = clap::ArgAction::Count, display_order = 920)]
    pub verbose: u8,

    #[command(subcommand)]
    resource: Resource,
}

#[derive(Debug, Subcommand)]
enum Resource {
    /// Compute flavors.
    Flavor {
        #[command(subcommand)]
        action: Action,
    },
    /// Compute hypervisors.
    Hypervisor {
        #[command(subcommand)]
        action: Action,
    },
    /// Network security groups.
    SecurityGroup {
        #[command(subcommand)]
        action: Action,
    },
    /// FWaaS v2 firewall policies.
    FirewallPolicy {
        #[command(subcommand)]
        action: Action,
    },
    /// Load balancer listeners.
    Listener {
        #[command(subcommand)]
        action: Action,
    },
    /// Shared file system snapshots.
    ShareSnapshot {
        #[command(subcommand)]
        action: Action,
    },
    /// Shared file system user messages.
    ShareMessage {
        #[command(subcommand)]
        action: Action,
    },
    /// Image tasks.
    ImageTask {
        #[command(subcommand)]
        action: Action,
    },
    /// Bare metal introspections. `show` takes the node UUID.
    Introspection {
        #[command(subcommand)]
        action: Action,
    },
    /// Mistral workflows.
    Workflow {
        #[command(subcommand)]
        action: Action,
    },
    /// Object storage containers. `show` takes the container name.
    Container {
        #[command(subcommand)]
        action: Action,
    },
}

#[derive(Debug, Subcommand)]
enum Action {
    /// List every resource, following all pages.
    List,
    /// Show a single resource.
    Show {
        /// Resource ID or name.
        id: String,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Walk every page and print the collected items.
async fn print_all<P, T, F>(pager: Pager<P>, cancel: &CancellationToken, items: F) -> Result<()>
where
    P: Page,
    T: Serialize,
    F: Fn(&P) -> Result<Vec<T>, OpenStackError>,
{
    let page = pager.all_pages(cancel).await.wrap_err("listing failed")?;
    print_json(&items(&page)?)
}

async fn print_one<T, Fut>(fut: Fut) -> Result<()>
where
    T: Serialize,
    Fut: Future<Output = Result<T, OpenStackError>>,
{
    print_json(&fut.await?)
}

async fn run(
    resource: Resource,
    provider: &ProviderClient,
    cancel: &CancellationToken,
) -> Result<()> {
    match resource {
        Resource::Flavor { action } => {
            let client = provider.compute_v2().await?;
            match action {
                Action::List => {
                    print_all(flavors::list_detail(&client, None)?, cancel, |p| p.items()).await
                }
                Action::Show { id } => print_one(flavors::get(&client, &id)).await,
            }
        }
        Resource::Hypervisor { action } => {
            let client = provider.compute_v2().await?;
            match action {
                Action::List => {
                    print_all(hypervisors::list(&client, None)?, cancel, |p| p.items()).await
                }
                Action::Show { id } => print_one(hypervisors::get(&client, &id)).await,
            }
        }
        Resource::SecurityGroup { action } => {
            let client = provider.network_v2().await?;
            match action {
                Action::List => print_all(groups::list(&client, None)?, cancel, |p| p.items()).await,
                Action::Show { id } => print_one(groups::get(&client, &id)).await,
            }
        }
        Resource::FirewallPolicy { action } => {
            let client = provider.network_v2().await?;
            match action {
                Action::List => {
                    print_all(policies::list(&client, None)?, cancel, |p| p.items()).await
                }
                Action::Show { id } => print_one(policies::get(&client, &id)).await,
            }
        }
        Resource::Listener { action } => {
            let client = provider.load_balancer_v2().await?;
            match action {
                Action::List => {
                    print_all(listeners::list(&client, None)?, cancel, |p| p.items()).await
                }
                Action::Show { id } => print_one(listeners::get(&client, &id)).await,
            }
        }
        Resource::ShareSnapshot { action } => {
            let client = provider.shared_file_system_v2().await?;
            match action {
                Action::List => {
                    print_all(snapshots::list_detail(&client, None)?, cancel, |p| p.items()).await
                }
                Action::Show { id } => print_one(snapshots::get(&client, &id)).await,
            }
        }
        Resource::ShareMessage { action } => {
            let client = provider.shared_file_system_v2().await?;
            match action {
                Action::List => {
                    print_all(messages::list(&client, None)?, cancel, |p| p.items()).await
                }
                Action::Show { id } => print_one(messages::get(&client, &id)).await,
            }
        }
        Resource::ImageTask { action } => {
            let client = provider.image_v2().await?;
            match action {
                Action::List => print_all(tasks::list(&client, None)?, cancel, |p| p.items()).await,
                Action::Show { id } => print_one(tasks::get(&client, &id)).await,
            }
        }
        Resource::Introspection { action } => {
            let client = provider.baremetal_introspection_v1().await?;
            match action {
                Action::List => {
                    let pager = introspection::list_introspections(&client, None)?;
                    print_all(pager, cancel, |p| p.items()).await
                }
                Action::Show { id } => {
                    print_one(introspection::get_introspection_status(&client, &id)).await
                }
            }
        }
        Resource::Workflow { action } => {
            let client = provider.workflow_v2().await?;
            match action {
                Action::List => {
                    print_all(workflows::list(&client, None)?, cancel, |p| p.items()).await
                }
                Action::Show { id } => print_one(workflows::get(&client, &id)).await,
            }
        }
        Resource::Container { action } => {
            let client = provider.object_storage_v1().await?;
            match action {
                Action::List => {
                    print_all(containers::list(&client, None)?, cancel, |p| p.items()).await
                }
                Action::Show { id } => print_one(containers::get(&client, &id, None)).await,
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Report> {
    color_eyre::install()?;
    let args = Args::parse();

    let filter = Targets::new()
        .with_default(match args.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        })
        .with_target("hyper_util", Level::INFO)
        .with_target("rustls", Level::INFO);

    let log_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_filter(filter);

    // build the tracing registry
    tracing_subscriber::registry().with(log_layer).init();

    let cfg = Config::new(args.config.as_ref())?;
    debug!("Authenticating...");
    let provider = ProviderClient::from_config(&cfg)
        .await
        .wrap_err("authentication failed")?;

    let token = CancellationToken::new();
    let cloned_token = token.clone();
    tokio::spawn(async move {
        if signal::ctrl_c()
            .await
            .inspect_err(|e| error!("failed to install Ctrl+C handler: {e}"))
            .is_ok()
        {
            cloned_token.cancel();
        }
    });

    run(args.resource, &provider, &token).await
}
