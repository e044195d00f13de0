//! Taskpad command-line front end
//!
//! Drives the core task store from the terminal. Data lives under
//! `TASKPAD_DATA_DIR` (default `.taskpad-data`).

mod commands;
mod platform;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{Cli, Command};
use taskpad_core::task::TaskStore;
use taskpad_core::StoreConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskpad=warn,taskpad_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = StoreConfig::from_env();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    tracing::debug!("Using data directory: {:?}", config.data_dir);

    // A collection that fails to load is never overwritten
    let store = TaskStore::open_with_config(&config)
        .await
        .context("Failed to load tasks")?;

    match cli.command {
        Command::List => commands::list(&store).await,
        Command::Show { id } => commands::show(&store, &id).await,
        Command::Add(args) => commands::add(&store, &config, args).await,
        Command::Edit(args) => commands::edit(&store, &config, args).await,
        Command::Delete { id } => commands::delete(&store, &id).await,
    }
}
