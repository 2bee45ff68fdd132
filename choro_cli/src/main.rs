// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `choro`: render the county employment views to SVG and HTML.

mod config;
mod output;
mod script;

use std::path::PathBuf;

use anyhow::{Context, Result};
use choro_views::Coordinator;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::output::Output;
use crate::script::Script;

#[derive(Parser, Debug)]
#[command(name = "choro", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render one snapshot of both panels
    Render {
        #[arg(short, long, value_name = "FILE", default_value = "choro.toml")]
        config: PathBuf,
        /// Attribute to express instead of the first one
        #[arg(short, long)]
        attribute: Option<String>,
        /// Milliseconds after the selection at which to render; defaults to once every
        /// transition has finished
        #[arg(long)]
        now: Option<f64>,
    },
    /// Replay a script of timed events and render each snapshot
    Play {
        #[arg(short, long, value_name = "FILE", default_value = "choro.toml")]
        config: PathBuf,
        #[arg(short, long, value_name = "FILE")]
        script: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Render {
            config,
            attribute,
            now,
        } => {
            let config = AppConfig::load_from_file(&config)?;
            let mut coordinator = build(&config)?;
            if let Some(name) = attribute {
                coordinator
                    .select_attribute_by_name(&name, 0.0)
                    .context("unknown --attribute")?;
            }
            let now = now.unwrap_or_else(|| coordinator.settled_at());
            let mut output = Output::new(&config.output.dir, &coordinator)?;
            output.write(&mut coordinator, now, "")?;
        }
        Commands::Play { config, script } => {
            let config = AppConfig::load_from_file(&config)?;
            let script = Script::load_from_file(&script)?;
            let mut coordinator = build(&config)?;
            let mut output = Output::new(&config.output.dir, &coordinator)?;
            script.play(&mut coordinator, |coordinator, now| {
                output.write(coordinator, now, &format!("-{now}"))
            })?;
        }
    }
    Ok(())
}

/// Loads the three inputs together and builds the views; nothing is rendered if any load fails.
fn build(config: &AppConfig) -> Result<Coordinator> {
    let paths = config.source_paths();
    let data = choro_geo::load_all(&paths).context("failed to load input data")?;
    info!(
        records = data.records.len(),
        counties = data.counties.len(),
        background = data.background.len(),
        "inputs loaded"
    );
    Coordinator::new(data, &config.view).context("invalid view configuration")
}
