// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 forgeflow contributors

//! forgeflow - Build-Pipeline Compiler
//!
//! Compile, validate, and analyze declarative build pipelines.

use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use forgeflow::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forgeflow=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    // Change to specified directory if provided
    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir).map_err(|e| {
            miette::miette!("Failed to change to directory '{}': {}", dir.display(), e)
        })?;
    }

    // Dispatch to command handlers
    match cli.command {
        Commands::Validate { file, at } => forgeflow::cli::validate::run(file, at, cli.verbose).await,
        Commands::Ops { file, at } => forgeflow::cli::ops::run(file, at, cli.verbose).await,
        Commands::Dirs { file, at } => forgeflow::cli::dirs::run(file, at, cli.verbose).await,
        Commands::Eval {
            file,
            at,
            input,
            format,
        } => forgeflow::cli::eval::run(file, at, input, format, cli.verbose).await,
    }
}
