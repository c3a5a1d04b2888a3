// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 forgeflow contributors

//! Dirs command - list the local directories a pipeline depends on

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// Run the dirs command
pub async fn run(file: PathBuf, at: String, verbose: bool) -> Result<()> {
    if !file.exists() {
        return Err(miette::miette!(
            "Pipeline file not found: {}",
            file.display()
        ));
    }

    let value = super::load_value(&file, &at).await?;
    let script = value.script()?;

    let cancel = CancellationToken::new();
    let dirs = script.local_dirs(&cancel)?;

    if dirs.is_empty() {
        if verbose {
            println!("{}", "No local directory dependencies.".dimmed());
        }
        return Ok(());
    }

    for dir in &dirs {
        println!("{dir}");
    }

    if verbose {
        println!();
        println!(
            "{} director{} must be materialized before dispatch",
            dirs.len(),
            if dirs.len() == 1 { "y" } else { "ies" }
        );
    }

    Ok(())
}
