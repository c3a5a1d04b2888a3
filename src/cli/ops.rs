// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 forgeflow contributors

//! Ops command - list pipeline operations in traversal order

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// Run the ops command
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
    let mut n = 0;
    script
        .walk(&cancel, |op| {
            n += 1;
            if verbose {
                println!("  {}. {} {}", n, op.verb().bold(), op.summary().dimmed());
            } else {
                println!("  {}. {}", n, op.summary());
            }
            Ok(())
        })?;

    println!();
    println!("{} op{} total", n, if n == 1 { "" } else { "s" });

    Ok(())
}
