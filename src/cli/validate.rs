// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 forgeflow contributors

//! Validate command - check a pipeline against the Script schema

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

/// Run the validate command
pub async fn run(file: PathBuf, at: String, verbose: bool) -> Result<()> {
    println!("{}", "Validating pipeline...".bold());
    println!();

    // Check pipeline exists
    if !file.exists() {
        return Err(miette::miette!(
            "Pipeline file not found: {}",
            file.display()
        ));
    }

    // Compile the configuration
    let value = match super::load_value(&file, &at).await {
        Ok(v) => v,
        Err(e) => {
            eprintln!("  {} Failed to compile configuration", "✗".red());
            eprintln!();
            return Err(e.into());
        }
    };

    println!("  {} Configuration compiles", "✓".green());

    // Validate against the Script schema
    if let Err(e) = value.validate("script") {
        println!("  {} Schema validation failed", "✗".red());
        println!();
        return Err(e.into());
    }

    println!("  {} Pipeline satisfies the schema", "✓".green());

    if verbose {
        let script = value.script()?;
        println!();
        println!("{}:", "Pipeline summary".bold());
        println!("  File: {}", file.display());
        if !at.is_empty() {
            println!("  Path: {}", at);
        }
        println!("  Top-level ops: {}", script.len());
    }

    println!();
    println!("{}", "Pipeline is valid!".green().bold());
    Ok(())
}
