// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 forgeflow contributors

//! Eval command - merge inputs into a configuration and print the result

use miette::Result;
use std::path::PathBuf;

use super::EvalFormat;
use crate::input::Input;

/// Run the eval command
pub async fn run(
    file: PathBuf,
    at: String,
    inputs: Vec<String>,
    format: EvalFormat,
    _verbose: bool,
) -> Result<()> {
    if !file.exists() {
        return Err(miette::miette!(
            "Pipeline file not found: {}",
            file.display()
        ));
    }

    let mut value = super::load_value(&file, &at).await?;

    // Merge each input fragment at its key path
    for arg in &inputs {
        let (key, spec) = arg.split_once('=').ok_or_else(|| {
            miette::miette!("Invalid --input '{arg}': expected KEY=KIND:VALUE")
        })?;
        let fragment = Input::from_spec(spec).and_then(|i| i.compile())?;
        value = value.merge_at(key, &fragment)?;
    }

    // The merged document must still satisfy the pipeline schema wherever
    // a compute section is present
    if !value.get("compute").is_null() {
        value.get("compute").validate("script")?;
    }

    let rendered = match format {
        EvalFormat::Yaml => value.to_yaml()?,
        EvalFormat::Json => value.to_json()?,
    };
    print!("{rendered}");
    if !rendered.ends_with('\n') {
        println!();
    }

    Ok(())
}
