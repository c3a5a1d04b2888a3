// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 forgeflow contributors

//! CLI command definitions and handlers
//!
//! Defines the command-line interface for forgeflow.

pub mod dirs;
pub mod eval;
pub mod ops;
pub mod validate;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Build-pipeline compiler
///
/// Compile, validate, and analyze declarative build pipelines before
/// dispatching them to a build backend.
#[derive(Parser, Debug)]
#[clap(
    name = "forgeflow",
    version,
    about = "Build-pipeline compiler and dependency analyzer",
    long_about = None,
    after_help = "Examples:\n\
        forgeflow validate pipeline.yaml         Validate a pipeline file\n\
        forgeflow ops pipeline.yaml              List operations in order\n\
        forgeflow dirs pipeline.yaml             List local directory dependencies\n\
        forgeflow eval pipeline.yaml \\\n\
            --input source=dir:./src             Merge inputs and print the result\n\n\
        See 'forgeflow <command> --help' for more information on a specific command."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Change to directory before executing
    #[clap(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a pipeline configuration
    Validate {
        /// Pipeline file to validate
        #[clap(default_value = "pipeline.yaml")]
        file: PathBuf,

        /// Dotted path of the pipeline inside the document (default: root)
        #[clap(short, long, default_value = "")]
        at: String,
    },

    /// List pipeline operations in traversal order
    Ops {
        /// Pipeline file
        #[clap(default_value = "pipeline.yaml")]
        file: PathBuf,

        /// Dotted path of the pipeline inside the document (default: root)
        #[clap(short, long, default_value = "")]
        at: String,
    },

    /// List the local directories a pipeline depends on
    Dirs {
        /// Pipeline file
        #[clap(default_value = "pipeline.yaml")]
        file: PathBuf,

        /// Dotted path of the pipeline inside the document (default: root)
        #[clap(short, long, default_value = "")]
        at: String,
    },

    /// Evaluate a configuration, merging inputs, and print the result
    Eval {
        /// Configuration file
        #[clap(default_value = "pipeline.yaml")]
        file: PathBuf,

        /// Dotted path of the pipeline inside the document (default: root)
        #[clap(short, long, default_value = "")]
        at: String,

        /// Inputs to merge, as KEY=KIND:VALUE (e.g. source=dir:./src)
        #[clap(short, long)]
        input: Vec<String>,

        /// Output format (yaml or json)
        #[clap(short, long, default_value = "yaml")]
        format: EvalFormat,
    },
}

/// Output format for the eval command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalFormat {
    Yaml,
    Json,
}

impl std::str::FromStr for EvalFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Compile a pipeline file and return the value at the `at` path
pub(crate) async fn load_value(
    file: &std::path::Path,
    at: &str,
) -> Result<crate::compiler::Value, crate::errors::ForgeflowError> {
    let source = tokio::fs::read_to_string(file).await.map_err(|e| {
        crate::errors::ForgeflowError::FileReadError {
            path: file.to_path_buf(),
            error: e.to_string(),
        }
    })?;
    let value = crate::compiler::Compiler::new().compile(&file.to_string_lossy(), &source)?;
    Ok(value.get(at))
}
