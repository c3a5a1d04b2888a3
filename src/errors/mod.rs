// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 forgeflow contributors

//! Error types for pipeline compilation, validation, and traversal
//!
//! Every failure in forgeflow is returned to the caller immediately; there
//! is no retry or recovery inside the library. Visitor callbacks return
//! this same error type, and traversal propagates their errors unmodified.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for forgeflow operations
pub type ForgeflowResult<T> = Result<T, ForgeflowError>;

/// Main error type for forgeflow
#[derive(Error, Debug, Diagnostic)]
pub enum ForgeflowError {
    // ─────────────────────────────────────────────────────────────────────────
    // Compilation Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Failed to compile '{path}': {message}")]
    #[diagnostic(code(forgeflow::compile_error))]
    Compile { path: String, message: String },

    #[error("Schema violation at '{path}': {reason}")]
    #[diagnostic(
        code(forgeflow::schema_error),
        help("Each operation needs a recognized 'do' verb and fields matching that verb's schema")
    )]
    Schema { path: String, reason: String },

    #[error("Malformed {format} payload: {message}")]
    #[diagnostic(code(forgeflow::decode_error))]
    Decode { format: String, message: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Input Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("{what} not supported yet")]
    #[diagnostic(code(forgeflow::unsupported))]
    Unsupported { what: String },

    #[error("Invalid input spec '{spec}': {reason}")]
    #[diagnostic(
        code(forgeflow::invalid_input),
        help("Input specs look like 'dir:./src', 'git:https://host/repo#ref', 'docker:alpine:3.20', 'text:hello', 'json:{{...}}' or 'yaml:...'")
    )]
    InputSpec { spec: String, reason: String },

    #[error("Invalid include pattern '{pattern}': {message}")]
    #[diagnostic(code(forgeflow::bad_pattern))]
    Pattern { pattern: String, message: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Traversal Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Traversal cancelled")]
    #[diagnostic(code(forgeflow::cancelled))]
    Cancelled,

    // ─────────────────────────────────────────────────────────────────────────
    // IO/System Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Failed to read file '{path}': {error}")]
    #[diagnostic(code(forgeflow::file_read_error))]
    FileReadError { path: PathBuf, error: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(forgeflow::io_error))]
    Io { message: String },
}

impl From<std::io::Error> for ForgeflowError {
    fn from(e: std::io::Error) -> Self {
        Self::Io { message: e.to_string() }
    }
}

impl From<serde_json::Error> for ForgeflowError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode { format: "JSON".into(), message: e.to_string() }
    }
}

impl From<serde_yaml::Error> for ForgeflowError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Decode { format: "YAML".into(), message: e.to_string() }
    }
}

impl From<glob::PatternError> for ForgeflowError {
    fn from(e: glob::PatternError) -> Self {
        Self::Pattern { pattern: String::new(), message: e.to_string() }
    }
}

impl ForgeflowError {
    /// Create a schema error at a dotted document path
    pub fn schema(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Schema {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a compile error for a source file
    pub fn compile(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Compile {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported-operation error
    pub fn unsupported(what: impl Into<String>) -> Self {
        Self::Unsupported { what: what.into() }
    }
}
