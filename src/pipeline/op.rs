// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 forgeflow contributors

//! Pipeline operations
//!
//! An [`Op`] is one step of a build pipeline, discriminated by its `do`
//! verb. Some verbs own nested sub-pipelines (`copy` and `load` pull from a
//! source pipeline; `exec` mounts per-point input pipelines). The serde
//! shape below is the wire representation a remote build backend consumes:
//! the `do` tag plus verb-specific fields, with empty fields omitted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Script;

/// A single pipeline operation
///
/// Empty string fields mean "unset" and are omitted on the wire; `copy`
/// treats empty `src`/`dest` as the filesystem root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "do", rename_all = "lowercase")]
pub enum Op {
    /// Seed from a host directory
    Local {
        dir: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        include: Vec<String>,
    },

    /// Seed from a git repository
    Git {
        remote: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        r#ref: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        dir: String,
    },

    /// Seed from a container image
    Docker {
        r#ref: String,
    },

    /// Copy from the output of a source sub-pipeline
    Copy {
        from: Script,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        src: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        dest: String,
    },

    /// Run a command, with optional per-mount input sub-pipelines
    Exec {
        args: Vec<String>,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        env: BTreeMap<String, String>,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        dir: String,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        mount: BTreeMap<String, Mount>,
    },

    /// Adopt the output of a source sub-pipeline as the current state
    Load {
        from: Script,
    },

    /// Export a value produced by the pipeline
    Export {
        source: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        format: String,
    },
}

/// A mount point of an `exec` operation, fed by an input sub-pipeline
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Mount {
    #[serde(default, skip_serializing_if = "Script::is_empty")]
    pub input: Script,
}

impl Op {
    /// The verb discriminating this operation
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Local { .. } => "local",
            Self::Git { .. } => "git",
            Self::Docker { .. } => "docker",
            Self::Copy { .. } => "copy",
            Self::Exec { .. } => "exec",
            Self::Load { .. } => "load",
            Self::Export { .. } => "export",
        }
    }

    /// The nested sub-pipelines this operation owns, in traversal order
    ///
    /// Mount inputs iterate in mount-point order, so the sequence is the
    /// same on every call over the same operation.
    pub fn nested_scripts(&self) -> Vec<&Script> {
        match self {
            Self::Copy { from, .. } | Self::Load { from } => vec![from],
            Self::Exec { mount, .. } => mount.values().map(|m| &m.input).collect(),
            _ => Vec::new(),
        }
    }

    /// A one-line human summary of the operation, for CLI listings
    pub fn summary(&self) -> String {
        match self {
            Self::Local { dir, include } if include.is_empty() => format!("local {dir}"),
            Self::Local { dir, include } => format!("local {dir} [{}]", include.join(", ")),
            Self::Git { remote, r#ref, .. } if r#ref.is_empty() => format!("git {remote}"),
            Self::Git { remote, r#ref, .. } => format!("git {remote}#{ref_}", ref_ = r#ref),
            Self::Docker { r#ref } => format!("docker {}", r#ref),
            Self::Copy { from, .. } => format!("copy from {} op(s)", from.len()),
            Self::Exec { args, mount, .. } if mount.is_empty() => {
                format!("exec {}", args.join(" "))
            }
            Self::Exec { args, mount, .. } => {
                format!("exec {} ({} mount(s))", args.join(" "), mount.len())
            }
            Self::Load { from } => format!("load from {} op(s)", from.len()),
            Self::Export { source, .. } => format!("export {source}"),
        }
    }
}
