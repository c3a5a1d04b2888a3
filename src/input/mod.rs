// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 forgeflow contributors

//! Pipeline inputs
//!
//! An [`Input`] is a value or artifact supplied by the caller before
//! compilation: a host directory, a git checkout, a container image, or a
//! plain text/JSON/YAML value. Each input compiles into a configuration
//! [`Value`] fragment, which the caller merges into a pipeline
//! configuration (see [`Value::merge_at`]) prior to validation.
//!
//! Artifact inputs compile by constructing the typed operation and
//! serializing it, never by interpolating paths into configuration source
//! text, so paths and patterns containing syntax-significant characters
//! are safe. Compilation is pure and idempotent; repeated and concurrent
//! calls are fine.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::compiler::{Compiler, Value};
use crate::errors::{ForgeflowError, ForgeflowResult};
use crate::pipeline::{Op, Script};

/// A value or artifact supplied by the caller
///
/// The serde shape (a `type` tag plus variant fields, empty fields
/// omitted) is the persisted representation of an input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Input {
    /// An artifact loaded from a host directory
    Dir {
        path: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        include: Vec<String>,
    },

    /// An artifact loaded from a git repository
    Git {
        remote: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        r#ref: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        dir: String,
    },

    /// An artifact loaded from a container image
    Docker { r#ref: String },

    /// A value encoded as text
    Text { data: String },

    /// A value encoded as marshalled JSON
    Json { data: String },

    /// A value encoded as marshalled YAML
    Yaml { data: String },

    /// A named secret. Recognized, not implemented yet: compiling one
    /// returns [`ForgeflowError::Unsupported`].
    Secret { name: String },
}

impl Input {
    /// An artifact input from a local directory, optionally narrowed by
    /// include patterns
    pub fn dir(path: impl Into<String>, include: Vec<String>) -> Self {
        Self::Dir { path: path.into(), include }
    }

    /// An artifact input from a git repository
    pub fn git(remote: impl Into<String>, r#ref: impl Into<String>, dir: impl Into<String>) -> Self {
        Self::Git {
            remote: remote.into(),
            r#ref: r#ref.into(),
            dir: dir.into(),
        }
    }

    /// An artifact input from a container image
    pub fn docker(r#ref: impl Into<String>) -> Self {
        Self::Docker { r#ref: r#ref.into() }
    }

    /// A value input from raw text
    pub fn text(data: impl Into<String>) -> Self {
        Self::Text { data: data.into() }
    }

    /// A value input from marshalled JSON
    pub fn json(data: impl Into<String>) -> Self {
        Self::Json { data: data.into() }
    }

    /// A value input from marshalled YAML
    pub fn yaml(data: impl Into<String>) -> Self {
        Self::Yaml { data: data.into() }
    }

    /// A named secret input
    pub fn secret(name: impl Into<String>) -> Self {
        Self::Secret { name: name.into() }
    }

    /// The kind discriminant, for display
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Dir { .. } => "dir",
            Self::Git { .. } => "git",
            Self::Docker { .. } => "docker",
            Self::Text { .. } => "text",
            Self::Json { .. } => "json",
            Self::Yaml { .. } => "yaml",
            Self::Secret { .. } => "secret",
        }
    }

    /// Compile this input to a configuration value fragment
    ///
    /// Artifact inputs produce `{compute: [op]}`; value inputs produce the
    /// decoded value itself. Never panics: unsupported kinds and malformed
    /// payloads come back as errors.
    pub fn compile(&self) -> ForgeflowResult<Value> {
        let cc = Compiler::new();
        match self {
            Self::Dir { path, include } => {
                for pattern in include {
                    glob::Pattern::new(pattern).map_err(|e| ForgeflowError::Pattern {
                        pattern: pattern.clone(),
                        message: e.to_string(),
                    })?;
                }
                compute_fragment(Op::Local {
                    dir: path.clone(),
                    include: include.clone(),
                })
            }
            Self::Git { remote, r#ref, dir } => compute_fragment(Op::Git {
                remote: remote.clone(),
                r#ref: r#ref.clone(),
                dir: dir.clone(),
            }),
            Self::Docker { r#ref } => compute_fragment(Op::Docker { r#ref: r#ref.clone() }),
            Self::Text { data } => Ok(Value::from_node(json!(data))),
            Self::Json { data } => cc.decode_json("", data.as_bytes()),
            Self::Yaml { data } => cc.decode_yaml("", data.as_bytes()),
            Self::Secret { .. } => Err(ForgeflowError::unsupported("secret inputs")),
        }
    }

    /// Parse a CLI input spec of the form `kind:value`
    ///
    /// Supported kinds: `dir:PATH`, `git:REMOTE[#REF]`, `docker:REF`,
    /// `text:DATA`, `json:DATA`, `yaml:DATA`, `secret:NAME`.
    pub fn from_spec(spec: &str) -> ForgeflowResult<Self> {
        let Some((kind, rest)) = spec.split_once(':') else {
            return Err(ForgeflowError::InputSpec {
                spec: spec.to_string(),
                reason: "missing ':' separator".into(),
            });
        };
        match kind {
            "dir" => Ok(Self::dir(rest, Vec::new())),
            "git" => {
                let (remote, r#ref) = rest.split_once('#').unwrap_or((rest, ""));
                Ok(Self::git(remote, r#ref, ""))
            }
            "docker" => Ok(Self::docker(rest)),
            "text" => Ok(Self::text(rest)),
            "json" => Ok(Self::json(rest)),
            "yaml" => Ok(Self::yaml(rest)),
            "secret" => Ok(Self::secret(rest)),
            other => Err(ForgeflowError::InputSpec {
                spec: spec.to_string(),
                reason: format!("unknown input kind '{other}'"),
            }),
        }
    }
}

/// Wrap a single operation into a `{compute: [op]}` fragment by structured
/// construction.
fn compute_fragment(op: Op) -> ForgeflowResult<Value> {
    let script = Script::new(vec![op]);
    Ok(Value::from_node(json!({ "compute": serde_json::to_value(&script)? })))
}
