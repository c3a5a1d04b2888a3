// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 forgeflow contributors

//! Verb registry and schema validation
//!
//! The verb set is open-ended: each verb is described by a [`VerbSpec`]
//! naming its fields and which of them hold nested sub-pipelines. Adding a
//! verb means adding a registry row and an [`Op`](super::Op) variant; the
//! traversal engine never changes.
//!
//! Validation is all-or-nothing. Either the whole document satisfies the
//! Script/Op schema at every nesting depth, or the first violation is
//! returned with its dotted document path (`1.from.0.do`).

use serde_json::Value as Node;

use crate::errors::{ForgeflowError, ForgeflowResult};

/// The kind of a verb field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A string scalar
    Str,
    /// A list of strings
    StrList,
    /// A map of string values
    StrMap,
    /// A nested pipeline (validated recursively as a Script)
    Pipeline,
    /// A map of mount points, each with an optional `input` pipeline
    MountMap,
}

/// Schema of one field of a verb
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

/// Schema of one verb
#[derive(Debug, Clone, Copy)]
pub struct VerbSpec {
    pub verb: &'static str,
    pub fields: &'static [FieldSpec],
}

impl VerbSpec {
    fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of the fields of this verb holding nested sub-pipelines
    pub fn pipeline_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(|f| matches!(f.kind, FieldKind::Pipeline | FieldKind::MountMap))
            .map(|f| f.name)
    }
}

/// The registered pipeline verbs
pub const VERBS: &[VerbSpec] = &[
    VerbSpec {
        verb: "local",
        fields: &[
            FieldSpec { name: "dir", kind: FieldKind::Str, required: true },
            FieldSpec { name: "include", kind: FieldKind::StrList, required: false },
        ],
    },
    VerbSpec {
        verb: "git",
        fields: &[
            FieldSpec { name: "remote", kind: FieldKind::Str, required: true },
            FieldSpec { name: "ref", kind: FieldKind::Str, required: false },
            FieldSpec { name: "dir", kind: FieldKind::Str, required: false },
        ],
    },
    VerbSpec {
        verb: "docker",
        fields: &[FieldSpec { name: "ref", kind: FieldKind::Str, required: true }],
    },
    VerbSpec {
        verb: "copy",
        fields: &[
            FieldSpec { name: "from", kind: FieldKind::Pipeline, required: true },
            FieldSpec { name: "src", kind: FieldKind::Str, required: false },
            FieldSpec { name: "dest", kind: FieldKind::Str, required: false },
        ],
    },
    VerbSpec {
        verb: "exec",
        fields: &[
            FieldSpec { name: "args", kind: FieldKind::StrList, required: true },
            FieldSpec { name: "env", kind: FieldKind::StrMap, required: false },
            FieldSpec { name: "dir", kind: FieldKind::Str, required: false },
            FieldSpec { name: "mount", kind: FieldKind::MountMap, required: false },
        ],
    },
    VerbSpec {
        verb: "load",
        fields: &[FieldSpec { name: "from", kind: FieldKind::Pipeline, required: true }],
    },
    VerbSpec {
        verb: "export",
        fields: &[
            FieldSpec { name: "source", kind: FieldKind::Str, required: true },
            FieldSpec { name: "format", kind: FieldKind::Str, required: false },
        ],
    },
];

/// Look up the spec for a verb
pub fn verb_spec(name: &str) -> Option<&'static VerbSpec> {
    VERBS.iter().find(|s| s.verb == name)
}

/// Validate a node against a named schema (`"script"` or `"op"`)
pub fn validate(node: &Node, schema_name: &str, path: &str) -> ForgeflowResult<()> {
    match schema_name {
        "script" => validate_script(node, path),
        "op" => validate_op(node, path),
        other => Err(ForgeflowError::schema(
            path,
            format!("unknown schema '{other}'"),
        )),
    }
}

/// Validate a node as a Script: an ordered list of valid Ops
///
/// An absent/null node is the empty pipeline, which is valid.
pub fn validate_script(node: &Node, path: &str) -> ForgeflowResult<()> {
    match node {
        Node::Null => Ok(()),
        Node::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                validate_op(item, &join(path, i))?;
            }
            Ok(())
        }
        _ => Err(ForgeflowError::schema(
            path,
            format!("expected a list of operations, found {}", kind_name(node)),
        )),
    }
}

/// Validate a node as a single Op
pub fn validate_op(node: &Node, path: &str) -> ForgeflowResult<()> {
    let Node::Object(fields) = node else {
        return Err(ForgeflowError::schema(
            path,
            format!("expected an operation, found {}", kind_name(node)),
        ));
    };

    let verb = match fields.get("do") {
        Some(Node::String(v)) => v,
        Some(other) => {
            return Err(ForgeflowError::schema(
                join(path, "do"),
                format!("verb must be a string, found {}", kind_name(other)),
            ))
        }
        None => {
            return Err(ForgeflowError::schema(path, "missing 'do' verb"));
        }
    };

    let Some(spec) = verb_spec(verb) else {
        return Err(ForgeflowError::schema(
            join(path, "do"),
            format!("unknown verb '{verb}'"),
        ));
    };

    for (name, value) in fields {
        if name == "do" {
            continue;
        }
        let Some(field) = spec.field(name) else {
            return Err(ForgeflowError::schema(
                join(path, name),
                format!("unknown field '{name}' for verb '{verb}'"),
            ));
        };
        validate_field(value, field.kind, &join(path, name))?;
    }

    for field in spec.fields {
        if field.required && !fields.contains_key(field.name) {
            return Err(ForgeflowError::schema(
                path,
                format!("verb '{verb}' requires field '{}'", field.name),
            ));
        }
    }

    Ok(())
}

fn validate_field(node: &Node, kind: FieldKind, path: &str) -> ForgeflowResult<()> {
    match kind {
        FieldKind::Str => {
            if !node.is_string() {
                return Err(ForgeflowError::schema(
                    path,
                    format!("expected a string, found {}", kind_name(node)),
                ));
            }
            Ok(())
        }
        FieldKind::StrList => match node {
            Node::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if !item.is_string() {
                        return Err(ForgeflowError::schema(
                            join(path, i),
                            format!("expected a string, found {}", kind_name(item)),
                        ));
                    }
                }
                Ok(())
            }
            _ => Err(ForgeflowError::schema(
                path,
                format!("expected a list of strings, found {}", kind_name(node)),
            )),
        },
        FieldKind::StrMap => match node {
            Node::Object(map) => {
                for (k, v) in map {
                    if !v.is_string() {
                        return Err(ForgeflowError::schema(
                            join(path, k),
                            format!("expected a string, found {}", kind_name(v)),
                        ));
                    }
                }
                Ok(())
            }
            _ => Err(ForgeflowError::schema(
                path,
                format!("expected a map of strings, found {}", kind_name(node)),
            )),
        },
        FieldKind::Pipeline => validate_script(node, path),
        FieldKind::MountMap => match node {
            Node::Object(points) => {
                for (point, entry) in points {
                    let Node::Object(entry_fields) = entry else {
                        return Err(ForgeflowError::schema(
                            join(path, point),
                            format!("expected a mount, found {}", kind_name(entry)),
                        ));
                    };
                    for (k, v) in entry_fields {
                        match k.as_str() {
                            "input" => {
                                validate_script(v, &join(&join(path, point), "input"))?;
                            }
                            _ => {
                                return Err(ForgeflowError::schema(
                                    join(&join(path, point), k),
                                    format!("unknown field '{k}' for mount"),
                                ))
                            }
                        }
                    }
                }
                Ok(())
            }
            _ => Err(ForgeflowError::schema(
                path,
                format!("expected a map of mounts, found {}", kind_name(node)),
            )),
        },
    }
}

fn join(prefix: &str, seg: impl std::fmt::Display) -> String {
    if prefix.is_empty() {
        seg.to_string()
    } else {
        format!("{prefix}.{seg}")
    }
}

fn kind_name(node: &Node) -> &'static str {
    match node {
        Node::Null => "null",
        Node::Bool(_) => "a bool",
        Node::Number(_) => "a number",
        Node::String(_) => "a string",
        Node::Array(_) => "a list",
        Node::Object(_) => "a map",
    }
}
