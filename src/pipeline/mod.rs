// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 forgeflow contributors

//! Pipeline intermediate representation
//!
//! This module defines the typed IR for build pipelines: operations tagged
//! by verb, ordered scripts, the verb schema registry, and the traversal
//! and dependency-analysis engines built on top of them.

mod op;
pub mod schema;
mod script;

pub use op::{Mount, Op};
pub use schema::{verb_spec, FieldKind, FieldSpec, VerbSpec, VERBS};
pub use script::{boot_script, Script};
