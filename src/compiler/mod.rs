// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 forgeflow contributors

//! Configuration compiler adapter
//!
//! Turns configuration source text (YAML, a superset of JSON) and raw
//! JSON/YAML payloads into immutable, structured [`Value`]s. The adapter is
//! synchronous, performs no network I/O, and returns errors rather than
//! aborting. The configuration language grammar itself is not specified
//! here; anything that parses into a structured document is accepted, and
//! schema checking happens against the pipeline verb registry.

mod value;

pub use value::Value;

use tracing::debug;

use crate::errors::{ForgeflowError, ForgeflowResult};
use crate::pipeline::Script;

/// Compiler for configuration source and raw data payloads
#[derive(Debug, Clone, Copy, Default)]
pub struct Compiler;

impl Compiler {
    /// Create a new compiler
    pub fn new() -> Self {
        Self
    }

    /// Compile configuration source text into a [`Value`]
    ///
    /// `path` is the source file name used in diagnostics; pass `""` for
    /// anonymous sources.
    pub fn compile(&self, path: &str, source: &str) -> ForgeflowResult<Value> {
        debug!(path, bytes = source.len(), "compiling configuration source");

        let doc: serde_yaml::Value = serde_yaml::from_str(source)
            .map_err(|e| ForgeflowError::compile(path, e.to_string()))?;

        let node = serde_json::to_value(doc)
            .map_err(|e| ForgeflowError::compile(path, e.to_string()))?;

        Ok(Value::new(path, node))
    }

    /// Decode a raw JSON payload into a [`Value`]
    pub fn decode_json(&self, path: &str, data: &[u8]) -> ForgeflowResult<Value> {
        debug!(path, bytes = data.len(), "decoding JSON payload");

        let node: serde_json::Value = serde_json::from_slice(data)?;
        Ok(Value::new(path, node))
    }

    /// Decode a raw YAML payload into a [`Value`]
    pub fn decode_yaml(&self, path: &str, data: &[u8]) -> ForgeflowResult<Value> {
        debug!(path, bytes = data.len(), "decoding YAML payload");

        let doc: serde_yaml::Value = serde_yaml::from_slice(data)?;
        let node = serde_json::to_value(doc)
            .map_err(|e| ForgeflowError::Decode {
                format: "YAML".into(),
                message: e.to_string(),
            })?;
        Ok(Value::new(path, node))
    }

    /// Compile source text and decode it as a [`Script`] in one call
    pub fn compile_script(&self, path: &str, source: &str) -> ForgeflowResult<Script> {
        self.compile(path, source)?.script()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_yaml_source() {
        let cc = Compiler::new();
        let v = cc.compile("", "name: demo\ncompute:\n  - {do: local, dir: foo}\n").unwrap();
        assert_eq!(v.get("name").as_str(), Some("demo"));
        assert_eq!(v.get("compute.0.dir").as_str(), Some("foo"));
    }

    #[test]
    fn test_compile_json_compatible_source() {
        // YAML is a superset of JSON, so inline JSON documents compile too
        let cc = Compiler::new();
        let v = cc.compile("", r#"[{"do": "local", "dir": "foo"}]"#).unwrap();
        assert_eq!(v.get("0.do").as_str(), Some("local"));
    }

    #[test]
    fn test_compile_malformed_source() {
        let cc = Compiler::new();
        let err = cc.compile("bad.yaml", "foo: [unterminated").unwrap_err();
        assert!(matches!(err, ForgeflowError::Compile { ref path, .. } if path == "bad.yaml"));
    }

    #[test]
    fn test_compile_empty_source() {
        let cc = Compiler::new();
        let v = cc.compile("", "").unwrap();
        assert!(v.is_null());
    }

    #[test]
    fn test_decode_json_malformed() {
        let cc = Compiler::new();
        let err = cc.decode_json("", b"{not json").unwrap_err();
        assert!(matches!(err, ForgeflowError::Decode { .. }));
    }

    #[test]
    fn test_decode_yaml_payload() {
        let cc = Compiler::new();
        let v = cc.decode_yaml("", b"answer: 42").unwrap();
        assert_eq!(v.get("answer").as_node(), &serde_json::json!(42));
    }

    #[test]
    fn test_compile_script_one_call() {
        let cc = Compiler::new();
        let s = cc.compile_script("", r#"[{do: "local", dir: "foo"}]"#).unwrap();
        assert_eq!(s.len(), 1);
    }
}
