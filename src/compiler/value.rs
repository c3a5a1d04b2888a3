// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 forgeflow contributors

//! Compiled configuration values
//!
//! A [`Value`] is an immutable, structured configuration node produced by
//! the [`Compiler`](super::Compiler). Values are cheap to clone and are
//! never mutated in place; merging produces a new Value.

use std::sync::Arc;

use serde_json::Value as Node;

use crate::errors::{ForgeflowError, ForgeflowResult};
use crate::pipeline::{schema, Script};

/// An immutable, compiled configuration node
#[derive(Debug, Clone)]
pub struct Value {
    /// Source file the value was compiled from, for diagnostics
    source: Arc<str>,
    node: Arc<Node>,
}

impl Value {
    pub(crate) fn new(source: &str, node: Node) -> Self {
        Self {
            source: source.into(),
            node: Arc::new(node),
        }
    }

    /// Wrap a structured node directly, with no source attribution
    pub fn from_node(node: Node) -> Self {
        Self::new("", node)
    }

    /// Look up a field by dotted path (`"bootscript"`, `"compute.0.dir"`)
    ///
    /// List elements are addressed by numeric segments. A missing path
    /// yields an absent (null) value, so lookups chain without panicking.
    pub fn get(&self, path: &str) -> Value {
        let mut cur: &Node = &self.node;
        for seg in path.split('.').filter(|s| !s.is_empty()) {
            cur = match cur {
                Node::Object(map) => map.get(seg).unwrap_or(&Node::Null),
                Node::Array(items) => seg
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| items.get(i))
                    .unwrap_or(&Node::Null),
                _ => &Node::Null,
            };
        }
        Self::new(&self.source, cur.clone())
    }

    /// Validate this value against a named schema (`"script"` or `"op"`)
    ///
    /// An absent/null value validates as an empty pipeline.
    pub fn validate(&self, schema_name: &str) -> ForgeflowResult<()> {
        schema::validate(&self.node, schema_name, "")
    }

    /// Decode-and-validate this value as a [`Script`] in one call
    pub fn script(&self) -> ForgeflowResult<Script> {
        Script::from_node(&self.node)
    }

    /// Produce a new Value with `other` merged in at a dotted path
    ///
    /// Objects merge key-by-key, recursively; anything else is replaced.
    /// Intermediate objects are created along `at` as needed. Pass `""` to
    /// merge at the root.
    pub fn merge_at(&self, at: &str, other: &Value) -> ForgeflowResult<Value> {
        let mut root = (*self.node).clone();
        let slot = descend(&mut root, at)?;
        merge_node(slot, other.as_node());
        Ok(Self::new(&self.source, root))
    }

    /// The underlying structured node
    pub fn as_node(&self) -> &Node {
        &self.node
    }

    /// The string payload, if this value is a string scalar
    pub fn as_str(&self) -> Option<&str> {
        self.node.as_str()
    }

    /// Whether this value is absent/null
    pub fn is_null(&self) -> bool {
        self.node.is_null()
    }

    /// Source file this value was compiled from (may be empty)
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render the value as pretty-printed JSON
    pub fn to_json(&self) -> ForgeflowResult<String> {
        Ok(serde_json::to_string_pretty(&*self.node)?)
    }

    /// Render the value as YAML
    pub fn to_yaml(&self) -> ForgeflowResult<String> {
        Ok(serde_yaml::to_string(&*self.node)?)
    }
}

/// Walk `at` inside `root`, creating intermediate objects, and return the
/// slot to merge into.
fn descend<'a>(root: &'a mut Node, at: &str) -> ForgeflowResult<&'a mut Node> {
    let mut cur = root;
    for seg in at.split('.').filter(|s| !s.is_empty()) {
        if cur.is_null() {
            *cur = Node::Object(serde_json::Map::new());
        }
        cur = match cur {
            Node::Object(map) => map.entry(seg.to_string()).or_insert(Node::Null),
            _ => {
                return Err(ForgeflowError::schema(
                    at,
                    format!("cannot merge into non-object at '{seg}'"),
                ))
            }
        };
    }
    Ok(cur)
}

fn merge_node(dst: &mut Node, src: &Node) {
    match (dst, src) {
        (Node::Object(d), Node::Object(s)) => {
            for (k, v) in s {
                merge_node(d.entry(k.clone()).or_insert(Node::Null), v);
            }
        }
        (d, s) => *d = s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::Compiler;

    #[test]
    fn test_get_missing_path_is_null() {
        let cc = Compiler::new();
        let v = cc.compile("", "a: {b: 1}").unwrap();
        assert!(v.get("a.c").is_null());
        assert!(v.get("nope.deep.er").is_null());
    }

    #[test]
    fn test_get_list_index() {
        let cc = Compiler::new();
        let v = cc.compile("", "xs: [a, b]").unwrap();
        assert_eq!(v.get("xs.1").as_str(), Some("b"));
        assert!(v.get("xs.7").is_null());
    }

    #[test]
    fn test_validate_unknown_schema() {
        let v = Value::from_node(Node::Null);
        let err = v.validate("route").unwrap_err();
        assert!(matches!(err, ForgeflowError::Schema { .. }));
    }

    #[test]
    fn test_merge_at_creates_intermediates() {
        let base = Value::from_node(serde_json::json!({"name": "demo"}));
        let frag = Value::from_node(serde_json::json!({"compute": []}));
        let merged = base.merge_at("inputs.src", &frag).unwrap();
        assert_eq!(
            merged.get("inputs.src.compute").as_node(),
            &serde_json::json!([])
        );
        // the original is untouched
        assert!(base.get("inputs").is_null());
    }

    #[test]
    fn test_merge_at_objects_merge_key_by_key() {
        let base = Value::from_node(serde_json::json!({"env": {"A": "1"}}));
        let frag = Value::from_node(serde_json::json!({"B": "2"}));
        let merged = base.merge_at("env", &frag).unwrap();
        assert_eq!(merged.get("env.A").as_str(), Some("1"));
        assert_eq!(merged.get("env.B").as_str(), Some("2"));
    }

    #[test]
    fn test_merge_into_scalar_fails() {
        let base = Value::from_node(serde_json::json!({"name": "demo"}));
        let frag = Value::from_node(serde_json::json!({}));
        let err = base.merge_at("name.sub", &frag).unwrap_err();
        assert!(matches!(err, ForgeflowError::Schema { .. }));
    }
}
