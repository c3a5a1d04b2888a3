// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 forgeflow contributors

//! Scripts: ordered pipelines of operations
//!
//! A [`Script`] is the typed IR an execution engine consumes. It is
//! immutable once decoded, so concurrent walks over the same script need no
//! locking; every walk owns its own accumulator state.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as Node;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::errors::{ForgeflowError, ForgeflowResult};
use crate::pipeline::{schema, Op};

/// An ordered pipeline of operations
///
/// Order is execution order and is preserved exactly through
/// compile, decode, and traversal. A script may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Script {
    ops: Vec<Op>,
}

// An absent/null pipeline is the empty script, at any nesting depth,
// mirroring the schema validator.
impl<'de> Deserialize<'de> for Script {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ops = Option::<Vec<Op>>::deserialize(deserializer)?.unwrap_or_default();
        Ok(Self { ops })
    }
}

impl Script {
    /// Create a script from a list of operations
    pub fn new(ops: Vec<Op>) -> Self {
        Self { ops }
    }

    /// The operations of this script, in execution order
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Number of top-level operations
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the script has no operations
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Validate and decode a structured node into a script
    ///
    /// All-or-nothing: either every operation at every nesting depth is
    /// valid and a fully formed script is returned, or the first schema
    /// violation is reported with its document path. A null node decodes
    /// as the empty script.
    pub fn from_node(node: &Node) -> ForgeflowResult<Self> {
        schema::validate_script(node, "")?;
        serde_json::from_value(node.clone())
            .map_err(|e| ForgeflowError::schema("", e.to_string()))
    }

    /// Visit every operation, depth-first, pre-order
    ///
    /// The visitor runs once per operation at any depth: a parent first,
    /// then each of its nested sub-pipelines in full, then the next
    /// sibling. A visitor error halts the walk immediately and is returned
    /// unmodified. The cancellation token is checked once per operation
    /// boundary; a fired token yields [`ForgeflowError::Cancelled`].
    pub fn walk<F>(&self, cancel: &CancellationToken, mut visit: F) -> ForgeflowResult<()>
    where
        F: FnMut(&Op) -> ForgeflowResult<()>,
    {
        self.walk_inner(cancel, &mut visit)
    }

    fn walk_inner(
        &self,
        cancel: &CancellationToken,
        visit: &mut dyn FnMut(&Op) -> ForgeflowResult<()>,
    ) -> ForgeflowResult<()> {
        for op in &self.ops {
            if cancel.is_cancelled() {
                return Err(ForgeflowError::Cancelled);
            }
            trace!(verb = op.verb(), "visiting op");
            visit(op)?;
            for nested in op.nested_scripts() {
                nested.walk_inner(cancel, visit)?;
            }
        }
        Ok(())
    }

    /// Collect the host directories this pipeline depends on
    ///
    /// Walks the whole tree and records the `dir` of every `local`
    /// operation at any nesting depth, in first-encountered order with
    /// duplicates collapsed. A pipeline with no `local` operations yields
    /// an empty list. A build orchestrator calls this before dispatch to
    /// know which directories must be materialized on the backend.
    pub fn local_dirs(&self, cancel: &CancellationToken) -> ForgeflowResult<Vec<String>> {
        let mut dirs: Vec<String> = Vec::new();
        self.walk(cancel, |op| {
            if let Op::Local { dir, .. } = op {
                if !dirs.iter().any(|d| d == dir) {
                    dirs.push(dir.clone());
                }
            }
            Ok(())
        })?;
        Ok(dirs)
    }
}

impl<'a> IntoIterator for &'a Script {
    type Item = &'a Op;
    type IntoIter = std::slice::Iter<'a, Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

/// The default bootstrap pipeline: seed from the current directory
///
/// An explicit constant built at call time; callers that want a different
/// seed construct their own script.
pub fn boot_script() -> Script {
    Script::new(vec![Op::Local {
        dir: ".".into(),
        include: Vec::new(),
    }])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::Compiler;

    fn token() -> CancellationToken {
        CancellationToken::new()
    }

    #[test]
    fn test_validate_empty_value() {
        let cc = Compiler::new();
        let v = cc.compile("", "compute: ~").unwrap();
        v.get("compute").validate("script").unwrap();
    }

    #[test]
    fn test_local_script() {
        let cc = Compiler::new();
        let s = cc.compile_script("", r#"[{do: "local", dir: "foo"}]"#).unwrap();

        let mut n = 0;
        s.walk(&token(), |_| {
            n += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!(n, 1);

        assert_eq!(s.local_dirs(&token()).unwrap(), vec!["foo"]);
    }

    #[test]
    fn test_walk_boot_script() {
        let cc = Compiler::new();
        let cfg = cc
            .compile("clientconfig.yaml", "bootscript: [{do: local, dir: \".\"}]")
            .unwrap();
        let script = cfg.get("bootscript").script().unwrap();
        let dirs = script.local_dirs(&token()).unwrap();
        assert_eq!(dirs, vec!["."]);

        // the built-in constant compiles to the same pipeline
        assert_eq!(boot_script(), script);
    }

    #[test]
    fn test_walk_bigger_script() {
        let cc = Compiler::new();
        let script = cc
            .compile_script(
                "boot.yaml",
                r#"
- do: local
  dir: bu
- do: copy
  from:
    - do: local
      dir: zo
- do: exec
  args: ["ls"]
  mount:
    /mnt:
      input:
        - do: local
          dir: meu
- do: copy
  from:
    - do: local
      dir: bu
"#,
            )
            .unwrap();

        let dirs = script.local_dirs(&token()).unwrap();
        // document order, duplicates collapsed to first occurrence
        assert_eq!(dirs, vec!["bu", "zo", "meu"]);
    }

    #[test]
    fn test_walk_visits_every_op_once() {
        let cc = Compiler::new();
        let script = cc
            .compile_script(
                "",
                r#"[
                    {do: "local", dir: "a"},
                    {do: "copy", from: [{do: "git", remote: "https://x/r.git"}]},
                    {do: "exec", args: ["make"], mount: {"/m": {input: [{do: "docker", ref: "alpine"}]}}}
                ]"#,
            )
            .unwrap();

        let mut verbs = Vec::new();
        script
            .walk(&token(), |op| {
                verbs.push(op.verb());
                Ok(())
            })
            .unwrap();
        // pre-order: parent before its nested scripts, document order otherwise
        assert_eq!(verbs, vec!["local", "copy", "git", "exec", "docker"]);
    }

    #[test]
    fn test_walk_deterministic() {
        let cc = Compiler::new();
        let script = cc
            .compile_script(
                "",
                r#"[{do: "exec", args: ["ls"], mount: {
                    "/b": {input: [{do: "local", dir: "b"}]},
                    "/a": {input: [{do: "local", dir: "a"}]}
                }}]"#,
            )
            .unwrap();

        let collect = || {
            let mut seq = Vec::new();
            script
                .walk(&token(), |op| {
                    seq.push(op.summary());
                    Ok(())
                })
                .unwrap();
            seq
        };
        let first = collect();
        assert_eq!(first, collect());
        // mount inputs traverse in mount-point order
        assert_eq!(first[1], "local a");
        assert_eq!(first[2], "local b");
    }

    #[test]
    fn test_walk_first_error_halts() {
        let cc = Compiler::new();
        let script = cc
            .compile_script(
                "",
                r#"[{do: "local", dir: "a"}, {do: "local", dir: "b"}, {do: "local", dir: "c"}]"#,
            )
            .unwrap();

        let mut visited = 0;
        let err = script
            .walk(&token(), |op| {
                visited += 1;
                if matches!(op, Op::Local { dir, .. } if dir == "b") {
                    return Err(ForgeflowError::unsupported("op b"));
                }
                Ok(())
            })
            .unwrap_err();

        // the exact visitor error comes back, and nothing after it ran
        assert!(matches!(err, ForgeflowError::Unsupported { ref what } if what == "op b"));
        assert_eq!(visited, 2);
    }

    #[test]
    fn test_walk_cancellation() {
        let cc = Compiler::new();
        let script = cc
            .compile_script("", r#"[{do: "local", dir: "a"}, {do: "local", dir: "b"}]"#)
            .unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();

        let mut visited = 0;
        let err = script
            .walk(&cancel, |_| {
                visited += 1;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, ForgeflowError::Cancelled));
        assert_eq!(visited, 0);
    }

    #[test]
    fn test_cancellation_observed_between_ops() {
        let cc = Compiler::new();
        let script = cc
            .compile_script("", r#"[{do: "local", dir: "a"}, {do: "local", dir: "b"}]"#)
            .unwrap();

        let cancel = CancellationToken::new();
        let mut visited = 0;
        let err = script
            .walk(&cancel, |_| {
                visited += 1;
                cancel.cancel();
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, ForgeflowError::Cancelled));
        assert_eq!(visited, 1);
    }

    #[test]
    fn test_local_dirs_none_is_empty() {
        let cc = Compiler::new();
        let script = cc
            .compile_script("", r#"[{do: "docker", ref: "alpine:3.20"}]"#)
            .unwrap();
        let dirs = script.local_dirs(&token()).unwrap();
        assert!(dirs.is_empty());
    }

    #[test]
    fn test_null_nested_pipeline_is_empty() {
        let cc = Compiler::new();
        let script = cc.compile_script("", r#"[{do: "copy", from: ~}]"#).unwrap();
        assert_eq!(script.len(), 1);
        assert!(script.ops()[0].nested_scripts()[0].is_empty());
    }

    #[test]
    fn test_empty_script_decodes() {
        let cc = Compiler::new();
        let script = cc.compile_script("", "[]").unwrap();
        assert!(script.is_empty());
        assert!(script.local_dirs(&token()).unwrap().is_empty());
    }

    #[test]
    fn test_order_preserved_through_decode() {
        let cc = Compiler::new();
        let script = cc
            .compile_script(
                "",
                r#"[{do: "git", remote: "r"}, {do: "local", dir: "d"}, {do: "export", source: "/out"}]"#,
            )
            .unwrap();
        let verbs: Vec<_> = script.ops().iter().map(Op::verb).collect();
        assert_eq!(verbs, vec!["git", "local", "export"]);
    }
}
