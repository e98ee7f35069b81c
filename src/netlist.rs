// SPDX-License-Identifier: Apache-2.0

//! Gate-level netlist produced from a minimized expression.
//!
//! Nodes live in a flat table; every argument reference points at an
//! earlier table entry, so the node order is already topological. `depth`
//! is the left-to-right layout column an external renderer should place the
//! node in: inputs in column 0, inverters in 1, product gates in 2, the
//! combining OR in 3, and the output one column past its driver.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct NodeRef {
    pub id: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Input { name: String, var: usize },
    Const(bool),
    Not,
    And,
    Or,
    Output { name: String },
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Input { .. } => "input",
            NodeKind::Const(_) => "const",
            NodeKind::Not => "not",
            NodeKind::And => "and",
            NodeKind::Or => "or",
            NodeKind::Output { .. } => "output",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetlistNode {
    pub kind: NodeKind,
    /// Ordered argument references; for gates the order matches literal
    /// order within the originating term.
    pub args: Vec<NodeRef>,
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Netlist {
    pub num_vars: usize,
    pub nodes: Vec<NetlistNode>,
    /// The single output node.
    pub output: NodeRef,
}

impl Netlist {
    pub fn get(&self, node_ref: NodeRef) -> &NetlistNode {
        &self.nodes[node_ref.id]
    }

    /// Debug-build sweep over structural invariants: in-bounds forward-only
    /// references, exactly one output node with exactly one driver.
    pub fn check_invariants_with_debug_assert(&self) {
        if !cfg!(debug_assertions) {
            return;
        }
        let mut output_count = 0;
        for (i, node) in self.nodes.iter().enumerate() {
            for arg in &node.args {
                debug_assert!(
                    arg.id < i,
                    "node %{} ({}) references %{}, which is not an earlier node",
                    i,
                    node.kind.label(),
                    arg.id
                );
            }
            if let NodeKind::Output { .. } = node.kind {
                output_count += 1;
                debug_assert_eq!(node.args.len(), 1, "output %{} must have one driver", i);
            }
        }
        debug_assert_eq!(output_count, 1, "netlist must have exactly one output");
        debug_assert!(matches!(
            self.get(self.output).kind,
            NodeKind::Output { .. }
        ));
    }

    /// Renders the node table as text, one node per line. Intended for test
    /// assertions and debugging.
    pub fn to_string(&self) -> String {
        let mut s = String::new();
        for (i, node) in self.nodes.iter().enumerate() {
            let args = node
                .args
                .iter()
                .map(|a| format!("%{}", a.id))
                .collect::<Vec<String>>()
                .join(", ");
            let desc = match &node.kind {
                NodeKind::Input { name, .. } => format!("input({})", name),
                NodeKind::Const(value) => format!("const({})", if *value { 1 } else { 0 }),
                NodeKind::Output { name } => format!("output {} = {}", name, args),
                _ => format!("{}({})", node.kind.label(), args),
            };
            s.push_str(&format!("%{} = {} @{}\n", i, desc, node.depth));
        }
        s
    }
}
