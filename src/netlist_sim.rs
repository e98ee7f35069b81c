// SPDX-License-Identifier: Apache-2.0

//! Reference evaluation of a netlist for a single input assignment.
//!
//! Node order is topological by construction, so a single forward pass
//! suffices; every argument value is available by the time it is needed.

use crate::netlist::{Netlist, NodeKind};

/// Evaluates the netlist for the input assignment whose integer value is
/// `assignment`, with variable 0 as the most significant bit.
pub fn eval(netlist: &Netlist, assignment: usize) -> bool {
    let mut values: Vec<bool> = Vec::with_capacity(netlist.nodes.len());
    for node in &netlist.nodes {
        let value = match &node.kind {
            NodeKind::Input { var, .. } => {
                (assignment >> (netlist.num_vars - 1 - var)) & 1 == 1
            }
            NodeKind::Const(value) => *value,
            NodeKind::Not => !values[node.args[0].id],
            NodeKind::And => node.args.iter().all(|a| values[a.id]),
            NodeKind::Or => node.args.iter().any(|a| values[a.id]),
            NodeKind::Output { .. } => values[node.args[0].id],
        };
        values.push(value);
    }
    values[netlist.output.id]
}
