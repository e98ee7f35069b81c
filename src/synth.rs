// SPDX-License-Identifier: Apache-2.0

//! Builds a gate-level netlist from a minimized sum-of-products expression.
//!
//! Construction rules: one input node per referenced variable, one inverter
//! per distinct negated variable shared across all terms, one AND per
//! multi-literal term (single-literal terms feed the combiner directly),
//! one OR only when there are two or more terms, and a single output.
//! Constant expressions collapse to a constant-driven output.

use std::collections::HashMap;

use crate::expr::MinimizedExpression;
use crate::netlist::{Netlist, NetlistNode, NodeKind, NodeRef};
use crate::truth_table::variable_name;

pub const OUTPUT_NAME: &str = "Y";

/// Errors from netlist construction. These indicate malformed terms and
/// should be unreachable for minimizer output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    /// A literal references a variable index outside the expression width.
    UnknownVariable { var: usize, num_vars: usize },
    /// A term mentions the same variable more than once.
    RepeatedVariable { var: usize, term: usize },
    /// A non-constant expression contains a term with no literals.
    EmptyTerm { term: usize },
}

impl std::fmt::Display for SynthesisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SynthesisError::UnknownVariable { var, num_vars } => {
                write!(
                    f,
                    "literal references variable {} in a {}-variable expression",
                    var, num_vars
                )
            }
            SynthesisError::RepeatedVariable { var, term } => {
                write!(f, "term {} mentions variable {} more than once", term, var)
            }
            SynthesisError::EmptyTerm { term } => {
                write!(f, "term {} has no literals", term)
            }
        }
    }
}

impl std::error::Error for SynthesisError {}

/// Builder that appends nodes in topological order and deduplicates
/// inverters per variable.
struct NetlistBuilder {
    num_vars: usize,
    nodes: Vec<NetlistNode>,
    input_refs: HashMap<usize, NodeRef>,
    inverter_refs: HashMap<usize, NodeRef>,
}

impl NetlistBuilder {
    fn new(num_vars: usize) -> Self {
        Self {
            num_vars,
            nodes: Vec::new(),
            input_refs: HashMap::new(),
            inverter_refs: HashMap::new(),
        }
    }

    fn push(&mut self, kind: NodeKind, args: Vec<NodeRef>, depth: usize) -> NodeRef {
        let node_ref = NodeRef {
            id: self.nodes.len(),
        };
        self.nodes.push(NetlistNode { kind, args, depth });
        node_ref
    }

    fn add_input(&mut self, var: usize) -> NodeRef {
        debug_assert!(!self.input_refs.contains_key(&var));
        let node_ref = self.push(
            NodeKind::Input {
                name: variable_name(var).to_string(),
                var,
            },
            vec![],
            0,
        );
        self.input_refs.insert(var, node_ref);
        node_ref
    }

    /// Shared inverter for `var`; instantiated on first use.
    fn add_not(&mut self, var: usize) -> NodeRef {
        if let Some(&existing) = self.inverter_refs.get(&var) {
            return existing;
        }
        let input = self.input_refs[&var];
        let node_ref = self.push(NodeKind::Not, vec![input], 1);
        self.inverter_refs.insert(var, node_ref);
        node_ref
    }

    fn build(self, output_driver: NodeRef) -> Netlist {
        let depth = self.nodes[output_driver.id].depth + 1;
        let mut nodes = self.nodes;
        let output = NodeRef { id: nodes.len() };
        nodes.push(NetlistNode {
            kind: NodeKind::Output {
                name: OUTPUT_NAME.to_string(),
            },
            args: vec![output_driver],
            depth,
        });
        let netlist = Netlist {
            num_vars: self.num_vars,
            nodes,
            output,
        };
        netlist.check_invariants_with_debug_assert();
        netlist
    }
}

/// Synthesizes the expression into a netlist.
pub fn synthesize(expr: &MinimizedExpression) -> Result<Netlist, SynthesisError> {
    let mut builder = NetlistBuilder::new(expr.num_vars);

    if expr.is_zero() || expr.is_one() {
        let constant = builder.push(NodeKind::Const(expr.is_one()), vec![], 0);
        return Ok(builder.build(constant));
    }

    let terms = expr.terms();

    // Validate terms up front so no partial netlist is built.
    for (t, term) in terms.iter().enumerate() {
        if term.is_empty() {
            return Err(SynthesisError::EmptyTerm { term: t });
        }
        for (i, literal) in term.iter().enumerate() {
            if literal.var >= expr.num_vars {
                return Err(SynthesisError::UnknownVariable {
                    var: literal.var,
                    num_vars: expr.num_vars,
                });
            }
            if term[..i].iter().any(|other| other.var == literal.var) {
                return Err(SynthesisError::RepeatedVariable {
                    var: literal.var,
                    term: t,
                });
            }
        }
    }

    // Inputs for every referenced variable, in variable order.
    let mut referenced: Vec<usize> = terms
        .iter()
        .flatten()
        .map(|literal| literal.var)
        .collect();
    referenced.sort_unstable();
    referenced.dedup();
    for var in referenced {
        builder.add_input(var);
    }

    let mut term_outputs: Vec<NodeRef> = Vec::with_capacity(terms.len());
    for term in &terms {
        let literal_refs: Vec<NodeRef> = term
            .iter()
            .map(|literal| {
                if literal.negated {
                    builder.add_not(literal.var)
                } else {
                    builder.input_refs[&literal.var]
                }
            })
            .collect();
        let term_ref = if literal_refs.len() == 1 {
            literal_refs[0]
        } else {
            builder.push(NodeKind::And, literal_refs, 2)
        };
        term_outputs.push(term_ref);
    }

    let driver = if term_outputs.len() == 1 {
        term_outputs[0]
    } else {
        builder.push(NodeKind::Or, term_outputs, 3)
    };
    let netlist = builder.build(driver);
    log::debug!(
        "synthesize: '{}' -> {} nodes",
        expr,
        netlist.nodes.len()
    );
    Ok(netlist)
}
