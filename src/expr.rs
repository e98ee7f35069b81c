// SPDX-License-Identifier: Apache-2.0

//! The minimized sum-of-products expression produced by the minimizer.
//!
//! Rendering contract: negation is a trailing `'`, conjunction is
//! juxtaposition, disjunction is ` + `, and the constants are the bare
//! strings `0` and `1`. Literals within a term appear in variable order.

use serde::{Deserialize, Serialize};

use crate::minimize::PrimeImplicant;
use crate::truth_table::variable_name;

/// A single variable occurrence within a product term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    pub var: usize,
    pub negated: bool,
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", variable_name(self.var))?;
        if self.negated {
            write!(f, "'")?;
        }
        Ok(())
    }
}

/// An ordered list of chosen prime implicants forming a minimal
/// sum-of-products cover. An empty implicant list is the constant 0; a
/// single implicant with no literals is the constant 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimizedExpression {
    pub num_vars: usize,
    pub implicants: Vec<PrimeImplicant>,
}

impl MinimizedExpression {
    pub fn zero(num_vars: usize) -> Self {
        Self {
            num_vars,
            implicants: Vec::new(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.implicants.is_empty()
    }

    pub fn is_one(&self) -> bool {
        self.implicants.len() == 1 && self.implicants[0].literals().is_empty()
    }

    /// The product terms in output order, each a variable-ordered literal
    /// list.
    pub fn terms(&self) -> Vec<Vec<Literal>> {
        self.implicants.iter().map(|pi| pi.literals()).collect()
    }

    /// Evaluates the expression for the input assignment whose integer value
    /// is `assignment` (variable 0 as the most significant bit).
    pub fn eval(&self, assignment: usize) -> bool {
        self.implicants.iter().any(|pi| pi.cube.covers(assignment))
    }
}

impl std::fmt::Display for MinimizedExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        if self.is_one() {
            return write!(f, "1");
        }
        for (i, term) in self.terms().iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            for literal in term {
                write!(f, "{}", literal)?;
            }
        }
        Ok(())
    }
}
