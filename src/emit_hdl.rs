// SPDX-License-Identifier: Apache-2.0

//! Renders the minimized expression as a Verilog module plus an exhaustive
//! testbench.
//!
//! The module is named `logic_circuit` with one single-bit input port per
//! variable and an output `Y` driven by one continuous assignment. Constant
//! outputs are always the sized literals `1'b0` / `1'b1` -- a hard
//! formatting contract, since downstream tooling matches on them. The
//! testbench walks all `2^n` input vectors in ascending binary order and
//! reports expected vs observed output for each; output text is byte-stable
//! for identical inputs.

use serde::{Deserialize, Serialize};

use crate::expr::MinimizedExpression;
use crate::truth_table::variable_name;

pub const MODULE_NAME: &str = "logic_circuit";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HdlOutput {
    pub code: String,
    pub testbench: String,
}

/// Emits the module and testbench for `expr` over `num_vars` variables.
pub fn emit_hdl(expr: &MinimizedExpression, num_vars: usize) -> HdlOutput {
    debug_assert_eq!(expr.num_vars, num_vars);
    HdlOutput {
        code: emit_module(expr, num_vars),
        testbench: emit_testbench(expr, num_vars),
    }
}

/// The right-hand side of the continuous assignment: `~` for NOT, `&` for
/// AND, `|` for OR; sized literals for constants.
fn assignment_rhs(expr: &MinimizedExpression) -> String {
    if expr.is_zero() {
        return "1'b0".to_string();
    }
    if expr.is_one() {
        return "1'b1".to_string();
    }
    let terms = expr.terms();
    let rendered: Vec<String> = terms
        .iter()
        .map(|term| {
            let literals: Vec<String> = term
                .iter()
                .map(|literal| {
                    if literal.negated {
                        format!("~{}", variable_name(literal.var))
                    } else {
                        variable_name(literal.var).to_string()
                    }
                })
                .collect();
            let product = literals.join(" & ");
            if terms.len() > 1 && term.len() > 1 {
                format!("({})", product)
            } else {
                product
            }
        })
        .collect();
    rendered.join(" | ")
}

fn emit_module(expr: &MinimizedExpression, num_vars: usize) -> String {
    let mut s = String::new();
    s.push_str(&format!("module {}(\n", MODULE_NAME));
    for var in 0..num_vars {
        s.push_str(&format!("  input wire {},\n", variable_name(var)));
    }
    s.push_str("  output wire Y\n");
    s.push_str(");\n");
    s.push_str(&format!("  assign Y = {};\n", assignment_rhs(expr)));
    s.push_str("endmodule\n");
    s
}

/// The expected-output literal, indexed by input vector: bit `i` holds the
/// expression value for assignment `i`, written MSB first.
fn expected_literal(expr: &MinimizedExpression, num_vars: usize) -> String {
    let rows = 1usize << num_vars;
    let mut bits = String::with_capacity(rows);
    for assignment in (0..rows).rev() {
        bits.push(if expr.eval(assignment) { '1' } else { '0' });
    }
    format!("{}'b{}", rows, bits)
}

fn emit_testbench(expr: &MinimizedExpression, num_vars: usize) -> String {
    let rows = 1usize << num_vars;
    let names: Vec<&str> = (0..num_vars).map(variable_name).collect();
    let port_connections: Vec<String> =
        names.iter().map(|n| format!(".{}({})", n, n)).collect();
    let display_format: Vec<String> = names.iter().map(|n| format!("{}=%b", n)).collect();
    let display_args = names.join(", ");

    let mut s = String::new();
    s.push_str(&format!("module {}_tb;\n", MODULE_NAME));
    for name in &names {
        s.push_str(&format!("  reg {};\n", name));
    }
    s.push_str("  wire Y;\n");
    s.push_str("  reg expected;\n");
    s.push_str("  integer i;\n");
    s.push('\n');
    s.push_str(&format!(
        "  localparam [{}:0] EXPECTED = {};\n",
        rows - 1,
        expected_literal(expr, num_vars)
    ));
    s.push('\n');
    s.push_str(&format!(
        "  {} dut({}, .Y(Y));\n",
        MODULE_NAME,
        port_connections.join(", ")
    ));
    s.push('\n');
    s.push_str("  initial begin\n");
    s.push_str(&format!(
        "    for (i = 0; i < {}; i = i + 1) begin\n",
        rows
    ));
    s.push_str(&format!(
        "      {{{}}} = i[{}:0];\n",
        display_args,
        num_vars - 1
    ));
    s.push_str("      expected = EXPECTED[i];\n");
    s.push_str("      #10;\n");
    s.push_str("      if (Y === expected)\n");
    s.push_str(&format!(
        "        $display(\"{} Y=%b expected=%b ok\", {}, Y, expected);\n",
        display_format.join(" "),
        display_args
    ));
    s.push_str("      else\n");
    s.push_str(&format!(
        "        $display(\"{} Y=%b expected=%b MISMATCH\", {}, Y, expected);\n",
        display_format.join(" "),
        display_args
    ));
    s.push_str("    end\n");
    s.push_str("    $finish;\n");
    s.push_str("  end\n");
    s.push_str("endmodule\n");
    s
}
