// SPDX-License-Identifier: Apache-2.0

//! Deterministic truth-table decoding: a table over 2-5 Boolean variables
//! is minimized into a sum-of-products expression (Quine-McCluskey +
//! Petrick), laid out on a Gray-coded Karnaugh map, synthesized into a
//! gate-level netlist, and rendered as a Verilog module with an exhaustive
//! testbench. The `Pipeline` coordinator caches each artifact lazily and
//! invalidates all of them when the table is edited.

pub mod cube;
pub mod emit_hdl;
pub mod expr;
pub mod kmap;
pub mod minimize;
pub mod netlist;
pub mod netlist_sim;
pub mod pipeline;
pub mod synth;
pub mod truth_table;

pub use emit_hdl::{emit_hdl, HdlOutput};
pub use expr::MinimizedExpression;
pub use kmap::{layout_kmap, KMapLayout};
pub use minimize::{decode, PrimeImplicant};
pub use netlist::Netlist;
pub use pipeline::{DecodeError, Pipeline};
pub use synth::synthesize;
pub use truth_table::{InvalidInput, TruthTable};
