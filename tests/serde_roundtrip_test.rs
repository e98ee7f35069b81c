// SPDX-License-Identifier: Apache-2.0

//! The grouping and netlist artifacts cross a process boundary to the
//! renderer as JSON; make sure they survive the trip intact.

use ttsynth::emit_hdl::{emit_hdl, HdlOutput};
use ttsynth::kmap::{layout_kmap, KMapLayout};
use ttsynth::minimize::decode;
use ttsynth::netlist::Netlist;
use ttsynth::synth::synthesize;
use ttsynth::truth_table::TruthTable;

#[test]
fn test_kmap_layout_json_round_trip() {
    let table = TruthTable::from_packed(4, 0b0110_1001_1010_0101).unwrap();
    let expr = decode(&table).unwrap();
    let layout = layout_kmap(4, &expr.implicants).unwrap();
    let json = serde_json::to_string(&layout).unwrap();
    let back: KMapLayout = serde_json::from_str(&json).unwrap();
    assert_eq!(back, layout);
}

#[test]
fn test_netlist_json_round_trip() {
    let table = TruthTable::from_packed(3, 0b0111_0110).unwrap();
    let expr = decode(&table).unwrap();
    let netlist = synthesize(&expr).unwrap();
    let json = serde_json::to_string(&netlist).unwrap();
    let back: Netlist = serde_json::from_str(&json).unwrap();
    assert_eq!(back, netlist);
}

#[test]
fn test_hdl_output_json_round_trip() {
    let table = TruthTable::from_packed(2, 0b0110).unwrap();
    let expr = decode(&table).unwrap();
    let hdl = emit_hdl(&expr, 2);
    let json = serde_json::to_string(&hdl).unwrap();
    let back: HdlOutput = serde_json::from_str(&json).unwrap();
    assert_eq!(back, hdl);
}
