// SPDX-License-Identifier: Apache-2.0

//! End-to-end property sweeps: every table for 2 and 3 variables, plus
//! seeded random tables for 4 and 5 variables. For each table the minimized
//! expression must reproduce the table exactly, the cover must be
//! irredundant, the netlist must agree with the expression everywhere, and
//! every k-map group must read back to its implicant's minterm set.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ttsynth::kmap::layout_kmap;
use ttsynth::minimize::decode;
use ttsynth::netlist_sim;
use ttsynth::synth::synthesize;
use ttsynth::truth_table::TruthTable;

fn check_table(table: &TruthTable) {
    let num_vars = table.num_vars();
    let rows = table.len();
    let expr = decode(table).unwrap();

    // Soundness: the expression reproduces every output bit.
    for assignment in 0..rows {
        assert_eq!(
            expr.eval(assignment),
            table.output(assignment).unwrap(),
            "expression '{}' diverges from table at {:b}",
            expr,
            assignment
        );
    }

    // Minimality: dropping any term loses some minterm.
    let minterm_set: BTreeSet<usize> = table.minterms().into_iter().collect();
    for skip in 0..expr.implicants.len() {
        let covered: BTreeSet<usize> = expr
            .implicants
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != skip)
            .flat_map(|(_, pi)| pi.minterms.iter().copied())
            .collect();
        assert_ne!(
            covered, minterm_set,
            "term {} of '{}' is redundant",
            skip, expr
        );
    }

    // Implicant invariants: covered set matches the pattern exactly.
    for pi in &expr.implicants {
        assert_eq!(pi.minterms, pi.cube.minterms());
        assert!(pi.minterms.iter().all(|m| minterm_set.contains(m)));
    }

    // Netlist agreement on every assignment.
    let netlist = synthesize(&expr).unwrap();
    for assignment in 0..rows {
        assert_eq!(
            netlist_sim::eval(&netlist, assignment),
            expr.eval(assignment),
            "netlist diverges from '{}' at {:b}",
            expr,
            assignment
        );
    }

    // K-map groups read back to their implicants' cells.
    let layout = layout_kmap(num_vars, &expr.implicants).unwrap();
    let num_rows = layout.cells.len();
    let num_cols = layout.cells[0].len();
    for group in &layout.groups {
        let mut seen: BTreeSet<usize> = BTreeSet::new();
        for rect in &group.rects {
            assert!(rect.row_span >= 1 && rect.col_span >= 1);
            for dr in 0..rect.row_span {
                for dc in 0..rect.col_span {
                    seen.insert(layout.cells[(rect.row + dr) % num_rows][(rect.col + dc) % num_cols]);
                }
            }
        }
        let expected: BTreeSet<usize> = group.implicant.minterms.iter().copied().collect();
        assert_eq!(
            seen, expected,
            "group for {} reads back wrong",
            group.implicant.cube.pattern()
        );
        assert!(
            group.rects.len() <= 2,
            "group for {} needs {} rectangles",
            group.implicant.cube.pattern(),
            group.rects.len()
        );
    }
}

#[test]
fn test_all_two_variable_tables() {
    let _ = env_logger::builder().is_test(true).try_init();
    for packed in 0..16u32 {
        check_table(&TruthTable::from_packed(2, packed).unwrap());
    }
}

#[test]
fn test_all_three_variable_tables() {
    let _ = env_logger::builder().is_test(true).try_init();
    for packed in 0..256u32 {
        check_table(&TruthTable::from_packed(3, packed).unwrap());
    }
}

#[test]
fn test_random_four_variable_tables() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rng = StdRng::seed_from_u64(0x74747331);
    for _ in 0..300 {
        let packed: u32 = rng.r#gen::<u32>() & 0xffff;
        check_table(&TruthTable::from_packed(4, packed).unwrap());
    }
}

#[test]
fn test_random_five_variable_tables() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rng = StdRng::seed_from_u64(0x74747335);
    for _ in 0..200 {
        let packed: u32 = rng.r#gen();
        check_table(&TruthTable::from_packed(5, packed).unwrap());
    }
}

#[test]
fn test_decode_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let packed: u32 = rng.r#gen();
        let table = TruthTable::from_packed(5, packed).unwrap();
        assert_eq!(decode(&table).unwrap(), decode(&table).unwrap());
    }
}
