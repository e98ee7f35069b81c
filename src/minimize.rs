// SPDX-License-Identifier: Apache-2.0

//! Exact two-level minimization via Quine-McCluskey with Petrick covering.
//!
//! `decode` turns a truth table into a minimal sum-of-products cover:
//! minterms are merged pairwise by popcount group until fixpoint to find the
//! prime implicants, essential implicants are selected first, dominated rows
//! are eliminated, and any remaining minterms are resolved exactly with
//! Petrick's method. Instance sizes are bounded (at most 32 minterms), so
//! the exact method is always affordable.
//!
//! All tie-breaks are deterministic: patterns order position-by-position
//! with a required 0 before a required 1 before don't-care, and equal-size
//! covers are resolved toward the smallest pattern set under that order.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::cube::Cube;
use crate::expr::{Literal, MinimizedExpression};
use crate::truth_table::{InvalidInput, TruthTable, MAX_VARS, MIN_VARS};

/// A maximal subcube consistent with the function, together with the
/// minterms it covers and whether it is the sole cover of some minterm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimeImplicant {
    pub cube: Cube,
    pub minterms: Vec<usize>,
    pub essential: bool,
}

impl PrimeImplicant {
    pub fn new(cube: Cube) -> Self {
        Self {
            minterms: cube.minterms(),
            cube,
            essential: false,
        }
    }

    /// The product-term literals, in variable order. Empty for the
    /// all-don't-care cube (the constant 1 term).
    pub fn literals(&self) -> Vec<Literal> {
        (0..self.cube.width())
            .filter_map(|var| {
                self.cube.literal_at(var).map(|value| Literal {
                    var,
                    negated: !value,
                })
            })
            .collect()
    }
}

/// Minimizes the table into a sum-of-products expression.
pub fn decode(table: &TruthTable) -> Result<MinimizedExpression, InvalidInput> {
    let num_vars = table.num_vars();
    if !(MIN_VARS..=MAX_VARS).contains(&num_vars) {
        return Err(InvalidInput::VariableCountOutOfRange(num_vars));
    }
    if table.len() != 1 << num_vars {
        return Err(InvalidInput::WrongTableLength {
            num_vars,
            expected: 1 << num_vars,
            actual: table.len(),
        });
    }

    let minterms = table.minterms();
    if minterms.is_empty() {
        return Ok(MinimizedExpression::zero(num_vars));
    }
    if minterms.len() == table.len() {
        let mut full = PrimeImplicant::new(Cube::full(num_vars));
        full.essential = true;
        return Ok(MinimizedExpression {
            num_vars,
            implicants: vec![full],
        });
    }

    let primes = prime_implicants(num_vars, &minterms);
    let implicants = select_cover(&primes, &minterms);
    log::debug!(
        "decode: {} vars, {} minterms, {} primes, {} chosen",
        num_vars,
        minterms.len(),
        primes.len(),
        implicants.len()
    );
    Ok(MinimizedExpression {
        num_vars,
        implicants,
    })
}

/// Computes all prime implicants of the minterm set by iterated single-bit
/// merging of popcount-adjacent groups.
fn prime_implicants(num_vars: usize, minterms: &[usize]) -> Vec<Cube> {
    let mut current: Vec<Cube> = minterms
        .iter()
        .map(|&m| Cube::from_minterm(num_vars, m))
        .collect();
    let mut primes: Vec<Cube> = Vec::new();
    let mut round = 0;
    loop {
        let mut groups: Vec<Vec<Cube>> = vec![Vec::new(); num_vars + 1];
        for cube in &current {
            groups[cube.ones() as usize].push(*cube);
        }
        let mut merged: Vec<Cube> = Vec::new();
        let mut used: HashSet<Cube> = HashSet::new();
        for i in 0..groups.len() - 1 {
            for a in &groups[i] {
                for b in &groups[i + 1] {
                    if let Some(joined) = a.try_join(b) {
                        merged.push(joined);
                        used.insert(*a);
                        used.insert(*b);
                    }
                }
            }
        }
        // Anything that took part in no merge this round is prime.
        for cube in groups.iter().flatten() {
            if !used.contains(cube) {
                primes.push(*cube);
            }
        }
        round += 1;
        log::debug!(
            "prime_implicants: round {} merged {} pairs into {} terms",
            round,
            used.len() / 2,
            merged.len()
        );
        if merged.is_empty() {
            break;
        }
        merged.sort();
        merged.dedup();
        current = merged;
    }
    primes.sort();
    primes.dedup();
    primes
}

/// Selects a minimal cover of `minterms` out of `primes` (which must be
/// sorted): essential rows first, then dominated-row elimination, then
/// Petrick's method for whatever is left.
fn select_cover(primes: &[Cube], minterms: &[usize]) -> Vec<PrimeImplicant> {
    let covers: Vec<Vec<usize>> = primes.iter().map(|c| c.minterms()).collect();

    let mut essential_rows: BTreeSet<usize> = BTreeSet::new();
    for &m in minterms {
        let covering: Vec<usize> = (0..primes.len())
            .filter(|&r| covers[r].contains(&m))
            .collect();
        debug_assert!(!covering.is_empty(), "minterm {} covered by no prime", m);
        if covering.len() == 1 {
            essential_rows.insert(covering[0]);
        }
    }

    let mut remaining: BTreeSet<usize> = minterms.iter().copied().collect();
    for &r in &essential_rows {
        for m in &covers[r] {
            remaining.remove(m);
        }
    }

    let chosen_rows: BTreeSet<usize> = if remaining.is_empty() {
        BTreeSet::new()
    } else {
        let candidates: Vec<usize> = (0..primes.len())
            .filter(|r| {
                !essential_rows.contains(r) && covers[*r].iter().any(|m| remaining.contains(m))
            })
            .collect();
        let live = drop_dominated_rows(primes, &covers, &remaining, candidates);
        petrick(primes, &covers, &remaining, &live)
    };

    let mut implicants = Vec::with_capacity(essential_rows.len() + chosen_rows.len());
    for &r in &essential_rows {
        implicants.push(PrimeImplicant {
            cube: primes[r],
            minterms: covers[r].clone(),
            essential: true,
        });
    }
    for &r in &chosen_rows {
        implicants.push(PrimeImplicant {
            cube: primes[r],
            minterms: covers[r].clone(),
            essential: false,
        });
    }
    implicants
}

/// Removes rows whose remaining coverage is contained in another row's.
/// Mutually dominating (equal-coverage) rows keep the smaller pattern.
fn drop_dominated_rows(
    primes: &[Cube],
    covers: &[Vec<usize>],
    remaining: &BTreeSet<usize>,
    candidates: Vec<usize>,
) -> Vec<usize> {
    let rem_cover = |r: usize| -> BTreeSet<usize> {
        covers[r]
            .iter()
            .copied()
            .filter(|m| remaining.contains(m))
            .collect()
    };
    let rem_covers: Vec<(usize, BTreeSet<usize>)> =
        candidates.iter().map(|&r| (r, rem_cover(r))).collect();

    let mut dropped: HashSet<usize> = HashSet::new();
    for (i, ci) in &rem_covers {
        for (j, cj) in &rem_covers {
            if i == j || dropped.contains(i) || dropped.contains(j) {
                continue;
            }
            if ci.is_subset(cj) && (ci != cj || primes[*j] < primes[*i]) {
                dropped.insert(*i);
            }
        }
    }
    candidates
        .into_iter()
        .filter(|r| !dropped.contains(r))
        .collect()
}

/// Petrick's method: a product-of-sums over the rows covering each
/// remaining minterm, multiplied out with absorption; the smallest product
/// wins, ties broken by the lexicographically smallest pattern set.
fn petrick(
    primes: &[Cube],
    covers: &[Vec<usize>],
    remaining: &BTreeSet<usize>,
    candidates: &[usize],
) -> BTreeSet<usize> {
    let mut products: Vec<BTreeSet<usize>> = vec![BTreeSet::new()];
    for &m in remaining {
        let sum: Vec<usize> = candidates
            .iter()
            .copied()
            .filter(|&r| covers[r].contains(&m))
            .collect();
        debug_assert!(!sum.is_empty(), "remaining minterm {} has no candidate", m);
        let mut expanded: Vec<BTreeSet<usize>> = Vec::new();
        for product in &products {
            for &r in &sum {
                let mut next = product.clone();
                next.insert(r);
                expanded.push(next);
            }
        }
        // Absorption keeps only minimal sets, which also dedups.
        expanded.sort_by_key(|p| p.len());
        let mut kept: Vec<BTreeSet<usize>> = Vec::new();
        for product in expanded {
            if !kept.iter().any(|k| k.is_subset(&product)) {
                kept.push(product);
            }
        }
        products = kept;
    }

    let pattern_key =
        |p: &BTreeSet<usize>| -> Vec<Cube> { p.iter().map(|&r| primes[r]).collect() };
    products
        .into_iter()
        .min_by(|a, b| {
            a.len()
                .cmp(&b.len())
                .then_with(|| pattern_key(a).cmp(&pattern_key(b)))
        })
        .unwrap_or_default()
}
