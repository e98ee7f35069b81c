// SPDX-License-Identifier: Apache-2.0

//! Karnaugh-map layout: places every minterm in a Gray-coded grid and
//! computes, for each chosen implicant, the wrapping rectangles an external
//! renderer should draw around its cells.
//!
//! The axis split is fixed by the variable count: `A\B` (2x2), `A\BC`
//! (2x4), `AB\CD` (4x4), and `AB\CDE` as a single 4x8 grid. Headers follow
//! the reflected Gray sequence so that adjacent cells differ in one bit and
//! both axes are cyclic.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::minimize::PrimeImplicant;
use crate::truth_table::{MAX_VARS, MIN_VARS};

/// Errors from the layout stage. These indicate an implicant that is not a
/// well-formed subcube and should be unreachable for minimizer output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    VariableCountOutOfRange(usize),
    /// An implicant's pattern width does not match the grid's variable
    /// count.
    WidthMismatch { pattern: String, num_vars: usize },
    /// Reading the rectangles back did not reproduce the implicant's cells.
    DecompositionMismatch { pattern: String },
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutError::VariableCountOutOfRange(n) => {
                write!(f, "cannot lay out a map for {} variables", n)
            }
            LayoutError::WidthMismatch { pattern, num_vars } => {
                write!(
                    f,
                    "implicant '{}' does not fit a {}-variable map",
                    pattern, num_vars
                )
            }
            LayoutError::DecompositionMismatch { pattern } => {
                write!(
                    f,
                    "rectangle decomposition does not reproduce implicant '{}'",
                    pattern
                )
            }
        }
    }
}

impl std::error::Error for LayoutError {}

/// A grid rectangle starting at `(row, col)` and extending `row_span` rows
/// and `col_span` columns, wrapping past the grid edge where the start plus
/// span exceeds the axis length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KMapRect {
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
}

/// The drawable grouping for one chosen implicant. The color index equals
/// the implicant's position in the minimizer output, so renderers can keep
/// expression terms and map groups visually in sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub color: usize,
    pub implicant: PrimeImplicant,
    pub rects: Vec<KMapRect>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KMapLayout {
    pub num_vars: usize,
    /// Variable indices labelling the row axis (e.g. `[0, 1]` for `AB`).
    pub row_vars: Vec<usize>,
    pub col_vars: Vec<usize>,
    /// Gray-ordered header values for each row, `row_vars` bits wide.
    pub row_headers: Vec<usize>,
    pub col_headers: Vec<usize>,
    /// `cells[row][col]` is the minterm index placed at that position.
    pub cells: Vec<Vec<usize>>,
    pub groups: Vec<Group>,
}

fn gray(i: usize) -> usize {
    i ^ (i >> 1)
}

fn gray_sequence(bits: usize) -> Vec<usize> {
    (0..1usize << bits).map(gray).collect()
}

/// Lays out the map grid and one group per implicant, in implicant order.
pub fn layout_kmap(
    num_vars: usize,
    implicants: &[PrimeImplicant],
) -> Result<KMapLayout, LayoutError> {
    if !(MIN_VARS..=MAX_VARS).contains(&num_vars) {
        return Err(LayoutError::VariableCountOutOfRange(num_vars));
    }
    let row_bits = num_vars / 2;
    let col_bits = num_vars - row_bits;
    let row_headers = gray_sequence(row_bits);
    let col_headers = gray_sequence(col_bits);

    let cells: Vec<Vec<usize>> = row_headers
        .iter()
        .map(|&r| {
            col_headers
                .iter()
                .map(|&c| (r << col_bits) | c)
                .collect()
        })
        .collect();

    let mut groups = Vec::with_capacity(implicants.len());
    for (color, implicant) in implicants.iter().enumerate() {
        if implicant.cube.width() != num_vars {
            return Err(LayoutError::WidthMismatch {
                pattern: implicant.cube.pattern(),
                num_vars,
            });
        }
        let rects = decompose(&cells, implicant)?;
        groups.push(Group {
            color,
            implicant: implicant.clone(),
            rects,
        });
    }

    Ok(KMapLayout {
        num_vars,
        row_vars: (0..row_bits).collect(),
        col_vars: (row_bits..num_vars).collect(),
        row_headers,
        col_headers,
        cells,
        groups,
    })
}

/// Splits the implicant's occupied rows and columns into maximal cyclic
/// runs and takes their cross product as the rectangle set, verifying the
/// result by reading every rectangle back.
fn decompose(cells: &[Vec<usize>], implicant: &PrimeImplicant) -> Result<Vec<KMapRect>, LayoutError> {
    let num_rows = cells.len();
    let num_cols = cells[0].len();

    let mut rows: BTreeSet<usize> = BTreeSet::new();
    let mut cols: BTreeSet<usize> = BTreeSet::new();
    for (r, row) in cells.iter().enumerate() {
        for (c, &minterm) in row.iter().enumerate() {
            if implicant.cube.covers(minterm) {
                rows.insert(r);
                cols.insert(c);
            }
        }
    }
    if rows.is_empty() {
        return Err(LayoutError::DecompositionMismatch {
            pattern: implicant.cube.pattern(),
        });
    }

    let mut rects = Vec::new();
    for (row, row_span) in cyclic_runs(&rows, num_rows) {
        for (col, col_span) in cyclic_runs(&cols, num_cols) {
            rects.push(KMapRect {
                row,
                col,
                row_span,
                col_span,
            });
        }
    }

    // Read the rectangles back; they must tile the implicant's cells
    // exactly, with no overlap between rectangles.
    let mut seen: BTreeSet<usize> = BTreeSet::new();
    for rect in &rects {
        for dr in 0..rect.row_span {
            for dc in 0..rect.col_span {
                let r = (rect.row + dr) % num_rows;
                let c = (rect.col + dc) % num_cols;
                if !seen.insert(cells[r][c]) {
                    return Err(LayoutError::DecompositionMismatch {
                        pattern: implicant.cube.pattern(),
                    });
                }
            }
        }
    }
    let expected: BTreeSet<usize> = implicant.minterms.iter().copied().collect();
    if seen != expected {
        return Err(LayoutError::DecompositionMismatch {
            pattern: implicant.cube.pattern(),
        });
    }
    log::debug!(
        "kmap: implicant {} -> {} rect(s)",
        implicant.cube.pattern(),
        rects.len()
    );
    Ok(rects)
}

/// Decomposes a position set on a cyclic axis of length `len` into maximal
/// runs, returned as `(start, span)` sorted by start position.
fn cyclic_runs(set: &BTreeSet<usize>, len: usize) -> Vec<(usize, usize)> {
    if set.len() == len {
        return vec![(0, len)];
    }
    let mut runs = Vec::new();
    for &start in set {
        let before = (start + len - 1) % len;
        if set.contains(&before) {
            continue; // Not the head of a run.
        }
        let mut span = 1;
        while set.contains(&((start + span) % len)) {
            span += 1;
        }
        runs.push((start, span));
    }
    runs
}
