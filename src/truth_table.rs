// SPDX-License-Identifier: Apache-2.0

//! The `TruthTable` holds the user-specified input/output mapping that all
//! derived artifacts are computed from.
//!
//! Output bits are indexed by the integer value of the input assignment,
//! where variable 0 is the most significant bit. A table over `n` variables
//! always holds exactly `2^n` output bits.

use bitvec::vec::BitVec;

pub const MIN_VARS: usize = 2;
pub const MAX_VARS: usize = 5;

const VARIABLE_NAMES: [&str; MAX_VARS] = ["A", "B", "C", "D", "E"];

/// Returns the display name for the given variable index (`A` through `E`).
pub fn variable_name(var: usize) -> &'static str {
    VARIABLE_NAMES[var]
}

/// Errors arising from malformed user input to the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    /// The requested variable count is outside the supported [2, 5] range.
    VariableCountOutOfRange(usize),
    /// The output sequence length does not equal `2^num_vars`.
    WrongTableLength {
        num_vars: usize,
        expected: usize,
        actual: usize,
    },
    /// A row index is out of bounds for the table.
    RowOutOfRange { index: usize, len: usize },
}

impl std::fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidInput::VariableCountOutOfRange(n) => {
                write!(
                    f,
                    "variable count {} is outside the supported range [{}, {}]",
                    n, MIN_VARS, MAX_VARS
                )
            }
            InvalidInput::WrongTableLength {
                num_vars,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "table over {} variables must have {} rows; got {}",
                    num_vars, expected, actual
                )
            }
            InvalidInput::RowOutOfRange { index, len } => {
                write!(f, "row index {} out of bounds for table of {} rows", index, len)
            }
        }
    }
}

impl std::error::Error for InvalidInput {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthTable {
    num_vars: usize,
    outputs: BitVec,
}

impl TruthTable {
    /// Creates an all-zero table over `num_vars` variables.
    pub fn new(num_vars: usize) -> Result<Self, InvalidInput> {
        if !(MIN_VARS..=MAX_VARS).contains(&num_vars) {
            return Err(InvalidInput::VariableCountOutOfRange(num_vars));
        }
        Ok(Self {
            num_vars,
            outputs: BitVec::repeat(false, 1 << num_vars),
        })
    }

    /// Creates a table from explicit output bits; `outputs[i]` is the output
    /// for the input assignment whose integer value is `i`.
    pub fn from_outputs(num_vars: usize, outputs: &[bool]) -> Result<Self, InvalidInput> {
        let mut table = Self::new(num_vars)?;
        if outputs.len() != table.len() {
            return Err(InvalidInput::WrongTableLength {
                num_vars,
                expected: table.len(),
                actual: outputs.len(),
            });
        }
        for (i, value) in outputs.iter().enumerate() {
            table.outputs.set(i, *value);
        }
        Ok(table)
    }

    /// Creates a table from output bits packed into an integer: bit `i` of
    /// `packed` is the output for assignment `i`. Handy for sweeping all
    /// possible tables of a given width.
    pub fn from_packed(num_vars: usize, packed: u32) -> Result<Self, InvalidInput> {
        let mut table = Self::new(num_vars)?;
        for i in 0..table.len() {
            table.outputs.set(i, (packed >> i) & 1 == 1);
        }
        Ok(table)
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Number of rows, i.e. `2^num_vars`.
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn output(&self, index: usize) -> Result<bool, InvalidInput> {
        if index >= self.len() {
            return Err(InvalidInput::RowOutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(self.outputs[index])
    }

    /// Flips the output bit for the given row, returning the new value.
    pub fn toggle_output(&mut self, index: usize) -> Result<bool, InvalidInput> {
        if index >= self.len() {
            return Err(InvalidInput::RowOutOfRange {
                index,
                len: self.len(),
            });
        }
        let flipped = !self.outputs[index];
        self.outputs.set(index, flipped);
        Ok(flipped)
    }

    /// Returns the minterm indices (rows whose output is 1) in ascending
    /// order.
    pub fn minterms(&self) -> Vec<usize> {
        self.outputs.iter_ones().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_out_of_range_counts() {
        assert_eq!(
            TruthTable::new(1),
            Err(InvalidInput::VariableCountOutOfRange(1))
        );
        assert_eq!(
            TruthTable::new(6),
            Err(InvalidInput::VariableCountOutOfRange(6))
        );
        assert_eq!(TruthTable::new(2).unwrap().len(), 4);
        assert_eq!(TruthTable::new(5).unwrap().len(), 32);
    }

    #[test]
    fn test_from_outputs_length_check() {
        let err = TruthTable::from_outputs(2, &[true, false]).unwrap_err();
        assert_eq!(
            err,
            InvalidInput::WrongTableLength {
                num_vars: 2,
                expected: 4,
                actual: 2
            }
        );
    }

    #[test]
    fn test_toggle_and_minterms() {
        let mut table = TruthTable::new(3).unwrap();
        assert_eq!(table.minterms(), Vec::<usize>::new());
        assert_eq!(table.toggle_output(1), Ok(true));
        assert_eq!(table.toggle_output(6), Ok(true));
        assert_eq!(table.minterms(), vec![1, 6]);
        assert_eq!(table.toggle_output(1), Ok(false));
        assert_eq!(table.minterms(), vec![6]);
        assert!(table.toggle_output(8).is_err());
    }

    #[test]
    fn test_from_packed_matches_bit_order() {
        let table = TruthTable::from_packed(2, 0b1110).unwrap();
        assert_eq!(table.minterms(), vec![1, 2, 3]);
        assert_eq!(table.output(0), Ok(false));
        assert_eq!(table.output(3), Ok(true));
    }
}
