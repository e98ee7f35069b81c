// SPDX-License-Identifier: Apache-2.0

//! Ternary patterns over `{0, 1, -}` used by the minimizer.
//!
//! A `Cube` packs the pattern into two masks: `bits` holds the required
//! value at each cared-for position, `dont_care` marks the positions that
//! have been merged away. Variable 0 occupies the most significant pattern
//! position, matching the truth-table row indexing.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cube {
    width: usize,
    bits: u32,
    dont_care: u32,
}

impl Cube {
    /// A cube covering exactly one input assignment.
    pub fn from_minterm(width: usize, minterm: usize) -> Self {
        debug_assert!(minterm < (1usize << width));
        Self {
            width,
            bits: minterm as u32,
            dont_care: 0,
        }
    }

    /// The all-don't-care cube, covering every assignment.
    pub fn full(width: usize) -> Self {
        Self {
            width,
            bits: 0,
            dont_care: (1u32 << width) - 1,
        }
    }

    /// Parses a `{0, 1, -}` pattern string, variable 0 first.
    pub fn from_pattern(pattern: &str) -> Option<Self> {
        let width = pattern.len();
        if width == 0 || width > 32 {
            return None;
        }
        let mut bits = 0u32;
        let mut dont_care = 0u32;
        for (i, c) in pattern.chars().enumerate() {
            let pos = width - 1 - i;
            match c {
                '0' => {}
                '1' => bits |= 1 << pos,
                '-' => dont_care |= 1 << pos,
                _ => return None,
            }
        }
        Some(Self {
            width,
            bits,
            dont_care,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Count of positions required to be 1; the classic grouping key for the
    /// merge rounds.
    pub fn ones(&self) -> u32 {
        self.bits.count_ones()
    }

    /// Merges two cubes that differ in exactly one cared-for bit, widening
    /// that position to don't-care. Returns `None` if the cubes are not
    /// adjacent.
    pub fn try_join(&self, other: &Cube) -> Option<Cube> {
        if self.width != other.width || self.dont_care != other.dont_care {
            return None;
        }
        let diff = self.bits ^ other.bits;
        if diff.count_ones() != 1 {
            return None;
        }
        Some(Cube {
            width: self.width,
            bits: self.bits & !diff,
            dont_care: self.dont_care | diff,
        })
    }

    /// Whether the given assignment matches this pattern.
    pub fn covers(&self, minterm: usize) -> bool {
        let care = !self.dont_care & ((1u32 << self.width) - 1);
        (minterm as u32) & care == self.bits
    }

    /// All assignments matched by this pattern, ascending.
    pub fn minterms(&self) -> Vec<usize> {
        let mut free_positions: Vec<u32> = Vec::new();
        for i in 0..self.width as u32 {
            if (self.dont_care >> i) & 1 == 1 {
                free_positions.push(i);
            }
        }
        let mut result = Vec::with_capacity(1 << free_positions.len());
        for combo in 0..(1u32 << free_positions.len()) {
            let mut value = self.bits;
            for (k, pos) in free_positions.iter().enumerate() {
                if (combo >> k) & 1 == 1 {
                    value |= 1 << pos;
                }
            }
            result.push(value as usize);
        }
        result.sort_unstable();
        result
    }

    /// The polarity required of `var`, or `None` if the variable was merged
    /// away. Variable 0 is the most significant pattern position.
    pub fn literal_at(&self, var: usize) -> Option<bool> {
        debug_assert!(var < self.width);
        let pos = self.width - 1 - var;
        if (self.dont_care >> pos) & 1 == 1 {
            None
        } else {
            Some((self.bits >> pos) & 1 == 1)
        }
    }

    /// Renders the pattern as a `{0, 1, -}` string, variable 0 first.
    pub fn pattern(&self) -> String {
        let mut s = String::with_capacity(self.width);
        for var in 0..self.width {
            s.push(match self.literal_at(var) {
                None => '-',
                Some(true) => '1',
                Some(false) => '0',
            });
        }
        s
    }

    // Per-position rank used for the deterministic ordering: a required 0
    // sorts before a required 1, which sorts before don't-care.
    fn rank_at(&self, var: usize) -> u8 {
        match self.literal_at(var) {
            Some(false) => 0,
            Some(true) => 1,
            None => 2,
        }
    }
}

impl Ord for Cube {
    fn cmp(&self, other: &Self) -> Ordering {
        debug_assert_eq!(self.width, other.width);
        for var in 0..self.width {
            match self.rank_at(var).cmp(&other.rank_at(var)) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Cube {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Cube {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pattern())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minterm_pattern() {
        assert_eq!(Cube::from_minterm(3, 0b101).pattern(), "101");
        assert_eq!(Cube::from_minterm(4, 0b0010).pattern(), "0010");
        assert_eq!(Cube::full(3).pattern(), "---");
    }

    #[test]
    fn test_from_pattern_round_trips() {
        for pattern in ["10-", "0-00", "---", "11111"] {
            assert_eq!(Cube::from_pattern(pattern).unwrap().pattern(), pattern);
        }
        assert_eq!(Cube::from_pattern("10x"), None);
        assert_eq!(Cube::from_pattern(""), None);
    }

    #[test]
    fn test_try_join_adjacent() {
        let a = Cube::from_minterm(3, 0b101);
        let b = Cube::from_minterm(3, 0b111);
        let joined = a.try_join(&b).unwrap();
        assert_eq!(joined.pattern(), "1-1");
        assert_eq!(joined.minterms(), vec![0b101, 0b111]);
    }

    #[test]
    fn test_try_join_rejects_non_adjacent() {
        let a = Cube::from_minterm(3, 0b000);
        let b = Cube::from_minterm(3, 0b011);
        assert_eq!(a.try_join(&b), None);

        // Mismatched don't-care masks never join.
        let ab = Cube::from_minterm(3, 0b000)
            .try_join(&Cube::from_minterm(3, 0b001))
            .unwrap();
        assert_eq!(ab.try_join(&Cube::from_minterm(3, 0b100)), None);
    }

    #[test]
    fn test_covers_and_minterms_agree() {
        let cube = Cube::from_minterm(4, 0b0000)
            .try_join(&Cube::from_minterm(4, 0b0100))
            .unwrap();
        assert_eq!(cube.pattern(), "0-00");
        assert_eq!(cube.minterms(), vec![0b0000, 0b0100]);
        for m in 0..16 {
            assert_eq!(cube.covers(m), cube.minterms().contains(&m), "minterm {}", m);
        }
    }

    #[test]
    fn test_literal_at_msb_first() {
        let cube = Cube::from_minterm(3, 0b100)
            .try_join(&Cube::from_minterm(3, 0b101))
            .unwrap();
        // Pattern 10-: A=1, B=0, C merged away.
        assert_eq!(cube.literal_at(0), Some(true));
        assert_eq!(cube.literal_at(1), Some(false));
        assert_eq!(cube.literal_at(2), None);
    }

    #[test]
    fn test_ordering_required_before_dont_care() {
        let zero = Cube::from_minterm(2, 0b00);
        let one = Cube::from_minterm(2, 0b10);
        let merged = zero
            .try_join(&Cube::from_minterm(2, 0b10))
            .unwrap(); // -0
        assert!(zero < one);
        assert!(one < merged);
    }
}
