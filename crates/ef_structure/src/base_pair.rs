use std::fmt;

/// A single base pair: the 5' and 3' partner, each a nucleotide with its
/// 1-based position. Immutable once constructed; having exactly one entry on
/// each side is guaranteed by the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasePair {
    left: (char, usize),
    right: (char, usize),
}

impl BasePair {
    pub fn new(left: (char, usize), right: (char, usize)) -> Self {
        BasePair { left, right }
    }

    pub fn left_nt(&self) -> char {
        self.left.0
    }

    pub fn left_position(&self) -> usize {
        self.left.1
    }

    pub fn right_nt(&self) -> char {
        self.right.0
    }

    pub fn right_position(&self) -> usize {
        self.right.1
    }

    /// The pair as `G:C`.
    pub fn nt_pair_string(&self) -> String {
        format!("{}:{}", self.left.0, self.right.0)
    }
}

impl fmt::Display for BasePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{}) ({}, {})", self.left.1, self.right.1, self.left.0, self.right.0)
    }
}
