use std::ops::{Deref, DerefMut};
use std::convert::TryFrom;
use crate::StructureError;
use crate::{DotBracket, DotBracketVec};

/// Base-pair partner table, 0-based: `table[i] == Some(j)` iff positions `i`
/// and `j` are paired. Built by matching brackets left to right with a stack
/// of open positions; unbalanced input is a hard error, never silently
/// truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairTable(pub Vec<Option<usize>>);

impl PairTable {
    /// Number of matched base pairs.
    pub fn pair_count(&self) -> usize {
        self.0.iter().flatten().count() / 2
    }

    /// All base pairs `(i, j)` with `i < j`, 0-based, in 5'-to-3' order of
    /// the opening position.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.iter().enumerate().filter_map(|(i, &partner)| match partner {
            Some(j) if j > i => Some((i, j)),
            _ => None,
        })
    }
}

impl Deref for PairTable {
    type Target = [Option<usize>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PairTable {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl TryFrom<&str> for PairTable {
    type Error = StructureError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut stack = Vec::new();
        let mut table = vec![None; s.len()];

        for (i, c) in s.chars().enumerate() {
            match c {
                '(' => stack.push(i),
                ')' => {
                    let j = stack.pop().ok_or(StructureError::UnmatchedClose(i))?;
                    table[i] = Some(j);
                    table[j] = Some(i);
                }
                '.' => (),
                _ => return Err(StructureError::InvalidToken(format!("character '{}'", c), "structure".to_string(), i)),
            }
        }

        if let Some(i) = stack.pop() {
            return Err(StructureError::UnmatchedOpen(i));
        }
        Ok(PairTable(table))
    }
}

impl TryFrom<&DotBracketVec> for PairTable {
    type Error = StructureError;

    fn try_from(db: &DotBracketVec) -> Result<Self, Self::Error> {
        let mut stack: Vec<usize> = Vec::new();
        let mut table = vec![None; db.len()];

        for (i, dot) in db.iter().enumerate() {
            match dot {
                DotBracket::Open => stack.push(i),
                DotBracket::Close => {
                    let j = stack.pop().ok_or(StructureError::UnmatchedClose(i))?;
                    table[i] = Some(j);
                    table[j] = Some(i);
                }
                DotBracket::Unpaired => {}
            }
        }

        if let Some(i) = stack.pop() {
            return Err(StructureError::UnmatchedOpen(i));
        }

        Ok(PairTable(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_pair_table() {
        let pt = PairTable::try_from("((..))").unwrap();
        assert_eq!(pt.len(), 6);
        assert_eq!(pt[0], Some(5));
        assert_eq!(pt[1], Some(4));
        assert_eq!(pt[2], None);
        assert_eq!(pt[3], None);
        assert_eq!(pt[4], Some(1));
        assert_eq!(pt[5], Some(0));
    }

    #[test]
    fn test_unmatched_open() {
        let err = PairTable::try_from("(((.)").unwrap_err();
        assert!(matches!(err, StructureError::UnmatchedOpen(_)));
    }

    #[test]
    fn test_unmatched_open_position() {
        let err = PairTable::try_from("(()").unwrap_err();
        assert_eq!(format!("{}", err), "Unmatched '(' at position 0");
    }

    #[test]
    fn test_unmatched_close() {
        let err = PairTable::try_from("())").unwrap_err();
        assert_eq!(format!("{}", err), "Unmatched ')' at position 2");
    }

    #[test]
    fn test_invalid_token() {
        let err = PairTable::try_from("(x)").unwrap_err();
        assert_eq!(format!("{}", err), "Invalid character 'x' in structure at position 1");
    }

    #[test]
    fn test_pair_count_and_pairs() {
        let pt = PairTable::try_from("..((((....))))...").unwrap();
        assert_eq!(pt.pair_count(), 4);
        let pairs: Vec<_> = pt.pairs().collect();
        assert_eq!(pairs, vec![(2, 13), (3, 12), (4, 11), (5, 10)]);
    }

    #[test]
    fn test_empty_and_single() {
        let pt = PairTable::try_from("").unwrap();
        assert_eq!(pt.len(), 0);
        let pt = PairTable::try_from(".").unwrap();
        assert_eq!(pt.len(), 1);
        assert_eq!(pt.pair_count(), 0);
    }

    #[test]
    fn test_round_trip_through_dot_bracket_vec() {
        let s = ".((..)).()";
        let pt = PairTable::try_from(s).unwrap();
        let dbv = DotBracketVec::from(&pt);
        let pt2 = PairTable::try_from(&dbv).unwrap();
        assert_eq!(pt, pt2);
        assert_eq!(dbv.to_string(), s);
    }
}
