//! # ef_structure
//!
//! Secondary structure representations for the editfold toolkit: dot-bracket
//! notation, pair tables, sequence spans, base pairs, typed structural
//! elements and the bpRNA element-record parser.

mod error;
mod dotbracket;
mod pair_table;
mod span;
mod base_pair;
mod element;
mod record;
mod secondary_structure;

pub use error::*;
pub use dotbracket::*;
pub use pair_table::*;
pub use span::*;
pub use base_pair::*;
pub use element::*;
pub use record::*;
pub use secondary_structure::*;

/// Nucleotide positions are 1-based in every public contract of this
/// workspace; 0-based indexing is confined to `PairTable` and to internal
/// array access. A position is only meaningful relative to the length of the
/// transcript it belongs to.
pub type Position = usize;
