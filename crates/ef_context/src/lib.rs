//! # ef_context
//!
//! Classifies the structural elements of a transcript relative to an A-to-I
//! editing position: each element either contains the position, lies wholly
//! 5' of it (before), or lies 3' of it (after). The signed distances to the
//! surrounding elements index the "N nearest upstream/downstream elements"
//! feature set used by editing-level models.

mod context;

pub use context::*;
