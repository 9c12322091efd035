//! # editfold
//!
//! Unified API for RNA editing-site structural-context analysis.
//!
//! This crate re-exports the main functionality from its submodules and adds
//! the bpRNA `.st` multi-record reader consumed by the command-line tools.

pub mod st_parsers;

pub mod structure {
    pub use ::ef_structure::*;
}

pub mod graph {
    pub use ::ef_graph::*;
}

pub mod context {
    pub use ::ef_context::*;
}
