//! # ef_graph
//!
//! Positional graph over the nucleotides of one transcript: one node per
//! 1-based position, edges along the covalent backbone (`i <-> i+1`) and
//! across every matched base pair, uniform weight 1. Shortest-path queries
//! run classic Dijkstra, so non-uniform weights (e.g. pseudoknot or
//! tertiary-contact edges with a different cost) stay representable.

mod graph;
mod dijkstra;

pub use graph::*;
pub use dijkstra::*;
