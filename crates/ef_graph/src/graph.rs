use std::convert::TryFrom;

use ahash::AHashMap;
use serde::Serialize;

use ef_structure::DotBracketVec;
use ef_structure::PairTable;
use ef_structure::SecondaryStructure;
use ef_structure::StructureError;

/// Optional per-node payload: the nucleotide and its bpRNA annotation letter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodePayload {
    pub nucleotide: Option<char>,
    pub annotation: Option<char>,
}

/// One directed edge as emitted to downstream consumers, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EdgeRecord {
    pub source: usize,
    pub target: usize,
}

/// The positional graph of one transcript.
///
/// Static once built: the node set is exactly `{1..=L}`, every edge is stored
/// in both directions with the same weight, and adjacency lists keep a fixed
/// order (base-pair partner first, then downstream neighbor `i+1`, then
/// upstream neighbor `i-1`) so that equal-length shortest paths resolve
/// deterministically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryStructureGraph {
    payloads: Vec<NodePayload>,
    adjacency: Vec<Vec<usize>>,
    weights: AHashMap<(usize, usize), u32>,
    pairs: Vec<(usize, usize)>,
}

impl SecondaryStructureGraph {
    fn from_pair_table(pt: &PairTable) -> Self {
        let len = pt.len();
        let mut graph = SecondaryStructureGraph {
            payloads: vec![NodePayload::default(); len],
            adjacency: vec![Vec::new(); len],
            weights: AHashMap::default(),
            pairs: pt.pairs().map(|(i, j)| (i + 1, j + 1)).collect(),
        };

        for &(u, v) in &graph.pairs {
            graph.adjacency[u - 1].push(v);
            graph.adjacency[v - 1].push(u);
            graph.weights.insert((u, v), 1);
            graph.weights.insert((v, u), 1);
        }

        // a pair between backbone neighbors (as in "()") already carries
        // the edge; skip the backbone insertion to keep each direction unique
        for p in 1..=len {
            if p < len && pt[p - 1] != Some(p) {
                graph.adjacency[p - 1].push(p + 1);
                graph.weights.insert((p, p + 1), 1);
                graph.weights.insert((p + 1, p), 1);
            }
            if p > 1 && pt[p - 1] != Some(p - 2) {
                graph.adjacency[p - 1].push(p - 1);
            }
        }

        graph
    }

    /// Build from a parsed record, attaching sequence and annotation letters
    /// as node payloads.
    pub fn from_structure(structure: &SecondaryStructure) -> Result<Self, StructureError> {
        let pt = structure.pair_table()?;
        let mut graph = Self::from_pair_table(&pt);
        for (payload, (nt, ann)) in graph
            .payloads
            .iter_mut()
            .zip(structure.sequence().chars().zip(structure.annotation().chars()))
        {
            payload.nucleotide = Some(nt);
            payload.annotation = Some(ann);
        }
        Ok(graph)
    }

    /// Number of nodes (the transcript length).
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Backbone edges, counted once per undirected edge: `L - 1` for any
    /// transcript with at least one nucleotide.
    pub fn backbone_edge_count(&self) -> usize {
        self.len().saturating_sub(1)
    }

    /// Base-pair edges, counted once per undirected edge.
    pub fn pair_edge_count(&self) -> usize {
        self.pairs.len()
    }

    /// The base pairs `(i, j)` with `i < j`, 1-based, in 5'-to-3' order of
    /// the opening position.
    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    pub fn payload(&self, pos: usize) -> Option<&NodePayload> {
        if pos == 0 {
            return None;
        }
        self.payloads.get(pos - 1)
    }

    /// Neighbors of `pos` in the pinned adjacency order.
    pub fn neighbors(&self, pos: usize) -> Option<&[usize]> {
        if pos == 0 {
            return None;
        }
        self.adjacency.get(pos - 1).map(Vec::as_slice)
    }

    /// Weight of the edge between two adjacent positions.
    pub fn weight(&self, u: usize, v: usize) -> Option<u32> {
        self.weights.get(&(u, v)).copied()
    }

    pub(crate) fn adjacency(&self) -> &[Vec<usize>] {
        &self.adjacency
    }

    /// Every directed edge present in the graph, in adjacency order.
    pub fn edge_list(&self) -> Vec<EdgeRecord> {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(i, neighbors)| {
                neighbors.iter().map(move |&v| EdgeRecord { source: i + 1, target: v })
            })
            .collect()
    }

    /// Re-flatten the base-pair edges into dot-bracket notation.
    pub fn to_dot_bracket(&self) -> DotBracketVec {
        let mut table = vec![None; self.len()];
        for &(u, v) in &self.pairs {
            table[u - 1] = Some(v - 1);
            table[v - 1] = Some(u - 1);
        }
        DotBracketVec::from(&PairTable(table))
    }
}

impl TryFrom<&str> for SecondaryStructureGraph {
    type Error = StructureError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let pt = PairTable::try_from(s)?;
        Ok(Self::from_pair_table(&pt))
    }
}

impl TryFrom<&DotBracketVec> for SecondaryStructureGraph {
    type Error = StructureError;

    fn try_from(db: &DotBracketVec) -> Result<Self, Self::Error> {
        let pt = PairTable::try_from(db)?;
        Ok(Self::from_pair_table(&pt))
    }
}

impl From<&PairTable> for SecondaryStructureGraph {
    fn from(pt: &PairTable) -> Self {
        Self::from_pair_table(pt)
    }
}
