use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

use serde::Serialize;

use crate::SecondaryStructureGraph;

#[derive(Debug)]
pub enum GraphError {
    PositionOutOfRange { position: usize, len: usize },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::PositionOutOfRange { position, len } => {
                write!(f, "Position {} outside the node range 1..={}", position, len)
            }
        }
    }
}

impl std::error::Error for GraphError {}

/// A shortest path between two positions, source and target included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortestPath {
    pub positions: Vec<usize>,
    pub length: u32,
}

/// One all-pairs distance entry, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DistanceRecord {
    pub source: usize,
    pub target: usize,
    pub distance: u32,
}

impl SecondaryStructureGraph {
    /// Dijkstra over the adjacency lists. Predecessors are recorded only on
    /// strict improvement and neighbors are relaxed in adjacency order, with
    /// heap ties broken by the lower position, so equal-length shortest
    /// paths resolve deterministically.
    fn dijkstra(&self, source: usize, target: Option<usize>) -> (Vec<Option<u32>>, Vec<Option<usize>>) {
        let len = self.len();
        let mut dist: Vec<Option<u32>> = vec![None; len];
        let mut prev: Vec<Option<usize>> = vec![None; len];
        let mut heap: BinaryHeap<Reverse<(u32, usize)>> = BinaryHeap::new();

        dist[source - 1] = Some(0);
        heap.push(Reverse((0, source)));

        while let Some(Reverse((d, u))) = heap.pop() {
            if dist[u - 1] != Some(d) {
                continue; // stale entry
            }
            if target == Some(u) {
                break;
            }
            for &v in &self.adjacency()[u - 1] {
                let w = self.weight(u, v).unwrap_or(1);
                let candidate = d + w;
                if dist[v - 1].is_none_or(|cur| candidate < cur) {
                    dist[v - 1] = Some(candidate);
                    prev[v - 1] = Some(u);
                    heap.push(Reverse((candidate, v)));
                }
            }
        }

        (dist, prev)
    }

    fn check_position(&self, position: usize) -> Result<(), GraphError> {
        if position == 0 || position > self.len() {
            return Err(GraphError::PositionOutOfRange { position, len: self.len() });
        }
        Ok(())
    }

    /// Shortest distance from `source` to every position; `None` entries are
    /// unreachable (which cannot occur for a backbone-connected transcript).
    pub fn distances_from(&self, source: usize) -> Result<Vec<Option<u32>>, GraphError> {
        self.check_position(source)?;
        Ok(self.dijkstra(source, None).0)
    }

    /// Shortest distance and path from `source` to `target`.
    pub fn shortest_path(&self, source: usize, target: usize) -> Result<Option<ShortestPath>, GraphError> {
        self.check_position(source)?;
        self.check_position(target)?;

        let (dist, prev) = self.dijkstra(source, Some(target));
        let Some(length) = dist[target - 1] else {
            return Ok(None);
        };

        let mut positions = vec![target];
        let mut current = target;
        while current != source {
            match prev[current - 1] {
                Some(p) => {
                    positions.push(p);
                    current = p;
                }
                None => unreachable!("finite distance implies a predecessor chain"),
            }
        }
        positions.reverse();

        Ok(Some(ShortestPath { positions, length }))
    }

    /// Shortest distance between every ordered pair of distinct positions:
    /// O(V) single-source runs, O(V (V+E) log V) overall. Budget accordingly
    /// for transcripts beyond a few thousand nucleotides.
    pub fn all_pairs_distances(&self) -> Vec<DistanceRecord> {
        let len = self.len();
        let mut records = Vec::with_capacity(len.saturating_sub(1) * len);

        for source in 1..=len {
            let (dist, _) = self.dijkstra(source, None);
            for (i, d) in dist.into_iter().enumerate() {
                let target = i + 1;
                if target == source {
                    continue;
                }
                if let Some(distance) = d {
                    records.push(DistanceRecord { source, target, distance });
                }
            }
        }

        records
    }
}
