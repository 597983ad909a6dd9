//! Single-source shortest and longest paths on a DAG.
//!
//! # Algorithm
//!
//! Distances start as [`Distance::Unreachable`] everywhere except the source,
//! which is reached at `0`. Nodes are visited strictly in the supplied
//! topological order; each reached node relaxes every outgoing edge once,
//! parallel edges included. Because all predecessors of `u` come before it
//! in the order, `u`'s distance is final by the time its edges are relaxed.
//!
//! | Kind       | Update `v` when |
//! |------------|-----------------|
//! | `Shortest` | `v` unreachable, or `d[u] + w < d[v]` |
//! | `Longest`  | `v` unreachable, or `d[u] + w > d[v]` |
//!
//! Ties keep the first improvement, which fixes the predecessor used by
//! [`DistanceMap::path_to`].
//!
//! # Preconditions
//!
//! The graph must be acyclic and `order` must be a topological order of it.
//! Neither is verified: a bad order yields wrong distances, not an error.
//! Order entries outside `0..n` are ignored rather than indexed.

use serde::Serialize;
use strata_core::metrics::{Counter, Metrics};
use strata_core::{Edge, Graph, NodeId};
use tracing::debug;

/// Errors from the path queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("source node {node} is out of range for a graph of {size} nodes")]
    SourceOutOfRange { node: NodeId, size: usize },
}

/// Best known distance to a node.
///
/// Serializes as the number for reached nodes and `null` for unreachable
/// ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Distance {
    Unreachable,
    Reached(f64),
}

impl Distance {
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Reached(value) => Some(value),
            Self::Unreachable => None,
        }
    }

    #[must_use]
    pub const fn is_reachable(self) -> bool {
        matches!(self, Self::Reached(_))
    }
}

/// Which extreme a [`DistanceMap`] tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    Shortest,
    Longest,
}

impl PathKind {
    fn improves(self, candidate: f64, current: f64) -> bool {
        match self {
            Self::Shortest => candidate < current,
            Self::Longest => candidate > current,
        }
    }
}

/// Distances from one source, with predecessor links.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceMap {
    kind: PathKind,
    source: NodeId,
    distances: Vec<Distance>,
    #[serde(skip)]
    predecessors: Vec<Option<NodeId>>,
}

impl DistanceMap {
    fn new(kind: PathKind, source: NodeId, size: usize) -> Self {
        let mut distances = vec![Distance::Unreachable; size];
        distances[source] = Distance::Reached(0.0);
        Self {
            kind,
            source,
            distances,
            predecessors: vec![None; size],
        }
    }

    fn relax(&mut self, from: NodeId, edge: &Edge, metrics: &mut Metrics) {
        let Distance::Reached(base) = self.distances[from] else {
            return;
        };
        metrics.incr(Counter::Relaxations);

        let candidate = base + edge.weight;
        let better = match self.distances[edge.to] {
            Distance::Unreachable => true,
            Distance::Reached(current) => self.kind.improves(candidate, current),
        };
        if better {
            metrics.incr(Counter::Improvements);
            self.distances[edge.to] = Distance::Reached(candidate);
            self.predecessors[edge.to] = Some(from);
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PathKind {
        self.kind
    }

    #[must_use]
    pub const fn source(&self) -> NodeId {
        self.source
    }

    /// Number of nodes covered (the graph's node count).
    #[must_use]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Distance to `node`; out-of-range nodes are unreachable.
    #[must_use]
    pub fn get(&self, node: NodeId) -> Distance {
        self.distances
            .get(node)
            .copied()
            .unwrap_or(Distance::Unreachable)
    }

    /// Numeric distance to `node`, or `None` if it was never reached.
    #[must_use]
    pub fn distance(&self, node: NodeId) -> Option<f64> {
        self.get(node).value()
    }

    #[must_use]
    pub fn is_reachable(&self, node: NodeId) -> bool {
        self.get(node).is_reachable()
    }

    /// All distances, indexed by node id.
    #[must_use]
    pub fn distances(&self) -> &[Distance] {
        &self.distances
    }

    /// Reached nodes and their distances, in node id order.
    pub fn reached(&self) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.distances
            .iter()
            .enumerate()
            .filter_map(|(node, distance)| distance.value().map(|value| (node, value)))
    }

    /// Node preceding `node` on its best path, `None` for the source and
    /// unreached nodes.
    #[must_use]
    pub fn predecessor(&self, node: NodeId) -> Option<NodeId> {
        self.predecessors.get(node).copied().flatten()
    }

    /// Reconstruct the best path from the source to `node`, both ends
    /// included. `None` if `node` was never reached.
    ///
    /// A path never visits more than [`DistanceMap::len`] nodes. Predecessor
    /// links that loop (relaxation over a cyclic graph) also yield `None`.
    #[must_use]
    pub fn path_to(&self, node: NodeId) -> Option<Vec<NodeId>> {
        if !self.is_reachable(node) {
            return None;
        }

        let mut path = vec![node];
        let mut cursor = node;
        while let Some(previous) = self.predecessor(cursor) {
            if path.len() >= self.len() {
                return None;
            }
            path.push(previous);
            cursor = previous;
        }
        path.reverse();
        Some(path)
    }

    /// The reached node with the greatest distance, ties going to the
    /// lowest node id. On a longest-path map this is the end of the critical
    /// path from the source.
    #[must_use]
    pub fn farthest(&self) -> Option<(NodeId, f64)> {
        self.reached()
            .fold(None, |best: Option<(NodeId, f64)>, (node, value)| match best {
                Some((_, best_value)) if value <= best_value => best,
                _ => Some((node, value)),
            })
    }
}

/// Shortest distances from `source`, relaxing in `order`.
///
/// # Errors
///
/// [`PathError::SourceOutOfRange`] if `source` is not a node of `graph`.
pub fn shortest_from(graph: &Graph, order: &[NodeId], source: NodeId) -> Result<DistanceMap, PathError> {
    let [map] = relax_in_order(graph, order, source, [PathKind::Shortest], &mut Metrics::new())?;
    Ok(map)
}

/// Longest distances from `source`, relaxing in `order`.
///
/// # Errors
///
/// [`PathError::SourceOutOfRange`] if `source` is not a node of `graph`.
pub fn longest_from(graph: &Graph, order: &[NodeId], source: NodeId) -> Result<DistanceMap, PathError> {
    let [map] = relax_in_order(graph, order, source, [PathKind::Longest], &mut Metrics::new())?;
    Ok(map)
}

/// Shortest and longest distances computed in one pass over `order`.
///
/// # Errors
///
/// [`PathError::SourceOutOfRange`] if `source` is not a node of `graph`.
pub fn shortest_and_longest(
    graph: &Graph,
    order: &[NodeId],
    source: NodeId,
    metrics: &mut Metrics,
) -> Result<(DistanceMap, DistanceMap), PathError> {
    let [shortest, longest] = relax_in_order(
        graph,
        order,
        source,
        [PathKind::Shortest, PathKind::Longest],
        metrics,
    )?;
    Ok((shortest, longest))
}

fn relax_in_order<const K: usize>(
    graph: &Graph,
    order: &[NodeId],
    source: NodeId,
    kinds: [PathKind; K],
    metrics: &mut Metrics,
) -> Result<[DistanceMap; K], PathError> {
    let size = graph.size();
    if source >= size {
        return Err(PathError::SourceOutOfRange { node: source, size });
    }

    let mut maps = kinds.map(|kind| DistanceMap::new(kind, source, size));

    for &node in order {
        if node >= size {
            continue;
        }
        for edge in graph.out_edges(node) {
            for map in &mut maps {
                map.relax(node, edge, metrics);
            }
        }
    }

    debug!(
        source,
        reached = maps.first().map_or(0, |map| map.reached().count()),
        "dag relaxation finished"
    );

    Ok(maps)
}
