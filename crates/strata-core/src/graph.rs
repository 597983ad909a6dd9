//! Weighted directed graph keyed by dense integer node ids.
//!
//! # Overview
//!
//! Nodes are the integers `0..n` where `n` is fixed at construction. Each
//! node owns an ordered adjacency list of outgoing [`Edge`]s, kept in
//! insertion order. The graph is append-only: edges can be added while it is
//! being built, but never removed or re-weighted.
//!
//! All per-node state used by the analysis stages lives in flat `Vec`s
//! indexed by node id, so a [`Graph`] is just the adjacency arena plus a
//! cached edge count.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// Dense node identifier in `0..n`.
pub type NodeId = usize;

/// A directed, weighted edge stored in the adjacency list of its source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Target node.
    pub to: NodeId,
    /// Edge weight. Always finite.
    pub weight: f64,
}

/// A weighted directed graph over nodes `0..n`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Graph {
    adjacency: Vec<Vec<Edge>>,
    edge_count: usize,
}

impl Graph {
    /// Create a graph with `size` nodes and no edges.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); size],
            edge_count: 0,
        }
    }

    /// Append a directed edge `from -> to` with the given weight.
    ///
    /// Parallel edges and self-loops are allowed; each is stored separately.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] if either endpoint is not in
    /// `[0, size)`, and [`GraphError::NonFiniteWeight`] for NaN or infinite
    /// weights. The graph is left unchanged on error.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, weight: f64) -> Result<(), GraphError> {
        let size = self.size();
        for node in [from, to] {
            if node >= size {
                return Err(GraphError::OutOfRange { node, size });
            }
        }
        if !weight.is_finite() {
            return Err(GraphError::NonFiniteWeight { from, to, weight });
        }

        self.adjacency[from].push(Edge { to, weight });
        self.edge_count += 1;
        Ok(())
    }

    /// Outgoing edges of `node` in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] if `node` is not in `[0, size)`.
    pub fn neighbors(&self, node: NodeId) -> Result<&[Edge], GraphError> {
        self.adjacency
            .get(node)
            .map(Vec::as_slice)
            .ok_or(GraphError::OutOfRange {
                node,
                size: self.size(),
            })
    }

    /// Outgoing edges of `node`, or an empty slice if `node` is out of range.
    ///
    /// Intended for loops over [`Graph::nodes`], where the range check of
    /// [`Graph::neighbors`] can never fail.
    #[must_use]
    pub fn out_edges(&self, node: NodeId) -> &[Edge] {
        self.adjacency.get(node).map_or(&[], Vec::as_slice)
    }

    /// Number of nodes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.adjacency.len()
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Total number of stored edges, counting parallel edges separately.
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// The node id range `0..size`.
    #[must_use]
    pub fn nodes(&self) -> Range<NodeId> {
        0..self.size()
    }

    /// Iterate over every edge as `(source, edge)`, grouped by source in
    /// ascending order and in insertion order within a source.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, &Edge)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(from, edges)| edges.iter().map(move |edge| (from, edge)))
    }

    /// In-degree of every node, counting parallel edges separately.
    #[must_use]
    pub fn in_degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.size()];
        for (_, edge) in self.edges() {
            degrees[edge.to] += 1;
        }
        degrees
    }

    /// Returns `true` if some stored edge goes from `from` to `to`.
    #[must_use]
    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.out_edges(from).iter().any(|edge| edge.to == to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_graph_has_isolated_nodes() {
        let graph = Graph::new(3);
        assert_eq!(graph.size(), 3);
        assert_eq!(graph.edge_count(), 0);
        for node in graph.nodes() {
            assert_eq!(graph.neighbors(node), Ok(&[][..]));
        }
    }

    #[test]
    fn add_edge_preserves_insertion_order() {
        let mut graph = Graph::new(4);
        graph.add_edge(0, 3, 1.0).expect("edge 0->3");
        graph.add_edge(0, 1, -2.5).expect("edge 0->1");
        graph.add_edge(0, 2, 0.0).expect("edge 0->2");

        let targets: Vec<NodeId> = graph
            .neighbors(0)
            .expect("node 0 in range")
            .iter()
            .map(|edge| edge.to)
            .collect();
        assert_eq!(targets, vec![3, 1, 2]);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn add_edge_keeps_parallel_edges_and_self_loops() {
        let mut graph = Graph::new(2);
        graph.add_edge(0, 1, 5.0).expect("first parallel edge");
        graph.add_edge(0, 1, 2.0).expect("second parallel edge");
        graph.add_edge(1, 1, 1.0).expect("self-loop");

        assert_eq!(graph.out_edges(0).len(), 2);
        assert!(graph.has_edge(1, 1));
        assert_eq!(graph.in_degrees(), vec![0, 3]);
    }

    #[test]
    fn add_edge_rejects_out_of_range_endpoints() {
        let mut graph = Graph::new(2);

        assert_eq!(
            graph.add_edge(2, 0, 1.0),
            Err(GraphError::OutOfRange { node: 2, size: 2 })
        );
        assert_eq!(
            graph.add_edge(0, 5, 1.0),
            Err(GraphError::OutOfRange { node: 5, size: 2 })
        );
        assert_eq!(graph.edge_count(), 0, "failed insert must not mutate");
    }

    #[test]
    fn add_edge_rejects_non_finite_weights() {
        let mut graph = Graph::new(2);
        assert!(matches!(
            graph.add_edge(0, 1, f64::NAN),
            Err(GraphError::NonFiniteWeight { from: 0, to: 1, .. })
        ));
        assert!(graph.add_edge(0, 1, f64::INFINITY).is_err());
        assert!(graph.out_edges(0).is_empty());
    }

    #[test]
    fn neighbors_out_of_range_is_an_error() {
        let graph = Graph::new(1);
        assert_eq!(
            graph.neighbors(1),
            Err(GraphError::OutOfRange { node: 1, size: 1 })
        );
        assert!(graph.out_edges(1).is_empty());
    }

    #[test]
    fn edges_iterates_grouped_by_source() {
        let mut graph = Graph::new(3);
        graph.add_edge(2, 0, 1.0).expect("edge 2->0");
        graph.add_edge(0, 1, 1.0).expect("edge 0->1");
        graph.add_edge(0, 2, 1.0).expect("edge 0->2");

        let pairs: Vec<(NodeId, NodeId)> = graph.edges().map(|(u, e)| (u, e.to)).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (2, 0)]);
    }

    #[test]
    fn empty_graph() {
        let graph = Graph::default();
        assert!(graph.is_empty());
        assert_eq!(graph.nodes().count(), 0);
        assert!(graph.in_degrees().is_empty());
    }
}
