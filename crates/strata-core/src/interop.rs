//! Conversions between [`Graph`] and petgraph's [`DiGraph`].
//!
//! Node `i` of a [`Graph`] maps to `NodeIndex::new(i)` and back; edges keep
//! their weights and per-source insertion order.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::error::GraphError;
use crate::graph::Graph;

/// Copy `graph` into a petgraph `DiGraph` with unit node weights.
#[must_use]
pub fn to_petgraph(graph: &Graph) -> DiGraph<(), f64> {
    let mut out = DiGraph::with_capacity(graph.size(), graph.edge_count());
    for _ in graph.nodes() {
        out.add_node(());
    }
    for (from, edge) in graph.edges() {
        out.add_edge(NodeIndex::new(from), NodeIndex::new(edge.to), edge.weight);
    }
    out
}

/// Build a [`Graph`] from any petgraph `DiGraph` with `f64` edge weights.
///
/// # Errors
///
/// Returns [`GraphError::NonFiniteWeight`] if an edge weight is NaN or
/// infinite.
pub fn from_petgraph<N>(graph: &DiGraph<N, f64>) -> Result<Graph, GraphError> {
    let mut out = Graph::new(graph.node_count());
    // Sort by source so each adjacency list keeps petgraph's per-source
    // insertion order.
    let mut edges: Vec<_> = graph.edge_references().collect();
    edges.sort_by_key(|edge| (edge.source().index(), edge.id().index()));
    for edge in edges {
        out.add_edge(edge.source().index(), edge.target().index(), *edge.weight())?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn round_trip_preserves_edges() {
        let mut graph = Graph::new(3);
        graph.add_edge(0, 1, 1.5).expect("edge");
        graph.add_edge(0, 2, -1.0).expect("edge");
        graph.add_edge(2, 0, 4.0).expect("edge");
        graph.add_edge(0, 1, 3.0).expect("parallel edge");

        let pg = to_petgraph(&graph);
        assert_eq!(pg.node_count(), 3);
        assert_eq!(pg.edge_count(), 4);

        let back = from_petgraph(&pg).expect("finite weights");
        assert_eq!(back, graph);
    }

    #[test]
    fn from_petgraph_rejects_nan() {
        let mut pg = DiGraph::<&str, f64>::new();
        let a = pg.add_node("a");
        let b = pg.add_node("b");
        pg.add_edge(a, b, f64::NAN);

        assert!(matches!(
            from_petgraph(&pg),
            Err(GraphError::NonFiniteWeight { from: 0, to: 1, .. })
        ));
    }

    proptest! {
        #[test]
        fn random_graphs_roundtrip(graph in arb_graph()) {
            let pg = to_petgraph(&graph);
            prop_assert_eq!(pg.node_count(), graph.size());
            prop_assert_eq!(pg.edge_count(), graph.edge_count());
            prop_assert_eq!(from_petgraph(&pg), Ok(graph));
        }
    }

    fn arb_graph() -> impl Strategy<Value = Graph> {
        (0_usize..12).prop_flat_map(|n| {
            let edge = (0..n.max(1), 0..n.max(1), -100.0_f64..100.0);
            prop::collection::vec(edge, 0..40).prop_map(move |edges| {
                let mut graph = Graph::new(n);
                for (u, v, w) in edges {
                    // Empty graphs draw from 0..1 and take no edges.
                    if u < n && v < n {
                        graph.add_edge(u, v, w).expect("generated edge is in range");
                    }
                }
                graph
            })
        })
    }
}
