//! Condensation: collapse every SCC into a single node.
//!
//! For each original edge `u -> v` whose endpoints sit in different
//! components, the condensation gets an edge `comp(u) -> comp(v)` with the
//! same weight. Intra-component edges (self-loops included) are dropped.
//!
//! Parallel edges between the same pair of components are kept, one per
//! original edge, in original edge order. Path relaxation handles them
//! correctly; callers that need a simple graph can run
//! [`collapse_parallel_edges`] afterwards.
//!
//! The result is acyclic: a cycle between condensation nodes would make two
//! distinct components mutually reachable.

use std::collections::HashMap;

use strata_core::{Graph, GraphError, NodeId};
use tracing::{debug, instrument};

use crate::graph::scc::Components;

/// Errors from [`build_condensation`].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CondenseError {
    #[error("partition covers {partition_nodes} nodes but the graph has {graph_nodes}")]
    PartitionMismatch {
        partition_nodes: usize,
        graph_nodes: usize,
    },
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Build the condensation of `graph` under `components`.
///
/// # Errors
///
/// Returns [`CondenseError::PartitionMismatch`] if `components` was not
/// computed for a graph of the same size.
#[instrument(skip_all, fields(nodes = graph.size(), components = components.len()))]
pub fn build_condensation(graph: &Graph, components: &Components) -> Result<Graph, CondenseError> {
    if components.node_count() != graph.size() {
        return Err(CondenseError::PartitionMismatch {
            partition_nodes: components.node_count(),
            graph_nodes: graph.size(),
        });
    }

    let lookup = components.lookup();
    let mut condensed = Graph::new(components.len());
    let mut dropped = 0_usize;

    for (from, edge) in graph.edges() {
        let (cu, cv) = (lookup[from], lookup[edge.to]);
        if cu == cv {
            dropped += 1;
            continue;
        }
        condensed.add_edge(cu, cv, edge.weight)?;
    }

    debug!(
        kept = condensed.edge_count(),
        dropped, "condensation built"
    );

    Ok(condensed)
}

/// Which weight survives when parallel edges are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepWeight {
    Min,
    Max,
}

/// Merge parallel edges so at most one edge joins any ordered node pair.
///
/// Targets keep the order of their first occurrence in each adjacency list.
///
/// # Errors
///
/// Only fails if `graph` itself violates the graph model, which a graph
/// built through [`Graph::add_edge`] never does.
pub fn collapse_parallel_edges(graph: &Graph, keep: KeepWeight) -> Result<Graph, GraphError> {
    let mut simple = Graph::new(graph.size());

    for from in graph.nodes() {
        let mut slots: HashMap<NodeId, usize> = HashMap::new();
        let mut merged: Vec<(NodeId, f64)> = Vec::new();

        for edge in graph.out_edges(from) {
            if let Some(&slot) = slots.get(&edge.to) {
                let current = &mut merged[slot].1;
                *current = match keep {
                    KeepWeight::Min => current.min(edge.weight),
                    KeepWeight::Max => current.max(edge.weight),
                };
            } else {
                slots.insert(edge.to, merged.len());
                merged.push((edge.to, edge.weight));
            }
        }

        for (to, weight) in merged {
            simple.add_edge(from, to, weight)?;
        }
    }

    Ok(simple)
}
