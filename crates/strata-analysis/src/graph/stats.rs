//! Summary statistics for a graph and its condensation.
//!
//! - **density**: `edge_count / (node_count * (node_count - 1))`, zero for
//!   graphs with fewer than two nodes. Parallel edges count separately, so
//!   a multigraph can exceed 1.0.
//! - **cyclic_component_count**: components with more than one member or a
//!   self-loop.
//! - **weakly_connected_component_count**: components of the graph with edge
//!   direction ignored.
//! - **isolated_node_count**: nodes with neither in- nor out-edges.

use petgraph::algo::connected_components;
use serde::Serialize;
use strata_core::Graph;
use strata_core::interop::to_petgraph;

use crate::graph::scc::Components;

/// Summary statistics, computed by [`GraphStats::compute`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub density: f64,
    pub self_loop_count: usize,
    /// Number of strongly connected components (condensation node count).
    pub component_count: usize,
    pub cyclic_component_count: usize,
    pub largest_component: usize,
    pub weakly_connected_component_count: usize,
    pub isolated_node_count: usize,
    pub max_in_degree: usize,
    pub max_out_degree: usize,
    pub condensation_edge_count: usize,
}

impl GraphStats {
    /// Compute statistics for `graph`, its `components`, and the
    /// `condensation` built from them.
    #[must_use]
    pub fn compute(graph: &Graph, components: &Components, condensation: &Graph) -> Self {
        let node_count = graph.size();
        let edge_count = graph.edge_count();
        let in_degrees = graph.in_degrees();

        let self_loop_count = graph.edges().filter(|(from, edge)| *from == edge.to).count();

        let cyclic_component_count = (0..components.len())
            .filter(|&component| components.is_cyclic(component, graph))
            .count();

        let isolated_node_count = graph
            .nodes()
            .filter(|&node| in_degrees[node] == 0 && graph.out_edges(node).is_empty())
            .count();

        let max_out_degree = graph
            .nodes()
            .map(|node| graph.out_edges(node).len())
            .max()
            .unwrap_or(0);

        Self {
            node_count,
            edge_count,
            density: compute_density(node_count, edge_count),
            self_loop_count,
            component_count: components.len(),
            cyclic_component_count,
            largest_component: components.largest(),
            weakly_connected_component_count: connected_components(&to_petgraph(graph)),
            isolated_node_count,
            max_in_degree: in_degrees.iter().copied().max().unwrap_or(0),
            max_out_degree,
            condensation_edge_count: condensation.edge_count(),
        }
    }

    /// Returns `true` if the graph is already acyclic (every component is a
    /// singleton without a self-loop).
    #[must_use]
    pub const fn is_acyclic(&self) -> bool {
        self.cyclic_component_count == 0
    }
}

#[allow(clippy::cast_precision_loss)]
fn compute_density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0;
    }
    edge_count as f64 / (node_count * (node_count - 1)) as f64
}
