//! Topological ordering via Kahn's algorithm.
//!
//! Ties between nodes that become ready at the same time are broken first
//! in, first out: the initial queue holds the zero in-degree nodes in
//! ascending id order, and later nodes are enqueued in the order their last
//! incoming edge is consumed. The order is deterministic for a fixed graph,
//! though not the only valid one.
//!
//! A cycle is reported as `None`. Nodes on or behind a cycle never reach
//! in-degree zero, so the emitted prefix is shorter than `n`; that partial
//! prefix is discarded rather than returned.

use std::collections::VecDeque;

use strata_core::metrics::{Counter, Metrics};
use strata_core::{Graph, NodeId};
use tracing::debug;

use crate::graph::scc::Components;

/// Sort `graph` topologically, or return `None` if it contains a cycle.
#[must_use]
pub fn topological_sort(graph: &Graph) -> Option<Vec<NodeId>> {
    topological_sort_with_metrics(graph, &mut Metrics::new())
}

/// [`topological_sort`], counting queue traffic and scanned edges.
#[must_use]
pub fn topological_sort_with_metrics(graph: &Graph, metrics: &mut Metrics) -> Option<Vec<NodeId>> {
    let n = graph.size();
    let mut in_degree = graph.in_degrees();

    let mut queue: VecDeque<NodeId> = graph.nodes().filter(|&node| in_degree[node] == 0).collect();
    metrics.add(Counter::QueuePushes, queue.len() as u64);

    let mut order = Vec::with_capacity(n);
    while let Some(node) = queue.pop_front() {
        metrics.incr(Counter::QueuePops);
        order.push(node);

        for edge in graph.out_edges(node) {
            metrics.incr(Counter::EdgesScanned);
            let remaining = &mut in_degree[edge.to];
            *remaining -= 1;
            if *remaining == 0 {
                queue.push_back(edge.to);
                metrics.incr(Counter::QueuePushes);
            }
        }
    }

    if order.len() == n {
        Some(order)
    } else {
        debug!(emitted = order.len(), nodes = n, "cycle detected");
        None
    }
}

/// Returns `true` if `order` lists every node of `graph` exactly once and
/// every edge points forward in it.
#[must_use]
pub fn is_topological_order(graph: &Graph, order: &[NodeId]) -> bool {
    if order.len() != graph.size() {
        return false;
    }

    let mut position: Vec<Option<usize>> = vec![None; graph.size()];
    for (rank, &node) in order.iter().enumerate() {
        let Some(slot) = position.get_mut(node) else {
            return false;
        };
        if slot.replace(rank).is_some() {
            return false;
        }
    }

    graph
        .edges()
        .all(|(from, edge)| position[from] < position[edge.to])
}

/// Expand an order over condensation nodes into an order over the original
/// nodes, listing each component's members in ascending id order.
///
/// Component ids that `components` does not know are skipped.
#[must_use]
pub fn expand_order(order: &[usize], components: &Components) -> Vec<NodeId> {
    let mut expanded = Vec::with_capacity(components.node_count());
    for &component in order {
        if let Some(members) = components.members(component) {
            expanded.extend_from_slice(members);
        }
    }
    expanded
}
