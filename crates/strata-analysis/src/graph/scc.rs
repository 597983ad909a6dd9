//! Strongly connected components via Tarjan's algorithm.
//!
//! # Algorithm
//!
//! A single depth-first pass assigns every node a discovery index and a
//! low-link (the smallest discovery index reachable through the DFS subtree
//! plus at most one edge back into a node still on the component stack).
//! When a node finishes with `low == index` it is the root of a component:
//! everything above it on the component stack, down to and including it,
//! is popped as one component.
//!
//! The DFS runs on an explicit heap-allocated frame stack of
//! `(node, edge cursor)` pairs; the parent of a frame is the frame below it.
//! Long chains therefore cost heap memory, never native stack depth.
//!
//! # Output order
//!
//! Components are emitted in the order their roots close, which is a
//! reverse topological order of the condensation. Roots are tried in
//! ascending node id order and edges in insertion order, so the result is
//! deterministic for a fixed graph. Members of each component are sorted
//! ascending.

use fixedbitset::FixedBitSet;
use strata_core::metrics::{Counter, Metrics};
use strata_core::{Graph, NodeId};
use tracing::debug;

/// Errors from [`Components::from_sets`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PartitionError {
    #[error("node {node} is out of range for a partition of {size} nodes")]
    OutOfRange { node: NodeId, size: usize },
    #[error("node {0} appears in more than one component")]
    Duplicate(NodeId),
    #[error("node {0} does not belong to any component")]
    Missing(NodeId),
    #[error("component {0} is empty")]
    EmptyComponent(usize),
}

/// A partition of the nodes `0..n` into components.
///
/// Every node belongs to exactly one component. Component `i` becomes node
/// `i` of the condensation graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Components {
    sets: Vec<Vec<NodeId>>,
    component_of: Vec<usize>,
}

impl Components {
    /// Validate and wrap an explicit partition of `0..node_count`.
    ///
    /// Members of each set are sorted; set order is kept.
    ///
    /// # Errors
    ///
    /// Returns a [`PartitionError`] unless the sets are non-empty, disjoint,
    /// and together cover `0..node_count`.
    pub fn from_sets(node_count: usize, mut sets: Vec<Vec<NodeId>>) -> Result<Self, PartitionError> {
        let mut component_of: Vec<Option<usize>> = vec![None; node_count];

        for (component, members) in sets.iter_mut().enumerate() {
            if members.is_empty() {
                return Err(PartitionError::EmptyComponent(component));
            }
            members.sort_unstable();
            for &node in members.iter() {
                let slot = component_of.get_mut(node).ok_or(PartitionError::OutOfRange {
                    node,
                    size: node_count,
                })?;
                if slot.replace(component).is_some() {
                    return Err(PartitionError::Duplicate(node));
                }
            }
        }

        let component_of = component_of
            .into_iter()
            .enumerate()
            .map(|(node, component)| component.ok_or(PartitionError::Missing(node)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { sets, component_of })
    }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Number of nodes the partition covers.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.component_of.len()
    }

    /// Component id of `node`, or `None` if `node` is out of range.
    #[must_use]
    pub fn component_of(&self, node: NodeId) -> Option<usize> {
        self.component_of.get(node).copied()
    }

    /// Node → component lookup, indexed by node id.
    #[must_use]
    pub fn lookup(&self) -> &[usize] {
        &self.component_of
    }

    /// Sorted members of component `component`.
    #[must_use]
    pub fn members(&self, component: usize) -> Option<&[NodeId]> {
        self.sets.get(component).map(Vec::as_slice)
    }

    /// Components in emission order.
    pub fn iter(&self) -> impl Iterator<Item = &[NodeId]> + '_ {
        self.sets.iter().map(Vec::as_slice)
    }

    /// Size of the largest component (zero for an empty partition).
    #[must_use]
    pub fn largest(&self) -> usize {
        self.sets.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Returns `true` if `component` contains a cycle in `graph`: more than
    /// one member, or a single member with a self-loop.
    #[must_use]
    pub fn is_cyclic(&self, component: usize, graph: &Graph) -> bool {
        match self.members(component) {
            Some([node]) => graph.has_edge(*node, *node),
            Some(members) => members.len() > 1,
            None => false,
        }
    }
}

/// Find the strongly connected components of `graph`.
#[must_use]
pub fn find_components(graph: &Graph) -> Components {
    find_components_with_metrics(graph, &mut Metrics::new())
}

/// [`find_components`], counting DFS visits, scanned edges and stack pops.
#[must_use]
pub fn find_components_with_metrics(graph: &Graph, metrics: &mut Metrics) -> Components {
    let mut tarjan = Tarjan::new(graph, metrics);
    for root in graph.nodes() {
        if tarjan.index[root].is_none() {
            tarjan.run_from(root);
        }
    }

    let Tarjan {
        sets, component_of, ..
    } = tarjan;

    debug!(
        nodes = graph.size(),
        components = sets.len(),
        "tarjan finished"
    );

    Components { sets, component_of }
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    node: NodeId,
    cursor: usize,
}

struct Tarjan<'a> {
    graph: &'a Graph,
    metrics: &'a mut Metrics,
    index: Vec<Option<usize>>,
    low: Vec<usize>,
    on_stack: FixedBitSet,
    stack: Vec<NodeId>,
    frames: Vec<Frame>,
    next_index: usize,
    sets: Vec<Vec<NodeId>>,
    component_of: Vec<usize>,
}

impl<'a> Tarjan<'a> {
    fn new(graph: &'a Graph, metrics: &'a mut Metrics) -> Self {
        let n = graph.size();
        Self {
            graph,
            metrics,
            index: vec![None; n],
            low: vec![0; n],
            on_stack: FixedBitSet::with_capacity(n),
            stack: Vec::new(),
            frames: Vec::new(),
            next_index: 0,
            sets: Vec::new(),
            component_of: vec![0; n],
        }
    }

    fn discover(&mut self, node: NodeId) {
        self.index[node] = Some(self.next_index);
        self.low[node] = self.next_index;
        self.next_index += 1;
        self.stack.push(node);
        self.on_stack.insert(node);
        self.frames.push(Frame { node, cursor: 0 });
        self.metrics.incr(Counter::DfsVisits);
    }

    fn run_from(&mut self, root: NodeId) {
        self.discover(root);

        while let Some(frame) = self.frames.last_mut() {
            let node = frame.node;
            let edge = self.graph.out_edges(node).get(frame.cursor).copied();
            if edge.is_some() {
                frame.cursor += 1;
            }

            if let Some(edge) = edge {
                self.metrics.incr(Counter::EdgesScanned);
                let next = edge.to;
                match self.index[next] {
                    None => self.discover(next),
                    Some(next_index) if self.on_stack.contains(next) => {
                        self.low[node] = self.low[node].min(next_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            // Every edge of `node` is done: fold its low-link into the parent
            // frame, then close a component if `node` is a root.
            self.frames.pop();
            if let Some(parent) = self.frames.last() {
                self.low[parent.node] = self.low[parent.node].min(self.low[node]);
            }
            if self.index[node] == Some(self.low[node]) {
                self.close_component(node);
            }
        }
    }

    fn close_component(&mut self, root: NodeId) {
        let component = self.sets.len();
        let mut members = Vec::new();
        while let Some(member) = self.stack.pop() {
            self.metrics.incr(Counter::StackPops);
            self.on_stack.set(member, false);
            self.component_of[member] = component;
            members.push(member);
            if member == root {
                break;
            }
        }
        members.sort_unstable();
        self.sets.push(members);
    }
}
