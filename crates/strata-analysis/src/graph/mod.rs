//! Component structure of a weighted directed graph.
//!
//! # Pipeline
//!
//! ```text
//! Graph (may contain cycles)
//!        ↓  scc::find_components()
//! Components (partition of 0..n, reverse topological emission order)
//!        ↓  condense::build_condensation()
//! Graph (one node per component, acyclic)
//!        ↓  topo::topological_sort()
//! Vec<NodeId> (Kahn order of the condensation)
//! ```
//!
//! Each stage takes its input by shared reference and owns its working
//! state, so a graph can be analysed repeatedly without copying.

pub mod condense;
pub mod scc;
pub mod stats;
pub mod topo;

pub use condense::{CondenseError, KeepWeight, build_condensation, collapse_parallel_edges};
pub use scc::{Components, PartitionError, find_components, find_components_with_metrics};
pub use stats::GraphStats;
pub use topo::{expand_order, is_topological_order, topological_sort, topological_sort_with_metrics};
