#![forbid(unsafe_code)]
//! strata-analysis library.
//!
//! Strongly connected components, condensation, topological ordering and
//! single-source shortest/longest paths over the condensation DAG.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums per stage, all convertible into
//!   [`PipelineError`]. A cycle is not an error: [`topological_sort`]
//!   returns `None`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//! - **Metrics**: every algorithm has a `*_with_metrics` variant; the plain
//!   variant discards the counters.

pub mod graph;
pub mod paths;
pub mod pipeline;

pub use graph::{
    Components, CondenseError, GraphStats, KeepWeight, PartitionError, build_condensation,
    collapse_parallel_edges, expand_order, find_components, find_components_with_metrics,
    is_topological_order, topological_sort, topological_sort_with_metrics,
};
pub use paths::{
    Distance, DistanceMap, PathError, PathKind, longest_from, shortest_and_longest, shortest_from,
};
pub use pipeline::{Analysis, AnalysisOptions, PipelineError, SourcePaths, analyze};
