//! End-to-end analysis: components, condensation, order, paths.
//!
//! ```text
//! find_components → build_condensation → [collapse_parallel_edges]
//!     → topological_sort → shortest_and_longest (from the source's component)
//! ```
//!
//! Each stage runs under its own [`Metrics`] and is recorded in the
//! [`MetricsReport`] carried by the result. Path queries operate on the
//! condensation; the source is given as an original node id and mapped to
//! its component.

use strata_core::metrics::{Metrics, MetricsReport, timed};
use strata_core::{ErrorCode, Graph, GraphError, NodeId};
use tracing::{debug, instrument};

use crate::graph::{
    CondenseError, Components, GraphStats, KeepWeight, build_condensation, collapse_parallel_edges,
    expand_order, find_components_with_metrics, topological_sort_with_metrics,
};
use crate::paths::{Distance, DistanceMap, PathError, PathKind, shortest_and_longest};

/// Errors from [`analyze`].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Condense(#[from] CondenseError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("condensation with {nodes} nodes is not acyclic")]
    CycleDetected { nodes: usize },

    #[error("source node {node} is out of range for a graph of {size} nodes")]
    SourceOutOfRange { node: NodeId, size: usize },
}

impl PipelineError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Condense(CondenseError::PartitionMismatch { .. }) => ErrorCode::PartitionMismatch,
            Self::Condense(CondenseError::Graph(err)) | Self::Graph(err) => err.code(),
            Self::Path(_) | Self::SourceOutOfRange { .. } => ErrorCode::OutOfRange,
            Self::CycleDetected { .. } => ErrorCode::CycleDetected,
        }
    }
}

/// Knobs for [`analyze`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Original node id to measure paths from. Defaults to node 0.
    pub source: Option<NodeId>,
    /// Merge parallel condensation edges before the path queries.
    pub simplify: Option<KeepWeight>,
}

/// Shortest and longest distances from one source component.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcePaths {
    /// Original node id the query started from.
    pub source: NodeId,
    /// Condensation node holding `source`.
    pub component: usize,
    pub shortest: DistanceMap,
    pub longest: DistanceMap,
}

impl SourcePaths {
    /// The distance map for `kind`.
    #[must_use]
    pub const fn map(&self, kind: PathKind) -> &DistanceMap {
        match kind {
            PathKind::Shortest => &self.shortest,
            PathKind::Longest => &self.longest,
        }
    }

    /// Longest path from the source component to the farthest component,
    /// as condensation node ids, with its length.
    #[must_use]
    pub fn critical_path(&self) -> Option<(Vec<usize>, f64)> {
        let (end, length) = self.longest.farthest()?;
        let path = self.longest.path_to(end)?;
        Some((path, length))
    }
}

/// Everything [`analyze`] computes for one graph.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub components: Components,
    /// Condensation graph, after the optional parallel-edge merge.
    pub condensation: Graph,
    /// Topological order of the condensation.
    pub order: Vec<usize>,
    /// `order` expanded to original node ids.
    pub expanded_order: Vec<NodeId>,
    /// `None` only for the empty graph.
    pub paths: Option<SourcePaths>,
    pub stats: GraphStats,
    pub report: MetricsReport,
}

impl Analysis {
    /// Distance from the source to original node `node`, read off its
    /// component. Nodes sharing the source's component are at distance 0.
    #[must_use]
    pub fn distance_to(&self, kind: PathKind, node: NodeId) -> Distance {
        match (&self.paths, self.components.component_of(node)) {
            (Some(paths), Some(component)) => paths.map(kind).get(component),
            _ => Distance::Unreachable,
        }
    }
}

/// Run the full pipeline over `graph`.
///
/// # Errors
///
/// [`PipelineError::SourceOutOfRange`] if `options.source` is not a node of
/// `graph`. The remaining variants only surface if an internal stage breaks
/// its contract.
#[instrument(skip_all, fields(nodes = graph.size(), edges = graph.edge_count()))]
pub fn analyze(graph: &Graph, options: &AnalysisOptions) -> Result<Analysis, PipelineError> {
    let mut report = MetricsReport::new();

    let source = match options.source {
        Some(node) if node >= graph.size() => {
            return Err(PipelineError::SourceOutOfRange {
                node,
                size: graph.size(),
            });
        }
        Some(node) => Some(node),
        None => (!graph.is_empty()).then_some(0),
    };

    let mut metrics = Metrics::new();
    let components = timed(&mut metrics, |m| find_components_with_metrics(graph, m));
    report.record("scc", &metrics);

    let mut metrics = Metrics::new();
    let mut condensation = timed(&mut metrics, |_| build_condensation(graph, &components))?;
    report.record("condense", &metrics);

    if let Some(keep) = options.simplify {
        let mut metrics = Metrics::new();
        condensation = timed(&mut metrics, |_| collapse_parallel_edges(&condensation, keep))?;
        report.record("simplify", &metrics);
    }

    let mut metrics = Metrics::new();
    let order = timed(&mut metrics, |m| topological_sort_with_metrics(&condensation, m)).ok_or(
        PipelineError::CycleDetected {
            nodes: condensation.size(),
        },
    )?;
    report.record("topo", &metrics);

    let expanded_order = expand_order(&order, &components);

    let paths = match source.and_then(|node| Some((node, components.component_of(node)?))) {
        Some((source, component)) => {
            let mut metrics = Metrics::new();
            let (shortest, longest) = timed(&mut metrics, |m| {
                shortest_and_longest(&condensation, &order, component, m)
            })?;
            report.record("paths", &metrics);
            Some(SourcePaths {
                source,
                component,
                shortest,
                longest,
            })
        }
        None => None,
    };

    let stats = GraphStats::compute(graph, &components, &condensation);

    debug!(
        components = components.len(),
        condensation_edges = condensation.edge_count(),
        cyclic = stats.cyclic_component_count,
        "analysis complete"
    );

    Ok(Analysis {
        components,
        condensation,
        order,
        expanded_order,
        paths,
        stats,
        report,
    })
}
