pub mod analyze;
pub mod generate;
pub mod paths;
pub mod scc;
pub mod topo;

use std::path::Path;

use anyhow::Context;
use clap::ValueEnum;
use strata_analysis::KeepWeight;
use strata_core::config::SimplifyMode;
use strata_core::metrics::{Metrics, MetricsReport, timed};
use strata_core::{LoadedGraph, NodeId, load_graph};

/// `--simplify` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SimplifyArg {
    /// Keep every parallel edge.
    None,
    /// Keep the lightest edge between each pair of components.
    Min,
    /// Keep the heaviest edge between each pair of components.
    Max,
}

/// Load a graph file, recording the `load` stage.
pub fn load(path: &Path, report: &mut MetricsReport) -> anyhow::Result<LoadedGraph> {
    let mut metrics = Metrics::new();
    let loaded = timed(&mut metrics, |_| load_graph(path))
        .with_context(|| format!("failed to load graph from {}", path.display()))?;
    report.record("load", &metrics);
    Ok(loaded)
}

/// Flag wins over `[analysis] simplify`.
pub const fn resolve_simplify(flag: Option<SimplifyArg>, configured: SimplifyMode) -> Option<KeepWeight> {
    let mode = match flag {
        Some(SimplifyArg::None) => SimplifyMode::None,
        Some(SimplifyArg::Min) => SimplifyMode::Min,
        Some(SimplifyArg::Max) => SimplifyMode::Max,
        None => configured,
    };
    match mode {
        SimplifyMode::None => None,
        SimplifyMode::Min => Some(KeepWeight::Min),
        SimplifyMode::Max => Some(KeepWeight::Max),
    }
}

/// Flag, then `[analysis] source`, then the graph file's own `source`.
/// `None` lets the pipeline fall back to node 0.
pub fn resolve_source(
    flag: Option<NodeId>,
    configured: Option<NodeId>,
    from_file: Option<NodeId>,
) -> Option<NodeId> {
    flag.or(configured).or(from_file)
}
