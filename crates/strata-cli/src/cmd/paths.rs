//! `strata paths`: shortest and longest distances over the condensation.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use strata_analysis::{Analysis, AnalysisOptions, Distance, PathKind, analyze};
use strata_core::NodeId;
use strata_core::config::EffectiveConfig;
use strata_core::metrics::MetricsReport;

use crate::cmd::{SimplifyArg, load, resolve_simplify, resolve_source};
use crate::output::{OutputMode, join_ids, pretty_kv, pretty_section, render};

/// Arguments for `strata paths`.
#[derive(Args, Debug)]
pub struct PathsArgs {
    /// Graph description (JSON).
    pub file: PathBuf,

    /// Original node id to measure from (default: node 0).
    #[arg(long)]
    pub source: Option<NodeId>,

    /// Merge parallel condensation edges before relaxing.
    #[arg(long, value_enum)]
    pub simplify: Option<SimplifyArg>,
}

#[derive(Debug, Serialize)]
pub struct CriticalPathView {
    /// Condensation nodes along the path.
    pub components: Vec<usize>,
    /// Members of each component on the path.
    pub members: Vec<Vec<NodeId>>,
    pub length: f64,
}

/// Per-original-node distances from one source.
#[derive(Debug, Serialize)]
pub struct PathsView {
    pub source: NodeId,
    pub source_component: usize,
    /// Indexed by original node id; `null` where unreachable.
    pub shortest: Vec<Distance>,
    pub longest: Vec<Distance>,
    pub critical_path: Option<CriticalPathView>,
}

impl PathsView {
    /// `None` when the analysed graph was empty.
    pub fn from_analysis(analysis: &Analysis) -> Option<Self> {
        let paths = analysis.paths.as_ref()?;
        let nodes = 0..analysis.components.node_count();

        let critical_path = paths.critical_path().map(|(components, length)| {
            let members = components
                .iter()
                .filter_map(|&component| analysis.components.members(component))
                .map(<[_]>::to_vec)
                .collect();
            CriticalPathView {
                components,
                members,
                length,
            }
        });

        Some(Self {
            source: paths.source,
            source_component: paths.component,
            shortest: nodes
                .clone()
                .map(|node| analysis.distance_to(PathKind::Shortest, node))
                .collect(),
            longest: nodes
                .map(|node| analysis.distance_to(PathKind::Longest, node))
                .collect(),
            critical_path,
        })
    }
}

pub fn format_distance(distance: Distance) -> String {
    match distance {
        Distance::Reached(value) => format!("{value}"),
        Distance::Unreachable => "unreachable".to_string(),
    }
}

/// Write the distance table and critical path.
pub fn write_paths(view: &PathsView, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(
        w,
        &format!(
            "Paths from node {} (component #{})",
            view.source, view.source_component
        ),
    )?;
    writeln!(w, "{:<8} {:>12} {:>12}", "node", "shortest", "longest")?;
    for (node, (shortest, longest)) in view.shortest.iter().zip(&view.longest).enumerate() {
        writeln!(
            w,
            "{:<8} {:>12} {:>12}",
            node,
            format_distance(*shortest),
            format_distance(*longest)
        )?;
    }

    if let Some(critical) = &view.critical_path {
        let hops = critical
            .members
            .iter()
            .map(|members| format!("{{{}}}", join_ids(members)))
            .collect::<Vec<_>>()
            .join(" -> ");
        writeln!(w)?;
        pretty_kv(w, "critical path", format!("{hops} (length {})", critical.length))?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct PathsOutput {
    nodes: usize,
    paths: Option<PathsView>,
}

/// Execute `strata paths`.
pub fn run_paths(
    args: &PathsArgs,
    output: OutputMode,
    config: &EffectiveConfig,
    report: &mut MetricsReport,
) -> anyhow::Result<()> {
    let loaded = load(&args.file, report)?;
    let options = AnalysisOptions {
        source: resolve_source(args.source, config.project.analysis.source, loaded.source),
        simplify: resolve_simplify(args.simplify, config.project.analysis.simplify),
    };

    let analysis = analyze(&loaded.graph, &options)
        .with_context(|| format!("failed to analyse {}", args.file.display()))?;
    report.stages.extend(analysis.report.stages.iter().cloned());

    let payload = PathsOutput {
        nodes: loaded.graph.size(),
        paths: PathsView::from_analysis(&analysis),
    };

    render(output, &payload, |payload, w| match &payload.paths {
        Some(view) => write_paths(view, w),
        None => writeln!(w, "Graph is empty; no paths to report."),
    })
}
