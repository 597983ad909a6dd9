//! `strata analyze`: run the full pipeline and report everything.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use strata_analysis::{AnalysisOptions, GraphStats, analyze};
use strata_core::NodeId;
use strata_core::config::EffectiveConfig;
use strata_core::metrics::MetricsReport;

use crate::cmd::paths::{PathsView, write_paths};
use crate::cmd::scc::{ComponentView, component_views, write_components};
use crate::cmd::{SimplifyArg, load, resolve_simplify, resolve_source};
use crate::output::{OutputMode, join_ids, pretty_kv, pretty_section, render};

/// Arguments for `strata analyze`.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Graph description (JSON).
    pub file: PathBuf,

    /// Original node id to measure paths from (default: node 0).
    #[arg(long)]
    pub source: Option<NodeId>,

    /// Merge parallel condensation edges before path queries.
    #[arg(long, value_enum)]
    pub simplify: Option<SimplifyArg>,
}

#[derive(Debug, Serialize)]
struct CondensationView {
    nodes: usize,
    edges: usize,
    order: Vec<usize>,
    expanded_order: Vec<NodeId>,
}

#[derive(Debug, Serialize)]
struct AnalyzeOutput {
    file: String,
    content_hash: String,
    stats: GraphStats,
    components: Vec<ComponentView>,
    condensation: CondensationView,
    paths: Option<PathsView>,
}

/// Execute `strata analyze`.
pub fn run_analyze(
    args: &AnalyzeArgs,
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

    let payload = AnalyzeOutput {
        file: args.file.display().to_string(),
        content_hash: loaded.content_hash.clone(),
        stats: analysis.stats.clone(),
        components: component_views(&analysis.components, &loaded.graph),
        condensation: CondensationView {
            nodes: analysis.condensation.size(),
            edges: analysis.condensation.edge_count(),
            order: analysis.order.clone(),
            expanded_order: analysis.expanded_order.clone(),
        },
        paths: PathsView::from_analysis(&analysis),
    };

    render(output, &payload, render_analyze_human)
}

fn render_analyze_human(payload: &AnalyzeOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let stats = &payload.stats;

    pretty_section(w, &format!("Graph {}", payload.file))?;
    pretty_kv(w, "nodes", stats.node_count.to_string())?;
    pretty_kv(w, "edges", stats.edge_count.to_string())?;
    pretty_kv(w, "density", format!("{:.3}", stats.density))?;
    pretty_kv(w, "self-loops", stats.self_loop_count.to_string())?;
    pretty_kv(w, "weak comps", stats.weakly_connected_component_count.to_string())?;
    pretty_kv(w, "hash", &payload.content_hash)?;
    writeln!(w)?;

    pretty_section(
        w,
        &format!(
            "Components ({}, {} cyclic, largest {})",
            stats.component_count, stats.cyclic_component_count, stats.largest_component
        ),
    )?;
    write_components(&payload.components, w)?;
    writeln!(w)?;

    let condensation = &payload.condensation;
    pretty_section(w, "Condensation")?;
    pretty_kv(w, "nodes", condensation.nodes.to_string())?;
    pretty_kv(w, "edges", condensation.edges.to_string())?;
    pretty_kv(w, "order", join_ids(&condensation.order))?;
    pretty_kv(w, "expanded", join_ids(&condensation.expanded_order))?;

    if let Some(paths) = &payload.paths {
        writeln!(w)?;
        write_paths(paths, w)?;
    }
    Ok(())
}
