//! `strata topo`: topological order of a graph or its condensation.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use strata_analysis::{
    PipelineError, build_condensation, expand_order, find_components_with_metrics,
    topological_sort_with_metrics,
};
use strata_core::NodeId;
use strata_core::metrics::{Metrics, MetricsReport, timed};

use crate::cmd::load;
use crate::output::{OutputMode, join_ids, pretty_kv, pretty_section, render};

/// Arguments for `strata topo`.
#[derive(Args, Debug)]
pub struct TopoArgs {
    /// Graph description (JSON).
    pub file: PathBuf,

    /// Sort the condensation instead of the raw graph; always succeeds.
    #[arg(long)]
    pub condensed: bool,
}

#[derive(Debug, Serialize)]
struct TopoOutput {
    condensed: bool,
    nodes: usize,
    acyclic: bool,
    /// Order over the sorted graph's nodes; `null` when a cycle blocks it.
    order: Option<Vec<usize>>,
    /// Condensed order expanded to original nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    expanded_order: Option<Vec<NodeId>>,
}

/// Execute `strata topo`.
pub fn run_topo(args: &TopoArgs, output: OutputMode, report: &mut MetricsReport) -> anyhow::Result<()> {
    let loaded = load(&args.file, report)?;
    let graph = &loaded.graph;

    let payload = if args.condensed {
        let mut metrics = Metrics::new();
        let components = timed(&mut metrics, |m| find_components_with_metrics(graph, m));
        report.record("scc", &metrics);

        let condensation =
            build_condensation(graph, &components).context("failed to build condensation")?;

        let mut metrics = Metrics::new();
        let order = timed(&mut metrics, |m| topological_sort_with_metrics(&condensation, m))
            .ok_or(PipelineError::CycleDetected {
                nodes: condensation.size(),
            })?;
        report.record("topo", &metrics);

        TopoOutput {
            condensed: true,
            nodes: condensation.size(),
            acyclic: true,
            expanded_order: Some(expand_order(&order, &components)),
            order: Some(order),
        }
    } else {
        let mut metrics = Metrics::new();
        let order = timed(&mut metrics, |m| topological_sort_with_metrics(graph, m));
        report.record("topo", &metrics);

        TopoOutput {
            condensed: false,
            nodes: graph.size(),
            acyclic: order.is_some(),
            order,
            expanded_order: None,
        }
    };

    render(output, &payload, render_topo_human)
}

fn render_topo_human(payload: &TopoOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let heading = if payload.condensed {
        "Topological order (condensation)"
    } else {
        "Topological order"
    };
    pretty_section(w, heading)?;
    pretty_kv(w, "nodes", payload.nodes.to_string())?;

    match &payload.order {
        Some(order) => {
            pretty_kv(w, "order", join_ids(order))?;
            if let Some(expanded) = &payload.expanded_order {
                pretty_kv(w, "expanded", join_ids(expanded))?;
            }
        }
        None => {
            writeln!(w, "Cycle detected: no topological order exists.")?;
            writeln!(w, "Run with --condensed to sort the component graph instead.")?;
        }
    }
    Ok(())
}
