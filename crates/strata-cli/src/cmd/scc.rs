//! `strata scc`: list strongly connected components.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use strata_analysis::{Components, find_components_with_metrics};
use strata_core::metrics::{Metrics, MetricsReport, timed};
use strata_core::{Graph, NodeId};

use crate::cmd::load;
use crate::output::{OutputMode, join_ids, pretty_section, render};

/// Arguments for `strata scc`.
#[derive(Args, Debug)]
pub struct SccArgs {
    /// Graph description (JSON).
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ComponentView {
    pub id: usize,
    pub members: Vec<NodeId>,
    pub cyclic: bool,
}

/// Components in emission order, flagged cyclic where they hold a cycle.
pub fn component_views(components: &Components, graph: &Graph) -> Vec<ComponentView> {
    components
        .iter()
        .enumerate()
        .map(|(id, members)| ComponentView {
            id,
            members: members.to_vec(),
            cyclic: components.is_cyclic(id, graph),
        })
        .collect()
}

/// Write one line per component: `#id  [members]  cycle`.
pub fn write_components(views: &[ComponentView], w: &mut dyn Write) -> std::io::Result<()> {
    for view in views {
        let marker = if view.cyclic { "  cycle" } else { "" };
        writeln!(w, "  #{:<4} [{}]{marker}", view.id, join_ids(&view.members))?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct SccOutput {
    nodes: usize,
    edges: usize,
    cyclic_count: usize,
    components: Vec<ComponentView>,
}

/// Execute `strata scc`.
pub fn run_scc(args: &SccArgs, output: OutputMode, report: &mut MetricsReport) -> anyhow::Result<()> {
    let loaded = load(&args.file, report)?;
    let graph = &loaded.graph;

    let mut metrics = Metrics::new();
    let components = timed(&mut metrics, |m| find_components_with_metrics(graph, m));
    report.record("scc", &metrics);

    let views = component_views(&components, graph);
    let payload = SccOutput {
        nodes: graph.size(),
        edges: graph.edge_count(),
        cyclic_count: views.iter().filter(|view| view.cyclic).count(),
        components: views,
    };

    render(output, &payload, render_scc_human)
}

fn render_scc_human(payload: &SccOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(
        w,
        &format!(
            "Components ({}, {} cyclic) over {} nodes",
            payload.components.len(),
            payload.cyclic_count,
            payload.nodes
        ),
    )?;
    if payload.components.is_empty() {
        writeln!(w, "Graph is empty.")?;
        return Ok(());
    }
    write_components(&payload.components, w)
}
