#![forbid(unsafe_code)]

mod cmd;
mod output;

use std::env;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use output::{CliError, OutputMode, render_error};
use strata_core::ErrorCode;
use strata_core::config::resolve_config;
use strata_core::metrics::{self, Metrics, MetricsReport, timed};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "strata: strongly connected components, condensation and DAG paths",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit a per-stage timing report to stderr.
    #[arg(long, global = true)]
    timing: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Run the full analysis pipeline",
        long_about = "Find components, build and sort the condensation, then compute shortest and longest distances from a source node.",
        after_help = "EXAMPLES:\n    # Analyse a graph from node 0\n    strata analyze data/small_1.json\n\n    # Measure from node 3, keeping the heaviest parallel edge\n    strata analyze graph.json --source 3 --simplify max\n\n    # Emit machine-readable output\n    strata analyze graph.json --json"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        about = "List strongly connected components",
        after_help = "EXAMPLES:\n    strata scc graph.json\n    strata scc graph.json --json"
    )]
    Scc(cmd::scc::SccArgs),

    #[command(
        about = "Topologically sort a graph",
        long_about = "Sort the raw graph (reports a cycle if there is one) or, with --condensed, its component graph.",
        after_help = "EXAMPLES:\n    strata topo dag.json\n    strata topo cyclic.json --condensed"
    )]
    Topo(cmd::topo::TopoArgs),

    #[command(
        about = "Shortest and longest distances from a source",
        after_help = "EXAMPLES:\n    strata paths graph.json --source 2\n    strata paths graph.json --json"
    )]
    Paths(cmd::paths::PathsArgs),

    #[command(
        about = "Write synthetic datasets",
        long_about = "Write small, medium and large seeded datasets as <tier>_<k>.json plus manifest.json.",
        after_help = "EXAMPLES:\n    strata generate\n    strata generate --out /tmp/graphs --seed 7"
    )]
    Generate(cmd::generate::GenerateArgs),
}

impl Commands {
    const fn stage_name(&self) -> &'static str {
        match self {
            Self::Analyze(_) => "cmd.analyze",
            Self::Scc(_) => "cmd.scc",
            Self::Topo(_) => "cmd.topo",
            Self::Paths(_) => "cmd.paths",
            Self::Generate(_) => "cmd.generate",
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("STRATA_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "strata=debug,info"
        } else {
            "strata=info,warn"
        })
    });

    let format = env::var("STRATA_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn print_timing(report: &MetricsReport) -> anyhow::Result<()> {
    if report.is_empty() {
        eprintln!("timing report: no stages recorded");
    } else {
        eprintln!("timing report:");
        eprintln!("{}", report.display_table());
        eprintln!("timing report (json):");
        eprintln!("{}", serde_json::to_string_pretty(&report.to_json())?);
    }
    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = env::current_dir()?;
    let config = match resolve_config(&project_root) {
        Ok(config) => config,
        Err(err) => {
            let mode = OutputMode::resolve(cli.json, "human");
            render_error(mode, &CliError::with_code(format!("{err:#}"), ErrorCode::ConfigParseError))?;
            return Ok(ExitCode::FAILURE);
        }
    };
    let output = OutputMode::resolve(cli.json, &config.resolved_output);
    let timing_enabled = cli.timing || metrics::timing_enabled_from_env();
    debug!(?output, timing_enabled, "configuration resolved");

    let mut report = MetricsReport::new();
    let mut command_metrics = Metrics::new();
    let stage = cli.command.stage_name();

    let command_result = timed(&mut command_metrics, |_| match &cli.command {
        Commands::Analyze(args) => cmd::analyze::run_analyze(args, output, &config, &mut report),
        Commands::Scc(args) => cmd::scc::run_scc(args, output, &mut report),
        Commands::Topo(args) => cmd::topo::run_topo(args, output, &mut report),
        Commands::Paths(args) => cmd::paths::run_paths(args, output, &config, &mut report),
        Commands::Generate(args) => {
            cmd::generate::run_generate(args, output, &config, &mut report)
        }
    });
    report.record(stage, &command_metrics);

    if timing_enabled {
        print_timing(&report)?;
    }

    match command_result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            Ok(ExitCode::FAILURE)
        }
    }
}
