//! `strata generate`: write the synthetic datasets.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use strata_core::config::EffectiveConfig;
use strata_core::metrics::{Metrics, MetricsReport, timed};
use strata_gen::{GeneratorConfig, Manifest, generate_all};

use crate::output::{OutputMode, pretty_kv, pretty_section, render};

/// Arguments for `strata generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Output directory (default: `[generate] out_dir`, then `data`).
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// RNG seed (default: `[generate] seed`, then 42).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Datasets per tier (default: `[generate] datasets_per_tier`, then 3).
    #[arg(long)]
    pub per_tier: Option<usize>,

    /// Probability of each extra forward edge.
    #[arg(long)]
    pub density: Option<f64>,
}

impl GenerateArgs {
    fn generator_config(&self, config: &EffectiveConfig) -> GeneratorConfig {
        let defaults = &config.project.generate;
        let base = GeneratorConfig::default();
        GeneratorConfig {
            seed: self.seed.unwrap_or(defaults.seed),
            datasets_per_tier: self.per_tier.unwrap_or(defaults.datasets_per_tier),
            density: self.density.unwrap_or(base.density),
            ..base
        }
    }

    fn out_dir(&self, config: &EffectiveConfig) -> PathBuf {
        self.out
            .clone()
            .unwrap_or_else(|| config.project.generate.out_dir.clone())
    }
}

/// Execute `strata generate`.
pub fn run_generate(
    args: &GenerateArgs,
    output: OutputMode,
    config: &EffectiveConfig,
    report: &mut MetricsReport,
) -> anyhow::Result<()> {
    let generator = args.generator_config(config);
    let dir = args.out_dir(config);

    let mut metrics = Metrics::new();
    let manifest = timed(&mut metrics, |_| generate_all(&dir, &generator))?;
    report.record("generate", &metrics);

    render(output, &manifest, render_manifest_human)
}

fn render_manifest_human(manifest: &Manifest, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Generated {} datasets", manifest.datasets.len()))?;
    pretty_kv(w, "seed", manifest.seed.to_string())?;
    for entry in &manifest.datasets {
        writeln!(
            w,
            "  {:<10} {:<13} {:>3} nodes {:>4} edges  {}",
            entry.name,
            entry.shape.as_str(),
            entry.nodes,
            entry.edges,
            entry.path.display()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use strata_core::config::{EffectiveConfig, ProjectConfig, UserConfig};

    use super::*;

    fn config_with_seed(seed: u64) -> EffectiveConfig {
        let mut project = ProjectConfig::default();
        project.generate.seed = seed;
        project.generate.out_dir = PathBuf::from("datasets");
        EffectiveConfig {
            project,
            user: UserConfig::default(),
            resolved_output: "human".to_string(),
        }
    }

    #[test]
    fn flags_override_config() {
        let args = GenerateArgs {
            out: Some(PathBuf::from("elsewhere")),
            seed: Some(9),
            per_tier: Some(1),
            density: Some(0.5),
        };
        let config = config_with_seed(7);
        let generator = args.generator_config(&config);

        assert_eq!(generator.seed, 9);
        assert_eq!(generator.datasets_per_tier, 1);
        assert!((generator.density - 0.5).abs() < f64::EPSILON);
        assert_eq!(args.out_dir(&config), PathBuf::from("elsewhere"));
    }

    #[test]
    fn config_fills_missing_flags() {
        let args = GenerateArgs {
            out: None,
            seed: None,
            per_tier: None,
            density: None,
        };
        let config = config_with_seed(7);
        let generator = args.generator_config(&config);

        assert_eq!(generator.seed, 7);
        assert_eq!(generator.datasets_per_tier, 3);
        assert_eq!(args.out_dir(&config), PathBuf::from("datasets"));
    }
}
