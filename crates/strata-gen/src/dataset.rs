//! Tiered datasets and writing them to disk.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use serde::Serialize;
use strata_core::load::content_hash;
use strata_core::{GraphDescription, GraphError};
use tracing::{debug, info, instrument};

use crate::shape::{GeneratorConfig, Shape, generate_graph};
use crate::tier::{TIERS, Tier};

/// One generated graph, ready to be written.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    /// `<tier>_<k>`, with `k` starting at 1.
    pub name: String,
    pub tier: Tier,
    pub shape: Shape,
    /// Seed the dataset's RNG was created from.
    pub seed: u64,
    pub description: GraphDescription,
}

/// Summary of one written dataset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    pub name: String,
    pub tier: &'static str,
    pub shape: Shape,
    pub nodes: usize,
    pub edges: usize,
    pub path: PathBuf,
    pub content_hash: String,
}

/// Everything [`generate_all`] wrote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub seed: u64,
    pub datasets: Vec<ManifestEntry>,
}

/// Per-dataset seed, so each file is reproducible on its own.
fn dataset_seed(base: u64, tier_index: usize, k: usize) -> u64 {
    base.wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add((tier_index as u64) << 32)
        .wrapping_add(k as u64)
}

/// Generate the datasets of one tier.
///
/// # Errors
///
/// Propagates a [`GraphError`] from graph construction, which only happens
/// if the generator itself is broken.
pub fn generate_tier(
    tier: Tier,
    tier_index: usize,
    config: &GeneratorConfig,
) -> Result<Vec<Dataset>, GraphError> {
    (0..config.datasets_per_tier)
        .map(|index| {
            let seed = dataset_seed(config.seed, tier_index, index);
            let mut rng = StdRng::seed_from_u64(seed);
            let nodes = rng.gen_range(tier.min_nodes..=tier.max_nodes);
            let shape = Shape::for_index(index);
            let (graph, source) = generate_graph(&mut rng, nodes, shape, config)?;

            let mut description = GraphDescription::from_graph(&graph, source);
            description.weight_model = Some(config.weight_model());

            Ok(Dataset {
                name: format!("{}_{}", tier.name, index + 1),
                tier,
                shape,
                seed,
                description,
            })
        })
        .collect()
}

/// Generate every tier's datasets, small to large.
///
/// # Errors
///
/// As [`generate_tier`].
pub fn generate_datasets(config: &GeneratorConfig) -> Result<Vec<Dataset>, GraphError> {
    let mut datasets = Vec::new();
    for (tier_index, tier) in TIERS.into_iter().enumerate() {
        datasets.extend(generate_tier(tier, tier_index, config)?);
    }
    Ok(datasets)
}

/// Generate every dataset and write each to `<dir>/<name>.json`, plus a
/// `manifest.json` listing them.
///
/// # Errors
///
/// Returns an error if `dir` cannot be created or a file cannot be written.
#[instrument(skip_all, fields(dir = %dir.display(), seed = config.seed))]
pub fn generate_all(dir: &Path, config: &GeneratorConfig) -> Result<Manifest> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let datasets = generate_datasets(config).context("failed to generate datasets")?;
    let mut entries = Vec::with_capacity(datasets.len());

    for dataset in datasets {
        let path = dir.join(format!("{}.json", dataset.name));
        let json = serde_json::to_string_pretty(&dataset.description)
            .context("failed to serialize dataset")?;
        fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;

        let graph = dataset
            .description
            .to_graph()
            .with_context(|| format!("generated dataset {} is invalid", dataset.name))?;

        debug!(
            name = %dataset.name,
            nodes = graph.size(),
            edges = graph.edge_count(),
            shape = dataset.shape.as_str(),
            "dataset written"
        );

        entries.push(ManifestEntry {
            name: dataset.name,
            tier: dataset.tier.name,
            shape: dataset.shape,
            nodes: graph.size(),
            edges: graph.edge_count(),
            path,
            content_hash: content_hash(&graph),
        });
    }

    let manifest = Manifest {
        seed: config.seed,
        datasets: entries,
    };
    let manifest_path = dir.join("manifest.json");
    let json = serde_json::to_string_pretty(&manifest).context("failed to serialize manifest")?;
    fs::write(&manifest_path, json)
        .with_context(|| format!("failed to write {}", manifest_path.display()))?;

    info!(count = manifest.datasets.len(), "datasets generated");
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_tier_and_index() {
        let datasets = generate_datasets(&GeneratorConfig::default()).expect("valid generator");
        let names: Vec<_> = datasets.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "small_1", "small_2", "small_3", "medium_1", "medium_2", "medium_3", "large_1",
                "large_2", "large_3",
            ]
        );
    }

    #[test]
    fn node_counts_stay_within_tier() {
        for dataset in generate_datasets(&GeneratorConfig::default()).expect("valid generator") {
            let n = dataset.description.n;
            assert!(
                (dataset.tier.min_nodes..=dataset.tier.max_nodes).contains(&n),
                "{} has {n} nodes",
                dataset.name
            );
        }
    }

    #[test]
    fn seeds_differ_per_dataset() {
        assert_ne!(dataset_seed(42, 0, 0), dataset_seed(42, 0, 1));
        assert_ne!(dataset_seed(42, 0, 0), dataset_seed(42, 1, 0));
        assert_ne!(dataset_seed(42, 0, 0), dataset_seed(43, 0, 0));
    }

    #[test]
    fn descriptions_carry_weight_model_and_source() {
        let datasets = generate_tier(TIERS[0], 0, &GeneratorConfig::default()).expect("valid");
        for dataset in datasets {
            assert_eq!(
                dataset.description.weight_model.as_deref(),
                Some("uniform_int[1,10]")
            );
            assert!(dataset.description.source.is_some());
        }
    }
}
