#![forbid(unsafe_code)]
//! strata-gen library.
//!
//! Seeded, deterministic synthetic graphs in three size tiers, written in
//! the JSON format [`strata_core::load`] reads. The same seed always yields
//! byte-identical files.
//!
//! # Conventions
//!
//! - **Errors**: `anyhow::Result` for file output; graph construction
//!   errors are propagated as [`strata_core::GraphError`].
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod dataset;
pub mod shape;
pub mod tier;

pub use dataset::{Dataset, Manifest, ManifestEntry, generate_all, generate_datasets, generate_tier};
pub use shape::{GeneratorConfig, Shape, generate_graph};
pub use tier::{TIER_LARGE, TIER_MEDIUM, TIER_SMALL, TIERS, Tier};
