#![forbid(unsafe_code)]
//! strata-core library.
//!
//! The weighted directed [`Graph`] model shared by every analysis stage,
//! plus the collaborators around it: JSON graph loading, observational
//! metrics, and configuration.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums at API seams ([`GraphError`],
//!   [`load::LoadError`]); `anyhow::Result` for config loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod graph;
pub mod interop;
pub mod load;
pub mod metrics;

pub use error::{ErrorCode, GraphError};
pub use graph::{Edge, Graph, NodeId};
pub use load::{GraphDescription, LoadError, LoadedGraph, MAX_NODES, load_graph, parse_graph};
pub use metrics::{Counter, Metrics, MetricsReport, Stopwatch};
