//! Graph construction from a persisted JSON description.
//!
//! # Format
//!
//! ```json
//! {
//!   "directed": true,
//!   "n": 4,
//!   "edges": [ { "u": 0, "v": 1, "w": 1.0 } ],
//!   "source": 0
//! }
//! ```
//!
//! `directed` defaults to `true`; undirected descriptions are rejected since
//! every downstream stage interprets edges as directed. `n` may not exceed
//! [`MAX_NODES`]; larger counts are rejected before anything is allocated.
//! `source` is an optional hint for the path queries. Every edge goes through
//! [`Graph::add_edge`], so a loaded graph always satisfies the node-id range
//! invariant.
//!
//! ## Content hash
//!
//! [`content_hash`] is a BLAKE3 hash over the node count and the edge list in
//! insertion order. Two loads of the same description produce the same hash,
//! which callers use as a cache key or to label reports.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{ErrorCode, GraphError};
use crate::graph::{Graph, NodeId};

/// Largest node count a description may declare.
pub const MAX_NODES: usize = 1 << 26;

/// Serialized form of a graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDescription {
    #[serde(default = "default_directed")]
    pub directed: bool,
    /// Node count.
    pub n: usize,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
    /// Suggested source node for path queries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<NodeId>,
    /// Free-form label describing how weights were assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_model: Option<String>,
}

/// One `(u, v, w)` edge triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub u: NodeId,
    pub v: NodeId,
    pub w: f64,
}

/// Errors from loading a graph description.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read graph file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid graph description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("undirected graphs are not supported")]
    Undirected,

    #[error("graph declares {n} nodes, more than the supported {max}")]
    TooManyNodes { n: usize, max: usize },

    #[error("edge #{index} rejected: {source}")]
    Edge {
        index: usize,
        #[source]
        source: GraphError,
    },
}

impl LoadError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Io { .. } => ErrorCode::GraphFileUnreadable,
            Self::Json(_) | Self::TooManyNodes { .. } => ErrorCode::GraphFileInvalid,
            Self::Undirected => ErrorCode::UndirectedGraph,
            Self::Edge { source, .. } => source.code(),
        }
    }
}

/// A graph built from a description, with the metadata that travelled
/// alongside it.
#[derive(Debug, Clone)]
pub struct LoadedGraph {
    pub graph: Graph,
    /// The description's `source` hint, if any.
    pub source: Option<NodeId>,
    /// BLAKE3 content hash of the graph, `blake3:<hex>`.
    pub content_hash: String,
}

const fn default_directed() -> bool {
    true
}

impl GraphDescription {
    /// Build the described [`Graph`], validating every edge.
    ///
    /// # Errors
    ///
    /// [`LoadError::Undirected`] when `directed` is false,
    /// [`LoadError::TooManyNodes`] when `n` exceeds [`MAX_NODES`], or
    /// [`LoadError::Edge`] for the first edge the graph model rejects.
    pub fn to_graph(&self) -> Result<Graph, LoadError> {
        if !self.directed {
            return Err(LoadError::Undirected);
        }
        if self.n > MAX_NODES {
            return Err(LoadError::TooManyNodes {
                n: self.n,
                max: MAX_NODES,
            });
        }

        let mut graph = Graph::new(self.n);
        for (index, edge) in self.edges.iter().enumerate() {
            graph
                .add_edge(edge.u, edge.v, edge.w)
                .map_err(|source| LoadError::Edge { index, source })?;
        }
        Ok(graph)
    }

    /// Describe an existing graph. Edges are listed in [`Graph::edges`] order.
    #[must_use]
    pub fn from_graph(graph: &Graph, source: Option<NodeId>) -> Self {
        Self {
            directed: true,
            n: graph.size(),
            edges: graph
                .edges()
                .map(|(u, edge)| EdgeRecord {
                    u,
                    v: edge.to,
                    w: edge.weight,
                })
                .collect(),
            source,
            weight_model: None,
        }
    }
}

/// Parse a JSON graph description and build the graph.
///
/// # Errors
///
/// Returns a [`LoadError`] if the JSON is malformed or the description
/// violates the graph model.
pub fn parse_graph(json: &str) -> Result<LoadedGraph, LoadError> {
    let description: GraphDescription = serde_json::from_str(json)?;
    let graph = description.to_graph()?;
    let content_hash = content_hash(&graph);

    debug!(
        nodes = graph.size(),
        edges = graph.edge_count(),
        hash = %content_hash,
        "graph description parsed"
    );

    Ok(LoadedGraph {
        graph,
        source: description.source,
        content_hash,
    })
}

/// Read and parse a JSON graph description from `path`.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be read, otherwise as
/// [`parse_graph`].
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_graph(path: impl AsRef<Path>) -> Result<LoadedGraph, LoadError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_graph(&json)
}

/// Compute a BLAKE3 hash of the node count and edge list.
#[must_use]
pub fn content_hash(graph: &Graph) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(graph.size() as u64).to_le_bytes());
    for (from, edge) in graph.edges() {
        hasher.update(&(from as u64).to_le_bytes());
        hasher.update(&(edge.to as u64).to_le_bytes());
        hasher.update(&edge.weight.to_bits().to_le_bytes());
    }
    format!("blake3:{}", hasher.finalize().to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAIN: &str = r#"{
        "directed": true,
        "n": 4,
        "edges": [
            {"u": 0, "v": 1, "w": 1},
            {"u": 1, "v": 0, "w": 1},
            {"u": 1, "v": 2, "w": 1.5},
            {"u": 2, "v": 3, "w": -1}
        ],
        "source": 0,
        "weight_model": "edge"
    }"#;

    #[test]
    fn parse_builds_graph_and_keeps_source() {
        let loaded = parse_graph(CHAIN).expect("valid description");
        assert_eq!(loaded.graph.size(), 4);
        assert_eq!(loaded.graph.edge_count(), 4);
        assert_eq!(loaded.source, Some(0));
        assert!(loaded.content_hash.starts_with("blake3:"));

        let from_one: Vec<(usize, f64)> = loaded
            .graph
            .out_edges(1)
            .iter()
            .map(|e| (e.to, e.weight))
            .collect();
        assert_eq!(from_one, vec![(0, 1.0), (2, 1.5)]);
    }

    #[test]
    fn directed_defaults_to_true_and_edges_default_empty() {
        let loaded = parse_graph(r#"{"n": 2}"#).expect("minimal description");
        assert_eq!(loaded.graph.size(), 2);
        assert_eq!(loaded.graph.edge_count(), 0);
        assert_eq!(loaded.source, None);
    }

    #[test]
    fn undirected_is_rejected() {
        let err = parse_graph(r#"{"directed": false, "n": 1, "edges": []}"#)
            .expect_err("undirected must fail");
        assert!(matches!(err, LoadError::Undirected));
        assert_eq!(err.code(), ErrorCode::UndirectedGraph);
    }

    #[test]
    fn out_of_range_edge_reports_index() {
        let err = parse_graph(r#"{"n": 2, "edges": [{"u":0,"v":1,"w":1},{"u":1,"v":2,"w":1}]}"#)
            .expect_err("edge 1 is out of range");
        match err {
            LoadError::Edge { index, source } => {
                assert_eq!(index, 1);
                assert_eq!(source, GraphError::OutOfRange { node: 2, size: 2 });
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn huge_node_count_is_rejected_before_allocating() {
        let err = parse_graph(r#"{"n": 18446744073709551615, "edges": []}"#)
            .expect_err("node count beyond the limit");
        assert!(matches!(
            err,
            LoadError::TooManyNodes {
                n: usize::MAX,
                max: MAX_NODES
            }
        ));
        assert_eq!(err.code(), ErrorCode::GraphFileInvalid);
    }

    #[test]
    fn one_past_the_node_limit_is_rejected() {
        let over = GraphDescription {
            directed: true,
            n: MAX_NODES + 1,
            edges: Vec::new(),
            source: None,
            weight_model: None,
        };
        assert!(matches!(
            over.to_graph(),
            Err(LoadError::TooManyNodes { n, .. }) if n == MAX_NODES + 1
        ));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = parse_graph("{\"n\": ").expect_err("truncated json");
        assert_eq!(err.code(), ErrorCode::GraphFileInvalid);
    }

    #[test]
    fn description_round_trips_through_graph() {
        let loaded = parse_graph(CHAIN).expect("valid description");
        let description = GraphDescription::from_graph(&loaded.graph, loaded.source);
        let rebuilt = description.to_graph().expect("rebuild");
        assert_eq!(rebuilt, loaded.graph);
        assert_eq!(content_hash(&rebuilt), loaded.content_hash);
    }

    #[test]
    fn content_hash_depends_on_edge_order_and_weight() {
        let mut a = Graph::new(3);
        a.add_edge(0, 1, 1.0).expect("edge");
        a.add_edge(1, 2, 1.0).expect("edge");

        let mut b = Graph::new(3);
        b.add_edge(0, 1, 1.0).expect("edge");
        b.add_edge(1, 2, 2.0).expect("edge");

        assert_ne!(content_hash(&a), content_hash(&b));
        assert_eq!(content_hash(&a), content_hash(&a.clone()));
    }

    #[test]
    fn load_graph_reads_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("g.json");
        std::fs::write(&path, CHAIN).expect("write graph");

        let loaded = load_graph(&path).expect("load from disk");
        assert_eq!(loaded.graph.size(), 4);
    }

    #[test]
    fn load_graph_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_graph(dir.path().join("missing.json")).expect_err("missing file");
        assert!(matches!(err, LoadError::Io { .. }));
        assert_eq!(err.code(), ErrorCode::GraphFileUnreadable);
    }
}
