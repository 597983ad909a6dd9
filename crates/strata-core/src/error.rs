use std::fmt;

/// Errors raised by [`crate::graph::Graph`] operations.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// A node id fell outside `[0, size)`.
    #[error("node {node} is out of range for a graph of {size} nodes")]
    OutOfRange {
        /// The offending node id.
        node: usize,
        /// Node count of the graph the id was checked against.
        size: usize,
    },

    /// Edge weights must be finite reals.
    #[error("edge {from} -> {to} has non-finite weight {weight}")]
    NonFiniteWeight {
        /// Source node of the rejected edge.
        from: usize,
        /// Target node of the rejected edge.
        to: usize,
        /// The rejected weight (NaN or infinite).
        weight: f64,
    },
}

impl GraphError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::OutOfRange { .. } => ErrorCode::OutOfRange,
            Self::NonFiniteWeight { .. } => ErrorCode::NonFiniteWeight,
        }
    }
}

/// Machine-readable error codes surfaced by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    OutOfRange,
    NonFiniteWeight,
    GraphFileUnreadable,
    GraphFileInvalid,
    UndirectedGraph,
    CycleDetected,
    PartitionMismatch,
    ConfigParseError,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::OutOfRange => "E1001",
            Self::NonFiniteWeight => "E1002",
            Self::GraphFileUnreadable => "E2001",
            Self::GraphFileInvalid => "E2002",
            Self::UndirectedGraph => "E2003",
            Self::CycleDetected => "E3001",
            Self::PartitionMismatch => "E3002",
            Self::ConfigParseError => "E4001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::OutOfRange => "Node id out of range",
            Self::NonFiniteWeight => "Edge weight is not finite",
            Self::GraphFileUnreadable => "Graph file could not be read",
            Self::GraphFileInvalid => "Graph file is not a valid graph description",
            Self::UndirectedGraph => "Undirected graph supplied",
            Self::CycleDetected => "Graph contains a cycle",
            Self::PartitionMismatch => "Component partition does not match graph",
            Self::ConfigParseError => "Config file parse error",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::OutOfRange => Some("Node ids must lie in 0..n for the declared node count n."),
            Self::NonFiniteWeight => Some("Replace NaN/infinite weights with finite numbers."),
            Self::GraphFileUnreadable => Some("Check the path and file permissions."),
            Self::GraphFileInvalid => {
                Some("Expected {\"n\": N, \"edges\": [{\"u\": .., \"v\": .., \"w\": ..}]}.")
            }
            Self::UndirectedGraph => Some("Set \"directed\": true or omit the field."),
            Self::CycleDetected => Some("Run `strata topo --condensed` to sort the condensation."),
            Self::PartitionMismatch => {
                Some("Build the partition with find_components on the same graph.")
            }
            Self::ConfigParseError => Some("Fix syntax in strata.toml and retry."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCode, GraphError};
    use std::collections::HashSet;

    const ALL: [ErrorCode; 9] = [
        ErrorCode::OutOfRange,
        ErrorCode::NonFiniteWeight,
        ErrorCode::GraphFileUnreadable,
        ErrorCode::GraphFileInvalid,
        ErrorCode::UndirectedGraph,
        ErrorCode::CycleDetected,
        ErrorCode::PartitionMismatch,
        ErrorCode::ConfigParseError,
        ErrorCode::InternalUnexpected,
    ];

    #[test]
    fn all_codes_are_unique() {
        let mut seen = HashSet::new();
        for code in ALL {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        for code in ALL {
            let s = code.code();
            assert_eq!(s.len(), 5);
            assert!(s.starts_with('E'));
            assert!(s.chars().skip(1).all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn graph_errors_map_to_codes() {
        let err = GraphError::OutOfRange { node: 7, size: 3 };
        assert_eq!(err.code(), ErrorCode::OutOfRange);
        assert_eq!(err.to_string(), "node 7 is out of range for a graph of 3 nodes");
    }
}
