//! Error types for the growth simulator.
//!
//! Every failure is reported synchronously at the point of misuse. A run that
//! fails is abandoned; the caller reconfigures and starts a new one.

use thiserror::Error;

use crate::types::NodeId;

/// Reasons a [`crate::config::GrowthConfig`] or rule parameter is rejected.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The final graph must hold at least the two seed nodes.
    #[error("target_node_count must be at least 2 (got {got})")]
    TargetTooSmall {
        /// The node count supplied by the caller.
        got: usize,
    },
    /// Nodes could never receive an edge with a zero threshold.
    #[error("saturation_threshold must be greater than zero")]
    ZeroThreshold,
    /// Uniform attachment probabilities live in `[0, 1]`.
    #[error("attachment probability must be a finite value in [0, 1] (got {got})")]
    ProbabilityOutOfRange {
        /// The probability supplied by the caller.
        got: f64,
    },
}

/// Error type produced when constructing or running a
/// [`crate::simulator::GrowthSimulator`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GrowthError {
    /// Construction parameters were rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    /// Preferential attachment was asked for a probability on an edgeless graph.
    #[error("preferential attachment is undefined for a graph with no edges")]
    DivisionUndefined,
    /// An attachment rule was queried for a node the graph does not contain.
    #[error("node {node} is not in the graph ({nodes} nodes)")]
    UnknownNode {
        /// The requested node id.
        node: NodeId,
        /// Number of nodes currently in the graph.
        nodes: usize,
    },
}

impl GrowthError {
    /// Return the stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration(_) => "GROWTH_INVALID_CONFIGURATION",
            Self::DivisionUndefined => "GROWTH_DIVISION_UNDEFINED",
            Self::UnknownNode { .. } => "GROWTH_UNKNOWN_NODE",
        }
    }
}

/// Convenient result alias for growth operations.
pub type Result<T, E = GrowthError> = std::result::Result<T, E>;
