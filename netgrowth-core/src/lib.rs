//! Growing-network simulator with stochastic attachment and node saturation.
//!
//! Main components:
//! - [`simulator`] - the growth loop and its run modes.
//! - [`rule`] - attachment rules (uniform and preferential).
//! - [`config`] - per-run construction parameters.
//! - [`graph`] - the arrival-ordered graph being grown.
//! - [`saturation`] - the monotonic set of saturated ("dead") nodes.
//! - [`snapshot`] - per-timestep export boundary.
//! - [`metrics`] - degree distribution, density, path length, betweenness.
//! - [`error`] - error types.
//! - [`types`] - shared type aliases and IDs.

pub mod config;
pub mod error;
pub mod graph;
pub mod metrics;
pub mod rule;
pub mod saturation;
pub mod simulator;
pub mod snapshot;
pub mod types;

pub use config::{GrowthConfig, SaturationPolicy};
pub use error::{ConfigError, GrowthError, Result};
pub use graph::Graph;
pub use rule::{Attachment, AttachmentRule, Preferential, Uniform};
pub use simulator::{GrowthSimulator, GrowthSummary, StepOutcome};
pub use snapshot::{GrowthView, Snapshot, SnapshotExporter, SnapshotRecorder};
