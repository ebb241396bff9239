//! The growth loop.
//!
//! A run starts from two nodes joined by one edge and performs
//! `target_node_count - 2` steps. Step `n`:
//!
//! 1. adds node `n + 1`;
//! 2. scans the candidate list in arrival order. Saturated nodes are
//!    skipped. A node whose attachment degree has reached the threshold is
//!    saturated and skipped. Every other node gets one draw against the
//!    rule's probability, or two independent draws (one per direction) when
//!    the graph is directed;
//! 3. appends the newcomer to the candidate list.
//!
//! Later candidates in a step see the edges added for earlier ones.
//!
//! A step whose rule fails leaves the newcomer half-attached, so the
//! simulator keeps the error and refuses to step again.

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, info, instrument, warn};

use crate::{
    config::{GrowthConfig, SaturationPolicy},
    error::{GrowthError, Result},
    graph::Graph,
    rule::AttachmentRule,
    saturation::SaturationSet,
    snapshot::{GrowthView, SnapshotExporter},
    types::{Edge, NodeId},
};

/// What a single [`GrowthSimulator::step`] changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepOutcome {
    /// 1-based step index; equals the timestep of the resulting graph.
    pub step: usize,
    pub new_node: NodeId,
    /// Edges added this step as `(source, target)`, in the order they formed.
    pub edges_added: Vec<Edge>,
    /// Nodes that entered the saturation set this step.
    pub newly_saturated: Vec<NodeId>,
}

/// Summary statistics for a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrowthSummary {
    pub nodes: usize,
    pub edges: usize,
    pub saturated: usize,
    pub steps: usize,
}

/// Owns the state of one growth run.
///
/// Nothing is shared between runs: each simulator has its own graph,
/// saturation set, candidate list and random source.
#[derive(Debug)]
pub struct GrowthSimulator {
    config: GrowthConfig,
    rule: Box<dyn AttachmentRule>,
    graph: Graph,
    saturated: SaturationSet,
    candidates: Vec<NodeId>,
    steps_taken: usize,
    seed: u64,
    rng: StdRng,
    failure: Option<GrowthError>,
}

impl GrowthSimulator {
    /// Validates `config` and seeds the graph with nodes `0` and `1` joined
    /// by one edge.
    ///
    /// # Errors
    /// Returns [`crate::GrowthError::InvalidConfiguration`] if the config is
    /// rejected by [`GrowthConfig::validate`].
    pub fn new(config: GrowthConfig) -> Result<Self> {
        let rule = config.rule();
        Self::with_rule(config, rule)
    }

    /// Like [`GrowthSimulator::new`], but uses `rule` instead of
    /// `config.attachment`.
    ///
    /// # Errors
    /// See [`GrowthSimulator::new`].
    pub fn with_rule(config: GrowthConfig, rule: Box<dyn AttachmentRule>) -> Result<Self> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let mut graph = Graph::with_capacity(config.directed, config.target_node_count);
        let a = graph.add_node();
        let b = graph.add_node();
        graph.add_edge(a, b);

        let mut candidates = Vec::with_capacity(config.target_node_count);
        candidates.extend([a, b]);

        Ok(Self {
            config,
            rule,
            graph,
            saturated: SaturationSet::new(),
            candidates,
            steps_taken: 0,
            seed,
            rng: StdRng::seed_from_u64(seed),
            failure: None,
        })
    }

    pub fn config(&self) -> &GrowthConfig {
        &self.config
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn saturated(&self) -> &SaturationSet {
        &self.saturated
    }

    /// Node ids eligible for consideration, in arrival order.
    pub fn candidates(&self) -> &[NodeId] {
        &self.candidates
    }

    /// Seed of this run's random source. Equal to `config.seed` when one
    /// was given.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    pub fn total_steps(&self) -> usize {
        self.config.total_steps()
    }

    pub fn is_finished(&self) -> bool {
        self.steps_taken >= self.total_steps()
    }

    /// The error that stopped this run, if a step has failed.
    pub fn failure(&self) -> Option<&GrowthError> {
        self.failure.as_ref()
    }

    /// Borrowed view of the current timestep.
    pub fn view(&self) -> GrowthView<'_> {
        GrowthView {
            timestep: self.steps_taken,
            graph: &self.graph,
            saturated: &self.saturated,
        }
    }

    pub fn summary(&self) -> GrowthSummary {
        GrowthSummary {
            nodes: self.graph.node_count(),
            edges: self.graph.edge_count(),
            saturated: self.saturated.len(),
            steps: self.steps_taken,
        }
    }

    /// Performs one growth step, or returns `Ok(None)` if the run is complete.
    ///
    /// # Errors
    /// Propagates any error from the attachment rule. The failed step is
    /// not rolled back; every later call returns the same error.
    pub fn step(&mut self) -> Result<Option<StepOutcome>> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        if self.is_finished() {
            return Ok(None);
        }

        match self.grow() {
            Ok(outcome) => Ok(Some(outcome)),
            Err(err) => {
                warn!(
                    step = self.steps_taken + 1,
                    error = %err,
                    code = err.code(),
                    "growth step failed; run stopped"
                );
                self.failure = Some(err.clone());
                Err(err)
            }
        }
    }

    fn grow(&mut self) -> Result<StepOutcome> {
        let step = self.steps_taken + 1;
        let new_node = self.graph.add_node();
        let threshold = i64::from(self.config.saturation_threshold);
        let strict = self.config.saturation_policy == SaturationPolicy::StrictCap;
        let directed = self.graph.is_directed();

        let mut edges_added = Vec::new();
        let mut newly_saturated = Vec::new();

        for &m in &self.candidates {
            if self.saturated.contains(m) {
                continue;
            }
            // Checkpoint: a node found at the threshold dies before its attempt.
            if self.graph.attachment_degree(m) >= threshold {
                self.saturated.insert(m);
                newly_saturated.push(m);
                continue;
            }
            if strict && self.saturated.contains(new_node) {
                continue;
            }

            let p = self.rule.probability(&self.graph, m)?;

            let mut pairs = [Some((new_node, m)), None];
            if directed {
                pairs[1] = Some((m, new_node));
            }
            for (from, to) in pairs.into_iter().flatten() {
                // Draw unconditionally so both directions stay independent.
                let draw: f64 = self.rng.random();
                if strict && (self.saturated.contains(from) || self.saturated.contains(to)) {
                    continue;
                }
                if draw < p && self.graph.add_edge(from, to) {
                    edges_added.push((from, to));
                    if strict {
                        for node in [m, new_node] {
                            if self.graph.attachment_degree(node) >= threshold
                                && self.saturated.insert(node)
                            {
                                newly_saturated.push(node);
                            }
                        }
                    }
                }
            }
        }

        self.candidates.push(new_node);
        self.steps_taken = step;

        debug!(
            step,
            new_node,
            edges_added = edges_added.len(),
            newly_saturated = newly_saturated.len(),
            saturated = self.saturated.len(),
            "growth step complete"
        );

        Ok(StepOutcome {
            step,
            new_node,
            edges_added,
            newly_saturated,
        })
    }

    /// Runs every remaining step in place (final-graph mode).
    ///
    /// # Errors
    /// Stops at the first failing step; see [`GrowthSimulator::step`].
    #[instrument(
        name = "growth.run",
        skip(self),
        fields(
            nodes = self.config.target_node_count,
            directed = self.config.directed,
            rule = self.config.attachment.name(),
            seed = self.seed,
        ),
    )]
    pub fn run_to_end(&mut self) -> Result<GrowthSummary> {
        while self.step()?.is_some() {}
        Ok(self.finish())
    }

    /// Consumes the simulator and runs it to completion.
    ///
    /// # Errors
    /// See [`GrowthSimulator::run_to_end`].
    pub fn run(mut self) -> Result<GrowthSummary> {
        self.run_to_end()
    }

    /// Runs every remaining step, exporting the current timestep first and
    /// then the graph after each step (time-series mode).
    ///
    /// Starting from a fresh simulator this yields `total_steps() + 1`
    /// outputs, timesteps `0..=total_steps()`.
    ///
    /// # Errors
    /// Stops at the first failing step; outputs collected so far are dropped.
    #[instrument(
        name = "growth.run_with",
        skip(self, exporter),
        fields(
            nodes = self.config.target_node_count,
            directed = self.config.directed,
            rule = self.config.attachment.name(),
            seed = self.seed,
        ),
    )]
    pub fn run_with<E: SnapshotExporter>(&mut self, mut exporter: E) -> Result<Vec<E::Output>> {
        let remaining = self.total_steps().saturating_sub(self.steps_taken);
        let mut outputs = Vec::with_capacity(remaining + 1);
        outputs.push(exporter.export_snapshot(&self.view()));
        while self.step()?.is_some() {
            outputs.push(exporter.export_snapshot(&self.view()));
        }
        self.finish();
        Ok(outputs)
    }

    fn finish(&self) -> GrowthSummary {
        let summary = self.summary();
        info!(
            nodes = summary.nodes,
            edges = summary.edges,
            saturated = summary.saturated,
            threshold = self.config.saturation_threshold,
            "growth run finished"
        );
        summary
    }
}
