//! Append-only record of a run that can be replayed at any timestep.
//!
//! Edges and saturations only ever accumulate, so each timestep is stored as
//! a pair of prefix lengths into two shared logs instead of a full copy of
//! the graph.

use std::collections::BTreeMap;

use netgrowth_core::{
    GrowthView, StepOutcome,
    graph::Graph,
    metrics,
    types::{Edge, NodeId},
};

/// Graphs up to this size get an average path length per timestep.
/// Larger graphs only get one on demand.
pub const PATH_LENGTH_NODE_LIMIT: usize = 400;

/// Cheap per-timestep measures, recorded as the run grows.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameStats {
    pub degree_distribution: BTreeMap<usize, usize>,
    pub density: Option<f64>,
    pub average_path_length: Option<f64>,
}

impl FrameStats {
    fn measure(graph: &Graph) -> Self {
        Self {
            degree_distribution: metrics::degree_distribution(graph),
            density: metrics::density(graph),
            average_path_length: (graph.node_count() <= PATH_LENGTH_NODE_LIMIT)
                .then(|| metrics::average_path_length(graph))
                .flatten(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Frame {
    node_count: usize,
    edge_end: usize,
    saturated_end: usize,
}

#[derive(Clone, Debug)]
pub struct Timeline {
    directed: bool,
    /// Edges in the order they formed.
    edges: Vec<Edge>,
    /// Ids in the order they saturated.
    saturated: Vec<NodeId>,
    frames: Vec<Frame>,
    stats: Vec<FrameStats>,
}

impl Timeline {
    /// Starts a timeline at the run's current state.
    pub fn start(view: &GrowthView<'_>) -> Self {
        let mut timeline = Self {
            directed: view.graph.is_directed(),
            edges: view.graph.edges().collect(),
            saturated: view.saturated.iter().collect(),
            frames: Vec::new(),
            stats: Vec::new(),
        };
        timeline.push_frame(view.graph);
        timeline
    }

    /// Appends the timestep produced by `outcome`; `view` is the run after it.
    pub fn record(&mut self, view: &GrowthView<'_>, outcome: &StepOutcome) {
        self.edges.extend_from_slice(&outcome.edges_added);
        self.saturated.extend_from_slice(&outcome.newly_saturated);
        self.push_frame(view.graph);
    }

    fn push_frame(&mut self, graph: &Graph) {
        self.frames.push(Frame {
            node_count: graph.node_count(),
            edge_end: self.edges.len(),
            saturated_end: self.saturated.len(),
        });
        self.stats.push(FrameStats::measure(graph));
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Index of the most recent timestep.
    pub fn latest(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }

    pub fn node_count(&self, timestep: usize) -> usize {
        self.frames.get(timestep).map_or(0, |f| f.node_count)
    }

    /// Edges present at `timestep`, in formation order.
    pub fn edges(&self, timestep: usize) -> &[Edge] {
        self.frames
            .get(timestep)
            .map_or(&[], |f| &self.edges[..f.edge_end])
    }

    /// Nodes saturated by `timestep`, in saturation order.
    pub fn saturated(&self, timestep: usize) -> &[NodeId] {
        self.frames
            .get(timestep)
            .map_or(&[], |f| &self.saturated[..f.saturated_end])
    }

    /// Edges that formed in the step leading to `timestep`.
    pub fn edges_added(&self, timestep: usize) -> &[Edge] {
        let start = match timestep.checked_sub(1) {
            Some(prev) => self.frames.get(prev).map_or(0, |f| f.edge_end),
            None => 0,
        };
        self.edges(timestep).get(start..).unwrap_or(&[])
    }

    pub fn stats(&self, timestep: usize) -> Option<&FrameStats> {
        self.stats.get(timestep)
    }

    /// Per-timestep series of one measure, for plotting.
    pub fn series(&self, measure: impl Fn(&FrameStats) -> Option<f64>) -> Vec<Option<f64>> {
        self.stats.iter().map(measure).collect()
    }

    /// Rebuilds the graph as it was at `timestep`.
    pub fn graph(&self, timestep: usize) -> Option<Graph> {
        let frame = self.frames.get(timestep)?;
        let mut graph = Graph::with_capacity(self.directed, frame.node_count);
        for _ in 0..frame.node_count {
            graph.add_node();
        }
        for &(from, to) in &self.edges[..frame.edge_end] {
            graph.add_edge(from, to);
        }
        Some(graph)
    }
}
