//! Hand-off point between the simulator and whatever consumes its graphs.
//!
//! The simulator does not know about any serialization format. It passes a
//! borrowed [`GrowthView`] to a [`SnapshotExporter`], once for the seed graph
//! and once after every step, and collects whatever the exporter returns.

use crate::{graph::Graph, saturation::SaturationSet, types::{Edge, NodeId}};

/// Read-only view of a run at one timestep.
///
/// Timestep `0` is the seed graph; timestep `k` is the graph after step `k`.
#[derive(Clone, Copy, Debug)]
pub struct GrowthView<'a> {
    pub timestep: usize,
    pub graph: &'a Graph,
    pub saturated: &'a SaturationSet,
}

/// Turns a [`GrowthView`] into some owned output.
pub trait SnapshotExporter {
    type Output;

    fn export_snapshot(&mut self, view: &GrowthView<'_>) -> Self::Output;
}

impl<F, T> SnapshotExporter for F
where
    F: FnMut(&GrowthView<'_>) -> T,
{
    type Output = T;

    fn export_snapshot(&mut self, view: &GrowthView<'_>) -> T {
        self(view)
    }
}

/// Owned copy of one timestep, the in-memory counterpart of a
/// `timestep_N` graph file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub timestep: usize,
    pub directed: bool,
    pub node_count: usize,
    /// Edges in [`Graph::edges`] order.
    pub edges: Vec<Edge>,
    /// Saturated ids in the order they died.
    pub saturated: Vec<NodeId>,
}

impl Snapshot {
    pub fn capture(view: &GrowthView<'_>) -> Self {
        Self {
            timestep: view.timestep,
            directed: view.graph.is_directed(),
            node_count: view.graph.node_count(),
            edges: view.graph.edges().collect(),
            saturated: view.saturated.iter().collect(),
        }
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Rebuilds a standalone [`Graph`] from the captured edges.
    pub fn to_graph(&self) -> Graph {
        let mut graph = Graph::with_capacity(self.directed, self.node_count);
        for _ in 0..self.node_count {
            graph.add_node();
        }
        for &(from, to) in &self.edges {
            graph.add_edge(from, to);
        }
        graph
    }
}

/// Exporter producing [`Snapshot`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct SnapshotRecorder;

impl SnapshotExporter for SnapshotRecorder {
    type Output = Snapshot;

    fn export_snapshot(&mut self, view: &GrowthView<'_>) -> Snapshot {
        Snapshot::capture(view)
    }
}
