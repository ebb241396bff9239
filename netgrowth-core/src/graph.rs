use crate::types::{Edge, NodeId};

/// Adjacency for one node.
///
/// Undirected graphs keep every neighbour in `successors` and leave
/// `predecessors` empty; directed graphs split outgoing and incoming edges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeRecord {
    pub id: NodeId,
    pub successors: Vec<NodeId>,
    pub predecessors: Vec<NodeId>,
}

/// Growing simple graph with arrival-ordered node ids.
///
/// Nodes can only be appended, never removed, so ids stay contiguous in
/// `0..node_count()`. Self-loops and duplicate edges are rejected by
/// [`Graph::add_edge`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Graph {
    directed: bool,
    nodes: Vec<NodeRecord>,
    edge_count: usize,
}

impl NodeRecord {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            successors: Vec::with_capacity(4),
            predecessors: Vec::new(),
        }
    }
}

impl Graph {
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            nodes: Vec::new(),
            edge_count: 0,
        }
    }

    pub fn with_capacity(directed: bool, nodes: usize) -> Self {
        Self {
            directed,
            nodes: Vec::with_capacity(nodes),
            edge_count: 0,
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id < self.nodes.len()
    }

    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeRecord> {
        self.nodes.get(id)
    }

    /// Appends an isolated node and returns its id.
    pub fn add_node(&mut self) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(NodeRecord::new(id));
        id
    }

    /// Adds the edge `from -> to` (or `from -- to` when undirected).
    ///
    /// Returns `false` without touching the graph if either endpoint is
    /// unknown, the edge is a self-loop, or it already exists.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> bool {
        if from == to || !self.contains(from) || !self.contains(to) || self.has_edge(from, to) {
            return false;
        }

        if self.directed {
            self.nodes[from].successors.push(to);
            self.nodes[to].predecessors.push(from);
        } else {
            self.nodes[from].successors.push(to);
            self.nodes[to].successors.push(from);
        }
        self.edge_count += 1;
        true
    }

    /// Returns `true` if the edge exists. Undirected edges match either way round.
    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.nodes
            .get(from)
            .is_some_and(|n| n.successors.contains(&to))
    }

    /// Nodes reachable over one outgoing edge (all neighbours when undirected).
    pub fn successors(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map_or(&[], |n| n.successors.as_slice())
    }

    /// Nodes with an edge into `id` (all neighbours when undirected).
    pub fn predecessors(&self, id: NodeId) -> &[NodeId] {
        match self.nodes.get(id) {
            Some(n) if self.directed => &n.predecessors,
            Some(n) => &n.successors,
            None => &[],
        }
    }

    /// Every node adjacent to `id`, ignoring direction.
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let (succ, pred): (&[NodeId], &[NodeId]) = match self.nodes.get(id) {
            Some(n) => (&n.successors, &n.predecessors),
            None => (&[], &[]),
        };
        succ.iter().chain(pred.iter()).copied()
    }

    pub fn out_degree(&self, id: NodeId) -> usize {
        self.successors(id).len()
    }

    pub fn in_degree(&self, id: NodeId) -> usize {
        self.predecessors(id).len()
    }

    /// Total degree: neighbour count when undirected, `in + out` when directed.
    pub fn degree(&self, id: NodeId) -> usize {
        self.nodes
            .get(id)
            .map_or(0, |n| n.successors.len() + n.predecessors.len())
    }

    /// Degree used by the saturation test.
    ///
    /// Undirected graphs use the plain degree. Directed graphs use
    /// `out_degree - in_degree`, which can be negative.
    pub fn attachment_degree(&self, id: NodeId) -> i64 {
        if self.directed {
            self.out_degree(id) as i64 - self.in_degree(id) as i64
        } else {
            self.degree(id) as i64
        }
    }

    /// Iterates over all edges in node order.
    ///
    /// Undirected edges are reported once, as `(low, high)`.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        let directed = self.directed;
        self.nodes.iter().flat_map(move |n| {
            n.successors
                .iter()
                .filter(move |&&to| directed || n.id < to)
                .map(move |&to| (n.id, to))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(directed: bool, len: usize) -> Graph {
        let mut g = Graph::new(directed);
        for _ in 0..len {
            g.add_node();
        }
        for i in 1..len {
            g.add_edge(i - 1, i);
        }
        g
    }

    #[test]
    fn add_node_assigns_contiguous_ids() {
        let mut g = Graph::new(false);
        assert_eq!(g.add_node(), 0);
        assert_eq!(g.add_node(), 1);
        assert_eq!(g.add_node(), 2);
        assert_eq!(g.node_count(), 3);
        assert!(g.nodes().iter().enumerate().all(|(i, n)| n.id == i));
    }

    #[test]
    fn add_edge_rejects_self_loops_duplicates_and_unknown_nodes() {
        let mut g = path(false, 2);
        assert_eq!(g.edge_count(), 1);

        assert!(!g.add_edge(0, 0));
        assert!(!g.add_edge(0, 1));
        assert!(!g.add_edge(1, 0), "undirected reverse is the same edge");
        assert!(!g.add_edge(0, 7));
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn directed_graph_keeps_both_orientations_apart() {
        let mut g = path(true, 2);
        assert!(g.has_edge(0, 1));
        assert!(!g.has_edge(1, 0));

        assert!(g.add_edge(1, 0));
        assert!(!g.add_edge(1, 0));
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.edges().collect::<Vec<_>>(), vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn degrees_follow_direction() {
        let mut g = path(true, 3);
        g.add_edge(0, 2);

        assert_eq!(g.out_degree(0), 2);
        assert_eq!(g.in_degree(0), 0);
        assert_eq!(g.degree(0), 2);
        assert_eq!(g.attachment_degree(0), 2);

        assert_eq!(g.out_degree(2), 0);
        assert_eq!(g.in_degree(2), 2);
        assert_eq!(g.attachment_degree(2), -2);

        let mut neighbours: Vec<_> = g.neighbors(1).collect();
        neighbours.sort_unstable();
        assert_eq!(neighbours, vec![0, 2]);
    }

    #[test]
    fn undirected_edges_are_listed_once_in_low_high_order() {
        let mut g = path(false, 3);
        g.add_edge(2, 0);

        let edges: Vec<_> = g.edges().collect();
        assert_eq!(edges, vec![(0, 1), (0, 2), (1, 2)]);
        assert_eq!(g.degree(0), 2);
        assert_eq!(g.attachment_degree(0), 2);
        assert_eq!(g.predecessors(0), g.successors(0));
    }

    #[test]
    fn queries_on_unknown_nodes_are_empty() {
        let g = path(false, 2);
        assert_eq!(g.degree(5), 0);
        assert!(g.successors(5).is_empty());
        assert!(g.neighbors(5).next().is_none());
        assert!(g.node(5).is_none());
    }
}
