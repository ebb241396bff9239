/// Identifier for a node in a [`crate::graph::Graph`].
///
/// Ids are assigned in arrival order starting at `0`, so an id is also
/// an index into `Graph::nodes`. It is only meaningful within the
/// lifetime of a given `Graph` instance.
pub type NodeId = usize;

/// An edge as an ordered `(source, target)` pair.
///
/// For undirected graphs the pair is normalised so that `source < target`.
pub type Edge = (NodeId, NodeId);
