use crate::types::NodeId;

/// Nodes that reached the threshold and no longer receive edges.
///
/// Membership is monotonic: nodes are only ever added. Insertion order is
/// kept so callers can see when each node died.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SaturationSet {
    order: Vec<NodeId>,
    member: Vec<bool>,
}

impl SaturationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `id` as saturated. Returns `false` if it already was.
    pub fn insert(&mut self, id: NodeId) -> bool {
        if self.contains(id) {
            return false;
        }
        if id >= self.member.len() {
            self.member.resize(id + 1, false);
        }
        self.member[id] = true;
        self.order.push(id);
        true
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.member.get(id).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Saturated ids in the order they were added.
    pub fn as_slice(&self) -> &[NodeId] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.order.iter().copied()
    }
}
