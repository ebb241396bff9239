//! Attachment rules deciding how likely a newcomer is to link to a candidate.
//!
//! A rule only reads the graph, so calling it once per candidate never
//! changes what later candidates in the same step see, apart from the
//! edges the simulator itself adds in between.

use std::fmt;

use crate::{
    error::{ConfigError, GrowthError, Result},
    graph::Graph,
    types::NodeId,
};

/// Strategy computing the attachment probability for one candidate node.
pub trait AttachmentRule: fmt::Debug {
    /// Probability in `[0, 1]` that the newcomer attaches to `node`.
    ///
    /// # Errors
    /// Implementations report [`GrowthError`] when the probability is not
    /// defined for the current graph state.
    fn probability(&self, graph: &Graph, node: NodeId) -> Result<f64>;
}

/// Constant probability, independent of graph state (binomial growth).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Uniform {
    p: f64,
}

impl Uniform {
    /// Creates a uniform rule.
    ///
    /// # Errors
    /// Returns [`GrowthError::InvalidConfiguration`] if `p` is not a finite
    /// value in `[0, 1]`.
    pub fn new(p: f64) -> Result<Self> {
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::ProbabilityOutOfRange { got: p }.into());
        }
        Ok(Self { p })
    }

    pub fn p(&self) -> f64 {
        self.p
    }
}

impl Default for Uniform {
    fn default() -> Self {
        Self { p: 0.5 }
    }
}

impl AttachmentRule for Uniform {
    fn probability(&self, _graph: &Graph, _node: NodeId) -> Result<f64> {
        Ok(self.p)
    }
}

/// Degree-proportional probability `degree / (2 * edges)` (scale-free growth).
///
/// Directed graphs use the total degree `in + out`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Preferential;

impl AttachmentRule for Preferential {
    fn probability(&self, graph: &Graph, node: NodeId) -> Result<f64> {
        if !graph.contains(node) {
            return Err(GrowthError::UnknownNode {
                node,
                nodes: graph.node_count(),
            });
        }
        let edges = graph.edge_count();
        if edges == 0 {
            return Err(GrowthError::DivisionUndefined);
        }
        Ok(graph.degree(node) as f64 / (2 * edges) as f64)
    }
}

/// The built-in rules, as a plain value that configs can carry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Attachment {
    Uniform(Uniform),
    Preferential(Preferential),
}

impl Attachment {
    /// Shorthand for a validated [`Uniform`] rule.
    ///
    /// # Errors
    /// See [`Uniform::new`].
    pub fn uniform(p: f64) -> Result<Self> {
        Uniform::new(p).map(Self::Uniform)
    }

    pub fn preferential() -> Self {
        Self::Preferential(Preferential)
    }

    /// Short lowercase label used in logs and the viewer.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Uniform(_) => "uniform",
            Self::Preferential(_) => "preferential",
        }
    }
}

impl Default for Attachment {
    fn default() -> Self {
        Self::Uniform(Uniform::default())
    }
}

impl AttachmentRule for Attachment {
    fn probability(&self, graph: &Graph, node: NodeId) -> Result<f64> {
        match self {
            Self::Uniform(rule) => rule.probability(graph, node),
            Self::Preferential(rule) => rule.probability(graph, node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn star(leaves: usize) -> Graph {
        let mut g = Graph::new(false);
        let hub = g.add_node();
        for _ in 0..leaves {
            let leaf = g.add_node();
            g.add_edge(hub, leaf);
        }
        g
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.5)]
    #[case(1.0)]
    fn uniform_ignores_graph_state(#[case] p: f64) {
        let rule = Uniform::new(p).expect("probability is in range");
        let g = star(3);
        for node in 0..g.node_count() {
            assert_eq!(rule.probability(&g, node).expect("uniform never fails"), p);
        }
    }

    #[rstest]
    #[case(-0.1)]
    #[case(1.5)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn uniform_rejects_out_of_range_probabilities(#[case] p: f64) {
        let err = Uniform::new(p).expect_err("probability must be rejected");
        assert!(matches!(
            err,
            GrowthError::InvalidConfiguration(ConfigError::ProbabilityOutOfRange { .. })
        ));
    }

    #[test]
    fn preferential_is_degree_over_twice_edges() {
        let g = star(3);
        let rule = Preferential;

        assert_eq!(rule.probability(&g, 0).expect("hub"), 0.5);
        assert_eq!(rule.probability(&g, 1).expect("leaf"), 1.0 / 6.0);

        let total: f64 = (0..g.node_count())
            .map(|n| rule.probability(&g, n).expect("node exists"))
            .sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn preferential_uses_total_degree_when_directed() {
        let mut g = Graph::new(true);
        g.add_node();
        g.add_node();
        g.add_edge(0, 1);
        g.add_edge(1, 0);

        let p = Preferential.probability(&g, 0).expect("node exists");
        assert_eq!(p, 0.5);
    }

    #[test]
    fn preferential_on_edgeless_graph_is_undefined() {
        let mut g = Graph::new(false);
        g.add_node();
        assert_eq!(
            Preferential.probability(&g, 0),
            Err(GrowthError::DivisionUndefined)
        );
    }

    #[test]
    fn preferential_rejects_unknown_nodes() {
        let g = star(1);
        assert_eq!(
            Preferential.probability(&g, 4),
            Err(GrowthError::UnknownNode { node: 4, nodes: 2 })
        );
    }

    #[test]
    fn attachment_delegates_to_inner_rule() {
        let g = star(1);
        let uniform = Attachment::uniform(0.25).expect("in range");
        assert_eq!(uniform.probability(&g, 0).expect("uniform"), 0.25);
        assert_eq!(uniform.name(), "uniform");

        let pref = Attachment::preferential();
        assert_eq!(pref.probability(&g, 1).expect("preferential"), 0.5);
        assert_eq!(pref.name(), "preferential");
    }
}
