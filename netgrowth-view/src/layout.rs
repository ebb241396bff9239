//! Deterministic force-directed node layout.
//!
//! Positions live in world space and only ever grow: a node keeps its
//! position for the whole run, so scrubbing back through earlier timesteps
//! shows every node where it will later be drawn.

use std::f32::consts::PI;

use glam::Vec2;
use netgrowth_core::{graph::Graph, types::NodeId};

/// Preferred edge length in world units.
const SPACING: f32 = 12.0;

/// Angle between consecutive nodes on the placement spiral.
const GOLDEN_ANGLE: f32 = PI * (3.0 - 2.236_068);

#[derive(Debug, Default)]
pub struct Layout {
    pos: Vec<Vec2>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.pos
    }

    pub fn position(&self, id: NodeId) -> Option<Vec2> {
        self.pos.get(id).copied()
    }

    pub fn clear(&mut self) {
        self.pos.clear();
    }

    /// Places every node of `graph` that has no position yet.
    ///
    /// A new node starts at the centroid of its already-placed neighbours,
    /// nudged along the spiral so it never lands exactly on one of them.
    /// Isolated nodes go straight onto the spiral.
    pub fn sync(&mut self, graph: &Graph) {
        for id in self.pos.len()..graph.node_count() {
            let spiral = spiral_point(id);

            let mut sum = Vec2::ZERO;
            let mut count = 0_u32;
            for n in graph.neighbors(id) {
                if let Some(p) = self.pos.get(n) {
                    sum += *p;
                    count += 1;
                }
            }

            let p = if count > 0 {
                sum / count as f32 + spiral.normalize_or_zero() * SPACING * 0.5
            } else {
                spiral
            };
            self.pos.push(p);
        }
    }

    /// Runs `iterations` rounds of Fruchterman-Reingold relaxation.
    ///
    /// Every node pair repels with `k² / d` and every edge attracts with
    /// `d² / k`, where `k` is [`SPACING`]. A node moves at most `SPACING`
    /// per round.
    pub fn relax(&mut self, graph: &Graph, iterations: usize) {
        self.sync(graph);
        let n = self.pos.len();
        if n < 2 {
            return;
        }

        let k = SPACING;
        let mut disp = vec![Vec2::ZERO; n];

        for _ in 0..iterations {
            disp.fill(Vec2::ZERO);

            for i in 0..n {
                for j in (i + 1)..n {
                    let mut delta = self.pos[i] - self.pos[j];
                    if delta.length_squared() < 1e-6 {
                        delta = spiral_point(i + j + 1).normalize_or_zero() * 1e-2;
                    }
                    let d = delta.length().max(1e-2);
                    let push = delta / d * (k * k / d);
                    disp[i] += push;
                    disp[j] -= push;
                }
            }

            for (from, to) in graph.edges() {
                let delta = self.pos[from] - self.pos[to];
                let d = delta.length();
                if d < 1e-6 {
                    continue;
                }
                let pull = delta / d * (d * d / k);
                disp[from] -= pull;
                disp[to] += pull;
            }

            for (p, d) in self.pos.iter_mut().zip(&disp) {
                *p += d.clamp_length_max(SPACING);
            }
        }
    }

    /// Axis-aligned bounds of all placed nodes, as `(min, max)`.
    pub fn bounds(&self) -> Option<(Vec2, Vec2)> {
        let first = *self.pos.first()?;
        Some(
            self.pos
                .iter()
                .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p))),
        )
    }
}

fn spiral_point(id: NodeId) -> Vec2 {
    let r = SPACING * (id as f32 + 0.5).sqrt();
    let theta = id as f32 * GOLDEN_ANGLE;
    Vec2::new(theta.cos(), theta.sin()) * r
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(len: usize) -> Graph {
        let mut g = Graph::new(false);
        for _ in 0..len {
            g.add_node();
        }
        for i in 1..len {
            g.add_edge(i - 1, i);
        }
        g
    }

    #[test]
    fn sync_places_every_node_once() {
        let mut g = path(3);
        let mut layout = Layout::new();
        layout.sync(&g);
        assert_eq!(layout.positions().len(), 3);

        let before = layout.positions().to_vec();
        let id = g.add_node();
        g.add_edge(0, id);
        layout.sync(&g);

        assert_eq!(layout.positions().len(), 4);
        assert_eq!(&layout.positions()[..3], before.as_slice());
    }

    #[test]
    fn new_nodes_start_near_their_neighbours() {
        let mut g = path(2);
        let mut layout = Layout::new();
        layout.sync(&g);

        let id = g.add_node();
        g.add_edge(id, 0);
        g.add_edge(id, 1);
        layout.sync(&g);

        let p0 = layout.position(0).expect("placed");
        let p1 = layout.position(1).expect("placed");
        let p = layout.position(id).expect("placed");
        let centroid = (p0 + p1) / 2.0;
        assert!((p - centroid).length() <= SPACING * 0.5 + 1e-4);
    }

    #[test]
    fn positions_are_distinct_and_deterministic() {
        let g = path(30);
        let mut a = Layout::new();
        let mut b = Layout::new();
        a.relax(&g, 20);
        b.relax(&g, 20);
        assert_eq!(a.positions(), b.positions());

        for i in 0..30 {
            for j in (i + 1)..30 {
                assert!(a.positions()[i].distance(a.positions()[j]) > 1e-3);
            }
        }
    }

    #[test]
    fn relaxation_pulls_neighbours_towards_spacing() {
        let mut g = Graph::new(false);
        g.add_node();
        g.add_node();
        g.add_edge(0, 1);

        let mut layout = Layout::new();
        layout.sync(&g);
        layout.pos[1] = Vec2::new(200.0, 0.0);
        layout.pos[0] = Vec2::ZERO;
        let before = layout.pos[0].distance(layout.pos[1]);

        layout.relax(&g, 10);
        let after = layout.pos[0].distance(layout.pos[1]);
        assert!(after < before);
        assert!(layout.pos.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn bounds_cover_all_nodes() {
        let g = path(5);
        let mut layout = Layout::new();
        layout.sync(&g);
        let (lo, hi) = layout.bounds().expect("non-empty");
        for p in layout.positions() {
            assert!(p.cmpge(lo).all() && p.cmple(hi).all());
        }
        assert!(Layout::new().bounds().is_none());
    }
}
