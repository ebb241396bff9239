//! Network measures tracked over a run's timesteps.
//!
//! All functions are pure over a borrowed [`Graph`]; they never look at
//! saturation state.

use std::collections::{BTreeMap, VecDeque};

use crate::{graph::Graph, types::NodeId};

/// Number of nodes for each total degree.
pub fn degree_distribution(graph: &Graph) -> BTreeMap<usize, usize> {
    let mut counts = BTreeMap::new();
    for id in 0..graph.node_count() {
        *counts.entry(graph.degree(id)).or_insert(0) += 1;
    }
    counts
}

/// Fraction of possible edges that exist, or `None` for fewer than two nodes.
///
/// A directed graph has `n (n - 1)` possible edges, an undirected one half that.
pub fn density(graph: &Graph) -> Option<f64> {
    let n = graph.node_count();
    if n <= 1 {
        return None;
    }
    let mut possible = (n * (n - 1)) as f64;
    if !graph.is_directed() {
        possible /= 2.0;
    }
    Some(graph.edge_count() as f64 / possible)
}

/// Weakly connected components, each sorted, ordered by smallest member.
pub fn connected_components(graph: &Graph) -> Vec<Vec<NodeId>> {
    let n = graph.node_count();
    let mut seen = vec![false; n];
    let mut components = Vec::new();
    let mut queue = VecDeque::new();

    for start in 0..n {
        if seen[start] {
            continue;
        }
        seen[start] = true;
        queue.push_back(start);
        let mut component = Vec::new();

        while let Some(node) = queue.pop_front() {
            component.push(node);
            for next in graph.neighbors(node) {
                if !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }

        component.sort_unstable();
        components.push(component);
    }
    components
}

/// Size-weighted mean of per-component average shortest path lengths.
///
/// Edges are treated as undirected. Components with a single node are
/// ignored; returns `None` if nothing is left.
pub fn average_path_length(graph: &Graph) -> Option<f64> {
    let mut dist = vec![usize::MAX; graph.node_count()];
    let mut queue = VecDeque::new();
    let mut weighted = 0.0;
    let mut total_nodes = 0_usize;

    for component in connected_components(graph) {
        let k = component.len();
        if k < 2 {
            continue;
        }

        let mut path_sum = 0_usize;
        for &source in &component {
            for &node in &component {
                dist[node] = usize::MAX;
            }
            dist[source] = 0;
            queue.push_back(source);
            while let Some(node) = queue.pop_front() {
                path_sum += dist[node];
                for next in graph.neighbors(node) {
                    if dist[next] == usize::MAX {
                        dist[next] = dist[node] + 1;
                        queue.push_back(next);
                    }
                }
            }
        }

        let mean = path_sum as f64 / (k * (k - 1)) as f64;
        weighted += mean * k as f64;
        total_nodes += k;
    }

    (total_nodes > 0).then(|| weighted / total_nodes as f64)
}

/// Betweenness centrality of every node (Brandes), following edge direction.
///
/// Values are normalised by `1 / ((n - 1)(n - 2))` when `n > 2`.
pub fn betweenness_centrality(graph: &Graph) -> Vec<f64> {
    let n = graph.node_count();
    let mut centrality = vec![0.0; n];

    let mut stack = Vec::with_capacity(n);
    let mut preds: Vec<Vec<NodeId>> = vec![Vec::new(); n];
    let mut sigma = vec![0.0_f64; n];
    let mut dist = vec![-1_i64; n];
    let mut delta = vec![0.0_f64; n];
    let mut queue = VecDeque::new();

    for s in 0..n {
        stack.clear();
        for p in &mut preds {
            p.clear();
        }
        sigma.fill(0.0);
        dist.fill(-1);
        delta.fill(0.0);

        sigma[s] = 1.0;
        dist[s] = 0;
        queue.push_back(s);

        while let Some(v) = queue.pop_front() {
            stack.push(v);
            for &w in graph.successors(v) {
                if dist[w] < 0 {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }
                if dist[w] == dist[v] + 1 {
                    sigma[w] += sigma[v];
                    preds[w].push(v);
                }
            }
        }

        while let Some(w) = stack.pop() {
            for &v in &preds[w] {
                delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
            }
            if w != s {
                centrality[w] += delta[w];
            }
        }
    }

    if n > 2 {
        let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
        for c in &mut centrality {
            *c *= scale;
        }
    }
    centrality
}

/// Counts of `values` in `bins` equal-width buckets spanning `[min, max]`.
///
/// The maximum lands in the last bucket. When every value is equal they all
/// land in the first one. Empty for no values or zero bins.
pub fn value_histogram(values: &[f64], bins: usize) -> Vec<usize> {
    let Some((lo, hi)) = min_max(values) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }

    let mut counts = vec![0; bins];
    let width = hi - lo;
    for &v in values {
        let bucket = if width > 0.0 {
            ((v - lo) / width * bins as f64) as usize
        } else {
            0
        };
        counts[bucket.min(bins - 1)] += 1;
    }
    counts
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let (&first, rest) = values.split_first()?;
    Some(
        rest.iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

/// The measures shown for one timestep.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkMetrics {
    pub degree_distribution: BTreeMap<usize, usize>,
    pub density: Option<f64>,
    pub average_path_length: Option<f64>,
    pub betweenness: Vec<f64>,
}

impl NetworkMetrics {
    pub fn compute(graph: &Graph) -> Self {
        Self {
            degree_distribution: degree_distribution(graph),
            density: density(graph),
            average_path_length: average_path_length(graph),
            betweenness: betweenness_centrality(graph),
        }
    }

    /// Smallest and largest betweenness value, if the graph has nodes.
    pub fn betweenness_range(&self) -> Option<(f64, f64)> {
        min_max(&self.betweenness)
    }

    /// Betweenness values bucketed over [`NetworkMetrics::betweenness_range`].
    pub fn betweenness_distribution(&self, bins: usize) -> Vec<usize> {
        value_histogram(&self.betweenness, bins)
    }
}
