//! Random graph construction for one dataset.
//!
//! Every graph starts from a shuffled node ranking and a backbone chain
//! `rank[0] -> rank[1] -> ... -> rank[n-1]`, so `rank[0]` reaches every
//! node. Extra forward edges (lower rank to higher rank) are added with
//! probability `density`, and backbone edges occasionally get a parallel
//! twin with a different weight. Forward edges alone never close a cycle;
//! cycles come only from the back edges each [`Shape`] adds:
//!
//! | Shape         | Back edges | Non-trivial SCCs |
//! |---------------|------------|------------------|
//! | `Acyclic`     | none       | 0 |
//! | `SingleCycle` | one        | 1 |
//! | `MultiScc`    | one per disjoint rank segment | `cycles`, capped at `n / 2` |

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use strata_core::{Graph, GraphError, NodeId};

/// Cycle structure of a generated graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Acyclic,
    SingleCycle,
    MultiScc,
}

impl Shape {
    pub const ALL: [Self; 3] = [Self::Acyclic, Self::SingleCycle, Self::MultiScc];

    /// Shape used for the `index`-th dataset of a tier (zero-based).
    #[must_use]
    pub const fn for_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Acyclic => "acyclic",
            Self::SingleCycle => "single_cycle",
            Self::MultiScc => "multi_scc",
        }
    }
}

/// Knobs for dataset generation.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub datasets_per_tier: usize,
    /// Probability of each extra forward edge, clamped to `[0, 1]`.
    pub density: f64,
    /// Number of disjoint cycles in `MultiScc` graphs (at least 2).
    pub cycles: usize,
    /// Weights are drawn uniformly from `1..=max_weight`.
    pub max_weight: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            datasets_per_tier: 3,
            density: 0.15,
            cycles: 3,
            max_weight: 10,
        }
    }
}

impl GeneratorConfig {
    /// Label stored in each dataset's `weight_model` field.
    #[must_use]
    pub fn weight_model(&self) -> String {
        format!("uniform_int[1,{}]", self.max_weight.max(1))
    }

    fn forward_probability(&self) -> f64 {
        if self.density.is_finite() {
            self.density.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Build one random graph with `nodes` nodes. Returns the graph and a
/// source node that reaches every other node.
///
/// # Errors
///
/// Only if an internally generated edge is rejected by the graph model,
/// which would indicate a bug here.
pub fn generate_graph(
    rng: &mut impl Rng,
    nodes: usize,
    shape: Shape,
    config: &GeneratorConfig,
) -> Result<(Graph, Option<NodeId>), GraphError> {
    let mut rank: Vec<NodeId> = (0..nodes).collect();
    rank.shuffle(rng);

    let density = config.forward_probability();
    let mut pairs: Vec<(usize, usize)> = Vec::new();

    for i in 1..nodes {
        pairs.push((i - 1, i));
        if rng.gen_bool(density / 2.0) {
            pairs.push((i - 1, i));
        }
    }
    for i in 0..nodes {
        for j in (i + 2)..nodes {
            if rng.gen_bool(density) {
                pairs.push((i, j));
            }
        }
    }

    for (start, end) in cycle_segments(rng, nodes, shape, config.cycles) {
        pairs.push((end, start));
    }

    let max_weight = config.max_weight.max(1);
    let mut graph = Graph::new(nodes);
    for (from, to) in pairs {
        let weight = f64::from(rng.gen_range(1..=max_weight));
        graph.add_edge(rank[from], rank[to], weight)?;
    }

    Ok((graph, rank.first().copied()))
}

/// Rank ranges `(start, end)` closed into a cycle by a back edge
/// `rank[end] -> rank[start]`. Ranges never overlap.
fn cycle_segments(
    rng: &mut impl Rng,
    nodes: usize,
    shape: Shape,
    cycles: usize,
) -> Vec<(usize, usize)> {
    let count = match shape {
        Shape::Acyclic => 0,
        Shape::SingleCycle => usize::from(nodes >= 2),
        Shape::MultiScc => cycles.max(2).min(nodes / 2),
    };
    if count == 0 {
        return Vec::new();
    }

    let width = nodes / count;
    (0..count)
        .map(|segment| {
            let lo = segment * width;
            let hi = if segment + 1 == count { nodes } else { lo + width };
            let start = rng.gen_range(lo..hi - 1);
            let end = rng.gen_range(start + 1..hi);
            (start, end)
        })
        .collect()
}
