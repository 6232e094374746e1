//! Graph layout engine
//!
//! Computes normalized 2D/3D coordinates for every entity in a trust graph
//! using one of three strategies: a force-directed simulation, a circle, or
//! a grid. All strategies emit coordinates inside the visible interval
//! [-0.9, 0.9] on each used axis; the z axis stays 0 in 2D.
//!
//! The force-directed pass is the dominant CPU cost: pairwise repulsion is
//! O(n²) per iteration and runs synchronously to completion before anything
//! is drawn. No spatial partitioning is applied.

use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::graph::TrustGraph;

/// Half-width of the visible interval positions are normalized into
pub const VISIBLE_EXTENT: f32 = 0.9;

/// Radius of the circular layout
pub const CIRCLE_RADIUS: f32 = 0.8;

/// Half-width of the square region the grid layout fills
pub const GRID_EXTENT: f32 = 0.8;

/// Errors that can occur configuring a layout
#[derive(Error, Debug)]
pub enum LayoutError {
    /// Dimensionality outside {2, 3}
    #[error("invalid dimensions: {0} (expected 2 or 3)")]
    InvalidDimensions(u8),

    /// Unrecognized layout kind name
    #[error("unknown layout kind: {0:?} (expected force-directed, circular, or grid)")]
    UnknownLayout(String),
}

/// Layout strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutKind {
    ForceDirected,
    Circular,
    Grid,
}

impl FromStr for LayoutKind {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, LayoutError> {
        match s {
            "force-directed" => Ok(LayoutKind::ForceDirected),
            "circular" => Ok(LayoutKind::Circular),
            "grid" => Ok(LayoutKind::Grid),
            other => Err(LayoutError::UnknownLayout(other.to_string())),
        }
    }
}

/// Layout dimensionality: 2D or 3D
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Dimensions {
    Two,
    Three,
}

impl Dimensions {
    /// Number of coordinate axes in use
    pub fn axes(self) -> usize {
        match self {
            Dimensions::Two => 2,
            Dimensions::Three => 3,
        }
    }
}

impl TryFrom<u8> for Dimensions {
    type Error = LayoutError;

    fn try_from(value: u8) -> Result<Self, LayoutError> {
        match value {
            2 => Ok(Dimensions::Two),
            3 => Ok(Dimensions::Three),
            other => Err(LayoutError::InvalidDimensions(other)),
        }
    }
}

impl From<Dimensions> for u8 {
    fn from(dimensions: Dimensions) -> u8 {
        match dimensions {
            Dimensions::Two => 2,
            Dimensions::Three => 3,
        }
    }
}

/// Parameters for the force-directed simulation
#[derive(Debug, Clone)]
pub struct LayoutParams {
    /// Inverse-square repulsion constant between every node pair
    pub repulsion: f32,
    /// Linear (Hooke's-law) attraction constant along edges
    pub attraction: f32,
    /// Velocity decay factor per iteration, < 1 for convergence
    pub damping: f32,
    /// Distance floor for force evaluation, avoids singularities
    pub min_distance: f32,
    /// Number of simulation iterations
    pub iterations: usize,
    /// Seed for the random initial placement; None draws from entropy
    pub seed: Option<u64>,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            repulsion: 0.1,
            attraction: 0.01,
            damping: 0.9,
            min_distance: 0.1,
            iterations: 100,
            seed: None,
        }
    }
}

/// Immutable per-entity position snapshot, parallel to the graph's entity
/// order. Transient simulation state never escapes the layout pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutSnapshot {
    positions: Vec<[f32; 3]>,
}

impl LayoutSnapshot {
    /// Number of positions
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the snapshot is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of the entity at the given canonical index
    pub fn position(&self, index: usize) -> Option<[f32; 3]> {
        self.positions.get(index).copied()
    }

    /// All positions in canonical entity order
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }
}

/// A node's transient state during the force-directed pass
#[derive(Debug, Clone, Copy, Default)]
struct SimNode {
    pos: [f32; 3],
    vel: [f32; 3],
    force: [f32; 3],
}

/// Compute a layout for every entity in the graph.
///
/// An empty graph yields an empty snapshot. The force-directed strategy is
/// random-initialized (seedable via [`LayoutParams::seed`]); circular and
/// grid are fully deterministic.
pub fn compute_layout(
    graph: &TrustGraph,
    kind: LayoutKind,
    dimensions: Dimensions,
    params: &LayoutParams,
) -> LayoutSnapshot {
    let snapshot = match kind {
        LayoutKind::ForceDirected => force_directed(graph, dimensions, params),
        LayoutKind::Circular => circular(graph),
        LayoutKind::Grid => grid(graph),
    };
    debug!(
        kind = ?kind,
        entities = snapshot.len(),
        edges = graph.edge_count(),
        "computed layout"
    );
    snapshot
}

fn force_directed(
    graph: &TrustGraph,
    dimensions: Dimensions,
    params: &LayoutParams,
) -> LayoutSnapshot {
    let n = graph.entity_count();
    if n == 0 {
        return LayoutSnapshot::default();
    }

    let axes = dimensions.axes();
    let mut rng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut nodes = vec![SimNode::default(); n];
    for node in &mut nodes {
        for a in 0..axes {
            node.pos[a] = rng.gen_range(-1.0..=1.0);
        }
    }

    let edges: Vec<(usize, usize)> = graph.edge_indices().map(|(s, t, _)| (s, t)).collect();

    for _ in 0..params.iterations {
        for node in &mut nodes {
            node.force = [0.0; 3];
        }

        // Pairwise repulsion, applied equal and opposite
        for i in 0..n {
            for j in (i + 1)..n {
                let mut delta = [0.0f32; 3];
                let mut dist_sq = 0.0;
                for a in 0..axes {
                    delta[a] = nodes[j].pos[a] - nodes[i].pos[a];
                    dist_sq += delta[a] * delta[a];
                }
                let dist = dist_sq.sqrt().max(params.min_distance);
                let force = params.repulsion / (dist * dist);
                for a in 0..axes {
                    let f = delta[a] / dist * force;
                    nodes[i].force[a] -= f;
                    nodes[j].force[a] += f;
                }
            }
        }

        // Edge attraction, linear in distance
        for &(s, t) in &edges {
            let mut delta = [0.0f32; 3];
            let mut dist_sq = 0.0;
            for a in 0..axes {
                delta[a] = nodes[t].pos[a] - nodes[s].pos[a];
                dist_sq += delta[a] * delta[a];
            }
            let dist = dist_sq.sqrt().max(params.min_distance);
            let force = params.attraction * dist;
            for a in 0..axes {
                let f = delta[a] / dist * force;
                nodes[s].force[a] += f;
                nodes[t].force[a] -= f;
            }
        }

        // Integrate
        for node in &mut nodes {
            for a in 0..axes {
                node.vel[a] = (node.vel[a] + node.force[a]) * params.damping;
                node.pos[a] += node.vel[a];
            }
        }
    }

    // Coordinates must stay finite through normalization
    for node in &mut nodes {
        for a in 0..axes {
            if !node.pos[a].is_finite() {
                node.pos[a] = 0.0;
            }
        }
    }

    // Normalize each axis independently into [-VISIBLE_EXTENT, VISIBLE_EXTENT]
    let mut positions = vec![[0.0f32; 3]; n];
    for a in 0..axes {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for node in &nodes {
            min = min.min(node.pos[a]);
            max = max.max(node.pos[a]);
        }
        let range = if max - min > f32::EPSILON {
            max - min
        } else {
            1.0
        };
        for (node, out) in nodes.iter().zip(&mut positions) {
            out[a] = ((node.pos[a] - min) / range) * (2.0 * VISIBLE_EXTENT) - VISIBLE_EXTENT;
        }
    }

    LayoutSnapshot { positions }
}

fn circular(graph: &TrustGraph) -> LayoutSnapshot {
    let n = graph.entity_count();
    let positions = (0..n)
        .map(|i| {
            let angle = 2.0 * std::f32::consts::PI * i as f32 / n as f32;
            [
                angle.cos() * CIRCLE_RADIUS,
                angle.sin() * CIRCLE_RADIUS,
                0.0,
            ]
        })
        .collect();
    LayoutSnapshot { positions }
}

fn grid(graph: &TrustGraph) -> LayoutSnapshot {
    let n = graph.entity_count();
    if n == 0 {
        return LayoutSnapshot::default();
    }

    let cols = (n as f64).sqrt().ceil() as usize;
    let rows = n.div_ceil(cols);
    let positions = (0..n)
        .map(|i| {
            let col = i % cols;
            let row = i / cols;
            // Guard the single-column/single-row case against division by zero
            let x = col as f32 / (cols - 1).max(1) as f32 * (2.0 * GRID_EXTENT) - GRID_EXTENT;
            let y = row as f32 / (rows - 1).max(1) as f32 * (2.0 * GRID_EXTENT) - GRID_EXTENT;
            [x, y, 0.0]
        })
        .collect();
    LayoutSnapshot { positions }
}
