//! Horizontal coordinates for an ordered layering.
//!
//! Each layer is one projection problem: a variable per node wants to sit under the mean of its
//! predecessors, and every adjacent pair is kept apart by half of both widths plus
//! `node_separation`.

use crate::error::{Error, Result};
use crate::layer_arrays::LayerArrays;
use crate::proper_graph::ProperLayeredGraph;
use narwhal_projection::{CancelToken, Solution, Solver, SolverParameters};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PositionSettings {
    pub node_separation: f64,
    pub solver: SolverParameters,
}

impl Default for PositionSettings {
    fn default() -> Self {
        Self {
            node_separation: 10.0,
            solver: SolverParameters::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Coordinates {
    /// Center x of every node, indexed by node.
    pub x: Vec<f64>,
    /// One entry per layer, top to bottom.
    pub solutions: Vec<Solution>,
}

impl Coordinates {
    pub fn cancelled(&self) -> bool {
        self.solutions.iter().any(|s| s.cancelled)
    }
}

/// Assigns x coordinates layer by layer, top to bottom. `widths` is indexed by node and must
/// cover virtual nodes too (zero is fine).
pub fn assign_coordinates(
    g: &ProperLayeredGraph,
    layers: &LayerArrays,
    widths: &[f64],
    settings: &PositionSettings,
    cancel: &CancelToken,
) -> Result<Coordinates> {
    layers.validate()?;
    g.validate(layers)?;
    if widths.len() < layers.node_count() {
        return Err(Error::MissingWidth { node: widths.len() });
    }

    let mut x = vec![0.0; layers.node_count()];
    let mut solutions = Vec::with_capacity(layers.layer_count());
    let mut desired: Vec<f64> = Vec::new();

    for layer in layers.layers() {
        desired.clear();
        let mut packed = 0.0;
        for (i, &v) in layer.iter().enumerate() {
            if i > 0 {
                packed += gap(widths, layer[i - 1], v, settings.node_separation);
            }
            let (sum, count) = g
                .predecessors(v)
                .fold((0.0, 0usize), |(s, c), u| (s + x[u], c + 1));
            desired.push(if count == 0 {
                packed
            } else {
                sum / count as f64
            });
        }

        let mut solver = Solver::new();
        let mut ids = Vec::with_capacity(layer.len());
        for &d in &desired {
            ids.push(solver.add_variable(d, 1.0, 1.0)?);
        }
        for (i, pair) in ids.windows(2).enumerate() {
            let separation = gap(widths, layer[i], layer[i + 1], settings.node_separation);
            solver.add_constraint(pair[0], pair[1], separation, false)?;
        }

        let solution = solver.solve(&settings.solver, cancel)?;
        for (&v, &id) in layer.iter().zip(&ids) {
            x[v] = solver.position(id).unwrap_or(0.0);
        }
        tracing::trace!(
            nodes = layer.len(),
            goal = solution.goal_function_value,
            "layer positioned"
        );
        solutions.push(solution);
    }

    Ok(Coordinates { x, solutions })
}

fn gap(widths: &[f64], left: usize, right: usize, node_separation: f64) -> f64 {
    (widths[left] + widths[right]) / 2.0 + node_separation
}
