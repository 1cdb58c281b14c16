use serde::{Deserialize, Serialize};

/// Tuning knobs for [`crate::Solver::solve`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SolverParameters {
    /// Violations at or below this amount are treated as satisfied.
    pub gap_tolerance: f64,
    /// An active constraint is split only when its Lagrangian is below this (negative) value.
    pub min_split_lagrangian_threshold: f64,
    /// Project/Split cycles allowed per solve. `None` derives a bound from the variable count.
    pub outer_project_iterations_limit: Option<usize>,
    /// Activations allowed per Project phase. `None` derives a bound from the constraint count.
    pub inner_project_iterations_limit: Option<usize>,
}

impl Default for SolverParameters {
    fn default() -> Self {
        Self {
            gap_tolerance: 1e-4,
            min_split_lagrangian_threshold: -1e-7,
            outer_project_iterations_limit: None,
            inner_project_iterations_limit: None,
        }
    }
}

impl SolverParameters {
    pub(crate) fn outer_limit(&self, variables: usize) -> usize {
        self.outer_project_iterations_limit
            .unwrap_or(100 + 10 * variables)
    }

    pub(crate) fn inner_limit(&self, constraints: usize) -> usize {
        self.inner_project_iterations_limit
            .unwrap_or(100 + 2 * constraints)
    }
}

/// Summary of one [`crate::Solver::solve`] call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    pub number_of_unsatisfiable_constraints: usize,
    pub outer_project_iterations: usize,
    pub inner_project_iterations_total: usize,
    pub min_inner_project_iterations: usize,
    pub max_inner_project_iterations: usize,
    pub max_constraint_tree_depth: usize,
    /// `sum(weight * (actual - desired)^2)` at the returned positions.
    pub goal_function_value: f64,
    pub outer_project_iterations_limit_exceeded: bool,
    pub inner_project_iterations_limit_exceeded: bool,
    pub cancelled: bool,
}

impl Solution {
    pub fn execution_limit_exceeded(&self) -> bool {
        self.outer_project_iterations_limit_exceeded || self.inner_project_iterations_limit_exceeded
    }

    pub(crate) fn record_inner(&mut self, iterations: usize) {
        if self.outer_project_iterations <= 1 {
            self.min_inner_project_iterations = iterations;
        } else {
            self.min_inner_project_iterations = self.min_inner_project_iterations.min(iterations);
        }
        self.max_inner_project_iterations = self.max_inner_project_iterations.max(iterations);
        self.inner_project_iterations_total += iterations;
    }
}
