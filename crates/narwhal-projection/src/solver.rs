//! Project/Split driver.
//!
//! Every solve starts from singleton blocks at the desired positions. Project repeatedly
//! activates the most violated inactive constraint (merging two blocks, or expanding one block
//! when both ends already share it). Split then drops active constraints whose Lagrangian says
//! the block would be better off without them. The two phases alternate until a Split pass
//! changes nothing.

use crate::block::Block;
use crate::cancel::CancelToken;
use crate::constraint::{Constraint, ConstraintId};
use crate::constraint_vector::ConstraintVector;
use crate::error::{Error, Result};
use crate::parameters::{Solution, SolverParameters};
use crate::variable::{Variable, VariableId};

#[derive(Debug, Default)]
pub struct Solver {
    variables: Vec<Variable>,
    constraints: ConstraintVector,
    blocks: Vec<Block>,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_variable(&mut self, desired_pos: f64, weight: f64, scale: f64) -> Result<VariableId> {
        let variable = self.variables.len();
        if !desired_pos.is_finite() {
            return Err(Error::InvalidVariable {
                variable,
                field: "desired position",
                value: desired_pos,
            });
        }
        if !(weight.is_finite() && weight >= 0.0) {
            return Err(Error::InvalidVariable {
                variable,
                field: "weight",
                value: weight,
            });
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(Error::InvalidVariable {
                variable,
                field: "scale",
                value: scale,
            });
        }
        self.variables
            .push(Variable::new(desired_pos, weight, scale));
        Ok(VariableId(variable))
    }

    pub fn add_constraint(
        &mut self,
        left: VariableId,
        right: VariableId,
        gap: f64,
        is_equality: bool,
    ) -> Result<ConstraintId> {
        self.check_variable(left)?;
        self.check_variable(right)?;
        if left == right {
            return Err(Error::InvalidConstraint {
                left: left.0,
                right: right.0,
                reason: "left and right are the same variable",
            });
        }
        if !gap.is_finite() {
            return Err(Error::InvalidConstraint {
                left: left.0,
                right: right.0,
                reason: "gap is not finite",
            });
        }
        let id = self
            .constraints
            .push(Constraint::new(left, right, gap, is_equality));
        self.variables[left.0].left_constraints.push(id);
        self.variables[right.0].right_constraints.push(id);
        Ok(id)
    }

    pub fn set_desired_position(&mut self, id: VariableId, desired_pos: f64) -> Result<()> {
        self.check_variable(id)?;
        if !desired_pos.is_finite() {
            return Err(Error::InvalidVariable {
                variable: id.0,
                field: "desired position",
                value: desired_pos,
            });
        }
        self.variables[id.0].desired_pos = desired_pos;
        Ok(())
    }

    pub fn set_weight(&mut self, id: VariableId, weight: f64) -> Result<()> {
        self.check_variable(id)?;
        if !(weight.is_finite() && weight >= 0.0) {
            return Err(Error::InvalidVariable {
                variable: id.0,
                field: "weight",
                value: weight,
            });
        }
        self.variables[id.0].weight = weight;
        Ok(())
    }

    fn check_variable(&self, id: VariableId) -> Result<()> {
        if id.0 < self.variables.len() {
            Ok(())
        } else {
            Err(Error::UnknownVariable {
                index: id.0,
                len: self.variables.len(),
            })
        }
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn variable(&self, id: VariableId) -> Option<&Variable> {
        self.variables.get(id.0)
    }

    pub fn variables(&self) -> impl Iterator<Item = (VariableId, &Variable)> {
        self.variables
            .iter()
            .enumerate()
            .map(|(i, v)| (VariableId(i), v))
    }

    pub fn position(&self, id: VariableId) -> Option<f64> {
        self.variables.get(id.0).map(|v| v.actual_pos)
    }

    pub fn constraint(&self, id: ConstraintId) -> Option<&Constraint> {
        self.constraints.get(id)
    }

    /// Current violation of `id`; positive when its right side is too far left.
    pub fn violation(&self, id: ConstraintId) -> Option<f64> {
        self.constraints
            .get(id)
            .map(|c| c.violation(&self.variables))
    }

    pub fn constraints(&self) -> &ConstraintVector {
        &self.constraints
    }

    pub fn unsatisfiable_constraints(&self) -> impl Iterator<Item = ConstraintId> + '_ {
        self.constraints
            .iter()
            .filter(|(_, c)| c.is_unsatisfiable)
            .map(|(id, _)| id)
    }

    /// Number of blocks left by the last solve.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn solve(&mut self, params: &SolverParameters, cancel: &CancelToken) -> Result<Solution> {
        self.reset();
        let mut solution = Solution::default();

        if !self.constraints.is_empty() {
            let outer_limit = params.outer_limit(self.variables.len());
            let inner_limit = params.inner_limit(self.constraints.len());
            loop {
                solution.outer_project_iterations += 1;
                self.project(params, inner_limit, &mut solution)?;

                if cancel.is_cancelled() {
                    solution.cancelled = true;
                    break;
                }
                if solution.outer_project_iterations >= outer_limit {
                    solution.outer_project_iterations_limit_exceeded = true;
                    tracing::warn!(
                        limit = outer_limit,
                        "projection stopped at the outer iteration limit"
                    );
                    break;
                }
                if !self.split_blocks(params, &mut solution)? {
                    break;
                }
            }
        }

        solution.number_of_unsatisfiable_constraints = self.constraints.number_of_unsatisfiable();
        solution.goal_function_value = self
            .variables
            .iter()
            .map(|v| {
                let d = v.actual_pos - v.desired_pos;
                v.weight * d * d
            })
            .sum();

        tracing::debug!(
            variables = self.variables.len(),
            constraints = self.constraints.len(),
            blocks = self.blocks.len(),
            outer = solution.outer_project_iterations,
            inner = solution.inner_project_iterations_total,
            unsatisfiable = solution.number_of_unsatisfiable_constraints,
            goal = solution.goal_function_value,
            "projection solved"
        );
        Ok(solution)
    }

    fn reset(&mut self) {
        self.constraints.reset();
        self.blocks.clear();
        for i in 0..self.variables.len() {
            let var = &mut self.variables[i];
            var.actual_pos = var.desired_pos;
            let block = Block::singleton(&mut self.variables, VariableId(i), i);
            self.blocks.push(block);
        }
    }

    fn project(
        &mut self,
        params: &SolverParameters,
        inner_limit: usize,
        solution: &mut Solution,
    ) -> Result<()> {
        let mut iterations = 0;
        while let Some(cid) = self.max_violated_constraint(params.gap_tolerance) {
            if iterations >= inner_limit {
                solution.inner_project_iterations_limit_exceeded = true;
                tracing::warn!(
                    limit = inner_limit,
                    "projection stopped at the inner iteration limit"
                );
                break;
            }
            iterations += 1;

            let c = &self.constraints[cid];
            if self.variables[c.left.0].block == self.variables[c.right.0].block {
                self.expand(cid)?;
            } else {
                self.merge_blocks(cid)?;
            }
        }
        solution.record_inner(iterations);
        tracing::trace!(iterations, blocks = self.blocks.len(), "project pass");
        Ok(())
    }

    fn max_violated_constraint(&self, tolerance: f64) -> Option<ConstraintId> {
        let mut best: Option<(ConstraintId, f64)> = None;
        for (id, c) in self.constraints.iter() {
            if c.is_active || c.is_unsatisfiable {
                continue;
            }
            let mut violation = c.violation(&self.variables);
            if c.is_equality {
                violation = violation.abs();
            }
            if violation > tolerance && best.is_none_or(|(_, v)| violation > v) {
                best = Some((id, violation));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Activates `cid`, moving the smaller of its two blocks into the larger one.
    fn merge_blocks(&mut self, cid: ConstraintId) -> Result<()> {
        let c = &self.constraints[cid];
        let (left, right) = (&self.variables[c.left.0], &self.variables[c.right.0]);
        let mut to = left.block;
        let mut from = right.block;
        let mut distance = left.offset_in_block + c.gap - right.offset_in_block;
        if self.blocks[from].len() > self.blocks[to].len() {
            std::mem::swap(&mut to, &mut from);
            distance = -distance;
        }

        let moved = std::mem::take(&mut self.blocks[from].variables);
        for v in moved {
            self.variables[v.0].offset_in_block += distance;
            self.blocks[to].add_variable(&mut self.variables, v, to);
        }
        self.constraints.activate(cid);
        self.blocks[to].update_reference_pos_from_sums(&mut self.variables)?;
        self.remove_block(from);
        Ok(())
    }

    /// Activates `cid` whose two ends already share a block by giving up the path constraint
    /// with the smallest Lagrangian.
    fn expand(&mut self, cid: ConstraintId) -> Result<()> {
        let (left, right) = (self.constraints[cid].left, self.constraints[cid].right);
        let block = self.variables[left.0].block;
        let violation = self.constraints[cid].violation(&self.variables);

        self.constraints
            .compute_dfdv(&self.variables, left, Some(right));
        let constraints = self.constraints.as_slice();
        // Shifting the right side towards `+violation` relaxes constraints crossed left to right
        // on the way from `left` to `right`; a negative shift (equalities only) relaxes the rest.
        let shift_right = violation > 0.0;
        let give_up = self
            .constraints
            .path()
            .iter()
            .filter(|s| s.forward == shift_right && !constraints[s.constraint.0].is_equality)
            .map(|s| s.constraint)
            .min_by(|a, b| {
                constraints[a.0]
                    .lagrangian
                    .total_cmp(&constraints[b.0].lagrangian)
            });

        let Some(give_up) = give_up else {
            self.constraints.mark_unsatisfiable(cid);
            tracing::warn!(
                constraint = cid.0,
                left = left.0,
                right = right.0,
                violation,
                "constraint is unsatisfiable"
            );
            return Ok(());
        };

        self.constraints.deactivate(give_up);
        let component = self
            .constraints
            .connected_variables(&self.variables, right);
        for v in component {
            self.variables[v.0].offset_in_block += violation;
        }
        self.constraints.activate(cid);
        self.blocks[block].update_reference_pos(&mut self.variables)
    }

    fn split_blocks(&mut self, params: &SolverParameters, solution: &mut Solution) -> Result<bool> {
        let mut any = false;
        // Blocks created by a split are appended and only revisited on the next pass.
        let count = self.blocks.len();
        for b in 0..count {
            if self.blocks[b].len() < 2 {
                continue;
            }
            let Some(root) = self.blocks[b].first() else {
                continue;
            };
            let depth = self.constraints.compute_dfdv(&self.variables, root, None);
            solution.max_constraint_tree_depth = solution.max_constraint_tree_depth.max(depth);

            let constraints = self.constraints.as_slice();
            let candidate = self
                .constraints
                .tree_constraints()
                .filter(|id| !constraints[id.0].is_equality)
                .filter(|id| constraints[id.0].lagrangian < params.min_split_lagrangian_threshold)
                .min_by(|a, b| {
                    constraints[a.0]
                        .lagrangian
                        .total_cmp(&constraints[b.0].lagrangian)
                });
            if let Some(cid) = candidate {
                any |= self.split_on_constraint(b, cid)?;
            }
        }
        Ok(any)
    }

    fn split_on_constraint(&mut self, b: usize, cid: ConstraintId) -> Result<bool> {
        let right = self.constraints[cid].right;
        self.constraints.deactivate(cid);

        let new_index = self.blocks.len();
        let component = self
            .constraints
            .connected_variables(&self.variables, right);
        if component.len() >= self.blocks[b].len() {
            self.constraints.activate(cid);
            return Ok(false);
        }

        let mut split_off = Block::default();
        for &v in component {
            split_off.add_variable(&mut self.variables, v, new_index);
        }
        let variables = &self.variables;
        self.blocks[b]
            .variables
            .retain(|v| variables[v.0].block == b);
        self.blocks.push(split_off);

        self.blocks[b].update_reference_pos(&mut self.variables)?;
        self.blocks[new_index].update_reference_pos(&mut self.variables)?;
        Ok(true)
    }

    fn remove_block(&mut self, index: usize) {
        self.blocks.swap_remove(index);
        if let Some(moved) = self.blocks.get(index) {
            for v in &moved.variables {
                self.variables[v.0].block = index;
            }
        }
    }
}
