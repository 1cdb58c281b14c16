//! Blocks: variables glued together by active constraints.

use crate::error::{Error, Result};
use crate::variable::{Variable, VariableId};

/// A rigid group of variables sharing one reference position.
///
/// The optimal reference position minimises `sum(w * (a * ref + b - d)^2)` over the members,
/// where `a = scale / v.scale` and `b = v.offset_in_block / v.scale`. The three running sums
/// below are the coefficients of that quadratic, so the optimum is available in O(1) after an
/// incremental [`Block::add_variable`].
#[derive(Debug, Clone, Default)]
pub(crate) struct Block {
    pub(crate) variables: Vec<VariableId>,
    pub(crate) reference_pos: f64,
    pub(crate) scale: f64,
    sum_ad: f64,
    sum_ab: f64,
    sum_a2: f64,
}

impl Block {
    /// A block holding only `id`, placed at the variable's current position.
    pub(crate) fn singleton(variables: &mut [Variable], id: VariableId, index: usize) -> Self {
        let var = &mut variables[id.0];
        var.block = index;
        var.offset_in_block = 0.0;
        let mut block = Self {
            variables: vec![id],
            reference_pos: var.actual_pos,
            scale: var.scale,
            ..Default::default()
        };
        block.add_to_sums(var);
        block
    }

    pub(crate) fn len(&self) -> usize {
        self.variables.len()
    }

    pub(crate) fn first(&self) -> Option<VariableId> {
        self.variables.first().copied()
    }

    /// Adds `id` keeping its current `offset_in_block`.
    pub(crate) fn add_variable(&mut self, variables: &mut [Variable], id: VariableId, index: usize) {
        let var = &mut variables[id.0];
        var.block = index;
        if self.variables.is_empty() {
            self.scale = var.scale;
        }
        self.variables.push(id);
        self.add_to_sums(var);
    }

    fn add_to_sums(&mut self, var: &Variable) {
        let a = self.scale / var.scale;
        let b = var.offset_in_block / var.scale;
        let aw = a * var.weight;
        self.sum_ad += aw * var.desired_pos;
        self.sum_ab += aw * b;
        self.sum_a2 += aw * a;
    }

    /// Recomputes the sums from scratch, re-syncing the scale with the first member.
    pub(crate) fn update_reference_pos(&mut self, variables: &mut [Variable]) -> Result<()> {
        if let Some(first) = self.first() {
            self.scale = variables[first.0].scale;
        }
        self.sum_ad = 0.0;
        self.sum_ab = 0.0;
        self.sum_a2 = 0.0;
        for i in 0..self.variables.len() {
            let var = &variables[self.variables[i].0];
            self.add_to_sums(var);
        }
        self.update_reference_pos_from_sums(variables)
    }

    pub(crate) fn update_reference_pos_from_sums(
        &mut self,
        variables: &mut [Variable],
    ) -> Result<()> {
        if !(self.sum_ad.is_finite() && self.sum_ab.is_finite() && self.sum_a2.is_finite()) {
            return Err(self.non_finite());
        }
        // All-zero weights: every reference position is optimal, stay put.
        if self.sum_a2 > 0.0 {
            let reference_pos = (self.sum_ad - self.sum_ab) / self.sum_a2;
            if !reference_pos.is_finite() {
                return Err(self.non_finite());
            }
            self.reference_pos = reference_pos;
        }
        self.update_variable_positions(variables);
        Ok(())
    }

    pub(crate) fn update_variable_positions(&self, variables: &mut [Variable]) {
        let base = self.scale * self.reference_pos;
        for id in &self.variables {
            let var = &mut variables[id.0];
            var.actual_pos = (base + var.offset_in_block) / var.scale;
        }
    }

    fn non_finite(&self) -> Error {
        Error::NonFiniteBlockSums {
            variable: self.first().map(|v| v.0).unwrap_or(usize::MAX),
            sum_ad: self.sum_ad,
            sum_ab: self.sum_ab,
            sum_a2: self.sum_a2,
        }
    }
}
