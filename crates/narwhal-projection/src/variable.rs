use crate::constraint::ConstraintId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VariableId(pub(crate) usize);

impl VariableId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A scalar unknown with a desired position.
///
/// Once a variable joins a block its position is no longer free: it is
/// `(block.scale * block.reference_pos + offset_in_block) / scale`.
#[derive(Debug, Clone)]
pub struct Variable {
    pub(crate) desired_pos: f64,
    pub(crate) actual_pos: f64,
    pub(crate) weight: f64,
    pub(crate) scale: f64,
    pub(crate) offset_in_block: f64,
    pub(crate) block: usize,
    /// Constraints this variable is the left side of.
    pub(crate) left_constraints: Vec<ConstraintId>,
    /// Constraints this variable is the right side of.
    pub(crate) right_constraints: Vec<ConstraintId>,
}

impl Variable {
    pub(crate) fn new(desired_pos: f64, weight: f64, scale: f64) -> Self {
        Self {
            desired_pos,
            actual_pos: desired_pos,
            weight,
            scale,
            offset_in_block: 0.0,
            block: usize::MAX,
            left_constraints: Vec::new(),
            right_constraints: Vec::new(),
        }
    }

    pub fn desired_pos(&self) -> f64 {
        self.desired_pos
    }

    pub fn actual_pos(&self) -> f64 {
        self.actual_pos
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset_in_block(&self) -> f64 {
        self.offset_in_block
    }

    pub fn left_constraints(&self) -> &[ConstraintId] {
        &self.left_constraints
    }

    pub fn right_constraints(&self) -> &[ConstraintId] {
        &self.right_constraints
    }

    /// Derivative of `weight * (actual - desired)^2`, expressed in the scaled space the
    /// constraints live in.
    pub(crate) fn dfdv(&self) -> f64 {
        2.0 * self.weight * (self.actual_pos - self.desired_pos) / self.scale
    }

    pub(crate) fn scaled_pos(&self) -> f64 {
        self.actual_pos * self.scale
    }
}
