use crate::variable::{Variable, VariableId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConstraintId(pub(crate) usize);

impl ConstraintId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// `right.scale * right.pos >= left.scale * left.pos + gap`, or `==` for equalities.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub(crate) left: VariableId,
    pub(crate) right: VariableId,
    pub(crate) gap: f64,
    pub(crate) is_equality: bool,
    pub(crate) lagrangian: f64,
    pub(crate) is_active: bool,
    pub(crate) is_unsatisfiable: bool,
}

impl Constraint {
    pub(crate) fn new(left: VariableId, right: VariableId, gap: f64, is_equality: bool) -> Self {
        Self {
            left,
            right,
            gap,
            is_equality,
            lagrangian: 0.0,
            is_active: false,
            is_unsatisfiable: false,
        }
    }

    pub fn left(&self) -> VariableId {
        self.left
    }

    pub fn right(&self) -> VariableId {
        self.right
    }

    pub fn gap(&self) -> f64 {
        self.gap
    }

    pub fn is_equality(&self) -> bool {
        self.is_equality
    }

    /// Only meaningful while the constraint is active.
    pub fn lagrangian(&self) -> f64 {
        self.lagrangian
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_unsatisfiable(&self) -> bool {
        self.is_unsatisfiable
    }

    /// Positive when the right side sits closer than `gap` to the left side.
    pub(crate) fn violation(&self, variables: &[Variable]) -> f64 {
        variables[self.left.0].scaled_pos() + self.gap - variables[self.right.0].scaled_pos()
    }

    pub(crate) fn reset(&mut self) {
        self.lagrangian = 0.0;
        self.is_active = false;
        self.is_unsatisfiable = false;
    }
}
