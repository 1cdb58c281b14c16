//! Constraint registry plus the scratch space used to walk active-constraint trees.
//!
//! The active constraints inside a block form a spanning tree, so both the Lagrangian
//! computation (`compute_dfdv`) and component discovery (`connected_variables`) are plain tree
//! walks. They run on an explicit stack over an index arena that is cleared, not freed, between
//! calls.

use crate::constraint::{Constraint, ConstraintId};
use crate::variable::{Variable, VariableId};

#[derive(Debug, Clone, Copy)]
struct DfDvNode {
    variable: VariableId,
    parent: Option<usize>,
    /// The active constraint linking this node to its parent.
    constraint: Option<ConstraintId>,
    /// True when the parent variable is the constraint's left side.
    left_to_right: bool,
    children_pushed: bool,
    depth: usize,
    subtree_dfdv: f64,
}

impl DfDvNode {
    fn root(variable: VariableId) -> Self {
        Self {
            variable,
            parent: None,
            constraint: None,
            left_to_right: true,
            children_pushed: false,
            depth: 0,
            subtree_dfdv: 0.0,
        }
    }
}

/// One edge of the active-constraint path found by [`ConstraintVector::compute_dfdv`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PathStep {
    pub(crate) constraint: ConstraintId,
    /// The walk from the root towards the target crosses this constraint from left to right.
    pub(crate) forward: bool,
}

#[derive(Debug, Default)]
struct Scratch {
    nodes: Vec<DfDvNode>,
    stack: Vec<usize>,
    path: Vec<PathStep>,
    walk: Vec<(VariableId, Option<ConstraintId>)>,
    component: Vec<VariableId>,
}

#[derive(Debug, Default)]
pub struct ConstraintVector {
    constraints: Vec<Constraint>,
    active: usize,
    scratch: Scratch,
}

impl ConstraintVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn get(&self, id: ConstraintId) -> Option<&Constraint> {
        self.constraints.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConstraintId, &Constraint)> {
        self.constraints
            .iter()
            .enumerate()
            .map(|(i, c)| (ConstraintId(i), c))
    }

    pub fn active_count(&self) -> usize {
        self.active
    }

    pub fn number_of_unsatisfiable(&self) -> usize {
        self.constraints
            .iter()
            .filter(|c| c.is_unsatisfiable)
            .count()
    }

    pub(crate) fn push(&mut self, constraint: Constraint) -> ConstraintId {
        self.constraints.push(constraint);
        ConstraintId(self.constraints.len() - 1)
    }

    pub(crate) fn as_slice(&self) -> &[Constraint] {
        &self.constraints
    }

    pub(crate) fn activate(&mut self, id: ConstraintId) {
        let c = &mut self.constraints[id.0];
        if !c.is_active {
            c.is_active = true;
            self.active += 1;
        }
    }

    pub(crate) fn deactivate(&mut self, id: ConstraintId) {
        let c = &mut self.constraints[id.0];
        if c.is_active {
            c.is_active = false;
            c.lagrangian = 0.0;
            self.active -= 1;
        }
    }

    pub(crate) fn mark_unsatisfiable(&mut self, id: ConstraintId) {
        self.constraints[id.0].is_unsatisfiable = true;
    }

    pub(crate) fn reset(&mut self) {
        for c in &mut self.constraints {
            c.reset();
        }
        self.active = 0;
    }

    /// Computes the Lagrangian of every active constraint in the tree containing `root`.
    ///
    /// When `target` is given and reachable, the active-constraint path from `root` to it is
    /// left in [`Self::path`]. Returns the depth of the tree as seen from `root`.
    pub(crate) fn compute_dfdv(
        &mut self,
        variables: &[Variable],
        root: VariableId,
        target: Option<VariableId>,
    ) -> usize {
        let Self {
            constraints,
            scratch,
            ..
        } = self;
        scratch.nodes.clear();
        scratch.stack.clear();
        scratch.path.clear();

        scratch.nodes.push(DfDvNode::root(root));
        scratch.stack.push(0);
        let mut target_node = (target == Some(root)).then_some(0);
        let mut max_depth = 0;

        while let Some(&top) = scratch.stack.last() {
            if !scratch.nodes[top].children_pushed {
                scratch.nodes[top].children_pushed = true;
                let node = scratch.nodes[top];
                let var = &variables[node.variable.0];
                max_depth = max_depth.max(node.depth);

                let children = var
                    .left_constraints
                    .iter()
                    .map(|&cid| (cid, true))
                    .chain(var.right_constraints.iter().map(|&cid| (cid, false)));
                for (cid, left_to_right) in children {
                    if node.constraint == Some(cid) {
                        continue;
                    }
                    let c = &constraints[cid.0];
                    if !c.is_active {
                        continue;
                    }
                    let child = if left_to_right { c.right } else { c.left };
                    let idx = scratch.nodes.len();
                    scratch.nodes.push(DfDvNode {
                        variable: child,
                        parent: Some(top),
                        constraint: Some(cid),
                        left_to_right,
                        children_pushed: false,
                        depth: node.depth + 1,
                        subtree_dfdv: 0.0,
                    });
                    scratch.stack.push(idx);
                    if target == Some(child) {
                        target_node = Some(idx);
                    }
                }
                continue;
            }

            scratch.stack.pop();
            let node = scratch.nodes[top];
            let sum = node.subtree_dfdv + variables[node.variable.0].dfdv();
            if let (Some(parent), Some(cid)) = (node.parent, node.constraint) {
                constraints[cid.0].lagrangian = if node.left_to_right { sum } else { -sum };
                scratch.nodes[parent].subtree_dfdv += sum;
            }
        }

        if let Some(mut idx) = target_node {
            while let (Some(parent), Some(constraint)) =
                (scratch.nodes[idx].parent, scratch.nodes[idx].constraint)
            {
                scratch.path.push(PathStep {
                    constraint,
                    forward: scratch.nodes[idx].left_to_right,
                });
                idx = parent;
            }
            scratch.path.reverse();
        }

        max_depth
    }

    /// Path found by the last [`Self::compute_dfdv`] call, ordered from root to target.
    pub(crate) fn path(&self) -> &[PathStep] {
        &self.scratch.path
    }

    /// Active constraints visited by the last [`Self::compute_dfdv`] call.
    pub(crate) fn tree_constraints(&self) -> impl Iterator<Item = ConstraintId> + '_ {
        self.scratch.nodes.iter().filter_map(|n| n.constraint)
    }

    /// Variables reachable from `start` through active constraints.
    pub(crate) fn connected_variables(
        &mut self,
        variables: &[Variable],
        start: VariableId,
    ) -> &[VariableId] {
        let Self {
            constraints,
            scratch,
            ..
        } = self;
        scratch.component.clear();
        scratch.walk.clear();
        scratch.walk.push((start, None));

        while let Some((v, via)) = scratch.walk.pop() {
            scratch.component.push(v);
            let var = &variables[v.0];
            for &cid in var.left_constraints.iter().chain(&var.right_constraints) {
                if via == Some(cid) {
                    continue;
                }
                let c = &constraints[cid.0];
                if !c.is_active {
                    continue;
                }
                let next = if c.left == v { c.right } else { c.left };
                scratch.walk.push((next, Some(cid)));
            }
        }

        &scratch.component
    }
}

impl std::ops::Index<ConstraintId> for ConstraintVector {
    type Output = Constraint;

    fn index(&self, id: ConstraintId) -> &Self::Output {
        &self.constraints[id.0]
    }
}
