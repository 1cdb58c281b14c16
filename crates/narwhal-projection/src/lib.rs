#![forbid(unsafe_code)]

//! Incremental separation-constraint solver.
//!
//! Given variables with desired positions and weights, and constraints of the form
//! `right >= left + gap` (or `==`), [`Solver::solve`] finds positions minimising
//! `sum(weight * (actual - desired)^2)` while satisfying every satisfiable constraint.
//! Constraints that close a cycle with positive total gap are flagged as unsatisfiable and
//! reported through [`Solution::number_of_unsatisfiable_constraints`]; they never abort a solve.

mod block;
pub mod cancel;
pub mod constraint;
pub mod constraint_vector;
pub mod error;
pub mod parameters;
pub mod solver;
pub mod variable;

pub use cancel::CancelToken;
pub use constraint::{Constraint, ConstraintId};
pub use constraint_vector::ConstraintVector;
pub use error::{Error, Result};
pub use parameters::{Solution, SolverParameters};
pub use solver::Solver;
pub use variable::{Variable, VariableId};
