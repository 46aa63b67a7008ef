//! Nonlinear balance solver for sizing problems.
//!
//! This crate provides the root-finding layer shared by the propulsor and
//! mass-mission balance problems. A problem poses a square system of
//! residual equations through the [`BalanceProblem`] trait; the damped
//! Newton solver drives the residual vector to zero and reports failure
//! explicitly instead of returning an unconverged iterate.

pub mod error;
pub mod jacobian;
pub mod newton;
pub mod problem;
pub mod solve;

pub use error::{SolverError, SolverResult};
pub use jacobian::{central_difference_jacobian, finite_difference_jacobian};
pub use newton::{NewtonConfig, NewtonResult, newton_solve};
pub use problem::BalanceProblem;
pub use solve::{BalanceSolution, solve_balance};
