//! Error types for propulsion models.

use az_earth::EarthError;
use az_solver::SolverError;
use thiserror::Error;

/// Errors that can occur while sizing or operating an engine model.
#[derive(Error, Debug)]
pub enum PropulsionError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Off-design evaluation requested before the geometry was sized.
    #[error("Nacelle not sized: {what}")]
    NotSized { what: &'static str },

    /// The equations converged to a point outside the physical envelope,
    /// or the request has no solution in the feasible region. Distinct
    /// from a convergence failure.
    #[error("Physically infeasible: {what}")]
    Infeasible { what: String },

    #[error("Balance solve failed: {0}")]
    Solver(#[from] SolverError),

    #[error("Environment error: {0}")]
    Earth(#[from] EarthError),
}

pub type PropulsionResult<T> = Result<T, PropulsionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solver_error_wraps() {
        let inner = SolverError::Numeric {
            what: "singular".to_string(),
        };
        let err: PropulsionError = inner.into();
        assert!(err.to_string().contains("singular"));
    }
}
