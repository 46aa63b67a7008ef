//! Error types for solver operations.

use thiserror::Error;

/// Errors that can occur while solving a balance problem.
#[derive(Error, Debug, Clone)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    /// Iteration budget exhausted or the line search stagnated.
    ///
    /// Carries the last iterate and its residual norm so the caller can
    /// diagnose the attempted inputs; the iterate must never be mistaken
    /// for a solution.
    #[error("Convergence failed: {what} (residual norm {residual_norm:.3e})")]
    ConvergenceFailed {
        what: String,
        residual_norm: f64,
        last_iterate: Vec<f64>,
    },

    #[error("Residual evaluation failed: {what}")]
    ResidualEvaluation { what: String },

    #[error("Numeric error: {what}")]
    Numeric { what: String },
}

pub type SolverResult<T> = Result<T, SolverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convergence_failure_reports_norm() {
        let err = SolverError::ConvergenceFailed {
            what: "budget exhausted".to_string(),
            residual_norm: 1.5e-2,
            last_iterate: vec![1.0, 2.0],
        };
        let msg = err.to_string();
        assert!(msg.contains("budget exhausted"));
        assert!(msg.contains("1.500e-2"));
    }
}
