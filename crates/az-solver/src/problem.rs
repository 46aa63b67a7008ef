//! Problem definition for balance solving.

use crate::error::{SolverError, SolverResult};
use nalgebra::DVector;

/// A square system of balance equations.
///
/// Implementors own everything the residual needs (operating point,
/// geometry, configuration) so the solver itself stays stateless: the same
/// solver instance can be used for any number of independent problems, and
/// concurrent solves never share mutable state.
pub trait BalanceProblem {
    /// Number of unknowns; the residual vector must have the same length.
    fn dim(&self) -> usize;

    /// Starting point when no warm-start vector is supplied.
    ///
    /// Any guess of the right order of magnitude is acceptable; the value
    /// only has to lie in the root-finder's basin of attraction.
    fn initial_guess(&self) -> DVector<f64>;

    /// Equation errors at a candidate unknown-vector.
    ///
    /// May fail when the candidate leaves the feasible region (e.g. a
    /// non-positive landing weight under a logarithm); the line search
    /// treats such a failure as a rejected trial step.
    fn residual(&self, x: &DVector<f64>) -> SolverResult<DVector<f64>>;

    /// Characteristic magnitude of each unknown, used to size the
    /// finite-difference perturbation for that column.
    ///
    /// Override when the unknowns span several orders of magnitude (a
    /// shaft power next to a captured flow, say); the default treats
    /// every unknown as order one.
    fn unknown_scales(&self) -> DVector<f64> {
        DVector::from_element(self.dim(), 1.0)
    }
}

/// Check the square-system contract at the supplied starting point.
pub fn validate_square<P: BalanceProblem>(problem: &P, x0: &DVector<f64>) -> SolverResult<()> {
    let n = problem.dim();
    if n == 0 {
        return Err(SolverError::ProblemSetup {
            what: "problem has no unknowns".to_string(),
        });
    }
    if x0.len() != n {
        return Err(SolverError::ProblemSetup {
            what: format!("guess length {} does not match {} unknowns", x0.len(), n),
        });
    }
    let scales = problem.unknown_scales();
    if scales.len() != n {
        return Err(SolverError::ProblemSetup {
            what: format!("scales length {} does not match {} unknowns", scales.len(), n),
        });
    }
    if scales.iter().any(|s| !s.is_finite() || *s <= 0.0) {
        return Err(SolverError::ProblemSetup {
            what: "unknown scales must be finite and positive".to_string(),
        });
    }
    let r = problem.residual(x0).map_err(|e| SolverError::ResidualEvaluation {
        what: format!("at the starting point: {e}"),
    })?;
    if r.len() != n {
        return Err(SolverError::ProblemSetup {
            what: format!("residual length {} does not match {} unknowns", r.len(), n),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Rectangular;

    impl BalanceProblem for Rectangular {
        fn dim(&self) -> usize {
            2
        }
        fn initial_guess(&self) -> DVector<f64> {
            DVector::from_vec(vec![1.0, 1.0])
        }
        fn residual(&self, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(3, x[0]))
        }
    }

    #[test]
    fn rectangular_system_rejected() {
        let p = Rectangular;
        let err = validate_square(&p, &p.initial_guess()).unwrap_err();
        assert!(matches!(err, SolverError::ProblemSetup { .. }));
    }

    #[test]
    fn mismatched_guess_rejected() {
        let p = Rectangular;
        let err = validate_square(&p, &DVector::from_vec(vec![1.0])).unwrap_err();
        assert!(matches!(err, SolverError::ProblemSetup { .. }));
    }

    struct BadScales;

    impl BalanceProblem for BadScales {
        fn dim(&self) -> usize {
            1
        }
        fn initial_guess(&self) -> DVector<f64> {
            DVector::from_element(1, 1.0)
        }
        fn residual(&self, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0]))
        }
        fn unknown_scales(&self) -> DVector<f64> {
            DVector::from_element(1, 0.0)
        }
    }

    #[test]
    fn non_positive_scale_rejected() {
        let p = BadScales;
        let err = validate_square(&p, &p.initial_guess()).unwrap_err();
        assert!(matches!(err, SolverError::ProblemSetup { .. }));
    }
}
