//! High-level balance solving interface.

use crate::error::SolverResult;
use crate::jacobian::finite_difference_jacobian;
use crate::newton::{NewtonConfig, newton_solve};
use crate::problem::{BalanceProblem, validate_square};
use nalgebra::DVector;
use tracing::debug;

/// Converged solution of a balance problem.
///
/// Only the unknown vector and the convergence record are carried here;
/// derived physical quantities are recovered by the owning component
/// re-evaluating its forward model at `x`.
#[derive(Clone, Debug)]
pub struct BalanceSolution {
    /// Converged unknown-vector
    pub x: DVector<f64>,
    /// Final residual norm
    pub residual_norm: f64,
    /// Newton iterations spent
    pub iterations: usize,
}

/// Solve a balance problem, optionally warm-started.
///
/// The guess priority is: supplied `warm_start` (typically the previous
/// converged unknown-vector of a sweep), then the problem's own
/// `initial_guess()`. Validates the square-system contract before
/// iterating. Non-convergence is returned as an error; a stale iterate is
/// never handed back as a solution.
pub fn solve_balance<P: BalanceProblem>(
    problem: &P,
    config: &NewtonConfig,
    warm_start: Option<&DVector<f64>>,
) -> SolverResult<BalanceSolution> {
    let x0 = match warm_start {
        Some(x) => x.clone(),
        None => problem.initial_guess(),
    };
    validate_square(problem, &x0)?;

    let scales = problem.unknown_scales();
    let residual_fn = |x: &DVector<f64>| problem.residual(x);
    let jacobian_fn =
        |x: &DVector<f64>| finite_difference_jacobian(x, &scales, |y| problem.residual(y), 1e-7);

    let result = newton_solve(x0, residual_fn, jacobian_fn, config)?;
    debug!(
        iterations = result.iterations,
        residual_norm = result.residual_norm,
        warm_started = warm_start.is_some(),
        "balance solved"
    );

    Ok(BalanceSolution {
        x: result.x,
        residual_norm: result.residual_norm,
        iterations: result.iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolverError;

    /// Intersection of a circle and a line, a well-conditioned 2x2 system.
    struct CircleLine;

    impl BalanceProblem for CircleLine {
        fn dim(&self) -> usize {
            2
        }
        fn initial_guess(&self) -> DVector<f64> {
            DVector::from_vec(vec![1.0, 0.5])
        }
        fn residual(&self, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
            Ok(DVector::from_vec(vec![
                x[0] * x[0] + x[1] * x[1] - 2.0,
                x[0] - x[1],
            ]))
        }
    }

    #[test]
    fn solves_from_own_guess() {
        let sol = solve_balance(&CircleLine, &NewtonConfig::default(), None).unwrap();
        assert!((sol.x[0] - 1.0).abs() < 1e-6);
        assert!((sol.x[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn warm_start_is_idempotent() {
        let config = NewtonConfig::default();
        let sol = solve_balance(&CircleLine, &config, None).unwrap();
        let again = solve_balance(&CircleLine, &config, Some(&sol.x)).unwrap();
        // A converged point reconverges in at most one refinement iteration.
        assert!(again.iterations <= 1);
        assert!((again.x[0] - sol.x[0]).abs() < 1e-9);
    }

    /// Unknowns of flow and power magnitude in one system.
    struct MixedMagnitudes;

    impl BalanceProblem for MixedMagnitudes {
        fn dim(&self) -> usize {
            2
        }
        fn initial_guess(&self) -> DVector<f64> {
            DVector::from_vec(vec![0.0, 0.0])
        }
        fn residual(&self, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
            Ok(DVector::from_vec(vec![
                (x[0] - 150.0) / 150.0,
                (x[1] - 2.0e7) / 2.0e7,
            ]))
        }
        fn unknown_scales(&self) -> DVector<f64> {
            DVector::from_vec(vec![1.0e2, 1.0e7])
        }
    }

    #[test]
    fn disparate_unknowns_converge() {
        let sol = solve_balance(&MixedMagnitudes, &NewtonConfig::default(), None).unwrap();
        assert!((sol.x[0] - 150.0).abs() < 1e-3);
        assert!((sol.x[1] - 2.0e7).abs() < 1.0);
    }

    #[test]
    fn bad_warm_start_length_is_setup_error() {
        let err = solve_balance(
            &CircleLine,
            &NewtonConfig::default(),
            Some(&DVector::from_vec(vec![1.0])),
        )
        .unwrap_err();
        assert!(matches!(err, SolverError::ProblemSetup { .. }));
    }
}
