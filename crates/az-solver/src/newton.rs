//! Newton solver with backtracking line search.

use crate::error::{SolverError, SolverResult};
use nalgebra::DVector;
use tracing::{debug, trace};

/// Newton solver configuration.
#[derive(Clone, Debug)]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance for residual norm
    pub abs_tol: f64,
    /// Relative tolerance for residual norm
    pub rel_tol: f64,
    /// Line search backtracking factor
    pub line_search_beta: f64,
    /// Maximum line search iterations
    pub max_line_search_iters: usize,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            abs_tol: 1e-6,
            rel_tol: 1e-9,
            line_search_beta: 0.5,
            max_line_search_iters: 20,
        }
    }
}

/// Newton iteration result.
#[derive(Debug)]
pub struct NewtonResult {
    /// Solution vector
    pub x: DVector<f64>,
    /// Final residual norm
    pub residual_norm: f64,
    /// Number of iterations
    pub iterations: usize,
}

/// Newton solver with backtracking line search.
///
/// A trial step whose residual evaluation fails (the candidate left the
/// feasible region) is backtracked like a non-decreasing step; the error
/// only propagates if even the shortest step cannot be evaluated.
pub fn newton_solve<F, J>(
    x0: DVector<f64>,
    residual_fn: F,
    jacobian_fn: J,
    config: &NewtonConfig,
) -> SolverResult<NewtonResult>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
    J: Fn(&DVector<f64>) -> SolverResult<nalgebra::DMatrix<f64>>,
{
    let mut x = x0;
    let mut r = residual_fn(&x)?;
    let mut r_norm = r.norm();
    let r0_norm = r_norm;

    for iter in 0..config.max_iterations {
        if r_norm < config.abs_tol || r_norm < config.rel_tol * r0_norm {
            debug!(iterations = iter, residual_norm = r_norm, "converged");
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
            });
        }

        let jac = jacobian_fn(&x)?;

        // Solve J * dx = -r
        let dx = jac
            .lu()
            .solve(&(-r.clone()))
            .ok_or_else(|| SolverError::Numeric {
                what: "singular Jacobian in LU solve".to_string(),
            })?;

        // Backtracking line search
        let mut alpha = 1.0;
        let mut accepted = None;
        for _ in 0..=config.max_line_search_iters {
            let x_new = &x + alpha * &dx;
            match residual_fn(&x_new) {
                Ok(r_new) => {
                    let r_new_norm = r_new.norm();
                    if r_new_norm < r_norm {
                        accepted = Some((x_new, r_new, r_new_norm));
                        break;
                    }
                }
                Err(e) => {
                    trace!(alpha, "trial step rejected: {e}");
                }
            }
            alpha *= config.line_search_beta;
        }

        match accepted {
            Some((x_new, r_new, r_new_norm)) => {
                trace!(iteration = iter, alpha, residual_norm = r_new_norm, "step");
                x = x_new;
                r = r_new;
                r_norm = r_new_norm;
            }
            None => {
                return Err(SolverError::ConvergenceFailed {
                    what: format!("line search stagnated at iteration {iter}"),
                    residual_norm: r_norm,
                    last_iterate: x.iter().copied().collect(),
                });
            }
        }
    }

    Err(SolverError::ConvergenceFailed {
        what: format!("maximum iterations {} reached", config.max_iterations),
        residual_norm: r_norm,
        last_iterate: x.iter().copied().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_quadratic() {
        // Solve x^2 - 4 = 0, x > 0
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0] * x[0] - 4.0))
        };
        let jacobian = |x: &DVector<f64>| -> SolverResult<nalgebra::DMatrix<f64>> {
            Ok(nalgebra::DMatrix::from_element(1, 1, 2.0 * x[0]))
        };

        let x0 = DVector::from_element(1, 3.0);
        let config = NewtonConfig::default();
        let result = newton_solve(x0, residual, jacobian, &config).unwrap();

        assert!((result.x[0] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn coupled_system() {
        // x + y = 3, x*y = 2 -> (1, 2) or (2, 1)
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_vec(vec![
                x[0] + x[1] - 3.0,
                x[0] * x[1] - 2.0,
            ]))
        };
        let jacobian = |x: &DVector<f64>| -> SolverResult<nalgebra::DMatrix<f64>> {
            Ok(nalgebra::DMatrix::from_row_slice(
                2,
                2,
                &[1.0, 1.0, x[1], x[0]],
            ))
        };

        let x0 = DVector::from_vec(vec![0.5, 2.5]);
        let result = newton_solve(x0, residual, jacobian, &NewtonConfig::default()).unwrap();
        let prod = result.x[0] * result.x[1];
        let sum = result.x[0] + result.x[1];
        assert!((sum - 3.0).abs() < 1e-6);
        assert!((prod - 2.0).abs() < 1e-6);
    }

    #[test]
    fn failure_carries_last_iterate() {
        // x^2 + 1 = 0 has no real root
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0] * x[0] + 1.0))
        };
        let jacobian = |x: &DVector<f64>| -> SolverResult<nalgebra::DMatrix<f64>> {
            Ok(nalgebra::DMatrix::from_element(1, 1, 2.0 * x[0]))
        };

        let x0 = DVector::from_element(1, 3.0);
        let err = newton_solve(x0, residual, jacobian, &NewtonConfig::default()).unwrap_err();
        match err {
            SolverError::ConvergenceFailed {
                residual_norm,
                last_iterate,
                ..
            } => {
                assert!(residual_norm >= 1.0);
                assert_eq!(last_iterate.len(), 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn infeasible_trial_steps_are_backtracked() {
        // Root at x = 1, residual undefined for x <= 0. A full Newton step
        // from far away can overshoot into the infeasible region.
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            if x[0] <= 0.0 {
                return Err(SolverError::ResidualEvaluation {
                    what: "log of non-positive".to_string(),
                });
            }
            Ok(DVector::from_element(1, x[0].ln()))
        };
        let jacobian = |x: &DVector<f64>| -> SolverResult<nalgebra::DMatrix<f64>> {
            Ok(nalgebra::DMatrix::from_element(1, 1, 1.0 / x[0]))
        };

        // Newton step from x=3 is x - x*ln(x) = 3 - 3*1.0986 < 0
        let x0 = DVector::from_element(1, 3.0);
        let result = newton_solve(x0, residual, jacobian, &NewtonConfig::default()).unwrap();
        assert!((result.x[0] - 1.0).abs() < 1e-6);
    }
}
