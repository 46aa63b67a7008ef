//! Finite-difference Jacobians with scale-aware perturbations.
//!
//! The balance problems mix unknowns of very different magnitude: masses
//! around 1e4 kg, captured flows around 1e2 kg/s, shaft powers around
//! 1e7 W. Each column perturbation is sized against that unknown's
//! characteristic scale (see `BalanceProblem::unknown_scales`) rather
//! than a flat unit floor, so an iterate passing near zero still takes a
//! resolvable step.

use crate::error::SolverResult;
use nalgebra::{DMatrix, DVector};

/// Perturbation for unknown j: relative to the iterate when it is large,
/// relative to the characteristic scale when it is not.
fn step(x_j: f64, scale_j: f64, epsilon: f64) -> f64 {
    epsilon * x_j.abs().max(scale_j.abs())
}

/// One-sided (forward) difference Jacobian, one residual evaluation per
/// column beyond the base point.
pub fn finite_difference_jacobian<F>(
    x: &DVector<f64>,
    scales: &DVector<f64>,
    f: F,
    epsilon: f64,
) -> SolverResult<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    let f_x = f(x)?;
    let mut jac = DMatrix::zeros(f_x.len(), x.len());

    for j in 0..x.len() {
        let dx = step(x[j], scales[j], epsilon);
        let mut x_step = x.clone();
        x_step[j] += dx;
        let df = (f(&x_step)? - &f_x) / dx;
        jac.set_column(j, &df);
    }
    Ok(jac)
}

/// Two-sided (central) difference Jacobian: second-order accurate, twice
/// the residual evaluations.
pub fn central_difference_jacobian<F>(
    x: &DVector<f64>,
    scales: &DVector<f64>,
    f: F,
    epsilon: f64,
) -> SolverResult<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    let f_x = f(x)?;
    let mut jac = DMatrix::zeros(f_x.len(), x.len());

    for j in 0..x.len() {
        let dx = step(x[j], scales[j], epsilon);

        let mut x_plus = x.clone();
        x_plus[j] += dx;
        let mut x_minus = x.clone();
        x_minus[j] -= dx;

        let df = (f(&x_plus)? - f(&x_minus)?) / (2.0 * dx);
        jac.set_column(j, &df);
    }
    Ok(jac)
}
