//! Corrected air flow per unit area.

use crate::error::{PropulsionError, PropulsionResult};
use az_earth::GasProperties;

/// Corrected air flow per square meter (kg/s/m2) from the stagnation state
/// and the local Mach number.
///
/// `cqoa = sqrt(gamma/r) * ptot / sqrt(ttot) * f(M)` with
/// `f(M) = M (1 + (gamma-1)/2 M^2)^(-(gamma+1)/(2(gamma-1)))`.
///
/// Pure and reentrant; the propulsor balance solver evaluates it several
/// times per Newton iteration. Flow areas (fan face, nozzle throat) follow
/// as captured-mass-flow divided by this value.
pub fn corrected_air_flow(
    gas: &GasProperties,
    ptot: f64,
    ttot: f64,
    mach: f64,
) -> PropulsionResult<f64> {
    if !(ptot.is_finite() && ptot > 0.0) {
        return Err(PropulsionError::InvalidArg {
            what: "stagnation pressure must be positive",
        });
    }
    if !(ttot.is_finite() && ttot > 0.0) {
        return Err(PropulsionError::InvalidArg {
            what: "stagnation temperature must be positive",
        });
    }
    if !(mach.is_finite() && mach >= 0.0) {
        return Err(PropulsionError::InvalidArg {
            what: "Mach number must be non-negative",
        });
    }
    let g = gas.gamma;
    let f_m = mach * (1.0 + 0.5 * (g - 1.0) * mach * mach).powf(-(g + 1.0) / (2.0 * (g - 1.0)));
    Ok((g / gas.r).sqrt() * ptot / ttot.sqrt() * f_m)
}
