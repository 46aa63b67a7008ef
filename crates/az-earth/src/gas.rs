//! Working-gas properties and closed-form isentropic relations.

use crate::error::{EarthError, EarthResult};

/// Thermodynamic constants of the working fluid.
///
/// Passed explicitly into every computation that needs them; there is no
/// module-global gas table, so two solves with different gas assumptions
/// cannot interfere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GasProperties {
    /// Specific gas constant (J/kg/K)
    pub r: f64,
    /// Ratio of specific heats
    pub gamma: f64,
    /// Specific heat at constant pressure (J/kg/K)
    pub cp: f64,
    /// Specific heat at constant volume (J/kg/K)
    pub cv: f64,
}

impl GasProperties {
    /// Dry air.
    pub fn air() -> Self {
        let r = 287.053;
        let gamma = 1.4;
        let cp = gamma * r / (gamma - 1.0);
        Self {
            r,
            gamma,
            cp,
            cv: cp - r,
        }
    }
}

impl Default for GasProperties {
    fn default() -> Self {
        Self::air()
    }
}

/// On-board energy carriers with their lower heating values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnergySource {
    Kerosene,
    Methane,
    LiquidH2,
}

/// Fuel lower heating value (J/kg).
pub fn fuel_heat(source: EnergySource) -> f64 {
    match source {
        EnergySource::Kerosene => 43.1e6,
        EnergySource::Methane => 50.3e6,
        EnergySource::LiquidH2 => 121.0e6,
    }
}

/// Air density and relative density (sigma) from ambient pressure and temperature.
pub fn air_density(gas: &GasProperties, pamb: f64, tamb: f64) -> EarthResult<(f64, f64)> {
    if pamb <= 0.0 || !pamb.is_finite() {
        return Err(EarthError::NonPhysical {
            what: "ambient pressure must be positive",
        });
    }
    if tamb <= 0.0 || !tamb.is_finite() {
        return Err(EarthError::NonPhysical {
            what: "ambient temperature must be positive",
        });
    }
    let rho0 = 101_325.0 / (gas.r * 288.15);
    let rho = pamb / (gas.r * tamb);
    Ok((rho, rho / rho0))
}

/// Stagnation pressure from static pressure and Mach number.
pub fn total_pressure(gas: &GasProperties, pamb: f64, mach: f64) -> EarthResult<f64> {
    if pamb <= 0.0 || !pamb.is_finite() {
        return Err(EarthError::NonPhysical {
            what: "static pressure must be positive",
        });
    }
    if mach < 0.0 || !mach.is_finite() {
        return Err(EarthError::NonPhysical {
            what: "Mach number must be non-negative",
        });
    }
    let g = gas.gamma;
    Ok(pamb * (1.0 + 0.5 * (g - 1.0) * mach * mach).powf(g / (g - 1.0)))
}

/// Stagnation temperature from static temperature and Mach number.
pub fn total_temperature(gas: &GasProperties, tamb: f64, mach: f64) -> EarthResult<f64> {
    if tamb <= 0.0 || !tamb.is_finite() {
        return Err(EarthError::NonPhysical {
            what: "static temperature must be positive",
        });
    }
    if mach < 0.0 || !mach.is_finite() {
        return Err(EarthError::NonPhysical {
            what: "Mach number must be non-negative",
        });
    }
    Ok(tamb * (1.0 + 0.5 * (gas.gamma - 1.0) * mach * mach))
}
