//! Flight operating point: ambient plus stagnation state at a Mach number.

use crate::atmosphere::{atmosphere, sound_speed};
use crate::error::{EarthError, EarthResult};
use crate::gas::{GasProperties, total_pressure, total_temperature};
use az_core::units::{Pressure, Temperature, Velocity, k, mps, pa};

/// Immutable flight state consumed by the balance solvers.
///
/// Computed once per solve invocation from altitude, ISA temperature offset
/// and Mach number; solver iterations only ever read it.
#[derive(Clone, Copy, Debug)]
pub struct OperatingPoint {
    /// Ambient static pressure
    pub pamb: Pressure,
    /// Ambient static temperature
    pub tamb: Temperature,
    /// Flight Mach number
    pub mach: f64,
    /// True airspeed
    pub tas: Velocity,
    /// Free-stream stagnation pressure
    pub ptot: Pressure,
    /// Free-stream stagnation temperature
    pub ttot: Temperature,
}

impl OperatingPoint {
    /// Build the operating point at a pressure altitude.
    pub fn new(altp: f64, disa: f64, mach: f64) -> EarthResult<Self> {
        let amb = atmosphere(altp, disa)?;
        Self::from_ambient(amb.pressure, amb.temperature, mach)
    }

    /// Build the operating point from known ambient conditions.
    pub fn from_ambient(pamb: f64, tamb: f64, mach: f64) -> EarthResult<Self> {
        if mach < 0.0 || !mach.is_finite() {
            return Err(EarthError::NonPhysical {
                what: "Mach number must be non-negative",
            });
        }
        let gas = GasProperties::air();
        let vsnd = sound_speed(tamb)?;
        Ok(Self {
            pamb: pa(pamb),
            tamb: k(tamb),
            mach,
            tas: mps(mach * vsnd),
            ptot: pa(total_pressure(&gas, pamb, mach)?),
            ttot: k(total_temperature(&gas, tamb, mach)?),
        })
    }
}
