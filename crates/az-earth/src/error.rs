//! Error types for environment models.

use thiserror::Error;

/// Errors raised by the atmosphere and gas-state functions.
///
/// These are input-domain errors: they are detected at the boundary and
/// must fail fast rather than let a NaN propagate into a solver iteration.
#[derive(Error, Debug, Clone)]
pub enum EarthError {
    #[error("Altitude {altitude_m} m is above the atmosphere model ceiling ({ceiling_m} m)")]
    AltitudeAboveModel { altitude_m: f64, ceiling_m: f64 },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },
}

pub type EarthResult<T> = Result<T, EarthError>;
