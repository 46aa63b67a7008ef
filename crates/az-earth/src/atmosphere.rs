//! ICAO standard atmosphere from ground to 50 km.

use crate::error::{EarthError, EarthResult};
use crate::gas::GasProperties;
use az_core::units::constants::G0_MPS2;

/// Layer boundaries (m) of the piecewise temperature profile.
const LAYER_ALT: [f64; 6] = [0.0, 11_000.0, 20_000.0, 32_000.0, 47_000.0, 50_000.0];

/// Temperature gradient (K/m) within each layer.
const LAYER_LAPSE: [f64; 5] = [-0.0065, 0.0, 0.0010, 0.0028, 0.0];

const SEA_LEVEL_PRESSURE: f64 = 101_325.0;
const SEA_LEVEL_TEMPERATURE: f64 = 288.15;

/// Ambient state at a pressure altitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ambient {
    /// Static pressure (Pa)
    pub pressure: f64,
    /// Static temperature (K), including the ISA offset
    pub temperature: f64,
    /// Temperature gradient of the enclosing layer (K/m)
    pub lapse_rate: f64,
}

/// Ambient data from pressure altitude, with a temperature offset from ISA.
///
/// Pressure and temperature are continuous across layer boundaries: each
/// layer base is propagated from the previous one with the same relations
/// used inside the layer (power law where the gradient is non-zero,
/// exponential where the layer is isothermal).
pub fn atmosphere(altp: f64, disa: f64) -> EarthResult<Ambient> {
    let gas = GasProperties::air();

    if !altp.is_finite() || !disa.is_finite() {
        return Err(EarthError::NonPhysical {
            what: "altitude and temperature offset must be finite",
        });
    }
    let ceiling = LAYER_ALT[LAYER_ALT.len() - 1];
    if altp > ceiling {
        return Err(EarthError::AltitudeAboveModel {
            altitude_m: altp,
            ceiling_m: ceiling,
        });
    }
    if altp < 0.0 {
        return Err(EarthError::NonPhysical {
            what: "altitude must be non-negative",
        });
    }

    let mut p = SEA_LEVEL_PRESSURE;
    let mut t = SEA_LEVEL_TEMPERATURE;
    let mut j = 0;
    while j + 1 < LAYER_LAPSE.len() && LAYER_ALT[j + 1] <= altp {
        let dz = LAYER_ALT[j + 1] - LAYER_ALT[j];
        p = layer_pressure(&gas, p, t, LAYER_LAPSE[j], dz);
        t += LAYER_LAPSE[j] * dz;
        j += 1;
    }

    let dz = altp - LAYER_ALT[j];
    let pamb = layer_pressure(&gas, p, t, LAYER_LAPSE[j], dz);
    let tamb = t + LAYER_LAPSE[j] * dz + disa;
    if tamb <= 0.0 {
        return Err(EarthError::NonPhysical {
            what: "temperature offset drives ambient temperature below zero",
        });
    }

    Ok(Ambient {
        pressure: pamb,
        temperature: tamb,
        lapse_rate: LAYER_LAPSE[j],
    })
}

fn layer_pressure(gas: &GasProperties, p_base: f64, t_base: f64, lapse: f64, dz: f64) -> f64 {
    if lapse.abs() > 0.0 {
        p_base * (1.0 + (lapse / t_base) * dz).powf(-G0_MPS2 / (gas.r * lapse))
    } else {
        p_base * (-(G0_MPS2 / gas.r) * dz / t_base).exp()
    }
}

/// Speed of sound of air at a static temperature.
pub fn sound_speed(tamb: f64) -> EarthResult<f64> {
    if tamb <= 0.0 || !tamb.is_finite() {
        return Err(EarthError::NonPhysical {
            what: "temperature must be positive",
        });
    }
    let gas = GasProperties::air();
    Ok((gas.gamma * gas.r * tamb).sqrt())
}
