use az_core::units::convert;
use serde::{Deserialize, Serialize};

use crate::error::{MissionError, MissionResult};

/// Top-level sizing requirement. Ranges and altitudes are SI meters so the
/// struct can round-trip through configuration files without unit tags.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct Requirements {
    /// Nominal seating capacity
    pub npax: f64,
    /// Design range (m)
    pub design_range: f64,
    /// Cruise Mach number
    pub cruise_mach: f64,
    /// Cruise pressure altitude (m)
    pub cruise_altp: f64,
    /// Temperature offset from standard day (K)
    pub cruise_disa: f64,
}

impl Requirements {
    pub fn validate(&self) -> MissionResult<()> {
        if !(self.npax.is_finite() && self.npax > 0.0) {
            return Err(MissionError::InvalidArg {
                what: "passenger count must be positive",
            });
        }
        if !(self.design_range.is_finite() && self.design_range > 0.0) {
            return Err(MissionError::InvalidArg {
                what: "design range must be positive",
            });
        }
        if !(self.cruise_mach.is_finite() && self.cruise_mach > 0.0 && self.cruise_mach < 1.0) {
            return Err(MissionError::InvalidArg {
                what: "cruise Mach must be subsonic and positive",
            });
        }
        if !self.cruise_altp.is_finite() || self.cruise_altp < 0.0 {
            return Err(MissionError::InvalidArg {
                what: "cruise altitude must be non-negative",
            });
        }
        Ok(())
    }
}

/// Technology assumptions behind the mass and performance regressions.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct Technology {
    /// Allowance per passenger, bags included (kg)
    pub mpax: f64,
    /// Reserve fuel fraction of the mission fuel
    pub kr: f64,
    /// Cruise specific fuel consumption (kg/N/s)
    pub sfc: f64,
    /// Quadratic OWE regression on MTOW, highest degree first
    pub owe_coef: [f64; 3],
}

impl Default for Technology {
    fn default() -> Self {
        Self {
            mpax: 130.0,
            kr: 0.05,
            sfc: convert::kgpnps_kgpdanph(0.54),
            owe_coef: [-1.478e-7, 5.459e-1, 8.40e2],
        }
    }
}

impl Technology {
    /// Cruise lift-to-drag statistic: 15 at 60 seats rising to 20 at 160,
    /// clamped outside that span.
    pub fn lift_to_drag(&self, npax: f64) -> f64 {
        let t = ((npax - 60.0) / (160.0 - 60.0)).clamp(0.0, 1.0);
        15.0 + t * (20.0 - 15.0)
    }

    /// Nominal payload for the seating capacity.
    pub fn nominal_payload(&self, npax: f64) -> f64 {
        self.mpax * npax
    }

    /// Structural operating-weight-empty regression on MTOW.
    pub fn structural_owe(&self, mtow: f64) -> f64 {
        let [c0, c1, c2] = self.owe_coef;
        (c0 * mtow + c1) * mtow + c2
    }
}
