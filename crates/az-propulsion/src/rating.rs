//! Engine rating tables.
//!
//! A rating maps to a fractional multiplier on reference thrust or power.
//! Tables are plain configuration data passed explicitly into engine
//! models; no module-level defaults are consulted during a solve.

use crate::error::{PropulsionError, PropulsionResult};
use serde::{Deserialize, Serialize};

/// Named engine rating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Rating {
    /// Max takeoff
    Mto,
    /// Max continuous
    Mcn,
    /// Max climb
    Mcl,
    /// Max cruise
    Mcr,
    /// Flight idle
    Fid,
}

/// Fractional multipliers on the reference thrust/power per rating.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RatingTable {
    pub mto: f64,
    pub mcn: f64,
    pub mcl: f64,
    pub mcr: f64,
    pub fid: f64,
}

impl RatingTable {
    /// Statistical ratings of a ducted electric fan.
    pub fn electrofan() -> Self {
        Self {
            mto: 1.00,
            mcn: 0.90,
            mcl: 0.90,
            mcr: 0.90,
            fid: 0.10,
        }
    }

    /// Statistical ratings of a kerosene turbofan.
    pub fn turbofan() -> Self {
        Self {
            mto: 1.00,
            mcn: 0.86,
            mcl: 0.78,
            mcr: 0.70,
            fid: 0.10,
        }
    }

    pub fn factor(&self, rating: Rating) -> f64 {
        match rating {
            Rating::Mto => self.mto,
            Rating::Mcn => self.mcn,
            Rating::Mcl => self.mcl,
            Rating::Mcr => self.mcr,
            Rating::Fid => self.fid,
        }
    }

    /// Sanity checks for externally loaded tables.
    pub fn validate(&self) -> PropulsionResult<()> {
        for v in [self.mto, self.mcn, self.mcl, self.mcr, self.fid] {
            if !(v.is_finite() && v > 0.0 && v <= 1.5) {
                return Err(PropulsionError::InvalidArg {
                    what: "rating factors must be finite and in (0, 1.5]",
                });
            }
        }
        Ok(())
    }
}
