//! Mass-mission-range adaptation.
//!
//! The design solve closes two equations on two unknowns {MTOW, mission
//! fuel}: the structural OWE regression against the mass bookkeeping, and
//! the Breguet range against the requirement. Both residuals are scaled by
//! the quantity they close on (payload, design range) so the solver
//! tolerances mean the same thing across aircraft sizes.

use az_core::units::constants::G0_MPS2;
use az_earth::OperatingPoint;
use az_solver::{BalanceProblem, NewtonConfig, SolverError, SolverResult, solve_balance};
use nalgebra::DVector;
use tracing::debug;

use crate::envelope::PayloadRangeEnvelope;
use crate::error::{MissionError, MissionResult};
use crate::requirements::{Requirements, Technology};

/// Breguet cruise range (m) for a takeoff weight and burnt fuel, both kg.
///
/// `range_factor` is the speed times lift-to-drag over g times SFC, in
/// meters. A fuel load at or above the takeoff weight has no landing
/// weight and is rejected as infeasible rather than clamped.
pub fn breguet_range(range_factor: f64, tow: f64, fuel: f64) -> MissionResult<f64> {
    if !(range_factor.is_finite() && range_factor > 0.0) {
        return Err(MissionError::InvalidArg {
            what: "range factor must be positive",
        });
    }
    if !(tow.is_finite() && tow > 0.0) {
        return Err(MissionError::InvalidArg {
            what: "takeoff weight must be positive",
        });
    }
    if !(fuel.is_finite() && fuel > 0.0) {
        return Err(MissionError::InvalidArg {
            what: "fuel mass must be positive",
        });
    }
    let ldw = tow - fuel;
    if ldw <= 0.0 {
        return Err(MissionError::Infeasible {
            what: format!("fuel {fuel:.0} kg leaves no landing weight at TOW {tow:.0} kg"),
        });
    }
    Ok(range_factor * (tow / ldw).ln())
}

/// Mach times sound speed times L/D over g times SFC (m).
pub fn range_factor(op: &OperatingPoint, lift_to_drag: f64, sfc: f64) -> f64 {
    op.tas.value * lift_to_drag / (G0_MPS2 * sfc)
}

/// Two-unknown design balance: x = [mtow, mission fuel].
struct MassMissionBalance {
    technology: Technology,
    payload: f64,
    design_range: f64,
    range_factor: f64,
}

impl BalanceProblem for MassMissionBalance {
    fn dim(&self) -> usize {
        2
    }

    fn initial_guess(&self) -> DVector<f64> {
        DVector::from_vec(vec![4.0 * self.payload, self.payload])
    }

    fn unknown_scales(&self) -> DVector<f64> {
        // MTOW and mission fuel are both payload-sized masses.
        DVector::from_vec(vec![4.0 * self.payload, self.payload])
    }

    fn residual(&self, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
        let (mtow, fuel) = (x[0], x[1]);
        if mtow <= 0.0 || fuel <= 0.0 {
            return Err(SolverError::ResidualEvaluation {
                what: format!("non-positive trial masses: mtow {mtow:.0}, fuel {fuel:.0}"),
            });
        }
        let owe_structure = self.technology.structural_owe(mtow);
        let owe_mass = mtow - self.payload - (1.0 + self.technology.kr) * fuel;
        let range = breguet_range(self.range_factor, mtow, fuel)
            .map_err(|e| SolverError::ResidualEvaluation { what: e.to_string() })?;
        Ok(DVector::from_vec(vec![
            (owe_structure - owe_mass) / self.payload,
            (range - self.design_range) / self.design_range,
        ]))
    }
}

/// A converged design: the mass breakdown plus the payload-range envelope
/// evaluated at the design MTOW/OWE.
#[derive(Clone, Copy, Debug)]
pub struct SizedAircraft {
    pub requirements: Requirements,
    pub technology: Technology,
    /// Cruise true airspeed (m/s)
    pub cruise_speed: f64,
    pub lift_to_drag: f64,
    pub range_factor: f64,
    /// Nominal payload (kg)
    pub payload: f64,
    pub mtow: f64,
    pub owe: f64,
    /// Fuel burnt on the design mission (kg), reserves excluded
    pub mission_fuel: f64,
    pub reserve_fuel: f64,
    pub total_fuel: f64,
    pub envelope: PayloadRangeEnvelope,
}

impl SizedAircraft {
    /// Landing weight on the design mission.
    pub fn landing_weight(&self) -> f64 {
        self.mtow - self.mission_fuel
    }
}

/// Size an aircraft against the requirement.
pub fn design(requirements: &Requirements, technology: &Technology) -> MissionResult<SizedAircraft> {
    requirements.validate()?;
    let op = OperatingPoint::new(
        requirements.cruise_altp,
        requirements.cruise_disa,
        requirements.cruise_mach,
    )?;
    let payload = technology.nominal_payload(requirements.npax);
    let lift_to_drag = technology.lift_to_drag(requirements.npax);
    let kf = range_factor(&op, lift_to_drag, technology.sfc);

    let problem = MassMissionBalance {
        technology: *technology,
        payload,
        design_range: requirements.design_range,
        range_factor: kf,
    };
    let sol = solve_balance(&problem, &NewtonConfig::default(), None)?;
    let (mtow, mission_fuel) = (sol.x[0], sol.x[1]);
    debug!(
        mtow,
        mission_fuel,
        iterations = sol.iterations,
        "mass-mission balance converged"
    );

    let reserve_fuel = technology.kr * mission_fuel;
    let total_fuel = (1.0 + technology.kr) * mission_fuel;
    let owe = mtow - payload - total_fuel;
    if owe <= 0.0 {
        return Err(MissionError::Infeasible {
            what: format!("converged OWE {owe:.0} kg is not positive"),
        });
    }

    let envelope = PayloadRangeEnvelope::from_design(
        mtow,
        owe,
        payload,
        technology.kr,
        kf,
        technology.mpax,
    )?;

    Ok(SizedAircraft {
        requirements: *requirements,
        technology: *technology,
        cruise_speed: op.tas.value,
        lift_to_drag,
        range_factor: kf,
        payload,
        mtow,
        owe,
        mission_fuel,
        reserve_fuel,
        total_fuel,
        envelope,
    })
}
