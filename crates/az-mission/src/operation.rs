//! Operational missions of an already-sized aircraft.
//!
//! With the OWE frozen, a (capacity, range) request leaves two unknowns
//! {TOW, block fuel} closed by the same mass bookkeeping and Breguet
//! equations used at design time.

use az_solver::{BalanceProblem, NewtonConfig, SolverError, SolverResult, solve_balance};
use nalgebra::DVector;
use tracing::debug;

use crate::design::{SizedAircraft, breguet_range};
use crate::error::{MissionError, MissionResult};

/// Taxi-out, climb and approach allowance added to the cruise time.
const BLOCK_TIME_OFFSET_S: f64 = 20.0 * 60.0;

/// A converged operational mission.
#[derive(Clone, Copy, Debug)]
pub struct Operation {
    /// Seating used on the mission
    pub npax: f64,
    /// Mission range (m)
    pub range: f64,
    /// Takeoff weight (kg)
    pub tow: f64,
    /// Block fuel (kg), reserves excluded
    pub fuel: f64,
    /// Block time (s)
    pub time: f64,
}

struct OperationBalance<'a> {
    aircraft: &'a SizedAircraft,
    payload: f64,
    range: f64,
}

impl BalanceProblem for OperationBalance<'_> {
    fn dim(&self) -> usize {
        2
    }

    fn initial_guess(&self) -> DVector<f64> {
        // Scale the design mission fuel by the range ratio; the bookkeeping
        // equation then pins the matching TOW.
        let ac = self.aircraft;
        let fuel =
            (ac.mission_fuel * self.range / ac.requirements.design_range).max(0.05 * ac.mission_fuel);
        let tow = ac.owe + self.payload + (1.0 + ac.technology.kr) * fuel;
        DVector::from_vec(vec![tow, fuel])
    }

    fn unknown_scales(&self) -> DVector<f64> {
        let ac = self.aircraft;
        DVector::from_vec(vec![ac.mtow, ac.mission_fuel])
    }

    fn residual(&self, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
        let (tow, fuel) = (x[0], x[1]);
        if tow <= 0.0 || fuel <= 0.0 {
            return Err(SolverError::ResidualEvaluation {
                what: format!("non-positive trial masses: tow {tow:.0}, fuel {fuel:.0}"),
            });
        }
        let ac = self.aircraft;
        let owe_mass = tow - self.payload - (1.0 + ac.technology.kr) * fuel;
        let range = breguet_range(ac.range_factor, tow, fuel)
            .map_err(|e| SolverError::ResidualEvaluation { what: e.to_string() })?;
        Ok(DVector::from_vec(vec![
            (ac.owe - owe_mass) / ac.payload,
            (range - self.range) / self.range,
        ]))
    }
}

impl SizedAircraft {
    /// Fly an off-design mission at fixed OWE.
    pub fn operation(&self, npax: f64, range: f64) -> MissionResult<Operation> {
        if !(npax.is_finite() && npax > 0.0) {
            return Err(MissionError::InvalidArg {
                what: "passenger count must be positive",
            });
        }
        if !(range.is_finite() && range > 0.0) {
            return Err(MissionError::InvalidArg {
                what: "mission range must be positive",
            });
        }
        let payload = self.technology.nominal_payload(npax);
        let problem = OperationBalance {
            aircraft: self,
            payload,
            range,
        };
        let sol = solve_balance(&problem, &NewtonConfig::default(), None)?;
        let (tow, fuel) = (sol.x[0], sol.x[1]);
        debug!(tow, fuel, iterations = sol.iterations, "operation converged");

        if tow > self.mtow * (1.0 + 1e-9) {
            return Err(MissionError::Infeasible {
                what: format!(
                    "mission needs TOW {tow:.0} kg above MTOW {:.0} kg",
                    self.mtow
                ),
            });
        }
        Ok(Operation {
            npax,
            range,
            tow,
            fuel,
            time: BLOCK_TIME_OFFSET_S + range / self.cruise_speed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{design, tests::single_aisle};
    use crate::envelope::MissionAssessment;

    #[test]
    fn design_mission_is_reproduced() {
        let (req, tech) = single_aisle();
        let ac = design(&req, &tech).unwrap();
        let op = ac.operation(req.npax, req.design_range).unwrap();
        assert!((op.tow - ac.mtow).abs() / ac.mtow < 1e-6);
        assert!((op.fuel - ac.mission_fuel).abs() / ac.mission_fuel < 1e-6);
    }

    #[test]
    fn shorter_mission_burns_less_fuel() {
        let (req, tech) = single_aisle();
        let ac = design(&req, &tech).unwrap();
        let short = ac.operation(req.npax, 0.5 * req.design_range).unwrap();
        assert!(short.fuel < ac.mission_fuel);
        assert!(short.tow < ac.mtow);
    }

    #[test]
    fn block_time_includes_the_fixed_allowance() {
        let (req, tech) = single_aisle();
        let ac = design(&req, &tech).unwrap();
        let op = ac.operation(100.0, 2.0e6).unwrap();
        let expected = 20.0 * 60.0 + 2.0e6 / ac.cruise_speed;
        assert!((op.time - expected).abs() < 1e-9);
    }

    #[test]
    fn mission_beyond_mtow_is_infeasible() {
        let (req, tech) = single_aisle();
        let ac = design(&req, &tech).unwrap();
        // The envelope agrees this request is out of reach.
        let npax_max = ac.envelope.payload_max / tech.mpax;
        assert_ne!(
            ac.envelope.check_mission(npax_max, 1.3 * req.design_range),
            MissionAssessment::Feasible
        );
        let err = ac.operation(npax_max, 1.3 * req.design_range).unwrap_err();
        assert!(matches!(
            err,
            MissionError::Infeasible { .. } | MissionError::Solver(_)
        ));
    }
}
