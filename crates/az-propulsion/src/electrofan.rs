//! Ducted electric fan nacelle.
//!
//! ## Model
//!
//! The fan adds shaft power to the captured stream; the jet velocity
//! follows from conservation of energy (adapted nozzle assumed):
//!
//! ```text
//! Vjet    = sqrt(2 eta_fan Pshaft / q + V0^2)
//! Tt_jet  = Tt0 + Pshaft / (q Cp)
//! ```
//!
//! At the design point the geometry (fan and nozzle areas) is computed
//! directly from the corrected flow, with no iteration. Off-design the
//! nozzle area is frozen, and the captured flow `q` is the unknown of a
//! corrected-flow continuity equation solved by Newton iteration. When the
//! target is a net thrust instead of a shaft power, `q` and `Pshaft` float
//! together against continuity plus a thrust-matching equation.

use crate::error::{PropulsionError, PropulsionResult};
use crate::flow::corrected_air_flow;
use crate::model::{ConsumptionReport, PropulsionModel, ThrustReport};
use crate::rating::{Rating, RatingTable};
use az_core::units::{Area, Length, MassRate, Power, kgps, m, n, sqm, w};
use az_earth::{GasProperties, OperatingPoint, total_pressure};
use az_solver::{BalanceProblem, NewtonConfig, SolverError, SolverResult, solve_balance};
use nalgebra::DVector;
use tracing::debug;

/// Flow-path geometry frozen at the design point.
#[derive(Clone, Copy, Debug)]
pub struct FanGeometry {
    /// Fan diameter, hub included
    pub fan_width: Length,
    /// Annular fan area around the hub
    pub fan_area: Area,
    /// Nozzle exit diameter
    pub nozzle_width: Length,
    /// Nozzle exit area
    pub nozzle_area: Area,
    /// Captured air flow at the design point
    pub design_flow: MassRate,
}

/// Electric ducted-fan engine.
pub struct ElectrofanNacelle {
    /// Rated shaft power of the electric chain
    pub reference_power: Power,
    /// Rating multipliers applied to the reference power
    pub ratings: RatingTable,
    /// Fan isentropic efficiency
    pub eff_fan: f64,
    /// Installed propulsive efficiency at the design point
    pub eff_prop: f64,
    /// Electric motor efficiency
    pub motor_eff: f64,
    /// Power controller efficiency
    pub controller_eff: f64,
    /// Fan hub diameter (m)
    pub hub_width: f64,
    /// Axial Mach number required at the fan face
    pub fan_mach: f64,
    gas: GasProperties,
    geometry: Option<FanGeometry>,
}

struct JetState {
    vjet: f64,
    ttot_jet: f64,
    mach_jet: f64,
    ptot_jet: f64,
}

impl ElectrofanNacelle {
    /// Create an undesigned nacelle with statistical efficiencies.
    pub fn new(reference_power: f64, ratings: RatingTable) -> PropulsionResult<Self> {
        if !(reference_power.is_finite() && reference_power > 0.0) {
            return Err(PropulsionError::InvalidArg {
                what: "reference power must be positive",
            });
        }
        ratings.validate()?;
        Ok(Self {
            reference_power: w(reference_power),
            ratings,
            eff_fan: 0.95,
            eff_prop: 0.82,
            motor_eff: 0.95,
            controller_eff: 0.99,
            hub_width: 0.20,
            fan_mach: 0.50,
            gas: GasProperties::air(),
            geometry: None,
        })
    }

    /// Statistical reference shaft power per engine from the top-level
    /// requirement (passenger count, design range in meters).
    pub fn reference_power_from_requirement(npax: f64, design_range: f64, n_engine: f64) -> f64 {
        (1.0 / 0.8) * (87.26 / 0.82) * (1.0e5 + 177.0 * npax * design_range * 1.0e-6) / n_engine
    }

    /// Sized flow-path geometry, available after [`Self::design`].
    pub fn geometry(&self) -> PropulsionResult<&FanGeometry> {
        self.geometry.as_ref().ok_or(PropulsionError::NotSized {
            what: "call design() before off-design evaluation",
        })
    }

    /// Size the fan and nozzle at the given operating point and shaft power.
    ///
    /// One-shot and closed-form: the captured flow follows from the design
    /// speed increment, the fan area from the corrected flow at the fan
    /// face, and the nozzle area from the jet stagnation state.
    pub fn design(
        &mut self,
        op: &OperatingPoint,
        shaft_power: f64,
    ) -> PropulsionResult<&FanGeometry> {
        if !(shaft_power.is_finite() && shaft_power > 0.0) {
            return Err(PropulsionError::InvalidArg {
                what: "design shaft power must be positive",
            });
        }
        if op.mach <= 0.0 {
            return Err(PropulsionError::InvalidArg {
                what: "design operating point must be in forward flight",
            });
        }
        if !(self.eff_prop < self.eff_fan) {
            return Err(PropulsionError::InvalidArg {
                what: "fan efficiency must exceed propulsive efficiency",
            });
        }

        let v0 = op.tas.value;
        // Design speed increment delivered by the fan
        let delta_v = 2.0 * v0 * (self.eff_fan / self.eff_prop - 1.0);
        let pw_input = self.eff_fan * shaft_power;
        let vjet = v0 + delta_v;
        let q1 = 2.0 * pw_input / (vjet * vjet - v0 * v0);

        let cqoa_fan =
            corrected_air_flow(&self.gas, op.ptot.value, op.ttot.value, self.fan_mach)?;
        let fan_area = q1 / cqoa_fan;
        let fan_width =
            (self.hub_width * self.hub_width + 4.0 * fan_area / std::f64::consts::PI).sqrt();

        let jet = self
            .jet_state(op, shaft_power, q1)
            .map_err(|what| PropulsionError::Infeasible {
                what: format!("design point jet state: {what}"),
            })?;
        let cqoa_jet = corrected_air_flow(&self.gas, jet.ptot_jet, jet.ttot_jet, jet.mach_jet)?;
        let nozzle_area = q1 / cqoa_jet;
        let nozzle_width = (4.0 * nozzle_area / std::f64::consts::PI).sqrt();

        debug!(q1, fan_width, nozzle_area, "electrofan geometry sized");
        self.geometry = Some(FanGeometry {
            fan_width: m(fan_width),
            fan_area: sqm(fan_area),
            nozzle_width: m(nozzle_width),
            nozzle_area: sqm(nozzle_area),
            design_flow: kgps(q1),
        });
        self.geometry()
    }

    /// First-call seed for the off-design solves: corrected flow through
    /// the fan face at the flight Mach number.
    pub fn magic_guess(&self, op: &OperatingPoint) -> PropulsionResult<f64> {
        let geom = self.geometry()?;
        let face = 0.25 * std::f64::consts::PI * geom.fan_width.value * geom.fan_width.value;
        let q0 = corrected_air_flow(&self.gas, op.ptot.value, op.ttot.value, op.mach)? * face;
        if q0 > 0.0 {
            Ok(q0)
        } else {
            // Static conditions: fall back on a fraction of the design flow
            Ok(0.5 * geom.design_flow.value)
        }
    }

    /// Warm-started sweep of target thrusts at a fixed flight condition.
    ///
    /// Result i seeds solve i+1; the first solve uses the magic guess. Each
    /// point is an independent balance problem, so the seeding is purely a
    /// data dependency between consecutive results.
    pub fn thrust_sweep(
        &self,
        op: &OperatingPoint,
        rating: Rating,
        thrusts: &[f64],
        pw_offtake: f64,
    ) -> PropulsionResult<Vec<ConsumptionReport>> {
        let mut reports = Vec::with_capacity(thrusts.len());
        let mut guess: Option<DVector<f64>> = None;
        for &target in thrusts {
            let report = self.unitary_consumption(op, rating, target, pw_offtake, guess.as_ref())?;
            guess = report.sol.clone();
            reports.push(report);
        }
        Ok(reports)
    }

    fn jet_state(&self, op: &OperatingPoint, pw_shaft: f64, q: f64) -> Result<JetState, String> {
        if !(q.is_finite() && q > 0.0) {
            return Err("captured flow must be positive".to_string());
        }
        let v0 = op.tas.value;
        let vjet = (2.0 * self.eff_fan * pw_shaft / q + v0 * v0).sqrt();
        let ttot_jet = op.ttot.value + pw_shaft / (q * self.gas.cp);
        let tstat_jet = ttot_jet - 0.5 * vjet * vjet / self.gas.cp;
        if tstat_jet <= 0.0 {
            return Err("non-positive static temperature at nozzle exit".to_string());
        }
        let mach_jet = vjet / (self.gas.gamma * self.gas.r * tstat_jet).sqrt();
        // Adapted nozzle: static pressure at the exit equals ambient
        let ptot_jet = total_pressure(&self.gas, op.pamb.value, mach_jet)
            .map_err(|e| e.to_string())?;
        Ok(JetState {
            vjet,
            ttot_jet,
            mach_jet,
            ptot_jet,
        })
    }

    fn shaft_power_available(
        &self,
        rating: Rating,
        throttle: f64,
        pw_offtake: f64,
    ) -> PropulsionResult<f64> {
        if !(throttle > 0.0 && throttle <= 1.0) {
            return Err(PropulsionError::InvalidArg {
                what: "throttle must be in (0, 1]",
            });
        }
        if !(pw_offtake.is_finite() && pw_offtake >= 0.0) {
            return Err(PropulsionError::InvalidArg {
                what: "power offtake must be non-negative",
            });
        }
        let pw_input =
            self.reference_power.value * self.ratings.factor(rating) * throttle - pw_offtake;
        if pw_input <= 0.0 {
            return Err(PropulsionError::Infeasible {
                what: format!(
                    "offtake {pw_offtake} W exceeds available power at rating {rating:?}"
                ),
            });
        }
        Ok(pw_input * self.motor_eff * self.controller_eff)
    }
}

/// One-unknown continuity problem: captured flow at a fixed shaft power.
struct FlowContinuity<'a> {
    nacelle: &'a ElectrofanNacelle,
    op: &'a OperatingPoint,
    pw_shaft: f64,
    nozzle_area: f64,
    seed: f64,
}

impl BalanceProblem for FlowContinuity<'_> {
    fn dim(&self) -> usize {
        1
    }

    fn initial_guess(&self) -> DVector<f64> {
        DVector::from_element(1, self.seed)
    }

    fn unknown_scales(&self) -> DVector<f64> {
        DVector::from_element(1, self.seed)
    }

    fn residual(&self, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
        let q = x[0];
        let jet = self
            .nacelle
            .jet_state(self.op, self.pw_shaft, q)
            .map_err(|what| SolverError::ResidualEvaluation { what })?;
        let cqoa = corrected_air_flow(&self.nacelle.gas, jet.ptot_jet, jet.ttot_jet, jet.mach_jet)
            .map_err(|e| SolverError::ResidualEvaluation {
                what: e.to_string(),
            })?;
        let q0 = cqoa * self.nozzle_area;
        Ok(DVector::from_element(1, q0 - q))
    }
}

/// Two-unknown problem: captured flow and shaft power at a target thrust.
struct ThrustMatch<'a> {
    nacelle: &'a ElectrofanNacelle,
    op: &'a OperatingPoint,
    thrust: f64,
    nozzle_area: f64,
    seed: [f64; 2],
}

impl BalanceProblem for ThrustMatch<'_> {
    fn dim(&self) -> usize {
        2
    }

    fn initial_guess(&self) -> DVector<f64> {
        DVector::from_row_slice(&self.seed)
    }

    fn unknown_scales(&self) -> DVector<f64> {
        // Captured flow in kg/s next to shaft power in W.
        DVector::from_row_slice(&self.seed)
    }

    fn residual(&self, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
        let q = x[0];
        let pw_shaft = x[1];
        if !(pw_shaft.is_finite() && pw_shaft > 0.0) {
            return Err(SolverError::ResidualEvaluation {
                what: "shaft power must be positive".to_string(),
            });
        }
        let jet = self
            .nacelle
            .jet_state(self.op, pw_shaft, q)
            .map_err(|what| SolverError::ResidualEvaluation { what })?;
        let cqoa = corrected_air_flow(&self.nacelle.gas, jet.ptot_jet, jet.ttot_jet, jet.mach_jet)
            .map_err(|e| SolverError::ResidualEvaluation {
                what: e.to_string(),
            })?;
        let q0 = cqoa * self.nozzle_area;
        let fn_eff = q * (jet.vjet - self.op.tas.value);
        Ok(DVector::from_vec(vec![q0 - q, self.thrust - fn_eff]))
    }
}

impl PropulsionModel for ElectrofanNacelle {
    /// Thrust at a commanded shaft power (rating x throttle, minus offtake).
    ///
    /// The captured flow is the single unknown of the nozzle continuity
    /// equation; non-convergence propagates as an error, never as a stale
    /// flow value.
    fn unitary_thrust(
        &self,
        op: &OperatingPoint,
        rating: Rating,
        throttle: f64,
        pw_offtake: f64,
        guess: Option<&DVector<f64>>,
    ) -> PropulsionResult<ThrustReport> {
        let geom = self.geometry()?;
        let pw_shaft = self.shaft_power_available(rating, throttle, pw_offtake)?;

        let problem = FlowContinuity {
            nacelle: self,
            op,
            pw_shaft,
            nozzle_area: geom.nozzle_area.value,
            seed: self.magic_guess(op)?,
        };
        let sol = solve_balance(&problem, &NewtonConfig::default(), guess)?;

        let q = sol.x[0];
        if q <= 0.0 {
            return Err(PropulsionError::Infeasible {
                what: format!("converged to non-physical captured flow {q} kg/s"),
            });
        }
        let v0 = op.tas.value;
        let vjet = (2.0 * self.eff_fan * pw_shaft / q + v0 * v0).sqrt();
        Ok(ThrustReport {
            thrust: n(q * (vjet - v0)),
            fuel_flow: kgps(0.0),
            shaft_power: w(pw_shaft),
            sol: Some(sol.x),
        })
    }

    /// Shaft power and captured flow that deliver a target net thrust.
    ///
    /// Both unknowns float against nozzle continuity and thrust matching.
    /// The returned throttle is the fraction of the rating's reference
    /// power the matched point uses; values above one mean the request is
    /// beyond the rating and it is the caller's decision to reject it.
    fn unitary_consumption(
        &self,
        op: &OperatingPoint,
        rating: Rating,
        thrust: f64,
        pw_offtake: f64,
        guess: Option<&DVector<f64>>,
    ) -> PropulsionResult<ConsumptionReport> {
        if !(thrust.is_finite() && thrust > 0.0) {
            return Err(PropulsionError::InvalidArg {
                what: "target thrust must be positive",
            });
        }
        let geom = self.geometry()?;
        let pw_rated = self.shaft_power_available(rating, 1.0, pw_offtake)?;

        let problem = ThrustMatch {
            nacelle: self,
            op,
            thrust,
            nozzle_area: geom.nozzle_area.value,
            seed: [self.magic_guess(op)?, pw_rated],
        };
        let sol = solve_balance(&problem, &NewtonConfig::default(), guess)?;

        let q = sol.x[0];
        let pw_shaft = sol.x[1];
        if q <= 0.0 || pw_shaft <= 0.0 {
            return Err(PropulsionError::Infeasible {
                what: format!(
                    "converged to non-physical point (q = {q} kg/s, P = {pw_shaft} W)"
                ),
            });
        }
        let v0 = op.tas.value;
        let vjet = (2.0 * self.eff_fan * pw_shaft / q + v0 * v0).sqrt();
        let fn_eff = q * (vjet - v0);

        let throttle = (pw_shaft / (self.motor_eff * self.controller_eff) + pw_offtake)
            / (self.reference_power.value * self.ratings.factor(rating));
        Ok(ConsumptionReport {
            specific_consumption: pw_shaft / fn_eff,
            shaft_power: w(pw_shaft),
            throttle,
            sol: Some(sol.x),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cruise_nacelle() -> (ElectrofanNacelle, OperatingPoint) {
        let reference_power =
            ElectrofanNacelle::reference_power_from_requirement(150.0, 3000.0 * 1852.0, 2.0);
        let mut nacelle =
            ElectrofanNacelle::new(reference_power, RatingTable::electrofan()).unwrap();
        let op = OperatingPoint::new(10_668.0, 0.0, 0.75).unwrap();
        let shaft = nacelle.reference_power.value * nacelle.ratings.mcr;
        nacelle.design(&op, shaft).unwrap();
        (nacelle, op)
    }

    #[test]
    fn design_produces_coherent_geometry() {
        let (nacelle, _op) = cruise_nacelle();
        let geom = nacelle.geometry().unwrap();
        assert!(geom.fan_width.value > geom.nozzle_width.value);
        assert!(geom.fan_width.value > nacelle.hub_width);
        assert!(geom.nozzle_area.value > 0.0);
        assert!(geom.design_flow.value > 0.0);
    }

    #[test]
    fn off_design_before_design_is_rejected() {
        let nacelle = ElectrofanNacelle::new(1.0e7, RatingTable::electrofan()).unwrap();
        let op = OperatingPoint::new(0.0, 0.0, 0.25).unwrap();
        let err = nacelle
            .unitary_thrust(&op, Rating::Mto, 1.0, 0.0, None)
            .unwrap_err();
        assert!(matches!(err, PropulsionError::NotSized { .. }));
    }

    #[test]
    fn off_design_recovers_design_point() {
        // Running off-design at the design rating and flight condition must
        // capture approximately the design flow through the frozen nozzle.
        let (nacelle, op) = cruise_nacelle();
        let geom = *nacelle.geometry().unwrap();
        let report = nacelle
            .unitary_thrust(&op, Rating::Mcr, 1.0, 0.0, None)
            .unwrap();
        let q = report.sol.as_ref().unwrap()[0];
        let err = (q - geom.design_flow.value).abs() / geom.design_flow.value;
        assert!(err < 0.15, "flow deviates {:.1}% from design", err * 100.0);
        assert!(report.thrust.value > 0.0);
    }

    #[test]
    fn thrust_report_satisfies_energy_equation() {
        let (nacelle, op) = cruise_nacelle();
        let report = nacelle
            .unitary_thrust(&op, Rating::Mcr, 0.9, 0.0, None)
            .unwrap();
        let q = report.sol.as_ref().unwrap()[0];
        let v0 = op.tas.value;
        let vjet = (2.0 * nacelle.eff_fan * report.shaft_power.value / q + v0 * v0).sqrt();
        let recomputed = q * (vjet - v0);
        assert!((recomputed - report.thrust.value).abs() / report.thrust.value < 1e-9);
    }

    #[test]
    fn consumption_matches_target_thrust() {
        let (nacelle, op) = cruise_nacelle();
        let report = nacelle
            .unitary_consumption(&op, Rating::Mcr, 25_000.0, 0.0, None)
            .unwrap();
        let q = report.sol.as_ref().unwrap()[0];
        let pw = report.sol.as_ref().unwrap()[1];
        let v0 = op.tas.value;
        let vjet = (2.0 * nacelle.eff_fan * pw / q + v0 * v0).sqrt();
        let recomputed = q * (vjet - v0);
        assert!(
            (recomputed - 25_000.0).abs() / 25_000.0 < 1e-3,
            "thrust error {:.4}%",
            (recomputed - 25_000.0).abs() / 25.0
        );
        assert!(report.shaft_power.value > 0.0);
        assert!(report.throttle > 0.0);
    }

    #[test]
    fn excessive_offtake_is_infeasible() {
        let (nacelle, op) = cruise_nacelle();
        let offtake = nacelle.reference_power.value * 2.0;
        let err = nacelle
            .unitary_thrust(&op, Rating::Mcr, 1.0, offtake, None)
            .unwrap_err();
        assert!(matches!(err, PropulsionError::Infeasible { .. }));
    }

    #[test]
    fn sweep_power_decreases_with_thrust() {
        let (nacelle, op) = cruise_nacelle();
        let reference = 25_000.0;
        let targets: Vec<f64> = (0..13).map(|i| (1.1 - 0.05 * i as f64) * reference).collect();
        let reports = nacelle
            .thrust_sweep(&op, Rating::Mcr, &targets, 0.0)
            .unwrap();

        for pair in reports.windows(2) {
            assert!(pair[1].shaft_power.value < pair[0].shaft_power.value);
            // Specific consumption varies smoothly between consecutive points
            let rel = (pair[1].specific_consumption - pair[0].specific_consumption).abs()
                / pair[0].specific_consumption;
            assert!(rel < 0.10, "sc discontinuity: {rel}");
        }
    }
}
