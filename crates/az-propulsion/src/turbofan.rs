//! Turbofan models: statistical off-design thrust and design-point cycle.

use crate::error::{PropulsionError, PropulsionResult};
use crate::flow::corrected_air_flow;
use crate::model::{ConsumptionReport, PropulsionModel, ThrustReport};
use crate::rating::{Rating, RatingTable};
use az_core::units::{Area, Force, Length, MassRate, kgps, m, n, sqm, w};
use az_earth::{
    EnergySource, GasProperties, OperatingPoint, air_density, fuel_heat, sound_speed,
    total_pressure,
};
use nalgebra::DVector;
use tracing::debug;

/// Semi-empirical turbofan.
///
/// Thrust and fuel flow are closed-form functions of flight condition,
/// rating and throttle, regressed on the reference takeoff thrust and the
/// bypass ratio; no iteration is involved. A tune factor calibrates the
/// statistics so the sea-level takeoff output reproduces the reference
/// thrust definition (thrust at Mach 0.25, sea level, ISA+15, over 0.80).
pub struct SemiEmpiricTurbofan {
    /// Rated sea-level takeoff thrust
    pub reference_thrust: Force,
    /// Bypass ratio
    pub bpr: f64,
    /// Fraction of total thrust produced by the core
    pub core_thrust_ratio: f64,
    /// Installed propulsive efficiency
    pub eff_prop: f64,
    /// Rating multipliers applied to the reference thrust
    pub ratings: RatingTable,
    tune_factor: f64,
    gas: GasProperties,
}

impl SemiEmpiricTurbofan {
    pub fn new(reference_thrust: f64, bpr: f64, ratings: RatingTable) -> PropulsionResult<Self> {
        if !(reference_thrust.is_finite() && reference_thrust > 0.0) {
            return Err(PropulsionError::InvalidArg {
                what: "reference thrust must be positive",
            });
        }
        if !(bpr.is_finite() && bpr > 0.0) {
            return Err(PropulsionError::InvalidArg {
                what: "bypass ratio must be positive",
            });
        }
        ratings.validate()?;
        Ok(Self {
            reference_thrust: n(reference_thrust),
            bpr,
            core_thrust_ratio: 0.13,
            eff_prop: 0.82,
            ratings,
            tune_factor: 1.0,
            gas: GasProperties::air(),
        })
    }

    /// Statistical bypass ratio from the seating capacity.
    pub fn bpr_from_npax(npax: f64) -> f64 {
        if npax > 80.0 { 9.0 } else { 5.0 }
    }

    /// Statistical reference thrust per engine from the top-level
    /// requirement (passenger count, design range in meters).
    pub fn reference_thrust_from_requirement(npax: f64, design_range: f64, n_engine: f64) -> f64 {
        (1.0e5 + 177.0 * npax * design_range * 1.0e-6) / n_engine
    }

    /// Calibrate the tune factor so that thrust(Mach 0.25, sea level,
    /// ISA+15) / 0.80 reproduces the reference thrust.
    pub fn calibrate(&mut self) -> PropulsionResult<()> {
        let op = OperatingPoint::new(0.0, 15.0, 0.25)?;
        self.tune_factor = 1.0;
        let report = self.unitary_thrust(&op, Rating::Mto, 1.0, 0.0, None)?;
        self.tune_factor = self.reference_thrust.value / (report.thrust.value / 0.80);
        debug!(tune_factor = self.tune_factor, "turbofan calibrated");
        Ok(())
    }
}

impl PropulsionModel for SemiEmpiricTurbofan {
    fn unitary_thrust(
        &self,
        op: &OperatingPoint,
        rating: Rating,
        throttle: f64,
        pw_offtake: f64,
        _guess: Option<&DVector<f64>>,
    ) -> PropulsionResult<ThrustReport> {
        if !(throttle > 0.0 && throttle <= 1.0) {
            return Err(PropulsionError::InvalidArg {
                what: "throttle must be in (0, 1]",
            });
        }
        let mach = op.mach;
        let b = self.bpr / 10.0;
        let kth = 0.475 * mach * mach + 0.091 * b * b - 0.283 * mach * b - 0.633 * mach
            - 0.081 * b
            + 1.192;

        let (_rho, sig) = air_density(&self.gas, op.pamb.value, op.tamb.value)?;
        let vair = op.tas.value;

        let total_thrust0 = self.reference_thrust.value
            * self.tune_factor
            * kth
            * self.ratings.factor(rating)
            * throttle
            * sig.powf(0.75);
        let core_thrust0 = total_thrust0 * self.core_thrust_ratio;
        let fan_thrust0 = total_thrust0 * (1.0 - self.core_thrust_ratio);

        // Offtake reduces fan shaft power, which requires forward speed to
        // express as a thrust decrement.
        let (total_thrust, fan_power) = if vair > 0.0 {
            let fan_power0 = fan_thrust0 * vair / self.eff_prop;
            let fan_power = fan_power0 - pw_offtake;
            if fan_power <= 0.0 {
                return Err(PropulsionError::Infeasible {
                    what: format!("offtake {pw_offtake} W exceeds fan power {fan_power0} W"),
                });
            }
            let fan_thrust = (fan_power / vair) * self.eff_prop;
            (fan_thrust + core_thrust0, fan_power)
        } else {
            if pw_offtake > 0.0 {
                return Err(PropulsionError::InvalidArg {
                    what: "power offtake requires forward flight",
                });
            }
            (total_thrust0, 0.0)
        };

        let sfc_ref = (0.4 + 1.0 / self.bpr.powf(0.895)) / 36_000.0;
        Ok(ThrustReport {
            thrust: n(total_thrust),
            fuel_flow: kgps(sfc_ref * total_thrust0),
            shaft_power: w(fan_power),
            sol: None,
        })
    }

    fn unitary_consumption(
        &self,
        op: &OperatingPoint,
        rating: Rating,
        thrust: f64,
        pw_offtake: f64,
        _guess: Option<&DVector<f64>>,
    ) -> PropulsionResult<ConsumptionReport> {
        if !(thrust.is_finite() && thrust > 0.0) {
            return Err(PropulsionError::InvalidArg {
                what: "target thrust must be positive",
            });
        }
        let full = self.unitary_thrust(op, rating, 1.0, pw_offtake, None)?;
        Ok(ConsumptionReport {
            specific_consumption: full.fuel_flow.value / full.thrust.value,
            shaft_power: full.shaft_power,
            throttle: thrust / full.thrust.value,
            sol: None,
        })
    }
}

/// Cycle assumptions for the design-point turbofan sizing.
#[derive(Clone, Copy, Debug)]
pub struct TurbofanCycleSpec {
    /// Turbine entry temperature (K)
    pub t4: f64,
    /// Overall pressure ratio
    pub opr: f64,
    /// Bypass ratio
    pub bpr: f64,
    /// Fraction of usable power sent to the fan shaft
    pub pw_split: f64,
    /// Axial Mach number at the fan face
    pub fan_mach: f64,
    /// Fan hub diameter (m)
    pub hub_width: f64,
    pub eff_fan: f64,
    pub eff_compressor: f64,
    pub eff_thermal: f64,
    pub eff_mechanical: f64,
    pub fuel: EnergySource,
}

impl Default for TurbofanCycleSpec {
    fn default() -> Self {
        Self {
            t4: 1700.0,
            opr: 50.0,
            bpr: 12.0,
            pw_split: 0.90,
            fan_mach: 0.55,
            hub_width: 0.2,
            eff_fan: 0.95,
            eff_compressor: 0.95,
            eff_thermal: 0.46,
            eff_mechanical: 0.99,
            fuel: EnergySource::Kerosene,
        }
    }
}

/// Design-point cycle output.
#[derive(Clone, Copy, Debug)]
pub struct TurbofanDesign {
    pub thrust: Force,
    /// Specific fuel consumption (kg/N/s)
    pub sfc: f64,
    /// Fan pressure ratio implied by the power split
    pub fpr: f64,
    pub core_flow: MassRate,
    pub fan_flow: MassRate,
    pub fan_width: Length,
    pub fan_nozzle_area: Area,
    pub fan_nozzle_width: Length,
    pub core_nozzle_area: Area,
    pub core_nozzle_width: Length,
}

/// Size a separate-flow turbofan at its design point from the fuel flow.
///
/// Closed-form: the cycle fixes the core flow from the turbine entry
/// temperature, jet velocities from the power split, and flow areas from
/// the corrected-flow function. No iteration is involved; infeasible cycle
/// assumptions (compressor delivery hotter than the turbine entry) are
/// rejected up front.
pub fn turbofan_design(
    op: &OperatingPoint,
    fuel_flow: f64,
    cycle: &TurbofanCycleSpec,
) -> PropulsionResult<TurbofanDesign> {
    if !(fuel_flow.is_finite() && fuel_flow > 0.0) {
        return Err(PropulsionError::InvalidArg {
            what: "fuel flow must be positive",
        });
    }
    let gas = GasProperties::air();
    let (g, cp) = (gas.gamma, gas.cp);
    let fhv = fuel_heat(cycle.fuel);

    let pamb = op.pamb.value;
    let ptot = op.ptot.value;
    let ttot = op.ttot.value;
    let vair = op.tas.value;

    let pw_fuel = fuel_flow * fhv;
    let pwu_core = pw_fuel * cycle.eff_thermal * cycle.eff_mechanical;

    // Stagnation temperature after the compressors
    let t3 = ttot * (1.0 + (cycle.opr.powf((g - 1.0) / g) - 1.0) / cycle.eff_compressor);
    if cycle.t4 <= t3 {
        return Err(PropulsionError::Infeasible {
            what: format!("turbine entry {} K below compressor delivery {t3:.1} K", cycle.t4),
        });
    }

    // Core flow that reaches the target turbine entry temperature
    let q_core = pw_fuel / ((cycle.t4 - t3) * cp);
    let vj_core = (vair * vair + 2.0 * pwu_core * (1.0 - cycle.pw_split) / q_core).sqrt();
    let fn_core = q_core * (vj_core - vair);

    let q_fan = q_core * cycle.bpr;
    let pws_fan = pwu_core * cycle.pw_split;
    let pwu_fan = pws_fan * cycle.eff_fan;
    let vj_fan = (vair * vair + 2.0 * pwu_fan / q_fan).sqrt();
    let fn_fan = q_fan * (vj_fan - vair);

    let fn_ref = fn_core + fn_fan;
    let sfc = fuel_flow / fn_ref;

    // Fan jet stagnation state, adapted nozzle
    let ttot_fan_jet = ttot + pws_fan / (q_fan * cp);
    let tstat_fan_jet = ttot_fan_jet - 0.5 * vj_fan * vj_fan / cp;
    if tstat_fan_jet <= 0.0 {
        return Err(PropulsionError::Infeasible {
            what: "non-positive static temperature in fan jet".to_string(),
        });
    }
    let mach_fan_jet = vj_fan / sound_speed(tstat_fan_jet)?;
    let ptot_fan_jet = total_pressure(&gas, pamb, mach_fan_jet)?;
    let fpr = ptot_fan_jet / ptot;

    // Core jet stagnation state; the core inlet sits behind the fan
    let ttot_core_jet = ttot_fan_jet + pw_fuel / (q_core * cp);
    let tstat_core_jet = ttot_core_jet - 0.5 * vj_core * vj_core / cp;
    if tstat_core_jet <= 0.0 {
        return Err(PropulsionError::Infeasible {
            what: "non-positive static temperature in core jet".to_string(),
        });
    }
    let mach_core_jet = vj_core / sound_speed(tstat_core_jet)?;
    let ptot_core_jet = total_pressure(&gas, pamb, mach_core_jet)?;

    let cqoa_core_jet = corrected_air_flow(&gas, ptot_core_jet, ttot_core_jet, mach_core_jet)?;
    let core_nozzle_area = q_core / cqoa_core_jet;
    let core_nozzle_width = (4.0 * core_nozzle_area / std::f64::consts::PI).sqrt();

    let cqoa_fan_face = corrected_air_flow(&gas, ptot, ttot, cycle.fan_mach)?;
    let fan_area = q_fan / cqoa_fan_face;
    let fan_width =
        (cycle.hub_width * cycle.hub_width + 4.0 * fan_area / std::f64::consts::PI).sqrt();

    let cqoa_fan_jet = corrected_air_flow(&gas, ptot_fan_jet, ttot_fan_jet, mach_fan_jet)?;
    let fan_nozzle_area = q_fan / cqoa_fan_jet;
    // Annular exit around the core nozzle
    let fan_nozzle_width =
        (core_nozzle_width * core_nozzle_width + 4.0 * fan_nozzle_area / std::f64::consts::PI)
            .sqrt();

    Ok(TurbofanDesign {
        thrust: n(fn_ref),
        sfc,
        fpr,
        core_flow: kgps(q_core),
        fan_flow: kgps(q_fan),
        fan_width: m(fan_width),
        fan_nozzle_area: sqm(fan_nozzle_area),
        fan_nozzle_width: m(fan_nozzle_width),
        core_nozzle_area: sqm(core_nozzle_area),
        core_nozzle_width: m(core_nozzle_width),
    })
}
