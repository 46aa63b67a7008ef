//! End-to-end nacelle scenarios: statistical sizing, design point, off-design.

use az_core::units::convert;
use az_earth::OperatingPoint;
use az_propulsion::{
    ElectrofanNacelle, PropulsionModel, Rating, RatingTable, SemiEmpiricTurbofan,
    TurbofanCycleSpec, turbofan_design,
};

const NPAX: f64 = 150.0;
const N_ENGINE: f64 = 2.0;

fn design_range() -> f64 {
    convert::m_nm(3000.0)
}

fn cruise() -> OperatingPoint {
    OperatingPoint::new(convert::m_ft(35_000.0), 0.0, 0.78).unwrap()
}

#[test]
fn electrofan_sized_at_cruise_delivers_more_at_takeoff() {
    let reference_power =
        ElectrofanNacelle::reference_power_from_requirement(NPAX, design_range(), N_ENGINE);
    let mut nacelle = ElectrofanNacelle::new(reference_power, RatingTable::electrofan()).unwrap();

    let cruise = OperatingPoint::new(convert::m_ft(35_000.0), 0.0, 0.75).unwrap();
    let shaft = nacelle.reference_power.value * nacelle.ratings.mcr;
    let geom = *nacelle.design(&cruise, shaft).unwrap();
    println!(
        "fan diameter {:.2} m, design flow {:.0} kg/s",
        geom.fan_width.value, geom.design_flow.value
    );
    assert!(geom.fan_width.value > 2.0 && geom.fan_width.value < 6.0);

    let cruise_thrust = nacelle
        .unitary_thrust(&cruise, Rating::Mcr, 1.0, 0.0, None)
        .unwrap();
    let takeoff_op = OperatingPoint::new(0.0, 0.0, 0.25).unwrap();
    let takeoff_thrust = nacelle
        .unitary_thrust(&takeoff_op, Rating::Mto, 1.0, 0.0, None)
        .unwrap();

    // Denser air through the same nozzle: much more thrust at takeoff
    assert!(takeoff_thrust.thrust.value > cruise_thrust.thrust.value);
    // Electric chain: no fuel flow in either report
    assert_eq!(cruise_thrust.fuel_flow.value, 0.0);
}

#[test]
fn semi_empiric_and_cycle_turbofan_agree_at_cruise() {
    let fn_ref = SemiEmpiricTurbofan::reference_thrust_from_requirement(
        NPAX,
        design_range(),
        N_ENGINE,
    );
    let bpr = SemiEmpiricTurbofan::bpr_from_npax(NPAX);
    let mut engine = SemiEmpiricTurbofan::new(fn_ref, bpr, RatingTable::turbofan()).unwrap();
    engine.calibrate().unwrap();

    let op = cruise();
    let mcr = engine.unitary_thrust(&op, Rating::Mcr, 1.0, 0.0, None).unwrap();
    println!(
        "semi-empiric MCR: {:.0} N at {:.3} kg/s",
        mcr.thrust.value, mcr.fuel_flow.value
    );

    // Feed the statistical fuel flow into the design-point cycle: the two
    // models were regressed on the same engine class, so the thrusts land
    // in the same ballpark even though the cycle assumes a higher BPR.
    let cycle = turbofan_design(&op, mcr.fuel_flow.value, &TurbofanCycleSpec::default()).unwrap();
    let ratio = cycle.thrust.value / mcr.thrust.value;
    assert!(
        ratio > 0.7 && ratio < 1.3,
        "cycle/statistical thrust ratio {ratio:.2}"
    );
    // The high-BPR cycle is at least as efficient as the statistical SFC
    assert!(cycle.sfc < 1.2 * (mcr.fuel_flow.value / mcr.thrust.value));
}

#[test]
fn electrofan_sweep_stays_within_rating() {
    let reference_power =
        ElectrofanNacelle::reference_power_from_requirement(NPAX, design_range(), N_ENGINE);
    let mut nacelle = ElectrofanNacelle::new(reference_power, RatingTable::electrofan()).unwrap();
    let op = OperatingPoint::new(convert::m_ft(35_000.0), 0.0, 0.75).unwrap();
    let shaft = nacelle.reference_power.value * nacelle.ratings.mcr;
    nacelle.design(&op, shaft).unwrap();

    let design_thrust = nacelle
        .unitary_thrust(&op, Rating::Mcr, 1.0, 0.0, None)
        .unwrap()
        .thrust
        .value;
    let targets: Vec<f64> = (0..6).map(|i| (1.0 - 0.1 * i as f64) * design_thrust).collect();
    let reports = nacelle.thrust_sweep(&op, Rating::Mcr, &targets, 0.0).unwrap();

    for (target, report) in targets.iter().zip(&reports) {
        let pw_rated = nacelle.reference_power.value * nacelle.ratings.mcr;
        assert!(
            report.throttle <= 1.0 + 1e-6,
            "target {target:.0} N needs throttle {:.3}",
            report.throttle
        );
        assert!(report.shaft_power.value <= pw_rated * 1.01);
    }
}
