//! Capability trait shared by the engine models.

use crate::error::PropulsionResult;
use crate::rating::Rating;
use az_core::units::{Force, MassRate, Power};
use az_earth::OperatingPoint;
use nalgebra::DVector;

/// Thrust evaluation at a commanded rating and throttle.
#[derive(Clone, Debug)]
pub struct ThrustReport {
    /// Net thrust delivered
    pub thrust: Force,
    /// Fuel burned; zero for an all-electric chain
    pub fuel_flow: MassRate,
    /// Shaft power delivered to the fan
    pub shaft_power: Power,
    /// Converged unknown-vector when the evaluation required a balance
    /// solve; reusable as the warm-start of the next call in a sweep
    pub sol: Option<DVector<f64>>,
}

/// Consumption evaluation at a target thrust.
#[derive(Clone, Debug)]
pub struct ConsumptionReport {
    /// Specific consumption: kg/N/s for fuel burners, W/N for electric fans
    pub specific_consumption: f64,
    /// Shaft power at the matched point
    pub shaft_power: Power,
    /// Throttle fraction relative to the rating's reference
    pub throttle: f64,
    /// Converged unknown-vector when a balance solve was involved
    pub sol: Option<DVector<f64>>,
}

/// One engine, one physics model.
///
/// An installed propulsor is built by composing a `PropulsionModel` with
/// the airframe-side description of where and how it is mounted; the two
/// concerns never share a type hierarchy.
pub trait PropulsionModel {
    /// Net thrust under a rating, throttle in [0, 1], and power offtake.
    fn unitary_thrust(
        &self,
        op: &OperatingPoint,
        rating: Rating,
        throttle: f64,
        pw_offtake: f64,
        guess: Option<&DVector<f64>>,
    ) -> PropulsionResult<ThrustReport>;

    /// Consumption at a target net thrust under a rating.
    fn unitary_consumption(
        &self,
        op: &OperatingPoint,
        rating: Rating,
        thrust: f64,
        pw_offtake: f64,
        guess: Option<&DVector<f64>>,
    ) -> PropulsionResult<ConsumptionReport>;
}
