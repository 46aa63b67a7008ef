//! az-propulsion: propulsor sizing and operation models.
//!
//! The crate covers two engine families:
//!
//! - [`ElectrofanNacelle`]: a ducted electric fan whose operating point is
//!   found by closing corrected-flow continuity at the nozzle against the
//!   energy added by the shaft, through the balance solver in `az-solver`.
//! - [`SemiEmpiricTurbofan`]: a closed-form statistical turbofan thrust and
//!   fuel-flow model, plus a design-point cycle sizing routine.
//!
//! Both expose the [`PropulsionModel`] capability trait so airframe-level
//! code can hold either by composition.

pub mod electrofan;
pub mod error;
pub mod flow;
pub mod model;
pub mod rating;
pub mod turbofan;

pub use electrofan::{ElectrofanNacelle, FanGeometry};
pub use error::{PropulsionError, PropulsionResult};
pub use flow::corrected_air_flow;
pub use model::{ConsumptionReport, PropulsionModel, ThrustReport};
pub use rating::{Rating, RatingTable};
pub use turbofan::{SemiEmpiricTurbofan, TurbofanCycleSpec, TurbofanDesign, turbofan_design};
