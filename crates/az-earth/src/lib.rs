//! az-earth: ambient environment models consumed by the sizing solvers.
//!
//! This crate provides the standard atmosphere, the working-gas properties,
//! the closed-form isentropic relations, and the [`OperatingPoint`] flight
//! state built from them. Everything here is pure and non-iterative: the
//! equilibrium solvers in `az-propulsion` and `az-mission` call into this
//! crate many times per iteration and rely on it being cheap and reentrant.

pub mod atmosphere;
pub mod error;
pub mod gas;
pub mod operating_point;

pub use atmosphere::{Ambient, atmosphere, sound_speed};
pub use error::{EarthError, EarthResult};
pub use gas::{EnergySource, GasProperties, air_density, fuel_heat, total_pressure, total_temperature};
pub use operating_point::OperatingPoint;
