//! az-mission: aircraft mass-mission-range adaptation.
//!
//! Sizes an aircraft by closing a structural operating-weight-empty
//! regression against the Breguet range equation, then exposes the
//! resulting payload-range envelope and off-design operational missions.

pub mod design;
pub mod envelope;
pub mod error;
pub mod operation;
pub mod requirements;

pub use design::{SizedAircraft, breguet_range, design, range_factor};
pub use envelope::{MissionAssessment, PayloadRangeEnvelope};
pub use error::{MissionError, MissionResult};
pub use operation::Operation;
pub use requirements::{Requirements, Technology};
