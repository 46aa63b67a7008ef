//! Payload-range envelope of a sized aircraft.
//!
//! The three corners follow from closed evaluations of the Breguet
//! equation at bounding mass allocations: maximum payload (structural,
//! 1.2x nominal), maximum fuel (payload reduced to 0.4x nominal), and
//! ferry (no payload, tanks full).

use crate::design::breguet_range;
use crate::error::{MissionError, MissionResult};

/// Outcome of checking a (capacity, range) request against the envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissionAssessment {
    Feasible,
    CapacityLimited,
    RangeLimited,
    CapacityAndRangeLimited,
}

#[derive(Clone, Copy, Debug)]
pub struct PayloadRangeEnvelope {
    /// Structural payload limit (kg)
    pub payload_max: f64,
    /// Range at maximum payload (m)
    pub range_payload_max: f64,
    /// Payload carried with full tanks (kg)
    pub payload_fuel_max: f64,
    /// Range at maximum fuel (m)
    pub range_fuel_max: f64,
    /// Ferry range, zero payload (m)
    pub range_no_payload: f64,
    mpax: f64,
}

impl PayloadRangeEnvelope {
    /// Build the corners from the design masses. The corner ordering
    /// (range grows as payload shrinks) is checked; a regression set that
    /// breaks it is reported as infeasible rather than silently returned.
    pub fn from_design(
        mtow: f64,
        owe: f64,
        nominal_payload: f64,
        kr: f64,
        range_factor: f64,
        mpax: f64,
    ) -> MissionResult<Self> {
        let payload_max = 1.2 * nominal_payload;
        let fuel_payload_max = (mtow - owe - payload_max) / (1.0 + kr);
        if fuel_payload_max <= 0.0 {
            return Err(MissionError::Infeasible {
                what: format!(
                    "no fuel capacity at maximum payload {payload_max:.0} kg"
                ),
            });
        }
        let range_payload_max = breguet_range(range_factor, mtow, fuel_payload_max)?;

        let payload_fuel_max = 0.4 * nominal_payload;
        let fuel_max = (mtow - owe - payload_fuel_max) / (1.0 + kr);
        let range_fuel_max = breguet_range(range_factor, mtow, fuel_max)?;

        let tow_no_payload = owe + (1.0 + kr) * fuel_max;
        let range_no_payload = breguet_range(range_factor, tow_no_payload, fuel_max)?;

        let envelope = Self {
            payload_max,
            range_payload_max,
            payload_fuel_max,
            range_fuel_max,
            range_no_payload,
            mpax,
        };
        if !(range_payload_max < range_fuel_max && range_fuel_max < range_no_payload) {
            return Err(MissionError::Infeasible {
                what: format!(
                    "payload-range corners out of order: {range_payload_max:.0}, \
                     {range_fuel_max:.0}, {range_no_payload:.0} m"
                ),
            });
        }
        Ok(envelope)
    }

    /// Largest seating capacity that can fly the given range.
    pub fn max_capacity(&self, range: f64) -> f64 {
        let payload = if range <= self.range_payload_max {
            self.payload_max
        } else if range <= self.range_fuel_max {
            interp(
                range,
                self.range_payload_max,
                self.range_fuel_max,
                self.payload_max,
                self.payload_fuel_max,
            )
        } else if range <= self.range_no_payload {
            interp(
                range,
                self.range_fuel_max,
                self.range_no_payload,
                self.payload_fuel_max,
                0.0,
            )
        } else {
            0.0
        };
        // Seats are sold whole.
        (payload / self.mpax).floor()
    }

    /// Longest range flyable with the given seating capacity.
    pub fn max_range(&self, npax: f64) -> f64 {
        let payload = npax * self.mpax;
        if payload > self.payload_max {
            0.0
        } else if payload >= self.payload_fuel_max {
            interp(
                payload,
                self.payload_fuel_max,
                self.payload_max,
                self.range_fuel_max,
                self.range_payload_max,
            )
        } else {
            interp(
                payload,
                0.0,
                self.payload_fuel_max,
                self.range_no_payload,
                self.range_fuel_max,
            )
        }
    }

    /// Classify a (capacity, range) request against the envelope.
    ///
    /// Four signed clearances locate the request: the structural payload
    /// limit, the takeoff-weight diagonal, the fuel-capacity segment and
    /// the ferry range. A violation inside the ferry range can be traded
    /// off either way when the payload limit itself is respected, so it
    /// counts against both capacity and distance.
    pub fn check_mission(&self, npax: f64, range: f64) -> MissionAssessment {
        let payload = npax * self.mpax;
        let c_payload = self.payload_max - payload;
        let c_tow = (payload - self.payload_fuel_max)
            * (self.range_payload_max - self.range_fuel_max)
            - (self.payload_max - self.payload_fuel_max) * (range - self.range_fuel_max);
        let c_fuel = payload * (self.range_fuel_max - self.range_no_payload)
            - self.payload_max * (range - self.range_no_payload);
        let c_ferry = self.range_no_payload - range;

        let over_capacity = (c_payload < 0.0 || c_tow < 0.0 || c_fuel < 0.0) && c_ferry >= 0.0;
        let over_range = c_payload >= 0.0 && (c_tow < 0.0 || c_fuel < 0.0 || c_ferry < 0.0);
        let beyond_both = c_payload < 0.0 && c_ferry < 0.0;

        match (over_capacity || beyond_both, over_range || beyond_both) {
            (false, false) => MissionAssessment::Feasible,
            (true, false) => MissionAssessment::CapacityLimited,
            (false, true) => MissionAssessment::RangeLimited,
            (true, true) => MissionAssessment::CapacityAndRangeLimited,
        }
    }
}

fn interp(x: f64, x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{design, tests::single_aisle};
    use proptest::prelude::*;

    fn envelope() -> PayloadRangeEnvelope {
        let (req, tech) = single_aisle();
        design(&req, &tech).unwrap().envelope
    }

    #[test]
    fn corners_are_ordered() {
        let env = envelope();
        assert!(env.payload_max > env.payload_fuel_max);
        assert!(env.range_payload_max < env.range_fuel_max);
        assert!(env.range_fuel_max < env.range_no_payload);
    }

    #[test]
    fn design_point_sits_inside_the_envelope() {
        let (req, tech) = single_aisle();
        let ac = design(&req, &tech).unwrap();
        assert_eq!(
            ac.envelope.check_mission(req.npax, req.design_range),
            MissionAssessment::Feasible
        );
    }

    #[test]
    fn capacity_and_range_lookups_invert_each_other_on_corners() {
        let env = envelope();
        let npax_full = env.payload_max / 130.0;
        assert!((env.max_range(npax_full) - env.range_payload_max).abs() < 1.0);
        assert!((env.max_capacity(env.range_fuel_max) * 130.0 - env.payload_fuel_max).abs() < 1.0);
        assert!(env.max_capacity(env.range_no_payload * 1.01) == 0.0);
    }

    #[test]
    fn capacity_counts_whole_seats() {
        let env = envelope();
        // 37% along the first segment the payload works out to 135.6
        // seats worth; only 135 can board.
        let range = interp(0.37, 0.0, 1.0, env.range_payload_max, env.range_fuel_max);
        let cap = env.max_capacity(range);
        assert_eq!(cap.fract(), 0.0);
        assert_eq!(cap, 135.0);
    }

    #[test]
    fn takeoff_weight_limit_trades_seats_for_fuel() {
        let env = envelope();
        // Inside the payload limit and the ferry range but beyond the
        // takeoff-weight diagonal: flyable with fewer seats at that
        // range, or full seats over a shorter range.
        let npax = 150.0;
        let range = 0.5 * (env.max_range(npax) + env.range_fuel_max);
        assert_eq!(
            env.check_mission(npax, range),
            MissionAssessment::CapacityAndRangeLimited
        );
    }

    #[test]
    fn classification_covers_all_quadrants() {
        let env = envelope();
        let npax_over = env.payload_max / 130.0 * 1.1;
        assert_eq!(
            env.check_mission(npax_over, env.range_payload_max * 0.5),
            MissionAssessment::CapacityLimited
        );
        assert_eq!(
            env.check_mission(50.0, env.range_no_payload * 2.0),
            MissionAssessment::RangeLimited
        );
        assert_eq!(
            env.check_mission(npax_over, env.range_no_payload * 2.0),
            MissionAssessment::CapacityAndRangeLimited
        );
    }

    proptest! {
        #[test]
        fn max_capacity_is_non_increasing_in_range(
            r in 1.0e5f64..1.4e7,
            dr in 1.0e4f64..1.0e6,
        ) {
            let env = envelope();
            prop_assert!(env.max_capacity(r + dr) <= env.max_capacity(r) + 1e-9);
        }
    }
}
