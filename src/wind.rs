//! Wind decomposition and lateral-deviation corrections.
//!
//! The 2-D integrator flies in the vertical plane toward the target, so wind
//! enters as two scalar components: tailwind along the gun–target bearing
//! and crosswind perpendicular to it. The crosswind produces a lateral
//! drift proportional to flight time, reported back to the gunner as an
//! azimuth correction.

use serde::{Deserialize, Serialize};

use crate::constants::DEG_TO_MIL;

/// Surface wind measured at the gun position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindConditions {
    /// Wind speed (m/s)
    pub speed_mps: f64,
    /// Direction the wind blows from, map bearing (degrees, meteorological
    /// convention)
    pub direction_deg: f64,
}

impl Default for WindConditions {
    fn default() -> Self {
        WindConditions {
            speed_mps: 0.0,
            direction_deg: 0.0,
        }
    }
}

/// Wind resolved against a firing bearing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindComponents {
    /// Perpendicular component, positive pushing the shell right of the
    /// firing line (m/s)
    pub crosswind_mps: f64,
    /// Component along the firing line, positive pushing downrange (m/s)
    pub tailwind_mps: f64,
}

impl WindConditions {
    /// Decompose the wind against the bearing toward the target.
    pub fn components_toward(&self, bearing_deg: f64) -> WindComponents {
        let wind_angle = (self.direction_deg - bearing_deg).to_radians();
        WindComponents {
            crosswind_mps: wind_angle.sin() * self.speed_mps,
            tailwind_mps: -wind_angle.cos() * self.speed_mps,
        }
    }
}

/// Lateral drift accumulated over the flight (m).
pub fn lateral_deviation_m(crosswind_mps: f64, flight_time_s: f64) -> f64 {
    crosswind_mps * flight_time_s
}

/// Azimuth correction that cancels a lateral drift at the given range, in
/// mils. Opposite in sign to the drift.
pub fn azimuth_correction_mils(deviation_m: f64, range_m: f64) -> f64 {
    -deviation_m.atan2(range_m).to_degrees() * DEG_TO_MIL
}
