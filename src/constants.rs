/// Physical constants used in firing-solution calculations

/// Default gravitational acceleration in m/s²
pub const G_ACCEL_MPS2: f64 = 9.81;

/// Specific gas constant for dry air (J/(kg·K))
pub const R_SPECIFIC_DRY_AIR: f64 = 287.05;

/// Standard air density at sea level (kg/m³)
pub const STANDARD_AIR_DENSITY: f64 = 1.225;

/// ICAO standard sea-level temperature (K), reference for muzzle-velocity
/// temperature correction
pub const STANDARD_TEMPERATURE_K: f64 = 288.15;

/// Offset between Celsius and Kelvin scales
pub const CELSIUS_TO_KELVIN: f64 = 273.15;

/// Baseline quadratic drag coefficient for a typical shell (1/m)
pub const DEFAULT_DRAG_K_BASE: f64 = 6.0e-5;

/// Mils per full turn (NATO convention)
pub const MILS_PER_TURN: f64 = 6400.0;

/// Conversion factor: radians to mils
pub const RAD_TO_MIL: f64 = MILS_PER_TURN / std::f64::consts::TAU;

/// Conversion factor: degrees to mils
pub const DEG_TO_MIL: f64 = MILS_PER_TURN / 360.0;

/// Hard cap on integration samples per simulated trajectory.
///
/// Bounds worst-case latency for pathological inputs (near-zero drag with
/// very high velocity never crossing the target plane). Reaching the cap
/// counts as a miss.
pub const MAX_TRAJECTORY_SAMPLES: usize = 10_000;

/// Proximity-tolerance scale: tolerance in meters per second of time step.
///
/// At dt = 0.01 s a step moves a fast shell several meters, so the hit
/// window must be wide enough that the discrete trajectory cannot step
/// across it. Clamped to [`MIN_PROXIMITY_TOLERANCE_M`,
/// `MAX_PROXIMITY_TOLERANCE_M`].
pub const PROXIMITY_TOLERANCE_PER_DT: f64 = 1000.0;

/// Lower bound on the hit window (m)
pub const MIN_PROXIMITY_TOLERANCE_M: f64 = 2.0;

/// Upper bound on the hit window (m)
pub const MAX_PROXIMITY_TOLERANCE_M: f64 = 10.0;

/// Proximity tolerance for a given integration step.
#[inline]
pub fn proximity_tolerance(dt: f64) -> f64 {
    (dt * PROXIMITY_TOLERANCE_PER_DT)
        .clamp(MIN_PROXIMITY_TOLERANCE_M, MAX_PROXIMITY_TOLERANCE_M)
}

/// Convert an angle in radians to NATO mils.
#[inline]
pub fn rad_to_mil(angle_rad: f64) -> f64 {
    angle_rad * RAD_TO_MIL
}

/// Convert an angle in NATO mils to radians.
#[inline]
pub fn mil_to_rad(angle_mil: f64) -> f64 {
    angle_mil / RAD_TO_MIL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mil_round_trip() {
        let theta = 0.7234;
        assert!((mil_to_rad(rad_to_mil(theta)) - theta).abs() < 1e-12);
    }

    #[test]
    fn test_full_turn_is_6400_mils() {
        assert!((rad_to_mil(std::f64::consts::TAU) - 6400.0).abs() < 1e-9);
    }

    #[test]
    fn test_proximity_tolerance_ladder() {
        assert!((proximity_tolerance(0.01) - 10.0).abs() < 1e-12);
        assert!((proximity_tolerance(0.005) - 5.0).abs() < 1e-12);
        assert!((proximity_tolerance(0.0025) - 2.5).abs() < 1e-12);
        // Clamped at both ends
        assert!((proximity_tolerance(1.0) - 10.0).abs() < 1e-12);
        assert!((proximity_tolerance(1e-6) - 2.0).abs() < 1e-12);
    }
}
