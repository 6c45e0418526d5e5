//! Map-grid geometry between gun and target.

use crate::constants::DEG_TO_MIL;

/// Planar distance between two grid coordinates (map units).
pub fn grid_distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    (x2 - x1).hypot(y2 - y1)
}

/// Bearing from `(x1, y1)` to `(x2, y2)` in degrees, normalized to [0, 360).
pub fn azimuth_deg(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let azimuth = (y2 - y1).atan2(x2 - x1).to_degrees();
    (azimuth + 360.0) % 360.0
}

/// Bearing in whole mils, truncated, in [0, 6400).
pub fn azimuth_mils(x1: f64, y1: f64, x2: f64, y2: f64) -> i64 {
    (azimuth_deg(x1, y1, x2, y2) * DEG_TO_MIL) as i64
}
