//! Analytic elevation solvers for the no-drag case.
//!
//! Both modes ignore air resistance and return integer-rounded NATO mils.
//! They are the fast path: a drag-aware answer requires the search engine in
//! [`crate::angle_search`].

use crate::constants::rad_to_mil;
use crate::error::SolveError;

fn check_inputs(range_m: f64, velocity_mps: f64, gravity: f64) -> Result<(), SolveError> {
    if !(velocity_mps > 0.0) {
        return Err(SolveError::invalid(
            "muzzle_velocity",
            velocity_mps,
            "must be positive",
        ));
    }
    if !(gravity > 0.0) {
        return Err(SolveError::invalid("gravity", gravity, "must be positive"));
    }
    if !(range_m >= 0.0) {
        return Err(SolveError::invalid(
            "horizontal_range",
            range_m,
            "must be non-negative",
        ));
    }
    Ok(())
}

/// Low-arc elevation in integer mils.
///
/// Solves `range = v²·sin(2θ)/g` for the smaller root and tilts the result
/// by the line-of-sight angle to the target height. Returns
/// [`SolveError::RangeUnreachable`] when the range exceeds the 45° maximum
/// `v²/g`.
pub fn low_arc(
    range_m: f64,
    velocity_mps: f64,
    height_delta_m: f64,
    gravity: f64,
) -> Result<i64, SolveError> {
    check_inputs(range_m, velocity_mps, gravity)?;

    let max_range = velocity_mps * velocity_mps / gravity;
    if range_m > max_range {
        return Err(SolveError::RangeUnreachable {
            requested_m: range_m,
            limit_m: max_range,
        });
    }

    let theta_base = (range_m * gravity / (velocity_mps * velocity_mps)).asin() / 2.0;

    // atan(dh/range) is the line-of-sight tilt; undefined for a zero-range
    // shot at a different height.
    let theta_correction = if range_m == 0.0 {
        if height_delta_m != 0.0 {
            return Err(SolveError::invalid(
                "horizontal_range",
                range_m,
                "zero range with nonzero height delta has no low-arc solution",
            ));
        }
        0.0
    } else {
        (height_delta_m / range_m).atan()
    };

    Ok(rad_to_mil(theta_base + theta_correction).round() as i64)
}

/// High-arc elevation in integer mils.
///
/// Solves the trajectory equation with height offset as a quadratic in
/// `tan θ`:
///
/// ```text
/// A·tan²θ + B·tanθ + C = 0,  A = g·R²/(2v²),  B = -R,  C = A + Δh
/// ```
///
/// and returns the steeper of the two real roots. A negative discriminant
/// means the target is outside the envelope for any elevation.
pub fn high_arc(
    range_m: f64,
    velocity_mps: f64,
    height_delta_m: f64,
    gravity: f64,
) -> Result<i64, SolveError> {
    check_inputs(range_m, velocity_mps, gravity)?;

    let a = gravity * range_m * range_m / (2.0 * velocity_mps * velocity_mps);
    if a == 0.0 {
        // Zero range: the quadratic degenerates and tan θ is unconstrained.
        return Err(SolveError::invalid(
            "horizontal_range",
            range_m,
            "zero range has no high-arc solution",
        ));
    }
    let b = -range_m;
    let c = a + height_delta_m;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Err(SolveError::RangeUnreachable {
            requested_m: range_m,
            limit_m: velocity_mps * velocity_mps / gravity,
        });
    }

    let sqrt_disc = discriminant.sqrt();
    let t1 = (-b + sqrt_disc) / (2.0 * a);
    let t2 = (-b - sqrt_disc) / (2.0 * a);
    let theta_high = t1.atan().max(t2.atan());

    Ok(rad_to_mil(theta_high).round() as i64)
}
