//! Fire-correction figures derived from the no-drag trajectory equations.
//!
//! Used after an elevation has been chosen: how far the impact point moves
//! per mil of barrel adjustment, and how long the shell flies. All functions
//! here ignore air resistance; they are only consulted when the drag path is
//! disabled.

use crate::constants::mil_to_rad;
use crate::error::SolveError;

fn check(velocity_mps: f64, gravity: f64) -> Result<(), SolveError> {
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
    Ok(())
}

/// Positive time-of-flight root of `vz·t - g·t²/2 = Δh`.
///
/// Takes the later (descending) crossing of the target plane. A negative
/// discriminant means the shell's apex stays below the target height.
pub fn flight_time(
    velocity_mps: f64,
    angle_rad: f64,
    height_delta_m: f64,
    gravity: f64,
) -> Result<f64, SolveError> {
    check(velocity_mps, gravity)?;

    let vz = velocity_mps * angle_rad.sin();
    let discriminant = vz * vz - 2.0 * gravity * height_delta_m;
    if discriminant < 0.0 {
        // Unreachable by height: apex vz²/(2g) is below the target plane
        return Err(SolveError::RangeUnreachable {
            requested_m: height_delta_m,
            limit_m: vz * vz / (2.0 * gravity),
        });
    }

    Ok((vz + discriminant.sqrt()) / gravity)
}

/// Horizontal range of the no-drag trajectory at `angle_rad`, crossing the
/// plane `height_delta_m` above the muzzle.
///
/// Reduces to `v²·sin(2θ)/g` when the heights are equal.
pub fn range_at(
    velocity_mps: f64,
    angle_rad: f64,
    height_delta_m: f64,
    gravity: f64,
) -> Result<f64, SolveError> {
    check(velocity_mps, gravity)?;

    if height_delta_m == 0.0 {
        return Ok(velocity_mps * velocity_mps * (2.0 * angle_rad).sin() / gravity);
    }

    let vx = velocity_mps * angle_rad.cos();
    let time = flight_time(velocity_mps, angle_rad, height_delta_m, gravity)?;
    Ok(vx * time)
}

/// Change in range produced by raising the elevation one mil.
///
/// This is the fire-correction sensitivity: positive below the 45° apex
/// (more elevation, more range), negative above it. Either unreachable
/// range propagates as its error variant.
pub fn range_difference_per_mil(
    velocity_mps: f64,
    angle_mil: f64,
    height_delta_m: f64,
    gravity: f64,
) -> Result<f64, SolveError> {
    let at_angle = range_at(velocity_mps, mil_to_rad(angle_mil), height_delta_m, gravity)?;
    let one_up = range_at(
        velocity_mps,
        mil_to_rad(angle_mil + 1.0),
        height_delta_m,
        gravity,
    )?;
    Ok(one_up - at_angle)
}
