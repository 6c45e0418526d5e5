//! Solution façade: validated inputs, solver entry points, and the
//! end-to-end fire-mission pipeline.
//!
//! Upstream callers (map UI, weapon catalog, persistence) hand this module
//! plain numbers and get plain numbers back. Everything stateful, the
//! terrain index in particular, is owned by the caller and passed in
//! explicitly.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::angle_search::AngleSearchEngine;
use crate::atmosphere::AtmosphericCorrection;
use crate::closed_form;
use crate::constants::{mil_to_rad, DEFAULT_DRAG_K_BASE, DEG_TO_MIL, G_ACCEL_MPS2};
use crate::error::SolveError;
use crate::geometry::{azimuth_deg, azimuth_mils, grid_distance};
use crate::sensitivity;
use crate::terrain::TerrainHeightIndex;
use crate::wind::{azimuth_correction_mils, lateral_deviation_m, WindConditions};

/// Complete numeric input for one solve call.
///
/// Constructed fresh per computation; the solvers never mutate it and keep
/// no state between calls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiringContext {
    /// Nominal muzzle velocity (m/s)
    pub muzzle_velocity: f64,
    /// Horizontal distance to the target (m)
    pub horizontal_range: f64,
    /// Target height minus shooter height (m)
    pub height_delta: f64,
    /// Gravitational acceleration (m/s²)
    pub gravity: f64,
    /// Air temperature (°C)
    pub temperature_c: f64,
    /// Barometric pressure (hPa)
    pub pressure_hpa: f64,
    /// Base quadratic drag coefficient before density correction (1/m)
    pub drag_coefficient_base: f64,
}

impl Default for FiringContext {
    fn default() -> Self {
        FiringContext {
            muzzle_velocity: 200.0,
            horizontal_range: 1000.0,
            height_delta: 0.0,
            gravity: G_ACCEL_MPS2,
            temperature_c: 15.0,
            pressure_hpa: 1013.25,
            drag_coefficient_base: DEFAULT_DRAG_K_BASE,
        }
    }
}

impl FiringContext {
    /// Fail fast on inputs outside the physical domain.
    pub fn validate(&self) -> Result<(), SolveError> {
        if !(self.muzzle_velocity > 0.0) {
            return Err(SolveError::invalid(
                "muzzle_velocity",
                self.muzzle_velocity,
                "must be positive",
            ));
        }
        if !(self.horizontal_range >= 0.0) {
            return Err(SolveError::invalid(
                "horizontal_range",
                self.horizontal_range,
                "must be non-negative",
            ));
        }
        if !(self.gravity > 0.0) {
            return Err(SolveError::invalid(
                "gravity",
                self.gravity,
                "must be positive",
            ));
        }
        // Temperature, pressure and drag base are checked where the
        // atmospheric correction is derived.
        Ok(())
    }

    /// Atmospheric correction for these conditions.
    pub fn atmosphere(&self) -> Result<AtmosphericCorrection, SolveError> {
        AtmosphericCorrection::for_conditions(
            self.temperature_c,
            self.pressure_hpa,
            self.drag_coefficient_base,
        )
    }
}

/// Which of the two elevation families to solve for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcMode {
    /// Flattest hitting trajectory (below 45°)
    Low,
    /// Steep trajectory (above 45°), longer flight over intervening cover
    High,
}

/// Result of a closed-form (no drag) solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClosedFormSolution {
    pub elevation_mils: i64,
    pub flight_time_s: f64,
}

/// Result of a drag-aware angle search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DragSolution {
    /// Elevation found by the search (fractional degrees)
    pub angle_deg: f64,
    /// The same elevation in mils (converted, not re-rounded)
    pub elevation_mils: f64,
    pub flight_time_s: f64,
    /// Terminal simulated position, downrange (m)
    pub impact_downrange_m: f64,
    /// Terminal simulated position, height above muzzle (m)
    pub impact_height_m: f64,
    /// Combined terminal miss against the target point (m)
    pub miss_distance_m: f64,
}

/// Analytic elevation, ignoring air resistance.
pub fn solve_closed_form(
    context: &FiringContext,
    arc: ArcMode,
) -> Result<ClosedFormSolution, SolveError> {
    context.validate()?;

    let elevation_mils = match arc {
        ArcMode::Low => closed_form::low_arc(
            context.horizontal_range,
            context.muzzle_velocity,
            context.height_delta,
            context.gravity,
        )?,
        ArcMode::High => closed_form::high_arc(
            context.horizontal_range,
            context.muzzle_velocity,
            context.height_delta,
            context.gravity,
        )?,
    };

    let flight_time_s = sensitivity::flight_time(
        context.muzzle_velocity,
        mil_to_rad(elevation_mils as f64),
        context.height_delta,
        context.gravity,
    )?;

    Ok(ClosedFormSolution {
        elevation_mils,
        flight_time_s,
    })
}

/// Drag-aware elevation via the angle search.
///
/// Applies the atmospheric correction to both the drag coefficient and the
/// muzzle velocity, then scans the arc's angle domain.
pub fn solve_with_drag(context: &FiringContext, arc: ArcMode) -> Result<DragSolution, SolveError> {
    context.validate()?;
    let atmo = context.atmosphere()?;
    let velocity = atmo.corrected_velocity(context.muzzle_velocity);
    debug!(
        density_ratio = atmo.density_ratio,
        corrected_velocity = velocity,
        "drag solve"
    );

    let engine = AngleSearchEngine::new(context.gravity, atmo.effective_drag_coefficient);
    let candidate = match arc {
        ArcMode::Low => engine.first_hit(velocity, context.horizontal_range, context.height_delta),
        ArcMode::High => {
            engine.best_high_arc(velocity, context.horizontal_range, context.height_delta)
        }
    }?;

    Ok(DragSolution {
        angle_deg: candidate.angle_deg,
        elevation_mils: candidate.angle_deg * DEG_TO_MIL,
        flight_time_s: candidate.flight_time,
        impact_downrange_m: candidate.terminal.x,
        impact_height_m: candidate.terminal.y,
        miss_distance_m: candidate.deviation,
    })
}

/// A gun or target location on the map grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: f64,
    pub y: f64,
}

/// Everything the fire direction center needs for one mission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionSolution {
    pub distance_m: f64,
    pub azimuth_mils: i64,
    pub gun_height_m: f64,
    pub target_height_m: f64,
    pub height_delta_m: f64,
    /// Elevation in mils; integer-valued for the closed-form path
    pub elevation_mils: f64,
    pub flight_time_s: f64,
    /// Meters of range gained per mil of elevation at the solution angle;
    /// absent when the no-drag range model cannot evaluate there
    pub range_sensitivity_m_per_mil: Option<f64>,
    pub crosswind_mps: f64,
    pub tailwind_mps: f64,
    pub lateral_deviation_m: f64,
    pub azimuth_correction_mils: f64,
}

/// Resolve heights from terrain, then solve gun-to-target geometry,
/// elevation, sensitivity and wind corrections in one pass.
///
/// `context.horizontal_range` and `context.height_delta` are derived from
/// the positions and terrain; the remaining context fields are used as
/// given. With `use_drag` the elevation comes from the angle search,
/// otherwise from the closed-form solver.
pub fn plan_mission(
    gun: GridPosition,
    target: GridPosition,
    context: &FiringContext,
    arc: ArcMode,
    use_drag: bool,
    terrain: &TerrainHeightIndex,
    wind: WindConditions,
) -> Result<MissionSolution, SolveError> {
    let gun_height = terrain.height_at(gun.x, gun.y)?;
    let target_height = terrain.height_at(target.x, target.y)?;

    let distance = grid_distance(gun.x, gun.y, target.x, target.y);
    let bearing_deg = azimuth_deg(gun.x, gun.y, target.x, target.y);

    let mission_context = FiringContext {
        horizontal_range: distance,
        height_delta: target_height - gun_height,
        ..*context
    };

    let (elevation_mils, flight_time_s) = if use_drag {
        let solution = solve_with_drag(&mission_context, arc)?;
        (solution.elevation_mils, solution.flight_time_s)
    } else {
        let solution = solve_closed_form(&mission_context, arc)?;
        (solution.elevation_mils as f64, solution.flight_time_s)
    };

    let range_sensitivity_m_per_mil = sensitivity::range_difference_per_mil(
        mission_context.muzzle_velocity,
        elevation_mils,
        mission_context.height_delta,
        mission_context.gravity,
    )
    .ok();

    let components = wind.components_toward(bearing_deg);
    let deviation = lateral_deviation_m(components.crosswind_mps, flight_time_s);

    Ok(MissionSolution {
        distance_m: distance,
        azimuth_mils: azimuth_mils(gun.x, gun.y, target.x, target.y),
        gun_height_m: gun_height,
        target_height_m: target_height,
        height_delta_m: mission_context.height_delta,
        elevation_mils,
        flight_time_s,
        range_sensitivity_m_per_mil,
        crosswind_mps: components.crosswind_mps,
        tailwind_mps: components.tailwind_mps,
        lateral_deviation_m: deviation,
        azimuth_correction_mils: azimuth_correction_mils(deviation, distance),
    })
}
