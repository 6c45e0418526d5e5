//! Atmospheric corrections for firing solutions.
//!
//! Converts measured temperature and pressure into the density ratio that
//! scales the quadratic drag coefficient, and the velocity correction factor
//! applied to the muzzle velocity before any simulation.

use crate::constants::{
    CELSIUS_TO_KELVIN, R_SPECIFIC_DRY_AIR, STANDARD_AIR_DENSITY, STANDARD_TEMPERATURE_K,
};
use crate::error::SolveError;

/// Derived atmospheric quantities for one solve call.
///
/// Pure function of the measured conditions; recomputed per call, never
/// cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmosphericCorrection {
    /// Computed air density over standard sea-level density
    pub density_ratio: f64,
    /// Factor applied to the nominal muzzle velocity
    pub velocity_correction_factor: f64,
    /// Base drag coefficient scaled by the density ratio (1/m)
    pub effective_drag_coefficient: f64,
}

impl AtmosphericCorrection {
    /// Derive corrections from measured conditions.
    ///
    /// # Arguments
    /// * `temperature_c` - Air temperature (°C), must be above absolute zero
    /// * `pressure_hpa` - Barometric pressure (hPa), must be positive
    /// * `drag_base` - Base quadratic drag coefficient (1/m), non-negative
    pub fn for_conditions(
        temperature_c: f64,
        pressure_hpa: f64,
        drag_base: f64,
    ) -> Result<Self, SolveError> {
        let temperature_k = temperature_c + CELSIUS_TO_KELVIN;
        if !(temperature_k > 0.0) {
            return Err(SolveError::invalid(
                "temperature_c",
                temperature_c,
                "absolute temperature must be positive",
            ));
        }
        if !(pressure_hpa > 0.0) {
            return Err(SolveError::invalid(
                "pressure_hpa",
                pressure_hpa,
                "must be positive",
            ));
        }
        if !(drag_base >= 0.0) {
            return Err(SolveError::invalid(
                "drag_coefficient_base",
                drag_base,
                "must be non-negative",
            ));
        }

        let pressure_pa = pressure_hpa * 100.0;
        let density = pressure_pa / (R_SPECIFIC_DRY_AIR * temperature_k);
        let density_ratio = density / STANDARD_AIR_DENSITY;

        Ok(AtmosphericCorrection {
            density_ratio,
            velocity_correction_factor: (temperature_k / STANDARD_TEMPERATURE_K).sqrt(),
            effective_drag_coefficient: drag_base * density_ratio,
        })
    }

    /// Muzzle velocity adjusted for the temperature-dependent charge burn.
    #[inline]
    pub fn corrected_velocity(&self, muzzle_velocity: f64) -> f64 {
        muzzle_velocity * self.velocity_correction_factor
    }
}
