//! Error and no-solution outcomes for the solver core.
//!
//! Unreachable ranges and exhausted searches are expected, frequent results
//! of ordinary fire-mission planning, so they are explicit variants the
//! caller must match on rather than exceptions or sentinel numerics. No
//! solver path ever maps a failure to a zero angle.

use thiserror::Error;

/// Outcome taxonomy for all fallible solver operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// Requested distance (or height) lies outside the ballistic envelope:
    /// beyond the no-drag maximum range, or the trajectory quadratic has no
    /// real roots for the given height difference.
    #[error("range unreachable: requested {requested_m:.1} m, ballistic limit {limit_m:.1} m")]
    RangeUnreachable {
        /// Distance (or height) that was asked for (m)
        requested_m: f64,
        /// Maximum the projectile can reach under the same conditions (m)
        limit_m: f64,
    },

    /// An input value is outside the physical domain of the computation.
    #[error("invalid input: {parameter} = {value} ({constraint})")]
    InvalidInput {
        /// Name of the offending parameter
        parameter: &'static str,
        /// The rejected value
        value: f64,
        /// Human-readable constraint that was violated
        constraint: &'static str,
    },

    /// The angle-search domain was scanned without a single qualifying hit.
    /// Distinct from [`SolveError::RangeUnreachable`]: drag can make an
    /// otherwise-reachable target unhittable at the scanned resolution.
    #[error(
        "no hitting angle found in [{domain_start_deg:.1}°, {domain_end_deg:.1}°] \
         at {step_deg:.2}° resolution"
    )]
    NoSolutionFound {
        /// Start of the scanned angle domain (degrees)
        domain_start_deg: f64,
        /// End of the scanned angle domain (degrees)
        domain_end_deg: f64,
        /// Scan resolution (degrees)
        step_deg: f64,
    },

    /// The terrain index holds no samples, so no height can be resolved.
    #[error("no terrain data loaded")]
    NoData,

    /// The terrain sample file could not be read. The one I/O touchpoint in
    /// the crate; message text is captured so the error stays cloneable.
    #[error("terrain file {path}: {message}")]
    Io {
        /// Path that failed to open or read
        path: String,
        /// Underlying I/O error text
        message: String,
    },
}

impl SolveError {
    /// Shorthand constructor for domain-check failures.
    pub(crate) fn invalid(parameter: &'static str, value: f64, constraint: &'static str) -> Self {
        SolveError::InvalidInput {
            parameter,
            value,
            constraint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SolveError::RangeUnreachable {
            requested_m: 5000.0,
            limit_m: 2866.3,
        };
        let msg = err.to_string();
        assert!(msg.contains("5000.0"), "message was: {msg}");
        assert!(msg.contains("2866.3"), "message was: {msg}");

        let err = SolveError::invalid("muzzle_velocity", -1.0, "must be positive");
        assert!(err.to_string().contains("muzzle_velocity"));
    }

    #[test]
    fn test_variants_are_distinguishable() {
        // The caller must be able to tell "physically impossible" apart from
        // "search came up dry".
        let unreachable = SolveError::RangeUnreachable {
            requested_m: 1.0,
            limit_m: 0.5,
        };
        let dry = SolveError::NoSolutionFound {
            domain_start_deg: 45.0,
            domain_end_deg: 89.0,
            step_deg: 0.1,
        };
        assert_ne!(unreachable, dry);
    }
}
