//! Drag-aware trajectory integration.
//!
//! Steps a 2-D point mass with quadratic air resistance through the vertical
//! firing plane until it reaches the target, overshoots it, or falls below
//! the lower of the muzzle and target planes. The integrator is the inner
//! loop of the angle search, so it keeps no state between runs: each call
//! owns and returns its own sample buffer.

use nalgebra::Vector2;

use crate::constants::{proximity_tolerance, MAX_TRAJECTORY_SAMPLES};
use crate::error::SolveError;

/// Fixed parameters for one family of simulations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryIntegrator {
    /// Gravitational acceleration (m/s²)
    pub gravity: f64,
    /// Effective quadratic drag coefficient (1/m), already density-corrected
    pub drag_k: f64,
    /// Integration step (s)
    pub dt: f64,
    /// Sample budget per run
    pub max_samples: usize,
}

/// One simulated flight.
///
/// `samples` holds the (downrange, height) positions after each step, in
/// order; the vector is owned by the caller and never reused.
#[derive(Debug, Clone)]
pub struct Flight {
    pub samples: Vec<Vector2<f64>>,
    /// Whether the projectile passed within the proximity tolerance of the
    /// target point
    pub hit: bool,
    /// Simulated time at the terminal sample (s)
    pub flight_time: f64,
}

impl Flight {
    /// Final position, or the origin if the loop never ran a step.
    pub fn terminal(&self) -> Vector2<f64> {
        self.samples.last().copied().unwrap_or_else(Vector2::zeros)
    }

    /// Combined horizontal and vertical miss distance against a target point.
    pub fn deviation(&self, target_distance: f64, target_height: f64) -> f64 {
        let end = self.terminal();
        (end.x - target_distance).abs() + (end.y - target_height).abs()
    }
}

impl TrajectoryIntegrator {
    /// Integrator with the default step and sample budget.
    pub fn new(gravity: f64, drag_k: f64) -> Self {
        TrajectoryIntegrator {
            gravity,
            drag_k,
            dt: 0.01,
            max_samples: MAX_TRAJECTORY_SAMPLES,
        }
    }

    /// Same physics at a different step size.
    pub fn with_dt(self, dt: f64) -> Self {
        TrajectoryIntegrator { dt, ..self }
    }

    /// Hit window for this integrator's step size (m).
    pub fn hit_tolerance(&self) -> f64 {
        proximity_tolerance(self.dt)
    }

    fn check(&self, v0: f64) -> Result<(), SolveError> {
        if !(v0 > 0.0) {
            return Err(SolveError::invalid("muzzle_velocity", v0, "must be positive"));
        }
        if !(self.dt > 0.0) {
            return Err(SolveError::invalid("dt", self.dt, "must be positive"));
        }
        if !(self.gravity > 0.0) {
            return Err(SolveError::invalid(
                "gravity",
                self.gravity,
                "must be positive",
            ));
        }
        if !(self.drag_k >= 0.0) {
            return Err(SolveError::invalid(
                "drag_k",
                self.drag_k,
                "must be non-negative",
            ));
        }
        Ok(())
    }

    /// Simulate one shot at `angle_rad` toward a target `target_distance`
    /// meters downrange and `target_height` meters above the muzzle.
    ///
    /// Explicit Euler with velocity updated before position:
    ///
    /// ```text
    /// dvx = -k·vx·|v|·dt        dvz = (-g - k·vz·|v|)·dt
    /// ```
    ///
    /// Returns `hit = false` when the projectile overshoots, drops below the
    /// lower of the muzzle and target planes, or exhausts the sample budget
    /// without entering the hit window.
    pub fn simulate(
        &self,
        v0: f64,
        angle_rad: f64,
        target_distance: f64,
        target_height: f64,
    ) -> Result<Flight, SolveError> {
        self.check(v0)?;
        if !(target_distance >= 0.0) {
            return Err(SolveError::invalid(
                "target_distance",
                target_distance,
                "must be non-negative",
            ));
        }

        let tolerance = self.hit_tolerance();
        // Termination rule: keep stepping while the shell is short of the
        // target plane in x AND above the lower of the muzzle and target
        // planes in z. Of the two historical exit conditions this is the one
        // that stays bounded in x and still lets a shot at an elevated
        // target descend through the muzzle plane.
        let floor = target_height.min(0.0);

        let mut velocity = Vector2::new(v0 * angle_rad.cos(), v0 * angle_rad.sin());
        let mut position = Vector2::zeros();
        let mut samples = Vec::new();
        let mut hit = false;

        while position.x <= target_distance && position.y >= floor {
            if samples.len() >= self.max_samples {
                break;
            }

            let speed = velocity.norm();
            let accel = Vector2::new(
                -self.drag_k * velocity.x * speed,
                -self.gravity - self.drag_k * velocity.y * speed,
            );
            velocity += accel * self.dt;
            position += velocity * self.dt;
            samples.push(position);

            if (position.x - target_distance).abs() < tolerance
                && (position.y - target_height).abs() < tolerance
            {
                hit = true;
                break;
            }
        }

        let flight_time = samples.len() as f64 * self.dt;
        Ok(Flight {
            samples,
            hit,
            flight_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dragless_45_degree_shot_hits_analytic_range() {
        // With k = 0 the analytic range v²·sin(2θ)/g must fall inside the
        // hit window of the discrete trajectory.
        let v0 = 100.0;
        let g = 9.81;
        let range = v0 * v0 / g; // sin(90°) = 1
        let integrator = TrajectoryIntegrator::new(g, 0.0);
        let flight = integrator
            .simulate(v0, std::f64::consts::FRAC_PI_4, range, 0.0)
            .unwrap();
        assert!(flight.hit, "terminal {:?}", flight.terminal());
        assert!(flight.deviation(range, 0.0) < 2.0 * integrator.hit_tolerance());
    }

    #[test]
    fn test_drag_shortens_the_shot() {
        let g = 9.81;
        let angle = 30f64.to_radians();
        // Far-away target so both runs terminate on ground impact
        let vacuum = TrajectoryIntegrator::new(g, 0.0)
            .simulate(150.0, angle, 1e6, 0.0)
            .unwrap();
        let dragged = TrajectoryIntegrator::new(g, 6.0e-5)
            .simulate(150.0, angle, 1e6, 0.0)
            .unwrap();
        assert!(
            dragged.terminal().x < vacuum.terminal().x,
            "drag {} >= vacuum {}",
            dragged.terminal().x,
            vacuum.terminal().x
        );
        assert!(dragged.flight_time < vacuum.flight_time);
    }

    #[test]
    fn test_overshoot_is_a_miss() {
        // Steep close shot flies over a 100 m target and must come back
        // as hit = false, never a fabricated angle.
        let integrator = TrajectoryIntegrator::new(9.81, 6.0e-5);
        let flight = integrator.simulate(300.0, 0.01, 100.0, 50.0).unwrap();
        assert!(!flight.hit);
    }

    #[test]
    fn test_sample_budget_bounds_the_loop() {
        let mut integrator = TrajectoryIntegrator::new(9.81, 0.0);
        integrator.max_samples = 50;
        // Near-vertical shot would otherwise run for thousands of steps
        let flight = integrator.simulate(800.0, 1.55, 1e7, 0.0).unwrap();
        assert!(!flight.hit);
        assert_eq!(flight.samples.len(), 50);
        assert!((flight.flight_time - 50.0 * integrator.dt).abs() < 1e-12);
    }

    #[test]
    fn test_descending_below_target_plane_terminates() {
        // Target 40 m below the muzzle: the loop must keep running below
        // z = 0 and only stop under the target plane.
        let integrator = TrajectoryIntegrator::new(9.81, 0.0);
        let flight = integrator.simulate(50.0, 0.1, 1e6, -40.0).unwrap();
        let end = flight.terminal();
        assert!(end.y < 0.0, "terminal height {}", end.y);
        assert!(end.y >= -40.0 - 10.0, "ran far past the floor: {}", end.y);
    }

    #[test]
    fn test_invalid_inputs() {
        let integrator = TrajectoryIntegrator::new(9.81, 6.0e-5);
        assert!(matches!(
            integrator.simulate(0.0, 0.5, 1000.0, 0.0),
            Err(SolveError::InvalidInput { parameter: "muzzle_velocity", .. })
        ));
        assert!(matches!(
            integrator.with_dt(0.0).simulate(100.0, 0.5, 1000.0, 0.0),
            Err(SolveError::InvalidInput { parameter: "dt", .. })
        ));
        assert!(matches!(
            integrator.simulate(100.0, 0.5, -1.0, 0.0),
            Err(SolveError::InvalidInput { parameter: "target_distance", .. })
        ));
    }

    #[test]
    fn test_samples_are_monotone_downrange_for_flat_shot() {
        let integrator = TrajectoryIntegrator::new(9.81, 6.0e-5);
        let flight = integrator.simulate(200.0, 0.3, 3000.0, 0.0).unwrap();
        for pair in flight.samples.windows(2) {
            assert!(pair[1].x >= pair[0].x);
        }
    }
}
