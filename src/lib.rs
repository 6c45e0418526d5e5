//! # Artillery Engine
//!
//! Firing-solution core: closed-form and drag-aware elevation solvers,
//! fire-correction sensitivity figures, and terrain height lookup.
//!
//! The library is synchronous and stateless per call; the one long-lived
//! object is the caller-owned [`TerrainHeightIndex`]. The only internal
//! parallelism is the angle scan in [`angle_search`], which fans candidate
//! simulations out over a thread pool and reduces them deterministically.

// Re-export the main types and functions
pub use angle_search::{AngleCandidate, AngleSearchEngine};
pub use atmosphere::AtmosphericCorrection;
pub use closed_form::{high_arc, low_arc};
pub use error::SolveError;
pub use sensitivity::{flight_time, range_at, range_difference_per_mil};
pub use solver::{
    plan_mission, solve_closed_form, solve_with_drag, ArcMode, ClosedFormSolution, DragSolution,
    FiringContext, GridPosition, MissionSolution,
};
pub use terrain::{TerrainHeightIndex, TerrainPoint};
pub use trajectory::{Flight, TrajectoryIntegrator};
pub use wind::{azimuth_correction_mils, lateral_deviation_m, WindComponents, WindConditions};

// Module declarations
pub mod angle_search;
pub mod atmosphere;
pub mod closed_form;
pub mod constants;
mod error;
pub mod geometry;
pub mod sensitivity;
pub mod solver;
pub mod terrain;
pub mod trajectory;
pub mod wind;
