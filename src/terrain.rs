//! Terrain height lookup over a sampled map.
//!
//! A map ships as a plain text file of whitespace-delimited `x y height`
//! rows. The index is built once per selected map, is immutable afterwards,
//! and answers nearest-neighbor queries from a kd-tree over the `(x, y)`
//! keys. There is no global cache: the caller owns the index and drops it
//! when a different map is selected.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::SolveError;

/// One terrain sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainPoint {
    pub x: f64,
    pub y: f64,
    pub height: f64,
}

impl TerrainPoint {
    fn axis(&self, axis: usize) -> f64 {
        if axis == 0 {
            self.x
        } else {
            self.y
        }
    }

    fn dist_sq(&self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        dx * dx + dy * dy
    }
}

/// Immutable nearest-neighbor index over terrain samples.
///
/// The tree is stored implicitly: `points` is reordered so that for every
/// subrange the median element is the splitting node, alternating axes by
/// depth. Queries are read-only, so a built index may be shared across
/// threads freely.
#[derive(Debug, Clone)]
pub struct TerrainHeightIndex {
    points: Vec<TerrainPoint>,
}

impl TerrainHeightIndex {
    /// Build the index from an in-memory sample set.
    pub fn from_points(mut points: Vec<TerrainPoint>) -> Self {
        build_subtree(&mut points, 0);
        TerrainHeightIndex { points }
    }

    /// Load samples from a whitespace-delimited `x y height` file and build
    /// the index. Malformed rows are skipped with a warning, not fatal.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SolveError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| SolveError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let mut points = Vec::new();
        for (line_no, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match parse_row(line) {
                Some(point) => points.push(point),
                None => {
                    warn!(
                        line = line_no + 1,
                        file = %path.display(),
                        "skipping malformed terrain row"
                    );
                }
            }
        }

        Ok(Self::from_points(points))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Nearest sample to `(x, y)` and its planar distance in map units.
    pub fn query(&self, x: f64, y: f64) -> Result<(TerrainPoint, f64), SolveError> {
        if self.points.is_empty() {
            return Err(SolveError::NoData);
        }
        let mut best = (0usize, f64::INFINITY);
        nearest_in_subtree(&self.points, 0, self.points.len(), 0, x, y, &mut best);
        Ok((self.points[best.0], best.1.sqrt()))
    }

    /// Height of the nearest sample to `(x, y)`.
    pub fn height_at(&self, x: f64, y: f64) -> Result<f64, SolveError> {
        self.query(x, y).map(|(point, _)| point.height)
    }
}

fn parse_row(line: &str) -> Option<TerrainPoint> {
    let mut fields = line.split_whitespace();
    let x = fields.next()?.parse().ok()?;
    let y = fields.next()?.parse().ok()?;
    let height = fields.next()?.parse().ok()?;
    Some(TerrainPoint { x, y, height })
}

/// Reorder `points` into implicit kd order: median of the range becomes the
/// node, halves recurse on the next axis.
fn build_subtree(points: &mut [TerrainPoint], axis: usize) {
    if points.len() <= 1 {
        return;
    }
    let mid = points.len() / 2;
    points.select_nth_unstable_by(mid, |a, b| a.axis(axis).total_cmp(&b.axis(axis)));
    let (lower, rest) = points.split_at_mut(mid);
    build_subtree(lower, (axis + 1) % 2);
    build_subtree(&mut rest[1..], (axis + 1) % 2);
}

fn nearest_in_subtree(
    points: &[TerrainPoint],
    lo: usize,
    hi: usize,
    axis: usize,
    x: f64,
    y: f64,
    best: &mut (usize, f64),
) {
    if lo >= hi {
        return;
    }
    let mid = lo + (hi - lo) / 2;
    let node = &points[mid];

    let dist_sq = node.dist_sq(x, y);
    if dist_sq < best.1 {
        *best = (mid, dist_sq);
    }

    let query_coord = if axis == 0 { x } else { y };
    let split = node.axis(axis);
    let (near, far) = if query_coord < split {
        ((lo, mid), (mid + 1, hi))
    } else {
        ((mid + 1, hi), (lo, mid))
    };

    nearest_in_subtree(points, near.0, near.1, (axis + 1) % 2, x, y, best);

    // The far half can only help if the splitting plane is closer than the
    // current best.
    let plane_dist = query_coord - split;
    if plane_dist * plane_dist < best.1 {
        nearest_in_subtree(points, far.0, far.1, (axis + 1) % 2, x, y, best);
    }
}
