//! # cumulus-cloud
//!
//! CPU-side point-cloud data model for Cumulus.
//!
//! This crate knows nothing about the GPU: it owns the plain [`Point`]
//! record, the [`PointCloud`] container, and the PLY loader in [`ply`].
//! The render crate converts these into its own byte-exact GPU types.

pub mod ply;

pub use ply::{load_ply, PlyError};

/// A single point of a cloud: position plus linear RGB color.
///
/// Colors are normalized to `[0.0, 1.0]` regardless of how the source
/// file stored them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl Point {
    pub fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, color }
    }
}

/// An ordered collection of points.
///
/// Order is preserved from the source file; the renderer relies on it
/// staying stable so that point `i` always maps to the same sprite.
#[derive(Clone, Debug, Default)]
pub struct PointCloud {
    points: Vec<Point>,
}

impl PointCloud {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Average position of all points.
    ///
    /// Accumulates in `f64` so large clouds don't lose precision, then
    /// truncates back to `f32`. Returns the origin for an empty cloud.
    pub fn centroid(&self) -> [f32; 3] {
        if self.points.is_empty() {
            return [0.0; 3];
        }
        let mut sum = [0.0f64; 3];
        for p in &self.points {
            for axis in 0..3 {
                sum[axis] += p.position[axis] as f64;
            }
        }
        let n = self.points.len() as f64;
        [
            (sum[0] / n) as f32,
            (sum[1] / n) as f32,
            (sum[2] / n) as f32,
        ]
    }

    /// Mean distance of the points from `center`.
    ///
    /// Used together with [`Self::centroid`] to pick an initial camera
    /// distance that frames the whole cloud.
    pub fn mean_radius(&self, center: [f32; 3]) -> f32 {
        if self.points.is_empty() {
            return 0.0;
        }
        let mut sum = 0.0f64;
        for p in &self.points {
            let dx = (p.position[0] - center[0]) as f64;
            let dy = (p.position[1] - center[1]) as f64;
            let dz = (p.position[2] - center[2]) as f64;
            sum += (dx * dx + dy * dy + dz * dz).sqrt();
        }
        (sum / self.points.len() as f64) as f32
    }
}

impl FromIterator<Point> for PointCloud {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
