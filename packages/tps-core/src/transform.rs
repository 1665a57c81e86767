//! Conversions between the pixel frame of the input/output files and the
//! mathematical frame the spline is fitted in.
//!
//! Pixel coordinates have their origin at the top left. The mathematical frame has
//! its origin at the bottom left with the two axes swapped, so the first coordinate
//! runs up the canvas and the second runs across it.

use crate::grid::Canvas;
use crate::landmark::{ControlPointSet, Landmark};
use nalgebra::Point2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    fit_height: f64,
}

impl CoordinateTransform {
    /// Creates a transform that flips the vertical canvas axis about `fit_height`.
    pub fn new(fit_height: f64) -> Self {
        CoordinateTransform { fit_height }
    }

    /// Transform whose flip height matches the canvas being evaluated.
    pub fn for_canvas(canvas: &Canvas) -> Self {
        CoordinateTransform::new(canvas.height as f64)
    }

    /// Canvas height used to flip landmark `v` coordinates at ingestion.
    pub fn fit_height(&self) -> f64 {
        self.fit_height
    }

    /// Whether the ingestion flip agrees with the height of `canvas`.
    pub fn matches_canvas(&self, canvas: &Canvas) -> bool {
        self.fit_height == canvas.height as f64
    }

    /// Maps one landmark into `(basis, target)` in the mathematical frame.
    ///
    /// The target swaps the raw source coordinates, `(y_raw, x_raw)`. The basis point is
    /// `(fit_height + v_raw, u_raw)`: `v_raw` is measured downwards from the top edge
    /// (so it is normally negative), and adding the height turns it into a distance
    /// from the bottom edge.
    pub fn ingest_landmark(&self, landmark: &Landmark) -> (Point2<f64>, Point2<f64>) {
        let basis = Point2::new(self.fit_height + landmark.canvas.y, landmark.canvas.x);
        let target = Point2::new(landmark.source.y, landmark.source.x);
        (basis, target)
    }

    /// Converts every landmark, keeping input order.
    pub fn ingest(&self, landmarks: &[Landmark]) -> ControlPointSet {
        ControlPointSet::from_pairs(landmarks.iter().map(|l| self.ingest_landmark(l)))
    }
}

/// Re-derives the output pixel `(u, v)` for the grid point at flat `index`.
///
/// Walking the raster, the vertical axis value counts down from the canvas height to
/// 1 within each column; `v = height + 1 - axis` restores bottom-left origin, which
/// makes `v` equal to the grid point's first mathematical coordinate. `u` is the
/// 1-based column.
pub fn output_pixel(canvas: &Canvas, index: usize) -> (usize, usize) {
    let column = index / canvas.height;
    let axis = canvas.height - index % canvas.height;
    (column + 1, canvas.height + 1 - axis)
}
