//! Dense evaluation of a fitted spline over every pixel of the output canvas.

use crate::kernel::{kernel_matrix, pairwise_distances};
use crate::solver::ThinPlateSpline;
use nalgebra::Point2;
use rayon::prelude::*;

/// Grid points evaluated per kernel block.
///
/// Chunk boundaries are fixed, so results do not depend on the thread count.
pub const GRID_CHUNK: usize = 4096;

/// The output raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: usize,
    pub height: usize,
}

/// One canvas pixel in grid enumeration order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    /// 1-based column, `1..=width`.
    pub column: usize,
    /// 1-based row counted from the bottom edge, `1..=height`.
    pub row: usize,
    /// Mathematical coordinate `(row, column)`.
    pub position: Point2<f64>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Canvas { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Grid point at flat `index`.
    ///
    /// Enumeration walks columns in the outer loop and rows in the inner loop:
    /// `index = (column - 1) * height + (row - 1)`.
    pub fn grid_point(&self, index: usize) -> GridPoint {
        let column = index / self.height + 1;
        let row = index % self.height + 1;
        GridPoint {
            column,
            row,
            position: Point2::new(row as f64, column as f64),
        }
    }

    pub fn grid_points(&self) -> impl Iterator<Item = GridPoint> + '_ {
        (0..self.pixel_count()).map(move |index| self.grid_point(index))
    }
}

/// Both spline channels for every grid point, in enumeration order.
#[derive(Debug, Clone, PartialEq)]
pub struct WarpedGrid {
    /// Channel 0 of the spline (the source image's `y_raw`).
    pub x_src: Vec<f64>,
    /// Channel 1 of the spline (the source image's `x_raw`).
    pub y_src: Vec<f64>,
}

impl WarpedGrid {
    pub fn len(&self) -> usize {
        self.x_src.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x_src.is_empty()
    }
}

/// Evaluates `spline` at every grid point of `canvas`.
///
/// Each chunk of [`GRID_CHUNK`] points builds an `N × chunk` kernel block against the
/// control points and multiplies it with the kernel weights; the affine part is added
/// per point. Chunks run in parallel and write disjoint slices of the output.
pub fn evaluate_grid(spline: &ThinPlateSpline, canvas: &Canvas) -> WarpedGrid {
    let total = canvas.pixel_count();
    let mut x_src = vec![0.0; total];
    let mut y_src = vec![0.0; total];

    let control_points = spline.control_points();
    let kernel_weights = spline.kernel_weights();
    let a = spline.affine();

    x_src
        .par_chunks_mut(GRID_CHUNK)
        .zip(y_src.par_chunks_mut(GRID_CHUNK))
        .enumerate()
        .for_each(|(chunk_index, (xs, ys))| {
            let start = chunk_index * GRID_CHUNK;
            let points: Vec<Point2<f64>> = (start..start + xs.len())
                .map(|index| canvas.grid_point(index).position)
                .collect();

            let k = kernel_matrix(&pairwise_distances(control_points, &points));
            let nonlinear = k.tr_mul(&kernel_weights);

            for (j, q) in points.iter().enumerate() {
                xs[j] = nonlinear[(j, 0)] + a[(0, 0)] + a[(1, 0)] * q.x + a[(2, 0)] * q.y;
                ys[j] = nonlinear[(j, 1)] + a[(0, 1)] + a[(1, 1)] * q.x + a[(2, 1)] * q.y;
            }
        });

    WarpedGrid { x_src, y_src }
}
