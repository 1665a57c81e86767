//! Thin-plate spline radial basis kernel.
//!
//! The kernel is `U(r) = 2 r² ln(r)` with `U(0) = 0`. At zero distance the
//! logarithm is taken of `1` instead of `0`, so the product is exactly zero
//! instead of `0 · -inf`. The squared-distance factor keeps the true distance,
//! which is zero there anyway, so either placement of the substitution gives
//! the same value.

use nalgebra::{DMatrix, Point2};
use rayon::prelude::*;

/// Evaluates the kernel for a single non-negative distance.
#[inline]
pub fn radial_basis(r: f64) -> f64 {
    let log_arg = if r == 0.0 { 1.0 } else { r };
    2.0 * r * r * log_arg.ln()
}

/// Applies [`radial_basis`] elementwise to a matrix of distances.
pub fn kernel_matrix(distances: &DMatrix<f64>) -> DMatrix<f64> {
    distances.map(radial_basis)
}

/// Euclidean distances between every pair `(rows[i], cols[j])`.
///
/// The result has `rows.len()` rows and `cols.len()` columns, filled column by column
/// in parallel.
pub fn pairwise_distances(rows: &[Point2<f64>], cols: &[Point2<f64>]) -> DMatrix<f64> {
    let mut distances = DMatrix::<f64>::zeros(rows.len(), cols.len());
    if rows.is_empty() {
        return distances;
    }
    // nalgebra stores matrices column-major, so each chunk is one column.
    distances
        .as_mut_slice()
        .par_chunks_mut(rows.len())
        .zip(cols.par_iter())
        .for_each(|(column, q)| {
            for (slot, p) in column.iter_mut().zip(rows) {
                *slot = nalgebra::distance(p, q);
            }
        });
    distances
}
