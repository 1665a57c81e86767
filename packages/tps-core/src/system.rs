//! Assembly of the augmented thin-plate spline system.
//!
//! ```text
//! | K   P | | w |   | v |
//! | Pᵀ  0 | | a | = | 0 |
//! ```
//! `K` is the kernel between every pair of control points, `P` has rows
//! `[1, x_i, y_i]`, and `v` holds the two target channels per control point.

use crate::error::{Result, TpsError};
use crate::kernel::{kernel_matrix, pairwise_distances};
use crate::landmark::ControlPointSet;
use nalgebra::DMatrix;

/// Smallest number of control points that determines the affine part.
pub const MIN_LANDMARKS: usize = 3;

/// Number of affine coefficients per channel: `a0`, `ax`, `ay`.
pub const AFFINE_TERMS: usize = 3;

/// The `(N+3)×(N+3)` system matrix `L` and its `(N+3)×2` right-hand side `Y`.
#[derive(Debug, Clone)]
pub struct LinearSystem {
    pub matrix: DMatrix<f64>,
    pub rhs: DMatrix<f64>,
}

impl LinearSystem {
    /// Number of control points the system was built from.
    pub fn landmark_count(&self) -> usize {
        self.matrix.nrows() - AFFINE_TERMS
    }
}

/// `N×3` polynomial block with rows `[1, x_i, y_i]`.
pub fn polynomial_block(points: &ControlPointSet) -> DMatrix<f64> {
    let basis = points.basis();
    DMatrix::from_fn(basis.len(), AFFINE_TERMS, |r, c| match c {
        0 => 1.0,
        1 => basis[r].x,
        _ => basis[r].y,
    })
}

/// Builds `L` and `Y` for the given control points.
///
/// Fails with [`TpsError::InsufficientLandmarks`] before any matrix is allocated when
/// fewer than [`MIN_LANDMARKS`] points are supplied.
pub fn assemble_system(points: &ControlPointSet) -> Result<LinearSystem> {
    let n = points.len();
    if n < MIN_LANDMARKS {
        return Err(TpsError::InsufficientLandmarks {
            required: MIN_LANDMARKS,
            actual: n,
        });
    }
    let size = n + AFFINE_TERMS;

    let k = kernel_matrix(&pairwise_distances(points.basis(), points.basis()));
    let p = polynomial_block(points);

    let mut matrix = DMatrix::<f64>::zeros(size, size);
    matrix.view_mut((0, 0), (n, n)).copy_from(&k);
    matrix.view_mut((0, n), (n, AFFINE_TERMS)).copy_from(&p);
    matrix.view_mut((n, 0), (AFFINE_TERMS, n)).copy_from(&p.transpose());
    // Bottom-right 3x3 block stays zero.

    let mut rhs = DMatrix::<f64>::zeros(size, 2);
    for (i, target) in points.targets().iter().enumerate() {
        rhs[(i, 0)] = target.x;
        rhs[(i, 1)] = target.y;
    }

    Ok(LinearSystem { matrix, rhs })
}
