//! Solving the thin-plate spline system and evaluating the fitted spline.

use crate::error::{Result, TpsError};
use crate::kernel::radial_basis;
use crate::landmark::ControlPointSet;
use crate::system::{assemble_system, LinearSystem, AFFINE_TERMS};
use nalgebra::{DMatrix, DMatrixView, Matrix3x2, Point2, Vector2};
use tracing::debug;

/// Relative scatter below which a landmark layout counts as degenerate.
const DEGENERACY_TOLERANCE: f64 = 1e-12;

/// A fitted spline: control points plus the `(N+3)×2` weight matrix.
///
/// Rows `0..N` of the weights are the kernel weights, rows `N..N+3` the affine
/// coefficients `(a0, ax, ay)`. Column 0 predicts the first target channel, column 1
/// the second.
#[derive(Debug, Clone)]
pub struct ThinPlateSpline {
    control_points: Vec<Point2<f64>>,
    weights: DMatrix<f64>,
}

impl ThinPlateSpline {
    /// Assembles and solves the system for `points`.
    pub fn fit(points: &ControlPointSet) -> Result<Self> {
        let system = assemble_system(points)?;
        debug!(
            landmarks = points.len(),
            size = system.matrix.nrows(),
            "assembled thin-plate spline system"
        );
        let weights = solve_system(&system)?;
        Ok(ThinPlateSpline {
            control_points: points.basis().to_vec(),
            weights,
        })
    }

    pub fn control_points(&self) -> &[Point2<f64>] {
        &self.control_points
    }

    pub fn weights(&self) -> &DMatrix<f64> {
        &self.weights
    }

    /// Kernel weights, one row per control point.
    pub fn kernel_weights(&self) -> DMatrixView<'_, f64> {
        self.weights.rows(0, self.control_points.len())
    }

    /// Affine coefficients, rows `(a0, ax, ay)`, one column per channel.
    pub fn affine(&self) -> Matrix3x2<f64> {
        self.weights
            .fixed_view::<3, 2>(self.control_points.len(), 0)
            .into_owned()
    }

    /// Evaluates both channels at a single point.
    pub fn evaluate(&self, q: &Point2<f64>) -> [f64; 2] {
        let a = self.affine();
        let mut out = [
            a[(0, 0)] + a[(1, 0)] * q.x + a[(2, 0)] * q.y,
            a[(0, 1)] + a[(1, 1)] * q.x + a[(2, 1)] * q.y,
        ];
        for (i, p) in self.control_points.iter().enumerate() {
            let u = radial_basis(nalgebra::distance(p, q));
            out[0] += self.weights[(i, 0)] * u;
            out[1] += self.weights[(i, 1)] * u;
        }
        out
    }
}

/// Solves `L · W = Y` for `W`.
///
/// `L` is rejected as singular when the control points are duplicated or all lie on
/// one line, when the LU factorisation meets a zero pivot, or when the solution is
/// not finite. Distinct, non-collinear points always give an invertible `L`, so the
/// layout check is decided on the points themselves rather than on the matrix,
/// whose kernel and polynomial blocks differ by many orders of magnitude at pixel
/// scale.
pub fn solve_system(system: &LinearSystem) -> Result<DMatrix<f64>> {
    ensure_well_posed(system)?;

    let weights = system.matrix.clone().lu().solve(&system.rhs).ok_or_else(|| {
        TpsError::SingularSystem("LU decomposition met a zero pivot".to_string())
    })?;

    if weights.iter().any(|w| !w.is_finite()) {
        return Err(TpsError::SingularSystem(
            "solution contains non-finite weights".to_string(),
        ));
    }

    debug!(
        landmarks = system.landmark_count(),
        affine_terms = AFFINE_TERMS,
        "solved thin-plate spline system"
    );
    Ok(weights)
}

/// Checks the control points stored in the polynomial block of `L`.
///
/// Both checks are relative to the scatter of the points about their centroid, so
/// they do not depend on the pixel scale of the canvas.
fn ensure_well_posed(system: &LinearSystem) -> Result<()> {
    let n = system.landmark_count();
    let points: Vec<Point2<f64>> = (0..n)
        .map(|i| Point2::new(system.matrix[(i, n + 1)], system.matrix[(i, n + 2)]))
        .collect();

    let centroid = points
        .iter()
        .fold(Vector2::zeros(), |acc: Vector2<f64>, p| acc + p.coords)
        / n as f64;
    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    for p in &points {
        let d = p.coords - centroid;
        sxx += d.x * d.x;
        sxy += d.x * d.y;
        syy += d.y * d.y;
    }

    // Eigenvalues of the 2x2 scatter matrix.
    let half_trace = 0.5 * (sxx + syy);
    let spread = (0.5 * (sxx - syy)).hypot(sxy);
    let major = half_trace + spread;
    let minor = half_trace - spread;

    if minor.is_nan() || minor <= DEGENERACY_TOLERANCE * major {
        return Err(TpsError::SingularSystem(format!(
            "landmarks are collinear (scatter ratio {:.3e}); \
             at least three of them must span the plane",
            if major > 0.0 { minor.max(0.0) / major } else { 0.0 }
        )));
    }

    let threshold = DEGENERACY_TOLERANCE * (sxx + syy);
    for (i, p) in points.iter().enumerate() {
        for (j, q) in points.iter().enumerate().skip(i + 1) {
            if (p - q).norm_squared() <= threshold {
                return Err(TpsError::SingularSystem(format!(
                    "landmarks {} and {} lie on the same pixel position; \
                     remove one of them",
                    i + 1,
                    j + 1
                )));
            }
        }
    }
    Ok(())
}
