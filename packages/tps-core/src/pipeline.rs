//! The full landmark-to-lookup-table computation.

use crate::error::Result;
use crate::grid::{evaluate_grid, Canvas};
use crate::landmark::{ControlPointSet, Landmark};
use crate::lookup::{assemble_rows, LookupRow};
use crate::solver::ThinPlateSpline;
use crate::transform::CoordinateTransform;
use tracing::{info, warn};

/// Converts landmarks into control points, warning about inputs that are used as-is
/// but look unintended.
///
/// Disabled landmarks still take part in the fit. A flip height that differs from
/// the canvas height is honoured, but reported.
pub fn ingest_landmarks(
    landmarks: &[Landmark],
    canvas: &Canvas,
    transform: &CoordinateTransform,
) -> ControlPointSet {
    let disabled = landmarks.iter().filter(|l| !l.enabled).count();
    if disabled > 0 {
        warn!(
            disabled,
            total = landmarks.len(),
            "disabled landmarks are included in the fit"
        );
    }
    if !transform.matches_canvas(canvas) {
        warn!(
            fit_height = transform.fit_height(),
            canvas_height = canvas.height,
            "landmark flip height differs from the output canvas height"
        );
    }
    transform.ingest(landmarks)
}

/// A finished step of [`compute_lookup_table_with`], with the size of its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The `(N+3)×(N+3)` system was solved; carries `N+3`.
    Solved { system_size: usize },
    /// Every grid point was mapped through the spline.
    Mapped { points: usize },
    /// The output rows were assembled.
    Assembled { rows: usize },
}

/// Fits the spline to `landmarks` and evaluates it over `canvas`.
///
/// Returns `width × height` rows in grid enumeration order, or the first error.
pub fn compute_lookup_table(
    landmarks: &[Landmark],
    canvas: Canvas,
    transform: &CoordinateTransform,
) -> Result<Vec<LookupRow>> {
    compute_lookup_table_with(landmarks, canvas, transform, |_| {})
}

/// Same as [`compute_lookup_table`], calling `on_phase` as each step finishes.
pub fn compute_lookup_table_with<F>(
    landmarks: &[Landmark],
    canvas: Canvas,
    transform: &CoordinateTransform,
    mut on_phase: F,
) -> Result<Vec<LookupRow>>
where
    F: FnMut(Phase),
{
    info!(
        landmarks = landmarks.len(),
        width = canvas.width,
        height = canvas.height,
        "start crunching data"
    );

    let points = ingest_landmarks(landmarks, &canvas, transform);
    let spline = ThinPlateSpline::fit(&points)?;
    info!("thin-plate spline system solved");
    on_phase(Phase::Solved {
        system_size: spline.weights().nrows(),
    });

    let warped = evaluate_grid(&spline, &canvas);
    info!(points = warped.len(), "mapped all points in the plane");
    on_phase(Phase::Mapped {
        points: warped.len(),
    });

    let rows = assemble_rows(&warped, &canvas)?;
    info!(rows = rows.len(), "warp computed");
    on_phase(Phase::Assembled { rows: rows.len() });
    Ok(rows)
}
