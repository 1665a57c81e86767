//! Landmark correspondences and the control point set derived from them.

use crate::error::{Result, TpsError};
use nalgebra::Point2;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Number of leading columns every landmark row must provide.
pub const LANDMARK_COLUMNS: usize = 5;

/// One user-supplied correspondence, in the raw pixel frame of the input file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    /// Point in the source image `(x_raw, y_raw)`.
    pub source: Point2<f64>,
    /// Matching point on the canvas `(u_raw, v_raw)`.
    pub canvas: Point2<f64>,
    /// Read from the input but not used to filter the fit.
    pub enabled: bool,
}

impl Landmark {
    pub fn new(x_raw: f64, y_raw: f64, u_raw: f64, v_raw: f64, enabled: bool) -> Self {
        Landmark {
            source: Point2::new(x_raw, y_raw),
            canvas: Point2::new(u_raw, v_raw),
            enabled,
        }
    }
}

/// Ordered kernel centres and the target each one must map to.
///
/// Index `i` of `basis` and of `targets` always refers to the same landmark; both
/// vectors are only ever built together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlPointSet {
    basis: Vec<Point2<f64>>,
    targets: Vec<Point2<f64>>,
}

impl ControlPointSet {
    /// Builds the set from `(basis, target)` pairs, keeping their order.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Point2<f64>, Point2<f64>)>,
    {
        let (basis, targets) = pairs.into_iter().unzip();
        ControlPointSet { basis, targets }
    }

    pub fn len(&self) -> usize {
        self.basis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.basis.is_empty()
    }

    /// Kernel centres in the mathematical frame.
    pub fn basis(&self) -> &[Point2<f64>] {
        &self.basis
    }

    /// Source-image coordinates the spline must reproduce at each centre.
    pub fn targets(&self) -> &[Point2<f64>] {
        &self.targets
    }
}

/// Reads landmarks from a delimited text file.
///
/// See [`parse_landmarks`] for the accepted layout.
pub fn read_landmarks(path: &Path) -> Result<Vec<Landmark>> {
    let file = File::open(path)?;
    parse_landmarks(file)
}

/// Parses landmark rows `x_raw, y_raw, u_raw, v_raw, enable` from a CSV source.
///
/// The first non-comment line is a header and is skipped, as are lines starting with
/// `#` (QGIS `.points` files open with a `#CRS:` line). Columns after the fifth are
/// ignored. A row with fewer than five fields, or a field that is not a number, is
/// reported with its 1-based line number.
pub fn parse_landmarks<R: Read>(source: R) -> Result<Vec<Landmark>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut landmarks = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| match err.position() {
            Some(pos) => TpsError::MalformedInput {
                line: pos.line(),
                message: err.to_string(),
            },
            None => TpsError::Csv(err),
        })?;
        let line = record.position().map_or(0, |pos| pos.line());

        if record.len() < LANDMARK_COLUMNS {
            return Err(TpsError::MalformedInput {
                line,
                message: format!(
                    "expected {} columns (x, y, u, v, enable), found {}",
                    LANDMARK_COLUMNS,
                    record.len()
                ),
            });
        }

        let mut values = [0.0f64; LANDMARK_COLUMNS];
        for (index, value) in values.iter_mut().enumerate() {
            let field = &record[index];
            *value = field
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| TpsError::MalformedInput {
                    line,
                    message: format!("column {} is not a finite number: '{}'", index + 1, field),
                })?;
        }

        let [x_raw, y_raw, u_raw, v_raw, enable] = values;
        landmarks.push(Landmark::new(x_raw, y_raw, u_raw, v_raw, enable != 0.0));
    }

    Ok(landmarks)
}
