use thiserror::Error;

/// Errors raised while reading landmarks, fitting the spline or writing the lookup table.
///
/// None of them is recoverable within a run: the pipeline either finishes and writes
/// the full table, or stops with one of these and writes nothing.
#[derive(Debug, Error)]
pub enum TpsError {
    /// Fewer landmarks than the affine part of the spline needs.
    #[error("Thin-plate spline requires at least {required} landmarks, got {actual}")]
    InsufficientLandmarks { required: usize, actual: usize },

    /// The assembled system is singular or too ill-conditioned to solve.
    #[error("Thin-plate spline system is singular: {0}")]
    SingularSystem(String),

    /// A landmark row could not be parsed into the expected numeric columns.
    #[error("Malformed landmark input at line {line}: {message}")]
    MalformedInput { line: u64, message: String },

    /// Warped coordinates and canvas disagree on the number of grid points.
    #[error("Dimension mismatch: expected {expected} grid points, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, TpsError>;
