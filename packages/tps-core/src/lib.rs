//! # TPS Core Library
//!
//! Thin-plate spline warping for landmark-based georeferencing. A spline is fitted
//! to a sparse set of landmark correspondences and evaluated at every pixel of an
//! output canvas, giving a per-pixel lookup table of source-image coordinates.
//!
//! The main components are:
//! - `kernel`: the radial basis `U(r) = 2 r² ln(r)` and pairwise distances.
//! - `system` / `solver`: assembly and solution of the augmented linear system,
//!   wrapped up as `ThinPlateSpline`.
//! - `grid`: dense evaluation over a `Canvas`.
//! - `transform`: pixel frame ↔ mathematical frame conversions.
//! - `lookup`: output rows and the CSV writer; `landmark`: the CSV reader.
//! - `pipeline`: the whole computation in one call.

pub mod error;
pub mod grid;
pub mod kernel;
pub mod landmark;
pub mod lookup;
pub mod pipeline;
pub mod solver;
pub mod system;
pub mod text;
pub mod transform;

pub use error::{Result, TpsError};
pub use grid::{evaluate_grid, Canvas, GridPoint, WarpedGrid};
pub use kernel::{kernel_matrix, pairwise_distances, radial_basis};
pub use landmark::{parse_landmarks, read_landmarks, ControlPointSet, Landmark};
pub use lookup::{assemble_rows, write_lookup_table, write_rows, LookupRow};
pub use pipeline::{compute_lookup_table, compute_lookup_table_with, ingest_landmarks, Phase};
pub use solver::{solve_system, ThinPlateSpline};
pub use system::{assemble_system, LinearSystem, MIN_LANDMARKS};
pub use transform::{output_pixel, CoordinateTransform};
