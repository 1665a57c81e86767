use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the tps-georeference tool.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Computes a per-pixel source-coordinate lookup table from landmark correspondences using a thin-plate spline."
)]
pub struct Args {
    /// Landmark file (CSV or QGIS .points) with columns x, y, u, v, enable.
    pub input: PathBuf,

    /// Output canvas width in pixels.
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Output canvas height in pixels.
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Path to save the output CSV lookup table.
    pub output: PathBuf,

    /// Canvas height used to flip landmark v coordinates. Defaults to the canvas height.
    #[arg(long)]
    pub fit_height: Option<f64>,

    /// Number of parallel jobs to run. Defaults to all available processors.
    #[arg(long)]
    pub jobs: Option<usize>,
}
