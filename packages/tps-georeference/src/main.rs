use anyhow::{Context, Result};
use clap::Parser;
use std::time::Instant;
use tps_core::{
    compute_lookup_table_with, read_landmarks, text, write_lookup_table, Canvas,
    CoordinateTransform, Phase,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;

use cli::Args;
use config::RunConfig;

/// Main entry point for the tps-georeference tool.
///
/// Any failure aborts the run before the output file is created.
fn main() {
    if let Err(err) = run() {
        let output = format!("{} {}: {:#}", text::cross_icon(), text::error("Error"), err);
        eprintln!("{}\n", text::bold(output));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let start_time = Instant::now();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let line = "-".repeat(72);
    let dline = "=".repeat(72);

    println!(
        "\n{}\n{}\nTool for georeferencing images with thin-plate splines fitted to landmarks.\nPart of the {} project.\n\nAuthors:\n{}\n{}\n",
        format!(
            "{} {}",
            text::highlight("TPS Georeference"),
            env!("CARGO_PKG_VERSION")
        ),
        line,
        text::highlight("physical-geomorphometry"),
        env!("CARGO_PKG_AUTHORS"),
        dline
    );

    let canvas = Canvas::new(args.width as usize, args.height as usize);
    let config = RunConfig::resolve(args.fit_height, args.jobs, args.height);

    println!("{} Configuration:", text::bold("Processing"));
    println!("  {:<20} {}", "Input Landmarks:", args.input.display());
    println!("  {:<20} {}", "Output File:", args.output.display());
    println!("  {:<20} {} x {}", "Canvas:", canvas.width, canvas.height);
    println!("  {:<20} {}", "Fit Height:", config.fit_height);
    println!("  {:<20} {}", "Parallel Jobs:", config.jobs);
    println!("{}\n", dline);

    rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs)
        .build_global()?;

    let mut part_time = Instant::now();

    let landmarks = read_landmarks(&args.input)
        .with_context(|| format!("Failed to read landmarks from {}", args.input.display()))?;
    println!(
        "{} {} landmarks read in {:.2} seconds.",
        text::check_icon(),
        landmarks.len(),
        part_time.elapsed().as_secs_f64()
    );
    part_time = Instant::now();

    let transform = CoordinateTransform::new(config.fit_height);
    let rows = compute_lookup_table_with(&landmarks, canvas, &transform, |phase| {
        let step = match phase {
            Phase::Solved { system_size } => format!(
                "Spline system ({} x {}) solved",
                system_size, system_size
            ),
            Phase::Mapped { points } => format!("{} grid points mapped", points),
            Phase::Assembled { rows } => format!("Lookup table ({} rows) assembled", rows),
        };
        println!(
            "{} {} in {:.2} seconds.",
            text::check_icon(),
            step,
            part_time.elapsed().as_secs_f64()
        );
        part_time = Instant::now();
    })
    .context("Failed to compute the lookup table")?;
    part_time = Instant::now();

    info!("write to file...");
    write_lookup_table(&args.output, &rows)
        .with_context(|| format!("Failed to write lookup table to {}", args.output.display()))?;
    info!("values written to file.");
    println!(
        "{} Output file written in {:.2} seconds.",
        text::check_icon(),
        part_time.elapsed().as_secs_f64()
    );

    println!("{}", line);
    println!("{}", text::success("Calculations completed successfully."));
    println!(
        "Total elapsed time: {:.2} seconds.",
        start_time.elapsed().as_secs_f64()
    );
    println!();

    Ok(())
}
