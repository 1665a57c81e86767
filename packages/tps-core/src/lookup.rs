//! Lookup rows pairing each canvas pixel with its source-image coordinate, and the
//! delimited-text writer for them.

use crate::error::{Result, TpsError};
use crate::grid::{Canvas, WarpedGrid};
use crate::transform::output_pixel;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Header row of the lookup table.
pub const HEADER: [&str; 4] = ["x", "y", "u", "v"];

/// Maps canvas pixel `(u, v)` to source-image coordinate `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookupRow {
    pub x: f64,
    pub y: f64,
    pub u: usize,
    pub v: usize,
}

/// Joins the warped coordinates with their canvas pixels, position for position.
///
/// The spline channels are in the swapped mathematical order, so channel 1 becomes
/// the output `x` and channel 0 the output `y`. Produces exactly one row per pixel.
pub fn assemble_rows(warped: &WarpedGrid, canvas: &Canvas) -> Result<Vec<LookupRow>> {
    let total = canvas.pixel_count();
    if warped.x_src.len() != total || warped.y_src.len() != total {
        return Err(TpsError::DimensionMismatch {
            expected: total,
            actual: warped.x_src.len().max(warped.y_src.len()),
        });
    }

    Ok(warped
        .x_src
        .iter()
        .zip(&warped.y_src)
        .enumerate()
        .map(|(index, (&x_src, &y_src))| {
            let (u, v) = output_pixel(canvas, index);
            LookupRow {
                x: y_src,
                y: x_src,
                u,
                v,
            }
        })
        .collect())
}

/// Writes the header and rows as CSV; `x`/`y` with nine decimals, `u`/`v` as integers.
pub fn write_rows<W: Write>(sink: W, rows: &[LookupRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(sink);
    wtr.write_record(HEADER)?;
    for row in rows {
        wtr.write_record([
            format!("{:.9}", row.x),
            format!("{:.9}", row.y),
            row.u.to_string(),
            row.v.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the lookup table to `path`.
///
/// Rows go to a sibling `.partial` file first, which replaces `path` only once it is
/// complete. On failure the partial file is removed and `path` is left untouched.
pub fn write_lookup_table(path: &Path, rows: &[LookupRow]) -> Result<()> {
    let partial = partial_path(path);
    let result = File::create(&partial)
        .map_err(TpsError::from)
        .and_then(|file| write_rows(file, rows))
        .and_then(|()| fs::rename(&partial, path).map_err(TpsError::from));

    if result.is_err() {
        let _ = fs::remove_file(&partial);
    }
    result
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("lookup"));
    name.push(".partial");
    path.with_file_name(name)
}
