//! ESRI ASCII raster (`.asc`) reader and writer.
//!
//! # File Format
//!
//! ```text
//! ncols        4
//! nrows        3
//! xllcorner    446950.0
//! yllcorner    3896950.0
//! cellsize     100.0
//! NODATA_value -9999
//! 1.2 1.1 0.4 -0.3
//! ...
//! ```
//!
//! The first data line is the northernmost row, so rows are written in
//! reverse of [`ElevationGrid`] order. Non-finite values are written as
//! `NODATA_value` and read back as NaN. Both `xllcorner`/`yllcorner` and
//! `xllcenter`/`yllcenter` headers are accepted.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::grid::ElevationGrid;
use crate::types::GridShape;

/// Value written for non-finite cells.
pub const DEFAULT_NODATA: f64 = -9999.0;

/// Error type for ASCII grid files.
#[derive(Debug, Error)]
pub enum AsciiGridError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error with line number
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Required header key missing
    #[error("Missing header key '{0}'")]
    MissingHeader(&'static str),

    /// Number of values differs from ncols × nrows
    #[error("Expected {expected} values, found {actual}")]
    ValueCount { expected: usize, actual: usize },

    /// The format has a single cell size
    #[error("ASCII grids need square cells, got dx={dx}, dy={dy}")]
    NonSquareCells { dx: f64, dy: f64 },
}

/// Write a grid as an ESRI ASCII raster.
pub fn write_ascii_grid<P: AsRef<Path>>(path: P, grid: &ElevationGrid) -> Result<(), AsciiGridError> {
    let (dx, dy) = grid.spacing();
    if (dx - dy).abs() > 1e-9 * dx.abs().max(dy.abs()) {
        return Err(AsciiGridError::NonSquareCells { dx, dy });
    }

    let file = File::create(path)?;
    let mut w = BufWriter::new(file);
    let (x0, y0) = grid.origin();

    writeln!(w, "ncols        {}", grid.cols())?;
    writeln!(w, "nrows        {}", grid.rows())?;
    writeln!(w, "xllcorner    {}", x0 - 0.5 * dx)?;
    writeln!(w, "yllcorner    {}", y0 - 0.5 * dy)?;
    writeln!(w, "cellsize     {}", dx)?;
    writeln!(w, "NODATA_value {}", DEFAULT_NODATA)?;

    for row in (0..grid.rows()).rev() {
        let line: Vec<String> = grid
            .row(row)
            .iter()
            .map(|&v| {
                if v.is_finite() {
                    format!("{}", v)
                } else {
                    format!("{}", DEFAULT_NODATA)
                }
            })
            .collect();
        writeln!(w, "{}", line.join(" "))?;
    }

    w.flush()?;
    Ok(())
}

/// Read an ESRI ASCII raster.
pub fn read_ascii_grid<P: AsRef<Path>>(path: P) -> Result<ElevationGrid, AsciiGridError> {
    let content = std::fs::read_to_string(path)?;
    parse_ascii_grid(&content)
}

#[derive(Default)]
struct Header {
    ncols: Option<usize>,
    nrows: Option<usize>,
    x: Option<f64>,
    y: Option<f64>,
    corner: bool,
    cellsize: Option<f64>,
    nodata: Option<f64>,
}

/// Parse an ESRI ASCII raster from a string.
pub fn parse_ascii_grid(content: &str) -> Result<ElevationGrid, AsciiGridError> {
    let mut header = Header::default();
    let mut values: Vec<f64> = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line_no = line_num + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let first = trimmed.split_whitespace().next().unwrap_or_default();
        if values.is_empty() && first.starts_with(|c: char| c.is_ascii_alphabetic()) {
            let value = trimmed.split_whitespace().nth(1).ok_or_else(|| AsciiGridError::Parse {
                line: line_no,
                message: format!("Header key '{}' has no value", first),
            })?;
            let number = |v: &str| -> Result<f64, AsciiGridError> {
                v.parse().map_err(|_| AsciiGridError::Parse {
                    line: line_no,
                    message: format!("Invalid value '{}' for '{}'", v, first),
                })
            };
            let count = |v: &str| -> Result<usize, AsciiGridError> {
                v.parse().map_err(|_| AsciiGridError::Parse {
                    line: line_no,
                    message: format!("Invalid count '{}' for '{}'", v, first),
                })
            };

            match first.to_ascii_lowercase().as_str() {
                "ncols" => header.ncols = Some(count(value)?),
                "nrows" => header.nrows = Some(count(value)?),
                "xllcorner" => {
                    header.x = Some(number(value)?);
                    header.corner = true;
                }
                "yllcorner" => header.y = Some(number(value)?),
                "xllcenter" => header.x = Some(number(value)?),
                "yllcenter" => header.y = Some(number(value)?),
                "cellsize" => header.cellsize = Some(number(value)?),
                "nodata_value" => header.nodata = Some(number(value)?),
                _ => {
                    return Err(AsciiGridError::Parse {
                        line: line_no,
                        message: format!("Unknown header key '{}'", first),
                    });
                }
            }
            continue;
        }

        for token in trimmed.split_whitespace() {
            let v: f64 = token.parse().map_err(|_| AsciiGridError::Parse {
                line: line_no,
                message: format!("Invalid value '{}'", token),
            })?;
            values.push(v);
        }
    }

    let ncols = header.ncols.ok_or(AsciiGridError::MissingHeader("ncols"))?;
    let nrows = header.nrows.ok_or(AsciiGridError::MissingHeader("nrows"))?;
    let x = header.x.ok_or(AsciiGridError::MissingHeader("xllcorner"))?;
    let y = header.y.ok_or(AsciiGridError::MissingHeader("yllcorner"))?;
    let cellsize = header.cellsize.ok_or(AsciiGridError::MissingHeader("cellsize"))?;

    let shape = GridShape::new(nrows, ncols);
    if values.len() != shape.len() {
        return Err(AsciiGridError::ValueCount {
            expected: shape.len(),
            actual: values.len(),
        });
    }

    if let Some(nodata) = header.nodata {
        for v in values.iter_mut().filter(|v| **v == nodata) {
            *v = f64::NAN;
        }
    }

    // File rows run north to south
    let data: Vec<f64> = values
        .chunks(ncols.max(1))
        .rev()
        .flatten()
        .copied()
        .collect();

    let half = if header.corner { 0.5 * cellsize } else { 0.0 };
    let origin = (x + half, y + half);

    ElevationGrid::from_vec(shape, origin, (cellsize, cellsize), data).map_err(|_| {
        AsciiGridError::ValueCount {
            expected: shape.len(),
            actual: values.len(),
        }
    })
}
