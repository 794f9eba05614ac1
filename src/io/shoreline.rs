//! Shoreline survey readers.
//!
//! Loads ordered shoreline vertices from plain text tables or from ESRI
//! shapefiles. Coordinates are either projected (UTM eastings/northings in
//! meters) or geographic (longitude/latitude in degrees); use
//! [`Shoreline::project`] to bring geographic data into meters before grid
//! generation.
//!
//! # Text Format
//!
//! ```text
//! # Shoreline survey, UTM 18N
//! x,y
//! 447120.5,3897210.0
//! 447170.2,3897241.8
//! ```
//!
//! Columns may be separated by commas or whitespace. An optional header row
//! is skipped; lines starting with `#` are comments.
//!
//! # Example
//!
//! ```ignore
//! use shoreline_coupler::io::{read_shoreline_file, UtmProjection};
//!
//! let shoreline = read_shoreline_file("data/outer_banks.csv")?;
//! let projected = shoreline.project(&UtmProjection::new(18, true));
//! println!("{} vertices, extent {}", projected.len(), projected.bounds().unwrap());
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use shapefile::{Reader, Shape};
use thiserror::Error;

use super::projection::CoordinateProjection;
use crate::types::Bounds2D;

/// Error type for shoreline file parsing.
#[derive(Debug, Error)]
pub enum ShorelineFileError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error with line number
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Shapefile parsing error
    #[error("Shapefile error: {0}")]
    Shapefile(String),

    /// No vertices found
    #[error("Shoreline file contains no vertices")]
    Empty,
}

impl From<shapefile::Error> for ShorelineFileError {
    fn from(e: shapefile::Error) -> Self {
        ShorelineFileError::Shapefile(e.to_string())
    }
}

/// Ordered shoreline vertices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Shoreline {
    /// Easting (or longitude)
    pub x: Vec<f64>,
    /// Northing (or latitude)
    pub y: Vec<f64>,
}

impl Shoreline {
    /// Create from coordinate vectors of equal length.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        debug_assert_eq!(x.len(), y.len());
        Self { x, y }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Extent of the vertices; `None` when empty or non-finite.
    pub fn bounds(&self) -> Option<Bounds2D> {
        Bounds2D::from_points(&self.x, &self.y)
    }

    /// Project geographic vertices (`x` = longitude, `y` = latitude) to meters.
    pub fn project<P: CoordinateProjection>(&self, projection: &P) -> Self {
        let (x, y) = self
            .x
            .iter()
            .zip(&self.y)
            .map(|(&lon, &lat)| projection.geo_to_xy(lat, lon))
            .unzip();
        Self { x, y }
    }

    /// True if every vertex could be a longitude/latitude pair.
    pub fn looks_geographic(&self) -> bool {
        !self.is_empty()
            && self
                .x
                .iter()
                .zip(&self.y)
                .all(|(&lon, &lat)| lon.abs() <= 180.0 && lat.abs() <= 90.0)
    }

    /// Total polyline length along the vertices.
    pub fn length(&self) -> f64 {
        self.x
            .windows(2)
            .zip(self.y.windows(2))
            .map(|(xs, ys)| (xs[1] - xs[0]).hypot(ys[1] - ys[0]))
            .sum()
    }
}

/// Read a shoreline text table.
pub fn read_shoreline_file<P: AsRef<Path>>(path: P) -> Result<Shoreline, ShorelineFileError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut lines = Vec::new();
    for line in reader.lines() {
        lines.push(line?);
    }
    parse_shoreline_lines(lines.iter().map(String::as_str))
}

/// Parse a shoreline table from a string.
///
/// Same format as file, useful for testing or embedded data.
pub fn parse_shoreline(content: &str) -> Result<Shoreline, ShorelineFileError> {
    parse_shoreline_lines(content.lines())
}

fn parse_shoreline_lines<'a, I>(lines: I) -> Result<Shoreline, ShorelineFileError>
where
    I: Iterator<Item = &'a str>,
{
    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut seen_data = false;

    for (line_num, line) in lines.enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();

        // A header row may precede the data
        if !seen_data && parts.iter().any(|p| p.starts_with(|c: char| c.is_alphabetic())) {
            seen_data = true;
            continue;
        }
        seen_data = true;

        if parts.len() < 2 {
            return Err(ShorelineFileError::Parse {
                line: line_num + 1,
                message: "Expected: x y".into(),
            });
        }

        let px: f64 = parts[0].parse().map_err(|_| ShorelineFileError::Parse {
            line: line_num + 1,
            message: format!("Invalid x value '{}'", parts[0]),
        })?;
        let py: f64 = parts[1].parse().map_err(|_| ShorelineFileError::Parse {
            line: line_num + 1,
            message: format!("Invalid y value '{}'", parts[1]),
        })?;

        x.push(px);
        y.push(py);
    }

    if x.is_empty() {
        return Err(ShorelineFileError::Empty);
    }

    Ok(Shoreline { x, y })
}

/// Read a shoreline from a shapefile.
///
/// Polyline parts and polygon rings are candidates; the one with the most
/// vertices is returned. Point shapefiles are read as one vertex per record.
pub fn read_shoreline_shapefile<P: AsRef<Path>>(
    path: P,
) -> Result<Shoreline, ShorelineFileError> {
    let mut reader = Reader::from_path(path)?;
    let mut best: Vec<(f64, f64)> = Vec::new();
    let mut loose_points: Vec<(f64, f64)> = Vec::new();

    for result in reader.iter_shapes_and_records() {
        let (shape, _record) = result?;

        match shape {
            Shape::Polyline(polyline) => {
                for part in polyline.parts() {
                    if part.len() > best.len() {
                        best = part.iter().map(|p| (p.x, p.y)).collect();
                    }
                }
            }
            Shape::Polygon(polygon) => {
                for ring in polygon.rings() {
                    if ring.points().len() > best.len() {
                        best = ring.points().iter().map(|p| (p.x, p.y)).collect();
                    }
                }
            }
            Shape::Point(point) => loose_points.push((point.x, point.y)),
            _ => {} // Ignore other shapes
        }
    }

    if best.is_empty() {
        best = loose_points;
    }
    if best.is_empty() {
        return Err(ShorelineFileError::Empty);
    }

    let (x, y) = best.into_iter().unzip();
    Ok(Shoreline { x, y })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_with_header() {
        let content = "# survey\nx,y\n0.0,10.0\n100.0,12.5\n200.0,11.0\n";
        let shoreline = parse_shoreline(content).unwrap();
        assert_eq!(shoreline.len(), 3);
        assert_eq!(shoreline.x, vec![0.0, 100.0, 200.0]);
        assert_eq!(shoreline.y, vec![10.0, 12.5, 11.0]);
    }

    #[test]
    fn test_parse_whitespace_columns() {
        let content = "  1 2\n3\t4  extra\n";
        let shoreline = parse_shoreline(content).unwrap();
        assert_eq!(shoreline.x, vec![1.0, 3.0]);
        assert_eq!(shoreline.y, vec![2.0, 4.0]);
    }

    #[test]
    fn test_parse_error_reports_line() {
        let content = "x y\n0 0\n1 abc\n";
        match parse_shoreline(content) {
            Err(ShorelineFileError::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty() {
        assert!(matches!(
            parse_shoreline("# nothing\n"),
            Err(ShorelineFileError::Empty)
        ));
    }

    #[test]
    fn test_length_and_geographic() {
        let shoreline = Shoreline::new(vec![0.0, 3.0, 3.0], vec![0.0, 4.0, 10.0]);
        assert!((shoreline.length() - 11.0).abs() < 1e-12);
        assert!(shoreline.looks_geographic());

        let utm = Shoreline::new(vec![447_120.0], vec![3_897_210.0]);
        assert!(!utm.looks_geographic());
    }
}
