//! VTK output for gridded fields.
//!
//! Writes VTK XML ImageData (`.vti`) files for visualization in ParaView and
//! other VTK-compatible tools, plus ParaView `.pvd` collections that tie a
//! frame series to simulation time.
//!
//! Point data is written in row-major order, which for ImageData means x
//! (columns) varies fastest, matching [`ElevationGrid`].
//!
//! # Example
//!
//! ```ignore
//! use shoreline_coupler::io::{write_vtk_grid, write_pvd_collection};
//!
//! write_vtk_grid("grid.vti", &grid, &[("depth", grid.as_slice())], 0.0)?;
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::grid::ElevationGrid;

/// Error type for VTK operations.
#[derive(Debug, Error)]
pub enum VtkError {
    /// I/O error during file operations.
    #[error("VTK I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A point-data array does not match the grid size.
    #[error("Field '{name}' has {actual} values, grid has {expected} points")]
    FieldLength {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// VTK XML writer helper.
struct VtkWriter<W: Write> {
    writer: BufWriter<W>,
    indent: usize,
}

impl<W: Write> VtkWriter<W> {
    fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            indent: 0,
        }
    }

    fn write_indent(&mut self) -> std::io::Result<()> {
        for _ in 0..self.indent {
            write!(self.writer, "  ")?;
        }
        Ok(())
    }

    fn write_header(&mut self, file_type: &str) -> std::io::Result<()> {
        writeln!(self.writer, "<?xml version=\"1.0\"?>")?;
        writeln!(
            self.writer,
            "<VTKFile type=\"{}\" version=\"0.1\" byte_order=\"LittleEndian\">",
            file_type
        )?;
        self.indent += 1;
        Ok(())
    }

    fn write_footer(&mut self) -> std::io::Result<()> {
        self.indent -= 1;
        writeln!(self.writer, "</VTKFile>")?;
        self.writer.flush()?;
        Ok(())
    }

    fn start_element(&mut self, name: &str, attrs: &[(&str, &str)]) -> std::io::Result<()> {
        self.write_indent()?;
        write!(self.writer, "<{}", name)?;
        for (key, value) in attrs {
            write!(self.writer, " {}=\"{}\"", key, value)?;
        }
        writeln!(self.writer, ">")?;
        self.indent += 1;
        Ok(())
    }

    fn end_element(&mut self, name: &str) -> std::io::Result<()> {
        self.indent -= 1;
        self.write_indent()?;
        writeln!(self.writer, "</{}>", name)?;
        Ok(())
    }

    fn empty_element(&mut self, name: &str, attrs: &[(&str, String)]) -> std::io::Result<()> {
        self.write_indent()?;
        write!(self.writer, "<{}", name)?;
        for (key, value) in attrs {
            write!(self.writer, " {}=\"{}\"", key, value)?;
        }
        writeln!(self.writer, "/>")?;
        Ok(())
    }

    /// Float64 array, one grid row per line.
    fn write_data_array_f64(
        &mut self,
        name: &str,
        data: &[f64],
        per_line: usize,
    ) -> std::io::Result<()> {
        self.write_indent()?;
        writeln!(
            self.writer,
            "<DataArray type=\"Float64\" Name=\"{}\" format=\"ascii\">",
            name
        )?;

        self.indent += 1;
        for chunk in data.chunks(per_line.max(1)) {
            self.write_indent()?;
            let line: Vec<String> = chunk.iter().map(|v| format!("{:.10e}", v)).collect();
            writeln!(self.writer, "{}", line.join(" "))?;
        }
        self.indent -= 1;

        self.write_indent()?;
        writeln!(self.writer, "</DataArray>")?;
        Ok(())
    }

    fn write_field_data(&mut self, name: &str, value: f64) -> std::io::Result<()> {
        self.start_element("FieldData", &[])?;
        self.write_indent()?;
        writeln!(
            self.writer,
            "<DataArray type=\"Float64\" Name=\"{}\" NumberOfTuples=\"1\" format=\"ascii\">",
            name
        )?;
        self.indent += 1;
        self.write_indent()?;
        writeln!(self.writer, "{:.10e}", value)?;
        self.indent -= 1;
        self.write_indent()?;
        writeln!(self.writer, "</DataArray>")?;
        self.end_element("FieldData")?;
        Ok(())
    }
}

/// Write named point-data fields on the grid's geometry as VTK ImageData.
///
/// Each field must hold one value per grid cell in row-major order. The
/// grid's own values are not written unless passed as a field.
pub fn write_vtk_grid(
    path: impl AsRef<Path>,
    grid: &ElevationGrid,
    fields: &[(&str, &[f64])],
    time: f64,
) -> Result<(), VtkError> {
    for &(name, data) in fields {
        if data.len() != grid.len() {
            return Err(VtkError::FieldLength {
                name: name.to_string(),
                expected: grid.len(),
                actual: data.len(),
            });
        }
    }

    let file = File::create(path)?;
    let mut writer = VtkWriter::new(file);

    let (x0, y0) = grid.origin();
    let (dx, dy) = grid.spacing();
    let extent = format!(
        "0 {} 0 {} 0 0",
        grid.cols().saturating_sub(1),
        grid.rows().saturating_sub(1)
    );
    let origin = format!("{} {} 0", x0, y0);
    let spacing = format!("{} {} 1", dx, dy);

    writer.write_header("ImageData")?;
    writer.start_element(
        "ImageData",
        &[
            ("WholeExtent", extent.as_str()),
            ("Origin", origin.as_str()),
            ("Spacing", spacing.as_str()),
        ],
    )?;
    writer.write_field_data("TimeValue", time)?;

    writer.start_element("Piece", &[("Extent", extent.as_str())])?;
    match fields.first() {
        Some(&(first, _)) => writer.start_element("PointData", &[("Scalars", first)])?,
        None => writer.start_element("PointData", &[])?,
    }
    for &(name, data) in fields {
        writer.write_data_array_f64(name, data, grid.cols())?;
    }
    writer.end_element("PointData")?;
    writer.end_element("Piece")?;

    writer.end_element("ImageData")?;
    writer.write_footer()?;

    Ok(())
}

/// Write a VTK file with automatic frame numbering.
///
/// Creates a filename like `base_0001.vti` for frame 1 next to `base_path`.
/// Returns the full path of the created file.
pub fn write_vtk_series(
    base_path: impl AsRef<Path>,
    frame: usize,
    grid: &ElevationGrid,
    fields: &[(&str, &[f64])],
    time: f64,
) -> Result<PathBuf, VtkError> {
    let path = series_path(base_path.as_ref(), frame);
    write_vtk_grid(&path, grid, fields, time)?;
    Ok(path)
}

/// Path of frame `frame` of the series rooted at `base`.
pub fn series_path(base: &Path, frame: usize) -> PathBuf {
    let stem = base.file_stem().unwrap_or_default().to_string_lossy();
    let parent = base.parent().unwrap_or(Path::new("."));
    parent.join(format!("{}_{:04}.vti", stem, frame))
}

/// Write a ParaView collection (`.pvd`) indexing `(time, file)` entries.
///
/// Files in the same directory as the collection are referenced by name so
/// the output directory can be moved as a whole.
pub fn write_pvd_collection(
    path: impl AsRef<Path>,
    entries: &[(f64, PathBuf)],
) -> Result<(), VtkError> {
    let path = path.as_ref();
    let dir = path.parent().unwrap_or(Path::new(""));

    let file = File::create(path)?;
    let mut writer = VtkWriter::new(file);

    writer.write_header("Collection")?;
    writer.start_element("Collection", &[])?;
    for (time, file) in entries {
        let reference = match (file.parent(), file.file_name()) {
            (Some(parent), Some(name)) if parent == dir => PathBuf::from(name),
            _ => file.clone(),
        };
        writer.empty_element(
            "DataSet",
            &[
                ("timestep", format!("{}", time)),
                ("group", String::new()),
                ("part", "0".to_string()),
                ("file", reference.display().to_string()),
            ],
        )?;
    }
    writer.end_element("Collection")?;
    writer.write_footer()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GridShape;
    use tempfile::tempdir;

    fn sample_grid() -> ElevationGrid {
        ElevationGrid::from_vec(
            GridShape::new(2, 3),
            (100.0, 200.0),
            (10.0, 20.0),
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        )
        .unwrap()
    }

    #[test]
    fn test_write_vtk_grid_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grid.vti");
        let grid = sample_grid();

        write_vtk_grid(&path, &grid, &[("depth", grid.as_slice())], 3.5).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("type=\"ImageData\""));
        assert!(content.contains("WholeExtent=\"0 2 0 1 0 0\""));
        assert!(content.contains("Origin=\"100 200 0\""));
        assert!(content.contains("Spacing=\"10 20 1\""));
        assert!(content.contains("Name=\"depth\""));
        assert!(content.contains("Name=\"TimeValue\""));
        assert!(content.contains("3.5000000000e0"));
        assert!(content.trim_end().ends_with("</VTKFile>"));
    }

    #[test]
    fn test_field_length_checked() {
        let dir = tempdir().unwrap();
        let grid = sample_grid();
        let short = [1.0, 2.0];

        let result = write_vtk_grid(dir.path().join("bad.vti"), &grid, &[("x", &short[..])], 0.0);
        assert!(matches!(
            result,
            Err(VtkError::FieldLength {
                expected: 6,
                actual: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_write_vtk_series_naming() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("frame");
        let grid = sample_grid();

        let path = write_vtk_series(&base, 7, &grid, &[("depth", grid.as_slice())], 0.0).unwrap();
        assert_eq!(path.file_name().unwrap(), "frame_0007.vti");
        assert!(path.exists());
    }

    #[test]
    fn test_pvd_references_siblings_by_name() {
        let dir = tempdir().unwrap();
        let entries = vec![
            (0.0, dir.path().join("frame_0000.vti")),
            (10.0, dir.path().join("frame_0001.vti")),
        ];
        let pvd = dir.path().join("frames.pvd");
        write_pvd_collection(&pvd, &entries).unwrap();

        let content = std::fs::read_to_string(&pvd).unwrap();
        assert!(content.contains("type=\"Collection\""));
        assert!(content.contains("timestep=\"10\""));
        assert!(content.contains("file=\"frame_0001.vti\""));
        assert_eq!(content.matches("<DataSet").count(), 2);
    }
}
