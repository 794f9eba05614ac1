//! Frame observers for the coupled run.
//!
//! A frame is the shoreline model's water-depth field at one rendered
//! iteration. Observers decide what happens to it: write VTK output, log
//! land/water statistics, or anything a closure does.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::diagnostics::ShorelineDiagnostics;
use super::runner::CouplingError;
use crate::bmi::names;
use crate::grid::{DEFAULT_LAND_THRESHOLD, ElevationGrid};
use crate::io::{write_pvd_collection, write_vtk_series};

/// Water depth at one rendered iteration.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    /// Iteration index (days)
    pub step: usize,
    /// Shoreline model time when the frame was taken
    pub time: f64,
    /// Water depth, positive offshore, negative on land
    pub field: &'a ElevationGrid,
}

/// Receives rendered frames from [`CoupledRun`](super::CoupledRun).
pub trait FrameObserver {
    fn on_frame(&mut self, frame: &Frame<'_>) -> Result<(), CouplingError>;

    /// Called once after the last iteration.
    fn finish(&mut self) -> Result<(), CouplingError> {
        Ok(())
    }
}

impl<F> FrameObserver for F
where
    F: FnMut(&Frame<'_>) -> Result<(), CouplingError>,
{
    fn on_frame(&mut self, frame: &Frame<'_>) -> Result<(), CouplingError> {
        self(frame)
    }
}

/// Observer that ignores every frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFrames;

impl FrameObserver for NoFrames {
    fn on_frame(&mut self, _frame: &Frame<'_>) -> Result<(), CouplingError> {
        Ok(())
    }
}

/// Writes each frame as `<stem>_<frame:04>.vti` and a `<stem>.pvd` index.
///
/// Frames carry the depth field and the matching elevation.
pub struct VtkFrameWriter {
    base: PathBuf,
    pvd_path: PathBuf,
    entries: Vec<(f64, PathBuf)>,
}

impl VtkFrameWriter {
    /// Write into `output_dir`, creating it if needed.
    pub fn new(output_dir: impl AsRef<Path>, stem: &str) -> Result<Self, CouplingError> {
        let dir = output_dir.as_ref();
        fs::create_dir_all(dir)?;
        Ok(Self {
            base: dir.join(stem),
            pvd_path: dir.join(format!("{}.pvd", stem)),
            entries: Vec::new(),
        })
    }

    /// Files written so far with their model times.
    pub fn entries(&self) -> &[(f64, PathBuf)] {
        &self.entries
    }

    pub fn pvd_path(&self) -> &Path {
        &self.pvd_path
    }
}

impl FrameObserver for VtkFrameWriter {
    fn on_frame(&mut self, frame: &Frame<'_>) -> Result<(), CouplingError> {
        let elevation = frame.field.negated();
        let path = write_vtk_series(
            &self.base,
            self.entries.len(),
            frame.field,
            &[
                (names::WATER_DEPTH, frame.field.as_slice()),
                (names::LAND_ELEVATION, elevation.as_slice()),
            ],
            frame.time,
        )?;
        debug!("Wrote frame {} to {}", frame.step, path.display());
        self.entries.push((frame.time, path));
        Ok(())
    }

    fn finish(&mut self) -> Result<(), CouplingError> {
        write_pvd_collection(&self.pvd_path, &self.entries)?;
        info!(
            "Wrote {} frames, index {}",
            self.entries.len(),
            self.pvd_path.display()
        );
        Ok(())
    }
}

/// Logs land/water statistics of every frame and keeps them.
pub struct FrameLog {
    threshold: f64,
    history: Vec<(usize, ShorelineDiagnostics)>,
}

impl FrameLog {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            history: Vec::new(),
        }
    }

    /// `(step, diagnostics)` for every frame seen.
    pub fn history(&self) -> &[(usize, ShorelineDiagnostics)] {
        &self.history
    }
}

impl Default for FrameLog {
    fn default() -> Self {
        Self::new(DEFAULT_LAND_THRESHOLD)
    }
}

impl FrameObserver for FrameLog {
    fn on_frame(&mut self, frame: &Frame<'_>) -> Result<(), CouplingError> {
        let diag = ShorelineDiagnostics::from_depth(frame.field, self.threshold);
        info!("Time Step: {} | {}", frame.step, diag.summary_line());
        self.history.push((frame.step, diag));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GridShape;
    use tempfile::tempdir;

    fn depth_grid() -> ElevationGrid {
        ElevationGrid::from_vec(
            GridShape::new(2, 2),
            (0.0, 0.0),
            (100.0, 100.0),
            vec![4.0, 4.0, -1.0, 2.0],
        )
        .unwrap()
    }

    #[test]
    fn test_closure_observer() {
        let grid = depth_grid();
        let mut steps = Vec::new();
        {
            let mut observer = |frame: &Frame<'_>| -> Result<(), CouplingError> {
                steps.push(frame.step);
                Ok(())
            };
            for step in [0, 5] {
                let frame = Frame {
                    step,
                    time: step as f64,
                    field: &grid,
                };
                observer.on_frame(&frame).unwrap();
            }
            observer.finish().unwrap();
        }
        assert_eq!(steps, vec![0, 5]);
    }

    #[test]
    fn test_frame_log_records_diagnostics() {
        let grid = depth_grid();
        let mut log = FrameLog::default();
        let frame = Frame {
            step: 3,
            time: 3.0,
            field: &grid,
        };
        log.on_frame(&frame).unwrap();

        assert_eq!(log.history().len(), 1);
        let (step, diag) = &log.history()[0];
        assert_eq!(*step, 3);
        assert_eq!(diag.land_cells, 1);
    }

    #[test]
    fn test_vtk_frame_writer() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("frames");
        let grid = depth_grid();
        let mut writer = VtkFrameWriter::new(&out, "coast").unwrap();

        for (i, step) in [0usize, 10].into_iter().enumerate() {
            let frame = Frame {
                step,
                time: i as f64 * 10.0,
                field: &grid,
            };
            writer.on_frame(&frame).unwrap();
        }
        writer.finish().unwrap();

        assert!(out.join("coast_0000.vti").exists());
        assert!(out.join("coast_0001.vti").exists());
        let pvd = std::fs::read_to_string(writer.pvd_path()).unwrap();
        assert!(pvd.contains("file=\"coast_0001.vti\""));

        let vti = std::fs::read_to_string(out.join("coast_0000.vti")).unwrap();
        assert!(vti.contains("Name=\"sea_water__depth\""));
        assert!(vti.contains("Name=\"land_surface__elevation\""));
    }
}
