//! Diagnostics for the coupled run.
//!
//! - [`ShorelineDiagnostics`]: land/water summary of one rendered field
//! - [`ProgressReporter`]: percentage, throughput and ETA logging

use std::fmt;
use std::time::Instant;

use tracing::info;

use crate::grid::{ElevationGrid, LandMask};

/// Summary of a field classified into land and water.
#[derive(Clone, Debug, PartialEq)]
pub struct ShorelineDiagnostics {
    pub land_cells: usize,
    pub water_cells: usize,
    /// Mean first-land row over columns containing land
    pub mean_shoreline_row: Option<f64>,
    /// Smallest finite elevation
    pub min_elevation: Option<f64>,
    /// Largest finite elevation
    pub max_elevation: Option<f64>,
}

impl ShorelineDiagnostics {
    /// Classify an elevation field (land where `value >= threshold`).
    pub fn compute(elevation: &ElevationGrid, threshold: f64) -> Self {
        let mask = LandMask::from_grid(elevation, threshold);
        let stats = mask.statistics();
        Self {
            land_cells: stats.land_cells,
            water_cells: stats.water_cells,
            mean_shoreline_row: stats.mean_shoreline_row,
            min_elevation: elevation.min(),
            max_elevation: elevation.max(),
        }
    }

    /// Same as [`compute`](Self::compute) for a water-depth field.
    pub fn from_depth(depth: &ElevationGrid, threshold: f64) -> Self {
        Self::compute(&depth.negated(), threshold)
    }

    /// Fraction of cells that are land.
    pub fn land_fraction(&self) -> f64 {
        let total = self.land_cells + self.water_cells;
        if total == 0 {
            0.0
        } else {
            self.land_cells as f64 / total as f64
        }
    }

    /// One-line summary for progress output.
    pub fn summary_line(&self) -> String {
        let row = self
            .mean_shoreline_row
            .map_or_else(|| "n/a".to_string(), |r| format!("{:.2}", r));
        format!(
            "land={} ({:.1}%) shoreline_row={} z=[{:.2}, {:.2}]",
            self.land_cells,
            100.0 * self.land_fraction(),
            row,
            self.min_elevation.unwrap_or(f64::NAN),
            self.max_elevation.unwrap_or(f64::NAN)
        )
    }
}

impl fmt::Display for ShorelineDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary_line())
    }
}

/// Progress reporter for long coupled runs.
pub struct ProgressReporter {
    /// Start time of the run (wall clock)
    start_instant: Instant,
    /// Number of iterations to reach
    total_steps: usize,
    /// Last reported progress percentage
    last_reported_pct: u32,
    /// Report interval in percentage points
    report_interval_pct: u32,
    /// Number of completed iterations
    n_steps: usize,
}

impl ProgressReporter {
    /// Report every `report_interval_pct` percent (clamped to at least 1).
    pub fn new(total_steps: usize, report_interval_pct: u32) -> Self {
        Self {
            start_instant: Instant::now(),
            total_steps,
            last_reported_pct: 0,
            report_interval_pct: report_interval_pct.max(1),
            n_steps: 0,
        }
    }

    /// Record a completed iteration.
    pub fn step(&mut self) {
        self.n_steps += 1;
    }

    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Completed fraction in percent.
    pub fn percent(&self) -> f64 {
        if self.total_steps == 0 {
            100.0
        } else {
            100.0 * self.n_steps as f64 / self.total_steps as f64
        }
    }

    /// Report if the next percentage threshold was crossed.
    ///
    /// Returns true if progress was reported.
    pub fn maybe_report(&mut self, diag: Option<&ShorelineDiagnostics>) -> bool {
        let pct = self.percent() as u32;
        let threshold = self.last_reported_pct + self.report_interval_pct;

        if pct >= threshold || (pct == 100 && self.last_reported_pct < 100) {
            self.report(diag);
            self.last_reported_pct = (pct / self.report_interval_pct) * self.report_interval_pct;
            true
        } else {
            false
        }
    }

    /// Force a progress report.
    pub fn report(&self, diag: Option<&ShorelineDiagnostics>) {
        let elapsed = self.start_instant.elapsed().as_secs_f64();
        let pct = self.percent();

        let eta = if pct > 0.1 {
            format_duration(elapsed * 100.0 / pct - elapsed)
        } else {
            "calculating...".to_string()
        };

        let steps_per_sec = if elapsed > 0.0 {
            self.n_steps as f64 / elapsed
        } else {
            0.0
        };

        match diag {
            Some(d) => info!(
                "[{:>5.1}%] step {}/{} | elapsed={} | ETA={} | {:.0} steps/s | {}",
                pct,
                self.n_steps,
                self.total_steps,
                format_duration(elapsed),
                eta,
                steps_per_sec,
                d.summary_line()
            ),
            None => info!(
                "[{:>5.1}%] step {}/{} | elapsed={} | ETA={} | {:.0} steps/s",
                pct,
                self.n_steps,
                self.total_steps,
                format_duration(elapsed),
                eta,
                steps_per_sec
            ),
        }
    }

    /// Log the final summary.
    pub fn finish(&self) {
        let elapsed = self.start_instant.elapsed().as_secs_f64();
        let steps_per_sec = if elapsed > 0.0 {
            self.n_steps as f64 / elapsed
        } else {
            0.0
        };
        info!(
            "Coupled run complete: {} steps in {} ({:.1} steps/s)",
            self.n_steps,
            format_duration(elapsed),
            steps_per_sec
        );
    }
}

/// Format a duration in seconds as human-readable string.
pub(crate) fn format_duration(secs: f64) -> String {
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else if secs < 3600.0 {
        let mins = (secs / 60.0).floor();
        let s = secs - mins * 60.0;
        format!("{:.0}m{:.0}s", mins, s)
    } else {
        let hours = (secs / 3600.0).floor();
        let mins = ((secs - hours * 3600.0) / 60.0).floor();
        format!("{:.0}h{:.0}m", hours, mins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GridShape;

    #[test]
    fn test_diagnostics_from_depth() {
        // Row 0 water, row 1 land in column 0 only
        let depth = ElevationGrid::from_vec(
            GridShape::new(2, 2),
            (0.0, 0.0),
            (1.0, 1.0),
            vec![3.0, 2.0, -1.5, 0.5],
        )
        .unwrap();

        let diag = ShorelineDiagnostics::from_depth(&depth, 1.0);
        assert_eq!(diag.land_cells, 1);
        assert_eq!(diag.water_cells, 3);
        assert_eq!(diag.mean_shoreline_row, Some(1.0));
        assert_eq!(diag.min_elevation, Some(-3.0));
        assert_eq!(diag.max_elevation, Some(1.5));
        assert!((diag.land_fraction() - 0.25).abs() < 1e-12);
        assert!(diag.summary_line().starts_with("land=1 (25.0%)"));
    }

    #[test]
    fn test_progress_thresholds() {
        let mut progress = ProgressReporter::new(10, 50);
        let mut reports = 0;
        for _ in 0..10 {
            progress.step();
            if progress.maybe_report(None) {
                reports += 1;
            }
        }
        // 50% and 100%
        assert_eq!(reports, 2);
        assert_eq!(progress.n_steps(), 10);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(12.34), "12.3s");
        assert_eq!(format_duration(125.0), "2m5s");
        assert_eq!(format_duration(7260.0), "2h1m");
    }
}
