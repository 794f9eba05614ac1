//! Land masking for elevation grids.
//!
//! The shoreline model treats a cell as land when its elevation is at or
//! above a threshold (1 m by default) and as water otherwise.
//!
//! # Example
//!
//! ```ignore
//! use shoreline_coupler::grid::LandMask;
//!
//! let mask = LandMask::from_grid(&elevation, 1.0);
//! if mask.is_land(10, 4) {
//!     // beach or dune cell
//! }
//! println!("{}", mask.statistics());
//! ```

use std::fmt;

use crate::grid::ElevationGrid;
use crate::types::{Elevation, GridShape};

/// Default elevation separating land from water.
pub const DEFAULT_LAND_THRESHOLD: f64 = 1.0;

/// Land mask for a row-major grid.
#[derive(Clone, Debug, PartialEq)]
pub struct LandMask {
    /// True if the cell is land
    land: Vec<bool>,
    shape: GridShape,
    threshold: f64,
}

impl LandMask {
    /// Classify every cell of an elevation grid.
    ///
    /// Non-finite values are treated as water.
    pub fn from_grid(grid: &ElevationGrid, threshold: f64) -> Self {
        Self::from_values(grid.shape(), grid.as_slice(), threshold)
    }

    /// Classify a flat row-major array, e.g. a field read back from a model.
    pub fn from_values(shape: GridShape, values: &[f64], threshold: f64) -> Self {
        debug_assert_eq!(values.len(), shape.len());
        Self {
            land: values
                .iter()
                .map(|&v| Elevation::new(v).is_land(Elevation::new(threshold)))
                .collect(),
            shape,
            threshold,
        }
    }

    /// Wrap precomputed land flags (row-major).
    pub fn from_flags(shape: GridShape, land: Vec<bool>, threshold: f64) -> Self {
        debug_assert_eq!(land.len(), shape.len());
        Self {
            land,
            shape,
            threshold,
        }
    }

    /// Mask where every cell is water.
    pub fn all_water(shape: GridShape) -> Self {
        Self {
            land: vec![false; shape.len()],
            shape,
            threshold: DEFAULT_LAND_THRESHOLD,
        }
    }

    #[inline]
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    #[inline]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    #[inline]
    pub fn is_land(&self, row: usize, col: usize) -> bool {
        self.land[self.shape.index(row, col)]
    }

    #[inline]
    pub fn is_water(&self, row: usize, col: usize) -> bool {
        !self.is_land(row, col)
    }

    /// Flat row-major view of the mask.
    #[inline]
    pub fn as_slice(&self) -> &[bool] {
        &self.land
    }

    pub fn land_count(&self) -> usize {
        self.land.iter().filter(|&&l| l).count()
    }

    pub fn water_count(&self) -> usize {
        self.land.len() - self.land_count()
    }

    /// First land row of every column, scanning up from row 0.
    ///
    /// `None` for columns without land.
    pub fn shoreline_rows(&self) -> Vec<Option<usize>> {
        (0..self.shape.cols())
            .map(|col| (0..self.shape.rows()).find(|&row| self.is_land(row, col)))
            .collect()
    }

    /// Number of land/water transitions between horizontally or vertically
    /// adjacent cells; a rough measure of shoreline length in cell edges.
    pub fn shoreline_edges(&self) -> usize {
        let (rows, cols) = self.shape.as_tuple();
        let mut edges = 0;
        for row in 0..rows {
            for col in 0..cols {
                let here = self.is_land(row, col);
                if col + 1 < cols && here != self.is_land(row, col + 1) {
                    edges += 1;
                }
                if row + 1 < rows && here != self.is_land(row + 1, col) {
                    edges += 1;
                }
            }
        }
        edges
    }

    pub fn statistics(&self) -> LandMaskStatistics {
        let rows = self.shoreline_rows();
        let found: Vec<usize> = rows.iter().flatten().copied().collect();
        let mean_shoreline_row = if found.is_empty() {
            None
        } else {
            Some(found.iter().sum::<usize>() as f64 / found.len() as f64)
        };

        LandMaskStatistics {
            total_cells: self.land.len(),
            land_cells: self.land_count(),
            water_cells: self.water_count(),
            shoreline_edges: self.shoreline_edges(),
            mean_shoreline_row,
        }
    }
}

/// Statistics about a land mask.
#[derive(Debug, Clone, PartialEq)]
pub struct LandMaskStatistics {
    pub total_cells: usize,
    pub land_cells: usize,
    pub water_cells: usize,
    /// Land/water cell-edge transitions
    pub shoreline_edges: usize,
    /// Mean of [`LandMask::shoreline_rows`] over columns that contain land
    pub mean_shoreline_row: Option<f64>,
}

impl LandMaskStatistics {
    /// Fraction of cells that are land (0.0 for an empty grid).
    pub fn land_fraction(&self) -> f64 {
        if self.total_cells == 0 {
            0.0
        } else {
            self.land_cells as f64 / self.total_cells as f64
        }
    }
}

impl fmt::Display for LandMaskStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Land Mask Statistics:")?;
        writeln!(f, "  Total cells: {}", self.total_cells)?;
        writeln!(
            f,
            "  Land cells: {} ({:.1}%)",
            self.land_cells,
            100.0 * self.land_fraction()
        )?;
        writeln!(f, "  Water cells: {}", self.water_cells)?;
        writeln!(f, "  Shoreline edges: {}", self.shoreline_edges)?;
        match self.mean_shoreline_row {
            Some(row) => write!(f, "  Mean shoreline row: {:.2}", row),
            None => write!(f, "  Mean shoreline row: n/a"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3 rows × 2 cols; land from row 1 in column 0, row 2 in column 1.
    fn staircase() -> ElevationGrid {
        ElevationGrid::from_vec(
            GridShape::new(3, 2),
            (0.0, 0.0),
            (1.0, 1.0),
            vec![-2.0, -2.0, 1.0, 0.5, 1.5, 1.0],
        )
        .unwrap()
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mask = LandMask::from_grid(&staircase(), 1.0);
        assert!(mask.is_land(1, 0));
        assert!(mask.is_water(1, 1));
        assert!(mask.is_land(2, 1));
        assert_eq!(mask.land_count(), 3);
        assert_eq!(mask.water_count(), 3);
    }

    #[test]
    fn test_shoreline_rows() {
        let mask = LandMask::from_grid(&staircase(), 1.0);
        assert_eq!(mask.shoreline_rows(), vec![Some(1), Some(2)]);

        let water = LandMask::all_water(GridShape::new(3, 2));
        assert_eq!(water.shoreline_rows(), vec![None, None]);
    }

    #[test]
    fn test_shoreline_edges() {
        let mask = LandMask::from_grid(&staircase(), 1.0);
        // vertical: (0,0)-(1,0), (1,1)-(2,1); horizontal: row 1
        assert_eq!(mask.shoreline_edges(), 3);
    }

    #[test]
    fn test_statistics() {
        let stats = LandMask::from_grid(&staircase(), 1.0).statistics();
        assert_eq!(stats.total_cells, 6);
        assert_eq!(stats.land_cells, 3);
        assert_eq!(stats.mean_shoreline_row, Some(1.5));
        assert!((stats.land_fraction() - 0.5).abs() < 1e-12);
        assert!(stats.to_string().contains("Land cells: 3"));
    }

    #[test]
    fn test_nan_is_water() {
        let mask = LandMask::from_values(GridShape::new(1, 1), &[f64::NAN], 1.0);
        assert!(mask.is_water(0, 0));
    }
}
