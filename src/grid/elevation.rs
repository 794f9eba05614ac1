//! Row-major elevation / depth grid.
//!
//! Row `r` lies at `y = y0 + r·dy` (cross-shore), column `c` at
//! `x = x0 + c·dx` (alongshore). The flat layout is the one exchanged with the
//! shoreline model: `data[r * cols + c]`.

use thiserror::Error;

use crate::types::{Bounds2D, GridShape};

/// Error type for grid construction.
#[derive(Debug, Error)]
pub enum GridError {
    /// Data length does not match the grid shape
    #[error("Grid shape {shape} needs {expected} values, got {actual}")]
    ShapeMismatch {
        shape: GridShape,
        expected: usize,
        actual: usize,
    },

    /// Grid spacing must be finite and positive
    #[error("Invalid grid spacing: dx={dx}, dy={dy}")]
    InvalidSpacing { dx: f64, dy: f64 },

    /// Shoreline input unusable
    #[error("Invalid shoreline: {0}")]
    InvalidShoreline(String),

    /// The requested extent contains no cells
    #[error("Grid extent produces no cells ({rows} rows × {cols} cols)")]
    EmptyGrid { rows: usize, cols: usize },
}

/// Gridded values with georeferencing.
#[derive(Clone, Debug, PartialEq)]
pub struct ElevationGrid {
    data: Vec<f64>,
    shape: GridShape,
    /// Center of cell (0, 0)
    origin: (f64, f64),
    /// Cell size (dx, dy)
    spacing: (f64, f64),
}

impl ElevationGrid {
    /// Create a grid filled with `value`.
    pub fn new(shape: GridShape, origin: (f64, f64), spacing: (f64, f64), value: f64) -> Self {
        Self {
            data: vec![value; shape.len()],
            shape,
            origin,
            spacing,
        }
    }

    /// Wrap existing row-major data.
    pub fn from_vec(
        shape: GridShape,
        origin: (f64, f64),
        spacing: (f64, f64),
        data: Vec<f64>,
    ) -> Result<Self, GridError> {
        if data.len() != shape.len() {
            return Err(GridError::ShapeMismatch {
                shape,
                expected: shape.len(),
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            shape,
            origin,
            spacing,
        })
    }

    /// Evaluate `f(x, y)` at every cell center.
    pub fn from_fn<F>(shape: GridShape, origin: (f64, f64), spacing: (f64, f64), f: F) -> Self
    where
        F: Fn(f64, f64) -> f64,
    {
        let mut grid = Self::new(shape, origin, spacing, 0.0);
        for row in 0..shape.rows() {
            for col in 0..shape.cols() {
                let (x, y) = grid.cell_center(row, col);
                grid.data[shape.index(row, col)] = f(x, y);
            }
        }
        grid
    }

    #[inline]
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.shape.rows()
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.shape.cols()
    }

    #[inline]
    pub fn origin(&self) -> (f64, f64) {
        self.origin
    }

    #[inline]
    pub fn spacing(&self) -> (f64, f64) {
        self.spacing
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[self.shape.index(row, col)]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        let idx = self.shape.index(row, col);
        self.data[idx] = value;
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Owned row-major copy of the values.
    pub fn flatten(&self) -> Vec<f64> {
        self.data.clone()
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// One row as a slice.
    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.cols();
        &self.data[start..start + self.cols()]
    }

    /// Physical coordinates of a cell center.
    #[inline]
    pub fn cell_center(&self, row: usize, col: usize) -> (f64, f64) {
        (
            self.origin.0 + col as f64 * self.spacing.0,
            self.origin.1 + row as f64 * self.spacing.1,
        )
    }

    /// Extent spanned by the cell centers.
    pub fn bounds(&self) -> Bounds2D {
        let (x_last, y_last) = self.cell_center(
            self.rows().saturating_sub(1),
            self.cols().saturating_sub(1),
        );
        Bounds2D::new(self.origin.0, x_last, self.origin.1, y_last)
    }

    /// Smallest finite value, `None` if the grid holds none.
    pub fn min(&self) -> Option<f64> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .reduce(f64::min)
    }

    /// Largest finite value, `None` if the grid holds none.
    pub fn max(&self) -> Option<f64> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .reduce(f64::max)
    }

    /// Mean of the finite values.
    pub fn mean(&self) -> Option<f64> {
        let (sum, n) = self
            .data
            .iter()
            .filter(|v| v.is_finite())
            .fold((0.0, 0usize), |(s, n), &v| (s + v, n + 1));
        (n > 0).then(|| sum / n as f64)
    }

    /// Sign-flipped copy: depths become elevations and vice versa.
    pub fn negated(&self) -> Self {
        Self {
            data: self.data.iter().map(|v| -v).collect(),
            shape: self.shape,
            origin: self.origin,
            spacing: self.spacing,
        }
    }
}
