//! Beach-profile grid generation from surveyed shoreline vertices.
//!
//! Every cell gets a water depth from the Dean equilibrium profile
//!
//! ```text
//! h(d) = A · d^(2/3)
//! ```
//!
//! where `d` is the distance from the cell center to the closest shoreline
//! vertex (searched within a square window) and `A` the profile shape
//! parameter. Cells inside the polygon closed by the shoreline are land and
//! share a single height one `land_offset` above the shallowest land-cell
//! profile value.
//!
//! # Grid extent
//!
//! With shoreline extent `[x_min, x_max] × [y_min, y_max]`:
//!
//! ```text
//! x0 = trunc(ceil(x_min/dx)·dx)      x1 = x0 + trunc(ceil((x_max-x_min)/dx)·dx - trim·dx)
//! y0 = trunc(ceil(y_min/dy)·dy)      y1 = y0 + trunc(ceil((y_max-y_min)/dy)·dy + offshore)
//! ```
//!
//! Cell centers run over `x0, x0+dx, … < x1` and `y0, y0+dy, … < y1`. The grid
//! therefore extends `offshore` meters past the shoreline in +y and is
//! trimmed by `trim` cells alongshore.
//!
//! # Example
//!
//! ```ignore
//! use shoreline_coupler::grid::DeanProfileBuilder;
//!
//! let profile = DeanProfileBuilder::new(100.0, 100.0).build(&x, &y)?;
//! let depth = &profile.depth;          // water > 0, land <= -1
//! let elevation = profile.to_elevation(); // land >= 1, water <= 0
//! ```

use geo::{Contains, Coord, LineString, Point, Polygon};
use tracing::{debug, info};

use crate::grid::{ElevationGrid, GridError, LandMask, ShorelineIndex};
use crate::types::{Bounds2D, Depth, Elevation, GridShape};

/// Constants of the beach-profile construction.
#[derive(Clone, Debug, PartialEq)]
pub struct DeanProfileConfig {
    /// Dean shape parameter A (m^(1/3))
    pub shape_parameter: f64,
    /// Half-width of the square window searched for shoreline vertices (m)
    pub search_radius: f64,
    /// Squared distance of vertices outside the window (m²); caps every
    /// cell whose window misses part of the shoreline
    pub empty_window_distance_2: f64,
    /// Extra cross-shore extent beyond the shoreline (m)
    pub offshore_extent: f64,
    /// Cells removed from the alongshore extent
    pub alongshore_trim_cells: f64,
    /// Height of land above the shallowest land-cell profile value (m)
    pub land_offset: f64,
}

impl Default for DeanProfileConfig {
    fn default() -> Self {
        Self {
            shape_parameter: 0.1,
            search_radius: 100_000.0,
            empty_window_distance_2: 1.0e10,
            offshore_extent: 5000.0,
            alongshore_trim_cells: 2.0,
            land_offset: 1.0,
        }
    }
}

impl DeanProfileConfig {
    /// Profile depth at distance `d` from the shoreline.
    #[inline]
    pub fn profile_depth(&self, distance: f64) -> f64 {
        self.shape_parameter * distance.powf(2.0 / 3.0)
    }
}

/// Builds a [`BeachProfileGrid`] from shoreline vertices.
#[derive(Clone, Debug)]
pub struct DeanProfileBuilder {
    dx: f64,
    dy: f64,
    config: DeanProfileConfig,
}

impl DeanProfileBuilder {
    /// Builder with the default profile constants.
    pub fn new(dx: f64, dy: f64) -> Self {
        Self {
            dx,
            dy,
            config: DeanProfileConfig::default(),
        }
    }

    pub fn with_config(mut self, config: DeanProfileConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_shape_parameter(mut self, a: f64) -> Self {
        self.config.shape_parameter = a;
        self
    }

    pub fn with_offshore_extent(mut self, meters: f64) -> Self {
        self.config.offshore_extent = meters;
        self
    }

    pub fn config(&self) -> &DeanProfileConfig {
        &self.config
    }

    /// Cell-center coordinates along x and y for a shoreline extent.
    pub fn axes(&self, bounds: &Bounds2D) -> (Vec<f64>, Vec<f64>) {
        let (dx, dy) = (self.dx, self.dy);
        let trim = self.config.alongshore_trim_cells;

        let x0 = ((bounds.x_min / dx).ceil() * dx).trunc();
        let y0 = ((bounds.y_min / dy).ceil() * dy).trunc();
        let x1 = x0 + ((bounds.width() / dx).ceil() * dx - trim * dx).trunc();
        let y1 = y0 + ((bounds.height() / dy).ceil() * dy + self.config.offshore_extent).trunc();

        (arange(x0, x1, dx), arange(y0, y1, dy))
    }

    /// Convert shoreline vertices `(x[i], y[i])` into a gridded profile.
    ///
    /// # Errors
    /// - `InvalidSpacing` if `dx` or `dy` is not finite and positive
    /// - `InvalidShoreline` for mismatched lengths, fewer than three
    ///   vertices, or non-finite coordinates
    /// - `EmptyGrid` if the computed extent holds no cells
    pub fn build(&self, x: &[f64], y: &[f64]) -> Result<BeachProfileGrid, GridError> {
        let (dx, dy) = (self.dx, self.dy);
        if !(dx.is_finite() && dx > 0.0 && dy.is_finite() && dy > 0.0) {
            return Err(GridError::InvalidSpacing { dx, dy });
        }
        if x.len() != y.len() {
            return Err(GridError::InvalidShoreline(format!(
                "{} x values but {} y values",
                x.len(),
                y.len()
            )));
        }
        if x.len() < 3 {
            return Err(GridError::InvalidShoreline(format!(
                "need at least 3 vertices, got {}",
                x.len()
            )));
        }
        let bounds = Bounds2D::from_points(x, y).ok_or_else(|| {
            GridError::InvalidShoreline("non-finite coordinate".to_string())
        })?;

        let (x_coords, y_coords) = self.axes(&bounds);
        let shape = GridShape::new(y_coords.len(), x_coords.len());
        if shape.is_empty() {
            return Err(GridError::EmptyGrid {
                rows: shape.rows(),
                cols: shape.cols(),
            });
        }

        info!(
            rows = shape.rows(),
            cols = shape.cols(),
            vertices = x.len(),
            "building Dean profile grid"
        );

        let index = ShorelineIndex::new(x, y);
        let polygon = shoreline_polygon(x, y);

        let mut cells = vec![(0.0, false); shape.len()];
        self.fill_cells(&mut cells, &x_coords, &y_coords, &index, &polygon);

        // Land shares one height above the shallowest land-cell profile value
        let land_base = cells
            .iter()
            .filter(|(_, inside)| *inside)
            .map(|&(d, _)| self.config.profile_depth(d))
            .reduce(f64::min);

        let land_depth = land_base
            .map(|base| Elevation::new(base + self.config.land_offset).to_depth().meters());
        if let Some(value) = land_depth {
            debug!(land_depth = value, "land cells assigned");
        }

        let origin = (x_coords[0], y_coords[0]);
        let spacing = (dx, dy);

        let depth_values: Vec<f64> = cells
            .iter()
            .map(|&(d, inside)| match (inside, land_depth) {
                (true, Some(value)) => value,
                _ => self.config.profile_depth(d),
            })
            .collect();
        let distance_values: Vec<f64> = cells.iter().map(|&(d, _)| d).collect();
        let land_flags: Vec<bool> = cells.iter().map(|&(_, inside)| inside).collect();

        Ok(BeachProfileGrid {
            depth: ElevationGrid::from_vec(shape, origin, spacing, depth_values)?,
            distance: ElevationGrid::from_vec(shape, origin, spacing, distance_values)?,
            land: LandMask::from_flags(shape, land_flags, self.config.land_offset),
            x_coords,
            y_coords,
        })
    }

    /// Distance to shoreline and inside-polygon flag for one row of cells.
    fn fill_row(
        &self,
        y: f64,
        x_coords: &[f64],
        index: &ShorelineIndex,
        polygon: &Polygon<f64>,
        out: &mut [(f64, bool)],
    ) {
        let radius = self.config.search_radius;
        for (cell, &x) in out.iter_mut().zip(x_coords) {
            let d2 =
                index.windowed_distance_2(x, y, radius, self.config.empty_window_distance_2);
            *cell = (d2.sqrt(), polygon.contains(&Point::new(x, y)));
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn fill_cells(
        &self,
        cells: &mut [(f64, bool)],
        x_coords: &[f64],
        y_coords: &[f64],
        index: &ShorelineIndex,
        polygon: &Polygon<f64>,
    ) {
        for (row, chunk) in cells.chunks_mut(x_coords.len()).enumerate() {
            self.fill_row(y_coords[row], x_coords, index, polygon, chunk);
        }
    }

    #[cfg(feature = "parallel")]
    fn fill_cells(
        &self,
        cells: &mut [(f64, bool)],
        x_coords: &[f64],
        y_coords: &[f64],
        index: &ShorelineIndex,
        polygon: &Polygon<f64>,
    ) {
        use rayon::prelude::*;

        cells
            .par_chunks_mut(x_coords.len())
            .enumerate()
            .for_each(|(row, chunk)| {
                self.fill_row(y_coords[row], x_coords, index, polygon, chunk);
            });
    }
}

/// Polygon implicitly closed from the last shoreline vertex back to the first.
fn shoreline_polygon(x: &[f64], y: &[f64]) -> Polygon<f64> {
    let coords: Vec<Coord<f64>> = x
        .iter()
        .zip(y)
        .map(|(&px, &py)| Coord { x: px, y: py })
        .collect();
    Polygon::new(LineString::from(coords), vec![])
}

/// `start, start+step, … < stop`.
fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if stop <= start {
        return Vec::new();
    }
    // Tolerate round-off when the span is an exact multiple of the step
    let n = ((stop - start) / step - 1e-9).ceil().max(0.0) as usize;
    (0..n).map(|i| start + i as f64 * step).collect()
}

/// Gridded beach profile.
///
/// Fields are `(rows, cols) = (y, x)`, the transpose of an `ij`-indexed
/// `(nx, ny)` meshgrid.
#[derive(Clone, Debug)]
pub struct BeachProfileGrid {
    /// Depth below still water (water > 0, land <= -land_offset)
    pub depth: ElevationGrid,
    /// Distance from each cell center to the nearest shoreline vertex (m)
    pub distance: ElevationGrid,
    /// Cells inside the shoreline polygon
    pub land: LandMask,
    /// Cell-center x coordinates (one per column)
    pub x_coords: Vec<f64>,
    /// Cell-center y coordinates (one per row)
    pub y_coords: Vec<f64>,
}

impl BeachProfileGrid {
    pub fn shape(&self) -> GridShape {
        self.depth.shape()
    }

    /// Land-surface elevation as consumed by the shoreline model: land at or
    /// above `land_offset`, water at or below zero.
    pub fn to_elevation(&self) -> ElevationGrid {
        self.depth.negated()
    }

    /// Deepest water depth in the grid.
    pub fn max_depth(&self) -> Option<Depth> {
        self.depth.max().map(Depth::new)
    }
}
