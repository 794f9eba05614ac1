//! I/O utilities for reading and writing data files.
//!
//! This module provides:
//! - **Shoreline surveys**: ordered vertices from text tables or shapefiles
//! - **Coordinate projections**: WGS84 longitude/latitude to UTM meters
//! - **NDBC buoy data**: wave height and period for the wave forcing
//! - **ESRI ASCII grids**: exchange of depth/elevation rasters with GIS tools
//! - **VTK output**: ImageData frames and `.pvd` collections for ParaView
//!
//! # Example
//!
//! ```ignore
//! use shoreline_coupler::io::{read_shoreline_file, write_ascii_grid, UtmProjection};
//! use shoreline_coupler::grid::DeanProfileBuilder;
//!
//! let mut shoreline = read_shoreline_file("survey.csv")?;
//! if shoreline.looks_geographic() {
//!     shoreline = shoreline.project(&UtmProjection::for_lon_lat(shoreline.x[0], shoreline.y[0]));
//! }
//! let profile = DeanProfileBuilder::new(100.0, 100.0).build(&shoreline.x, &shoreline.y)?;
//! write_ascii_grid("depth.asc", &profile.depth)?;
//! ```

mod ascii_grid;
mod buoy;
mod projection;
mod shoreline;
mod vtk;

pub use ascii_grid::{
    AsciiGridError, DEFAULT_NODATA, parse_ascii_grid, read_ascii_grid, write_ascii_grid,
};
pub use buoy::{BuoyFileError, BuoyRecord, BuoySeries, BuoyStatistics, parse_buoy, read_buoy_file};
pub use projection::{CoordinateProjection, UtmProjection, zone_for_lon};
pub use shoreline::{
    Shoreline, ShorelineFileError, parse_shoreline, read_shoreline_file, read_shoreline_shapefile,
};
pub use vtk::{VtkError, series_path, write_pvd_collection, write_vtk_grid, write_vtk_series};
