//! # shoreline-coupler
//!
//! Beach-profile grid generation and a coupling driver for an external
//! shoreline-change model (CEM) and an external wave-climate model.
//!
//! This crate provides:
//! - Dean-profile bathymetry grids built from shoreline surveys
//! - Land masks and shoreline diagnostics for elevation grids
//! - The model-coupling interface the external models are driven through
//! - Model initialization and the coupled wave → shoreline time loop
//! - Shoreline, NDBC buoy, ESRI ASCII and VTK file I/O
//! - JSON configuration of model parameters and run settings

pub mod bmi;
pub mod config;
pub mod coupling;
pub mod grid;
pub mod io;
pub mod types;

// Re-export main types for convenience
pub use bmi::{Bmi, BmiError, InitArgs, ModelInfo, ParameterSet, ParameterValue};
pub use config::{CoastConfig, ConfigError, ModelParameters, RunConfig};
pub use coupling::{
    CoupledRun, CouplingError, CouplingResult, Frame, FrameLog, FrameObserver, ProgressReporter,
    ShorelineDiagnostics, VtkFrameWriter, finalize_models, initialize_models,
};
pub use grid::{
    BeachProfileGrid, DEFAULT_LAND_THRESHOLD, DeanProfileBuilder, DeanProfileConfig,
    ElevationGrid, GridError, LandMask, LandMaskStatistics,
};
pub use io::{
    BuoySeries, CoordinateProjection, Shoreline, UtmProjection, read_ascii_grid, read_buoy_file,
    read_shoreline_file, read_shoreline_shapefile, write_ascii_grid, write_vtk_grid,
};
pub use types::{Bounds2D, Depth, Elevation, GridShape};
