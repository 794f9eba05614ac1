//! Gridded elevation data for the shoreline model.
//!
//! This module provides:
//! - [`ElevationGrid`]: row-major 2D array of elevations or depths
//! - [`LandMask`]: land/water classification of a grid by threshold
//! - [`DeanProfileBuilder`]: conversion of surveyed shoreline vertices into a
//!   gridded beach profile (`h = A · d^(2/3)`)
//! - [`ShorelineIndex`]: nearest-shoreline-vertex queries for the builder
//!
//! # Example
//!
//! ```ignore
//! use shoreline_coupler::grid::{DeanProfileBuilder, LandMask};
//!
//! let profile = DeanProfileBuilder::new(100.0, 100.0).build(&x, &y)?;
//! let elevation = profile.to_elevation();
//! let mask = LandMask::from_grid(&elevation, 1.0);
//! println!("{}", mask.statistics());
//! ```

mod dean_profile;
mod elevation;
mod land_mask;
mod shoreline_index;

pub use dean_profile::{BeachProfileGrid, DeanProfileBuilder, DeanProfileConfig};
pub use elevation::{ElevationGrid, GridError};
pub use land_mask::{DEFAULT_LAND_THRESHOLD, LandMask, LandMaskStatistics};
pub use shoreline_index::ShorelineIndex;
