//! Strongly-typed domain types for safer APIs.
//!
//! These newtypes keep the two sign conventions used by the coupled models
//! apart: the beach-profile builder produces depths (positive downward), while
//! the shoreline model consumes elevations (positive upward, land at or above
//! the land threshold).
//!
//! # Example
//!
//! ```
//! use shoreline_coupler::types::{Bounds2D, Depth, Elevation, GridShape};
//!
//! let bounds = Bounds2D::new(0.0, 10e3, 0.0, 5e3);
//! assert_eq!(bounds.width(), 10e3);
//!
//! let shape = GridShape::new(50, 100);
//! assert_eq!(shape.len(), 5000);
//!
//! // 3 m of water is an elevation of -3 m
//! let z: Elevation = Depth::new(3.0).to_elevation();
//! assert_eq!(z.meters(), -3.0);
//! ```

mod bounds;
mod physical;
mod shape;

pub use bounds::Bounds2D;
pub use physical::{Depth, Elevation};
pub use shape::GridShape;
