//! Consumer side of the model-coupling interface (BMI).
//!
//! The shoreline model (CEM) and the wave-climate model are external and
//! opaque. Everything this crate needs from them goes through a small
//! protocol:
//!
//! - `setup(params)` turns a parameter set into initialization arguments
//! - `initialize(args)` prepares the model to run
//! - `get_value(name)` / `set_value(name, values)` exchange flat `f64` arrays
//!   keyed by standard variable names (see [`names`])
//! - `update()` advances the model by one time step
//!
//! # Key Traits
//!
//! - [`ModelInfo`]: descriptive metadata, dyn-compatible
//! - [`Bmi`]: the operations above
//!
//! # Example
//! ```ignore
//! use shoreline_coupler::bmi::{Bmi, ParameterSet, names};
//!
//! let args = waves.setup(&ParameterSet::new())?;
//! waves.initialize(args)?;
//! waves.set_value(names::WAVE_HEIGHT, &[2.0])?;
//! waves.update()?;
//! let angle = waves.get_value(names::WAVE_ANGLE)?;
//! ```

pub mod names;
mod params;
mod traits;

pub use params::{InitArgs, ParameterSet, ParameterValue};
pub use traits::{Bmi, BmiError, ModelInfo};
