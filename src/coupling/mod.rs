//! Coupling driver for the shoreline and wave models.
//!
//! This module provides:
//! - [`initialize_models`] / [`finalize_models`]: model lifecycle around a run
//! - [`CoupledRun`]: the wave → shoreline time loop with periodic rendering
//! - [`FrameObserver`]: frame sinks ([`VtkFrameWriter`], [`FrameLog`], closures)
//! - [`ShorelineDiagnostics`] and [`ProgressReporter`]
//!
//! # Example
//!
//! ```ignore
//! use shoreline_coupler::coupling::{initialize_models, CoupledRun, VtkFrameWriter};
//!
//! initialize_models(&params, &domain, &mut cem, &mut waves)?;
//! let mut run = CoupledRun::new(cem, waves, domain).with_render_interval(1000);
//! let mut writer = VtkFrameWriter::new("output", "coast")?;
//! let result = run.run(3650, &mut writer)?;
//! ```

mod diagnostics;
mod observer;
mod runner;

pub use diagnostics::{ProgressReporter, ShorelineDiagnostics};
pub use observer::{Frame, FrameLog, FrameObserver, NoFrames, VtkFrameWriter};
pub use runner::{
    CoupledRun, CouplingError, CouplingResult, DEFAULT_RENDER_INTERVAL, finalize_models,
    initialize_models, shoreline_setup_parameters,
};
