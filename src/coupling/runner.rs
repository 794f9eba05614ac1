//! Model initialization and the coupled time-stepping loop.
//!
//! Every iteration advances the wave model, hands its incoming wave angle to
//! the shoreline model, then advances the shoreline model. Every
//! `render_interval` iterations the shoreline model's water depth is read
//! back into the domain grid and passed to a [`FrameObserver`].

use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::diagnostics::ProgressReporter;
use super::observer::{Frame, FrameObserver};
use crate::bmi::{Bmi, BmiError, ParameterSet, names};
use crate::config::{ModelParameters, RunConfig};
use crate::grid::{DEFAULT_LAND_THRESHOLD, ElevationGrid};
use crate::io::VtkError;

/// Default render interval (iterations between frames).
pub const DEFAULT_RENDER_INTERVAL: usize = 1000;

/// Errors from initializing or running the coupled models.
#[derive(Debug, Error)]
pub enum CouplingError {
    /// Setup, initialization or finalization of a model failed
    #[error("{phase} of '{component}' failed: {source}")]
    Lifecycle {
        component: String,
        phase: &'static str,
        #[source]
        source: BmiError,
    },

    /// A model call failed during the time loop
    #[error("Time step {step}: {source}")]
    Model {
        step: usize,
        #[source]
        source: BmiError,
    },

    /// Frames cannot be rendered every zero iterations
    #[error("Render interval must be at least 1")]
    InvalidInterval,

    /// Writing frame output failed
    #[error("Frame output failed: {0}")]
    Output(#[from] VtkError),

    /// I/O error (output directories)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An observer rejected a frame
    #[error("Observer error: {0}")]
    Observer(String),
}

fn lifecycle<M: Bmi + ?Sized>(
    model: &M,
    phase: &'static str,
) -> impl FnOnce(BmiError) -> CouplingError + use<M> {
    let component = model.component_name().to_string();
    move |source| CouplingError::Lifecycle {
        component,
        phase,
        source,
    }
}

/// Parameters passed to the shoreline model's `setup`.
pub fn shoreline_setup_parameters(
    params: &ModelParameters,
    domain: &ElevationGrid,
) -> ParameterSet {
    ParameterSet::new()
        .with(names::NUMBER_OF_ROWS, domain.rows())
        .with(names::NUMBER_OF_COLS, domain.cols())
        .with(names::GRID_SPACING, params.grid_spacing)
        .with(names::SHELF_SLOPE, params.shelf_slope)
        .with(names::SHOREFACE_DEPTH, params.shoreface_depth)
        .with(names::SHOREFACE_SLOPE, params.shoreface_slope)
}

/// Set up and initialize both models and hand them their starting state.
///
/// `domain` holds land-surface elevation: values in `(-inf, 1]`, `1` meaning
/// land and anything lower water. Values above the land threshold are passed
/// through unchanged with a warning.
pub fn initialize_models<C, W>(
    params: &ModelParameters,
    domain: &ElevationGrid,
    cem: &mut C,
    waves: &mut W,
) -> Result<(), CouplingError>
where
    C: Bmi + ?Sized,
    W: Bmi + ?Sized,
{
    let above = domain
        .as_slice()
        .iter()
        .filter(|&&v| v > DEFAULT_LAND_THRESHOLD)
        .count();
    if above > 0 {
        warn!(
            "{} of {} domain cells exceed elevation {}; the shoreline model expects values <= {}",
            above,
            domain.len(),
            DEFAULT_LAND_THRESHOLD,
            DEFAULT_LAND_THRESHOLD
        );
    }

    info!(
        "Initializing '{}' on a {} grid and '{}'",
        cem.component_name(),
        domain.shape(),
        waves.component_name()
    );

    let cem_args = cem
        .setup(&shoreline_setup_parameters(params, domain))
        .map_err(lifecycle(cem, "setup"))?;

    let wave_args = waves
        .setup(&ParameterSet::new())
        .map_err(lifecycle(waves, "setup"))?;
    waves
        .initialize(wave_args)
        .map_err(lifecycle(waves, "initialize"))?;

    cem.initialize(cem_args)
        .map_err(lifecycle(cem, "initialize"))?;

    let forcing = [
        (names::WAVE_HEIGHT, params.wave_height),
        (names::WAVE_PERIOD, params.wave_period),
        (names::WAVE_ANGLE_HIGHNESS, params.wave_angle_highness),
        (names::WAVE_ANGLE_ASYMMETRY, params.wave_angle_asymmetry),
    ];
    for (name, value) in forcing {
        waves
            .set_value(name, &[value])
            .map_err(lifecycle(waves, "set_value"))?;
    }

    cem.set_value(names::LAND_ELEVATION, domain.as_slice())
        .map_err(lifecycle(cem, "set_value"))?;

    Ok(())
}

/// Finalize both models, wave model first.
pub fn finalize_models<C, W>(cem: &mut C, waves: &mut W) -> Result<(), CouplingError>
where
    C: Bmi + ?Sized,
    W: Bmi + ?Sized,
{
    waves.finalize().map_err(lifecycle(waves, "finalize"))?;
    cem.finalize().map_err(lifecycle(cem, "finalize"))?;
    Ok(())
}

/// Outcome of a coupled run.
#[derive(Clone, Debug)]
pub struct CouplingResult {
    /// Iterations completed
    pub n_steps: usize,
    /// Frames handed to the observer
    pub frames: usize,
    /// Wave angle of the final iteration (radians, first element)
    pub last_wave_angle: Option<f64>,
    /// Shoreline model time at the end of the run
    pub model_time: f64,
    /// Total wall-clock time in seconds
    pub wall_time: f64,
}

/// The coupled wave/shoreline loop.
///
/// Owns both models and the domain grid the depth field is read into.
///
/// # Example
///
/// ```ignore
/// let mut run = CoupledRun::new(cem, waves, domain)
///     .with_render_interval(365)
///     .with_progress(10);
/// let result = run.run(3650, &mut FrameLog::new(1.0))?;
/// ```
pub struct CoupledRun<C, W> {
    cem: C,
    waves: W,
    domain: ElevationGrid,
    render_interval: usize,
    animate: bool,
    progress_pct: Option<u32>,
}

impl<C: Bmi, W: Bmi> CoupledRun<C, W> {
    /// Create a run over initialized models.
    pub fn new(cem: C, waves: W, domain: ElevationGrid) -> Self {
        Self {
            cem,
            waves,
            domain,
            render_interval: DEFAULT_RENDER_INTERVAL,
            animate: true,
            progress_pct: None,
        }
    }

    /// Apply render settings from a run configuration.
    pub fn with_run_config(self, run: &RunConfig) -> Self {
        self.with_render_interval(run.render_interval)
            .with_animation(run.animate)
    }

    /// Render every `interval` iterations (validated when the run starts).
    pub fn with_render_interval(mut self, interval: usize) -> Self {
        self.render_interval = interval;
        self
    }

    /// Enable or disable frame rendering.
    pub fn with_animation(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }

    /// Log progress every `pct` percent.
    pub fn with_progress(mut self, pct: u32) -> Self {
        self.progress_pct = Some(pct);
        self
    }

    pub fn cem(&self) -> &C {
        &self.cem
    }

    pub fn waves(&self) -> &W {
        &self.waves
    }

    /// The domain grid as last rendered.
    pub fn domain(&self) -> &ElevationGrid {
        &self.domain
    }

    /// Release the models and domain, e.g. for [`finalize_models`].
    pub fn into_parts(self) -> (C, W, ElevationGrid) {
        (self.cem, self.waves, self.domain)
    }

    /// Read the shoreline model's water depth into the domain grid.
    pub fn refresh_domain(&mut self) -> Result<(), BmiError> {
        self.cem
            .get_value_into(names::WATER_DEPTH, self.domain.as_mut_slice())
    }

    /// Advance both models `iterations` times.
    ///
    /// Any model error aborts the run and reports the failing iteration.
    pub fn run<O>(
        &mut self,
        iterations: usize,
        observer: &mut O,
    ) -> Result<CouplingResult, CouplingError>
    where
        O: FrameObserver + ?Sized,
    {
        if self.render_interval == 0 {
            return Err(CouplingError::InvalidInterval);
        }

        let start_wall = Instant::now();
        let mut progress = self
            .progress_pct
            .map(|pct| ProgressReporter::new(iterations, pct));
        let mut frames = 0;
        let mut last_wave_angle = None;

        info!(
            "Starting coupled run: {} iterations, {}",
            iterations,
            if self.animate {
                format!("rendering every {}", self.render_interval)
            } else {
                "no rendering".to_string()
            }
        );

        for step in 0..iterations {
            let model_err = |source| CouplingError::Model { step, source };

            self.waves.update().map_err(model_err)?;
            let angle = self
                .waves
                .get_value(names::WAVE_ANGLE)
                .map_err(model_err)?;
            self.cem
                .set_value(names::WAVE_ANGLE, &angle)
                .map_err(model_err)?;
            self.cem.update().map_err(model_err)?;
            last_wave_angle = angle.first().copied();

            if self.animate {
                if step % self.render_interval == 0 {
                    self.refresh_domain().map_err(model_err)?;
                    debug!("Rendering frame {} at time step {}", frames, step);
                    let frame = Frame {
                        step,
                        time: self.cem.current_time(),
                        field: &self.domain,
                    };
                    observer.on_frame(&frame)?;
                    frames += 1;
                }
            } else {
                info!("Time Step: {} days", step);
            }

            if let Some(p) = progress.as_mut() {
                p.step();
                p.maybe_report(None);
            }
        }

        observer.finish()?;
        if let Some(p) = progress.as_ref() {
            p.finish();
        }

        Ok(CouplingResult {
            n_steps: iterations,
            frames,
            last_wave_angle,
            model_time: self.cem.current_time(),
            wall_time: start_wall.elapsed().as_secs_f64(),
        })
    }
}
