//! Coupled loop with stand-in models.
//!
//! Builds a Dean-profile grid for a synthetic curved shoreline, initializes
//! two toy models through the coupling interface and runs the wave →
//! shoreline loop, writing VTK frames to `output/`.
//!
//! The toy shoreline model only erodes the first land cell of each column
//! a little whenever waves arrive from that side; it stands in for CEM so the
//! plumbing can be exercised without the real model.
//!
//! ```text
//! cargo run --example coupled_loop
//! ```

use shoreline_coupler::bmi::{Bmi, BmiError, InitArgs, ModelInfo, ParameterSet, names};
use shoreline_coupler::config::CoastConfig;
use shoreline_coupler::coupling::{
    CoupledRun, Frame, FrameLog, FrameObserver, VtkFrameWriter, finalize_models, initialize_models,
};
use shoreline_coupler::grid::DeanProfileBuilder;
use shoreline_coupler::CouplingError;

/// Wave angle alternating with a fixed pseudo-random sequence.
struct ToyWaves {
    asymmetry: f64,
    highness: f64,
    state: u64,
    angle: f64,
    time: f64,
}

impl ToyWaves {
    fn new() -> Self {
        Self {
            asymmetry: 0.5,
            highness: 0.2,
            state: 0x2545_f491_4f6c_dd1d,
            angle: 0.0,
            time: 0.0,
        }
    }

    fn next_unit(&mut self) -> f64 {
        // xorshift64
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        (self.state >> 11) as f64 / (1u64 << 53) as f64
    }
}

impl ModelInfo for ToyWaves {
    fn component_name(&self) -> &str {
        "toy-waves"
    }
    fn input_var_names(&self) -> &[&'static str] {
        &[
            names::WAVE_HEIGHT,
            names::WAVE_PERIOD,
            names::WAVE_ANGLE_HIGHNESS,
            names::WAVE_ANGLE_ASYMMETRY,
        ]
    }
    fn output_var_names(&self) -> &[&'static str] {
        &[names::WAVE_ANGLE]
    }
}

impl Bmi for ToyWaves {
    fn setup(&mut self, params: &ParameterSet) -> Result<InitArgs, BmiError> {
        Ok(InitArgs::from_parameters(params.clone()))
    }

    fn initialize(&mut self, _args: InitArgs) -> Result<(), BmiError> {
        Ok(())
    }

    fn update(&mut self) -> Result<(), BmiError> {
        let left = self.next_unit() < self.asymmetry;
        let high = self.next_unit() < self.highness;
        let magnitude = if high {
            0.25 + 0.25 * self.next_unit()
        } else {
            0.25 * self.next_unit()
        };
        self.angle = std::f64::consts::PI * if left { magnitude } else { -magnitude };
        self.time += 1.0;
        Ok(())
    }

    fn value_len(&self, name: &str) -> Result<usize, BmiError> {
        if name == names::WAVE_ANGLE || self.input_var_names().iter().any(|n| *n == name) {
            Ok(1)
        } else {
            Err(BmiError::UnknownVariable(name.to_string()))
        }
    }

    fn get_value_into(&self, name: &str, dest: &mut [f64]) -> Result<(), BmiError> {
        match name {
            names::WAVE_ANGLE => {
                dest[0] = self.angle;
                Ok(())
            }
            _ => Err(BmiError::UnknownVariable(name.to_string())),
        }
    }

    fn set_value(&mut self, name: &str, src: &[f64]) -> Result<(), BmiError> {
        match name {
            names::WAVE_ANGLE_ASYMMETRY => self.asymmetry = src[0],
            names::WAVE_ANGLE_HIGHNESS => self.highness = src[0],
            names::WAVE_HEIGHT | names::WAVE_PERIOD => {}
            _ => return Err(BmiError::UnknownVariable(name.to_string())),
        }
        Ok(())
    }

    fn current_time(&self) -> f64 {
        self.time
    }
}

/// Land-surface elevation nudged by incoming wave angle.
struct ToyShoreline {
    rows: usize,
    cols: usize,
    elevation: Vec<f64>,
    angle: f64,
    time: f64,
}

impl ToyShoreline {
    fn new() -> Self {
        Self {
            rows: 0,
            cols: 0,
            elevation: Vec::new(),
            angle: 0.0,
            time: 0.0,
        }
    }
}

impl ModelInfo for ToyShoreline {
    fn component_name(&self) -> &str {
        "toy-shoreline"
    }
    fn input_var_names(&self) -> &[&'static str] {
        &[names::LAND_ELEVATION, names::WAVE_ANGLE]
    }
    fn output_var_names(&self) -> &[&'static str] {
        &[names::WATER_DEPTH, names::LAND_ELEVATION]
    }
}

impl Bmi for ToyShoreline {
    fn setup(&mut self, params: &ParameterSet) -> Result<InitArgs, BmiError> {
        Ok(InitArgs::from_parameters(params.clone()))
    }

    fn initialize(&mut self, args: InitArgs) -> Result<(), BmiError> {
        self.rows = args.parameters.int(names::NUMBER_OF_ROWS)? as usize;
        self.cols = args.parameters.int(names::NUMBER_OF_COLS)? as usize;
        self.elevation = vec![0.0; self.rows * self.cols];
        Ok(())
    }

    fn update(&mut self) -> Result<(), BmiError> {
        // Waves from the left erode the left half of the coast, and vice versa
        let (start, end) = if self.angle > 0.0 {
            (0, self.cols / 2)
        } else {
            (self.cols / 2, self.cols)
        };
        for col in start..end {
            let shore = (0..self.rows).find(|&r| self.elevation[r * self.cols + col] >= 1.0);
            if let Some(row) = shore {
                self.elevation[row * self.cols + col] -= 0.01 * self.angle.abs();
            }
        }
        self.time += 1.0;
        Ok(())
    }

    fn value_len(&self, name: &str) -> Result<usize, BmiError> {
        match name {
            names::WATER_DEPTH | names::LAND_ELEVATION => Ok(self.elevation.len()),
            names::WAVE_ANGLE => Ok(1),
            _ => Err(BmiError::UnknownVariable(name.to_string())),
        }
    }

    fn get_value_into(&self, name: &str, dest: &mut [f64]) -> Result<(), BmiError> {
        if dest.len() != self.elevation.len() {
            return Err(BmiError::SizeMismatch {
                name: name.to_string(),
                expected: self.elevation.len(),
                actual: dest.len(),
            });
        }
        match name {
            names::WATER_DEPTH => {
                for (d, z) in dest.iter_mut().zip(&self.elevation) {
                    *d = -z;
                }
                Ok(())
            }
            names::LAND_ELEVATION => {
                dest.copy_from_slice(&self.elevation);
                Ok(())
            }
            _ => Err(BmiError::UnknownVariable(name.to_string())),
        }
    }

    fn set_value(&mut self, name: &str, src: &[f64]) -> Result<(), BmiError> {
        match name {
            names::WAVE_ANGLE => self.angle = src[0],
            names::LAND_ELEVATION => {
                if src.len() != self.elevation.len() {
                    return Err(BmiError::SizeMismatch {
                        name: name.to_string(),
                        expected: self.elevation.len(),
                        actual: src.len(),
                    });
                }
                self.elevation.copy_from_slice(src);
            }
            _ => return Err(BmiError::UnknownVariable(name.to_string())),
        }
        Ok(())
    }

    fn current_time(&self) -> f64 {
        self.time
    }
}

/// Forwards frames to two observers.
struct Both<A, B>(A, B);

impl<A: FrameObserver, B: FrameObserver> FrameObserver for Both<A, B> {
    fn on_frame(&mut self, frame: &Frame<'_>) -> Result<(), CouplingError> {
        self.0.on_frame(frame)?;
        self.1.on_frame(frame)
    }

    fn finish(&mut self) -> Result<(), CouplingError> {
        self.0.finish()?;
        self.1.finish()
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = CoastConfig::default();

    // Gently curved barrier coast, 20 km alongshore, closed landward
    let n = 201;
    let mut x: Vec<f64> = (0..n).map(|i| i as f64 * 100.0).collect();
    let mut y: Vec<f64> = x
        .iter()
        .map(|&xi| 3000.0 + 400.0 * (xi / 20_000.0 * std::f64::consts::PI).sin())
        .collect();
    x.extend([20_000.0, 0.0]);
    y.extend([0.0, 0.0]);

    let spacing = config.parameters.grid_spacing;
    let profile = DeanProfileBuilder::new(spacing, spacing).build(&x, &y)?;
    let domain = profile.to_elevation();
    println!("{}", profile.land.statistics());

    let mut cem = ToyShoreline::new();
    let mut waves = ToyWaves::new();
    initialize_models(&config.parameters, &domain, &mut cem, &mut waves)?;

    let mut observer = Both(
        VtkFrameWriter::new(&config.run.output_dir, "coast")?,
        FrameLog::new(config.run.land_threshold),
    );
    let mut run = CoupledRun::new(cem, waves, domain)
        .with_run_config(&config.run)
        .with_render_interval(365)
        .with_progress(10);
    let result = run.run(config.run.iterations, &mut observer)?;

    println!(
        "{} steps, {} frames, last wave angle {:.3} rad, {:.2}s",
        result.n_steps,
        result.frames,
        result.last_wave_angle.unwrap_or(0.0),
        result.wall_time
    );

    let (mut cem, mut waves, _) = run.into_parts();
    finalize_models(&mut cem, &mut waves)?;
    Ok(())
}
