//! Coupled-run tests with recording stand-in models.
//!
//! Both models append every interface call to a shared log so call order can
//! be checked against the expected coupling sequence.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use approx::assert_relative_eq;
use shoreline_coupler::bmi::{Bmi, BmiError, InitArgs, ModelInfo, ParameterSet, names};
use shoreline_coupler::config::{ModelParameters, RunConfig};
use shoreline_coupler::coupling::{
    CoupledRun, CouplingError, Frame, FrameLog, NoFrames, VtkFrameWriter, finalize_models,
    initialize_models,
};
use shoreline_coupler::grid::ElevationGrid;
use shoreline_coupler::types::GridShape;

type CallLog = Rc<RefCell<Vec<String>>>;

fn record(log: &CallLog, entry: impl Into<String>) {
    log.borrow_mut().push(entry.into());
}

/// Wave model whose angle is `0.1 * updates`.
struct RecordingWaves {
    log: CallLog,
    updates: usize,
    fail_on_update: Option<usize>,
    forcing: HashMap<String, f64>,
}

impl RecordingWaves {
    fn new(log: &CallLog) -> Self {
        Self {
            log: Rc::clone(log),
            updates: 0,
            fail_on_update: None,
            forcing: HashMap::new(),
        }
    }
}

impl ModelInfo for RecordingWaves {
    fn component_name(&self) -> &str {
        "mock-waves"
    }
    fn input_var_names(&self) -> &[&'static str] {
        &[names::WAVE_HEIGHT, names::WAVE_PERIOD]
    }
    fn output_var_names(&self) -> &[&'static str] {
        &[names::WAVE_ANGLE]
    }
}

impl Bmi for RecordingWaves {
    fn setup(&mut self, params: &ParameterSet) -> Result<InitArgs, BmiError> {
        record(&self.log, "waves.setup");
        Ok(InitArgs::from_parameters(params.clone()))
    }

    fn initialize(&mut self, _args: InitArgs) -> Result<(), BmiError> {
        record(&self.log, "waves.initialize");
        Ok(())
    }

    fn update(&mut self) -> Result<(), BmiError> {
        record(&self.log, "waves.update");
        if self.fail_on_update == Some(self.updates + 1) {
            return Err(BmiError::model("mock-waves", "no wave climate"));
        }
        self.updates += 1;
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), BmiError> {
        record(&self.log, "waves.finalize");
        Ok(())
    }

    fn value_len(&self, name: &str) -> Result<usize, BmiError> {
        match name {
            names::WAVE_ANGLE => Ok(1),
            _ => Err(BmiError::UnknownVariable(name.to_string())),
        }
    }

    fn get_value_into(&self, name: &str, dest: &mut [f64]) -> Result<(), BmiError> {
        record(&self.log, format!("waves.get {}", name));
        self.value_len(name)?;
        dest[0] = 0.1 * self.updates as f64;
        Ok(())
    }

    fn set_value(&mut self, name: &str, src: &[f64]) -> Result<(), BmiError> {
        record(&self.log, format!("waves.set {}", name));
        self.forcing.insert(name.to_string(), src[0]);
        Ok(())
    }
}

/// Shoreline model whose water depth is the number of updates in every cell.
struct RecordingShoreline {
    log: CallLog,
    setup_params: Option<ParameterSet>,
    fail_setup: bool,
    cells: usize,
    updates: usize,
    elevation: Vec<f64>,
    angles: Vec<f64>,
}

impl RecordingShoreline {
    fn new(log: &CallLog) -> Self {
        Self {
            log: Rc::clone(log),
            setup_params: None,
            fail_setup: false,
            cells: 0,
            updates: 0,
            elevation: Vec::new(),
            angles: Vec::new(),
        }
    }
}

impl ModelInfo for RecordingShoreline {
    fn component_name(&self) -> &str {
        "mock-cem"
    }
    fn input_var_names(&self) -> &[&'static str] {
        &[names::LAND_ELEVATION, names::WAVE_ANGLE]
    }
    fn output_var_names(&self) -> &[&'static str] {
        &[names::WATER_DEPTH]
    }
}

impl Bmi for RecordingShoreline {
    fn setup(&mut self, params: &ParameterSet) -> Result<InitArgs, BmiError> {
        record(&self.log, "cem.setup");
        if self.fail_setup {
            return Err(BmiError::MissingParameter("input file".to_string()));
        }
        self.setup_params = Some(params.clone());
        Ok(InitArgs::from_parameters(params.clone()))
    }

    fn initialize(&mut self, args: InitArgs) -> Result<(), BmiError> {
        record(&self.log, "cem.initialize");
        let rows = args.parameters.int(names::NUMBER_OF_ROWS)? as usize;
        let cols = args.parameters.int(names::NUMBER_OF_COLS)? as usize;
        self.cells = rows * cols;
        Ok(())
    }

    fn update(&mut self) -> Result<(), BmiError> {
        record(&self.log, "cem.update");
        self.updates += 1;
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), BmiError> {
        record(&self.log, "cem.finalize");
        Ok(())
    }

    fn value_len(&self, name: &str) -> Result<usize, BmiError> {
        match name {
            names::WATER_DEPTH | names::LAND_ELEVATION => Ok(self.cells),
            names::WAVE_ANGLE => Ok(1),
            _ => Err(BmiError::UnknownVariable(name.to_string())),
        }
    }

    fn get_value_into(&self, name: &str, dest: &mut [f64]) -> Result<(), BmiError> {
        record(&self.log, format!("cem.get {}", name));
        let n = self.value_len(name)?;
        if dest.len() != n {
            return Err(BmiError::SizeMismatch {
                name: name.to_string(),
                expected: n,
                actual: dest.len(),
            });
        }
        dest.fill(self.updates as f64);
        Ok(())
    }

    fn set_value(&mut self, name: &str, src: &[f64]) -> Result<(), BmiError> {
        record(&self.log, format!("cem.set {}", name));
        match name {
            names::WAVE_ANGLE => self.angles.push(src[0]),
            names::LAND_ELEVATION => self.elevation = src.to_vec(),
            _ => return Err(BmiError::UnknownVariable(name.to_string())),
        }
        Ok(())
    }

    fn current_time(&self) -> f64 {
        self.updates as f64
    }
}

fn domain() -> ElevationGrid {
    ElevationGrid::from_vec(
        GridShape::new(2, 3),
        (0.0, 0.0),
        (100.0, 100.0),
        vec![1.0, 1.0, 1.0, -2.0, -3.0, -4.0],
    )
    .unwrap()
}

fn initialized(log: &CallLog) -> (RecordingShoreline, RecordingWaves) {
    let mut cem = RecordingShoreline::new(log);
    let mut waves = RecordingWaves::new(log);
    initialize_models(&ModelParameters::default(), &domain(), &mut cem, &mut waves).unwrap();
    log.borrow_mut().clear();
    (cem, waves)
}

#[test]
fn test_initialize_call_order() {
    let log = CallLog::default();
    let mut cem = RecordingShoreline::new(&log);
    let mut waves = RecordingWaves::new(&log);
    initialize_models(&ModelParameters::default(), &domain(), &mut cem, &mut waves).unwrap();

    let expected = vec![
        "cem.setup".to_string(),
        "waves.setup".to_string(),
        "waves.initialize".to_string(),
        "cem.initialize".to_string(),
        format!("waves.set {}", names::WAVE_HEIGHT),
        format!("waves.set {}", names::WAVE_PERIOD),
        format!("waves.set {}", names::WAVE_ANGLE_HIGHNESS),
        format!("waves.set {}", names::WAVE_ANGLE_ASYMMETRY),
        format!("cem.set {}", names::LAND_ELEVATION),
    ];
    assert_eq!(*log.borrow(), expected);
}

#[test]
fn test_initialize_passes_parameters() {
    let log = CallLog::default();
    let mut cem = RecordingShoreline::new(&log);
    let mut waves = RecordingWaves::new(&log);
    let params = ModelParameters {
        grid_spacing: 50.0,
        wave_height: 1.5,
        wave_angle_asymmetry: 0.7,
        ..ModelParameters::default()
    };
    initialize_models(&params, &domain(), &mut cem, &mut waves).unwrap();

    let setup = cem.setup_params.as_ref().unwrap();
    assert_eq!(setup.int(names::NUMBER_OF_ROWS).unwrap(), 2);
    assert_eq!(setup.int(names::NUMBER_OF_COLS).unwrap(), 3);
    assert_eq!(setup.float(names::GRID_SPACING).unwrap(), 50.0);
    assert_eq!(setup.float(names::SHELF_SLOPE).unwrap(), 0.001);
    assert_eq!(setup.float(names::SHOREFACE_DEPTH).unwrap(), 10.0);
    assert_eq!(setup.float(names::SHOREFACE_SLOPE).unwrap(), 0.01);

    assert_eq!(waves.forcing[names::WAVE_HEIGHT], 1.5);
    assert_eq!(waves.forcing[names::WAVE_PERIOD], 7.0);
    assert_eq!(waves.forcing[names::WAVE_ANGLE_HIGHNESS], 0.2);
    assert_eq!(waves.forcing[names::WAVE_ANGLE_ASYMMETRY], 0.7);

    assert_eq!(cem.elevation, domain().as_slice());
    assert_eq!(cem.cells, 6);
}

#[test]
fn test_setup_failure_names_component() {
    let log = CallLog::default();
    let mut cem = RecordingShoreline::new(&log);
    cem.fail_setup = true;
    let mut waves = RecordingWaves::new(&log);

    let err = initialize_models(&ModelParameters::default(), &domain(), &mut cem, &mut waves)
        .unwrap_err();
    match err {
        CouplingError::Lifecycle {
            component, phase, ..
        } => {
            assert_eq!(component, "mock-cem");
            assert_eq!(phase, "setup");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(*log.borrow(), vec!["cem.setup".to_string()]);
}

#[test]
fn test_step_call_order() {
    let log = CallLog::default();
    let (cem, waves) = initialized(&log);

    let mut run = CoupledRun::new(cem, waves, domain()).with_render_interval(2);
    run.run(2, &mut NoFrames).unwrap();

    let expected = vec![
        // step 0 renders
        "waves.update".to_string(),
        format!("waves.get {}", names::WAVE_ANGLE),
        format!("cem.set {}", names::WAVE_ANGLE),
        "cem.update".to_string(),
        format!("cem.get {}", names::WATER_DEPTH),
        // step 1 does not
        "waves.update".to_string(),
        format!("waves.get {}", names::WAVE_ANGLE),
        format!("cem.set {}", names::WAVE_ANGLE),
        "cem.update".to_string(),
    ];
    assert_eq!(*log.borrow(), expected);
}

#[test]
fn test_render_interval_frames() {
    let log = CallLog::default();
    let (cem, waves) = initialized(&log);

    let mut seen = Vec::new();
    let mut observer = |frame: &Frame<'_>| -> Result<(), CouplingError> {
        seen.push((frame.step, frame.time, frame.field.get(1, 2)));
        Ok(())
    };

    let mut run = CoupledRun::new(cem, waves, domain()).with_render_interval(2);
    let result = run.run(5, &mut observer).unwrap();

    assert_eq!(seen, vec![(0, 1.0, 1.0), (2, 3.0, 3.0), (4, 5.0, 5.0)]);
    assert_eq!(result.n_steps, 5);
    assert_eq!(result.frames, 3);
    assert_eq!(result.model_time, 5.0);
    assert_relative_eq!(result.last_wave_angle.unwrap(), 0.5, epsilon = 1e-12);

    // Wave angle reaches the shoreline model every step
    let angles = &run.cem().angles;
    assert_eq!(angles.len(), 5);
    assert_relative_eq!(angles[0], 0.1, epsilon = 1e-12);
    assert_relative_eq!(angles[4], 0.5, epsilon = 1e-12);

    // Domain holds the last rendered depth
    assert!(run.domain().as_slice().iter().all(|&d| d == 5.0));
}

#[test]
fn test_without_animation_no_frames() {
    let log = CallLog::default();
    let (cem, waves) = initialized(&log);

    let mut calls = 0;
    let mut observer = |_: &Frame<'_>| -> Result<(), CouplingError> {
        calls += 1;
        Ok(())
    };

    let run_config = RunConfig {
        animate: false,
        ..RunConfig::default()
    };
    let mut run = CoupledRun::new(cem, waves, domain()).with_run_config(&run_config);
    let result = run.run(4, &mut observer).unwrap();

    assert_eq!(calls, 0);
    assert_eq!(result.frames, 0);
    assert_eq!(result.n_steps, 4);
    assert!(
        !log.borrow()
            .iter()
            .any(|entry| entry.contains(names::WATER_DEPTH))
    );
    // Domain untouched
    assert_eq!(run.domain().as_slice(), domain().as_slice());
}

#[test]
fn test_zero_render_interval_rejected() {
    let log = CallLog::default();
    let (cem, waves) = initialized(&log);

    let mut run = CoupledRun::new(cem, waves, domain()).with_render_interval(0);
    let err = run.run(3, &mut NoFrames).unwrap_err();

    assert!(matches!(err, CouplingError::InvalidInterval));
    assert!(log.borrow().is_empty());
}

#[test]
fn test_model_error_reports_step() {
    let log = CallLog::default();
    let (cem, mut waves) = initialized(&log);
    waves.fail_on_update = Some(3);

    let mut run = CoupledRun::new(cem, waves, domain()).with_render_interval(1);
    let err = run.run(10, &mut NoFrames).unwrap_err();

    match err {
        CouplingError::Model { step, source } => {
            assert_eq!(step, 2);
            assert!(matches!(source, BmiError::Model { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    // The shoreline model is not advanced after the failure
    assert_eq!(run.cem().updates, 2);
}

#[test]
fn test_observer_error_aborts_run() {
    let log = CallLog::default();
    let (cem, waves) = initialized(&log);

    let mut observer = |frame: &Frame<'_>| -> Result<(), CouplingError> {
        if frame.step >= 3 {
            Err(CouplingError::Observer("disk full".to_string()))
        } else {
            Ok(())
        }
    };

    let mut run = CoupledRun::new(cem, waves, domain()).with_render_interval(3);
    let err = run.run(10, &mut observer).unwrap_err();
    assert!(matches!(err, CouplingError::Observer(_)));
    assert_eq!(run.cem().updates, 4);
}

#[test]
fn test_frame_log_over_run() {
    let log = CallLog::default();
    let (cem, waves) = initialized(&log);

    let mut frame_log = FrameLog::new(1.0);
    let mut run = CoupledRun::new(cem, waves, domain()).with_render_interval(5);
    run.run(10, &mut frame_log).unwrap();

    let steps: Vec<usize> = frame_log.history().iter().map(|(s, _)| *s).collect();
    assert_eq!(steps, vec![0, 5]);
    // Positive depth everywhere means no land
    assert!(frame_log.history().iter().all(|(_, d)| d.land_cells == 0));
}

#[test]
fn test_vtk_frames_written() {
    let dir = tempfile::tempdir().unwrap();
    let log = CallLog::default();
    let (cem, waves) = initialized(&log);

    let mut writer = VtkFrameWriter::new(dir.path(), "coast").unwrap();
    let mut run = CoupledRun::new(cem, waves, domain()).with_render_interval(2);
    run.run(5, &mut writer).unwrap();

    assert_eq!(writer.entries().len(), 3);
    assert!(writer.entries().iter().all(|(_, path)| path.exists()));
    let pvd = std::fs::read_to_string(writer.pvd_path()).unwrap();
    assert_eq!(pvd.matches("<DataSet").count(), 3);
}

#[test]
fn test_boxed_models_and_finalize_order() {
    let log = CallLog::default();
    let mut cem: Box<dyn Bmi> = Box::new(RecordingShoreline::new(&log));
    let mut waves: Box<dyn Bmi> = Box::new(RecordingWaves::new(&log));
    initialize_models(&ModelParameters::default(), &domain(), &mut cem, &mut waves).unwrap();

    let mut run = CoupledRun::new(cem, waves, domain()).with_render_interval(1);
    let result = run.run(3, &mut NoFrames).unwrap();
    assert_eq!(result.frames, 3);

    let (mut cem, mut waves, field) = run.into_parts();
    assert!(field.as_slice().iter().all(|&d| d == 3.0));

    log.borrow_mut().clear();
    finalize_models(&mut cem, &mut waves).unwrap();
    assert_eq!(
        *log.borrow(),
        vec!["waves.finalize".to_string(), "cem.finalize".to_string()]
    );
}
