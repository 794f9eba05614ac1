//! Model-coupling traits.
//!
//! This module defines the interface the coupling driver expects from the
//! external shoreline and wave models.

use thiserror::Error;

use super::params::{InitArgs, ParameterSet};

/// Errors raised by, or on behalf of, a coupled model.
#[derive(Debug, Error)]
pub enum BmiError {
    /// The model does not expose a variable with this name
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    /// A value array has the wrong number of items
    #[error("Size mismatch for '{name}': expected {expected} values, got {actual}")]
    SizeMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// An operation was called before `initialize`
    #[error("Model '{0}' is not initialized")]
    NotInitialized(String),

    /// A required setup parameter is absent
    #[error("Missing setup parameter: {0}")]
    MissingParameter(String),

    /// A setup parameter has the wrong type
    #[error("Setup parameter '{name}' should be {expected}, found {found}")]
    ParameterType {
        name: String,
        expected: &'static str,
        found: String,
    },

    /// Failure reported by the model itself
    #[error("{component}: {message}")]
    Model { component: String, message: String },

    /// I/O error (configuration files, run directories)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BmiError {
    /// Shorthand for [`BmiError::Model`].
    pub fn model(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Model {
            component: component.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// ModelInfo Trait (non-generic, dyn-compatible)
// =============================================================================

/// Descriptive information about a coupled model.
pub trait ModelInfo {
    /// Human-readable component name for logging.
    fn component_name(&self) -> &str;

    /// Variables the model accepts through `set_value`.
    fn input_var_names(&self) -> &[&'static str];

    /// Variables the model reports through `get_value`.
    fn output_var_names(&self) -> &[&'static str];

    /// Unit of model time. Both coupled models count in days.
    fn time_units(&self) -> &str {
        "d"
    }
}

// =============================================================================
// Bmi Trait
// =============================================================================

/// The generic "set a named value / get a named value / advance one step"
/// protocol of an external model.
///
/// Values are exchanged as flat `f64` slices. Grid variables are row-major.
///
/// # Example Implementation
///
/// ```ignore
/// impl Bmi for ConstantWaves {
///     fn setup(&mut self, params: &ParameterSet) -> Result<InitArgs, BmiError> {
///         Ok(InitArgs::from_parameters(params.clone()))
///     }
///
///     fn update(&mut self) -> Result<(), BmiError> {
///         self.time += 1.0;
///         Ok(())
///     }
///     // ...
/// }
/// ```
pub trait Bmi: ModelInfo {
    /// Turn setup parameters into initialization arguments.
    fn setup(&mut self, params: &ParameterSet) -> Result<InitArgs, BmiError>;

    /// Prepare the model to run.
    fn initialize(&mut self, args: InitArgs) -> Result<(), BmiError>;

    /// Advance the model by one time step.
    fn update(&mut self) -> Result<(), BmiError>;

    /// Release model resources.
    ///
    /// Default implementation does nothing.
    fn finalize(&mut self) -> Result<(), BmiError> {
        Ok(())
    }

    /// Number of values held by a variable.
    fn value_len(&self, name: &str) -> Result<usize, BmiError>;

    /// Copy the current values of a variable into `dest`.
    ///
    /// `dest` must hold exactly [`Bmi::value_len`] items.
    fn get_value_into(&self, name: &str, dest: &mut [f64]) -> Result<(), BmiError>;

    /// Overwrite the values of a variable.
    fn set_value(&mut self, name: &str, src: &[f64]) -> Result<(), BmiError>;

    /// Current values of a variable as a new array.
    fn get_value(&self, name: &str) -> Result<Vec<f64>, BmiError> {
        let mut values = vec![0.0; self.value_len(name)?];
        self.get_value_into(name, &mut values)?;
        Ok(values)
    }

    /// Current model time in [`ModelInfo::time_units`].
    fn current_time(&self) -> f64 {
        0.0
    }

    /// Length of one `update` in [`ModelInfo::time_units`].
    fn time_step(&self) -> f64 {
        1.0
    }
}

impl<M: Bmi + ?Sized> ModelInfo for Box<M> {
    fn component_name(&self) -> &str {
        (**self).component_name()
    }

    fn input_var_names(&self) -> &[&'static str] {
        (**self).input_var_names()
    }

    fn output_var_names(&self) -> &[&'static str] {
        (**self).output_var_names()
    }

    fn time_units(&self) -> &str {
        (**self).time_units()
    }
}

impl<M: Bmi + ?Sized> Bmi for Box<M> {
    fn setup(&mut self, params: &ParameterSet) -> Result<InitArgs, BmiError> {
        (**self).setup(params)
    }

    fn initialize(&mut self, args: InitArgs) -> Result<(), BmiError> {
        (**self).initialize(args)
    }

    fn update(&mut self) -> Result<(), BmiError> {
        (**self).update()
    }

    fn finalize(&mut self) -> Result<(), BmiError> {
        (**self).finalize()
    }

    fn value_len(&self, name: &str) -> Result<usize, BmiError> {
        (**self).value_len(name)
    }

    fn get_value_into(&self, name: &str, dest: &mut [f64]) -> Result<(), BmiError> {
        (**self).get_value_into(name, dest)
    }

    fn set_value(&mut self, name: &str, src: &[f64]) -> Result<(), BmiError> {
        (**self).set_value(name, src)
    }

    fn get_value(&self, name: &str) -> Result<Vec<f64>, BmiError> {
        (**self).get_value(name)
    }

    fn current_time(&self) -> f64 {
        (**self).current_time()
    }

    fn time_step(&self) -> f64 {
        (**self).time_step()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Holds one scalar and counts updates.
    struct Counter {
        value: f64,
        steps: usize,
    }

    impl ModelInfo for Counter {
        fn component_name(&self) -> &str {
            "counter"
        }
        fn input_var_names(&self) -> &[&'static str] {
            &["value"]
        }
        fn output_var_names(&self) -> &[&'static str] {
            &["value"]
        }
    }

    impl Bmi for Counter {
        fn setup(&mut self, params: &ParameterSet) -> Result<InitArgs, BmiError> {
            Ok(InitArgs::from_parameters(params.clone()))
        }
        fn initialize(&mut self, args: InitArgs) -> Result<(), BmiError> {
            self.value = args.parameters.float("value").unwrap_or(0.0);
            Ok(())
        }
        fn update(&mut self) -> Result<(), BmiError> {
            self.steps += 1;
            Ok(())
        }
        fn value_len(&self, name: &str) -> Result<usize, BmiError> {
            match name {
                "value" => Ok(1),
                _ => Err(BmiError::UnknownVariable(name.to_string())),
            }
        }
        fn get_value_into(&self, name: &str, dest: &mut [f64]) -> Result<(), BmiError> {
            let n = self.value_len(name)?;
            if dest.len() != n {
                return Err(BmiError::SizeMismatch {
                    name: name.to_string(),
                    expected: n,
                    actual: dest.len(),
                });
            }
            dest[0] = self.value;
            Ok(())
        }
        fn set_value(&mut self, name: &str, src: &[f64]) -> Result<(), BmiError> {
            self.value_len(name)?;
            self.value = src[0];
            Ok(())
        }
        fn current_time(&self) -> f64 {
            self.steps as f64 * self.time_step()
        }
    }

    #[test]
    fn test_default_get_value_allocates() {
        let mut model = Counter { value: 0.0, steps: 0 };
        let args = model.setup(&ParameterSet::new().with("value", 2.5)).unwrap();
        model.initialize(args).unwrap();
        assert_eq!(model.get_value("value").unwrap(), vec![2.5]);
    }

    #[test]
    fn test_unknown_variable() {
        let model = Counter { value: 0.0, steps: 0 };
        let err = model.get_value("nope").unwrap_err();
        assert!(matches!(err, BmiError::UnknownVariable(_)));
    }

    #[test]
    fn test_boxed_model_forwards() {
        let mut model: Box<dyn Bmi> = Box::new(Counter { value: 1.0, steps: 0 });
        model.update().unwrap();
        model.update().unwrap();
        assert_eq!(model.current_time(), 2.0);
        assert_eq!(model.component_name(), "counter");
        assert_eq!(model.time_units(), "d");
    }
}
