//! Setup parameters and initialization arguments.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::traits::BmiError;

/// A single setup parameter value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<f64> for ParameterValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for ParameterValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<usize> for ParameterValue {
    fn from(v: usize) -> Self {
        Self::Int(v as i64)
    }
}

impl From<&str> for ParameterValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Named setup parameters, kept in insertion order.
///
/// Setting an existing name replaces its value in place.
///
/// # Example
///
/// ```
/// use shoreline_coupler::bmi::ParameterSet;
///
/// let params = ParameterSet::new()
///     .with("number_of_rows", 120_usize)
///     .with("grid_spacing", 100.0);
/// assert_eq!(params.int("number_of_rows").unwrap(), 120);
/// assert_eq!(params.float("grid_spacing").unwrap(), 100.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    entries: Vec<(String, ParameterValue)>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`ParameterSet::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ParameterValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Floating-point value; integers are widened.
    pub fn float(&self, name: &str) -> Result<f64, BmiError> {
        match self.get(name) {
            Some(ParameterValue::Float(v)) => Ok(*v),
            Some(ParameterValue::Int(v)) => Ok(*v as f64),
            Some(other) => Err(BmiError::ParameterType {
                name: name.to_string(),
                expected: "float",
                found: other.to_string(),
            }),
            None => Err(BmiError::MissingParameter(name.to_string())),
        }
    }

    /// Integer value; floats are rejected.
    pub fn int(&self, name: &str) -> Result<i64, BmiError> {
        match self.get(name) {
            Some(ParameterValue::Int(v)) => Ok(*v),
            Some(other) => Err(BmiError::ParameterType {
                name: name.to_string(),
                expected: "integer",
                found: other.to_string(),
            }),
            None => Err(BmiError::MissingParameter(name.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

/// Arguments produced by `setup` and consumed by `initialize`.
///
/// Models backed by an on-disk configuration fill in `config_file` and
/// `run_dir`; in-process models usually carry the parameters directly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InitArgs {
    /// Configuration file written during setup
    pub config_file: Option<PathBuf>,
    /// Working directory the model should run in
    pub run_dir: Option<PathBuf>,
    /// Resolved parameters
    pub parameters: ParameterSet,
}

impl InitArgs {
    /// Arguments that only carry parameters.
    pub fn from_parameters(parameters: ParameterSet) -> Self {
        Self {
            config_file: None,
            run_dir: None,
            parameters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_in_place() {
        let mut params = ParameterSet::new().with("a", 1.0).with("b", 2.0);
        params.set("a", 3.0);

        let names: Vec<&str> = params.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(params.float("a").unwrap(), 3.0);
    }

    #[test]
    fn test_int_widens_to_float() {
        let params = ParameterSet::new().with("rows", 10_usize);
        assert_eq!(params.float("rows").unwrap(), 10.0);
    }

    #[test]
    fn test_float_is_not_int() {
        let params = ParameterSet::new().with("rows", 10.5);
        assert!(matches!(
            params.int("rows"),
            Err(BmiError::ParameterType { .. })
        ));
    }

    #[test]
    fn test_missing_parameter() {
        let params = ParameterSet::new();
        assert!(matches!(
            params.float("shelf_slope"),
            Err(BmiError::MissingParameter(name)) if name == "shelf_slope"
        ));
    }
}
