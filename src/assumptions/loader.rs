//! CSV-based assumption loader
//!
//! Loads statutory parameters from `statutory_parameters.csv` in
//! data/assumptions/

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default path to assumptions directory
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions";

/// File holding `parameter,value` rows
pub const STATUTORY_PARAMETERS_FILE: &str = "statutory_parameters.csv";

/// Errors raised while reading assumption files
#[derive(Debug, Error)]
pub enum AssumptionsError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("parameter `{parameter}` has non-numeric value `{value}`")]
    InvalidValue { parameter: String, value: String },

    #[error("row {row} in {path} must have a parameter and a value")]
    MissingColumn { path: PathBuf, row: usize },

    #[error("unknown statutory parameter `{parameter}`")]
    UnknownParameter { parameter: String },
}

/// Load statutory parameters from CSV
/// Returns HashMap<parameter_name, value>
pub fn load_statutory_parameters(path: &Path) -> Result<HashMap<String, f64>, AssumptionsError> {
    let file_path = path.join(STATUTORY_PARAMETERS_FILE);
    let file = File::open(&file_path).map_err(|source| AssumptionsError::Io {
        path: file_path.clone(),
        source,
    })?;
    load_statutory_parameters_from_reader(file, &file_path)
}

/// Load statutory parameters from any reader; `origin` is only used in errors
pub fn load_statutory_parameters_from_reader<R: std::io::Read>(
    reader: R,
    origin: &Path,
) -> Result<HashMap<String, f64>, AssumptionsError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut parameters = HashMap::new();

    for (index, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|source| AssumptionsError::Csv {
            path: origin.to_path_buf(),
            source,
        })?;

        let (name, raw) = match (record.get(0), record.get(1)) {
            (Some(name), Some(raw)) => (name.trim(), raw.trim()),
            _ => {
                return Err(AssumptionsError::MissingColumn {
                    path: origin.to_path_buf(),
                    row: index + 1,
                })
            }
        };

        let value: f64 = raw.parse().map_err(|_| AssumptionsError::InvalidValue {
            parameter: name.to_string(),
            value: raw.to_string(),
        })?;
        parameters.insert(name.to_string(), value);
    }

    log::debug!("loaded {} statutory parameters from {}", parameters.len(), origin.display());
    Ok(parameters)
}

/// Raw assumption values as read from disk
#[derive(Debug, Clone, Default)]
pub struct LoadedAssumptions {
    pub statutory_parameters: HashMap<String, f64>,
}

impl LoadedAssumptions {
    /// Load all assumptions from the default path
    pub fn load_default() -> Result<Self, AssumptionsError> {
        Self::load_from(Path::new(DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load all assumptions from a specific path
    pub fn load_from(path: &Path) -> Result<Self, AssumptionsError> {
        Ok(Self {
            statutory_parameters: load_statutory_parameters(path)?,
        })
    }

    /// Look up a single parameter
    pub fn get(&self, parameter: &str) -> Option<f64> {
        self.statutory_parameters.get(parameter).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_assumptions() {
        let result = LoadedAssumptions::load_default();
        assert!(result.is_ok(), "Failed to load assumptions: {:?}", result.err());

        let loaded = result.unwrap();
        assert_eq!(loaded.get("copyright_cost_rate"), Some(0.5));
        assert_eq!(loaded.get("copyright_exempt_cap_annual"), Some(120_000.0));
        assert_eq!(loaded.get("payout_indexation_rate"), Some(0.03));
    }

    #[test]
    fn test_load_from_reader() {
        let data = "parameter,value\npayout_indexation_rate,0.025\ncopyright_exempt_cap_annual, 90000\n";
        let params = load_statutory_parameters_from_reader(data.as_bytes(), Path::new("inline")).unwrap();

        assert_eq!(params.len(), 2);
        assert_eq!(params["payout_indexation_rate"], 0.025);
        assert_eq!(params["copyright_exempt_cap_annual"], 90_000.0);
    }

    #[test]
    fn test_non_numeric_value_rejected() {
        let data = "parameter,value\npayout_indexation_rate,three percent\n";
        let err = load_statutory_parameters_from_reader(data.as_bytes(), Path::new("inline")).unwrap_err();

        assert!(matches!(err, AssumptionsError::InvalidValue { ref parameter, .. } if parameter == "payout_indexation_rate"));
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let err = LoadedAssumptions::load_from(Path::new("does/not/exist")).unwrap_err();
        assert!(matches!(err, AssumptionsError::Io { .. }));
    }
}
