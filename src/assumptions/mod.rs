//! Statutory assumptions: creative-income exemption, payout indexation and
//! the salary normalization model

mod salary;
mod statutory;
pub mod loader;

pub use loader::{AssumptionsError, LoadedAssumptions};
pub use salary::{SalaryModel, SalaryPeriod, SalaryType};
pub use statutory::{CopyrightExemption, PayoutIndexation};

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Environment variable naming an assumptions directory
pub const ASSUMPTIONS_PATH_ENV: &str = "PENSION_ASSUMPTIONS_PATH";

/// Container for all projection assumptions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    pub copyright: CopyrightExemption,
    pub payout: PayoutIndexation,
    pub salary: SalaryModel,
}

impl Assumptions {
    /// Built-in statutory defaults
    pub fn default_statutory() -> Self {
        Self {
            copyright: CopyrightExemption::default(),
            payout: PayoutIndexation::default(),
            salary: SalaryModel::default(),
        }
    }

    /// Load assumptions from CSV files in the default location (data/assumptions/)
    pub fn from_csv() -> Result<Self, AssumptionsError> {
        Self::from_csv_path(Path::new(loader::DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load assumptions from CSV files in a specific directory
    ///
    /// Parameters missing from the file keep their built-in default.
    pub fn from_csv_path(path: &Path) -> Result<Self, AssumptionsError> {
        let loaded = LoadedAssumptions::load_from(path)?;
        Self::from_loaded(&loaded)
    }

    /// Build assumptions from loaded values
    ///
    /// Every parameter name must be known. Missing parameters keep their
    /// built-in value.
    pub fn from_loaded(loaded: &LoadedAssumptions) -> Result<Self, AssumptionsError> {
        let mut unknown: Vec<&String> = loaded
            .statutory_parameters
            .keys()
            .filter(|name| !KNOWN_PARAMETERS.contains(&name.as_str()))
            .collect();
        unknown.sort();
        if let Some(name) = unknown.first() {
            log::warn!("rejecting unknown statutory parameters {:?}", unknown);
            return Err(AssumptionsError::UnknownParameter {
                parameter: name.to_string(),
            });
        }

        Ok(Self {
            copyright: CopyrightExemption::from_loaded(loaded),
            payout: PayoutIndexation::from_loaded(loaded),
            salary: SalaryModel::from_loaded(loaded),
        })
    }

    /// Resolve assumptions from an explicit directory, then the
    /// `PENSION_ASSUMPTIONS_PATH` environment variable, then built-ins
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, AssumptionsError> {
        if let Some(path) = explicit {
            log::info!("loading assumptions from {}", path.display());
            return Self::from_csv_path(path);
        }

        match std::env::var(ASSUMPTIONS_PATH_ENV) {
            Ok(dir) if !dir.is_empty() => {
                log::info!("loading assumptions from {} ({})", dir, ASSUMPTIONS_PATH_ENV);
                Self::from_csv_path(Path::new(&dir))
            }
            _ => Ok(Self::default_statutory()),
        }
    }
}

impl Default for Assumptions {
    fn default() -> Self {
        Self::default_statutory()
    }
}

const KNOWN_PARAMETERS: &[&str] = &[
    "copyright_cost_rate",
    "copyright_exempt_cap_annual",
    "payout_indexation_rate",
    "payout_forecast_years",
    "employee_social_rate",
    "health_insurance_rate",
    "income_tax_rate",
    "annual_deductible_costs",
    "annual_tax_free_deduction",
    "net_to_gross_ratio",
];
