//! Statutory rules: creative-income exemption and payout indexation

use serde::{Deserialize, Serialize};

use super::loader::LoadedAssumptions;

/// Partial exclusion of creative (copyright) income from the contribution base
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CopyrightExemption {
    /// Cost-of-income deduction rate applied to creative income
    pub cost_rate: f64,

    /// Annual cap on the deducted amount, same currency unit as salary
    pub annual_cap: f64,
}

impl Default for CopyrightExemption {
    fn default() -> Self {
        Self {
            cost_rate: 0.5,
            annual_cap: 120_000.0,
        }
    }
}

impl CopyrightExemption {
    /// Create from loaded CSV data, falling back to defaults per parameter
    pub fn from_loaded(loaded: &LoadedAssumptions) -> Self {
        let defaults = Self::default();
        Self {
            cost_rate: loaded.get("copyright_cost_rate").unwrap_or(defaults.cost_rate),
            annual_cap: loaded
                .get("copyright_exempt_cap_annual")
                .unwrap_or(defaults.annual_cap),
        }
    }

    /// Amount excluded from the contribution base for one year
    pub fn exempt_amount(&self, annual_gross_salary: f64, copyright_share: f64) -> f64 {
        let creative_salary = annual_gross_salary * copyright_share;
        (creative_salary * self.cost_rate).min(self.annual_cap)
    }

    /// Salary subject to pension contributions after the exemption
    pub fn contribution_base(&self, annual_gross_salary: f64, copyright_share: f64) -> f64 {
        (annual_gross_salary - self.exempt_amount(annual_gross_salary, copyright_share)).max(0.0)
    }
}

/// Growth of a pension that is already being paid out
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoutIndexation {
    /// Annual indexation of the monthly payout
    pub annual_rate: f64,

    /// Number of payout years shown in a forecast (year 1 included)
    pub forecast_years: u32,
}

impl Default for PayoutIndexation {
    fn default() -> Self {
        Self {
            annual_rate: 0.03,
            forecast_years: 5,
        }
    }
}

impl PayoutIndexation {
    /// Create from loaded CSV data, falling back to defaults per parameter
    pub fn from_loaded(loaded: &LoadedAssumptions) -> Self {
        let defaults = Self::default();
        Self {
            annual_rate: loaded
                .get("payout_indexation_rate")
                .unwrap_or(defaults.annual_rate),
            forecast_years: loaded
                .get("payout_forecast_years")
                .map(|years| years.max(1.0) as u32)
                .unwrap_or(defaults.forecast_years),
        }
    }
}
