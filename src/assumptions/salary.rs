//! Simplified salary normalization (gross/net, monthly/yearly)
//!
//! This is an approximation used to turn a salary as entered on a form into
//! the annual gross amount the projection expects. It does not model the
//! upper income tax bracket or contribution ceilings.

use serde::{Deserialize, Serialize};

use super::loader::LoadedAssumptions;
use crate::projection::round_currency;

/// Whether an entered salary is before or after deductions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SalaryType {
    #[default]
    Gross,
    Net,
}

/// Period an entered salary refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SalaryPeriod {
    #[default]
    Month,
    Year,
}

/// Deduction rates used for gross/net conversion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryModel {
    /// Employee social contributions (pension + disability + sickness)
    pub employee_social_rate: f64,
    pub health_insurance_rate: f64,
    pub income_tax_rate: f64,
    pub annual_deductible_costs: f64,
    /// Deducted from computed tax, not from the tax base
    pub annual_tax_free_deduction: f64,
    /// Net / gross ratio used for the reverse conversion
    pub net_to_gross_ratio: f64,
}

impl Default for SalaryModel {
    fn default() -> Self {
        Self {
            employee_social_rate: 0.0976 + 0.015 + 0.0245,
            health_insurance_rate: 0.09,
            income_tax_rate: 0.12,
            annual_deductible_costs: 3_000.0,
            annual_tax_free_deduction: 3_600.0,
            net_to_gross_ratio: 0.72,
        }
    }
}

impl SalaryModel {
    /// Create from loaded CSV data, falling back to defaults per parameter
    pub fn from_loaded(loaded: &LoadedAssumptions) -> Self {
        let d = Self::default();
        Self {
            employee_social_rate: loaded.get("employee_social_rate").unwrap_or(d.employee_social_rate),
            health_insurance_rate: loaded.get("health_insurance_rate").unwrap_or(d.health_insurance_rate),
            income_tax_rate: loaded.get("income_tax_rate").unwrap_or(d.income_tax_rate),
            annual_deductible_costs: loaded
                .get("annual_deductible_costs")
                .unwrap_or(d.annual_deductible_costs),
            annual_tax_free_deduction: loaded
                .get("annual_tax_free_deduction")
                .unwrap_or(d.annual_tax_free_deduction),
            net_to_gross_ratio: loaded.get("net_to_gross_ratio").unwrap_or(d.net_to_gross_ratio),
        }
    }

    /// Yearly net salary from yearly gross, rounded to whole units
    pub fn net_from_gross_yearly(&self, yearly_gross: f64) -> f64 {
        if yearly_gross.is_nan() || yearly_gross <= 0.0 {
            return 0.0;
        }

        let employee_social = yearly_gross * self.employee_social_rate;
        let health = (yearly_gross - employee_social) * self.health_insurance_rate;
        let tax_base = (yearly_gross - employee_social - self.annual_deductible_costs).max(0.0);
        let income_tax = (tax_base * self.income_tax_rate - self.annual_tax_free_deduction).max(0.0);

        round_currency(yearly_gross - employee_social - health - income_tax)
    }

    /// Approximate yearly gross salary from yearly net, rounded to whole units
    pub fn gross_from_net_yearly(&self, yearly_net: f64) -> f64 {
        if yearly_net.is_nan() || yearly_net <= 0.0 || self.net_to_gross_ratio <= 0.0 {
            return 0.0;
        }
        round_currency(yearly_net / self.net_to_gross_ratio)
    }

    /// Annual gross salary for an amount as entered on the form
    pub fn annual_gross_salary(&self, amount: f64, salary_type: SalaryType, period: SalaryPeriod) -> f64 {
        let yearly = match period {
            SalaryPeriod::Month => amount * 12.0,
            SalaryPeriod::Year => amount,
        };

        let gross = match salary_type {
            SalaryType::Gross => yearly,
            SalaryType::Net => self.gross_from_net_yearly(yearly),
        };

        round_currency(gross.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_from_gross() {
        let model = SalaryModel::default();

        // social = 16452, health = 103548 * 0.09 = 9319.32
        // tax = (103548 - 3000) * 0.12 - 3600 = 8465.76
        assert_eq!(model.net_from_gross_yearly(120_000.0), 85_763.0);
    }

    #[test]
    fn test_low_income_pays_no_tax() {
        let model = SalaryModel::default();

        // Tax base below the tax-free deduction threshold: only contributions apply
        let gross = 20_000.0;
        let social = gross * model.employee_social_rate;
        let health = (gross - social) * model.health_insurance_rate;
        assert_eq!(model.net_from_gross_yearly(gross), (gross - social - health).round());
    }

    #[test]
    fn test_non_positive_amounts() {
        let model = SalaryModel::default();
        assert_eq!(model.net_from_gross_yearly(0.0), 0.0);
        assert_eq!(model.net_from_gross_yearly(-5.0), 0.0);
        assert_eq!(model.gross_from_net_yearly(0.0), 0.0);
        assert_eq!(model.gross_from_net_yearly(f64::NAN), 0.0);
    }

    #[test]
    fn test_gross_from_net() {
        let model = SalaryModel::default();
        assert_eq!(model.gross_from_net_yearly(72_000.0), 100_000.0);
    }

    #[test]
    fn test_annual_gross_salary() {
        let model = SalaryModel::default();

        assert_eq!(model.annual_gross_salary(10_000.0, SalaryType::Gross, SalaryPeriod::Month), 120_000.0);
        assert_eq!(model.annual_gross_salary(90_000.0, SalaryType::Gross, SalaryPeriod::Year), 90_000.0);
        assert_eq!(model.annual_gross_salary(6_000.0, SalaryType::Net, SalaryPeriod::Month), 100_000.0);
        assert_eq!(model.annual_gross_salary(72_000.0, SalaryType::Net, SalaryPeriod::Year), 100_000.0);
    }
}
