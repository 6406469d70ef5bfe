//! Calculation history: records of saved calculations and their stores
//!
//! The engine never touches a store. Callers save a record after computing
//! an estimate and list recent records for display.

mod csv_store;
mod memory;

pub use csv_store::CsvHistoryStore;
pub use memory::InMemoryStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assumptions::{SalaryPeriod, SalaryType};
use crate::input::{CalculatorForm, NormalizedInputs};
use crate::projection::RetirementEstimate;

/// Number of records returned when a filter sets no limit
pub const DEFAULT_HISTORY_LIMIT: usize = 5;

pub type RecordId = u64;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("history store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("history store CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("history store lock poisoned")]
    Poisoned,
}

/// A calculation about to be saved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCalculation {
    /// Opaque user or session key
    pub user_id: String,
    pub current_age: u32,
    pub initial_accumulated_capital: f64,
    /// Salary as entered, with its type and period
    pub salary_input: f64,
    pub salary_type: SalaryType,
    pub salary_period: SalaryPeriod,
    /// Derived from the entered salary
    pub annual_gross_salary: f64,
    /// Percent values as entered
    pub copyright_percentage_input: f64,
    pub pension_contribution_rate_input: f64,
    pub capital_indexation_rate_input: f64,
    pub target_retirement_age: u32,
    pub life_expectancy_months: f64,
    pub minimal_pension_input: f64,
    pub calculated_monthly_pension: f64,
}

impl NewCalculation {
    pub fn from_estimate(
        user_id: impl Into<String>,
        form: &CalculatorForm,
        normalized: &NormalizedInputs,
        estimate: &RetirementEstimate,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            current_age: normalized.current_age,
            initial_accumulated_capital: normalized.projection.initial_capital,
            salary_input: form.salary,
            salary_type: form.salary_type,
            salary_period: form.salary_period,
            annual_gross_salary: normalized.projection.annual_gross_salary,
            copyright_percentage_input: form.copyright_percentage,
            pension_contribution_rate_input: form.pension_contribution_rate,
            capital_indexation_rate_input: form.capital_indexation_rate,
            target_retirement_age: normalized.projection.target_retirement_age,
            life_expectancy_months: normalized.life_expectancy_months,
            minimal_pension_input: normalized.minimal_pension,
            calculated_monthly_pension: estimate.monthly_pension,
        }
    }

    fn into_record(self, id: RecordId, created_at: DateTime<Utc>) -> CalculationRecord {
        CalculationRecord {
            id,
            created_at,
            user_id: self.user_id,
            current_age: self.current_age,
            initial_accumulated_capital: self.initial_accumulated_capital,
            salary_input: self.salary_input,
            salary_type: self.salary_type,
            salary_period: self.salary_period,
            annual_gross_salary: self.annual_gross_salary,
            copyright_percentage_input: self.copyright_percentage_input,
            pension_contribution_rate_input: self.pension_contribution_rate_input,
            capital_indexation_rate_input: self.capital_indexation_rate_input,
            target_retirement_age: self.target_retirement_age,
            life_expectancy_months: self.life_expectancy_months,
            minimal_pension_input: self.minimal_pension_input,
            calculated_monthly_pension: self.calculated_monthly_pension,
        }
    }
}

/// A saved calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    pub user_id: String,
    pub current_age: u32,
    pub initial_accumulated_capital: f64,
    pub salary_input: f64,
    pub salary_type: SalaryType,
    pub salary_period: SalaryPeriod,
    pub annual_gross_salary: f64,
    pub copyright_percentage_input: f64,
    pub pension_contribution_rate_input: f64,
    pub capital_indexation_rate_input: f64,
    pub target_retirement_age: u32,
    pub life_expectancy_months: f64,
    pub minimal_pension_input: f64,
    pub calculated_monthly_pension: f64,
}

/// Which records to list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryFilter {
    /// Only records of this user; all users when `None`
    pub user_id: Option<String>,
    /// Maximum number of records; unlimited when `None`
    pub limit: Option<usize>,
}

impl Default for HistoryFilter {
    fn default() -> Self {
        Self {
            user_id: None,
            limit: Some(DEFAULT_HISTORY_LIMIT),
        }
    }
}

impl HistoryFilter {
    /// Latest records of one user
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    /// Keep matching records, newest first, up to the limit
    fn apply(&self, records: impl IntoIterator<Item = CalculationRecord>) -> Vec<CalculationRecord> {
        let mut matching: Vec<CalculationRecord> = records
            .into_iter()
            .filter(|record| self.user_id.as_ref().map_or(true, |user| &record.user_id == user))
            .collect();

        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        if let Some(limit) = self.limit {
            matching.truncate(limit);
        }
        matching
    }
}

/// Persistence of calculation records
pub trait CalculationStore: Send + Sync {
    /// Persist a calculation, returning its id
    fn save(&self, calculation: NewCalculation) -> Result<RecordId, StoreError>;

    /// Records matching the filter, newest first
    fn list(&self, filter: &HistoryFilter) -> Result<Vec<CalculationRecord>, StoreError>;
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::assumptions::SalaryModel;
    use crate::projection::{ProjectionConfig, ProjectionEngine};

    #[test]
    fn test_from_estimate_keeps_percent_inputs() {
        let form = CalculatorForm::default();
        let as_of = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let normalized = form.normalize(as_of, &SalaryModel::default()).unwrap();
        let engine = ProjectionEngine::new(Default::default(), ProjectionConfig { start_year: 2025 });
        let estimate = engine.estimate(&normalized.projection, 210.0, 1_780.96);

        let calculation = NewCalculation::from_estimate("user-1", &form, &normalized, &estimate);
        assert_eq!(calculation.user_id, "user-1");
        assert_eq!(calculation.pension_contribution_rate_input, 19.52);
        assert_eq!(calculation.annual_gross_salary, 120_000.0);
        assert_eq!(calculation.calculated_monthly_pension, estimate.monthly_pension);
    }

    #[test]
    fn test_from_estimate_keeps_salary_as_entered() {
        let form = CalculatorForm {
            salary: 6_000.0,
            salary_type: SalaryType::Net,
            salary_period: SalaryPeriod::Month,
            ..CalculatorForm::default()
        };
        let as_of = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let normalized = form.normalize(as_of, &SalaryModel::default()).unwrap();
        let engine = ProjectionEngine::new(Default::default(), ProjectionConfig { start_year: 2025 });
        let estimate = engine.estimate(&normalized.projection, 210.0, 1_780.96);

        let calculation = NewCalculation::from_estimate("user-1", &form, &normalized, &estimate);
        assert_eq!(calculation.salary_input, 6_000.0);
        assert_eq!(calculation.salary_type, SalaryType::Net);
        assert_eq!(calculation.salary_period, SalaryPeriod::Month);
        assert_eq!(calculation.annual_gross_salary, 100_000.0);
    }

    #[test]
    fn test_filter_orders_newest_first_and_limits() {
        let base = DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z").unwrap().with_timezone(&Utc);
        let records: Vec<_> = (1..=8)
            .map(|i| {
                let user = if i % 2 == 0 { "even" } else { "odd" };
                test_support::calculation(user, i as f64)
                    .into_record(i, base + chrono::Duration::days(i as i64))
            })
            .collect();

        let latest = HistoryFilter::default().apply(records.clone());
        assert_eq!(latest.iter().map(|r| r.id).collect::<Vec<_>>(), vec![8, 7, 6, 5, 4]);

        let even = HistoryFilter::for_user("even").apply(records.clone());
        assert_eq!(even.iter().map(|r| r.id).collect::<Vec<_>>(), vec![8, 6, 4, 2]);

        let all = HistoryFilter { user_id: None, limit: None }.apply(records);
        assert_eq!(all.len(), 8);
    }
}
