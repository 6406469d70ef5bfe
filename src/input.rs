//! Calculator form inputs: validation and normalization into engine inputs
//!
//! Form values are entered as people think of them (percentages, monthly
//! salary, net or gross). Everything here runs before the engine is called;
//! the engine only ever sees fractions and an annual gross salary.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assumptions::{SalaryModel, SalaryPeriod, SalaryType};
use crate::options::{current_full_age, SweepParams, DEFAULT_MAX_RETIREMENT_AGE, DEFAULT_MIN_RETIREMENT_AGE};
use crate::projection::ProjectionInput;

const MIN_BIRTH_YEAR: i32 = 1900;
const TARGET_AGE_RANGE: (i32, i32) = (50, 80);
const MAX_WORK_YEARS: i32 = 80;
const MAX_INDEXATION_PERCENT: f64 = 50.0;
const LIFE_EXPECTANCY_RANGE: (f64, f64) = (1.0, 600.0);

/// A single violated form rule
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("birth year must be between 1900 and {current_year}")]
    BirthYearOutOfRange { current_year: i32 },

    #[error("birth month must be between 1 and 12")]
    BirthMonthOutOfRange,

    #[error("target retirement age must be greater than the current age ({current_age})")]
    TargetAgeTooLow { current_age: u32 },

    #[error("target retirement age must be between 50 and 80")]
    TargetAgeOutOfRange,

    #[error("work years must be between 0 and 80")]
    WorkYearsOutOfRange,

    #[error("{field} must not be negative")]
    NegativeAmount { field: &'static str },

    #[error("{field} must be between 0 and {max}%")]
    PercentageOutOfRange { field: &'static str, max: f64 },

    #[error("life expectancy must be between 1 and 600 months")]
    LifeExpectancyOutOfRange,

    #[error("retirement age range must lie within 50 to 80 with the minimum not above the maximum")]
    SweepRangeInvalid,
}

impl FieldError {
    /// Form field the error belongs to
    pub fn field(&self) -> &'static str {
        match self {
            FieldError::BirthYearOutOfRange { .. } => "birthYear",
            FieldError::BirthMonthOutOfRange => "birthMonth",
            FieldError::TargetAgeTooLow { .. } | FieldError::TargetAgeOutOfRange => "targetRetirementAge",
            FieldError::WorkYearsOutOfRange => "workYears",
            FieldError::NegativeAmount { field } | FieldError::PercentageOutOfRange { field, .. } => *field,
            FieldError::LifeExpectancyOutOfRange => "lifeExpectancyMonths",
            FieldError::SweepRangeInvalid => "minRetirementAge",
        }
    }
}

/// Every rule violated by a form, in field order
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl std::error::Error for ValidationErrors {}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid input: ")?;
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }
}

/// Raw calculator form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalculatorForm {
    pub birth_year: i32,
    pub birth_month: u32,
    /// Past contribution years behind the initial capital
    pub work_years: i32,
    pub salary: f64,
    pub salary_type: SalaryType,
    pub salary_period: SalaryPeriod,
    pub initial_capital: f64,
    /// Percent, 0-100
    pub copyright_percentage: f64,
    /// Percent, 0-100
    pub pension_contribution_rate: f64,
    /// Percent, 0-50
    pub capital_indexation_rate: f64,
    pub target_retirement_age: i32,
    pub life_expectancy_months: f64,
    pub minimal_pension: f64,
    pub min_retirement_age: u32,
    pub max_retirement_age: u32,
}

impl Default for CalculatorForm {
    fn default() -> Self {
        Self {
            birth_year: 1980,
            birth_month: 1,
            work_years: 15,
            salary: 10_000.0,
            salary_type: SalaryType::Gross,
            salary_period: SalaryPeriod::Month,
            initial_capital: 0.0,
            copyright_percentage: 0.0,
            pension_contribution_rate: 19.52,
            capital_indexation_rate: 5.0,
            target_retirement_age: 65,
            life_expectancy_months: 210.0,
            minimal_pension: 1_780.96,
            min_retirement_age: DEFAULT_MIN_RETIREMENT_AGE,
            max_retirement_age: DEFAULT_MAX_RETIREMENT_AGE,
        }
    }
}

/// Engine-ready inputs derived from a valid form
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedInputs {
    pub current_age: u32,
    pub projection: ProjectionInput,
    pub sweep: SweepParams,
    pub life_expectancy_months: f64,
    pub minimal_pension: f64,
}

impl CalculatorForm {
    /// Current age in full years at `as_of`
    pub fn current_age(&self, as_of: NaiveDate) -> u32 {
        current_full_age(self.birth_year, self.birth_month, as_of)
    }

    /// Check every form rule, collecting all violations
    pub fn validate(&self, as_of: NaiveDate) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        let current_year = as_of.year();

        if !(MIN_BIRTH_YEAR..=current_year).contains(&self.birth_year) {
            errors.push(FieldError::BirthYearOutOfRange { current_year });
        }
        if !(1..=12).contains(&self.birth_month) {
            errors.push(FieldError::BirthMonthOutOfRange);
        }

        let current_age = self.current_age(as_of);
        if self.target_retirement_age <= current_age as i32 {
            errors.push(FieldError::TargetAgeTooLow { current_age });
        }
        if !(TARGET_AGE_RANGE.0..=TARGET_AGE_RANGE.1).contains(&self.target_retirement_age) {
            errors.push(FieldError::TargetAgeOutOfRange);
        }

        if !(0..=MAX_WORK_YEARS).contains(&self.work_years) {
            errors.push(FieldError::WorkYearsOutOfRange);
        }

        for (field, value) in [
            ("salary", self.salary),
            ("initialCapital", self.initial_capital),
            ("minimalPension", self.minimal_pension),
        ] {
            if value.is_nan() || value < 0.0 {
                errors.push(FieldError::NegativeAmount { field });
            }
        }

        for (field, value, max) in [
            ("copyrightPercentage", self.copyright_percentage, 100.0),
            ("pensionContributionRate", self.pension_contribution_rate, 100.0),
            ("capitalIndexationRate", self.capital_indexation_rate, MAX_INDEXATION_PERCENT),
        ] {
            if !(0.0..=max).contains(&value) {
                errors.push(FieldError::PercentageOutOfRange { field, max });
            }
        }

        if !(LIFE_EXPECTANCY_RANGE.0..=LIFE_EXPECTANCY_RANGE.1).contains(&self.life_expectancy_months) {
            errors.push(FieldError::LifeExpectancyOutOfRange);
        }

        let age_range = TARGET_AGE_RANGE.0 as u32..=TARGET_AGE_RANGE.1 as u32;
        if !age_range.contains(&self.min_retirement_age)
            || !age_range.contains(&self.max_retirement_age)
            || self.min_retirement_age > self.max_retirement_age
        {
            errors.push(FieldError::SweepRangeInvalid);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }

    /// Validate, then convert percentages to fractions and salary to annual gross
    pub fn normalize(&self, as_of: NaiveDate, salary_model: &SalaryModel) -> Result<NormalizedInputs, ValidationErrors> {
        self.validate(as_of)?;

        let current_age = self.current_age(as_of);
        let annual_gross_salary = salary_model.annual_gross_salary(self.salary, self.salary_type, self.salary_period);
        let copyright_percentage = self.copyright_percentage / 100.0;
        let pension_contribution_rate = self.pension_contribution_rate / 100.0;
        let capital_indexation_rate = self.capital_indexation_rate / 100.0;

        let projection = ProjectionInput {
            current_age,
            initial_capital: self.initial_capital,
            annual_gross_salary,
            copyright_percentage,
            pension_contribution_rate,
            capital_indexation_rate,
            target_retirement_age: self.target_retirement_age as u32,
        };

        let sweep = SweepParams {
            birth_year: self.birth_year,
            birth_month: self.birth_month,
            initial_work_years: self.work_years as u32,
            initial_capital: self.initial_capital,
            annual_gross_salary,
            copyright_percentage,
            pension_contribution_rate,
            capital_indexation_rate,
            min_retirement_age: self.min_retirement_age,
            max_retirement_age: self.max_retirement_age,
            life_expectancy_months: self.life_expectancy_months,
            minimal_pension: self.minimal_pension,
        };

        Ok(NormalizedInputs {
            current_age,
            projection,
            sweep,
            life_expectancy_months: self.life_expectancy_months,
            minimal_pension: self.minimal_pension,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    #[test]
    fn test_default_form_is_valid() {
        assert_eq!(CalculatorForm::default().validate(as_of()), Ok(()));
    }

    #[test]
    fn test_normalize_defaults() {
        let normalized = CalculatorForm::default()
            .normalize(as_of(), &SalaryModel::default())
            .unwrap();

        assert_eq!(normalized.current_age, 45);
        assert_eq!(normalized.projection.annual_gross_salary, 120_000.0);
        assert_relative_eq!(normalized.projection.pension_contribution_rate, 0.1952);
        assert_relative_eq!(normalized.projection.capital_indexation_rate, 0.05);
        assert_eq!(normalized.projection.target_retirement_age, 65);
        assert_eq!(normalized.sweep.initial_work_years, 15);
        assert_eq!(normalized.sweep.min_retirement_age, 60);
        assert_eq!(normalized.sweep.max_retirement_age, 70);
        assert_eq!(normalized.minimal_pension, 1_780.96);
    }

    #[test]
    fn test_net_salary_is_converted() {
        let form = CalculatorForm {
            salary: 72_000.0,
            salary_type: SalaryType::Net,
            salary_period: SalaryPeriod::Year,
            ..CalculatorForm::default()
        };
        let normalized = form.normalize(as_of(), &SalaryModel::default()).unwrap();
        assert_eq!(normalized.sweep.annual_gross_salary, 100_000.0);
    }

    #[test]
    fn test_collects_all_errors() {
        let form = CalculatorForm {
            birth_year: 1850,
            birth_month: 13,
            work_years: -1,
            salary: -100.0,
            copyright_percentage: 120.0,
            capital_indexation_rate: 60.0,
            target_retirement_age: 90,
            life_expectancy_months: 0.0,
            minimal_pension: -1.0,
            ..CalculatorForm::default()
        };

        let errors = form.validate(as_of()).unwrap_err();
        let fields: Vec<&str> = errors.errors().iter().map(FieldError::field).collect();

        assert!(fields.contains(&"birthYear"));
        assert!(fields.contains(&"birthMonth"));
        assert!(fields.contains(&"workYears"));
        assert!(fields.contains(&"salary"));
        assert!(fields.contains(&"minimalPension"));
        assert!(fields.contains(&"copyrightPercentage"));
        assert!(fields.contains(&"capitalIndexationRate"));
        assert!(fields.contains(&"targetRetirementAge"));
        assert!(fields.contains(&"lifeExpectancyMonths"));
        assert!(!fields.contains(&"pensionContributionRate"));
    }

    #[test]
    fn test_target_age_must_exceed_current_age() {
        let form = CalculatorForm {
            birth_year: 1960, // 65 in 2025
            target_retirement_age: 65,
            ..CalculatorForm::default()
        };

        let errors = form.validate(as_of()).unwrap_err();
        assert_eq!(errors.errors(), &[FieldError::TargetAgeTooLow { current_age: 65 }]);
    }

    #[test]
    fn test_sweep_range_must_stay_within_retirement_ages() {
        let huge = CalculatorForm {
            min_retirement_age: 4_000_000_000,
            max_retirement_age: 4_000_000_005,
            ..CalculatorForm::default()
        };
        let errors = huge.normalize(as_of(), &SalaryModel::default()).unwrap_err();
        assert_eq!(errors.errors(), &[FieldError::SweepRangeInvalid]);
        assert_eq!(errors.errors()[0].field(), "minRetirementAge");

        let inverted = CalculatorForm {
            min_retirement_age: 70,
            max_retirement_age: 65,
            ..CalculatorForm::default()
        };
        assert_eq!(inverted.validate(as_of()).unwrap_err().errors(), &[FieldError::SweepRangeInvalid]);

        let single_age = CalculatorForm {
            min_retirement_age: 67,
            max_retirement_age: 67,
            ..CalculatorForm::default()
        };
        assert_eq!(single_age.validate(as_of()), Ok(()));
    }

    #[test]
    fn test_error_messages() {
        let errors = ValidationErrors(vec![
            FieldError::BirthMonthOutOfRange,
            FieldError::NegativeAmount { field: "salary" },
        ]);
        assert_eq!(
            errors.to_string(),
            "invalid input: birth month must be between 1 and 12; salary must not be negative"
        );
        assert_eq!(
            FieldError::BirthYearOutOfRange { current_year: 2025 }.to_string(),
            "birth year must be between 1900 and 2025"
        );
    }

    #[test]
    fn test_deserialize_partial_form() {
        let form: CalculatorForm = serde_json::from_str(r#"{"birthYear": 1990, "salaryType": "net"}"#).unwrap();
        assert_eq!(form.birth_year, 1990);
        assert_eq!(form.salary_type, SalaryType::Net);
        assert_eq!(form.pension_contribution_rate, 19.52);
    }
}
