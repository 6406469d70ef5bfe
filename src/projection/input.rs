//! Input of a single capital projection

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Contract violation on projection inputs
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("invalid input `{field}`: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

/// Parameters of one projection, rates expressed as fractions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInput {
    /// Age at which the simulation starts
    pub current_age: u32,

    /// Capital already accumulated
    pub initial_capital: f64,

    /// Assumed constant for every simulated year
    pub annual_gross_salary: f64,

    /// Share of salary treated as creative (copyright) income, 0..=1
    pub copyright_percentage: f64,

    /// Share of the contribution base paid into the account each year, 0..=1
    pub pension_contribution_rate: f64,

    /// Annual growth applied to the balance before that year's contribution, 0..=1
    pub capital_indexation_rate: f64,

    pub target_retirement_age: u32,
}

impl ProjectionInput {
    /// Years between the current and target age (0 when target is not later)
    pub fn years_to_simulate(&self) -> u32 {
        self.target_retirement_age.saturating_sub(self.current_age)
    }

    /// Check the value domain the engine is defined on
    ///
    /// The engine itself never calls this: out-of-domain values are the
    /// caller's responsibility and produce unspecified (but non-panicking)
    /// numbers.
    pub fn validate(&self) -> Result<(), InputError> {
        non_negative("initial_capital", self.initial_capital)?;
        non_negative("annual_gross_salary", self.annual_gross_salary)?;
        fraction("copyright_percentage", self.copyright_percentage)?;
        fraction("pension_contribution_rate", self.pension_contribution_rate)?;
        fraction("capital_indexation_rate", self.capital_indexation_rate)?;
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), InputError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(InputError::InvalidInput {
            field,
            reason: format!("expected a non-negative amount, got {}", value),
        })
    }
}

fn fraction(field: &'static str, value: f64) -> Result<(), InputError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(InputError::InvalidInput {
            field,
            reason: format!("expected a fraction in [0, 1], got {}", value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> ProjectionInput {
        ProjectionInput {
            current_age: 40,
            initial_capital: 0.0,
            annual_gross_salary: 120_000.0,
            copyright_percentage: 0.0,
            pension_contribution_rate: 0.1952,
            capital_indexation_rate: 0.05,
            target_retirement_age: 65,
        }
    }

    #[test]
    fn test_valid_input_passes() {
        assert_eq!(valid_input().validate(), Ok(()));
    }

    #[test]
    fn test_years_to_simulate() {
        let mut input = valid_input();
        assert_eq!(input.years_to_simulate(), 25);

        input.target_retirement_age = 30;
        assert_eq!(input.years_to_simulate(), 0);
    }

    #[test]
    fn test_percent_instead_of_fraction_rejected() {
        let input = ProjectionInput {
            pension_contribution_rate: 19.52,
            ..valid_input()
        };

        let err = input.validate().unwrap_err();
        assert!(matches!(err, InputError::InvalidInput { field: "pension_contribution_rate", .. }));
    }

    #[test]
    fn test_negative_salary_rejected() {
        let input = ProjectionInput {
            annual_gross_salary: -1.0,
            ..valid_input()
        };
        assert!(input.validate().is_err());

        let input = ProjectionInput {
            initial_capital: f64::NAN,
            ..valid_input()
        };
        assert!(input.validate().is_err());
    }
}
