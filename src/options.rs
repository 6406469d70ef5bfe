//! Retirement options sweep
//!
//! Runs the capital projection once per candidate retirement age and turns
//! each final balance into a monthly pension, producing the comparison
//! table of retirement options.

use chrono::{Datelike, NaiveDate};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assumptions::Assumptions;
use crate::projection::annuity;
use crate::projection::{round_currency, ProjectionConfig, ProjectionEngine, ProjectionInput};

/// Default youngest age in the comparison table
pub const DEFAULT_MIN_RETIREMENT_AGE: u32 = 60;

/// Default oldest age in the comparison table
pub const DEFAULT_MAX_RETIREMENT_AGE: u32 = 70;

/// Payout year reported alongside the first year
const COMPARISON_PAYOUT_YEAR: u32 = 5;

/// Shared parameters of a sweep, rates expressed as fractions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepParams {
    pub birth_year: i32,
    /// 1-12
    pub birth_month: u32,
    /// Past contribution years behind the initial capital
    pub initial_work_years: u32,
    pub initial_capital: f64,
    pub annual_gross_salary: f64,
    pub copyright_percentage: f64,
    pub pension_contribution_rate: f64,
    pub capital_indexation_rate: f64,
    pub min_retirement_age: u32,
    pub max_retirement_age: u32,
    /// Same divisor for every age in the table
    pub life_expectancy_months: f64,
    pub minimal_pension: f64,
}

/// One row of the comparison table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementOption {
    pub retirement_year: i32,
    pub age_at_retirement: u32,
    pub total_years_of_contribution: u32,
    pub accumulated_capital: f64,
    pub life_expectancy_months: f64,
    pub monthly_pension_year1: f64,
    pub monthly_pension_year5: f64,
}

/// Configuration for a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepConfig {
    /// Date the current age is measured at; its year starts the projection
    pub as_of: NaiveDate,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            as_of: chrono::Local::now().date_naive(),
        }
    }
}

/// Full years of age at `as_of`, with month granularity
///
/// A birthday month not yet reached this year does not count. Birth dates
/// after `as_of` give 0.
pub fn current_full_age(birth_year: i32, birth_month: u32, as_of: NaiveDate) -> u32 {
    let mut age = as_of.year() - birth_year;
    if as_of.month() < birth_month {
        age -= 1;
    }
    age.max(0) as u32
}

/// Builds the retirement options table
#[derive(Debug, Clone)]
pub struct RetirementOptionsSweeper {
    engine: ProjectionEngine,
    config: SweepConfig,
}

impl RetirementOptionsSweeper {
    pub fn new(assumptions: Assumptions, config: SweepConfig) -> Self {
        let projection_config = ProjectionConfig {
            start_year: config.as_of.year(),
        };
        Self {
            engine: ProjectionEngine::new(assumptions, projection_config),
            config,
        }
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// One option per age in the range, skipping ages below the current age
    pub fn sweep(&self, params: &SweepParams) -> Vec<RetirementOption> {
        let current_age = current_full_age(params.birth_year, params.birth_month, self.config.as_of);
        let first_age = params.min_retirement_age.max(current_age);

        if first_age > params.max_retirement_age {
            log::debug!(
                "empty sweep: range {}..={} with current age {}",
                params.min_retirement_age,
                params.max_retirement_age,
                current_age
            );
            return Vec::new();
        }

        let ages: Vec<u32> = (first_age..=params.max_retirement_age).collect();
        let options: Vec<RetirementOption> = ages
            .par_iter()
            .map(|&age| self.option_for_age(params, current_age, age))
            .collect();

        log::info!(
            "swept {} retirement ages ({}..={}) from current age {}",
            options.len(),
            first_age,
            params.max_retirement_age,
            current_age
        );
        options
    }

    fn option_for_age(&self, params: &SweepParams, current_age: u32, age: u32) -> RetirementOption {
        let input = ProjectionInput {
            current_age,
            initial_capital: params.initial_capital,
            annual_gross_salary: params.annual_gross_salary,
            copyright_percentage: params.copyright_percentage,
            pension_contribution_rate: params.pension_contribution_rate,
            capital_indexation_rate: params.capital_indexation_rate,
            target_retirement_age: age,
        };
        let accumulated_capital = self.engine.project(&input).final_capital;

        let year1 = round_currency(annuity::first_year_pension(
            accumulated_capital,
            params.life_expectancy_months,
            params.minimal_pension,
        ));
        let year5 = annuity::indexed_payout(
            year1,
            self.engine.assumptions().payout.annual_rate,
            COMPARISON_PAYOUT_YEAR,
        );

        RetirementOption {
            retirement_year: params.birth_year + age as i32,
            age_at_retirement: age,
            total_years_of_contribution: params.initial_work_years + age.saturating_sub(current_age),
            accumulated_capital,
            life_expectancy_months: params.life_expectancy_months,
            monthly_pension_year1: year1,
            monthly_pension_year5: round_currency(year5),
        }
    }
}

impl Default for RetirementOptionsSweeper {
    fn default() -> Self {
        Self::new(Assumptions::default_statutory(), SweepConfig::default())
    }
}

/// Sweep with statutory defaults as of today
pub fn sweep(params: &SweepParams) -> Vec<RetirementOption> {
    RetirementOptionsSweeper::default().sweep(params)
}

/// Write options as CSV, one row per age
pub fn write_options_csv<W: std::io::Write>(options: &[RetirementOption], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for option in options {
        csv_writer.serialize(option)?;
    }
    csv_writer.flush()?;
    Ok(())
}
