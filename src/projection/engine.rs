//! Core projection engine for yearly capital accumulation

use chrono::Datelike;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assumptions::Assumptions;
use super::annuity::{self, PayoutYear};
use super::input::ProjectionInput;
use super::state::AccumulationState;
use super::trajectory::{ProjectionResult, TrajectoryRow};

/// Round half up to whole currency units
///
/// Amounts in this model are non-negative, where `f64::round` (half away
/// from zero) is half-up.
pub fn round_currency(amount: f64) -> f64 {
    amount.round()
}

/// Configuration for a projection run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionConfig {
    /// Calendar year of the starting row
    pub start_year: i32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            start_year: chrono::Local::now().year(),
        }
    }
}

/// Headline result for a single chosen retirement age
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementEstimate {
    pub projection: ProjectionResult,

    /// First-year monthly pension, floor applied, rounded
    pub monthly_pension: f64,

    /// Monthly pension per payout year under payout indexation
    pub payout_schedule: Vec<PayoutYear>,
}

/// Main projection engine
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    assumptions: Assumptions,
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with given assumptions and config
    pub fn new(assumptions: Assumptions, config: ProjectionConfig) -> Self {
        Self { assumptions, config }
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Constant yearly contribution after the creative-income exemption
    pub fn annual_contribution(&self, input: &ProjectionInput) -> f64 {
        let base = self
            .assumptions
            .copyright
            .contribution_base(input.annual_gross_salary, input.copyright_percentage);
        base * input.pension_contribution_rate
    }

    /// Run projection from the current age to the target retirement age
    pub fn project(&self, input: &ProjectionInput) -> ProjectionResult {
        let annual_contribution = self.annual_contribution(input);
        let mut state = AccumulationState::from_input(input, self.config.start_year);
        let mut result = ProjectionResult::new(state.capital, annual_contribution);

        if input.target_retirement_age < input.current_age {
            log::debug!(
                "target age {} below current age {}, nothing to project",
                input.target_retirement_age,
                input.current_age
            );
            return result;
        }

        result.add_row(Self::row(&state));

        for _year in 0..input.years_to_simulate() {
            state.advance_year(input.capital_indexation_rate, annual_contribution);
            result.add_row(Self::row(&state));
        }

        result.final_capital = state.capital;
        result.total_indexation = state.total_indexation;

        log::debug!(
            "projected {} years from age {}: final capital {:.0}",
            state.projection_year,
            input.current_age,
            result.final_capital
        );

        result
    }

    /// Run independent projections in parallel, preserving input order
    pub fn project_batch(&self, inputs: &[ProjectionInput]) -> Vec<ProjectionResult> {
        inputs.par_iter().map(|input| self.project(input)).collect()
    }

    /// Project to the target age and annuitize the final balance
    pub fn estimate(
        &self,
        input: &ProjectionInput,
        life_expectancy_months: f64,
        minimal_pension: f64,
    ) -> RetirementEstimate {
        let projection = self.project(input);
        let first_year = annuity::first_year_pension(
            projection.final_capital,
            life_expectancy_months,
            minimal_pension,
        );
        let monthly_pension = round_currency(first_year);
        let payout = &self.assumptions.payout;

        RetirementEstimate {
            payout_schedule: annuity::payout_schedule(monthly_pension, payout.annual_rate, payout.forecast_years),
            projection,
            monthly_pension,
        }
    }

    fn row(state: &AccumulationState) -> TrajectoryRow {
        TrajectoryRow {
            year: state.calendar_year,
            age: state.age,
            capital: state.capital,
        }
    }
}

impl Default for ProjectionEngine {
    fn default() -> Self {
        Self::new(Assumptions::default_statutory(), ProjectionConfig::default())
    }
}

/// Project with statutory defaults, starting in the current calendar year
pub fn project(input: &ProjectionInput) -> ProjectionResult {
    ProjectionEngine::default().project(input)
}
