//! Projection state tracking for a single capital account

use super::input::ProjectionInput;
use super::round_currency;

/// State of the capital account at a year end during projection
#[derive(Debug, Clone)]
pub struct AccumulationState {
    /// Years simulated so far (0 = starting point)
    pub projection_year: u32,

    /// Calendar year of this state
    pub calendar_year: i32,

    /// Attained age
    pub age: u32,

    /// Capital at the year end, rounded to whole units
    pub capital: f64,

    /// Cumulative contributions paid in since the start
    pub total_contributions: f64,

    /// Cumulative growth from indexation since the start
    pub total_indexation: f64,
}

impl AccumulationState {
    /// Initialize state from the projection input at the starting point
    pub fn from_input(input: &ProjectionInput, start_year: i32) -> Self {
        Self {
            projection_year: 0,
            calendar_year: start_year,
            age: input.current_age,
            capital: round_currency(input.initial_capital),
            total_contributions: 0.0,
            total_indexation: 0.0,
        }
    }

    /// Advance one year: index the balance, then add the contribution
    ///
    /// Capital is rounded at the year end and the next year compounds from
    /// the rounded balance.
    pub fn advance_year(&mut self, indexation_rate: f64, annual_contribution: f64) {
        let indexation = self.capital * indexation_rate;
        let unrounded = self.capital + indexation + annual_contribution;

        self.projection_year += 1;
        self.calendar_year += 1;
        self.age += 1;
        self.capital = round_currency(unrounded);
        self.total_contributions += annual_contribution;
        self.total_indexation += indexation;
    }
}
