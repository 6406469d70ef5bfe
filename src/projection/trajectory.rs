//! Trajectory output structures for capital projections

use serde::{Deserialize, Serialize};

/// Capital at the end of one projected year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectoryRow {
    pub year: i32,
    pub age: u32,
    /// Rounded to whole currency units
    pub capital: f64,
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    /// Year-end rows from the current age to the target age inclusive
    pub trajectory: Vec<TrajectoryRow>,

    /// Capital at the target age, rounded to whole units
    pub final_capital: f64,

    /// Constant contribution added every simulated year
    pub annual_contribution: f64,

    /// Growth from indexation over the whole projection
    pub total_indexation: f64,
}

impl ProjectionResult {
    pub fn new(final_capital: f64, annual_contribution: f64) -> Self {
        Self {
            trajectory: Vec::new(),
            final_capital,
            annual_contribution,
            total_indexation: 0.0,
        }
    }

    /// Add a trajectory row
    pub fn add_row(&mut self, row: TrajectoryRow) {
        self.trajectory.push(row);
    }

    /// Number of simulated years (the starting row is not a simulated year)
    pub fn years_simulated(&self) -> u32 {
        self.trajectory.len().saturating_sub(1) as u32
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let years_simulated = self.years_simulated();
        let starting_capital = self.trajectory.first().map(|r| r.capital).unwrap_or(self.final_capital);

        ProjectionSummary {
            years_simulated,
            starting_capital,
            total_contributions: self.annual_contribution * years_simulated as f64,
            total_indexation: self.total_indexation,
            final_capital: self.final_capital,
        }
    }

    /// Write the trajectory as CSV (year, age, capital)
    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in &self.trajectory {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub years_simulated: u32,
    pub starting_capital: f64,
    pub total_contributions: f64,
    pub total_indexation: f64,
    pub final_capital: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProjectionResult {
        let mut result = ProjectionResult::new(2_100.0, 1_000.0);
        result.add_row(TrajectoryRow { year: 2030, age: 64, capital: 0.0 });
        result.add_row(TrajectoryRow { year: 2031, age: 65, capital: 1_000.0 });
        result.add_row(TrajectoryRow { year: 2032, age: 66, capital: 2_100.0 });
        result.total_indexation = 100.0;
        result
    }

    #[test]
    fn test_summary() {
        let summary = sample().summary();
        assert_eq!(summary.years_simulated, 2);
        assert_eq!(summary.starting_capital, 0.0);
        assert_eq!(summary.total_contributions, 2_000.0);
        assert_eq!(summary.total_indexation, 100.0);
        assert_eq!(summary.final_capital, 2_100.0);
    }

    #[test]
    fn test_empty_trajectory_summary() {
        let result = ProjectionResult::new(500.0, 0.0);
        let summary = result.summary();
        assert_eq!(summary.years_simulated, 0);
        assert_eq!(summary.starting_capital, 500.0);
    }

    #[test]
    fn test_write_csv() {
        let mut buffer = Vec::new();
        sample().write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("year,age,capital"));
        assert_eq!(lines.next(), Some("2030,64,0.0"));
        assert_eq!(text.lines().count(), 4);
    }
}
