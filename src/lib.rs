//! Pension Projection - capital-accumulation retirement calculator engine
//!
//! This library provides:
//! - Year-by-year projection of an individual pension account to a target age
//! - Annuitization of the final balance with a statutory minimal-pension floor
//! - A retirement options table across a range of ages
//! - Calculator form validation and salary normalization (net/gross, monthly/annual)
//! - Statutory parameters loaded from built-ins or CSV
//! - Calculation history stores

pub mod assumptions;
pub mod projection;
pub mod options;
pub mod input;
pub mod history;

// Re-export commonly used types
pub use assumptions::Assumptions;
pub use projection::{ProjectionConfig, ProjectionEngine, ProjectionInput, ProjectionResult, RetirementEstimate};
pub use options::{RetirementOption, RetirementOptionsSweeper, SweepConfig, SweepParams};
pub use input::{CalculatorForm, NormalizedInputs, ValidationErrors};
pub use history::{CalculationStore, CsvHistoryStore, HistoryFilter, InMemoryStore};
