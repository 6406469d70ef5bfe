//! Capital projection engine and annuitization

mod input;
mod state;
mod engine;
mod trajectory;
pub mod annuity;

pub use input::{InputError, ProjectionInput};
pub use state::AccumulationState;
pub use engine::{project, round_currency, ProjectionConfig, ProjectionEngine, RetirementEstimate};
pub use trajectory::{ProjectionResult, ProjectionSummary, TrajectoryRow};
pub use annuity::PayoutYear;
