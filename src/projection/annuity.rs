//! Annuitization of a capital balance and payout indexation

use serde::{Deserialize, Serialize};

use super::round_currency;

/// Monthly payout for one year of retirement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutYear {
    /// 1 = first year of retirement
    pub payout_year: u32,
    pub monthly_pension: f64,
}

/// Monthly pension from capital spread over the expected payout months
///
/// Returns 0 when the capital or the life expectancy is not positive; no
/// division is performed in that case.
pub fn monthly_pension_from_capital(final_capital: f64, life_expectancy_months: f64) -> f64 {
    if final_capital > 0.0 && life_expectancy_months > 0.0 {
        final_capital / life_expectancy_months
    } else {
        0.0
    }
}

/// Statutory floor, applied after annuitization
pub fn apply_minimal_floor(monthly_pension: f64, minimal_pension: f64) -> f64 {
    monthly_pension.max(minimal_pension)
}

/// First-year monthly pension (unrounded): annuitized capital with the floor applied
pub fn first_year_pension(final_capital: f64, life_expectancy_months: f64, minimal_pension: f64) -> f64 {
    apply_minimal_floor(
        monthly_pension_from_capital(final_capital, life_expectancy_months),
        minimal_pension,
    )
}

/// Monthly pension in a given payout year after yearly indexation
///
/// Year 1 is the unindexed amount; year n has been indexed n - 1 times.
pub fn indexed_payout(first_year: f64, annual_rate: f64, payout_year: u32) -> f64 {
    let periods = payout_year.saturating_sub(1);
    (0..periods).fold(first_year, |amount, _| amount * (1.0 + annual_rate))
}

/// Rounded monthly pension for payout years 1..=years
pub fn payout_schedule(first_year: f64, annual_rate: f64, years: u32) -> Vec<PayoutYear> {
    (1..=years)
        .map(|payout_year| PayoutYear {
            payout_year,
            monthly_pension: round_currency(indexed_payout(first_year, annual_rate, payout_year)),
        })
        .collect()
}
