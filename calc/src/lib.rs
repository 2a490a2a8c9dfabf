//! Interest-bleed calculator.
//!
//! Given a loan (principal, rate, term) that a household re-finances
//! `cycles_per_decade` times every ten years, project how much interest leaves
//! the household over each horizon in [`HORIZON_YEARS`], and what that money
//! would have grown to if it had been invested instead.
//!
//! # Algorithm
//!
//! 1. Standard amortizing payment: `P * r * (1+r)^n / ((1+r)^n - 1)` with
//!    `r` the monthly rate and `n` the number of monthly payments. A zero rate
//!    falls back to straight-line `P / n`.
//! 2. `interest_per_cycle = payment * n - P`.
//! 3. For each horizon, `cycles = year / 10 * cycles_per_decade` (fractional).
//!    Each started cycle's interest is compounded at [`OPPORTUNITY_RATE`] for
//!    the years left in the horizon; the sum is the total bleed.
//!
//! All functions are pure. [`Projector`] adds input-keyed memoization for
//! callers that recompute on every slider event.

mod projector;

pub use projector::Projector;

use beacon_types::{
    CalculationResult, FinancingInput, HORIZON_YEARS, SliderBounds, YearProjection,
};

/// Annual return the interest could have earned if invested instead.
pub const OPPORTUNITY_RATE: f64 = 0.06;

const MONTHS_PER_YEAR: f64 = 12.0;
const YEARS_PER_DECADE: f64 = 10.0;

/// Run the full projection for a validated input.
#[must_use]
pub fn calculate(input: &FinancingInput) -> CalculationResult {
    let num_payments = f64::from(input.num_payments());
    let monthly_rate = input.annual_rate_percent() / 100.0 / MONTHS_PER_YEAR;
    let monthly_payment = monthly_payment(input.principal(), monthly_rate, num_payments);

    let total_paid = monthly_payment * num_payments;
    // Non-negative for any rate >= 0; the clamp only absorbs float noise near zero.
    let interest_per_cycle = (total_paid - input.principal()).max(0.0);

    let projections = HORIZON_YEARS
        .iter()
        .map(|&year| project(year, interest_per_cycle, input.cycles_per_decade()))
        .collect();

    CalculationResult {
        monthly_payment,
        interest_per_cycle,
        projections,
    }
}

/// Clamp raw slider values with the default bounds, then calculate.
#[must_use]
pub fn calculate_raw(
    principal: f64,
    annual_rate_percent: f64,
    term_years: f64,
    cycles_per_decade: f64,
) -> CalculationResult {
    let input = SliderBounds::default().clamp(
        principal,
        annual_rate_percent,
        term_years,
        cycles_per_decade,
    );
    calculate(&input)
}

/// Level monthly payment for an amortizing loan.
///
/// `num_payments` must be positive; [`FinancingInput`] guarantees it.
#[must_use]
pub fn monthly_payment(principal: f64, monthly_rate: f64, num_payments: f64) -> f64 {
    if monthly_rate == 0.0 {
        return principal / num_payments;
    }
    let growth = (1.0 + monthly_rate).powf(num_payments);
    if growth == 1.0 {
        // Rate too small to register in f64.
        return principal / num_payments;
    }
    // Finite even when `growth` overflows: the payment tends to interest-only.
    principal * monthly_rate / (1.0 - growth.recip())
}

/// Project interest and foregone returns over one horizon.
#[must_use]
pub fn project(year: u32, interest_per_cycle: f64, cycles_per_decade: u32) -> YearProjection {
    let horizon = f64::from(year);
    let cycles_per_decade = f64::from(cycles_per_decade);
    let cycles_in_period = horizon / YEARS_PER_DECADE * cycles_per_decade;
    let cycle_length_years = YEARS_PER_DECADE / cycles_per_decade;

    let interest_paid = interest_per_cycle * cycles_in_period;

    // Every cycle that has started inside the horizon contributes in full; a
    // trailing fractional cycle is counted like a whole one.
    let mut opportunity_return = 0.0;
    let mut cycle = 0.0;
    while cycle < cycles_in_period {
        let years_remaining = horizon - cycle * cycle_length_years;
        opportunity_return += interest_per_cycle * (1.0 + OPPORTUNITY_RATE).powf(years_remaining);
        cycle += 1.0;
    }

    YearProjection {
        year,
        interest_paid,
        opportunity_cost: opportunity_return - interest_paid,
        total_bleed: opportunity_return,
    }
}
