//! Calculator domain: financing inputs, slider bounds and projection results.
//!
//! A [`FinancingInput`] only exists in a valid state. It is produced either by
//! [`FinancingInput::new`], which rejects bad values, or by
//! [`SliderBounds::clamp`], which clamps raw UI values into range. Either way
//! the amortization formula never sees NaN, a negative principal, a zero term
//! or a term and cycle count large enough to overflow the projection.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Projection horizons, in years, reported for every calculation.
pub const HORIZON_YEARS: [u32; 4] = [5, 10, 20, 30];

/// Smallest principal a clamped input will carry.
const MIN_PRINCIPAL: f64 = 1.0;
pub const MAX_PRINCIPAL: f64 = 1e12;
pub const MAX_RATE_PERCENT: f64 = 100.0;
/// Longest loan term accepted, in years.
pub const MAX_TERM_YEARS: u32 = 100;
/// Monthly refinancing is the most frequent cycle accepted.
pub const MAX_CYCLES_PER_DECADE: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InputError {
    #[error("principal must be a finite number (got {0})")]
    PrincipalNotFinite(f64),
    #[error("principal must be positive (got {0})")]
    PrincipalNotPositive(f64),
    #[error("principal must be at most {max} (got {0})", max = MAX_PRINCIPAL)]
    PrincipalTooLarge(f64),
    #[error("annual rate must be within [0, 100] percent (got {0})")]
    RateOutOfRange(f64),
    #[error("term must be at least one year")]
    ZeroTerm,
    #[error("term must be at most {max} years (got {0})", max = MAX_TERM_YEARS)]
    TermTooLong(u32),
    #[error("cycles per decade must be at least one")]
    ZeroCycles,
    #[error("cycles per decade must be at most {max} (got {0})", max = MAX_CYCLES_PER_DECADE)]
    TooManyCycles(u32),
}

/// Validated financing parameters.
///
/// Invariant: `0 < principal <= MAX_PRINCIPAL`, `0 <= annual_rate_percent <= 100`,
/// `1 <= term_years <= MAX_TERM_YEARS`,
/// `1 <= cycles_per_decade <= MAX_CYCLES_PER_DECADE`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinancingInput {
    principal: f64,
    annual_rate_percent: f64,
    term_years: u32,
    cycles_per_decade: u32,
}

impl FinancingInput {
    pub fn new(
        principal: f64,
        annual_rate_percent: f64,
        term_years: u32,
        cycles_per_decade: u32,
    ) -> Result<Self, InputError> {
        if !principal.is_finite() {
            return Err(InputError::PrincipalNotFinite(principal));
        }
        if principal <= 0.0 {
            return Err(InputError::PrincipalNotPositive(principal));
        }
        if principal > MAX_PRINCIPAL {
            return Err(InputError::PrincipalTooLarge(principal));
        }
        if !(0.0..=MAX_RATE_PERCENT).contains(&annual_rate_percent) {
            // NaN fails `contains` as well.
            return Err(InputError::RateOutOfRange(annual_rate_percent));
        }
        if term_years == 0 {
            return Err(InputError::ZeroTerm);
        }
        if term_years > MAX_TERM_YEARS {
            return Err(InputError::TermTooLong(term_years));
        }
        if cycles_per_decade == 0 {
            return Err(InputError::ZeroCycles);
        }
        if cycles_per_decade > MAX_CYCLES_PER_DECADE {
            return Err(InputError::TooManyCycles(cycles_per_decade));
        }
        Ok(Self {
            principal,
            annual_rate_percent,
            term_years,
            cycles_per_decade,
        })
    }

    #[must_use]
    pub fn principal(&self) -> f64 {
        self.principal
    }

    #[must_use]
    pub fn annual_rate_percent(&self) -> f64 {
        self.annual_rate_percent
    }

    #[must_use]
    pub fn term_years(&self) -> u32 {
        self.term_years
    }

    #[must_use]
    pub fn cycles_per_decade(&self) -> u32 {
        self.cycles_per_decade
    }

    /// Number of monthly payments over the term. Never zero.
    #[must_use]
    pub fn num_payments(&self) -> u32 {
        self.term_years * 12
    }

    /// Bitwise identity of the input tuple, used as a memoization key.
    #[must_use]
    pub fn memo_key(&self) -> (u64, u64, u32, u32) {
        (
            self.principal.to_bits(),
            self.annual_rate_percent.to_bits(),
            self.term_years,
            self.cycles_per_decade,
        )
    }
}

/// One bounded slider on the calculator page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slider {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

impl Slider {
    #[must_use]
    pub const fn new(min: f64, max: f64, step: f64, default: f64) -> Self {
        Self {
            min,
            max,
            step,
            default,
        }
    }

    /// Clamp a raw value into `[min, max]`. Non-finite values take the default.
    #[must_use]
    pub fn clamp(&self, raw: f64) -> f64 {
        if !raw.is_finite() {
            return self.default;
        }
        // `f64::clamp` panics when min > max; a misconfigured slider collapses to `min`.
        raw.max(self.min).min(self.max.max(self.min))
    }
}

/// Slider bounds for the four calculator inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderBounds {
    pub principal: Slider,
    pub rate: Slider,
    pub term: Slider,
    pub cycles: Slider,
}

impl Default for SliderBounds {
    fn default() -> Self {
        Self {
            principal: Slider::new(5_000.0, 500_000.0, 1_000.0, 80_000.0),
            rate: Slider::new(0.0, 30.0, 0.1, 7.9),
            term: Slider::new(1.0, 30.0, 1.0, 5.0),
            cycles: Slider::new(1.0, 10.0, 1.0, 2.0),
        }
    }
}

impl SliderBounds {
    /// Clamp raw UI values into a valid [`FinancingInput`].
    ///
    /// Slider bounds are applied first, then the domain limits, so a
    /// misconfigured slider still cannot produce an invalid input.
    #[must_use]
    pub fn clamp(&self, principal: f64, rate: f64, term: f64, cycles: f64) -> FinancingInput {
        let principal = self
            .principal
            .clamp(principal)
            .clamp(MIN_PRINCIPAL, MAX_PRINCIPAL);
        let annual_rate_percent = self.rate.clamp(rate).clamp(0.0, MAX_RATE_PERCENT);
        let term_years = (self.term.clamp(term).round() as u32).clamp(1, MAX_TERM_YEARS);
        let cycles_per_decade =
            (self.cycles.clamp(cycles).round() as u32).clamp(1, MAX_CYCLES_PER_DECADE);
        FinancingInput {
            principal,
            annual_rate_percent,
            term_years,
            cycles_per_decade,
        }
    }

    /// The input the calculator page opens with.
    #[must_use]
    pub fn defaults(&self) -> FinancingInput {
        self.clamp(
            self.principal.default,
            self.rate.default,
            self.term.default,
            self.cycles.default,
        )
    }
}

/// Cost projection for one horizon.
///
/// Invariant: `total_bleed == interest_paid + opportunity_cost`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearProjection {
    pub year: u32,
    pub interest_paid: f64,
    pub opportunity_cost: f64,
    pub total_bleed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub monthly_payment: f64,
    pub interest_per_cycle: f64,
    /// One entry per [`HORIZON_YEARS`] value, in ascending order.
    pub projections: Vec<YearProjection>,
}
