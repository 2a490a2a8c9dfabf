//! Memoized recomputation for slider-driven callers.

use beacon_types::{CalculationResult, FinancingInput, SliderBounds};
use tracing::trace;

use crate::calculate;

type MemoKey = (u64, u64, u32, u32);

/// Recomputes on every input change and returns the cached result otherwise.
///
/// The cache holds exactly one entry keyed on the bitwise input tuple, so a
/// result is never stale with respect to the last input it was asked about.
#[derive(Debug, Default)]
pub struct Projector {
    bounds: SliderBounds,
    last: Option<(MemoKey, CalculationResult)>,
    computations: u64,
}

impl Projector {
    #[must_use]
    pub fn new(bounds: SliderBounds) -> Self {
        Self {
            bounds,
            last: None,
            computations: 0,
        }
    }

    /// Result for a validated input.
    pub fn update(&mut self, input: &FinancingInput) -> &CalculationResult {
        let key = input.memo_key();
        if matches!(&self.last, Some((last_key, _)) if *last_key != key) {
            self.last = None;
        }
        let computations = &mut self.computations;
        let (_, result) = self.last.get_or_insert_with(|| {
            trace!(
                principal = input.principal(),
                rate = input.annual_rate_percent(),
                term = input.term_years(),
                cycles = input.cycles_per_decade(),
                "recomputing projection"
            );
            *computations += 1;
            (key, calculate(input))
        });
        result
    }

    /// Clamp raw slider values with this projector's bounds, then update.
    pub fn update_raw(
        &mut self,
        principal: f64,
        rate: f64,
        term: f64,
        cycles: f64,
    ) -> &CalculationResult {
        let input = self.bounds.clamp(principal, rate, term, cycles);
        self.update(&input)
    }

    /// How many times the projection has actually been computed.
    #[must_use]
    pub fn computations(&self) -> u64 {
        self.computations
    }
}

#[cfg(test)]
mod tests {
    use super::Projector;
    use beacon_types::{FinancingInput, SliderBounds};

    #[test]
    fn identical_input_hits_cache() {
        let mut projector = Projector::new(SliderBounds::default());
        let input = FinancingInput::new(80_000.0, 7.9, 5, 2).unwrap();
        let first = projector.update(&input).clone();
        let second = projector.update(&input).clone();
        assert_eq!(first, second);
        assert_eq!(projector.computations(), 1);
    }

    #[test]
    fn changed_input_recomputes() {
        let mut projector = Projector::new(SliderBounds::default());
        let payment_a = projector.update_raw(80_000.0, 7.9, 5.0, 2.0).monthly_payment;
        let payment_b = projector.update_raw(90_000.0, 7.9, 5.0, 2.0).monthly_payment;
        assert!(payment_b > payment_a);
        assert_eq!(projector.computations(), 2);
    }

    #[test]
    fn clamped_values_share_a_cache_entry() {
        let mut projector = Projector::new(SliderBounds::default());
        projector.update_raw(1.0e9, 7.9, 5.0, 2.0);
        projector.update_raw(2.0e9, 7.9, 5.0, 2.0);
        assert_eq!(projector.computations(), 1);
    }
}
