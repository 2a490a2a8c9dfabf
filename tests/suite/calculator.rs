//! Calculator driven through site config, the way the CLI runs it.

use beacon_calc::{Projector, calculate, calculate_raw};
use beacon_config::SiteConfig;
use beacon_types::{HORIZON_YEARS, MAX_CYCLES_PER_DECADE, MAX_TERM_YEARS};

use crate::common::load_config;

#[test]
fn default_config_reproduces_the_published_example() {
    let bounds = SiteConfig::default().slider_bounds();
    let input = bounds.clamp(80_000.0, 7.9, 5.0, 2.0);
    let result = calculate(&input);

    let drift = (result.monthly_payment - 1616.56).abs() / 1616.56;
    assert!(drift < 0.002, "payment {}", result.monthly_payment);
    let drift = (result.interest_per_cycle - 16_993.6).abs() / 16_993.6;
    assert!(drift < 0.01, "interest {}", result.interest_per_cycle);

    let years: Vec<u32> = result.projections.iter().map(|p| p.year).collect();
    assert_eq!(years, HORIZON_YEARS.to_vec());
}

#[test]
fn repeated_raw_calls_are_bit_identical() {
    let first = calculate_raw(43_210.0, 6.25, 7.0, 3.0);
    for _ in 0..10 {
        let again = calculate_raw(43_210.0, 6.25, 7.0, 3.0);
        assert_eq!(again, first);
        for (a, b) in again.projections.iter().zip(&first.projections) {
            assert_eq!(a.total_bleed.to_bits(), b.total_bleed.to_bits());
        }
    }
}

#[test]
fn zero_rate_stays_finite() {
    let result = calculate_raw(12_000.0, 0.0, 5.0, 2.0);
    assert_eq!(result.monthly_payment, 12_000.0 / 60.0);
    assert_eq!(result.interest_per_cycle, 0.0);
    for projection in &result.projections {
        assert!(projection.total_bleed.is_finite());
        assert_eq!(projection.total_bleed, 0.0);
    }
}

#[test]
fn bleed_never_shrinks_with_horizon() {
    for (principal, rate, term, cycles) in [
        (80_000.0, 7.9, 5.0, 2.0),
        (5_000.0, 3.5, 2.0, 1.0),
        (150_000.0, 12.0, 8.0, 4.0),
    ] {
        let result = calculate_raw(principal, rate, term, cycles);
        for pair in result.projections.windows(2) {
            assert!(pair[1].total_bleed >= pair[0].total_bleed, "{pair:?}");
        }
    }
}

#[test]
fn configured_slider_override_clamps_projector_input() {
    let config = load_config(
        r"
[calculator.principal]
min = 10000
max = 50000
step = 1000
default = 25000
",
    );
    let mut projector = Projector::new(config.slider_bounds());

    let capped = projector.update_raw(80_000.0, 7.9, 5.0, 2.0).clone();
    let at_max = calculate_raw(50_000.0, 7.9, 5.0, 2.0);
    assert_eq!(capped, at_max);

    projector.update_raw(80_000.0, 7.9, 5.0, 2.0);
    assert_eq!(projector.computations(), 1);
}

#[test]
fn extreme_slider_overrides_still_give_finite_results() {
    let config = load_config(
        r"
[calculator.rate]
max = 100.0
[calculator.term]
max = 800.0
[calculator.cycles]
max = 1e12
",
    );
    let input = config.slider_bounds().clamp(80_000.0, 100.0, 800.0, 1e12);
    assert_eq!(input.term_years(), MAX_TERM_YEARS);
    assert_eq!(input.cycles_per_decade(), MAX_CYCLES_PER_DECADE);

    let result = calculate(&input);
    assert!(result.monthly_payment.is_finite() && result.monthly_payment > 0.0);
    assert!(result.interest_per_cycle > 0.0);
    for projection in &result.projections {
        assert!(projection.total_bleed.is_finite() && projection.total_bleed > 0.0);
    }
}
