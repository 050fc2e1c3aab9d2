//! Property-based tests for parsing, reduction and presentation.

use crate::{fraction, parse, Expression, Term};
use proptest::prelude::*;

/// Coefficients with at most two decimal places, so they survive being
/// printed and parsed again.
fn coefficient() -> impl Strategy<Value = f64> {
    (-10_000_i64..10_000).prop_map(|hundredths| hundredths as f64 / 100.0)
}

fn term() -> impl Strategy<Value = Term> {
    (coefficient(), 0_u32..=2)
        .prop_map(|(value, power)| Term::new(value, power))
}

fn side() -> impl Strategy<Value = Vec<Term>> {
    proptest::collection::vec(term(), 1..6)
}

fn expression() -> impl Strategy<Value = Expression> {
    (side(), side()).prop_map(|(left, right)| Expression::new(left, right))
}

proptest! {
    #[test]
    fn reduction_is_idempotent(expr in expression()) {
        let once = expr.reduced();
        let twice = once.clone().reduced();

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn reduced_form_is_canonical(expr in expression()) {
        let reduced = expr.reduced();

        prop_assert!(reduced.right().is_empty());
        prop_assert!(reduced.left().iter().all(|term| !term.is_zero()));

        let powers: Vec<u32> =
            reduced.left().iter().map(|t| t.power()).collect();
        prop_assert!(
            powers.windows(2).all(|pair| pair[0] > pair[1]),
            "{:?} should be strictly decreasing",
            powers
        );
    }

    #[test]
    fn display_round_trips_through_the_parser(expr in expression()) {
        let reduced = expr.reduced();
        let text = reduced.to_string();

        let reparsed = parse(&text).unwrap().reduced();

        prop_assert_eq!(reparsed.left().len(), reduced.left().len());
        for (got, original) in reparsed.left().iter().zip(reduced.left()) {
            prop_assert_eq!(got.power(), original.power());
            prop_assert!((got.value() - original.value()).abs() < 1e-9);
        }
    }

    #[test]
    fn unreduced_display_also_parses(expr in expression()) {
        let text = expr.to_string();

        let reparsed = parse(&text).unwrap();

        prop_assert_eq!(reparsed.left().len(), expr.left().len());
        prop_assert_eq!(reparsed.right().len(), expr.right().len());
    }

    #[test]
    fn fractions_respect_the_denominator_bound(
        value in -1000.0_f64..1000.0,
        max_denominator in 1_i64..1024,
    ) {
        let got = fraction::closest_fraction(value, max_denominator).unwrap();

        prop_assert!(*got.denom() <= max_denominator);
        let error = (fraction::ratio_to_f64(&got) - value).abs();
        prop_assert!(
            error <= 1.0 / max_denominator as f64,
            "{} is too far from {}",
            got,
            value
        );
    }

    #[test]
    fn solving_never_produces_nan(expr in expression()) {
        let mut expr = expr;
        let report = expr.solve(&Default::default());

        for root in report.real_roots() {
            prop_assert!(root.is_finite());
        }
    }
}
