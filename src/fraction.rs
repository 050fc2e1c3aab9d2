//! Presenting floating point answers as something a human would write down.

use num_rational::Ratio;

/// Decimal places shown when a value isn't an integer.
pub const DEFAULT_PRECISION: usize = 3;

/// The largest denominator [`closest_fraction()`] will consider by default.
pub const DEFAULT_MAX_DENOMINATOR: i64 = 128;

/// Values are rounded to this many decimal places before looking for a
/// fraction, so `0.1 + 0.2` is treated as `0.3`.
const FRACTION_INPUT_PRECISION: i32 = 8;

/// Round to a fixed number of decimal places, normalising `-0.0` to `0.0`.
pub fn round_to(value: f64, precision: usize) -> f64 {
    let scale = 10_f64.powi(precision as i32);
    (value * scale).round() / scale + 0.0
}

/// Does this value (ignoring floating point noise) have no fractional part?
pub fn is_integral(value: f64) -> bool {
    let rounded = round_to(value, FRACTION_INPUT_PRECISION as usize);
    rounded.fract() == 0.0
}

/// Format a number the way it should appear in a report, as an integer if it
/// is one, otherwise rounded to `precision` decimal places.
pub fn format_number(value: f64, precision: usize) -> String {
    if is_integral(value) {
        format!("{}", round_to(value, 0))
    } else {
        format!("{}", round_to(value, precision))
    }
}

/// Find the fraction closest to `value` whose denominator is at most
/// `max_denominator`.
///
/// The value is first rounded to 8 decimal places and converted to an exact
/// ratio, which is then narrowed using its continued fraction expansion.
/// Returns `None` when the value is too large (or not finite) to be
/// represented as a ratio of 64-bit integers.
pub fn closest_fraction(
    value: f64,
    max_denominator: i64,
) -> Option<Ratio<i64>> {
    assert!(max_denominator >= 1, "The max denominator must be at least 1");

    let scale = 10_i64.pow(FRACTION_INPUT_PRECISION as u32);
    let scaled = (value * scale as f64).round();

    if !scaled.is_finite() || scaled.abs() >= i64::MAX as f64 {
        return None;
    }

    let exact = Ratio::new(scaled as i64, scale);
    let limited = limit_denominator(
        exact.numer().abs(),
        *exact.denom(),
        max_denominator,
    );

    if exact.numer().is_negative() {
        Some(-limited)
    } else {
        Some(limited)
    }
}

/// The closest `p/q` to `numerator/denominator` with `q <= max_denominator`,
/// for a non-negative ratio already in lowest terms.
///
/// This walks the convergents of the continued fraction until the next one
/// would exceed the bound, then picks between the last convergent and the
/// best semiconvergent.
fn limit_denominator(
    numerator: i64,
    denominator: i64,
    max_denominator: i64,
) -> Ratio<i64> {
    if denominator <= max_denominator {
        return Ratio::new(numerator, denominator);
    }

    let (mut p0, mut q0, mut p1, mut q1) = (0_i64, 1_i64, 1_i64, 0_i64);
    let (mut n, mut d) = (numerator, denominator);

    loop {
        let a = n / d;
        let q2 = q0 + a * q1;
        if q2 > max_denominator {
            break;
        }

        let p2 = p0 + a * p1;
        p0 = p1;
        q0 = q1;
        p1 = p2;
        q1 = q2;

        let remainder = n - a * d;
        n = d;
        d = remainder;

        if d == 0 {
            break;
        }
    }

    let k = (max_denominator - q0) / q1;
    let semiconvergent = Ratio::new(p0 + k * p1, q0 + k * q1);
    let convergent = Ratio::new(p1, q1);

    let target = numerator as f64 / denominator as f64;
    let distance =
        |r: &Ratio<i64>| (*r.numer() as f64 / *r.denom() as f64 - target).abs();

    if distance(&convergent) <= distance(&semiconvergent) {
        convergent
    } else {
        semiconvergent
    }
}

/// Convert a [`Ratio`] back to a float.
pub fn ratio_to_f64(ratio: &Ratio<i64>) -> f64 {
    *ratio.numer() as f64 / *ratio.denom() as f64
}
