use crate::{
    algebra::{parse, ParseError, Term},
    solve::{self, Options, SolutionReport},
};
use std::{
    collections::BTreeMap,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// Whether an [`Expression`] has been reduced to its canonical form yet.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum State {
    Parsed,
    Reduced,
}

/// A polynomial equation, `left = right`.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    left: Vec<Term>,
    right: Vec<Term>,
    state: State,
}

impl Expression {
    pub fn new(left: Vec<Term>, right: Vec<Term>) -> Self {
        Expression {
            left,
            right,
            state: State::Parsed,
        }
    }

    pub fn left(&self) -> &[Term] { &self.left }

    pub fn right(&self) -> &[Term] { &self.right }

    pub fn state(&self) -> State { self.state }

    pub fn is_reduced(&self) -> bool { self.state == State::Reduced }

    /// The highest power on either side of the equation, as it is currently
    /// written.
    ///
    /// Terms may cancel out during reduction, so this can shrink after calling
    /// [`Expression::reduce()`].
    pub fn degree(&self) -> u32 {
        self.left
            .iter()
            .chain(&self.right)
            .map(|term| term.power())
            .max()
            .unwrap_or(0)
    }

    /// Rewrite the equation in its canonical form.
    ///
    /// Every term is moved to the left hand side, terms with the same power
    /// are merged, anything which cancels out is dropped, and the remainder is
    /// sorted from highest to lowest power. Reducing an already reduced
    /// [`Expression`] does nothing.
    pub fn reduce(&mut self) {
        if self.is_reduced() {
            return;
        }

        let right = std::mem::take(&mut self.right);
        self.left.extend(right.into_iter().map(|term| -term));

        let mut by_power: BTreeMap<u32, Vec<Term>> = BTreeMap::new();

        for term in self.left.drain(..) {
            by_power.entry(term.power()).or_default().push(term);
        }

        self.left = by_power
            .into_iter()
            .rev()
            .map(|(_, like_terms)| collect_like_terms(&like_terms))
            .filter(|term| !term.is_zero())
            .collect();
        self.state = State::Reduced;

        log::debug!("Reduced form: {}", self);
    }

    /// Consume the [`Expression`], returning its reduced form.
    pub fn reduced(mut self) -> Self {
        self.reduce();
        self
    }

    /// Get the coefficients, `(a, b, c)`, for the equation when written as
    /// `a*x^2 + b*x + c = 0`.
    pub fn coefficients(&mut self) -> (f64, f64, f64) {
        self.reduce();

        let coefficient = |power: u32| {
            self.left
                .iter()
                .find(|term| term.power() == power)
                .map_or(0.0, |term| term.value())
        };

        (coefficient(2), coefficient(1), coefficient(0))
    }

    /// Reduce the equation and find its solutions.
    pub fn solve(&mut self, options: &Options) -> SolutionReport {
        let coefficients = self.coefficients();
        solve::solve_with(self.degree(), coefficients, options)
    }
}

/// Fold terms which all share the same power into one.
///
/// A single term is kept as written. When several terms are folded and their
/// sum is negligible next to the largest of them, they cancelled out.
fn collect_like_terms(like_terms: &[Term]) -> Term {
    let (&first, rest) = like_terms
        .split_first()
        .expect("Groups always contain at least one term");

    let sum = rest
        .iter()
        .try_fold(first, |sum, &term| sum.checked_add(term))
        .expect("Terms are grouped by power");

    if rest.is_empty() {
        return sum;
    }

    let largest = like_terms
        .iter()
        .map(|term| term.value().abs())
        .fold(0.0, f64::max);

    sum.cancelled_against(largest)
}

impl FromStr for Expression {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { parse(s) }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_side(&self.left, f)?;
        write!(f, " = ")?;
        write_side(&self.right, f)?;

        Ok(())
    }
}

fn write_side(terms: &[Term], f: &mut Formatter<'_>) -> fmt::Result {
    let (first, rest) = match terms.split_first() {
        Some(split) => split,
        None => return write!(f, "0"),
    };

    write!(f, "{}", first)?;

    for term in rest {
        if term.value().is_sign_negative() {
            write!(f, " - {}", -*term)?;
        } else {
            write!(f, " + {}", term)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reduce(src: &str) -> Expression { parse(src).unwrap().reduced() }

    #[test]
    fn reduction_moves_everything_to_the_left() {
        let got = reduce("5 * x^0 + 4 * x^1 = 4 * x^0");

        assert_eq!(got.left(), &[Term::new(4.0, 1), Term::new(1.0, 0)]);
        assert!(got.right().is_empty());
        assert!(got.is_reduced());
    }

    #[test]
    fn reduction_sorts_by_descending_power() {
        let got = reduce("1 + x + x^2 = 0");

        assert_eq!(got.to_string(), "1 * x^2 + 1 * x^1 + 1 * x^0 = 0");
    }

    #[test]
    fn reduction_merges_and_drops_zeroes() {
        let inputs = vec![
            ("5 * x^0 + 4 * x^1 = 4 * x^0", "4 * x^1 + 1 * x^0 = 0"),
            ("4 * x^0 = 4 * x^0", "0 = 0"),
            ("x^2 + x^2 = x^2", "1 * x^2 = 0"),
            ("x^2 = x^2 + x", "-1 * x^1 = 0"),
            (
                "-5 * x^2 + 5 * x^1 = 4 * x^0",
                "-5 * x^2 + 5 * x^1 - 4 * x^0 = 0",
            ),
            ("0.1*x^2 + 0.2*x^2 = 0.3*x^2 + 1", "-1 * x^0 = 0"),
            ("+5 + x -x^2 +4*x = 0", "-1 * x^2 + 5 * x^1 + 5 * x^0 = 0"),
        ];

        for (src, should_be) in inputs {
            let got = reduce(src);

            assert_eq!(got.to_string(), should_be, "{}", src);
        }
    }

    #[test]
    fn tiny_coefficients_survive_reduction() {
        let inputs = vec![
            (
                "0.00000000001 * x = 1",
                "0.00000000001 * x^1 - 1 * x^0 = 0",
            ),
            (
                "0.00000000001 * x = 0.00000000001",
                "0.00000000001 * x^1 - 0.00000000001 * x^0 = 0",
            ),
            (
                "0.00000000001 * x + 0.00000000002 * x = 0",
                "0.00000000003 * x^1 = 0",
            ),
        ];

        for (src, should_be) in inputs {
            let got = reduce(src);

            assert_eq!(got.to_string(), should_be, "{}", src);
        }
    }

    #[test]
    fn reduction_is_idempotent() {
        let once = reduce("3 * x^2 - 2 = x - 4 * x^2");
        let twice = once.clone().reduced();

        assert_eq!(once, twice);
    }

    #[test]
    fn degree_comes_from_the_current_terms() {
        let parsed = parse("x^2 + 3 = x^2").unwrap();
        assert_eq!(parsed.degree(), 2);

        let reduced = parsed.reduced();
        assert_eq!(reduced.degree(), 0);

        let identity = reduce("4 * x^0 = 4 * x^0");
        assert_eq!(identity.degree(), 0);
    }

    #[test]
    fn coefficients_default_to_zero() {
        let mut expr = parse("5*x^2 + 7 = 0").unwrap();

        assert_eq!(expr.coefficients(), (5.0, 0.0, 7.0));
        assert!(expr.is_reduced(), "Extracting coefficients reduces");
    }

    #[test]
    fn coefficients_of_an_identity() {
        let mut expr = parse("4 * x^0 = 4 * x^0").unwrap();

        assert_eq!(expr.coefficients(), (0.0, 0.0, 0.0));
    }

    #[test]
    fn display_folds_negative_signs_into_the_separator() {
        let expr = Expression::new(
            vec![Term::new(1.0, 2), Term::new(-3.5, 1)],
            vec![Term::new(-2.0, 0)],
        );

        assert_eq!(expr.to_string(), "1 * x^2 - 3.5 * x^1 = -2 * x^0");
    }

    #[test]
    fn display_round_trips() {
        let original = reduce("-5 * x^2 + 5 * x^1 = 4 * x^0 - 0.25 * x");

        let round_tripped = reduce(&original.to_string());

        assert_eq!(round_tripped, original);
    }

    #[test]
    fn parse_via_from_str() {
        let expr: Expression = "x = 5".parse().unwrap();

        assert_eq!(expr.left(), &[Term::new(1.0, 1)]);
        assert_eq!(expr.right(), &[Term::constant(5.0)]);
        assert_eq!(expr.state(), State::Parsed);
    }
}
