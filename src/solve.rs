use crate::{
    algebra::MAX_DEGREE,
    fraction::{self, DEFAULT_MAX_DENOMINATOR, DEFAULT_PRECISION},
};
use arrayvec::ArrayVec;
use nalgebra::Complex;
use num_rational::Ratio;
use std::fmt::{self, Display, Formatter};

/// When `b²` and `4ac` agree to within this fraction of the larger of the
/// two, the discriminant is treated as zero.
const DISCRIMINANT_TOLERANCE: f64 = 1e-12;

/// Settings which control how solutions are presented.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Options {
    /// Explain each step of the solution.
    pub verbose: bool,
    /// Decimal places shown for non-integral values.
    pub precision: usize,
    /// The largest denominator used when showing a value as a fraction.
    pub max_denominator: i64,
}

impl Options {
    pub fn verbose() -> Self {
        Options {
            verbose: true,
            ..Options::default()
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Options {
            verbose: false,
            precision: DEFAULT_PRECISION,
            max_denominator: DEFAULT_MAX_DENOMINATOR,
        }
    }
}

/// Solve `a*x^2 + b*x + c = 0` for a polynomial of the given `degree`.
///
/// # Panics
///
/// The leading coefficient for a degree 1 (`b`) or degree 2 (`a`) polynomial
/// must not be zero. The degree should be taken from a reduced
/// [`crate::Expression`], which never contains zero terms.
pub fn solve(
    degree: u32,
    a: f64,
    b: f64,
    c: f64,
    verbose: bool,
) -> SolutionReport {
    let options = Options {
        verbose,
        ..Options::default()
    };

    solve_with(degree, (a, b, c), &options)
}

/// Like [`solve()`], but with explicit [`Options`].
pub fn solve_with(
    degree: u32,
    coefficients: (f64, f64, f64),
    options: &Options,
) -> SolutionReport {
    let (a, b, c) = coefficients;
    let mut discriminant = None;

    let solution = match degree {
        0 => {
            if c == 0.0 {
                Solution::Identity
            } else {
                Solution::Contradiction
            }
        },
        1 => {
            assert!(b != 0.0, "A degree 1 polynomial can't have b = 0");
            let root = -c / b;

            if root.is_finite() {
                Solution::Unique(Root::new(root, options))
            } else {
                Solution::Overflow
            }
        },
        2 => {
            assert!(a != 0.0, "A degree 2 polynomial can't have a = 0");
            discriminant = discriminant_of(a, b, c);

            match discriminant {
                Some(delta) => solve_quadratic(a, b, delta, options),
                None => Solution::Overflow,
            }
        },
        _ => Solution::UnsupportedDegree,
    };

    log::debug!(
        "Solved a degree {} polynomial \
         (a = {}, b = {}, c = {}, Δ = {:?}): {:?}",
        degree,
        a,
        b,
        c,
        discriminant,
        solution
    );

    SolutionReport {
        degree,
        coefficients,
        discriminant,
        solution,
        options: *options,
    }
}

/// `b² - 4ac`, or `None` if it is too large to represent.
///
/// The comparison between `b²` and `4ac` is relative, so equations with very
/// small coefficients keep their distinct roots.
fn discriminant_of(a: f64, b: f64, c: f64) -> Option<f64> {
    let b_squared = b * b;
    let four_ac = 4.0 * a * c;
    let delta = b_squared - four_ac;

    if !delta.is_finite() || !b_squared.is_finite() || !four_ac.is_finite() {
        return None;
    }

    if approx::relative_eq!(
        b_squared,
        four_ac,
        epsilon = 0.0,
        max_relative = DISCRIMINANT_TOLERANCE
    ) {
        Some(0.0)
    } else {
        Some(delta)
    }
}

fn solve_quadratic(
    a: f64,
    b: f64,
    delta: f64,
    options: &Options,
) -> Solution {
    let denominator = 2.0 * a;

    if delta > 0.0 {
        let sqrt_delta = delta.sqrt();
        let first = (-b - sqrt_delta) / denominator;
        let second = (-b + sqrt_delta) / denominator;

        if first.is_finite() && second.is_finite() {
            Solution::TwoReal(
                Root::new(first, options),
                Root::new(second, options),
            )
        } else {
            Solution::Overflow
        }
    } else if delta == 0.0 {
        let root = -b / denominator;

        if root.is_finite() {
            Solution::Unique(Root::new(root, options))
        } else {
            Solution::Overflow
        }
    } else {
        let conjugate = |negative| ComplexRoot {
            real: -b + 0.0,
            radicand: -delta,
            negative,
            denominator,
            precision: options.precision,
        };
        let value = conjugate(false).value();

        if value.re.is_finite() && value.im.is_finite() {
            Solution::ComplexPair(conjugate(true), conjugate(false))
        } else {
            Solution::Overflow
        }
    }
}

/// The set of solutions for an equation.
#[derive(Debug, Clone, PartialEq)]
pub enum Solution {
    /// Every real number is a solution (e.g. `4 = 4`).
    Identity,
    /// Nothing can satisfy the equation (e.g. `4 = 5`).
    Contradiction,
    Unique(Root),
    TwoReal(Root, Root),
    /// Two complex conjugates, used when the discriminant is negative.
    ComplexPair(ComplexRoot, ComplexRoot),
    /// The polynomial's degree is too high to solve.
    UnsupportedDegree,
    /// The discriminant or a root is too large to represent as an `f64`.
    Overflow,
}

/// A real solution, along with its closest simple fraction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Root {
    pub value: f64,
    /// An exact-looking form of [`Root::value`], only present when the value
    /// isn't an integer and the fraction agrees with it to the displayed
    /// precision.
    pub fraction: Option<Ratio<i64>>,
    precision: usize,
}

impl Root {
    fn new(value: f64, options: &Options) -> Self {
        let value = value + 0.0;
        let fraction = if fraction::is_integral(value) {
            None
        } else {
            let shown = |value| fraction::round_to(value, options.precision);

            fraction::closest_fraction(value, options.max_denominator).filter(
                |ratio| shown(fraction::ratio_to_f64(ratio)) == shown(value),
            )
        };

        Root {
            value,
            fraction,
            precision: options.precision,
        }
    }
}

impl Display for Root {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let decimal = fraction::format_number(self.value, self.precision);

        match self.fraction {
            Some(fraction) => write!(f, "{} ({})", fraction, decimal),
            None => write!(f, "{}", decimal),
        }
    }
}

/// A complex solution in the form `(real ± √radicand·i) / denominator`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ComplexRoot {
    /// The real part's numerator, `-b`.
    pub real: f64,
    /// The magnitude of the discriminant.
    pub radicand: f64,
    /// Is the imaginary part subtracted?
    pub negative: bool,
    /// `2a`
    pub denominator: f64,
    precision: usize,
}

impl ComplexRoot {
    pub fn value(&self) -> Complex<f64> {
        let imaginary = self.radicand.sqrt() / self.denominator;
        let imaginary = if self.negative { -imaginary } else { imaginary };

        Complex::new(self.real / self.denominator + 0.0, imaginary)
    }
}

impl Display for ComplexRoot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let precision = self.precision;
        let radicand = fraction::format_number(self.radicand, precision);
        let denominator = fraction::format_number(self.denominator, precision);

        write!(f, "(")?;

        if self.real != 0.0 {
            let sign = if self.negative { '-' } else { '+' };
            let real = fraction::format_number(self.real, self.precision);
            write!(f, "{} {} ", real, sign)?;
        } else if self.negative {
            write!(f, "-")?;
        }

        write!(f, "√{}i)/{}", radicand, denominator)
    }
}

/// Everything known about an equation's solution, ready to be shown to a
/// human via its [`Display`] impl.
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionReport {
    pub degree: u32,
    /// `(a, b, c)` from `a*x^2 + b*x + c = 0`.
    pub coefficients: (f64, f64, f64),
    /// `b^2 - 4ac`, for degree 2 polynomials.
    pub discriminant: Option<f64>,
    pub solution: Solution,
    pub options: Options,
}

impl SolutionReport {
    /// The real solutions, if there are a finite number of them.
    pub fn real_roots(&self) -> ArrayVec<[f64; 2]> {
        let mut roots = ArrayVec::new();

        match &self.solution {
            Solution::Unique(root) => roots.push(root.value),
            Solution::TwoReal(first, second) => {
                roots.push(first.value);
                roots.push(second.value);
            },
            _ => {},
        }

        roots
    }

    fn write_explanation(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.solution {
            Solution::Unique(_) if self.degree == 1 => {
                writeln!(
                    f,
                    "When the polynomial degree is 1 the equation can simply \
                     be solved by hand"
                )?;
                writeln!(f, "In this case 'x = -c/b'")
            },
            Solution::TwoReal(..) => {
                writeln!(
                    f,
                    "When the discriminant is strictly positive two solutions \
                     can be found using the discriminant itself"
                )?;
                writeln!(
                    f,
                    "The solution formulas are 'x1 = (-b-√Δ)/2a' and \
                     'x2 = (-b+√Δ)/2a'"
                )
            },
            Solution::Unique(_) => {
                writeln!(
                    f,
                    "When the discriminant is equal to 0 there is one and only \
                     one solution to the equation"
                )?;
                writeln!(f, "In this case, the solution formula is 'x = -b/2a'")
            },
            Solution::ComplexPair(..) => {
                writeln!(
                    f,
                    "When the discriminant is strictly negative no solutions \
                     can be found among the real numbers 'ℝ'"
                )?;
                writeln!(
                    f,
                    "We need complex numbers (involving 'i') to find a \
                     solution to this equation"
                )?;
                writeln!(
                    f,
                    "The solution formulas are 'x1 = (-b - i√(-Δ))/2a' and \
                     'x2 = (-b + i√(-Δ))/2a'"
                )
            },
            Solution::UnsupportedDegree => {
                writeln!(
                    f,
                    "When the polynomial degree is greater than {} the \
                     equation cannot be solved using the discriminant alone",
                    MAX_DEGREE
                )
            },
            Solution::Identity
            | Solution::Contradiction
            | Solution::Overflow => Ok(()),
        }
    }
}

impl Display for SolutionReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let precision = self.options.precision;

        if self.options.verbose {
            let (a, b, c) = self.coefficients;
            writeln!(
                f,
                "A polynomial equation has the form 'ax² + bx + c = 0'"
            )?;
            writeln!(
                f,
                "Here a is '{}', b is '{}' and c is '{}'",
                fraction::format_number(a, precision),
                fraction::format_number(b, precision),
                fraction::format_number(c, precision)
            )?;
            writeln!(f)?;
        }

        writeln!(f, "Polynomial degree: {}", self.degree)?;

        if let Some(discriminant) = self.discriminant {
            let discriminant = fraction::format_number(discriminant, precision);
            writeln!(f, "Discriminant: {}", discriminant)?;

            if self.options.verbose {
                writeln!(
                    f,
                    "The discriminant is written 'Δ' and its formula is \
                     'Δ = b² - 4ac'"
                )?;
                writeln!(
                    f,
                    "In our situation, Δ is equal to '{}'",
                    discriminant
                )?;
            }
        }

        if self.options.verbose {
            self.write_explanation(f)?;
        }

        match &self.solution {
            Solution::Identity => {
                writeln!(f, "This equation is trivial")?;
                write!(
                    f,
                    "Every real number 'ℝ' is a solution of this equation"
                )
            },
            Solution::Contradiction => {
                writeln!(f, "This equation is trivial")?;
                write!(f, "The equation has no solution, it is never true")
            },
            Solution::Unique(root) => {
                if self.discriminant.is_some() {
                    writeln!(f, "The discriminant is equal to 0")?;
                }
                write!(f, "The solution is: {}", root)
            },
            Solution::TwoReal(first, second) => {
                writeln!(f, "The discriminant is strictly positive")?;
                writeln!(f, "The two solutions are:")?;
                writeln!(f, "{}", first)?;
                write!(f, "{}", second)
            },
            Solution::ComplexPair(first, second) => {
                writeln!(f, "The discriminant is strictly negative")?;
                writeln!(f, "The two complex solutions are:")?;
                writeln!(f, "{}", first)?;
                write!(f, "{}", second)
            },
            Solution::UnsupportedDegree => write!(
                f,
                "The polynomial degree is strictly greater than {}, I can't \
                 solve it",
                MAX_DEGREE
            ),
            Solution::Overflow => write!(
                f,
                "The coefficients are too large, the solutions can't be \
                 represented"
            ),
        }
    }
}
