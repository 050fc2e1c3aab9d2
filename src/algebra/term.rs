//! A single monomial, `value * x^power`.

use euclid::approxeq::ApproxEq;
use std::{
    fmt::{self, Display, Formatter},
    ops::Neg,
};

/// When several terms are folded together and their sum is this small
/// relative to the largest of them, the terms cancelled out and the sum is
/// floating point noise.
pub const CANCELLATION_TOLERANCE: f64 = 1e-12;

/// A monomial, `value * x^power`.
///
/// A [`Term`] is immutable. All arithmetic returns a new [`Term`], and any
/// term with a value of zero acts as the additive identity regardless of its
/// power.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Term {
    value: f64,
    power: u32,
}

impl Term {
    pub const fn new(value: f64, power: u32) -> Self { Term { value, power } }

    /// A term with a power of `0`.
    pub const fn constant(value: f64) -> Self { Term::new(value, 0) }

    pub fn value(self) -> f64 { self.value }

    pub fn power(self) -> u32 { self.power }

    pub fn is_zero(self) -> bool { self.value == 0.0 }

    /// Can these two terms be added together?
    pub fn is_combinable_with(self, other: Term) -> bool {
        self.power == other.power
    }

    /// Add something to this term, failing if the operand has a different
    /// power.
    ///
    /// Adding [`Operand::Scalar`] zero always succeeds, while any other scalar
    /// only combines with a constant term.
    pub fn checked_add<O>(self, rhs: O) -> Result<Term, UnequalPowers>
    where
        O: Into<Operand>,
    {
        let rhs = match rhs.into() {
            Operand::Scalar(value) if value == 0.0 => return Ok(self),
            Operand::Scalar(value) => Term::constant(value),
            Operand::Term(term) => term,
        };

        if self.is_combinable_with(rhs) {
            Ok(Term::new(self.value + rhs.value, self.power))
        } else {
            Err(UnequalPowers {
                left: self,
                right: rhs,
            })
        }
    }

    pub fn checked_sub<O>(self, rhs: O) -> Result<Term, UnequalPowers>
    where
        O: Into<Operand>,
    {
        self.checked_add(-rhs.into())
    }

    /// Treat this term as zero when it is the sum of terms whose largest
    /// magnitude was `largest_summand` and they cancelled each other out.
    pub(crate) fn cancelled_against(self, largest_summand: f64) -> Term {
        let tolerance = largest_summand * CANCELLATION_TOLERANCE;

        if self.value.approx_eq_eps(&0.0, &tolerance) {
            Term::new(0.0, self.power)
        } else {
            self
        }
    }
}

impl Neg for Term {
    type Output = Term;

    fn neg(self) -> Self::Output { Term::new(-self.value, self.power) }
}

impl PartialEq<f64> for Term {
    fn eq(&self, other: &f64) -> bool {
        if *other == 0.0 {
            self.is_zero()
        } else {
            self.power == 0 && self.value == *other
        }
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // adding zero turns a "-0" into "0"
        write!(f, "{} * x^{}", self.value + 0.0, self.power)
    }
}

/// The right hand side of an arithmetic operation on a [`Term`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Operand {
    /// A bare number, only compatible with constant terms.
    Scalar(f64),
    Term(Term),
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self { Operand::Scalar(value) }
}

impl From<Term> for Operand {
    fn from(term: Term) -> Self { Operand::Term(term) }
}

impl Neg for Operand {
    type Output = Operand;

    fn neg(self) -> Self::Output {
        match self {
            Operand::Scalar(value) => Operand::Scalar(-value),
            Operand::Term(term) => Operand::Term(-term),
        }
    }
}

/// Tried to combine two [`Term`]s with different powers.
#[derive(Debug, Copy, Clone, PartialEq, thiserror::Error)]
#[error("[{left}] | [{right}] -> Terms of different powers cannot be combined")]
pub struct UnequalPowers {
    pub left: Term,
    pub right: Term,
}
