//! Parse, reduce and solve polynomial equations of degree two or less.
//!
//! ```rust
//! use computor::Options;
//!
//! let mut equation = computor::parse("5 * x^0 + 4 * x^1 = 4 * x^0").unwrap();
//! equation.reduce();
//! assert_eq!(equation.to_string(), "4 * x^1 + 1 * x^0 = 0");
//!
//! let report = equation.solve(&Options::default());
//! assert_eq!(report.real_roots().as_slice(), &[-0.25]);
//! ```

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

pub mod algebra;
pub mod fraction;
mod solve;

#[cfg(test)]
mod proptests;

pub use algebra::{
    parse, Expression, Operand, ParseError, Reason, State, Term, UnequalPowers,
};
pub use solve::{
    solve, solve_with, ComplexRoot, Options, Root, Solution, SolutionReport,
};
