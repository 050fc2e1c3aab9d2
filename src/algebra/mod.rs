//! The polynomial algebra system.

mod expr;
mod parse;
pub mod term;

pub use expr::{Expression, State};
pub use parse::{parse, ParseError, Reason, TermForm, MAX_DEGREE};
pub use term::{Operand, Term, UnequalPowers};
