use crate::algebra::{Expression, Term};
use smol_str::SmolStr;
use std::ops::Range;

/// The largest polynomial degree this crate knows how to solve.
pub const MAX_DEGREE: u32 = 2;

/// Parse an [`Expression`] from an equation like `5 * x^2 + 3 = x`.
///
/// The degree check runs against the *reduced* form of the equation, so
/// `x^3 - x^3 + x = 0` is accepted while `3*x^3 = 0` is not. Equations whose
/// like terms add up to more than an `f64` can hold are rejected too. The
/// returned [`Expression`] is left unreduced.
pub fn parse(src: &str) -> Result<Expression, ParseError> {
    let equals_signs = src.matches('=').count();
    if equals_signs != 1 {
        return Err(ParseError::invalid(
            src,
            Reason::EqualsCount {
                found: equals_signs,
            },
        ));
    }

    let index = src.find('=').expect("We just counted one equals sign");
    let (left, right) = (&src[..index], &src[index + 1..]);

    let expr = Expression::new(parse_side(left)?, parse_side(right)?);
    log::debug!("Parsed \"{}\" as {}", src.trim(), expr);

    let reduced = expr.clone().reduced();

    if let Some(term) = reduced.left().iter().find(|t| !t.value().is_finite())
    {
        return Err(ParseError::invalid(
            src,
            Reason::CoefficientOverflow {
                power: term.power(),
            },
        ));
    }

    let degree = reduced.degree();
    if degree > MAX_DEGREE {
        return Err(ParseError::invalid(src, Reason::DegreeTooHigh { degree }));
    }

    Ok(expr)
}

/// Turn one side of an equation into its [`Term`]s, in the order they were
/// written.
pub(crate) fn parse_side(side: &str) -> Result<Vec<Term>, ParseError> {
    if side.trim().is_empty() {
        return Err(ParseError::invalid(side, Reason::EmptySide));
    }

    Tokens::new(side)
        .map(|result| {
            result
                .map(|token| token.term())
                .map_err(|reason| ParseError::invalid(side, reason))
        })
        .collect()
}

/// Possible errors that may occur while parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// The text isn't a polynomial equation this crate can handle.
    #[error("[[ {source_text} ]] -> {reason}")]
    InvalidExpression { source_text: SmolStr, reason: Reason },
}

impl ParseError {
    fn invalid(source_text: &str, reason: Reason) -> Self {
        ParseError::InvalidExpression {
            source_text: source_text.trim().into(),
            reason,
        }
    }

    /// Why the expression was rejected.
    pub fn reason(&self) -> &Reason {
        match self {
            ParseError::InvalidExpression { reason, .. } => reason,
        }
    }
}

/// Why some text was rejected. Indices are byte offsets into the side of the
/// equation being tokenized.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Reason {
    #[error("Expected exactly one equals sign but found {found}")]
    EqualsCount { found: usize },
    #[error("Each side of the equation needs at least one term")]
    EmptySide,
    #[error("Unexpected character {character:?} at index {index}")]
    InvalidCharacter { character: char, index: usize },
    #[error("Unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("Terms must be separated by \"+\" or \"-\" (index {index})")]
    MissingOperator { index: usize },
    #[error("Expected the variable \"x\" at index {index}")]
    ExpectedVariable { index: usize },
    #[error("Expected an exponent at index {index}")]
    ExpectedExponent { index: usize },
    #[error("Fractional exponents aren't supported (index {index})")]
    FractionalExponent { index: usize },
    #[error("The exponent at index {index} is too large")]
    ExponentTooLarge { index: usize },
    #[error("The number at index {index} is too large")]
    NumberTooLarge { index: usize },
    #[error("The x^{power} terms add up to more than a float can hold")]
    CoefficientOverflow { power: u32 },
    #[error(
        "Polynomial degree {degree} is too high, the maximum is {}",
        MAX_DEGREE
    )]
    DegreeTooHigh { degree: u32 },
}

/// The surface forms a [`Term`] may be written in.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum TermForm {
    /// `±value * x^power`
    CoefficientVariablePower,
    /// `±value * x`
    CoefficientVariable,
    /// `±x^power`
    VariablePower,
    /// `±value`
    Constant,
    /// `±x`
    Variable,
}

#[derive(Debug, Clone, PartialEq)]
struct Token<'a> {
    span: Range<usize>,
    form: TermForm,
    negative: bool,
    coefficient: Option<&'a str>,
    power: Option<u32>,
}

impl<'a> Token<'a> {
    fn term(&self) -> Term {
        let magnitude: f64 = match self.coefficient {
            Some(text) => {
                text.parse().expect("Guaranteed correct by the lexer")
            },
            None => 1.0,
        };
        let value = if self.negative { -magnitude } else { magnitude };

        let power = match self.form {
            TermForm::Constant => 0,
            TermForm::Variable | TermForm::CoefficientVariable => 1,
            TermForm::VariablePower | TermForm::CoefficientVariablePower => {
                self.power.expect("Guaranteed correct by the lexer")
            },
        };

        Term::new(value, power)
    }
}

/// A scanner which splits one side of an equation into [`Token`]s, one per
/// term.
#[derive(Debug, Clone, PartialEq)]
struct Tokens<'a> {
    src: &'a str,
    cursor: usize,
    seen_a_term: bool,
}

impl<'a> Tokens<'a> {
    fn new(src: &'a str) -> Self {
        Tokens {
            src,
            cursor: 0,
            seen_a_term: false,
        }
    }

    fn rest(&self) -> &'a str { &self.src[self.cursor..] }

    fn peek(&self) -> Option<char> { self.rest().chars().next() }

    fn peek_second(&self) -> Option<char> { self.rest().chars().nth(1) }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }

    fn take_while<P>(
        &mut self,
        mut predicate: P,
    ) -> Option<(&'a str, Range<usize>)>
    where
        P: FnMut(char) -> bool,
    {
        let start = self.cursor;

        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }

            self.advance();
        }

        let end = self.cursor;

        if start != end {
            let text = &self.src[start..end];
            Some((text, start..end))
        } else {
            None
        }
    }

    fn unexpected(&self) -> Reason {
        match self.peek() {
            Some(character) => Reason::InvalidCharacter {
                character,
                index: self.cursor,
            },
            None => Reason::UnexpectedEndOfInput,
        }
    }

    /// An optional leading sign. Every term but the first must have one.
    fn chomp_sign(&mut self) -> Result<bool, Reason> {
        match self.peek() {
            Some('+') => {
                self.advance();
                self.skip_whitespace();
                Ok(false)
            },
            Some('-') => {
                self.advance();
                self.skip_whitespace();
                Ok(true)
            },
            _ if self.seen_a_term => Err(Reason::MissingOperator {
                index: self.cursor,
            }),
            _ => Ok(false),
        }
    }

    fn chomp_integer(&mut self) -> Option<&'a str> {
        self.take_while(|c| c.is_ascii_digit()).map(|(text, _)| text)
    }

    /// `digits` or `digits.digits`.
    fn chomp_number(&mut self) -> Result<&'a str, Reason> {
        let start = self.cursor;
        self.chomp_integer();

        if self.peek() == Some('.') {
            match self.peek_second() {
                Some(c) if c.is_ascii_digit() => {
                    self.advance();
                    self.chomp_integer();
                },
                _ => {
                    self.advance();
                    return Err(self.unexpected());
                },
            }
        }

        let text = &self.src[start..self.cursor];
        let value: f64 = text.parse().expect("Guaranteed correct by the lexer");

        if value.is_finite() {
            Ok(text)
        } else {
            Err(Reason::NumberTooLarge { index: start })
        }
    }

    fn is_variable(c: char) -> bool { c == 'x' || c == 'X' }

    fn chomp_variable(&mut self) -> Result<(), Reason> {
        match self.peek() {
            Some(c) if Tokens::is_variable(c) => {
                self.advance();
                Ok(())
            },
            _ => Err(Reason::ExpectedVariable { index: self.cursor }),
        }
    }

    /// An optional `^power` following the variable.
    fn chomp_exponent(&mut self) -> Result<Option<u32>, Reason> {
        self.skip_whitespace();

        if self.peek() != Some('^') {
            return Ok(None);
        }

        self.advance();
        self.skip_whitespace();

        let start = self.cursor;
        let digits = self
            .chomp_integer()
            .ok_or(Reason::ExpectedExponent { index: start })?;

        if self.peek() == Some('.')
            && self.peek_second().map_or(false, |c| c.is_ascii_digit())
        {
            return Err(Reason::FractionalExponent { index: start });
        }

        digits
            .parse()
            .map(Some)
            .map_err(|_| Reason::ExponentTooLarge { index: start })
    }

    fn chomp_term(&mut self) -> Result<Token<'a>, Reason> {
        let start = self.cursor;
        let negative = self.chomp_sign()?;

        let (form, coefficient, power) = match self.peek() {
            Some(c) if c.is_ascii_digit() => {
                let coefficient = self.chomp_number()?;
                self.skip_whitespace();

                if self.peek() == Some('*') {
                    self.advance();
                    self.skip_whitespace();
                    self.chomp_variable()?;

                    match self.chomp_exponent()? {
                        Some(power) => (
                            TermForm::CoefficientVariablePower,
                            Some(coefficient),
                            Some(power),
                        ),
                        None => (
                            TermForm::CoefficientVariable,
                            Some(coefficient),
                            None,
                        ),
                    }
                } else {
                    (TermForm::Constant, Some(coefficient), None)
                }
            },
            Some(c) if Tokens::is_variable(c) => {
                self.advance();

                match self.chomp_exponent()? {
                    Some(power) => (TermForm::VariablePower, None, Some(power)),
                    None => (TermForm::Variable, None, None),
                }
            },
            _ => return Err(self.unexpected()),
        };

        self.seen_a_term = true;

        Ok(Token {
            span: start..self.cursor,
            form,
            negative,
            coefficient,
            power,
        })
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Result<Token<'a>, Reason>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();
        self.peek()?;

        let result = self.chomp_term();

        match &result {
            Ok(token) => {
                log::trace!(
                    "Scanned {:?} as {:?}",
                    &self.src[token.span.clone()],
                    token.form
                );
            },
            // don't keep scanning past garbage
            Err(_) => self.cursor = self.src.len(),
        }

        Some(result)
    }
}

#[cfg(test)]
mod tokenizer_tests {
    use super::*;

    macro_rules! tokenize_test {
        ($name:ident, $src:expr, $form:expr, $value:expr, $power:expr) => {
            #[test]
            fn $name() {
                let mut tokens = Tokens::new($src);

                let got = tokens.next().unwrap().unwrap();

                let Range { start, end } = got.span;
                assert_eq!(start, 0);
                assert_eq!(end, $src.len());
                assert_eq!(got.form, $form);
                assert_eq!(got.term(), Term::new($value, $power));

                assert!(
                    tokens.next().is_none(),
                    "{:?} should be empty",
                    tokens
                );
            }
        };
    }

    tokenize_test!(
        explicit_coefficient_and_power,
        "-5 * x^2",
        TermForm::CoefficientVariablePower,
        -5.0,
        2
    );
    tokenize_test!(
        squashed_together,
        "+2.5*x^0",
        TermForm::CoefficientVariablePower,
        2.5,
        0
    );
    tokenize_test!(
        spaces_around_everything,
        "- 3 * X ^ 1",
        TermForm::CoefficientVariablePower,
        -3.0,
        1
    );
    tokenize_test!(
        implicit_power,
        "4.25 * x",
        TermForm::CoefficientVariable,
        4.25,
        1
    );
    tokenize_test!(
        implicit_coefficient,
        "-x^2",
        TermForm::VariablePower,
        -1.0,
        2
    );
    tokenize_test!(bare_constant, "42", TermForm::Constant, 42.0, 0);
    tokenize_test!(
        negative_decimal_constant,
        "-0.5",
        TermForm::Constant,
        -0.5,
        0
    );
    tokenize_test!(bare_variable, "X", TermForm::Variable, 1.0, 1);
    tokenize_test!(negative_variable, "- x", TermForm::Variable, -1.0, 1);

    fn tokenize(src: &str) -> Result<Vec<Term>, Reason> {
        Tokens::new(src).map(|tok| tok.map(|t| t.term())).collect()
    }

    #[test]
    fn several_terms_in_scan_order() {
        let got = tokenize("+5 + x -x^2 +4*x").unwrap();

        assert_eq!(
            got,
            vec![
                Term::new(5.0, 0),
                Term::new(1.0, 1),
                Term::new(-1.0, 2),
                Term::new(4.0, 1),
            ]
        );
    }

    macro_rules! reject_test {
        ($name:ident, $src:expr, $should_be:expr) => {
            #[test]
            fn $name() {
                let got = tokenize($src).unwrap_err();

                assert_eq!(got, $should_be);
            }
        };
    }

    reject_test!(
        double_caret,
        "x^^2",
        Reason::ExpectedExponent { index: 2 }
    );
    reject_test!(
        implicit_multiplication,
        "2x",
        Reason::MissingOperator { index: 1 }
    );
    reject_test!(
        terms_without_an_operator,
        "5 x",
        Reason::MissingOperator { index: 2 }
    );
    reject_test!(
        fractional_exponent,
        "x^2.5",
        Reason::FractionalExponent { index: 2 }
    );
    reject_test!(
        huge_exponent,
        "x^99999999999",
        Reason::ExponentTooLarge { index: 2 }
    );
    reject_test!(
        coefficient_times_a_number,
        "3 * 4",
        Reason::ExpectedVariable { index: 4 }
    );
    reject_test!(
        other_variables,
        "y",
        Reason::InvalidCharacter {
            character: 'y',
            index: 0
        }
    );
    reject_test!(dangling_sign, "x +", Reason::UnexpectedEndOfInput);
    reject_test!(
        trailing_decimal_point,
        "3. * x",
        Reason::InvalidCharacter {
            character: ' ',
            index: 2
        }
    );

    #[test]
    fn reject_numbers_which_overflow() {
        let src = format!("1{}", "0".repeat(400));

        let got = tokenize(&src).unwrap_err();

        assert_eq!(got, Reason::NumberTooLarge { index: 0 });
    }

    #[test]
    fn stop_after_the_first_error() {
        let mut tokens = Tokens::new("x ? 2 + 3");

        assert!(tokens.next().unwrap().is_ok());
        assert!(tokens.next().unwrap().is_err());
        assert!(tokens.next().is_none());
    }
}
