//! A reader for terms written as s-expressions.

use std::{
    convert::TryFrom,
    fmt::{self, Debug, Display, Formatter},
};

/// S-expressions
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sexp<'a> {
    /// An atomic s-expression
    Atom(&'a str),
    /// A list starting with an atomic s-expression
    List(&'a str, Vec<Self>),
}

impl<'a> Sexp<'a> {
    /// Parses a string holding exactly one s-expression.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a single valid s-expression.
    pub fn parse(s: &'a str) -> Result<Self, ParseSexpError> {
        parse::parse_sexp(s)
    }

    /// Parses a string holding any number of s-expressions, separated by
    /// whitespace or comments.
    ///
    /// # Errors
    ///
    /// Returns an error if some part of the string is not a valid
    /// s-expression.
    pub fn parse_all(s: &'a str) -> Result<Vec<Self>, ParseSexpError> {
        parse::parse_sexps(s)
    }
}

impl<'a> TryFrom<&'a str> for Sexp<'a> {
    type Error = ParseSexpError;

    fn try_from(s: &'a str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

pub use parse::ParseSexpError;

mod parse {
    use super::Sexp;
    use nom::{
        branch::alt,
        character::complete::{char, multispace1, none_of, not_line_ending},
        combinator::{all_consuming, map, opt, recognize},
        error::{convert_error, VerboseError},
        multi::{many0, many1_count},
        sequence::{delimited, pair, preceded, terminated},
        Finish, IResult,
    };
    use std::fmt::{self, Debug, Formatter};
    use thiserror::Error;

    type ParseResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

    /// An error while reading an s-expression
    #[allow(clippy::module_name_repetitions)]
    #[derive(Clone, Error)]
    #[error("{0}")]
    pub struct ParseSexpError(String);

    impl Debug for ParseSexpError {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0)
        }
    }

    fn comment(input: &str) -> ParseResult<'_, &str> {
        recognize(preceded(char(';'), not_line_ending))(input)
    }

    fn whitespace(input: &str) -> ParseResult<'_, &str> {
        recognize(many1_count(alt((comment, multispace1))))(input)
    }

    fn symbol(input: &str) -> ParseResult<'_, &str> {
        recognize(many1_count(none_of(";() \t\n\r")))(input)
    }

    fn atom(input: &str) -> ParseResult<'_, Sexp<'_>> {
        map(symbol, Sexp::Atom)(input)
    }

    fn list(input: &str) -> ParseResult<'_, Sexp<'_>> {
        map(
            delimited(
                pair(char('('), opt(whitespace)),
                pair(symbol, many0(preceded(opt(whitespace), sexp))),
                pair(opt(whitespace), char(')')),
            ),
            |(op, args)| Sexp::List(op, args),
        )(input)
    }

    fn sexp(input: &str) -> ParseResult<'_, Sexp<'_>> {
        alt((list, atom))(input)
    }

    fn program(input: &str) -> ParseResult<'_, Sexp<'_>> {
        all_consuming(delimited(opt(whitespace), sexp, opt(whitespace)))(input)
    }

    fn programs(input: &str) -> ParseResult<'_, Vec<Sexp<'_>>> {
        all_consuming(preceded(
            opt(whitespace),
            many0(terminated(sexp, opt(whitespace))),
        ))(input)
    }

    fn finish<'a, O>(input: &'a str, result: ParseResult<'a, O>) -> Result<O, ParseSexpError> {
        match result.finish() {
            Ok((_, out)) => Ok(out),
            Err(e) => Err(ParseSexpError(convert_error(input, e))),
        }
    }

    pub(super) fn parse_sexp(input: &str) -> Result<Sexp<'_>, ParseSexpError> {
        finish(input, program(input))
    }

    pub(super) fn parse_sexps(input: &str) -> Result<Vec<Sexp<'_>>, ParseSexpError> {
        finish(input, programs(input))
    }

}

impl<'a> Debug for Sexp<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(atom) => write!(f, "{:?}", atom),
            Self::List(op, args) => {
                f.write_str("(")?;
                Debug::fmt(op, f)?;
                for arg in args {
                    f.write_str(" ")?;
                    Debug::fmt(arg, f)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl<'a> Display for Sexp<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(atom) => f.write_str(atom),
            Self::List(op, args) => {
                write!(f, "({}", op)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                f.write_str(")")
            }
        }
    }
}
