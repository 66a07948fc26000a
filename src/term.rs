//! First-order terms.

use crate::{
    environment::{Environment, Side},
    sexp::{ParseSexpError, Sexp},
    symbol::Symbol,
};
use hashbrown::HashSet;
use serde::{Serialize, Serializer};
use std::{
    convert::TryFrom,
    fmt::{self, Display, Formatter},
    str::FromStr,
};
use thiserror::Error;

/// A first-order term.
///
/// Terms are compared structurally: two terms are equal exactly when they are
/// the same variant with equal fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// A nullary symbol.
    Constant(Symbol),

    /// A variable. In an input this is an ordinary object variable, compared by
    /// name like a constant; in a generalization it may also be a pattern
    /// variable introduced by anti-unification.
    Variable(Symbol),

    /// A function symbol applied to an ordered list of arguments. The arity is
    /// the number of arguments, so `f(a)` and `f(a, b)` are unrelated.
    Compound(Symbol, Vec<Term>),
}

impl Term {
    /// Create a constant named `name`.
    #[must_use]
    pub fn constant<S: Into<Symbol>>(name: S) -> Self {
        Self::Constant(name.into())
    }

    /// Create a variable named `name`.
    #[must_use]
    pub fn variable<S: Into<Symbol>>(name: S) -> Self {
        Self::Variable(name.into())
    }

    /// Create a compound term applying `symbol` to `args`.
    #[must_use]
    pub fn compound<S, I>(symbol: S, args: I) -> Self
    where
        S: Into<Symbol>,
        I: IntoIterator<Item = Self>,
    {
        Self::Compound(symbol.into(), args.into_iter().collect())
    }

    /// The number of arguments; zero for constants and variables.
    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            Self::Compound(_, args) => args.len(),
            _ => 0,
        }
    }

    /// The number of nodes in the term.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Self::Compound(_, args) => args.iter().map(Self::size).sum::<usize>() + 1,
            _ => 1,
        }
    }

    /// The names of all variables occurring in the term.
    #[must_use]
    pub fn variables(&self) -> HashSet<Symbol> {
        fn collect(term: &Term, vars: &mut HashSet<Symbol>) {
            match term {
                Term::Constant(_) => {}
                Term::Variable(name) => {
                    vars.insert(name.clone());
                }
                Term::Compound(_, args) => args.iter().for_each(|arg| collect(arg, vars)),
            }
        }

        let mut vars = HashSet::new();
        collect(self, &mut vars);
        vars
    }

    /// Replace every pattern variable bound in `env` by the fragment it stands
    /// for on `side`. Variables not bound in `env` are left alone.
    ///
    /// Instantiating a generalization with the environment it came with gives
    /// back the corresponding input.
    #[must_use]
    pub fn instantiate(&self, env: &Environment<Self>, side: Side) -> Self {
        match self {
            Self::Constant(_) => self.clone(),
            Self::Variable(name) => env
                .get_side(name, side)
                .cloned()
                .unwrap_or_else(|| self.clone()),
            Self::Compound(symbol, args) => Self::Compound(
                symbol.clone(),
                args.iter().map(|arg| arg.instantiate(env, side)).collect(),
            ),
        }
    }
}

/// An error produced when a string or s-expression can't be read as a term.
#[derive(Debug, Clone, Error)]
pub enum ParseTermError {
    /// The input was not a valid s-expression.
    #[error(transparent)]
    Sexp(#[from] ParseSexpError),

    /// The s-expression doesn't describe a well-formed term.
    #[error("malformed term `{term}`: {reason}")]
    Malformed {
        /// The offending s-expression.
        term: String,
        /// What is wrong with it.
        reason: &'static str,
    },
}

impl ParseTermError {
    pub(crate) fn malformed(sexp: &Sexp<'_>, reason: &'static str) -> Self {
        Self::Malformed {
            term: sexp.to_string(),
            reason,
        }
    }
}

/// Read a first-order term: `a` is a constant, `?x` a variable and `(f t ...)`
/// a compound.
fn from_sexp(sexp: &Sexp<'_>) -> Result<Term, ParseTermError> {
    match sexp {
        Sexp::Atom(atom) => match atom.strip_prefix('?') {
            Some("") => Err(ParseTermError::malformed(sexp, "a variable needs a name")),
            Some(name) => Ok(Term::variable(name)),
            None => Ok(Term::constant(*atom)),
        },
        Sexp::List(symbol, _) if symbol.starts_with('?') => Err(ParseTermError::malformed(
            sexp,
            "the symbol of a compound cannot be a variable",
        )),
        Sexp::List(symbol, args) => {
            let args = args.iter().map(from_sexp).collect::<Result<Vec<_>, _>>()?;
            Ok(Term::compound(*symbol, args))
        }
    }
}

impl<'a> TryFrom<Sexp<'a>> for Term {
    type Error = ParseTermError;

    fn try_from(sexp: Sexp<'a>) -> Result<Self, Self::Error> {
        from_sexp(&sexp)
    }
}

impl FromStr for Term {
    type Err = ParseTermError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(Sexp::parse(s)?)
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(name) => write!(f, "{}", name),
            Self::Variable(name) => write!(f, "?{}", name),
            Self::Compound(symbol, args) => {
                write!(f, "({}", symbol)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl Serialize for Term {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Term {
        s.parse().unwrap()
    }

    #[test]
    fn parse_and_print() {
        let term = Term::compound(
            "f",
            vec![
                Term::constant("a"),
                Term::compound("g", vec![Term::variable("x")]),
                Term::compound("h", vec![]),
            ],
        );
        let input = "(f a (g ?x) (h))";

        assert_eq!(parse(input), term);
        assert_eq!(term.to_string(), input);
    }

    #[test]
    fn zero_arity_compound_is_not_a_constant() {
        assert_ne!(parse("(f)"), parse("f"));
        assert_eq!(parse("(f)").arity(), 0);
        assert_eq!(parse("(f a b)").arity(), 2);
    }

    #[test]
    fn malformed_terms() {
        assert!(matches!(
            "?".parse::<Term>(),
            Err(ParseTermError::Malformed { .. })
        ));
        assert!(matches!(
            "(?f a)".parse::<Term>(),
            Err(ParseTermError::Malformed { .. })
        ));
        assert!(matches!(
            "(f a".parse::<Term>(),
            Err(ParseTermError::Sexp(_))
        ));
    }

    #[test]
    fn size_and_variables() {
        let term = parse("(f ?x (g ?y ?x) a)");
        assert_eq!(term.size(), 6);

        let vars = term.variables();
        assert_eq!(vars.len(), 2);
        assert!(vars.contains(&Symbol::from("x")));
        assert!(vars.contains(&Symbol::from("y")));
    }

    #[test]
    fn serializes_as_text() {
        let json = serde_json::to_string(&parse("(f a ?x)")).unwrap();
        assert_eq!(json, r#""(f a ?x)""#);
    }
}
