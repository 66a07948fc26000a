//! Higher-order terms: first-order terms extended with application and
//! single-variable lambda abstraction.
//!
//! Binders are compared by name. No alpha-renaming is ever performed, so
//! `(lambda x x)` and `(lambda y y)` are different terms, and substitution
//! under a binder does not rename to avoid capture.

use crate::{
    environment::{Environment, Side},
    sexp::Sexp,
    symbol::Symbol,
    term::ParseTermError,
};
use hashbrown::{HashMap, HashSet};
use serde::{Serialize, Serializer};
use std::{
    convert::TryFrom,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// A higher-order term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HoTerm {
    /// A nullary symbol.
    Constant(Symbol),

    /// A variable: bound by an enclosing [`HoTerm::Abstraction`], free in the
    /// input, or a (possibly higher-order) pattern variable.
    Variable(Symbol),

    /// A function symbol applied to an ordered list of arguments.
    Compound(Symbol, Vec<HoTerm>),

    /// Application of a function to one argument. Applications to several
    /// arguments are nested, so `f a b` is `(f a) b`.
    Application(Box<HoTerm>, Box<HoTerm>),

    /// A lambda binding one variable in its body.
    Abstraction(Symbol, Box<HoTerm>),
}

impl HoTerm {
    /// Create a constant named `name`.
    #[must_use]
    pub fn constant<S: Into<Symbol>>(name: S) -> Self {
        Self::Constant(name.into())
    }

    /// Create a variable named `name`.
    #[must_use]
    pub fn var<S: Into<Symbol>>(name: S) -> Self {
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

    /// Create an application of `fun` to `arg`.
    #[must_use]
    pub fn app(fun: Self, arg: Self) -> Self {
        Self::Application(Box::new(fun), Box::new(arg))
    }

    /// Create a lambda binding `binder` in `body`.
    #[must_use]
    pub fn lam<S: Into<Symbol>>(binder: S, body: Self) -> Self {
        Self::Abstraction(binder.into(), Box::new(body))
    }

    /// Apply `head` to each of `args` in turn: `head a1 .. an`.
    #[must_use]
    pub fn apply_all<I>(head: Self, args: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        args.into_iter().fold(head, Self::app)
    }

    /// Decompose a term into its head and the arguments it is applied to, so
    /// that `((f a) b) c` becomes `(f, [a, b, c])`. A term that is not an
    /// application is its own head.
    #[must_use]
    pub fn spine(&self) -> (&Self, Vec<&Self>) {
        let mut head = self;
        let mut args = Vec::new();
        while let Self::Application(fun, arg) = head {
            args.push(&**arg);
            head = fun;
        }
        args.reverse();
        (head, args)
    }

    /// The number of nodes in the term.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Self::Constant(_) | Self::Variable(_) => 1,
            Self::Compound(_, args) => args.iter().map(Self::size).sum::<usize>() + 1,
            Self::Application(fun, arg) => fun.size() + arg.size() + 1,
            Self::Abstraction(_, body) => body.size() + 1,
        }
    }

    /// Returns `true` if the variable `name` occurs free in the term.
    #[must_use]
    pub fn occurs_free(&self, name: &Symbol) -> bool {
        match self {
            Self::Constant(_) => false,
            Self::Variable(var) => var == name,
            Self::Compound(_, args) => args.iter().any(|arg| arg.occurs_free(name)),
            Self::Application(fun, arg) => fun.occurs_free(name) || arg.occurs_free(name),
            Self::Abstraction(binder, body) => binder != name && body.occurs_free(name),
        }
    }

    /// Every variable and binder name in the term, free or bound.
    #[must_use]
    pub fn names(&self) -> HashSet<Symbol> {
        fn collect(term: &HoTerm, names: &mut HashSet<Symbol>) {
            match term {
                HoTerm::Constant(_) => {}
                HoTerm::Variable(name) => {
                    names.insert(name.clone());
                }
                HoTerm::Compound(_, args) => args.iter().for_each(|arg| collect(arg, names)),
                HoTerm::Application(fun, arg) => {
                    collect(fun, names);
                    collect(arg, names);
                }
                HoTerm::Abstraction(binder, body) => {
                    names.insert(binder.clone());
                    collect(body, names);
                }
            }
        }

        let mut names = HashSet::new();
        collect(self, &mut names);
        names
    }

    /// Simultaneously replace the free occurrences of each variable in `map`.
    /// Binders are not renamed.
    #[must_use]
    pub fn substitute(&self, map: &HashMap<Symbol, Self>) -> Self {
        if map.is_empty() {
            return self.clone();
        }
        match self {
            Self::Constant(_) => self.clone(),
            Self::Variable(name) => map.get(name).cloned().unwrap_or_else(|| self.clone()),
            Self::Compound(symbol, args) => Self::Compound(
                symbol.clone(),
                args.iter().map(|arg| arg.substitute(map)).collect(),
            ),
            Self::Application(fun, arg) => Self::app(fun.substitute(map), arg.substitute(map)),
            Self::Abstraction(binder, body) if map.contains_key(binder) => {
                let mut inner = map.clone();
                inner.remove(binder);
                Self::lam(binder.clone(), body.substitute(&inner))
            }
            Self::Abstraction(binder, body) => Self::lam(binder.clone(), body.substitute(map)),
        }
    }

    /// Instantiate a generalization with the fragments on `side` of `env`.
    ///
    /// A pattern variable `F` recorded with the pattern `F x1 .. xn` stands
    /// for `lambda x1 .. xn. t`, where `t` is its fragment. Wherever `F` is
    /// applied to arguments `a1 .. an` the application is beta-reduced to
    /// `t[x1 := a1, .., xn := an]`.
    #[must_use]
    pub fn instantiate(&self, env: &Environment<Self>, side: Side) -> Self {
        let (head, args) = self.spine();
        if let Self::Variable(var) = head {
            if let (Some(body), Some(pattern)) = (env.get_side(var, side), env.pattern(var)) {
                let params = pattern.spine().1;
                if args.len() >= params.len() {
                    let (applied, rest) = args.split_at(params.len());
                    let map: HashMap<_, _> = params
                        .into_iter()
                        .zip(applied)
                        .filter_map(|(param, arg)| match param {
                            Self::Variable(param) => {
                                Some((param.clone(), arg.instantiate(env, side)))
                            }
                            _ => None,
                        })
                        .collect();
                    return Self::apply_all(
                        body.substitute(&map),
                        rest.iter().map(|arg| arg.instantiate(env, side)),
                    );
                }
            }
        }
        match self {
            Self::Constant(_) | Self::Variable(_) => self.clone(),
            Self::Compound(symbol, args) => Self::Compound(
                symbol.clone(),
                args.iter().map(|arg| arg.instantiate(env, side)).collect(),
            ),
            Self::Application(fun, arg) => {
                Self::app(fun.instantiate(env, side), arg.instantiate(env, side))
            }
            Self::Abstraction(binder, body) => {
                Self::lam(binder.clone(), body.instantiate(env, side))
            }
        }
    }

    fn write(&self, f: &mut Formatter<'_>, scope: &mut Vec<Symbol>) -> fmt::Result {
        match self {
            Self::Constant(name) => write!(f, "{}", name),
            Self::Variable(name) if scope.contains(name) => write!(f, "{}", name),
            Self::Variable(name) => write!(f, "?{}", name),
            Self::Compound(symbol, args) => {
                write!(f, "({}", symbol)?;
                for arg in args {
                    f.write_str(" ")?;
                    arg.write(f, scope)?;
                }
                f.write_str(")")
            }
            Self::Application(..) => {
                let (head, args) = self.spine();
                f.write_str("(@ ")?;
                head.write(f, scope)?;
                for arg in args {
                    f.write_str(" ")?;
                    arg.write(f, scope)?;
                }
                f.write_str(")")
            }
            Self::Abstraction(binder, body) => {
                write!(f, "(lambda {} ", binder)?;
                scope.push(binder.clone());
                let result = body.write(f, scope);
                scope.pop();
                result?;
                f.write_str(")")
            }
        }
    }
}

const LAMBDA: &str = "lambda";
const APPLY: &str = "@";

fn is_binder_name(atom: &str) -> bool {
    !atom.starts_with('?') && atom != LAMBDA && atom != APPLY
}

/// Read a higher-order term. Inside `(lambda x body)`, the atom `x` is the
/// bound variable; elsewhere atoms are constants unless written `?x`.
/// `(@ f a b)` is the application `(f a) b`, and any other list is a compound.
fn from_sexp<'a>(sexp: &Sexp<'a>, scope: &mut Vec<&'a str>) -> Result<HoTerm, ParseTermError> {
    match sexp {
        Sexp::Atom(atom) if *atom == LAMBDA || *atom == APPLY => {
            Err(ParseTermError::malformed(sexp, "reserved word used as a term"))
        }
        Sexp::Atom(atom) => match atom.strip_prefix('?') {
            Some("") => Err(ParseTermError::malformed(sexp, "a variable needs a name")),
            Some(name) => Ok(HoTerm::var(name)),
            None if scope.contains(atom) => Ok(HoTerm::var(*atom)),
            None => Ok(HoTerm::constant(*atom)),
        },
        Sexp::List(LAMBDA, args) => match args.as_slice() {
            [Sexp::Atom(binder), body] if is_binder_name(binder) => {
                scope.push(*binder);
                let body = from_sexp(body, scope);
                scope.pop();
                Ok(HoTerm::lam(*binder, body?))
            }
            _ => Err(ParseTermError::malformed(sexp, "expected `(lambda name body)`")),
        },
        Sexp::List(APPLY, args) => match args.as_slice() {
            [fun, rest @ ..] if !rest.is_empty() => {
                let fun = from_sexp(fun, scope)?;
                let rest = rest
                    .iter()
                    .map(|arg| from_sexp(arg, scope))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(HoTerm::apply_all(fun, rest))
            }
            _ => Err(ParseTermError::malformed(
                sexp,
                "an application needs a function and at least one argument",
            )),
        },
        Sexp::List(symbol, _) if symbol.starts_with('?') => Err(ParseTermError::malformed(
            sexp,
            "the symbol of a compound cannot be a variable; use `@` to apply one",
        )),
        Sexp::List(symbol, args) => {
            let args = args
                .iter()
                .map(|arg| from_sexp(arg, scope))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(HoTerm::compound(*symbol, args))
        }
    }
}

impl<'a> TryFrom<Sexp<'a>> for HoTerm {
    type Error = ParseTermError;

    fn try_from(sexp: Sexp<'a>) -> Result<Self, Self::Error> {
        from_sexp(&sexp, &mut Vec::new())
    }
}

impl FromStr for HoTerm {
    type Err = ParseTermError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(Sexp::parse(s)?)
    }
}

/// Prints the syntax read by [`FromStr`]: bound variables bare, free
/// variables as `?x`, and application spines flattened into `(@ f a b)`.
impl Display for HoTerm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.write(f, &mut Vec::new())
    }
}

impl Serialize for HoTerm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> HoTerm {
        s.parse().unwrap()
    }

    #[test]
    fn parse_and_print() {
        let term = HoTerm::lam(
            "x",
            HoTerm::apply_all(
                HoTerm::constant("T"),
                vec![
                    HoTerm::app(HoTerm::constant("G"), HoTerm::var("x")),
                    HoTerm::var("y"),
                    HoTerm::compound("pair", vec![HoTerm::var("x"), HoTerm::constant("a")]),
                ],
            ),
        );
        let input = "(lambda x (@ T (@ G x) ?y (pair x a)))";

        assert_eq!(parse(input), term);
        assert_eq!(term.to_string(), input);
    }

    #[test]
    fn binders_scope_over_their_body_only() {
        assert_eq!(
            parse("(@ (lambda x x) x)"),
            HoTerm::app(
                HoTerm::lam("x", HoTerm::var("x")),
                HoTerm::constant("x")
            )
        );
        // `?x` inside a binder for `x` is the same variable.
        assert_eq!(parse("(lambda x ?x)"), parse("(lambda x x)"));
    }

    #[test]
    fn malformed_terms() {
        for input in &[
            "(lambda x)",
            "(lambda ?x x)",
            "(lambda (f) x)",
            "(@ f)",
            "(?f a)",
            "lambda",
            "(f @)",
            "?",
        ] {
            assert!(
                matches!(input.parse::<HoTerm>(), Err(ParseTermError::Malformed { .. })),
                "{} should be malformed",
                input
            );
        }
    }

    #[test]
    fn spine_and_size() {
        let term = parse("(@ f a (g b) c)");
        let (head, args) = term.spine();
        assert_eq!(head, &HoTerm::constant("f"));
        assert_eq!(
            args,
            vec![
                &HoTerm::constant("a"),
                &parse("(g b)"),
                &HoTerm::constant("c")
            ]
        );
        assert_eq!(term.size(), 8);
    }

    #[test]
    fn free_occurrences() {
        let term = parse("(lambda x (@ ?y x (lambda y y)))");
        let x = Symbol::from("x");
        let y = Symbol::from("y");
        assert!(!term.occurs_free(&x));
        assert!(term.occurs_free(&y));
        assert!(!parse("(lambda y y)").occurs_free(&y));

        let names = term.names();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&x) && names.contains(&y));
    }

    #[test]
    fn substitution_stops_at_shadowing_binders() {
        let term = parse("(@ ?x (lambda x ?x) (lambda y ?x))");
        let map = vec![(Symbol::from("x"), HoTerm::constant("a"))]
            .into_iter()
            .collect();
        assert_eq!(
            term.substitute(&map),
            parse("(@ a (lambda x x) (lambda y a))")
        );
    }
}
