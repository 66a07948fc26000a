//! First-order anti-unification: Plotkin's least general generalization.
//!
//! The generalization of two terms keeps every piece of structure they share
//! and replaces each point where they differ by a pattern variable. The pair of
//! differing subterms is recorded in an [`Environment`], and a pair that shows
//! up more than once is always replaced by the same variable. For example,
//! `(f a (g a))` and `(f b (g b))` generalize to `(f ?X0 (g ?X0))`, not
//! `(f ?X0 (g ?X1))`.

use crate::{environment::Environment, fresh::Fresh, term::Term};
use log::debug;
use thiserror::Error;

pub use higher_order::{
    ho_anti_unify, Capture, HigherOrderAntiUnifier, FUNCTION_VARIABLE_PREFIX,
};
pub use list::{anti_unify_list, anti_unify_list_with, LengthPolicy};

mod higher_order;
mod list;

/// The prefix of pattern variables introduced by first-order
/// anti-unification.
pub const VARIABLE_PREFIX: &str = "X";

/// An error reported by an anti-unification entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AntiUnifyError {
    /// Two sequences of different lengths were anti-unified with
    /// [`LengthPolicy::Strict`].
    #[error("cannot anti-unify sequences of lengths {left} and {right}")]
    LengthMismatch {
        /// The length of the first sequence.
        left: usize,
        /// The length of the second sequence.
        right: usize,
    },
}

/// An `AntiUnifier` stores the state of an anti-unification invocation: the
/// generator for pattern variables and the environment built so far.
///
/// Every pair passed to [`AntiUnifier::anti_unify`] on the same anti-unifier
/// shares one environment, so a divergence that recurs across calls is
/// generalized by the same variable each time.
#[derive(Debug, Clone)]
pub struct AntiUnifier {
    fresh: Fresh,
    env: Environment<Term>,
}

impl Default for AntiUnifier {
    fn default() -> Self {
        Self::new()
    }
}

impl AntiUnifier {
    /// Create an anti-unifier whose pattern variables are named `X0`, `X1`,
    /// and so on.
    #[must_use]
    pub fn new() -> Self {
        Self::with_fresh(Fresh::new(VARIABLE_PREFIX))
    }

    /// Create an anti-unifier drawing pattern variables from `fresh`.
    #[must_use]
    pub fn with_fresh(fresh: Fresh) -> Self {
        Self {
            fresh,
            env: Environment::new(),
        }
    }

    /// Make sure no pattern variable is named like a variable of `term`.
    pub fn reserve(&mut self, term: &Term) {
        self.fresh.extend(term.variables());
    }

    /// Compute the least general generalization of `left` and `right`,
    /// recording new divergences in the environment.
    pub fn anti_unify(&mut self, left: &Term, right: &Term) -> Term {
        if left == right {
            return left.clone();
        }
        match (left, right) {
            (Term::Compound(f, xs), Term::Compound(g, ys)) if f == g && xs.len() == ys.len() => {
                let args = xs
                    .iter()
                    .zip(ys)
                    .map(|(x, y)| self.anti_unify(x, y))
                    .collect();
                Term::Compound(f.clone(), args)
            }
            _ => self.generalize(left, right),
        }
    }

    /// Replace the divergent pair `(left, right)` by a pattern variable.
    fn generalize(&mut self, left: &Term, right: &Term) -> Term {
        let fresh = &mut self.fresh;
        self.env.get_or_bind(left.clone(), right.clone(), || {
            let var = fresh.gen();
            debug!("introducing ?{} for ({}, {})", var, left, right);
            (var.clone(), Term::Variable(var))
        })
    }

    /// The environment built so far.
    #[must_use]
    pub fn environment(&self) -> &Environment<Term> {
        &self.env
    }

    /// Consume the anti-unifier, returning its environment.
    #[must_use]
    pub fn finish(self) -> Environment<Term> {
        self.env
    }

    /// Consume the anti-unifier, returning its generator and environment.
    #[must_use]
    pub fn into_parts(self) -> (Fresh, Environment<Term>) {
        (self.fresh, self.env)
    }
}

/// Anti-unify two first-order terms, returning their least general
/// generalization together with the environment mapping each pattern variable
/// to the pair of subterms it replaces.
///
/// Pattern variables are numbered from `X0` and never clash with variables of
/// the inputs.
#[must_use]
pub fn anti_unify(left: &Term, right: &Term) -> (Term, Environment<Term>) {
    let mut anti_unifier = AntiUnifier::new();
    anti_unifier.reserve(left);
    anti_unifier.reserve(right);
    let generalization = anti_unifier.anti_unify(left, right);
    (generalization, anti_unifier.finish())
}
