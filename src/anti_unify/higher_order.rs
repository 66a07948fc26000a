//! Anti-unification of higher-order terms.
//!
//! This follows the first-order algorithm, but descends into lambdas and
//! applications while keeping track of the variables bound on the way down.
//! When the two terms diverge underneath binders, the divergence can mention
//! those bound variables, so it is generalized by a fresh variable `F` applied
//! to them, `F x1 .. xn`, instead of by a bare variable. Instantiating
//! `F := lambda x1 .. xn. t` then beta-reduces back to `t` in place.
//!
//! There is exactly one generalization per pair of inputs. No projection or
//! imitation search is attempted, and binders are identified by name: two
//! lambdas with different bound names are a divergence.

use crate::{environment::Environment, fresh::Fresh, lambda::HoTerm, symbol::Symbol};
use log::debug;
use smallvec::SmallVec;

/// The prefix of pattern variables introduced by higher-order
/// anti-unification.
pub const FUNCTION_VARIABLE_PREFIX: &str = "F";

/// Which bound variables a pattern variable is applied to at a divergence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// The bound variables occurring free in either divergent subterm, in
    /// binding order.
    Occurring,
    /// Every bound variable in scope, in binding order.
    All,
}

impl Default for Capture {
    fn default() -> Self {
        Self::Occurring
    }
}

/// The state of a higher-order anti-unification invocation.
#[derive(Debug, Clone)]
pub struct HigherOrderAntiUnifier {
    fresh: Fresh,
    env: Environment<HoTerm>,
    capture: Capture,
    bound: SmallVec<[Symbol; 4]>,
}

impl Default for HigherOrderAntiUnifier {
    fn default() -> Self {
        Self::new()
    }
}

impl HigherOrderAntiUnifier {
    /// Create an anti-unifier whose pattern variables are named `F0`, `F1`,
    /// and so on.
    #[must_use]
    pub fn new() -> Self {
        Self::with_fresh(Fresh::new(FUNCTION_VARIABLE_PREFIX))
    }

    /// Create an anti-unifier drawing pattern variables from `fresh`.
    #[must_use]
    pub fn with_fresh(fresh: Fresh) -> Self {
        Self {
            fresh,
            env: Environment::new(),
            capture: Capture::default(),
            bound: SmallVec::new(),
        }
    }

    /// Set which bound variables pattern variables are applied to.
    #[must_use]
    pub fn with_capture(mut self, capture: Capture) -> Self {
        self.capture = capture;
        self
    }

    /// Make sure no pattern variable is named like a variable or binder of
    /// `term`.
    pub fn reserve(&mut self, term: &HoTerm) {
        self.fresh.extend(term.names());
    }

    /// Compute the generalization of `left` and `right`, recording new
    /// divergences in the environment.
    pub fn anti_unify(&mut self, left: &HoTerm, right: &HoTerm) -> HoTerm {
        if left == right {
            return left.clone();
        }
        match (left, right) {
            (HoTerm::Abstraction(x, t), HoTerm::Abstraction(y, u)) if x == y => {
                self.bound.push(x.clone());
                let body = self.anti_unify(t, u);
                self.bound.pop();
                HoTerm::Abstraction(x.clone(), Box::new(body))
            }
            (HoTerm::Application(f, a), HoTerm::Application(g, b)) => {
                let fun = self.anti_unify(f, g);
                let arg = self.anti_unify(a, b);
                HoTerm::app(fun, arg)
            }
            (HoTerm::Compound(f, xs), HoTerm::Compound(g, ys))
                if f == g && xs.len() == ys.len() =>
            {
                let args = xs
                    .iter()
                    .zip(ys)
                    .map(|(x, y)| self.anti_unify(x, y))
                    .collect();
                HoTerm::Compound(f.clone(), args)
            }
            _ => self.generalize(left, right),
        }
    }

    /// Replace the divergent pair `(left, right)` by a pattern variable
    /// applied to the relevant bound variables.
    fn generalize(&mut self, left: &HoTerm, right: &HoTerm) -> HoTerm {
        let fresh = &mut self.fresh;
        let bound = &self.bound;
        let capture = self.capture;
        self.env.get_or_bind(left.clone(), right.clone(), || {
            let var = fresh.gen();
            let params = parameters(bound, capture, left, right);
            let pattern = HoTerm::apply_all(
                HoTerm::Variable(var.clone()),
                params.into_iter().map(HoTerm::Variable),
            );
            debug!("introducing {} for ({}, {})", pattern, left, right);
            (var, pattern)
        })
    }

    /// The environment built so far.
    #[must_use]
    pub fn environment(&self) -> &Environment<HoTerm> {
        &self.env
    }

    /// Consume the anti-unifier, returning its environment.
    #[must_use]
    pub fn finish(self) -> Environment<HoTerm> {
        self.env
    }

    /// Consume the anti-unifier, returning its generator and environment.
    #[must_use]
    pub fn into_parts(self) -> (Fresh, Environment<HoTerm>) {
        (self.fresh, self.env)
    }
}

/// The bound variables a new pattern variable for `(left, right)` is applied
/// to. A name bound more than once is only passed once.
fn parameters(bound: &[Symbol], capture: Capture, left: &HoTerm, right: &HoTerm) -> Vec<Symbol> {
    let mut params: Vec<Symbol> = Vec::new();
    for name in bound {
        if params.contains(name) {
            continue;
        }
        if capture == Capture::All || left.occurs_free(name) || right.occurs_free(name) {
            params.push(name.clone());
        }
    }
    params
}

/// Anti-unify two higher-order terms, returning their generalization and the
/// environment mapping each pattern variable to the pair of subterms it
/// replaces.
///
/// Pattern variables are numbered from `F0`, applied to the bound variables
/// occurring in the subterms they replace, and never clash with names in the
/// inputs.
#[must_use]
pub fn ho_anti_unify(left: &HoTerm, right: &HoTerm) -> (HoTerm, Environment<HoTerm>) {
    let mut anti_unifier = HigherOrderAntiUnifier::new();
    anti_unifier.reserve(left);
    anti_unifier.reserve(right);
    let generalization = anti_unifier.anti_unify(left, right);
    (generalization, anti_unifier.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Side;

    fn parse(s: &str) -> HoTerm {
        s.parse().unwrap()
    }

    fn pair(left: &str, right: &str) -> (HoTerm, HoTerm) {
        (parse(left), parse(right))
    }

    fn assert_sound(left: &HoTerm, right: &HoTerm) {
        let (g, env) = ho_anti_unify(left, right);
        assert_eq!(&g.instantiate(&env, Side::Left), left, "left of {}", g);
        assert_eq!(&g.instantiate(&env, Side::Right), right, "right of {}", g);
    }

    #[test]
    fn divergent_function_under_a_binder() {
        let left = HoTerm::lam("x", HoTerm::app(HoTerm::constant("f"), HoTerm::var("x")));
        let right = HoTerm::lam("x", HoTerm::app(HoTerm::constant("g"), HoTerm::var("x")));
        let (g, env) = ho_anti_unify(&left, &right);

        assert_eq!(
            g,
            HoTerm::lam("x", HoTerm::app(HoTerm::var("F0"), HoTerm::var("x")))
        );
        assert_eq!(env.len(), 1);
        assert_eq!(
            env.get(&"F0".into()),
            Some(&(HoTerm::constant("f"), HoTerm::constant("g")))
        );
        assert_eq!(g.to_string(), "(lambda x (@ ?F0 x))");
    }

    #[test]
    fn identical_terms() {
        let t = parse("(lambda x (@ f x (lambda y (g y x))))");
        let (g, env) = ho_anti_unify(&t, &t);
        assert_eq!(g, t);
        assert!(env.is_empty());
    }

    #[test]
    fn divergence_mentioning_a_bound_variable() {
        let (left, right) = pair("(lambda x (@ f x))", "(lambda x (@ f a))");
        let (g, env) = ho_anti_unify(&left, &right);

        assert_eq!(g, parse("(lambda x (@ f (@ ?F0 x)))"));
        assert_eq!(env.get(&"F0".into()), Some(&(HoTerm::var("x"), parse("a"))));
        assert_eq!(env.pattern(&"F0".into()), Some(&parse("(@ ?F0 ?x)")));
    }

    #[test]
    fn parameters_follow_binding_order() {
        let (left, right) = pair(
            "(lambda x (lambda y (@ g y)))",
            "(lambda x (lambda y (@ h x)))",
        );
        let (g, env) = ho_anti_unify(&left, &right);

        assert_eq!(g, parse("(lambda x (lambda y (@ ?F0 (@ ?F1 x y))))"));
        assert_eq!(env.get(&"F0".into()), Some(&pair("g", "h")));
        assert_eq!(
            env.get(&"F1".into()),
            Some(&(HoTerm::var("y"), HoTerm::var("x")))
        );
    }

    #[test]
    fn capture_all_applies_every_bound_variable() {
        let (left, right) = pair("(lambda x (lambda y a))", "(lambda x (lambda y b))");

        let (g, _) = ho_anti_unify(&left, &right);
        assert_eq!(g, parse("(lambda x (lambda y ?F0))"));

        let mut anti_unifier = HigherOrderAntiUnifier::new().with_capture(Capture::All);
        let g = anti_unifier.anti_unify(&left, &right);
        let env = anti_unifier.finish();
        assert_eq!(g, parse("(lambda x (lambda y (@ ?F0 x y)))"));
        assert_eq!(g.instantiate(&env, Side::Left), left);
        assert_eq!(g.instantiate(&env, Side::Right), right);
    }

    #[test]
    fn different_binders_diverge() {
        let (left, right) = pair("(lambda x (@ T (@ G x)))", "(lambda y (@ T (@ H y)))");
        let (g, env) = ho_anti_unify(&left, &right);

        assert_eq!(g, parse("?F0"));
        assert_eq!(env.get(&"F0".into()), Some(&(left, right)));
    }

    #[test]
    fn application_against_abstraction() {
        let (left, right) = pair("(@ k (@ f a))", "(@ k (lambda x x))");
        let (g, env) = ho_anti_unify(&left, &right);
        assert_eq!(g, parse("(@ k ?F0)"));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn repeated_pairs_share_a_variable() {
        let (left, right) = pair(
            "(@ k (lambda x (@ f x)) (lambda x (@ f x)) f)",
            "(@ k (lambda x (@ g x)) (lambda x (@ g x)) g)",
        );
        let (g, env) = ho_anti_unify(&left, &right);

        assert_eq!(
            g,
            parse("(@ k (lambda x (@ ?F0 x)) (lambda x (@ ?F0 x)) ?F0)")
        );
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn compounds_inside_lambdas() {
        let (left, right) = pair("(lambda x (pair x (s a)))", "(lambda x (pair x (s (s x))))");
        let (g, env) = ho_anti_unify(&left, &right);
        assert_eq!(g, parse("(lambda x (pair x (s (@ ?F0 x))))"));
        assert_eq!(env.get(&"F0".into()), Some(&pair("a", "(s ?x)")));
    }

    #[test]
    fn pattern_variables_avoid_input_names() {
        let (left, right) = pair("(lambda F0 (@ a F0))", "(lambda F0 (@ b F0))");
        let (g, env) = ho_anti_unify(&left, &right);
        assert_eq!(g, parse("(lambda F0 (@ ?F1 F0))"));
        assert!(!env.contains(&"F0".into()));
    }

    #[test]
    fn instantiation_is_sound() {
        let pairs = [
            pair("(lambda x (@ f x))", "(lambda x (@ g x))"),
            pair("(lambda x (@ f x))", "(lambda x (@ f a))"),
            pair("(lambda x (lambda y (@ g y)))", "(lambda x (lambda y (@ h x)))"),
            pair("(lambda x (@ T (@ G x)))", "(lambda x (@ T (@ H x)))"),
            pair("(lambda x (@ T (@ G x)))", "(lambda y (@ T (@ H y)))"),
            pair("(@ k (lambda x x) (lambda x x))", "(@ k (lambda x a) (lambda x a))"),
            pair("(lambda x (pair x (s a)))", "(lambda x (pair x (s (s x))))"),
            pair("(lambda x (lambda x (@ f x)))", "(lambda x (lambda x (@ g a)))"),
        ];
        for (left, right) in &pairs {
            assert_sound(left, right);
        }
    }

    #[test]
    fn symmetric_up_to_swapping_pairs() {
        let (left, right) = pair("(lambda x (@ f x (g a)))", "(lambda x (@ h x (g x)))");
        let (g1, env1) = ho_anti_unify(&left, &right);
        let (g2, env2) = ho_anti_unify(&right, &left);

        assert_eq!(g1, g2);
        for (var, (l, r)) in &env1 {
            assert_eq!(env2.get(var), Some(&(r.clone(), l.clone())));
        }
    }
}
