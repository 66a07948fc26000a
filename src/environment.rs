//! Defines the [`Environment`], the record of where two anti-unified terms
//! diverge.

use crate::symbol::Symbol;
use hashbrown::HashMap;
use indexmap::{map, IndexMap};
use itertools::Itertools;
use log::trace;
use serde::{ser::SerializeMap, Serialize, Serializer};
use std::{
    fmt::{self, Display, Formatter},
    hash::Hash,
};

/// One of the two inputs of an anti-unification call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The first input.
    Left,
    /// The second input.
    Right,
}

/// Maps each pattern variable of a generalization to the pair of fragments,
/// one from each input, that it generalizes.
///
/// Besides the bindings, an environment remembers the pattern term built for
/// every pair it has seen, so that a pair occurring twice is generalized by the
/// same pattern variable both times. Distinct pairs always get distinct
/// variables. Bindings are kept in the order their variables were introduced.
#[derive(Debug, Clone)]
pub struct Environment<T> {
    bindings: IndexMap<Symbol, (T, T)>,
    patterns: HashMap<(T, T), T>,
}

impl<T> Default for Environment<T> {
    fn default() -> Self {
        Self {
            bindings: IndexMap::new(),
            patterns: HashMap::new(),
        }
    }
}

impl<T> Environment<T> {
    /// Create an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of pattern variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if no pattern variable has been introduced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Returns `true` if `var` is a pattern variable of this environment.
    #[must_use]
    pub fn contains(&self, var: &Symbol) -> bool {
        self.bindings.contains_key(var)
    }

    /// The pair of fragments generalized by `var`.
    #[must_use]
    pub fn get(&self, var: &Symbol) -> Option<&(T, T)> {
        self.bindings.get(var)
    }

    /// The fragment generalized by `var` on one side.
    #[must_use]
    pub fn get_side(&self, var: &Symbol, side: Side) -> Option<&T> {
        self.get(var).map(|(left, right)| match side {
            Side::Left => left,
            Side::Right => right,
        })
    }

    /// Iterate over the pattern variables and their pairs, in the order the
    /// variables were introduced.
    pub fn iter(&self) -> map::Iter<'_, Symbol, (T, T)> {
        self.bindings.iter()
    }

    /// Iterate over the pattern variables.
    pub fn vars(&self) -> map::Keys<'_, Symbol, (T, T)> {
        self.bindings.keys()
    }

    /// The substitution taking a generalization back to the input on `side`.
    pub fn substitution(&self, side: Side) -> impl Iterator<Item = (&Symbol, &T)> + '_ {
        self.bindings.iter().map(move |(var, (left, right))| match side {
            Side::Left => (var, left),
            Side::Right => (var, right),
        })
    }
}

impl<T: Clone + Eq + Hash> Environment<T> {
    /// The pattern term recorded for `var`: the bare variable for first-order
    /// anti-unification, or the variable applied to its parameters for
    /// higher-order anti-unification.
    #[must_use]
    pub fn pattern(&self, var: &Symbol) -> Option<&T> {
        self.bindings
            .get(var)
            .and_then(|pair| self.patterns.get(pair))
    }

    /// Returns the pattern recorded for the pair `(left, right)`. If the pair
    /// hasn't been seen before, `bind` is called to produce a new pattern
    /// variable together with its pattern term, and both are recorded.
    pub fn get_or_bind<F>(&mut self, left: T, right: T, bind: F) -> T
    where
        F: FnOnce() -> (Symbol, T),
    {
        let pair = (left, right);
        if let Some(pattern) = self.patterns.get(&pair) {
            trace!("reusing memoized pattern");
            return pattern.clone();
        }
        let (var, pattern) = bind();
        debug_assert!(!self.bindings.contains_key(&var));
        self.bindings.insert(var, pair.clone());
        self.patterns.insert(pair, pattern.clone());
        pattern
    }
}

impl<T: PartialEq> PartialEq for Environment<T> {
    fn eq(&self, other: &Self) -> bool {
        self.bindings == other.bindings
    }
}

impl<T: Eq> Eq for Environment<T> {}

impl<'a, T> IntoIterator for &'a Environment<T> {
    type Item = (&'a Symbol, &'a (T, T));

    type IntoIter = map::Iter<'a, Symbol, (T, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Display> Display for Environment<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.bindings
                .iter()
                .map(|(var, (left, right))| format!("{}: ({}, {})", var, left, right))
                .join(", ")
        )
    }
}

impl<T: Serialize> Serialize for Environment<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.bindings.len()))?;
        for (var, (left, right)) in &self.bindings {
            map.serialize_entry(var, &(left, right))?;
        }
        map.end()
    }
}
