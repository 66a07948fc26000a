//! Utilities for generating fresh variable names.

use crate::symbol::Symbol;
use hashbrown::HashSet;

/// A counter producing fresh pattern variables named `{prefix}{n}`.
///
/// There is no shared global counter: every top-level anti-unification call
/// makes its own `Fresh`, so pattern variables are numbered from zero within a
/// call. To keep names distinct across several calls, build the anti-unifier
/// with an existing generator (for example
/// [`AntiUnifier::with_fresh`](crate::AntiUnifier::with_fresh)) and take it
/// back out with `into_parts` afterwards.
#[derive(Debug, Clone)]
pub struct Fresh {
    prefix: String,
    counter: usize,
    reserved: HashSet<Symbol>,
}

impl Fresh {
    /// Create a generator whose names start with `prefix`.
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_owned(),
            counter: 0,
            reserved: HashSet::new(),
        }
    }

    /// Return a fresh name. Reserved names are skipped.
    pub fn gen(&mut self) -> Symbol {
        loop {
            let name = Symbol::from(format!("{}{}", self.prefix, self.counter));
            self.counter += 1;
            if !self.reserved.contains(&name) {
                return name;
            }
        }
    }

    /// Mark `name` as taken, so that [`Fresh::gen`] never returns it.
    pub fn reserve(&mut self, name: Symbol) {
        self.reserved.insert(name);
    }

    /// The number of candidate names consumed so far, including skipped ones.
    #[must_use]
    pub fn counter(&self) -> usize {
        self.counter
    }
}

impl Extend<Symbol> for Fresh {
    fn extend<I: IntoIterator<Item = Symbol>>(&mut self, names: I) {
        self.reserved.extend(names);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_up_from_zero() {
        let mut fresh = Fresh::new("X");
        assert_eq!(fresh.gen(), Symbol::from("X0"));
        assert_eq!(fresh.gen(), Symbol::from("X1"));
        assert_eq!(fresh.gen(), Symbol::from("X2"));
        assert_eq!(fresh.counter(), 3);
    }

    #[test]
    fn skips_reserved_names() {
        let mut fresh = Fresh::new("F");
        fresh.extend(vec![Symbol::from("F0"), Symbol::from("F2")]);
        assert_eq!(fresh.gen(), Symbol::from("F1"));
        assert_eq!(fresh.gen(), Symbol::from("F3"));
    }

    #[test]
    fn independent_generators_restart() {
        let mut a = Fresh::new("X");
        a.gen();
        a.gen();
        let mut b = Fresh::new("X");
        assert_eq!(b.gen(), Symbol::from("X0"));
    }
}
