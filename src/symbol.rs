//! Interned names.

use internment::ArcIntern;
use serde::{Serialize, Serializer};
use std::fmt::{self, Debug, Display, Formatter};

/// The name of a constant, variable, function symbol, or binder.
///
/// Symbols are interned, so cloning one is a reference count bump and
/// comparing two is a pointer comparison.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Symbol(ArcIntern<String>);

impl Symbol {
    /// Intern `name`.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(ArcIntern::new(name.to_owned()))
    }

    /// The symbol's text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self {
        Self(ArcIntern::new(name))
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Debug for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
