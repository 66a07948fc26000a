//! Position-wise anti-unification of two sequences of terms.

use super::{AntiUnifier, AntiUnifyError};
use crate::{environment::Environment, term::Term};
use log::debug;

/// What to do when two sequences of different lengths are anti-unified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthPolicy {
    /// Generalize the common prefix and drop the positions that have no
    /// counterpart.
    Truncate,
    /// Refuse with [`AntiUnifyError::LengthMismatch`].
    Strict,
}

impl Default for LengthPolicy {
    fn default() -> Self {
        Self::Truncate
    }
}

impl AntiUnifier {
    /// Anti-unify `left` and `right` position by position, up to the length
    /// of the shorter sequence. All positions share this anti-unifier's
    /// environment.
    pub fn anti_unify_list(&mut self, left: &[Term], right: &[Term]) -> Vec<Term> {
        if left.len() != right.len() {
            debug!(
                "truncating sequences of lengths {} and {} to their common prefix",
                left.len(),
                right.len()
            );
        }
        left.iter()
            .zip(right)
            .map(|(l, r)| self.anti_unify(l, r))
            .collect()
    }
}

/// Anti-unify two sequences of terms position by position.
///
/// A divergence that recurs at different positions is generalized by the same
/// pattern variable. If the sequences have different lengths, only their
/// common prefix is generalized; use [`anti_unify_list_with`] to reject such
/// inputs instead.
#[must_use]
pub fn anti_unify_list(left: &[Term], right: &[Term]) -> (Vec<Term>, Environment<Term>) {
    let mut anti_unifier = AntiUnifier::new();
    for term in left.iter().chain(right) {
        anti_unifier.reserve(term);
    }
    let generalizations = anti_unifier.anti_unify_list(left, right);
    (generalizations, anti_unifier.finish())
}

/// Anti-unify two sequences of terms position by position, handling
/// sequences of different lengths according to `policy`.
///
/// # Errors
///
/// Returns [`AntiUnifyError::LengthMismatch`] if the lengths differ and
/// `policy` is [`LengthPolicy::Strict`].
pub fn anti_unify_list_with(
    left: &[Term],
    right: &[Term],
    policy: LengthPolicy,
) -> Result<(Vec<Term>, Environment<Term>), AntiUnifyError> {
    if policy == LengthPolicy::Strict && left.len() != right.len() {
        return Err(AntiUnifyError::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    Ok(anti_unify_list(left, right))
}
