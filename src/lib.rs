#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    anonymous_parameters,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    missing_debug_implementations,
    single_use_lifetimes,
    trivial_casts,
    unreachable_pub,
    unused_lifetimes,
)]

//! Least general generalization of terms by anti-unification.
//!
//! Given two terms, [`anti_unify`] computes the most specific term that both
//! are instances of, along with an [`Environment`] saying which pair of
//! subterms each of its pattern variables stands for. [`anti_unify_list`]
//! does the same position by position over two sequences, and
//! [`ho_anti_unify`] handles lambda terms, where a divergence under binders
//! is generalized by a variable applied to the bound variables it depends on.
//!
//! ```
//! use lgg::{anti_unify, Term};
//!
//! let left: Term = "(f a (g b))".parse().unwrap();
//! let right: Term = "(f c (g d))".parse().unwrap();
//! let (generalization, env) = anti_unify(&left, &right);
//!
//! assert_eq!(generalization.to_string(), "(f ?X0 (g ?X1))");
//! assert_eq!(env.to_string(), "{X0: (a, c), X1: (b, d)}");
//! ```

pub mod anti_unify;
pub mod environment;
pub mod fresh;
pub mod lambda;
pub mod sexp;
pub mod symbol;
pub mod term;

pub use anti_unify::{
    anti_unify, anti_unify_list, anti_unify_list_with, ho_anti_unify, AntiUnifier,
    AntiUnifyError, Capture, HigherOrderAntiUnifier, LengthPolicy,
};
pub use environment::{Environment, Side};
pub use fresh::Fresh;
pub use lambda::HoTerm;
pub use symbol::Symbol;
pub use term::{ParseTermError, Term};
