//! Static analyses run on a loaded grammar before it is compiled.
//!
//! - [`consumed`] decides, per rule, whether a successful match of that
//!   rule always consumes at least one input character — the predicate
//!   left-recursion detection is built on.
//! - [`tree_state`] classifies every expression's tree-construction
//!   behavior (`Unit`/`Tree`/`Mut`/`Fold`).
//! - [`form_tree`] rewrites a loaded expression tree so tree-construction
//!   operators are legal everywhere `tree_state` requires them to be.

pub mod consumed;
pub mod form_tree;
pub mod tree_state;

#[cfg(test)]
mod consumed_tests;
#[cfg(test)]
mod tree_state_tests;

pub use consumed::{always_consumes, rewrite_left_recursion};
pub use form_tree::normalize;
pub use tree_state::{classify, TreeState};
