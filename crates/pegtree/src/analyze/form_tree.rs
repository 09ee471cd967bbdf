//! `formTree`: normalize a loaded expression tree so tree-construction
//! operators are legal wherever [`super::tree_state::classify`] says they
//! must be.
//!
//! The one concrete rewrite this performs: `Alt` requires its branches to
//! be tree-shape *homogeneous*. `Ore` does not — it compiles to the exact
//! same ordered-choice matcher, but is allowed to mix `Tree`/`Mut`/`Fold`
//! branches freely, because nothing downstream depends on every branch
//! producing the same kind of child. `Alt` is used precisely where that
//! uniformity matters (e.g. alternative node shapes under one parent), so
//! if any branch classifies as `Tree`, every `Mut`/`Fold` branch is
//! coerced to `Tree` by wrapping it in a synthetic, anonymously tagged
//! `Node`.

use super::tree_state::{classify, TreeState};
use pegtree_core::{Expr, Grammar};

const SYNTHETIC_ALT_TAG: &str = "0Alt";

pub fn normalize(e: Expr, grammar: &mut Grammar) -> Expr {
    match e {
        Expr::Alt(branches) => normalize_alt(branches, grammar),
        Expr::Seq(es) => Expr::Seq(es.into_iter().map(|c| normalize(c, grammar)).collect()),
        Expr::Ore(es) => Expr::Ore(es.into_iter().map(|c| normalize(c, grammar)).collect()),
        Expr::And(inner) => Expr::And(Box::new(normalize(*inner, grammar))),
        Expr::Not(inner) => Expr::Not(Box::new(normalize(*inner, grammar))),
        Expr::Many(inner) => Expr::Many(Box::new(normalize(*inner, grammar))),
        Expr::Many1(inner) => Expr::Many1(Box::new(normalize(*inner, grammar))),
        Expr::Option(inner) => Expr::Option(Box::new(normalize(*inner, grammar))),
        Expr::Node(inner, tag) => Expr::Node(Box::new(normalize(*inner, grammar)), tag),
        Expr::Edge(label, inner) => Expr::Edge(label, Box::new(normalize(*inner, grammar))),
        Expr::Fold(inner, tag) => Expr::Fold(Box::new(normalize(*inner, grammar)), tag),
        Expr::Abs(inner) => Expr::Abs(Box::new(normalize(*inner, grammar))),
        Expr::Action(inner, verb) => Expr::Action(Box::new(normalize(*inner, grammar)), verb),
        leaf @ (Expr::Empty | Expr::Any | Expr::Char(_) | Expr::Range(_) | Expr::Ref(_)) => leaf,
    }
}

fn normalize_alt(branches: Vec<Expr>, grammar: &mut Grammar) -> Expr {
    let branches: Vec<Expr> = branches.into_iter().map(|c| normalize(c, grammar)).collect();
    let any_tree = branches.iter().any(|c| classify(c, grammar) == TreeState::Tree);

    if !any_tree {
        return Expr::Alt(branches);
    }

    let tag = grammar.intern(SYNTHETIC_ALT_TAG);
    let coerced = branches
        .into_iter()
        .map(|branch| match classify(&branch, grammar) {
            TreeState::Mut | TreeState::Fold => Expr::Node(Box::new(branch), tag),
            _ => branch,
        })
        .collect();

    Expr::Alt(coerced)
}
