//! `treeState`: classify how an expression participates in tree
//! construction.
//!
//! - `Unit` — builds no tree at all (plain recognition).
//! - `Tree` — produces exactly one fresh tagged node (`Node`/`Fold`, or a
//!   `Ref` to a rule whose name looks like a node-producing rule).
//! - `Mut` — mutates the *enclosing* node by attaching edges (`Edge`, or a
//!   `Ref` to a rule conventionally named for that).
//! - `Fold` — extends the *enclosing* node's child list in place.
//!
//! `Ref`'s classification falls back to a naming convention exactly where
//! the referenced rule has not been loaded yet (forward references during
//! grammar loading): a name mixing upper- and lowercase is a node-shaped
//! rule (`Tree`); an all-lowercase/underscore name is an edge-shaped rule
//! (`Mut`); anything else defaults to `Unit`.

use pegtree_core::{Expr, Grammar};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeState {
    Unit,
    Tree,
    Mut,
    Fold,
}

pub fn classify(e: &Expr, grammar: &Grammar) -> TreeState {
    match e {
        Expr::Node(..) => TreeState::Tree,
        Expr::Fold(..) => TreeState::Fold,
        Expr::Edge(..) => TreeState::Mut,
        Expr::Empty | Expr::Any | Expr::Char(_) | Expr::Range(_) => TreeState::Unit,
        Expr::Seq(es) => es
            .iter()
            .map(|c| classify(c, grammar))
            .find(|s| *s != TreeState::Unit)
            .unwrap_or(TreeState::Unit),
        Expr::Ore(es) => es.first().map(|c| classify(c, grammar)).unwrap_or(TreeState::Unit),
        Expr::Alt(es) => {
            if es.iter().any(|c| classify(c, grammar) == TreeState::Tree) {
                TreeState::Tree
            } else {
                es.first().map(|c| classify(c, grammar)).unwrap_or(TreeState::Unit)
            }
        }
        Expr::And(_) | Expr::Not(_) => TreeState::Unit,
        Expr::Many(inner) | Expr::Many1(inner) | Expr::Option(inner) => classify(inner, grammar),
        Expr::Ref(name) => {
            let text = grammar.resolve(*name);
            let has_upper = text.chars().any(|c| c.is_uppercase());
            let has_lower = text.chars().any(|c| c.is_lowercase());
            if has_upper && has_lower {
                TreeState::Tree
            } else if !text.is_empty() && text.chars().all(|c| c.is_lowercase() || c == '_') {
                TreeState::Mut
            } else {
                TreeState::Unit
            }
        }
        Expr::Abs(inner) => classify(inner, grammar),
        Expr::Action(inner, _) => classify(inner, grammar),
    }
}
