use super::tree_state::*;
use pegtree_core::{Expr, Grammar};

#[test]
fn literals_are_unit() {
    let g = Grammar::new();
    assert_eq!(classify(&Expr::Char("a".into()), &g), TreeState::Unit);
}

#[test]
fn node_is_tree() {
    let mut g = Grammar::new();
    let tag = g.intern("Foo");
    let e = Expr::Node(Box::new(Expr::Any), tag);
    assert_eq!(classify(&e, &g), TreeState::Tree);
}

#[test]
fn edge_is_mut() {
    let mut g = Grammar::new();
    let label = g.intern("name");
    let e = Expr::Edge(label, Box::new(Expr::Any));
    assert_eq!(classify(&e, &g), TreeState::Mut);
}

#[test]
fn fold_is_fold() {
    let mut g = Grammar::new();
    let tag = g.intern("Seq");
    let e = Expr::Fold(Box::new(Expr::Any), tag);
    assert_eq!(classify(&e, &g), TreeState::Fold);
}

#[test]
fn seq_takes_first_non_unit_child() {
    let mut g = Grammar::new();
    let tag = g.intern("Foo");
    let e = Expr::Seq(vec![Expr::Char("a".into()), Expr::Node(Box::new(Expr::Any), tag)]);
    assert_eq!(classify(&e, &g), TreeState::Tree);
}

#[test]
fn ref_naming_convention_mixed_case_is_tree() {
    let mut g = Grammar::new();
    let name = g.intern("Rule");
    assert_eq!(classify(&Expr::Ref(name), &g), TreeState::Tree);
}

#[test]
fn ref_naming_convention_lowercase_is_mut() {
    let mut g = Grammar::new();
    let name = g.intern("name");
    assert_eq!(classify(&Expr::Ref(name), &g), TreeState::Mut);
}

#[test]
fn ref_naming_convention_uppercase_only_is_unit() {
    let mut g = Grammar::new();
    let name = g.intern("EOF");
    assert_eq!(classify(&Expr::Ref(name), &g), TreeState::Unit);
}

#[test]
fn alt_is_tree_if_any_branch_is() {
    let mut g = Grammar::new();
    let tag = g.intern("Foo");
    let label = g.intern("name");
    let e = Expr::Alt(vec![
        Expr::Edge(label, Box::new(Expr::Any)),
        Expr::Node(Box::new(Expr::Any), tag),
    ]);
    assert_eq!(classify(&e, &g), TreeState::Tree);
}
