use super::consumed::*;
use pegtree_core::{Expr, Grammar};
use std::collections::HashMap;

#[test]
fn literal_always_consumes() {
    let g = Grammar::new();
    let table = HashMap::new();
    assert!(expr_always_consumes(&Expr::Char("a".into()), &table));
    assert!(!expr_always_consumes(&Expr::Char(String::new()), &table));
    assert!(!expr_always_consumes(&Expr::Empty, &table));
    let _ = g;
}

#[test]
fn seq_consumes_if_any_child_does() {
    let table = HashMap::new();
    let e = Expr::Seq(vec![Expr::Empty, Expr::Char("a".into())]);
    assert!(expr_always_consumes(&e, &table));
}

#[test]
fn ore_consumes_only_if_all_branches_do() {
    let table = HashMap::new();
    let consuming = Expr::Ore(vec![Expr::Char("a".into()), Expr::Char("b".into())]);
    assert!(expr_always_consumes(&consuming, &table));
    let mixed = Expr::Ore(vec![Expr::Char("a".into()), Expr::Empty]);
    assert!(!expr_always_consumes(&mixed, &table));
}

#[test]
fn many_never_always_consumes() {
    let table = HashMap::new();
    assert!(!expr_always_consumes(&Expr::Many(Box::new(Expr::Char("a".into()))), &table));
}

#[test]
fn many1_delegates_to_inner() {
    let table = HashMap::new();
    assert!(expr_always_consumes(&Expr::Many1(Box::new(Expr::Char("a".into()))), &table));
    assert!(!expr_always_consumes(&Expr::Many1(Box::new(Expr::Empty)), &table));
}

#[test]
fn directly_left_recursive_rule_is_rewritten() {
    let mut g = Grammar::new();
    let expr = g.intern("Expr");
    let plus = g.intern("Plus");
    g.add(expr, Expr::Ref(plus));
    g.add(plus, Expr::Seq(vec![Expr::Ref(expr), Expr::Char("+".into()), Expr::Ref(expr)]));

    let mut diags = Vec::new();
    let rewritten = rewrite_left_recursion(&mut g, &mut |sev, pos, msg| diags.push((sev, pos, msg)));

    assert!(rewritten.contains(&expr));
    assert_eq!(g.rule(expr), Some(&Expr::Not(Box::new(Expr::Empty))));
    assert_eq!(diags.len(), 1);
}

#[test]
fn non_left_recursive_rule_survives_untouched() {
    let mut g = Grammar::new();
    let number = g.intern("Number");
    g.add(number, Expr::Many1(Box::new(Expr::Char("0".into()))));

    let mut diags = Vec::new();
    let rewritten = rewrite_left_recursion(&mut g, &mut |sev, pos, msg| diags.push((sev, pos, msg)));

    assert!(rewritten.is_empty());
    assert!(diags.is_empty());
}

#[test]
fn recursion_guarded_by_a_preceding_consuming_term_is_not_left_recursive() {
    let mut g = Grammar::new();
    let list = g.intern("List");
    let item = g.intern("Item");
    g.add(list, Expr::Seq(vec![Expr::Ref(item), Expr::Many(Box::new(Expr::Ref(list)))]));
    g.add(item, Expr::Char("x".into()));

    let mut diags = Vec::new();
    let rewritten = rewrite_left_recursion(&mut g, &mut |sev, pos, msg| diags.push((sev, pos, msg)));

    assert!(rewritten.is_empty());
    assert!(diags.is_empty());
}
