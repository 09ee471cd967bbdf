use crate::expr::Expr;
use crate::grammar::Grammar;

#[test]
fn add_then_lookup() {
    let mut g = Grammar::new();
    let n = g.intern("N");
    assert!(g.add(n, Expr::Any));
    assert_eq!(g.rule(n), Some(&Expr::Any));
}

#[test]
fn first_definition_wins_on_redefinition() {
    let mut g = Grammar::new();
    let n = g.intern("N");
    assert!(g.add(n, Expr::Any));
    assert!(!g.add(n, Expr::Empty));
    assert_eq!(g.rule(n), Some(&Expr::Any));
}

#[test]
fn start_is_first_inserted_rule() {
    let mut g = Grammar::new();
    let b = g.intern("B");
    let a = g.intern("A");
    g.add(b, Expr::Any);
    g.add(a, Expr::Empty);
    assert_eq!(g.start(), b);
}

#[test]
fn start_synthesizes_empty_rule_when_grammar_is_empty() {
    let mut g = Grammar::new();
    let start = g.start();
    assert_eq!(g.rule(start), Some(&Expr::Empty));
    assert_eq!(g.resolve(start), "EMPTY");
}

#[test]
fn interning_canonicalizes_ref_identity() {
    let mut g = Grammar::new();
    let a = g.intern("Expr");
    let b = g.intern("Expr");
    assert_eq!(a, b);
}

#[test]
fn uname_prefixes_with_grammar_id_unless_digit_led() {
    let mut g = Grammar::new();
    let name = g.intern("Rule");
    let anon = g.intern("0anon");
    assert_eq!(g.uname(name), format!("{}Rule", g.id()));
    assert_eq!(g.uname(anon), "0anon");
}

#[test]
fn names_preserve_insertion_order() {
    let mut g = Grammar::new();
    let b = g.intern("B");
    let a = g.intern("A");
    g.add(b, Expr::Any);
    g.add(a, Expr::Any);
    assert_eq!(g.names(), &[b, a]);
}

#[test]
fn positional_is_the_empty_label() {
    let mut g = Grammar::new();
    let p = g.positional();
    assert!(g.is_positional(p));
    assert_eq!(g.resolve(p), "");
}

#[test]
fn a_named_label_is_not_positional() {
    let mut g = Grammar::new();
    let label = g.intern("left");
    assert!(!g.is_positional(label));
}

#[test]
fn find_resolves_an_already_interned_name_without_inserting() {
    let mut g = Grammar::new();
    let n = g.intern("N");
    assert_eq!(g.find("N"), Some(n));
    assert_eq!(g.find("Missing"), None);
}
