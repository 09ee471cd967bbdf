use crate::expr::{Expr, RangeSet};

#[test]
fn range_set_contains_singleton_and_range() {
    let set = RangeSet::new(vec!['_'], vec![('a', 'z'), ('0', '9')]);
    assert!(set.contains('_'));
    assert!(set.contains('m'));
    assert!(set.contains('5'));
    assert!(!set.contains('!'));
}

#[test]
fn range_set_empty() {
    let set = RangeSet::default();
    assert!(set.is_empty());
    assert!(!set.contains('a'));
}

#[test]
fn seq_of_one_collapses() {
    let e = Expr::seq(vec![Expr::Any]);
    assert_eq!(e, Expr::Any);
}

#[test]
fn seq_of_many_stays_seq() {
    let e = Expr::seq(vec![Expr::Any, Expr::Empty]);
    assert!(matches!(e, Expr::Seq(children) if children.len() == 2));
}

#[test]
fn ore_and_alt_collapse_singletons_too() {
    assert_eq!(Expr::ore(vec![Expr::Any]), Expr::Any);
    assert_eq!(Expr::alt(vec![Expr::Any]), Expr::Any);
}
