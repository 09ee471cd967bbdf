use super::generator::*;
use pegtree_core::{Expr, Grammar, Verb};

fn single_rule(name: &str, expr: Expr) -> Grammar {
    let mut g = Grammar::new();
    let sym = g.intern(name);
    g.add(sym, expr);
    g
}

#[test]
fn literal_matches_exactly() {
    let g = single_rule("Start", Expr::Char("foo".into()));
    let parser = generate(&g, &GenerateOptions::default()).unwrap();
    assert!(parser.parse("foo").is_ok());
    assert!(parser.parse("bar").is_err());
    assert!(parser.parse("foobar").is_err());
}

#[test]
fn ordered_choice_tries_alternatives_in_order() {
    let g = single_rule(
        "Start",
        Expr::Ore(vec![Expr::Char("ab".into()), Expr::Char("a".into())]),
    );
    let parser = generate(&g, &GenerateOptions::default()).unwrap();
    assert!(parser.parse("ab").is_ok());
    assert!(parser.parse("a").is_ok());
}

#[test]
fn many_matches_zero_or_more() {
    let g = single_rule("Start", Expr::Many(Box::new(Expr::Char("a".into()))));
    let parser = generate(&g, &GenerateOptions::default()).unwrap();
    assert!(parser.parse("").is_ok());
    assert!(parser.parse("aaa").is_ok());
    assert!(parser.parse("aab").is_err());
}

#[test]
fn many1_requires_at_least_one() {
    let g = single_rule("Start", Expr::Many1(Box::new(Expr::Char("a".into()))));
    let parser = generate(&g, &GenerateOptions::default()).unwrap();
    assert!(parser.parse("").is_err());
    assert!(parser.parse("aaa").is_ok());
}

#[test]
fn not_predicate_consumes_nothing() {
    let mut g = Grammar::new();
    let start = g.intern("Start");
    g.add(
        start,
        Expr::Seq(vec![Expr::Not(Box::new(Expr::Char("a".into()))), Expr::Char("b".into())]),
    );
    let parser = generate(&g, &GenerateOptions::default()).unwrap();
    assert!(parser.parse("b").is_ok());
    assert!(parser.parse("a").is_err());
}

#[test]
fn mutual_recursion_through_ref_terminates() {
    let mut g = Grammar::new();
    let a = g.intern("A");
    let b = g.intern("B");
    // A = "x" B?
    // B = "y" A?
    g.add(
        a,
        Expr::Seq(vec![Expr::Char("x".into()), Expr::Option(Box::new(Expr::Ref(b)))]),
    );
    g.add(
        b,
        Expr::Seq(vec![Expr::Char("y".into()), Expr::Option(Box::new(Expr::Ref(a)))]),
    );
    let parser = generate(&g, &GenerateOptions { start: Some("A".into()), memo: false }).unwrap();
    assert!(parser.parse("xyxy").is_ok());
    assert!(parser.parse("x").is_ok());
    assert!(parser.parse("z").is_err());
}

#[test]
fn node_and_edge_build_a_tree() {
    let mut g = Grammar::new();
    let start = g.intern("Start");
    let tag = g.intern("Pair");
    let left = g.intern("left");
    let right = g.intern("right");
    g.add(
        start,
        Expr::Node(
            Box::new(Expr::Seq(vec![
                Expr::Edge(left, Box::new(Expr::Char("a".into()))),
                Expr::Edge(right, Box::new(Expr::Char("b".into()))),
            ])),
            tag,
        ),
    );
    let parser = generate(&g, &GenerateOptions::default()).unwrap();
    let result = parser.parse("ab").unwrap();
    assert_eq!(result.tag(), Some(tag));
    assert_eq!(result.edge(left).unwrap().text(), Some("a"));
    assert_eq!(result.edge(right).unwrap().text(), Some("b"));
    // labeled edges are named fields only, never positional children too.
    assert!(result.children().is_empty());
}

#[test]
fn abs_discards_the_tree_built_by_its_inner_expression() {
    let mut g = Grammar::new();
    let start = g.intern("Start");
    let tag = g.intern("Hidden");
    g.add(
        start,
        Expr::Abs(Box::new(Expr::Node(Box::new(Expr::Char("a".into())), tag))),
    );
    let parser = generate(&g, &GenerateOptions::default()).unwrap();
    let result = parser.parse("a").unwrap();
    assert_ne!(result.tag(), Some(tag));
}

#[test]
fn scope_restores_state_bound_inside_it() {
    let mut g = Grammar::new();
    let start = g.intern("Start");
    let sid = g.intern("flag");
    g.add(
        start,
        Expr::Seq(vec![
            Expr::Action(
                Box::new(Expr::Action(Box::new(Expr::Char("a".into())), Verb::On { sid, value: true })),
                Verb::Scope,
            ),
            Expr::Action(Box::new(Expr::Empty), Verb::If(sid)),
        ]),
    );
    let parser = generate(&g, &GenerateOptions::default()).unwrap();
    assert!(parser.parse("a").is_err());
}

#[test]
fn skip_advances_pos_to_head_and_succeeds() {
    let mut g = Grammar::new();
    let start = g.intern("Start");
    g.add(
        start,
        Expr::Seq(vec![
            Expr::Char("ab".into()),
            Expr::Action(Box::new(Expr::Empty), Verb::Skip),
        ]),
    );
    let parser = generate(&g, &GenerateOptions::default()).unwrap();
    assert!(parser.parse("ab").is_ok());
}

#[test]
fn symbol_and_match_implement_backreference() {
    let mut g = Grammar::new();
    let start = g.intern("Start");
    let letters = g.intern("letters");
    let id = g.intern("Id");
    g.add(id, Expr::Many1(Box::new(Expr::Range(pegtree_core::expr::RangeSet::new(vec![], vec![('a', 'z')])))));
    g.add(
        start,
        Expr::Seq(vec![
            Expr::Action(Box::new(Expr::Ref(id)), Verb::Symbol(letters)),
            Expr::Char("=".into()),
            Expr::Action(Box::new(Expr::Empty), Verb::Match(letters)),
        ]),
    );
    let parser = generate(&g, &GenerateOptions::default()).unwrap();
    assert!(parser.parse("foo=foo").is_ok());
    assert!(parser.parse("foo=bar").is_err());
}

#[test]
fn fold_builds_a_left_associative_tree_over_repetition() {
    // 1 '+' 2 '+' 3  →  [#Lst [#Lst [#N '1'] [#N '2']] [#N '3']]
    let mut g = Grammar::new();
    let start = g.intern("Start");
    let n = g.intern("N");
    let lst = g.intern("Lst");
    let digit = pegtree_core::expr::RangeSet::new(vec![], vec![('0', '9')]);
    g.add(
        start,
        Expr::Seq(vec![
            Expr::Node(Box::new(Expr::Range(digit.clone())), n),
            Expr::Many(Box::new(Expr::Fold(
                Box::new(Expr::Seq(vec![Expr::Char("+".into()), Expr::Node(Box::new(Expr::Range(digit)), n)])),
                lst,
            ))),
        ]),
    );
    let parser = generate(&g, &GenerateOptions::default()).unwrap();
    let tree = parser.parse("1+2+3").unwrap();
    assert_eq!(tree.tag(), Some(lst));
    assert_eq!(tree.children().len(), 2);
    let (inner, third) = (&tree.children()[0], &tree.children()[1]);
    assert_eq!(inner.tag(), Some(lst));
    assert_eq!(third.tag(), Some(n));
    assert_eq!(third.text(), Some("3"));
    assert_eq!(inner.children()[0].text(), Some("1"));
    assert_eq!(inner.children()[1].text(), Some("2"));
}

#[test]
fn unknown_start_rule_is_an_error() {
    let g = single_rule("Start", Expr::Empty);
    let err = generate(&g, &GenerateOptions { start: Some("Nope".into()), memo: false }).unwrap_err();
    assert!(matches!(err, crate::Error::UndefinedStart { .. }));
}
