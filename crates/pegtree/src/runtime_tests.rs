use super::*;
use pegtree_core::Grammar;

#[test]
fn advance_char_moves_past_one_char_and_touches_head() {
    let mut ctx = ParserContext::new("héllo");
    let c = ctx.advance_char().unwrap();
    assert_eq!(c, 'h');
    assert_eq!(ctx.pos, 1);
    assert_eq!(ctx.headpos, 1);
}

#[test]
fn advance_char_fails_at_eof() {
    let mut ctx = ParserContext::new("");
    assert!(ctx.advance_char().is_none());
}

#[test]
fn state_lookup_prefers_most_recent_frame() {
    let mut g = Grammar::new();
    let sid = g.intern("T");
    let mut ctx = ParserContext::new("x");
    ctx.push_state(sid, StateValue::Text("first".into()));
    ctx.push_state(sid, StateValue::Text("second".into()));
    assert_eq!(ctx.lookup_state(sid), Some(&StateValue::Text("second".into())));
}

#[test]
fn state_lookup_skips_frames_for_other_symbols() {
    let mut g = Grammar::new();
    let a = g.intern("A");
    let b = g.intern("B");
    let mut ctx = ParserContext::new("x");
    ctx.push_state(a, StateValue::Bool(true));
    assert_eq!(ctx.lookup_state(b), None);
}

#[test]
fn snapshot_and_restore_undoes_state_changes() {
    let mut g = Grammar::new();
    let sid = g.intern("T");
    let mut ctx = ParserContext::new("abc");
    let snapshot = ctx.clone();
    ctx.advance_char();
    ctx.push_state(sid, StateValue::Bool(true));
    assert_eq!(ctx.pos, 1);

    ctx = snapshot;
    assert_eq!(ctx.pos, 0);
    assert_eq!(ctx.lookup_state(sid), None);
}

#[test]
fn dict_lookup_prefers_longest_match() {
    let mut g = Grammar::new();
    let sid = g.intern("T");
    let mut ctx = ParserContext::new("foobar");
    ctx.define(sid, "foo".into());
    ctx.define(sid, "foobar".into());
    assert_eq!(ctx.longest_dict_match(sid), Some("foobar"));
}

#[test]
fn dict_lookup_ignores_other_dicts() {
    let mut g = Grammar::new();
    let a = g.intern("A");
    let b = g.intern("B");
    let mut ctx = ParserContext::new("foo");
    ctx.define(a, "foo".into());
    assert_eq!(ctx.longest_dict_match(b), None);
}

#[test]
fn enter_and_exit_tree_wrap_accumulated_children() {
    let mut g = Grammar::new();
    let tag = g.intern("Foo");
    let mut ctx = ParserContext::new("ab");
    let prev = ctx.enter_tree();
    ctx.advance_char();
    ctx.exit_tree(prev, PTreeKind::Node(tag), 0, None);
    assert!(ctx.ast.is_some());
    let node = ctx.ast.unwrap();
    assert_eq!(node.start, 0);
    assert_eq!(node.end, 1);
    assert!(matches!(node.kind, PTreeKind::Node(t) if t == tag));
}

#[test]
fn enter_fold_peels_the_most_recent_sibling_out_on_its_own() {
    let mut g = Grammar::new();
    let inner_tag = g.intern("Term");
    let outer_tag = g.intern("Many");
    let mut ctx = ParserContext::new("aaa");

    let prev = ctx.enter_tree();
    ctx.advance_char();
    ctx.exit_tree(prev, PTreeKind::Node(inner_tag), 0, None);
    // ast is now a single Term node, with nothing behind it.

    let outer_prev = ctx.enter_fold();
    assert!(outer_prev.is_none());
    let peeled = ctx.ast.as_ref().unwrap();
    assert_eq!(peeled.start, 0);
    assert!(peeled.prev.is_none());

    ctx.advance_char();
    ctx.exit_tree(outer_prev, PTreeKind::Node(outer_tag), 0, None);
    let wrapped = ctx.ast.unwrap();
    assert!(matches!(wrapped.kind, PTreeKind::Node(t) if t == outer_tag));
    assert_eq!(wrapped.start, 0);
    assert_eq!(wrapped.end, 2);
    assert!(wrapped.prev.is_none());
    let child = wrapped.child.as_ref().unwrap();
    assert!(matches!(child.kind, PTreeKind::Node(t) if t == inner_tag));
}

#[test]
fn enter_fold_on_an_empty_scope_peels_to_nothing() {
    let mut ctx = ParserContext::new("a");
    let outer_prev = ctx.enter_fold();
    assert!(outer_prev.is_none());
    assert!(ctx.ast.is_none());
}
