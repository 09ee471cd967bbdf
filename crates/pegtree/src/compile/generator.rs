//! Compiling a grammar's expression algebra into an executable recognizer.
//!
//! Every `Expr` node compiles to a `Matcher`, a boxed closure over a
//! shared `ParserContext`. `Ref` is the only expression that can be
//! mutually or self-recursive; it is resolved through a table of matchers
//! shared (via `Rc<RefCell<_>>`) across the whole compilation. Before a
//! rule's body is compiled, a provisional matcher that looks itself up in
//! the table and calls through is installed under that rule's name — this
//! breaks the cycle, since the real matcher only needs to exist in the
//! table *by the time it is called*, not by the time it is built. Once the
//! body is compiled, the provisional entry is overwritten with the real
//! one.

use crate::runtime::{ParserContext, StateValue};
use crate::tree::{self, PTreeKind, ParseTree};
use pegtree_core::{Expr, Grammar, Symbol, Verb};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub type Matcher = Rc<dyn Fn(&mut ParserContext) -> bool>;
type Table = Rc<RefCell<HashMap<Symbol, Matcher>>>;

/// Options controlling how a grammar is compiled.
pub struct GenerateOptions {
    /// Start rule name. Defaults to the grammar's first-inserted rule.
    pub start: Option<String>,
    /// Reserved for a future memoization pass; the generator presently
    /// always compiles a plain backtracking recognizer.
    pub memo: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            start: None,
            memo: false,
        }
    }
}

/// A compiled grammar, ready to run against input text.
pub struct Parser {
    start: Matcher,
}

impl Parser {
    /// Run the compiled recognizer against `input`.
    ///
    /// Returns `Ok` with the materialized tree on a full-input match, or
    /// `Err` with a tree anchored at the furthest position any attempt
    /// reached (`headpos`) when no match covers the whole input.
    pub fn parse(&self, input: &str) -> Result<ParseTree, ParseTree> {
        let mut ctx = ParserContext::new(input);
        let start = ctx.pos;
        if (self.start)(&mut ctx) && ctx.pos == input.len() {
            Ok(tree::materialize(ctx.ast, input, start, ctx.pos))
        } else {
            Err(ParseTree::leaf(ctx.headpos, ctx.headpos, String::new()))
        }
    }
}

pub fn generate(grammar: &Grammar, options: &GenerateOptions) -> Result<Parser, crate::Error> {
    let start_name = match &options.start {
        Some(name) => grammar.find(name).ok_or_else(|| crate::Error::UndefinedStart { name: name.clone() })?,
        None => grammar.names().first().copied().ok_or_else(|| crate::Error::UndefinedStart {
            name: String::new(),
        })?,
    };

    let table: Table = Rc::new(RefCell::new(HashMap::new()));
    let start = resolve_ref(start_name, grammar, &table);
    Ok(Parser { start })
}

/// Look up `name` in `table`, compiling and installing it on first
/// reference (installing a self-referencing stub first to break cycles).
fn resolve_ref(name: Symbol, grammar: &Grammar, table: &Table) -> Matcher {
    if let Some(m) = table.borrow().get(&name) {
        return m.clone();
    }

    {
        let stub_table = table.clone();
        let stub: Matcher = Rc::new(move |ctx: &mut ParserContext| {
            let matcher = stub_table
                .borrow()
                .get(&name)
                .cloned()
                .expect("rule matcher installed before any reference is invoked");
            matcher(ctx)
        });
        table.borrow_mut().insert(name, stub);
    }

    let body = grammar
        .rule(name)
        .unwrap_or_else(|| panic!("undefined nonterminal '{}'", grammar.resolve(name)));
    let compiled = compile(body, grammar, table);
    table.borrow_mut().insert(name, compiled.clone());
    compiled
}

fn compile(e: &Expr, grammar: &Grammar, table: &Table) -> Matcher {
    match e {
        Expr::Empty => Rc::new(|_ctx| true),

        Expr::Any => Rc::new(|ctx| ctx.advance_char().is_some()),

        Expr::Char(lit) => {
            let lit = lit.clone();
            Rc::new(move |ctx| {
                if ctx.remaining().starts_with(lit.as_str()) {
                    ctx.pos += lit.len();
                    ctx.touch_head();
                    true
                } else {
                    false
                }
            })
        }

        Expr::Range(set) => {
            let set = set.clone();
            Rc::new(move |ctx| match ctx.current_char() {
                Some(c) if set.contains(c) => {
                    ctx.advance_char();
                    true
                }
                _ => false,
            })
        }

        Expr::Seq(es) => {
            let matchers: Vec<Matcher> = es.iter().map(|c| compile(c, grammar, table)).collect();
            Rc::new(move |ctx| matchers.iter().all(|m| m(ctx)))
        }

        Expr::Ore(es) | Expr::Alt(es) => {
            let matchers: Vec<Matcher> = es.iter().map(|c| compile(c, grammar, table)).collect();
            Rc::new(move |ctx| {
                for m in &matchers {
                    let snapshot = ctx.clone();
                    if m(ctx) {
                        return true;
                    }
                    *ctx = snapshot;
                }
                false
            })
        }

        Expr::And(inner) => {
            let m = compile(inner, grammar, table);
            Rc::new(move |ctx| {
                let snapshot = ctx.clone();
                let ok = m(ctx);
                *ctx = snapshot;
                ok
            })
        }

        Expr::Not(inner) => {
            let m = compile(inner, grammar, table);
            Rc::new(move |ctx| {
                let snapshot = ctx.clone();
                let ok = m(ctx);
                *ctx = snapshot;
                !ok
            })
        }

        Expr::Many(inner) => {
            let m = compile(inner, grammar, table);
            Rc::new(move |ctx| {
                loop {
                    let snapshot = ctx.clone();
                    if !m(ctx) {
                        *ctx = snapshot;
                        break;
                    }
                    if ctx.pos == snapshot.pos {
                        break;
                    }
                }
                true
            })
        }

        Expr::Many1(inner) => {
            let m = compile(inner, grammar, table);
            Rc::new(move |ctx| {
                if !m(ctx) {
                    return false;
                }
                loop {
                    let snapshot = ctx.clone();
                    if !m(ctx) {
                        *ctx = snapshot;
                        break;
                    }
                    if ctx.pos == snapshot.pos {
                        break;
                    }
                }
                true
            })
        }

        Expr::Option(inner) => {
            let m = compile(inner, grammar, table);
            Rc::new(move |ctx| {
                let snapshot = ctx.clone();
                if !m(ctx) {
                    *ctx = snapshot;
                }
                true
            })
        }

        Expr::Ref(name) => resolve_ref(*name, grammar, table),

        Expr::Node(inner, tag) => compile_node(inner, *tag, grammar, table),

        Expr::Edge(label, inner) => {
            let kind_label = if grammar.is_positional(*label) { None } else { Some(*label) };
            compile_edge(inner, kind_label, grammar, table)
        }

        Expr::Fold(inner, tag) => {
            let m = compile(inner, grammar, table);
            let tag = *tag;
            Rc::new(move |ctx| {
                let snapshot = ctx.clone();
                let spos = ctx.ast.as_ref().map(|n| n.start).unwrap_or(ctx.pos);
                let outer_prev = ctx.enter_fold();
                if !m(ctx) {
                    *ctx = snapshot;
                    return false;
                }
                ctx.exit_tree(outer_prev, PTreeKind::Node(tag), spos, None);
                true
            })
        }

        Expr::Abs(inner) => {
            let m = compile(inner, grammar, table);
            Rc::new(move |ctx| {
                let saved_ast = ctx.ast.clone();
                if !m(ctx) {
                    return false;
                }
                ctx.ast = saved_ast;
                true
            })
        }

        Expr::Action(inner, verb) => compile_action(inner, verb, grammar, table),
    }
}

fn compile_node(inner: &Expr, tag: Symbol, grammar: &Grammar, table: &Table) -> Matcher {
    let m = compile(inner, grammar, table);
    Rc::new(move |ctx| {
        let spos = ctx.pos;
        let prev = ctx.enter_tree();
        if !m(ctx) {
            return false;
        }
        ctx.exit_tree(prev, PTreeKind::Node(tag), spos, None);
        true
    })
}

fn compile_edge(inner: &Expr, label: Option<Symbol>, grammar: &Grammar, table: &Table) -> Matcher {
    let m = compile(inner, grammar, table);
    Rc::new(move |ctx| {
        let spos = ctx.pos;
        let prev = ctx.enter_tree();
        if !m(ctx) {
            return false;
        }
        ctx.exit_tree(prev, PTreeKind::Edge(label), spos, None);
        true
    })
}

fn compile_action(inner: &Expr, verb: &Verb, grammar: &Grammar, table: &Table) -> Matcher {
    let m = compile(inner, grammar, table);
    let matcher: Matcher = match verb {
        Verb::Nt(_) | Verb::Lazy => m,

        Verb::Scope => Rc::new(move |ctx| {
            let saved_state = ctx.state.clone();
            let ok = m(ctx);
            ctx.state = saved_state;
            ok
        }),

        // `inner` is always `Empty` (the loader never wraps a body around
        // `@skip()`); advance straight to the furthest position any branch
        // has reached, matching tpeg2.py's `px.pos = min(px.headpos, px.epos)`.
        Verb::Skip => Rc::new(move |ctx| {
            let _ = &m;
            ctx.pos = ctx.headpos.min(ctx.epos);
            true
        }),

        Verb::Import { .. } => m,

        Verb::Symbol(sid) => {
            let sid = *sid;
            Rc::new(move |ctx| {
                let spos = ctx.pos;
                if !m(ctx) {
                    return false;
                }
                let text = ctx.input[spos..ctx.pos].to_string();
                ctx.push_state(sid, StateValue::Text(text));
                true
            })
        }

        Verb::Exists(sid) => {
            let sid = *sid;
            Rc::new(move |ctx| ctx.lookup_state(sid).is_some())
        }

        Verb::If(sid) => {
            let sid = *sid;
            Rc::new(move |ctx| matches!(ctx.lookup_state(sid), Some(StateValue::Bool(true))))
        }

        Verb::Match(sid) => {
            let sid = *sid;
            Rc::new(move |ctx| match ctx.lookup_state(sid) {
                Some(StateValue::Text(expected)) => {
                    let expected = expected.clone();
                    if ctx.remaining().starts_with(expected.as_str()) {
                        ctx.pos += expected.len();
                        ctx.touch_head();
                        true
                    } else {
                        false
                    }
                }
                _ => false,
            })
        }

        Verb::Def(sid) => {
            let sid = *sid;
            Rc::new(move |ctx| {
                let spos = ctx.pos;
                if !m(ctx) {
                    return false;
                }
                let text = ctx.input[spos..ctx.pos].to_string();
                ctx.define(sid, text);
                true
            })
        }

        Verb::In(sid) => {
            let sid = *sid;
            Rc::new(move |ctx| match ctx.longest_dict_match(sid) {
                Some(matched) => {
                    ctx.pos += matched.len();
                    ctx.touch_head();
                    true
                }
                None => false,
            })
        }

        Verb::On { sid, value } => {
            let sid = *sid;
            let value = *value;
            Rc::new(move |ctx| {
                if !m(ctx) {
                    return false;
                }
                ctx.push_state(sid, StateValue::Bool(value));
                true
            })
        }
    };
    matcher
}
