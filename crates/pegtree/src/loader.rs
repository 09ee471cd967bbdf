//! The grammar loader: a visitor over the bootstrap-produced parse tree,
//! lowering each tagged node into [`pegtree_core::Expr`].
//!
//! The bootstrap grammar (see [`crate::bootstrap`]) and the grammar being
//! built here are two entirely separate `Grammar`s with two entirely
//! separate interners: `bootstrap` is only ever consulted to resolve a
//! `ParseTree`'s tag/edge-label symbols back to the names this module
//! switches on (`"Rule"`, `"Char"`, `"Ref"`, ...); every `Symbol` this
//! module produces (rule names, tags, edge labels, state sids) is interned
//! fresh into the `Grammar` under construction.

#[cfg(test)]
mod loader_tests;

use crate::diagnostics::Severity;
use crate::escape;
use crate::tree::ParseTree;
use pegtree_core::{Expr, Grammar, Symbol, Verb};

type Sink<'a> = dyn FnMut(Severity, usize, String) + 'a;

/// Lower a bootstrap-produced `Source` parse tree into a `Grammar`.
///
/// Diagnostics (redefinitions, undefined references, unresolved imports)
/// are reported through `diagnostics` rather than failing the call; a
/// name referenced but never defined gets a sticky empty rule so the
/// generator still has something to compile against.
pub fn load(tree: &ParseTree, bootstrap: &Grammar, diagnostics: &mut Sink<'_>) -> Grammar {
    let mut grammar = Grammar::new();
    let mut referenced: Vec<(Symbol, String, usize)> = Vec::new();

    // Pre-pass: intern every rule name first so forward references inside
    // rule bodies resolve to the same Symbol regardless of definition order.
    for stmt in tree.children() {
        if tag_is(bootstrap, stmt, "Rule") {
            let name_text = edge_text(bootstrap, stmt, "name").unwrap_or_default();
            grammar.intern(&name_text);
        }
    }

    for stmt in tree.children() {
        match tag_name(bootstrap, stmt) {
            "Rule" => load_rule(stmt, bootstrap, &mut grammar, &mut referenced, diagnostics),
            "Import" => load_import(stmt, bootstrap, &mut grammar, diagnostics),
            "Example" => load_example(stmt, bootstrap, &mut grammar),
            other => diagnostics(Severity::Warning, stmt.start(), format!("unrecognized top-level statement '{other}'")),
        }
    }

    for (sym, text, pos) in referenced {
        if !grammar.contains(sym) {
            diagnostics(Severity::Warning, pos, format!("undefined nonterminal '{text}'"));
            grammar.add(sym, Expr::Empty);
        }
    }

    grammar
}

fn tag_name<'g>(bootstrap: &'g Grammar, node: &ParseTree) -> &'g str {
    match node.tag() {
        Some(tag) => bootstrap.resolve(tag),
        None => "",
    }
}

fn tag_is(bootstrap: &Grammar, node: &ParseTree, name: &str) -> bool {
    tag_name(bootstrap, node) == name
}

/// The text of an edge, looked up by label name through `bootstrap`'s
/// interner (the label itself was interned into `bootstrap` when the
/// bootstrap grammar's own `Edge`/`Fold` terms were built).
fn edge_text(bootstrap: &Grammar, node: &ParseTree, label: &str) -> Option<String> {
    let sym = bootstrap.find(label)?;
    node.edge(sym)?.text().map(str::to_owned)
}

/// An `Expr::Edge` always materializes as its own untagged wrapper node
/// around whatever single tagged node its wrapped expression actually
/// built (`Edge`'s own `exit_tree` call never supplies a tag). Look up
/// `label`, then peel that wrapper off to reach the real expression node.
fn edge_node<'t>(bootstrap: &Grammar, node: &'t ParseTree, label: &str) -> Option<&'t ParseTree> {
    let sym = bootstrap.find(label)?;
    let wrapper = node.edge(sym)?;
    Some(unwrap_edge(wrapper))
}

/// Peel the untagged wrapper an `Expr::Edge` always materializes as,
/// reaching the real (tagged) node it carries. A no-op for anything that
/// isn't such a wrapper, so it's safe to apply defensively.
fn unwrap_edge(node: &ParseTree) -> &ParseTree {
    if node.tag().is_none() && node.children().len() == 1 {
        unwrap_edge(&node.children()[0])
    } else {
        node
    }
}

fn split_names(text: &str) -> Vec<String> {
    text.split(',').map(|s| s.trim().to_string()).collect()
}

fn strip_delims(text: &str, n: usize) -> String {
    let len = text.chars().count();
    text.chars().skip(n).take(len.saturating_sub(2 * n)).collect()
}

fn load_rule(
    node: &ParseTree,
    bootstrap: &Grammar,
    grammar: &mut Grammar,
    referenced: &mut Vec<(Symbol, String, usize)>,
    diagnostics: &mut Sink<'_>,
) {
    let name_text = edge_text(bootstrap, node, "name").unwrap_or_default();
    let name_sym = grammar.intern(&name_text);
    let Some(e_node) = edge_node(bootstrap, node, "e") else {
        diagnostics(Severity::Error, node.start(), format!("rule '{name_text}' has no body"));
        return;
    };
    let expr = lower_expr(e_node, bootstrap, grammar, referenced, diagnostics);
    if !grammar.add(name_sym, expr) {
        diagnostics(Severity::Warning, node.start(), format!("rule '{name_text}' redefined; first definition wins"));
    }
}

fn load_import(node: &ParseTree, bootstrap: &Grammar, grammar: &mut Grammar, diagnostics: &mut Sink<'_>) {
    let urn_text = edge_text(bootstrap, node, "urn").unwrap_or_default();
    let names_text = edge_text(bootstrap, node, "names").unwrap_or_default();
    let urn_sym = grammar.intern(&urn_text);
    for name in split_names(&names_text) {
        let name_sym = grammar.intern(&name);
        diagnostics(
            Severity::Warning,
            node.start(),
            format!("import of '{name}' from '{urn_text}' is not resolved; inserting a stub"),
        );
        grammar.add(name_sym, Expr::Action(Box::new(Expr::Empty), Verb::Import { name: name_sym, urn: urn_sym }));
    }
}

fn load_example(node: &ParseTree, bootstrap: &Grammar, grammar: &mut Grammar) {
    let names_text = edge_text(bootstrap, node, "names").unwrap_or_default();
    let doc_text = edge_text(bootstrap, node, "doc").unwrap_or_default();
    let doc = strip_delims(&doc_text, 3);
    for name in split_names(&names_text) {
        let sym = grammar.intern(&name);
        grammar.add_example(sym, doc.clone());
    }
}

/// Lower one node of the expression grammar (whatever `Expression`,
/// `Choice`, `Sequence`, `Predicate`, `Suffix` or `Term` matched) to an
/// `Expr`. Untagged intermediate nodes (`Group`) never reach here as
/// themselves — the tree presents directly as whichever inner term
/// actually matched.
fn lower_expr(
    node: &ParseTree,
    bootstrap: &Grammar,
    grammar: &mut Grammar,
    referenced: &mut Vec<(Symbol, String, usize)>,
    diagnostics: &mut Sink<'_>,
) -> Expr {
    match tag_name(bootstrap, node) {
        "Empty" => Expr::Empty,
        "Any" => Expr::Any,

        "Char" => {
            let raw = node.text().unwrap_or_default();
            let body = strip_delims(raw, 1);
            Expr::Char(escape::unescape(&body))
        }

        "Class" => {
            let raw = node.text().unwrap_or_default();
            let body = strip_delims(raw, 1);
            let set = escape::parse_class(&body);
            if set.ranges().is_empty() && set.chars().len() == 1 {
                Expr::Char(set.chars()[0].to_string())
            } else {
                Expr::Range(set)
            }
        }

        "Ref" => {
            let name = edge_text(bootstrap, node, "name").unwrap_or_default();
            if name.starts_with('\'') || name.starts_with('"') {
                Expr::Char(escape::unescape(&strip_delims(&name, 1)))
            } else {
                let sym = grammar.intern(&name);
                referenced.push((sym, name, node.start()));
                Expr::Action(Box::new(Expr::Ref(sym)), Verb::Nt(sym))
            }
        }

        "Not" => Expr::Not(Box::new(lower_single_child(node, bootstrap, grammar, referenced, diagnostics))),
        "And" => Expr::And(Box::new(lower_single_child(node, bootstrap, grammar, referenced, diagnostics))),
        "Many" => Expr::Many(Box::new(lower_single_child(node, bootstrap, grammar, referenced, diagnostics))),
        "Many1" => Expr::Many1(Box::new(lower_single_child(node, bootstrap, grammar, referenced, diagnostics))),
        "Option" => Expr::Option(Box::new(lower_single_child(node, bootstrap, grammar, referenced, diagnostics))),

        "Seq" => Expr::seq(lower_children(node, bootstrap, grammar, referenced, diagnostics)),
        "Ore" => Expr::ore(lower_children(node, bootstrap, grammar, referenced, diagnostics)),
        "Alt" => Expr::alt(lower_children(node, bootstrap, grammar, referenced, diagnostics)),

        "Node" => {
            let tag = node_tag(node, bootstrap, grammar);
            let inner = edge_node(bootstrap, node, "e").expect("NodeTerm always has an 'e' edge");
            Expr::Node(Box::new(lower_expr(inner, bootstrap, grammar, referenced, diagnostics)), tag)
        }

        "Fold" => {
            let tag = node_tag(node, bootstrap, grammar);
            let inner = edge_node(bootstrap, node, "e").expect("FoldTerm always has an 'e' edge");
            Expr::Fold(Box::new(lower_expr(inner, bootstrap, grammar, referenced, diagnostics)), tag)
        }

        "Edge" => {
            let label_text = edge_text(bootstrap, node, "name").unwrap_or_default();
            let label = grammar.intern(&label_text);
            let inner = edge_node(bootstrap, node, "e").expect("EdgeTerm always has an 'e' edge");
            Expr::Edge(label, Box::new(lower_expr(inner, bootstrap, grammar, referenced, diagnostics)))
        }

        "EdgeFold" => {
            let label_text = edge_text(bootstrap, node, "name").unwrap_or_default();
            let label = grammar.intern(&label_text);
            let inner = edge_node(bootstrap, node, "e").expect("EdgeFoldTerm always has an 'e' edge");
            Expr::Edge(label, Box::new(lower_expr(inner, bootstrap, grammar, referenced, diagnostics)))
        }

        "Func" => lower_func(node, bootstrap, grammar, referenced, diagnostics),

        other => {
            diagnostics(Severity::Error, node.start(), format!("unrecognized expression node '{other}'"));
            Expr::Empty
        }
    }
}

/// `#tag` is optional on `Node`/`Fold` terms; `0Node` (a digit-led name,
/// reserved for anonymous rules by `Grammar::uname`'s own convention)
/// stands in when the author omitted one.
fn node_tag(node: &ParseTree, bootstrap: &Grammar, grammar: &mut Grammar) -> Symbol {
    match edge_text(bootstrap, node, "tag") {
        Some(text) => grammar.intern(&text),
        None => grammar.intern("0Node"),
    }
}

fn lower_single_child(
    node: &ParseTree,
    bootstrap: &Grammar,
    grammar: &mut Grammar,
    referenced: &mut Vec<(Symbol, String, usize)>,
    diagnostics: &mut Sink<'_>,
) -> Expr {
    let child = node.children().first().expect("quantifier/predicate node always wraps exactly one child");
    lower_expr(child, bootstrap, grammar, referenced, diagnostics)
}

/// The first item of a folded `Seq`/`Ore`/`Alt` was peeled in directly (no
/// edge wrapper, since it was matched before the fold began); every item
/// after it went through the fold's own positional edge. `unwrap_edge`
/// handles both uniformly.
fn lower_children(
    node: &ParseTree,
    bootstrap: &Grammar,
    grammar: &mut Grammar,
    referenced: &mut Vec<(Symbol, String, usize)>,
    diagnostics: &mut Sink<'_>,
) -> Vec<Expr> {
    node.children()
        .iter()
        .map(|c| lower_expr(unwrap_edge(c), bootstrap, grammar, referenced, diagnostics))
        .collect()
}

fn lower_func(
    node: &ParseTree,
    bootstrap: &Grammar,
    grammar: &mut Grammar,
    referenced: &mut Vec<(Symbol, String, usize)>,
    diagnostics: &mut Sink<'_>,
) -> Expr {
    let name = edge_text(bootstrap, node, "name").unwrap_or_default();
    // `node.children()` is `[name-edge, arg1, arg2, ...]`; the name edge
    // always occupies the first positional slot (it's built before the
    // argument list in the bootstrap grammar). Each argument is itself a
    // positional-edge wrapper around its actual expression node.
    let args: Vec<&ParseTree> = node.children().iter().skip(1).map(unwrap_edge).collect();

    let sid_arg = |arg: &ParseTree, grammar: &mut Grammar| -> Symbol {
        let name = identifier_of(arg, bootstrap).unwrap_or_default();
        grammar.intern(&name)
    };

    match name.as_str() {
        "lazy" => match args.first() {
            Some(a) => Expr::Action(Box::new(lower_expr(a, bootstrap, grammar, referenced, diagnostics)), Verb::Lazy),
            None => Expr::Empty,
        },
        "skip" => Expr::Action(Box::new(Expr::Empty), Verb::Skip),
        "scope" => match args.first() {
            Some(a) => Expr::Action(Box::new(lower_expr(a, bootstrap, grammar, referenced, diagnostics)), Verb::Scope),
            None => Expr::Empty,
        },
        "symbol" => {
            let sid = args.first().map(|a| sid_arg(a, grammar)).unwrap_or_else(|| grammar.intern(""));
            let inner = args.get(1).map_or(Expr::Empty, |a| lower_expr(a, bootstrap, grammar, referenced, diagnostics));
            Expr::Action(Box::new(inner), Verb::Symbol(sid))
        }
        "exists" => {
            let sid = args.first().map(|a| sid_arg(a, grammar)).unwrap_or_else(|| grammar.intern(""));
            Expr::Action(Box::new(Expr::Empty), Verb::Exists(sid))
        }
        "if" => {
            let sid = args.first().map(|a| sid_arg(a, grammar)).unwrap_or_else(|| grammar.intern(""));
            Expr::Action(Box::new(Expr::Empty), Verb::If(sid))
        }
        "match" => {
            let sid = args.first().map(|a| sid_arg(a, grammar)).unwrap_or_else(|| grammar.intern(""));
            Expr::Action(Box::new(Expr::Empty), Verb::Match(sid))
        }
        "def" => {
            let sid = args.first().map(|a| sid_arg(a, grammar)).unwrap_or_else(|| grammar.intern(""));
            let inner = args.get(1).map_or(Expr::Empty, |a| lower_expr(a, bootstrap, grammar, referenced, diagnostics));
            Expr::Action(Box::new(inner), Verb::Def(sid))
        }
        "in" => {
            let sid = args.first().map(|a| sid_arg(a, grammar)).unwrap_or_else(|| grammar.intern(""));
            Expr::Action(Box::new(Expr::Empty), Verb::In(sid))
        }
        "on" => {
            let Some(first) = args.first() else {
                return Expr::Empty;
            };
            let (value, name_node) = if tag_is(bootstrap, first, "Not") {
                (false, first.children().first().expect("Not always wraps a child"))
            } else {
                (true, *first)
            };
            let sid_text = identifier_of(name_node, bootstrap).unwrap_or_default();
            let sid = grammar.intern(&sid_text);
            let inner = args.get(1).map_or(Expr::Empty, |a| lower_expr(a, bootstrap, grammar, referenced, diagnostics));
            Expr::Action(Box::new(inner), Verb::On { sid, value })
        }
        other => {
            diagnostics(Severity::Error, node.start(), format!("unknown action '@{other}'"));
            Expr::Empty
        }
    }
}

/// The identifier name an argument expression boils down to: `@symbol(T, ...)`
/// parses `T` as an `Expression`, which bottoms out at a `RefTerm` wrapping
/// a plain name.
fn identifier_of(node: &ParseTree, bootstrap: &Grammar) -> Option<String> {
    if tag_is(bootstrap, node, "Ref") {
        return edge_text(bootstrap, node, "name");
    }
    node.children().first().and_then(|c| identifier_of(c, bootstrap))
}
