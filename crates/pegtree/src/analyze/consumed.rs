//! `isAlwaysConsumed`: does a successful match of this rule always consume
//! at least one input character?
//!
//! The predicate is computed as a memoized fixpoint over the whole
//! grammar, optimistically initialized to `true` for every rule and
//! refined downward until stable — a rule only loses its "always
//! consumes" status once some reachable path through its body is shown to
//! admit a zero-width match.
//!
//! Left recursion is then exactly: a rule reachable from itself by
//! following only zero-width prefixes. `rewrite_left_recursion` finds
//! every such rule and replaces its body with an expression that always
//! fails, so the generator never recurses into it unboundedly.

use crate::diagnostics::Severity;
use pegtree_core::{Expr, Grammar, Symbol};
use std::collections::{HashMap, HashSet};

pub fn always_consumes(grammar: &Grammar) -> HashMap<Symbol, bool> {
    let names = grammar.names().to_vec();
    let mut table: HashMap<Symbol, bool> = names.iter().map(|&n| (n, true)).collect();

    loop {
        let mut changed = false;
        for &name in &names {
            let Some(expr) = grammar.rule(name) else { continue };
            let value = expr_always_consumes(expr, &table);
            if table.get(&name) != Some(&value) {
                table.insert(name, value);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    table
}

pub(crate) fn expr_always_consumes(e: &Expr, table: &HashMap<Symbol, bool>) -> bool {
    match e {
        Expr::Empty => false,
        Expr::Any => true,
        Expr::Char(s) => !s.is_empty(),
        Expr::Range(set) => !set.is_empty(),
        Expr::Seq(es) => es.iter().any(|c| expr_always_consumes(c, table)),
        Expr::Ore(es) | Expr::Alt(es) => !es.is_empty() && es.iter().all(|c| expr_always_consumes(c, table)),
        Expr::And(_) | Expr::Not(_) => false,
        Expr::Many(_) | Expr::Option(_) => false,
        Expr::Many1(inner) => expr_always_consumes(inner, table),
        Expr::Ref(name) => table.get(name).copied().unwrap_or(true),
        Expr::Node(inner, _) | Expr::Edge(_, inner) | Expr::Abs(inner) => expr_always_consumes(inner, table),
        Expr::Fold(inner, _) => expr_always_consumes(inner, table),
        Expr::Action(inner, _) => expr_always_consumes(inner, table),
    }
}

/// Nonterminals reachable from `start` while the match-so-far is still
/// zero-width — i.e. every rule a left-recursive descent through `start`
/// could re-enter without having consumed anything.
fn zero_reach(start: Symbol, grammar: &Grammar, consumed: &HashMap<Symbol, bool>) -> HashSet<Symbol> {
    let mut visited = HashSet::new();
    let mut stack = vec![start];
    while let Some(name) = stack.pop() {
        if !visited.insert(name) {
            continue;
        }
        if let Some(expr) = grammar.rule(name) {
            collect_zero_refs(expr, consumed, &mut stack);
        }
    }
    visited
}

fn collect_zero_refs(e: &Expr, consumed: &HashMap<Symbol, bool>, out: &mut Vec<Symbol>) {
    match e {
        Expr::Ref(name) => out.push(*name),
        Expr::Seq(es) => {
            for child in es {
                collect_zero_refs(child, consumed, out);
                if expr_always_consumes(child, consumed) {
                    break;
                }
            }
        }
        Expr::Ore(es) | Expr::Alt(es) => {
            for child in es {
                collect_zero_refs(child, consumed, out);
            }
        }
        Expr::And(inner) | Expr::Not(inner) => collect_zero_refs(inner, consumed, out),
        Expr::Many(inner) | Expr::Many1(inner) | Expr::Option(inner) => collect_zero_refs(inner, consumed, out),
        Expr::Node(inner, _) | Expr::Edge(_, inner) | Expr::Abs(inner) => collect_zero_refs(inner, consumed, out),
        Expr::Fold(inner, _) => collect_zero_refs(inner, consumed, out),
        Expr::Action(inner, _) => collect_zero_refs(inner, consumed, out),
        Expr::Empty | Expr::Any | Expr::Char(_) | Expr::Range(_) => {}
    }
}

/// Replace the body of every left-recursive rule with an expression that
/// always fails at zero width, and emit an error diagnostic for each one.
/// Returns the set of rewritten rule names.
pub fn rewrite_left_recursion(
    grammar: &mut Grammar,
    diagnostics: &mut impl FnMut(Severity, usize, String),
) -> HashSet<Symbol> {
    let consumed = always_consumes(grammar);
    let names = grammar.names().to_vec();
    let mut rewritten = HashSet::new();

    for name in names {
        if zero_reach(name, grammar, &consumed).contains(&name) {
            let rule_name = grammar.resolve(name).to_string();
            diagnostics(Severity::Error, 0, format!("rule '{rule_name}' is left-recursive"));
            grammar.replace(name, Expr::Not(Box::new(Expr::Empty)));
            rewritten.insert(name);
        }
    }

    rewritten
}
