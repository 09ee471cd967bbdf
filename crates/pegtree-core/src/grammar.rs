//! The grammar registry: a named, ordered collection of rules.

use crate::expr::Expr;
use crate::interner::{Interner, Symbol};
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_GRAMMAR_ID: AtomicU32 = AtomicU32::new(1);

/// A doc-string example captured by an `example name, ... '''...'''`
/// statement, attached to the rule it documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    pub rule: Symbol,
    pub text: String,
}

/// Named, ordered collection of parsing-expression rules.
///
/// Insertion order is significant: the first rule inserted is the default
/// start rule (`Grammar::start`). Redefining a name is a caller-visible
/// event (the caller decides whether to diagnose it) but never destructive
/// — `add` only inserts a name that is not yet present.
#[derive(Debug, Clone)]
pub struct Grammar {
    id: u32,
    interner: Interner,
    order: Vec<Symbol>,
    rules: std::collections::HashMap<Symbol, Expr>,
    examples: Vec<Example>,
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

impl Grammar {
    pub fn new() -> Self {
        Self {
            id: NEXT_GRAMMAR_ID.fetch_add(1, Ordering::Relaxed),
            interner: Interner::new(),
            order: Vec::new(),
            rules: std::collections::HashMap::new(),
            examples: Vec::new(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Intern a rule/tag/label name into its canonical `Symbol`. Calling
    /// this twice on the same text yields the same `Symbol` — this is the
    /// canonicalization `Ref` identity-equality depends on.
    pub fn intern(&mut self, name: &str) -> Symbol {
        self.interner.intern(name)
    }

    /// The sentinel label for a positional (unlabeled) `Expr::Edge`, used
    /// to append ordered children without a named field.
    pub fn positional(&mut self) -> Symbol {
        self.interner.intern("")
    }

    pub fn is_positional(&self, label: Symbol) -> bool {
        self.resolve(label).is_empty()
    }

    pub fn resolve(&self, sym: Symbol) -> &str {
        self.interner.resolve(sym)
    }

    /// Look up a rule name's Symbol without interning it, for resolving a
    /// caller-supplied start-rule name against an already-loaded grammar.
    pub fn find(&self, name: &str) -> Option<Symbol> {
        self.interner.get(name)
    }

    /// Insert `expr` under `name` if `name` is not already defined.
    /// Returns `false` if `name` was already present (first definition
    /// wins; the caller is responsible for surfacing a redefinition
    /// diagnostic).
    pub fn add(&mut self, name: Symbol, expr: Expr) -> bool {
        if self.rules.contains_key(&name) {
            return false;
        }
        self.order.push(name);
        self.rules.insert(name, expr);
        true
    }

    /// Overwrite an existing rule's body in place (used by the
    /// left-recursion rewrite pass, which replaces a rule's body with a
    /// synthetic always-fail expression after the rule has already been
    /// inserted).
    pub fn replace(&mut self, name: Symbol, expr: Expr) {
        self.rules.insert(name, expr);
    }

    pub fn rule(&self, name: Symbol) -> Option<&Expr> {
        self.rules.get(&name)
    }

    pub fn contains(&self, name: Symbol) -> bool {
        self.rules.contains_key(&name)
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ordered rule names, in insertion order.
    pub fn names(&self) -> &[Symbol] {
        &self.order
    }

    /// The default start rule: the first rule inserted, or a synthesized
    /// always-succeeding empty rule if the grammar has no rules at all.
    pub fn start(&mut self) -> Symbol {
        if let Some(&first) = self.order.first() {
            return first;
        }
        let name = self.intern("EMPTY");
        self.add(name, Expr::Empty);
        name
    }

    pub fn add_example(&mut self, rule: Symbol, text: String) {
        self.examples.push(Example { rule, text });
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    /// `Ref.uname()`: a grammar-id-prefixed name, used to keep rule names
    /// collision-free when grammars are merged (e.g. resolved imports).
    /// Names that start with a digit are reserved for anonymous/inlined
    /// rules and are returned unprefixed.
    pub fn uname(&self, name: Symbol) -> String {
        let text = self.resolve(name);
        if text.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            text.to_string()
        } else {
            format!("{}{}", self.id, text)
        }
    }
}
