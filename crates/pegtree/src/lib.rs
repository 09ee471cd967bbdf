//! pegtree: a parsing-expression-grammar engine with tree-construction
//! operators built into the expression algebra itself.
//!
//! A grammar's surface syntax is recognized by [`bootstrap::bootstrap_grammar`]
//! — an ordinary grammar, compiled through the same [`compile::generate`]
//! every loaded grammar goes through — and [`loader::load`] lowers the
//! resulting [`tree::ParseTree`] into a [`pegtree_core::Grammar`]. From
//! there [`compile::generate`] produces a [`compile::Parser`] that runs
//! against arbitrary input.
//!
//! # Example
//!
//! ```
//! let grammar = pegtree::load_grammar("Greeting = 'hi' NAME\nNAME = [a-z]+\n").expect("valid grammar");
//! let parser = pegtree::compile::generate(&grammar, &Default::default()).unwrap();
//! assert!(parser.parse("hiworld").is_ok());
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]


pub mod analyze;
pub mod bootstrap;
pub mod compile;
pub mod diagnostics;
pub mod escape;
pub mod loader;
pub mod runtime;
pub mod tree;

pub use diagnostics::{DiagnosticMessage, Diagnostics, Severity};
pub use pegtree_core::{Expr, Grammar, Symbol, Verb};
pub use tree::ParseTree;

/// Errors that can occur while loading or compiling a grammar.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The grammar source text does not parse as a grammar.
    #[error("grammar source is not valid at byte {position}: {message}")]
    UnparsableGrammar { position: usize, message: String },

    /// `GenerateOptions::start` named a rule the grammar does not define.
    #[error("undefined start rule '{name}'")]
    UndefinedStart { name: String },
}

/// Result type for grammar loading and compilation.
pub type Result<T> = std::result::Result<T, Error>;

/// Parse `source` as grammar text and lower it into a [`Grammar`].
///
/// This runs the bootstrap grammar over `source`, then hands the
/// resulting parse tree to [`loader::load`], runs the left-recursion
/// rewrite pass, and normalizes every rule's body with
/// [`analyze::normalize`] so tree-construction operators are legal
/// wherever the generator requires them to be. Load-time diagnostics
/// (redefinitions, undefined references, left recursion) are collected
/// but do not by themselves fail this call — only source text the
/// bootstrap grammar cannot recognize at all does. Callers who need the
/// diagnostics themselves should call [`loader::load`] directly with
/// their own sink.
pub fn load_grammar(source: &str) -> Result<Grammar> {
    let bootstrap = bootstrap::bootstrap_grammar();
    let options = compile::GenerateOptions {
        start: Some("Start".to_string()),
        memo: false,
    };
    let parser = compile::generate(&bootstrap, &options)?;
    let tree = parser.parse(source).map_err(|err| Error::UnparsableGrammar {
        position: err.start(),
        message: "unexpected input".to_string(),
    })?;

    let mut diagnostics = Diagnostics::new();
    let mut grammar = loader::load(&tree, &bootstrap, &mut diagnostics.as_sink());
    analyze::rewrite_left_recursion(&mut grammar, &mut diagnostics.as_sink());

    for name in grammar.names().to_vec() {
        let body = grammar.rule(name).expect("name came from this grammar's own names()").clone();
        let normalized = analyze::normalize(body, &mut grammar);
        grammar.replace(name, normalized);
    }

    Ok(grammar)
}
