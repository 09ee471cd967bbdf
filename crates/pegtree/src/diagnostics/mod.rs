//! Grammar-loading diagnostics.
//!
//! Parse failures are values (an `err` `ParseTree`); nothing here concerns
//! itself with those. This module exists for the one channel that is
//! genuinely exceptional: problems found while *loading* a grammar
//! (redefinition, undefined nonterminal, left recursion, unresolved
//! import). The core boundary is a bare `(Severity, position, message)`
//! callback; `Diagnostics` is the `Vec`-backed sink used by callers (and
//! tests) who would rather collect than write their own closure.

mod message;


pub use message::{DiagnosticMessage, Severity};

/// Collection of diagnostic messages produced while loading a grammar.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    messages: Vec<DiagnosticMessage>,
}

/// Builder for constructing a diagnostic message.
#[must_use = "diagnostic not emitted, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    message: DiagnosticMessage,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    pub fn error(&mut self, msg: impl Into<String>, position: usize) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage::error(position, msg),
        }
    }

    pub fn warning(&mut self, msg: impl Into<String>, position: usize) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage::warning(position, msg),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.messages.iter()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|d| d.is_error())
    }

    pub fn has_warnings(&self) -> bool {
        self.messages.iter().any(|d| d.is_warning())
    }

    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_warning()).count()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }

    /// Adapt this collector to the bare callback signature the core
    /// boundary is specified in terms of.
    pub fn as_sink(&mut self) -> impl FnMut(Severity, usize, String) + '_ {
        move |severity, position, message| {
            self.messages.push(DiagnosticMessage {
                severity,
                position,
                message,
            });
        }
    }
}

impl<'a> DiagnosticBuilder<'a> {
    pub fn emit(self) {
        self.diagnostics.messages.push(self.message);
    }
}
