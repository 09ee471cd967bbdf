//! Parser runtime state.
//!
//! [`ParserContext`] is the single mutable value threaded through every
//! compiled matcher closure. Backtracking is implemented by snapshotting a
//! `ParserContext` (an O(1) copy: every field is either `Copy` or an `Rc`)
//! before trying an alternative, and restoring the snapshot if that
//! alternative fails.

use crate::tree::{PTree, PTreeKind, PTreeNode};
use pegtree_core::Symbol;
use std::rc::Rc;

/// A value bound by `def`/`on` into the symbol-keyed state stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateValue {
    Text(String),
    Bool(bool),
}

#[derive(Debug)]
pub struct StateFrame {
    pub sid: Symbol,
    pub value: StateValue,
    pub prev: StateLink,
}

pub type StateLink = Option<Rc<StateFrame>>;

/// One string registered into a named dictionary by `def(NAME, e)`.
#[derive(Debug)]
pub struct DictFrame {
    pub dict: Symbol,
    pub text: String,
    pub prev: DictLink,
}

pub type DictLink = Option<Rc<DictFrame>>;

/// Mutable parser state shared by every compiled matcher.
///
/// Cloning a `ParserContext` is cheap: `input` is a borrowed `&str`, `ast`
/// and `state` are `Rc`-linked chains, and everything else is `Copy`. A
/// snapshot taken before a speculative branch restores exactly this state
/// on failure, discarding whatever the branch appended.
#[derive(Clone)]
pub struct ParserContext<'i> {
    pub input: &'i str,
    pub pos: usize,
    pub epos: usize,
    pub headpos: usize,
    pub ast: PTree,
    pub state: StateLink,
    pub dict: DictLink,
}

impl<'i> ParserContext<'i> {
    pub fn new(input: &'i str) -> Self {
        Self {
            input,
            pos: 0,
            epos: input.len(),
            headpos: 0,
            ast: None,
            state: None,
            dict: None,
        }
    }

    /// Register `text` under `dict`, most-recent first, so lookup always
    /// prefers the latest definition when several entries share a prefix.
    pub fn define(&mut self, dict: Symbol, text: String) {
        self.dict = Some(Rc::new(DictFrame {
            dict,
            text,
            prev: self.dict.clone(),
        }));
    }

    /// Longest registered entry of `dict` that prefixes `self.remaining()`,
    /// if any.
    pub fn longest_dict_match(&self, dict: Symbol) -> Option<&str> {
        let mut link = self.dict.as_ref();
        let remaining = self.remaining();
        let mut best: Option<&str> = None;
        while let Some(frame) = link {
            if frame.dict == dict && remaining.starts_with(frame.text.as_str()) {
                match best {
                    Some(b) if b.len() >= frame.text.len() => {}
                    _ => best = Some(frame.text.as_str()),
                }
            }
            link = frame.prev.as_ref();
        }
        best
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub fn remaining(&self) -> &'i str {
        &self.input[self.pos..]
    }

    pub fn current_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Advance `pos` past one `char` and return it, or fail at EOF.
    pub fn advance_char(&mut self) -> Option<char> {
        let c = self.current_char()?;
        self.pos += c.len_utf8();
        self.touch_head();
        Some(c)
    }

    /// Record that parsing has reached `self.pos`, for error-reporting: the
    /// furthest position any attempt (successful or not) has reached.
    pub fn touch_head(&mut self) {
        if self.pos > self.headpos {
            self.headpos = self.pos;
        }
    }

    pub fn push_state(&mut self, sid: Symbol, value: StateValue) {
        self.state = Some(Rc::new(StateFrame {
            sid,
            value,
            prev: self.state.clone(),
        }));
    }

    /// Most recent frame bound to `sid`, searching from the top of the
    /// stack down (shadowing, not replacement).
    pub fn lookup_state(&self, sid: Symbol) -> Option<&StateValue> {
        let mut link = self.state.as_ref();
        while let Some(frame) = link {
            if frame.sid == sid {
                return Some(&frame.value);
            }
            link = frame.prev.as_ref();
        }
        None
    }

    /// Enter a fresh tree scope: save the current `ast` as `prev` and start
    /// building a new, empty child chain. Used by `Expr::Node`/`Expr::Edge`
    /// before running their inner expression.
    pub fn enter_tree(&mut self) -> PTree {
        std::mem::take(&mut self.ast)
    }

    /// Peel the most recently built sibling out of the current tree scope
    /// so it becomes the sole content of a fresh one, returning what was
    /// behind it. Used by `Expr::Fold` to retag an already-built sibling
    /// (a quantified term, the first item of an `n`-ary operator) instead
    /// of re-matching it. A scope with nothing built yet peels to `None`.
    pub fn enter_fold(&mut self) -> PTree {
        match self.ast.take() {
            None => None,
            Some(top) => {
                let outer_prev = top.prev.clone();
                self.ast = Some(Rc::new(PTreeNode {
                    prev: None,
                    kind: top.kind,
                    start: top.start,
                    end: top.end,
                    child: top.child.clone(),
                    text: top.text.clone(),
                }));
                outer_prev
            }
        }
    }

    /// Close a tree scope opened by [`ParserContext::enter_tree`]: wrap
    /// whatever was accumulated in `self.ast` since as the `child` of a new
    /// link, and chain that link onto `prev`.
    pub fn exit_tree(&mut self, prev: PTree, kind: PTreeKind, start: usize, text: Option<String>) {
        let child = self.ast.take();
        self.ast = Some(Rc::new(PTreeNode {
            prev,
            kind,
            start,
            end: self.pos,
            child,
            text,
        }));
    }
}
