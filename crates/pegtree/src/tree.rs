//! Parse trees.
//!
//! Two representations exist for the same data:
//!
//! - [`PTree`] is the reversible, linked-list intermediate tree built while
//!   a recognizer runs. Every node append is `O(1)` and nothing is ever
//!   mutated in place, so backtracking out of a failed alternative is just
//!   dropping a reference to the old `ast` pointer.
//! - [`ParseTree`] is the persistent, final tree handed back to callers:
//!   ordered children plus a label-to-child edge map.
//!
//! The source interpreter this engine is descended from marked an edge vs.
//! a plain node by the sign bit of the stored end-position; that is an
//! artifact of its host language's integer representation, not a contract
//! worth inheriting, so `PTree` carries an explicit discriminant instead.

use indexmap::IndexMap;
use pegtree_core::Symbol;
use std::rc::Rc;

/// What a single [`PTree`] link represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PTreeKind {
    /// A tagged subtree produced by `Expr::Node`/`Expr::Fold`.
    Node(Symbol),
    /// A labeled (or, when `None`, positional) child produced by
    /// `Expr::Edge`.
    Edge(Option<Symbol>),
}

/// One link in the reversible parse-tree chain.
///
/// `prev` is the sibling chain this link was appended onto; `child` is the
/// chain accumulated *inside* this link's span (only non-`None` for
/// `Node`-kind links). The chain is built tail-first and reversed into
/// source order during [`materialize`].
#[derive(Debug)]
pub struct PTreeNode {
    pub prev: Option<Rc<PTreeNode>>,
    pub kind: PTreeKind,
    pub start: usize,
    pub end: usize,
    pub child: Option<Rc<PTreeNode>>,
    pub text: Option<String>,
}

pub type PTree = Option<Rc<PTreeNode>>;

/// A materialized, persistent parse tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseTree {
    tag: Option<Symbol>,
    start: usize,
    end: usize,
    text: Option<String>,
    children: Vec<ParseTree>,
    edges: IndexMap<Symbol, ParseTree>,
}

impl ParseTree {
    pub fn leaf(start: usize, end: usize, text: String) -> Self {
        Self {
            tag: None,
            start,
            end,
            text: Some(text),
            children: Vec::new(),
            edges: IndexMap::new(),
        }
    }

    pub fn tag(&self) -> Option<Symbol> {
        self.tag
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[ParseTree] {
        &self.children
    }

    pub fn edge(&self, label: Symbol) -> Option<&ParseTree> {
        self.edges.get(&label)
    }

    pub fn edges(&self) -> impl Iterator<Item = (Symbol, &ParseTree)> {
        self.edges.iter().map(|(&k, v)| (k, v))
    }
}

/// Walk a `PTree` chain (tail-to-head) into source order, producing the
/// positional children and labeled edges of the enclosing node.
fn collect_siblings(mut link: Option<Rc<PTreeNode>>, input: &str) -> (Vec<ParseTree>, IndexMap<Symbol, ParseTree>) {
    let mut children = Vec::new();
    let mut edges = IndexMap::new();
    // walk tail-first, collecting in reverse, then un-reverse at the end.
    let mut rev_children = Vec::new();
    let mut rev_edges = Vec::new();
    while let Some(node) = link {
        match node.kind {
            PTreeKind::Node(tag) => {
                let tree = materialize_node(&node, Some(tag), input);
                rev_children.push(tree);
            }
            PTreeKind::Edge(label) => {
                let tree = materialize_node(&node, None, input);
                match label {
                    // a labeled edge becomes a named field only.
                    Some(sym) => rev_edges.push((sym, tree)),
                    // an unlabeled edge (a positional item of a folded
                    // Seq/Ore/Alt, a Func argument) is a positional child.
                    None => rev_children.push(tree),
                }
            }
        }
        link = node.prev.clone();
    }
    rev_children.reverse();
    rev_edges.reverse();
    children.extend(rev_children);
    for (label, tree) in rev_edges {
        edges.insert(label, tree);
    }
    (children, edges)
}

fn materialize_node(node: &PTreeNode, tag: Option<Symbol>, input: &str) -> ParseTree {
    let (children, edges) = collect_siblings(node.child.clone(), input);
    let text = node.text.clone().or_else(|| {
        if children.is_empty() {
            input.get(node.start..node.end).map(str::to_owned)
        } else {
            None
        }
    });
    ParseTree {
        tag,
        start: node.start,
        end: node.end,
        text,
        children,
        edges,
    }
}

/// Turn the top of an accumulated `PTree` chain into the single
/// [`ParseTree`] a successful top-level parse produces.
pub fn materialize(ast: PTree, input: &str, start: usize, end: usize) -> ParseTree {
    match ast {
        None => ParseTree::leaf(start, end, input.get(start..end).unwrap_or_default().to_owned()),
        Some(_) => {
            let (mut children, edges) = collect_siblings(ast, input);
            if children.len() == 1 && edges.is_empty() {
                return children.pop().unwrap();
            }
            ParseTree {
                tag: None,
                start,
                end,
                text: None,
                children,
                edges,
            }
        }
    }
}
