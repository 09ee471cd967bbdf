//! The bootstrap grammar: a hand-assembled expression tree that recognizes
//! the textual surface syntax grammars are written in.
//!
//! This is not a separate hand-rolled recursive-descent parser — it is
//! built from the exact same [`Expr`] combinators every other grammar
//! compiles to, so it runs through the same [`crate::compile::generate`]
//! and produces an ordinary [`crate::tree::ParseTree`] that [`crate::loader`]
//! then lowers into a `Grammar`. The tags below (`Rule`, `Import`,
//! `Example`, `Char`, `Class`, `Node`, `Fold`, `Edge`, `EdgeFold`, `Func`,
//! `Ref`, `Many`, `Many1`, `Option`, `Not`, `And`, `Seq`, `Ore`, `Alt`) are
//! exactly the tags the loader's visitor switches on.

use pegtree_core::expr::RangeSet;
use pegtree_core::{Expr, Grammar};


const IDENT_START: &[(char, char)] = &[('a', 'z'), ('A', 'Z')];
const IDENT_REST: &[(char, char)] = &[('a', 'z'), ('A', 'Z'), ('0', '9')];

/// Build the grammar used to parse grammar source text itself.
pub fn bootstrap_grammar() -> Grammar {
    Builder::new().build()
}

struct Builder {
    g: Grammar,
}

impl Builder {
    fn new() -> Self {
        Self { g: Grammar::new() }
    }

    fn def(&mut self, name: &str, e: Expr) {
        let sym = self.g.intern(name);
        self.g.add(sym, e);
    }

    fn r(&mut self, name: &str) -> Expr {
        Expr::Ref(self.g.intern(name))
    }

    fn node(&mut self, e: Expr, tag: &str) -> Expr {
        let tag = self.g.intern(tag);
        Expr::Node(Box::new(e), tag)
    }

    fn edge(&mut self, label: &str, e: Expr) -> Expr {
        let label = self.g.intern(label);
        Expr::Edge(label, Box::new(e))
    }

    fn edge_pos(&mut self, e: Expr) -> Expr {
        let positional = self.g.positional();
        Expr::Edge(positional, Box::new(e))
    }

    /// Fold-wrap `e` under `tag`: peel the sibling already built by
    /// whatever came before this point, let `e` append more alongside it,
    /// then retag the whole thing. Used to retag an already-parsed
    /// subexpression (quantifiers, `n`-ary operators) without re-matching
    /// it.
    fn fold_wrap(&mut self, e: Expr, tag: &str) -> Expr {
        let tag = self.g.intern(tag);
        Expr::Fold(Box::new(e), tag)
    }

    fn build(mut self) -> Grammar {
        self.def_lexical();
        self.def_toplevel();
        self.def_expression();
        self.def_terms();
        self.g
    }

    fn def_lexical(&mut self) {
        self.def("EOL", ore(vec![ch("\r\n"), ch("\n"), ch("\r")]));

        let eol = self.r("EOL");
        self.def("S", ore(vec![ch(" "), ch("\t"), eol]));

        let eol = self.r("EOL");
        let not_eol_any = seq(vec![not(eol.clone()), any()]);
        let body = seq(vec![ch("//"), many(not_eol_any), opt(eol)]);
        self.def("COMMENT", body);

        self.def("EOF", not(any()));

        let s = self.r("S");
        let comment = self.r("COMMENT");
        self.def("__", many(ore(vec![s, comment])));
        self.def("_", many(ore(vec![ch(" "), ch("\t")])));

        let ws = ore(vec![ch(" "), ch("\t")]);
        let eol = self.r("EOL");
        let ws2 = ore(vec![ch(" "), ch("\t")]);
        let continuation = seq(vec![eol, and(ws2)]);
        self.def("SS", many1(ore(vec![ws, continuation])));
    }

    fn identifier_body(&mut self) -> Expr {
        let start = range(IDENT_START);
        let rest = range(IDENT_REST);
        seq(vec![start, many(rest)])
    }

    fn def_toplevel(&mut self) {
        let identifier = self.identifier_body();
        self.def("Identifier", identifier);

        let identifier = self.r("Identifier");
        self.def("NAME", identifier);

        let identifier = self.r("Identifier");
        let comma_us = {
            let us = self.r("_");
            seq(vec![ch(","), us])
        };
        let identifier2 = self.r("Identifier");
        let more = many(seq(vec![comma_us, identifier2]));
        self.def("Names", seq(vec![identifier, more]));

        let identifier = self.r("Identifier");
        let identifier2 = self.r("Identifier");
        let more = many(seq(vec![ch("."), identifier2]));
        self.def("QName", seq(vec![identifier, more]));

        self.def_doc();
        self.def_statement();
        self.def_source();
    }

    fn def_doc(&mut self) {
        for (name, d) in [("Doc1", "'''"), ("Doc2", "\"\"\""), ("Doc3", "```")] {
            let close = ch(d);
            let not_close_any = seq(vec![not(close), any()]);
            let body = seq(vec![ch(d), many(not_close_any), ch(d)]);
            self.def(name, body);
        }
        let doc1 = self.r("Doc1");
        let doc2 = self.r("Doc2");
        let doc3 = self.r("Doc3");
        self.def("Doc", ore(vec![doc1, doc2, doc3]));
    }

    fn def_statement(&mut self) {
        self.def_import();
        self.def_example();
        self.def_rule();

        let import = self.r("Import");
        let example = self.r("Example");
        let rule = self.r("Rule");
        self.def("Statement", ore(vec![import, example, rule]));

        let us = self.r("_");
        let eol = self.r("EOL");
        let us2 = self.r("_");
        self.def("EOS", seq(vec![us, ore(vec![ch(";"), eol]), us2]));
    }

    fn def_import(&mut self) {
        let us1 = self.r("_");
        let qname = self.r("QName");
        let urn_edge = self.edge("urn", qname);
        let us2 = self.r("_");
        let us3 = self.r("_");
        let names = self.r("Names");
        let names_edge = self.edge("names", names);
        let eos = self.r("EOS");
        let body = seq(vec![
            ch("from"),
            us1,
            urn_edge,
            us2,
            ch("import"),
            us3,
            names_edge,
            eos,
        ]);
        let tagged = self.node(body, "Import");
        self.def("Import", tagged);
    }

    fn def_example(&mut self) {
        let us1 = self.r("_");
        let names = self.r("Names");
        let names_edge = self.edge("names", names);
        let us2 = self.r("_");
        let doc = self.r("Doc");
        let doc_edge = self.edge("doc", doc);
        let body = seq(vec![ch("example"), us1, names_edge, us2, doc_edge]);
        let tagged = self.node(body, "Example");
        self.def("Example", tagged);
    }

    fn def_rule(&mut self) {
        let identifier = self.r("Identifier");
        let name_edge = self.edge("name", identifier);
        let us1 = self.r("_");
        let us2 = self.r("_");
        let expression = self.r("Expression");
        let e_edge = self.edge("e", expression);
        let eos = self.r("EOS");
        let body = seq(vec![
            name_edge,
            us1,
            ore(vec![ch("="), ch("<-")]),
            us2,
            e_edge,
            eos,
        ]);
        let tagged = self.node(body, "Rule");
        self.def("Rule", tagged);
    }

    fn def_source(&mut self) {
        let statement = self.r("Statement");
        let ww = self.r("__");
        let one = seq(vec![statement, ww]);
        let body = many(one);
        let tagged = self.node(body, "Source");
        self.def("Source", tagged);

        let ww = self.r("__");
        let source = self.r("Source");
        let eof = self.r("EOF");
        self.def("Start", seq(vec![ww, source, eof]));
    }

    fn def_expression(&mut self) {
        self.def_sequence();
        self.def_choice();
        self.def_expression_alt();
        self.def_predicate();
        self.def_suffix();
    }

    fn def_sequence(&mut self) {
        let predicate = self.r("Predicate");
        let ss = self.r("SS");
        let predicate2 = self.r("Predicate");
        let positional = self.edge_pos(predicate2);
        let one_more = seq(vec![ss, positional]);
        let rest = many1(one_more);
        let folded = self.fold_wrap(rest, "Seq");
        self.def("Sequence", seq(vec![predicate, opt(folded)]));
    }

    fn def_choice(&mut self) {
        let sequence = self.r("Sequence");
        let ww1 = self.r("__");
        let sequence2 = self.r("Sequence");
        let ww2 = self.r("__");
        let positional = self.edge_pos(sequence2);
        let one_more = seq(vec![ww1, ore(vec![ch("||"), ch("/")]), ww2, positional]);
        let rest = many1(one_more);
        let folded = self.fold_wrap(rest, "Ore");
        self.def("Choice", seq(vec![sequence, opt(folded)]));
    }

    fn def_expression_alt(&mut self) {
        let choice = self.r("Choice");
        let ww1 = self.r("__");
        let choice2 = self.r("Choice");
        let ww2 = self.r("__");
        let positional = self.edge_pos(choice2);
        let bar = not(ch("|"));
        let one_more = seq(vec![ww1, ch("|"), bar, ww2, positional]);
        let rest = many1(one_more);
        let folded = self.fold_wrap(rest, "Alt");
        self.def("Expression", seq(vec![choice, opt(folded)]));
    }

    fn def_predicate(&mut self) {
        let suffix = self.r("Suffix");
        let wrapped = self.node(suffix, "Not");
        self.def("Not", seq(vec![ch("!"), wrapped]));

        let suffix = self.r("Suffix");
        let wrapped = self.node(suffix, "And");
        self.def("And", seq(vec![ch("&"), wrapped]));

        let not_ = self.r("Not");
        let and_ = self.r("And");
        let suffix = self.r("Suffix");
        self.def("Predicate", ore(vec![not_, and_, suffix]));
    }

    fn def_suffix(&mut self) {
        let star_wrap = self.fold_wrap(Expr::Empty, "Many");
        let star = seq(vec![ch("*"), star_wrap]);

        let plus_wrap = self.fold_wrap(Expr::Empty, "Many1");
        let plus = seq(vec![ch("+"), plus_wrap]);

        let question_wrap = self.fold_wrap(Expr::Empty, "Option");
        let question = seq(vec![ch("?"), question_wrap]);

        let term = self.r("Term");
        self.def("Suffix", seq(vec![term, opt(ore(vec![star, plus, question]))]));
    }

    fn def_terms(&mut self) {
        self.def_group();
        self.def_empty();
        self.def_any();
        self.def_char();
        self.def_class();
        self.def_node_term();
        self.def_fold_term();
        self.def_tag();
        self.def_edge_term();
        self.def_edge_fold_term();
        self.def_func_term();
        self.def_ref_term();

        let group = self.r("Group");
        let empty = self.r("Empty");
        let any_ = self.r("AnyTerm");
        let char_ = self.r("CharLit");
        let class = self.r("Class");
        let node = self.r("NodeTerm");
        let fold = self.r("FoldTerm");
        let edgefold = self.r("EdgeFoldTerm");
        let edge = self.r("EdgeTerm");
        let func = self.r("FuncTerm");
        let ref_ = self.r("RefTerm");
        self.def(
            "Term",
            ore(vec![group, empty, any_, char_, class, node, fold, edgefold, edge, func, ref_]),
        );
    }

    fn def_group(&mut self) {
        let ww1 = self.r("__");
        let expression = self.r("Expression");
        let ww2 = self.r("__");
        self.def("Group", seq(vec![ch("("), ww1, expression, ww2, ch(")")]));
    }

    fn def_empty(&mut self) {
        let tagged = self.node(ch("()"), "Empty");
        self.def("Empty", tagged);
    }

    fn def_any(&mut self) {
        let tagged = self.node(ch("."), "Any");
        self.def("AnyTerm", tagged);
    }

    fn def_char(&mut self) {
        let single_body = seq(vec![not(ch("'")), any()]);
        let single = seq(vec![ch("'"), many(single_body), ch("'")]);
        let double_body = seq(vec![not(ch("\"")), any()]);
        let double = seq(vec![ch("\""), many(double_body), ch("\"")]);
        let tagged = self.node(ore(vec![single, double]), "Char");
        self.def("CharLit", tagged);
    }

    fn def_class(&mut self) {
        let body_inner = seq(vec![not(ch("]")), any()]);
        let body = seq(vec![ch("["), many(body_inner), ch("]")]);
        let tagged = self.node(body, "Class");
        self.def("Class", tagged);
    }

    fn def_tag(&mut self) {
        let start = range(IDENT_START);
        let rest = range(IDENT_REST);
        self.def("Tag", seq(vec![start, many(rest)]));
    }

    fn def_node_term(&mut self) {
        let ww1 = self.r("__");
        let tag = self.r("Tag");
        let tag_edge = self.edge("tag", tag);
        let tagged_opt = opt(seq(vec![ch("#"), tag_edge]));
        let ww2 = self.r("__");
        let expression = self.r("Expression");
        let e_edge = self.edge("e", expression);
        let ww3 = self.r("__");
        let body = seq(vec![ch("{"), ww1, tagged_opt, ww2, e_edge, ww3, ch("}")]);
        let tagged = self.node(body, "Node");
        self.def("NodeTerm", tagged);
    }

    fn def_fold_term(&mut self) {
        let ww1 = self.r("__");
        let tag = self.r("Tag");
        let tag_edge = self.edge("tag", tag);
        let tagged_opt = opt(seq(vec![ch("#"), tag_edge]));
        let ww2 = self.r("__");
        let expression = self.r("Expression");
        let e_edge = self.edge("e", expression);
        let ww3 = self.r("__");
        let body = seq(vec![ch("^{"), ww1, tagged_opt, ww2, e_edge, ww3, ch("}")]);
        let tagged = self.node(body, "Fold");
        self.def("FoldTerm", tagged);
    }

    fn def_edge_term(&mut self) {
        let identifier = self.r("Identifier");
        let name_edge = self.edge("name", identifier);
        let suffix = self.r("Suffix");
        let e_edge = self.edge("e", suffix);
        let body = seq(vec![name_edge, ch(":"), e_edge]);
        let tagged = self.node(body, "Edge");
        self.def("EdgeTerm", tagged);
    }

    fn def_edge_fold_term(&mut self) {
        let identifier = self.r("Identifier");
        let name_edge = self.edge("name", identifier);
        let fold = self.r("FoldTerm");
        let e_edge = self.edge("e", fold);
        let body = seq(vec![name_edge, ch(":"), e_edge]);
        let tagged = self.node(body, "EdgeFold");
        self.def("EdgeFoldTerm", tagged);
    }

    fn def_func_term(&mut self) {
        let identifier = self.r("Identifier");
        let name_edge = self.edge("name", identifier);

        let expression = self.r("Expression");
        let first_arg = self.edge_pos(expression);

        let ww1 = self.r("__");
        let expression2 = self.r("Expression");
        let ww2 = self.r("__");
        let more_arg = self.edge_pos(expression2);
        let one_more = seq(vec![ww1, ch(","), ww2, more_arg]);
        let rest = many(one_more);

        let args = opt(seq(vec![first_arg, rest]));
        let ww3 = self.r("__");
        let ww4 = self.r("__");
        let body = seq(vec![ch("@"), name_edge, ch("("), ww3, args, ww4, ch(")")]);
        let tagged = self.node(body, "Func");
        self.def("FuncTerm", tagged);
    }

    fn def_ref_term(&mut self) {
        let qname = self.r("QName");
        let name_edge = self.edge("name", qname);
        let tagged = self.node(name_edge, "Ref");
        self.def("RefTerm", tagged);
    }
}

fn ch(s: &str) -> Expr {
    Expr::Char(s.to_string())
}

fn any() -> Expr {
    Expr::Any
}

fn range(ranges: &[(char, char)]) -> Expr {
    Expr::Range(RangeSet::new(vec!['_'], ranges.to_vec()))
}

fn seq(es: Vec<Expr>) -> Expr {
    Expr::seq(es)
}

fn ore(es: Vec<Expr>) -> Expr {
    Expr::ore(es)
}

fn many(e: Expr) -> Expr {
    Expr::Many(Box::new(e))
}

fn many1(e: Expr) -> Expr {
    Expr::Many1(Box::new(e))
}

fn opt(e: Expr) -> Expr {
    Expr::Option(Box::new(e))
}

fn not(e: Expr) -> Expr {
    Expr::Not(Box::new(e))
}

fn and(e: Expr) -> Expr {
    Expr::And(Box::new(e))
}
