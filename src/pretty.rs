//! # Pretty printing
//!
//! Renders facts, patterns and rules as s-expressions, e.g. `(mother jane paul)` or
//! `(number ?x) (not (number ?y) (if (> ?y ?x))) => (max ?x)`.

use std::fmt::{self, Write};

use crate::ast::{Atom, Form, FormArg, Pattern, Rule, Sym, Term, VarScope};
use crate::expr::Expr;
use crate::facts::FactBase;
use crate::symbols::SymbolStore;

/// A pretty-printer resolving symbol names through a [SymbolStore].
///
/// Variables are printed with their name when the rule carries a [VarScope], and as `$n` otherwise.
pub struct Prettifier<'a> {
    symbols: &'a SymbolStore,
}

fn to_string(render: impl FnOnce(&mut String) -> fmt::Result) -> String {
    let mut out = String::new();
    // writing into a String never fails
    let _ = render(&mut out);
    out
}

impl<'a> Prettifier<'a> {
    pub fn new(symbols: &'a SymbolStore) -> Self {
        Self { symbols }
    }

    pub fn fact_to_string(&self, fact: &[Atom]) -> String {
        to_string(|out| self.pretty_fact(out, fact))
    }

    pub fn facts_to_string(&self, facts: &FactBase) -> String {
        to_string(|out| self.pretty_facts(out, facts))
    }

    pub fn pattern_to_string(&self, pattern: &Pattern, scope: Option<&VarScope>) -> String {
        to_string(|out| self.pretty_pattern(out, pattern, scope))
    }

    pub fn rule_to_string(&self, rule: &Rule) -> String {
        to_string(|out| self.pretty_rule(out, rule))
    }

    pub fn pretty_sym<W: Write>(&self, writer: &mut W, sym: Sym) -> fmt::Result {
        match self.symbols.get_symbol_name(sym) {
            Some(name) => write!(writer, "{}", name),
            None => write!(writer, "<unk:{}>", sym.ord()),
        }
    }

    pub fn pretty_atom<W: Write>(&self, writer: &mut W, atom: Atom) -> fmt::Result {
        match atom {
            Atom::Sym(sym) => self.pretty_sym(writer, sym),
            Atom::Int(i) => write!(writer, "{}", i),
        }
    }

    pub fn pretty_term<W: Write>(
        &self,
        writer: &mut W,
        term: &Term,
        scope: Option<&VarScope>,
    ) -> fmt::Result {
        match term {
            Term::Atom(atom) => self.pretty_atom(writer, *atom),
            Term::Var(var) => match scope.and_then(|scope| scope.get_name(*var)) {
                Some(name) => write!(writer, "{}", name),
                None => write!(writer, "{}", var),
            },
        }
    }

    pub fn pretty_fact<W: Write>(&self, writer: &mut W, fact: &[Atom]) -> fmt::Result {
        write!(writer, "(")?;
        if let Some((first, rest)) = fact.split_first() {
            self.pretty_atom(writer, *first)?;
            for atom in rest {
                write!(writer, " ")?;
                self.pretty_atom(writer, *atom)?;
            }
        }
        write!(writer, ")")
    }

    /// One fact per line, in fact base order.
    pub fn pretty_facts<W: Write>(&self, writer: &mut W, facts: &FactBase) -> fmt::Result {
        for fact in facts {
            self.pretty_fact(writer, fact)?;
            writeln!(writer)?;
        }
        Ok(())
    }

    pub fn pretty_tuple<W: Write>(
        &self,
        writer: &mut W,
        terms: &[Term],
        scope: Option<&VarScope>,
    ) -> fmt::Result {
        write!(writer, "(")?;
        if let Some((first, rest)) = terms.split_first() {
            self.pretty_term(writer, first, scope)?;
            for term in rest {
                write!(writer, " ")?;
                self.pretty_term(writer, term, scope)?;
            }
        }
        write!(writer, ")")
    }

    pub fn pretty_pattern<W: Write>(
        &self,
        writer: &mut W,
        pattern: &Pattern,
        scope: Option<&VarScope>,
    ) -> fmt::Result {
        match pattern {
            Pattern::Tuple(terms) => self.pretty_tuple(writer, terms, scope),
            Pattern::Form(form) => self.pretty_form(writer, form, scope),
        }
    }

    fn pretty_form<W: Write>(
        &self,
        writer: &mut W,
        form: &Form,
        scope: Option<&VarScope>,
    ) -> fmt::Result {
        write!(writer, "(")?;
        self.pretty_sym(writer, form.head)?;
        for arg in &form.args {
            write!(writer, " ")?;
            match arg {
                FormArg::Term(term) => self.pretty_term(writer, term, scope)?,
                FormArg::Pattern(pattern) => self.pretty_pattern(writer, pattern, scope)?,
                FormArg::Expr(expr) => self.pretty_expr(writer, expr, scope)?,
            }
        }
        write!(writer, ")")
    }

    pub fn pretty_expr<W: Write>(
        &self,
        writer: &mut W,
        expr: &Expr,
        scope: Option<&VarScope>,
    ) -> fmt::Result {
        match expr {
            Expr::Term(term) => self.pretty_term(writer, term, scope),
            Expr::Binary(op, lhs, rhs) => {
                write!(writer, "({} ", op.symbol())?;
                self.pretty_expr(writer, lhs, scope)?;
                write!(writer, " ")?;
                self.pretty_expr(writer, rhs, scope)?;
                write!(writer, ")")
            }
            Expr::Not(inner) => {
                write!(writer, "(not ")?;
                self.pretty_expr(writer, inner, scope)?;
                write!(writer, ")")
            }
        }
    }

    pub fn pretty_rule<W: Write>(&self, writer: &mut W, rule: &Rule) -> fmt::Result {
        let scope = rule.scope.as_ref();
        for pattern in &rule.conditions {
            self.pretty_pattern(writer, pattern, scope)?;
            write!(writer, " ")?;
        }
        write!(writer, "=>")?;
        for conclusion in &rule.conclusions {
            write!(writer, " ")?;
            self.pretty_tuple(writer, conclusion, scope)?;
        }
        Ok(())
    }
}
