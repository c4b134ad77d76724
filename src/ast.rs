//! # Rules and facts as data
//!
//! This module contains the structured representation of everything the engine works with: atoms,
//! variables, tuples, rule conditions and rules. Rules are built as plain Rust values, either
//! directly through the types in this module or through the name-based builder in
//! [`Domain::rule`](crate::Domain::rule).

use crate::expr::Expr;

/// A symbol, e.g. `mother` or `jane` in `(mother jane paul)`.
///
/// Internally, symbols are represented by numeric IDs handed out by a
/// [`SymbolStore`](crate::SymbolStore), which also remembers their names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Sym(usize);

impl Sym {
    #[inline(always)]
    pub fn ord(self) -> usize {
        self.0
    }

    #[inline(always)]
    pub const fn from_ord(ord: usize) -> Sym {
        Sym(ord)
    }
}

/// Symbols that every [`SymbolStore`](crate::SymbolStore) reserves at fixed ordinals, so that the
/// built-in pattern forms can be recognized without a store at hand.
pub mod builtin_syms {
    use super::Sym;

    /// Negation-as-failure: `(not <pattern>...)`
    pub const NOT: Sym = Sym::from_ord(0);
    /// Guard: `(if <expr>)`
    pub const IF: Sym = Sym::from_ord(1);

    /// Names of the reserved symbols, indexed by ordinal.
    pub const NAMES: [&str; 2] = ["not", "if"];
}

/// A variable in a rule, represented by a numeric ID that is local to the rule it appears in.
///
/// Variables of different rules never interact: every rule application starts out with an empty
/// [`Binding`](crate::Binding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(usize);

impl Var {
    #[inline(always)]
    pub fn ord(self) -> usize {
        self.0
    }

    #[inline(always)]
    pub fn from_ord(ord: usize) -> Var {
        Var(ord)
    }
}

impl std::fmt::Display for Var {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}", self.0)
    }
}

/// An immutable constant. Numbers are atoms too, they just carry their value so that guard
/// expressions can compute with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Atom {
    Sym(Sym),
    Int(i64),
}

impl Atom {
    pub fn as_int(self) -> Option<i64> {
        match self {
            Atom::Int(i) => Some(i),
            Atom::Sym(_) => None,
        }
    }

    pub fn as_sym(self) -> Option<Sym> {
        match self {
            Atom::Sym(s) => Some(s),
            Atom::Int(_) => None,
        }
    }
}

impl From<Sym> for Atom {
    fn from(s: Sym) -> Self {
        Atom::Sym(s)
    }
}

impl From<i64> for Atom {
    fn from(i: i64) -> Self {
        Atom::Int(i)
    }
}

/// One position of a pattern tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Term {
    /// It can be a variable.
    Var(Var),
    /// Or a constant.
    Atom(Atom),
}

impl Term {
    pub fn as_var(self) -> Option<Var> {
        match self {
            Term::Var(v) => Some(v),
            Term::Atom(_) => None,
        }
    }

    pub fn as_atom(self) -> Option<Atom> {
        match self {
            Term::Atom(a) => Some(a),
            Term::Var(_) => None,
        }
    }
}

impl From<Var> for Term {
    fn from(v: Var) -> Self {
        Term::Var(v)
    }
}

impl From<Sym> for Term {
    fn from(s: Sym) -> Self {
        Term::Atom(s.into())
    }
}

impl From<Atom> for Term {
    fn from(a: Atom) -> Self {
        Term::Atom(a)
    }
}

impl From<i64> for Term {
    fn from(i: i64) -> Self {
        Term::Atom(Atom::Int(i))
    }
}

/// An ordered, fixed-arity sequence of terms, e.g. `(father ?x ?y)`.
pub type Tuple = Vec<Term>;

/// A fully grounded tuple, e.g. `(father dan paul)`.
pub type Fact = Vec<Atom>;

/// A rule condition.
///
/// Plain tuples are matched against the fact base, special forms are handed to the
/// [`Form`](crate::resolve::Form) registered for their head symbol. Which of the two happens is
/// decided by the [`FormRegistry`](crate::resolve::FormRegistry) based on [`Pattern::head`], not by
/// the variant, so a plain tuple whose first element is a registered symbol is routed to that form
/// as well.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Tuple(Tuple),
    Form(Form),
}

impl Pattern {
    pub fn tuple(terms: Tuple) -> Pattern {
        Pattern::Tuple(terms)
    }

    /// `(not <body>...)`: holds iff the body has no solution.
    pub fn negation(body: Vec<Pattern>) -> Pattern {
        Pattern::Form(Form::new(
            builtin_syms::NOT,
            body.into_iter().map(FormArg::Pattern).collect(),
        ))
    }

    /// `(if <expr>)`: holds iff the expression evaluates to true.
    pub fn guard(expr: Expr) -> Pattern {
        Pattern::Form(Form::new(builtin_syms::IF, vec![FormArg::Expr(expr)]))
    }

    /// The symbol used for choosing how this pattern is resolved, if there is one.
    pub fn head(&self) -> Option<Sym> {
        match self {
            Pattern::Tuple(terms) => match terms.first() {
                Some(Term::Atom(Atom::Sym(sym))) => Some(*sym),
                _ => None,
            },
            Pattern::Form(form) => Some(form.head),
        }
    }
}

/// A special pattern form `(head args...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub head: Sym,
    pub args: Vec<FormArg>,
}

impl Form {
    pub fn new(head: Sym, args: Vec<FormArg>) -> Self {
        Self { head, args }
    }
}

/// An argument of a special form. What is accepted where is up to the form itself.
#[derive(Debug, Clone, PartialEq)]
pub enum FormArg {
    Term(Term),
    Pattern(Pattern),
    Expr(Expr),
}

/// An inference rule: when all `conditions` hold under some binding, the `conclusions` grounded
/// with that binding are added to the fact base.
///
/// # Examples
///
/// ```
/// use chainer::ast::*;
/// // (father ?x ?y), (parent ?y ?z) => (grandfather ?x ?z)
///
/// let father = Sym::from_ord(10); // Note: Normally, you'd get these `Sym`s from a `SymbolStore`.
/// let parent = Sym::from_ord(11);
/// let grandfather = Sym::from_ord(12);
/// let rule = forall(|[x, y, z]|
///     Rule::new()
///         .when(vec![father.into(), x.into(), y.into()])
///         .when(vec![parent.into(), y.into(), z.into()])
///         .then(vec![grandfather.into(), x.into(), z.into()])
/// );
/// assert_eq!(rule.conditions.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rule {
    /// The rule body, solved left to right.
    pub conditions: Vec<Pattern>,
    /// The rule head, grounded and added as new facts.
    pub conclusions: Vec<Tuple>,
    /// Variable names, if the rule was built from names.
    pub scope: Option<VarScope>,
}

impl Rule {
    /// A rule without conditions or conclusions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plain tuple condition.
    pub fn when(self, terms: Tuple) -> Self {
        self.condition(Pattern::Tuple(terms))
    }

    /// Add a negated conjunction as condition.
    pub fn unless(self, body: Vec<Pattern>) -> Self {
        self.condition(Pattern::negation(body))
    }

    /// Add a guard condition.
    pub fn guard(self, expr: Expr) -> Self {
        self.condition(Pattern::guard(expr))
    }

    /// Add an arbitrary condition.
    pub fn condition(mut self, pattern: Pattern) -> Self {
        self.conditions.push(pattern);
        self
    }

    /// Add a conclusion.
    pub fn then(mut self, terms: Tuple) -> Self {
        self.conclusions.push(terms);
        self
    }

    pub fn with_scope(mut self, scope: VarScope) -> Self {
        self.scope = Some(scope);
        self
    }
}

/// Names of the variables of a single rule.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VarScope {
    names: Vec<String>,
}

impl VarScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the variable with the given name, allocating a new one if it was not seen before.
    pub fn get_or_insert(&mut self, name: &str) -> Var {
        match self.get(name) {
            Some(var) => var,
            None => {
                self.names.push(name.to_owned());
                Var::from_ord(self.names.len() - 1)
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Var> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(Var::from_ord)
    }

    pub fn get_name(&self, var: Var) -> Option<&str> {
        self.names.get(var.ord()).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Helper function for populating an array with incrementing variable IDs.
fn quantify<R, const N: usize>(f: impl FnOnce([Var; N]) -> R) -> R {
    let mut vars = [Var::from_ord(0); N];
    vars.iter_mut()
        .enumerate()
        .for_each(|(i, var)| *var = Var::from_ord(i));
    f(vars)
}

/// A universal quantification that can be used for more naturally describing the creation of rules.
/// See the example for the `Rule` type.
pub fn forall<const N: usize>(f: impl FnOnce([Var; N]) -> Rule) -> Rule {
    quantify(f)
}
