//! # Resolving rule conditions
//!
//! Every rule condition is resolved by a [`Form`]: given the current binding, it produces the list
//! of bindings under which the condition holds. Which form is used is decided by the
//! [`FormRegistry`] based on the head symbol of the pattern, falling back to plain fact matching
//! for all heads that have no form registered.
//!
//! The registry comes with two built-in forms:
//! - [`Negation`] for `(not <pattern>...)`
//! - [`Guard`] for `(if <expr>)`
//!
//! Additional forms can be registered without touching the existing ones.
//!
//! # Example
//!
//! A custom form `(one-of ?x a b c)` that binds a variable to each of its alternatives:
//!
//! ```
//! use chainer::ast::{FormArg, Form, Pattern, Term};
//! use chainer::resolve::{self, FormRegistry, ResolveContext};
//! use chainer::{Binding, FactBase, ResolveError, Solver, SymbolStore};
//!
//! struct OneOf;
//!
//! impl resolve::Form for OneOf {
//!     fn resolve(
//!         &self,
//!         pattern: &Pattern,
//!         binding: &Binding,
//!         _context: &ResolveContext,
//!     ) -> Result<Vec<Binding>, ResolveError> {
//!         let Pattern::Form(form) = pattern else {
//!             return Err(resolve::malformed(pattern, "expected a special form"));
//!         };
//!         let mut terms = form.args.iter().filter_map(|arg| match arg {
//!             FormArg::Term(t) => Some(*t),
//!             _ => None,
//!         });
//!         let Some(target) = terms.next() else {
//!             return Ok(vec![]);
//!         };
//!         Ok(terms
//!             .filter_map(|t| t.as_atom())
//!             .filter_map(|a| chainer::match_item(&target, &a, binding))
//!             .collect())
//!     }
//! }
//!
//! let mut symbols = SymbolStore::new();
//! let one_of = symbols.get_or_insert_named("one-of");
//! let mut forms = FormRegistry::new();
//! forms.register(one_of, OneOf);
//!
//! let x = chainer::ast::Var::from_ord(0);
//! let pattern = Pattern::Form(Form::new(
//!     one_of,
//!     vec![
//!         FormArg::Term(x.into()),
//!         FormArg::Term(1i64.into()),
//!         FormArg::Term(2i64.into()),
//!     ],
//! ));
//! let solutions = Solver::new(&forms)
//!     .solve(&[pattern], &FactBase::new(), &Binding::new())
//!     .unwrap();
//! assert_eq!(solutions.len(), 2);
//! ```

mod facts;
mod guard;
mod negation;

use std::collections::HashMap;

pub use facts::FactMatch;
pub use guard::Guard;
pub use negation::Negation;

use crate::ast::{builtin_syms, Pattern, Sym};
use crate::binding::Binding;
use crate::error::ResolveError;
use crate::facts::FactBase;
use crate::solve::Solver;

/// A way of resolving a pattern form.
///
/// Forms are shared by every simulation over a [`Domain`](crate::Domain), which may run on any
/// thread.
pub trait Form: Send + Sync {
    /// Produce all bindings, extending `binding`, under which `pattern` holds.
    fn resolve(
        &self,
        pattern: &Pattern,
        binding: &Binding,
        context: &ResolveContext,
    ) -> Result<Vec<Binding>, ResolveError>;
}

/// What a [`Form`] may use while resolving: the fact base and the solver, for forms that nest
/// other patterns.
pub struct ResolveContext<'c> {
    solver: &'c Solver<'c>,
    facts: &'c FactBase,
}

impl<'c> ResolveContext<'c> {
    pub fn new(solver: &'c Solver<'c>, facts: &'c FactBase) -> Self {
        Self { solver, facts }
    }

    pub fn facts(&self) -> &FactBase {
        self.facts
    }

    pub fn solver(&self) -> &Solver<'c> {
        self.solver
    }

    /// Solve a nested conjunction against the same fact base.
    pub fn solve(
        &self,
        patterns: &[Pattern],
        binding: &Binding,
    ) -> Result<Vec<Binding>, ResolveError> {
        self.solver.solve(patterns, self.facts, binding)
    }
}

/// Mapping from head symbols to the [`Form`]s that resolve them.
pub struct FormRegistry {
    forms: HashMap<Sym, Box<dyn Form>>,
    fallback: Box<dyn Form>,
}

impl FormRegistry {
    /// A registry with the built-in `not` and `if` forms.
    pub fn new() -> Self {
        let mut registry = Self::plain();
        registry.register(builtin_syms::NOT, Negation);
        registry.register(builtin_syms::IF, Guard);
        registry
    }

    /// A registry that resolves every pattern by matching it against facts.
    pub fn plain() -> Self {
        Self {
            forms: HashMap::new(),
            fallback: Box::new(FactMatch),
        }
    }

    /// Register a form for a head symbol, returning the form previously registered for it.
    pub fn register(&mut self, head: Sym, form: impl Form + 'static) -> Option<Box<dyn Form>> {
        self.forms.insert(head, Box::new(form))
    }

    pub fn is_registered(&self, head: Sym) -> bool {
        self.forms.contains_key(&head)
    }

    /// The form responsible for `pattern`.
    pub fn lookup(&self, pattern: &Pattern) -> &dyn Form {
        let form = pattern
            .head()
            .and_then(|head| self.forms.get(&head))
            .unwrap_or(&self.fallback);
        &**form
    }
}

impl Default for FormRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FormRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut heads: Vec<_> = self.forms.keys().collect();
        heads.sort();
        f.debug_struct("FormRegistry")
            .field("heads", &heads)
            .finish_non_exhaustive()
    }
}

/// Build the error for a pattern that does not have the shape its form expects.
pub fn malformed(pattern: &Pattern, reason: &'static str) -> ResolveError {
    ResolveError::MalformedForm {
        head: pattern.head(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Atom, Fact, FormArg, Term, Var};
    use crate::expr::Expr;

    const NUMBER: Sym = Sym::from_ord(10);

    fn numbers(range: std::ops::Range<i64>) -> FactBase {
        range
            .map(|i| -> Fact { vec![NUMBER.into(), Atom::Int(i)] })
            .collect()
    }

    fn resolve(pattern: &Pattern, facts: &FactBase, binding: &Binding) -> Vec<Binding> {
        let forms = FormRegistry::new();
        let solver = Solver::new(&forms);
        let context = ResolveContext::new(&solver, facts);
        forms
            .lookup(pattern)
            .resolve(pattern, binding, &context)
            .unwrap()
    }

    #[test]
    fn default_form_matches_facts_in_order() {
        let x = Var::from_ord(0);
        let facts = numbers(0..3);
        let found = resolve(
            &Pattern::tuple(vec![NUMBER.into(), x.into()]),
            &facts,
            &Binding::new(),
        );
        assert_eq!(
            found,
            (0..3)
                .map(|i| Binding::new().extend(x, Atom::Int(i)))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn guard_filters() {
        let x = Var::from_ord(0);
        let facts = FactBase::new();
        let b = Binding::new().extend(x, Atom::Int(4));
        let guard = |e| Pattern::guard(e);

        assert_eq!(resolve(&guard(Expr::gt(x, 3i64)), &facts, &b), vec![b.clone()]);
        assert_eq!(
            resolve(&guard(Expr::gt(x, 5i64)), &facts, &b),
            Vec::<Binding>::new()
        );
    }

    #[test]
    fn negation_as_failure() {
        let x = Var::from_ord(0);
        let y = Var::from_ord(1);
        let facts = numbers(0..10);

        // (not (number ?y) (if (> ?y ?x)))
        let no_larger = Pattern::negation(vec![
            Pattern::tuple(vec![NUMBER.into(), y.into()]),
            Pattern::guard(Expr::gt(y, x)),
        ]);

        for i in 0..10 {
            let b = Binding::new().extend(x, Atom::Int(i));
            let found = resolve(&no_larger, &facts, &b);

            // negation consistency: succeeds exactly when the body has no solution
            let forms = FormRegistry::new();
            let Pattern::Form(form) = &no_larger else {
                unreachable!()
            };
            let body: Vec<Pattern> = form
                .args
                .iter()
                .map(|arg| match arg {
                    FormArg::Pattern(p) => p.clone(),
                    _ => unreachable!(),
                })
                .collect();
            let body_solutions = Solver::new(&forms).solve(&body, &facts, &b).unwrap();
            assert_eq!(found.is_empty(), !body_solutions.is_empty());

            if i == 9 {
                // the binding is passed through unchanged, ?y does not leak
                assert_eq!(found, vec![b.clone()]);
                assert!(!found[0].is_bound(y));
            } else {
                assert!(found.is_empty());
            }
        }
    }

    #[test]
    fn malformed_forms_are_errors() {
        let forms = FormRegistry::new();
        let solver = Solver::new(&forms);
        let facts = FactBase::new();
        let context = ResolveContext::new(&solver, &facts);
        let check = |pattern: Pattern| {
            forms
                .lookup(&pattern)
                .resolve(&pattern, &Binding::new(), &context)
        };

        // a plain tuple whose head is a builtin is routed to that builtin
        let not_tuple = Pattern::tuple(vec![builtin_syms::NOT.into(), Term::from(1i64)]);
        assert!(matches!(
            check(not_tuple),
            Err(ResolveError::MalformedForm {
                head: Some(builtin_syms::NOT),
                ..
            })
        ));

        let empty_guard = Pattern::Form(crate::ast::Form::new(builtin_syms::IF, vec![]));
        assert!(matches!(
            check(empty_guard),
            Err(ResolveError::MalformedForm { .. })
        ));

        let unknown = Pattern::Form(crate::ast::Form::new(NUMBER, vec![]));
        assert!(matches!(
            check(unknown),
            Err(ResolveError::MalformedForm {
                head: Some(NUMBER),
                ..
            })
        ));
    }

    #[test]
    fn registration_replaces_and_plain_ignores_builtins() {
        let mut forms = FormRegistry::new();
        assert!(forms.is_registered(builtin_syms::NOT));
        assert!(forms.register(builtin_syms::IF, FactMatch).is_some());

        let plain = FormRegistry::plain();
        assert!(!plain.is_registered(builtin_syms::NOT));
        assert!(format!("{:?}", forms).contains("FormRegistry"));
    }
}
