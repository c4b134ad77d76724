//! # Matching patterns against facts
//!
//! Facts are always ground, so matching is one-sided unification: only the variables of the
//! pattern can get bound.

use crate::ast::{Atom, Term};
use crate::binding::Binding;

/// Match a single pattern term against a fact atom.
///
/// A variable that is already bound is replaced by its value and compared, an unbound variable
/// gets bound to the fact atom, and an atom matches only itself.
pub fn match_item(pattern: &Term, fact: &Atom, binding: &Binding) -> Option<Binding> {
    let mut result = binding.clone();
    if unify_item(&mut result, pattern, fact) {
        Some(result)
    } else {
        None
    }
}

/// Match a pattern tuple against a fact tuple.
///
/// Tuples of different arity never match, this is a regular failure and not an error.
///
/// # Examples
///
/// ```
/// use chainer::ast::{Atom, Sym, Term, Var};
/// use chainer::{match_tuple, Binding};
///
/// let father = Atom::Sym(Sym::from_ord(10));
/// let a = Atom::Sym(Sym::from_ord(11));
/// let b = Atom::Sym(Sym::from_ord(12));
/// let x = Var::from_ord(0);
///
/// let pattern: Vec<Term> = vec![father.into(), x.into(), b.into()];
/// assert_eq!(
///     match_tuple(&pattern, &[father, a, b], &Binding::new()),
///     Some(Binding::new().extend(x, a))
/// );
/// assert_eq!(match_tuple(&pattern, &[father, a], &Binding::new()), None);
/// ```
pub fn match_tuple(pattern: &[Term], fact: &[Atom], binding: &Binding) -> Option<Binding> {
    if pattern.len() != fact.len() {
        return None;
    }
    let mut result = binding.clone();
    pattern
        .iter()
        .zip(fact)
        .all(|(p, f)| unify_item(&mut result, p, f))
        .then_some(result)
}

/// Match in place. On failure, the binding may have been partially extended and must be discarded.
fn unify_item(binding: &mut Binding, pattern: &Term, fact: &Atom) -> bool {
    match pattern {
        Term::Var(var) => match binding.get(*var) {
            // re-matching a variable only verifies its value
            Some(value) => value == *fact,
            None => {
                binding.set(*var, *fact);
                true
            }
        },
        Term::Atom(atom) => atom == fact,
    }
}
