//! # Grounding
//!
//! Substituting a binding into terms and tuples. The result must not contain variables, so every
//! variable has to be bound.

use crate::ast::{Atom, Fact, Term};
use crate::binding::Binding;
use crate::error::UnboundVariable;

pub fn ground_term(term: &Term, binding: &Binding) -> Result<Atom, UnboundVariable> {
    match term {
        Term::Atom(atom) => Ok(*atom),
        Term::Var(var) => binding.get(*var).ok_or(UnboundVariable { var: *var }),
    }
}

/// Ground every element of the tuple. The first unbound variable aborts grounding.
pub fn ground_tuple(tuple: &[Term], binding: &Binding) -> Result<Fact, UnboundVariable> {
    tuple.iter().map(|term| ground_term(term, binding)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Sym, Var};

    #[test]
    fn ground_with_binding() {
        let x = Var::from_ord(0);
        let y = Var::from_ord(1);
        let max = Atom::Sym(Sym::from_ord(9));
        let b = Binding::new().extend(x, Atom::Int(9));

        assert_eq!(ground_term(&max.into(), &b), Ok(max));
        assert_eq!(
            ground_tuple(&[max.into(), x.into()], &b),
            Ok(vec![max, Atom::Int(9)])
        );
        assert_eq!(
            ground_tuple(&[max.into(), x.into(), y.into()], &b),
            Err(UnboundVariable { var: y })
        );
    }
}
