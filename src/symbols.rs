//! # Symbols
//!
//! The [SymbolStore] assigns IDs to symbol names, and the name-based helpers in this module turn
//! plain names into [`Atom`]s and [`Term`]s.

use std::collections::HashMap;

use crate::ast::{builtin_syms, Atom, Fact, Sym, Term, Tuple, VarScope};
use crate::error::BuildError;

/// The sigil that marks a name as a variable, e.g. `?x`.
pub const VAR_SIGIL: char = '?';

/// Whether the name denotes a variable rather than a constant.
pub fn is_variable(name: &str) -> bool {
    name.starts_with(VAR_SIGIL)
}

/// Bidirectional mapping between symbol names and [`Sym`] IDs.
///
/// The names of the built-in forms (see [`builtin_syms`]) are always present.
#[derive(Debug, Clone)]
pub struct SymbolStore {
    names: Vec<String>,
    syms: HashMap<String, Sym>,
}

impl SymbolStore {
    pub fn new() -> Self {
        let mut store = Self {
            names: Vec::new(),
            syms: HashMap::new(),
        };
        for name in builtin_syms::NAMES {
            store.get_or_insert_named(name);
        }
        store
    }

    /// Return the symbol with the given name, allocating a fresh one if the name is new.
    pub fn get_or_insert_named(&mut self, name: &str) -> Sym {
        if let Some(sym) = self.syms.get(name) {
            *sym
        } else {
            let sym = Sym::from_ord(self.names.len());
            self.names.push(name.to_owned());
            self.syms.insert(name.to_owned(), sym);
            sym
        }
    }

    pub fn get_symbol(&self, name: &str) -> Option<Sym> {
        self.syms.get(name).copied()
    }

    pub fn get_symbol_name(&self, sym: Sym) -> Option<&str> {
        self.names.get(sym.ord()).map(|s| s.as_str())
    }

    /// Returns the number of symbols that have been allocated, built-ins included.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Turn a constant name into an atom.
    ///
    /// Names that are the canonical spelling of an integer (`7`, `-3`, but not `+3`, `007` or
    /// `-0`) become [`Atom::Int`], so printing the atom gives back the name. Everything else is a
    /// symbol.
    pub fn atom(&mut self, name: &str) -> Atom {
        match name.parse::<i64>() {
            Ok(i) if i.to_string() == name => Atom::Int(i),
            _ => Atom::Sym(self.get_or_insert_named(name)),
        }
    }

    /// Turn a name into a term, resolving variables in `scope`.
    pub fn term(&mut self, scope: &mut VarScope, name: &str) -> Term {
        if is_variable(name) {
            Term::Var(scope.get_or_insert(name))
        } else {
            Term::Atom(self.atom(name))
        }
    }

    pub fn tuple(&mut self, scope: &mut VarScope, names: &[&str]) -> Tuple {
        names.iter().map(|name| self.term(scope, name)).collect()
    }

    /// Build a fact from names. Facts are ground, so variable names are rejected.
    pub fn fact(&mut self, names: &[&str]) -> Result<Fact, BuildError> {
        names
            .iter()
            .map(|name| {
                if is_variable(name) {
                    Err(BuildError::VariableInFact {
                        name: (*name).to_owned(),
                    })
                } else {
                    Ok(self.atom(name))
                }
            })
            .collect()
    }
}

impl Default for SymbolStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Var;

    #[test]
    fn builtins_are_reserved() {
        let mut s = SymbolStore::new();
        assert_eq!(s.get_symbol("not"), Some(builtin_syms::NOT));
        assert_eq!(s.get_symbol("if"), Some(builtin_syms::IF));
        assert_eq!(s.get_or_insert_named("if"), builtin_syms::IF);
        let foo = s.get_or_insert_named("foo");
        assert_eq!(foo.ord(), builtin_syms::NAMES.len());
        assert_eq!(s.get_symbol_name(foo), Some("foo"));
    }

    #[test]
    fn classify_names() {
        assert!(is_variable("?x"));
        assert!(!is_variable("x"));
        assert!(!is_variable("x?"));

        let mut s = SymbolStore::new();
        let mut scope = VarScope::new();
        let t = s.tuple(&mut scope, &["father", "?x", "?y", "?x", "-3"]);
        let father = s.get_symbol("father").unwrap();
        assert_eq!(
            t,
            vec![
                father.into(),
                Var::from_ord(0).into(),
                Var::from_ord(1).into(),
                Var::from_ord(0).into(),
                Term::Atom(Atom::Int(-3)),
            ]
        );
        assert_eq!(scope.get_name(Var::from_ord(1)), Some("?y"));
    }

    #[test]
    fn only_canonical_integers_are_numbers() {
        let mut s = SymbolStore::new();
        assert_eq!(s.atom("42"), Atom::Int(42));
        assert_eq!(s.atom("-3"), Atom::Int(-3));
        for name in ["+3", "007", "-0", "99999999999999999999"] {
            let atom = s.atom(name);
            assert_eq!(
                atom.as_sym().and_then(|sym| s.get_symbol_name(sym)),
                Some(name)
            );
        }
    }

    #[test]
    fn facts_must_be_ground() {
        let mut s = SymbolStore::new();
        assert_eq!(
            s.fact(&["number", "7"]).unwrap(),
            vec![s.atom("number"), Atom::Int(7)]
        );
        assert!(matches!(
            s.fact(&["number", "?n"]),
            Err(BuildError::VariableInFact { name }) if name == "?n"
        ));
    }
}
