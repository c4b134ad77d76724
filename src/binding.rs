//! # Bindings
//!
//! A [Binding] records which atoms the variables of a rule have been matched against so far.

use crate::ast::{Atom, Var};

/// An immutable mapping from variables to atoms.
///
/// Like the variable table of a solver, it is indexed by the variable ordinals, so holes in the ID
/// range waste a little space. Extending a binding produces a new binding and leaves the original
/// untouched; a variable is never rebound to a different value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Binding {
    slots: Vec<Option<Atom>>,
}

impl Binding {
    /// The empty binding.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, var: Var) -> Option<Atom> {
        self.slots.get(var.ord()).copied().flatten()
    }

    pub fn is_bound(&self, var: Var) -> bool {
        self.get(var).is_some()
    }

    /// Return a copy of this binding that additionally maps `var` to `value`.
    pub fn extend(&self, var: Var, value: Atom) -> Binding {
        let mut next = self.clone();
        next.set(var, value);
        next
    }

    /// Assign an unbound variable. Only used while a new binding is being built.
    pub(crate) fn set(&mut self, var: Var, value: Atom) {
        debug_assert!(
            self.get(var).map_or(true, |old| old == value),
            "variables must not be rebound"
        );
        if var.ord() >= self.slots.len() {
            self.slots.resize(var.ord() + 1, None);
        }
        self.slots[var.ord()] = Some(value);
    }

    /// Number of bound variables.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over all bound variables in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (Var, Atom)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|value| (Var::from_ord(i), value)))
    }

    /// Whether every entry of `self` is also present, with the same value, in `other`.
    pub fn is_subset(&self, other: &Binding) -> bool {
        self.iter().all(|(var, value)| other.get(var) == Some(value))
    }
}

impl FromIterator<(Var, Atom)> for Binding {
    fn from_iter<T: IntoIterator<Item = (Var, Atom)>>(iter: T) -> Self {
        let mut binding = Binding::new();
        for (var, value) in iter {
            binding.set(var, value);
        }
        binding
    }
}
