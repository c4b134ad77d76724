//! # Fact base
//!
//! The set of known facts. It only ever grows: deriving facts produces a new, larger fact base and
//! leaves the old one alone.

use indexmap::IndexSet;

use crate::ast::{Atom, Fact, Term};
use crate::binding::Binding;
use crate::matching::match_tuple;

/// A set of ground facts.
///
/// Iteration follows insertion order, which makes runs with a deterministic selection strategy
/// reproducible. Equality is set equality and ignores that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactBase {
    facts: IndexSet<Fact>,
}

impl FactBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn contains(&self, fact: &[Atom]) -> bool {
        self.facts.contains(fact)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fact> + '_ {
        self.facts.iter()
    }

    /// The union of this fact base with `new_facts`. Facts that are already known collapse.
    pub fn union(&self, new_facts: impl IntoIterator<Item = Fact>) -> FactBase {
        let mut facts = self.facts.clone();
        facts.extend(new_facts);
        FactBase { facts }
    }

    /// Whether all given facts are already known.
    pub fn contains_all<'a>(&self, facts: impl IntoIterator<Item = &'a Fact>) -> bool {
        facts.into_iter().all(|fact| self.contains(fact))
    }

    pub fn is_subset(&self, other: &FactBase) -> bool {
        self.facts.is_subset(&other.facts)
    }

    /// All bindings under which `pattern` matches a fact, in fact order.
    pub fn query(&self, pattern: &[Term], binding: &Binding) -> Vec<Binding> {
        self.facts
            .iter()
            .filter_map(|fact| match_tuple(pattern, fact, binding))
            .collect()
    }
}

impl FromIterator<Fact> for FactBase {
    fn from_iter<T: IntoIterator<Item = Fact>>(iter: T) -> Self {
        Self {
            facts: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FactBase {
    type Item = &'a Fact;
    type IntoIter = indexmap::set::Iter<'a, Fact>;

    fn into_iter(self) -> Self::IntoIter {
        self.facts.iter()
    }
}
