//! # Solving conjunctions of conditions
//!
//! The [Solver] enumerates all bindings that satisfy an ordered list of patterns. It performs a
//! left-to-right depth first search: the first pattern is resolved, and for each binding it
//! produces, the remaining patterns are solved in turn. Every combination of intermediate matches
//! is explored, and the solutions come out in the order in which the search finds them.

#[cfg(test)]
mod test;

use crate::ast::{Pattern, Rule};
use crate::binding::Binding;
use crate::error::ResolveError;
use crate::facts::FactBase;
use crate::resolve::{FormRegistry, ResolveContext};

/// Depth-first solver for conjunctions of patterns.
#[derive(Debug, Clone, Copy)]
pub struct Solver<'r> {
    forms: &'r FormRegistry,
}

impl<'r> Solver<'r> {
    pub fn new(forms: &'r FormRegistry) -> Self {
        Self { forms }
    }

    pub fn forms(&self) -> &'r FormRegistry {
        self.forms
    }

    /// All bindings extending `binding` under which every pattern holds.
    ///
    /// An empty list of patterns holds exactly once, under `binding` itself.
    pub fn solve(
        &self,
        patterns: &[Pattern],
        facts: &FactBase,
        binding: &Binding,
    ) -> Result<Vec<Binding>, ResolveError> {
        let context = ResolveContext::new(self, facts);
        let mut solutions = Vec::new();
        self.solve_into(patterns, &context, binding, &mut solutions)?;
        Ok(solutions)
    }

    /// All bindings under which the conditions of `rule` hold, starting from the empty binding.
    pub fn unifications(
        &self,
        rule: &Rule,
        facts: &FactBase,
    ) -> Result<Vec<Binding>, ResolveError> {
        self.solve(&rule.conditions, facts, &Binding::new())
    }

    fn solve_into(
        &self,
        patterns: &[Pattern],
        context: &ResolveContext,
        binding: &Binding,
        solutions: &mut Vec<Binding>,
    ) -> Result<(), ResolveError> {
        match patterns.split_first() {
            None => solutions.push(binding.clone()),
            Some((first, rest)) => {
                let candidates = self
                    .forms
                    .lookup(first)
                    .resolve(first, binding, context)?;
                for candidate in &candidates {
                    self.solve_into(rest, context, candidate, solutions)?;
                }
            }
        }
        Ok(())
    }
}

/// Solve `patterns` with the built-in forms only.
pub fn solve(
    patterns: &[Pattern],
    facts: &FactBase,
    binding: &Binding,
) -> Result<Vec<Binding>, ResolveError> {
    Solver::new(&FormRegistry::new()).solve(patterns, facts, binding)
}

/// Solve the conditions of `rule` with the built-in forms only.
pub fn unifications(rule: &Rule, facts: &FactBase) -> Result<Vec<Binding>, ResolveError> {
    Solver::new(&FormRegistry::new()).unifications(rule, facts)
}
