//! # Domains
//!
//! A [`Domain`] bundles everything a simulation needs: the symbol names, the rules, the initial
//! facts and the forms used for resolving rule conditions. Rules and facts can be given as
//! structured data, or built from names where `?`-prefixed names are variables.

use crate::analysis::{self, ValidationError};
use crate::ast::{Fact, Pattern, Rule, Term, Tuple, Var, VarScope};
use crate::error::BuildError;
use crate::expr::{BinOp, Expr};
use crate::facts::FactBase;
use crate::resolve::FormRegistry;
use crate::symbols::SymbolStore;

/// Rules and initial facts of a forward chaining problem.
///
/// # Example
///
/// ```
/// let mut domain = chainer::Domain::new();
/// domain
///     .add_fact(&["mother", "jane", "paul"]).unwrap()
///     .add_fact(&["father", "dan", "paul"]).unwrap();
/// domain.rule(|r| {
///     r.when(&["mother", "?x", "?y"]).then(&["parent", "?x", "?y"]);
/// });
///
/// assert_eq!(domain.rules().len(), 1);
/// assert_eq!(domain.initial_facts().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct Domain {
    symbols: SymbolStore,
    rules: Vec<Rule>,
    facts: Vec<Fact>,
    forms: FormRegistry,
}

impl Domain {
    /// An empty domain with the built-in forms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an initial fact given by names. Facts must not contain variables.
    pub fn add_fact(&mut self, names: &[&str]) -> Result<&mut Self, BuildError> {
        let fact = self.symbols.fact(names)?;
        self.facts.push(fact);
        Ok(self)
    }

    pub fn insert_fact(&mut self, fact: Fact) -> &mut Self {
        self.facts.push(fact);
        self
    }

    pub fn insert_rule(&mut self, rule: Rule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    /// Build a rule from names.
    ///
    /// All names passed to the builder share one variable scope, so `?x` refers to the same
    /// variable wherever it occurs in the rule.
    pub fn rule(&mut self, build: impl FnOnce(&mut RuleBuilder<'_>)) -> &mut Self {
        let mut scope = VarScope::new();
        let mut builder = RuleBuilder::new(&mut self.symbols, &mut scope);
        build(&mut builder);
        let RuleBuilder {
            conditions,
            conclusions,
            ..
        } = builder;
        self.rules.push(Rule {
            conditions,
            conclusions,
            scope: Some(scope),
        });
        self
    }

    pub fn symbols(&self) -> &SymbolStore {
        &self.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolStore {
        &mut self.symbols
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    pub fn forms(&self) -> &FormRegistry {
        &self.forms
    }

    /// Access to the form registry, for registering custom forms.
    pub fn forms_mut(&mut self) -> &mut FormRegistry {
        &mut self.forms
    }

    /// The fact base a simulation starts from. Duplicate initial facts collapse.
    pub fn initial_facts(&self) -> FactBase {
        self.facts.iter().cloned().collect()
    }

    /// Check that every rule only uses variables where earlier conditions have bound them.
    ///
    /// The engine does not require this; see [`analysis`] for what happens otherwise.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (rule_index, rule) in self.rules.iter().enumerate() {
            if let Some(issue) = analysis::check_rule(rule).into_iter().next() {
                return Err(ValidationError { rule_index, issue });
            }
        }
        Ok(())
    }
}

/// Name-based builder for the conditions and conclusions of one rule.
pub struct RuleBuilder<'s> {
    symbols: &'s mut SymbolStore,
    scope: &'s mut VarScope,
    conditions: Vec<Pattern>,
    conclusions: Vec<Tuple>,
}

impl<'s> RuleBuilder<'s> {
    fn new(symbols: &'s mut SymbolStore, scope: &'s mut VarScope) -> Self {
        Self {
            symbols,
            scope,
            conditions: Vec::new(),
            conclusions: Vec::new(),
        }
    }

    /// The term for a name: a variable of this rule, an integer or a symbol.
    pub fn term(&mut self, name: &str) -> Term {
        self.symbols.term(self.scope, name)
    }

    /// The variable for a name, with or without the `?` sigil.
    pub fn var(&mut self, name: &str) -> Var {
        if crate::is_variable(name) {
            self.scope.get_or_insert(name)
        } else {
            self.scope
                .get_or_insert(&format!("{}{name}", crate::symbols::VAR_SIGIL))
        }
    }

    fn tuple(&mut self, names: &[&str]) -> Tuple {
        self.symbols.tuple(self.scope, names)
    }

    /// Add a plain tuple condition.
    pub fn when(&mut self, names: &[&str]) -> &mut Self {
        let tuple = self.tuple(names);
        self.conditions.push(Pattern::Tuple(tuple));
        self
    }

    /// Add a negated conjunction, built by `body`.
    pub fn unless(&mut self, body: impl FnOnce(&mut RuleBuilder<'_>)) -> &mut Self {
        let mut nested = RuleBuilder::new(self.symbols, self.scope);
        body(&mut nested);
        let negated = nested.conditions;
        self.conditions.push(Pattern::negation(negated));
        self
    }

    pub fn guard(&mut self, expr: Expr) -> &mut Self {
        self.conditions.push(Pattern::guard(expr));
        self
    }

    /// Add a guard comparing two named terms, e.g. `compare(BinOp::Gt, "?y", "?x")`.
    pub fn compare(&mut self, op: BinOp, lhs: &str, rhs: &str) -> &mut Self {
        let lhs = self.term(lhs);
        let rhs = self.term(rhs);
        self.guard(Expr::binary(op, lhs, rhs))
    }

    /// Add a conclusion.
    pub fn then(&mut self, names: &[&str]) -> &mut Self {
        let tuple = self.tuple(names);
        self.conclusions.push(tuple);
        self
    }
}
