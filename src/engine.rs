//! # Forward chaining
//!
//! The engine repeatedly picks one applicable rule instance and adds its conclusions to the fact
//! base. A rule instance ([`Candidate`]) is a rule together with one binding under which all its
//! conditions hold. Which instance fires is decided by a [`Strategy`]; when there are no
//! candidates at all, the fact base is at a fixpoint.
//!
//! There are three ways of running the engine, from most to least hands-on:
//! 1. [`Engine::step`] performs a single transition on a fact base you hold.
//! 2. [`States`] yields the sequence of fact bases lazily, starting with the initial one.
//! 3. [`Simulation`] (or the shorthand [`simulate`]) runs until a fixpoint or a step budget.


use std::iter::FusedIterator;

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::ast::Rule;
use crate::binding::Binding;
use crate::domain::Domain;
use crate::error::{ResolveError, Result};
use crate::facts::FactBase;
use crate::ground::ground_tuple;
use crate::resolve::FormRegistry;
use crate::solve::Solver;

/// Step budget of a [`Simulation`] unless configured otherwise.
pub const DEFAULT_MAX_STEPS: usize = 1000;

/// A rule together with a binding under which all of its conditions hold.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<'r> {
    /// Position of the rule in the rule list.
    pub rule_index: usize,
    pub rule: &'r Rule,
    pub binding: Binding,
}

/// Decides which of the applicable rule instances fires next.
///
/// Strategies are only consulted with a non-empty candidate list and must return an index into
/// it. An index out of range fails the step with [`ResolveError::InvalidChoice`]. Any
/// `FnMut(&[Candidate]) -> usize` closure is a strategy, too.
pub trait Strategy {
    fn choose(&mut self, candidates: &[Candidate]) -> usize;
}

impl<F> Strategy for F
where
    F: FnMut(&[Candidate]) -> usize,
{
    fn choose(&mut self, candidates: &[Candidate]) -> usize {
        self(candidates)
    }
}

/// Always picks the first candidate, i.e. the first binding of the first applicable rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstChoice;

impl Strategy for FirstChoice {
    fn choose(&mut self, _candidates: &[Candidate]) -> usize {
        0
    }
}

/// Picks a candidate uniformly at random.
#[derive(Debug, Clone)]
pub struct RandomChoice<R = ThreadRng> {
    rng: R,
}

impl RandomChoice {
    pub fn new() -> Self {
        Self::from_rng(rand::thread_rng())
    }
}

impl RandomChoice<StdRng> {
    /// A reproducible random strategy.
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomChoice<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl Default for RandomChoice {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Strategy for RandomChoice<R> {
    fn choose(&mut self, candidates: &[Candidate]) -> usize {
        self.rng.gen_range(0..candidates.len())
    }
}

/// The rules of a run and the forms used for resolving their conditions.
#[derive(Debug, Clone, Copy)]
pub struct Engine<'a> {
    rules: &'a [Rule],
    forms: &'a FormRegistry,
    productive_only: bool,
}

impl<'a> Engine<'a> {
    pub fn new(rules: &'a [Rule], forms: &'a FormRegistry) -> Self {
        Self {
            rules,
            forms,
            productive_only: false,
        }
    }

    pub fn for_domain(domain: &'a Domain) -> Self {
        Self::new(domain.rules(), domain.forms())
    }

    /// Only offer candidates that would add at least one new fact.
    ///
    /// Off by default: a rule instance whose conclusions are all known stays applicable, and the
    /// engine only reaches a fixpoint once no rule matches at all.
    pub fn productive_only(mut self, productive_only: bool) -> Self {
        self.productive_only = productive_only;
        self
    }

    pub fn rules(&self) -> &'a [Rule] {
        self.rules
    }

    /// All applicable rule instances, in rule order and, per rule, in solution order.
    pub fn candidates(&self, facts: &FactBase) -> Result<Vec<Candidate<'a>>> {
        collect_candidates(
            self.rules,
            Solver::new(self.forms),
            facts,
            self.productive_only,
        )
    }

    /// Let `strategy` pick one of the candidates. `None` means the fact base is at a fixpoint.
    pub fn select_rule<S>(&self, facts: &FactBase, strategy: &mut S) -> Result<Option<Candidate<'a>>>
    where
        S: Strategy + ?Sized,
    {
        choose(self.candidates(facts)?, strategy)
    }

    /// Fire one rule instance. `None` means the fact base is at a fixpoint.
    pub fn step<S>(&self, facts: &FactBase, strategy: &mut S) -> Result<Option<FactBase>>
    where
        S: Strategy + ?Sized,
    {
        match self.select_rule(facts, strategy)? {
            None => Ok(None),
            Some(candidate) => fire(&candidate, facts).map(Some),
        }
    }
}

fn collect_candidates<'r>(
    rules: &'r [Rule],
    solver: Solver,
    facts: &FactBase,
    productive_only: bool,
) -> Result<Vec<Candidate<'r>>> {
    let mut candidates = Vec::new();
    for (rule_index, rule) in rules.iter().enumerate() {
        for binding in solver.unifications(rule, facts)? {
            if productive_only && !is_productive(rule, &binding, facts)? {
                continue;
            }
            candidates.push(Candidate {
                rule_index,
                rule,
                binding,
            });
        }
    }
    trace!("{} candidates over {} facts", candidates.len(), facts.len());
    Ok(candidates)
}

fn is_productive(rule: &Rule, binding: &Binding, facts: &FactBase) -> Result<bool> {
    for conclusion in &rule.conclusions {
        if !facts.contains(&ground_tuple(conclusion, binding)?) {
            return Ok(true);
        }
    }
    Ok(false)
}

fn choose<'r, S>(
    mut candidates: Vec<Candidate<'r>>,
    strategy: &mut S,
) -> Result<Option<Candidate<'r>>>
where
    S: Strategy + ?Sized,
{
    if candidates.is_empty() {
        return Ok(None);
    }
    let index = strategy.choose(&candidates);
    trace!("strategy chose candidate {index} of {}", candidates.len());
    if index >= candidates.len() {
        return Err(ResolveError::InvalidChoice {
            index,
            candidates: candidates.len(),
        });
    }
    Ok(Some(candidates.swap_remove(index)))
}

fn fire(candidate: &Candidate, facts: &FactBase) -> Result<FactBase> {
    let next = apply_rule(candidate.rule, &candidate.binding, facts)?;
    debug!(
        "fired rule {} with {:?}, {} new facts",
        candidate.rule_index,
        candidate.binding,
        next.len() - facts.len()
    );
    Ok(next)
}

/// All applicable rule instances, resolved with the built-in forms.
pub fn candidates<'r>(rules: &'r [Rule], facts: &FactBase) -> Result<Vec<Candidate<'r>>> {
    collect_candidates(rules, Solver::new(&FormRegistry::new()), facts, false)
}

/// Let `strategy` pick an applicable rule instance, resolved with the built-in forms.
pub fn select_rule<'r, S>(
    rules: &'r [Rule],
    facts: &FactBase,
    strategy: &mut S,
) -> Result<Option<Candidate<'r>>>
where
    S: Strategy + ?Sized,
{
    choose(candidates(rules, facts)?, strategy)
}

/// Add the conclusions of `rule`, grounded under `binding`, to the facts.
///
/// Fails with [`UnboundVariable`](crate::error::UnboundVariable) if a conclusion mentions a
/// variable the binding does not cover.
pub fn apply_rule(rule: &Rule, binding: &Binding, facts: &FactBase) -> Result<FactBase> {
    let derived = rule
        .conclusions
        .iter()
        .map(|conclusion| ground_tuple(conclusion, binding))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(facts.union(derived))
}

/// Perform one transition with the built-in forms. `None` means the fact base is at a fixpoint.
pub fn step<S>(facts: &FactBase, rules: &[Rule], strategy: &mut S) -> Result<Option<FactBase>>
where
    S: Strategy + ?Sized,
{
    match select_rule(rules, facts, strategy)? {
        None => Ok(None),
        Some(candidate) => fire(&candidate, facts).map(Some),
    }
}

/// Status of a [`States`] sequence after performing a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A rule fired and [`States::current`] holds the new fact base.
    Derived,
    /// No rule was applicable. The fact base is final.
    Fixpoint,
    /// The sequence already ended, either at a fixpoint or with an error.
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Initial,
    Running,
    Finished,
}

/// The sequence of fact bases produced by repeatedly stepping the engine.
///
/// Like a solution iterator, there are two ways of using it:
/// 1. As an [`Iterator`], yielding the initial fact base first and then the fact base after every
///    step. It ends after the fixpoint. An error is yielded once, after which the iterator is
///    exhausted.
/// 2. Through [`States::step`], which reports what happened and leaves the state in
///    [`States::current`]. This is the way to go when the caller wants to stop early.
///
/// The sequence may be infinite, e.g. when a rule stays applicable after it fired.
#[derive(Debug, Clone)]
pub struct States<'a, S> {
    engine: Engine<'a>,
    strategy: S,
    facts: FactBase,
    steps: usize,
    phase: Phase,
}

impl<'a, S: Strategy> States<'a, S> {
    pub fn new(engine: Engine<'a>, facts: FactBase, strategy: S) -> Self {
        Self {
            engine,
            strategy,
            facts,
            steps: 0,
            phase: Phase::Initial,
        }
    }

    /// Perform a single transition.
    ///
    /// # Example
    ///
    /// ```
    /// use chainer::engine::{FirstChoice, States, Step, Engine};
    /// use chainer::Domain;
    ///
    /// let mut domain = Domain::new();
    /// domain.add_fact(&["number", "1"]).unwrap();
    /// domain.rule(|r| {
    ///     r.when(&["number", "?x"]).then(&["seen", "?x"]);
    /// });
    ///
    /// let engine = Engine::for_domain(&domain).productive_only(true);
    /// let mut states = States::new(engine, domain.initial_facts(), FirstChoice);
    /// let mut budget = 10;
    /// while budget > 0 {
    ///     budget -= 1;
    ///     match states.step().unwrap() {
    ///         Step::Derived => continue,
    ///         Step::Fixpoint | Step::Done => break,
    ///     }
    /// }
    /// assert_eq!(states.steps(), 1);
    /// assert_eq!(states.current().len(), 2);
    /// ```
    pub fn step(&mut self) -> Result<Step> {
        if self.phase == Phase::Finished {
            return Ok(Step::Done);
        }
        self.phase = Phase::Running;
        match self.engine.step(&self.facts, &mut self.strategy) {
            Ok(Some(next)) => {
                self.facts = next;
                self.steps += 1;
                Ok(Step::Derived)
            }
            Ok(None) => {
                self.phase = Phase::Finished;
                Ok(Step::Fixpoint)
            }
            Err(err) => {
                self.phase = Phase::Finished;
                Err(err)
            }
        }
    }

    /// The fact base after the last step.
    pub fn current(&self) -> &FactBase {
        &self.facts
    }

    /// Number of rules fired so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn into_facts(self) -> FactBase {
        self.facts
    }
}

impl<'a, S: Strategy> Iterator for States<'a, S> {
    type Item = Result<FactBase>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.phase == Phase::Initial {
            self.phase = Phase::Running;
            return Some(Ok(self.facts.clone()));
        }
        match self.step() {
            Ok(Step::Derived) => Some(Ok(self.facts.clone())),
            Ok(Step::Fixpoint | Step::Done) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

impl<'a, S: Strategy> FusedIterator for States<'a, S> {}

/// How a [`Simulation`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub facts: FactBase,
    /// Number of rules fired.
    pub steps: usize,
    /// Whether the run stopped because no rule was applicable anymore.
    pub fixpoint: bool,
}

/// A configured run over a [`Domain`].
///
/// ```
/// use chainer::engine::{FirstChoice, Simulation};
/// use chainer::Domain;
///
/// let mut domain = Domain::new();
/// domain.add_fact(&["number", "1"]).unwrap();
/// domain.rule(|r| {
///     r.when(&["number", "?x"]).then(&["seen", "?x"]);
/// });
///
/// let outcome = Simulation::new(&domain)
///     .max_steps(5)
///     .strategy(FirstChoice)
///     .run()
///     .unwrap();
/// // the rule stays applicable after it fired
/// assert!(!outcome.fixpoint);
/// assert_eq!(outcome.steps, 5);
/// assert_eq!(outcome.facts.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Simulation<'d, S = RandomChoice> {
    domain: &'d Domain,
    strategy: S,
    max_steps: usize,
    productive_only: bool,
}

impl<'d> Simulation<'d> {
    pub fn new(domain: &'d Domain) -> Self {
        Self {
            domain,
            strategy: RandomChoice::new(),
            max_steps: DEFAULT_MAX_STEPS,
            productive_only: false,
        }
    }
}

impl<'d, S: Strategy> Simulation<'d, S> {
    /// Stop after at most this many steps.
    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// See [`Engine::productive_only`].
    pub fn productive_only(mut self, productive_only: bool) -> Self {
        self.productive_only = productive_only;
        self
    }

    pub fn strategy<T: Strategy>(self, strategy: T) -> Simulation<'d, T> {
        Simulation {
            domain: self.domain,
            strategy,
            max_steps: self.max_steps,
            productive_only: self.productive_only,
        }
    }

    /// The unbounded state sequence of this simulation.
    pub fn states(self) -> States<'d, S> {
        let engine = Engine::for_domain(self.domain).productive_only(self.productive_only);
        States::new(engine, self.domain.initial_facts(), self.strategy)
    }

    pub fn run(self) -> Result<Outcome> {
        let max_steps = self.max_steps;
        let mut states = self.states();
        while states.steps() < max_steps {
            match states.step()? {
                Step::Derived => {}
                Step::Fixpoint | Step::Done => {
                    info!(
                        "fixpoint reached after {} steps with {} facts",
                        states.steps(),
                        states.current().len()
                    );
                    let steps = states.steps();
                    return Ok(Outcome {
                        facts: states.into_facts(),
                        steps,
                        fixpoint: true,
                    });
                }
            }
        }
        info!(
            "step budget of {max_steps} exhausted with {} facts",
            states.current().len()
        );
        let steps = states.steps();
        Ok(Outcome {
            facts: states.into_facts(),
            steps,
            fixpoint: false,
        })
    }
}

/// The state sequence of `domain` under the default random strategy.
pub fn states(domain: &Domain) -> States<'_, RandomChoice> {
    Simulation::new(domain).states()
}

/// Run `domain` until a fixpoint or until `max_steps` rules fired, and return the last fact base.
///
/// `simulate(0, domain)` is the initial fact base.
pub fn simulate(max_steps: usize, domain: &Domain) -> Result<FactBase> {
    Simulation::new(domain)
        .max_steps(max_steps)
        .run()
        .map(|outcome| outcome.facts)
}
