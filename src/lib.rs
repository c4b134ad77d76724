//! # Forward chaining in Rust
//!
//! Chainer is a small forward chaining rule engine. Given a set of facts and a set of rules, it
//! repeatedly picks one rule whose conditions hold, adds the facts the rule concludes, and stops
//! once no rule is applicable anymore or a step budget runs out.
//!
//! Facts are flat tuples of atoms, e.g. `(mother jane paul)`. Rules consist of conditions, which
//! are patterns that may contain variables such as `?x`, and conclusions, which are tuples that
//! are grounded with the variable values found while solving the conditions. Besides plain tuples,
//! conditions can be negations `(not ...)` and guards `(if (> ?y ?x))`, and further kinds of
//! conditions can be plugged in through the [resolve::FormRegistry].
//!
//! All inputs of a run are collected in a [Domain].
//!
//! # Example
//!
//! A small family tree, and rules for deriving who is whose parent and grandfather:
//!
//! ```text
//! (mother jane paul)  (father dan paul)  (father michel jane)
//!
//! (mother ?x ?y) => (parent ?x ?y)
//! (father ?x ?y) => (parent ?x ?y)
//! (father ?x ?y) (parent ?y ?z) => (grandfather ?x ?z)
//! ```
//!
//! ```
//! use chainer::Domain;
//!
//! let mut domain = Domain::new();
//! domain
//!     .add_fact(&["mother", "jane", "paul"]).unwrap()
//!     .add_fact(&["father", "dan", "paul"]).unwrap()
//!     .add_fact(&["father", "michel", "jane"]).unwrap();
//! domain
//!     .rule(|r| {
//!         r.when(&["mother", "?x", "?y"]).then(&["parent", "?x", "?y"]);
//!     })
//!     .rule(|r| {
//!         r.when(&["father", "?x", "?y"]).then(&["parent", "?x", "?y"]);
//!     })
//!     .rule(|r| {
//!         r.when(&["father", "?x", "?y"])
//!             .when(&["parent", "?y", "?z"])
//!             .then(&["grandfather", "?x", "?z"]);
//!     });
//!
//! // Pick rules at random, for at most 100 steps.
//! let facts = chainer::simulate(100, &domain).unwrap();
//! let grandfather = domain.symbols_mut().fact(&["grandfather", "michel", "paul"]).unwrap();
//! assert!(facts.contains(&grandfather));
//! ```
//!
//! Note that a rule stays applicable after it fired, even if it has nothing new to add, so the
//! run above only ends when its budget is used up. Runs that should stop as soon as nothing new
//! can be derived enable [`productive_only`](engine::Simulation::productive_only):
//!
//! ```
//! # use chainer::engine::{FirstChoice, Simulation};
//! # use chainer::Domain;
//! # let mut domain = Domain::new();
//! # domain
//! #     .add_fact(&["mother", "jane", "paul"]).unwrap()
//! #     .add_fact(&["father", "dan", "paul"]).unwrap()
//! #     .add_fact(&["father", "michel", "jane"]).unwrap();
//! # domain
//! #     .rule(|r| {
//! #         r.when(&["mother", "?x", "?y"]).then(&["parent", "?x", "?y"]);
//! #     })
//! #     .rule(|r| {
//! #         r.when(&["father", "?x", "?y"]).then(&["parent", "?x", "?y"]);
//! #     })
//! #     .rule(|r| {
//! #         r.when(&["father", "?x", "?y"])
//! #             .when(&["parent", "?y", "?z"])
//! #             .then(&["grandfather", "?x", "?z"]);
//! #     });
//! let outcome = Simulation::new(&domain)
//!     .strategy(FirstChoice)
//!     .productive_only(true)
//!     .run()
//!     .unwrap();
//! assert!(outcome.fixpoint);
//! assert_eq!(outcome.facts.len(), 7);
//!
//! let pretty = chainer::pretty::Prettifier::new(domain.symbols());
//! assert!(pretty.facts_to_string(&outcome.facts).contains("(grandfather michel paul)"));
//! ```
//!
//! Conditions are solved from left to right, and a negation or guard only sees the variables
//! bound by the conditions before it. The [analysis] module can check rules for this.

pub mod analysis;
pub mod ast;
pub mod binding;
pub mod domain;
pub mod engine;
pub mod error;
pub mod expr;
pub mod facts;
pub mod ground;
pub mod matching;
pub mod pretty;
pub mod resolve;
pub mod solve;
pub mod symbols;

pub use binding::Binding;
pub use domain::{Domain, RuleBuilder};
pub use engine::{apply_rule, simulate, states, Simulation, Strategy};
pub use error::{ResolveError, UnboundVariable};
pub use facts::FactBase;
pub use ground::{ground_term, ground_tuple};
pub use matching::{match_item, match_tuple};
pub use solve::{solve, unifications, Solver};
pub use symbols::{is_variable, SymbolStore};
