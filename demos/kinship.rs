use std::time::Instant;

use chainer::engine::{RandomChoice, Simulation};
use chainer::pretty::Prettifier;
use chainer::Domain;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0);

    let mut d = Domain::new();
    d.add_fact(&["mother", "jane", "paul"]).unwrap();
    d.add_fact(&["father", "dan", "paul"]).unwrap();
    d.add_fact(&["father", "michel", "jane"]).unwrap();
    d.rule(|r| {
        r.when(&["mother", "?x", "?y"]).then(&["parent", "?x", "?y"]);
    });
    d.rule(|r| {
        r.when(&["father", "?x", "?y"]).then(&["parent", "?x", "?y"]);
    });
    d.rule(|r| {
        r.when(&["father", "?x", "?y"])
            .when(&["parent", "?y", "?z"])
            .then(&["grandfather", "?x", "?z"]);
    });

    let pretty = Prettifier::new(d.symbols());
    println!("RULES:");
    for rule in d.rules() {
        println!("  {}", pretty.rule_to_string(rule));
    }

    let before = Instant::now();
    let outcome = Simulation::new(&d)
        .strategy(RandomChoice::seeded(seed))
        .productive_only(true)
        .run()
        .unwrap();
    let duration = before.elapsed();

    println!("FACTS:");
    print!("{}", pretty.facts_to_string(&outcome.facts));
    println!(
        "Took {:.3}ms for {} steps (fixpoint: {})",
        duration.as_secs_f64() * 1000.0,
        outcome.steps,
        outcome.fixpoint
    );
}
