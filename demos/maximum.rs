use chainer::engine::{FirstChoice, Simulation, Step};
use chainer::expr::BinOp;
use chainer::pretty::Prettifier;
use chainer::Domain;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let count: usize = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(10);

    let mut d = Domain::new();
    for i in 0..count {
        d.add_fact(&["number", &i.to_string()]).unwrap();
    }
    d.rule(|r| {
        r.when(&["number", "?x"])
            .unless(|n| {
                n.when(&["number", "?y"]).compare(BinOp::Gt, "?y", "?x");
            })
            .then(&["max", "?x"]);
    });

    let pretty = Prettifier::new(d.symbols());
    println!("RULE: {}", pretty.rule_to_string(&d.rules()[0]));

    // Without the productive filter the rule would fire forever; stop after a few steps.
    let mut states = Simulation::new(&d).strategy(FirstChoice).states();
    for _ in 0..3 {
        match states.step().unwrap() {
            Step::Derived => println!("step {}: {} facts", states.steps(), states.current().len()),
            Step::Fixpoint | Step::Done => break,
        }
    }

    let max = d.symbols().get_symbol("max");
    for fact in states.current() {
        if fact.first().copied().and_then(|a| a.as_sym()) == max {
            println!("{}", pretty.fact_to_string(fact));
        }
    }
}
