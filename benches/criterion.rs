use criterion::{criterion_group, criterion_main, Criterion};
use chainer::engine::{Engine, FirstChoice, Simulation};
use chainer::Domain;

macro_rules! sanity_check {
    ($computation:expr,$result:expr) => {{
        let r = $computation;
        assert_eq!(r, $result);
        r
    }};
}

fn prepare_kinship() -> Domain {
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
    d
}

fn kinship(d: &Domain) -> usize {
    let outcome = Simulation::new(d)
        .strategy(FirstChoice)
        .productive_only(true)
        .run()
        .unwrap();
    sanity_check!(outcome.facts.len(), 7)
}

fn prepare_maximum(count: usize) -> Domain {
    let mut d = Domain::new();
    for i in 0..count {
        d.add_fact(&["number", &i.to_string()]).unwrap();
    }
    d.rule(|r| {
        r.when(&["number", "?x"])
            .unless(|n| {
                n.when(&["number", "?y"])
                    .compare(chainer::expr::BinOp::Gt, "?y", "?x");
            })
            .then(&["max", "?x"]);
    });
    d
}

fn maximum(d: &Domain) -> usize {
    let facts = d.initial_facts();
    let candidates = Engine::for_domain(d).candidates(&facts).unwrap();
    sanity_check!(candidates.len(), 1)
}

fn prepare_ancestors(length: usize) -> Domain {
    let mut d = Domain::new();
    for i in 1..length {
        let (parent, child) = (format!("p{}", i - 1), format!("p{}", i));
        d.add_fact(&["parent", &parent, &child]).unwrap();
    }
    d.rule(|r| {
        r.when(&["parent", "?x", "?y"]).then(&["ancestor", "?x", "?y"]);
    });
    d.rule(|r| {
        r.when(&["ancestor", "?x", "?y"])
            .when(&["parent", "?y", "?z"])
            .then(&["ancestor", "?x", "?z"]);
    });
    d
}

fn ancestors(d: &Domain, length: usize) -> usize {
    let outcome = Simulation::new(d)
        .strategy(FirstChoice)
        .productive_only(true)
        .max_steps(usize::MAX)
        .run()
        .unwrap();
    sanity_check!(outcome.facts.len(), (length - 1) + length * (length - 1) / 2)
}

fn criterion_benchmark(c: &mut Criterion) {
    let kinship_domain = prepare_kinship();
    let maximum_domain = prepare_maximum(100);
    let ancestor_domain = prepare_ancestors(20);

    c.bench_function("kinship", |b| b.iter(|| kinship(&kinship_domain)));
    c.bench_function("maximum", |b| b.iter(|| maximum(&maximum_domain)));
    c.bench_function("ancestors", |b| {
        b.iter(|| ancestors(&ancestor_domain, 20))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
