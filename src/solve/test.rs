use super::*;
use crate::ast::*;
use crate::error::UnboundVariable;
use crate::expr::Expr;
use crate::SymbolStore;

struct Genealogy {
    syms: SymbolStore,
    facts: FactBase,
}

fn genealogy() -> Genealogy {
    /*

    (parent alice carol)  (parent bob carol)
    (parent carol eve)    (parent dave eve)
    (parent carol faithe) (parent dave faithe)

    */
    let mut syms = SymbolStore::new();
    let facts = [
        ["parent", "alice", "carol"],
        ["parent", "bob", "carol"],
        ["parent", "carol", "eve"],
        ["parent", "dave", "eve"],
        ["parent", "carol", "faithe"],
        ["parent", "dave", "faithe"],
    ]
    .iter()
    .map(|names| syms.fact(names).unwrap())
    .collect();
    Genealogy { syms, facts }
}

#[test]
fn grandparents() {
    let mut g = genealogy();
    let parent = g.syms.get_or_insert_named("parent");
    let eve = g.syms.get_or_insert_named("eve");
    let alice = g.syms.get_or_insert_named("alice");
    let bob = g.syms.get_or_insert_named("bob");

    // (parent ?x ?z), (parent ?z eve)
    let [x, z] = [Var::from_ord(0), Var::from_ord(1)];
    let patterns = vec![
        Pattern::tuple(vec![parent.into(), x.into(), z.into()]),
        Pattern::tuple(vec![parent.into(), z.into(), eve.into()]),
    ];
    let solutions = solve(&patterns, &g.facts, &Binding::new()).unwrap();
    assert_eq!(
        solutions.iter().map(|b| b.get(x)).collect::<Vec<_>>(),
        vec![Some(alice.into()), Some(bob.into())]
    );
}

#[test]
fn siblings_enumerate_full_cross_product() {
    let mut g = genealogy();
    let parent = g.syms.get_or_insert_named("parent");
    let eve = g.syms.get_or_insert_named("eve");
    let faithe = g.syms.get_or_insert_named("faithe");

    // (parent ?p eve), (parent ?p ?c)
    let [p, c] = [Var::from_ord(0), Var::from_ord(1)];
    let patterns = vec![
        Pattern::tuple(vec![parent.into(), p.into(), eve.into()]),
        Pattern::tuple(vec![parent.into(), p.into(), c.into()]),
    ];
    let solutions = solve(&patterns, &g.facts, &Binding::new()).unwrap();
    assert_eq!(
        solutions.iter().map(|b| b.get(c)).collect::<Vec<_>>(),
        vec![
            // one solution for each path taken
            Some(eve.into()),
            Some(faithe.into()),
            Some(eve.into()),
            Some(faithe.into()),
        ]
    );
}

#[test]
fn empty_conjunction_holds_once() {
    let g = genealogy();
    let start = Binding::new().extend(Var::from_ord(3), Atom::Int(1));
    assert_eq!(solve(&[], &g.facts, &start).unwrap(), vec![start.clone()]);
    assert_eq!(
        unifications(&Rule::new(), &g.facts).unwrap(),
        vec![Binding::new()]
    );
}

#[test]
fn guard_after_binding_filters() {
    let mut syms = SymbolStore::new();
    let facts: FactBase = (0..10)
        .map(|i| syms.fact(&["number", &i.to_string()]).unwrap())
        .collect();
    let number = syms.get_or_insert_named("number");

    let x = Var::from_ord(0);
    let patterns = vec![
        Pattern::tuple(vec![number.into(), x.into()]),
        Pattern::guard(Expr::eq(Expr::binary(crate::expr::BinOp::Rem, x, 3i64), 0i64)),
    ];
    let solutions = solve(&patterns, &facts, &Binding::new()).unwrap();
    assert_eq!(
        solutions.iter().map(|b| b.get(x)).collect::<Vec<_>>(),
        [0, 3, 6, 9].map(|i| Some(Atom::Int(i))).to_vec()
    );
}

#[test]
fn guard_before_binding_is_an_error() {
    let mut syms = SymbolStore::new();
    let facts: FactBase = std::iter::once(syms.fact(&["number", "1"]).unwrap()).collect();
    let number = syms.get_or_insert_named("number");

    let x = Var::from_ord(0);
    let patterns = vec![
        Pattern::guard(Expr::gt(x, 0i64)),
        Pattern::tuple(vec![number.into(), x.into()]),
    ];
    assert_eq!(
        solve(&patterns, &facts, &Binding::new()),
        Err(ResolveError::Unbound(UnboundVariable { var: x }))
    );
}

#[test]
fn negation_before_binding_succeeds_vacuously() {
    let mut g = genealogy();
    let parent = g.syms.get_or_insert_named("parent");
    let alice = g.syms.get_or_insert_named("alice");
    let carol = g.syms.atom("carol");

    // Who has no parent? Written correctly, the negation comes after ?x is bound:
    // (parent ?x ?_), (not (parent ?p ?x))
    let [x, any, p] = [Var::from_ord(0), Var::from_ord(1), Var::from_ord(2)];
    let in_order = vec![
        Pattern::tuple(vec![parent.into(), x.into(), any.into()]),
        Pattern::negation(vec![Pattern::tuple(vec![parent.into(), p.into(), x.into()])]),
    ];
    let roots: Vec<_> = solve(&in_order, &g.facts, &Binding::new())
        .unwrap()
        .into_iter()
        .map(|b| b.get(x))
        .collect();
    assert_eq!(roots[0], Some(alice.into()));
    assert!(roots.iter().all(|r| *r != Some(carol)));

    // With the negation first, ?x is free inside it, the body finds a solution and the whole
    // conjunction fails even though there are parentless people.
    let out_of_order = vec![in_order[1].clone(), in_order[0].clone()];
    assert_eq!(solve(&out_of_order, &g.facts, &Binding::new()), Ok(vec![]));
}

#[test]
fn custom_registry_is_used_for_nested_patterns() {
    let g = genealogy();
    let plain = FormRegistry::plain();
    // Without the built-in forms, `not` is an ordinary head that matches no fact.
    let negation = Pattern::negation(vec![]);
    assert!(matches!(
        Solver::new(&plain).solve(&[negation], &g.facts, &Binding::new()),
        Err(ResolveError::MalformedForm { .. })
    ));

    let forms = FormRegistry::new();
    // (not) with an empty body never holds, since the empty conjunction has a solution
    assert_eq!(
        Solver::new(&forms).solve(&[Pattern::negation(vec![])], &g.facts, &Binding::new()),
        Ok(vec![])
    );
}
