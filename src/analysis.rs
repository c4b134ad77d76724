//! Rule analysis procedures
//!
//! Conditions are solved left to right, so a variable only has a value once a condition before it
//! bound it. The engine does not enforce this. A guard that mentions an unbound variable fails the
//! step with an error, and a negation whose body mentions a variable that only a *later* condition
//! binds succeeds or fails as if the variable were existentially quantified inside the negation.
//! [`check_rule`] reports these situations up front.

use std::collections::{BTreeSet, HashMap, HashSet};

use thiserror::Error;

use crate::ast::{builtin_syms, FormArg, Pattern, Rule, Term, Var};
use crate::expr::Expr;

/// A rule that uses a variable before it is bound.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("guard uses {var} before it is bound")]
    UnboundInGuard { var: Var },

    #[error("negation uses {var}, which is only bound by a later condition")]
    NegationBeforeBinding { var: Var },

    #[error("conclusion uses {var}, which no condition binds")]
    UnboundInConclusion { var: Var },
}

/// An [`AnalysisError`] found in one rule of a domain.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("rule {rule_index}: {issue}")]
pub struct ValidationError {
    pub rule_index: usize,
    pub issue: AnalysisError,
}

/// All ordering problems of `rule`, in the order of the conditions they occur in.
pub fn check_rule(rule: &Rule) -> Vec<AnalysisError> {
    let mut later = HashSet::new();
    for pattern in &rule.conditions {
        binders(pattern, &mut later);
    }

    let mut bound = HashSet::new();
    let mut issues = Vec::new();
    check_conditions(&rule.conditions, &mut bound, &later, &mut issues);

    let mut unbound = BTreeSet::new();
    for conclusion in &rule.conclusions {
        unbound.extend(tuple_vars(conclusion).filter(|var| !bound.contains(var)));
    }
    issues.extend(
        unbound
            .into_iter()
            .map(|var| AnalysisError::UnboundInConclusion { var }),
    );
    issues
}

fn check_conditions(
    patterns: &[Pattern],
    bound: &mut HashSet<Var>,
    later: &HashSet<Var>,
    issues: &mut Vec<AnalysisError>,
) {
    for pattern in patterns {
        match pattern {
            Pattern::Tuple(tuple) => bound.extend(tuple_vars(tuple)),
            Pattern::Form(form) if form.head == builtin_syms::IF => {
                let mut used = BTreeSet::new();
                for arg in &form.args {
                    if let FormArg::Expr(expr) = arg {
                        expr_vars(expr, &mut used);
                    }
                }
                issues.extend(
                    used.into_iter()
                        .filter(|var| !bound.contains(var))
                        .map(|var| AnalysisError::UnboundInGuard { var }),
                );
            }
            Pattern::Form(form) if form.head == builtin_syms::NOT => {
                let mut used = BTreeSet::new();
                for arg in &form.args {
                    if let FormArg::Pattern(nested) = arg {
                        pattern_vars(nested, &mut used);
                    }
                }
                issues.extend(
                    used.into_iter()
                        .filter(|var| !bound.contains(var) && later.contains(var))
                        .map(|var| AnalysisError::NegationBeforeBinding { var }),
                );

                // bindings made inside the negation stay inside
                let mut inner = bound.clone();
                let body: Vec<Pattern> = form
                    .args
                    .iter()
                    .filter_map(|arg| match arg {
                        FormArg::Pattern(p) => Some(p.clone()),
                        _ => None,
                    })
                    .collect();
                check_conditions(&body, &mut inner, later, issues);
            }
            Pattern::Form(_) => binders(pattern, bound),
        }
    }
}

/// Variables a top-level condition can bind. Negations and guards never bind anything.
fn binders(pattern: &Pattern, out: &mut HashSet<Var>) {
    match pattern {
        Pattern::Tuple(tuple) => out.extend(tuple_vars(tuple)),
        Pattern::Form(form) if form.head == builtin_syms::IF || form.head == builtin_syms::NOT => {}
        // custom forms are assumed to bind all of their variables
        Pattern::Form(_) => {
            let mut vars = BTreeSet::new();
            pattern_vars(pattern, &mut vars);
            out.extend(vars);
        }
    }
}

fn tuple_vars(tuple: &[Term]) -> impl Iterator<Item = Var> + '_ {
    tuple.iter().filter_map(|term| term.as_var())
}

fn pattern_vars(pattern: &Pattern, out: &mut BTreeSet<Var>) {
    match pattern {
        Pattern::Tuple(tuple) => out.extend(tuple_vars(tuple)),
        Pattern::Form(form) => {
            for arg in &form.args {
                match arg {
                    FormArg::Term(term) => out.extend(term.as_var()),
                    FormArg::Pattern(nested) => pattern_vars(nested, out),
                    FormArg::Expr(expr) => expr_vars(expr, out),
                }
            }
        }
    }
}

fn expr_vars(expr: &Expr, out: &mut BTreeSet<Var>) {
    match expr {
        Expr::Term(term) => out.extend(term.as_var()),
        Expr::Binary(_, lhs, rhs) => {
            expr_vars(lhs, out);
            expr_vars(rhs, out);
        }
        Expr::Not(inner) => expr_vars(inner, out),
    }
}

/// Finds variables occuring only once in the rule, conditions and conclusions together.
///
/// Such a variable matches anything and its value is never used again.
pub fn find_unique_variables(rule: &Rule) -> HashSet<Var> {
    let vars = count_variables(rule);
    vars.into_iter()
        .filter(|(_var, count)| *count == 1)
        .map(|(var, _count)| var)
        .collect()
}

/// Counts the number of occurrences of all variables in the rule, including nested patterns and
/// guard expressions.
pub fn count_variables(rule: &Rule) -> HashMap<Var, usize> {
    let mut vars = HashMap::new();
    for pattern in &rule.conditions {
        count_in_pattern(&mut vars, pattern);
    }
    for conclusion in &rule.conclusions {
        count_in_terms(&mut vars, conclusion);
    }
    vars
}

fn count_in_terms(vars: &mut HashMap<Var, usize>, terms: &[Term]) {
    for var in tuple_vars(terms) {
        *vars.entry(var).or_insert(0) += 1;
    }
}

fn count_in_pattern(vars: &mut HashMap<Var, usize>, pattern: &Pattern) {
    match pattern {
        Pattern::Tuple(tuple) => count_in_terms(vars, tuple),
        Pattern::Form(form) => {
            for arg in &form.args {
                match arg {
                    FormArg::Term(term) => count_in_terms(vars, std::slice::from_ref(term)),
                    FormArg::Pattern(nested) => count_in_pattern(vars, nested),
                    FormArg::Expr(expr) => count_in_expr(vars, expr),
                }
            }
        }
    }
}

fn count_in_expr(vars: &mut HashMap<Var, usize>, expr: &Expr) {
    match expr {
        Expr::Term(term) => count_in_terms(vars, std::slice::from_ref(term)),
        Expr::Binary(_, lhs, rhs) => {
            count_in_expr(vars, lhs);
            count_in_expr(vars, rhs);
        }
        Expr::Not(inner) => count_in_expr(vars, inner),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{forall, Sym};

    const NUMBER: Sym = Sym::from_ord(10);
    const MAX: Sym = Sym::from_ord(11);

    #[test]
    fn maximum_rule_is_well_ordered() {
        let rule = forall(|[x, y]| {
            Rule::new()
                .when(vec![NUMBER.into(), x.into()])
                .unless(vec![
                    Pattern::tuple(vec![NUMBER.into(), y.into()]),
                    Pattern::guard(Expr::gt(y, x)),
                ])
                .then(vec![MAX.into(), x.into()])
        });
        assert_eq!(check_rule(&rule), vec![]);
        assert_eq!(count_variables(&rule)[&Var::from_ord(1)], 2);
        assert!(find_unique_variables(&rule).is_empty());
    }

    #[test]
    fn guard_before_binding() {
        let rule = forall(|[x]| {
            Rule::new()
                .guard(Expr::gt(x, 0i64))
                .when(vec![NUMBER.into(), x.into()])
                .then(vec![MAX.into(), x.into()])
        });
        assert_eq!(
            check_rule(&rule),
            vec![AnalysisError::UnboundInGuard { var: Var::from_ord(0) }]
        );
    }

    #[test]
    fn negation_before_binding() {
        // (not (number ?y) (if (> ?y ?x))), (number ?x) => (max ?x)
        let rule = forall(|[x, y]| {
            Rule::new()
                .unless(vec![
                    Pattern::tuple(vec![NUMBER.into(), y.into()]),
                    Pattern::guard(Expr::gt(y, x)),
                ])
                .when(vec![NUMBER.into(), x.into()])
                .then(vec![MAX.into(), x.into()])
        });
        assert_eq!(
            check_rule(&rule),
            vec![
                AnalysisError::NegationBeforeBinding { var: Var::from_ord(0) },
                // the guard inside the negation sees ?y, but not ?x
                AnalysisError::UnboundInGuard { var: Var::from_ord(0) },
            ]
        );
    }

    #[test]
    fn conclusion_variables_must_be_bound() {
        let rule = forall(|[x, y]| {
            Rule::new()
                .when(vec![NUMBER.into(), x.into()])
                .then(vec![MAX.into(), y.into()])
        });
        assert_eq!(
            check_rule(&rule),
            vec![AnalysisError::UnboundInConclusion { var: Var::from_ord(1) }]
        );
        assert_eq!(
            find_unique_variables(&rule),
            [Var::from_ord(0), Var::from_ord(1)].into_iter().collect()
        );
    }
}
