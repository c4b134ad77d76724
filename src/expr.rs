//! # Guard expressions
//!
//! A small closed expression language for `(if <expr>)` conditions. Leaves are terms, which are
//! grounded with the current binding before they are used, so every variable in a guard must have
//! been bound by an earlier condition.
//!
//! Operators:
//! - arithmetic on integers: `+ - * / %`. Overflow and division by zero are errors.
//! - comparison: `=` and `!=` on any two atoms (or two booleans), `< <= > >=` on integers.
//! - logic on booleans: `and`, `or` (both short-circuiting) and `not`.

use crate::ast::{Atom, Sym, Term, Var};
use crate::binding::Binding;
use crate::error::EvalError;
use crate::ground::ground_term;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Eq => "=",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "and",
            BinOp::Or => "or",
        }
    }

    /// Look up an operator by its symbol.
    pub fn from_symbol(symbol: &str) -> Option<BinOp> {
        const ALL: [BinOp; 13] = [
            BinOp::Add,
            BinOp::Sub,
            BinOp::Mul,
            BinOp::Div,
            BinOp::Rem,
            BinOp::Eq,
            BinOp::Ne,
            BinOp::Lt,
            BinOp::Le,
            BinOp::Gt,
            BinOp::Ge,
            BinOp::And,
            BinOp::Or,
        ];
        ALL.into_iter().find(|op| op.symbol() == symbol)
    }
}

/// A guard expression.
///
/// # Examples
///
/// ```
/// use chainer::ast::{Atom, Var};
/// use chainer::expr::Expr;
/// use chainer::Binding;
///
/// let x = Var::from_ord(0);
/// let y = Var::from_ord(1);
/// // (> ?y (+ ?x 1))
/// let e = Expr::gt(y, Expr::add(x, 1i64));
/// let b = Binding::new().extend(x, Atom::Int(3)).extend(y, Atom::Int(5));
/// assert_eq!(e.holds(&b), Ok(true));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Term(Term),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
}

/// Result of evaluating an [`Expr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Atom(Atom),
    Bool(bool),
}

#[allow(clippy::should_implement_trait)]
impl Expr {
    pub fn binary(op: BinOp, lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Expr {
        Expr::Binary(op, Box::new(lhs.into()), Box::new(rhs.into()))
    }

    pub fn add(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Expr {
        Self::binary(BinOp::Add, lhs, rhs)
    }

    pub fn sub(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Expr {
        Self::binary(BinOp::Sub, lhs, rhs)
    }

    pub fn mul(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Expr {
        Self::binary(BinOp::Mul, lhs, rhs)
    }

    pub fn eq(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Expr {
        Self::binary(BinOp::Eq, lhs, rhs)
    }

    pub fn ne(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Expr {
        Self::binary(BinOp::Ne, lhs, rhs)
    }

    pub fn lt(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Expr {
        Self::binary(BinOp::Lt, lhs, rhs)
    }

    pub fn le(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Expr {
        Self::binary(BinOp::Le, lhs, rhs)
    }

    pub fn gt(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Expr {
        Self::binary(BinOp::Gt, lhs, rhs)
    }

    pub fn ge(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Expr {
        Self::binary(BinOp::Ge, lhs, rhs)
    }

    pub fn and(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Expr {
        Self::binary(BinOp::And, lhs, rhs)
    }

    pub fn or(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Expr {
        Self::binary(BinOp::Or, lhs, rhs)
    }

    pub fn not(inner: impl Into<Expr>) -> Expr {
        Expr::Not(Box::new(inner.into()))
    }

    /// Evaluate the expression as a guard, which must produce a boolean.
    pub fn holds(&self, binding: &Binding) -> Result<bool, EvalError> {
        match self.eval(binding)? {
            Value::Bool(b) => Ok(b),
            Value::Atom(_) => Err(EvalError::TypeMismatch {
                op: "if",
                expected: "boolean",
            }),
        }
    }

    pub fn eval(&self, binding: &Binding) -> Result<Value, EvalError> {
        // TODO: evaluate iteratively so that deeply nested guards cannot overflow the stack
        match self {
            Expr::Term(term) => Ok(Value::Atom(ground_term(term, binding)?)),
            Expr::Not(inner) => Ok(Value::Bool(!inner.eval_bool(binding, "not")?)),
            Expr::Binary(op, lhs, rhs) => match op {
                BinOp::And => Ok(Value::Bool(
                    lhs.eval_bool(binding, "and")? && rhs.eval_bool(binding, "and")?,
                )),
                BinOp::Or => Ok(Value::Bool(
                    lhs.eval_bool(binding, "or")? || rhs.eval_bool(binding, "or")?,
                )),
                BinOp::Eq | BinOp::Ne => {
                    let l = lhs.eval(binding)?;
                    let r = rhs.eval(binding)?;
                    let same_kind = matches!(
                        (l, r),
                        (Value::Atom(_), Value::Atom(_)) | (Value::Bool(_), Value::Bool(_))
                    );
                    if !same_kind {
                        return Err(EvalError::TypeMismatch {
                            op: op.symbol(),
                            expected: "two atoms or two booleans",
                        });
                    }
                    Ok(Value::Bool((l == r) == (*op == BinOp::Eq)))
                }
                BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
                    let l = lhs.eval_int(binding, *op)?;
                    let r = rhs.eval_int(binding, *op)?;
                    let result = match op {
                        BinOp::Lt => l < r,
                        BinOp::Le => l <= r,
                        BinOp::Gt => l > r,
                        _ => l >= r,
                    };
                    Ok(Value::Bool(result))
                }
                BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Rem => {
                    let l = lhs.eval_int(binding, *op)?;
                    let r = rhs.eval_int(binding, *op)?;
                    let result = match op {
                        BinOp::Add => l.checked_add(r),
                        BinOp::Sub => l.checked_sub(r),
                        BinOp::Mul => l.checked_mul(r),
                        BinOp::Div => l.checked_div(r),
                        _ => l.checked_rem(r),
                    };
                    result
                        .map(|i| Value::Atom(Atom::Int(i)))
                        .ok_or(EvalError::Overflow { op: op.symbol() })
                }
            },
        }
    }

    fn eval_bool(&self, binding: &Binding, op: &'static str) -> Result<bool, EvalError> {
        match self.eval(binding)? {
            Value::Bool(b) => Ok(b),
            Value::Atom(_) => Err(EvalError::TypeMismatch {
                op,
                expected: "boolean",
            }),
        }
    }

    fn eval_int(&self, binding: &Binding, op: BinOp) -> Result<i64, EvalError> {
        match self.eval(binding)? {
            Value::Atom(Atom::Int(i)) => Ok(i),
            _ => Err(EvalError::TypeMismatch {
                op: op.symbol(),
                expected: "integer",
            }),
        }
    }
}

impl From<Term> for Expr {
    fn from(t: Term) -> Self {
        Expr::Term(t)
    }
}

impl From<Var> for Expr {
    fn from(v: Var) -> Self {
        Expr::Term(v.into())
    }
}

impl From<Sym> for Expr {
    fn from(s: Sym) -> Self {
        Expr::Term(s.into())
    }
}

impl From<Atom> for Expr {
    fn from(a: Atom) -> Self {
        Expr::Term(a.into())
    }
}

impl From<i64> for Expr {
    fn from(i: i64) -> Self {
        Expr::Term(i.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UnboundVariable;

    #[test]
    fn integer_arithmetic() {
        let x = Var::from_ord(0);
        let b = Binding::new().extend(x, Atom::Int(7));

        assert_eq!(
            Expr::mul(Expr::sub(x, 2i64), 3i64).eval(&b),
            Ok(Value::Atom(Atom::Int(15)))
        );
        assert_eq!(
            Expr::binary(BinOp::Rem, x, 4i64).eval(&b),
            Ok(Value::Atom(Atom::Int(3)))
        );
        assert_eq!(
            Expr::binary(BinOp::Div, x, 0i64).eval(&b),
            Err(EvalError::Overflow { op: "/" })
        );
        assert_eq!(
            Expr::add(i64::MAX, x).eval(&b),
            Err(EvalError::Overflow { op: "+" })
        );
    }

    #[test]
    fn comparisons() {
        let x = Var::from_ord(0);
        let jane = Sym::from_ord(20);
        let b = Binding::new().extend(x, Atom::Sym(jane));

        assert_eq!(Expr::gt(9i64, 3i64).holds(&b), Ok(true));
        assert_eq!(Expr::le(9i64, 3i64).holds(&b), Ok(false));
        assert_eq!(Expr::eq(x, jane).holds(&b), Ok(true));
        assert_eq!(Expr::ne(x, jane).holds(&b), Ok(false));
        assert_eq!(Expr::eq(x, 3i64).holds(&b), Ok(false));
        assert!(matches!(
            Expr::lt(x, 3i64).holds(&b),
            Err(EvalError::TypeMismatch { op: "<", .. })
        ));
        assert!(matches!(
            Expr::eq(Expr::gt(1i64, 0i64), 1i64).holds(&b),
            Err(EvalError::TypeMismatch { op: "=", .. })
        ));
    }

    #[test]
    fn logic_short_circuits() {
        let unbound = Var::from_ord(5);
        let b = Binding::new();

        // the right hand side would fail, but is never evaluated
        assert_eq!(Expr::or(Expr::gt(2i64, 1i64), Expr::gt(unbound, 1i64)).holds(&b), Ok(true));
        assert_eq!(Expr::and(Expr::gt(1i64, 2i64), Expr::gt(unbound, 1i64)).holds(&b), Ok(false));
        assert_eq!(Expr::not(Expr::gt(1i64, 2i64)).holds(&b), Ok(true));
    }

    #[test]
    fn guards_need_bound_variables_and_booleans() {
        let y = Var::from_ord(1);
        assert_eq!(
            Expr::gt(y, 0i64).holds(&Binding::new()),
            Err(EvalError::Unbound(UnboundVariable { var: y }))
        );
        assert!(matches!(
            Expr::add(1i64, 2i64).holds(&Binding::new()),
            Err(EvalError::TypeMismatch { op: "if", .. })
        ));
    }

    #[test]
    fn operator_symbols_round_trip() {
        assert_eq!(BinOp::from_symbol(">="), Some(BinOp::Ge));
        assert_eq!(BinOp::from_symbol("and"), Some(BinOp::And));
        assert_eq!(BinOp::from_symbol("=>"), None);
    }
}
