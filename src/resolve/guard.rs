use crate::ast::{FormArg, Pattern};
use crate::binding::Binding;
use crate::error::ResolveError;
use crate::resolve::{malformed, Form, ResolveContext};

/// `(if <expr>)`: passes the binding through unchanged when the expression holds.
///
/// All variables of the expression must be bound by earlier conditions, otherwise resolving fails
/// with an unbound variable error.
#[derive(Debug, Clone, Copy, Default)]
pub struct Guard;

impl Form for Guard {
    fn resolve(
        &self,
        pattern: &Pattern,
        binding: &Binding,
        _context: &ResolveContext,
    ) -> Result<Vec<Binding>, ResolveError> {
        let Pattern::Form(form) = pattern else {
            return Err(malformed(pattern, "a guard takes one expression"));
        };
        let [FormArg::Expr(expr)] = form.args.as_slice() else {
            return Err(malformed(pattern, "a guard takes one expression"));
        };
        if expr.holds(binding)? {
            Ok(vec![binding.clone()])
        } else {
            Ok(vec![])
        }
    }
}
