use crate::ast::{FormArg, Pattern};
use crate::binding::Binding;
use crate::error::ResolveError;
use crate::resolve::{malformed, Form, ResolveContext};

/// `(not <pattern>...)`: negation as failure.
///
/// The body is solved as a conjunction starting from the current binding. The negation holds iff
/// the body has no solution, in which case the binding is passed through unchanged; variables bound
/// inside the body never leak out.
///
/// Variables shared with the rest of the rule must be bound before the negation is reached. If they
/// are not, the body treats them as fresh and the negation can fail or succeed for the wrong
/// reasons. See [`analysis`](crate::analysis) for detecting such rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct Negation;

impl Form for Negation {
    fn resolve(
        &self,
        pattern: &Pattern,
        binding: &Binding,
        context: &ResolveContext,
    ) -> Result<Vec<Binding>, ResolveError> {
        let Pattern::Form(form) = pattern else {
            return Err(malformed(pattern, "a negation takes patterns"));
        };
        let body = form
            .args
            .iter()
            .map(|arg| match arg {
                FormArg::Pattern(p) => Ok(p.clone()),
                _ => Err(malformed(pattern, "a negation takes patterns")),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if context.solve(&body, binding)?.is_empty() {
            Ok(vec![binding.clone()])
        } else {
            Ok(vec![])
        }
    }
}
