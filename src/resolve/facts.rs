use crate::ast::Pattern;
use crate::binding::Binding;
use crate::error::ResolveError;
use crate::resolve::{malformed, Form, ResolveContext};

/// The default form: match a plain tuple against every fact of the fact base.
///
/// Bindings are produced in fact-base order. Special forms whose head has nothing registered end up
/// here too; they cannot be matched against facts and are reported as malformed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FactMatch;

impl Form for FactMatch {
    fn resolve(
        &self,
        pattern: &Pattern,
        binding: &Binding,
        context: &ResolveContext,
    ) -> Result<Vec<Binding>, ResolveError> {
        match pattern {
            Pattern::Tuple(terms) => Ok(context.facts().query(terms, binding)),
            Pattern::Form(_) => Err(malformed(pattern, "no form is registered for this head")),
        }
    }
}
