//! Context propagation: inferring a method type parameter from the
//! construct its call sits in.
//!
//! Only method type parameters of method calls qualify; constructor calls
//! and class type parameters never look outward. The declared return type
//! is matched covariantly against the expected type:
//!
//! | Context | Expected type |
//! |---------|---------------|
//! | variable initializer | declared type |
//! | assignment | target type |
//! | return | enclosing method's return type |
//! | argument of an outer call | formal of each outer candidate, in rank order |
//! | none | root class (strict) / `null` (best effort) |
//!
//! Outer calls are consulted under two guards from the session: the inner
//! call is blocked (its slot is skipped while the outer call is ranked)
//! and the outer call is entered into the context guard, so a call never
//! justifies itself transitively.

use crate::call::{CallContext, CallKind};
use crate::constraint::{Constraint, MatchOutcome};
use crate::def::TypeParamOwner;
use crate::infer::{InferenceEngine, InferenceRequest};
use crate::matcher::TypeMatcher;
use crate::session::InferenceSession;
use crate::subtype::is_assignable_from;
use crate::substitution::Binding;
use crate::type_ops::erasure;
use crate::types::{CallId, Type, TypeParamId};
use tracing::{debug, trace};

impl InferenceEngine<'_> {
    pub(crate) fn infer_from_context(
        &self,
        session: &mut InferenceSession,
        param: TypeParamId,
        request: &InferenceRequest<'_>,
    ) -> Option<Constraint> {
        let info = self.db.type_param_info(param)?;
        let TypeParamOwner::Method(_) = info.owner else {
            return None;
        };
        let call = request.call?;
        let site = self.calls.call(call)?;
        if site.kind != CallKind::Method {
            return None;
        }

        let return_type = &request.method.return_type;
        let expected = match &site.context {
            CallContext::VariableInit { declared } => Some(declared.clone()),
            CallContext::Assignment { target } => Some(target.clone()),
            CallContext::Return { method_return } => method_return.clone(),
            CallContext::Argument { outer, index } => {
                if self.options.uses_outer_call_context()
                    && let Some(constraint) =
                        self.infer_from_outer_call(session, param, call, *outer, *index, return_type)
                {
                    return Some(constraint);
                }
                None
            }
            CallContext::None => None,
        };
        let expected = expected.unwrap_or_else(|| {
            if self.options.is_best_effort() {
                Type::Null
            } else {
                self.db.object_type()
            }
        });

        let matcher = TypeMatcher::new(self.db, param);
        let constraint = match matcher.constrain(return_type, &expected, false) {
            MatchOutcome::Constraint(constraint) => {
                self.refine_guess(param, request, return_type, constraint)
            }
            MatchOutcome::NoInfo | MatchOutcome::Failed | MatchOutcome::Raw => {
                self.bound_fallback(param, request)
            }
        };
        trace!(param = param.0, ?expected, ?constraint, "infer_from_context");
        Some(constraint)
    }

    /// Best-effort wrapping and bound adjustment of a context answer.
    ///
    /// When the return type is the parameter itself, each declared bound
    /// that does not accept the guess replaces it if it is narrower, and
    /// otherwise ends the walk.
    fn refine_guess(
        &self,
        param: TypeParamId,
        request: &InferenceRequest<'_>,
        return_type: &Type,
        constraint: Constraint,
    ) -> Constraint {
        let mut guess = constraint.ty;
        if self.options.is_best_effort() && !guess.is_wildcard() {
            guess = Type::extends(guess);
        }

        if matches!(return_type, Type::Param(id) if *id == param) {
            let bounds = self
                .db
                .type_param_info(param)
                .map(|info| info.bounds.clone())
                .unwrap_or_default();
            for bound in &bounds {
                let with_guess = request.partial.put_type(param, guess.clone());
                let Some(bound) = with_guess.substitute(bound) else {
                    break;
                };
                if is_assignable_from(self.db, &bound, &guess) {
                    continue;
                }
                if is_assignable_from(self.db, &guess, &bound) {
                    guess = bound;
                } else {
                    break;
                }
            }
        }

        Constraint::new(guess, constraint.kind)
    }

    /// Primary bound with the parameter itself erased, as an upper bound
    /// (or as a wildcard guess in best-effort mode).
    fn bound_fallback(&self, param: TypeParamId, request: &InferenceRequest<'_>) -> Constraint {
        let erased = request.partial.put(param, Binding::Unbound);
        let bound = self
            .db
            .type_param_info(param)
            .and_then(|info| info.primary_bound().cloned())
            .and_then(|bound| erased.substitute(&bound))
            .unwrap_or_else(|| self.db.object_type());

        if self.options.is_best_effort() && !bound.is_wildcard() {
            Constraint::equals(Type::extends(bound))
        } else {
            Constraint::subtype(bound)
        }
    }

    /// Expected type from the outer call's candidates for argument `index`.
    fn infer_from_outer_call(
        &self,
        session: &mut InferenceSession,
        param: TypeParamId,
        inner: CallId,
        outer: CallId,
        index: usize,
        inner_return: &Type,
    ) -> Option<Constraint> {
        if session.guard.context.enter(outer).is_denied() {
            debug!(outer = outer.0, inner = inner.0, "outer call already in use as context");
            return None;
        }
        session.guard.block(inner);
        let ranked = self.rank_call(session, outer);
        session.guard.unblock(inner);
        session.guard.context.leave(outer);

        let ranked = match ranked {
            Ok(ranked) => ranked,
            Err(err) => {
                debug!(outer = outer.0, %err, "outer call could not be ranked");
                return None;
            }
        };

        let matcher = TypeMatcher::new(self.db, param);
        for candidate in &ranked.candidates {
            let Some(method) = self.db.method_info(candidate.method) else {
                continue;
            };
            let formal = match method.params.get(index) {
                Some(formal) if !method.is_varargs_slot(index) => formal.ty.clone(),
                _ if method.is_varargs_slot(index) => {
                    let Some(last) = method.params.last() else {
                        continue;
                    };
                    match (last.ty.array_component(), inner_return.array_component()) {
                        // The inner call may supply the whole array.
                        (Some(_), Some(_)) if index + 1 == method.params.len() => last.ty.clone(),
                        (Some(component), _) => component.clone(),
                        (None, _) => last.ty.clone(),
                    }
                }
                _ => continue,
            };
            let expected = candidate
                .substitution
                .substitute(&formal)
                .unwrap_or_else(|| erasure(self.db, &formal));
            if let MatchOutcome::Constraint(constraint) =
                matcher.constrain(inner_return, &expected, false)
            {
                trace!(outer = outer.0, candidate = candidate.method.0, ?constraint, "outer call context");
                return Some(constraint);
            }
        }
        None
    }
}

#[cfg(test)]
#[path = "../tests/context_tests.rs"]
mod tests;
