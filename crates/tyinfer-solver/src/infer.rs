//! Inference engine: entry points and finalization.
//!
//! The pipeline for one callable:
//!
//! 1. **Aggregate** (`aggregate.rs`): one [`ParamConstraint`] per type
//!    parameter, folding the matcher over every argument slot and asking
//!    the context resolver (`context.rs`) when the arguments say nothing.
//! 2. **Reconcile** (`reconcile.rs`): one sweep resolving parameters
//!    through the bounds of already-resolved siblings.
//! 3. **Finalize** (here): per parameter, the aggregator's exact answer,
//!    then the reconciler's, then the aggregator's upper bound. Any
//!    failure makes the whole substitution raw.
//!
//! Overload ranking (`overload.rs`) runs this pipeline per candidate.

use crate::aggregate::ParamConstraint;
use crate::call::{AccessibilityChecker, AllAccessible, ArgumentInfo, CallSite, CallSiteLookup};
use crate::constraint::{ConstraintKind, MatchOutcome};
use crate::db::TypeDatabase;
use crate::def::MethodInfo;
use crate::error::InferenceError;
use crate::lub::lub;
use crate::matcher::TypeMatcher;
use crate::session::{InferenceOptions, InferenceSession};
use crate::substitution::{Binding, Substitution};
use crate::type_ops::type_param_erasure;
use crate::types::{CallId, Type, TypeParamId};
use tracing::debug;

/// Per-parameter answer in the caller-facing view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InferenceOutcome {
    Resolved(Type),
    /// Best-effort answer, always an extends-wildcard.
    Guess(Type),
    Unbound,
}

/// One inference problem: a callable, its arguments and what is already known.
#[derive(Clone, Copy, Debug)]
pub struct InferenceRequest<'r> {
    pub type_params: &'r [TypeParamId],
    pub method: &'r MethodInfo,
    pub args: &'r [ArgumentInfo],
    pub partial: &'r Substitution,
    /// The call being inferred, when it is known to the call-site lookup.
    /// Context resolution needs it.
    pub call: Option<CallId>,
}

impl<'r> InferenceRequest<'r> {
    /// A request for all of `method`'s type parameters.
    pub fn new(method: &'r MethodInfo, args: &'r [ArgumentInfo], partial: &'r Substitution) -> Self {
        Self {
            type_params: method.type_params.as_slice(),
            method,
            args,
            partial,
            call: None,
        }
    }

    pub fn at_call(mut self, call: CallId) -> Self {
        self.call = Some(call);
        self
    }
}

/// Call-site lookup with no calls.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoCalls;

impl CallSiteLookup for NoCalls {
    fn call(&self, _id: CallId) -> Option<&CallSite> {
        None
    }
}

static NO_CALLS: NoCalls = NoCalls;
static ALL_ACCESSIBLE: AllAccessible = AllAccessible;

pub struct InferenceEngine<'a> {
    pub(crate) db: &'a dyn TypeDatabase,
    pub(crate) calls: &'a dyn CallSiteLookup,
    pub(crate) access: &'a dyn AccessibilityChecker,
    pub(crate) options: InferenceOptions,
}

impl<'a> InferenceEngine<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        Self {
            db,
            calls: &NO_CALLS,
            access: &ALL_ACCESSIBLE,
            options: InferenceOptions::default(),
        }
    }

    pub fn with_calls(mut self, calls: &'a dyn CallSiteLookup) -> Self {
        self.calls = calls;
        self
    }

    pub fn with_access(mut self, access: &'a dyn AccessibilityChecker) -> Self {
        self.access = access;
        self
    }

    pub fn with_options(mut self, options: InferenceOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &InferenceOptions {
        &self.options
    }

    pub fn db(&self) -> &'a dyn TypeDatabase {
        self.db
    }

    // =========================================================================
    // Entry points
    // =========================================================================

    /// Infer every parameter of `request`. Total failure is the partial
    /// substitution with all of `request.type_params` bound to `Unbound`.
    pub fn infer_type_arguments(
        &self,
        session: &mut InferenceSession,
        request: &InferenceRequest<'_>,
    ) -> Substitution {
        let type_params = request.type_params;
        let constraints: Vec<ParamConstraint> = type_params
            .iter()
            .map(|param| self.aggregate(session, *param, request))
            .collect();

        if constraints
            .iter()
            .any(|constraint| matches!(constraint, ParamConstraint::Failed | ParamConstraint::Raw))
        {
            debug!(method = %request.method.name, ?constraints, "inference failed");
            return request.partial.with_all_unbound(type_params);
        }

        let mut resolved: Vec<Option<Type>> = constraints
            .iter()
            .map(|constraint| constraint.exact().cloned())
            .collect();
        self.reconcile(type_params, &mut resolved, request.partial);

        let mut substitution = request.partial.clone();
        for ((param, constraint), reconciled) in type_params.iter().zip(&constraints).zip(resolved) {
            let Some(ty) = reconciled.or_else(|| constraint.upper_bound().cloned()) else {
                debug!(method = %request.method.name, param = param.0, "unresolved parameter");
                return request.partial.with_all_unbound(type_params);
            };
            // A self-referential answer would be an infinite type; leave identity.
            if ty.mentions(*param) {
                continue;
            }
            substitution = substitution.put_type(*param, ty);
        }

        debug!(method = %request.method.name, ?substitution, "inferred");
        substitution
    }

    /// Per-parameter outcomes. In best-effort mode, extends-wildcard
    /// answers are reported as guesses.
    pub fn infer_outcomes(
        &self,
        session: &mut InferenceSession,
        request: &InferenceRequest<'_>,
    ) -> Vec<(TypeParamId, InferenceOutcome)> {
        let substitution = self.infer_type_arguments(session, request);
        request
            .type_params
            .iter()
            .map(|param| {
                let outcome = match substitution.get(*param) {
                    Some(Binding::Type(ty)) => {
                        let is_guess = self.options.is_best_effort()
                            && ty.as_wildcard().is_some_and(|wildcard| wildcard.is_extends());
                        if is_guess {
                            InferenceOutcome::Guess(ty.clone())
                        } else {
                            InferenceOutcome::Resolved(ty.clone())
                        }
                    }
                    Some(Binding::Unbound) => InferenceOutcome::Unbound,
                    None => InferenceOutcome::Resolved(Type::param(*param)),
                };
                (*param, outcome)
            })
            .collect()
    }

    /// The aggregated answer for one parameter, without reconciliation.
    pub fn infer_type_for_parameter(
        &self,
        session: &mut InferenceSession,
        param: TypeParamId,
        request: &InferenceRequest<'_>,
    ) -> Option<Type> {
        match self.aggregate(session, param, request) {
            ParamConstraint::Resolved(constraint) => Some(constraint.ty),
            ParamConstraint::Unresolved | ParamConstraint::Failed | ParamConstraint::Raw => None,
        }
    }

    /// Infer from aligned pairs of formal and actual types.
    ///
    /// Per parameter: the first `Equals` match wins, `Subtype` matches are
    /// lubbed, and a parameter with neither binds to its erasure.
    pub fn infer_from_type_pairs(
        &self,
        type_params: &[TypeParamId],
        left: &[Type],
        right: &[Type],
    ) -> Result<Substitution, InferenceError> {
        if left.len() != right.len() {
            return Err(InferenceError::ArityMismatch {
                expected: left.len(),
                actual: right.len(),
            });
        }

        let mut substitution = Substitution::new();
        for param in type_params {
            let matcher = TypeMatcher::new(self.db, *param);
            let mut found: Option<Type> = None;
            for (formal, actual) in left.iter().zip(right) {
                let MatchOutcome::Constraint(constraint) = matcher.constrain(formal, actual, true)
                else {
                    continue;
                };
                match constraint.kind {
                    ConstraintKind::Equals => {
                        found = Some(constraint.ty);
                        break;
                    }
                    ConstraintKind::Subtype => {
                        found = match found {
                            None => Some(constraint.ty),
                            Some(previous) => lub(self.db, &previous, &constraint.ty),
                        };
                    }
                    ConstraintKind::Supertype => {}
                }
            }
            let ty = found.unwrap_or_else(|| type_param_erasure(self.db, *param));
            substitution = substitution.put_type(*param, ty);
        }
        Ok(substitution)
    }
}

#[cfg(test)]
#[path = "../tests/infer_tests.rs"]
mod tests;
