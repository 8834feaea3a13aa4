//! Per-parameter constraint aggregation.
//!
//! Folds the matcher over every argument slot of a call for one type
//! parameter:
//!
//! - the first non-wildcard `Equals` wins; a later, different one fails
//! - one wildcard `Equals` (a capture) is held; a second one fails
//! - `Supertype` evidence is lubbed; an incompatible lub fails
//! - only the first `Subtype` bound is kept
//!
//! When the arguments give no lower bound and no capture, the context
//! resolver is consulted.

use crate::constraint::{Constraint, ConstraintKind, MatchOutcome};
use crate::infer::{InferenceEngine, InferenceRequest};
use crate::lub::lub;
use crate::matcher::TypeMatcher;
use crate::session::InferenceSession;
use crate::subtype::is_assignable_from;
use crate::types::{Type, TypeParamId};
use tracing::trace;

/// Aggregated evidence for one type parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamConstraint {
    Resolved(Constraint),
    /// No evidence at all.
    Unresolved,
    /// Contradictory evidence; the callable's inference fails.
    Failed,
    /// A raw argument; the callable's type arguments are erased.
    Raw,
}

impl ParamConstraint {
    /// The answer unless it is only an upper bound.
    pub fn exact(&self) -> Option<&Type> {
        match self {
            ParamConstraint::Resolved(constraint) if constraint.kind != ConstraintKind::Subtype => {
                Some(&constraint.ty)
            }
            _ => None,
        }
    }

    /// The answer when it is only an upper bound.
    pub fn upper_bound(&self) -> Option<&Type> {
        match self {
            ParamConstraint::Resolved(constraint) if constraint.kind == ConstraintKind::Subtype => {
                Some(&constraint.ty)
            }
            _ => None,
        }
    }
}

impl InferenceEngine<'_> {
    pub(crate) fn aggregate(
        &self,
        session: &mut InferenceSession,
        param: TypeParamId,
        request: &InferenceRequest<'_>,
    ) -> ParamConstraint {
        let result = self.aggregate_inner(session, param, request);
        trace!(param = param.0, ?result, "aggregate");
        result
    }

    fn aggregate_inner(
        &self,
        session: &mut InferenceSession,
        param: TypeParamId,
        request: &InferenceRequest<'_>,
    ) -> ParamConstraint {
        let method = request.method;
        let matcher = TypeMatcher::new(self.db, param);
        let mut captured: Option<Type> = None;
        let mut lower: Option<Type> = None;
        let mut upper: Option<Type> = None;
        let mut exact: Option<Type> = None;

        if !method.params.is_empty() {
            for (index, arg) in request.args.iter().enumerate() {
                if arg.call.is_some_and(|call| session.guard.is_blocked(call)) {
                    continue;
                }
                let Some(formal) = method.param_for_arg(index) else {
                    break;
                };
                let Some(arg_ty) = &arg.ty else {
                    continue;
                };

                let mut formal_ty = &formal.ty;
                let mut arg_ty = arg_ty;
                if method.is_varargs_slot(index)
                    && let Some(component) = formal.ty.array_component()
                {
                    formal_ty = component;
                    // An array passed directly in the variable-arity slot.
                    if request.args.len() == method.params.len()
                        && let Some(arg_component) = arg_ty.array_component()
                        && !arg_component.is_primitive()
                    {
                        arg_ty = arg_component;
                    }
                }

                let outcome = matcher.constrain(formal_ty, arg_ty, true);
                // Once an exact answer is known only a conflicting one matters.
                if let Some(answer) = &exact {
                    if let MatchOutcome::Constraint(constraint) = &outcome
                        && constraint.kind == ConstraintKind::Equals
                        && !constraint.ty.is_wildcard()
                        && constraint.ty != *answer
                    {
                        return ParamConstraint::Failed;
                    }
                    continue;
                }

                let constraint = match outcome {
                    MatchOutcome::NoInfo => continue,
                    MatchOutcome::Failed => return ParamConstraint::Failed,
                    MatchOutcome::Raw => return ParamConstraint::Raw,
                    MatchOutcome::Constraint(constraint) => constraint,
                };

                match constraint.kind {
                    ConstraintKind::Equals => {
                        if !constraint.ty.is_wildcard() {
                            exact = Some(constraint.ty);
                            continue;
                        }
                        if captured.is_some() {
                            return ParamConstraint::Failed;
                        }
                        captured = Some(constraint.ty);
                    }
                    ConstraintKind::Supertype => {
                        lower = match lower {
                            None => Some(constraint.ty),
                            Some(previous) if previous == constraint.ty => Some(previous),
                            Some(previous) => match lub(self.db, &previous, &constraint.ty) {
                                Some(merged) => Some(merged),
                                None => return ParamConstraint::Failed,
                            },
                        };
                    }
                    ConstraintKind::Subtype => {
                        if upper.is_none() {
                            upper = Some(constraint.ty);
                        }
                    }
                }
            }
        }

        if let Some(answer) = exact {
            return ParamConstraint::Resolved(Constraint::equals(answer));
        }

        if let Some(wildcard) = captured {
            match lower {
                Some(bound) => {
                    if !is_assignable_from(self.db, &wildcard, &bound) {
                        return ParamConstraint::Failed;
                    }
                    lower = match lub(self.db, &bound, &wildcard) {
                        Some(merged) => Some(merged),
                        None => return ParamConstraint::Failed,
                    };
                }
                None => {
                    if let Some(bound) = &upper
                        && !is_assignable_from(self.db, bound, &wildcard)
                    {
                        return ParamConstraint::Failed;
                    }
                    return ParamConstraint::Resolved(Constraint::equals(wildcard));
                }
            }
        }

        if let Some(bound) = lower {
            return ParamConstraint::Resolved(Constraint::equals(bound));
        }

        match self.infer_from_context(session, param, request) {
            Some(context) if context.kind != ConstraintKind::Subtype => {
                ParamConstraint::Resolved(context)
            }
            Some(context) => ParamConstraint::Resolved(match upper {
                Some(bound) => Constraint::subtype(bound),
                None => context,
            }),
            None => match upper {
                Some(bound) => ParamConstraint::Resolved(Constraint::subtype(bound)),
                None => ParamConstraint::Unresolved,
            },
        }
    }
}

#[cfg(test)]
#[path = "../tests/aggregate_tests.rs"]
mod tests;
