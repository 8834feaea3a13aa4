//! Overload ranking.
//!
//! Every candidate of a call gets its own inferred substitution and an
//! applicability phase:
//!
//! 1. `Exact`: same arity, every argument a subtype of its formal without
//!    boxing
//! 2. `Boxing`: same arity, assignable with boxing and unboxing
//! 3. `VarArgs`: trailing arguments fit the variable-arity component
//!
//! Candidates are ordered accessible first, then by phase, stable on the
//! candidate order of the call site. The ranking never picks a winner;
//! [`OverloadResolution::best`] exposes the leading tier and
//! [`OverloadResolution::is_ambiguous`] whether it holds more than one.

use crate::call::{ArgumentInfo, ArgumentType, CallSite};
use crate::def::MethodInfo;
use crate::error::InferenceError;
use crate::infer::{InferenceEngine, InferenceRequest};
use crate::session::InferenceSession;
use crate::substitution::Substitution;
use crate::subtype::{is_assignable_from, is_subtype_no_boxing};
use crate::type_ops::erasure;
use crate::types::{CallId, MethodId, Type};
use tracing::{debug, trace};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Applicability {
    Exact,
    Boxing,
    VarArgs,
    NotApplicable,
}

impl Applicability {
    pub fn is_applicable(self) -> bool {
        self != Applicability::NotApplicable
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankedCandidate {
    pub method: MethodId,
    pub substitution: Substitution,
    pub applicability: Applicability,
    pub accessible: bool,
}

impl RankedCandidate {
    fn rank_key(&self) -> (bool, Applicability) {
        (!self.accessible, self.applicability)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverloadResolution {
    pub call: CallId,
    /// All candidates, best first.
    pub candidates: Vec<RankedCandidate>,
}

impl OverloadResolution {
    /// The leading candidates sharing the best rank, if it is applicable.
    pub fn best(&self) -> &[RankedCandidate] {
        let Some(first) = self.candidates.first() else {
            return &[];
        };
        if !first.applicability.is_applicable() {
            return &[];
        }
        let key = first.rank_key();
        let len = self
            .candidates
            .iter()
            .take_while(|candidate| candidate.rank_key() == key)
            .count();
        &self.candidates[..len]
    }

    pub fn is_ambiguous(&self) -> bool {
        self.best().len() > 1
    }

    /// The single accessible best candidate, if there is exactly one.
    pub fn unique_best(&self) -> Option<&RankedCandidate> {
        match self.best() {
            [only] if only.accessible => Some(only),
            _ => None,
        }
    }

    pub fn applicable(&self) -> impl Iterator<Item = &RankedCandidate> {
        self.candidates
            .iter()
            .filter(|candidate| candidate.applicability.is_applicable())
    }
}

impl InferenceEngine<'_> {
    /// Rank the candidates of a call known to the call-site lookup.
    pub fn rank_call(
        &self,
        session: &mut InferenceSession,
        call: CallId,
    ) -> Result<OverloadResolution, InferenceError> {
        let site = self.calls.call(call).ok_or(InferenceError::UnknownCall(call))?;
        self.rank_site(session, site)
    }

    /// Rank the candidates of `site`.
    pub fn rank_site(
        &self,
        session: &mut InferenceSession,
        site: &CallSite,
    ) -> Result<OverloadResolution, InferenceError> {
        let args = self.argument_types(session, site);
        let mut candidates = Vec::with_capacity(site.candidates.len());
        for method_id in &site.candidates {
            let method = self
                .db
                .method_info(*method_id)
                .ok_or(InferenceError::UnknownMethod(*method_id))?;
            let substitution = self.candidate_substitution(session, site, &method, &args);
            let applicability = self.applicability(&method, &substitution, &args);
            let accessible = self.access.is_accessible(&method, site.caller_class);
            trace!(
                call = site.id.0,
                method = %method.name,
                ?applicability,
                accessible,
                "candidate"
            );
            candidates.push(RankedCandidate {
                method: *method_id,
                substitution,
                applicability,
                accessible,
            });
        }
        // `sort_by_key` is stable: ties keep call-site order.
        candidates.sort_by_key(RankedCandidate::rank_key);

        let resolution = OverloadResolution {
            call: site.id,
            candidates,
        };
        debug!(
            call = site.id.0,
            best = resolution.best().len(),
            ambiguous = resolution.is_ambiguous(),
            "rank_site"
        );
        Ok(resolution)
    }

    /// Result type of a nested call: the return type of its unique best
    /// candidate under that candidate's substitution, erased when raw.
    pub fn call_type(&self, session: &mut InferenceSession, call: CallId) -> Option<Type> {
        if session.guard.evaluating.enter(call).is_denied() {
            debug!(call = call.0, "call already being evaluated");
            return None;
        }
        let ranked = self.rank_call(session, call);
        session.guard.evaluating.leave(call);

        let ranked = ranked.ok()?;
        let best = ranked.unique_best()?;
        let method = self.db.method_info(best.method)?;
        let ty = best
            .substitution
            .substitute(&method.return_type)
            .unwrap_or_else(|| erasure(self.db, &method.return_type));
        Some(session.capture(&ty))
    }

    /// Argument types of `site`. Blocked nested calls have no type.
    pub(crate) fn argument_types(
        &self,
        session: &mut InferenceSession,
        site: &CallSite,
    ) -> Vec<ArgumentInfo> {
        site.args
            .iter()
            .map(|arg| match arg {
                ArgumentType::Known(ty) => ArgumentInfo {
                    ty: ty.as_ref().map(|ty| session.capture(ty)),
                    call: None,
                },
                ArgumentType::Call(call) => {
                    let ty = if session.guard.is_blocked(*call) {
                        None
                    } else {
                        self.call_type(session, *call)
                    };
                    ArgumentInfo {
                        ty,
                        call: Some(*call),
                    }
                }
            })
            .collect()
    }

    fn candidate_substitution(
        &self,
        session: &mut InferenceSession,
        site: &CallSite,
        method: &MethodInfo,
        args: &[ArgumentInfo],
    ) -> Substitution {
        let type_params = method.type_params.as_slice();
        if type_params.is_empty() {
            return site.partial.clone();
        }
        if !site.explicit_type_args.is_empty() {
            if site.explicit_type_args.len() != type_params.len() {
                return site.partial.with_all_unbound(type_params);
            }
            let explicit = Substitution::from_pairs(
                type_params
                    .iter()
                    .copied()
                    .zip(site.explicit_type_args.iter().cloned()),
            );
            return site.partial.merge(&explicit);
        }

        let request = InferenceRequest::new(method, args, &site.partial).at_call(site.id);
        self.infer_type_arguments(session, &request)
    }

    fn applicability(
        &self,
        method: &MethodInfo,
        substitution: &Substitution,
        args: &[ArgumentInfo],
    ) -> Applicability {
        let formals: Vec<Type> = method
            .params
            .iter()
            .map(|param| {
                substitution
                    .substitute(&param.ty)
                    .unwrap_or_else(|| erasure(self.db, &param.ty))
            })
            .collect();

        if args.len() == formals.len() {
            if self.all_compatible(&formals, args, true) {
                return Applicability::Exact;
            }
            if self.all_compatible(&formals, args, false) {
                return Applicability::Boxing;
            }
        }

        if method.is_varargs
            && let Some((last, fixed)) = formals.split_last()
            && let Some(component) = last.array_component()
            && args.len() >= fixed.len()
        {
            let (fixed_args, rest) = args.split_at(fixed.len());
            let fits = self.all_compatible(fixed, fixed_args, false)
                && rest.iter().all(|arg| self.compatible(component, arg, false));
            if fits {
                return Applicability::VarArgs;
            }
        }
        Applicability::NotApplicable
    }

    fn all_compatible(&self, formals: &[Type], args: &[ArgumentInfo], strict: bool) -> bool {
        formals
            .iter()
            .zip(args)
            .all(|(formal, arg)| self.compatible(formal, arg, strict))
    }

    /// Arguments with no known type fit any formal.
    fn compatible(&self, formal: &Type, arg: &ArgumentInfo, strict: bool) -> bool {
        match &arg.ty {
            None | Some(Type::Unknown) => true,
            Some(ty) if strict => is_subtype_no_boxing(self.db, formal, ty),
            Some(ty) => is_assignable_from(self.db, formal, ty),
        }
    }
}

#[cfg(test)]
#[path = "../tests/overload_tests.rs"]
mod tests;
