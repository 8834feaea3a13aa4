//! Cross-parameter reconciliation.
//!
//! A single sweep in declaration order: an unresolved parameter `P` is
//! matched against each resolved sibling `Q` through `Q`'s declared
//! bounds. With `<T, L extends List<T>>` and `L := ArrayList<String>`,
//! the bound `List<T>` against `ArrayList<String>` gives `T := String`.
//!
//! Parameters resolved during the sweep are visible to later ones, but
//! the sweep never restarts.

use crate::constraint::{ConstraintKind, MatchOutcome};
use crate::infer::InferenceEngine;
use crate::lub::lub;
use crate::matcher::TypeMatcher;
use crate::substitution::Substitution;
use crate::types::{Type, TypeParamId};
use tracing::trace;

impl InferenceEngine<'_> {
    pub(crate) fn reconcile(
        &self,
        type_params: &[TypeParamId],
        resolved: &mut [Option<Type>],
        partial: &Substitution,
    ) {
        for index in 0..type_params.len() {
            if resolved[index].is_some() {
                continue;
            }
            let param = type_params[index];
            let answer = self.from_sibling_bounds(param, index, type_params, resolved, partial);
            if answer.is_some() {
                trace!(param = param.0, ?answer, "reconcile");
                resolved[index] = answer;
            }
        }
    }

    fn from_sibling_bounds(
        &self,
        param: TypeParamId,
        index: usize,
        type_params: &[TypeParamId],
        resolved: &[Option<Type>],
        partial: &Substitution,
    ) -> Option<Type> {
        let matcher = TypeMatcher::new(self.db, param);
        let mut answer: Option<Type> = None;
        // An incompatible lub stops the lower bounds; an exact hit still wins.
        let mut lower_failed = false;

        for (other_index, other) in type_params.iter().enumerate() {
            if other_index == index {
                continue;
            }
            let Some(other_ty) = &resolved[other_index] else {
                continue;
            };
            let Some(info) = self.db.type_param_info(*other) else {
                continue;
            };
            for bound in &info.bounds {
                let Some(bound) = partial.substitute(bound) else {
                    continue;
                };
                let MatchOutcome::Constraint(constraint) = matcher.constrain(&bound, other_ty, true)
                else {
                    continue;
                };
                match constraint.kind {
                    ConstraintKind::Equals => return Some(constraint.ty),
                    ConstraintKind::Supertype if !lower_failed => {
                        answer = match answer {
                            None => Some(constraint.ty),
                            Some(previous) => lub(self.db, &previous, &constraint.ty),
                        };
                        lower_failed = answer.is_none();
                    }
                    ConstraintKind::Supertype => {}
                    ConstraintKind::Subtype => {}
                }
            }
        }
        answer
    }
}

#[cfg(test)]
#[path = "../tests/reconcile_tests.rs"]
mod tests;
