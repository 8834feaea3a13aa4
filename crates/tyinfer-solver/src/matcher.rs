//! Structural matcher.
//!
//! Matches a pattern type that mentions one free type parameter (the
//! *target*) against a concrete argument type and reports what the
//! argument says about the target.
//!
//! [`TypeMatcher::constrain`] is the entry used by everything above the
//! matcher. It boxes primitive arguments and brings the two sides into the
//! same class frame through the supertype oracle before handing off to the
//! recursive [`TypeMatcher::match_types`]:
//!
//! | Position | Lifted side |
//! |----------|-------------|
//! | contravariant (formal vs argument) | argument, into the formal's class |
//! | covariant (return vs expected) | formal, into the expected type's class |
//!
//! Matching is pure: inputs are never modified and every rule terminates
//! because it recurses into strictly smaller types.

use crate::constraint::{Constraint, ConstraintKind, MatchOutcome};
use crate::db::TypeDatabase;
use crate::type_ops::box_primitive;
use crate::types::{ClassId, ClassType, Type, TypeParamId, Wildcard};
use tracing::trace;
use tyinfer_common::limits::MAX_WILDCARD_CAPTURE_DEPTH;

/// Matches patterns against arguments for one target parameter.
pub struct TypeMatcher<'a> {
    db: &'a dyn TypeDatabase,
    target: TypeParamId,
}

impl<'a> TypeMatcher<'a> {
    pub fn new(db: &'a dyn TypeDatabase, target: TypeParamId) -> Self {
        Self { db, target }
    }

    pub fn target(&self) -> TypeParamId {
        self.target
    }

    fn is_target(&self, ty: &Type) -> bool {
        matches!(ty, Type::Param(id) if *id == self.target)
    }

    /// Constrain the target by matching `param` against `arg`.
    ///
    /// `contravariant` is true when `arg` flows into `param` (an argument
    /// passed to a formal) and false when `param` flows into `arg` (a
    /// declared return type checked against an expected type).
    pub fn constrain(&self, param: &Type, arg: &Type, contravariant: bool) -> MatchOutcome {
        let outcome = self.constrain_inner(param, arg, contravariant);
        trace!(
            target = self.target.0,
            ?param,
            ?arg,
            contravariant,
            ?outcome,
            "TypeMatcher::constrain"
        );
        outcome
    }

    fn constrain_inner(&self, param: &Type, arg: &Type, contravariant: bool) -> MatchOutcome {
        if let (Type::Array(param_component), Type::Array(arg_component)) = (param, arg) {
            return self.constrain_inner(param_component, arg_component, contravariant);
        }
        if !matches!(param, Type::Class(_) | Type::Param(_)) {
            return MatchOutcome::NoInfo;
        }

        let boxed;
        let arg = match arg {
            Type::Primitive(kind) => match box_primitive(self.db, *kind) {
                Some(ty) => {
                    boxed = ty;
                    &boxed
                }
                None => return MatchOutcome::NoInfo,
            },
            _ => arg,
        };

        if self.is_target(param) {
            return if arg.is_null() || arg.is_unknown() {
                MatchOutcome::NoInfo
            } else {
                Constraint::supertype(arg.clone()).into()
            };
        }
        let Type::Class(param_class) = param else {
            return MatchOutcome::NoInfo;
        };

        if contravariant {
            match self.lift_into(arg, param_class.class, 0) {
                Some(lifted) => {
                    self.match_types(param, &Type::from_class_type(lifted), ConstraintKind::Supertype, 0)
                }
                None => MatchOutcome::NoInfo,
            }
        } else {
            let Type::Class(arg_class) = arg else {
                return MatchOutcome::NoInfo;
            };
            match self.db.ancestor_args(param_class, arg_class.class) {
                Some(args) => {
                    let lifted = Type::class(arg_class.class, args);
                    self.match_types(&lifted, arg, ConstraintKind::Supertype, 0)
                }
                None => MatchOutcome::NoInfo,
            }
        }
    }

    /// `ty` seen as an instance of `class`. Type parameters are lifted
    /// through their bounds and intersections through their components.
    fn lift_into(&self, ty: &Type, class: ClassId, depth: usize) -> Option<ClassType> {
        if depth > MAX_LIFT_DEPTH {
            return None;
        }
        match ty {
            Type::Class(class_type) => self
                .db
                .ancestor_args(class_type, class)
                .map(|args| ClassType::new(class, args)),
            Type::Param(param) => {
                let bounds = self
                    .db
                    .type_param_info(*param)
                    .map(|info| info.bounds.clone())
                    .unwrap_or_default();
                if bounds.is_empty() {
                    let object = self.db.object_type();
                    return self.lift_into(&object, class, depth + 1);
                }
                bounds
                    .iter()
                    .find_map(|bound| self.lift_into(bound, class, depth + 1))
            }
            Type::Intersection(components) => components
                .iter()
                .find_map(|component| self.lift_into(component, class, depth + 1)),
            _ => None,
        }
    }

    /// The recursive matcher.
    pub fn match_types(
        &self,
        pattern: &Type,
        arg: &Type,
        kind: ConstraintKind,
        depth: u32,
    ) -> MatchOutcome {
        // A capture is reopened to its wildcard.
        let reopened;
        let arg = match arg {
            Type::Captured(captured) => {
                reopened = Type::wildcard(captured.wildcard.clone());
                &reopened
            }
            _ => arg,
        };

        if self.is_target(pattern) {
            if arg.is_wildcard() && depth >= MAX_WILDCARD_CAPTURE_DEPTH {
                return MatchOutcome::Failed;
            }
            if arg.is_null() || arg.is_unknown() {
                return MatchOutcome::NoInfo;
            }
            return Constraint::new(arg.clone(), kind).into();
        }

        match (pattern, arg) {
            (Type::Array(pattern_component), Type::Array(arg_component)) => {
                self.match_types(pattern_component, arg_component, kind, depth)
            }
            (Type::Wildcard(wildcard), _) => self.match_wildcard(wildcard, arg, depth),
            (Type::Class(pattern_class), Type::Class(arg_class))
                if pattern_class.class == arg_class.class =>
            {
                self.match_same_class(pattern_class, arg_class, depth)
            }
            _ => MatchOutcome::NoInfo,
        }
    }

    fn match_wildcard(&self, wildcard: &Wildcard, arg: &Type, depth: u32) -> MatchOutcome {
        let Some(bound) = &wildcard.bound else {
            return MatchOutcome::NoInfo;
        };
        let kind = if wildcard.is_extends() {
            ConstraintKind::Supertype
        } else {
            ConstraintKind::Subtype
        };

        match arg {
            Type::Wildcard(arg_wildcard) => {
                if arg_wildcard.kind != wildcard.kind {
                    return MatchOutcome::NoInfo;
                }
                match &arg_wildcard.bound {
                    Some(arg_bound) => self.match_types(bound, arg_bound, kind, depth),
                    None => MatchOutcome::NoInfo,
                }
            }
            _ if self.is_target(bound) => self.match_types(bound, arg, kind, depth),
            _ => match (bound, arg) {
                (Type::Array(bound_component), Type::Array(arg_component)) => {
                    self.match_types(bound_component, arg_component, kind, depth)
                }
                (Type::Class(bound_class), Type::Class(arg_class)) => {
                    let pairs = if wildcard.is_extends() {
                        // `? extends C<..>` against a subclass: lift the argument.
                        self.db
                            .ancestor_args(arg_class, bound_class.class)
                            .map(|lifted| zip_args(&bound_class.args, &lifted))
                    } else {
                        // `? super C<..>` against a superclass: lift the bound.
                        self.db
                            .ancestor_args(bound_class, arg_class.class)
                            .map(|lifted| zip_args(&lifted, &arg_class.args))
                    };
                    match pairs {
                        Some(pairs) => self.match_bound_arguments(pairs, depth),
                        None => MatchOutcome::NoInfo,
                    }
                }
                _ => MatchOutcome::NoInfo,
            },
        }
    }

    fn match_same_class(
        &self,
        pattern: &ClassType,
        arg: &ClassType,
        depth: u32,
    ) -> MatchOutcome {
        if arg.args.is_empty() && !pattern.args.is_empty() {
            // Raw argument: a target sitting directly at an argument
            // position must be erased.
            let direct = pattern.args.iter().any(|pattern_arg| {
                self.is_target(pattern_arg)
                    || pattern_arg
                        .as_wildcard()
                        .and_then(|wildcard| wildcard.bound.as_ref())
                        .is_some_and(|bound| self.is_target(bound))
            });
            return if direct {
                MatchOutcome::Raw
            } else {
                MatchOutcome::NoInfo
            };
        }

        let promoted: Vec<Type> = arg
            .args
            .iter()
            .enumerate()
            .map(|(index, arg_arg)| self.promote_unbounded(arg, index, arg_arg))
            .collect();
        self.match_arguments(zip_args(&pattern.args, &promoted), depth)
    }

    /// Per-argument matching at `Equals`. A non-wildcard result returns at
    /// once; a single wildcard capture is held to the end and a second one
    /// is ambiguous.
    fn match_arguments(&self, pairs: Vec<(Type, Type)>, depth: u32) -> MatchOutcome {
        let mut captured: Option<MatchOutcome> = None;
        for (pattern_arg, arg_arg) in pairs {
            let outcome = self.match_types(&pattern_arg, &arg_arg, ConstraintKind::Equals, depth + 1);
            match &outcome {
                MatchOutcome::NoInfo => continue,
                MatchOutcome::Constraint(constraint) if constraint.ty.is_wildcard() => {
                    if captured.is_some() {
                        return MatchOutcome::Failed;
                    }
                    captured = Some(outcome);
                }
                _ => return outcome,
            }
        }
        captured.unwrap_or(MatchOutcome::NoInfo)
    }

    /// Per-argument matching under a wildcard bound at `Equals`. The first
    /// result wins, whatever its kind, unless two or more positions capture
    /// wildcards.
    fn match_bound_arguments(&self, pairs: Vec<(Type, Type)>, depth: u32) -> MatchOutcome {
        let mut first: Option<MatchOutcome> = None;
        let mut captures = 0usize;
        for (pattern_arg, arg_arg) in pairs {
            let outcome = self.match_types(&pattern_arg, &arg_arg, ConstraintKind::Equals, depth + 1);
            if matches!(outcome, MatchOutcome::NoInfo) {
                continue;
            }
            if let MatchOutcome::Constraint(constraint) = &outcome
                && constraint.ty.is_wildcard()
            {
                captures += 1;
            }
            first.get_or_insert(outcome);
        }
        if captures >= 2 {
            return MatchOutcome::Failed;
        }
        first.unwrap_or(MatchOutcome::NoInfo)
    }

    /// `?` at a position whose declared parameter has a non-root bound
    /// becomes `? extends <bound>`.
    fn promote_unbounded(&self, class_type: &ClassType, index: usize, arg: &Type) -> Type {
        let Some(wildcard) = arg.as_wildcard() else {
            return arg.clone();
        };
        if wildcard.bound.is_some() {
            return arg.clone();
        }
        let Some(info) = self.db.class_info(class_type.class) else {
            return arg.clone();
        };
        let Some(param) = info.type_params.get(index) else {
            return arg.clone();
        };
        let Some(bound) = self
            .db
            .type_param_info(*param)
            .and_then(|param_info| param_info.primary_bound().cloned())
        else {
            return arg.clone();
        };
        if self.db.well_known().is_object(&bound)
            || info.type_params.iter().any(|own| bound.mentions(*own))
        {
            return arg.clone();
        }
        Type::extends(bound)
    }
}

const MAX_LIFT_DEPTH: usize = 32;

fn zip_args(patterns: &[Type], args: &[Type]) -> Vec<(Type, Type)> {
    if patterns.len() != args.len() {
        return Vec::new();
    }
    patterns.iter().cloned().zip(args.iter().cloned()).collect()
}

/// Direct matcher access: the type `target` takes when `param` is matched
/// against `arg`, or `None` when the match carries no type.
pub fn substitution_for_type_parameter(
    db: &dyn TypeDatabase,
    target: TypeParamId,
    param: &Type,
    arg: &Type,
    contravariant: bool,
) -> Option<Type> {
    TypeMatcher::new(db, target)
        .constrain(param, arg, contravariant)
        .into_type()
}

#[cfg(test)]
#[path = "../tests/matcher_tests.rs"]
mod tests;
