//! Assignability between types.
//!
//! Two entry points share one checker:
//!
//! - [`is_assignable_from`]: loose assignment context (boxing and unboxing
//!   allowed), used by the aggregator, the lub computation and the boxing
//!   phase of overload ranking.
//! - [`is_subtype_no_boxing`]: strict context, used by the first phase of
//!   overload ranking.
//!
//! `Unknown` carries no information and is never assignable in either
//! direction, not even to itself.

use crate::db::TypeDatabase;
use crate::type_ops::{box_primitive, unbox, upper_bound};
use crate::types::{ClassType, Type, Wildcard, WildcardKind};
use tyinfer_common::limits::MAX_SUPERTYPE_CLOSURE;

/// Whether a value of type `source` may be assigned to `target`.
pub fn is_assignable_from(db: &dyn TypeDatabase, target: &Type, source: &Type) -> bool {
    SubtypeChecker::new(db, true).check(target, source)
}

/// Subtyping without boxing or unboxing conversions.
pub fn is_subtype_no_boxing(db: &dyn TypeDatabase, target: &Type, source: &Type) -> bool {
    SubtypeChecker::new(db, false).check(target, source)
}

struct SubtypeChecker<'a> {
    db: &'a dyn TypeDatabase,
    allow_boxing: bool,
    depth: usize,
}

impl<'a> SubtypeChecker<'a> {
    fn new(db: &'a dyn TypeDatabase, allow_boxing: bool) -> Self {
        Self {
            db,
            allow_boxing,
            depth: 0,
        }
    }

    fn check(&mut self, target: &Type, source: &Type) -> bool {
        // Type trees are finite; this only trips on malformed recursive bounds.
        if self.depth >= MAX_SUPERTYPE_CLOSURE {
            return false;
        }
        self.depth += 1;
        let result = self.check_inner(target, source);
        self.depth -= 1;
        result
    }

    fn check_inner(&mut self, target: &Type, source: &Type) -> bool {
        if target.is_unknown() || source.is_unknown() {
            return false;
        }
        if target == source {
            return true;
        }

        match (target, source) {
            (_, Type::Null) => true,
            (Type::Null, _) => false,

            (Type::Primitive(to), Type::Primitive(from)) => from.widens_to(*to),
            (Type::Primitive(to), _) => {
                self.allow_boxing && unbox(self.db, source).is_some_and(|from| from.widens_to(*to))
            }
            (_, Type::Primitive(from)) => {
                if !self.allow_boxing {
                    return false;
                }
                match box_primitive(self.db, *from) {
                    Some(boxed) => self.check(target, &boxed),
                    None => false,
                }
            }

            (Type::Wildcard(wildcard), _) => match &wildcard.bound {
                None => source.is_reference(),
                Some(bound) => self.check(bound, source),
            },
            (Type::Intersection(components), _) => {
                components.iter().all(|component| self.check(component, source))
            }
            (_, Type::Intersection(components)) => {
                components.iter().any(|component| self.check(target, component))
            }
            (_, Type::Wildcard(_) | Type::Captured(_)) => {
                let bound = upper_bound(self.db, source);
                self.check(target, &bound)
            }

            (_, Type::Param(param)) => {
                let bounds = self
                    .db
                    .type_param_info(*param)
                    .map(|info| info.bounds.clone())
                    .unwrap_or_default();
                if bounds.is_empty() {
                    return self.db.well_known().is_object(target);
                }
                bounds.iter().any(|bound| self.check(target, bound))
            }
            (Type::Param(_) | Type::Captured(_), _) => false,

            (Type::Array(to), Type::Array(from)) => {
                if to.is_primitive() || from.is_primitive() {
                    to == from
                } else {
                    self.check(to, from)
                }
            }
            (Type::Class(to), Type::Array(_)) => to.class == self.db.well_known().object,
            (Type::Array(_), _) => false,

            (Type::Class(to), Type::Class(from)) => self.class_assignable(to, from),
            (Type::Class(_), Type::Unknown) | (Type::Unknown, _) => false,
        }
    }

    fn class_assignable(&mut self, to: &ClassType, from: &ClassType) -> bool {
        if to.class == self.db.well_known().object {
            return true;
        }
        let Some(lifted) = self.db.ancestor_args(from, to.class) else {
            return false;
        };
        // Raw on either side: unchecked conversion.
        if to.args.is_empty() || lifted.is_empty() || to.args.len() != lifted.len() {
            return true;
        }
        to.args
            .iter()
            .zip(lifted.iter())
            .all(|(to_arg, from_arg)| self.contains(to_arg, from_arg))
    }

    /// Type-argument containment: `to_arg` contains `from_arg`.
    fn contains(&mut self, to_arg: &Type, from_arg: &Type) -> bool {
        let Type::Wildcard(wildcard) = to_arg else {
            return to_arg == from_arg;
        };
        let Some(bound) = &wildcard.bound else {
            return true;
        };
        match wildcard.kind {
            WildcardKind::Extends => match from_wildcard(from_arg) {
                Some(from) => match from.extends_bound() {
                    Some(from_bound) => self.check(bound, from_bound),
                    None => self.db.well_known().is_object(bound),
                },
                None => self.check(bound, from_arg),
            },
            WildcardKind::Super => match from_wildcard(from_arg) {
                Some(from) => match from.super_bound() {
                    Some(from_bound) => self.check(from_bound, bound),
                    None => false,
                },
                None => self.check(from_arg, bound),
            },
        }
    }
}

/// The wildcard behind a type argument: a plain wildcard, or a capture
/// whose bounds are still visible through containment.
fn from_wildcard(arg: &Type) -> Option<&Wildcard> {
    match arg {
        Type::Wildcard(wildcard) => Some(wildcard),
        Type::Captured(captured) => Some(&captured.wildcard),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../tests/subtype_tests.rs"]
mod tests;
