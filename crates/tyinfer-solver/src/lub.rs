//! Least upper bound.
//!
//! `lub` is commutative: every tie is broken by a canonical order rather
//! than by argument position, and the minimal common supertypes of an
//! intersection result are sorted (classes before interfaces, then by id).
//!
//! Recursive generic supertypes (`Integer implements Comparable<Integer>`)
//! would make the least containing type argument infinite; the argument
//! lub is cut off at `MAX_LUB_DEPTH` and becomes `?`.

use crate::db::TypeDatabase;
use crate::subtype::is_assignable_from;
use crate::type_ops::{box_if_primitive, upper_bound};
use crate::types::{ClassId, ClassType, Type};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use tracing::trace;
use tyinfer_common::limits::{MAX_LUB_DEPTH, MAX_SUPERTYPE_CLOSURE};

/// Least upper bound of two types. `None` when either side is `Unknown`
/// or a primitive with no wrapper.
pub fn lub(db: &dyn TypeDatabase, a: &Type, b: &Type) -> Option<Type> {
    let result = LubComputer { db }.lub(a, b, 0);
    trace!(?a, ?b, ?result, "lub");
    result
}

struct LubComputer<'a> {
    db: &'a dyn TypeDatabase,
}

impl LubComputer<'_> {
    fn lub(&self, a: &Type, b: &Type, depth: u32) -> Option<Type> {
        if a.is_unknown() || b.is_unknown() {
            return None;
        }
        if a == b {
            return Some(a.clone());
        }
        let a = box_if_primitive(self.db, a)?;
        let b = box_if_primitive(self.db, b)?;
        if a.is_null() {
            return Some(b);
        }
        if b.is_null() {
            return Some(a);
        }

        match (
            is_assignable_from(self.db, &a, &b),
            is_assignable_from(self.db, &b, &a),
        ) {
            (true, true) => return Some(canonical_min(a, b)),
            (true, false) => return Some(a),
            (false, true) => return Some(b),
            (false, false) => {}
        }

        if is_variable(&a) || is_variable(&b) {
            let a = self.concrete_bound(&a);
            let b = self.concrete_bound(&b);
            return self.lub(&a, &b, depth);
        }

        match (&a, &b) {
            (Type::Array(left), Type::Array(right)) => {
                if left.is_primitive() || right.is_primitive() {
                    return Some(self.db.object_type());
                }
                Some(
                    self.lub(left, right, depth)
                        .map(Type::array)
                        .unwrap_or_else(|| self.db.object_type()),
                )
            }
            (Type::Array(_), _) | (_, Type::Array(_)) => Some(self.db.object_type()),
            _ => Some(self.lub_classes(&a, &b, depth)),
        }
    }

    fn lub_classes(&self, a: &Type, b: &Type, depth: u32) -> Type {
        let left = self.closure(a);
        let right = self.closure(b);
        let common: Vec<ClassId> = left.iter().copied().filter(|id| right.contains(id)).collect();

        let mut minimal: Vec<ClassId> = common
            .iter()
            .copied()
            .filter(|candidate| {
                !common
                    .iter()
                    .any(|other| other != candidate && self.db.is_subclass(*other, *candidate))
            })
            .collect();
        minimal.sort_by_key(|id| {
            let is_interface = self
                .db
                .class_info(*id)
                .is_some_and(|info| info.is_interface());
            (is_interface, *id)
        });

        let mut components: Vec<Type> = minimal
            .into_iter()
            .map(|class| self.parameterize(class, a, b, depth))
            .collect();
        match components.len() {
            0 => self.db.object_type(),
            1 => components.pop().unwrap_or_else(|| self.db.object_type()),
            _ => Type::intersection(components),
        }
    }

    /// `class` with the least containing arguments of both sides' views of it.
    fn parameterize(&self, class: ClassId, a: &Type, b: &Type, depth: u32) -> Type {
        let (Some(left), Some(right)) = (self.args_at(a, class), self.args_at(b, class)) else {
            return Type::raw(class);
        };
        if left.is_empty() || right.is_empty() || left.len() != right.len() {
            return Type::raw(class);
        }
        let args = left
            .iter()
            .zip(right.iter())
            .map(|(x, y)| self.least_containing(x, y, depth))
            .collect();
        Type::class(class, args)
    }

    fn least_containing(&self, x: &Type, y: &Type, depth: u32) -> Type {
        if x == y {
            return x.clone();
        }
        if depth >= MAX_LUB_DEPTH {
            return Type::unbounded();
        }
        let (x_super, y_super) = (super_bound(x), super_bound(y));
        match (x_super, y_super) {
            // `? super A` and `? super B`: the lower of the two bounds, if ordered.
            (Some(bx), Some(by)) => {
                if is_assignable_from(self.db, bx, by) {
                    Type::super_of(by.clone())
                } else if is_assignable_from(self.db, by, bx) {
                    Type::super_of(bx.clone())
                } else {
                    Type::unbounded()
                }
            }
            (Some(_), None) | (None, Some(_)) => Type::unbounded(),
            (None, None) => {
                let ux = upper_bound(self.db, x);
                let uy = upper_bound(self.db, y);
                match self.lub(&ux, &uy, depth + 1) {
                    Some(bound) if !self.db.well_known().is_object(&bound) => Type::extends(bound),
                    _ => Type::unbounded(),
                }
            }
        }
    }

    /// Follow upper bounds until the type is no longer a variable.
    fn concrete_bound(&self, ty: &Type) -> Type {
        let mut current = ty.clone();
        for _ in 0..MAX_BOUND_CHAIN {
            if !is_variable(&current) {
                return current;
            }
            current = upper_bound(self.db, &current);
        }
        self.db.object_type()
    }

    /// Type arguments of `class` as seen from `ty` (or from the first
    /// intersection component that reaches it).
    fn args_at(&self, ty: &Type, class: ClassId) -> Option<Vec<Type>> {
        match ty {
            Type::Class(class_type) => self.db.ancestor_args(class_type, class),
            Type::Intersection(components) => components
                .iter()
                .find_map(|component| self.args_at(component, class)),
            _ => None,
        }
    }

    /// Every class reachable from `ty` through declared supertypes,
    /// including the root class.
    fn closure(&self, ty: &Type) -> Vec<ClassId> {
        let mut seen: FxHashSet<ClassId> = FxHashSet::default();
        let mut order = Vec::new();
        let mut queue: VecDeque<ClassId> = VecDeque::new();
        for start in roots(ty) {
            queue.push_back(start);
        }
        queue.push_back(self.db.well_known().object);

        while let Some(class) = queue.pop_front() {
            if !seen.insert(class) {
                continue;
            }
            order.push(class);
            if order.len() >= MAX_SUPERTYPE_CLOSURE {
                break;
            }
            if let Some(info) = self.db.class_info(class) {
                queue.extend(info.supertypes.iter().map(|supertype| supertype.class));
            }
        }
        order
    }
}

const MAX_BOUND_CHAIN: usize = 32;

fn roots(ty: &Type) -> Vec<ClassId> {
    match ty {
        Type::Class(class_type) => vec![class_type.class],
        Type::Intersection(components) => components.iter().flat_map(roots).collect(),
        _ => Vec::new(),
    }
}

fn is_variable(ty: &Type) -> bool {
    matches!(ty, Type::Param(_) | Type::Wildcard(_) | Type::Captured(_))
}

fn super_bound(ty: &Type) -> Option<&Type> {
    match ty {
        Type::Wildcard(wildcard) => wildcard.super_bound(),
        Type::Captured(captured) => captured.wildcard.super_bound(),
        _ => None,
    }
}

/// Deterministic choice between mutually assignable types.
fn canonical_min(a: Type, b: Type) -> Type {
    // A parameterized type is preferred over the raw form of the same class.
    if let (Some(x), Some(y)) = (a.as_class(), b.as_class())
        && x.class == y.class
    {
        match (is_raw_form(x), is_raw_form(y)) {
            (true, false) => return b,
            (false, true) => return a,
            _ => {}
        }
    }
    if a <= b { a } else { b }
}

fn is_raw_form(class_type: &ClassType) -> bool {
    class_type.args.is_empty()
}

#[cfg(test)]
#[path = "../tests/lub_tests.rs"]
mod tests;
