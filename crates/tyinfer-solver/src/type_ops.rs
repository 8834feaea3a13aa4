//! Small type operations shared by the relations and the matcher:
//! boxing, unboxing, erasure and upper bounds.

use crate::db::TypeDatabase;
use crate::types::{PrimitiveKind, Type, TypeParamId};

/// Boxing conversion. `None` when `kind` has no wrapper in this database
/// (always the case for `void`).
pub fn box_primitive(db: &dyn TypeDatabase, kind: PrimitiveKind) -> Option<Type> {
    db.well_known().wrapper(kind).map(Type::raw)
}

/// Unboxing conversion of a wrapper class type.
pub fn unbox(db: &dyn TypeDatabase, ty: &Type) -> Option<PrimitiveKind> {
    let class = ty.as_class()?;
    db.well_known().unwrapped(class.class)
}

/// Box `ty` if it is a primitive; other types pass through.
pub fn box_if_primitive(db: &dyn TypeDatabase, ty: &Type) -> Option<Type> {
    match ty {
        Type::Primitive(kind) => box_primitive(db, *kind),
        _ => Some(ty.clone()),
    }
}

/// Erasure of a type parameter: the erasure of its primary bound, or the
/// root class.
pub fn type_param_erasure(db: &dyn TypeDatabase, param: TypeParamId) -> Type {
    let mut current = param;
    // A bound that is itself a parameter erases through that parameter.
    // Malformed cyclic bounds fall back to the root class.
    for _ in 0..MAX_BOUND_CHAIN {
        let bound = db
            .type_param_info(current)
            .and_then(|info| info.primary_bound().cloned());
        match bound {
            Some(Type::Param(next)) => current = next,
            Some(bound @ (Type::Class(_) | Type::Array(_))) => return erasure(db, &bound),
            _ => break,
        }
    }
    db.object_type()
}

const MAX_BOUND_CHAIN: usize = 32;

/// Type erasure.
pub fn erasure(db: &dyn TypeDatabase, ty: &Type) -> Type {
    match ty {
        Type::Param(param) => type_param_erasure(db, *param),
        Type::Class(class_type) => Type::raw(class_type.class),
        Type::Array(component) => Type::array(erasure(db, component)),
        Type::Wildcard(_) | Type::Captured(_) => erasure(db, &upper_bound(db, ty)),
        Type::Intersection(components) => components
            .first()
            .map(|first| erasure(db, first))
            .unwrap_or_else(|| db.object_type()),
        Type::Primitive(_) | Type::Null | Type::Unknown => ty.clone(),
    }
}

/// The upper bound a wildcard, capture or type parameter stands for.
/// Other types are their own upper bound.
pub fn upper_bound(db: &dyn TypeDatabase, ty: &Type) -> Type {
    match ty {
        Type::Wildcard(wildcard) => wildcard
            .extends_bound()
            .cloned()
            .unwrap_or_else(|| db.object_type()),
        Type::Captured(captured) => captured
            .wildcard
            .extends_bound()
            .cloned()
            .unwrap_or_else(|| db.object_type()),
        Type::Param(param) => {
            let bounds = db
                .type_param_info(*param)
                .map(|info| info.bounds.clone())
                .unwrap_or_default();
            match bounds.len() {
                0 => db.object_type(),
                1 => bounds.into_iter().next().unwrap_or_else(|| db.object_type()),
                _ => Type::intersection(bounds),
            }
        }
        _ => ty.clone(),
    }
}

#[cfg(test)]
#[path = "../tests/type_ops_tests.rs"]
mod tests;
