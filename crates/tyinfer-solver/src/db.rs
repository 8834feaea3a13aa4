//! The solver's view of the symbol model.
//!
//! `TypeDatabase` is the seam between the engine and whatever owns the
//! declarations. Lookups are required; the supertype-substitution oracle
//! has a provided implementation that walks declared supertypes, which an
//! embedding front end may replace with its own (cached) relation.

use crate::def::{ClassInfo, DefinitionStore, MethodInfo, TypeParamInfo, WellKnown};
use crate::substitution::Substitution;
use crate::types::{ClassId, ClassType, MethodId, Type, TypeParamId};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::sync::Arc;
use tyinfer_common::limits::MAX_SUPERTYPE_CLOSURE;

pub trait TypeDatabase {
    fn class_info(&self, id: ClassId) -> Option<Arc<ClassInfo>>;

    fn type_param_info(&self, id: TypeParamId) -> Option<Arc<TypeParamInfo>>;

    fn method_info(&self, id: MethodId) -> Option<Arc<MethodInfo>>;

    fn well_known(&self) -> &WellKnown;

    fn object_type(&self) -> Type {
        self.well_known().object_type()
    }

    /// Whether `class_type` is the raw form of a generic declaration.
    fn is_raw(&self, class_type: &ClassType) -> bool {
        class_type.args.is_empty()
            && self
                .class_info(class_type.class)
                .is_some_and(|info| info.is_generic())
    }

    /// Direct supertypes of `class_type`, with its type arguments
    /// substituted in. A raw type has raw supertypes.
    fn direct_supertypes(&self, class_type: &ClassType) -> Vec<ClassType> {
        let Some(info) = self.class_info(class_type.class) else {
            return Vec::new();
        };
        if info.supertypes.is_empty() {
            return Vec::new();
        }
        if class_type.args.is_empty() || class_type.args.len() != info.type_params.len() {
            return info
                .supertypes
                .iter()
                .map(|supertype| ClassType::raw(supertype.class))
                .collect();
        }

        let substitution = Substitution::from_pairs(
            info.type_params
                .iter()
                .copied()
                .zip(class_type.args.iter().cloned()),
        );
        info.supertypes
            .iter()
            .map(|supertype| match substitution.substitute_class(supertype) {
                Some(substituted) => substituted,
                None => ClassType::raw(supertype.class),
            })
            .collect()
    }

    /// Supertype-substitution oracle: the type arguments of `ancestor` as
    /// seen from `class_type`, or `None` when `ancestor` is not a supertype.
    ///
    /// An empty vector means the ancestor is reached in raw form (or is not
    /// generic). Every class reaches the root class.
    fn ancestor_args(&self, class_type: &ClassType, ancestor: ClassId) -> Option<Vec<Type>> {
        if class_type.class == ancestor {
            return Some(class_type.args.clone());
        }
        if ancestor == self.well_known().object {
            return Some(Vec::new());
        }

        let mut visited: FxHashSet<ClassId> = FxHashSet::default();
        let mut queue: VecDeque<ClassType> = VecDeque::new();
        visited.insert(class_type.class);
        queue.push_back(class_type.clone());

        while let Some(current) = queue.pop_front() {
            for supertype in self.direct_supertypes(&current) {
                if supertype.class == ancestor {
                    return Some(supertype.args);
                }
                if visited.len() >= MAX_SUPERTYPE_CLOSURE {
                    return None;
                }
                if visited.insert(supertype.class) {
                    queue.push_back(supertype);
                }
            }
        }
        None
    }

    /// Whether `class` is `ancestor` or inherits from it.
    fn is_subclass(&self, class: ClassId, ancestor: ClassId) -> bool {
        self.ancestor_args(&ClassType::raw(class), ancestor).is_some()
    }
}

impl TypeDatabase for DefinitionStore {
    fn class_info(&self, id: ClassId) -> Option<Arc<ClassInfo>> {
        self.class(id)
    }

    fn type_param_info(&self, id: TypeParamId) -> Option<Arc<TypeParamInfo>> {
        self.type_param(id)
    }

    fn method_info(&self, id: MethodId) -> Option<Arc<MethodInfo>> {
        self.method(id)
    }

    fn well_known(&self) -> &WellKnown {
        DefinitionStore::well_known(self)
    }
}

#[cfg(test)]
#[path = "../tests/db_tests.rs"]
mod tests;
