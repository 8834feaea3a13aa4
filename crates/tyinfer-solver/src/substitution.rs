//! Substitutions: immutable maps from type parameters to bindings.
//!
//! A parameter can be in three states:
//!
//! | State | Meaning | `substitute(T)` |
//! |-------|---------|-----------------|
//! | absent | identity / not inferred | `Some(T)` |
//! | `Binding::Type(X)` | resolved | `Some(X)` |
//! | `Binding::Unbound` | explicitly raw | `None` (erased) |
//!
//! Erasure propagates outward: a generic class whose argument erases
//! becomes raw, and a wildcard whose bound erases becomes `?`.

use crate::types::{ClassType, Type, TypeParamId, Wildcard};
use indexmap::IndexMap;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Binding {
    Type(Type),
    /// Explicitly raw: the parameter is erased.
    Unbound,
}

impl Binding {
    pub fn as_type(&self) -> Option<&Type> {
        match self {
            Binding::Type(ty) => Some(ty),
            Binding::Unbound => None,
        }
    }

    pub fn is_unbound(&self) -> bool {
        matches!(self, Binding::Unbound)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Substitution {
    map: IndexMap<TypeParamId, Binding>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (TypeParamId, Type)>) -> Self {
        Self {
            map: pairs
                .into_iter()
                .map(|(param, ty)| (param, Binding::Type(ty)))
                .collect(),
        }
    }

    /// Every parameter in `params` bound to `Unbound`.
    pub fn raw(params: &[TypeParamId]) -> Self {
        Self::new().with_all_unbound(params)
    }

    pub fn get(&self, param: TypeParamId) -> Option<&Binding> {
        self.map.get(&param)
    }

    /// The resolved type for `param`, if it is bound to one.
    pub fn get_type(&self, param: TypeParamId) -> Option<&Type> {
        self.map.get(&param).and_then(Binding::as_type)
    }

    pub fn contains(&self, param: TypeParamId) -> bool {
        self.map.contains_key(&param)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeParamId, &Binding)> {
        self.map.iter().map(|(param, binding)| (*param, binding))
    }

    /// A copy with `param` bound to `binding`; an existing binding is replaced.
    pub fn put(&self, param: TypeParamId, binding: Binding) -> Self {
        let mut map = self.map.clone();
        map.insert(param, binding);
        Self { map }
    }

    pub fn put_type(&self, param: TypeParamId, ty: Type) -> Self {
        self.put(param, Binding::Type(ty))
    }

    /// Compose by override: bindings of `other` win.
    pub fn merge(&self, other: &Substitution) -> Self {
        let mut map = self.map.clone();
        for (param, binding) in &other.map {
            map.insert(*param, binding.clone());
        }
        Self { map }
    }

    /// A copy with every parameter in `params` bound to `Unbound`.
    pub fn with_all_unbound(&self, params: &[TypeParamId]) -> Self {
        let mut map = self.map.clone();
        for param in params {
            map.insert(*param, Binding::Unbound);
        }
        Self { map }
    }

    /// Whether every parameter in `params` is bound to `Unbound`.
    pub fn is_raw_for(&self, params: &[TypeParamId]) -> bool {
        params
            .iter()
            .all(|param| self.get(*param).is_some_and(Binding::is_unbound))
    }

    /// Apply the substitution. `None` means the type erased entirely.
    pub fn substitute(&self, ty: &Type) -> Option<Type> {
        if self.map.is_empty() {
            return Some(ty.clone());
        }
        match ty {
            Type::Param(param) => match self.map.get(param) {
                Some(Binding::Type(bound)) => Some(bound.clone()),
                Some(Binding::Unbound) => None,
                None => Some(ty.clone()),
            },
            Type::Array(component) => self.substitute(component).map(Type::array),
            Type::Class(class_type) => Some(match self.substitute_class(class_type) {
                Some(substituted) => Type::from_class_type(substituted),
                None => Type::raw(class_type.class),
            }),
            Type::Wildcard(wildcard) => Some(self.substitute_wildcard(wildcard)),
            Type::Intersection(components) => {
                let substituted: Option<Vec<Type>> = components
                    .iter()
                    .map(|component| self.substitute(component))
                    .collect();
                substituted.map(Type::intersection)
            }
            Type::Primitive(_) | Type::Captured(_) | Type::Null | Type::Unknown => {
                Some(ty.clone())
            }
        }
    }

    /// Substitute the arguments of a class type. `None` when any argument
    /// erased, i.e. the result is the raw class.
    pub fn substitute_class(&self, class_type: &ClassType) -> Option<ClassType> {
        let args: Option<Vec<Type>> = class_type
            .args
            .iter()
            .map(|arg| self.substitute(arg))
            .collect();
        args.map(|args| ClassType::new(class_type.class, args))
    }

    fn substitute_wildcard(&self, wildcard: &Wildcard) -> Type {
        let Some(bound) = &wildcard.bound else {
            return Type::unbounded();
        };
        match self.substitute(bound) {
            None => Type::unbounded(),
            // `? extends T` with `T := ? extends X` collapses to `? extends X`.
            Some(Type::Wildcard(inner)) => {
                if inner.kind == wildcard.kind {
                    Type::Wildcard(inner)
                } else {
                    Type::unbounded()
                }
            }
            Some(substituted) => Type::wildcard(Wildcard {
                kind: wildcard.kind,
                bound: Some(substituted),
            }),
        }
    }
}

impl FromIterator<(TypeParamId, Binding)> for Substitution {
    fn from_iter<I: IntoIterator<Item = (TypeParamId, Binding)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/substitution_tests.rs"]
mod tests;
