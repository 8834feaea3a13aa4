//! Declarations and their storage.
//!
//! The symbol model (classes, type parameters, method signatures) is owned
//! outside the solver. This module gives it a concrete shape and a
//! thread-safe store so the engine can be driven without a compiler front
//! end:
//!
//! - **Testing**: declarations can be built directly in unit tests
//! - **Sharing**: one `DefinitionStore` serves concurrent inference requests
//!
//! ## Declaration order
//!
//! Bounds and supertypes may refer to type parameters of the same
//! declaration, so declarations are created in two steps: first the
//! declaration (which allocates its id), then its type parameters, then
//! the parts that mention them.
//!
//! ```ignore
//! let store = DefinitionStore::new();
//! let list = store.declare_class("List", ClassKind::Interface);
//! let e = store.declare_type_param("E", TypeParamOwner::Class(list));
//! store.add_supertype(list, ClassType::new(collection, vec![Type::param(e)]));
//! ```

use crate::types::{ClassId, ClassType, MethodId, PrimitiveKind, Type, TypeParamId};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::trace;

// =============================================================================
// Declaration data
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    Class,
    Interface,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Package,
    Private,
}

/// A class or interface declaration.
#[derive(Clone, Debug)]
pub struct ClassInfo {
    pub id: ClassId,
    pub name: Arc<str>,
    pub kind: ClassKind,
    pub type_params: SmallVec<[TypeParamId; 2]>,
    /// Direct supertypes, written in terms of `type_params`.
    pub supertypes: Vec<ClassType>,
}

impl ClassInfo {
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }
}

/// The declaration a type parameter belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeParamOwner {
    Method(MethodId),
    Class(ClassId),
}

/// A declared type parameter.
#[derive(Clone, Debug)]
pub struct TypeParamInfo {
    pub id: TypeParamId,
    pub name: Arc<str>,
    /// Upper bounds in declaration order; the first one is primary.
    pub bounds: Vec<Type>,
    pub owner: TypeParamOwner,
}

impl TypeParamInfo {
    pub fn primary_bound(&self) -> Option<&Type> {
        self.bounds.first()
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    #[default]
    Method,
    Constructor,
}

/// A formal parameter of a method signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamInfo {
    pub name: Arc<str>,
    pub ty: Type,
}

impl ParamInfo {
    pub fn new(name: &str, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A method or constructor signature.
#[derive(Clone, Debug)]
pub struct MethodInfo {
    pub id: MethodId,
    pub name: Arc<str>,
    pub kind: MethodKind,
    pub owner: Option<ClassId>,
    pub visibility: Visibility,
    pub type_params: SmallVec<[TypeParamId; 2]>,
    pub params: Vec<ParamInfo>,
    /// The trailing parameter is variable-arity; its declared type is an array.
    pub is_varargs: bool,
    pub return_type: Type,
}

impl MethodInfo {
    /// Formal parameter for argument position `index`, following variable
    /// arity past the end of the list.
    pub fn param_for_arg(&self, index: usize) -> Option<&ParamInfo> {
        match self.params.get(index) {
            Some(param) => Some(param),
            None if self.is_varargs => self.params.last(),
            None => None,
        }
    }

    /// Whether `index` addresses the variable-arity parameter.
    pub fn is_varargs_slot(&self, index: usize) -> bool {
        self.is_varargs && !self.params.is_empty() && index + 1 >= self.params.len()
    }
}

// =============================================================================
// Well-known declarations
// =============================================================================

/// Declarations the type model needs by identity: the root class and the
/// primitive wrappers.
#[derive(Clone, Debug)]
pub struct WellKnown {
    pub object: ClassId,
    pub number: Option<ClassId>,
    pub string: Option<ClassId>,
    wrappers: [Option<ClassId>; 9],
}

impl WellKnown {
    fn new(object: ClassId) -> Self {
        Self {
            object,
            number: None,
            string: None,
            wrappers: [None; 9],
        }
    }

    pub fn object_type(&self) -> Type {
        Type::raw(self.object)
    }

    pub fn is_object(&self, ty: &Type) -> bool {
        ty.as_class().is_some_and(|class| class.class == self.object)
    }

    /// Wrapper class for `kind`, if one is registered.
    pub fn wrapper(&self, kind: PrimitiveKind) -> Option<ClassId> {
        self.wrappers[kind.index()]
    }

    /// Primitive wrapped by `class`, if it is a wrapper.
    pub fn unwrapped(&self, class: ClassId) -> Option<PrimitiveKind> {
        PrimitiveKind::ALL
            .into_iter()
            .find(|kind| self.wrappers[kind.index()] == Some(class))
    }
}

// =============================================================================
// DefinitionStore
// =============================================================================

/// Thread-safe storage for declarations.
///
/// Uses `DashMap` so independent inference requests can read it from
/// several threads at once.
pub struct DefinitionStore {
    classes: DashMap<ClassId, Arc<ClassInfo>>,
    class_names: DashMap<Arc<str>, ClassId>,
    type_params: DashMap<TypeParamId, Arc<TypeParamInfo>>,
    methods: DashMap<MethodId, Arc<MethodInfo>>,
    next_id: AtomicU32,
    well_known: WellKnown,
}

impl Default for DefinitionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DefinitionStore {
    /// A store holding `Object`, `Number`, `String`, `CharSequence` and
    /// the eight primitive wrappers.
    pub fn new() -> Self {
        let mut store = Self::bare();
        let object = store.well_known.object_type();
        let object_class = ClassType::raw(store.well_known.object);

        let number = store.declare_class("Number", ClassKind::Class);
        let char_sequence = store.declare_class("CharSequence", ClassKind::Interface);
        let string = store.declare_class("String", ClassKind::Class);
        store.add_supertype(string, ClassType::raw(char_sequence));
        store.well_known.number = Some(number);
        store.well_known.string = Some(string);

        for kind in PrimitiveKind::ALL {
            let Some(name) = kind.wrapper_name() else {
                continue;
            };
            let wrapper = store.declare_class(name, ClassKind::Class);
            let parent = match kind {
                PrimitiveKind::Boolean | PrimitiveKind::Char => object_class.clone(),
                _ => ClassType::raw(number),
            };
            store.add_supertype(wrapper, parent);
            store.well_known.wrappers[kind.index()] = Some(wrapper);
        }

        trace!(object = ?object, classes = store.classes.len(), "DefinitionStore::new");
        store
    }

    /// A store holding only `Object`. Primitives have no wrappers here, so
    /// boxing always fails.
    pub fn bare() -> Self {
        let mut store = Self {
            classes: DashMap::new(),
            class_names: DashMap::new(),
            type_params: DashMap::new(),
            methods: DashMap::new(),
            next_id: AtomicU32::new(1),
            well_known: WellKnown::new(ClassId(0)),
        };
        let object = store.declare_class("Object", ClassKind::Class);
        store.well_known.object = object;
        store
    }

    fn allocate(&self) -> u32 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    pub fn well_known(&self) -> &WellKnown {
        &self.well_known
    }

    // -------------------------------------------------------------------------
    // Classes
    // -------------------------------------------------------------------------

    pub fn declare_class(&self, name: &str, kind: ClassKind) -> ClassId {
        let id = ClassId(self.allocate());
        let name: Arc<str> = name.into();
        trace!(class = id.0, name = %name, ?kind, "DefinitionStore::declare_class");
        self.class_names.insert(name.clone(), id);
        self.classes.insert(
            id,
            Arc::new(ClassInfo {
                id,
                name,
                kind,
                type_params: SmallVec::new(),
                supertypes: Vec::new(),
            }),
        );
        id
    }

    pub fn add_supertype(&self, class: ClassId, supertype: ClassType) {
        if let Some(mut entry) = self.classes.get_mut(&class) {
            Arc::make_mut(&mut entry).supertypes.push(supertype);
        }
    }

    pub fn class(&self, id: ClassId) -> Option<Arc<ClassInfo>> {
        self.classes.get(&id).map(|entry| Arc::clone(&entry))
    }

    pub fn class_by_name(&self, name: &str) -> Option<ClassId> {
        self.class_names.get(name).map(|entry| *entry)
    }

    // -------------------------------------------------------------------------
    // Type parameters
    // -------------------------------------------------------------------------

    /// Declare a type parameter and append it to its owner's list.
    pub fn declare_type_param(&self, name: &str, owner: TypeParamOwner) -> TypeParamId {
        let id = TypeParamId(self.allocate());
        self.type_params.insert(
            id,
            Arc::new(TypeParamInfo {
                id,
                name: name.into(),
                bounds: Vec::new(),
                owner,
            }),
        );
        match owner {
            TypeParamOwner::Class(class) => {
                if let Some(mut entry) = self.classes.get_mut(&class) {
                    Arc::make_mut(&mut entry).type_params.push(id);
                }
            }
            TypeParamOwner::Method(method) => {
                if let Some(mut entry) = self.methods.get_mut(&method) {
                    Arc::make_mut(&mut entry).type_params.push(id);
                }
            }
        }
        id
    }

    pub fn set_bounds(&self, param: TypeParamId, bounds: Vec<Type>) {
        if let Some(mut entry) = self.type_params.get_mut(&param) {
            Arc::make_mut(&mut entry).bounds = bounds;
        }
    }

    pub fn type_param(&self, id: TypeParamId) -> Option<Arc<TypeParamInfo>> {
        self.type_params.get(&id).map(|entry| Arc::clone(&entry))
    }

    // -------------------------------------------------------------------------
    // Methods
    // -------------------------------------------------------------------------

    /// Declare a method with an empty signature; fill it in with
    /// [`set_signature`](Self::set_signature) once its type parameters exist.
    pub fn declare_method(&self, name: &str, kind: MethodKind, owner: Option<ClassId>) -> MethodId {
        let id = MethodId(self.allocate());
        self.methods.insert(
            id,
            Arc::new(MethodInfo {
                id,
                name: name.into(),
                kind,
                owner,
                visibility: Visibility::Public,
                type_params: SmallVec::new(),
                params: Vec::new(),
                is_varargs: false,
                return_type: Type::VOID,
            }),
        );
        id
    }

    pub fn set_signature(
        &self,
        method: MethodId,
        params: Vec<ParamInfo>,
        return_type: Type,
        is_varargs: bool,
    ) {
        if let Some(mut entry) = self.methods.get_mut(&method) {
            let info = Arc::make_mut(&mut entry);
            info.params = params;
            info.return_type = return_type;
            info.is_varargs = is_varargs;
        }
    }

    pub fn set_visibility(&self, method: MethodId, visibility: Visibility) {
        if let Some(mut entry) = self.methods.get_mut(&method) {
            Arc::make_mut(&mut entry).visibility = visibility;
        }
    }

    pub fn method(&self, id: MethodId) -> Option<Arc<MethodInfo>> {
        self.methods.get(&id).map(|entry| Arc::clone(&entry))
    }

    /// Number of declarations of all kinds.
    pub fn len(&self) -> usize {
        self.classes.len() + self.type_params.len() + self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "../tests/def_tests.rs"]
mod tests;
