#![allow(dead_code)]

//! Shared declarations for unit tests.
//!
//! A small collection hierarchy on top of the default store:
//!
//! ```text
//! interface Collection<E>
//! interface List<E> extends Collection<E>
//! class ArrayList<E> implements List<E>
//! interface Map<K, V>
//! interface Comparable<T>
//! ```

use crate::call::ArgumentInfo;
use crate::db::TypeDatabase;
use crate::def::{
    ClassKind, DefinitionStore, MethodInfo, MethodKind, ParamInfo, TypeParamOwner,
};
use crate::infer::{InferenceEngine, InferenceRequest};
use crate::session::InferenceSession;
use crate::substitution::Substitution;
use crate::types::{ClassId, ClassType, MethodId, PrimitiveKind, Type, TypeParamId};
use std::sync::Arc;

/// Route solver traces to the test harness. Enable with `RUST_LOG=trace`.
pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub(crate) struct Fixture {
    pub store: DefinitionStore,
    pub object: ClassId,
    pub number: ClassId,
    pub string: ClassId,
    pub integer: ClassId,
    pub long: ClassId,
    pub char_sequence: ClassId,
    pub collection: ClassId,
    pub list: ClassId,
    pub array_list: ClassId,
    pub map: ClassId,
    pub comparable: ClassId,
    pub list_e: TypeParamId,
    pub array_list_e: TypeParamId,
}

impl Fixture {
    pub fn new() -> Self {
        init_test_tracing();
        let store = DefinitionStore::new();
        let object = store.well_known().object;
        let number = store.class_by_name("Number").expect("Number");
        let string = store.class_by_name("String").expect("String");
        let integer = store.class_by_name("Integer").expect("Integer");
        let long = store.class_by_name("Long").expect("Long");
        let char_sequence = store.class_by_name("CharSequence").expect("CharSequence");

        let collection = store.declare_class("Collection", ClassKind::Interface);
        store.declare_type_param("E", TypeParamOwner::Class(collection));

        let list = store.declare_class("List", ClassKind::Interface);
        let list_e = store.declare_type_param("E", TypeParamOwner::Class(list));
        store.add_supertype(list, ClassType::new(collection, vec![Type::param(list_e)]));

        let array_list = store.declare_class("ArrayList", ClassKind::Class);
        let array_list_e = store.declare_type_param("E", TypeParamOwner::Class(array_list));
        store.add_supertype(array_list, ClassType::raw(object));
        store.add_supertype(array_list, ClassType::new(list, vec![Type::param(array_list_e)]));

        let map = store.declare_class("Map", ClassKind::Interface);
        store.declare_type_param("K", TypeParamOwner::Class(map));
        store.declare_type_param("V", TypeParamOwner::Class(map));

        let comparable = store.declare_class("Comparable", ClassKind::Interface);
        store.declare_type_param("T", TypeParamOwner::Class(comparable));

        Self {
            store,
            object,
            number,
            string,
            integer,
            long,
            char_sequence,
            collection,
            list,
            array_list,
            map,
            comparable,
            list_e,
            array_list_e,
        }
    }

    pub fn db(&self) -> &dyn TypeDatabase {
        &self.store
    }

    pub fn object_type(&self) -> Type {
        Type::raw(self.object)
    }

    pub fn string_type(&self) -> Type {
        Type::raw(self.string)
    }

    pub fn integer_type(&self) -> Type {
        Type::raw(self.integer)
    }

    pub fn long_type(&self) -> Type {
        Type::raw(self.long)
    }

    pub fn number_type(&self) -> Type {
        Type::raw(self.number)
    }

    pub fn list_of(&self, element: Type) -> Type {
        Type::class(self.list, vec![element])
    }

    pub fn collection_of(&self, element: Type) -> Type {
        Type::class(self.collection, vec![element])
    }

    pub fn array_list_of(&self, element: Type) -> Type {
        Type::class(self.array_list, vec![element])
    }

    pub fn map_of(&self, key: Type, value: Type) -> Type {
        Type::class(self.map, vec![key, value])
    }

    pub fn comparable_of(&self, ty: Type) -> Type {
        Type::class(self.comparable, vec![ty])
    }

    pub fn int(&self) -> Type {
        Type::Primitive(PrimitiveKind::Int)
    }

    /// Declare a generic method with the named type parameters.
    pub fn generic_method(&self, name: &str, type_params: &[&str]) -> (MethodId, Vec<TypeParamId>) {
        let method = self.store.declare_method(name, MethodKind::Method, None);
        let params = type_params
            .iter()
            .map(|param| {
                self.store
                    .declare_type_param(param, TypeParamOwner::Method(method))
            })
            .collect();
        (method, params)
    }

    pub fn signature(&self, method: MethodId, formals: Vec<Type>, return_type: Type) {
        let params = formals
            .into_iter()
            .enumerate()
            .map(|(index, ty)| ParamInfo::new(&format!("p{index}"), ty))
            .collect();
        self.store.set_signature(method, params, return_type, false);
    }

    pub fn varargs_signature(&self, method: MethodId, formals: Vec<Type>, return_type: Type) {
        let params = formals
            .into_iter()
            .enumerate()
            .map(|(index, ty)| ParamInfo::new(&format!("p{index}"), ty))
            .collect();
        self.store.set_signature(method, params, return_type, true);
    }

    pub fn method(&self, method: MethodId) -> Arc<MethodInfo> {
        self.store.method(method).expect("declared method")
    }

    pub fn engine(&self) -> InferenceEngine<'_> {
        InferenceEngine::new(&self.store)
    }

    /// Infer all of `method`'s type parameters from argument types alone.
    pub fn infer(&self, method: MethodId, args: Vec<Option<Type>>) -> Substitution {
        let info = self.method(method);
        let args: Vec<ArgumentInfo> = args
            .into_iter()
            .map(|ty| ArgumentInfo { ty, call: None })
            .collect();
        let partial = Substitution::new();
        let request = InferenceRequest::new(&info, &args, &partial);
        let mut session = InferenceSession::new();
        self.engine().infer_type_arguments(&mut session, &request)
    }
}
