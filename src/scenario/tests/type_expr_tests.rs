use super::*;
use tyinfer_solver::{ClassKind, TypeParamOwner};

struct Decls {
    store: DefinitionStore,
    list: ClassId,
    map: ClassId,
    comparable: ClassId,
}

fn decls() -> Decls {
    let store = DefinitionStore::new();
    let list = store.declare_class("List", ClassKind::Interface);
    store.declare_type_param("E", TypeParamOwner::Class(list));
    let map = store.declare_class("Map", ClassKind::Interface);
    store.declare_type_param("K", TypeParamOwner::Class(map));
    store.declare_type_param("V", TypeParamOwner::Class(map));
    let comparable = store.declare_class("Comparable", ClassKind::Interface);
    store.declare_type_param("T", TypeParamOwner::Class(comparable));
    Decls {
        store,
        list,
        map,
        comparable,
    }
}

fn class(store: &DefinitionStore, name: &str) -> Type {
    Type::raw(store.class_by_name(name).expect("declared class"))
}

#[test]
fn test_parse_primitives_and_null() {
    let d = decls();
    let scope = TypeScope::new(&d.store);
    assert_eq!(scope.parse("int").unwrap(), Type::INT);
    assert_eq!(scope.parse("  boolean ").unwrap(), Type::BOOLEAN);
    assert_eq!(scope.parse("null").unwrap(), Type::Null);
    assert_eq!(scope.parse("int[][]").unwrap(), Type::array(Type::array(Type::INT)));
}

#[test]
fn test_parse_nested_class_arguments() {
    let d = decls();
    let scope = TypeScope::new(&d.store);
    let string = class(&d.store, "String");
    let integer = class(&d.store, "Integer");

    let parsed = scope.parse("Map<String, List<? extends Integer>>").unwrap();
    let expected = Type::class(
        d.map,
        vec![
            string,
            Type::class(d.list, vec![Type::extends(integer.clone())]),
        ],
    );
    assert_eq!(parsed, expected);

    assert_eq!(
        scope.parse("List<? super Integer>[]").unwrap(),
        Type::array(Type::class(d.list, vec![Type::super_of(integer)]))
    );
    assert_eq!(
        scope.parse("List<?>").unwrap(),
        Type::class(d.list, vec![Type::unbounded()])
    );
}

#[test]
fn test_parse_raw_generic_class() {
    let d = decls();
    let scope = TypeScope::new(&d.store);
    assert_eq!(scope.parse("List").unwrap(), Type::raw(d.list));
}

#[test]
fn test_parse_intersection() {
    let d = decls();
    let scope = TypeScope::new(&d.store);
    let number = class(&d.store, "Number");
    let integer = class(&d.store, "Integer");
    assert_eq!(
        scope.parse("Number & Comparable<Integer>").unwrap(),
        Type::intersection(vec![number, Type::class(d.comparable, vec![integer])])
    );
}

#[test]
fn test_type_params_shadow_classes() {
    let d = decls();
    let method = d
        .store
        .declare_method("m", tyinfer_solver::MethodKind::Method, None);
    let t = d.store.declare_type_param("T", TypeParamOwner::Method(method));
    let string_param = d
        .store
        .declare_type_param("String", TypeParamOwner::Method(method));
    let scope = TypeScope::new(&d.store).with_params([("T", t), ("String", string_param)]);

    assert_eq!(
        scope.parse("List<T>").unwrap(),
        Type::class(d.list, vec![Type::param(t)])
    );
    assert_eq!(scope.parse("String").unwrap(), Type::param(string_param));
}

#[test]
fn test_class_params_in_scope() {
    let d = decls();
    let scope = TypeScope::new(&d.store).with_class_params(d.map);
    let params = d.store.class(d.map).unwrap().type_params.to_vec();
    assert_eq!(
        scope.parse("List<V>").unwrap(),
        Type::class(d.list, vec![Type::param(params[1])])
    );
}

#[test]
fn test_unknown_name() {
    let d = decls();
    let scope = TypeScope::new(&d.store);
    match scope.parse("List<Missing>") {
        Err(ScenarioError::UnknownType { name, input }) => {
            assert_eq!(name, "Missing");
            assert_eq!(input, "List<Missing>");
        }
        other => panic!("expected UnknownType, got {other:?}"),
    }
}

#[test]
fn test_wrong_type_argument_count() {
    let d = decls();
    let scope = TypeScope::new(&d.store);
    match scope.parse("Map<String>") {
        Err(ScenarioError::TypeArity {
            class,
            expected,
            actual,
        }) => {
            assert_eq!(class, "Map");
            assert_eq!(expected, 2);
            assert_eq!(actual, 1);
        }
        other => panic!("expected TypeArity, got {other:?}"),
    }
}

#[test]
fn test_syntax_errors() {
    let d = decls();
    let scope = TypeScope::new(&d.store);
    assert!(matches!(
        scope.parse("List<String"),
        Err(ScenarioError::Syntax { .. })
    ));
    assert!(matches!(
        scope.parse("String String"),
        Err(ScenarioError::Syntax { offset: 7, .. })
    ));
    assert!(matches!(
        scope.parse("int[3]"),
        Err(ScenarioError::Syntax { .. })
    ));
    assert!(matches!(scope.parse(""), Err(ScenarioError::Syntax { .. })));
    assert!(matches!(
        scope.parse("int<String>"),
        Err(ScenarioError::Syntax { .. })
    ));
}

#[test]
fn test_error_display() {
    let d = decls();
    let scope = TypeScope::new(&d.store);
    let err = scope.parse("List<String").unwrap_err();
    assert_eq!(err.to_string(), "expected `>` at offset 11 in type `List<String`");
}
