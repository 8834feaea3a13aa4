use super::*;
use crate::def::{ClassKind, DefinitionStore, MethodKind};
use crate::types::ClassType;

#[test]
fn test_argument_index_finds_nested_call() {
    let site = CallSite::new(
        CallId(1),
        vec![],
        vec![
            ArgumentType::known(Type::INT),
            ArgumentType::Call(CallId(2)),
            ArgumentType::Known(None),
            ArgumentType::Call(CallId(3)),
        ],
    );
    assert_eq!(site.argument_index(CallId(2)), Some(1));
    assert_eq!(site.argument_index(CallId(3)), Some(3));
    assert_eq!(site.argument_index(CallId(4)), None);
    assert_eq!(site.kind, CallKind::Method);
    assert_eq!(site.context, CallContext::None);
}

#[test]
fn test_default_call_site_is_empty() {
    let site = CallSite::default();
    assert_eq!(site.id, CallId(0));
    assert_eq!(site.kind, CallKind::Method);
    assert!(site.candidates.is_empty());
    assert!(site.args.is_empty());
    assert!(site.explicit_type_args.is_empty());
    assert!(site.partial.is_empty());
}

#[test]
fn test_call_graph_keeps_insertion_order() {
    let mut graph = CallGraph::new();
    assert!(graph.is_empty());
    graph.insert(CallSite::new(CallId(5), vec![], vec![]));
    graph.insert(
        CallSite::new(CallId(2), vec![], vec![]).with_kind(CallKind::Constructor),
    );
    assert_eq!(graph.len(), 2);
    assert_eq!(graph.ids(), &[CallId(5), CallId(2)]);
    assert_eq!(
        graph.call(CallId(2)).map(|site| site.kind),
        Some(CallKind::Constructor)
    );
    assert!(graph.call(CallId(9)).is_none());
}

#[test]
fn test_argument_info_constructors() {
    assert_eq!(ArgumentInfo::typed(Type::INT).ty, Some(Type::INT));
    assert_eq!(ArgumentInfo::untyped().ty, None);
    assert_eq!(ArgumentInfo::untyped().call, None);
}

#[test]
fn test_declared_visibility() {
    let store = DefinitionStore::bare();
    let base = store.declare_class("Base", ClassKind::Class);
    let derived = store.declare_class("Derived", ClassKind::Class);
    let other = store.declare_class("Other", ClassKind::Class);
    store.add_supertype(derived, ClassType::raw(base));

    let private = store.declare_method("secret", MethodKind::Method, Some(base));
    store.set_visibility(private, Visibility::Private);
    let protected = store.declare_method("hook", MethodKind::Method, Some(base));
    store.set_visibility(protected, Visibility::Protected);
    let package = store.declare_method("helper", MethodKind::Method, Some(base));
    store.set_visibility(package, Visibility::Package);

    let access = DeclaredVisibility::new(&store);
    let method = |id| store.method(id).expect("declared method");

    assert!(access.is_accessible(&method(private), Some(base)));
    assert!(!access.is_accessible(&method(private), Some(derived)));
    assert!(!access.is_accessible(&method(private), None));

    assert!(access.is_accessible(&method(protected), Some(derived)));
    assert!(access.is_accessible(&method(protected), Some(base)));
    assert!(!access.is_accessible(&method(protected), Some(other)));
    assert!(!access.is_accessible(&method(protected), None));

    assert!(access.is_accessible(&method(package), Some(other)));
    assert!(AllAccessible.is_accessible(&method(private), None));
}

#[test]
fn test_protected_free_function_is_accessible() {
    let store = DefinitionStore::bare();
    let free = store.declare_method("f", MethodKind::Method, None);
    store.set_visibility(free, Visibility::Protected);
    let info = store.method(free).expect("declared method");
    assert!(DeclaredVisibility::new(&store).is_accessible(&info, None));
}
