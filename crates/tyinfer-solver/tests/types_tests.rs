use super::*;

#[test]
fn test_primitive_names_round_trip() {
    for kind in PrimitiveKind::ALL {
        assert_eq!(PrimitiveKind::from_name(kind.name()), Some(kind));
    }
    assert_eq!(PrimitiveKind::from_name("string"), None);
}

#[test]
fn test_primitive_widening() {
    use PrimitiveKind::*;
    assert!(Byte.widens_to(Int));
    assert!(Char.widens_to(Long));
    assert!(Int.widens_to(Double));
    assert!(Long.widens_to(Float));
    assert!(!Int.widens_to(Short));
    assert!(!Char.widens_to(Short));
    assert!(!Boolean.widens_to(Int));
    assert!(Boolean.widens_to(Boolean));
}

#[test]
fn test_void_has_no_wrapper() {
    assert_eq!(PrimitiveKind::Void.wrapper_name(), None);
    assert_eq!(PrimitiveKind::Char.wrapper_name(), Some("Character"));
}

#[test]
fn test_captured_wildcards_compare_by_identity() {
    let wildcard = Wildcard::unbounded();
    let first = Type::captured(CaptureId(1), wildcard.clone());
    let second = Type::captured(CaptureId(2), wildcard.clone());
    let again = Type::captured(CaptureId(1), Wildcard::unbounded());

    assert_ne!(first, second);
    assert_eq!(first, again);
}

#[test]
fn test_structural_equality() {
    let list = ClassId(7);
    let a = Type::class(list, vec![Type::extends(Type::raw(ClassId(3)))]);
    let b = Type::class(list, vec![Type::extends(Type::raw(ClassId(3)))]);
    let c = Type::class(list, vec![Type::super_of(Type::raw(ClassId(3)))]);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_structural_ordering() {
    let list = ClassId(7);
    assert!(Type::raw(ClassId(3)) < Type::raw(ClassId(4)));
    assert!(
        Type::class(list, vec![Type::raw(ClassId(3))]) < Type::class(list, vec![Type::raw(ClassId(4))])
    );
    assert!(Type::extends(Type::raw(ClassId(3))) < Type::super_of(Type::raw(ClassId(3))));

    let first = Type::captured(CaptureId(1), Wildcard::unbounded());
    let second = Type::captured(CaptureId(2), Wildcard::unbounded());
    assert!(first < second);
    assert_eq!(
        first.cmp(&Type::captured(
            CaptureId(1),
            Wildcard {
                kind: WildcardKind::Super,
                bound: Some(Type::Null),
            }
        )),
        std::cmp::Ordering::Equal
    );
}

#[test]
fn test_wildcard_bounds() {
    let bound = Type::raw(ClassId(4));
    let extends = Wildcard {
        kind: WildcardKind::Extends,
        bound: Some(bound.clone()),
    };
    let sup = Wildcard {
        kind: WildcardKind::Super,
        bound: Some(bound.clone()),
    };
    assert_eq!(extends.extends_bound(), Some(&bound));
    assert_eq!(extends.super_bound(), None);
    assert_eq!(sup.super_bound(), Some(&bound));
    assert!(sup.is_super());
    assert!(Wildcard::unbounded().is_extends());
}

#[test]
fn test_mentions_walks_nested_types() {
    let t = TypeParamId(10);
    let u = TypeParamId(11);
    let nested = Type::array(Type::class(
        ClassId(2),
        vec![Type::extends(Type::class(ClassId(3), vec![Type::param(t)]))],
    ));
    assert!(nested.mentions(t));
    assert!(!nested.mentions(u));
    assert!(Type::intersection(vec![Type::raw(ClassId(1)), Type::param(u)]).mentions(u));
    assert!(!Type::Null.mentions(t));
}

#[test]
fn test_deep_component() {
    let ty = Type::array(Type::array(Type::INT));
    assert_eq!(ty.deep_component(), &Type::INT);
    assert_eq!(ty.array_component(), Some(&Type::array(Type::INT)));
    assert_eq!(Type::INT.deep_component(), &Type::INT);
}

#[test]
fn test_reference_classification() {
    assert!(!Type::INT.is_reference());
    assert!(!Type::Unknown.is_reference());
    assert!(Type::Null.is_reference());
    assert!(Type::array(Type::INT).is_reference());
    assert!(Type::param(TypeParamId(1)).is_reference());
}
