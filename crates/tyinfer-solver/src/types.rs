//! Core type representation for the inference engine.
//!
//! `Type` is a closed, recursive sum type. Every value is an independent
//! immutable tree; children are shared through `Arc` so cloning is cheap
//! and nothing is ever mutated in place.
//!
//! Equality is structural, with one exception: a captured wildcard is
//! compared by its [`CaptureId`]. Two captures of the same wildcard are
//! different types.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

// =============================================================================
// Identifiers
// =============================================================================

/// Identifier of a class or interface declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub u32);

/// Identifier of a declared type parameter.
///
/// Type parameters are compared by identity: two parameters named `T` on
/// different declarations are unrelated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeParamId(pub u32);

/// Identifier of a method or constructor declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(pub u32);

/// Identifier of a call expression supplied by the call-site collaborator.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallId(pub u32);

/// Identity of one capture event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CaptureId(pub u32);

// =============================================================================
// Primitives
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 9] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Byte,
        PrimitiveKind::Short,
        PrimitiveKind::Char,
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
        PrimitiveKind::Void,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Void => "void",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Simple name of the wrapper class, if this primitive has one.
    pub const fn wrapper_name(self) -> Option<&'static str> {
        match self {
            PrimitiveKind::Boolean => Some("Boolean"),
            PrimitiveKind::Byte => Some("Byte"),
            PrimitiveKind::Short => Some("Short"),
            PrimitiveKind::Char => Some("Character"),
            PrimitiveKind::Int => Some("Integer"),
            PrimitiveKind::Long => Some("Long"),
            PrimitiveKind::Float => Some("Float"),
            PrimitiveKind::Double => Some("Double"),
            PrimitiveKind::Void => None,
        }
    }

    /// Identity or widening primitive conversion from `self` to `target`.
    pub fn widens_to(self, target: PrimitiveKind) -> bool {
        use PrimitiveKind::*;
        if self == target {
            return true;
        }
        match self {
            Byte => matches!(target, Short | Int | Long | Float | Double),
            Short | Char => matches!(target, Int | Long | Float | Double),
            Int => matches!(target, Long | Float | Double),
            Long => matches!(target, Float | Double),
            Float => matches!(target, Double),
            Boolean | Double | Void => false,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

// =============================================================================
// Composite type data
// =============================================================================

/// Direction of a wildcard bound.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WildcardKind {
    /// `? extends B`: covariant use site.
    Extends,
    /// `? super B`: contravariant use site.
    Super,
}

/// A parameterized (or raw) class type.
///
/// `args` is aligned with the declaration's type parameters. An empty
/// `args` list on a generic declaration is the raw form of that class.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassType {
    pub class: ClassId,
    pub args: Vec<Type>,
}

impl ClassType {
    pub fn new(class: ClassId, args: Vec<Type>) -> Self {
        Self { class, args }
    }

    pub fn raw(class: ClassId) -> Self {
        Self {
            class,
            args: Vec::new(),
        }
    }
}

/// A bounded or unbounded wildcard type argument.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Wildcard {
    pub kind: WildcardKind,
    /// `None` is the unbounded wildcard `?`.
    pub bound: Option<Type>,
}

impl Wildcard {
    pub fn unbounded() -> Self {
        Self {
            kind: WildcardKind::Extends,
            bound: None,
        }
    }

    pub fn is_extends(&self) -> bool {
        self.kind == WildcardKind::Extends
    }

    pub fn is_super(&self) -> bool {
        self.kind == WildcardKind::Super
    }

    /// The upper bound expressed by this wildcard, if any.
    pub fn extends_bound(&self) -> Option<&Type> {
        match self.kind {
            WildcardKind::Extends => self.bound.as_ref(),
            WildcardKind::Super => None,
        }
    }

    /// The lower bound expressed by this wildcard, if any.
    pub fn super_bound(&self) -> Option<&Type> {
        match self.kind {
            WildcardKind::Super => self.bound.as_ref(),
            WildcardKind::Extends => None,
        }
    }
}

/// A wildcard opened into a fresh opaque type.
///
/// Identity is the capture id; the underlying wildcard is only consulted
/// when the capture is reopened.
#[derive(Clone, Debug)]
pub struct CapturedWildcard {
    pub id: CaptureId,
    pub wildcard: Wildcard,
}

impl PartialEq for CapturedWildcard {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CapturedWildcard {}

impl Hash for CapturedWildcard {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for CapturedWildcard {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CapturedWildcard {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

// =============================================================================
// Type
// =============================================================================

/// Ordering is structural: variant, then ids and children. It only
/// serves as a deterministic tie-break.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Type {
    Primitive(PrimitiveKind),
    Array(Arc<Type>),
    Class(Arc<ClassType>),
    /// Reference to a declared type parameter.
    Param(TypeParamId),
    Wildcard(Arc<Wildcard>),
    Captured(Arc<CapturedWildcard>),
    Intersection(Arc<[Type]>),
    /// The type of `null`; bottom of the reference lattice.
    Null,
    /// Absence of information. Never a valid inference answer.
    Unknown,
}

impl Type {
    pub const BOOLEAN: Type = Type::Primitive(PrimitiveKind::Boolean);
    pub const BYTE: Type = Type::Primitive(PrimitiveKind::Byte);
    pub const SHORT: Type = Type::Primitive(PrimitiveKind::Short);
    pub const CHAR: Type = Type::Primitive(PrimitiveKind::Char);
    pub const INT: Type = Type::Primitive(PrimitiveKind::Int);
    pub const LONG: Type = Type::Primitive(PrimitiveKind::Long);
    pub const FLOAT: Type = Type::Primitive(PrimitiveKind::Float);
    pub const DOUBLE: Type = Type::Primitive(PrimitiveKind::Double);
    pub const VOID: Type = Type::Primitive(PrimitiveKind::Void);

    pub fn class(class: ClassId, args: Vec<Type>) -> Type {
        Type::Class(Arc::new(ClassType::new(class, args)))
    }

    pub fn raw(class: ClassId) -> Type {
        Type::Class(Arc::new(ClassType::raw(class)))
    }

    pub fn from_class_type(class_type: ClassType) -> Type {
        Type::Class(Arc::new(class_type))
    }

    pub fn array(component: Type) -> Type {
        Type::Array(Arc::new(component))
    }

    pub fn param(id: TypeParamId) -> Type {
        Type::Param(id)
    }

    pub fn wildcard(wildcard: Wildcard) -> Type {
        Type::Wildcard(Arc::new(wildcard))
    }

    /// `? extends bound`
    pub fn extends(bound: Type) -> Type {
        Type::wildcard(Wildcard {
            kind: WildcardKind::Extends,
            bound: Some(bound),
        })
    }

    /// `? super bound`
    pub fn super_of(bound: Type) -> Type {
        Type::wildcard(Wildcard {
            kind: WildcardKind::Super,
            bound: Some(bound),
        })
    }

    /// `?`
    pub fn unbounded() -> Type {
        Type::wildcard(Wildcard::unbounded())
    }

    pub fn captured(id: CaptureId, wildcard: Wildcard) -> Type {
        Type::Captured(Arc::new(CapturedWildcard { id, wildcard }))
    }

    pub fn intersection(components: Vec<Type>) -> Type {
        Type::Intersection(components.into())
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive(_))
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Type::Wildcard(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Type::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Type::Unknown)
    }

    /// Reference types: everything except primitives and `Unknown`.
    pub fn is_reference(&self) -> bool {
        !matches!(self, Type::Primitive(_) | Type::Unknown)
    }

    pub fn as_class(&self) -> Option<&ClassType> {
        match self {
            Type::Class(class_type) => Some(class_type),
            _ => None,
        }
    }

    pub fn as_wildcard(&self) -> Option<&Wildcard> {
        match self {
            Type::Wildcard(wildcard) => Some(wildcard),
            _ => None,
        }
    }

    pub fn array_component(&self) -> Option<&Type> {
        match self {
            Type::Array(component) => Some(component),
            _ => None,
        }
    }

    /// Innermost component of a (possibly nested) array type.
    pub fn deep_component(&self) -> &Type {
        let mut current = self;
        while let Type::Array(component) = current {
            current = component;
        }
        current
    }

    /// Whether `param` occurs anywhere inside this type.
    pub fn mentions(&self, param: TypeParamId) -> bool {
        match self {
            Type::Param(id) => *id == param,
            Type::Array(component) => component.mentions(param),
            Type::Class(class_type) => class_type.args.iter().any(|arg| arg.mentions(param)),
            Type::Wildcard(wildcard) => wildcard
                .bound
                .as_ref()
                .is_some_and(|bound| bound.mentions(param)),
            Type::Captured(captured) => captured
                .wildcard
                .bound
                .as_ref()
                .is_some_and(|bound| bound.mentions(param)),
            Type::Intersection(components) => components.iter().any(|ty| ty.mentions(param)),
            Type::Primitive(_) | Type::Null | Type::Unknown => false,
        }
    }
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
