//! Call sites and the collaborators that describe them.
//!
//! The engine never looks at program text. Everything it needs about a
//! call (its candidates, its argument types, the construct it sits in)
//! comes through [`CallSiteLookup`], and visibility comes through
//! [`AccessibilityChecker`].

use crate::db::TypeDatabase;
use crate::def::{MethodInfo, Visibility};
use crate::substitution::Substitution;
use crate::types::{CallId, ClassId, MethodId, Type};
use rustc_hash::FxHashMap;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CallKind {
    #[default]
    Method,
    /// `new C<..>(..)`: never inferred from context.
    Constructor,
}

/// The construct a call expression sits in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CallContext {
    #[default]
    None,
    /// Initializer of a variable declared with `declared`.
    VariableInit { declared: Type },
    /// Right-hand side of an assignment to a `target`-typed location.
    Assignment { target: Type },
    /// Returned from a method. `None` when the enclosing method is unknown.
    Return { method_return: Option<Type> },
    /// Argument `index` of the call `outer`.
    Argument { outer: CallId, index: usize },
}

/// Type of one argument expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArgumentType {
    /// A non-call expression. `None` when its type is not known.
    Known(Option<Type>),
    /// A nested call, typed by ranking it.
    Call(CallId),
}

impl ArgumentType {
    pub fn known(ty: Type) -> Self {
        ArgumentType::Known(Some(ty))
    }

    pub fn as_call(&self) -> Option<CallId> {
        match self {
            ArgumentType::Call(call) => Some(*call),
            ArgumentType::Known(_) => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct CallSite {
    pub id: CallId,
    pub kind: CallKind,
    /// Candidate signatures from the symbol-lookup collaborator.
    pub candidates: Vec<MethodId>,
    pub args: Vec<ArgumentType>,
    pub context: CallContext,
    /// `recv.<A, B>m(..)`; empty when inferred.
    pub explicit_type_args: Vec<Type>,
    /// Substitution already known at the call (e.g. the receiver's).
    pub partial: Substitution,
    /// Class the call is written in.
    pub caller_class: Option<ClassId>,
}

impl CallSite {
    pub fn new(id: CallId, candidates: Vec<MethodId>, args: Vec<ArgumentType>) -> Self {
        Self {
            id,
            candidates,
            args,
            ..Self::default()
        }
    }

    pub fn with_context(mut self, context: CallContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_kind(mut self, kind: CallKind) -> Self {
        self.kind = kind;
        self
    }

    /// Position of `call` among this call's arguments.
    pub fn argument_index(&self, call: CallId) -> Option<usize> {
        self.args
            .iter()
            .position(|arg| arg.as_call() == Some(call))
    }
}

/// One argument as seen by the aggregator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArgumentInfo {
    pub ty: Option<Type>,
    /// The nested call this argument is, if any; blocked calls are skipped.
    pub call: Option<CallId>,
}

impl ArgumentInfo {
    pub fn typed(ty: Type) -> Self {
        Self {
            ty: Some(ty),
            call: None,
        }
    }

    pub fn untyped() -> Self {
        Self::default()
    }
}

pub trait CallSiteLookup {
    fn call(&self, id: CallId) -> Option<&CallSite>;
}

/// In-memory call graph.
#[derive(Clone, Debug, Default)]
pub struct CallGraph {
    calls: FxHashMap<CallId, CallSite>,
    order: Vec<CallId>,
}

impl CallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, site: CallSite) {
        if !self.calls.contains_key(&site.id) {
            self.order.push(site.id);
        }
        self.calls.insert(site.id, site);
    }

    /// Call ids in insertion order.
    pub fn ids(&self) -> &[CallId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl CallSiteLookup for CallGraph {
    fn call(&self, id: CallId) -> Option<&CallSite> {
        self.calls.get(&id)
    }
}

pub trait AccessibilityChecker {
    fn is_accessible(&self, method: &MethodInfo, caller: Option<ClassId>) -> bool;
}

/// Every member is accessible.
#[derive(Copy, Clone, Debug, Default)]
pub struct AllAccessible;

impl AccessibilityChecker for AllAccessible {
    fn is_accessible(&self, _method: &MethodInfo, _caller: Option<ClassId>) -> bool {
        true
    }
}

/// Declared-modifier rules without packages: private members are visible
/// inside their class, protected members inside subclasses, everything
/// else everywhere.
pub struct DeclaredVisibility<'a> {
    db: &'a dyn TypeDatabase,
}

impl<'a> DeclaredVisibility<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        Self { db }
    }
}

impl AccessibilityChecker for DeclaredVisibility<'_> {
    fn is_accessible(&self, method: &MethodInfo, caller: Option<ClassId>) -> bool {
        match method.visibility {
            Visibility::Public | Visibility::Package => true,
            Visibility::Private => caller.is_some() && caller == method.owner,
            Visibility::Protected => match (caller, method.owner) {
                (Some(caller), Some(owner)) => self.db.is_subclass(caller, owner),
                (_, None) => true,
                (None, Some(_)) => false,
            },
        }
    }
}

#[cfg(test)]
#[path = "../tests/call_tests.rs"]
mod tests;
