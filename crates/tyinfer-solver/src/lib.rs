//! Generic Type-Argument Inference Engine
//!
//! Given a generic callable, its formal parameter types and the types of
//! the actual arguments (or the type the surrounding construct expects),
//! the engine computes a substitution for the callable's type parameters.
//!
//! - **Type model**: `Type`, assignability, least upper bounds, erasure
//! - **Matcher**: variance-aware structural matching of one free parameter
//! - **Aggregation**: per-parameter folding of argument evidence
//! - **Context**: expected types from declarations, assignments, returns
//!   and enclosing calls, guarded against cycles
//! - **Reconciliation**: one sweep through sibling parameter bounds
//! - **Overloads**: applicability phases and accessibility ranking
//!
//! Inference never panics and never returns partial answers: a callable
//! whose parameters cannot all be inferred gets an all-`Unbound`
//! substitution.
mod aggregate;
pub mod call;
pub mod constraint;
mod context;
pub mod db;
pub mod def;
pub mod error;
pub mod format;
pub mod infer;
pub mod lub;
pub mod matcher;
pub mod overload;
mod reconcile;
pub mod recursion;
pub mod session;
pub mod substitution;
pub mod subtype;
pub mod type_ops;
pub mod types;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use aggregate::ParamConstraint;
pub use call::{
    AccessibilityChecker, AllAccessible, ArgumentInfo, ArgumentType, CallContext, CallGraph,
    CallKind, CallSite, CallSiteLookup, DeclaredVisibility,
};
pub use constraint::{Constraint, ConstraintKind, MatchOutcome};
pub use db::TypeDatabase;
pub use def::{
    ClassInfo, ClassKind, DefinitionStore, MethodInfo, MethodKind, ParamInfo, TypeParamInfo,
    TypeParamOwner, Visibility, WellKnown,
};
pub use error::InferenceError;
pub use format::TypeFormatter;
pub use infer::{InferenceEngine, InferenceOutcome, InferenceRequest, NoCalls};
pub use lub::lub;
pub use matcher::{TypeMatcher, substitution_for_type_parameter};
pub use overload::{Applicability, OverloadResolution, RankedCandidate};
pub use session::{InferenceGuard, InferenceMode, InferenceOptions, InferenceSession};
pub use substitution::{Binding, Substitution};
pub use subtype::{is_assignable_from, is_subtype_no_boxing};
pub use type_ops::{box_primitive, erasure, type_param_erasure, upper_bound};
pub use types::{
    CallId, CaptureId, ClassId, ClassType, MethodId, PrimitiveKind, Type, TypeParamId, Wildcard,
    WildcardKind,
};
