//! Centralized limits and thresholds for the inference engine.
//!
//! Every recursive algorithm in the solver is bounded by one of the
//! constants below. Keeping them in one place prevents the matcher, the
//! lub computation and the context resolver from drifting apart.
//!
//! # Categories
//!
//! - **Capture depth**: how deep a wildcard may be captured by the matcher
//! - **Lub depth**: how deep least-upper-bound recursion goes into type arguments
//! - **Context depth**: how many outer calls may be chained as inference context

// =============================================================================
// Structural Matcher
// =============================================================================

/// Nesting depth at which a wildcard argument may no longer be captured.
///
/// The matcher descends one level for every type argument it enters. A
/// wildcard met by the free variable at this depth or deeper is a hard
/// failure instead of a capture.
///
/// # Java example
///
/// ```java
/// <T> void m(List<List<T>> x);
/// List<List<?>> a;   // `?` met at depth 2: capture refused
/// m(a);
///
/// <T> void n(List<T> x);
/// List<?> b;         // `?` met at depth 1: captured
/// n(b);
/// ```
pub const MAX_WILDCARD_CAPTURE_DEPTH: u32 = 2;

// =============================================================================
// Least Upper Bound
// =============================================================================

/// Maximum depth for computing the least containing type argument.
///
/// `lub(Comparable<Integer>, Comparable<String>)` recurses into
/// `lub(Integer, String)`, which may again produce generic supertypes. Past
/// this depth the argument collapses to the unbounded wildcard `?`.
pub const MAX_LUB_DEPTH: u32 = 3;

/// Maximum number of ancestors collected for a single type during lub.
///
/// Guards against pathological (or cyclic, if the symbol model is
/// malformed) supertype graphs.
pub const MAX_SUPERTYPE_CLOSURE: usize = 512;

// =============================================================================
// Context Propagation
// =============================================================================

/// Maximum number of outer calls chained as expected-type context.
///
/// The cycle guard already refuses to consult the same call twice; this
/// bound additionally caps very deep but acyclic nesting such as
/// `f(f(f(f(...))))`.
pub const MAX_CALL_CONTEXT_DEPTH: u32 = 20;

/// Maximum number of nested call arguments whose types are evaluated
/// recursively while ranking a single top-level call.
pub const MAX_CALL_EVALUATION_DEPTH: u32 = 64;
