//! Recursion guard for cycle detection and depth limiting in the
//! speculative parts of inference.
//!
//! Two places in the engine re-enter themselves through the call graph:
//!
//! 1. **Context resolution**: inferring an inner call consults the outer
//!    call it is an argument of, which ranks the outer candidates, which
//!    asks for the types of its arguments, which infers the inner call.
//! 2. **Call evaluation**: the type of a nested call is computed by ranking
//!    that call's candidates.
//!
//! Each is tracked by a `RecursionGuard<CallId>` owned by the request's
//! session. A key that is already being visited is a cycle and the caller
//! falls back instead of recursing.
//!
//! # Debug-mode safety
//!
//! Dropping a guard with active entries panics in debug builds, catching a
//! forgotten `leave()`.

use rustc_hash::FxHashSet;
use std::hash::Hash;
use tyinfer_common::limits::{MAX_CALL_CONTEXT_DEPTH, MAX_CALL_EVALUATION_DEPTH};

/// Named recursion limit presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    /// Outer calls consulted as inference context.
    ///
    /// depth = `MAX_CALL_CONTEXT_DEPTH`
    CallContext,

    /// Nested calls evaluated for their result type.
    ///
    /// depth = `MAX_CALL_EVALUATION_DEPTH`
    CallEvaluation,

    /// Custom limits for tests.
    Custom { max_depth: u32 },
}

impl RecursionProfile {
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::CallContext => MAX_CALL_CONTEXT_DEPTH,
            Self::CallEvaluation => MAX_CALL_EVALUATION_DEPTH,
            Self::Custom { max_depth } => max_depth,
        }
    }
}

/// Result of attempting to enter a recursive computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    Entered,
    /// This key is already being visited.
    Cycle,
    DepthExceeded,
}

impl RecursionResult {
    #[inline]
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }

    #[inline]
    pub fn is_cycle(self) -> bool {
        matches!(self, Self::Cycle)
    }

    #[inline]
    pub fn is_denied(self) -> bool {
        !self.is_entered()
    }
}

/// Tracks the keys currently on the recursion stack.
///
/// ```ignore
/// match guard.enter(call) {
///     RecursionResult::Entered => {
///         let result = do_work();
///         guard.leave(call);
///         result
///     }
///     RecursionResult::Cycle | RecursionResult::DepthExceeded => fallback(),
/// }
/// ```
#[derive(Debug)]
pub struct RecursionGuard<K: Hash + Eq + Copy> {
    active: FxHashSet<K>,
    depth: u32,
    max_depth: u32,
    exceeded: bool,
}

impl<K: Hash + Eq + Copy> RecursionGuard<K> {
    pub fn new(max_depth: u32) -> Self {
        Self {
            active: FxHashSet::default(),
            depth: 0,
            max_depth,
            exceeded: false,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth())
    }

    /// Try to enter the computation for `key`. On success the caller
    /// **must** call [`leave`](Self::leave) with the same key.
    pub fn enter(&mut self, key: K) -> RecursionResult {
        if self.active.contains(&key) {
            return RecursionResult::Cycle;
        }
        if self.depth >= self.max_depth {
            self.exceeded = true;
            return RecursionResult::DepthExceeded;
        }
        self.active.insert(key);
        self.depth += 1;
        RecursionResult::Entered
    }

    /// Leave the computation for `key`.
    ///
    /// # Debug panics
    ///
    /// Panics if `key` is not being visited.
    pub fn leave(&mut self, key: K) {
        let was_present = self.active.remove(&key);
        debug_assert!(
            was_present,
            "RecursionGuard::leave() called with a key that was never entered"
        );
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub fn is_visiting(&self, key: &K) -> bool {
        self.active.contains(key)
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Whether the depth limit was hit at any point.
    #[inline]
    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        !self.active.is_empty()
    }
}

#[cfg(debug_assertions)]
impl<K: Hash + Eq + Copy> Drop for RecursionGuard<K> {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            assert!(
                self.active.is_empty(),
                "RecursionGuard dropped with {} active entries",
                self.active.len()
            );
        }
    }
}

#[cfg(test)]
#[path = "../tests/recursion_tests.rs"]
mod tests;
