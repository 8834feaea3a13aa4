//! Request-scoped inference state.
//!
//! Everything that must survive across the recursive calls of one
//! inference request lives in an [`InferenceSession`] owned by the caller
//! and passed down by `&mut`. Nothing is global: two sessions on two
//! threads never observe each other.

use crate::recursion::{RecursionGuard, RecursionProfile};
use crate::types::{CallId, CaptureId, Type};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// How inference treats missing evidence.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InferenceMode {
    /// Answers are proven by the evidence; no context means the root class.
    #[default]
    Strict,
    /// Completion-style guessing: context answers are wrapped as
    /// `? extends T` and reported as [`Guess`](crate::InferenceOutcome::Guess).
    BestEffort,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InferenceOptions {
    pub mode: InferenceMode,
    /// Consult the outer call when a call is itself an argument.
    /// Best-effort mode always does.
    pub outer_call_context: bool,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            mode: InferenceMode::Strict,
            outer_call_context: true,
        }
    }
}

impl InferenceOptions {
    pub fn best_effort() -> Self {
        Self {
            mode: InferenceMode::BestEffort,
            ..Self::default()
        }
    }

    pub fn is_best_effort(&self) -> bool {
        self.mode == InferenceMode::BestEffort
    }

    pub fn uses_outer_call_context(&self) -> bool {
        self.outer_call_context || self.is_best_effort()
    }
}

/// Cycle-prevention state for nested calls.
///
/// - `blocked`: calls whose argument slot is skipped while an outer call
///   is ranked for their sake (counted, so nested blocks of one call nest)
/// - `context`: outer calls currently consulted as inference context
/// - `evaluating`: calls whose result type is being computed
#[derive(Debug)]
pub struct InferenceGuard {
    blocked: FxHashMap<CallId, u32>,
    pub(crate) context: RecursionGuard<CallId>,
    pub(crate) evaluating: RecursionGuard<CallId>,
}

impl Default for InferenceGuard {
    fn default() -> Self {
        Self {
            blocked: FxHashMap::default(),
            context: RecursionGuard::with_profile(RecursionProfile::CallContext),
            evaluating: RecursionGuard::with_profile(RecursionProfile::CallEvaluation),
        }
    }
}

impl InferenceGuard {
    pub fn block(&mut self, call: CallId) {
        *self.blocked.entry(call).or_insert(0) += 1;
    }

    pub fn unblock(&mut self, call: CallId) {
        if let Some(count) = self.blocked.get_mut(&call) {
            *count -= 1;
            if *count == 0 {
                self.blocked.remove(&call);
            }
        }
    }

    pub fn is_blocked(&self, call: CallId) -> bool {
        self.blocked.contains_key(&call)
    }

    pub fn is_context(&self, call: CallId) -> bool {
        self.context.is_visiting(&call)
    }

    /// Nothing blocked and no call in progress.
    pub fn is_idle(&self) -> bool {
        self.blocked.is_empty() && !self.context.is_active() && !self.evaluating.is_active()
    }
}

/// State of one inference request.
#[derive(Debug, Default)]
pub struct InferenceSession {
    pub guard: InferenceGuard,
    next_capture: u32,
}

impl InferenceSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh_capture(&mut self) -> CaptureId {
        self.next_capture += 1;
        CaptureId(self.next_capture)
    }

    /// Capture conversion of an argument type: every wildcard argument of
    /// a class type becomes a fresh captured type. Only the top level is
    /// converted.
    pub fn capture(&mut self, ty: &Type) -> Type {
        let Type::Class(class_type) = ty else {
            return ty.clone();
        };
        if !class_type.args.iter().any(Type::is_wildcard) {
            return ty.clone();
        }
        let args = class_type
            .args
            .iter()
            .map(|arg| match arg {
                Type::Wildcard(wildcard) => {
                    let id = self.fresh_capture();
                    Type::captured(id, (**wildcard).clone())
                }
                _ => arg.clone(),
            })
            .collect();
        Type::class(class_type.class, args)
    }

    /// Number of captures drawn so far.
    pub fn capture_count(&self) -> u32 {
        self.next_capture
    }
}

#[cfg(test)]
#[path = "../tests/session_tests.rs"]
mod tests;
