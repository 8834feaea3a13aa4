//! Contract violations at the engine's boundary.
//!
//! Inference failure is not an error: it is reported as an all-`Unbound`
//! substitution. These variants are for callers that hand the engine
//! inconsistent input.

use crate::types::{CallId, MethodId};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InferenceError {
    /// The two type lists of a pairwise inference differ in length.
    ArityMismatch { expected: usize, actual: usize },
    UnknownMethod(MethodId),
    UnknownCall(CallId),
}

impl fmt::Display for InferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferenceError::ArityMismatch { expected, actual } => write!(
                f,
                "type lists must be of the same length (expected {expected}, got {actual})"
            ),
            InferenceError::UnknownMethod(method) => write!(f, "unknown method #{}", method.0),
            InferenceError::UnknownCall(call) => write!(f, "unknown call #{}", call.0),
        }
    }
}

impl std::error::Error for InferenceError {}
