//! Errors raised while reading a scenario.

use std::fmt;
use tyinfer_solver::InferenceError;

#[derive(Debug)]
pub enum ScenarioError {
    /// The file is not valid scenario JSON.
    Json(serde_json::Error),
    /// A type expression does not parse.
    Syntax {
        input: String,
        offset: usize,
        message: String,
    },
    /// A name in a type expression is neither a class, a type parameter
    /// in scope, a primitive nor `null`.
    UnknownType { name: String, input: String },
    /// A class is given the wrong number of type arguments.
    TypeArity {
        class: String,
        expected: usize,
        actual: usize,
    },
    UnknownClass(String),
    UnknownMethod(String),
    UnknownCall(String),
    DuplicateClass(String),
    DuplicateCall(String),
    /// A call is an argument of more than one call.
    SharedCall(String),
    Inference(InferenceError),
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioError::Json(err) => write!(f, "invalid scenario: {err}"),
            ScenarioError::Syntax {
                input,
                offset,
                message,
            } => write!(f, "{message} at offset {offset} in type `{input}`"),
            ScenarioError::UnknownType { name, input } => {
                write!(f, "cannot resolve `{name}` in type `{input}`")
            }
            ScenarioError::TypeArity {
                class,
                expected,
                actual,
            } => write!(
                f,
                "class {class} takes {expected} type argument(s), got {actual}"
            ),
            ScenarioError::UnknownClass(name) => write!(f, "unknown class `{name}`"),
            ScenarioError::UnknownMethod(name) => write!(f, "unknown method `{name}`"),
            ScenarioError::UnknownCall(name) => write!(f, "unknown call `{name}`"),
            ScenarioError::DuplicateClass(name) => write!(f, "class `{name}` is declared twice"),
            ScenarioError::DuplicateCall(name) => write!(f, "call `{name}` is declared twice"),
            ScenarioError::SharedCall(name) => {
                write!(f, "call `{name}` is an argument of more than one call")
            }
            ScenarioError::Inference(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ScenarioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScenarioError::Json(err) => Some(err),
            ScenarioError::Inference(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ScenarioError {
    fn from(err: serde_json::Error) -> Self {
        ScenarioError::Json(err)
    }
}

impl From<InferenceError> for ScenarioError {
    fn from(err: InferenceError) -> Self {
        ScenarioError::Inference(err)
    }
}
