//! tyinfer: generic type-argument inference and overload ranking.
//!
//! The engine itself lives in `tyinfer-solver`; this crate adds a JSON
//! scenario format for describing declarations and call sites, tracing
//! setup, and the `tyinfer` command-line front end.
//!
//! ```no_run
//! use tyinfer::scenario::Scenario;
//!
//! let scenario = Scenario::from_json(r#"{ "methods": [], "calls": [] }"#)?;
//! for call in scenario.calls.ids() {
//!     let ranked = scenario.rank(*call, &scenario.options)?;
//!     println!("{} candidates", ranked.candidates.len());
//! }
//! # Ok::<(), tyinfer::scenario::ScenarioError>(())
//! ```

pub use tyinfer_common as common;
pub use tyinfer_solver as solver;

pub use tyinfer_solver::{
    InferenceEngine, InferenceError, InferenceOptions, InferenceSession, OverloadResolution,
    Substitution, Type, TypeDatabase,
};

pub mod scenario;
pub mod tracing_config;

#[cfg(feature = "cli")]
pub mod cli;
