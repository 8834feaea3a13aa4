//! Common definitions shared by the tyinfer crates.
//!
//! This crate provides:
//! - Centralized recursion and capture limits used by the solver

// Centralized limits and thresholds
pub mod limits;
