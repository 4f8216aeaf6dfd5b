//! Test fixtures for tour-planner.
//!
//! Provides realistic test data including:
//! - Kenyan towns used as a small touring problem
//! - Scripted distance providers for failure and counting scenarios

pub mod kenya_towns;
pub mod providers;

#[allow(unused_imports)]
pub use kenya_towns::*;
