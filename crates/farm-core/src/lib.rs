#![deny(warnings)]

//! Core domain models and invariants for Cherry Tycoon farms.
//!
//! This crate defines the serializable farm state shared by the economic
//! model, the statistics ledger and the runtime, together with validation
//! helpers guarding the invariants the rest of the workspace relies on.

pub mod model;
pub mod rules;
pub mod validate;

pub use model::*;
pub use rules::GameRules;
pub use validate::*;
