//! Domain layer containing business rules and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, categories, timestamps, errors)
//! - `profile` - Trip profile, merge rules and the sufficiency gate
//! - `planning` - Per-category demand, synthesis budget and search policy
//! - `retrieval` - Category requests, results and attempt records
//! - `conversation` - Per-session state and the turn phase machine

pub mod conversation;
pub mod foundation;
pub mod planning;
pub mod profile;
pub mod retrieval;
