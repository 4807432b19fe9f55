//! Record types for every section kind.
//!
//! # Responsibility
//! - Define the typed, serde-ready shape of each record kind.
//! - Keep defaults for absent fields next to the types.
//!
//! # Invariants
//! - Every record carries a string `id` unique within its kind.
//! - Empty strings and empty lists mean "absent" and are skipped in JSON.

pub mod analysis;
pub mod billing;
pub mod canvas;
pub mod capacity;
pub mod note;
pub mod planning;
pub mod project;
pub mod strategy;
pub mod task;
pub mod time;
