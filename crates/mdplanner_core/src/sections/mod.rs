//! Per-section codecs.
//!
//! Heading-record and ledger kinds implement [`crate::entity::SectionCodec`]
//! in their module. The board, time tracking, and project configuration have
//! bespoke grammars and expose free decode/encode functions instead.

pub mod analysis;
pub mod billing;
pub mod board;
pub mod canvas;
pub mod capacity;
pub mod notes;
pub mod planning;
pub mod project;
pub mod strategy;
pub mod time;
