//! Text grammar shared by every section codec.

pub mod config;
pub mod ids;
pub mod section;
