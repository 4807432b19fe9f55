//! Durable persistence for project documents.
//!
//! # Responsibility
//! - Serialize writes per file path.
//! - Snapshot and prune previous versions.
//! - Replace documents atomically.
//!
//! # See also
//! - `crate::store` for the read-modify-write callers.

pub mod backup;
pub mod lock;
pub mod writer;

pub use backup::{content_hash, is_backup_name, BackupManager};
pub use lock::FileLocks;
pub use writer::{read_or_empty, write_atomic, DocumentWriter, WriteDurability};
