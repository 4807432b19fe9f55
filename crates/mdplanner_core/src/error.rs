//! Engine-wide error taxonomy.
//!
//! # Responsibility
//! - Classify failures into not-found, malformed input, and I/O families.
//! - Carry the offending path for every filesystem failure.
//!
//! # Invariants
//! - Field-level parse problems never reach this type; they degrade to
//!   documented defaults inside the section codecs.
//! - `Io` always names the path that failed.

use crate::markup::section::RegistryError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error returned by store and persistence operations.
#[derive(Debug)]
pub enum StoreError {
    /// Filesystem failure while touching `path`.
    Io { path: PathBuf, source: io::Error },
    /// Requested record id is absent from its collection.
    NotFound { kind: &'static str, id: String },
    /// Project file does not exist in the data directory.
    ProjectNotFound(String),
    /// Project file already exists in the data directory.
    ProjectExists(String),
    /// Record operation attempted before a project was selected.
    NoActiveProject,
    /// Caller supplied a value that cannot be stored.
    InvalidInput(String),
    /// Section registry rejected a marker.
    Registry(RegistryError),
}

impl StoreError {
    pub(crate) fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub(crate) fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Stable machine-readable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io_failed",
            Self::NotFound { .. } => "not_found",
            Self::ProjectNotFound(_) => "project_not_found",
            Self::ProjectExists(_) => "project_exists",
            Self::NoActiveProject => "no_active_project",
            Self::InvalidInput(_) => "invalid_input",
            Self::Registry(_) => "registry_rejected",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {}: {source}", path.display()),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::ProjectNotFound(name) => write!(f, "project not found: {name}"),
            Self::ProjectExists(name) => write!(f, "project already exists: {name}"),
            Self::NoActiveProject => write!(f, "no active project selected"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::Registry(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Registry(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RegistryError> for StoreError {
    fn from(value: RegistryError) -> Self {
        Self::Registry(value)
    }
}
