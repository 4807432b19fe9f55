//! Locked, snapshotting, atomic document writer.
//!
//! # Responsibility
//! - Serialize writers of one path through [`FileLocks`].
//! - Snapshot the previous content before replacing it.
//! - Replace the file through a sibling temp file and a rename.
//!
//! # Invariants
//! - Readers observe either the old or the new content, never a mix.
//! - A failed rename removes the temp file and leaves the target untouched.
//! - Snapshot failures are logged and do not block the write.

use super::backup::BackupManager;
use super::lock::FileLocks;
use crate::error::{StoreError, StoreResult};
use log::{info, warn};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// How hard the writer tries to reach stable storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteDurability {
    /// Temp file plus rename, no fsync.
    #[default]
    BestEffort,
    /// Also fsyncs the temp file and, on unix, the parent directory.
    Durable,
}

#[derive(Debug)]
pub struct DocumentWriter {
    locks: FileLocks,
    backups: BackupManager,
    durability: WriteDurability,
}

impl DocumentWriter {
    pub fn new(backups: BackupManager, durability: WriteDurability) -> Self {
        Self {
            locks: FileLocks::new(),
            backups,
            durability,
        }
    }

    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    /// Runs a read-modify-write cycle under the lock of `path`.
    ///
    /// `update` receives the current text (empty when the file is missing)
    /// and returns the replacement, or `None` to leave the file alone.
    pub fn update<T>(
        &self,
        path: &Path,
        update: impl FnOnce(&str) -> StoreResult<(Option<String>, T)>,
    ) -> StoreResult<T> {
        self.locks.with_lock(path, || {
            let current = read_or_empty(path)?;
            let (next, value) = update(&current)?;
            if let Some(next) = next {
                self.write_unlocked(path, &current, &next)?;
            }
            Ok(value)
        })
    }

    /// Replaces the whole file with `content`.
    pub fn write(&self, path: &Path, content: &str) -> StoreResult<()> {
        self.locks.with_lock(path, || {
            let current = read_or_empty(path)?;
            self.write_unlocked(path, &current, content)
        })
    }

    fn write_unlocked(&self, path: &Path, current: &str, content: &str) -> StoreResult<()> {
        if current != content {
            if let Err(err) = self.backups.snapshot(path) {
                warn!(
                    "event=backup_create module=persist status=error error_code={}",
                    err.code()
                );
            }
        }
        write_atomic(path, content.as_bytes(), self.durability)
    }
}

/// File text, or an empty string when the file does not exist.
pub fn read_or_empty(path: &Path) -> StoreResult<String> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(source) => Err(StoreError::io(path, source)),
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut raw = path.as_os_str().to_os_string();
    raw.push(".tmp");
    PathBuf::from(raw)
}

/// Writes `contents` to `path` through a sibling `.tmp` file and a rename.
pub fn write_atomic(path: &Path, contents: &[u8], durability: WriteDurability) -> StoreResult<()> {
    let started = Instant::now();
    let tmp = temp_path(path);

    let result = (|| -> StoreResult<()> {
        let mut file = fs::File::create(&tmp).map_err(|source| StoreError::io(&tmp, source))?;
        file.write_all(contents)
            .map_err(|source| StoreError::io(&tmp, source))?;
        if durability == WriteDurability::Durable {
            file.sync_all().map_err(|source| StoreError::io(&tmp, source))?;
        }
        drop(file);
        fs::rename(&tmp, path).map_err(|source| StoreError::io(path, source))
    })();

    if let Err(err) = result {
        let _ = fs::remove_file(&tmp);
        warn!(
            "event=atomic_write module=persist status=error error_code={}",
            err.code()
        );
        return Err(err);
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                let dir =
                    fs::File::open(parent).map_err(|source| StoreError::io(parent, source))?;
                dir.sync_all().map_err(|source| StoreError::io(parent, source))?;
            }
        }
    }

    info!(
        "event=atomic_write module=persist status=ok bytes={} durable={} duration_ms={}",
        contents.len(),
        durability == WriteDurability::Durable,
        started.elapsed().as_millis()
    );
    Ok(())
}
