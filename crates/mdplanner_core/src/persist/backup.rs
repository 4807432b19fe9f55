//! Pre-write snapshots with hash dedupe and count-based retention.
//!
//! # Responsibility
//! - Copy the current file into the backup directory before it is replaced.
//! - Skip the copy when the file hash matches the last snapshot of that path.
//! - Keep only the newest `max_backups` snapshots per file stem.
//!
//! # Invariants
//! - Snapshot names are `<stem>_backup_<UTC timestamp>.md`.
//! - A missing source file creates nothing and is not an error.
//! - Pruning failures are logged and never surface to the writer.

use crate::error::{StoreError, StoreResult};
use chrono::Utc;
use log::{info, warn};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::{Instant, SystemTime};

const BACKUP_INFIX: &str = "_backup_";

/// Lowercase hex SHA-256 of `content`.
pub fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Returns true for file names produced by [`BackupManager`].
pub fn is_backup_name(file_name: &str) -> bool {
    file_name.contains(BACKUP_INFIX)
}

#[derive(Debug)]
pub struct BackupManager {
    backup_dir: PathBuf,
    max_backups: usize,
    last_hashes: Mutex<HashMap<PathBuf, String>>,
}

impl BackupManager {
    pub fn new(backup_dir: impl Into<PathBuf>, max_backups: usize) -> Self {
        Self {
            backup_dir: backup_dir.into(),
            max_backups,
            last_hashes: Mutex::new(HashMap::new()),
        }
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    pub fn max_backups(&self) -> usize {
        self.max_backups
    }

    /// Snapshots `path` and prunes old snapshots of the same stem.
    ///
    /// Returns the snapshot path, or `None` when nothing was written.
    pub fn snapshot(&self, path: &Path) -> StoreResult<Option<PathBuf>> {
        let started = Instant::now();
        let content = match fs::read(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("event=backup_skip module=persist status=skipped reason=missing_source");
                return Ok(None);
            }
            Err(source) => return Err(StoreError::io(path, source)),
        };

        let hash = content_hash(&content);
        {
            let hashes = self
                .last_hashes
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if hashes.get(path) == Some(&hash) {
                info!("event=backup_skip module=persist status=skipped reason=unchanged");
                return Ok(None);
            }
        }

        fs::create_dir_all(&self.backup_dir)
            .map_err(|source| StoreError::io(&self.backup_dir, source))?;
        let stem = file_stem(path);
        let target = self.unique_target(&stem);
        fs::write(&target, &content).map_err(|source| StoreError::io(&target, source))?;

        self.last_hashes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_path_buf(), hash);
        info!(
            "event=backup_create module=persist status=ok bytes={} duration_ms={}",
            content.len(),
            started.elapsed().as_millis()
        );

        self.prune(&stem);
        Ok(Some(target))
    }

    fn unique_target(&self, stem: &str) -> PathBuf {
        let stamp = Utc::now().format("%Y-%m-%dT%H-%M-%S-%3fZ");
        let base = format!("{stem}{BACKUP_INFIX}{stamp}");
        let mut target = self.backup_dir.join(format!("{base}.md"));
        let mut n = 1;
        while target.exists() {
            target = self.backup_dir.join(format!("{base}-{n}.md"));
            n += 1;
        }
        target
    }

    /// Snapshots of `stem`, newest first.
    pub fn list(&self, stem: &str) -> Vec<PathBuf> {
        let prefix = format!("{stem}{BACKUP_INFIX}");
        let Ok(entries) = fs::read_dir(&self.backup_dir) else {
            return Vec::new();
        };
        let mut found = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                name.starts_with(&prefix) && name.ends_with(".md")
            })
            .map(|entry| {
                let modified = entry
                    .metadata()
                    .and_then(|meta| meta.modified())
                    .unwrap_or(SystemTime::UNIX_EPOCH);
                (modified, entry.path())
            })
            .collect::<Vec<_>>();
        found.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));
        found.into_iter().map(|(_, path)| path).collect()
    }

    /// Deletes all but the newest `max_backups` snapshots of `stem`.
    pub fn prune(&self, stem: &str) -> usize {
        let mut removed = 0;
        for stale in self.list(stem).into_iter().skip(self.max_backups) {
            match fs::remove_file(&stale) {
                Ok(()) => removed += 1,
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => warn!(
                    "event=backup_prune module=persist status=error error_code=remove_failed error={err}"
                ),
            }
        }
        if removed > 0 {
            info!("event=backup_prune module=persist status=ok removed={removed}");
        }
        removed
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string())
}

#[cfg(test)]
mod tests {
    use super::{content_hash, is_backup_name, BackupManager};
    use std::fs;

    #[test]
    fn hash_is_hex_sha256() {
        assert_eq!(
            content_hash(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn unchanged_source_is_snapshotted_once() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("plan.md");
        fs::write(&source, "# Plan\n").unwrap();
        let manager = BackupManager::new(dir.path().join("backups"), 10);

        let first = manager.snapshot(&source).unwrap().unwrap();
        assert!(is_backup_name(&first.file_name().unwrap().to_string_lossy()));
        assert!(manager.snapshot(&source).unwrap().is_none());
        assert_eq!(manager.list("plan").len(), 1);

        fs::write(&source, "# Plan v2\n").unwrap();
        assert!(manager.snapshot(&source).unwrap().is_some());
        assert_eq!(manager.list("plan").len(), 2);
    }

    #[test]
    fn missing_source_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let manager = BackupManager::new(dir.path().join("backups"), 10);
        assert!(manager.snapshot(&dir.path().join("absent.md")).unwrap().is_none());
        assert!(!dir.path().join("backups").exists());
    }
}
