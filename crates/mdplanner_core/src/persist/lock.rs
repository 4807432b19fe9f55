//! Per-path write serialization.
//!
//! # Responsibility
//! - Hand out one mutex per canonical file path.
//! - Run a critical section while holding that path's mutex.
//!
//! # Invariants
//! - Two writers of the same path never overlap inside `with_lock`.
//! - Writers of different paths never wait on each other.
//! - A panic inside a critical section does not wedge later writers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LockResult, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
pub struct FileLocks {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

fn recover<'a, T>(result: LockResult<MutexGuard<'a, T>>) -> MutexGuard<'a, T> {
    result.unwrap_or_else(PoisonError::into_inner)
}

impl FileLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let mut locks = recover(self.locks.lock());
        Arc::clone(locks.entry(key).or_default())
    }

    /// Runs `f` while holding the lock of `path`.
    pub fn with_lock<T>(&self, path: &Path, f: impl FnOnce() -> T) -> T {
        let lock = self.lock_for(path);
        let _guard = recover(lock.lock());
        f()
    }

    /// Number of paths seen so far.
    pub fn tracked(&self) -> usize {
        recover(self.locks.lock()).len()
    }
}

#[cfg(test)]
mod tests {
    use super::FileLocks;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn same_path_writers_never_overlap() {
        let locks = Arc::new(FileLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let handles = (0..8)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let inside = Arc::clone(&inside);
                let peak = Arc::clone(&peak);
                thread::spawn(move || {
                    locks.with_lock(Path::new("/tmp/mdplanner-lock-test.md"), || {
                        let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        thread::sleep(Duration::from_millis(2));
                        inside.fetch_sub(1, Ordering::SeqCst);
                    });
                })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(peak.load(Ordering::SeqCst), 1);
        assert_eq!(locks.tracked(), 1);
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let locks = Arc::new(FileLocks::new());
        let path = Path::new("/tmp/mdplanner-poison-test.md");
        let cloned = Arc::clone(&locks);
        let _ = thread::spawn(move || {
            cloned.with_lock(Path::new("/tmp/mdplanner-poison-test.md"), || panic!("boom"));
        })
        .join();

        assert_eq!(locks.with_lock(path, || 7), 7);
    }
}
