use mdplanner_core::persist::{BackupManager, DocumentWriter, WriteDurability};
use mdplanner_core::{Goal, ProjectStore, StoreSettings};
use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

fn writer(backup_dir: &Path, max_backups: usize) -> DocumentWriter {
    DocumentWriter::new(
        BackupManager::new(backup_dir, max_backups),
        WriteDurability::Durable,
    )
}

fn backup_count(dir: &Path) -> usize {
    fs::read_dir(dir)
        .map(|entries| entries.filter_map(Result::ok).count())
        .unwrap_or(0)
}

#[test]
fn identical_writes_leave_one_backup() {
    let dir = TempDir::new().unwrap();
    let backups = dir.path().join("backups");
    let path = dir.path().join("plan.md");
    fs::write(&path, "# Plan\n\nfirst\n").unwrap();

    let writer = writer(&backups, 10);
    writer.write(&path, "# Plan\n\nsecond\n").unwrap();
    writer.write(&path, "# Plan\n\nsecond\n").unwrap();

    assert_eq!(backup_count(&backups), 1);
    let kept = writer.backups().list("plan");
    assert_eq!(fs::read_to_string(&kept[0]).unwrap(), "# Plan\n\nfirst\n");
    assert_eq!(fs::read_to_string(&path).unwrap(), "# Plan\n\nsecond\n");
}

#[test]
fn first_write_of_new_file_creates_no_backup() {
    let dir = TempDir::new().unwrap();
    let backups = dir.path().join("backups");
    let path = dir.path().join("fresh.md");

    let writer = writer(&backups, 10);
    writer.write(&path, "# Fresh\n").unwrap();
    writer.write(&path, "# Fresh\n").unwrap();

    assert_eq!(backup_count(&backups), 0);
}

#[test]
fn unchanged_file_is_not_snapshotted_twice() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plan.md");
    fs::write(&path, "same").unwrap();

    let manager = BackupManager::new(dir.path().join("backups"), 10);
    assert!(manager.snapshot(&path).unwrap().is_some());
    assert!(manager.snapshot(&path).unwrap().is_none());
    assert_eq!(manager.list("plan").len(), 1);
}

#[test]
fn retention_keeps_newest_backups() {
    let dir = TempDir::new().unwrap();
    let backups = dir.path().join("backups");
    fs::create_dir_all(&backups).unwrap();

    let now = SystemTime::now();
    for hour in 1..=5u64 {
        let old = backups.join(format!("plan_backup_2026-01-0{hour}T00-00-00-000Z.md"));
        fs::write(&old, format!("old {hour}")).unwrap();
        File::options()
            .write(true)
            .open(&old)
            .unwrap()
            .set_modified(now - Duration::from_secs(hour * 3600))
            .unwrap();
    }

    let path = dir.path().join("plan.md");
    fs::write(&path, "current").unwrap();
    writer(&backups, 2).write(&path, "next").unwrap();

    let kept = BackupManager::new(&backups, 2).list("plan");
    assert_eq!(kept.len(), 2);
    assert_eq!(fs::read_to_string(&kept[0]).unwrap(), "current");
    assert!(kept[1].ends_with("plan_backup_2026-01-01T00-00-00-000Z.md"));
    assert_eq!(backup_count(&backups), 2);
}

#[test]
fn locked_read_modify_write_keeps_every_concurrent_create() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(ProjectStore::new(StoreSettings::new(dir.path())));
    store.create_project("Race").unwrap();

    let handles = (0..8)
        .map(|idx| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                store
                    .create(Goal {
                        id: format!("goal_t{idx}"),
                        ..Goal::new(format!("Goal {idx}"))
                    })
                    .unwrap();
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.join().unwrap();
    }

    let goals = store.read_all::<Goal>().unwrap();
    assert_eq!(goals.len(), 8);
    let tmp_left = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .any(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"));
    assert!(!tmp_left);
}
