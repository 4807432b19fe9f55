//! Project store: typed collections over one markdown file per project.
//!
//! # Responsibility
//! - Track the active project inside the data directory.
//! - Read a section into typed records and write a collection back.
//! - Provide get/create/update/delete on top of full-collection writes.
//!
//! # Invariants
//! - Every mutation is one locked read-modify-write of the whole file.
//! - Only the addressed section changes; all other bytes are preserved.
//! - Record operations fail with `NoActiveProject` until a project is chosen.
//!
//! # See also
//! - `crate::persist` for locking, snapshots, and atomic replacement.
//! - `crate::sections` for the per-kind codecs.

pub mod clock;
mod projects;
mod records;
mod tasks;
mod time;

use crate::entity::{next_id, SectionCodec};
use crate::error::{StoreError, StoreResult};
use crate::markup::section::{Document, SectionRegistry};
use crate::persist::{read_or_empty, BackupManager, DocumentWriter};
use crate::settings::{SettingsError, StoreSettings};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

pub use clock::{Clock, FixedClock, SystemClock};
pub use projects::project_filename;

pub struct ProjectStore {
    settings: StoreSettings,
    registry: SectionRegistry,
    writer: DocumentWriter,
    clock: Box<dyn Clock>,
    active: Mutex<Option<String>>,
}

impl ProjectStore {
    pub fn new(settings: StoreSettings) -> Self {
        let backups = BackupManager::new(settings.backup_dir.clone(), settings.max_backups);
        let writer = DocumentWriter::new(backups, settings.durability);
        Self {
            settings,
            registry: SectionRegistry::standard(),
            writer,
            clock: Box::new(SystemClock),
            active: Mutex::new(None),
        }
    }

    pub fn from_env() -> Result<Self, SettingsError> {
        StoreSettings::from_env().map(Self::new)
    }

    /// Replaces the time source used for create/update stamps.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Adds a section name to the boundary catalog.
    pub fn register_section(&mut self, name: &str) -> StoreResult<()> {
        self.registry.register(name)?;
        Ok(())
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    fn project_path(&self, filename: &str) -> PathBuf {
        self.settings.data_dir.join(filename)
    }

    fn set_active(&self, filename: Option<String>) {
        *self.active.lock().unwrap_or_else(PoisonError::into_inner) = filename;
    }

    /// File name of the active project.
    pub fn active_project(&self) -> Option<String> {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn active_path(&self) -> StoreResult<PathBuf> {
        let filename = self.active_project().ok_or(StoreError::NoActiveProject)?;
        let path = self.project_path(&filename);
        if !path.is_file() {
            return Err(StoreError::ProjectNotFound(filename));
        }
        Ok(path)
    }

    pub(crate) fn read_document(&self) -> StoreResult<(PathBuf, Document)> {
        let path = self.active_path()?;
        let text = read_or_empty(&path)?;
        Ok((path, Document::parse(&text)))
    }

    fn decode<T: SectionCodec>(&self, doc: &Document) -> Vec<T> {
        doc.section(&self.registry, T::SECTION)
            .map(|lines| T::decode(lines, &self.registry))
            .unwrap_or_default()
    }

    /// Locked read-modify-write of the whole active document.
    ///
    /// `edit` returns the new full text and a value for the caller. The file
    /// is left alone when the text is unchanged.
    pub(crate) fn edit_document<R>(
        &self,
        label: &str,
        edit: impl FnOnce(&Document) -> StoreResult<(String, R)>,
    ) -> StoreResult<R> {
        let path = self.active_path()?;
        let started = Instant::now();
        let result = self.writer.update(&path, |current| {
            let (next, value) = edit(&Document::parse(current))?;
            let changed = next != current;
            Ok((changed.then_some(next), value))
        });
        match &result {
            Ok(_) => info!(
                "event=section_write module=store status=ok section={:?} duration_ms={}",
                label,
                started.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=section_write module=store status=error section={:?} error_code={}",
                label,
                err.code()
            ),
        }
        result
    }

    /// Locked read-modify-write of one section; `edit` renders the section.
    pub(crate) fn edit_section<R>(
        &self,
        section: &str,
        edit: impl FnOnce(&Document) -> StoreResult<(String, R)>,
    ) -> StoreResult<R> {
        self.edit_document(section, |doc| {
            let (rendered, value) = edit(doc)?;
            Ok((doc.replace_section(&self.registry, section, &rendered), value))
        })
    }

    pub fn read_all<T: SectionCodec>(&self) -> StoreResult<Vec<T>> {
        let (_, doc) = self.read_document()?;
        Ok(self.decode(&doc))
    }

    /// Replaces the whole collection of `T`.
    pub fn write_all<T: SectionCodec>(&self, records: &[T]) -> StoreResult<()> {
        self.edit_section(T::SECTION, |_| Ok((T::encode(records), ())))
    }

    /// Locked read-modify-write of the collection of `T`.
    pub fn modify<T, R>(&self, change: impl FnOnce(&mut Vec<T>) -> StoreResult<R>) -> StoreResult<R>
    where
        T: SectionCodec,
    {
        self.edit_section(T::SECTION, |doc| {
            let mut records = self.decode::<T>(doc);
            let value = change(&mut records)?;
            Ok((T::encode(&records), value))
        })
    }

    pub fn next_id<T: SectionCodec>(&self) -> StoreResult<String> {
        Ok(next_id(&self.read_all::<T>()?))
    }

    pub fn get<T: SectionCodec>(&self, id: &str) -> StoreResult<T> {
        self.read_all::<T>()?
            .into_iter()
            .find(|record| record.id() == id)
            .ok_or_else(|| StoreError::not_found(T::KIND, id))
    }

    /// Appends `record`, minting an id when it has none.
    pub fn create<T: SectionCodec>(&self, record: T) -> StoreResult<T> {
        self.modify(|records: &mut Vec<T>| insert_record(records, record))
    }

    /// Replaces the record `id`, keeping its id and position.
    pub fn update<T: SectionCodec>(&self, id: &str, record: T) -> StoreResult<T> {
        self.modify(|records: &mut Vec<T>| replace_record(records, id, record))
    }

    pub fn delete<T: SectionCodec>(&self, id: &str) -> StoreResult<()> {
        self.modify(|records: &mut Vec<T>| remove_record(records, id).map(|_| ()))
    }
}

pub(crate) fn insert_record<T: SectionCodec>(records: &mut Vec<T>, mut record: T) -> StoreResult<T> {
    if record.id().is_empty() {
        record.set_id(next_id(records));
    } else if records.iter().any(|existing| existing.id() == record.id()) {
        return Err(StoreError::InvalidInput(format!(
            "{} id already in use: {}",
            T::KIND,
            record.id()
        )));
    }
    records.push(record.clone());
    Ok(record)
}

pub(crate) fn replace_record<T: SectionCodec>(
    records: &mut [T],
    id: &str,
    mut record: T,
) -> StoreResult<T> {
    let slot = records
        .iter_mut()
        .find(|existing| existing.id() == id)
        .ok_or_else(|| StoreError::not_found(T::KIND, id))?;
    record.set_id(id.to_string());
    *slot = record.clone();
    Ok(record)
}

pub(crate) fn remove_record<T: SectionCodec>(records: &mut Vec<T>, id: &str) -> StoreResult<T> {
    let pos = records
        .iter()
        .position(|existing| existing.id() == id)
        .ok_or_else(|| StoreError::not_found(T::KIND, id))?;
    Ok(records.remove(pos))
}

/// Rejects names that would escape the data directory.
fn check_filename(filename: &str) -> StoreResult<()> {
    let path = Path::new(filename);
    let plain = path.components().count() == 1
        && path.file_name().is_some_and(|name| name == filename)
        && !filename.starts_with('.');
    if filename.is_empty() || !plain {
        return Err(StoreError::InvalidInput(format!(
            "project file name must be a plain file name: `{filename}`"
        )));
    }
    Ok(())
}
