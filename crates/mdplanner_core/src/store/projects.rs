//! Project files: listing, creation, selection, header, and configuration.

use super::{check_filename, ProjectStore};
use crate::error::{StoreError, StoreResult};
use crate::markup::section::Document;
use crate::model::project::{ProjectConfig, ProjectInfo, ProjectMeta};
use crate::persist::is_backup_name;
use crate::sections::project::{
    decode_project_config, decode_project_info, encode_project_config, initial_document,
    CONFIG_SECTION,
};
use chrono::{DateTime, SecondsFormat, Utc};
use log::{info, warn};
use std::fs;
use std::path::Path;
use std::time::Instant;

/// `My Project` -> `my-project.md`.
pub fn project_filename(name: &str) -> String {
    let slug = name
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    format!("{slug}.md")
}

fn modified_rfc3339(path: &Path) -> String {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map(|time| DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl ProjectStore {
    /// Project files in the data directory, sorted by file name.
    pub fn scan_projects(&self) -> StoreResult<Vec<ProjectMeta>> {
        let data_dir = &self.settings.data_dir;
        let entries = fs::read_dir(data_dir).map_err(|source| StoreError::io(data_dir, source))?;

        let mut projects = Vec::new();
        for entry in entries.filter_map(Result::ok) {
            let path = entry.path();
            let filename = entry.file_name().to_string_lossy().into_owned();
            if !path.is_file() || !filename.ends_with(".md") || is_backup_name(&filename) {
                continue;
            }
            let name = match fs::read_to_string(&path) {
                Ok(text) => decode_project_info(&Document::parse(&text), &self.registry).name,
                Err(err) => {
                    warn!(
                        "event=project_scan module=store status=error error_code=read_failed error={err}"
                    );
                    String::new()
                }
            };
            projects.push(ProjectMeta {
                name: if name.is_empty() { file_stem(&path) } else { name },
                last_updated: modified_rfc3339(&path),
                filename,
            });
        }
        projects.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(projects)
    }

    /// Writes a fresh project document and makes it active.
    pub fn create_project(&self, name: &str) -> StoreResult<ProjectMeta> {
        let started = Instant::now();
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidInput("project name is empty".to_string()));
        }
        let filename = project_filename(name);
        check_filename(&filename)?;
        let path = self.project_path(&filename);
        if path.exists() {
            return Err(StoreError::ProjectExists(filename));
        }

        fs::create_dir_all(&self.settings.data_dir)
            .map_err(|source| StoreError::io(&self.settings.data_dir, source))?;
        let text = initial_document(name, &self.clock.today());
        self.writer.write(&path, &text)?;
        self.set_active(Some(filename.clone()));
        info!(
            "event=project_create module=store status=ok duration_ms={}",
            started.elapsed().as_millis()
        );

        Ok(ProjectMeta {
            filename,
            name: name.to_string(),
            last_updated: modified_rfc3339(&path),
        })
    }

    /// Makes an existing project file the target of record operations.
    pub fn switch_project(&self, filename: &str) -> StoreResult<()> {
        check_filename(filename)?;
        if !self.project_path(filename).is_file() {
            warn!("event=project_switch module=store status=error error_code=project_not_found");
            return Err(StoreError::ProjectNotFound(filename.to_string()));
        }
        self.set_active(Some(filename.to_string()));
        info!("event=project_switch module=store status=ok");
        Ok(())
    }

    pub fn read_project_info(&self) -> StoreResult<ProjectInfo> {
        let (path, doc) = self.read_document()?;
        let mut info = decode_project_info(&doc, &self.registry);
        if info.name.is_empty() {
            info.name = file_stem(&path);
        }
        info.last_updated = modified_rfc3339(&path);
        Ok(info)
    }

    pub fn read_project_config(&self) -> StoreResult<ProjectConfig> {
        let (_, doc) = self.read_document()?;
        Ok(doc
            .section(&self.registry, CONFIG_SECTION)
            .map(|lines| decode_project_config(lines, &self.registry))
            .unwrap_or_default())
    }

    pub fn save_project_config(&self, config: &ProjectConfig) -> StoreResult<()> {
        self.edit_section(CONFIG_SECTION, |_| Ok((encode_project_config(config), ())))
    }
}
