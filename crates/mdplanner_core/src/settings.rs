//! Engine settings resolved from environment variables.
//!
//! # Responsibility
//! - Resolve the data directory, backup policy, durability, and log level.
//! - Reject malformed values instead of silently defaulting.
//!
//! # Invariants
//! - A relative backup directory is resolved against the data directory.
//! - Unset or blank variables fall back to defaults.

use crate::logging::default_log_level;
use crate::persist::WriteDurability;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DATA_DIR_VAR: &str = "MDPLANNER_DATA_DIR";
pub const BACKUP_DIR_VAR: &str = "MD_PLANNER_BACKUP_DIR";
pub const MAX_BACKUPS_VAR: &str = "MD_PLANNER_MAX_BACKUPS";
pub const DURABLE_VAR: &str = "MDPLANNER_DURABLE";
pub const DEBUG_VAR: &str = "MDPLANNER_DEBUG";

const DEFAULT_BACKUP_DIR: &str = "backups";
const DEFAULT_MAX_BACKUPS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    InvalidValue { key: &'static str, value: String },
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value } => write!(f, "invalid value for {key}: `{value}`"),
        }
    }
}

impl Error for SettingsError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub data_dir: PathBuf,
    pub backup_dir: PathBuf,
    pub max_backups: usize,
    pub durability: WriteDurability,
    pub log_level: &'static str,
}

impl StoreSettings {
    /// Settings rooted at `data_dir` with every other value defaulted.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            backup_dir: data_dir.join(DEFAULT_BACKUP_DIR),
            data_dir,
            max_backups: DEFAULT_MAX_BACKUPS,
            durability: WriteDurability::default(),
            log_level: default_log_level(),
        }
    }

    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let data_dir = PathBuf::from(value(DATA_DIR_VAR).unwrap_or_else(|| ".".to_string()));
        let mut settings = Self::new(&data_dir);

        if let Some(raw) = value(BACKUP_DIR_VAR) {
            let backup_dir = PathBuf::from(raw);
            settings.backup_dir = if backup_dir.is_absolute() {
                backup_dir
            } else {
                data_dir.join(backup_dir)
            };
        }
        if let Some(raw) = value(MAX_BACKUPS_VAR) {
            settings.max_backups = raw.parse().map_err(|_| SettingsError::InvalidValue {
                key: MAX_BACKUPS_VAR,
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = value(DURABLE_VAR) {
            if parse_flag(DURABLE_VAR, &raw)? {
                settings.durability = WriteDurability::Durable;
            }
        }
        if let Some(raw) = value(DEBUG_VAR) {
            if parse_flag(DEBUG_VAR, &raw)? {
                settings.log_level = "debug";
            }
        }

        info!(
            "event=settings_load module=settings status=ok max_backups={} durable={} level={}",
            settings.max_backups,
            settings.durability == WriteDurability::Durable,
            settings.log_level
        );
        Ok(settings)
    }
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, SettingsError> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(SettingsError::InvalidValue {
            key,
            value: raw.to_string(),
        }),
    }
}
