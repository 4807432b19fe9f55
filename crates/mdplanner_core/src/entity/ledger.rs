//! Bullet ledger engine for flat billing records.
//!
//! # Responsibility
//! - Decode `- {key: value; ...}` lines into typed records.
//! - Render one bullet line per record.
//!
//! # Invariants
//! - Lines that are not `- {...}` bullets are ignored.
//! - Render order is collection order.

use super::{assign_missing_ids, Record};
use crate::markup::config::ConfigMap;
use crate::markup::section::SectionRegistry;

/// Record kind stored as one inline config per bullet.
pub trait LedgerEntity: Record {
    fn from_config(config: &ConfigMap) -> Self;
    fn to_config(&self) -> ConfigMap;
}

/// Returns the config of a `- {...}` bullet line.
pub fn bullet_config(trimmed: &str) -> Option<ConfigMap> {
    let rest = trimmed.strip_prefix("- ")?.trim();
    if rest.starts_with('{') && rest.ends_with('}') {
        return Some(ConfigMap::parse(rest));
    }
    None
}

pub fn decode_ledger<T: LedgerEntity>(lines: &[String], registry: &SectionRegistry) -> Vec<T> {
    let mut records = Vec::new();
    for line in lines {
        let trimmed = line.trim();
        if registry.is_boundary(trimmed) {
            break;
        }
        if let Some(config) = bullet_config(trimmed) {
            records.push(T::from_config(&config));
        }
    }
    assign_missing_ids(&mut records);
    records
}

pub fn encode_ledger<T: LedgerEntity>(records: &[T]) -> String {
    let section = T::SECTION;
    let mut out = format!("<!-- {section} -->\n# {section}\n\n");
    for record in records {
        out.push_str("- ");
        out.push_str(&record.to_config().render());
        out.push('\n');
    }
    if !records.is_empty() {
        out.push('\n');
    }
    out
}
