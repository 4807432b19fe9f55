//! Generic record contracts shared by every section kind.
//!
//! # Responsibility
//! - Describe a record kind once: section name, id scheme, and codec.
//! - Assign ids for records read without a persisted identity comment.
//!
//! # Invariants
//! - Persisted ids always win; generated ids only fill empty slots.
//! - Ids are unique within one decoded collection.
//!
//! # See also
//! - `heading` for the `## Title {config}` record engine.
//! - `ledger` for `- {config}` bullet records.

pub mod heading;
pub mod ledger;

use crate::markup::ids::{next_prefixed_id, next_sequence_id, random_hex_id};
use crate::markup::section::SectionRegistry;

pub use heading::{BodyStyle, BucketStyle, EntityLayout, HeadingEntity, RawRecord};
pub use ledger::LedgerEntity;

/// How new ids are minted for one record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdScheme {
    /// 8 random hex characters.
    Random,
    /// `prefix` plus `1 + max(existing suffix)`.
    Prefixed(&'static str),
    /// Plain integers, `1 + max(existing)`.
    Sequence,
}

impl IdScheme {
    /// Next id for a collection currently holding `existing`.
    pub fn next<'a, I>(self, existing: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        match self {
            Self::Random => random_hex_id(),
            Self::Prefixed(prefix) => next_prefixed_id(prefix, existing),
            Self::Sequence => next_sequence_id(existing),
        }
    }
}

/// One addressable record inside a section collection.
pub trait Record: Clone {
    /// Kind name used in not-found errors and log lines.
    const KIND: &'static str;
    /// Sentinel name of the owning section.
    const SECTION: &'static str;
    const ID_SCHEME: IdScheme;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

/// Converts between a section's content lines and a typed collection.
pub trait SectionCodec: Record {
    /// Decodes section content lines. Never fails; bad fields fall back to
    /// defaults and records without an id receive a fresh one.
    fn decode(lines: &[String], registry: &SectionRegistry) -> Vec<Self>;

    /// Renders the whole section including its sentinel and heading.
    fn encode(records: &[Self]) -> String;
}

/// Next id for `records` under the kind's id scheme.
pub fn next_id<T: Record>(records: &[T]) -> String {
    T::ID_SCHEME.next(records.iter().map(Record::id))
}

/// Fills empty ids after a full decode so persisted ids are never shadowed.
pub fn assign_missing_ids<T: Record>(records: &mut [T]) {
    for idx in 0..records.len() {
        if !records[idx].id().is_empty() {
            continue;
        }
        let id = next_id(records);
        records[idx].set_id(id);
    }
}

/// Implements [`SectionCodec`] through the heading engine.
macro_rules! heading_codec {
    ($($kind:ty),+ $(,)?) => {
        $(
            impl $crate::entity::SectionCodec for $kind {
                fn decode(
                    lines: &[String],
                    registry: &$crate::markup::section::SectionRegistry,
                ) -> Vec<Self> {
                    $crate::entity::heading::decode_records::<$kind>(lines, registry)
                }

                fn encode(records: &[Self]) -> String {
                    $crate::entity::heading::encode_records::<$kind>(records)
                }
            }
        )+
    };
}

/// Implements [`SectionCodec`] through the bullet ledger engine.
macro_rules! ledger_codec {
    ($($kind:ty),+ $(,)?) => {
        $(
            impl $crate::entity::SectionCodec for $kind {
                fn decode(
                    lines: &[String],
                    registry: &$crate::markup::section::SectionRegistry,
                ) -> Vec<Self> {
                    $crate::entity::ledger::decode_ledger::<$kind>(lines, registry)
                }

                fn encode(records: &[Self]) -> String {
                    $crate::entity::ledger::encode_ledger::<$kind>(records)
                }
            }
        )+
    };
}

pub(crate) use heading_codec;
pub(crate) use ledger_codec;
