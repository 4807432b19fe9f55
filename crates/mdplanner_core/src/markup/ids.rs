//! Record identifier policy.
//!
//! # Responsibility
//! - Generate random 8-hex-digit ids for flat record kinds.
//! - Generate `prefix_N` and plain `N` sequential ids for ordered kinds.
//!
//! # Invariants
//! - Sequential ids are `1 + max(existing suffix)`; gaps are never reused.
//! - Ids with a non-numeric suffix are ignored when computing the maximum.

use uuid::Uuid;

/// Returns 8 lowercase hex characters taken from a fresh v4 uuid.
pub fn random_hex_id() -> String {
    let uuid = Uuid::new_v4();
    hex::encode(&uuid.as_bytes()[..4])
}

/// Returns `prefix` followed by one more than the largest numeric suffix in
/// `existing`, or `prefix1` when none match.
pub fn next_prefixed_id<'a, I>(prefix: &str, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let max = existing
        .into_iter()
        .filter_map(|id| id.strip_prefix(prefix))
        .filter_map(|suffix| suffix.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format!("{prefix}{}", max + 1)
}

/// Plain integer sequence used by tasks.
pub fn next_sequence_id<'a, I>(existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    next_prefixed_id("", existing)
}
