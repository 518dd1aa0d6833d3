//! Id policies and the allocator that applies them.

use crate::error::{Error, Result};
use crate::model::Item;

/// Controls how a newly created item gets its id.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdPolicy {
    /// One more than the largest id currently stored, or 1 if empty. Deleting
    /// the highest item frees its id for the next create.
    #[default]
    MaxPlusOne,
    /// Never reuse an id handed out or seen since the store was opened.
    /// The high-water mark lives in memory and is re-seeded from the file on
    /// the next open.
    Monotonic,
}

impl std::str::FromStr for IdPolicy {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "max" | "max-plus-one" => Ok(IdPolicy::MaxPlusOne),
            "monotonic" => Ok(IdPolicy::Monotonic),
            other => Err(Error::Config(format!(
                "unknown id policy {other:?} (expected \"max\" or \"monotonic\")"
            ))),
        }
    }
}

impl std::fmt::Display for IdPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdPolicy::MaxPlusOne => f.write_str("max"),
            IdPolicy::Monotonic => f.write_str("monotonic"),
        }
    }
}

/// Hands out ids according to an [`IdPolicy`].
///
/// Lives behind the store's writer lock, so `next` never runs concurrently
/// with another mutation of the same store.
#[derive(Debug)]
pub(crate) struct IdAllocator {
    policy: IdPolicy,
    high_water: u64,
}

impl IdAllocator {
    pub(crate) fn new(policy: IdPolicy, existing: &[Item]) -> Self {
        Self {
            policy,
            high_water: max_id(existing),
        }
    }

    pub(crate) fn policy(&self) -> IdPolicy {
        self.policy
    }

    /// Pick the id for an item about to be appended to `existing`.
    /// Fails once the largest id is `u64::MAX`.
    pub(crate) fn next(&mut self, existing: &[Item]) -> Result<u64> {
        let floor = match self.policy {
            IdPolicy::MaxPlusOne => max_id(existing),
            IdPolicy::Monotonic => self.high_water.max(max_id(existing)),
        };
        let id = floor.checked_add(1).ok_or(Error::IdsExhausted(floor))?;
        self.high_water = self.high_water.max(id);
        Ok(id)
    }
}

fn max_id(items: &[Item]) -> u64 {
    items.iter().map(|i| i.id).max().unwrap_or(0)
}
