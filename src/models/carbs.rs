use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source collection a carbs entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarbsKind {
    Sugars,
    Carbs,
    ECarbs,
}

impl fmt::Display for CarbsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CarbsKind::Sugars => "sugars",
            CarbsKind::Carbs => "carbs",
            CarbsKind::ECarbs => "e-carbs",
        };
        f.write_str(label)
    }
}

/// A single carbs amount (grams) taking effect at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarbsEntry {
    pub kind: CarbsKind,
    pub time: DateTime<Utc>,
    pub value: f64,
}

impl CarbsEntry {
    pub fn new(kind: CarbsKind, time: DateTime<Utc>, value: f64) -> Self {
        Self { kind, time, value }
    }
}

/// One source collection, keyed by entry time.
pub type CarbsEntries = BTreeMap<DateTime<Utc>, CarbsEntry>;

/// Collect entries into a time-keyed collection; a later entry with the same
/// time replaces an earlier one.
pub fn collect_entries<I>(entries: I) -> CarbsEntries
where
    I: IntoIterator<Item = CarbsEntry>,
{
    entries.into_iter().map(|e| (e.time, e)).collect()
}
