use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::error::{FpuError, Result};
use crate::models::{CarbsEntries, CarbsEntry, CarbsKind};

/// Carbs entries laid out on an even time grid.
///
/// Every slot time from `start` through `end` (inclusive) has a key in
/// `entries`; slots without a matching entry hold an empty list.
#[derive(Debug, Clone, PartialEq)]
pub struct CarbsRegime {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub interval_minutes: i64,
    pub max_total_carbs: f64,
    pub entries: BTreeMap<DateTime<Utc>, Vec<CarbsEntry>>,
}

impl CarbsRegime {
    /// Lay sugars, carbs and e-carbs entries out on the grid
    /// `start, start + interval, ...` up to and including `end`.
    ///
    /// An entry belongs to slot `t` when `t <= time < t + interval`. Each
    /// collection contributes at most one entry per slot, checked in the
    /// order e-carbs, carbs, sugars; if several entries of one collection
    /// fall into the same slot, the latest one is taken. The start slot is
    /// always produced, even when `end` lies before `start`.
    pub fn build(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval_minutes: i64,
        sugars: &CarbsEntries,
        carbs: &CarbsEntries,
        e_carbs: &CarbsEntries,
    ) -> Result<Self> {
        if interval_minutes <= 0 {
            return Err(FpuError::InvalidNumericInput(format!(
                "interval must be a positive number of minutes, got {}",
                interval_minutes
            )));
        }
        let interval = Duration::minutes(interval_minutes);

        let mut entries = BTreeMap::new();
        let mut max_total_carbs: f64 = 0.0;
        let mut time = start;

        loop {
            let slot_end = time + interval;
            let slot: Vec<CarbsEntry> = [e_carbs, carbs, sugars]
                .into_iter()
                .filter_map(|source| latest_in_window(source, time, slot_end))
                .collect();

            let total: f64 = slot.iter().map(|e| e.value).sum();
            max_total_carbs = max_total_carbs.max(total);
            entries.insert(time, slot);

            time = slot_end;
            if time > end {
                break;
            }
        }

        debug!(
            slots = entries.len(),
            max_total_carbs = max_total_carbs,
            "carbs regime built"
        );

        Ok(Self {
            start,
            end,
            interval_minutes,
            max_total_carbs,
            entries,
        })
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries of the slot starting at `time`, if that is a slot time.
    pub fn slot(&self, time: &DateTime<Utc>) -> Option<&[CarbsEntry]> {
        self.entries.get(time).map(Vec::as_slice)
    }

    /// Sum of all entries in the slot starting at `time`.
    pub fn total_carbs(&self, time: &DateTime<Utc>) -> f64 {
        self.slot(time)
            .map(|slot| slot.iter().map(|e| e.value).sum())
            .unwrap_or(0.0)
    }

    /// Sum of the entries of one kind in the slot starting at `time`.
    pub fn carbs_of_kind(&self, time: &DateTime<Utc>, kind: CarbsKind) -> f64 {
        self.slot(time)
            .map(|slot| {
                slot.iter()
                    .filter(|e| e.kind == kind)
                    .map(|e| e.value)
                    .sum()
            })
            .unwrap_or(0.0)
    }
}

fn latest_in_window(
    source: &CarbsEntries,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Option<CarbsEntry> {
    source.range(from..to).next_back().map(|(_, entry)| *entry)
}
