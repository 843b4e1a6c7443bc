use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::calculator::{AbsorptionScheme, Meal};
use crate::error::{FpuError, Result};
use crate::models::{CarbsEntries, CarbsEntry, CarbsKind};
use crate::regime::builder::CarbsRegime;
use crate::settings::UserSettings;

/// The three carbs collections derived from a meal, ready to be exported or
/// laid out as a [`CarbsRegime`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MealExport {
    pub sugars: CarbsEntries,
    pub carbs: CarbsEntries,
    pub e_carbs: CarbsEntries,
    /// Grams of extended carbs in total.
    pub total_e_carbs: f64,
    /// Hours over which extended carbs are spread.
    pub absorption_time: f64,
    /// Minutes between regular-carbs entries.
    pub carbs_interval_minutes: i64,
    /// Minutes between extended-carbs entries.
    pub e_carbs_interval_minutes: i64,
}

impl MealExport {
    /// Derive carbs entries for a meal eaten at `now`.
    ///
    /// - sugars: a single entry at `now`;
    /// - regular carbs: spread over the carbs duration starting after the
    ///   carbs delay, one entry per carbs interval;
    /// - extended carbs: spread over the scheme's absorption time for the
    ///   meal's FPUs starting after the e-carbs delay, one entry per e-carbs
    ///   interval.
    ///
    /// Collections with nothing to export stay empty.
    pub fn plan(
        meal: &Meal,
        scheme: &AbsorptionScheme,
        settings: &UserSettings,
        treat_sugars_separately: bool,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        settings.validate()?;

        let mut sugars = CarbsEntries::new();
        let sugars_total = meal.sugars(treat_sugars_separately);
        if sugars_total > 0.0 {
            sugars.insert(now, CarbsEntry::new(CarbsKind::Sugars, now, sugars_total));
        }

        let carbs = spread(
            CarbsKind::Carbs,
            meal.regular_carbs(treat_sugars_separately),
            now + Duration::minutes(settings.carbs_delay_minutes),
            settings.carbs_duration_hours,
            settings.carbs_interval_minutes,
        );

        let total_e_carbs = meal.extended_carbs(settings.e_carbs_factor);
        let absorption_time = meal.absorption_time(scheme)?;
        let e_carbs = spread(
            CarbsKind::ECarbs,
            total_e_carbs,
            now + Duration::minutes(settings.e_carbs_delay_minutes),
            absorption_time,
            settings.e_carbs_interval_minutes,
        );

        debug!(
            sugars = sugars.len(),
            carbs = carbs.len(),
            e_carbs = e_carbs.len(),
            "meal export planned"
        );

        Ok(Self {
            sugars,
            carbs,
            e_carbs,
            total_e_carbs,
            absorption_time,
            carbs_interval_minutes: settings.carbs_interval_minutes,
            e_carbs_interval_minutes: settings.e_carbs_interval_minutes,
        })
    }

    /// Latest entry time over all three collections.
    pub fn last_entry_time(&self) -> Option<DateTime<Utc>> {
        [&self.sugars, &self.carbs, &self.e_carbs]
            .into_iter()
            .filter_map(|c| c.keys().next_back().copied())
            .max()
    }

    pub fn is_empty(&self) -> bool {
        self.sugars.is_empty() && self.carbs.is_empty() && self.e_carbs.is_empty()
    }

    /// Longest slot that still holds at most one entry of each collection:
    /// the shortest spacing of any collection with more than one entry.
    ///
    /// `None` when no collection repeats, so any slot length fits.
    pub fn max_slot_minutes(&self) -> Option<i64> {
        [
            (&self.carbs, self.carbs_interval_minutes),
            (&self.e_carbs, self.e_carbs_interval_minutes),
        ]
        .into_iter()
        .filter(|(entries, _)| entries.len() > 1)
        .map(|(_, interval)| interval)
        .min()
    }

    /// Lay the entries out from `now` through the last entry.
    ///
    /// Without an explicit `interval_minutes` the slot length is
    /// [`max_slot_minutes`](Self::max_slot_minutes), falling back to the
    /// e-carbs interval. A longer slot would merge entries of one collection
    /// and is rejected.
    pub fn regime(
        &self,
        now: DateTime<Utc>,
        interval_minutes: Option<i64>,
    ) -> Result<CarbsRegime> {
        let max_slot = self.max_slot_minutes();
        let interval_minutes = interval_minutes
            .or(max_slot)
            .unwrap_or(self.e_carbs_interval_minutes);

        if let Some(max_slot) = max_slot.filter(|&m| interval_minutes > m) {
            return Err(FpuError::InvalidNumericInput(format!(
                "regime interval of {} min is longer than the {} min between carbs entries",
                interval_minutes, max_slot
            )));
        }

        let end = self.last_entry_time().unwrap_or(now);
        CarbsRegime::build(
            now,
            end,
            interval_minutes,
            &self.sugars,
            &self.carbs,
            &self.e_carbs,
        )
    }
}

/// Split `total` grams evenly into entries every `interval_minutes`,
/// covering `duration_hours` from `start`. At least one entry is made.
fn spread(
    kind: CarbsKind,
    total: f64,
    start: DateTime<Utc>,
    duration_hours: f64,
    interval_minutes: i64,
) -> CarbsEntries {
    let mut entries = CarbsEntries::new();
    if total <= 0.0 {
        return entries;
    }

    let count = ((duration_hours * 60.0) / interval_minutes as f64).floor().max(1.0) as i64;
    let per_entry = total / count as f64;
    for i in 0..count {
        let time = start + Duration::minutes(i * interval_minutes);
        entries.insert(time, CarbsEntry::new(kind, time, per_entry));
    }
    entries
}

/// Write one CSV row per slot: time, sugars, carbs, e-carbs and total grams.
pub fn write_regime_csv(regime: &CarbsRegime, path: &Path) -> Result<()> {
    if regime.is_empty() {
        return Err(FpuError::InvalidNumericInput(
            "carbs regime has no slots".to_string(),
        ));
    }

    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["time", "sugars", "carbs", "e_carbs", "total"])?;

    for time in regime.entries.keys() {
        wtr.write_record([
            time.to_rfc3339(),
            format!("{:.2}", regime.carbs_of_kind(time, CarbsKind::Sugars)),
            format!("{:.2}", regime.carbs_of_kind(time, CarbsKind::Carbs)),
            format!("{:.2}", regime.carbs_of_kind(time, CarbsKind::ECarbs)),
            format!("{:.2}", regime.total_carbs(time)),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
