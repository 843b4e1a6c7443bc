use assert_float_eq::*;
use chrono::{DateTime, Duration, TimeZone, Utc};

use easy_fpu_rs::calculator::Meal;
use easy_fpu_rs::models::{CarbsEntries, CarbsEntry, CarbsKind, FoodItem, collect_entries};
use easy_fpu_rs::regime::{CarbsRegime, MealExport, write_regime_csv};
use easy_fpu_rs::settings::{JsonSettingsStore, SettingsStore, UserSettings};
use easy_fpu_rs::error::FpuError;
use easy_fpu_rs::state::default_scheme;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 3, 19, 0, 0).unwrap()
}

fn minutes(m: i64) -> DateTime<Utc> {
    start() + Duration::minutes(m)
}

#[test]
fn test_thirty_minutes_at_ten_gives_four_slots() {
    let carbs = collect_entries([CarbsEntry::new(CarbsKind::Carbs, minutes(10), 12.0)]);
    let empty = CarbsEntries::new();

    let regime = CarbsRegime::build(start(), minutes(30), 10, &empty, &carbs, &empty).unwrap();

    let times: Vec<DateTime<Utc>> = regime.entries.keys().copied().collect();
    assert_eq!(times, vec![minutes(0), minutes(10), minutes(20), minutes(30)]);
    assert!(regime.slot(&minutes(0)).unwrap().is_empty());
    assert_eq!(regime.slot(&minutes(10)).unwrap().len(), 1);
    assert!(regime.slot(&minutes(20)).unwrap().is_empty());
    assert_eq!(regime.max_total_carbs, 12.0);
}

#[test]
fn test_each_collection_contributes_once_per_slot() {
    let sugars = collect_entries([CarbsEntry::new(CarbsKind::Sugars, minutes(0), 5.0)]);
    let carbs = collect_entries([
        CarbsEntry::new(CarbsKind::Carbs, minutes(0), 2.0),
        CarbsEntry::new(CarbsKind::Carbs, minutes(5), 3.0),
    ]);
    let e_carbs = collect_entries([CarbsEntry::new(CarbsKind::ECarbs, minutes(15), 1.0)]);

    let regime = CarbsRegime::build(start(), minutes(20), 10, &sugars, &carbs, &e_carbs).unwrap();

    // Slot 0: sugars 5 + latest carbs 3
    assert_float_absolute_eq!(regime.total_carbs(&minutes(0)), 8.0, 1e-9);
    assert_float_absolute_eq!(regime.total_carbs(&minutes(10)), 1.0, 1e-9);
    assert_float_absolute_eq!(regime.total_carbs(&minutes(20)), 0.0, 1e-9);
    assert_float_absolute_eq!(regime.max_total_carbs, 8.0, 1e-9);
}

#[test]
fn test_food_item_encode_decode_roundtrip() {
    let mut item = FoodItem::parse("Lasagne", true, "156.5", "12.25", "3", "420").unwrap();
    item.typical_amounts.push(easy_fpu_rs::models::TypicalAmount {
        amount: 350,
        comment: "one plate".to_string(),
    });

    let json = item.encode().unwrap();
    let decoded = FoodItem::decode(&json).unwrap();
    assert_eq!(decoded, item);
}

#[test]
fn test_meal_export_with_stored_settings() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut store = JsonSettingsStore::open(dir.path().join("settings.json")).unwrap();
    let settings = UserSettings {
        e_carbs_factor: 8.0,
        e_carbs_delay_minutes: 60,
        e_carbs_interval_minutes: 15,
        ..Default::default()
    };
    settings.save(&mut store).unwrap();

    let reopened = JsonSettingsStore::open(store.path()).unwrap();
    assert!(reopened.get("ECarbsFactor").is_some());
    let settings = UserSettings::load(&reopened);
    assert_eq!(settings.e_carbs_interval_minutes, 15);

    // 3 FPU -> 5 h
    let item = FoodItem::new("Steak", 300.0, 0.0, 0.0, 100).unwrap();
    let meal = Meal::aggregate([&item]).unwrap();
    let scheme = default_scheme().unwrap();
    let export = MealExport::plan(&meal, &scheme, &settings, false, start()).unwrap();

    assert!(export.carbs.is_empty());
    assert!(export.sugars.is_empty());
    // 5 h / 15 min = 20 entries of 24g / 20
    assert_eq!(export.e_carbs.len(), 20);
    assert_eq!(export.e_carbs.keys().next().copied(), Some(minutes(60)));
    let each = export.e_carbs.values().next().map(|e| e.value).unwrap();
    assert_float_absolute_eq!(each, 1.2, 1e-9);

    let regime = export.regime(start(), Some(15)).unwrap();
    assert_eq!(regime.end, minutes(60 + 19 * 15));
    assert_float_absolute_eq!(regime.max_total_carbs, 1.2, 1e-9);

    let csv_path = dir.path().join("regime.csv");
    write_regime_csv(&regime, &csv_path).unwrap();
    let content = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(content.lines().count(), regime.len() + 1);
}

fn sum_of_kind(regime: &CarbsRegime, kind: CarbsKind) -> f64 {
    regime
        .entries
        .keys()
        .map(|time| regime.carbs_of_kind(time, kind))
        .sum()
}

fn sum_of(entries: &CarbsEntries) -> f64 {
    entries.values().map(|e| e.value).sum()
}

#[test]
fn test_regime_keeps_every_gram_with_mixed_intervals() {
    // Regular carbs every 5 min, e-carbs every 10 min
    let settings = UserSettings::default();
    assert_ne!(
        settings.carbs_interval_minutes,
        settings.e_carbs_interval_minutes
    );

    let item = FoodItem::new("Lasagne", 490.0, 60.0, 10.0, 100).unwrap();
    let meal = Meal::aggregate([&item]).unwrap();
    let scheme = default_scheme().unwrap();
    let export = MealExport::plan(&meal, &scheme, &settings, true, start()).unwrap();

    let regime = export.regime(start(), None).unwrap();
    assert_eq!(regime.interval_minutes, settings.carbs_interval_minutes);

    assert_float_absolute_eq!(sum_of_kind(&regime, CarbsKind::Sugars), 10.0, 1e-9);
    assert_float_absolute_eq!(sum_of_kind(&regime, CarbsKind::Carbs), 50.0, 1e-9);
    assert_float_absolute_eq!(
        sum_of_kind(&regime, CarbsKind::ECarbs),
        sum_of(&export.e_carbs),
        1e-9
    );
    assert_float_absolute_eq!(sum_of(&export.e_carbs), export.total_e_carbs, 1e-9);

    let err = export
        .regime(start(), Some(settings.e_carbs_interval_minutes))
        .unwrap_err();
    assert!(matches!(err, FpuError::InvalidNumericInput(_)));
}
