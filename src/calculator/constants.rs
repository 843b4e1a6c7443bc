/// Energy of one gram of carbohydrate, in kcal.
pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;

/// Fat/protein calories that make up one FPU.
pub const KCAL_PER_FPU: f64 = 100.0;

// ─────────────────────────────────────────────────────────────────────────────
// Default user settings
// ─────────────────────────────────────────────────────────────────────────────

/// Grams of extended carbs per FPU.
pub const E_CARBS_FACTOR_DEFAULT: f64 = 10.0;

/// Minutes after the meal before extended carbs start.
pub const E_CARBS_DELAY_DEFAULT: i64 = 90;

/// Minutes between two extended-carbs entries.
pub const E_CARBS_INTERVAL_DEFAULT: i64 = 10;

/// Minutes after the meal before regular carbs start.
pub const CARBS_DELAY_DEFAULT: i64 = 5;

/// Minutes between two regular-carbs entries.
pub const CARBS_INTERVAL_DEFAULT: i64 = 5;

/// Hours over which regular carbs are absorbed.
pub const CARBS_DURATION_DEFAULT: f64 = 3.0;
