use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::calculator::AbsorptionScheme;
use crate::error::Result;
use crate::models::{AbsorptionBlockRecord, FoodItem};

/// Bundled default absorption scheme.
const DEFAULT_SCHEME_JSON: &str = include_str!("../../assets/absorptionscheme_default.json");

/// Load food items from a JSON file.
///
/// Every item is validated. Deduplicates by lowercase name (last occurrence wins).
pub fn load_foods<P: AsRef<Path>>(path: P) -> Result<Vec<FoodItem>> {
    let content = fs::read_to_string(path)?;
    let foods: Vec<FoodItem> = serde_json::from_str(&content)?;

    let mut seen: HashMap<String, FoodItem> = HashMap::new();
    for food in foods {
        food.validate()?;
        seen.insert(food.key(), food);
    }

    let mut foods: Vec<FoodItem> = seen.into_values().collect();
    foods.sort_by_key(|f| f.key());
    Ok(foods)
}

/// Save food items to a JSON file.
///
/// Deduplicates by lowercase name before saving.
pub fn save_foods<P: AsRef<Path>>(path: P, foods: &[FoodItem]) -> Result<()> {
    let mut seen: HashMap<String, &FoodItem> = HashMap::new();
    for food in foods {
        seen.insert(food.key(), food);
    }

    let mut deduped: Vec<&FoodItem> = seen.into_values().collect();
    deduped.sort_by_key(|f| f.key());
    let json = serde_json::to_string_pretty(&deduped)?;
    fs::write(path, json)?;
    Ok(())
}

/// Decode the bundled default scheme records.
pub fn default_scheme_records() -> Result<Vec<AbsorptionBlockRecord>> {
    Ok(serde_json::from_str(DEFAULT_SCHEME_JSON)?)
}

/// The bundled default absorption scheme, validated.
pub fn default_scheme() -> Result<AbsorptionScheme> {
    AbsorptionScheme::from_records(&default_scheme_records()?)
}

/// Load an absorption scheme, falling back to the default scheme when the
/// file does not exist yet.
pub fn load_scheme<P: AsRef<Path>>(path: P) -> Result<AbsorptionScheme> {
    let path = path.as_ref();
    if !path.exists() {
        info!(path = %path.display(), "no absorption scheme stored, using defaults");
        return default_scheme();
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Save an absorption scheme to a JSON file.
pub fn save_scheme<P: AsRef<Path>>(path: P, scheme: &AbsorptionScheme) -> Result<()> {
    let json = serde_json::to_string_pretty(scheme)?;
    fs::write(path, json)?;
    Ok(())
}
