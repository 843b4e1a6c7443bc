use serde::{Deserialize, Serialize};

use crate::calculator::fpu::{Fpu, compute_fpu};
use crate::calculator::constants::KCAL_PER_GRAM_CARBS;
use crate::error::{FpuError, Result};

/// A preset portion of a food item, e.g. "1 slice".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypicalAmount {
    pub amount: u32,
    #[serde(default)]
    pub comment: String,
}

/// A food item with its nutritional values per 100g and the amount eaten.
///
/// Invariants: sugars never exceed carbs, and carbs at 4 kcal/g never exceed
/// total calories. Use [`FoodItem::new`] or [`FoodItem::parse`] to get a
/// checked instance; [`FoodItem::validate`] re-checks deserialized data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub name: String,

    #[serde(default)]
    pub favorite: bool,

    pub calories_per_100g: f64,

    pub carbs_per_100g: f64,

    #[serde(default)]
    pub sugars_per_100g: f64,

    /// Amount in grams.
    #[serde(default)]
    pub amount: u32,

    #[serde(default)]
    pub typical_amounts: Vec<TypicalAmount>,
}

/// Wire shape of a single encoded food item: the fields nest under `foodItem`.
#[derive(Serialize)]
struct EncodedFoodItem<'a> {
    #[serde(rename = "foodItem")]
    food_item: &'a FoodItem,
}

#[derive(Deserialize)]
struct DecodedFoodItem {
    #[serde(rename = "foodItem")]
    food_item: FoodItem,
}

impl FoodItem {
    /// Create a checked food item without typical amounts.
    pub fn new(
        name: &str,
        calories_per_100g: f64,
        carbs_per_100g: f64,
        sugars_per_100g: f64,
        amount: u32,
    ) -> Result<Self> {
        let item = Self {
            name: name.trim().to_string(),
            favorite: false,
            calories_per_100g,
            carbs_per_100g,
            sugars_per_100g,
            amount,
            typical_amounts: Vec::new(),
        };
        item.validate()?;
        Ok(item)
    }

    /// Build a food item from editor text fields.
    ///
    /// Empty numeric fields count as zero. Checks run in field order and the
    /// first failure is returned.
    pub fn parse(
        name: &str,
        favorite: bool,
        calories: &str,
        carbs: &str,
        sugars: &str,
        amount: &str,
    ) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FpuError::InvalidNumericInput(
                "Name must not be empty".to_string(),
            ));
        }

        let calories_per_100g = parse_decimal("calories", calories)?;
        let carbs_per_100g = parse_decimal("carbs", carbs)?;
        let sugars_per_100g = parse_decimal("sugars", sugars)?;
        check_cross_fields(calories_per_100g, carbs_per_100g, sugars_per_100g)?;
        let amount = parse_grams("amount", amount)?;

        Ok(Self {
            name: name.to_string(),
            favorite,
            calories_per_100g,
            carbs_per_100g,
            sugars_per_100g,
            amount,
            typical_amounts: Vec::new(),
        })
    }

    /// Check every field and the cross-field invariants.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(FpuError::InvalidNumericInput(
                "Name must not be empty".to_string(),
            ));
        }
        check_decimal("calories", self.calories_per_100g)?;
        check_decimal("carbs", self.carbs_per_100g)?;
        check_decimal("sugars", self.sugars_per_100g)?;
        check_cross_fields(self.calories_per_100g, self.carbs_per_100g, self.sugars_per_100g)
    }

    /// Canonical key for lookups (lowercase, trimmed name).
    pub fn key(&self) -> String {
        self.name.trim().to_lowercase()
    }

    /// Calories of the current amount.
    pub fn calories(&self) -> f64 {
        self.amount as f64 / 100.0 * self.calories_per_100g
    }

    /// Carbs of the current amount, sugars included.
    pub fn carbs_incl_sugars(&self) -> f64 {
        self.amount as f64 / 100.0 * self.carbs_per_100g
    }

    /// Sugars of the current amount.
    pub fn sugars_only(&self) -> f64 {
        self.amount as f64 / 100.0 * self.sugars_per_100g
    }

    /// Carbs counted as regular carbs: without sugars when those are
    /// treated separately.
    pub fn regular_carbs(&self, treat_sugars_separately: bool) -> f64 {
        if treat_sugars_separately {
            self.amount as f64 / 100.0 * (self.carbs_per_100g - self.sugars_per_100g)
        } else {
            self.carbs_incl_sugars()
        }
    }

    /// Sugars counted on their own; zero unless treated separately.
    pub fn sugars(&self, treat_sugars_separately: bool) -> f64 {
        if treat_sugars_separately {
            self.sugars_only()
        } else {
            0.0
        }
    }

    /// Fat-protein units of the current amount.
    pub fn fpu(&self) -> Result<Fpu> {
        compute_fpu(
            self.amount as f64,
            self.calories_per_100g,
            self.carbs_per_100g,
        )
    }

    /// Encode as a `{"foodItem": {...}}` JSON document.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(&EncodedFoodItem { food_item: self })?)
    }

    /// Decode a `{"foodItem": {...}}` JSON document and validate it.
    pub fn decode(json: &str) -> Result<Self> {
        let decoded: DecodedFoodItem = serde_json::from_str(json)?;
        decoded.food_item.validate()?;
        Ok(decoded.food_item)
    }
}

fn check_decimal(field: &str, value: f64) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(FpuError::InvalidNumericInput(format!(
            "{} must be a non-negative number, got {}",
            field, value
        )));
    }
    Ok(value)
}

fn parse_decimal(field: &str, text: &str) -> Result<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0.0);
    }
    let value: f64 = text.parse().map_err(|_| {
        FpuError::InvalidNumericInput(format!("{} is not a number: '{}'", field, text))
    })?;
    check_decimal(field, value)
}

fn parse_grams(field: &str, text: &str) -> Result<u32> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0);
    }
    text.parse().map_err(|_| {
        FpuError::InvalidNumericInput(format!(
            "{} must be a non-negative whole number, got '{}'",
            field, text
        ))
    })
}

fn check_cross_fields(calories: f64, carbs: f64, sugars: f64) -> Result<()> {
    if sugars > carbs {
        return Err(FpuError::InvalidNumericInput(
            "Sugars exceed carbs".to_string(),
        ));
    }
    if carbs * KCAL_PER_GRAM_CARBS > calories {
        return Err(FpuError::InvalidNumericInput(
            "Calories from carbs (4 kcal per gram) exceed total calories".to_string(),
        ));
    }
    Ok(())
}
