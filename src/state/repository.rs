use std::collections::HashMap;

use strsim::jaro_winkler;
use tracing::debug;

use crate::calculator::Meal;
use crate::error::{FpuError, Result};
use crate::models::FoodItem;

/// Minimum Jaro-Winkler similarity for a fuzzy name match.
const FUZZY_MATCH_THRESHOLD: f64 = 0.8;

/// Access to the current food items, keyed by case-insensitive name.
pub trait FoodRepository {
    /// All food items, sorted by name.
    fn all(&self) -> Vec<FoodItem>;

    fn get(&self, name: &str) -> Option<FoodItem>;

    /// Insert or replace a food item after validating it.
    fn upsert(&mut self, item: FoodItem) -> Result<()>;

    fn remove(&mut self, name: &str) -> Result<FoodItem>;

    /// Totals of every item with a non-zero amount.
    fn meal(&self) -> Result<Meal> {
        let selected: Vec<FoodItem> = self.all().into_iter().filter(|f| f.amount > 0).collect();
        Meal::aggregate(&selected)
    }
}

/// In-memory food repository.
#[derive(Debug, Clone, Default)]
pub struct FoodStore {
    /// All food items keyed by lowercase name.
    foods: HashMap<String, FoodItem>,
}

impl FoodStore {
    /// Create a store from a list of food items; later duplicates win.
    pub fn new(foods: Vec<FoodItem>) -> Self {
        let mut map = HashMap::new();
        for food in foods {
            map.insert(food.key(), food);
        }
        Self { foods: map }
    }

    /// Get a mutable reference to a food item by name (case-insensitive).
    pub fn get_mut(&mut self, name: &str) -> Option<&mut FoodItem> {
        self.foods.get_mut(&name.trim().to_lowercase())
    }

    /// Set the eaten amount of a food item.
    pub fn set_amount(&mut self, name: &str, amount: u32) -> Result<()> {
        let food = self
            .get_mut(name)
            .ok_or_else(|| FpuError::NotFound(format!("food item '{}'", name)))?;
        food.amount = amount;
        debug!(name, amount, "amount set");
        Ok(())
    }

    /// Set every amount back to zero.
    pub fn clear_amounts(&mut self) {
        for food in self.foods.values_mut() {
            food.amount = 0;
        }
    }

    /// Food items with a non-zero amount, sorted by name.
    pub fn selected(&self) -> Vec<&FoodItem> {
        let mut selected: Vec<&FoodItem> =
            self.foods.values().filter(|f| f.amount > 0).collect();
        selected.sort_by_key(|f| f.key());
        selected
    }

    /// Names similar to `query`, best match first.
    pub fn find_similar(&self, query: &str) -> Vec<&FoodItem> {
        let query = query.trim().to_lowercase();
        let mut candidates: Vec<(&FoodItem, f64)> = self
            .foods
            .values()
            .map(|f| (f, jaro_winkler(&f.key(), &query)))
            .filter(|(_, score)| *score >= FUZZY_MATCH_THRESHOLD)
            .collect();

        candidates.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.key().cmp(&b.0.key())));
        candidates.into_iter().map(|(f, _)| f).collect()
    }

    /// Convert the store to a list of food items for JSON serialization.
    pub fn to_foods(&self) -> Vec<FoodItem> {
        self.all()
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }
}

impl FoodRepository for FoodStore {
    fn all(&self) -> Vec<FoodItem> {
        let mut foods: Vec<FoodItem> = self.foods.values().cloned().collect();
        foods.sort_by_key(|f| f.key());
        foods
    }

    fn get(&self, name: &str) -> Option<FoodItem> {
        self.foods.get(&name.trim().to_lowercase()).cloned()
    }

    fn upsert(&mut self, item: FoodItem) -> Result<()> {
        item.validate()?;
        self.foods.insert(item.key(), item);
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<FoodItem> {
        self.foods
            .remove(&name.trim().to_lowercase())
            .ok_or_else(|| FpuError::NotFound(format!("food item '{}'", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_foods() -> Vec<FoodItem> {
        vec![
            FoodItem::new("Pizza Margherita", 250.0, 30.0, 5.0, 150).unwrap(),
            FoodItem::new("Apple", 52.0, 12.0, 10.0, 0).unwrap(),
            FoodItem::new("Cheddar", 400.0, 1.0, 0.5, 30).unwrap(),
        ]
    }

    #[test]
    fn test_get_case_insensitive() {
        let store = FoodStore::new(sample_foods());
        assert!(store.get("apple").is_some());
        assert!(store.get("APPLE").is_some());
        assert!(store.get("banana").is_none());
    }

    #[test]
    fn test_all_sorted_by_name() {
        let store = FoodStore::new(sample_foods());
        let names: Vec<String> = store.all().into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["Apple", "Cheddar", "Pizza Margherita"]);
    }

    #[test]
    fn test_upsert_validates() {
        let mut store = FoodStore::new(sample_foods());
        let mut bad = FoodItem::new("Bad", 100.0, 10.0, 0.0, 10).unwrap();
        bad.sugars_per_100g = 20.0;
        assert!(store.upsert(bad).is_err());
        assert_eq!(store.len(), 3);

        let updated = FoodItem::new("apple", 60.0, 14.0, 10.0, 120).unwrap();
        store.upsert(updated).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.get("Apple").unwrap().amount, 120);
    }

    #[test]
    fn test_remove_unknown_is_not_found() {
        let mut store = FoodStore::new(sample_foods());
        assert!(matches!(store.remove("Banana").unwrap_err(), FpuError::NotFound(_)));
        store.remove("cheddar").unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_set_amount_and_meal() {
        let mut store = FoodStore::new(sample_foods());
        store.set_amount("apple", 100).unwrap();
        assert!(store.set_amount("banana", 100).is_err());

        let meal = store.meal().unwrap();
        assert!((meal.amount - 280.0).abs() < 1e-9);
        assert_eq!(store.selected().len(), 3);

        store.clear_amounts();
        assert!(store.meal().unwrap().is_empty());
    }

    #[test]
    fn test_find_similar() {
        let store = FoodStore::new(sample_foods());
        let matches = store.find_similar("chedar");
        assert_eq!(matches.first().map(|f| f.name.as_str()), Some("Cheddar"));
        assert!(store.find_similar("xyz").is_empty());
    }
}
