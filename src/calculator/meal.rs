use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::calculator::fpu::Fpu;
use crate::calculator::scheme::AbsorptionScheme;
use crate::error::Result;
use crate::models::FoodItem;

/// Totals over a set of food items.
///
/// `Meal::default()` is the empty meal; `+` combines two meals, so totals do
/// not depend on the order items are added in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    /// Grams.
    pub amount: f64,
    pub calories: f64,
    /// Carbs including sugars, grams.
    pub carbs: f64,
    pub sugars: f64,
    pub fpu: Fpu,
}

impl Meal {
    /// Totals of a single food item at its current amount.
    pub fn from_item(item: &FoodItem) -> Result<Self> {
        Ok(Self {
            amount: item.amount as f64,
            calories: item.calories(),
            carbs: item.carbs_incl_sugars(),
            sugars: item.sugars_only(),
            fpu: item.fpu()?,
        })
    }

    /// Sum the totals of all items.
    pub fn aggregate<'a, I>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a FoodItem>,
    {
        items
            .into_iter()
            .try_fold(Meal::default(), |meal, item| Ok(meal + Meal::from_item(item)?))
    }

    /// Add one more food item to the totals.
    pub fn add_item(&mut self, item: &FoodItem) -> Result<()> {
        *self = *self + Meal::from_item(item)?;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.amount <= 0.0
    }

    /// Carbs to count as regular carbs.
    pub fn regular_carbs(&self, treat_sugars_separately: bool) -> f64 {
        if treat_sugars_separately {
            self.carbs - self.sugars
        } else {
            self.carbs
        }
    }

    /// Sugars to count on their own; zero unless treated separately.
    pub fn sugars(&self, treat_sugars_separately: bool) -> f64 {
        if treat_sugars_separately {
            self.sugars
        } else {
            0.0
        }
    }

    /// Grams of extended carbs derived from the meal's FPUs.
    pub fn extended_carbs(&self, e_carbs_factor: f64) -> f64 {
        self.fpu.extended_carbs(e_carbs_factor)
    }

    /// Absorption time in hours for the meal's FPUs.
    pub fn absorption_time(&self, scheme: &AbsorptionScheme) -> Result<f64> {
        self.fpu.absorption_time(scheme)
    }
}

impl Add for Meal {
    type Output = Meal;

    fn add(self, rhs: Meal) -> Meal {
        Meal {
            amount: self.amount + rhs.amount,
            calories: self.calories + rhs.calories,
            carbs: self.carbs + rhs.carbs,
            sugars: self.sugars + rhs.sugars,
            fpu: self.fpu + rhs.fpu,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AbsorptionBlock;

    fn items() -> Vec<FoodItem> {
        vec![
            FoodItem::new("Pizza", 250.0, 30.0, 5.0, 150).unwrap(),
            FoodItem::new("Cola", 42.0, 10.5, 10.5, 330).unwrap(),
            FoodItem::new("Cheese", 380.0, 0.0, 0.0, 40).unwrap(),
        ]
    }

    #[test]
    fn test_empty_meal_is_zero() {
        let meal = Meal::aggregate(&Vec::<FoodItem>::new()).unwrap();
        assert_eq!(meal, Meal::default());
        assert_eq!(meal.fpu.value(), 0.0);
        assert!(meal.is_empty());
    }

    #[test]
    fn test_aggregate_sums_items() {
        let meal = Meal::aggregate(&items()).unwrap();
        assert!((meal.amount - 520.0).abs() < 1e-9);
        assert!((meal.calories - (375.0 + 138.6 + 152.0)).abs() < 1e-9);
        assert!((meal.carbs - (45.0 + 34.65)).abs() < 1e-9);
        // 1.95 + 0.0 + 1.52
        assert!((meal.fpu.value() - 3.47).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_order_independent() {
        let forward = Meal::aggregate(&items()).unwrap();
        let mut reversed_items = items();
        reversed_items.reverse();
        let reversed = Meal::aggregate(&reversed_items).unwrap();
        assert!((forward.calories - reversed.calories).abs() < 1e-9);
        assert!((forward.fpu.value() - reversed.fpu.value()).abs() < 1e-9);
    }

    #[test]
    fn test_add_item_matches_aggregate() {
        let mut meal = Meal::default();
        for item in &items() {
            meal.add_item(item).unwrap();
        }
        let aggregated = Meal::aggregate(&items()).unwrap();
        assert!((meal.fpu.value() - aggregated.fpu.value()).abs() < 1e-9);
    }

    #[test]
    fn test_derived_values() {
        let meal = Meal::aggregate(&items()).unwrap();
        assert!((meal.extended_carbs(10.0) - 34.7).abs() < 1e-9);

        let scheme = AbsorptionScheme::from_blocks([
            AbsorptionBlock::new(1.0, 3.0).unwrap(),
            AbsorptionBlock::new(4.0, 6.0).unwrap(),
        ])
        .unwrap();
        assert_eq!(meal.absorption_time(&scheme).unwrap(), 6.0);
    }

    #[test]
    fn test_sugars_separately() {
        let meal = Meal::aggregate(&items()).unwrap();
        assert!((meal.regular_carbs(false) - meal.carbs).abs() < 1e-9);
        assert_eq!(meal.sugars(false), 0.0);
        assert!((meal.regular_carbs(true) + meal.sugars(true) - meal.carbs).abs() < 1e-9);
    }
}
