use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculator::constants::{KCAL_PER_FPU, KCAL_PER_GRAM_CARBS};
use crate::calculator::scheme::AbsorptionScheme;
use crate::error::{FpuError, Result};

/// Rounding slack for fat/protein calories of foods whose calories come
/// entirely from carbs.
const FP_CALORIES_TOLERANCE: f64 = 1e-9;

/// Fat-protein units.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Fpu(pub f64);

impl Fpu {
    pub fn value(self) -> f64 {
        self.0
    }

    /// Grams of extended carbs for these FPUs.
    pub fn extended_carbs(self, e_carbs_factor: f64) -> f64 {
        self.0 * e_carbs_factor
    }

    /// Absorption time in hours according to the scheme.
    pub fn absorption_time(self, scheme: &AbsorptionScheme) -> Result<f64> {
        scheme.absorption_time(self.0)
    }
}

impl Add for Fpu {
    type Output = Fpu;

    fn add(self, rhs: Fpu) -> Fpu {
        Fpu(self.0 + rhs.0)
    }
}

impl Sum for Fpu {
    fn sum<I: Iterator<Item = Fpu>>(iter: I) -> Fpu {
        iter.fold(Fpu::default(), Add::add)
    }
}

/// Compute fat-protein units from a mass and its per-100g values.
///
/// Calories not explained by carbs (4 kcal/g) come from fat and protein;
/// 100 kcal of those make one FPU. Negative fat/protein calories mean the
/// inputs are inconsistent and are reported, not clamped.
pub fn compute_fpu(mass_grams: f64, calories_per_100g: f64, carbs_per_100g: f64) -> Result<Fpu> {
    for (field, value) in [
        ("amount", mass_grams),
        ("calories", calories_per_100g),
        ("carbs", carbs_per_100g),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(FpuError::InvalidNumericInput(format!(
                "{} must be a non-negative number, got {}",
                field, value
            )));
        }
    }

    let calories_total = mass_grams / 100.0 * calories_per_100g;
    let carb_calories = mass_grams / 100.0 * carbs_per_100g * KCAL_PER_GRAM_CARBS;
    let fat_protein_calories = calories_total - carb_calories;

    if fat_protein_calories < -FP_CALORIES_TOLERANCE {
        warn!(
            calories_per_100g = calories_per_100g,
            carbs_per_100g = carbs_per_100g,
            "carb calories exceed total calories"
        );
        return Err(FpuError::InvalidNumericInput(
            "Calories from carbs (4 kcal per gram) exceed total calories".to_string(),
        ));
    }

    Ok(Fpu(fat_protein_calories.max(0.0) / KCAL_PER_FPU))
}
