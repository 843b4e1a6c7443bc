use serde::{Deserialize, Serialize};

use crate::calculator::constants::*;
use crate::error::{FpuError, Result};
use crate::settings::store::{BoolKey, DoubleKey, IntKey, SettingsStore};

/// Resolved user settings: stored values where present, defaults otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub carbs_delay_minutes: i64,
    pub carbs_interval_minutes: i64,
    pub carbs_duration_hours: f64,
    pub e_carbs_delay_minutes: i64,
    pub e_carbs_interval_minutes: i64,
    /// Grams of extended carbs per FPU.
    pub e_carbs_factor: f64,
    pub disclaimer_accepted: bool,
    pub export_e_carbs: bool,
    pub export_total_meal_carbs: bool,
    pub export_total_meal_sugars: bool,
    pub export_total_meal_calories: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            carbs_delay_minutes: CARBS_DELAY_DEFAULT,
            carbs_interval_minutes: CARBS_INTERVAL_DEFAULT,
            carbs_duration_hours: CARBS_DURATION_DEFAULT,
            e_carbs_delay_minutes: E_CARBS_DELAY_DEFAULT,
            e_carbs_interval_minutes: E_CARBS_INTERVAL_DEFAULT,
            e_carbs_factor: E_CARBS_FACTOR_DEFAULT,
            disclaimer_accepted: false,
            export_e_carbs: true,
            export_total_meal_carbs: false,
            export_total_meal_sugars: false,
            export_total_meal_calories: false,
        }
    }
}

impl UserSettings {
    /// Read all settings from the store, using defaults for unset keys.
    pub fn load<S: SettingsStore + ?Sized>(store: &S) -> Self {
        let d = Self::default();
        Self {
            carbs_delay_minutes: store
                .get_int(IntKey::AbsorptionTimeCarbsDelay)
                .unwrap_or(d.carbs_delay_minutes),
            carbs_interval_minutes: store
                .get_int(IntKey::AbsorptionTimeCarbsInterval)
                .unwrap_or(d.carbs_interval_minutes),
            carbs_duration_hours: store
                .get_double(DoubleKey::AbsorptionTimeCarbsDuration)
                .unwrap_or(d.carbs_duration_hours),
            e_carbs_delay_minutes: store
                .get_int(IntKey::AbsorptionTimeECarbsDelay)
                .unwrap_or(d.e_carbs_delay_minutes),
            e_carbs_interval_minutes: store
                .get_int(IntKey::AbsorptionTimeECarbsInterval)
                .unwrap_or(d.e_carbs_interval_minutes),
            e_carbs_factor: store
                .get_double(DoubleKey::ECarbsFactor)
                .unwrap_or(d.e_carbs_factor),
            disclaimer_accepted: store
                .get_bool(BoolKey::DisclaimerAccepted)
                .unwrap_or(d.disclaimer_accepted),
            export_e_carbs: store
                .get_bool(BoolKey::ExportECarbs)
                .unwrap_or(d.export_e_carbs),
            export_total_meal_carbs: store
                .get_bool(BoolKey::ExportTotalMealCarbs)
                .unwrap_or(d.export_total_meal_carbs),
            export_total_meal_sugars: store
                .get_bool(BoolKey::ExportTotalMealSugars)
                .unwrap_or(d.export_total_meal_sugars),
            export_total_meal_calories: store
                .get_bool(BoolKey::ExportTotalMealCalories)
                .unwrap_or(d.export_total_meal_calories),
        }
    }

    /// Validate, then write every setting to the store.
    pub fn save<S: SettingsStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        self.validate()?;

        store.set_int(IntKey::AbsorptionTimeCarbsDelay, self.carbs_delay_minutes)?;
        store.set_int(IntKey::AbsorptionTimeCarbsInterval, self.carbs_interval_minutes)?;
        store.set_double(DoubleKey::AbsorptionTimeCarbsDuration, self.carbs_duration_hours)?;
        store.set_int(IntKey::AbsorptionTimeECarbsDelay, self.e_carbs_delay_minutes)?;
        store.set_int(IntKey::AbsorptionTimeECarbsInterval, self.e_carbs_interval_minutes)?;
        store.set_double(DoubleKey::ECarbsFactor, self.e_carbs_factor)?;
        store.set_bool(BoolKey::DisclaimerAccepted, self.disclaimer_accepted)?;
        store.set_bool(BoolKey::ExportECarbs, self.export_e_carbs)?;
        store.set_bool(BoolKey::ExportTotalMealCarbs, self.export_total_meal_carbs)?;
        store.set_bool(BoolKey::ExportTotalMealSugars, self.export_total_meal_sugars)?;
        store.set_bool(BoolKey::ExportTotalMealCalories, self.export_total_meal_calories)?;
        Ok(())
    }

    /// Check delays are non-negative, intervals positive and the factor and
    /// duration non-negative numbers.
    pub fn validate(&self) -> Result<()> {
        for (name, delay) in [
            ("carbs delay", self.carbs_delay_minutes),
            ("e-carbs delay", self.e_carbs_delay_minutes),
        ] {
            if delay < 0 {
                return Err(FpuError::InvalidNumericInput(format!(
                    "{} must not be negative, got {}",
                    name, delay
                )));
            }
        }
        for (name, interval) in [
            ("carbs interval", self.carbs_interval_minutes),
            ("e-carbs interval", self.e_carbs_interval_minutes),
        ] {
            if interval <= 0 {
                return Err(FpuError::InvalidNumericInput(format!(
                    "{} must be positive, got {}",
                    name, interval
                )));
            }
        }
        for (name, value) in [
            ("carbs duration", self.carbs_duration_hours),
            ("e-carbs factor", self.e_carbs_factor),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(FpuError::InvalidNumericInput(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Put the absorption parameters back to their defaults; export toggles
    /// and the disclaimer are kept.
    pub fn reset_absorption_parameters(&mut self) {
        let d = Self::default();
        self.carbs_delay_minutes = d.carbs_delay_minutes;
        self.carbs_interval_minutes = d.carbs_interval_minutes;
        self.carbs_duration_hours = d.carbs_duration_hours;
        self.e_carbs_delay_minutes = d.e_carbs_delay_minutes;
        self.e_carbs_interval_minutes = d.e_carbs_interval_minutes;
        self.e_carbs_factor = d.e_carbs_factor;
    }
}
