use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Boolean settings keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolKey {
    DisclaimerAccepted,
    ExportECarbs,
    ExportTotalMealCarbs,
    ExportTotalMealSugars,
    ExportTotalMealCalories,
}

impl BoolKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoolKey::DisclaimerAccepted => "DisclaimerAccepted",
            BoolKey::ExportECarbs => "ExportECarbs",
            BoolKey::ExportTotalMealCarbs => "ExportTotalMealCarbs",
            BoolKey::ExportTotalMealSugars => "ExportTotalMealSugars",
            BoolKey::ExportTotalMealCalories => "ExportTotalMealCalories",
        }
    }
}

/// Decimal settings keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoubleKey {
    /// Hours.
    AbsorptionTimeCarbsDuration,
    /// Grams per FPU.
    ECarbsFactor,
}

impl DoubleKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            DoubleKey::AbsorptionTimeCarbsDuration => "AbsorptionTimeCarbsDuration",
            DoubleKey::ECarbsFactor => "ECarbsFactor",
        }
    }
}

/// Integer settings keys, all in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntKey {
    AbsorptionTimeCarbsDelay,
    AbsorptionTimeCarbsInterval,
    AbsorptionTimeECarbsDelay,
    AbsorptionTimeECarbsInterval,
}

impl IntKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntKey::AbsorptionTimeCarbsDelay => "AbsorptionTimeCarbsDelay",
            IntKey::AbsorptionTimeCarbsInterval => "AbsorptionTimeCarbsInterval",
            IntKey::AbsorptionTimeECarbsDelay => "AbsorptionTimeECarbsDelay",
            IntKey::AbsorptionTimeECarbsInterval => "AbsorptionTimeECarbsInterval",
        }
    }
}

/// A stored settings value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Double(f64),
}

/// Typed key-value storage for user settings.
///
/// Getters return `None` for keys that were never set, so callers can fall
/// back to defaults.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<SettingValue>;

    fn set(&mut self, key: &str, value: SettingValue) -> Result<()>;

    fn get_bool(&self, key: BoolKey) -> Option<bool> {
        match self.get(key.as_str())? {
            SettingValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    fn get_double(&self, key: DoubleKey) -> Option<f64> {
        match self.get(key.as_str())? {
            SettingValue::Double(v) => Some(v),
            SettingValue::Int(v) => Some(v as f64),
            SettingValue::Bool(_) => None,
        }
    }

    fn get_int(&self, key: IntKey) -> Option<i64> {
        match self.get(key.as_str())? {
            SettingValue::Int(v) => Some(v),
            _ => None,
        }
    }

    fn set_bool(&mut self, key: BoolKey, value: bool) -> Result<()> {
        self.set(key.as_str(), SettingValue::Bool(value))
    }

    fn set_double(&mut self, key: DoubleKey, value: f64) -> Result<()> {
        self.set(key.as_str(), SettingValue::Double(value))
    }

    fn set_int(&mut self, key: IntKey, value: i64) -> Result<()> {
        self.set(key.as_str(), SettingValue::Int(value))
    }
}

/// Settings kept in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    values: BTreeMap<String, SettingValue>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Option<SettingValue> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: SettingValue) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Settings backed by a JSON object file, rewritten on every change.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
    values: BTreeMap<String, SettingValue>,
}

impl JsonSettingsStore {
    /// Open the store; a missing file means no settings have been made yet.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn get(&self, key: &str) -> Option<SettingValue> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: SettingValue) -> Result<()> {
        self.values.insert(key.to_string(), value);
        let json = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
