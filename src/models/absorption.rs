use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{FpuError, Result};

/// One threshold of an absorption scheme: meals up to `max_fpu` are
/// absorbed over `absorption_time` hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsorptionBlock {
    pub max_fpu: f64,
    pub absorption_time: f64,
}

impl AbsorptionBlock {
    /// Create a block, rejecting negative or non-finite values.
    pub fn new(max_fpu: f64, absorption_time: f64) -> Result<Self> {
        let block = Self {
            max_fpu,
            absorption_time,
        };
        block.validate()?;
        Ok(block)
    }

    /// Both values must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        if !self.max_fpu.is_finite() || self.max_fpu < 0.0 {
            return Err(FpuError::InvalidNumericInput(format!(
                "maximum FPU must be a non-negative number, got {}",
                self.max_fpu
            )));
        }
        if !self.absorption_time.is_finite() || self.absorption_time < 0.0 {
            return Err(FpuError::InvalidNumericInput(format!(
                "absorption time must be a non-negative number, got {}",
                self.absorption_time
            )));
        }
        Ok(())
    }

    /// Order by threshold.
    pub fn cmp_by_max_fpu(&self, other: &Self) -> Ordering {
        self.max_fpu.total_cmp(&other.max_fpu)
    }
}

/// Record shape of the bundled default scheme (`absorptionscheme_default.json`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsorptionBlockRecord {
    pub max_fpu: u32,
    pub absorption_time: u32,
}

impl From<AbsorptionBlockRecord> for AbsorptionBlock {
    fn from(record: AbsorptionBlockRecord) -> Self {
        Self {
            max_fpu: record.max_fpu as f64,
            absorption_time: record.absorption_time as f64,
        }
    }
}
