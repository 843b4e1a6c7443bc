use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{FpuError, Result, TimeOrder};
use crate::models::{AbsorptionBlock, AbsorptionBlockRecord};

/// Ordered table mapping FPU magnitude to absorption time.
///
/// Blocks are kept sorted by `max_fpu`. Thresholds are unique and absorption
/// times strictly increase with the threshold. Every mutator either applies
/// completely or leaves the scheme untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<AbsorptionBlock>", into = "Vec<AbsorptionBlock>")]
pub struct AbsorptionScheme {
    blocks: Vec<AbsorptionBlock>,
}

impl AbsorptionScheme {
    /// An empty scheme; the first block added is accepted unconditionally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scheme by adding each block in turn.
    ///
    /// Fails on the first rejected block, or if there are no blocks at all.
    pub fn from_blocks<I>(blocks: I) -> Result<Self>
    where
        I: IntoIterator<Item = AbsorptionBlock>,
    {
        let mut scheme = Self::new();
        for block in blocks {
            scheme.add_block(block)?;
        }
        if scheme.is_empty() {
            return Err(FpuError::MinimumBlocksViolation);
        }
        Ok(scheme)
    }

    /// Build a scheme from default-configuration records.
    pub fn from_records(records: &[AbsorptionBlockRecord]) -> Result<Self> {
        Self::from_blocks(records.iter().copied().map(AbsorptionBlock::from))
    }

    pub fn blocks(&self) -> &[AbsorptionBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Block with exactly this threshold.
    pub fn get(&self, max_fpu: f64) -> Option<&AbsorptionBlock> {
        self.blocks.iter().find(|b| b.max_fpu == max_fpu)
    }

    /// Insert a block at its sorted position.
    ///
    /// Both values must be non-negative, and the block's absorption time must
    /// lie strictly between the times of its neighbours once sorted in.
    pub fn add_block(&mut self, candidate: AbsorptionBlock) -> Result<()> {
        candidate.validate()?;

        if self.blocks.is_empty() {
            self.blocks.push(candidate);
            debug!(max_fpu = candidate.max_fpu, "first absorption block added");
            return Ok(());
        }

        if self.get(candidate.max_fpu).is_some() {
            warn!(max_fpu = candidate.max_fpu, "duplicate absorption threshold");
            return Err(FpuError::DuplicateThreshold(candidate.max_fpu));
        }

        let index = self
            .blocks
            .partition_point(|b| b.cmp_by_max_fpu(&candidate).is_lt());
        let previous = index.checked_sub(1).map(|i| self.blocks[i]);
        let next = self.blocks.get(index).copied();
        let time = candidate.absorption_time;

        let violation = match (previous, next) {
            (None, Some(next)) if time >= next.absorption_time => Some(TimeOrder::Before),
            (Some(previous), None) if time <= previous.absorption_time => Some(TimeOrder::After),
            (Some(previous), Some(next))
                if !(time > previous.absorption_time && time < next.absorption_time) =>
            {
                Some(TimeOrder::Between)
            }
            _ => None,
        };

        if let Some(order) = violation {
            warn!(
                max_fpu = candidate.max_fpu,
                absorption_time = time,
                "absorption block breaks time ordering"
            );
            return Err(FpuError::TimeOrderViolation(order));
        }

        self.blocks.insert(index, candidate);
        debug!(
            max_fpu = candidate.max_fpu,
            absorption_time = time,
            index,
            "absorption block added"
        );
        Ok(())
    }

    /// Copy of this scheme with the block added.
    pub fn with_block(&self, candidate: AbsorptionBlock) -> Result<Self> {
        let mut scheme = self.clone();
        scheme.add_block(candidate)?;
        Ok(scheme)
    }

    /// Remove the block with this threshold.
    pub fn remove_block(&mut self, max_fpu: f64) -> Result<AbsorptionBlock> {
        let index = self.index_of(max_fpu)?;
        if self.blocks.len() <= 1 {
            return Err(FpuError::MinimumBlocksViolation);
        }
        let removed = self.blocks.remove(index);
        debug!(max_fpu, "absorption block removed");
        Ok(removed)
    }

    /// Replace the block with threshold `max_fpu` by `updated`.
    ///
    /// On rejection the original block is restored.
    pub fn replace_block(&mut self, max_fpu: f64, updated: AbsorptionBlock) -> Result<()> {
        let index = self.index_of(max_fpu)?;
        let existing = self.blocks.remove(index);
        if let Err(e) = self.add_block(updated) {
            self.blocks.insert(index, existing);
            return Err(e);
        }
        Ok(())
    }

    /// Absorption time in hours for the given FPU.
    ///
    /// The first block whose threshold is at least `fpu` wins; FPUs above
    /// every threshold get the last block's time.
    pub fn absorption_time(&self, fpu: f64) -> Result<f64> {
        let last = self.blocks.last().ok_or(FpuError::MinimumBlocksViolation)?;
        Ok(self
            .blocks
            .iter()
            .find(|b| b.max_fpu >= fpu)
            .unwrap_or(last)
            .absorption_time)
    }

    fn index_of(&self, max_fpu: f64) -> Result<usize> {
        self.blocks
            .iter()
            .position(|b| b.max_fpu == max_fpu)
            .ok_or_else(|| FpuError::NotFound(format!("absorption block with max FPU {}", max_fpu)))
    }
}

impl TryFrom<Vec<AbsorptionBlock>> for AbsorptionScheme {
    type Error = FpuError;

    fn try_from(blocks: Vec<AbsorptionBlock>) -> Result<Self> {
        Self::from_blocks(blocks)
    }
}

impl From<AbsorptionScheme> for Vec<AbsorptionBlock> {
    fn from(scheme: AbsorptionScheme) -> Self {
        scheme.blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(max_fpu: f64, time: f64) -> AbsorptionBlock {
        AbsorptionBlock::new(max_fpu, time).unwrap()
    }

    fn two_blocks() -> AbsorptionScheme {
        AbsorptionScheme::from_blocks([block(120.0, 3.0), block(250.0, 4.0)]).unwrap()
    }

    #[test]
    fn test_negative_block_rejected() {
        let mut scheme = two_blocks();
        let err = scheme
            .add_block(AbsorptionBlock {
                max_fpu: -1.0,
                absorption_time: -1.0,
            })
            .unwrap_err();
        assert!(matches!(err, FpuError::InvalidNumericInput(_)));
        assert_eq!(scheme, two_blocks());

        let mut empty = AbsorptionScheme::new();
        assert!(
            empty
                .add_block(AbsorptionBlock {
                    max_fpu: 1.0,
                    absorption_time: f64::NAN,
                })
                .is_err()
        );
        assert!(empty.is_empty());
    }

    #[test]
    fn test_replace_with_negative_block_restores() {
        let mut scheme = two_blocks();
        let err = scheme
            .replace_block(
                250.0,
                AbsorptionBlock {
                    max_fpu: 250.0,
                    absorption_time: -4.0,
                },
            )
            .unwrap_err();
        assert!(matches!(err, FpuError::InvalidNumericInput(_)));
        assert_eq!(scheme, two_blocks());
    }

    #[test]
    fn test_first_block_accepted_unconditionally() {
        let mut scheme = AbsorptionScheme::new();
        scheme.add_block(block(0.0, 0.0)).unwrap();
        assert_eq!(scheme.len(), 1);
    }

    #[test]
    fn test_blocks_kept_sorted() {
        let scheme =
            AbsorptionScheme::from_blocks([block(3.0, 5.0), block(1.0, 3.0), block(2.0, 4.0)])
                .unwrap();
        let thresholds: Vec<f64> = scheme.blocks().iter().map(|b| b.max_fpu).collect();
        assert_eq!(thresholds, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_duplicate_threshold_rejected() {
        let mut scheme = two_blocks();
        let err = scheme.add_block(block(120.0, 1.0)).unwrap_err();
        assert!(matches!(err, FpuError::DuplicateThreshold(v) if v == 120.0));
        assert_eq!(scheme, two_blocks());
    }

    #[test]
    fn test_interior_block_must_be_between_neighbours() {
        let mut scheme = two_blocks();
        let err = scheme.add_block(block(180.0, 2.0)).unwrap_err();
        assert!(matches!(err, FpuError::TimeOrderViolation(TimeOrder::Between)));
        let err = scheme.add_block(block(180.0, 3.0)).unwrap_err();
        assert!(matches!(err, FpuError::TimeOrderViolation(TimeOrder::Between)));
        assert_eq!(scheme, two_blocks());

        scheme.add_block(block(180.0, 3.5)).unwrap();
        assert_eq!(scheme.len(), 3);
        assert_eq!(scheme.blocks()[1], block(180.0, 3.5));
    }

    #[test]
    fn test_first_and_last_positions() {
        let mut scheme = two_blocks();
        let err = scheme.add_block(block(50.0, 3.0)).unwrap_err();
        assert!(matches!(err, FpuError::TimeOrderViolation(TimeOrder::Before)));
        let err = scheme.add_block(block(300.0, 4.0)).unwrap_err();
        assert!(matches!(err, FpuError::TimeOrderViolation(TimeOrder::After)));
        assert_eq!(scheme, two_blocks());

        scheme.add_block(block(50.0, 2.0)).unwrap();
        scheme.add_block(block(300.0, 6.0)).unwrap();
        assert_eq!(scheme.len(), 4);
    }

    #[test]
    fn test_with_block_leaves_original() {
        let scheme = two_blocks();
        let extended = scheme.with_block(block(180.0, 3.5)).unwrap();
        assert_eq!(scheme.len(), 2);
        assert_eq!(extended.len(), 3);
    }

    #[test]
    fn test_remove_block() {
        let mut scheme = two_blocks();
        assert!(matches!(
            scheme.remove_block(999.0).unwrap_err(),
            FpuError::NotFound(_)
        ));
        let removed = scheme.remove_block(120.0).unwrap();
        assert_eq!(removed.max_fpu, 120.0);
        assert!(matches!(
            scheme.remove_block(250.0).unwrap_err(),
            FpuError::MinimumBlocksViolation
        ));
        assert_eq!(scheme.len(), 1);
    }

    #[test]
    fn test_replace_block_restores_on_failure() {
        let mut scheme =
            AbsorptionScheme::from_blocks([block(1.0, 3.0), block(2.0, 4.0), block(3.0, 5.0)])
                .unwrap();
        let before = scheme.clone();

        let err = scheme.replace_block(2.0, block(2.5, 6.0)).unwrap_err();
        assert!(matches!(err, FpuError::TimeOrderViolation(_)));
        assert_eq!(scheme, before);

        scheme.replace_block(2.0, block(2.5, 4.5)).unwrap();
        assert!(scheme.get(2.0).is_none());
        assert_eq!(scheme.get(2.5), Some(&block(2.5, 4.5)));
    }

    #[test]
    fn test_absorption_time_lookup() {
        let scheme =
            AbsorptionScheme::from_blocks([block(1.0, 3.0), block(2.0, 4.0), block(6.0, 8.0)])
                .unwrap();
        assert_eq!(scheme.absorption_time(0.0).unwrap(), 3.0);
        assert_eq!(scheme.absorption_time(1.0).unwrap(), 3.0);
        assert_eq!(scheme.absorption_time(1.5).unwrap(), 4.0);
        assert_eq!(scheme.absorption_time(5.9).unwrap(), 8.0);
        // Clamped to the last block
        assert_eq!(scheme.absorption_time(42.0).unwrap(), 8.0);
    }

    #[test]
    fn test_absorption_time_is_non_decreasing() {
        let scheme =
            AbsorptionScheme::from_blocks([block(1.0, 3.0), block(2.0, 4.0), block(6.0, 8.0)])
                .unwrap();
        let mut previous = 0.0;
        for step in 0..100 {
            let time = scheme.absorption_time(step as f64 * 0.1).unwrap();
            assert!(time >= previous);
            previous = time;
        }
    }

    #[test]
    fn test_empty_scheme() {
        assert!(matches!(
            AbsorptionScheme::new().absorption_time(1.0).unwrap_err(),
            FpuError::MinimumBlocksViolation
        ));
        assert!(matches!(
            AbsorptionScheme::from_blocks(Vec::new()).unwrap_err(),
            FpuError::MinimumBlocksViolation
        ));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: AbsorptionScheme = serde_json::from_str(
            r#"[{"maxFpu": 1, "absorptionTime": 3}, {"maxFpu": 2, "absorptionTime": 4}]"#,
        )
        .unwrap();
        assert_eq!(ok.len(), 2);

        let bad = serde_json::from_str::<AbsorptionScheme>(
            r#"[{"maxFpu": 1, "absorptionTime": 4}, {"maxFpu": 2, "absorptionTime": 3}]"#,
        );
        assert!(bad.is_err());

        let negative =
            serde_json::from_str::<AbsorptionScheme>(r#"[{"maxFpu": -5, "absorptionTime": -2}]"#);
        assert!(negative.is_err());
    }
}
