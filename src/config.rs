use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::detector::DetectorOptions;

/// Default polling cadence between detection ticks.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

/// Default number of gifs sampled, and slots filled, per tick.
pub const DEFAULT_SAMPLE_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("slot count {slots} does not match sample count {samples}")]
    SlotSampleMismatch { slots: usize, samples: usize },
    #[error("sample count must be at least 1")]
    ZeroSampleCount,
}

/// Pipeline configuration, validated once at startup.
///
/// The sample count and slot count are tied together: every sampled gif
/// lands in exactly one slot, so [`validate`](FacegifConfig::validate)
/// rejects a mismatch instead of letting slots silently starve or images
/// silently drop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacegifConfig {
    /// Cadence of the detection ticks.
    pub interval: Duration,
    /// Gifs drawn per tick.
    pub sample_count: usize,
    /// Display slots driven by the pipeline.
    pub slot_count: usize,
    /// Options forwarded to every detection call.
    pub detector: DetectorOptions,
}

impl Default for FacegifConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            sample_count: DEFAULT_SAMPLE_COUNT,
            slot_count: DEFAULT_SAMPLE_COUNT,
            detector: DetectorOptions::default(),
        }
    }
}

impl FacegifConfig {
    /// Check the startup invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_count == 0 {
            return Err(ConfigError::ZeroSampleCount);
        }
        if self.slot_count != self.sample_count {
            return Err(ConfigError::SlotSampleMismatch {
                slots: self.slot_count,
                samples: self.sample_count,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        FacegifConfig::default().validate().unwrap();
    }

    #[test]
    fn slot_sample_mismatch_is_rejected() {
        let config = FacegifConfig {
            slot_count: 4,
            ..FacegifConfig::default()
        };
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigError::SlotSampleMismatch { slots: 4, samples: 3 }
        );
    }

    #[test]
    fn zero_sample_count_is_rejected() {
        let config = FacegifConfig {
            sample_count: 0,
            slot_count: 0,
            ..FacegifConfig::default()
        };
        assert_eq!(config.validate().unwrap_err(), ConfigError::ZeroSampleCount);
    }
}
