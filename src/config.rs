//! Configuration for the Sentinel risk engine
//!
//! Loads from a YAML file or falls back to documented defaults. Threshold
//! defaults match the values the platform currently runs with; none of them
//! is asserted to be tuned, which is why they are configuration and not
//! constants.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SentinelError};

/// Top-level Sentinel configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SentinelConfig {
    /// Fast (synchronous) lane settings
    pub fast: FastPathConfig,

    /// Deep (asynchronous) lane settings
    pub deep: DeepPathConfig,

    /// Lane-wiring settings
    pub pipeline: PipelineConfig,
}

/// Fast-lane settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FastPathConfig {
    /// Scorer deadline in milliseconds
    pub deadline_ms: u64,

    /// Below this amount a failed scorer fails open (ALLOW); at or above it,
    /// fails closed (BLOCK). Currency units.
    pub fail_open_threshold: f64,

    /// Stored deep-lane score at or above which the sender is blocked
    /// without invoking the scorer
    pub pre_block_threshold: f64,

    /// Scorer output above which a healthy decision is BLOCK
    pub block_threshold: f64,
}

/// Deep-lane settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeepPathConfig {
    /// Distinct-predecessor count above which the fan-in signal fires
    pub fan_in_threshold: u32,

    /// Trailing window for the fan-in query, in seconds
    pub fan_in_window_secs: u64,

    /// Deep risk score above which containment is triggered. Requires both
    /// pattern signals jointly at the default weights, deliberately stricter
    /// than the pre-block threshold.
    pub containment_threshold: f64,
}

/// Lane-wiring settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Deep-lane queue depth; overflow drops the analysis for that
    /// transaction (the decision has already been returned)
    pub deep_queue_depth: usize,

    /// Escalation queue depth
    pub escalation_queue_depth: usize,
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            fast: FastPathConfig {
                deadline_ms: 200,
                fail_open_threshold: 500.0,
                pre_block_threshold: 0.8,
                block_threshold: 0.8,
            },
            deep: DeepPathConfig {
                fan_in_threshold: 10,
                fan_in_window_secs: 86_400,
                containment_threshold: 0.8,
            },
            pipeline: PipelineConfig {
                deep_queue_depth: 1024,
                escalation_queue_depth: 64,
            },
        }
    }
}

impl SentinelConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| SentinelError::Config(config::ConfigError::Foreign(Box::new(e))))?;
        Ok(config)
    }

    /// Load from the path in `SENTINEL_CONFIG_PATH`, or use defaults
    pub fn from_env_or_default() -> Result<Self> {
        if let Ok(path) = std::env::var("SENTINEL_CONFIG_PATH") {
            tracing::info!("Loading sentinel config from: {}", path);
            return Self::from_file(path);
        }
        tracing::info!("Using default sentinel configuration");
        Ok(Self::default())
    }

    /// Save configuration to a YAML file (for `--generate-config`)
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| SentinelError::internal(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, yaml)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SentinelConfig::default();

        assert_eq!(config.fast.deadline_ms, 200);
        assert_eq!(config.fast.fail_open_threshold, 500.0);
        assert_eq!(config.fast.pre_block_threshold, 0.8);
        assert_eq!(config.deep.fan_in_threshold, 10);
        assert_eq!(config.deep.containment_threshold, 0.8);
    }

    #[test]
    fn test_save_and_load_config() {
        let config = SentinelConfig::default();
        let temp_path = "/tmp/test_sentinel_config.yaml";

        config.save_to_file(temp_path).unwrap();
        let loaded = SentinelConfig::from_file(temp_path).unwrap();

        assert_eq!(loaded.fast.deadline_ms, config.fast.deadline_ms);
        assert_eq!(loaded.deep.fan_in_window_secs, config.deep.fan_in_window_secs);

        std::fs::remove_file(temp_path).ok();
    }
}
