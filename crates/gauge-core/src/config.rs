//! Controller configuration.
//!
//! Read from TOML; every section and field is optional and falls back to
//! the reference deployment parameters. Wide integers are written as
//! decimal strings (`"1e18"` and `"-2e18"` are accepted).
//!
//! ```toml
//! [control]
//! kp = "-2e18"
//! output_lower_bound = "1e15"
//!
//! [rewards]
//! rewards_on = true
//! tip_type = 322
//!
//! [codec]
//! framing = "length_prefixed"
//!
//! [[scales]]
//! system_id = 2
//! chain_id = 1
//! scale = "3e15"
//! ```

use std::path::{Path, PathBuf};

use gauge_codec::batch::Framing;
use gauge_control::ema::DEFAULT_WINDOW_SIZE;
use gauge_control::pi::ControlGains;
use gauge_rewards::curve::RewardParams;
use gauge_rewards::scales::ScaleEntry;
use gauge_types::{I256, U256, BASE_FEE_TYPE, DEFAULT_TIP_TYPE};
use serde::{Deserialize, Serialize};

/// Configuration loading and validation failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The text is not valid configuration TOML.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values parse but break an invariant.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete controller configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// PI controller gains, bounds and EMA window.
    #[serde(default)]
    pub control: ControlConfig,
    /// Reward law and reward channels.
    #[serde(default)]
    pub rewards: RewardsConfig,
    /// Batch framing.
    #[serde(default)]
    pub codec: CodecConfig,
    /// Initial per-pair scales.
    #[serde(default)]
    pub scales: Vec<ScaleEntry>,
}

/// Control loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlConfig {
    #[serde(default = "default_kp", with = "gauge_types::decimal::signed")]
    pub kp: I256,
    #[serde(default = "default_ki", with = "gauge_types::decimal::signed")]
    pub ki: I256,
    #[serde(default = "default_co_bias", with = "gauge_types::decimal::signed")]
    pub co_bias: I256,
    #[serde(default = "default_upper", with = "gauge_types::decimal::signed")]
    pub output_upper_bound: I256,
    #[serde(default = "default_lower", with = "gauge_types::decimal::signed")]
    pub output_lower_bound: I256,
    /// Samples in the update-interval EMA window.
    #[serde(default = "default_window_size")]
    pub default_window_size: u32,
}

/// Reward law settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardsConfig {
    #[serde(default = "default_target_time_since", with = "gauge_types::decimal::unsigned")]
    pub target_time_since: U256,
    #[serde(default = "default_min_reward", with = "gauge_types::decimal::unsigned")]
    pub min_reward: U256,
    #[serde(default = "default_max_reward", with = "gauge_types::decimal::unsigned")]
    pub max_reward: U256,
    #[serde(default = "default_min_ts", with = "gauge_types::decimal::unsigned")]
    pub min_ts: U256,
    #[serde(default = "default_max_ts", with = "gauge_types::decimal::unsigned")]
    pub max_ts: U256,
    #[serde(default = "default_min_deviation", with = "gauge_types::decimal::unsigned")]
    pub min_deviation: U256,
    #[serde(default = "default_max_deviation", with = "gauge_types::decimal::unsigned")]
    pub max_deviation: U256,
    /// Observation type of the base fee channel.
    #[serde(default = "default_base_fee_type")]
    pub base_fee_type: u16,
    /// Observation type of the tip channel.
    #[serde(default = "default_tip_type")]
    pub tip_type: u16,
    /// Initial state of the reward latch.
    #[serde(default)]
    pub rewards_on: bool,
}

/// Wire settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodecConfig {
    #[serde(default)]
    pub framing: Framing,
}

// Default value functions

const E18: i128 = 1_000_000_000_000_000_000;

fn default_kp() -> I256 {
    I256::new(-2 * E18)
}

fn default_ki() -> I256 {
    I256::new(-E18 / 10)
}

fn default_co_bias() -> I256 {
    I256::new(E18)
}

fn default_upper() -> I256 {
    I256::new(10 * E18)
}

fn default_lower() -> I256 {
    I256::new(E18 / 1000)
}

fn default_window_size() -> u32 {
    DEFAULT_WINDOW_SIZE
}

fn default_target_time_since() -> U256 {
    RewardParams::default().target_time_since
}

fn default_min_reward() -> U256 {
    RewardParams::default().min_reward
}

fn default_max_reward() -> U256 {
    RewardParams::default().max_reward
}

fn default_min_ts() -> U256 {
    RewardParams::default().min_ts
}

fn default_max_ts() -> U256 {
    RewardParams::default().max_ts
}

fn default_min_deviation() -> U256 {
    RewardParams::default().min_deviation
}

fn default_max_deviation() -> U256 {
    RewardParams::default().max_deviation
}

fn default_base_fee_type() -> u16 {
    BASE_FEE_TYPE
}

fn default_tip_type() -> u16 {
    DEFAULT_TIP_TYPE
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            kp: default_kp(),
            ki: default_ki(),
            co_bias: default_co_bias(),
            output_upper_bound: default_upper(),
            output_lower_bound: default_lower(),
            default_window_size: default_window_size(),
        }
    }
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            target_time_since: default_target_time_since(),
            min_reward: default_min_reward(),
            max_reward: default_max_reward(),
            min_ts: default_min_ts(),
            max_ts: default_max_ts(),
            min_deviation: default_min_deviation(),
            max_deviation: default_max_deviation(),
            base_fee_type: default_base_fee_type(),
            tip_type: default_tip_type(),
            rewards_on: false,
        }
    }
}

impl ControlConfig {
    /// Gains as used by the PI controller.
    pub fn gains(&self) -> ControlGains {
        ControlGains {
            kp: self.kp,
            ki: self.ki,
            co_bias: self.co_bias,
        }
    }
}

impl RewardsConfig {
    /// Reward law parameters.
    pub fn params(&self) -> RewardParams {
        RewardParams {
            target_time_since: self.target_time_since,
            min_reward: self.min_reward,
            max_reward: self.max_reward,
            min_ts: self.min_ts,
            max_ts: self.max_ts,
            min_deviation: self.min_deviation,
            max_deviation: self.max_deviation,
        }
    }
}

impl ControllerConfig {
    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.display(), scales = config.scales.len(), "config loaded");
        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ControllerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check ordering invariants and scales.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let control = &self.control;
        if control.output_lower_bound > control.output_upper_bound {
            return Err(ConfigError::Invalid(format!(
                "output_lower_bound {} > output_upper_bound {}",
                control.output_lower_bound, control.output_upper_bound
            )));
        }
        if control.default_window_size == 0 {
            return Err(ConfigError::Invalid(
                "default_window_size must be at least 1".to_string(),
            ));
        }
        self.rewards
            .params()
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if self.rewards.base_fee_type == self.rewards.tip_type {
            return Err(ConfigError::Invalid(format!(
                "base_fee_type and tip_type are both {}",
                self.rewards.tip_type
            )));
        }
        if let Some(zero) = self.scales.iter().find(|s| s.scale == U256::ZERO) {
            return Err(ConfigError::Invalid(format!(
                "zero scale for pair {}",
                zero.pair()
            )));
        }
        Ok(())
    }
}
