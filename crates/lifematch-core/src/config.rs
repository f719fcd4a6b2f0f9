//! Engine configuration.
//!
//! Every section is optional in TOML; omitted values keep the defaults, so a
//! file only needs to name the weights it changes:
//!
//! ```toml
//! [scoring.patient_first]
//! min_score_exclusive = 60
//!
//! [viability.kidney]
//! excellent = 36
//! good = 24
//! fair = 18
//! poor = 8
//! ```

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matching::{ScoringConfig, ViabilityTable};

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tunable weights and tables for the matching engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scoring: ScoringConfig,
    pub viability: ViabilityTable,
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: EngineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        info!("Loaded engine config from {:?}", path);
        Ok(config)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.viability.all_days().any(|days| days == 0) {
            return Err(ConfigError::Invalid(
                "viability windows must be at least one day".into(),
            ));
        }
        for (policy, threshold) in [
            ("donor_first", self.scoring.donor_first.min_score_exclusive),
            ("patient_first", self.scoring.patient_first.min_score_exclusive),
        ] {
            if threshold >= 100 {
                return Err(ConfigError::Invalid(format!(
                    "{}.min_score_exclusive must be below 100, got {}",
                    policy, threshold
                )));
            }
        }
        if self.scoring.patient_first.minor_age_gap_years
            > self.scoring.patient_first.major_age_gap_years
        {
            return Err(ConfigError::Invalid(
                "patient_first.minor_age_gap_years must not exceed major_age_gap_years".into(),
            ));
        }
        Ok(())
    }
}
