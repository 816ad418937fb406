//! Configuration
//!
//! JSON configuration for the process-wide build defaults.
//!
//! ```json
//! {
//!   "fee_calculator": { "size": { "rate": 100 } },
//!   "outbox_dir": ".envelope_outbox"
//! }
//! ```

use crate::core::{Amount, FeeRate, FlatFeeCalculator, SizeFeeCalculator, SystemTimeProvider};
use crate::multisig::BuildContext;
use crate::network::DEFAULT_OUTBOX_DIR;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Which fee calculator serves as the default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeCalculatorConfig {
    Flat { fee: Amount },
    Size { rate: FeeRate },
}

impl Default for FeeCalculatorConfig {
    fn default() -> Self {
        FeeCalculatorConfig::Flat {
            fee: FlatFeeCalculator::default().fee,
        }
    }
}

/// Build defaults and transmission settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    pub fee_calculator: FeeCalculatorConfig,
    pub outbox_dir: PathBuf,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            fee_calculator: FeeCalculatorConfig::default(),
            outbox_dir: PathBuf::from(DEFAULT_OUTBOX_DIR),
        }
    }
}

impl ContextConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        log::debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Build context using the wall clock and the configured calculator
    pub fn to_context(&self) -> BuildContext {
        let time_provider = Arc::new(SystemTimeProvider);
        match self.fee_calculator {
            FeeCalculatorConfig::Flat { fee } => {
                BuildContext::new(time_provider, Arc::new(FlatFeeCalculator::new(fee)))
            }
            FeeCalculatorConfig::Size { rate } => {
                BuildContext::new(time_provider, Arc::new(SizeFeeCalculator::new(rate)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Account, TransferTransaction, MULTISIG_ENVELOPE_FEE};
    use crate::multisig::MultisigEnvelope;
    use chrono::Utc;

    #[test]
    fn test_defaults() {
        let config = ContextConfig::default();
        assert_eq!(
            config.fee_calculator,
            FeeCalculatorConfig::Flat {
                fee: Amount::from_micro(MULTISIG_ENVELOPE_FEE)
            }
        );
        assert_eq!(config.outbox_dir, PathBuf::from(DEFAULT_OUTBOX_DIR));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ContextConfig =
            serde_json::from_str(r#"{ "fee_calculator": { "size": { "rate": 250 } } }"#).unwrap();
        assert_eq!(
            config.fee_calculator,
            FeeCalculatorConfig::Size { rate: FeeRate(250) }
        );
        assert_eq!(config.outbox_dir, PathBuf::from(DEFAULT_OUTBOX_DIR));
    }

    #[test]
    fn test_save_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");

        let config = ContextConfig {
            fee_calculator: FeeCalculatorConfig::Flat {
                fee: Amount::from_micro(1_000),
            },
            outbox_dir: temp_dir.path().join("outbox"),
        };
        config.save(&path).unwrap();

        assert_eq!(ContextConfig::load(&path).unwrap(), config);
        assert_eq!(ContextConfig::load_or_default(None).unwrap(), ContextConfig::default());
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = ContextConfig::load(&temp_dir.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_context_uses_configured_calculator() {
        let config = ContextConfig {
            fee_calculator: FeeCalculatorConfig::Flat {
                fee: Amount::from_micro(7),
            },
            ..Default::default()
        };
        let context = config.to_context();

        let inner = TransferTransaction::new(Utc::now(), Account::generate(), "1bob", Amount::from_units(1));
        let envelope = MultisigEnvelope::new(Utc::now(), Account::generate(), inner.into());
        let fee = context
            .default_fee_calculator
            .calculate_minimum_fee(&envelope)
            .unwrap();
        assert_eq!(fee, Amount::from_micro(7));
    }
}
