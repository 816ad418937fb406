//! Fee calculation
//!
//! Fee policy is pluggable: the builder asks a `FeeCalculator` for the
//! minimum fee of an envelope. Two calculators ship with the crate:
//! - a flat fee per envelope (the default)
//! - a fee rate per byte of the envelope's encoding

use crate::core::Amount;
use crate::multisig::MultisigEnvelope;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Flat minimum fee for a multisig envelope (0.15 units)
pub const MULTISIG_ENVELOPE_FEE: u64 = 150_000;

/// Default fee rate (micro-units per byte)
pub const DEFAULT_FEE_RATE: u64 = 100;

/// Lower bound for size based fees
pub const MIN_SIZE_FEE: u64 = 50_000;

// =============================================================================
// Errors
// =============================================================================

/// Fee calculation errors
#[derive(Error, Debug)]
pub enum FeeError {
    #[error("Fee overflow: {rate} per byte for {size} bytes")]
    Overflow { rate: u64, size: usize },
    #[error("Fee calculation failed: {0}")]
    Calculation(String),
}

// =============================================================================
// Fee Rate
// =============================================================================

/// Fee rate in micro-units per byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeRate(pub u64);

impl FeeRate {
    pub fn from_micro_per_byte(rate: u64) -> Self {
        Self(rate)
    }

    /// Fee for a given size, `None` on overflow
    pub fn fee_for_size(&self, size_bytes: usize) -> Option<Amount> {
        self.0
            .checked_mul(size_bytes as u64)
            .map(Amount::from_micro)
    }

    pub fn as_micro_per_byte(&self) -> u64 {
        self.0
    }
}

impl Default for FeeRate {
    fn default() -> Self {
        Self(DEFAULT_FEE_RATE)
    }
}

// =============================================================================
// Calculators
// =============================================================================

/// Computes the minimum network fee for an envelope
pub trait FeeCalculator: Send + Sync {
    fn calculate_minimum_fee(&self, envelope: &MultisigEnvelope) -> Result<Amount, FeeError>;
}

/// Same fee for every envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatFeeCalculator {
    pub fee: Amount,
}

impl FlatFeeCalculator {
    pub fn new(fee: Amount) -> Self {
        Self { fee }
    }
}

impl Default for FlatFeeCalculator {
    fn default() -> Self {
        Self::new(Amount::from_micro(MULTISIG_ENVELOPE_FEE))
    }
}

impl FeeCalculator for FlatFeeCalculator {
    fn calculate_minimum_fee(&self, _envelope: &MultisigEnvelope) -> Result<Amount, FeeError> {
        Ok(self.fee)
    }
}

/// Fee proportional to the encoded envelope size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeFeeCalculator {
    pub rate: FeeRate,
    pub min_fee: Amount,
}

impl SizeFeeCalculator {
    pub fn new(rate: FeeRate) -> Self {
        Self {
            rate,
            min_fee: Amount::from_micro(MIN_SIZE_FEE),
        }
    }
}

impl Default for SizeFeeCalculator {
    fn default() -> Self {
        Self::new(FeeRate::default())
    }
}

impl FeeCalculator for SizeFeeCalculator {
    fn calculate_minimum_fee(&self, envelope: &MultisigEnvelope) -> Result<Amount, FeeError> {
        let size = envelope.to_bytes().len();
        let fee = self.rate.fee_for_size(size).ok_or(FeeError::Overflow {
            rate: self.rate.as_micro_per_byte(),
            size,
        })?;
        Ok(fee.max(self.min_fee))
    }
}

// =============================================================================
// Tests
// =============================================================================
