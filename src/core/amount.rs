//! Currency amounts

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul};

/// Micro-units per whole currency unit
pub const MICRO_UNITS_PER_UNIT: u64 = 1_000_000;

/// An amount of currency, in micro-units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub fn from_micro(micro: u64) -> Self {
        Self(micro)
    }

    /// Whole units, saturating on overflow
    pub fn from_units(units: u64) -> Self {
        Self(units.saturating_mul(MICRO_UNITS_PER_UNIT))
    }

    pub fn as_micro(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u64> for Amount {
    type Output = Amount;

    fn mul(self, rhs: u64) -> Amount {
        Amount(self.0.saturating_mul(rhs))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:06}",
            self.0 / MICRO_UNITS_PER_UNIT,
            self.0 % MICRO_UNITS_PER_UNIT
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_and_micro() {
        assert_eq!(Amount::from_units(10).as_micro(), 10_000_000);
        assert_eq!(Amount::from_units(u64::MAX), Amount::from_micro(u64::MAX));
        assert!(Amount::ZERO.is_zero());
    }

    #[test]
    fn test_arithmetic_saturates() {
        assert_eq!(
            Amount::from_micro(150_000) + Amount::from_micro(50_000),
            Amount::from_micro(200_000)
        );
        assert_eq!(Amount::from_micro(u64::MAX) * 2, Amount::from_micro(u64::MAX));
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::from_micro(150_000).to_string(), "0.150000");
        assert_eq!(Amount::from_units(10).to_string(), "10.000000");
    }
}
