//! Core ledger types
//!
//! This module contains the value types and collaborators the envelope
//! builder works with:
//! - Accounts and amounts
//! - Inner transactions (transfers, multisig modifications)
//! - Time providers and the default deadline
//! - Fee calculators

pub mod account;
pub mod amount;
pub mod fee;
pub mod time;
pub mod transaction;

pub use account::Account;
pub use amount::{Amount, MICRO_UNITS_PER_UNIT};
pub use fee::{
    FeeCalculator, FeeError, FeeRate, FlatFeeCalculator, SizeFeeCalculator, DEFAULT_FEE_RATE,
    MIN_SIZE_FEE, MULTISIG_ENVELOPE_FEE,
};
pub use time::{
    default_deadline, FixedTimeProvider, SystemTimeProvider, TimeProvider, DEFAULT_DEADLINE_HOURS,
};
pub use transaction::{
    AggregateModificationTransaction, CosignatoryModification, InnerTransaction, ModificationKind,
    TransferTransaction,
};
