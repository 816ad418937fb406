//! Transmission of built envelopes
//!
//! The builder hands finished envelopes to a `TransactionSender`. This
//! module provides:
//! - The `TransactionSender` collaborator trait
//! - The announce payload a node expects
//! - An in-memory pool and an on-disk outbox

pub mod announce;
pub mod memory;
pub mod outbox;

pub use announce::AnnounceRequest;
pub use memory::{MemorySender, DEFAULT_POOL_SIZE};
pub use outbox::{OutboxSender, DEFAULT_OUTBOX_DIR};

use crate::multisig::MultisigEnvelope;
use std::io;
use thiserror::Error;

/// Transmission errors
#[derive(Error, Debug)]
pub enum SendError {
    #[error("Envelope {0} is not signed")]
    Unsigned(String),
    #[error("Envelope {0} already announced")]
    Duplicate(String),
    #[error("Announce rejected: {0}")]
    Rejected(String),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Accepts a fully built envelope and returns it, possibly after
/// submitting it to the network
pub trait TransactionSender: Send + Sync {
    fn send_multisig(&self, envelope: MultisigEnvelope) -> Result<MultisigEnvelope, SendError>;
}
