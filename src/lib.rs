//! Multisig Envelope: signed multisig wrapping transactions in Rust
//!
//! This crate builds the envelope a cosigner submits to approve a
//! transaction issued by a multisig account:
//! - Two-phase builder that only builds once the inner transaction is set
//! - Default timestamp, 23 hour deadline and pluggable fee calculation
//! - ECDSA signing (secp256k1) of envelopes and co-signatures
//! - Prior co-signatures carried in insertion order
//! - Announce through an in-memory pool or an on-disk outbox
//!
//! # Example
//!
//! ```rust
//! use multisig_envelope::core::{Account, Amount, InnerTransaction, TransferTransaction};
//! use multisig_envelope::multisig::{cosign, MultisigEnvelopeBuilder};
//! use multisig_envelope::network::MemorySender;
//! use chrono::Utc;
//!
//! let multisig = Account::generate().to_public();
//! let (alice, bob) = (Account::generate(), Account::generate());
//!
//! // The multisig account pays 10 units to Bob
//! let transfer: InnerTransaction =
//!     TransferTransaction::new(Utc::now(), multisig, &bob.address(), Amount::from_units(10)).into();
//!
//! // Bob approves, Alice wraps and announces
//! let approval = cosign(&transfer, &bob, Utc::now(), Amount::ZERO).unwrap();
//! let pool = MemorySender::new();
//! let envelope = MultisigEnvelopeBuilder::default()
//!     .start_with_sender(alice)
//!     .with_inner_transaction(transfer)
//!     .add_cosignature(approval)
//!     .build_and_send(&pool)
//!     .unwrap();
//!
//! assert!(envelope.verify_cosignatures().unwrap());
//! assert_eq!(pool.len(), 1);
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod crypto;
pub mod multisig;
pub mod network;

// Re-export commonly used types
pub use crate::config::ContextConfig;
pub use crate::core::{
    Account, Amount, FeeCalculator, FlatFeeCalculator, InnerTransaction, SizeFeeCalculator,
    TimeProvider, TransferTransaction,
};
pub use crypto::{KeyPair, Signature};
pub use multisig::{
    cosign, BuildContext, BuildError, Cosignature, MultisigEnvelope, MultisigEnvelopeBuilder,
};
pub use network::{MemorySender, OutboxSender, TransactionSender};
