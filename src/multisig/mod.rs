//! Multisig envelope construction
//!
//! A multisig account cannot sign for itself. One of its cosigners wraps
//! the account's transaction in an envelope and signs that; the others
//! contribute co-signatures over the inner transaction hash.
//!
//! # Example
//!
//! ```ignore
//! use multisig_envelope::multisig::{cosign, BuildContext, MultisigEnvelopeBuilder};
//!
//! // A second cosigner approves the transfer
//! let approval = cosign(&transfer, &bob, Utc::now(), Amount::ZERO)?;
//!
//! // Alice wraps it, carrying Bob's approval along
//! let envelope = MultisigEnvelopeBuilder::new(BuildContext::default())
//!     .start_with_sender(alice)
//!     .with_inner_transaction(transfer)
//!     .add_cosignature(approval)
//!     .build_and_send(&outbox)?;
//! ```

pub mod builder;
pub mod cosignature;
pub mod envelope;

pub use builder::{
    AwaitingInner, BuildContext, BuildError, EnvelopeConfigurator, FeePolicy,
    MultisigEnvelopeBuilder,
};
pub use cosignature::{cosign, Cosignature};
pub use envelope::{EnvelopeError, MultisigEnvelope};
