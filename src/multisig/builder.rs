//! Multisig envelope builder
//!
//! Building happens in two phases, each its own type:
//! - `AwaitingInner`: the sender is known, the inner transaction is not.
//!   Only `with_inner_transaction` is available.
//! - `EnvelopeConfigurator`: everything else can be configured in any
//!   order, then `build` or `build_and_send` consumes the builder.
//!
//! # Example
//!
//! ```rust
//! use multisig_envelope::core::{Account, Amount, TransferTransaction};
//! use multisig_envelope::multisig::{BuildContext, MultisigEnvelopeBuilder};
//! use chrono::Utc;
//!
//! let cosigner = Account::generate();
//! let multisig = Account::generate().to_public();
//! let bob = Account::generate();
//! let transfer = TransferTransaction::new(Utc::now(), multisig, &bob.address(), Amount::from_units(10));
//!
//! let envelope = MultisigEnvelopeBuilder::new(BuildContext::default())
//!     .start_with_sender(cosigner)
//!     .with_inner_transaction(transfer)
//!     .build()
//!     .unwrap();
//!
//! assert!(envelope.verify_signature().unwrap());
//! ```

use crate::core::{
    default_deadline, Account, Amount, FeeCalculator, FeeError, FlatFeeCalculator,
    InnerTransaction, SystemTimeProvider, TimeProvider,
};
use crate::crypto::Signature;
use crate::multisig::cosignature::Cosignature;
use crate::multisig::envelope::{EnvelopeError, MultisigEnvelope};
use crate::network::{SendError, TransactionSender};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

// =============================================================================
// Errors
// =============================================================================

/// Errors from a terminal build call. Collaborator errors pass through as-is.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Fee(#[from] FeeError),
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
    #[error(transparent)]
    Send(#[from] SendError),
}

// =============================================================================
// Build context
// =============================================================================

/// Process-wide defaults read at build time
#[derive(Clone)]
pub struct BuildContext {
    pub time_provider: Arc<dyn TimeProvider>,
    pub default_fee_calculator: Arc<dyn FeeCalculator>,
}

impl BuildContext {
    pub fn new(
        time_provider: Arc<dyn TimeProvider>,
        default_fee_calculator: Arc<dyn FeeCalculator>,
    ) -> Self {
        Self {
            time_provider,
            default_fee_calculator,
        }
    }

    pub fn with_time_provider(mut self, provider: impl TimeProvider + 'static) -> Self {
        self.time_provider = Arc::new(provider);
        self
    }

    pub fn with_default_fee_calculator(mut self, calculator: impl FeeCalculator + 'static) -> Self {
        self.default_fee_calculator = Arc::new(calculator);
        self
    }
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::new(
            Arc::new(SystemTimeProvider),
            Arc::new(FlatFeeCalculator::default()),
        )
    }
}

impl fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildContext").finish_non_exhaustive()
    }
}

// =============================================================================
// Fee policy
// =============================================================================

/// How the envelope fee is decided
///
/// An explicit fee never reaches the envelope: asking for one selects
/// `ZeroOverride` and the envelope carries a zero fee.
#[derive(Clone)]
pub enum FeePolicy {
    /// Ask a calculator; `None` means the context default
    Calculated {
        calculator: Option<Arc<dyn FeeCalculator>>,
    },
    /// Fee is zero
    ZeroOverride,
}

impl FeePolicy {
    fn calculated() -> Self {
        FeePolicy::Calculated { calculator: None }
    }

    /// Resolve the fee for `envelope`
    fn resolve(
        &self,
        context: &BuildContext,
        envelope: &MultisigEnvelope,
    ) -> Result<Amount, FeeError> {
        match self {
            FeePolicy::Calculated { calculator } => calculator
                .as_ref()
                .unwrap_or(&context.default_fee_calculator)
                .calculate_minimum_fee(envelope),
            FeePolicy::ZeroOverride => Ok(Amount::ZERO),
        }
    }
}

impl fmt::Debug for FeePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeePolicy::Calculated { calculator: None } => f.write_str("Calculated(default)"),
            FeePolicy::Calculated { calculator: Some(_) } => f.write_str("Calculated(custom)"),
            FeePolicy::ZeroOverride => f.write_str("ZeroOverride"),
        }
    }
}

// =============================================================================
// Builder phases
// =============================================================================

/// Entry point for building multisig envelopes
#[derive(Debug, Clone, Default)]
pub struct MultisigEnvelopeBuilder {
    context: BuildContext,
}

impl MultisigEnvelopeBuilder {
    pub fn new(context: BuildContext) -> Self {
        Self { context }
    }

    /// Begin an envelope for `sender`
    pub fn start_with_sender(self, sender: Account) -> AwaitingInner {
        AwaitingInner {
            context: self.context,
            sender,
        }
    }
}

/// Sender chosen, inner transaction still missing
#[derive(Debug)]
pub struct AwaitingInner {
    context: BuildContext,
    sender: Account,
}

impl AwaitingInner {
    /// Set the transaction to wrap
    pub fn with_inner_transaction(self, transaction: impl Into<InnerTransaction>) -> EnvelopeConfigurator {
        EnvelopeConfigurator {
            context: self.context,
            sender: self.sender,
            inner: transaction.into(),
            fee_policy: FeePolicy::calculated(),
            deadline: None,
            signature: None,
            signed_by: None,
            cosignatures: Vec::new(),
        }
    }
}

/// Fully configurable envelope builder
#[derive(Debug)]
pub struct EnvelopeConfigurator {
    context: BuildContext,
    sender: Account,
    inner: InnerTransaction,
    fee_policy: FeePolicy,
    deadline: Option<DateTime<Utc>>,
    signature: Option<Signature>,
    signed_by: Option<Account>,
    cosignatures: Vec<Cosignature>,
}

impl EnvelopeConfigurator {
    /// Accepted and ignored: the envelope timestamp always comes from
    /// the context's time provider
    pub fn with_timestamp(self, timestamp: DateTime<Utc>) -> Self {
        log::debug!(
            "Ignoring explicit envelope timestamp {}, using time provider",
            timestamp
        );
        self
    }

    /// Record a delegate signer
    pub fn with_signed_by(mut self, account: Account) -> Self {
        self.signed_by = Some(account);
        self
    }

    /// Request an explicit fee. The amount is discarded and the
    /// envelope fee becomes zero.
    pub fn with_fee(mut self, amount: Amount) -> Self {
        log::debug!("Explicit fee {} requested, envelope fee will be zero", amount);
        self.fee_policy = FeePolicy::ZeroOverride;
        self
    }

    /// Use `calculator` instead of the context default, unless an
    /// explicit fee was requested
    pub fn with_fee_calculator(mut self, calculator: impl FeeCalculator + 'static) -> Self {
        if let FeePolicy::Calculated { .. } = self.fee_policy {
            self.fee_policy = FeePolicy::Calculated {
                calculator: Some(Arc::new(calculator)),
            };
        }
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Attach a pre-computed signature before the final signing step
    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.signature = Some(signature);
        self
    }

    /// Append a prior co-signature
    pub fn add_cosignature(mut self, cosignature: Cosignature) -> Self {
        self.cosignatures.push(cosignature);
        self
    }

    pub fn fee_policy(&self) -> &FeePolicy {
        &self.fee_policy
    }

    /// Build and sign the envelope
    pub fn build(self) -> Result<MultisigEnvelope, BuildError> {
        let timestamp = self.context.time_provider.current_time();
        let mut envelope = MultisigEnvelope::new(timestamp, self.sender, self.inner);

        let fee = self.fee_policy.resolve(&self.context, &envelope)?;
        envelope.set_fee(fee);

        envelope.set_deadline(self.deadline.unwrap_or_else(|| default_deadline(timestamp)));

        if let Some(signature) = self.signature {
            envelope.set_signature(signature);
        }
        if let Some(account) = &self.signed_by {
            envelope.sign_by(account);
        }
        for cosignature in self.cosignatures {
            envelope.add_cosignature(cosignature);
        }

        envelope.sign()?;

        log::debug!(
            "Built multisig envelope {} wrapping {} {} (fee {}, {} cosignatures)",
            envelope.hash(),
            envelope.inner.kind(),
            envelope.inner.hash(),
            envelope.fee,
            envelope.cosignatures.len()
        );
        Ok(envelope)
    }

    /// Build, then hand the envelope to `sender`. Returns whatever the
    /// sender returns.
    pub fn build_and_send<S>(self, sender: &S) -> Result<MultisigEnvelope, BuildError>
    where
        S: TransactionSender + ?Sized,
    {
        let envelope = self.build()?;
        Ok(sender.send_multisig(envelope)?)
    }
}

// =============================================================================
// Tests
// =============================================================================
