//! Inner transactions
//!
//! The transactions a multisig envelope can wrap. Each is issued on
//! behalf of the multisig account (`signer`) and only becomes valid once
//! enough cosigners have wrapped or co-signed it.

use crate::core::{default_deadline, Account, Amount};
use crate::crypto::sha256_hex;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Transfer
// =============================================================================

/// Transfer of currency from the multisig account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferTransaction {
    pub timestamp: DateTime<Utc>,
    /// The multisig account the funds leave from
    pub signer: Account,
    /// Recipient address
    pub recipient: String,
    pub amount: Amount,
    pub fee: Amount,
    pub deadline: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TransferTransaction {
    /// Create a transfer with zero fee and the default deadline
    pub fn new(timestamp: DateTime<Utc>, signer: Account, recipient: &str, amount: Amount) -> Self {
        Self {
            timestamp,
            signer,
            recipient: recipient.to_string(),
            amount,
            fee: Amount::ZERO,
            deadline: default_deadline(timestamp),
            message: None,
        }
    }

    pub fn with_fee(mut self, fee: Amount) -> Self {
        self.fee = fee;
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    /// Free-text fields are hex encoded so no field can contain the separator.
    /// A missing message encodes as `-`, distinct from an empty one.
    fn canonical_data(&self) -> String {
        format!(
            "transfer|{}|{}|{}|{}|{}|{}|{}",
            self.timestamp.to_rfc3339(),
            self.signer.public_key_hex(),
            hex::encode(self.recipient.as_bytes()),
            self.amount.as_micro(),
            self.fee.as_micro(),
            self.deadline.to_rfc3339(),
            self.message
                .as_ref()
                .map(|m| hex::encode(m.as_bytes()))
                .unwrap_or_else(|| "-".to_string())
        )
    }
}

// =============================================================================
// Aggregate modification
// =============================================================================

/// Direction of a cosignatory change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModificationKind {
    Add,
    Remove,
}

/// One change to the cosignatory set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CosignatoryModification {
    pub kind: ModificationKind,
    pub cosignatory: Account,
}

impl CosignatoryModification {
    pub fn add(cosignatory: Account) -> Self {
        Self {
            kind: ModificationKind::Add,
            cosignatory,
        }
    }

    pub fn remove(cosignatory: Account) -> Self {
        Self {
            kind: ModificationKind::Remove,
            cosignatory,
        }
    }
}

/// Change of the cosignatories and/or threshold of a multisig account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateModificationTransaction {
    pub timestamp: DateTime<Utc>,
    pub signer: Account,
    pub fee: Amount,
    pub deadline: DateTime<Utc>,
    pub modifications: Vec<CosignatoryModification>,
    /// Relative change of the required signature count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_cosignatories: Option<i32>,
}

impl AggregateModificationTransaction {
    pub fn new(
        timestamp: DateTime<Utc>,
        signer: Account,
        modifications: Vec<CosignatoryModification>,
        min_cosignatories: Option<i32>,
    ) -> Self {
        Self {
            timestamp,
            signer,
            fee: Amount::ZERO,
            deadline: default_deadline(timestamp),
            modifications,
            min_cosignatories,
        }
    }

    pub fn with_fee(mut self, fee: Amount) -> Self {
        self.fee = fee;
        self
    }

    fn canonical_data(&self) -> String {
        let modifications: Vec<String> = self
            .modifications
            .iter()
            .map(|m| {
                let kind = match m.kind {
                    ModificationKind::Add => "add",
                    ModificationKind::Remove => "remove",
                };
                format!("{}:{}", kind, m.cosignatory.public_key_hex())
            })
            .collect();

        format!(
            "aggregate_modification|{}|{}|{}|{}|{}|{}",
            self.timestamp.to_rfc3339(),
            self.signer.public_key_hex(),
            self.fee.as_micro(),
            self.deadline.to_rfc3339(),
            modifications.join(","),
            self.min_cosignatories
                .map(|m| m.to_string())
                .unwrap_or_default()
        )
    }
}

// =============================================================================
// Inner transaction
// =============================================================================

/// Any transaction that can be wrapped in a multisig envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InnerTransaction {
    Transfer(TransferTransaction),
    AggregateModification(AggregateModificationTransaction),
}

impl InnerTransaction {
    /// The multisig account issuing the transaction
    pub fn signer(&self) -> &Account {
        match self {
            InnerTransaction::Transfer(tx) => &tx.signer,
            InnerTransaction::AggregateModification(tx) => &tx.signer,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            InnerTransaction::Transfer(tx) => tx.timestamp,
            InnerTransaction::AggregateModification(tx) => tx.timestamp,
        }
    }

    pub fn deadline(&self) -> DateTime<Utc> {
        match self {
            InnerTransaction::Transfer(tx) => tx.deadline,
            InnerTransaction::AggregateModification(tx) => tx.deadline,
        }
    }

    pub fn fee(&self) -> Amount {
        match self {
            InnerTransaction::Transfer(tx) => tx.fee,
            InnerTransaction::AggregateModification(tx) => tx.fee,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            InnerTransaction::Transfer(_) => "transfer",
            InnerTransaction::AggregateModification(_) => "aggregate_modification",
        }
    }

    /// Deterministic byte encoding used for hashing and signing
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            InnerTransaction::Transfer(tx) => tx.canonical_data(),
            InnerTransaction::AggregateModification(tx) => tx.canonical_data(),
        }
        .into_bytes()
    }

    /// Hex SHA-256 of the canonical encoding; cosignatures refer to this
    pub fn hash(&self) -> String {
        sha256_hex(&self.to_bytes())
    }
}

impl From<TransferTransaction> for InnerTransaction {
    fn from(tx: TransferTransaction) -> Self {
        InnerTransaction::Transfer(tx)
    }
}

impl From<AggregateModificationTransaction> for InnerTransaction {
    fn from(tx: AggregateModificationTransaction) -> Self {
        InnerTransaction::AggregateModification(tx)
    }
}
