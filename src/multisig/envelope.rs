//! Multisig envelope transaction
//!
//! The envelope wraps an inner transaction on behalf of one cosigner
//! (the sender). Prior co-signatures from other cosigners can ride along.

use crate::core::{default_deadline, Account, Amount, InnerTransaction};
use crate::crypto::{sha256, sha256_hex, verify_signature, KeyError, Signature};
use crate::multisig::cosignature::Cosignature;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Envelope signing and verification errors
#[derive(Error, Debug)]
pub enum EnvelopeError {
    #[error("Cannot sign: account {0} has no private key")]
    MissingPrivateKey(String),
    #[error("Crypto error: {0}")]
    CryptoError(#[from] KeyError),
}

/// A transaction wrapping another transaction for multisig approval
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MultisigEnvelope {
    pub timestamp: DateTime<Utc>,
    /// The cosigner wrapping the inner transaction
    pub sender: Account,
    /// The wrapped transaction
    pub inner: InnerTransaction,
    pub fee: Amount,
    pub deadline: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
    /// Delegate signer, distinct from the sender
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_by: Option<Account>,
    /// Prior co-signatures, in the order they were added
    #[serde(default)]
    pub cosignatures: Vec<Cosignature>,
}

impl MultisigEnvelope {
    /// Create an unsigned envelope with zero fee and the default deadline
    pub fn new(timestamp: DateTime<Utc>, sender: Account, inner: InnerTransaction) -> Self {
        Self {
            timestamp,
            sender,
            inner,
            fee: Amount::ZERO,
            deadline: default_deadline(timestamp),
            signature: None,
            signed_by: None,
            cosignatures: Vec::new(),
        }
    }

    pub fn set_fee(&mut self, fee: Amount) {
        self.fee = fee;
    }

    pub fn set_deadline(&mut self, deadline: DateTime<Utc>) {
        self.deadline = deadline;
    }

    pub fn set_signature(&mut self, signature: Signature) {
        self.signature = Some(signature);
    }

    /// Record a delegate signer. This does not sign.
    pub fn sign_by(&mut self, account: &Account) {
        self.signed_by = Some(account.to_public());
    }

    pub fn add_cosignature(&mut self, cosignature: Cosignature) {
        self.cosignatures.push(cosignature);
    }

    /// Canonical encoding of everything except the envelope signature
    fn unsigned_data(&self) -> String {
        let cosignatures: Vec<String> = self
            .cosignatures
            .iter()
            .map(|c| String::from_utf8_lossy(&c.to_bytes()).into_owned())
            .collect();

        format!(
            "multisig|{}|{}|{}|{}|{}|{}|[{}]",
            self.timestamp.to_rfc3339(),
            self.sender.public_key_hex(),
            self.inner.hash(),
            self.fee.as_micro(),
            self.deadline.to_rfc3339(),
            self.signed_by
                .as_ref()
                .map(|a| a.public_key_hex())
                .unwrap_or_default(),
            cosignatures.join(";")
        )
    }

    /// The data that gets signed
    pub fn signing_data(&self) -> Vec<u8> {
        sha256(self.unsigned_data().as_bytes())
    }

    /// Full encoding including inner transaction and signature
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.unsigned_data().into_bytes();
        bytes.push(b'|');
        bytes.extend_from_slice(&self.inner.to_bytes());
        bytes.push(b'|');
        if let Some(signature) = &self.signature {
            bytes.extend_from_slice(signature.to_hex().as_bytes());
        }
        bytes
    }

    /// Hex hash of the full encoding
    pub fn hash(&self) -> String {
        sha256_hex(&self.to_bytes())
    }

    /// Sign with the sender's private key, replacing any existing signature
    pub fn sign(&mut self) -> Result<(), EnvelopeError> {
        let key_pair = self
            .sender
            .key_pair()
            .ok_or_else(|| EnvelopeError::MissingPrivateKey(self.sender.address()))?;

        let signature = key_pair.sign(&self.signing_data())?;
        self.signature = Some(signature);

        log::debug!(
            "Signed multisig envelope {} for sender {}",
            self.hash(),
            self.sender.address()
        );
        Ok(())
    }

    /// Check the envelope signature against the sender's public key
    pub fn verify_signature(&self) -> Result<bool, EnvelopeError> {
        match &self.signature {
            Some(signature) => Ok(verify_signature(
                self.sender.public_key(),
                &self.signing_data(),
                signature,
            )?),
            None => Ok(false),
        }
    }

    /// Check every attached co-signature approves this inner transaction
    pub fn verify_cosignatures(&self) -> Result<bool, EnvelopeError> {
        for cosignature in &self.cosignatures {
            if !cosignature.refers_to(&self.inner) || !cosignature.verify()? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Public keys of the sender and every attached cosigner
    pub fn signers(&self) -> Vec<String> {
        std::iter::once(self.sender.public_key_hex())
            .chain(self.cosignatures.iter().map(|c| c.signer.public_key_hex()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TransferTransaction;
    use crate::multisig::cosign;

    fn envelope(sender: Account) -> MultisigEnvelope {
        let now = Utc::now();
        let inner = TransferTransaction::new(now, Account::generate(), "1bob", Amount::from_units(10));
        MultisigEnvelope::new(now, sender, inner.into())
    }

    #[test]
    fn test_new_envelope_defaults() {
        let env = envelope(Account::generate());
        assert_eq!(env.fee, Amount::ZERO);
        assert_eq!(env.deadline, default_deadline(env.timestamp));
        assert!(env.signature.is_none());
        assert!(env.cosignatures.is_empty());
        assert!(!env.verify_signature().unwrap());
    }

    #[test]
    fn test_sign_and_verify() {
        let mut env = envelope(Account::generate());
        env.sign().unwrap();
        assert!(env.signature.is_some());
        assert!(env.verify_signature().unwrap());

        // Any signed field change invalidates the signature
        env.set_fee(Amount::from_micro(1));
        assert!(!env.verify_signature().unwrap());
    }

    #[test]
    fn test_sign_replaces_attached_signature() {
        let sender = Account::generate();
        let mut env = envelope(sender);
        let foreign = Account::generate().sign(&[1u8; 32]).unwrap().unwrap();
        env.set_signature(foreign);

        env.sign().unwrap();
        assert_ne!(env.signature, Some(foreign));
        assert!(env.verify_signature().unwrap());
    }

    #[test]
    fn test_sign_without_private_key() {
        let mut env = envelope(Account::generate().to_public());
        assert!(matches!(env.sign(), Err(EnvelopeError::MissingPrivateKey(_))));
    }

    #[test]
    fn test_sign_by_marks_only() {
        let delegate = Account::generate();
        let mut env = envelope(Account::generate());
        env.sign_by(&delegate);
        assert_eq!(env.signed_by, Some(delegate));
        assert!(env.signature.is_none());
    }

    #[test]
    fn test_cosignature_verification() {
        let mut env = envelope(Account::generate());
        let cosig = cosign(&env.inner, &Account::generate(), Utc::now(), Amount::ZERO).unwrap();
        env.add_cosignature(cosig.clone());
        assert!(env.verify_cosignatures().unwrap());
        assert_eq!(env.signers().len(), 2);

        let other = envelope(Account::generate());
        let stray = cosign(&other.inner, &Account::generate(), Utc::now(), Amount::ZERO).unwrap();
        env.add_cosignature(stray);
        assert!(!env.verify_cosignatures().unwrap());
    }

    #[test]
    fn test_json_round_trip_keeps_signature_valid() {
        let mut env = envelope(Account::generate());
        env.sign().unwrap();

        let json = serde_json::to_string_pretty(&env).unwrap();
        let back: MultisigEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(back, env);
        assert_eq!(back.hash(), env.hash());
        assert!(back.verify_signature().unwrap());
    }
}
