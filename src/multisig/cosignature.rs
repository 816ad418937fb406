//! Co-signatures
//!
//! A co-signature is one cosigner's approval of an inner transaction,
//! produced separately and later attached to an envelope.

use crate::core::{default_deadline, Account, Amount, InnerTransaction};
use crate::crypto::{sha256, verify_signature, Signature};
use crate::multisig::envelope::EnvelopeError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A signature from one cosigner over an inner transaction hash
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cosignature {
    /// When the co-signature was produced
    pub timestamp: DateTime<Utc>,
    /// The cosigner
    pub signer: Account,
    /// Hash of the inner transaction being approved
    pub other_hash: String,
    pub fee: Amount,
    pub deadline: DateTime<Utc>,
    pub signature: Signature,
}

impl Cosignature {
    pub(crate) fn canonical_data(
        timestamp: &DateTime<Utc>,
        signer: &Account,
        other_hash: &str,
        fee: Amount,
        deadline: &DateTime<Utc>,
    ) -> String {
        format!(
            "cosignature|{}|{}|{}|{}|{}",
            timestamp.to_rfc3339(),
            signer.public_key_hex(),
            other_hash,
            fee.as_micro(),
            deadline.to_rfc3339()
        )
    }

    /// The data that gets signed
    pub fn signing_data(&self) -> Vec<u8> {
        let data = Self::canonical_data(
            &self.timestamp,
            &self.signer,
            &self.other_hash,
            self.fee,
            &self.deadline,
        );
        sha256(data.as_bytes())
    }

    /// Encoding including the signature, used inside envelope bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        format!(
            "{}|{}",
            Self::canonical_data(
                &self.timestamp,
                &self.signer,
                &self.other_hash,
                self.fee,
                &self.deadline,
            ),
            self.signature.to_hex()
        )
        .into_bytes()
    }

    /// Verify the signature against the cosigner's public key
    pub fn verify(&self) -> Result<bool, EnvelopeError> {
        Ok(verify_signature(
            self.signer.public_key(),
            &self.signing_data(),
            &self.signature,
        )?)
    }

    /// Whether this co-signature approves `inner`
    pub fn refers_to(&self, inner: &InnerTransaction) -> bool {
        self.other_hash == inner.hash()
    }
}

/// Co-sign an inner transaction
///
/// The co-signature expires `DEFAULT_DEADLINE_HOURS` after `timestamp`.
pub fn cosign(
    inner: &InnerTransaction,
    cosigner: &Account,
    timestamp: DateTime<Utc>,
    fee: Amount,
) -> Result<Cosignature, EnvelopeError> {
    let key_pair = cosigner
        .key_pair()
        .ok_or_else(|| EnvelopeError::MissingPrivateKey(cosigner.address()))?;

    let other_hash = inner.hash();
    let deadline = default_deadline(timestamp);
    let data = Cosignature::canonical_data(&timestamp, cosigner, &other_hash, fee, &deadline);
    let signature = key_pair.sign(&sha256(data.as_bytes()))?;

    log::debug!(
        "Co-signed {} by {}",
        other_hash,
        cosigner.address()
    );

    Ok(Cosignature {
        timestamp,
        signer: cosigner.to_public(),
        other_hash,
        fee,
        deadline,
        signature,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TransferTransaction;
    use chrono::TimeZone;

    fn inner() -> InnerTransaction {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap();
        TransferTransaction::new(now, Account::generate(), "1bob", Amount::from_units(10)).into()
    }

    #[test]
    fn test_cosign_and_verify() {
        let inner = inner();
        let cosigner = Account::generate();
        let now = Utc::now();

        let cosig = cosign(&inner, &cosigner, now, Amount::from_micro(150_000)).unwrap();
        assert_eq!(cosig.signer, cosigner);
        assert!(!cosig.signer.can_sign());
        assert_eq!(cosig.deadline, default_deadline(now));
        assert!(cosig.refers_to(&inner));
        assert!(cosig.verify().unwrap());
    }

    #[test]
    fn test_tampered_cosignature_fails() {
        let inner = inner();
        let mut cosig = cosign(&inner, &Account::generate(), Utc::now(), Amount::ZERO).unwrap();
        cosig.fee = Amount::from_micro(1);
        assert!(!cosig.verify().unwrap());
    }

    #[test]
    fn test_cosign_requires_private_key() {
        let cosigner = Account::generate().to_public();
        let result = cosign(&inner(), &cosigner, Utc::now(), Amount::ZERO);
        assert!(matches!(result, Err(EnvelopeError::MissingPrivateKey(_))));
    }

    #[test]
    fn test_refers_to_other_inner() {
        let cosig = cosign(&inner(), &Account::generate(), Utc::now(), Amount::ZERO).unwrap();
        assert!(!cosig.refers_to(&inner()));
    }

    #[test]
    fn test_json_round_trip_still_verifies() {
        let cosig = cosign(&inner(), &Account::generate(), Utc::now(), Amount::ZERO).unwrap();
        let json = serde_json::to_string(&cosig).unwrap();
        let back: Cosignature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cosig);
        assert!(back.verify().unwrap());
    }
}
