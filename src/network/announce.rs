//! Announce payload
//!
//! The request a node expects when a signed envelope is announced:
//! the encoded transaction and its signature, both hex.

use crate::multisig::MultisigEnvelope;
use crate::network::SendError;
use serde::{Deserialize, Serialize};

/// Payload submitted to a node to announce an envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnounceRequest {
    /// Envelope hash, used as the request id
    pub hash: String,
    /// Hex-encoded envelope bytes
    pub data: String,
    /// Hex-encoded envelope signature
    pub signature: String,
}

impl AnnounceRequest {
    /// Prepare an announce request. The envelope must be signed.
    pub fn from_envelope(envelope: &MultisigEnvelope) -> Result<Self, SendError> {
        let signature = envelope
            .signature
            .as_ref()
            .ok_or_else(|| SendError::Unsigned(envelope.hash()))?;

        Ok(Self {
            hash: envelope.hash(),
            data: hex::encode(envelope.to_bytes()),
            signature: signature.to_hex(),
        })
    }

    /// Size of the encoded envelope in bytes
    pub fn data_len(&self) -> usize {
        self.data.len() / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Account, Amount, TransferTransaction};
    use chrono::Utc;

    fn envelope() -> MultisigEnvelope {
        let now = Utc::now();
        let inner = TransferTransaction::new(now, Account::generate(), "1bob", Amount::from_units(3));
        MultisigEnvelope::new(now, Account::generate(), inner.into())
    }

    #[test]
    fn test_unsigned_envelope_rejected() {
        assert!(matches!(
            AnnounceRequest::from_envelope(&envelope()),
            Err(SendError::Unsigned(_))
        ));
    }

    #[test]
    fn test_signed_envelope_payload() {
        let mut env = envelope();
        env.sign().unwrap();

        let request = AnnounceRequest::from_envelope(&env).unwrap();
        assert_eq!(request.hash, env.hash());
        assert_eq!(hex::decode(&request.data).unwrap(), env.to_bytes());
        assert_eq!(request.data_len(), env.to_bytes().len());
        assert_eq!(Some(request.signature), env.signature.map(|s| s.to_hex()));
    }
}
