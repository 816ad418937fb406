//! Ledger accounts
//!
//! An account is identified by its public key. It may also hold the
//! private key, in which case it can sign.

use crate::crypto::{public_key_from_hex, public_key_to_address, KeyError, KeyPair, Signature};
use secp256k1::PublicKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A ledger account, optionally able to sign
#[derive(Clone)]
pub struct Account {
    public_key: PublicKey,
    key_pair: Option<KeyPair>,
}

impl Account {
    /// Create a fresh signing account
    pub fn generate() -> Self {
        Self::from_key_pair(KeyPair::generate())
    }

    /// Create a signing account from a key pair
    pub fn from_key_pair(key_pair: KeyPair) -> Self {
        Self {
            public_key: key_pair.public_key,
            key_pair: Some(key_pair),
        }
    }

    /// Create a signing account from a hex-encoded private key
    pub fn from_private_key_hex(hex_key: &str) -> Result<Self, KeyError> {
        Ok(Self::from_key_pair(KeyPair::from_private_key_hex(hex_key)?))
    }

    /// Create a verify-only account
    pub fn from_public_key(public_key: PublicKey) -> Self {
        Self {
            public_key,
            key_pair: None,
        }
    }

    /// Create a verify-only account from a hex-encoded public key
    pub fn from_public_key_hex(hex_key: &str) -> Result<Self, KeyError> {
        Ok(Self::from_public_key(public_key_from_hex(hex_key)?))
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Compressed public key as hex
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key.serialize())
    }

    pub fn address(&self) -> String {
        public_key_to_address(&self.public_key)
    }

    /// Whether this account holds a private key
    pub fn can_sign(&self) -> bool {
        self.key_pair.is_some()
    }

    pub fn key_pair(&self) -> Option<&KeyPair> {
        self.key_pair.as_ref()
    }

    /// Sign with the private key, `None` for verify-only accounts
    pub fn sign(&self, message_hash: &[u8]) -> Option<Result<Signature, KeyError>> {
        self.key_pair.as_ref().map(|kp| kp.sign(message_hash))
    }

    /// Drop the private key
    pub fn to_public(&self) -> Self {
        Self::from_public_key(self.public_key)
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.public_key == other.public_key
    }
}

impl Eq for Account {}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address())
            .field("can_sign", &self.can_sign())
            .finish()
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address())
    }
}

// Only the public key is ever serialized
impl Serialize for Account {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.public_key_hex())
    }
}

impl<'de> Deserialize<'de> for Account {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Account::from_public_key_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_account() {
        let account = Account::generate();
        assert!(account.can_sign());
        assert!(account.address().starts_with('1'));
        assert!(account.sign(&[7u8; 32]).unwrap().is_ok());
    }

    #[test]
    fn test_public_only_account() {
        let account = Account::generate().to_public();
        assert!(!account.can_sign());
        assert!(account.sign(&[7u8; 32]).is_none());
    }

    #[test]
    fn test_equality_ignores_private_key() {
        let account = Account::generate();
        assert_eq!(account, account.to_public());
        assert_ne!(account, Account::generate());
    }

    #[test]
    fn test_serializes_public_key_only() {
        let account = Account::generate();
        let json = serde_json::to_string(&account).unwrap();
        assert_eq!(json, format!("\"{}\"", account.public_key_hex()));

        let back: Account = serde_json::from_str(&json).unwrap();
        assert_eq!(back, account);
        assert!(!back.can_sign());
    }
}
