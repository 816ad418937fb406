//! Cryptographic utilities
//!
//! This module provides:
//! - SHA-256 hashing
//! - ECDSA key management (secp256k1)
//! - Compact signatures and address derivation

pub mod hash;
pub mod keys;

pub use hash::{sha256, sha256_hex};
pub use keys::{
    public_key_from_hex, public_key_to_address, sign_message, verify_signature, KeyError, KeyPair,
    Signature, SIGNATURE_LENGTH,
};
