//! In-process announce pool
//!
//! Collects announced envelopes in memory. Useful for embedding and
//! for exercising `build_and_send` without a node.

use crate::multisig::MultisigEnvelope;
use crate::network::{AnnounceRequest, SendError, TransactionSender};
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

/// Default maximum number of pooled envelopes
pub const DEFAULT_POOL_SIZE: usize = 10_000;

#[derive(Debug, Default)]
struct PoolState {
    envelopes: Vec<MultisigEnvelope>,
    hashes: HashSet<String>,
}

/// Sender that keeps announced envelopes in memory
#[derive(Debug)]
pub struct MemorySender {
    state: Mutex<PoolState>,
    max_size: usize,
}

impl MemorySender {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_POOL_SIZE)
    }

    pub fn with_capacity(max_size: usize) -> Self {
        Self {
            state: Mutex::new(PoolState::default()),
            max_size,
        }
    }

    fn state(&self) -> MutexGuard<'_, PoolState> {
        // Pool updates cannot panic half-way, so a poisoned lock is still consistent
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Announced envelopes, oldest first
    pub fn announced(&self) -> Vec<MultisigEnvelope> {
        self.state().envelopes.clone()
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.state().hashes.contains(hash)
    }

    pub fn len(&self) -> usize {
        self.state().envelopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut state = self.state();
        state.envelopes.clear();
        state.hashes.clear();
    }
}

impl Default for MemorySender {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionSender for MemorySender {
    fn send_multisig(&self, envelope: MultisigEnvelope) -> Result<MultisigEnvelope, SendError> {
        let request = AnnounceRequest::from_envelope(&envelope)?;
        let mut state = self.state();

        if state.hashes.contains(&request.hash) {
            return Err(SendError::Duplicate(request.hash));
        }
        if state.envelopes.len() >= self.max_size {
            return Err(SendError::Rejected(format!(
                "pool full ({} envelopes)",
                self.max_size
            )));
        }

        log::info!(
            "Announced multisig envelope {} ({} bytes)",
            request.hash,
            request.data_len()
        );
        state.hashes.insert(request.hash);
        state.envelopes.push(envelope.clone());
        Ok(envelope)
    }
}
