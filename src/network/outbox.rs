//! Outbox directory sender
//!
//! Writes each announce request as `<hash>.json` into a directory that a
//! relay process drains towards a node.

use crate::multisig::MultisigEnvelope;
use crate::network::{AnnounceRequest, SendError, TransactionSender};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default outbox directory
pub const DEFAULT_OUTBOX_DIR: &str = ".envelope_outbox";

/// Sender that spools announce requests to disk
#[derive(Debug, Clone)]
pub struct OutboxSender {
    dir: PathBuf,
}

impl OutboxSender {
    /// Open an outbox, creating the directory if needed
    pub fn new(dir: &Path) -> Result<Self, SendError> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn request_path(&self, hash: &str) -> PathBuf {
        self.dir.join(format!("{}.json", hash))
    }

    /// Whether an announce request for `hash` is waiting in the outbox
    pub fn contains(&self, hash: &str) -> bool {
        self.request_path(hash).exists()
    }

    /// All pending announce requests
    pub fn pending(&self) -> Result<Vec<AnnounceRequest>, SendError> {
        let mut requests: Vec<AnnounceRequest> = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                let reader = BufReader::new(fs::File::open(&path)?);
                requests.push(serde_json::from_reader(reader)?);
            }
        }

        requests.sort_by(|a, b| a.hash.cmp(&b.hash));
        Ok(requests)
    }

    /// Remove a request once it has been relayed
    pub fn remove(&self, hash: &str) -> Result<(), SendError> {
        let path = self.request_path(hash);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Write to `temp_path`, then rename onto `path`. The temp file never
/// outlives a failed attempt.
fn write_atomically(temp_path: &Path, path: &Path, request: &AnnounceRequest) -> Result<(), SendError> {
    let result = (|| -> Result<(), SendError> {
        let mut writer = BufWriter::new(fs::File::create(temp_path)?);
        serde_json::to_writer_pretty(&mut writer, request)?;
        writer.flush()?;
        drop(writer);

        // Atomic rename
        fs::rename(temp_path, path)?;
        Ok(())
    })();

    if result.is_err() && temp_path.exists() {
        if let Err(e) = fs::remove_file(temp_path) {
            log::warn!("Failed to remove {:?}: {}", temp_path, e);
        }
    }
    result
}

impl TransactionSender for OutboxSender {
    fn send_multisig(&self, envelope: MultisigEnvelope) -> Result<MultisigEnvelope, SendError> {
        let request = AnnounceRequest::from_envelope(&envelope)?;
        let path = self.request_path(&request.hash);

        if path.exists() {
            return Err(SendError::Duplicate(request.hash));
        }

        let temp_path = self.dir.join(format!("{}.tmp", request.hash));
        write_atomically(&temp_path, &path, &request)?;

        log::info!("Queued multisig envelope {} in {:?}", request.hash, self.dir);
        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Account, Amount, TransferTransaction};
    use chrono::Utc;

    fn signed_envelope() -> MultisigEnvelope {
        let now = Utc::now();
        let inner = TransferTransaction::new(now, Account::generate(), "1bob", Amount::from_units(3));
        let mut env = MultisigEnvelope::new(now, Account::generate(), inner.into());
        env.sign().unwrap();
        env
    }

    #[test]
    fn test_send_writes_request_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let outbox = OutboxSender::new(&temp_dir.path().join("outbox")).unwrap();

        let env = signed_envelope();
        let returned = outbox.send_multisig(env.clone()).unwrap();
        assert_eq!(returned, env);
        assert!(outbox.contains(&env.hash()));

        let pending = outbox.pending().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0], AnnounceRequest::from_envelope(&env).unwrap());
    }

    #[test]
    fn test_duplicate_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let outbox = OutboxSender::new(temp_dir.path()).unwrap();

        let env = signed_envelope();
        outbox.send_multisig(env.clone()).unwrap();
        assert!(matches!(
            outbox.send_multisig(env),
            Err(SendError::Duplicate(_))
        ));
    }

    #[test]
    fn test_remove() {
        let temp_dir = tempfile::tempdir().unwrap();
        let outbox = OutboxSender::new(temp_dir.path()).unwrap();

        let env = signed_envelope();
        outbox.send_multisig(env.clone()).unwrap();
        outbox.remove(&env.hash()).unwrap();
        assert!(!outbox.contains(&env.hash()));
        assert!(outbox.pending().unwrap().is_empty());
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let request = AnnounceRequest::from_envelope(&signed_envelope()).unwrap();

        // A non-empty directory cannot be replaced by a file
        let target = temp_dir.path().join("target.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), b"x").unwrap();

        let temp_path = temp_dir.path().join("target.tmp");
        assert!(write_atomically(&temp_path, &target, &request).is_err());
        assert!(!temp_path.exists());
        assert!(target.is_dir());
    }

    #[test]
    fn test_unsigned_envelope_not_written() {
        let temp_dir = tempfile::tempdir().unwrap();
        let outbox = OutboxSender::new(temp_dir.path()).unwrap();

        let now = Utc::now();
        let inner = TransferTransaction::new(now, Account::generate(), "1bob", Amount::from_units(3));
        let env = MultisigEnvelope::new(now, Account::generate(), inner.into());

        assert!(matches!(
            outbox.send_multisig(env),
            Err(SendError::Unsigned(_))
        ));
        assert!(outbox.pending().unwrap().is_empty());
    }
}
