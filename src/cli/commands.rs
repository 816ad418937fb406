//! CLI commands for the envelope tool
//!
//! Implements the command handlers behind the `envelope` binary. JSON
//! results go to stdout; progress goes through the logger.

use crate::config::ContextConfig;
use crate::core::{Account, Amount, InnerTransaction};
use crate::crypto::KeyPair;
use crate::multisig::{cosign, Cosignature, MultisigEnvelope, MultisigEnvelopeBuilder};
use crate::network::OutboxSender;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Options for `envelope build`
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub private_key: String,
    pub inner: PathBuf,
    pub cosignatures: Vec<PathBuf>,
    pub deadline: Option<String>,
    pub fee: Option<u64>,
    pub signed_by: Option<String>,
    pub send: bool,
    pub outbox: Option<PathBuf>,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

fn parse_deadline(value: &str) -> CliResult<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

/// Generate a new key pair
pub fn cmd_keygen() -> CliResult<()> {
    let key_pair = KeyPair::generate();
    let info = serde_json::json!({
        "private_key": key_pair.private_key_hex(),
        "public_key": key_pair.public_key_hex(),
        "address": key_pair.address(),
    });
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

/// Co-sign an inner transaction
pub fn cmd_cosign(private_key: &str, inner_path: &Path, fee: Option<u64>) -> CliResult<()> {
    let cosigner = Account::from_private_key_hex(private_key)?;
    let inner: InnerTransaction = read_json(inner_path)?;

    let fee = fee.map(Amount::from_micro).unwrap_or(Amount::ZERO);
    let cosignature = cosign(&inner, &cosigner, Utc::now(), fee)?;

    log::info!(
        "Co-signed {} {} as {}",
        inner.kind(),
        cosignature.other_hash,
        cosigner.address()
    );
    println!("{}", serde_json::to_string_pretty(&cosignature)?);
    Ok(())
}

/// Build (and optionally announce) a multisig envelope
pub fn cmd_build(config: &ContextConfig, options: &BuildOptions) -> CliResult<()> {
    let sender = Account::from_private_key_hex(&options.private_key)?;
    let inner: InnerTransaction = read_json(&options.inner)?;

    let mut builder = MultisigEnvelopeBuilder::new(config.to_context())
        .start_with_sender(sender)
        .with_inner_transaction(inner);

    for path in &options.cosignatures {
        let cosignature: Cosignature = read_json(path)?;
        builder = builder.add_cosignature(cosignature);
    }
    if let Some(deadline) = &options.deadline {
        builder = builder.with_deadline(parse_deadline(deadline)?);
    }
    if let Some(fee) = options.fee {
        builder = builder.with_fee(Amount::from_micro(fee));
    }
    if let Some(public_key) = &options.signed_by {
        builder = builder.with_signed_by(Account::from_public_key_hex(public_key)?);
    }

    let envelope = if options.send {
        let dir = options.outbox.as_ref().unwrap_or(&config.outbox_dir);
        let outbox = OutboxSender::new(dir)?;
        builder.build_and_send(&outbox)?
    } else {
        builder.build()?
    };

    log::info!(
        "Built envelope {} (fee {}, {} cosignatures)",
        envelope.hash(),
        envelope.fee,
        envelope.cosignatures.len()
    );
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

/// Verify an envelope's signature and co-signatures
pub fn cmd_verify(envelope_path: &Path) -> CliResult<bool> {
    let envelope: MultisigEnvelope = read_json(envelope_path)?;

    let signature_ok = envelope.verify_signature()?;
    let cosignatures_ok = envelope.verify_cosignatures()?;

    println!("Envelope:      {}", envelope.hash());
    println!("Sender:        {}", envelope.sender.address());
    println!("Inner:         {} {}", envelope.inner.kind(), envelope.inner.hash());
    println!("Multisig:      {}", envelope.inner.signer().address());
    println!(
        "Inner issued:  {} (fee {}, deadline {})",
        envelope.inner.timestamp().to_rfc3339(),
        envelope.inner.fee(),
        envelope.inner.deadline().to_rfc3339()
    );
    println!("Fee:           {}", envelope.fee);
    println!("Deadline:      {}", envelope.deadline.to_rfc3339());
    println!("Signature:     {}", if signature_ok { "valid" } else { "INVALID" });
    println!(
        "Cosignatures:  {} ({})",
        envelope.cosignatures.len(),
        if cosignatures_ok { "valid" } else { "INVALID" }
    );

    Ok(signature_ok && cosignatures_ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TransferTransaction;
    use crate::network::AnnounceRequest;

    fn write_json<T: serde::Serialize>(dir: &Path, name: &str, value: &T) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
        path
    }

    fn inner() -> InnerTransaction {
        TransferTransaction::new(
            Utc::now(),
            Account::generate().to_public(),
            "1bob",
            Amount::from_units(10),
        )
        .into()
    }

    #[test]
    fn test_parse_deadline() {
        let deadline = parse_deadline("2024-06-01T10:00:00+02:00").unwrap();
        assert_eq!(deadline.to_rfc3339(), "2024-06-01T08:00:00+00:00");
        assert!(parse_deadline("tomorrow").is_err());
    }

    #[test]
    fn test_build_and_send_to_outbox() {
        let temp_dir = tempfile::tempdir().unwrap();
        let inner = inner();
        let inner_path = write_json(temp_dir.path(), "inner.json", &inner);

        let cosig = cosign(&inner, &Account::generate(), Utc::now(), Amount::ZERO).unwrap();
        let cosig_path = write_json(temp_dir.path(), "cosig.json", &cosig);

        let outbox_dir = temp_dir.path().join("outbox");
        let options = BuildOptions {
            private_key: KeyPair::generate().private_key_hex(),
            inner: inner_path,
            cosignatures: vec![cosig_path],
            send: true,
            outbox: Some(outbox_dir.clone()),
            ..Default::default()
        };

        cmd_build(&ContextConfig::default(), &options).unwrap();

        let pending: Vec<AnnounceRequest> = OutboxSender::new(&outbox_dir).unwrap().pending().unwrap();
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn test_build_rejects_bad_key() {
        let temp_dir = tempfile::tempdir().unwrap();
        let options = BuildOptions {
            private_key: "zz".to_string(),
            inner: write_json(temp_dir.path(), "inner.json", &inner()),
            ..Default::default()
        };
        assert!(cmd_build(&ContextConfig::default(), &options).is_err());
    }

    #[test]
    fn test_verify_detects_tampering() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut envelope = MultisigEnvelopeBuilder::default()
            .start_with_sender(Account::generate())
            .with_inner_transaction(inner())
            .build()
            .unwrap();

        let good = write_json(temp_dir.path(), "good.json", &envelope);
        assert!(cmd_verify(&good).unwrap());

        envelope.fee = Amount::from_micro(1);
        let bad = write_json(temp_dir.path(), "bad.json", &envelope);
        assert!(!cmd_verify(&bad).unwrap());
    }
}
