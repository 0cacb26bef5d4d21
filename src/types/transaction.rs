use std::time::{SystemTime, UNIX_EPOCH};

use blake2::{Blake2s256, Digest};
use ed25519_dalek::{PublicKey, Signature, Verifier};
use serde::{Deserialize, Serialize};

use crate::classify::FailureKind;
use crate::errors::{ClientError, ClientResult};
use crate::types::value::ScVal;

/// One contract method call with its typed argument list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub contract_id: String,
    pub method: String,
    pub args: Vec<ScVal>,
}

impl Invocation {
    pub fn new(contract_id: impl Into<String>, method: impl Into<String>, args: Vec<ScVal>) -> Self {
        Self {
            contract_id: contract_id.into(),
            method: method.into(),
            args,
        }
    }
}

/// Resource annotations produced by simulation. Writes must carry these when
/// submitted or the network rejects the transaction as malformed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFootprint {
    pub cpu_instructions: u64,
    pub read_bytes: u64,
    pub write_bytes: u64,
}

/// A ledger transaction carrying exactly one contract invocation, plus the
/// sequencing, fee-ceiling, and validity-window metadata needed to submit it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedEnvelope {
    pub source: String,
    pub sequence: u64,
    /// Fee ceiling in stroops.
    pub fee: u64,
    pub network_passphrase: String,
    /// Unix timestamp after which the network refuses the transaction.
    pub valid_until: u64,
    pub invocation: Invocation,
    pub resources: Option<ResourceFootprint>,
}

impl UnsignedEnvelope {
    pub fn canonical_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("serializing envelope")
    }

    pub fn hash(&self) -> [u8; 32] {
        Blake2s256::digest(self.canonical_bytes()).into()
    }

    pub fn deadline_from_now(window_secs: u64) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
            + window_secs
    }
}

/// Envelope plus the signature produced by the wallet gateway. Discarded
/// after submission; never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedEnvelope {
    pub envelope: UnsignedEnvelope,
    pub signature: String,
    pub public_key: String,
}

impl SignedEnvelope {
    pub fn new(envelope: UnsignedEnvelope, signature: Signature, public_key: &PublicKey) -> Self {
        Self {
            signature: hex::encode(signature.to_bytes()),
            public_key: hex::encode(public_key.to_bytes()),
            envelope,
        }
    }

    pub fn hash(&self) -> [u8; 32] {
        self.envelope.hash()
    }

    pub fn verify(&self) -> ClientResult<()> {
        let signature_bytes = hex::decode(&self.signature)
            .map_err(|err| ClientError::Wallet(format!("invalid signature encoding: {err}")))?;
        let signature = Signature::from_bytes(&signature_bytes)
            .map_err(|err| ClientError::Wallet(format!("invalid signature bytes: {err}")))?;
        let public_bytes = hex::decode(&self.public_key)
            .map_err(|err| ClientError::Wallet(format!("invalid public key encoding: {err}")))?;
        let public_key = PublicKey::from_bytes(&public_bytes)
            .map_err(|err| ClientError::Wallet(format!("invalid public key bytes: {err}")))?;
        public_key
            .verify(&self.envelope.canonical_bytes(), &signature)
            .map_err(|err| ClientError::Wallet(format!("signature verification failed: {err}")))
    }
}

/// Outcome of one submission attempt, as surfaced to callers. Failures carry
/// a classified kind and a fixed user-actionable message; the raw diagnostic
/// only reaches logs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResult {
    pub success: bool,
    pub hash: Option<String>,
    pub error: Option<String>,
    pub kind: Option<FailureKind>,
}

impl TransactionResult {
    pub fn success(hash: String) -> Self {
        Self {
            success: true,
            hash: Some(hash),
            error: None,
            kind: None,
        }
    }

    pub fn failure(kind: FailureKind, raw_payload: &str) -> Self {
        Self {
            success: false,
            hash: None,
            error: Some(kind.user_message(raw_payload)),
            kind: Some(kind),
        }
    }
}
