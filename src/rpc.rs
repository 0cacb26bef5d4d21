use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::errors::{ClientError, ClientResult};
use crate::types::{ResourceFootprint, SignedEnvelope, UnsignedEnvelope};

/// Sequence state of a fee-paying account on the target network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountEntry {
    pub account_id: String,
    pub sequence: u64,
}

/// Result of a dry-run execution. Reads consume `return_value`; writes need
/// `resources` merged back into the envelope before signing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub return_value: Option<Value>,
    pub resources: Option<ResourceFootprint>,
    pub latest_ledger: u64,
}

/// Network response to a submitted envelope. A present `error` payload means
/// the transaction was rejected; the text feeds the result classifier.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendOutcome {
    pub hash: Option<String>,
    pub error: Option<String>,
}

/// Boundary to the remote ledger runtime. Everything the client knows about
/// the network flows through these three calls, which keeps the runtime a
/// black box and lets tests substitute an in-memory ledger.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Resolve the current sequence state of an account. A missing account is
    /// the distinguished `AccountNotFound` error so callers can prompt for
    /// funding instead of reporting a generic fault.
    async fn get_account(&self, account_id: &str) -> ClientResult<AccountEntry>;

    /// Dry-run an unsigned envelope. Remote rejections surface as
    /// `Simulation` errors carrying the diagnostic text verbatim.
    async fn simulate_transaction(
        &self,
        envelope: &UnsignedEnvelope,
    ) -> ClientResult<SimulationOutcome>;

    /// Submit a signed envelope to the network.
    async fn send_transaction(&self, envelope: &SignedEnvelope) -> ClientResult<SendOutcome>;
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: String,
}

/// HTTP implementation of [`LedgerRpc`] against a configured RPC endpoint.
pub struct HttpLedgerRpc {
    base_url: String,
    http: reqwest::Client,
}

impl HttpLedgerRpc {
    pub fn new(rpc_url: &str) -> Self {
        Self {
            base_url: rpc_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    async fn error_text(response: reqwest::Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => envelope.error,
            Err(_) if body.is_empty() => format!("request failed with status {status}"),
            Err(_) => body,
        }
    }
}

#[async_trait]
impl LedgerRpc for HttpLedgerRpc {
    async fn get_account(&self, account_id: &str) -> ClientResult<AccountEntry> {
        let url = format!("{}/accounts/{account_id}", self.base_url);
        let response = self.http.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::AccountNotFound(account_id.to_string()));
        }
        if !response.status().is_success() {
            return Err(ClientError::Transport(Self::error_text(response).await));
        }
        Ok(response.json().await?)
    }

    async fn simulate_transaction(
        &self,
        envelope: &UnsignedEnvelope,
    ) -> ClientResult<SimulationOutcome> {
        let url = format!("{}/transactions/simulate", self.base_url);
        let response = self.http.post(&url).json(envelope).send().await?;
        if !response.status().is_success() {
            let text = Self::error_text(response).await;
            debug!(method = %envelope.invocation.method, error = %text, "simulation rejected");
            return Err(ClientError::Simulation(text));
        }
        Ok(response.json().await?)
    }

    async fn send_transaction(&self, envelope: &SignedEnvelope) -> ClientResult<SendOutcome> {
        let url = format!("{}/transactions", self.base_url);
        let response = self.http.post(&url).json(envelope).send().await?;
        if !response.status().is_success() {
            // Rejections still produce an outcome so the classifier sees the
            // payload; only transport-level failures become errors.
            let text = Self::error_text(response).await;
            return Ok(SendOutcome {
                hash: None,
                error: Some(text),
            });
        }
        Ok(response.json().await?)
    }
}
