use crate::config::ClientConfig;
use crate::errors::{ClientError, ClientResult};
use crate::rpc::{LedgerRpc, SimulationOutcome};
use crate::types::{Invocation, UnsignedEnvelope};

/// Builds unsigned envelopes for state-changing invocations: resolves the
/// source account's sequence, applies the configured fee ceiling and validity
/// window, and attaches exactly one operation.
pub struct TransactionBuilder<'a> {
    config: &'a ClientConfig,
    rpc: &'a dyn LedgerRpc,
}

impl<'a> TransactionBuilder<'a> {
    pub fn new(config: &'a ClientConfig, rpc: &'a dyn LedgerRpc) -> Self {
        Self { config, rpc }
    }

    pub async fn build(
        &self,
        source: &str,
        invocation: Invocation,
    ) -> ClientResult<UnsignedEnvelope> {
        let account = self.rpc.get_account(source).await.map_err(|err| match err {
            ClientError::AccountNotFound(_) => err,
            other => ClientError::Build(other.to_string()),
        })?;
        Ok(UnsignedEnvelope {
            source: account.account_id,
            sequence: account.sequence + 1,
            fee: self.config.max_fee,
            network_passphrase: self.config.network_passphrase.clone(),
            valid_until: UnsignedEnvelope::deadline_from_now(self.config.tx_timeout_secs),
            invocation,
            resources: None,
        })
    }
}

/// Construct a simulate-only envelope on behalf of an ephemeral, unfunded
/// identity. No account lookup: the sequence is fixed at zero because the
/// envelope is never submitted.
pub fn read_envelope(
    config: &ClientConfig,
    source: &str,
    invocation: Invocation,
) -> UnsignedEnvelope {
    UnsignedEnvelope {
        source: source.to_string(),
        sequence: 0,
        fee: config.read_fee,
        network_passphrase: config.network_passphrase.clone(),
        valid_until: UnsignedEnvelope::deadline_from_now(config.read_timeout_secs),
        invocation,
        resources: None,
    }
}

/// Merge the simulation's resource footprint into the envelope, producing the
/// exact bytes that must be signed. Mandatory for every state-changing call;
/// a write simulation that yielded no footprint cannot be submitted.
pub fn finalize(
    mut envelope: UnsignedEnvelope,
    outcome: &SimulationOutcome,
) -> ClientResult<UnsignedEnvelope> {
    let resources = outcome.resources.ok_or_else(|| {
        ClientError::Build(format!(
            "simulation of {} returned no resource footprint",
            envelope.invocation.method
        ))
    })?;
    envelope.resources = Some(resources);
    Ok(envelope)
}
