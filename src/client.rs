use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::classify::{classify, is_not_found};
use crate::config::ClientConfig;
use crate::errors::{ClientError, ClientResult};
use crate::keystore::Keystore;
use crate::rpc::LedgerRpc;
use crate::tx::{finalize, read_envelope, TransactionBuilder};
use crate::types::{
    Claim, ClinicMetadata, Invocation, Reputation, ScVal, TransactionResult,
};
use crate::units;
use crate::wallet::WalletGateway;

const INIT: &str = "init";
const REGISTER_CLINIC: &str = "register_clinic";
const SUBMIT_CLAIM: &str = "submit_claim";
const APPROVE_CLAIM: &str = "approve_claim";
const REJECT_CLAIM: &str = "reject_claim";
const RELEASE_CLAIM: &str = "release_claim";
const VERIFY_CLINIC: &str = "verify_clinic";
const GET_CLAIM: &str = "get_claim";
const GET_CLINIC_METADATA: &str = "get_clinic_metadata";
const GET_CLINIC_REPUTATION: &str = "get_clinic_reputation";

/// Client for the deployed claims contract.
///
/// Writes run the full pipeline (build, simulate, finalize, sign, submit)
/// and come back as classified [`TransactionResult`]s; any fault before
/// submission aborts without ever requesting a signature. Reads are
/// simulate-only calls issued by a fresh unfunded identity and never touch
/// the wallet. A successful write proves only that the network accepted the
/// transaction: callers must re-query the affected record instead of
/// assuming the requested state transition happened.
pub struct ContractClient {
    config: ClientConfig,
    rpc: Arc<dyn LedgerRpc>,
}

impl ContractClient {
    pub fn new(config: ClientConfig, rpc: Arc<dyn LedgerRpc>) -> Self {
        Self { config, rpc }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn network_passphrase(&self) -> &str {
        &self.config.network_passphrase
    }

    // Write operations.

    /// One-time contract initialization by the admin account.
    pub async fn initialize(&self, wallet: &dyn WalletGateway, admin: &str) -> TransactionResult {
        self.invoke_signed(wallet, admin, INIT, vec![ScVal::Address(admin.to_string())])
            .await
    }

    pub async fn register_clinic(
        &self,
        wallet: &dyn WalletGateway,
        clinic: &str,
        name: &str,
        license_number: &str,
    ) -> TransactionResult {
        self.invoke_signed(
            wallet,
            clinic,
            REGISTER_CLINIC,
            vec![
                ScVal::Address(clinic.to_string()),
                ScVal::Str(name.to_string()),
                ScVal::Str(license_number.to_string()),
            ],
        )
        .await
    }

    /// Submit a claim. `amount` is in display units (e.g. `"42.50"`) and is
    /// converted to stroops exactly before it reaches the wire.
    pub async fn submit_claim(
        &self,
        wallet: &dyn WalletGateway,
        clinic: &str,
        patient_id: &str,
        service_code: &str,
        amount: &str,
    ) -> TransactionResult {
        let stroops = match units::to_stroops(amount) {
            Ok(stroops) => stroops,
            Err(err) => return self.classified_failure(SUBMIT_CLAIM, &err),
        };
        self.invoke_signed(
            wallet,
            clinic,
            SUBMIT_CLAIM,
            vec![
                ScVal::Address(clinic.to_string()),
                ScVal::Str(patient_id.to_string()),
                ScVal::Str(service_code.to_string()),
                ScVal::I128(stroops),
            ],
        )
        .await
    }

    pub async fn approve_claim(
        &self,
        wallet: &dyn WalletGateway,
        admin: &str,
        claim_id: u64,
    ) -> TransactionResult {
        self.claim_transition(wallet, admin, APPROVE_CLAIM, claim_id)
            .await
    }

    pub async fn reject_claim(
        &self,
        wallet: &dyn WalletGateway,
        admin: &str,
        claim_id: u64,
    ) -> TransactionResult {
        self.claim_transition(wallet, admin, REJECT_CLAIM, claim_id)
            .await
    }

    pub async fn release_claim(
        &self,
        wallet: &dyn WalletGateway,
        admin: &str,
        claim_id: u64,
    ) -> TransactionResult {
        self.claim_transition(wallet, admin, RELEASE_CLAIM, claim_id)
            .await
    }

    pub async fn verify_clinic(
        &self,
        wallet: &dyn WalletGateway,
        admin: &str,
        clinic: &str,
    ) -> TransactionResult {
        self.invoke_signed(
            wallet,
            admin,
            VERIFY_CLINIC,
            vec![
                ScVal::Address(admin.to_string()),
                ScVal::Address(clinic.to_string()),
            ],
        )
        .await
    }

    async fn claim_transition(
        &self,
        wallet: &dyn WalletGateway,
        admin: &str,
        method: &str,
        claim_id: u64,
    ) -> TransactionResult {
        self.invoke_signed(
            wallet,
            admin,
            method,
            vec![ScVal::Address(admin.to_string()), ScVal::U64(claim_id)],
        )
        .await
    }

    async fn invoke_signed(
        &self,
        wallet: &dyn WalletGateway,
        source: &str,
        method: &str,
        args: Vec<ScVal>,
    ) -> TransactionResult {
        match self.try_invoke_signed(wallet, source, method, args).await {
            Ok(result) => result,
            Err(err) => self.classified_failure(method, &err),
        }
    }

    async fn try_invoke_signed(
        &self,
        wallet: &dyn WalletGateway,
        source: &str,
        method: &str,
        args: Vec<ScVal>,
    ) -> ClientResult<TransactionResult> {
        let invocation = Invocation::new(self.config.contract_id.clone(), method, args);
        let builder = TransactionBuilder::new(&self.config, self.rpc.as_ref());
        let envelope = builder.build(source, invocation).await?;
        let outcome = self.rpc.simulate_transaction(&envelope).await?;
        let envelope = finalize(envelope, &outcome)?;
        // Everything past this point has cost a signature round-trip.
        let signed = wallet.sign(&envelope).await?;
        let sent = self.rpc.send_transaction(&signed).await?;
        if let Some(payload) = sent.error {
            let kind = classify(&payload);
            debug!(%method, payload = %payload, "submission rejected");
            return Ok(TransactionResult::failure(kind, &payload));
        }
        let hash = sent.hash.unwrap_or_else(|| hex::encode(signed.hash()));
        info!(%method, %hash, "transaction submitted");
        Ok(TransactionResult::success(hash))
    }

    fn classified_failure(&self, method: &str, err: &ClientError) -> TransactionResult {
        let raw = err.to_string();
        let kind = classify(&raw);
        debug!(%method, error = %raw, "operation failed before submission");
        TransactionResult::failure(kind, &raw)
    }

    // Read-only accessors: simulated, never submitted, no funded account or
    // user signature required.

    pub async fn get_claim(&self, claim_id: u64) -> ClientResult<Option<Claim>> {
        match self
            .simulate_read(GET_CLAIM, vec![ScVal::U64(claim_id)])
            .await?
        {
            Some(value) => Claim::from_wire(&value).map(Some),
            None => Ok(None),
        }
    }

    pub async fn get_clinic_metadata(&self, clinic: &str) -> ClientResult<Option<ClinicMetadata>> {
        match self
            .simulate_read(GET_CLINIC_METADATA, vec![ScVal::Address(clinic.to_string())])
            .await?
        {
            Some(value) => ClinicMetadata::from_wire(&value).map(Some),
            None => Ok(None),
        }
    }

    pub async fn get_clinic_reputation(&self, clinic: &str) -> ClientResult<Option<Reputation>> {
        match self
            .simulate_read(
                GET_CLINIC_REPUTATION,
                vec![ScVal::Address(clinic.to_string())],
            )
            .await?
        {
            Some(value) => Reputation::from_wire(&value).map(Some),
            None => Ok(None),
        }
    }

    async fn simulate_read(&self, method: &str, args: Vec<ScVal>) -> ClientResult<Option<Value>> {
        // Fresh unfunded identity per call; never reused or persisted.
        let reader = Keystore::generate();
        let invocation = Invocation::new(self.config.contract_id.clone(), method, args);
        let envelope = read_envelope(&self.config, reader.address(), invocation);
        match self.rpc.simulate_transaction(&envelope).await {
            Ok(outcome) => match outcome.return_value {
                Some(value) => Ok(Some(value)),
                None => Err(ClientError::Query(format!(
                    "no result returned from {method}"
                ))),
            },
            Err(ClientError::Simulation(text)) if is_not_found(&text) => {
                debug!(%method, "record not found");
                Ok(None)
            }
            Err(ClientError::Simulation(text)) => Err(ClientError::Query(text)),
            Err(other) => Err(other),
        }
    }
}
