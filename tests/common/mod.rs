#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use careclaims::errors::{ClientError, ClientResult};
use careclaims::keystore::Keystore;
use careclaims::rpc::{AccountEntry, LedgerRpc, SendOutcome, SimulationOutcome};
use careclaims::types::{
    ClaimStatus, ResourceFootprint, ScVal, SignedEnvelope, UnsignedEnvelope,
};
use careclaims::wallet::{LocalWallet, WalletGateway};

pub const PASSPHRASE: &str = "Test SDF Future Network ; October 2022";

#[derive(Clone, Debug)]
pub struct StoredClaim {
    pub patient_id: String,
    pub service_code: String,
    pub amount: i128,
    pub date: u64,
    pub clinic: String,
    pub status: ClaimStatus,
}

#[derive(Clone, Debug)]
struct ClinicRecord {
    name: String,
    license_number: String,
    registration_date: u64,
    is_verified: bool,
    success_count: u64,
    failure_count: u64,
}

#[derive(Default)]
struct LedgerState {
    accounts: HashMap<String, AccountState>,
    claims: BTreeMap<u64, StoredClaim>,
    clinics: HashMap<String, ClinicRecord>,
    admin: Option<String>,
    next_claim_id: u64,
    claim_probes: u64,
    send_calls: u64,
}

#[derive(Clone, Copy, Debug)]
struct AccountState {
    sequence: u64,
    balance: i128,
}

/// In-memory stand-in for the remote ledger runtime and the deployed claims
/// contract, implementing the same single-record surface the real contract
/// exposes. Simulation validates without mutating; submission applies state.
pub struct MockLedger {
    state: Mutex<LedgerState>,
}

impl MockLedger {
    pub fn new() -> Self {
        let mut state = LedgerState::default();
        state.next_claim_id = 1;
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn fund(&self, address: &str, balance: i128) {
        self.state
            .lock()
            .accounts
            .insert(address.to_string(), AccountState { sequence: 7, balance });
    }

    pub fn set_admin(&self, address: &str) {
        self.state.lock().admin = Some(address.to_string());
    }

    /// Seed a claim directly at a chosen id, bypassing the contract flow.
    pub fn seed_claim(&self, claim_id: u64, claim: StoredClaim) {
        let mut state = self.state.lock();
        state.next_claim_id = state.next_claim_id.max(claim_id + 1);
        state.claims.insert(claim_id, claim);
    }

    pub fn claim_status(&self, claim_id: u64) -> Option<ClaimStatus> {
        self.state.lock().claims.get(&claim_id).map(|c| c.status)
    }

    pub fn claim_probes(&self) -> u64 {
        self.state.lock().claim_probes
    }

    pub fn send_calls(&self) -> u64 {
        self.state.lock().send_calls
    }

    pub fn last_claim_id(&self) -> u64 {
        self.state.lock().next_claim_id - 1
    }

    fn run_contract(
        state: &mut LedgerState,
        envelope: &UnsignedEnvelope,
        commit: bool,
    ) -> ClientResult<Option<Value>> {
        let args = &envelope.invocation.args;
        match envelope.invocation.method.as_str() {
            "init" => {
                let admin = arg_address(args, 0)?;
                if state.admin.is_some() {
                    return Err(sim("contract storage already initialized"));
                }
                if commit {
                    state.admin = Some(admin);
                }
                Ok(None)
            }
            "register_clinic" => {
                let clinic = arg_address(args, 0)?;
                if state.clinics.contains_key(&clinic) {
                    return Err(sim("clinic already registered"));
                }
                if commit {
                    state.clinics.insert(
                        clinic,
                        ClinicRecord {
                            name: arg_str(args, 1)?,
                            license_number: arg_str(args, 2)?,
                            registration_date: 1_700_000_000,
                            is_verified: false,
                            success_count: 0,
                            failure_count: 0,
                        },
                    );
                }
                Ok(None)
            }
            "verify_clinic" => {
                Self::require_admin(state, args)?;
                let clinic = arg_address(args, 1)?;
                let record = state
                    .clinics
                    .get_mut(&clinic)
                    .ok_or_else(|| sim("clinic metadata not found"))?;
                if commit {
                    record.is_verified = true;
                }
                Ok(None)
            }
            "submit_claim" => {
                let clinic = arg_address(args, 0)?;
                if !state.clinics.contains_key(&clinic) {
                    return Err(sim("HostError: clinic must register before submitting"));
                }
                if commit {
                    let claim_id = state.next_claim_id;
                    state.next_claim_id += 1;
                    state.claims.insert(
                        claim_id,
                        StoredClaim {
                            patient_id: arg_str(args, 1)?,
                            service_code: arg_str(args, 2)?,
                            amount: arg_i128(args, 3)?,
                            date: 1_700_000_000 + claim_id,
                            clinic,
                            status: ClaimStatus::Pending,
                        },
                    );
                }
                Ok(None)
            }
            "approve_claim" => {
                Self::transition(state, args, commit, ClaimStatus::Approved)
            }
            "reject_claim" => Self::transition(state, args, commit, ClaimStatus::Rejected),
            "release_claim" => {
                Self::transition(state, args, commit, ClaimStatus::PaymentReleased)
            }
            "get_claim" => {
                state.claim_probes += 1;
                let claim_id = arg_u64(args, 0)?;
                let claim = state
                    .claims
                    .get(&claim_id)
                    .ok_or_else(|| sim(&format!("claim {claim_id} not found")))?;
                Ok(Some(claim_to_wire(claim_id, claim)))
            }
            "get_clinic_metadata" => {
                let clinic = arg_address(args, 0)?;
                let record = state
                    .clinics
                    .get(&clinic)
                    .ok_or_else(|| sim("clinic metadata not found"))?;
                Ok(Some(json!({
                    "name": record.name,
                    "license_number": record.license_number,
                    "registration_date": record.registration_date,
                    "is_verified": record.is_verified,
                })))
            }
            "get_clinic_reputation" => {
                let clinic = arg_address(args, 0)?;
                let record = state
                    .clinics
                    .get(&clinic)
                    .ok_or_else(|| sim("clinic reputation not found"))?;
                Ok(Some(json!({
                    "success_count": record.success_count,
                    "failure_count": record.failure_count,
                })))
            }
            other => Err(sim(&format!("unknown contract method {other}"))),
        }
    }

    fn require_admin(state: &LedgerState, args: &[ScVal]) -> ClientResult<()> {
        let caller = arg_address(args, 0)?;
        match &state.admin {
            Some(admin) if *admin == caller => Ok(()),
            _ => Err(sim("HostError: require_auth failed for address")),
        }
    }

    fn transition(
        state: &mut LedgerState,
        args: &[ScVal],
        commit: bool,
        next: ClaimStatus,
    ) -> ClientResult<Option<Value>> {
        Self::require_admin(state, args)?;
        let claim_id = arg_u64(args, 1)?;
        let claim = state
            .claims
            .get_mut(&claim_id)
            .ok_or_else(|| sim(&format!("claim {claim_id} not found")))?;
        if !claim.status.can_transition_to(next) {
            return Err(sim(&format!(
                "HostError: InvalidAction, claim {claim_id} is {} and cannot become {next}",
                claim.status
            )));
        }
        if commit {
            claim.status = next;
            let resolved_clinic = claim.clinic.clone();
            if let Some(record) = state.clinics.get_mut(&resolved_clinic) {
                match next {
                    ClaimStatus::PaymentReleased => record.success_count += 1,
                    ClaimStatus::Rejected => record.failure_count += 1,
                    _ => {}
                }
            }
        }
        Ok(None)
    }

    fn is_write(method: &str) -> bool {
        !method.starts_with("get_")
    }
}

#[async_trait]
impl LedgerRpc for MockLedger {
    async fn get_account(&self, account_id: &str) -> ClientResult<AccountEntry> {
        let state = self.state.lock();
        match state.accounts.get(account_id) {
            Some(account) => Ok(AccountEntry {
                account_id: account_id.to_string(),
                sequence: account.sequence,
            }),
            None => Err(ClientError::AccountNotFound(account_id.to_string())),
        }
    }

    async fn simulate_transaction(
        &self,
        envelope: &UnsignedEnvelope,
    ) -> ClientResult<SimulationOutcome> {
        let mut state = self.state.lock();
        let return_value = Self::run_contract(&mut state, envelope, false)?;
        let resources = Self::is_write(&envelope.invocation.method).then_some(ResourceFootprint {
            cpu_instructions: 250_000,
            read_bytes: 1_024,
            write_bytes: 256,
        });
        Ok(SimulationOutcome {
            return_value: return_value.or_else(|| Some(Value::Bool(true))),
            resources,
            latest_ledger: 42,
        })
    }

    async fn send_transaction(&self, signed: &SignedEnvelope) -> ClientResult<SendOutcome> {
        let mut state = self.state.lock();
        state.send_calls += 1;
        if signed.verify().is_err() {
            return Ok(rejected("txBadAuth: invalid signature"));
        }
        if signed.envelope.resources.is_none() {
            return Ok(rejected("txMalformed: missing resource footprint"));
        }
        let source = signed.envelope.source.clone();
        let Some(account) = state.accounts.get(&source).copied() else {
            return Ok(rejected("source account not found"));
        };
        if account.balance < i128::from(signed.envelope.fee) {
            return Ok(rejected(
                "transaction failed: insufficient balance to cover fee",
            ));
        }
        if let Err(err) = Self::run_contract(&mut state, &signed.envelope, true) {
            return Ok(rejected(&err.to_string()));
        }
        if let Some(account) = state.accounts.get_mut(&source) {
            account.sequence = signed.envelope.sequence;
        }
        Ok(SendOutcome {
            hash: Some(hex::encode(signed.hash())),
            error: None,
        })
    }
}

fn rejected(payload: &str) -> SendOutcome {
    SendOutcome {
        hash: None,
        error: Some(payload.to_string()),
    }
}

fn sim(text: &str) -> ClientError {
    ClientError::Simulation(text.to_string())
}

fn claim_to_wire(claim_id: u64, claim: &StoredClaim) -> Value {
    json!({
        "claim_id": claim_id,
        "patient_id": claim.patient_id,
        "service_code": claim.service_code,
        "amount": claim.amount.to_string(),
        "date": claim.date,
        "clinic": claim.clinic,
        "status": claim.status.to_string(),
    })
}

fn arg_u64(args: &[ScVal], index: usize) -> ClientResult<u64> {
    match args.get(index) {
        Some(ScVal::U64(value)) => Ok(*value),
        other => Err(sim(&format!("argument {index} has wrong type: {other:?}"))),
    }
}

fn arg_i128(args: &[ScVal], index: usize) -> ClientResult<i128> {
    match args.get(index) {
        Some(ScVal::I128(value)) => Ok(*value),
        other => Err(sim(&format!("argument {index} has wrong type: {other:?}"))),
    }
}

fn arg_str(args: &[ScVal], index: usize) -> ClientResult<String> {
    match args.get(index) {
        Some(ScVal::Str(value)) => Ok(value.clone()),
        other => Err(sim(&format!("argument {index} has wrong type: {other:?}"))),
    }
}

fn arg_address(args: &[ScVal], index: usize) -> ClientResult<String> {
    match args.get(index) {
        Some(ScVal::Address(value)) => Ok(value.clone()),
        other => Err(sim(&format!("argument {index} has wrong type: {other:?}"))),
    }
}

/// Wallet wrapper that counts signature requests, so tests can assert that
/// pre-submission failures never reach the signing step.
pub struct CountingWallet {
    inner: LocalWallet,
    signatures: AtomicU64,
}

impl CountingWallet {
    pub fn new() -> Self {
        Self {
            inner: LocalWallet::new(Keystore::generate(), PASSPHRASE),
            signatures: AtomicU64::new(0),
        }
    }

    pub fn signature_requests(&self) -> u64 {
        self.signatures.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl WalletGateway for CountingWallet {
    async fn is_installed(&self) -> bool {
        self.inner.is_installed().await
    }

    async fn is_permission_granted(&self) -> bool {
        self.inner.is_permission_granted().await
    }

    async fn request_permission(&self) -> ClientResult<()> {
        self.inner.request_permission().await
    }

    async fn address(&self) -> ClientResult<String> {
        self.inner.address().await
    }

    async fn network(&self) -> ClientResult<String> {
        self.inner.network().await
    }

    async fn sign(
        &self,
        envelope: &UnsignedEnvelope,
    ) -> ClientResult<SignedEnvelope> {
        self.signatures.fetch_add(1, Ordering::Relaxed);
        self.inner.sign(envelope).await
    }
}
