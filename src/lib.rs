//! Client for the CareClaims health-insurance-claims contract.
//!
//! The crate turns UI intents ("submit a claim", "approve claim 7") into
//! correctly fee-bid, simulated, finalized, and signed ledger transactions,
//! and reconstructs filtered claim views over a registry that only exposes
//! single-record lookups. The remote ledger runtime and the signing wallet
//! are consumed through the [`rpc::LedgerRpc`] and [`wallet::WalletGateway`]
//! seams, so the contract's internal rules stay a black box and tests can
//! substitute in-memory fakes.
//!
//! Applications typically load a [`config::ClientConfig`], construct a
//! [`client::ContractClient`] over an [`rpc::HttpLedgerRpc`], and use
//! [`scanner::RegistryScanner`] for the bulk claim views.

pub mod classify;
pub mod client;
pub mod config;
pub mod errors;
pub mod faucet;
pub mod keystore;
pub mod rpc;
pub mod scanner;
pub mod tx;
pub mod types;
pub mod units;
pub mod wallet;

pub use classify::{classify, FailureKind, FAUCET_URL};
pub use client::ContractClient;
pub use config::{ClientConfig, ScanPolicy};
pub use errors::{ClientError, ClientResult};
pub use keystore::Keystore;
pub use rpc::{AccountEntry, HttpLedgerRpc, LedgerRpc, SendOutcome, SimulationOutcome};
pub use scanner::RegistryScanner;
pub use types::{
    Claim, ClaimStatus, ClinicMetadata, Reputation, TransactionResult, UnsignedEnvelope,
};
pub use wallet::{LocalWallet, WalletGateway};
