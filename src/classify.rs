use serde::{Deserialize, Serialize};

/// Canonical faucet for funding test accounts quoted in user-facing messages.
pub const FAUCET_URL: &str = "https://friendbot.stellar.org";

/// User-facing causes of a failed write. The remote runtime exposes no
/// structured error codes, so classification is a prioritized substring scan
/// over the raw payload. The matching rules live here and nowhere else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    InsufficientFunds,
    MalformedTransaction,
    StorageUninitialized,
    AuthorizationFailure,
    AccountFundingRequired,
    Unclassified,
}

impl FailureKind {
    /// Fixed, actionable message template for this failure. `raw_payload` is
    /// only quoted by the unclassified fallback.
    pub fn user_message(&self, raw_payload: &str) -> String {
        match self {
            FailureKind::InsufficientFunds => format!(
                "Insufficient balance to cover the transaction. \
                 Fund the account with test lumens at {FAUCET_URL} and retry."
            ),
            FailureKind::MalformedTransaction => {
                "The transaction was malformed or built for the wrong network. \
                 Check that the wallet's selected network matches the target network."
                    .to_string()
            }
            FailureKind::StorageUninitialized => {
                "The contract storage is not initialized. \
                 Run the init operation once before any other call."
                    .to_string()
            }
            FailureKind::AuthorizationFailure => {
                "Authorization failed. The signing address must match the address the \
                 operation expects, and the wallet must be on the target network."
                    .to_string()
            }
            FailureKind::AccountFundingRequired => format!(
                "The source account does not exist on the target network. \
                 Fund it with test lumens at {FAUCET_URL} and retry."
            ),
            FailureKind::Unclassified => format!("Transaction failed: {raw_payload}"),
        }
    }
}

/// Classify a raw submission error payload. First match wins; the priority
/// order is part of the contract with callers and covered by tests.
pub fn classify(payload: &str) -> FailureKind {
    let haystack = payload.to_lowercase();
    let matches_any = |markers: &[&str]| markers.iter().any(|marker| haystack.contains(marker));

    if matches_any(&["insufficient", "low balance", "underfunded"]) {
        FailureKind::InsufficientFunds
    } else if matches_any(&["malformed", "txmalformed", "passphrase", "network mismatch"]) {
        FailureKind::MalformedTransaction
    } else if matches_any(&["storage", "missingvalue", "uninitialized", "not initialized"]) {
        FailureKind::StorageUninitialized
    } else if matches_any(&["require_auth", "unauthorized", "auth"]) {
        FailureKind::AuthorizationFailure
    } else if matches_any(&["account not found", "not found", "404", "unfunded"]) {
        FailureKind::AccountFundingRequired
    } else {
        FailureKind::Unclassified
    }
}

/// Read-path predicate: does a simulation diagnostic mean the requested
/// record simply does not exist? Such diagnostics are a valid empty result,
/// not an error.
pub fn is_not_found(payload: &str) -> bool {
    let haystack = payload.to_lowercase();
    ["missingvalue", "not found", "does not exist", "no such"]
        .iter()
        .any(|marker| haystack.contains(marker))
}
