use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{ClientError, ClientResult};
use crate::types::value::{expect_object, field_i128, field_str, field_u64};
use crate::units;

/// Lifecycle states of a claim. Transitions run along a single path and are
/// enforced by the remote contract; this client only requests them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    Pending,
    Approved,
    Rejected,
    PaymentReleased,
}

impl ClaimStatus {
    pub fn allowed_next(self) -> &'static [ClaimStatus] {
        match self {
            ClaimStatus::Pending => &[ClaimStatus::Approved, ClaimStatus::Rejected],
            ClaimStatus::Approved => &[ClaimStatus::PaymentReleased],
            ClaimStatus::Rejected | ClaimStatus::PaymentReleased => &[],
        }
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }

    pub fn can_transition_to(self, next: ClaimStatus) -> bool {
        self.allowed_next().contains(&next)
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ClaimStatus::Pending => "Pending",
            ClaimStatus::Approved => "Approved",
            ClaimStatus::Rejected => "Rejected",
            ClaimStatus::PaymentReleased => "Payment Released",
        };
        write!(f, "{label}")
    }
}

impl FromStr for ClaimStatus {
    type Err = ClientError;

    fn from_str(raw: &str) -> ClientResult<Self> {
        match raw {
            "Pending" | "pending" => Ok(ClaimStatus::Pending),
            "Approved" | "approved" => Ok(ClaimStatus::Approved),
            "Rejected" | "rejected" => Ok(ClaimStatus::Rejected),
            "Payment Released" | "PaymentReleased" | "payment_released" => {
                Ok(ClaimStatus::PaymentReleased)
            }
            other => Err(ClientError::Query(format!("unknown claim status {other:?}"))),
        }
    }
}

/// One insurance claim as held by the remote registry. All fields except
/// `status` are immutable once the claim is submitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub claim_id: u64,
    pub patient_id: String,
    pub service_code: String,
    /// Amount in stroops, the registry's smallest integer unit.
    pub amount: i128,
    /// Submission time as a Unix timestamp.
    pub date: u64,
    pub clinic: String,
    pub status: ClaimStatus,
}

impl Claim {
    /// Decode a loosely-typed record returned by a read simulation.
    pub fn from_wire(value: &Value) -> ClientResult<Self> {
        let record = expect_object(value, "claim")?;
        Ok(Self {
            claim_id: field_u64(record, "claim_id")?,
            patient_id: field_str(record, "patient_id")?,
            service_code: field_str(record, "service_code")?,
            amount: field_i128(record, "amount")?,
            date: field_u64(record, "date")?,
            clinic: field_str(record, "clinic")?,
            status: field_str(record, "status")?.parse()?,
        })
    }

    /// Amount in display units (stroops / 10^7), as an exact decimal string.
    pub fn display_amount(&self) -> String {
        units::from_stroops(self.amount)
    }
}
