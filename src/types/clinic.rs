use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ClientResult;
use crate::types::value::{expect_object, field_bool, field_str, field_u64};

/// Registration record for one clinic address. The verification flag starts
/// false and is flipped once by an admin `verify_clinic` call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicMetadata {
    pub name: String,
    pub license_number: String,
    pub registration_date: u64,
    pub is_verified: bool,
}

impl ClinicMetadata {
    pub fn from_wire(value: &Value) -> ClientResult<Self> {
        let record = expect_object(value, "clinic metadata")?;
        Ok(Self {
            name: field_str(record, "name")?,
            license_number: field_str(record, "license_number")?,
            registration_date: field_u64(record, "registration_date")?,
            is_verified: field_bool(record, "is_verified")?,
        })
    }
}

/// Per-clinic outcome counters maintained by the contract as claims resolve.
/// Read-only from the client's perspective.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reputation {
    pub success_count: u64,
    pub failure_count: u64,
}

impl Reputation {
    pub fn from_wire(value: &Value) -> ClientResult<Self> {
        let record = expect_object(value, "reputation")?;
        Ok(Self {
            success_count: field_u64(record, "success_count")?,
            failure_count: field_u64(record, "failure_count")?,
        })
    }
}
