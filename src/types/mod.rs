pub mod claim;
pub mod clinic;
pub mod transaction;
pub mod value;

pub use claim::{Claim, ClaimStatus};
pub use clinic::{ClinicMetadata, Reputation};
pub use transaction::{
    Invocation, ResourceFootprint, SignedEnvelope, TransactionResult, UnsignedEnvelope,
};
pub use value::ScVal;
