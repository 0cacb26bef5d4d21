use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::client::ContractClient;
use crate::config::ScanPolicy;
use crate::errors::ClientResult;
use crate::types::{Claim, ClaimStatus};

/// Best-effort reconstruction of the full claim set over a registry that
/// only exposes single-record lookups.
///
/// Ids are probed sequentially from 1, one remote call per id, until either
/// `max_consecutive_misses` not-found results in a row or `max_probes`
/// probes total. This bounds latency and cost but silently under-reports
/// when ids are sparse or the registry outgrows the probe cap; the bounded
/// stop is documented behavior, not an error. Callers should expect
/// multi-second runtimes proportional to the scan bound.
pub struct RegistryScanner<'a> {
    client: &'a ContractClient,
    policy: ScanPolicy,
    cancel: Arc<AtomicBool>,
}

impl<'a> RegistryScanner<'a> {
    pub fn new(client: &'a ContractClient) -> Self {
        Self::with_policy(client, client.config().scan)
    }

    pub fn with_policy(client: &'a ContractClient, policy: ScanPolicy) -> Self {
        Self {
            client,
            policy,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that aborts the scan between probe iterations when set. The
    /// in-flight probe is allowed to finish; a cancelled scan returns the
    /// claims collected so far.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Probe the registry for every claim reachable within the scan bounds.
    /// Only a not-found probe counts as a miss; any other remote fault
    /// aborts the scan with the error rather than under-reporting quietly.
    pub async fn list_all(&self) -> ClientResult<Vec<Claim>> {
        let mut claims = Vec::new();
        let mut consecutive_misses = 0u32;
        let mut probes = 0u32;
        let mut claim_id = 1u64;

        while probes < self.policy.max_probes
            && consecutive_misses < self.policy.max_consecutive_misses
        {
            if self.cancel.load(Ordering::Relaxed) {
                debug!(probes, found = claims.len(), "registry scan cancelled");
                break;
            }
            probes += 1;
            match self.client.get_claim(claim_id).await? {
                Some(claim) => {
                    consecutive_misses = 0;
                    claims.push(claim);
                }
                None => consecutive_misses += 1,
            }
            claim_id += 1;
        }

        debug!(probes, found = claims.len(), "registry scan finished");
        Ok(claims)
    }

    /// In-memory filter over one `list_all` pass; no re-scan.
    pub async fn list_by_status(&self, status: ClaimStatus) -> ClientResult<Vec<Claim>> {
        let mut claims = self.list_all().await?;
        claims.retain(|claim| claim.status == status);
        Ok(claims)
    }

    pub async fn list_by_clinic(&self, clinic: &str) -> ClientResult<Vec<Claim>> {
        let mut claims = self.list_all().await?;
        claims.retain(|claim| claim.clinic == clinic);
        Ok(claims)
    }

    pub async fn list_by_patient(&self, patient_id: &str) -> ClientResult<Vec<Claim>> {
        let mut claims = self.list_all().await?;
        claims.retain(|claim| claim.patient_id == patient_id);
        Ok(claims)
    }
}
