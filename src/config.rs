use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ClientError, ClientResult};

/// Stopping bounds for the sequential registry scan.
///
/// The scan halts after `max_consecutive_misses` not-found probes in a row or
/// after `max_probes` probes total, whichever comes first. The defaults are
/// inherited from the original dashboard and carry no deeper rationale, which
/// is why they are configuration rather than constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanPolicy {
    pub max_consecutive_misses: u32,
    pub max_probes: u32,
}

impl Default for ScanPolicy {
    fn default() -> Self {
        Self {
            max_consecutive_misses: 5,
            max_probes: 100,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    pub rpc_url: String,
    pub network_passphrase: String,
    pub contract_id: String,
    pub faucet_url: String,
    /// Fee ceiling for state-changing transactions, in stroops.
    #[serde(default = "default_max_fee")]
    pub max_fee: u64,
    /// Validity window for state-changing transactions, in seconds.
    #[serde(default = "default_tx_timeout_secs")]
    pub tx_timeout_secs: u64,
    /// Fee attached to simulate-only read envelopes, in stroops.
    #[serde(default = "default_read_fee")]
    pub read_fee: u64,
    /// Validity window for simulate-only read envelopes, in seconds.
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
    #[serde(default)]
    pub scan: ScanPolicy,
}

fn default_max_fee() -> u64 {
    100_000
}

fn default_tx_timeout_secs() -> u64 {
    300
}

fn default_read_fee() -> u64 {
    100
}

fn default_read_timeout_secs() -> u64 {
    30
}

impl ClientConfig {
    pub fn load(path: &Path) -> ClientResult<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|err| ClientError::Config(format!("unable to parse config: {err}")))
    }

    pub fn save(&self, path: &Path) -> ClientResult<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;
        let encoded = toml::to_string_pretty(self)
            .map_err(|err| ClientError::Config(format!("unable to encode config: {err}")))?;
        fs::write(path, encoded)?;
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://rpc-futurenet.stellar.org".to_string(),
            network_passphrase: "Test SDF Future Network ; October 2022".to_string(),
            contract_id: "CDCXYE6JPZEQSE4ICAAQQNP2WYGXKPY2LV43YFLOZXQ6YA564QO4OSFM".to_string(),
            faucet_url: "https://friendbot-futurenet.stellar.org".to_string(),
            max_fee: default_max_fee(),
            tx_timeout_secs: default_tx_timeout_secs(),
            read_fee: default_read_fee(),
            read_timeout_secs: default_read_timeout_secs(),
            scan: ScanPolicy::default(),
        }
    }
}
