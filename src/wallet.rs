use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::{ClientError, ClientResult};
use crate::keystore::Keystore;
use crate::types::{SignedEnvelope, UnsignedEnvelope};

/// Signing capability consumed by the orchestration layer. In the browser
/// this is the wallet extension; the CLI substitutes a local keypair. Signing
/// may be user-interactive and may reject (declined, extension locked).
#[async_trait]
pub trait WalletGateway: Send + Sync {
    async fn is_installed(&self) -> bool;
    async fn is_permission_granted(&self) -> bool;
    async fn request_permission(&self) -> ClientResult<()>;
    async fn address(&self) -> ClientResult<String>;
    async fn network(&self) -> ClientResult<String>;
    async fn sign(&self, envelope: &UnsignedEnvelope) -> ClientResult<SignedEnvelope>;
}

/// File-backed wallet used by the CLI in place of a browser extension.
#[derive(Clone)]
pub struct LocalWallet {
    keystore: Arc<Keystore>,
    network_passphrase: String,
}

impl LocalWallet {
    pub fn new(keystore: Keystore, network_passphrase: impl Into<String>) -> Self {
        Self {
            keystore: Arc::new(keystore),
            network_passphrase: network_passphrase.into(),
        }
    }

    pub fn from_key_file(path: &Path, network_passphrase: &str) -> ClientResult<Self> {
        let keystore = Keystore::open_or_generate(path)?;
        Ok(Self::new(keystore, network_passphrase))
    }
}

#[async_trait]
impl WalletGateway for LocalWallet {
    async fn is_installed(&self) -> bool {
        true
    }

    async fn is_permission_granted(&self) -> bool {
        true
    }

    async fn request_permission(&self) -> ClientResult<()> {
        Ok(())
    }

    async fn address(&self) -> ClientResult<String> {
        Ok(self.keystore.address().to_string())
    }

    async fn network(&self) -> ClientResult<String> {
        Ok(self.network_passphrase.clone())
    }

    async fn sign(&self, envelope: &UnsignedEnvelope) -> ClientResult<SignedEnvelope> {
        if envelope.network_passphrase != self.network_passphrase {
            return Err(ClientError::Wallet(format!(
                "network mismatch: envelope is for {:?}",
                envelope.network_passphrase
            )));
        }
        let signature = self.keystore.sign(&envelope.canonical_bytes());
        Ok(SignedEnvelope::new(
            envelope.clone(),
            signature,
            self.keystore.public_key(),
        ))
    }
}

/// Shorten an address for display: first and last six characters.
pub fn format_address(address: &str) -> String {
    if address.len() <= 12 {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 6..])
}
