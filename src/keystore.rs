use std::fs;
use std::path::Path;

use blake2::{Blake2s256, Digest};
use ed25519_dalek::{Keypair, PublicKey, SecretKey, Signature, Signer};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::errors::{ClientError, ClientResult};

/// The signing identity behind a wallet: an ed25519 keypair together with
/// the ledger address derived from its public half.
///
/// `LocalWallet` owns the long-lived keystore opened from disk; read-only
/// simulation generates a throwaway one per call and never persists it.
pub struct Keystore {
    keypair: Keypair,
    address: String,
}

/// On-disk form. Only the secret is stored; the public key and the address
/// are re-derived on open, so the file cannot go internally inconsistent.
#[derive(Serialize, Deserialize)]
struct KeyFile {
    secret_key: String,
}

impl Keystore {
    pub fn generate() -> Self {
        Self::from_keypair(Keypair::generate(&mut OsRng))
    }

    fn from_keypair(keypair: Keypair) -> Self {
        let address = derive_address(&keypair.public);
        Self { keypair, address }
    }

    pub fn open_or_generate(path: &Path) -> ClientResult<Self> {
        if path.exists() {
            Self::open(path)
        } else {
            let store = Self::generate();
            store.save(path)?;
            Ok(store)
        }
    }

    pub fn open(path: &Path) -> ClientResult<Self> {
        let raw = fs::read_to_string(path)?;
        let file: KeyFile = toml::from_str(&raw)
            .map_err(|err| ClientError::Config(format!("failed to decode key file: {err}")))?;
        let secret_bytes = hex::decode(file.secret_key)
            .map_err(|err| ClientError::Config(format!("invalid secret key encoding: {err}")))?;
        let secret = SecretKey::from_bytes(&secret_bytes)
            .map_err(|err| ClientError::Config(format!("invalid secret key bytes: {err}")))?;
        let public = PublicKey::from(&secret);
        Ok(Self::from_keypair(Keypair { secret, public }))
    }

    pub fn save(&self, path: &Path) -> ClientResult<()> {
        let file = KeyFile {
            secret_key: hex::encode(self.keypair.secret.to_bytes()),
        };
        let encoded = toml::to_string_pretty(&file)
            .map_err(|err| ClientError::Config(format!("failed to encode key file: {err}")))?;
        fs::create_dir_all(path.parent().unwrap_or_else(|| Path::new(".")))?;
        fs::write(path, encoded)?;
        Ok(())
    }

    /// Ledger address for this identity: hex Blake2s digest of the public key.
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.keypair.public
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        self.keypair.sign(message)
    }
}

fn derive_address(public_key: &PublicKey) -> String {
    let digest: [u8; 32] = Blake2s256::digest(public_key.as_bytes()).into();
    hex::encode(digest)
}
