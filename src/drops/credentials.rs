//! # Credential Store
//!
//! Credentials are persisted encrypted at rest in `credentials.enc` inside the
//! config directory. The file holds a 12 byte nonce followed by the AES-256-GCM
//! ciphertext of the JSON-serialized [`Credentials`].
//!
//! The key is derived from this machine's identity, so a copied file does not
//! decrypt elsewhere. A missing file reads as [`Credentials::Anonymous`].

use crate::error::{DropsError, Result};
use crate::model::Credentials;
use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

const CREDENTIALS_FILENAME: &str = "credentials.enc";
const KEY_SALT: &[u8] = b"drops-credentials-v1";
const NONCE_LEN: usize = 12;
const MACHINE_ID_PATHS: &[&str] = &["/etc/machine-id", "/var/lib/dbus/machine-id"];

pub trait CredentialStore {
    fn get(&self) -> Result<Credentials>;

    /// Returns whether anything was written.
    fn set(&mut self, credentials: &Credentials) -> Result<bool>;

    fn clear(&mut self) -> Result<()>;
}

pub struct EncryptedFileStore {
    path: PathBuf,
    key: [u8; 32],
}

impl EncryptedFileStore {
    /// Store in `config_dir`, keyed by this machine's identity.
    pub fn new(config_dir: &Path) -> Self {
        Self::with_identity(config_dir, &machine_identity())
    }

    pub fn with_identity(config_dir: &Path, identity: &str) -> Self {
        Self {
            path: config_dir.join(CREDENTIALS_FILENAME),
            key: derive_key(identity),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key))
    }

    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher()
            .encrypt(&nonce, plaintext)
            .map_err(|e| DropsError::Credentials(format!("encryption failed: {}", e)))?;

        let mut sealed = nonce.to_vec();
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    fn decrypt(&self, sealed: &[u8]) -> Result<Vec<u8>> {
        if sealed.len() <= NONCE_LEN {
            return Err(unreadable());
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
        self.cipher()
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| unreadable())
    }
}

fn unreadable() -> DropsError {
    DropsError::Credentials(
        "stored credentials cannot be decrypted on this machine, run `drops login` again"
            .to_string(),
    )
}

impl CredentialStore for EncryptedFileStore {
    fn get(&self) -> Result<Credentials> {
        if !self.path.exists() {
            return Ok(Credentials::Anonymous);
        }
        let sealed = fs::read(&self.path)?;
        let plaintext = self.decrypt(&sealed)?;
        Ok(serde_json::from_slice(&plaintext)?)
    }

    fn set(&mut self, credentials: &Credentials) -> Result<bool> {
        if credentials.is_anonymous() {
            self.clear()?;
            return Ok(false);
        }
        let plaintext = serde_json::to_vec(credentials)?;
        let sealed = self.encrypt(&plaintext)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, sealed)?;
        Ok(true)
    }

    fn clear(&mut self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// Credentials held in memory only. Starts out anonymous.
#[derive(Debug, Clone)]
pub struct MemoryCredentialStore {
    credentials: Credentials,
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new(Credentials::Anonymous)
    }
}

impl MemoryCredentialStore {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Credentials> {
        Ok(self.credentials.clone())
    }

    fn set(&mut self, credentials: &Credentials) -> Result<bool> {
        self.credentials = credentials.clone();
        Ok(!credentials.is_anonymous())
    }

    fn clear(&mut self) -> Result<()> {
        self.credentials = Credentials::Anonymous;
        Ok(())
    }
}

fn derive_key(identity: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(KEY_SALT);
    hasher.update(identity.trim().as_bytes());
    hasher.finalize().into()
}

/// The machine id when the OS exposes one, else the host name.
fn machine_identity() -> String {
    MACHINE_ID_PATHS
        .iter()
        .filter_map(|path| fs::read_to_string(path).ok())
        .map(|id| id.trim().to_string())
        .find(|id| !id.is_empty())
        .or_else(|| {
            hostname::get()
                .ok()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_default()
}
