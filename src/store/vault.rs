//! Encrypted on-disk storage for the document tree.
//!
//! The file is a small JSON envelope around the ChaCha20-Poly1305
//! ciphertext of the serialized [`Documents`]. The key is derived from the
//! master password with Argon2id; salt and nonce are regenerated on every
//! save.

use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::crypto::{self, CryptoError, NONCE_LEN, SALT_LEN};
use crate::store::documents::Documents;

const VAULT_VERSION: u8 = 1;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed vault: {0}")]
    Format(#[from] serde_json::Error),

    #[error("malformed vault field: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("vault file is empty")]
    Empty,

    #[error("unsupported vault version {0}")]
    UnsupportedVersion(u8),

    #[error("vault field '{0}' has the wrong length")]
    FieldLength(&'static str),
}

#[derive(Serialize, Deserialize)]
struct SealedVault {
    version: u8,
    argon2_salt: String,
    encryption_nonce: String,
    encrypted_data: String,
}

/// A vault file unlocked with a master password.
pub struct Vault {
    path: PathBuf,
    master_password: String,
}

impl Vault {
    pub fn new(path: impl Into<PathBuf>, master_password: String) -> Self {
        Self {
            path: path.into(),
            master_password,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing or zero-length file means no vault has been created yet.
    pub fn is_new(&self) -> bool {
        Self::is_new_at(&self.path)
    }

    pub fn is_new_at(path: &Path) -> bool {
        !path.exists() || fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true)
    }

    pub fn load(&self) -> Result<Documents, VaultError> {
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Err(VaultError::Empty);
        }

        let sealed: SealedVault = serde_json::from_str(&content)?;
        if sealed.version != VAULT_VERSION {
            return Err(VaultError::UnsupportedVersion(sealed.version));
        }

        let salt = general_purpose::STANDARD.decode(&sealed.argon2_salt)?;
        let nonce: [u8; NONCE_LEN] = general_purpose::STANDARD
            .decode(&sealed.encryption_nonce)?
            .try_into()
            .map_err(|_| VaultError::FieldLength("encryption_nonce"))?;
        let encrypted = general_purpose::STANDARD.decode(&sealed.encrypted_data)?;

        let key = crypto::derive_key(&self.master_password, &salt)?;
        let plain = crypto::decrypt(&encrypted, &key, &nonce)?;
        let documents = serde_json::from_slice(&plain)?;

        log::debug!("Loaded vault from {}", self.path.display());
        Ok(documents)
    }

    pub fn save(&self, documents: &Documents) -> Result<(), VaultError> {
        let salt = crypto::random_bytes::<SALT_LEN>()?;
        let nonce = crypto::random_bytes::<NONCE_LEN>()?;
        let key = crypto::derive_key(&self.master_password, &salt)?;

        let plain = serde_json::to_vec(documents)?;
        let encrypted = crypto::encrypt(&plain, &key, &nonce)?;

        let sealed = SealedVault {
            version: VAULT_VERSION,
            argon2_salt: general_purpose::STANDARD.encode(salt),
            encryption_nonce: general_purpose::STANDARD.encode(nonce),
            encrypted_data: general_purpose::STANDARD.encode(encrypted),
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(&sealed)?)?;

        log::debug!("Saved vault to {}", self.path.display());
        Ok(())
    }
}

impl Drop for Vault {
    fn drop(&mut self) {
        self.master_password.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::PasswordDigest;
    use crate::store::documents::UserDocument;
    use chrono::Utc;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn sample_documents() -> Documents {
        let mut documents = Documents::default();
        documents.users.insert(
            "uid-1".to_string(),
            UserDocument {
                name: "Ana".to_string(),
                email: "a@x.com".to_string(),
                device_id: "IMEI1".to_string(),
                password: PasswordDigest::compute("pw123456").unwrap(),
                created_at: Utc::now(),
                categories: BTreeMap::new(),
            },
        );
        documents
    }

    #[test]
    fn test_new_vault_detection() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.db");
        assert!(Vault::is_new_at(&path));

        fs::File::create(&path).unwrap();
        assert!(Vault::is_new_at(&path));

        let vault = Vault::new(&path, "master".to_string());
        vault.save(&Documents::default()).unwrap();
        assert!(!vault.is_new());
    }

    #[test]
    fn test_reopen_with_same_password() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("vault.db");

        Vault::new(&path, "master".to_string())
            .save(&sample_documents())
            .unwrap();

        let documents = Vault::new(&path, "master".to_string()).load().unwrap();
        assert_eq!(documents.users["uid-1"].email, "a@x.com");
    }

    #[test]
    fn test_wrong_password_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.db");
        Vault::new(&path, "master".to_string())
            .save(&sample_documents())
            .unwrap();

        let result = Vault::new(&path, "not-master".to_string()).load();
        assert!(matches!(
            result,
            Err(VaultError::Crypto(CryptoError::Decrypt))
        ));
    }

    #[test]
    fn test_empty_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.db");
        fs::write(&path, "  \n").unwrap();

        let result = Vault::new(&path, "master".to_string()).load();
        assert!(matches!(result, Err(VaultError::Empty)));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.db");
        fs::write(
            &path,
            r#"{"version":9,"argon2_salt":"","encryption_nonce":"","encrypted_data":""}"#,
        )
        .unwrap();

        let result = Vault::new(&path, "master".to_string()).load();
        assert!(matches!(result, Err(VaultError::UnsupportedVersion(9))));
    }
}
