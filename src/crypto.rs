//! Key derivation, authenticated encryption and password digests.

use argon2::Argon2;
use base64::{Engine as _, engine::general_purpose};
use chacha20poly1305::aead::Aead;
use chacha20poly1305::{ChaCha20Poly1305, KeyInit, Nonce};
use rand::{TryRngCore, rngs::OsRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const KEY_LEN: usize = 32;
pub const SALT_LEN: usize = 16;
pub const NONCE_LEN: usize = 12;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("failed to derive key with Argon2id: {0}")]
    KeyDerivation(String),
    #[error("system random source unavailable: {0}")]
    Random(String),
    #[error("encryption failed")]
    Encrypt,
    #[error("decryption failed - invalid password or corrupted data")]
    Decrypt,
}

pub fn derive_key(password: &str, salt: &[u8]) -> Result<[u8; KEY_LEN], CryptoError> {
    let mut key = [0u8; KEY_LEN];
    Argon2::default()
        .hash_password_into(password.as_bytes(), salt, &mut key)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    Ok(key)
}

pub fn random_bytes<const N: usize>() -> Result<[u8; N], CryptoError> {
    let mut bytes = [0u8; N];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| CryptoError::Random(e.to_string()))?;
    Ok(bytes)
}

/// URL-safe random identifier. 21 bytes encode to 28 characters, the
/// length of the auth provider's user ids.
pub fn random_token() -> Result<String, CryptoError> {
    let bytes = random_bytes::<21>()?;
    Ok(general_purpose::URL_SAFE_NO_PAD.encode(bytes))
}

pub fn encrypt(
    data: &[u8],
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = ChaCha20Poly1305::new(key.into());
    cipher
        .encrypt(Nonce::from_slice(nonce), data)
        .map_err(|_| CryptoError::Encrypt)
}

pub fn decrypt(
    encrypted: &[u8],
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = ChaCha20Poly1305::new(key.into());
    cipher
        .decrypt(Nonce::from_slice(nonce), encrypted)
        .map_err(|_| CryptoError::Decrypt)
}

/// Salted Argon2id digest of an account password, base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordDigest {
    pub salt: String,
    pub hash: String,
}

impl PasswordDigest {
    pub fn compute(password: &str) -> Result<Self, CryptoError> {
        let salt = random_bytes::<SALT_LEN>()?;
        let hash = derive_key(password, &salt)?;
        Ok(Self {
            salt: general_purpose::STANDARD.encode(salt),
            hash: general_purpose::STANDARD.encode(hash),
        })
    }

    /// A digest that fails to decode never matches.
    pub fn verify(&self, password: &str) -> bool {
        let Ok(salt) = general_purpose::STANDARD.decode(&self.salt) else {
            return false;
        };
        match derive_key(password, &salt) {
            Ok(hash) => general_purpose::STANDARD.encode(hash) == self.hash,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decrypt_with_wrong_key_fails() {
        let nonce = random_bytes::<NONCE_LEN>().unwrap();
        let key = derive_key("right", b"0123456789abcdef").unwrap();
        let wrong = derive_key("wrong", b"0123456789abcdef").unwrap();

        let sealed = encrypt(b"categories", &key, &nonce).unwrap();
        assert_eq!(decrypt(&sealed, &key, &nonce).unwrap(), b"categories");
        assert!(matches!(
            decrypt(&sealed, &wrong, &nonce),
            Err(CryptoError::Decrypt)
        ));
    }

    #[test]
    fn test_password_digest_verifies() {
        let digest = PasswordDigest::compute("pw123456").unwrap();
        assert!(digest.verify("pw123456"));
        assert!(!digest.verify("pw1234567"));
    }

    #[test]
    fn test_digest_salts_differ() {
        let a = PasswordDigest::compute("same").unwrap();
        let b = PasswordDigest::compute("same").unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn test_random_token_length() {
        let token = random_token().unwrap();
        assert_eq!(token.len(), 28);
        assert!(!token.contains('/'));
    }
}
