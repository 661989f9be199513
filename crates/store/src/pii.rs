//! At-rest PII encryption for player names
//!
//! spec.md §1 scopes out cryptographic *key management* but keeps the
//! symmetric primitive itself in scope ("a symmetric encryption primitive
//! for at-rest PII"). `PiiCipher` wraps AES-256-GCM with a process-wide key
//! supplied at startup (base64, 32 bytes), analogous to how the ledger
//! crate this workspace grew from wraps its signing key as a process-wide
//! `Signer`.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::Engine;
use rand::RngCore;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PiiError {
    #[error("invalid key: expected 32 bytes base64-encoded")]
    InvalidKey,

    #[error("encryption failed")]
    Encrypt,

    #[error("decryption failed")]
    Decrypt,

    #[error("ciphertext malformed")]
    Malformed,
}

/// AES-256-GCM cipher for player PII fields.
///
/// Ciphertext wire format is `base64(nonce(12) || ciphertext)`.
pub struct PiiCipher {
    cipher: Aes256Gcm,
}

impl PiiCipher {
    pub fn new(key_b64: &str) -> Result<Self, PiiError> {
        let key_bytes = base64::engine::general_purpose::STANDARD
            .decode(key_b64)
            .map_err(|_| PiiError::InvalidKey)?;
        if key_bytes.len() != 32 {
            return Err(PiiError::InvalidKey);
        }
        let key = Key::<Aes256Gcm>::from_slice(&key_bytes);
        Ok(Self {
            cipher: Aes256Gcm::new(key),
        })
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String, PiiError> {
        let mut nonce_bytes = [0u8; 12];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| PiiError::Encrypt)?;

        let mut wire = Vec::with_capacity(12 + ciphertext.len());
        wire.extend_from_slice(&nonce_bytes);
        wire.extend_from_slice(&ciphertext);
        Ok(base64::engine::general_purpose::STANDARD.encode(wire))
    }

    pub fn decrypt(&self, wire_b64: &str) -> Result<String, PiiError> {
        let wire = base64::engine::general_purpose::STANDARD
            .decode(wire_b64)
            .map_err(|_| PiiError::Malformed)?;
        if wire.len() < 12 {
            return Err(PiiError::Malformed);
        }
        let (nonce_bytes, ciphertext) = wire.split_at(12);
        let nonce = Nonce::from_slice(nonce_bytes);
        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| PiiError::Decrypt)?;
        String::from_utf8(plaintext).map_err(|_| PiiError::Decrypt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> String {
        base64::engine::general_purpose::STANDARD.encode([7u8; 32])
    }

    #[test]
    fn test_roundtrip() {
        let cipher = PiiCipher::new(&test_key()).unwrap();
        let ciphertext = cipher.encrypt("Alice Example").unwrap();
        assert_ne!(ciphertext, "Alice Example");
        assert_eq!(cipher.decrypt(&ciphertext).unwrap(), "Alice Example");
    }

    #[test]
    fn test_rejects_bad_key_length() {
        let short_key = base64::engine::general_purpose::STANDARD.encode([1u8; 16]);
        assert!(matches!(PiiCipher::new(&short_key), Err(PiiError::InvalidKey)));
    }

    #[test]
    fn test_rejects_malformed_ciphertext() {
        let cipher = PiiCipher::new(&test_key()).unwrap();
        assert!(matches!(cipher.decrypt("not-base64!!"), Err(PiiError::Malformed)));
    }
}
