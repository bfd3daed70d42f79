//! Payload envelope cryptography for `DietDash`.
//!
//! Every request and response body crossing the API boundary travels as a
//! single opaque string, the *envelope*: AES-256-GCM over the JSON-serialized
//! payload, base64-encoded. The key is derived from a shared passphrase with
//! HKDF-SHA256.
//!
//! # Security model
//!
//! - Every encryption generates a fresh 96-bit nonce via `OsRng`.
//! - Envelope format: `base64( nonce (12 bytes) || ciphertext || tag (16 bytes) )`.
//! - Key derivation uses HKDF-SHA256 with a fixed domain-separation info.
//! - Key material is zeroized on drop and redacted in `Debug` output.

use std::fmt;

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;

/// Nonce length for AES-256-GCM (96 bits).
const NONCE_LEN: usize = 12;

/// Minimum ciphertext length: 12-byte nonce + 16-byte AES-GCM tag.
const MIN_CIPHERTEXT_LEN: usize = NONCE_LEN + 16;

/// Domain-separation info for passphrase-derived envelope keys.
const ENVELOPE_KEY_INFO: &[u8] = b"dietdash-envelope-v1";

/// A 256-bit envelope key that is zeroized on drop.
///
/// The inner bytes are never exposed in `Debug` output.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EnvelopeKey([u8; 32]);

impl EnvelopeKey {
    /// Create a key from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive an envelope key from a shared passphrase.
    ///
    /// Both sides of the API derive the same key from the same passphrase,
    /// so the derivation is deterministic: HKDF-SHA256 with no salt and a
    /// fixed info string.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::KeyDerivation`] if HKDF expansion fails.
    pub fn derive(passphrase: &str) -> Result<Self, CryptoError> {
        let hk = Hkdf::<Sha256>::new(None, passphrase.as_bytes());
        let mut derived = [0u8; 32];
        hk.expand(ENVELOPE_KEY_INFO, &mut derived)
            .map_err(|e| CryptoError::KeyDerivation {
                reason: e.to_string(),
            })?;
        Ok(Self(derived))
    }

    /// Borrow the raw key bytes.
    ///
    /// Use with care: the caller must not log or persist these bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for EnvelopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvelopeKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Seal a UTF-8 string into an envelope.
///
/// # Errors
///
/// Returns [`CryptoError::Encryption`] if the AEAD operation fails.
pub fn seal_str(key: &EnvelopeKey, plaintext: &str) -> Result<String, CryptoError> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext.as_bytes())
        .map_err(|e| CryptoError::Encryption {
            reason: e.to_string(),
        })?;

    // nonce || ciphertext (includes tag appended by aes-gcm)
    let mut combined = Vec::with_capacity(NONCE_LEN.saturating_add(ciphertext.len()));
    combined.extend_from_slice(&nonce);
    combined.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(combined))
}

/// Open an envelope produced by [`seal_str`].
///
/// # Errors
///
/// - [`CryptoError::Encoding`] if the envelope is not valid base64 or the
///   plaintext is not UTF-8.
/// - [`CryptoError::CiphertextTooShort`] if the decoded bytes cannot hold a
///   nonce and a tag.
/// - [`CryptoError::Decryption`] if authentication fails (wrong key,
///   corrupted data, or tampered tag).
pub fn open_str(key: &EnvelopeKey, envelope: &str) -> Result<String, CryptoError> {
    let combined = BASE64
        .decode(envelope.trim())
        .map_err(|e| CryptoError::Encoding {
            reason: format!("base64 decode failed: {e}"),
        })?;

    if combined.len() < MIN_CIPHERTEXT_LEN {
        return Err(CryptoError::CiphertextTooShort {
            expected: MIN_CIPHERTEXT_LEN,
            actual: combined.len(),
        });
    }

    let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));

    let plaintext = cipher
        .decrypt(nonce, ciphertext)
        .map_err(|e| CryptoError::Decryption {
            reason: e.to_string(),
        })?;

    String::from_utf8(plaintext).map_err(|e| CryptoError::Encoding {
        reason: format!("plaintext is not UTF-8: {e}"),
    })
}

/// JSON-serialize a value and seal it into an envelope.
///
/// # Errors
///
/// Returns [`CryptoError::Payload`] if serialization fails, or
/// [`CryptoError::Encryption`] if the AEAD operation fails.
pub fn seal_json<T: serde::Serialize>(key: &EnvelopeKey, value: &T) -> Result<String, CryptoError> {
    let json = serde_json::to_string(value).map_err(|e| CryptoError::Payload {
        reason: format!("serialization failed: {e}"),
    })?;
    seal_str(key, &json)
}

/// Open an envelope and parse the plaintext as JSON.
///
/// A [`CryptoError::Payload`] from this function means the envelope itself
/// was sound but its content was not the expected shape — callers can tell
/// tampering apart from a contract mismatch.
///
/// # Errors
///
/// Propagates [`open_str`] errors, plus [`CryptoError::Payload`] if the
/// plaintext does not deserialize to `T`.
pub fn open_json<T: serde::de::DeserializeOwned>(
    key: &EnvelopeKey,
    envelope: &str,
) -> Result<T, CryptoError> {
    let json = open_str(key, envelope)?;
    serde_json::from_str(&json).map_err(|e| CryptoError::Payload {
        reason: format!("deserialization failed: {e}"),
    })
}
