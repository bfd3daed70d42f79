//! Error types for `dietdash-core`.
//!
//! Each variant carries enough context to diagnose the problem without a
//! debugger. Crypto errors never include key material or plaintext, only
//! operation descriptions.

/// Errors from envelope cryptography.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// AES-256-GCM encryption failed.
    #[error("encryption failed: {reason}")]
    Encryption { reason: String },

    /// AES-256-GCM decryption failed (wrong key, corrupted data, or tampered tag).
    #[error("decryption failed: {reason}")]
    Decryption { reason: String },

    /// HKDF key derivation failed.
    #[error("key derivation failed: {reason}")]
    KeyDerivation { reason: String },

    /// Ciphertext is too short to contain a valid nonce + tag.
    #[error("ciphertext too short: expected at least {expected} bytes, got {actual}")]
    CiphertextTooShort { expected: usize, actual: usize },

    /// The envelope is not valid base64, or the plaintext is not UTF-8.
    #[error("envelope encoding error: {reason}")]
    Encoding { reason: String },

    /// The decrypted payload is not the expected JSON shape.
    ///
    /// Distinct from [`CryptoError::Decryption`]: the transport and the
    /// envelope were sound, the content was not.
    #[error("envelope payload error: {reason}")]
    Payload { reason: String },
}

/// Errors from session persistence.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Reading or writing the session file failed.
    #[error("session file error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The session file exists but does not parse.
    #[error("session file is corrupt: {reason}")]
    Corrupt { reason: String },

    /// No home directory could be resolved for the session file.
    #[error("cannot resolve home directory for session file")]
    NoHomeDir,
}
