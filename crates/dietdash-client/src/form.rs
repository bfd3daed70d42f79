//! Multipart form payloads.
//!
//! Forms mix text fields with file uploads (the profile picture). On the
//! wire each text field is individually sealed into an envelope, while file
//! parts pass through untouched; the server decrypts field by field.

use dietdash_core::envelope::{self, EnvelopeKey};
use dietdash_core::error::CryptoError;

/// A file attached to a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Original file name, sent as the part's filename.
    pub file_name: String,
    /// MIME type (e.g. `image/png`).
    pub content_type: String,
    /// Raw file bytes, never encrypted.
    pub bytes: Vec<u8>,
}

/// One form field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File(FilePart),
}

/// An ordered multipart form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    parts: Vec<(String, FormValue)>,
}

impl FormPayload {
    /// An empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts
            .push((name.into(), FormValue::Text(value.into())));
        self
    }

    /// Append a file field.
    #[must_use]
    pub fn file(mut self, name: impl Into<String>, file: FilePart) -> Self {
        self.parts.push((name.into(), FormValue::File(file)));
        self
    }

    /// The fields in insertion order.
    #[must_use]
    pub fn parts(&self) -> &[(String, FormValue)] {
        &self.parts
    }

    /// Seal every text field in place; file fields pass through untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Encryption`] if sealing a field fails.
    pub(crate) fn sealed(&self, key: &EnvelopeKey) -> Result<Self, CryptoError> {
        let mut parts = Vec::with_capacity(self.parts.len());
        for (name, value) in &self.parts {
            let sealed_value = match value {
                FormValue::Text(text) => FormValue::Text(envelope::seal_str(key, text)?),
                FormValue::File(file) => FormValue::File(file.clone()),
            };
            parts.push((name.clone(), sealed_value));
        }
        Ok(Self { parts })
    }

    /// Convert into a `reqwest` multipart form.
    pub(crate) fn into_multipart(self) -> Result<reqwest::multipart::Form, crate::ApiError> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in self.parts {
            form = match value {
                FormValue::Text(text) => form.text(name, text),
                FormValue::File(file) => {
                    let part = reqwest::multipart::Part::bytes(file.bytes)
                        .file_name(file.file_name)
                        .mime_str(&file.content_type)
                        .map_err(|e| crate::ApiError::Request(e.to_string()))?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x01];

    fn key() -> EnvelopeKey {
        EnvelopeKey::derive("test-secret").unwrap()
    }

    #[test]
    fn sealing_encrypts_text_and_leaves_files_untouched() {
        let form = FormPayload::new()
            .text("email", "a@b.com")
            .file(
                "profilePicture",
                FilePart {
                    file_name: "me.png".to_owned(),
                    content_type: "image/png".to_owned(),
                    bytes: PNG_BYTES.to_vec(),
                },
            );

        let k = key();
        let sealed = form.sealed(&k).unwrap();
        assert_eq!(sealed.parts().len(), 2);

        // Text field: no longer the plaintext, but opens back to it.
        let (name, value) = &sealed.parts()[0];
        assert_eq!(name, "email");
        match value {
            FormValue::Text(sealed_text) => {
                assert_ne!(sealed_text, "a@b.com");
                assert_eq!(envelope::open_str(&k, sealed_text).unwrap(), "a@b.com");
            }
            FormValue::File(_) => panic!("text field became a file"),
        }

        // File field: byte-identical.
        let (name, value) = &sealed.parts()[1];
        assert_eq!(name, "profilePicture");
        match value {
            FormValue::File(file) => {
                assert_eq!(file.bytes, PNG_BYTES);
                assert_eq!(file.file_name, "me.png");
            }
            FormValue::Text(_) => panic!("file field became text"),
        }
    }

    #[test]
    fn sealing_preserves_field_order() {
        let form = FormPayload::new()
            .text("a", "1")
            .text("b", "2")
            .text("c", "3");
        let sealed = form.sealed(&key()).unwrap();
        let names: Vec<_> = sealed.parts().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn into_multipart_accepts_mixed_fields() {
        let form = FormPayload::new()
            .text("email", "a@b.com")
            .file(
                "profilePicture",
                FilePart {
                    file_name: "me.png".to_owned(),
                    content_type: "image/png".to_owned(),
                    bytes: PNG_BYTES.to_vec(),
                },
            );
        assert!(form.into_multipart().is_ok());
    }

    #[test]
    fn invalid_mime_type_is_a_request_error() {
        let form = FormPayload::new().file(
            "f",
            FilePart {
                file_name: "x".to_owned(),
                content_type: "not a mime".to_owned(),
                bytes: vec![1],
            },
        );
        assert!(matches!(
            form.into_multipart(),
            Err(crate::ApiError::Request(_))
        ));
    }
}
