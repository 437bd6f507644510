use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

// ── RemoteDocument ───────────────────────────────────────────────────────────

/// A document as it travels over the wire.
///
/// `bytes` is base64 in JSON. When `digest_algorithm` is set, `bytes` holds a
/// digest of the original document rather than its content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDocument {
    #[serde(default, with = "base64_bytes", skip_serializing_if = "Option::is_none")]
    pub bytes: Option<Vec<u8>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest_algorithm: Option<DigestAlgorithm>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl RemoteDocument {
    /// A full-content document with a name.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>, name: impl Into<String>) -> Self {
        Self {
            bytes: Some(bytes.into()),
            digest_algorithm: None,
            name: Some(name.into()),
        }
    }

    /// Returns `true` when `bytes` is present and non-empty.
    pub fn has_content(&self) -> bool {
        self.bytes.as_deref().is_some_and(|b| !b.is_empty())
    }
}

/// Digest algorithms accepted for digest-only documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DigestAlgorithm {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

mod base64_bytes {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => s.serialize_some(&BASE64.encode(bytes)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded: Option<String> = Option::deserialize(d)?;
        encoded
            .map(|s| BASE64.decode(s.trim()).map_err(serde::de::Error::custom))
            .transpose()
    }
}

// ── Document ─────────────────────────────────────────────────────────────────

/// Internal document model consumed by the validators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    /// Full document content held in memory.
    InMemory { name: Option<String>, bytes: Vec<u8> },

    /// Only a digest of the document is known.
    Digest {
        name: Option<String>,
        algorithm: DigestAlgorithm,
        digest: Vec<u8>,
    },
}

impl Document {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::InMemory { name, .. } | Self::Digest { name, .. } => name.as_deref(),
        }
    }

    /// The document content, or `None` for digest-only documents.
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            Self::InMemory { bytes, .. } => Some(bytes),
            Self::Digest { .. } => None,
        }
    }

    /// Lowercase hex SHA-256 of the content. Digest documents report their
    /// stored digest only when it already is a SHA-256.
    pub fn sha256_hex(&self) -> Option<String> {
        match self {
            Self::InMemory { bytes, .. } => Some(hex::encode(Sha256::digest(bytes))),
            Self::Digest {
                algorithm: DigestAlgorithm::Sha256,
                digest,
                ..
            } => Some(hex::encode(digest)),
            Self::Digest { .. } => None,
        }
    }

    /// Returns `true` when the content starts with a PDF header.
    ///
    /// The header may be preceded by up to 1024 bytes of garbage, as readers
    /// tolerate.
    pub fn is_pdf(&self) -> bool {
        self.bytes().is_some_and(|bytes| {
            let window = &bytes[..bytes.len().min(1024 + 5)];
            window.windows(5).any(|w| w == b"%PDF-")
        })
    }
}
