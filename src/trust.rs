//! Trust configuration used while evaluating signatures.
//!
//! A [`CertificateVerifier`] holds the trust anchors for one validation
//! attempt. It either comes from the running service (loaded once at start-up
//! and shared read-only across requests) or is built on demand with no
//! anchors, in which case it conservatively trusts nothing.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use rustls_pki_types::pem::PemObject;
use rustls_pki_types::CertificateDer;
use sha2::{Digest, Sha256};

use crate::config::{ConfigError, TrustConfig};

/// Where a [`CertificateVerifier`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustOrigin {
    /// Supplied by the execution context.
    Context,
    /// Built on demand because the context had none.
    Default,
}

impl fmt::Display for TrustOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Context => f.write_str("context"),
            Self::Default => f.write_str("default"),
        }
    }
}

/// A trusted certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustAnchor {
    /// Lowercase hex SHA-256 of the DER encoding.
    pub fingerprint: String,
    pub der: Vec<u8>,
    pub label: Option<String>,
}

impl TrustAnchor {
    pub fn from_der(der: Vec<u8>, label: Option<String>) -> Self {
        Self {
            fingerprint: fingerprint(&der),
            der,
            label,
        }
    }
}

/// Trust anchors for one validation attempt.
#[derive(Debug, Clone)]
pub struct CertificateVerifier {
    origin: TrustOrigin,
    anchors: Vec<TrustAnchor>,
}

impl Default for CertificateVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl CertificateVerifier {
    /// A self-contained verifier with no anchors.
    pub fn new() -> Self {
        Self {
            origin: TrustOrigin::Default,
            anchors: Vec::new(),
        }
    }

    /// A context verifier holding `anchors`.
    pub fn with_anchors(anchors: Vec<TrustAnchor>) -> Self {
        Self {
            origin: TrustOrigin::Context,
            anchors,
        }
    }

    /// Load every certificate listed in `[trust]`.
    pub fn from_config(config: &TrustConfig) -> Result<Self, ConfigError> {
        let mut anchors = Vec::new();
        for path in &config.trusted_certificates {
            let loaded = load_certificates(path)?;
            tracing::debug!(path = %path.display(), count = loaded.len(), "loaded trust anchors");
            anchors.extend(loaded);
        }
        Ok(Self::with_anchors(anchors))
    }

    pub fn origin(&self) -> TrustOrigin {
        self.origin
    }

    pub fn anchors(&self) -> &[TrustAnchor] {
        &self.anchors
    }

    /// Returns the first trust anchor whose DER encoding appears verbatim in
    /// `blob` (a CMS `SignedData` carries its certificates unmodified).
    pub fn find_embedded_anchor(&self, blob: &[u8]) -> Option<&TrustAnchor> {
        self.anchors.iter().find(|a| {
            !a.der.is_empty() && blob.windows(a.der.len()).any(|w| w == a.der.as_slice())
        })
    }
}

// ── Resolution ───────────────────────────────────────────────────────────────

/// Source of a long-lived, context-managed verifier.
pub trait TrustProvider: Send + Sync {
    fn context_verifier(&self) -> Option<Arc<CertificateVerifier>>;
}

/// The service's trust context: an optional verifier built at start-up.
#[derive(Debug, Clone, Default)]
pub struct ContextTrust {
    verifier: Option<Arc<CertificateVerifier>>,
}

impl ContextTrust {
    pub fn new(verifier: CertificateVerifier) -> Self {
        Self {
            verifier: Some(Arc::new(verifier)),
        }
    }

    /// A context without a configured verifier.
    pub fn none() -> Self {
        Self::default()
    }

    /// Build the context from the optional `[trust]` section.
    pub fn from_config(config: Option<&TrustConfig>) -> Result<Self, ConfigError> {
        match config {
            Some(trust) => Ok(Self::new(CertificateVerifier::from_config(trust)?)),
            None => Ok(Self::none()),
        }
    }
}

impl TrustProvider for ContextTrust {
    fn context_verifier(&self) -> Option<Arc<CertificateVerifier>> {
        self.verifier.clone()
    }
}

/// Returns the context verifier when there is one, otherwise a fresh default.
pub fn resolve_certificate_verifier(provider: &dyn TrustProvider) -> Arc<CertificateVerifier> {
    match provider.context_verifier() {
        Some(verifier) => verifier,
        None => Arc::new(CertificateVerifier::new()),
    }
}

// ── Loading ──────────────────────────────────────────────────────────────────

fn fingerprint(der: &[u8]) -> String {
    hex::encode(Sha256::digest(der))
}

/// Read a DER certificate or a PEM bundle. Every entry must parse as an
/// X.509 certificate; the subject becomes the anchor's label.
fn load_certificates(path: &Path) -> Result<Vec<TrustAnchor>, ConfigError> {
    let invalid =
        |reason: String| ConfigError::Certificate(format!("{}: {reason}", path.display()));
    let raw = std::fs::read(path).map_err(|e| invalid(e.to_string()))?;

    let ders = if is_pem(&raw) {
        CertificateDer::pem_slice_iter(&raw)
            .map(|cert| cert.map(|c| c.as_ref().to_vec()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| invalid(format!("invalid PEM: {e}")))?
    } else {
        vec![raw]
    };
    if ders.is_empty() {
        return Err(invalid("no certificate found".into()));
    }

    ders.into_iter()
        .map(|der| {
            let subject = certificate_subject(&der).map_err(&invalid)?;
            Ok(TrustAnchor::from_der(der, Some(subject)))
        })
        .collect()
}

fn is_pem(raw: &[u8]) -> bool {
    const MARKER: &[u8] = b"-----BEGIN ";
    raw.windows(MARKER.len()).any(|w| w == MARKER)
}

fn certificate_subject(der: &[u8]) -> Result<String, String> {
    let (rest, cert) = x509_parser::parse_x509_certificate(der)
        .map_err(|e| format!("not an X.509 certificate: {e}"))?;
    if !rest.is_empty() {
        return Err(format!("{} trailing bytes after the certificate", rest.len()));
    }
    Ok(cert.subject().to_string())
}
