//! # validatesigpdfa
//!
//! Validates signed PDF documents and folds a PDF/A conformance check into the
//! resulting signature report.
//!
//! ## What this crate does
//!
//! 1. **Validate signatures**: a [`SignatureValidator`] produces the primary
//!    [`Reports`] for a [`DataToValidate`] request.
//! 2. **Check PDF/A conformance**: when the request carries a signed document,
//!    a [`ConformanceValidator`] runs on it with a bound
//!    [`CertificateVerifier`] and an optional conformance policy.
//! 3. **Merge**: the conformance result's `PDFAInfo` block is attached to the
//!    primary simple report. Nothing else in the primary report changes.
//!
//! The [`ValidationOrchestrator`] sequences these steps and [`server`] exposes
//! them over JSON/HTTP.
//!
//! ## Quick example
//!
//! ```no_run
//! use std::sync::Arc;
//! use validatesigpdfa::{
//!     ContextTrust, DataToValidate, PdfSignatureValidator, PdfaValidator, RemoteDocument,
//!     ValidationOrchestrator,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = ValidationOrchestrator::new(
//!     Arc::new(PdfSignatureValidator::new(Arc::new(ContextTrust::none()))),
//!     Arc::new(PdfaValidator::new()),
//!     Arc::new(ContextTrust::none()),
//! );
//!
//! let request = DataToValidate {
//!     signed_document: Some(RemoteDocument::from_bytes(
//!         std::fs::read("signed.pdf")?,
//!         "signed.pdf",
//!     )),
//!     ..Default::default()
//! };
//!
//! let reports = orchestrator.validate(Some(&request))?;
//! if let Some(info) = reports.simple_report.and_then(|s| s.pdfa_info) {
//!     println!("{} compliant: {}", info.validation_profile, info.compliant);
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

pub mod config;
mod conformance;
mod converter;
mod document;
mod embedded;
mod file_discovery;
mod file_parsing;
mod orchestrator;
mod pdf_utils;
mod pdfa;
mod pdfa_policy;
mod report;
mod request;
pub mod server;
mod signature;
mod trust;
mod xmp;

pub use conformance::{BoundConformanceJob, ConformanceJob, ConformanceValidator};
pub use converter::{to_document, to_documents};
pub use document::{DigestAlgorithm, Document, RemoteDocument};
pub use orchestrator::ValidationOrchestrator;
pub use pdfa::PdfaValidator;
pub use pdfa_policy::ConformancePolicy;
pub use report::{
    DiagnosticData, Indication, OriginalDocumentInfo, PdfaInfo, Reports, SignatureSummary,
    SimpleReport, SubIndication, ValidationPolicyInfo,
};
pub use request::DataToValidate;
pub use signature::{PdfSignatureValidator, SignatureValidator};
pub use trust::{
    resolve_certificate_verifier, CertificateVerifier, ContextTrust, TrustAnchor, TrustOrigin,
    TrustProvider,
};

// ── Error type ───────────────────────────────────────────────────────────────

/// Every error the validation core can produce.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A filesystem I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The underlying lopdf parser returned an error.
    #[error("PDF parse error: {0}")]
    ParseError(#[from] lopdf::Error),

    /// The document is not in a format this validator handles.
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// The document parsed but is missing structure required for validation.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// The supplied conformance policy could not be read.
    #[error("Invalid conformance policy: {0}")]
    InvalidPolicy(String),
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, ValidationError>;
