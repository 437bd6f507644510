//! The conformance-validation seam.
//!
//! A [`ConformanceJob`] collects the document and its detached contents. It
//! becomes a [`BoundConformanceJob`] only once a [`CertificateVerifier`] is
//! bound, and only a bound job can be handed to a [`ConformanceValidator`].

use std::sync::Arc;

use crate::{CertificateVerifier, Document, Reports, Result};

/// Conformance-validation input before trust is bound.
#[derive(Debug, Clone)]
pub struct ConformanceJob {
    document: Document,
    detached_contents: Vec<Document>,
}

impl ConformanceJob {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            detached_contents: Vec::new(),
        }
    }

    /// Detached content the signature references but does not embed.
    pub fn with_detached_contents(mut self, detached: Vec<Document>) -> Self {
        self.detached_contents = detached;
        self
    }

    /// Bind the trust configuration. Required before validation.
    pub fn bind(self, verifier: Arc<CertificateVerifier>) -> BoundConformanceJob {
        BoundConformanceJob {
            document: self.document,
            detached_contents: self.detached_contents,
            verifier,
        }
    }
}

/// Conformance-validation input with its trust configuration.
#[derive(Debug, Clone)]
pub struct BoundConformanceJob {
    document: Document,
    detached_contents: Vec<Document>,
    verifier: Arc<CertificateVerifier>,
}

impl BoundConformanceJob {
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn detached_contents(&self) -> &[Document] {
        &self.detached_contents
    }

    pub fn verifier(&self) -> &Arc<CertificateVerifier> {
        &self.verifier
    }

    /// Run `validator` on this job.
    pub fn validate(
        &self,
        validator: &dyn ConformanceValidator,
        policy: Option<&Document>,
    ) -> Result<Reports> {
        validator.validate(self, policy)
    }
}

/// Format-specific structural conformance validation.
///
/// `policy` is `None` when the validator's built-in default policy applies.
/// The returned report's simple report may carry a `PDFAInfo` block.
pub trait ConformanceValidator: Send + Sync {
    fn validate(&self, job: &BoundConformanceJob, policy: Option<&Document>) -> Result<Reports>;
}
