use std::sync::Arc;

use crate::{
    resolve_certificate_verifier, to_document, to_documents, ConformanceJob, ConformanceValidator,
    DataToValidate, PdfaInfo, Reports, Result, SignatureValidator, TrustProvider,
};

/// Sequences primary signature validation and the conditional PDF/A check,
/// then merges the conformance result into the primary report.
///
/// The orchestrator holds no per-request state and is shared across
/// requests.
#[derive(Clone)]
pub struct ValidationOrchestrator {
    primary: Arc<dyn SignatureValidator>,
    conformance: Arc<dyn ConformanceValidator>,
    trust: Arc<dyn TrustProvider>,
}

impl ValidationOrchestrator {
    pub fn new(
        primary: Arc<dyn SignatureValidator>,
        conformance: Arc<dyn ConformanceValidator>,
        trust: Arc<dyn TrustProvider>,
    ) -> Self {
        Self {
            primary,
            conformance,
            trust,
        }
    }

    /// Primary validation only.
    pub fn validate_signature(&self, request: Option<&DataToValidate>) -> Result<Reports> {
        let empty = DataToValidate::default();
        self.primary.validate(request.unwrap_or(&empty))
    }

    /// Validate `request` and attach the PDF/A result, when there is one, to
    /// the primary simple report.
    ///
    /// An absent request or signed document returns the primary report
    /// untouched. Errors from either validator are returned as they are.
    pub fn validate(&self, request: Option<&DataToValidate>) -> Result<Reports> {
        let mut reports = self.validate_signature(request)?;

        let Some(request) = request else {
            tracing::debug!("no request body, returning primary report");
            return Ok(reports);
        };
        let Some(signed) = to_document(request.signed_document.as_ref()) else {
            tracing::debug!("no signed document, skipping PDF/A validation");
            return Ok(reports);
        };

        let detached = to_documents(request.original_documents.as_deref());
        let verifier = resolve_certificate_verifier(self.trust.as_ref());
        tracing::debug!(
            trust_origin = %verifier.origin(),
            detached = detached.len(),
            "running PDF/A validation"
        );
        let job = ConformanceJob::new(signed)
            .with_detached_contents(detached)
            .bind(verifier);

        let conformance = match to_document(request.effective_policy()) {
            Some(policy) => {
                tracing::debug!(
                    policy = policy.name().unwrap_or("<unnamed>"),
                    "using supplied conformance policy"
                );
                job.validate(self.conformance.as_ref(), Some(&policy))?
            }
            None => job.validate(self.conformance.as_ref(), None)?,
        };

        match conformance.pdfa_info() {
            Some(info) => attach_pdfa_info(&mut reports, info.clone()),
            None => tracing::debug!("conformance result carries no PDFAInfo"),
        }

        Ok(reports)
    }
}

/// Assign `info` to the simple report's `PDFAInfo` slot. A report without a
/// simple report is left as it is.
fn attach_pdfa_info(reports: &mut Reports, info: PdfaInfo) {
    match reports.simple_report.as_mut() {
        Some(simple) => {
            tracing::info!(
                profile = %info.validation_profile,
                compliant = info.compliant,
                "attached PDFAInfo to simple report"
            );
            simple.pdfa_info = Some(info);
        }
        None => tracing::debug!("primary report has no simple report, PDFAInfo dropped"),
    }
}
