//! Primary signature validation.
//!
//! [`PdfSignatureValidator`] is a structural PAdES inspector: it finds the
//! signature fields of a PDF, checks that each `/ByteRange` covers the whole
//! file except the signature value, and looks for a configured trust anchor
//! among the certificates carried in the CMS blob. It never verifies a
//! signature value, so it never reports `TOTAL_PASSED`.

use std::sync::Arc;

use chrono::Utc;
use lopdf::{Dictionary, Document as PdfDocument, Object};

use crate::{
    pdf_utils, resolve_certificate_verifier, to_document, to_documents, CertificateVerifier,
    DataToValidate, DiagnosticData, Document, Indication, OriginalDocumentInfo, Reports, Result,
    SignatureSummary, SimpleReport, SubIndication, TrustProvider, ValidationError,
    ValidationPolicyInfo,
};

/// Full signature validation producing the primary report.
///
/// Implementations must return a well-formed report for a request without a
/// signed document.
pub trait SignatureValidator: Send + Sync {
    fn validate(&self, request: &DataToValidate) -> Result<Reports>;
}

/// Structural signature validator for PDF documents.
pub struct PdfSignatureValidator {
    trust: Arc<dyn TrustProvider>,
}

impl PdfSignatureValidator {
    pub fn new(trust: Arc<dyn TrustProvider>) -> Self {
        Self { trust }
    }
}

impl SignatureValidator for PdfSignatureValidator {
    fn validate(&self, request: &DataToValidate) -> Result<Reports> {
        let Some(document) = to_document(request.signed_document.as_ref()) else {
            return Ok(Reports {
                simple_report: Some(SimpleReport {
                    validation_policy: Some(structural_policy()),
                    validation_time: Some(Utc::now()),
                    ..Default::default()
                }),
                diagnostic_data: None,
            });
        };

        let bytes = require_pdf(&document)?;
        let pdf = PdfDocument::load_mem(bytes)?;
        let verifier = resolve_certificate_verifier(self.trust.as_ref());
        let detached = to_documents(request.original_documents.as_deref());

        let mut reports = inspect_signatures(
            &pdf,
            bytes,
            &document,
            &detached,
            &verifier,
            structural_policy(),
        );

        if let (Some(id), Some(simple)) = (&request.signature_id, reports.simple_report.as_mut()) {
            simple.signatures.retain(|s| &s.id == id);
            simple.signatures_count = simple.signatures.len();
            simple.valid_signatures_count = count_valid(&simple.signatures);
        }

        tracing::debug!(
            document = document.name().unwrap_or("<unnamed>"),
            signatures = reports.simple_report.as_ref().map_or(0, |s| s.signatures_count),
            "primary signature validation complete"
        );
        Ok(reports)
    }
}

fn structural_policy() -> ValidationPolicyInfo {
    ValidationPolicyInfo {
        policy_name: "Structural signature inspection".into(),
        policy_description: "Checks ByteRange coverage and trust-anchor presence; \
                             signature values are not cryptographically verified."
            .into(),
    }
}

/// The content of `document`, provided it is an in-memory PDF.
pub(crate) fn require_pdf(document: &Document) -> Result<&[u8]> {
    let bytes = document.bytes().ok_or_else(|| {
        ValidationError::UnsupportedFormat("a digest document cannot be validated".into())
    })?;
    if !document.is_pdf() {
        return Err(ValidationError::UnsupportedFormat(
            "document is not a PDF".into(),
        ));
    }
    Ok(bytes)
}

/// Build a report for every signature in `pdf`.
pub(crate) fn inspect_signatures(
    pdf: &PdfDocument,
    file: &[u8],
    document: &Document,
    detached: &[Document],
    verifier: &CertificateVerifier,
    policy: ValidationPolicyInfo,
) -> Reports {
    let signatures: Vec<SignatureSummary> = SignatureFieldDiscovery::new(pdf)
        .signature_fields()
        .into_iter()
        .map(|(id, dict)| summarize(&id, dict, file, verifier))
        .collect();

    let simple = SimpleReport {
        validation_policy: Some(policy),
        document_name: document.name().map(str::to_owned),
        valid_signatures_count: count_valid(&signatures),
        signatures_count: signatures.len(),
        validation_time: Some(Utc::now()),
        signatures,
        pdfa_info: None,
    };

    let diagnostic = DiagnosticData {
        document_name: document.name().map(str::to_owned),
        document_digest: document.sha256_hex(),
        trust_origin: verifier.origin().to_string(),
        trust_anchor_count: verifier.anchors().len(),
        original_documents: detached
            .iter()
            .map(|d| OriginalDocumentInfo {
                name: d.name().map(str::to_owned),
                digest: d.sha256_hex(),
            })
            .collect(),
    };

    Reports {
        simple_report: Some(simple),
        diagnostic_data: Some(diagnostic),
    }
}

fn count_valid(signatures: &[SignatureSummary]) -> usize {
    signatures
        .iter()
        .filter(|s| s.indication == Indication::TotalPassed)
        .count()
}

fn summarize(
    id: &str,
    sig: &Dictionary,
    file: &[u8],
    verifier: &CertificateVerifier,
) -> SignatureSummary {
    let sub_filter = pdf_utils::extract_name_from_dict(sig, b"SubFilter");
    let signature_format = match sub_filter.as_deref() {
        Some("ETSI.CAdES.detached") => "PAdES",
        _ => "PDF-NOT-ETSI",
    };

    let contents = sig
        .get(b"Contents")
        .ok()
        .and_then(|v| v.as_str().ok())
        .unwrap_or_default();

    let byte_range_intact = sig
        .get(b"ByteRange")
        .ok()
        .and_then(|v| v.as_array().ok())
        .is_some_and(|range| byte_range_covers_file(range, file));

    let anchor = verifier.find_embedded_anchor(contents);

    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();
    let (indication, sub_indication) = if !byte_range_intact {
        errors.push(
            "ByteRange does not cover the whole document except the signature value".into(),
        );
        (Indication::Failed, Some(SubIndication::FormatFailure))
    } else if contents.is_empty() {
        errors.push("signature value is empty".into());
        (Indication::Failed, Some(SubIndication::FormatFailure))
    } else if let Some(anchor) = anchor {
        warnings.push(format!(
            "certificate set contains trust anchor {}; signature value not cryptographically verified",
            anchor.label.as_deref().unwrap_or(&anchor.fingerprint)
        ));
        (Indication::Indeterminate, None)
    } else {
        warnings.push("no trust anchor found in the signature's certificate set".into());
        (
            Indication::Indeterminate,
            Some(SubIndication::NoCertificateChainFound),
        )
    };

    SignatureSummary {
        id: id.to_owned(),
        signature_format: signature_format.into(),
        indication,
        sub_indication,
        signed_by: pdf_utils::extract_string_from_dict(sig, b"Name"),
        signing_time: pdf_utils::extract_string_from_dict(sig, b"M"),
        reason: pdf_utils::extract_string_from_dict(sig, b"Reason"),
        location: pdf_utils::extract_string_from_dict(sig, b"Location"),
        byte_range_intact,
        trust_anchor_embedded: anchor.is_some(),
        errors,
        warnings,
    }
}

/// `[a b c d]` must start at 0, end at EOF and leave exactly the hex
/// `<…>` signature value uncovered.
fn byte_range_covers_file(range: &[Object], file: &[u8]) -> bool {
    let offsets: Option<Vec<usize>> = range
        .iter()
        .map(|o| o.as_i64().ok().and_then(|n| usize::try_from(n).ok()))
        .collect();
    let Some([start, first_len, second_start, second_len]) =
        offsets.as_deref().and_then(|o| <[usize; 4]>::try_from(o).ok())
    else {
        return false;
    };

    start == 0
        && first_len < second_start
        && second_start.checked_add(second_len) == Some(file.len())
        && file.get(first_len) == Some(&b'<')
        && file.get(second_start - 1) == Some(&b'>')
}

// ── Signature field discovery ─────────────────────────────────────────────────

/// Walks the AcroForm field tree and returns signature dictionaries keyed by
/// fully qualified field name. Document timestamps are not signatures and are
/// skipped.
struct SignatureFieldDiscovery<'a> {
    document: &'a PdfDocument,
}

impl<'a> SignatureFieldDiscovery<'a> {
    const MAX_DEPTH: usize = 32;

    fn new(document: &'a PdfDocument) -> Self {
        Self { document }
    }

    fn signature_fields(&self) -> Vec<(String, &'a Dictionary)> {
        let Some(fields) = self
            .document
            .catalog()
            .ok()
            .and_then(|catalog| pdf_utils::dict_entry(self.document, catalog, b"AcroForm"))
            .and_then(|form| form.get(b"Fields").ok())
            .and_then(|v| pdf_utils::resolve_array(self.document, v))
        else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for field in fields {
            self.walk(field, None, None, 0, &mut out);
        }
        for (index, (id, _)) in out.iter_mut().enumerate() {
            if id.is_empty() {
                *id = format!("signature-{}", index + 1);
            }
        }
        out
    }

    fn walk(
        &self,
        field: &'a Object,
        parent_name: Option<&str>,
        inherited_ft: Option<&[u8]>,
        depth: usize,
        out: &mut Vec<(String, &'a Dictionary)>,
    ) {
        if depth > Self::MAX_DEPTH {
            return;
        }
        let Some(dict) = pdf_utils::resolve_dict(self.document, field) else {
            return;
        };

        let partial = pdf_utils::extract_string_from_dict(dict, b"T");
        let name = match (parent_name, partial.as_deref()) {
            (Some(p), Some(t)) => format!("{p}.{t}"),
            (None, Some(t)) => t.to_owned(),
            (Some(p), None) => p.to_owned(),
            (None, None) => String::new(),
        };
        let ft = dict
            .get(b"FT")
            .ok()
            .and_then(|v| v.as_name().ok())
            .or(inherited_ft);

        if ft == Some(b"Sig".as_slice()) {
            if let Some(value) = pdf_utils::dict_entry(self.document, dict, b"V") {
                if !Self::is_document_timestamp(value) {
                    out.push((name.clone(), value));
                }
            }
        }

        if let Some(kids) = dict
            .get(b"Kids")
            .ok()
            .and_then(|v| pdf_utils::resolve_array(self.document, v))
        {
            let parent = (!name.is_empty()).then_some(name.as_str());
            for kid in kids {
                self.walk(kid, parent, ft, depth + 1, out);
            }
        }
    }

    fn is_document_timestamp(sig: &Dictionary) -> bool {
        pdf_utils::extract_name_from_dict(sig, b"Type").as_deref() == Some("DocTimeStamp")
            || pdf_utils::extract_name_from_dict(sig, b"SubFilter").as_deref()
                == Some("ETSI.RFC3161")
    }
}
