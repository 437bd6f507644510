use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Reports ──────────────────────────────────────────────────────────────────

/// The output of a validation run.
///
/// Both the primary signature validator and the conformance validator produce
/// one of these. Only the orchestrator writes into a returned value, and only
/// the `PDFAInfo` slot of the simple report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reports {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simple_report: Option<SimpleReport>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic_data: Option<DiagnosticData>,
}

impl Reports {
    /// The `PDFAInfo` block, if this report carries one.
    pub fn pdfa_info(&self) -> Option<&PdfaInfo> {
        self.simple_report.as_ref()?.pdfa_info.as_ref()
    }
}

/// Condensed, caller-facing summary of a validation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SimpleReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_policy: Option<ValidationPolicyInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_name: Option<String>,

    pub valid_signatures_count: usize,

    pub signatures_count: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_time: Option<DateTime<Utc>>,

    #[serde(default, rename = "Signature")]
    pub signatures: Vec<SignatureSummary>,

    /// PDF/A conformance result. Absent unless a conformance check ran and
    /// produced one.
    #[serde(default, rename = "PDFAInfo", skip_serializing_if = "Option::is_none")]
    pub pdfa_info: Option<PdfaInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ValidationPolicyInfo {
    pub policy_name: String,
    pub policy_description: String,
}

/// Per-signature outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SignatureSummary {
    /// Signature field name, or a positional id when the field has no `/T`.
    pub id: String,

    pub signature_format: String,

    pub indication: Indication,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_indication: Option<SubIndication>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    pub byte_range_intact: bool,

    pub trust_anchor_embedded: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Indication {
    TotalPassed,
    Indeterminate,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubIndication {
    FormatFailure,
    NoCertificateChainFound,
}

// ── PdfaInfo ─────────────────────────────────────────────────────────────────

/// PDF/A conformance result attached to a [`SimpleReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PdfaInfo {
    /// Declared profile, e.g. `"PDF/A-3B"`; `"PDF/A"` when none is declared.
    pub validation_profile: String,

    pub compliant: bool,

    #[serde(default)]
    pub validation_messages: Vec<String>,
}

// ── DiagnosticData ───────────────────────────────────────────────────────────

/// Raw facts collected during validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DiagnosticData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_name: Option<String>,

    /// Lowercase hex SHA-256 of the validated document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_digest: Option<String>,

    pub trust_origin: String,

    pub trust_anchor_count: usize,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub original_documents: Vec<OriginalDocumentInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OriginalDocumentInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}
