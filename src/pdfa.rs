//! Default PDF/A conformance validator.

use lopdf::{Document as PdfDocument, Object};

use crate::conformance::{BoundConformanceJob, ConformanceValidator};
use crate::file_discovery::FileSpecDiscovery;
use crate::file_parsing::FileSpecParser;
use crate::signature::inspect_signatures;
use crate::xmp::{self, PdfaIdentification};
use crate::{
    pdf_utils, ConformancePolicy, Document, PdfaInfo, Reports, Result, ValidationPolicyInfo,
};

/// Profile reported when the document declares no PDF/A identification.
const UNDECLARED_PROFILE: &str = "PDF/A";

/// PDF/A structural checks on top of the structural signature report.
///
/// Non-PDF input yields a report without `PDFAInfo`. For a PDF the checks run
/// in order and each failed check adds one validation message:
///
/// 1. XMP metadata declares `pdfaid:part` and `pdfaid:conformance`.
/// 2. The declared profile is accepted by the policy.
/// 3. The document is not encrypted.
/// 4. The trailer carries a file identifier (`/ID`).
/// 5. The catalog carries at least one `/OutputIntents` entry.
/// 6. No JavaScript is present.
/// 7. Embedded files follow the rules of the declared part.
#[derive(Debug, Clone, Default)]
pub struct PdfaValidator {
    default_policy: ConformancePolicy,
}

impl PdfaValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `policy` whenever the caller supplies none.
    pub fn with_default_policy(policy: ConformancePolicy) -> Self {
        Self {
            default_policy: policy,
        }
    }

    /// Run the PDF/A checks on a parsed document.
    pub fn check(&self, pdf: &PdfDocument, policy: &ConformancePolicy) -> PdfaInfo {
        PdfaChecks::new(pdf, policy).run()
    }
}

impl ConformanceValidator for PdfaValidator {
    fn validate(&self, job: &BoundConformanceJob, policy: Option<&Document>) -> Result<Reports> {
        let document = job.document();
        let bytes = match document.bytes() {
            Some(bytes) if document.is_pdf() => bytes,
            _ => {
                tracing::debug!(
                    document = document.name().unwrap_or("<unnamed>"),
                    "not a PDF, PDF/A checks not applicable"
                );
                return Ok(Reports::default());
            }
        };

        let parsed_policy;
        let policy = match policy {
            Some(doc) => {
                parsed_policy = ConformancePolicy::from_document(doc)?;
                &parsed_policy
            }
            None => &self.default_policy,
        };

        let pdf = PdfDocument::load_mem(bytes)?;
        let mut reports = inspect_signatures(
            &pdf,
            bytes,
            document,
            job.detached_contents(),
            job.verifier(),
            ValidationPolicyInfo {
                policy_name: "PDF/A conformance".into(),
                policy_description: "Structural PDF/A checks: identification, encryption, \
                                     file identifier, output intent, JavaScript, embedded files."
                    .into(),
            },
        );

        let info = self.check(&pdf, policy);
        tracing::debug!(
            profile = %info.validation_profile,
            compliant = info.compliant,
            messages = info.validation_messages.len(),
            "PDF/A checks complete"
        );
        if let Some(simple) = reports.simple_report.as_mut() {
            simple.pdfa_info = Some(info);
        }
        Ok(reports)
    }
}

// ── Checks ───────────────────────────────────────────────────────────────────

struct PdfaChecks<'a> {
    pdf: &'a PdfDocument,
    policy: &'a ConformancePolicy,
    messages: Vec<String>,
}

impl<'a> PdfaChecks<'a> {
    fn new(pdf: &'a PdfDocument, policy: &'a ConformancePolicy) -> Self {
        Self {
            pdf,
            policy,
            messages: Vec::new(),
        }
    }

    fn run(mut self) -> PdfaInfo {
        let identification = self.check_identification();
        let profile = identification
            .map(|id| id.to_string())
            .unwrap_or_else(|| UNDECLARED_PROFILE.into());

        if identification.is_some() && !self.policy.accepts(&profile) {
            self.messages
                .push(format!("profile {profile} is not accepted by the conformance policy"));
        }
        if self.policy.forbid_encryption {
            self.check_encryption();
        }
        if self.policy.require_document_id {
            self.check_document_id();
        }
        if self.policy.require_output_intent {
            self.check_output_intent();
        }
        if self.policy.forbid_javascript {
            self.check_javascript();
        }
        if self.policy.check_embedded_files {
            if let Some(id) = identification {
                self.check_embedded_files(id);
            }
        }

        PdfaInfo {
            validation_profile: profile,
            compliant: self.messages.is_empty(),
            validation_messages: self.messages,
        }
    }

    fn check_identification(&mut self) -> Option<PdfaIdentification> {
        match xmp::read_xmp_metadata(self.pdf) {
            Ok(packet) => {
                let id = xmp::parse_identification(&packet);
                if id.is_none() {
                    self.messages
                        .push("XMP metadata does not declare a PDF/A identification".into());
                }
                id
            }
            Err(reason) => {
                self.messages.push(format!("no XMP metadata: {reason}"));
                None
            }
        }
    }

    /// lopdf decrypts files opened with an empty user password and drops
    /// `/Encrypt` from the trailer, so the load-time state counts too.
    fn check_encryption(&mut self) {
        if self.pdf.was_encrypted() || self.pdf.trailer.has(b"Encrypt") {
            self.messages.push("document is encrypted".into());
        }
    }

    fn check_document_id(&mut self) {
        let has_id = self
            .pdf
            .trailer
            .get(b"ID")
            .ok()
            .and_then(|v| pdf_utils::resolve_array(self.pdf, v))
            .is_some_and(|ids| ids.len() == 2);
        if !has_id {
            self.messages
                .push("trailer has no file identifier (/ID)".into());
        }
    }

    fn check_output_intent(&mut self) {
        let has_intent = self
            .pdf
            .catalog()
            .ok()
            .and_then(|c| c.get(b"OutputIntents").ok())
            .and_then(|v| pdf_utils::resolve_array(self.pdf, v))
            .is_some_and(|intents| !intents.is_empty());
        if !has_intent {
            self.messages
                .push("catalog has no /OutputIntents".into());
        }
    }

    fn check_javascript(&mut self) {
        let in_names = self
            .pdf
            .catalog()
            .ok()
            .and_then(|c| pdf_utils::dict_entry(self.pdf, c, b"Names"))
            .is_some_and(|names| names.has(b"JavaScript"));

        let in_actions = self.pdf.objects.values().any(|object| {
            let dict = match object {
                Object::Dictionary(d) => d,
                Object::Stream(s) => &s.dict,
                _ => return false,
            };
            dict.has(b"JS")
                || pdf_utils::extract_name_from_dict(dict, b"S").as_deref() == Some("JavaScript")
        });

        if in_names || in_actions {
            self.messages.push("document contains JavaScript".into());
        }
    }

    fn check_embedded_files(&mut self, id: PdfaIdentification) {
        let specs = FileSpecDiscovery::new(self.pdf).collect_file_specs();
        if specs.is_empty() {
            return;
        }

        if id.part == 1 {
            self.messages.push(format!(
                "PDF/A-1 forbids embedded files, found {}",
                specs.len()
            ));
            return;
        }

        let parser = FileSpecParser::new(self.pdf);
        for (name, spec_id) in specs {
            let file = match parser.parse_file_spec(&name, spec_id) {
                Ok(file) => file,
                Err(e) => {
                    self.messages.push(e.to_string());
                    continue;
                }
            };

            match id.part {
                2 if file.pdfa_identification().is_none() => self.messages.push(format!(
                    "embedded file '{}' is not a PDF/A document",
                    file.filename
                )),
                3 if file.af_relationship.is_none() => self.messages.push(format!(
                    "embedded file '{}' has no /AFRelationship",
                    file.filename
                )),
                _ => {}
            }
        }
    }
}
