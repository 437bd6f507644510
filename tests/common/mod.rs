// Shared fixtures for the integration tests.
//
// PDFs are assembled in memory with lopdf, so no binary fixtures are needed.
// Fake collaborators record how the orchestrator calls them.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use lopdf::{
    dictionary, Dictionary, Document as PdfDocument, EncryptionState, EncryptionVersion, Object,
    ObjectId, Permissions, Stream, StringFormat,
};
use validatesigpdfa::{
    BoundConformanceJob, ConformanceValidator, DataToValidate, DiagnosticData, Document,
    Indication, PdfaInfo, RemoteDocument, Reports, Result, SignatureSummary, SignatureValidator,
    SimpleReport, TrustOrigin, ValidationError,
};

// ── PDF fixtures ──────────────────────────────────────────────────────────────

const BYTE_RANGE_PLACEHOLDER: i64 = 1_000_000_000;

/// An XMP packet declaring `PDF/A-<part><conformance>`.
pub fn pdfa_xmp(part: u8, conformance: char) -> String {
    format!(
        r#"<?xpacket begin="" id="W5M0MpCehiHzreSzNTczkc9d"?>
<x:xmpmeta xmlns:x="adobe:ns:meta/">
 <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <rdf:Description rdf:about="" xmlns:pdfaid="http://www.aiim.org/pdfa/ns/id/"
    pdfaid:part="{part}" pdfaid:conformance="{conformance}"/>
 </rdf:RDF>
</x:xmpmeta>
<?xpacket end="w"?>"#
    )
}

pub struct SignatureFixture {
    pub field_name: String,
    pub contents: Vec<u8>,
    /// When `false` the ByteRange is left pointing at bogus offsets.
    pub valid_byte_range: bool,
}

impl SignatureFixture {
    pub fn pades(field_name: &str, contents: &[u8]) -> Self {
        Self {
            field_name: field_name.into(),
            contents: contents.to_vec(),
            valid_byte_range: true,
        }
    }
}

pub struct Attachment {
    pub name: String,
    pub data: Vec<u8>,
    pub af_relationship: Option<String>,
}

/// Builder for small single-page PDFs.
pub struct PdfBuilder {
    xmp: Option<String>,
    output_intent: bool,
    document_id: bool,
    javascript: bool,
    javascript_name_tree: bool,
    encrypted: bool,
    signatures: Vec<SignatureFixture>,
    attachments: Vec<Attachment>,
    annotation_attachments: Vec<Attachment>,
}

impl PdfBuilder {
    /// A plain PDF with no PDF/A features at all.
    pub fn plain() -> Self {
        Self {
            xmp: None,
            output_intent: false,
            document_id: false,
            javascript: false,
            javascript_name_tree: false,
            encrypted: false,
            signatures: Vec::new(),
            attachments: Vec::new(),
            annotation_attachments: Vec::new(),
        }
    }

    /// A PDF carrying everything the default PDF/A checks look for.
    pub fn pdfa(part: u8, conformance: char) -> Self {
        Self {
            xmp: Some(pdfa_xmp(part, conformance)),
            output_intent: true,
            document_id: true,
            ..Self::plain()
        }
    }

    pub fn xmp(mut self, xmp: Option<String>) -> Self {
        self.xmp = xmp;
        self
    }

    pub fn output_intent(mut self, on: bool) -> Self {
        self.output_intent = on;
        self
    }

    pub fn document_id(mut self, on: bool) -> Self {
        self.document_id = on;
        self
    }

    pub fn javascript(mut self, on: bool) -> Self {
        self.javascript = on;
        self
    }

    /// An empty `/JavaScript` name tree in the catalog's `/Names`.
    pub fn javascript_name_tree(mut self, on: bool) -> Self {
        self.javascript_name_tree = on;
        self
    }

    /// RC4 128-bit encryption with an empty user password, so readers open
    /// the file without prompting. Needs the trailer `/ID`.
    pub fn encrypted(mut self, on: bool) -> Self {
        self.encrypted = on;
        self
    }

    pub fn signature(mut self, sig: SignatureFixture) -> Self {
        self.signatures.push(sig);
        self
    }

    pub fn attachment(mut self, name: &str, data: &[u8], af_relationship: Option<&str>) -> Self {
        self.attachments.push(Attachment {
            name: name.into(),
            data: data.to_vec(),
            af_relationship: af_relationship.map(str::to_owned),
        });
        self
    }

    /// An attachment reachable only through a page's FileAttachment
    /// annotation.
    pub fn annotation_attachment(
        mut self,
        name: &str,
        data: &[u8],
        af_relationship: Option<&str>,
    ) -> Self {
        self.annotation_attachments.push(Attachment {
            name: name.into(),
            data: data.to_vec(),
            af_relationship: af_relationship.map(str::to_owned),
        });
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut doc = PdfDocument::with_version("1.7");

        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );

        let mut catalog: Dictionary = dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        };

        if let Some(xmp) = &self.xmp {
            let metadata_id = doc.add_object(Stream::new(
                dictionary! { "Type" => "Metadata", "Subtype" => "XML" },
                xmp.as_bytes().to_vec(),
            ));
            catalog.set("Metadata", metadata_id);
        }

        if self.output_intent {
            let intent_id = doc.add_object(dictionary! {
                "Type" => "OutputIntent",
                "S" => "GTS_PDFA1",
                "OutputConditionIdentifier" => Object::string_literal("sRGB IEC61966-2.1"),
            });
            catalog.set("OutputIntents", vec![intent_id.into()]);
        }

        if self.javascript {
            let action_id = doc.add_object(dictionary! {
                "S" => "JavaScript",
                "JS" => Object::string_literal("app.alert('hi');"),
            });
            catalog.set("OpenAction", action_id);
        }

        let mut names = Dictionary::new();
        if !self.attachments.is_empty() {
            let mut entries = Vec::new();
            for att in &self.attachments {
                let spec_id = add_file_spec(&mut doc, att);
                entries.push(Object::string_literal(att.name.as_str()));
                entries.push(spec_id.into());
            }
            names.set("EmbeddedFiles", dictionary! { "Names" => entries });
        }
        if self.javascript_name_tree {
            names.set("JavaScript", dictionary! { "Names" => Vec::<Object>::new() });
        }
        if !names.is_empty() {
            catalog.set("Names", names);
        }

        if !self.annotation_attachments.is_empty() {
            let mut annots = Vec::new();
            for att in &self.annotation_attachments {
                let spec_id = add_file_spec(&mut doc, att);
                let annot_id = doc.add_object(dictionary! {
                    "Type" => "Annot",
                    "Subtype" => "FileAttachment",
                    "Rect" => vec![0.into(), 0.into(), 10.into(), 10.into()],
                    "FS" => spec_id,
                    "Contents" => Object::string_literal(att.name.as_str()),
                });
                annots.push(Object::from(annot_id));
            }
            doc.get_object_mut(page_id)
                .and_then(Object::as_dict_mut)
                .expect("page dictionary")
                .set("Annots", annots);
        }

        if !self.signatures.is_empty() {
            let mut fields = Vec::new();
            for sig in &self.signatures {
                let byte_range: Vec<Object> = if sig.valid_byte_range {
                    vec![
                        0.into(),
                        BYTE_RANGE_PLACEHOLDER.into(),
                        BYTE_RANGE_PLACEHOLDER.into(),
                        BYTE_RANGE_PLACEHOLDER.into(),
                    ]
                } else {
                    vec![0.into(), 10.into(), 20.into(), 30.into()]
                };
                let sig_id = doc.add_object(dictionary! {
                    "Type" => "Sig",
                    "Filter" => "Adobe.PPKLite",
                    "SubFilter" => "ETSI.CAdES.detached",
                    "ByteRange" => byte_range,
                    "Contents" => Object::String(sig.contents.clone(), StringFormat::Hexadecimal),
                    "Name" => Object::string_literal("Jane Signer"),
                    "M" => Object::string_literal("D:20240101120000Z"),
                    "Reason" => Object::string_literal("Approval"),
                });
                let field_id = doc.add_object(dictionary! {
                    "FT" => "Sig",
                    "T" => Object::string_literal(sig.field_name.as_str()),
                    "V" => sig_id,
                });
                fields.push(field_id.into());
            }
            catalog.set("AcroForm", dictionary! { "Fields" => fields, "SigFlags" => 3 });
        }

        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", catalog_id);
        if self.document_id {
            let id = Object::String(b"0123456789abcdef".to_vec(), StringFormat::Hexadecimal);
            doc.trailer.set("ID", vec![id.clone(), id]);
        }
        if self.encrypted {
            let version = EncryptionVersion::V2 {
                document: &doc,
                owner_password: "owner",
                user_password: "",
                key_length: 128,
                permissions: Permissions::all(),
            };
            let state = EncryptionState::try_from(version).expect("encryption state");
            doc.encrypt(&state).expect("encrypt fixture PDF");
        }

        let mut out = Vec::new();
        doc.save_to(&mut out).expect("serialise fixture PDF");
        patch_byte_ranges(&mut out);
        out
    }
}

fn add_file_spec(doc: &mut PdfDocument, att: &Attachment) -> ObjectId {
    let stream_id = doc.add_object(Stream::new(
        dictionary! { "Type" => "EmbeddedFile" },
        att.data.clone(),
    ));
    let mut spec = dictionary! {
        "Type" => "Filespec",
        "F" => Object::string_literal(att.name.as_str()),
        "UF" => Object::string_literal(att.name.as_str()),
        "EF" => dictionary! { "F" => stream_id },
    };
    if let Some(rel) = &att.af_relationship {
        spec.set("AFRelationship", Object::Name(rel.as_bytes().to_vec()));
    }
    doc.add_object(spec)
}

/// Rewrite every placeholder ByteRange so it covers the file except the
/// following `/Contents <…>` value. Widths are preserved so xref offsets stay
/// valid.
fn patch_byte_ranges(pdf: &mut [u8]) {
    let placeholder = BYTE_RANGE_PLACEHOLDER.to_string();
    let mut search_from = 0;
    while let Some(pos) = find(pdf, b"/ByteRange", search_from) {
        let open = find(pdf, b"[", pos).expect("ByteRange array");
        let close = find(pdf, b"]", open).expect("ByteRange array end");
        search_from = close;

        let inner = String::from_utf8_lossy(&pdf[open + 1..close]).into_owned();
        if !inner.contains(&placeholder) {
            continue;
        }

        let contents = find(pdf, b"/Contents", pos).expect("/Contents after /ByteRange");
        let lt = find(pdf, b"<", contents).expect("hex signature value");
        let gt = find(pdf, b">", lt).expect("hex signature value end");
        let (b, c) = (lt, gt + 1);
        let d = pdf.len() - c;

        let replacement = format!("{:<width$}", format!("0 {b} {c} {d}"), width = inner.len());
        assert_eq!(replacement.len(), inner.len());
        pdf[open + 1..close].copy_from_slice(replacement.as_bytes());
    }
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

// ── Requests ─────────────────────────────────────────────────────────────────

pub fn request_for(pdf: Vec<u8>) -> DataToValidate {
    DataToValidate {
        signed_document: Some(RemoteDocument::from_bytes(pdf, "signed.pdf")),
        ..Default::default()
    }
}

// ── Fake collaborators ───────────────────────────────────────────────────────

/// A primary report as a real validator might produce it.
pub fn sample_primary_report() -> Reports {
    Reports {
        simple_report: Some(SimpleReport {
            document_name: Some("signed.pdf".into()),
            valid_signatures_count: 1,
            signatures_count: 1,
            signatures: vec![SignatureSummary {
                id: "Signature1".into(),
                signature_format: "PAdES".into(),
                indication: Indication::TotalPassed,
                sub_indication: None,
                signed_by: Some("Jane Signer".into()),
                signing_time: None,
                reason: None,
                location: None,
                byte_range_intact: true,
                trust_anchor_embedded: true,
                errors: vec![],
                warnings: vec![],
            }],
            ..Default::default()
        }),
        diagnostic_data: Some(DiagnosticData {
            document_name: Some("signed.pdf".into()),
            document_digest: Some("ab".repeat(32)),
            trust_origin: "context".into(),
            trust_anchor_count: 1,
            original_documents: vec![],
        }),
    }
}

pub fn sample_pdfa_info() -> PdfaInfo {
    PdfaInfo {
        validation_profile: "PDF/A-3B".into(),
        compliant: false,
        validation_messages: vec!["catalog has no /OutputIntents".into()],
    }
}

/// A conformance report carrying `info`.
pub fn conformance_report(info: Option<PdfaInfo>) -> Reports {
    Reports {
        simple_report: Some(SimpleReport {
            signatures_count: 7,
            pdfa_info: info,
            ..Default::default()
        }),
        diagnostic_data: None,
    }
}

/// Returns a fixed report and counts its calls.
pub struct FakePrimary {
    pub reports: Reports,
    pub calls: AtomicUsize,
}

impl FakePrimary {
    pub fn new(reports: Reports) -> Arc<Self> {
        Arc::new(Self {
            reports,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SignatureValidator for FakePrimary {
    fn validate(&self, _request: &DataToValidate) -> Result<Reports> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reports.clone())
    }
}

/// What a [`RecordingConformance`] saw on one call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub document: Document,
    pub detached: Vec<Document>,
    pub policy: Option<Document>,
    pub trust_origin: TrustOrigin,
}

/// Records every call; answers with `result` or fails when it is `None`.
pub struct RecordingConformance {
    pub result: Option<Reports>,
    pub calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingConformance {
    pub fn returning(result: Reports) -> Arc<Self> {
        Arc::new(Self {
            result: Some(result),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            result: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl ConformanceValidator for RecordingConformance {
    fn validate(&self, job: &BoundConformanceJob, policy: Option<&Document>) -> Result<Reports> {
        self.calls.lock().unwrap().push(RecordedCall {
            document: job.document().clone(),
            detached: job.detached_contents().to_vec(),
            policy: policy.cloned(),
            trust_origin: job.verifier().origin(),
        });
        self.result
            .clone()
            .ok_or_else(|| ValidationError::InvalidDocument("conformance engine failed".into()))
    }
}
