use crate::xmp::PdfaIdentification;

// ── EmbeddedFile ─────────────────────────────────────────────────────────────

/// A file embedded inside a PDF document.
#[derive(Debug, Clone)]
pub struct EmbeddedFile {
    /// The filename as declared in the file specification
    /// (Unicode name preferred over ASCII name when both are present).
    pub filename: String,

    /// The raw, decompressed file content.
    pub data: Vec<u8>,

    /// `/AFRelationship` of the file specification (PDF/A-3 associated files).
    pub af_relationship: Option<String>,
}

impl EmbeddedFile {
    /// Returns `true` when the content starts with a PDF header.
    pub fn is_pdf(&self) -> bool {
        self.data.starts_with(b"%PDF-")
    }

    /// The PDF/A identification declared by the embedded file, when it is a
    /// PDF that declares one.
    pub fn pdfa_identification(&self) -> Option<PdfaIdentification> {
        if !self.is_pdf() {
            return None;
        }
        let document = lopdf::Document::load_mem(&self.data).ok()?;
        crate::xmp::read_identification(&document)
    }
}
