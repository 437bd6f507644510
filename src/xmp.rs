//! PDF/A identification from XMP metadata.

use std::fmt;

use lopdf::Document;

/// The `pdfaid` schema values declared in XMP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfaIdentification {
    /// `pdfaid:part` (1, 2 or 3).
    pub part: u8,
    /// `pdfaid:conformance` (`'A'`, `'B'` or `'U'`).
    pub conformance: char,
}

impl fmt::Display for PdfaIdentification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PDF/A-{}{}", self.part, self.conformance)
    }
}

/// Read the catalog's `/Metadata` stream and parse its PDF/A identification.
pub fn read_identification(document: &Document) -> Option<PdfaIdentification> {
    let xmp = read_xmp_metadata(document).ok()?;
    parse_identification(&xmp)
}

/// Walk catalog → /Metadata → stream → decompressed bytes → UTF-8 string.
pub fn read_xmp_metadata(document: &Document) -> Result<String, String> {
    let catalog = document
        .catalog()
        .map_err(|e| format!("cannot read catalog: {e}"))?;

    let meta_id = catalog
        .get(b"Metadata")
        .map_err(|_| "catalog has no /Metadata entry".to_string())?
        .as_reference()
        .map_err(|_| "/Metadata entry is not an indirect reference".to_string())?;

    let stream = document
        .get_object(meta_id)
        .map_err(|e| format!("cannot resolve /Metadata object: {e}"))?
        .as_stream()
        .map_err(|_| "/Metadata object is not a stream".to_string())?;

    // Metadata streams are normally uncompressed; fall back to raw content
    // when no filter applies.
    let bytes = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Parse `pdfaid:part` and `pdfaid:conformance` from an XMP packet.
///
/// XMP allows two serialisation forms:
/// - attribute syntax : `pdfaid:part="3"`
/// - element syntax   : `<pdfaid:part>3</pdfaid:part>`
pub fn parse_identification(xmp: &str) -> Option<PdfaIdentification> {
    let part = xmp_value(xmp, "pdfaid:part")?;
    let part: u8 = part.trim().parse().ok().filter(|p| (1..=3).contains(p))?;

    let conformance = xmp_value(xmp, "pdfaid:conformance")?;
    let conformance = conformance.trim().chars().next()?;
    if !matches!(conformance, 'A' | 'B' | 'U') {
        return None;
    }
    // Level U was introduced with part 2.
    if part == 1 && conformance == 'U' {
        return None;
    }

    Some(PdfaIdentification { part, conformance })
}

fn xmp_value<'a>(xmp: &'a str, property: &str) -> Option<&'a str> {
    let attr = format!("{property}=\"");
    if let Some(start) = xmp.find(&attr) {
        let rest = &xmp[start + attr.len()..];
        return rest.find('"').map(|end| &rest[..end]);
    }

    let attr_single = format!("{property}='");
    if let Some(start) = xmp.find(&attr_single) {
        let rest = &xmp[start + attr_single.len()..];
        return rest.find('\'').map(|end| &rest[..end]);
    }

    let open = format!("<{property}>");
    let close = format!("</{property}>");
    let start = xmp.find(&open)? + open.len();
    let end = xmp[start..].find(&close)?;
    Some(&xmp[start..start + end])
}
