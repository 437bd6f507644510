use crate::embedded::EmbeddedFile;
use crate::{pdf_utils, Result, ValidationError};
use lopdf::{Dictionary, Document, ObjectId, Stream};

/// Parses file specifications and reads the embedded stream behind them.
pub struct FileSpecParser<'a> {
    document: &'a Document,
}

impl<'a> FileSpecParser<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    fn invalid(name: &str, message: &str) -> ValidationError {
        ValidationError::InvalidDocument(format!("embedded file '{name}': {message}"))
    }

    /// Parse a file-specification object into an [`EmbeddedFile`].
    ///
    /// Layout of a file specification (ISO 32000 §7.11.3):
    ///
    /// ```text
    /// <<
    ///   /Type  /Filespec
    ///   /F     (ascii filename)
    ///   /UF    (unicode filename)          ← preferred
    ///   /AFRelationship /Data              ← PDF/A-3 associated files
    ///   /EF    << /F <stream-ref> /UF <stream-ref> >>
    /// >>
    /// ```
    pub fn parse_file_spec(&self, name: &str, spec_id: ObjectId) -> Result<EmbeddedFile> {
        let spec_dict = self
            .document
            .get_object(spec_id)?
            .as_dict()
            .map_err(|_| Self::invalid(name, "file spec is not a dictionary"))?;

        let ef_dict = spec_dict
            .get(b"EF")
            .ok()
            .and_then(|v| pdf_utils::resolve_dict(self.document, v))
            .ok_or_else(|| Self::invalid(name, "missing or malformed /EF entry"))?;

        let stream = self.embedded_stream(ef_dict, name)?;
        let data = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());

        Ok(EmbeddedFile {
            filename: Self::best_filename(spec_dict, name),
            data,
            af_relationship: pdf_utils::extract_name_from_dict(spec_dict, b"AFRelationship"),
        })
    }

    /// /UF preferred over /F (unicode vs. ASCII path).
    fn embedded_stream(&self, ef_dict: &Dictionary, name: &str) -> Result<&'a Stream> {
        let stream_id = ef_dict
            .get(b"UF")
            .or_else(|_| ef_dict.get(b"F"))
            .map_err(|_| Self::invalid(name, "/EF has neither /F nor /UF"))?
            .as_reference()
            .map_err(|_| Self::invalid(name, "/EF stream entry is not a reference"))?;

        self.document
            .get_object(stream_id)?
            .as_stream()
            .map_err(|_| Self::invalid(name, "embedded stream object is not a stream"))
    }

    /// Unicode (/UF) > ASCII (/F) > fallback.
    fn best_filename(spec_dict: &Dictionary, fallback: &str) -> String {
        [b"UF" as &[u8], b"F"]
            .into_iter()
            .find_map(|key| pdf_utils::extract_string_from_dict(spec_dict, key))
            .unwrap_or_else(|| fallback.into())
    }
}
