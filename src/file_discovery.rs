use crate::pdf_utils;
use lopdf::{Dictionary, Document, Object, ObjectId};

/// Finds embedded-file specifications in a PDF document.
///
/// Two sources are searched:
/// 1. The `/Names/EmbeddedFiles` name tree in the document catalog.
/// 2. `/FileAttachment` annotations on pages.
pub struct FileSpecDiscovery<'a> {
    document: &'a Document,
}

impl<'a> FileSpecDiscovery<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    /// Collect `(name, ObjectId)` pairs for every embedded-file specification.
    pub fn collect_file_specs(&self) -> Vec<(String, ObjectId)> {
        let mut specs = self.collect_from_names_tree();
        specs.extend(self.collect_from_annotations());
        specs
    }

    fn collect_from_names_tree(&self) -> Vec<(String, ObjectId)> {
        let Ok(catalog) = self.document.catalog() else {
            return Vec::new();
        };
        let Some(names_dict) = pdf_utils::dict_entry(self.document, catalog, b"Names") else {
            return Vec::new();
        };
        let Ok(ef_val) = names_dict.get(b"EmbeddedFiles") else {
            return Vec::new();
        };

        match ef_val.as_reference() {
            Ok(ef_id) => self.walk_name_tree(ef_id, 0),
            Err(_) => ef_val
                .as_dict()
                .map(|d| self.names_in_node(d))
                .unwrap_or_default(),
        }
    }

    fn collect_from_annotations(&self) -> Vec<(String, ObjectId)> {
        self.document
            .get_pages()
            .values()
            .flat_map(|page_id| self.page_file_attachments(*page_id))
            .collect()
    }

    fn page_file_attachments(&self, page_id: ObjectId) -> Vec<(String, ObjectId)> {
        let Some(annots) = self
            .document
            .get_object(page_id)
            .ok()
            .and_then(|o| o.as_dict().ok())
            .and_then(|page| page.get(b"Annots").ok())
            .and_then(|v| pdf_utils::resolve_array(self.document, v))
        else {
            return Vec::new();
        };

        annots
            .iter()
            .filter_map(|item| pdf_utils::resolve_dict(self.document, item))
            .filter_map(Self::file_attachment)
            .collect()
    }

    fn file_attachment(dict: &Dictionary) -> Option<(String, ObjectId)> {
        if dict.get(b"Subtype").ok()?.as_name().ok()? != b"FileAttachment" {
            return None;
        }
        let fs_id = dict.get(b"FS").ok()?.as_reference().ok()?;
        Some((Self::annotation_name(dict), fs_id))
    }

    /// Recursively walk a name tree, collecting `(name, spec_id)` pairs from
    /// leaf nodes. Depth is bounded so a cyclic `/Kids` chain terminates.
    fn walk_name_tree(&self, node_id: ObjectId, depth: usize) -> Vec<(String, ObjectId)> {
        const MAX_DEPTH: usize = 32;
        if depth > MAX_DEPTH {
            return Vec::new();
        }
        let Some(node) = self
            .document
            .get_object(node_id)
            .ok()
            .and_then(|o| o.as_dict().ok())
        else {
            return Vec::new();
        };

        let mut out = self.names_in_node(node);

        if let Some(kids) = node
            .get(b"Kids")
            .ok()
            .and_then(|v| pdf_utils::resolve_array(self.document, v))
        {
            for kid in kids {
                if let Ok(kid_id) = kid.as_reference() {
                    out.extend(self.walk_name_tree(kid_id, depth + 1));
                }
            }
        }

        out
    }

    /// Leaf entries: a `/Names` array of `[key, value, key, value, …]`.
    fn names_in_node(&self, node: &Dictionary) -> Vec<(String, ObjectId)> {
        let Some(arr) = node
            .get(b"Names")
            .ok()
            .and_then(|v| pdf_utils::resolve_array(self.document, v))
        else {
            return Vec::new();
        };
        arr.chunks_exact(2)
            .filter_map(|pair| match (&pair[0], &pair[1]) {
                (Object::String(raw, _), Object::Reference(id)) => {
                    Some((String::from_utf8_lossy(raw).into_owned(), *id))
                }
                _ => None,
            })
            .collect()
    }

    /// Display name of a FileAttachment annotation; `"attachment"` if neither
    /// `/Contents` nor `/T` is set.
    fn annotation_name(dict: &Dictionary) -> String {
        [b"Contents" as &[u8], b"T"]
            .into_iter()
            .find_map(|key| pdf_utils::extract_string_from_dict(dict, key))
            .unwrap_or_else(|| "attachment".into())
    }
}
