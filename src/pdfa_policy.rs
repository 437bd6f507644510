use serde::{Deserialize, Serialize};

use crate::{Document, Result, ValidationError};

/// Which PDF/A checks run and which declared profiles are acceptable.
///
/// A policy document is YAML (JSON is accepted as a subset). Every key is
/// optional; omitted keys take the strictest value.
///
/// ```yaml
/// acceptedProfiles: ["PDF/A-2B", "PDF/A-3B"]
/// requireOutputIntent: true
/// forbidEncryption: true
/// forbidJavaScript: true
/// requireDocumentId: true
/// checkEmbeddedFiles: true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ConformancePolicy {
    /// Accepted `PDF/A-<part><level>` profiles. Empty accepts any declared
    /// profile.
    pub accepted_profiles: Vec<String>,
    pub require_output_intent: bool,
    pub forbid_encryption: bool,
    #[serde(rename = "forbidJavaScript")]
    pub forbid_javascript: bool,
    pub require_document_id: bool,
    pub check_embedded_files: bool,
}

impl Default for ConformancePolicy {
    fn default() -> Self {
        Self {
            accepted_profiles: Vec::new(),
            require_output_intent: true,
            forbid_encryption: true,
            forbid_javascript: true,
            require_document_id: true,
            check_embedded_files: true,
        }
    }
}

impl ConformancePolicy {
    /// Parse a policy document.
    pub fn from_document(document: &Document) -> Result<Self> {
        let bytes = document.bytes().ok_or_else(|| {
            ValidationError::InvalidPolicy("a digest document cannot be used as a policy".into())
        })?;
        Self::from_slice(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_yaml::from_slice(bytes).map_err(|e| ValidationError::InvalidPolicy(e.to_string()))
    }

    /// Returns `true` when `profile` is acceptable under this policy.
    pub fn accepts(&self, profile: &str) -> bool {
        self.accepted_profiles.is_empty()
            || self
                .accepted_profiles
                .iter()
                .any(|p| p.eq_ignore_ascii_case(profile))
    }
}
