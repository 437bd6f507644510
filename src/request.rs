use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::RemoteDocument;

/// A validation request as received on the wire.
///
/// Members the service does not model are kept in [`extensions`] and are
/// only meaningful to the primary signature validator.
///
/// [`extensions`]: DataToValidate::extensions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataToValidate {
    /// The signed document. Nothing beyond primary validation runs without it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_document: Option<RemoteDocument>,

    /// Detached content referenced by the signature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_documents: Option<Vec<RemoteDocument>>,

    /// Conformance policy document (YAML or JSON).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<RemoteDocument>,

    /// Restricts the primary report to one signature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_id: Option<String>,

    #[serde(flatten)]
    pub extensions: BTreeMap<String, serde_json::Value>,
}

impl DataToValidate {
    /// The policy, if it carries non-empty content. A present-but-empty policy
    /// counts as no policy.
    pub fn effective_policy(&self) -> Option<&RemoteDocument> {
        self.policy.as_ref().filter(|p| p.has_content())
    }
}
