//! Wire-to-internal document conversion.

use crate::{Document, RemoteDocument};

/// Convert a wire document into the internal model.
///
/// A document carrying a digest algorithm becomes [`Document::Digest`] with
/// `bytes` as the digest value; anything else is held in memory, with
/// missing bytes treated as empty content.
pub fn to_document(remote: Option<&RemoteDocument>) -> Option<Document> {
    let remote = remote?;
    let name = remote.name.clone();
    let bytes = remote.bytes.clone().unwrap_or_default();

    Some(match remote.digest_algorithm {
        Some(algorithm) => Document::Digest {
            name,
            algorithm,
            digest: bytes,
        },
        None => Document::InMemory { name, bytes },
    })
}

/// Convert a list of wire documents. An absent list yields an empty one.
pub fn to_documents(remotes: Option<&[RemoteDocument]>) -> Vec<Document> {
    remotes
        .unwrap_or_default()
        .iter()
        .filter_map(|r| to_document(Some(r)))
        .collect()
}
