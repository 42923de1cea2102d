//! # Manifest Digest
//!
//! SHA-256 over the JSON serialization of a [`Manifest`]. Because the manifest
//! and every nested map are ordered, equal manifests always produce equal
//! digests. The CLI prints the digest after a rebuild so two runs can be
//! compared at a glance.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::CoreResult;
use crate::record::Manifest;

/// Hex-encoded SHA-256 digest of a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManifestDigest(String);

impl ManifestDigest {
    /// Compute the digest of a manifest.
    pub fn of(manifest: &Manifest) -> CoreResult<Self> {
        let bytes = serde_json::to_vec(manifest)?;
        Ok(Self::of_bytes(&bytes))
    }

    /// Compute the digest of already-serialized bytes.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let hash = Sha256::digest(bytes);
        Self(hash.iter().map(|b| format!("{b:02x}")).collect())
    }

    /// The 64-character lowercase hex string.
    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ManifestDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_manifest_digest_is_stable() {
        let a = ManifestDigest::of(&Manifest::new()).unwrap();
        let b = ManifestDigest::of(&Manifest::new()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_hex().len(), 64);
        // sha256("{}")
        assert_eq!(
            a.as_hex(),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }
}
