//! Digest descriptor shared by references, resources and signatures.

use serde::{Deserialize, Serialize};

/// Canonical name of the SHA-256 hash algorithm.
pub const SHA256: &str = "sha256";

/// Hash algorithm of the exclusion digest; has no hashing semantics.
pub const NO_DIGEST: &str = "NO-DIGEST";

/// Value (and normalisation) of the exclusion digest.
pub const EXCLUDE_FROM_SIGNATURE: &str = "EXCLUDE-FROM-SIGNATURE";

/// Normalisation of component descriptors (used for references and signatures).
pub const JSON_NORMALISATION_V1: &str = "jsonNormalisation/v1";

/// Normalisation of OCI artifacts (manifest digest).
pub const OCI_ARTIFACT_DIGEST_V1: &str = "ociArtifactDigest/v1";

/// Normalisation of plain blobs.
pub const GENERIC_BLOB_DIGEST_V1: &str = "genericBlobDigest/v1";

/// Hash algorithm, normalisation algorithm and value identifying some content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestSpec {
    /// Hash algorithm name (e.g. `sha256`).
    pub hash_algorithm: String,
    /// How the content was normalised before hashing (e.g. `jsonNormalisation/v1`).
    pub normalisation_algorithm: String,
    /// Lowercase hex digest, or [`EXCLUDE_FROM_SIGNATURE`].
    pub value: String,
}

impl DigestSpec {
    /// Creates a digest spec from its three parts.
    pub fn new(
        hash_algorithm: impl Into<String>,
        normalisation_algorithm: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            hash_algorithm: hash_algorithm.into(),
            normalisation_algorithm: normalisation_algorithm.into(),
            value: value.into(),
        }
    }

    /// The reserved digest marking an element as outside the signature scope.
    pub fn exclude_from_signature() -> Self {
        Self::new(NO_DIGEST, EXCLUDE_FROM_SIGNATURE, EXCLUDE_FROM_SIGNATURE)
    }

    /// Returns true for the exclusion sentinel.
    ///
    /// All three fields must match; the hash algorithm name is compared
    /// case-insensitively like every other hasher lookup.
    pub fn is_excluded(&self) -> bool {
        self.hash_algorithm.eq_ignore_ascii_case(NO_DIGEST)
            && self.normalisation_algorithm == EXCLUDE_FROM_SIGNATURE
            && self.value == EXCLUDE_FROM_SIGNATURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_spec_uses_camel_case_keys() {
        let digest = DigestSpec::new(SHA256, JSON_NORMALISATION_V1, "00");
        assert_eq!(
            serde_json::to_string(&digest).unwrap(),
            r#"{"hashAlgorithm":"sha256","normalisationAlgorithm":"jsonNormalisation/v1","value":"00"}"#
        );
    }

    #[test]
    fn exclusion_sentinel_is_recognised() {
        assert!(DigestSpec::exclude_from_signature().is_excluded());
        assert!(DigestSpec::new("no-digest", EXCLUDE_FROM_SIGNATURE, EXCLUDE_FROM_SIGNATURE)
            .is_excluded());
        assert!(!DigestSpec::new(SHA256, OCI_ARTIFACT_DIGEST_V1, "abcd").is_excluded());
    }

    #[test]
    fn partial_sentinel_is_not_an_exclusion() {
        assert!(
            !DigestSpec::new(SHA256, OCI_ARTIFACT_DIGEST_V1, EXCLUDE_FROM_SIGNATURE).is_excluded()
        );
        assert!(!DigestSpec::new(NO_DIGEST, "", "").is_excluded());
        assert!(!DigestSpec::new(NO_DIGEST, JSON_NORMALISATION_V1, "00").is_excluded());
    }
}
