//! Descriptor digest computation.
//!
//! The descriptor digest is `hash(canonical_bytes(descriptor))`, hex encoded.
//! Signatures are excluded from the canonical form, so adding a signature
//! never changes the digest that existing signatures cover.

use compsig_schemas::{ComponentDescriptor, DigestSpec};

use crate::{CanonicalizationError, Canonicalizer, HashError, Hasher, HasherRegistry};

/// Error during descriptor digest computation.
#[derive(thiserror::Error, Debug)]
pub enum DigestError {
    /// Canonicalization failed.
    #[error("failed normalising component descriptor: {0}")]
    Canonicalization(#[from] CanonicalizationError),
    /// Hash algorithm lookup or hashing failed.
    #[error("failed hashing component descriptor: {0}")]
    Hash(#[from] HashError),
}

/// Computes the digest of a normalisable descriptor with `hasher`.
///
/// # Example
///
/// ```rust
/// use compsig_canonical::{compute_descriptor_digest, hasher_for_name, Canonicalizer};
/// use compsig_schemas::ComponentDescriptor;
///
/// let cd = ComponentDescriptor::new("example.com/component", "v1.0.0");
/// let mut hasher = hasher_for_name("sha256")?;
/// let digest = compute_descriptor_digest(&cd, &Canonicalizer::new(), &mut hasher)?;
/// assert_eq!(digest.hash_algorithm, "sha256");
/// assert_eq!(digest.normalisation_algorithm, "jsonNormalisation/v1");
/// assert_eq!(digest.value.len(), 64);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Errors
///
/// Returns [`DigestError`] if the descriptor is not normalisable or the
/// hasher cannot produce a digest (the `NO-DIGEST` marker).
pub fn compute_descriptor_digest(
    descriptor: &ComponentDescriptor,
    canonicalizer: &Canonicalizer,
    hasher: &mut Hasher,
) -> Result<DigestSpec, DigestError> {
    let result = canonicalizer.canonicalize(descriptor)?;
    let hash = hasher.hash(&result.bytes)?;
    Ok(DigestSpec::new(
        hasher.algorithm_name(),
        canonicalizer.normalisation_algorithm(),
        hex::encode(hash),
    ))
}

/// Recomputes the descriptor digest with the algorithm named in `claimed`
/// and compares the hex values.
///
/// Returns `true` if the claimed digest matches the current content.
///
/// # Errors
///
/// Returns [`DigestError`] if the claimed algorithm is unknown or the
/// descriptor is not normalisable.
pub fn verify_descriptor_digest(
    descriptor: &ComponentDescriptor,
    claimed: &DigestSpec,
    canonicalizer: &Canonicalizer,
    registry: &HasherRegistry,
) -> Result<bool, DigestError> {
    let mut hasher = registry.signing_hasher_for_name(&claimed.hash_algorithm)?;
    let computed = compute_descriptor_digest(descriptor, canonicalizer, &mut hasher)?;
    Ok(!claimed.value.is_empty() && computed.value == claimed.value)
}
