//! Canonical normalisation and hashing primitives for component descriptors.
//!
//! Only the fields that participate in integrity are projected into the
//! canonical form: schema version, component name and version, and the
//! identity and digest of every component reference and resource. Everything
//! else (provider, labels, access, sources, signatures) may change without
//! invalidating an existing signature.
//!
#![deny(missing_docs)]

/// Canonical projection and deterministic serialization.
pub mod canonicalizer;
/// Descriptor digest computation and comparison.
pub mod digest;
mod encoder;
/// Hash algorithm registry.
pub mod hasher;
/// Normalisability checks run before projection.
pub mod validation;

pub use canonicalizer::{CanonicalizationError, CanonicalizationResult, Canonicalizer};
pub use digest::{compute_descriptor_digest, verify_descriptor_digest, DigestError};
pub use hasher::{hasher_for_name, HashError, HashFactory, Hasher, HasherRegistry};
pub use validation::validate_normalisable;
