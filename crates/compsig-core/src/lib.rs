//! Digest reconciliation, signing and verification of component descriptors.
//!
//! This crate provides:
//! - Digest reconciliation for component references and resources through
//!   caller supplied resolvers
//! - The [`Signer`] and [`Verifier`] capabilities and an RSASSA-PKCS1-V1_5
//!   implementation of both
//! - Sign and verify operations over the normalised descriptor digest
//!
//! Core invariants:
//! - A signature covers `hash(canonical_bytes(descriptor))`; signatures
//!   themselves are never part of the canonical form
//! - Verification never modifies the descriptor
//! - Elements marked `NO-DIGEST` / `EXCLUDE-FROM-SIGNATURE` are never resolved
//!
#![deny(missing_docs)]

/// Cancellation handle for resolvers.
pub mod context;
/// Error types for core operations.
pub mod errors;
/// Digest reconciliation.
pub mod reconcile;
/// RSA signer and verifier.
pub mod rsassa;
/// Sign and verify operations.
pub mod sign;
/// Signer and verifier capabilities.
pub mod signing;

pub use context::ResolveContext;
pub use errors::{KeyLoadError, ReconcileError, ResolveError, SignatureError, SigningError};
pub use reconcile::{add_digests_to_descriptor, ReconcileReport};
pub use rsassa::{RsaSigner, RsaVerifier, SignatureEncoding};
pub use sign::{
    sign_component_descriptor, sign_with_registry, verify_signed_component_descriptor,
    verify_signed_component_descriptor_with, verify_with_registry,
};
pub use signing::{Signer, SignerRegistry, Verifier, VerifierRegistry};
