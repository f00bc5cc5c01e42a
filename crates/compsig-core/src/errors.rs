use std::path::PathBuf;

use compsig_canonical::{DigestError, HashError};
use compsig_schemas::{DigestSpec, ElementId};
use thiserror::Error;

/// Error returned by a digest resolver callback.
pub type ResolveError = Box<dyn std::error::Error + Send + Sync>;

/// Digest reconciliation errors.
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// The resolver recomputed a digest that differs from the stored one.
    #[error(
        "digest mismatch for {element} at {path}: descriptor has {}, resolver computed {}",
        .expected.value, .actual.value
    )]
    DigestMismatch {
        /// Offending element.
        element: ElementId,
        /// Location of the element in the descriptor.
        path: String,
        /// Digest stored in the descriptor.
        expected: DigestSpec,
        /// Digest returned by the resolver.
        actual: DigestSpec,
    },
    /// The resolver failed.
    #[error("failed resolving digest for {element} at {path}: {source}")]
    Resolver {
        /// Element being resolved.
        element: ElementId,
        /// Location of the element in the descriptor.
        path: String,
        /// Resolver error, unchanged.
        #[source]
        source: ResolveError,
    },
    /// The context was cancelled before reconciliation finished.
    #[error("digest reconciliation cancelled")]
    Cancelled,
}

/// Errors loading signing or verification keys.
#[derive(Error, Debug)]
pub enum KeyLoadError {
    /// Key file could not be read.
    #[error("failed opening key file {path}: {source}")]
    Io {
        /// Key file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Input is not a PEM block, or not one carrying a supported key type.
    #[error("failed decoding PEM formatted block in key: {0}")]
    Pem(String),
    /// The PEM block does not hold a parseable RSA key.
    #[error("failed parsing key: {0}")]
    Parse(String),
}

/// Errors raised by signer and verifier implementations.
#[derive(Error, Debug)]
pub enum SigningError {
    /// The digest names a hash algorithm the signer cannot use.
    #[error("hash algorithm {0} not supported for signing")]
    UnsupportedHashAlgorithm(String),
    /// The signature algorithm does not match the verifier.
    #[error("signature algorithm {actual} does not match expected {expected}")]
    AlgorithmMismatch {
        /// Algorithm the verifier implements.
        expected: String,
        /// Algorithm named in the signature.
        actual: String,
    },
    /// The signature media type is not understood.
    #[error("unsupported signature media type {0}")]
    UnsupportedMediaType(String),
    /// A hex field could not be decoded.
    #[error("failed decoding {field} from hex: {source}")]
    Hex {
        /// Field that failed to decode.
        field: &'static str,
        /// Decoder error.
        #[source]
        source: hex::FromHexError,
    },
    /// A PEM encoded signature is malformed.
    #[error("invalid PEM signature: {0}")]
    Pem(String),
    /// The cryptographic primitive failed.
    #[error("unable to verify signature: {0}")]
    Crypto(#[from] rsa::Error),
    /// The signature is not valid for the digest.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),
}

/// Errors of the sign and verify operations.
#[derive(Error, Debug)]
pub enum SignatureError {
    /// Descriptor digest computation failed (not normalisable, no hasher).
    #[error(transparent)]
    Digest(#[from] DigestError),
    /// Hash algorithm lookup failed.
    #[error(transparent)]
    Hash(#[from] HashError),
    /// The signer failed.
    #[error("failed signing hash of normalised component descriptor: {0}")]
    Signing(#[source] SigningError),
    /// No signature with the requested name exists.
    #[error("signature {0} not found in component descriptor")]
    SignatureNotFound(String),
    /// The signature bytes do not authenticate the signed digest.
    #[error("failed verifying signature {name}: {source}")]
    VerificationFailed {
        /// Signature name.
        name: String,
        /// Verifier error.
        #[source]
        source: SigningError,
    },
    /// The descriptor content no longer matches the signed digest.
    #[error(
        "normalised component descriptor does not match digest of signature {name}: signed {expected}, computed {actual}"
    )]
    DigestMismatch {
        /// Signature name.
        name: String,
        /// Signed digest value.
        expected: String,
        /// Recomputed digest value.
        actual: String,
    },
    /// No signer or verifier is registered for the signature algorithm.
    #[error("no signer or verifier registered for signature algorithm {0}")]
    UnknownAlgorithm(String),
}
