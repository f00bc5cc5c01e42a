use std::collections::BTreeMap;
use std::fmt;

use compsig_schemas::{ComponentDescriptor, DigestSpec, Signature, SignatureSpec};

use crate::errors::SigningError;

/// Produces a signature over a descriptor digest.
pub trait Signer {
    /// Signs `digest`, the digest of the normalised `descriptor`.
    fn sign(
        &self,
        descriptor: &ComponentDescriptor,
        digest: &DigestSpec,
    ) -> Result<SignatureSpec, SigningError>;
}

/// Checks that a signature authenticates its digest.
///
/// Verifiers only check the signature bytes against `signature.digest`;
/// comparing that digest with the descriptor content is the caller's job.
pub trait Verifier {
    /// Verifies `signature` stored in `descriptor`.
    fn verify(
        &self,
        descriptor: &ComponentDescriptor,
        signature: &Signature,
    ) -> Result<(), SigningError>;
}

/// Signers keyed by signature algorithm name.
#[derive(Default)]
pub struct SignerRegistry {
    signers: BTreeMap<String, Box<dyn Signer + Send + Sync>>,
}

impl SignerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `signer` for `algorithm`, replacing an earlier one.
    pub fn register(&mut self, algorithm: &str, signer: Box<dyn Signer + Send + Sync>) {
        self.signers.insert(algorithm.to_string(), signer);
    }

    /// Returns the signer registered for `algorithm`.
    pub fn get(&self, algorithm: &str) -> Option<&(dyn Signer + Send + Sync)> {
        self.signers.get(algorithm).map(|s| s.as_ref())
    }

    /// Registered algorithm names.
    pub fn algorithms(&self) -> Vec<&str> {
        self.signers.keys().map(String::as_str).collect()
    }
}

impl fmt::Debug for SignerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.algorithms()).finish()
    }
}

/// Verifiers keyed by signature algorithm name.
#[derive(Default)]
pub struct VerifierRegistry {
    verifiers: BTreeMap<String, Box<dyn Verifier + Send + Sync>>,
}

impl VerifierRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `verifier` for `algorithm`, replacing an earlier one.
    pub fn register(&mut self, algorithm: &str, verifier: Box<dyn Verifier + Send + Sync>) {
        self.verifiers.insert(algorithm.to_string(), verifier);
    }

    /// Returns the verifier registered for `algorithm`.
    pub fn get(&self, algorithm: &str) -> Option<&(dyn Verifier + Send + Sync)> {
        self.verifiers.get(algorithm).map(|v| v.as_ref())
    }

    /// Registered algorithm names.
    pub fn algorithms(&self) -> Vec<&str> {
        self.verifiers.keys().map(String::as_str).collect()
    }
}

impl fmt::Debug for VerifierRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.algorithms()).finish()
    }
}
