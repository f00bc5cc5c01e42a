//! Signing and verification of component descriptors.

use compsig_canonical::{compute_descriptor_digest, Canonicalizer, Hasher, HasherRegistry};
use compsig_schemas::{ComponentDescriptor, Signature, NORMALISATION_VERSION_V1};
use tracing::{debug, info, warn};

use crate::errors::SignatureError;
use crate::signing::{Signer, SignerRegistry, Verifier, VerifierRegistry};

/// Signs the normalised descriptor and appends the signature as `signature_name`.
///
/// The descriptor must be normalisable: every reference carries a digest and
/// every resource with access carries one. Existing signatures are kept and
/// do not influence the signed digest.
///
/// # Errors
///
/// - [`SignatureError::Digest`] if the descriptor is not normalisable or
///   `hasher` is the `NO-DIGEST` marker
/// - [`SignatureError::Signing`] if the signer fails
pub fn sign_component_descriptor(
    descriptor: &mut ComponentDescriptor,
    signer: &dyn Signer,
    hasher: &mut Hasher,
    signature_name: &str,
) -> Result<(), SignatureError> {
    let digest = compute_descriptor_digest(descriptor, &Canonicalizer::new(), hasher)?;
    debug!(value = %digest.value, algorithm = %digest.hash_algorithm, "computed descriptor digest");

    let signature = signer
        .sign(descriptor, &digest)
        .map_err(SignatureError::Signing)?;

    descriptor.signatures.push(Signature {
        name: signature_name.to_string(),
        normalisation_version: NORMALISATION_VERSION_V1.to_string(),
        digest,
        signature,
    });
    info!(
        component = %descriptor.component.name,
        version = %descriptor.component.version,
        signature = signature_name,
        "signed component descriptor"
    );
    Ok(())
}

/// Signs with the signer registered for `algorithm` and the hasher named
/// `hash_algorithm`.
///
/// # Errors
///
/// Same as [`sign_component_descriptor`], plus
/// [`SignatureError::UnknownAlgorithm`] if no signer is registered for
/// `algorithm` and [`SignatureError::Hash`] if `hash_algorithm` is unknown or
/// is the `NO-DIGEST` marker.
pub fn sign_with_registry(
    descriptor: &mut ComponentDescriptor,
    signers: &SignerRegistry,
    hashers: &HasherRegistry,
    algorithm: &str,
    hash_algorithm: &str,
    signature_name: &str,
) -> Result<(), SignatureError> {
    let signer = signers
        .get(algorithm)
        .ok_or_else(|| SignatureError::UnknownAlgorithm(algorithm.to_string()))?;
    let mut hasher = hashers.signing_hasher_for_name(hash_algorithm)?;
    sign_component_descriptor(descriptor, signer, &mut hasher, signature_name)
}

/// Verifies the signature named `signature_name` using the default hashers.
///
/// See [`verify_signed_component_descriptor_with`].
pub fn verify_signed_component_descriptor(
    descriptor: &ComponentDescriptor,
    verifier: &dyn Verifier,
    signature_name: &str,
) -> Result<(), SignatureError> {
    verify_signed_component_descriptor_with(
        descriptor,
        verifier,
        &HasherRegistry::default(),
        signature_name,
    )
}

/// Verifies the signature named `signature_name`.
///
/// The verifier checks the signature bytes against the stored digest; the
/// descriptor digest is then recomputed with the stored hash algorithm and
/// compared with the stored value. The descriptor is not modified.
///
/// # Errors
///
/// - [`SignatureError::SignatureNotFound`] if no signature has that name
/// - [`SignatureError::DigestMismatch`] if the stored digest does not match
///   the descriptor content, whether the content or the stored digest changed
/// - [`SignatureError::VerificationFailed`] if the verifier rejects a
///   signature whose digest still matches the content
/// - [`SignatureError::Hash`] if the stored hash algorithm is unknown
/// - [`SignatureError::Digest`] if the descriptor is not normalisable
pub fn verify_signed_component_descriptor_with(
    descriptor: &ComponentDescriptor,
    verifier: &dyn Verifier,
    hashers: &HasherRegistry,
    signature_name: &str,
) -> Result<(), SignatureError> {
    let signature = find_signature(descriptor, signature_name)?;
    verify_signature(descriptor, signature, verifier, hashers)
}

/// Verifies `signature_name` with the verifier registered for its algorithm.
///
/// # Errors
///
/// Same as [`verify_signed_component_descriptor_with`], plus
/// [`SignatureError::UnknownAlgorithm`] if no verifier is registered for the
/// signature algorithm.
pub fn verify_with_registry(
    descriptor: &ComponentDescriptor,
    verifiers: &VerifierRegistry,
    hashers: &HasherRegistry,
    signature_name: &str,
) -> Result<(), SignatureError> {
    let signature = find_signature(descriptor, signature_name)?;
    let algorithm = &signature.signature.algorithm;
    let verifier = verifiers
        .get(algorithm)
        .ok_or_else(|| SignatureError::UnknownAlgorithm(algorithm.clone()))?;
    verify_signature(descriptor, signature, verifier, hashers)
}

fn find_signature<'a>(
    descriptor: &'a ComponentDescriptor,
    signature_name: &str,
) -> Result<&'a Signature, SignatureError> {
    descriptor
        .signature_by_name(signature_name)
        .ok_or_else(|| SignatureError::SignatureNotFound(signature_name.to_string()))
}

fn verify_signature(
    descriptor: &ComponentDescriptor,
    signature: &Signature,
    verifier: &dyn Verifier,
    hashers: &HasherRegistry,
) -> Result<(), SignatureError> {
    let authentic = verifier.verify(descriptor, signature);
    let drift = digest_drift(descriptor, signature, hashers);

    match (authentic, drift) {
        (_, Ok(Some(mismatch))) => Err(mismatch),
        (Err(source), _) => {
            warn!(signature = %signature.name, error = %source, "signature rejected");
            Err(SignatureError::VerificationFailed {
                name: signature.name.clone(),
                source,
            })
        }
        (Ok(()), Err(err)) => Err(err),
        (Ok(()), Ok(None)) => {
            info!(signature = %signature.name, "signature verified");
            Ok(())
        }
    }
}

/// Recomputes the descriptor digest and returns the mismatch, if any.
fn digest_drift(
    descriptor: &ComponentDescriptor,
    signature: &Signature,
    hashers: &HasherRegistry,
) -> Result<Option<SignatureError>, SignatureError> {
    let mut hasher = hashers.signing_hasher_for_name(&signature.digest.hash_algorithm)?;
    let computed = compute_descriptor_digest(descriptor, &Canonicalizer::new(), &mut hasher)?;
    if !signature.digest.value.is_empty() && computed.value == signature.digest.value {
        return Ok(None);
    }

    warn!(
        signature = %signature.name,
        signed = %signature.digest.value,
        computed = %computed.value,
        "descriptor digest mismatch"
    );
    Ok(Some(SignatureError::DigestMismatch {
        name: signature.name.clone(),
        expected: signature.digest.value.clone(),
        actual: computed.value,
    }))
}
