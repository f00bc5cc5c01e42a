//! Named signatures over a descriptor digest.

use serde::{Deserialize, Serialize};

use crate::digest::DigestSpec;

/// Signature algorithm identifier for RSASSA-PKCS1-v1_5.
pub const RSA_PKCS1_V15: &str = "RSASSA-PKCS1-V1_5";

/// Media type of a hex encoded RSA signature.
pub const MEDIA_TYPE_RSA_SIGNATURE: &str = "application/vnd.ocm.signature.rsa";

/// Media type of a PEM encoded signature.
pub const MEDIA_TYPE_PEM: &str = "application/x-pem-file";

/// PEM block type of a signature.
pub const SIGNATURE_PEM_BLOCK_TYPE: &str = "SIGNATURE";

/// PEM header naming the signature algorithm.
pub const SIGNATURE_ALGORITHM_HEADER: &str = "Algorithm";

/// Normalisation version recorded on signatures.
pub const NORMALISATION_VERSION_V1: &str = "v1";

/// Signature algorithm, optional media type and encoded signature value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureSpec {
    /// Signature algorithm (e.g. `RSASSA-PKCS1-V1_5`).
    pub algorithm: String,
    /// Encoding of `value`; hex when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    /// Hex signature bytes or a PEM block.
    pub value: String,
}

/// A named signature attached to a component descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    /// Selection key.
    pub name: String,
    /// Normalisation version used to build the signed digest.
    #[serde(default)]
    pub normalisation_version: String,
    /// The signed descriptor digest.
    pub digest: DigestSpec,
    /// The signature over `digest`.
    pub signature: SignatureSpec,
}
