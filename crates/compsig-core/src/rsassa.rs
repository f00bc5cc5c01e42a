//! RSASSA-PKCS1-V1_5 signer and verifier backed by the `rsa` crate.
//!
//! Signatures cover the raw bytes of the hex decoded descriptor digest. The
//! signature value is either hex encoded
//! (`application/vnd.ocm.signature.rsa`) or a PEM `SIGNATURE` block carrying
//! an `Algorithm` header (`application/x-pem-file`).

use std::fs;
use std::path::Path;

use compsig_schemas::{
    ComponentDescriptor, DigestSpec, Signature, SignatureSpec, MEDIA_TYPE_PEM,
    MEDIA_TYPE_RSA_SIGNATURE, RSA_PKCS1_V15, SHA256, SIGNATURE_ALGORITHM_HEADER,
    SIGNATURE_PEM_BLOCK_TYPE,
};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use tracing::debug;

use crate::errors::{KeyLoadError, SigningError};
use crate::signing::{Signer, Verifier};

/// Encoding of the signature value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureEncoding {
    /// Lowercase hex, media type `application/vnd.ocm.signature.rsa`.
    #[default]
    Hex,
    /// PEM `SIGNATURE` block, media type `application/x-pem-file`.
    Pem,
}

impl SignatureEncoding {
    /// Maps a signature media type to its encoding. A missing media type
    /// means hex.
    pub fn from_media_type(media_type: Option<&str>) -> Result<Self, SigningError> {
        match media_type {
            None | Some("") | Some(MEDIA_TYPE_RSA_SIGNATURE) => Ok(SignatureEncoding::Hex),
            Some(MEDIA_TYPE_PEM) => Ok(SignatureEncoding::Pem),
            Some(other) => Err(SigningError::UnsupportedMediaType(other.to_string())),
        }
    }

    /// Media type recorded in produced signatures.
    pub fn media_type(&self) -> &'static str {
        match self {
            SignatureEncoding::Hex => MEDIA_TYPE_RSA_SIGNATURE,
            SignatureEncoding::Pem => MEDIA_TYPE_PEM,
        }
    }

    fn encode(&self, raw: Vec<u8>) -> Result<String, SigningError> {
        match self {
            SignatureEncoding::Hex => Ok(hex::encode(raw)),
            SignatureEncoding::Pem => {
                let mut block = pem::Pem::new(SIGNATURE_PEM_BLOCK_TYPE, raw);
                block
                    .headers_mut()
                    .add(SIGNATURE_ALGORITHM_HEADER, RSA_PKCS1_V15)
                    .map_err(|e| SigningError::Pem(e.to_string()))?;
                Ok(pem::encode(&block))
            }
        }
    }

    fn decode(&self, value: &str) -> Result<Vec<u8>, SigningError> {
        match self {
            SignatureEncoding::Hex => hex::decode(value).map_err(|source| SigningError::Hex {
                field: "signature",
                source,
            }),
            SignatureEncoding::Pem => {
                let block = pem::parse(value).map_err(|e| SigningError::Pem(e.to_string()))?;
                if block.tag() != SIGNATURE_PEM_BLOCK_TYPE {
                    return Err(SigningError::Pem(format!(
                        "unexpected block type {}",
                        block.tag()
                    )));
                }
                if let Some(algorithm) = block.headers().get(SIGNATURE_ALGORITHM_HEADER) {
                    if algorithm != RSA_PKCS1_V15 {
                        return Err(SigningError::AlgorithmMismatch {
                            expected: RSA_PKCS1_V15.to_string(),
                            actual: algorithm.to_string(),
                        });
                    }
                }
                Ok(block.into_contents())
            }
        }
    }
}

/// Signs descriptor digests with an RSA private key.
#[derive(Debug, Clone)]
pub struct RsaSigner {
    private_key: RsaPrivateKey,
    encoding: SignatureEncoding,
}

impl RsaSigner {
    /// Wraps a parsed private key.
    pub fn new(private_key: RsaPrivateKey, encoding: SignatureEncoding) -> Self {
        Self {
            private_key,
            encoding,
        }
    }

    /// Parses a PKCS#1 (`RSA PRIVATE KEY`) or PKCS#8 (`PRIVATE KEY`) PEM key.
    pub fn from_pem(input: &str, encoding: SignatureEncoding) -> Result<Self, KeyLoadError> {
        let block = pem::parse(input).map_err(|e| KeyLoadError::Pem(e.to_string()))?;
        let private_key = match block.tag() {
            "RSA PRIVATE KEY" => RsaPrivateKey::from_pkcs1_der(block.contents())
                .map_err(|e| KeyLoadError::Parse(e.to_string()))?,
            "PRIVATE KEY" => RsaPrivateKey::from_pkcs8_der(block.contents())
                .map_err(|e| KeyLoadError::Parse(e.to_string()))?,
            other => {
                return Err(KeyLoadError::Pem(format!(
                    "unsupported private key block type {other}"
                )))
            }
        };
        Ok(Self::new(private_key, encoding))
    }

    /// Reads a PEM private key from `path`.
    pub fn from_key_file(
        path: impl AsRef<Path>,
        encoding: SignatureEncoding,
    ) -> Result<Self, KeyLoadError> {
        Self::from_pem(&read_key_file(path.as_ref())?, encoding)
    }
}

impl Signer for RsaSigner {
    fn sign(
        &self,
        _descriptor: &ComponentDescriptor,
        digest: &DigestSpec,
    ) -> Result<SignatureSpec, SigningError> {
        let scheme = pkcs1v15_scheme(&digest.hash_algorithm)?;
        let hashed = hex::decode(&digest.value).map_err(|source| SigningError::Hex {
            field: "digest",
            source,
        })?;
        let raw = self.private_key.sign(scheme, &hashed)?;
        debug!(media_type = self.encoding.media_type(), "signed digest");

        Ok(SignatureSpec {
            algorithm: RSA_PKCS1_V15.to_string(),
            media_type: Some(self.encoding.media_type().to_string()),
            value: self.encoding.encode(raw)?,
        })
    }
}

/// Verifies RSA signatures with a public key.
#[derive(Debug, Clone)]
pub struct RsaVerifier {
    public_key: RsaPublicKey,
}

impl RsaVerifier {
    /// Wraps a parsed public key.
    pub fn new(public_key: RsaPublicKey) -> Self {
        Self { public_key }
    }

    /// Parses an SPKI (`PUBLIC KEY`) or PKCS#1 (`RSA PUBLIC KEY`) PEM key.
    pub fn from_pem(input: &str) -> Result<Self, KeyLoadError> {
        let block = pem::parse(input).map_err(|e| KeyLoadError::Pem(e.to_string()))?;
        let public_key = match block.tag() {
            "PUBLIC KEY" => RsaPublicKey::from_public_key_der(block.contents())
                .map_err(|e| KeyLoadError::Parse(e.to_string()))?,
            "RSA PUBLIC KEY" => RsaPublicKey::from_pkcs1_der(block.contents())
                .map_err(|e| KeyLoadError::Parse(e.to_string()))?,
            other => {
                return Err(KeyLoadError::Pem(format!(
                    "unsupported public key block type {other}"
                )))
            }
        };
        Ok(Self::new(public_key))
    }

    /// Reads a PEM public key from `path`.
    pub fn from_key_file(path: impl AsRef<Path>) -> Result<Self, KeyLoadError> {
        Self::from_pem(&read_key_file(path.as_ref())?)
    }
}

impl Verifier for RsaVerifier {
    fn verify(
        &self,
        _descriptor: &ComponentDescriptor,
        signature: &Signature,
    ) -> Result<(), SigningError> {
        if signature.signature.algorithm != RSA_PKCS1_V15 {
            return Err(SigningError::AlgorithmMismatch {
                expected: RSA_PKCS1_V15.to_string(),
                actual: signature.signature.algorithm.clone(),
            });
        }
        let encoding =
            SignatureEncoding::from_media_type(signature.signature.media_type.as_deref())?;
        let raw = encoding.decode(&signature.signature.value)?;
        let scheme = pkcs1v15_scheme(&signature.digest.hash_algorithm)?;
        let hashed = hex::decode(&signature.digest.value).map_err(|source| SigningError::Hex {
            field: "digest",
            source,
        })?;

        self.public_key.verify(scheme, &hashed, &raw)?;
        Ok(())
    }
}

fn pkcs1v15_scheme(hash_algorithm: &str) -> Result<Pkcs1v15Sign, SigningError> {
    if hash_algorithm.eq_ignore_ascii_case(SHA256) {
        Ok(Pkcs1v15Sign::new::<Sha256>())
    } else {
        Err(SigningError::UnsupportedHashAlgorithm(
            hash_algorithm.to_string(),
        ))
    }
}

fn read_key_file(path: &Path) -> Result<String, KeyLoadError> {
    fs::read_to_string(path).map_err(|source| KeyLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
