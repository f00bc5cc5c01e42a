//! Component descriptor model for signed software manifests.
//!
//! This crate provides the typed descriptor structures consumed by the
//! integrity layer: the component identity, its sources, component references
//! and resources, the per-element digests, and the list of named signatures.
//! Decoding defaults are applied by serde; no schema validation happens here.

#![deny(missing_docs)]

pub mod descriptor;
pub mod digest;
pub mod element;
pub mod signature;

pub use descriptor::{ComponentDescriptor, ComponentSpec, Metadata, SCHEMA_VERSION_V2};
pub use digest::{
    DigestSpec, EXCLUDE_FROM_SIGNATURE, GENERIC_BLOB_DIGEST_V1, JSON_NORMALISATION_V1, NO_DIGEST,
    OCI_ARTIFACT_DIGEST_V1, SHA256,
};
pub use element::{
    Access, ComponentReference, ElementId, ElementKind, IdentityObjectMeta, Label, Resource,
    ResourceRelation, Source, NONE_ACCESS_TYPE,
};
pub use signature::{
    Signature, SignatureSpec, MEDIA_TYPE_PEM, MEDIA_TYPE_RSA_SIGNATURE, NORMALISATION_VERSION_V1,
    RSA_PKCS1_V15, SIGNATURE_ALGORITHM_HEADER, SIGNATURE_PEM_BLOCK_TYPE,
};
