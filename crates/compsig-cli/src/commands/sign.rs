//! Sign command implementation.

use clap::ValueEnum;
use compsig_canonical::HasherRegistry;
use compsig_core::{sign_component_descriptor, RsaSigner, SignatureEncoding};

use crate::descriptor_io::{read_descriptor, write_descriptor};

/// Signature value encoding selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MediaType {
    /// Hex encoded signature (application/vnd.ocm.signature.rsa)
    Hex,
    /// PEM SIGNATURE block (application/x-pem-file)
    Pem,
}

impl From<MediaType> for SignatureEncoding {
    fn from(media_type: MediaType) -> Self {
        match media_type {
            MediaType::Hex => SignatureEncoding::Hex,
            MediaType::Pem => SignatureEncoding::Pem,
        }
    }
}

pub fn run(
    descriptor: String,
    private_key: String,
    name: String,
    hash: String,
    media_type: MediaType,
    out: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut cd = read_descriptor(Some(&descriptor))?;

    let signer = RsaSigner::from_key_file(&private_key, media_type.into())?;
    let mut hasher = HasherRegistry::default().signing_hasher_for_name(&hash)?;
    sign_component_descriptor(&mut cd, &signer, &mut hasher, &name)?;

    write_descriptor(&cd, out.as_deref())
}
