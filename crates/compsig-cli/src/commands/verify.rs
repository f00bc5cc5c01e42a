//! Verify command implementation.

use compsig_core::{verify_signed_component_descriptor, RsaVerifier, SignatureError};
use serde_json::json;

use crate::descriptor_io::read_descriptor;
use crate::output::format_json;

/// Classifies a verification failure for reporting.
fn failure_kind(err: &SignatureError) -> &'static str {
    match err {
        SignatureError::VerificationFailed { .. } => "authenticity",
        SignatureError::DigestMismatch { .. } => "content-drift",
        SignatureError::SignatureNotFound(_) => "not-found",
        _ => "error",
    }
}

pub fn run(
    descriptor: String,
    public_key: String,
    name: String,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let cd = read_descriptor(Some(&descriptor))?;
    let verifier = RsaVerifier::from_key_file(&public_key)?;

    let result = verify_signed_component_descriptor(&cd, &verifier, &name);

    if json_output {
        let report = match &result {
            Ok(()) => json!({
                "signature": name,
                "verified": true,
            }),
            Err(e) => json!({
                "signature": name,
                "verified": false,
                "failure": failure_kind(e),
                "error": e.to_string(),
            }),
        };
        println!("{}", format_json(&report));
    } else {
        match &result {
            Ok(()) => println!("signature {} verified", name),
            Err(e) => eprintln!("signature {} failed ({}): {}", name, failure_kind(e), e),
        }
    }

    if result.is_err() {
        std::process::exit(1);
    }
    Ok(())
}
