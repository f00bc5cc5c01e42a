//! Canonicalize command implementation.

use compsig_canonical::Canonicalizer;

use crate::descriptor_io::read_descriptor;

pub fn run(descriptor: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let cd = read_descriptor(descriptor.as_deref())?;

    let result = Canonicalizer::new()
        .canonicalize(&cd)
        .map_err(|e| format!("Canonicalization failed: {}", e))?;

    for element in &result.excluded {
        tracing::debug!(%element, "excluded from signature");
    }
    println!("{}", String::from_utf8_lossy(&result.bytes));
    Ok(())
}
