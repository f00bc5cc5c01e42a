//! Digest command implementation.

use compsig_canonical::{compute_descriptor_digest, Canonicalizer, HasherRegistry};

use crate::descriptor_io::read_descriptor;
use crate::output::format_json;

pub fn run(descriptor: Option<String>, hash: String) -> Result<(), Box<dyn std::error::Error>> {
    let cd = read_descriptor(descriptor.as_deref())?;

    let mut hasher = HasherRegistry::default().signing_hasher_for_name(&hash)?;
    let digest = compute_descriptor_digest(&cd, &Canonicalizer::new(), &mut hasher)?;

    println!("{}", format_json(&serde_json::to_value(&digest)?));
    Ok(())
}
