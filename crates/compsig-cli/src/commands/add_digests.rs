//! Add-digests command implementation.
//!
//! Digests come from a JSON file instead of a registry:
//!
//! ```json
//! {
//!   "componentReferences": { "<name>": { "hashAlgorithm": "...", ... } },
//!   "resources": { "<name>": { "hashAlgorithm": "...", ... } }
//! }
//! ```

use std::collections::BTreeMap;

use compsig_core::{add_digests_to_descriptor, ResolveContext, ResolveError};
use compsig_schemas::{ComponentDescriptor, ComponentReference, DigestSpec, Resource};
use serde::Deserialize;
use thiserror::Error;

use crate::descriptor_io::{read_descriptor, write_descriptor};

/// Digests keyed by element name.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DigestMap {
    #[serde(default)]
    component_references: BTreeMap<String, DigestSpec>,
    #[serde(default)]
    resources: BTreeMap<String, DigestSpec>,
}

#[derive(Error, Debug)]
enum DigestMapError {
    #[error("no digest for component reference {0} in digest map")]
    MissingReference(String),
    #[error("no digest for resource {0} in digest map")]
    MissingResource(String),
}

impl DigestMap {
    fn reference(
        &self,
        _: &ResolveContext,
        _: &ComponentDescriptor,
        reference: &ComponentReference,
    ) -> Result<DigestSpec, ResolveError> {
        let name = &reference.meta.name;
        self.component_references
            .get(name)
            .cloned()
            .ok_or_else(|| DigestMapError::MissingReference(name.clone()).into())
    }

    fn resource(
        &self,
        _: &ResolveContext,
        _: &ComponentDescriptor,
        resource: &Resource,
    ) -> Result<DigestSpec, ResolveError> {
        let name = &resource.meta.name;
        self.resources
            .get(name)
            .cloned()
            .ok_or_else(|| DigestMapError::MissingResource(name.clone()).into())
    }
}

pub fn run(
    descriptor: String,
    digests: String,
    out: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut cd = read_descriptor(Some(&descriptor))?;

    let map_str = std::fs::read_to_string(&digests)
        .map_err(|e| format!("Failed to read file {}: {}", digests, e))?;
    let map: DigestMap =
        serde_json::from_str(&map_str).map_err(|e| format!("Invalid digest map: {}", e))?;

    let report = add_digests_to_descriptor(
        &ResolveContext::new(),
        &mut cd,
        |ctx: &ResolveContext, cd: &ComponentDescriptor, r: &ComponentReference| {
            map.reference(ctx, cd, r)
        },
        |ctx: &ResolveContext, cd: &ComponentDescriptor, r: &Resource| map.resource(ctx, cd, r),
    )?;

    eprintln!(
        "filled {}, verified {}, excluded {}, skipped {}",
        report.filled, report.verified, report.excluded, report.skipped
    );
    write_descriptor(&cd, out.as_deref())
}
