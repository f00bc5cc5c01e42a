use compsig_schemas::{ComponentDescriptor, DigestSpec, ElementId};

use crate::canonicalizer::{CanonicalizationError, Path};

fn is_complete(digest: &DigestSpec) -> bool {
    !digest.hash_algorithm.is_empty() && !digest.value.is_empty()
}

/// Checks that every reference and resource can be projected.
///
/// - component references must carry a digest (or the exclusion digest);
/// - resources with fetchable access must carry a digest;
/// - resources without access may only carry the exclusion digest.
///
/// Does not check that the digests are correct. Returns the elements marked
/// as excluded from signing.
pub fn validate_normalisable(
    descriptor: &ComponentDescriptor,
) -> Result<Vec<ElementId>, CanonicalizationError> {
    let mut excluded = Vec::new();
    let path = Path::root();

    let references = path.push_field("componentReferences");
    for (idx, reference) in descriptor.component.component_references.iter().enumerate() {
        match &reference.digest {
            Some(digest) if digest.is_excluded() => excluded.push(reference.element_id()),
            Some(digest) if is_complete(digest) => {}
            _ => {
                return Err(CanonicalizationError::NotNormalisable {
                    element: reference.element_id(),
                    path: references.push_index(idx).to_string(),
                })
            }
        }
    }

    let resources = path.push_field("resources");
    for (idx, res) in descriptor.component.resources.iter().enumerate() {
        match (&res.digest, res.has_access()) {
            (Some(digest), _) if digest.is_excluded() => excluded.push(res.element_id()),
            (Some(digest), true) if is_complete(digest) => {}
            (None, false) => {}
            (Some(_), false) => {
                return Err(CanonicalizationError::InconsistentDigest {
                    element: res.element_id(),
                    path: resources.push_index(idx).to_string(),
                })
            }
            (_, true) => {
                return Err(CanonicalizationError::NotNormalisable {
                    element: res.element_id(),
                    path: resources.push_index(idx).to_string(),
                })
            }
        }
    }

    Ok(excluded)
}
