//! Component descriptor root type.

use serde::{Deserialize, Serialize};

use crate::element::{ComponentReference, Label, Resource, Source};
use crate::signature::Signature;

/// Schema version of the descriptor format.
pub const SCHEMA_VERSION_V2: &str = "v2";

/// Descriptor metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Schema version (e.g. `v2`).
    pub schema_version: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V2.to_string(),
        }
    }
}

/// Component identity and its elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSpec {
    /// Component name.
    pub name: String,
    /// Component version.
    pub version: String,
    /// Provider (`internal`, `external` or a free-form name).
    #[serde(default)]
    pub provider: String,
    /// Component labels.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    /// Sources the component was built from.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
    /// References to other components, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub component_references: Vec<ComponentReference>,
    /// Resources, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,
}

impl ComponentSpec {
    /// First resource with the given name.
    pub fn resource_by_name(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|res| res.meta.name == name)
    }

    /// First component reference with the given name.
    pub fn component_reference_by_name(&self, name: &str) -> Option<&ComponentReference> {
        self.component_references
            .iter()
            .find(|reference| reference.meta.name == name)
    }
}

/// A component descriptor together with its signatures.
///
/// Cloning yields an independent deep copy that can be reconciled or signed
/// without coordinating with the original.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    /// Descriptor metadata.
    pub meta: Metadata,
    /// The described component.
    pub component: ComponentSpec,
    /// Named signatures; excluded from the canonical form.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signatures: Vec<Signature>,
}

impl ComponentDescriptor {
    /// Creates an empty v2 descriptor for the given component.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            meta: Metadata::default(),
            component: ComponentSpec {
                name: name.into(),
                version: version.into(),
                ..ComponentSpec::default()
            },
            signatures: Vec::new(),
        }
    }

    /// First signature with the given name.
    pub fn signature_by_name(&self, name: &str) -> Option<&Signature> {
        self.signatures.iter().find(|sig| sig.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::DigestSpec;
    use crate::signature::SignatureSpec;
    use serde_json::json;

    #[test]
    fn missing_and_empty_lists_decode_identically() {
        let absent: ComponentDescriptor = serde_json::from_value(json!({
            "meta": {"schemaVersion": "v2"},
            "component": {"name": "c", "version": "v1"}
        }))
        .unwrap();
        let empty: ComponentDescriptor = serde_json::from_value(json!({
            "meta": {"schemaVersion": "v2"},
            "component": {
                "name": "c",
                "version": "v1",
                "componentReferences": [],
                "resources": []
            },
            "signatures": []
        }))
        .unwrap();
        assert_eq!(absent, empty);
    }

    #[test]
    fn signature_lookup_returns_first_match() {
        let mut cd = ComponentDescriptor::new("c", "v1");
        for value in ["first", "second"] {
            cd.signatures.push(Signature {
                name: "dup".into(),
                normalisation_version: String::new(),
                digest: DigestSpec::new("sha256", "", "00"),
                signature: SignatureSpec {
                    algorithm: "test".into(),
                    media_type: None,
                    value: value.into(),
                },
            });
        }
        assert_eq!(cd.signature_by_name("dup").unwrap().signature.value, "first");
        assert!(cd.signature_by_name("other").is_none());
    }
}
