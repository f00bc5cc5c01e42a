//! Sources, component references and resources of a component.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::digest::DigestSpec;

/// Access type marking an element without fetchable content.
pub const NONE_ACCESS_TYPE: &str = "None";

/// Name, version and extra identity shared by all component elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityObjectMeta {
    /// Element name, unique together with the extra identity.
    pub name: String,
    /// Element version.
    #[serde(default)]
    pub version: String,
    /// Additional identity attributes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_identity: BTreeMap<String, String>,
}

impl IdentityObjectMeta {
    /// Creates identity metadata without extra identity.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            extra_identity: BTreeMap::new(),
        }
    }

    /// Adds one extra identity attribute.
    pub fn with_extra_identity(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_identity.insert(key.into(), value.into());
        self
    }

    /// Full identity: extra identity plus `name` and `version`.
    pub fn identity(&self) -> BTreeMap<String, String> {
        let mut identity = self.extra_identity.clone();
        identity.insert("name".to_string(), self.name.clone());
        identity.insert("version".to_string(), self.version.clone());
        identity
    }
}

/// Free-form label attached to an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    /// Label name.
    pub name: String,
    /// Arbitrary JSON value.
    pub value: Value,
}

/// Opaque access payload; only the type discriminator is interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Access {
    /// Access type (e.g. `ociRegistry`, `github`, `None`).
    #[serde(rename = "type")]
    pub access_type: String,
    /// Type-specific fields, kept verbatim.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Access {
    /// Creates an access of the given type with the given fields.
    pub fn new(access_type: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            access_type: access_type.into(),
            fields,
        }
    }

    /// The explicit no-access marker.
    pub fn none() -> Self {
        Self::new(NONE_ACCESS_TYPE, Map::new())
    }

    /// Returns true if this is the no-access marker.
    pub fn is_none(&self) -> bool {
        self.access_type == NONE_ACCESS_TYPE
    }
}

/// Relation of a resource to the component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceRelation {
    /// Built and shipped with the component.
    #[default]
    Local,
    /// Consumed from a third party.
    External,
}

/// Source code the component was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    /// Identity of the source.
    #[serde(flatten)]
    pub meta: IdentityObjectMeta,
    /// Source type (e.g. `git`).
    #[serde(rename = "type", default)]
    pub source_type: String,
    /// Labels; not part of the canonical form.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    /// Where the source can be fetched from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<Access>,
}

/// Reference to another component descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentReference {
    /// Identity of the reference inside this component.
    #[serde(flatten)]
    pub meta: IdentityObjectMeta,
    /// Name of the referenced component.
    #[serde(default)]
    pub component_name: String,
    /// Labels; not part of the canonical form.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    /// Digest of the referenced descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<DigestSpec>,
}

impl ComponentReference {
    /// Creates a reference without digest.
    pub fn new(meta: IdentityObjectMeta, component_name: impl Into<String>) -> Self {
        Self {
            meta,
            component_name: component_name.into(),
            labels: Vec::new(),
            digest: None,
        }
    }

    /// Identifier used in error messages.
    pub fn element_id(&self) -> ElementId {
        ElementId::new(ElementKind::ComponentReference, &self.meta)
    }
}

/// Artifact delivered with the component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Identity of the resource.
    #[serde(flatten)]
    pub meta: IdentityObjectMeta,
    /// Resource type (e.g. `ociImage`).
    #[serde(rename = "type", default)]
    pub resource_type: String,
    /// Local or external.
    #[serde(default)]
    pub relation: ResourceRelation,
    /// Labels; not part of the canonical form.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    /// Where the content can be fetched from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<Access>,
    /// Digest of the content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<DigestSpec>,
}

impl Resource {
    /// Creates a local resource without access or digest.
    pub fn new(meta: IdentityObjectMeta, resource_type: impl Into<String>) -> Self {
        Self {
            meta,
            resource_type: resource_type.into(),
            relation: ResourceRelation::Local,
            labels: Vec::new(),
            access: None,
            digest: None,
        }
    }

    /// Returns true if the resource has fetchable content.
    pub fn has_access(&self) -> bool {
        self.access.as_ref().is_some_and(|access| !access.is_none())
    }

    /// Identifier used in error messages.
    pub fn element_id(&self) -> ElementId {
        ElementId::new(ElementKind::Resource, &self.meta)
    }
}

/// Kind of a digested element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// A component reference.
    ComponentReference,
    /// A resource.
    Resource,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::ComponentReference => write!(f, "componentReference"),
            ElementKind::Resource => write!(f, "resource"),
        }
    }
}

/// Kind, name and version of an element, attached to errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementId {
    /// Element kind.
    pub kind: ElementKind,
    /// Element name.
    pub name: String,
    /// Element version.
    pub version: String,
}

impl ElementId {
    fn new(kind: ElementKind, meta: &IdentityObjectMeta) -> Self {
        Self {
            kind,
            name: meta.name.clone(),
            version: meta.version.clone(),
        }
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.kind, self.name, self.version)
    }
}
