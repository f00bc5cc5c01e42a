use compsig_schemas::{
    ComponentDescriptor, DigestSpec, ElementId, IdentityObjectMeta, JSON_NORMALISATION_V1,
};
use serde_json::{Map, Value};
use std::fmt;

use crate::encoder::to_canonical_vec;
use crate::validation::validate_normalisable;

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug)]
pub enum CanonicalizationError {
    /// A reference or resource lacks a digest and is not excluded from signing.
    #[error("can not normalise component-descriptor: missing digest in {element} at {path}")]
    NotNormalisable {
        /// Offending element.
        element: ElementId,
        /// Location inside the descriptor.
        path: String,
    },
    /// A resource without fetchable content carries a digest.
    #[error("{element} at {path} has no access but a digest; only the exclusion digest is allowed")]
    InconsistentDigest {
        /// Offending element.
        element: ElementId,
        /// Location inside the descriptor.
        path: String,
    },
    /// The canonical structure could not be encoded.
    #[error("canonical encoding failed: {0}")]
    Serialization(String),
}

/// Result of canonicalization.
#[derive(Debug)]
pub struct CanonicalizationResult {
    /// Canonical UTF-8 bytes for the descriptor.
    pub bytes: Vec<u8>,
    /// Elements whose digest is the exclusion sentinel.
    pub excluded: Vec<ElementId>,
}

/// Helper for building descriptor paths in error messages.
#[derive(Debug, Clone)]
pub(crate) struct Path {
    segments: Vec<String>,
}

impl Path {
    pub(crate) fn root() -> Self {
        Self {
            segments: vec!["component".to_string()],
        }
    }

    pub(crate) fn push_field(&self, field: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(field.to_string());
        Self { segments }
    }

    pub(crate) fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        if let Some(last) = segments.last_mut() {
            last.push_str(&format!("[{}]", index));
        }
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// Value of a canonical entry.
#[derive(Debug, Clone, PartialEq)]
enum Node {
    Str(String),
    /// Object-like level: sorted by key before encoding.
    Entries(Vec<Entry>),
    /// Semantically ordered sequence: never reordered.
    List(Vec<Node>),
}

/// Single-key object of the canonical form.
#[derive(Debug, Clone, PartialEq)]
struct Entry {
    key: String,
    value: Node,
}

impl Entry {
    fn string(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: Node::Str(value.to_string()),
        }
    }

    fn entries(key: &str, entries: Vec<Entry>) -> Self {
        Self {
            key: key.to_string(),
            value: Node::Entries(entries),
        }
    }

    fn list(key: &str, items: Vec<Node>) -> Self {
        Self {
            key: key.to_string(),
            value: Node::List(items),
        }
    }

    fn into_value(self) -> Value {
        let mut map = Map::new();
        map.insert(self.key, self.value.into_value());
        Value::Object(map)
    }
}

impl Node {
    fn into_value(self) -> Value {
        match self {
            Node::Str(s) => Value::String(s),
            Node::Entries(entries) => {
                Value::Array(entries.into_iter().map(Entry::into_value).collect())
            }
            Node::List(items) => Value::Array(items.into_iter().map(Node::into_value).collect()),
        }
    }
}

/// Sorts every object-like level by key, recursively; lists keep their order.
fn deep_sort(node: &mut Node) {
    match node {
        Node::Str(_) => {}
        Node::Entries(entries) => {
            for entry in entries.iter_mut() {
                deep_sort(&mut entry.value);
            }
            entries.sort_by(|a, b| a.key.cmp(&b.key));
        }
        Node::List(items) => {
            for item in items.iter_mut() {
                deep_sort(item);
            }
        }
    }
}

/// Canonicalizer that emits deterministic bytes for a component descriptor.
#[derive(Debug, Clone, Default)]
pub struct Canonicalizer;

impl Canonicalizer {
    /// Creates a canonicalizer for `jsonNormalisation/v1`.
    pub fn new() -> Self {
        Self
    }

    /// Name of the normalisation this canonicalizer implements.
    pub fn normalisation_algorithm(&self) -> &'static str {
        JSON_NORMALISATION_V1
    }

    /// Produces the canonical bytes of `descriptor`.
    ///
    /// Fails if a reference or resource is not normalisable, see
    /// [`validate_normalisable`].
    pub fn canonicalize(
        &self,
        descriptor: &ComponentDescriptor,
    ) -> Result<CanonicalizationResult, CanonicalizationError> {
        let excluded = validate_normalisable(descriptor)?;

        let mut root = Node::Entries(project(descriptor));
        deep_sort(&mut root);

        // every object has a single key, so only string escaping affects the bytes
        let bytes = to_canonical_vec(&root.into_value())
            .map_err(|err| CanonicalizationError::Serialization(err.to_string()))?;

        Ok(CanonicalizationResult { bytes, excluded })
    }
}

/// Builds the integrity projection of a descriptor, unsorted.
fn project(descriptor: &ComponentDescriptor) -> Vec<Entry> {
    let component = &descriptor.component;
    let mut component_entries = vec![
        Entry::string("name", &component.name),
        Entry::string("version", &component.version),
    ];

    if !component.component_references.is_empty() {
        let references = component
            .component_references
            .iter()
            .map(|reference| {
                Node::Entries(element_entries(&reference.meta, reference.digest.as_ref()))
            })
            .collect();
        component_entries.push(Entry::list("componentReferences", references));
    }

    if !component.resources.is_empty() {
        let resources = component
            .resources
            .iter()
            .map(|res| Node::Entries(element_entries(&res.meta, res.digest.as_ref())))
            .collect();
        component_entries.push(Entry::list("resources", resources));
    }

    vec![
        Entry::entries(
            "meta",
            vec![Entry::string("schemaVersion", &descriptor.meta.schema_version)],
        ),
        Entry::entries("component", component_entries),
    ]
}

fn element_entries(meta: &IdentityObjectMeta, digest: Option<&DigestSpec>) -> Vec<Entry> {
    let mut entries = vec![
        Entry::string("name", &meta.name),
        Entry::string("version", &meta.version),
    ];

    if !meta.extra_identity.is_empty() {
        let extra_identity = meta
            .extra_identity
            .iter()
            .map(|(key, value)| Entry::string(key, value))
            .collect();
        entries.push(Entry::entries("extraIdentity", extra_identity));
    }

    if let Some(digest) = digest {
        entries.push(Entry::entries(
            "digest",
            vec![
                Entry::string("hashAlgorithm", &digest.hash_algorithm),
                Entry::string("normalisationAlgorithm", &digest.normalisation_algorithm),
                Entry::string("value", &digest.value),
            ],
        ));
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_sort_orders_entries_but_not_lists() {
        let mut node = Node::Entries(vec![
            Entry::list(
                "b",
                vec![
                    Node::Entries(vec![Entry::string("z", "1"), Entry::string("a", "2")]),
                    Node::Str("first".into()),
                ],
            ),
            Entry::string("a", "x"),
        ]);
        deep_sort(&mut node);
        assert_eq!(
            serde_json::to_string(&node.into_value()).unwrap(),
            r#"[{"a":"x"},{"b":[[{"a":"2"},{"z":"1"}],"first"]}]"#
        );
    }

    #[test]
    fn path_display() {
        let path = Path::root().push_field("resources").push_index(2);
        assert_eq!(path.to_string(), "component.resources[2]");
    }
}
