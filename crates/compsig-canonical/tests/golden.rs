use compsig_canonical::{compute_descriptor_digest, hasher_for_name, Canonicalizer};
use compsig_schemas::{
    ComponentDescriptor, ComponentReference, DigestSpec, IdentityObjectMeta,
    JSON_NORMALISATION_V1, SHA256,
};

const GOLDEN_CANONICAL: &str = concat!(
    r#"[{"component":[{"componentReferences":[[{"digest":[{"hashAlgorithm":"sha256"},"#,
    r#"{"normalisationAlgorithm":"jsonNormalisation/v1"},{"value":"00000000000000"}]},"#,
    r#"{"extraIdentity":[{"refKey":"refName"}]},{"name":"compRefName"},{"version":"v0.0.2compRef"}]]},"#,
    r#"{"name":"CD-Name"},{"version":"v0.0.1"}]},{"meta":[{"schemaVersion":"v2"}]}]"#
);

fn make_golden_descriptor() -> ComponentDescriptor {
    let mut cd = ComponentDescriptor::new("CD-Name", "v0.0.1");
    cd.component.provider = "internal".into();
    let mut reference = ComponentReference::new(
        IdentityObjectMeta::new("compRefName", "v0.0.2compRef")
            .with_extra_identity("refKey", "refName"),
        "compRefNameComponentName",
    );
    reference.digest = Some(DigestSpec::new(
        SHA256,
        JSON_NORMALISATION_V1,
        "00000000000000",
    ));
    cd.component.component_references.push(reference);
    cd
}

#[test]
fn canonical_bytes_match_golden_fixture() {
    let result = Canonicalizer::new()
        .canonicalize(&make_golden_descriptor())
        .unwrap();
    assert_eq!(String::from_utf8(result.bytes).unwrap(), GOLDEN_CANONICAL);
    assert!(result.excluded.is_empty());
}

#[test]
fn descriptor_digest_is_sha256_of_golden_bytes() {
    let mut hasher = hasher_for_name(SHA256).unwrap();
    let expected = hex::encode(hasher.hash(GOLDEN_CANONICAL.as_bytes()).unwrap());
    assert_eq!(
        expected,
        "53d35ed8107e3d9ced85f4f92fcc317bba98a74afe0b2962accde74c493b398e"
    );

    let digest =
        compute_descriptor_digest(&make_golden_descriptor(), &Canonicalizer::new(), &mut hasher)
            .unwrap();
    assert_eq!(digest, DigestSpec::new(SHA256, JSON_NORMALISATION_V1, expected));
}

#[test]
fn empty_component_canonicalizes_without_lists() {
    let cd = ComponentDescriptor::new("CD-Name", "v0.0.1");
    let result = Canonicalizer::new().canonicalize(&cd).unwrap();
    assert_eq!(
        result.bytes,
        br#"[{"component":[{"name":"CD-Name"},{"version":"v0.0.1"}]},{"meta":[{"schemaVersion":"v2"}]}]"#
            .to_vec()
    );
}

#[test]
fn decoded_descriptor_matches_golden_fixture() {
    let cd: ComponentDescriptor = serde_json::from_value(serde_json::json!({
        "meta": {"schemaVersion": "v2"},
        "component": {
            "name": "CD-Name",
            "version": "v0.0.1",
            "provider": "internal",
            "sources": [{"name": "repo", "version": "v0.0.1", "type": "git"}],
            "componentReferences": [{
                "name": "compRefName",
                "componentName": "compRefNameComponentName",
                "version": "v0.0.2compRef",
                "extraIdentity": {"refKey": "refName"},
                "digest": {
                    "hashAlgorithm": "sha256",
                    "normalisationAlgorithm": "jsonNormalisation/v1",
                    "value": "00000000000000"
                }
            }]
        }
    }))
    .unwrap();

    let result = Canonicalizer::new().canonicalize(&cd).unwrap();
    assert_eq!(result.bytes, GOLDEN_CANONICAL.as_bytes());
}

const ESCAPED_CANONICAL: &str = concat!(
    r#"[{"component":[{"componentReferences":[[{"digest":[{"hashAlgorithm":"sha256"},"#,
    r#"{"normalisationAlgorithm":"jsonNormalisation/v1"},{"value":"00000000000000"}]},"#,
    r#"{"extraIdentity":[{"clé":"a\u0026b \"q\""},{"os":"\u003clinux\u003e"}]},"#,
    r#"{"name":"réf\u0026co"},{"version":"v1\u2028"}]]},"#,
    r#"{"name":"Komponente-é"},{"version":"v0.0.1"}]},{"meta":[{"schemaVersion":"v2"}]}]"#
);

#[test]
fn non_ascii_and_html_characters_match_fixture() {
    let mut cd = ComponentDescriptor::new("Komponente-é", "v0.0.1");
    let mut reference = ComponentReference::new(
        IdentityObjectMeta::new("réf&co", "v1\u{2028}")
            .with_extra_identity("os", "<linux>")
            .with_extra_identity("clé", "a&b \"q\""),
        "github.com/example/réf",
    );
    reference.digest = Some(DigestSpec::new(
        SHA256,
        JSON_NORMALISATION_V1,
        "00000000000000",
    ));
    cd.component.component_references.push(reference);

    let result = Canonicalizer::new().canonicalize(&cd).unwrap();
    assert_eq!(String::from_utf8(result.bytes).unwrap(), ESCAPED_CANONICAL);
}
