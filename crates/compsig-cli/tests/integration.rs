//! Integration tests for CLI commands.

use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::pkcs8::{EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const GOLDEN_CANONICAL: &str = concat!(
    r#"[{"component":[{"componentReferences":[[{"digest":[{"hashAlgorithm":"sha256"},"#,
    r#"{"normalisationAlgorithm":"jsonNormalisation/v1"},{"value":"00000000000000"}]},"#,
    r#"{"extraIdentity":[{"refKey":"refName"}]},{"name":"compRefName"},{"version":"v0.0.2compRef"}]]},"#,
    r#"{"name":"CD-Name"},{"version":"v0.0.1"}]},{"meta":[{"schemaVersion":"v2"}]}]"#
);

fn make_descriptor() -> Value {
    json!({
        "meta": {"schemaVersion": "v2"},
        "component": {
            "name": "CD-Name",
            "version": "v0.0.1",
            "provider": "internal",
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
    })
}

fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

fn write_keys(dir: &Path, prefix: &str) -> (String, String) {
    let private = RsaPrivateKey::new(&mut rand::thread_rng(), 1024).unwrap();
    let public = RsaPublicKey::from(&private);
    let private_path = dir.join(format!("{prefix}.private.pem"));
    let public_path = dir.join(format!("{prefix}.public.pem"));
    std::fs::write(
        &private_path,
        private.to_pkcs1_pem(LineEnding::LF).unwrap().as_bytes(),
    )
    .unwrap();
    std::fs::write(&public_path, public.to_public_key_pem(LineEnding::LF).unwrap()).unwrap();
    (
        private_path.to_string_lossy().to_string(),
        public_path.to_string_lossy().to_string(),
    )
}

fn run_cli(args: &[&str]) -> (bool, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_compsig"))
        .args(args)
        .env_remove("COMPSIG_LOG")
        .output()
        .expect("Failed to execute CLI");

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    let success = output.status.success();

    (success, stdout, stderr)
}

fn sign_fixture(dir: &Path, private_key: &str, media_type: &str) -> String {
    let descriptor = write_json(dir, "cd.json", &make_descriptor());
    let signed = dir.join("signed.json").to_string_lossy().to_string();
    let (success, _, stderr) = run_cli(&[
        "sign",
        descriptor.to_str().unwrap(),
        "--private-key",
        private_key,
        "--name",
        "mySig",
        "--media-type",
        media_type,
        "--out",
        &signed,
    ]);
    assert!(success, "sign failed: {stderr}");
    signed
}

#[test]
fn test_canonicalize_command() {
    let dir = TempDir::new().unwrap();
    let descriptor = write_json(dir.path(), "cd.json", &make_descriptor());

    let (success, stdout, _) = run_cli(&["canonicalize", descriptor.to_str().unwrap()]);
    assert!(success);
    assert_eq!(stdout.trim_end(), GOLDEN_CANONICAL);
}

#[test]
fn test_digest_command() {
    let dir = TempDir::new().unwrap();
    let descriptor = write_json(dir.path(), "cd.json", &make_descriptor());

    let (success, stdout, _) = run_cli(&["digest", descriptor.to_str().unwrap()]);
    assert!(success);
    let digest: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(
        digest,
        json!({
            "hashAlgorithm": "sha256",
            "normalisationAlgorithm": "jsonNormalisation/v1",
            "value": "53d35ed8107e3d9ced85f4f92fcc317bba98a74afe0b2962accde74c493b398e"
        })
    );
}

#[test]
fn test_digest_rejects_no_digest_algorithm() {
    let dir = TempDir::new().unwrap();
    let descriptor = write_json(dir.path(), "cd.json", &make_descriptor());

    let (success, _, stderr) =
        run_cli(&["digest", descriptor.to_str().unwrap(), "--hash", "NO-DIGEST"]);
    assert!(!success);
    assert!(stderr.contains("Error:"));
}

#[test]
fn test_add_digests_command() {
    let dir = TempDir::new().unwrap();
    let mut cd = make_descriptor();
    cd["component"]["resources"] = json!([{
        "name": "image",
        "version": "1.0.0",
        "type": "ociImage",
        "relation": "external",
        "access": {"type": "ociRegistry", "imageReference": "repo/image:1.0.0"}
    }]);
    let descriptor = write_json(dir.path(), "cd.json", &cd);
    let digests = write_json(
        dir.path(),
        "digests.json",
        &json!({
            "componentReferences": {
                "compRefName": {
                    "hashAlgorithm": "sha256",
                    "normalisationAlgorithm": "jsonNormalisation/v1",
                    "value": "00000000000000"
                }
            },
            "resources": {
                "image": {
                    "hashAlgorithm": "sha256",
                    "normalisationAlgorithm": "ociArtifactDigest/v1",
                    "value": "abcdef"
                }
            }
        }),
    );

    let (success, stdout, stderr) = run_cli(&[
        "add-digests",
        descriptor.to_str().unwrap(),
        "--digests",
        digests.to_str().unwrap(),
    ]);
    assert!(success, "add-digests failed: {stderr}");
    assert!(stderr.contains("filled 1, verified 1"));
    let updated: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(
        updated["component"]["resources"][0]["digest"]["value"],
        json!("abcdef")
    );
}

#[test]
fn test_add_digests_reports_mismatch() {
    let dir = TempDir::new().unwrap();
    let descriptor = write_json(dir.path(), "cd.json", &make_descriptor());
    let digests = write_json(
        dir.path(),
        "digests.json",
        &json!({
            "componentReferences": {
                "compRefName": {
                    "hashAlgorithm": "sha256",
                    "normalisationAlgorithm": "jsonNormalisation/v1",
                    "value": "00000000000000-different"
                }
            }
        }),
    );

    let (success, _, stderr) = run_cli(&[
        "add-digests",
        descriptor.to_str().unwrap(),
        "--digests",
        digests.to_str().unwrap(),
    ]);
    assert!(!success);
    assert!(stderr.contains("digest mismatch for componentReference compRefName:v0.0.2compRef"));
}

#[test]
fn test_sign_and_verify() {
    let dir = TempDir::new().unwrap();
    let (private_key, public_key) = write_keys(dir.path(), "signer");
    let signed = sign_fixture(dir.path(), &private_key, "hex");

    let signed_cd: Value =
        serde_json::from_str(&std::fs::read_to_string(&signed).unwrap()).unwrap();
    let sig = &signed_cd["signatures"][0];
    assert_eq!(sig["name"], json!("mySig"));
    assert_eq!(sig["signature"]["algorithm"], json!("RSASSA-PKCS1-V1_5"));
    assert_eq!(
        sig["signature"]["mediaType"],
        json!("application/vnd.ocm.signature.rsa")
    );

    let (success, stdout, _) = run_cli(&[
        "verify",
        &signed,
        "--public-key",
        &public_key,
        "--name",
        "mySig",
        "--json",
    ]);
    assert!(success);
    let report: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["verified"], json!(true));
}

#[test]
fn test_sign_and_verify_pem_signature() {
    let dir = TempDir::new().unwrap();
    let (private_key, public_key) = write_keys(dir.path(), "signer");
    let signed = sign_fixture(dir.path(), &private_key, "pem");

    let (success, stdout, _) = run_cli(&[
        "verify",
        &signed,
        "--public-key",
        &public_key,
        "--name",
        "mySig",
    ]);
    assert!(success);
    assert!(stdout.contains("signature mySig verified"));
}

#[test]
fn test_verify_detects_content_drift() {
    let dir = TempDir::new().unwrap();
    let (private_key, public_key) = write_keys(dir.path(), "signer");
    let signed = sign_fixture(dir.path(), &private_key, "hex");

    let mut cd: Value = serde_json::from_str(&std::fs::read_to_string(&signed).unwrap()).unwrap();
    cd["component"]["version"] = json!("v0.0.2");
    let tampered = write_json(dir.path(), "tampered.json", &cd);

    let (success, stdout, _) = run_cli(&[
        "verify",
        tampered.to_str().unwrap(),
        "--public-key",
        &public_key,
        "--name",
        "mySig",
        "--json",
    ]);
    assert!(!success);
    let report: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["verified"], json!(false));
    assert_eq!(report["failure"], json!("content-drift"));
}

#[test]
fn test_verify_with_wrong_key_fails_authenticity() {
    let dir = TempDir::new().unwrap();
    let (private_key, _) = write_keys(dir.path(), "signer");
    let (_, other_public) = write_keys(dir.path(), "other");
    let signed = sign_fixture(dir.path(), &private_key, "hex");

    let (success, stdout, _) = run_cli(&[
        "verify",
        &signed,
        "--public-key",
        &other_public,
        "--name",
        "mySig",
        "--json",
    ]);
    assert!(!success);
    let report: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["failure"], json!("authenticity"));
}

#[test]
fn test_verify_unknown_signature_name() {
    let dir = TempDir::new().unwrap();
    let (private_key, public_key) = write_keys(dir.path(), "signer");
    let signed = sign_fixture(dir.path(), &private_key, "hex");

    let (success, _, stderr) = run_cli(&[
        "verify",
        &signed,
        "--public-key",
        &public_key,
        "--name",
        "absent",
    ]);
    assert!(!success);
    assert!(stderr.contains("signature absent not found"));
}
