mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use common::{MERCHANT_ID, gateway_public_pem, initiate_acceptance, merchant_private_pem};
use predicates::prelude::*;
use serde_json::json;
use std::process::Command;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONFIG_VARS: [&str; 7] = [
    "NAGAD_MERCHANT_ID",
    "NAGAD_BASE_URL",
    "NAGAD_CALLBACK_URL",
    "NAGAD_PUBLIC_KEY_FILE",
    "NAGAD_PRIVATE_KEY_FILE",
    "NAGAD_CLIENT_IP",
    "NAGAD_TIMEOUT_SECS",
];

fn bare_command() -> Command {
    let mut cmd = Command::new(cargo_bin!());
    for var in CONFIG_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// A command configured through the environment, with key files in `dir`.
fn configured_command(dir: &TempDir, base_url: &str) -> Command {
    let public_key = dir.path().join("gateway_public.pem");
    let private_key = dir.path().join("merchant_private.pem");
    std::fs::write(&public_key, gateway_public_pem()).unwrap();
    std::fs::write(&private_key, merchant_private_pem()).unwrap();

    let mut cmd = bare_command();
    cmd.env("NAGAD_MERCHANT_ID", MERCHANT_ID)
        .env("NAGAD_BASE_URL", base_url)
        .env("NAGAD_CALLBACK_URL", "https://shop.example.com/callback")
        .env("NAGAD_PUBLIC_KEY_FILE", &public_key)
        .env("NAGAD_PRIVATE_KEY_FILE", &private_key)
        .env("NAGAD_CLIENT_IP", "10.0.0.7");
    cmd
}

#[test]
fn test_parse_callback_prints_json() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = bare_command();
    cmd.arg("parse-callback")
        .arg("?merchant=683002007104225&order_id=INV1001&payment_ref_id=REF1&status=Success&status_code=00_0000_000&message=Successful+Transaction");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""order_id": "INV1001""#))
        .stdout(predicate::str::contains(r#""status": "Success""#))
        .stdout(predicate::str::contains(r#""message": "Successful Transaction""#));

    Ok(())
}

#[test]
fn test_checkout_without_config_fails_fast() {
    let mut cmd = bare_command();
    cmd.args(["checkout", "--amount", "100", "--invoice", "INV1001"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("merchant_id is required"));
}

#[test]
fn test_unreadable_key_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let mut cmd = configured_command(&dir, "https://sandbox.example.com");
    cmd.env("NAGAD_PUBLIC_KEY_FILE", dir.path().join("missing.pem"))
        .args(["verify", "REF1"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("could not read key file"));
}

#[test]
fn test_invalid_invoice_is_rejected() {
    let dir = TempDir::new().unwrap();
    // Validation happens before any network call, so the gateway never has to exist.
    let mut cmd = configured_command(&dir, "http://127.0.0.1:9");
    cmd.args(["checkout", "--amount", "100", "--invoice", "INV-1001"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_checkout_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!(
            "/api/dfs/check-out/initialize/{}/INV1001",
            MERCHANT_ID
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(initiate_acceptance("REF000111")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/dfs/check-out/complete/REF000111"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Success",
            "callBackUrl": "https://sandbox.example.com/checkout/REF000111"
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut cmd = configured_command(&dir, &format!("{}/api/dfs", server.uri()));
    cmd.args(["checkout", "--amount", "100.00", "--invoice", "INV1001"]);

    let assert = tokio::task::spawn_blocking(move || cmd.assert())
        .await
        .unwrap();
    assert
        .success()
        .stdout(predicate::str::contains(
            r#""callBackUrl": "https://sandbox.example.com/checkout/REF000111""#,
        ))
        .stdout(predicate::str::contains(
            r#""paymentReferenceId": "REF000111""#,
        ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_verify_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/verify/payment/REF000111"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "statusCode": "000",
            "status": "Success",
            "issuerPaymentRefNo": "7ABCD1234"
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut cmd = configured_command(&dir, &server.uri());
    cmd.args(["verify", "REF000111"]);

    let assert = tokio::task::spawn_blocking(move || cmd.assert())
        .await
        .unwrap();
    assert
        .success()
        .stdout(predicate::str::contains(r#""issuerPaymentRefNo": "7ABCD1234""#))
        .stdout(predicate::str::contains(r#""settled": true"#));
}
