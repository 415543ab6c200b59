use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use base64::Engine;
use paygate::infrastructure::crypto::hmac_hash;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn paygate() -> Command {
    let mut cmd = Command::new(cargo_bin!());
    cmd.env("PAYGATE_ENVIRONMENT", "development")
        .env("PAYGATE_MERCHANT_ID", "integration_merchant_id")
        .env("PAYGATE_PUBLIC_KEY", "integration_public_key")
        .env("PAYGATE_PRIVATE_KEY", "integration_private_key")
        .env_remove("GATEWAY_PORT")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_decode_prints_json() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("customer.xml");
    fs::write(
        &path,
        r#"<customer><first-name>Dan</first-name><age type="integer">42</age></customer>"#,
    )?;

    paygate()
        .arg("decode")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""first_name": "Dan""#))
        .stdout(predicate::str::contains(r#""age": 42"#));

    Ok(())
}

#[test]
fn test_decode_rejects_malformed_xml() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("broken.xml");
    fs::write(&path, "<customer><id>1</customer>")?;

    paygate()
        .arg("decode")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("parse error"));

    Ok(())
}

#[test]
fn test_encode_prints_xml() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("params.json");
    fs::write(&path, r#"{"customer": {"first_name": "Dan", "tags": ["a", "b"]}}"#)?;

    paygate()
        .arg("encode")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"<customer><first_name>Dan</first_name><tags type="array"><item>a</item><item>b</item></tags></customer>"#,
        ));

    Ok(())
}

#[test]
fn test_tr_data_prints_signed_token() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("params.json");
    fs::write(&path, r#"{"transaction": {"type": "sale", "amount": "10.00"}}"#)?;

    paygate()
        .args(["tr-data", "--redirect-url", "http://example.com/confirm", "--params"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^[0-9a-f]{40}\|")?)
        .stdout(predicate::str::contains("transaction%5Btype%5D=sale"))
        .stdout(predicate::str::contains("public_key=integration_public_key"));

    Ok(())
}

#[test]
fn test_tr_data_requires_private_key() {
    paygate()
        .env_remove("PAYGATE_PRIVATE_KEY")
        .args(["tr-data", "--redirect-url", "http://example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("private key is not set"));
}

#[test]
fn test_validate_accepts_signed_query() {
    paygate()
        .arg("validate")
        .arg("http_status=200&id=6kdj469tw7yck32j&hash=99c9ff20cd7910a1c1e793ff9e3b2d15586dc6b9")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""id": "6kdj469tw7yck32j""#));
}

#[test]
fn test_validate_rejects_forged_query() {
    paygate()
        .arg("validate")
        .arg("http_status=200&id=6kdj469tw7yck32j&hash=19c9ff20cd7910a1c1e793ff9e3b2d15586dc6b9")
        .assert()
        .failure()
        .stderr(predicate::str::contains("forged query string"));
}

#[test]
fn test_validate_reports_gateway_status() {
    paygate()
        .arg("validate")
        .arg("http_status=404&id=6kdj469tw7yck32j&hash=0d3724a45cf1cda5524aa68f1f28899d34d2ff3a")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_webhook_prints_notification() {
    let xml = "<notification><kind>subscription_past_due</kind>\
               <timestamp type=\"datetime\">2012-09-05T16:30:12Z</timestamp>\
               <subject><subscription><id>sub1</id></subscription></subject></notification>";
    let payload = base64::engine::general_purpose::STANDARD.encode(xml);
    let signature = format!(
        "integration_public_key|{}",
        hmac_hash("integration_private_key", &payload).unwrap()
    );

    paygate()
        .args(["webhook", "--signature", signature.as_str(), "--payload", payload.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""kind": "subscription_past_due""#))
        .stdout(predicate::str::contains(r#""id": "sub1""#));

    paygate()
        .args(["webhook", "--signature", "integration_public_key|00", "--payload", payload.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid signature"));
}
