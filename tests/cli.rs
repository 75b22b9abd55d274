use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{any, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SCRUBBED_ENV: &[&str] = &[
    "SHOPLINE_STORE",
    "SHOPLINE_STORE_ALIASES",
    "SHOPLINE_ACCESS_TOKEN",
    "SHOPLINE_API_TOKEN",
    "SHOPLINE_TOKEN",
    "SHOPLINE_OUTPUT",
    "SHOPLINE_ADMIN_BASE_URL",
    "SHOPLINE_ADMIN_TOKEN",
    "SHOPLINE_ADMIN_MERCHANT_ID",
    "RUST_LOG",
];

/// `spl` isolated from the host: file-backed credentials and config in `home`.
fn spl(home: &Path, base_url: &str) -> Command {
    let mut cmd = Command::cargo_bin("spl").expect("spl binary");
    for name in SCRUBBED_ENV {
        cmd.env_remove(name);
    }
    cmd.env("SHOPLINE_CREDENTIALS_FILE", home.join("credentials.json"))
        .env("SHOPLINE_API_BASE_URL", base_url)
        .arg("--config-dir")
        .arg(home)
        .arg("--color")
        .arg("never");
    cmd
}

fn login(home: &Path, base_url: &str) {
    spl(home, base_url)
        .args([
            "auth", "login", "--name", "demo", "--handle", "demoshop", "--token", "tok_demo",
        ])
        .assert()
        .success()
        .stdout(contains("Saved profile 'demo'"));
}

#[tokio::test(flavor = "multi_thread")]
async fn no_profiles_is_a_general_error() {
    let server = MockServer::start().await;
    let home = TempDir::new().expect("tempdir");

    spl(home.path(), &server.uri())
        .args(["products", "list"])
        .assert()
        .code(1)
        .stderr(contains("no store profiles configured"))
        .stderr(contains("Hint:"));
}

#[tokio::test(flavor = "multi_thread")]
async fn lists_products_with_stored_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("page", "2"))
        .and(header("authorization", "Bearer tok_demo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "prod_1", "title": "Canvas Tote", "status": "active"}],
            "total_count": 1
        })))
        .expect(1)
        .mount(&server)
        .await;
    let home = TempDir::new().expect("tempdir");
    login(home.path(), &server.uri());

    spl(home.path(), &server.uri())
        .args(["products", "list", "--page", "2"])
        .assert()
        .success()
        .stdout(contains("Canvas Tote"));
}

#[tokio::test(flavor = "multi_thread")]
async fn query_selects_from_json_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coupons"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "cpn_1", "code": "SAVE10"}, {"id": "cpn_2", "code": "FIVE"}]
        })))
        .mount(&server)
        .await;
    let home = TempDir::new().expect("tempdir");
    login(home.path(), &server.uri());

    spl(home.path(), &server.uri())
        .args(["coupons", "list", "--query", ".items[].code"])
        .assert()
        .success()
        .stdout("\"SAVE10\"\n\"FIVE\"\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn not_found_maps_to_exit_four() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coupons/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "Coupon not found"})),
        )
        .mount(&server)
        .await;
    let home = TempDir::new().expect("tempdir");
    login(home.path(), &server.uri());

    spl(home.path(), &server.uri())
        .args(["coupons", "get", "missing"])
        .assert()
        .code(4)
        .stderr(contains("failed to get coupon"));
}

#[tokio::test(flavor = "multi_thread")]
async fn unauthorized_maps_to_exit_two() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let home = TempDir::new().expect("tempdir");
    login(home.path(), &server.uri());

    spl(home.path(), &server.uri())
        .args(["payments", "get", "pay_1"])
        .assert()
        .code(2);
}

#[tokio::test(flavor = "multi_thread")]
async fn dry_run_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let home = TempDir::new().expect("tempdir");
    login(home.path(), &server.uri());

    spl(home.path(), &server.uri())
        .args(["coupons", "delete", "cpn_1", "--dry-run"])
        .assert()
        .success()
        .stdout("[DRY-RUN] Would delete coupon cpn_1\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn destructive_command_without_terminal_needs_yes() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let home = TempDir::new().expect("tempdir");
    login(home.path(), &server.uri());

    spl(home.path(), &server.uri())
        .args(["coupons", "delete", "cpn_1"])
        .write_stdin("")
        .assert()
        .code(3)
        .stderr(contains("--yes"));
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_body_is_a_usage_error() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let home = TempDir::new().expect("tempdir");
    login(home.path(), &server.uri());

    spl(home.path(), &server.uri())
        .args(["coupons", "update", "cpn_1", "--body", "{not json"])
        .assert()
        .code(3)
        .stderr(contains("invalid JSON body"));
}

#[tokio::test(flavor = "multi_thread")]
async fn logout_removes_profile() {
    let server = MockServer::start().await;
    let home = TempDir::new().expect("tempdir");
    login(home.path(), &server.uri());

    spl(home.path(), &server.uri())
        .args(["auth", "logout", "demo", "--yes"])
        .assert()
        .success();
    spl(home.path(), &server.uri())
        .args(["auth", "list", "-o", "json"])
        .assert()
        .success()
        .stdout(contains("demo").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn usage_errors_exit_with_validation_code() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let home = TempDir::new().expect("tempdir");

    spl(home.path(), &server.uri())
        .args(["member-points", "get"])
        .assert()
        .code(3)
        .stderr(contains("--customer-id"));
    spl(home.path(), &server.uri())
        .args(["products", "list", "--page", "abc"])
        .assert()
        .code(3)
        .stderr(contains("abc"));
    spl(home.path(), &server.uri())
        .env("SHOPLINE_OUTPUT", "yaml")
        .args(["products", "list"])
        .assert()
        .code(3)
        .stderr(contains("yaml"));
}

#[test]
fn help_and_version_still_succeed() {
    let home = TempDir::new().expect("tempdir");
    spl(home.path(), "http://127.0.0.1:9")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("Usage"));
    spl(home.path(), "http://127.0.0.1:9")
        .arg("--version")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[tokio::test(flavor = "multi_thread")]
async fn force_is_yes_and_no_input_never_prompts() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/coupons/cpn_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    let home = TempDir::new().expect("tempdir");
    login(home.path(), &server.uri());

    spl(home.path(), &server.uri())
        .args(["coupons", "delete", "cpn_2", "--no-input"])
        .assert()
        .code(3)
        .stderr(contains("--yes"));
    spl(home.path(), &server.uri())
        .args(["coupons", "delete", "cpn_1", "--force", "--no-input"])
        .assert()
        .success()
        .stdout(contains("Deleted coupon cpn_1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn json_shorthand_with_items_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coupons"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "cpn_1", "code": "SAVE10"}],
            "total_count": 1
        })))
        .mount(&server)
        .await;
    let home = TempDir::new().expect("tempdir");
    login(home.path(), &server.uri());

    let output = spl(home.path(), &server.uri())
        .args(["coupons", "list", "-j", "--results-only"])
        .output()
        .expect("run spl");
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(parsed, json!([{"id": "cpn_1", "code": "SAVE10"}]));
}
