//! End-to-end tests for `dnet send` and `dnet tail --once` against a mock
//! message board.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

/// Creates a temp DNET_HOME directory for test isolation.
fn temp_dnet_home() -> TempDir {
    TempDir::new().expect("create temp dnet home")
}

#[tokio::test]
async fn test_send_posts_message() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_dnet_home();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send"))
        .and(body_json(serde_json::json!({"message": "need water at the school"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("dnet")
        .env("DNET_HOME", home.path())
        .args(["--base-url", &server.uri(), "send", "need water at the school"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sent."));
}

#[tokio::test]
async fn test_send_failure_exits_non_zero() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_dnet_home();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    cargo_bin_cmd!("dnet")
        .env("DNET_HOME", home.path())
        .env("DNET_BASE_URL", server.uri())
        .args(["send", "help"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("send rejected"));
}

#[tokio::test]
async fn test_send_blank_message_issues_no_request() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_dnet_home();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    cargo_bin_cmd!("dnet")
        .env("DNET_HOME", home.path())
        .args(["--base-url", &server.uri(), "send", "   "])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to send"));
}

#[tokio::test]
async fn test_tail_once_prints_list() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_dnet_home();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(["road blocked", "need insulin"]))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("dnet")
        .env("DNET_HOME", home.path())
        .args(["--base-url", &server.uri(), "tail", "--once"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--- 2 messages ---"))
        .stdout(predicate::str::contains("road blocked\nneed insulin"));
}

#[tokio::test]
async fn test_tail_once_malformed_body_fails() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_dnet_home();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"messages": []})))
        .mount(&server)
        .await;

    cargo_bin_cmd!("dnet")
        .env("DNET_HOME", home.path())
        .args(["--base-url", &server.uri(), "tail", "--once"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed message list"));
}
