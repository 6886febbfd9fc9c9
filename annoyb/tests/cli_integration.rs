//! Integration tests for the annoyb binary
//!
//! The binary is pointed at a wiremock server through `api_url`, so the
//! whole flow runs without touching Twitter.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Isolated directory holding one config file
struct TestEnv {
    _temp_dir: TempDir,
    config_path: PathBuf,
}

impl TestEnv {
    fn new(config: Value) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        fs::write(&config_path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        Self {
            _temp_dir: temp_dir,
            config_path,
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("annoyb").unwrap();
        cmd.arg("--config").arg(&self.config_path);
        cmd.env_remove("RUST_LOG");
        cmd.env_remove("ANNOYB_LOG_LEVEL");
        cmd.env_remove("ANNOYB_LOG_FORMAT");
        cmd.env("NO_COLOR", "1");
        cmd
    }
}

fn config(api_url: &str, with_token: bool) -> Value {
    let (token, secret) = if with_token { ("at", "ats") } else { ("", "") };
    json!({
        "twitter_consumer_key": "ck",
        "twitter_consumer_secret": "cs",
        "twitter_access_token": token,
        "twitter_access_token_secret": secret,
        "api_url": api_url,
        "tweet": {
            "format": "{target} {message} {hashtag}",
            "hashtag": "#x",
            "target": ["alice"],
            "target_delimiter": " "
        },
        "log": {"level": "info", "format": "text"}
    })
}

async fn mount_checks(server: &MockServer, blocked_by: bool) {
    Mock::given(method("GET"))
        .and(path("/1.1/account/verify_credentials.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 1, "screen_name": "annoyb"})),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/1.1/application/rate_limit_status.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resources": {"statuses": {"/statuses/update": {"remaining": 0, "limit": 300, "reset": 0}}}
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/1.1/users/show.json"))
        .and(query_param("screen_name", "alice"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 2, "screen_name": "alice"})),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/1.1/friendships/show.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "relationship": {
                "source": {"id": 1, "screen_name": "annoyb", "following": true,
                           "followed_by": true, "blocking": false, "blocked_by": blocked_by},
                "target": {"id": 2, "screen_name": "alice", "following": true,
                           "followed_by": true}
            }
        })))
        .mount(server)
        .await;
}

fn occurs_once(needle: &'static str) -> impl Predicate<str> {
    predicate::function(move |out: &str| out.matches(needle).count() == 1)
}

#[test]
fn test_missing_config_file() {
    let mut cmd = Command::cargo_bin("annoyb").unwrap();
    cmd.args(["--config", "/nonexistent/annoyb/config.json"])
        .env_remove("RUST_LOG")
        .assert()
        .code(3)
        .stderr(occurs_once("Failed to read config file"));
}

#[test]
fn test_banner_shows_build_commit() {
    let head = std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output();
    let Ok(head) = head else {
        return;
    };
    if !head.status.success() {
        // Not built from a checkout
        return;
    }
    let hash = String::from_utf8_lossy(&head.stdout).trim().to_string();
    let env = TestEnv::new(json!({"tweet": {"format": "{message}"}}));

    env.cmd()
        .assert()
        .code(3)
        .stderr(predicate::str::contains(format!("git: {}", hash)))
        .stderr(predicate::str::contains("git: not found").not());
}

#[test]
fn test_log_file_receives_output() {
    let env = TestEnv::new(json!({"tweet": {"format": "{message}"}}));
    let log_path = env.config_path.with_file_name("annoyb.log");
    let config = json!({
        "tweet": {"format": "{message}"},
        "log": {"level": "info", "format": "text", "file": log_path}
    });
    fs::write(&env.config_path, config.to_string()).unwrap();

    env.cmd()
        .assert()
        .code(3)
        .stderr(occurs_once("twitter_consumer_key"));

    let logged = fs::read_to_string(&log_path).unwrap();
    assert!(logged.contains("annoyb 0.1.0 | git:"));
    assert!(logged.contains("twitter_consumer_key"));
}

#[test]
fn test_missing_consumer_key() {
    let env = TestEnv::new(json!({"tweet": {"format": "{message}"}}));

    env.cmd()
        .assert()
        .code(3)
        .stderr(predicate::str::contains("twitter_consumer_key"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_dry_run_composes_without_posting() {
    let server = MockServer::start().await;
    mount_checks(&server, false).await;
    Mock::given(method("POST"))
        .and(path("/1.1/statuses/update.json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let env = TestEnv::new(config(&server.uri(), true));

    env.cmd()
        .args(["-d", "-m", "Cake", "--dry-run"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Daemon mode is not supported"))
        .stderr(predicate::str::contains("API resources limit hit"))
        .stderr(predicate::str::contains("Dry run, not posting: @alice Cake #x"))
        .stderr(predicate::str::contains("Exiting normally"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_posts_message() {
    let server = MockServer::start().await;
    mount_checks(&server, false).await;
    Mock::given(method("POST"))
        .and(path("/1.1/statuses/update.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 77, "text": "@alice Cake #x"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new(config(&server.uri(), true));

    env.cmd()
        .args(["-m", "Cake"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Tweet sent: @alice Cake #x"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_blocked_by_target_aborts() {
    let server = MockServer::start().await;
    mount_checks(&server, true).await;
    Mock::given(method("POST"))
        .and(path("/1.1/statuses/update.json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let env = TestEnv::new(config(&server.uri(), true));

    env.cmd()
        .args(["-m", "Cake"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("User annoyb blocked by alice"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_message_too_long() {
    let server = MockServer::start().await;
    mount_checks(&server, false).await;

    let env = TestEnv::new(config(&server.uri(), true));
    let message = "z".repeat(150);

    env.cmd()
        .args(["-m", message.as_str()])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Tweet exceeds length limit"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_first_run_prints_access_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/request_token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "oauth_token=req&oauth_token_secret=reqsecret&oauth_callback_confirmed=true",
        ))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/access_token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("oauth_token=acc&oauth_token_secret=accsecret"),
        )
        .mount(&server)
        .await;

    let env = TestEnv::new(config(&server.uri(), false));

    env.cmd()
        .write_stdin("7654321\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("/oauth/authorize?oauth_token=req"))
        .stdout(predicate::str::contains("\"twitter_access_token\": \"acc\""))
        .stderr(predicate::str::contains("Save authentication token in configuration"));
}
