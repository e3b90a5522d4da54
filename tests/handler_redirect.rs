mod common;

use rusty_shortener::domain::entities::{NewUrlRecord, Origin};
use rusty_shortener::domain::repositories::UrlRepository;
use rusty_shortener::infrastructure::persistence::MemoryUrlRepository;
use serde_json::Value;

async fn seed(repo: &MemoryUrlRepository, code: &str, url: &str) {
    repo.insert_if_absent(NewUrlRecord {
        code: code.to_string(),
        long_url: url.to_string(),
        origin: Origin::Custom,
        owner_key_id: "frontend".to_string(),
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_redirect_success() {
    let (state, repo) = common::create_test_state();
    seed(&repo, "redirect1", "https://example.com/target?q=1&r=2").await;
    let server = common::create_test_server(state);

    let response = server.get("/dns_resolver/redirect1").await;

    assert_eq!(response.status_code(), 307);
    assert_eq!(
        response.header("location"),
        "https://example.com/target?q=1&r=2"
    );
}

#[tokio::test]
async fn test_redirect_not_found() {
    let (state, _repo) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server.get("/dns_resolver/nonexistent").await;

    assert_eq!(response.status_code(), 404);
    assert_eq!(response.json::<Value>()["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_redirect_malformed_code_is_not_found() {
    let (state, _repo) = common::create_test_state();
    let server = common::create_test_server(state);

    let too_long = "a".repeat(64);
    let response = server.get(&format!("/dns_resolver/{}", too_long)).await;
    assert_eq!(response.status_code(), 404);

    let response = server.get("/dns_resolver/bad%20code").await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_codes_are_case_sensitive() {
    let (state, repo) = common::create_test_state();
    seed(&repo, "AbC123", "https://example.com/upper").await;
    let server = common::create_test_server(state);

    assert_eq!(server.get("/dns_resolver/AbC123").await.status_code(), 307);
    assert_eq!(server.get("/dns_resolver/abc123").await.status_code(), 404);
}

#[tokio::test]
async fn test_redirect_url_json_success() {
    let (state, repo) = common::create_test_state();
    seed(&repo, "jsoncode", "https://example.com/a/b?c=1").await;
    let server = common::create_test_server(state);

    let response = server
        .get("/redirect_url")
        .add_query_param("short_url", "jsoncode")
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["status"], "success");
    assert_eq!(json["redirect_to"], "https://example.com/a/b?c=1");
}

#[tokio::test]
async fn test_redirect_url_accepts_full_short_url() {
    let (state, repo) = common::create_test_state();
    seed(&repo, "fullurl", "https://example.com").await;
    let server = common::create_test_server(state);

    let response = server
        .get("/redirect_url")
        .add_query_param("short_url", format!("{}/fullurl", common::BASE_URL))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["redirect_to"], "https://example.com");
}

#[tokio::test]
async fn test_redirect_url_json_not_found() {
    let (state, _repo) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server
        .get("/redirect_url")
        .add_query_param("short_url", "missing")
        .await;

    assert_eq!(response.status_code(), 404);
    let json = response.json::<Value>();
    assert_eq!(json["status"], "error");
    assert_eq!(json["message"], "Short URL not found");
}

#[tokio::test]
async fn test_redirect_url_without_query() {
    let (state, _repo) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server.get("/redirect_url").await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(
        response.json::<Value>()["error"]["code"],
        "malformed_request"
    );
}

#[tokio::test]
async fn test_resolution_needs_no_api_key() {
    let (state, repo) = common::create_test_state();
    seed(&repo, "public", "https://example.com").await;
    let server = common::create_test_server(state);

    for _ in 0..3 {
        let response = server.get("/dns_resolver/public").await;
        assert_eq!(response.status_code(), 307);
        assert_eq!(response.header("location"), "https://example.com");
    }
}
