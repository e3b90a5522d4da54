mod common;

use rusty_shortener::domain::entities::Origin;
use rusty_shortener::domain::repositories::UrlRepository;
use serde_json::{Value, json};

use common::{BASE_URL, TEST_KEY};

#[tokio::test]
async fn test_custom_alias_success() {
    let (state, repo) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server
        .post("/generate_custom_url")
        .add_header("API-Key", TEST_KEY)
        .json(&json!({ "long_url": "https://example.com/spring", "alias": "Spring-Promo_24" }))
        .await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["code"], "Spring-Promo_24");
    assert_eq!(json["short_url"], format!("{}/Spring-Promo_24", BASE_URL));

    let record = repo.get("Spring-Promo_24").await.unwrap().unwrap();
    assert_eq!(record.origin, Origin::Custom);
    assert_eq!(record.long_url, "https://example.com/spring");
}

#[tokio::test]
async fn test_taken_alias_is_not_overwritten() {
    let (state, repo) = common::create_test_state();
    let server = common::create_test_server(state);

    server
        .post("/generate_custom_url")
        .add_header("API-Key", TEST_KEY)
        .json(&json!({ "long_url": "https://first.example.com", "alias": "promo" }))
        .await
        .assert_status_ok();

    let response = server
        .post("/generate_custom_url")
        .add_header("API-Key", "ops-key")
        .json(&json!({ "long_url": "https://second.example.com", "alias": "promo" }))
        .await;

    assert_eq!(response.status_code(), 409);
    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "already_taken");
    assert_eq!(json["error"]["details"]["alias"], "promo");

    let record = repo.get("promo").await.unwrap().unwrap();
    assert_eq!(record.long_url, "https://first.example.com");
    assert_eq!(record.owner_key_id, "frontend");
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn test_reserved_alias() {
    let (state, repo) = common::create_test_state();
    let server = common::create_test_server(state);

    for alias in ["health", "Generate_URL", "dns_resolver", "login"] {
        let response = server
            .post("/generate_custom_url")
            .add_header("API-Key", TEST_KEY)
            .json(&json!({ "long_url": "https://example.com", "alias": alias }))
            .await;

        assert_eq!(response.status_code(), 400, "accepted {:?}", alias);
        assert_eq!(response.json::<Value>()["error"]["code"], "reserved_alias");
    }

    assert!(repo.is_empty());
}

#[tokio::test]
async fn test_invalid_alias_format() {
    let (state, repo) = common::create_test_state();
    let server = common::create_test_server(state);

    let too_long = "a".repeat(33);
    for alias in ["", "has space", "slash/inside", "dot.ted", "ünï", too_long.as_str()] {
        let response = server
            .post("/generate_custom_url")
            .add_header("API-Key", TEST_KEY)
            .json(&json!({ "long_url": "https://example.com", "alias": alias }))
            .await;

        assert_eq!(response.status_code(), 400, "accepted {:?}", alias);
        assert_eq!(
            response.json::<Value>()["error"]["code"],
            "invalid_alias",
            "wrong error for {:?}",
            alias
        );
    }

    assert!(repo.is_empty());
}

#[tokio::test]
async fn test_max_length_alias_is_accepted() {
    let (state, _repo) = common::create_test_state();
    let server = common::create_test_server(state);

    let alias = "x".repeat(32);
    let response = server
        .post("/generate_custom_url")
        .add_header("API-Key", TEST_KEY)
        .json(&json!({ "long_url": "https://example.com", "alias": alias }))
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_unauthorized_does_not_claim_alias() {
    let (state, repo) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server
        .post("/generate_custom_url")
        .add_header("API-Key", "stolen")
        .json(&json!({ "long_url": "https://evil.example.com", "alias": "promo" }))
        .await;
    assert_eq!(response.status_code(), 401);
    assert!(repo.get("promo").await.unwrap().is_none());

    server
        .post("/generate_custom_url")
        .add_header("API-Key", TEST_KEY)
        .json(&json!({ "long_url": "https://example.com", "alias": "promo" }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_custom_alias_missing_alias_field() {
    let (state, _repo) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server
        .post("/generate_custom_url")
        .add_header("API-Key", TEST_KEY)
        .json(&json!({ "long_url": "https://example.com" }))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(
        response.json::<Value>()["error"]["code"],
        "malformed_request"
    );
}
