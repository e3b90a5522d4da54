mod common;

use std::time::Duration;

use axum_test::TestServer;
use serde_json::json;

use common::TEST_KEY;
use rusty_shortener::api::middleware::rate_limit::{CREATE_BURST, CREATE_PER_SECOND};

async fn create_status(server: &TestServer) -> u16 {
    server
        .post("/generate_url")
        .add_header("API-Key", TEST_KEY)
        .json(&json!({ "long_url": "https://example.com" }))
        .await
        .status_code()
        .as_u16()
}

#[tokio::test]
async fn test_creation_burst_then_429() {
    let (state, repo) = common::create_test_state();
    let server = common::create_test_server(state);

    for _ in 0..CREATE_BURST {
        assert_eq!(create_status(&server).await, 200);
    }

    assert_eq!(create_status(&server).await, 429);
    assert_eq!(repo.len(), CREATE_BURST as usize);
}

#[tokio::test]
async fn test_creation_tokens_refill_at_sustained_rate() {
    let (state, _repo) = common::create_test_state();
    let server = common::create_test_server(state);

    for _ in 0..CREATE_BURST {
        create_status(&server).await;
    }
    assert_eq!(create_status(&server).await, 429);

    // Two seconds of idle time buys back two seconds' worth of requests.
    tokio::time::sleep(Duration::from_millis(2100)).await;

    let expected = (2 * CREATE_PER_SECOND) as usize;
    let mut accepted = 0;
    for _ in 0..expected {
        if create_status(&server).await == 200 {
            accepted += 1;
        }
    }

    assert!(
        accepted >= expected - 1,
        "only {} of {} requests accepted after refill",
        accepted,
        expected
    );
}

#[tokio::test]
async fn test_resolution_is_not_rate_limited() {
    let (state, _repo) = common::create_test_state();
    let server = common::create_test_server(state);

    for _ in 0..(CREATE_BURST + 10) {
        server.get("/dns_resolver/unknown1").await.assert_status_not_found();
    }
}
