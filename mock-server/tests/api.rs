use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Channel, ErrorBody, Followers};
use tower::ServiceExt;

const V3: &str = "application/vnd.twitchtv.v3+json";
const V5: &str = "application/vnd.twitchtv.v5+json";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn twitch_request(uri: &str, accept: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header("Accept", accept)
        .header("Client-ID", "abc123")
        .body(String::new())
        .unwrap()
}

// --- channel ---

#[tokio::test]
async fn kraken_channel_by_id() {
    let resp = app()
        .oneshot(twitch_request("/kraken/channels/42", V3))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let channel: Channel = body_json(resp).await;
    assert_eq!(channel.name, "twitch");
    assert_eq!(channel.id, serde_json::json!(42));
    assert_eq!(channel.followers, 5);
}

#[tokio::test]
async fn kraken_channel_by_name() {
    let resp = app()
        .oneshot(twitch_request("/kraken/channels/twitch", V3))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let channel: Channel = body_json(resp).await;
    assert_eq!(channel.id, serde_json::json!(42));
}

#[tokio::test]
async fn unknown_channel_returns_404() {
    let resp = app()
        .oneshot(twitch_request("/kraken/channels/nobody", V3))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.status, 404);
}

#[tokio::test]
async fn garbled_channel_is_not_json() {
    let resp = app()
        .oneshot(twitch_request("/kraken/channels/garbled", V3))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body_bytes(resp).await;
    assert!(serde_json::from_slice::<serde_json::Value>(&bytes).is_err());
}

// --- header checks ---

#[tokio::test]
async fn missing_client_id_returns_400() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/kraken/channels/42")
                .header("Accept", V3)
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn accept_version_must_match_family() {
    let resp = app()
        .oneshot(twitch_request("/kraken/channels/42", V5))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn helix_without_token_returns_401() {
    let resp = app()
        .oneshot(twitch_request("/helix/channels/42", V5))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn helix_with_token_uses_string_ids() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/helix/channels/42")
                .header("Accept", V5)
                .header("Client-ID", "abc123")
                .header("Authorization", "Bearer tok")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let channel: Channel = body_json(resp).await;
    assert_eq!(channel.id, serde_json::json!("42"));
}

// --- follows ---

#[tokio::test]
async fn follows_default_page_has_everyone_newest_first() {
    let resp = app()
        .oneshot(twitch_request("/kraken/channels/42/follows", V3))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let page: Followers = body_json(resp).await;
    assert_eq!(page.total, 5);
    assert_eq!(page.follows.len(), 5);
    assert_eq!(page.follows[0].user.name, "zed");
}

#[tokio::test]
async fn follows_honours_limit_offset_and_direction() {
    let resp = app()
        .oneshot(twitch_request(
            "/kraken/channels/42/follows?direction=asc&limit=2&offset=1&_=7",
            V3,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let page: Followers = body_json(resp).await;
    assert_eq!(page.total, 5);
    let names: Vec<&str> = page.follows.iter().map(|f| f.user.name.as_str()).collect();
    assert_eq!(names, ["wren", "xavier"]);
}

#[tokio::test]
async fn follows_for_unknown_channel_returns_404() {
    let resp = app()
        .oneshot(twitch_request("/kraken/channels/nobody/follows", V3))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_family_returns_404() {
    let resp = app()
        .oneshot(twitch_request("/v7/channels/42", V3))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
