//! HTTP API through the router, backed by in-memory SQLite and a mock
//! provider server

mod helpers;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use cverse_images::config::{ProviderEndpoints, ProviderKeys};
use cverse_images::db::SqliteCharacterStore;
use cverse_images::profile::ResolverProfile;
use cverse_images::providers::ProviderKind;
use cverse_images::{build_router, AppState};
use helpers::db_utils::{create_test_db, insert_character, insert_universe, stored_image};
use helpers::fake_store::MemoryStore;
use helpers::mock_providers::{MockProviderServer, MockReply, MockResponses};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::ServiceExt;

async fn seeded_pool() -> SqlitePool {
    let pool = create_test_db().await;
    insert_universe(&pool, "u1", "Marvel Comics").await;
    insert_universe(&pool, "u2", "Greek Mythology").await;
    insert_character(&pool, "c1", "Spider-Man", "u1", None).await;
    insert_character(
        &pool,
        "c2",
        "Zeus",
        "u2",
        Some(("Generated", "Generated Avatar (Commercial OK)")),
    )
    .await;
    pool
}

fn test_state(pool: SqlitePool, server: &MockProviderServer) -> AppState {
    let mut profile = ResolverProfile::commercial();
    profile.batch_delay_ms = 0;
    AppState::new(
        pool.clone(),
        Arc::new(SqliteCharacterStore::new(pool)),
        reqwest::Client::new(),
        profile,
        ProviderKeys::default(),
    )
    .with_endpoints(ProviderEndpoints::all(&server.base_url))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = MockProviderServer::start(MockResponses::default()).await;
    let app = build_router(test_state(create_test_db().await, &server));

    let (status, body) = send(app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "cverse-images");
    assert_eq!(body["profile"], "commercial");
    assert!(body["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_list_images_for_unknown_character_is_404() {
    let server = MockProviderServer::start(MockResponses::default()).await;
    let app = build_router(test_state(seeded_pool().await, &server));

    let (status, body) = send(app, get("/api/characters/missing/images")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(server.requests().len(), 0);
}

#[tokio::test]
async fn test_list_images_returns_candidates_and_avatars() {
    let server = MockProviderServer::start(MockResponses {
        wikimedia: MockReply::Json(json!({
            "query": {"search": [{"title": "File:Zeus public domain.jpg", "snippet": ""}]}
        })),
        ..MockResponses::default()
    })
    .await;
    let app = build_router(test_state(seeded_pool().await, &server));

    let (status, body) = send(app, get("/api/characters/c2/images?width=200")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["character"]["id"], "c2");
    assert_eq!(body["character"]["name"], "Zeus");
    assert_eq!(body["character"]["currentImage"], "https://example.org/c2.png");
    assert_eq!(body["character"]["imageSource"], "Generated");

    let options = body["imageOptions"].as_array().unwrap();
    // Five commercial Wikimedia search terms plus the fallback avatar
    assert_eq!(options.len(), 6);
    assert_eq!(options[0]["source"], "Wikimedia");
    assert_eq!(options[5]["source"], "Generated");
    assert!(options[5]["url"].as_str().unwrap().contains("size=200"));

    let avatars = body["avatarOptions"].as_array().unwrap();
    assert_eq!(avatars.len(), 6);
    assert!(avatars
        .iter()
        .all(|a| a["url"].as_str().unwrap().contains("name=Z&size=200")));
}

#[tokio::test]
async fn test_select_image_stores_validated_url() {
    let server = MockProviderServer::start(MockResponses::default()).await;
    let pool = seeded_pool().await;
    let app = build_router(test_state(pool.clone(), &server));
    let image_url = server.url("/images/portrait.png");

    let (status, body) = send(
        app,
        post_json(
            "/api/characters/c1/images",
            json!({
                "imageUrl": image_url,
                "source": "Wikimedia",
                "license": "CC0",
                "attribution": "Wikimedia Commons - portrait.png"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["character"]["imageUrl"], image_url.as_str());
    assert_eq!(body["character"]["imageLicense"], "CC0");

    let (url, source, license, attribution) = stored_image(&pool, "c1").await;
    assert_eq!(url.as_deref(), Some(image_url.as_str()));
    assert_eq!(source.as_deref(), Some("Wikimedia"));
    assert_eq!(license.as_deref(), Some("CC0"));
    assert_eq!(attribution.as_deref(), Some("Wikimedia Commons - portrait.png"));
}

#[tokio::test]
async fn test_select_image_rejects_non_image_url() {
    let server = MockProviderServer::start(MockResponses::default()).await;
    let pool = seeded_pool().await;
    let app = build_router(test_state(pool.clone(), &server));

    let (status, body) = send(
        app,
        post_json(
            "/api/characters/c1/images",
            json!({"imageUrl": server.url("/pages/about.html"), "source": "Manual"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Invalid image URL");
    assert_eq!(stored_image(&pool, "c1").await.0, None);
}

#[tokio::test]
async fn test_select_image_for_unknown_character_is_404() {
    let server = MockProviderServer::start(MockResponses::default()).await;
    let app = build_router(test_state(seeded_pool().await, &server));

    let (status, _) = send(
        app,
        post_json(
            "/api/characters/missing/images",
            json!({"imageUrl": server.url("/images/portrait.png")}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(server.requests().len(), 0);
}

#[tokio::test]
async fn test_batch_info_lists_profile_sources() {
    let server = MockProviderServer::start(MockResponses::default()).await;
    let app = build_router(test_state(create_test_db().await, &server));

    let (status, body) = send(app, get("/api/update-images")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"], "commercial");
    let sources = body["sources"].as_array().unwrap();
    assert_eq!(sources.len(), 5);
    assert!(sources[0].as_str().unwrap().starts_with("Wikimedia Commons"));
}

#[tokio::test]
async fn test_batch_update_persists_fallback_avatar() {
    let server = MockProviderServer::start(MockResponses::default()).await;
    let pool = seeded_pool().await;
    let app = build_router(test_state(pool.clone(), &server));

    let (status, body) = send(app, post_json("/api/update-images", json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Character images updated successfully");
    assert_eq!(body["stats"], json!({"updated": 1, "failed": 0, "skipped": 1}));

    let (url, source, _, _) = stored_image(&pool, "c1").await;
    assert_eq!(source.as_deref(), Some("Generated"));
    assert!(url.unwrap().contains("name=SM"));

    // Zeus already had a commercial-safe image: no search issued for him
    assert!(server
        .requests()
        .iter()
        .all(|r| !r.query.contains("Zeus")));
}

#[tokio::test]
async fn test_batch_update_reports_listing_failure() {
    let server = MockProviderServer::start(MockResponses::default()).await;
    let pool = create_test_db().await;
    let state = AppState::new(
        pool,
        Arc::new(MemoryStore::unavailable()),
        reqwest::Client::new(),
        ResolverProfile::commercial(),
        ProviderKeys::default(),
    )
    .with_endpoints(ProviderEndpoints::all(&server.base_url));

    let (status, body) = send(build_router(state), post_json("/api/update-images", json!({}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Failed to update character images");
    assert!(body["details"].as_str().unwrap().contains("storage unavailable"));
}

#[tokio::test]
async fn test_concurrent_batch_is_conflict() {
    let server = MockProviderServer::start(MockResponses::default()).await;
    let state = test_state(seeded_pool().await, &server);
    let lock = state.batch_lock.clone();
    let _running = lock.lock().await;

    let (status, body) = send(build_router(state), post_json("/api/update-images", json!({}))).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_set_provider_key_updates_database_and_state() {
    let server = MockProviderServer::start(MockResponses::default()).await;
    let pool = create_test_db().await;
    let state = test_state(pool.clone(), &server);
    let keys = state.keys.clone();

    let (status, body) = send(
        build_router(state),
        post_json("/api/settings/api-keys/TMDB", json!({"api_key": "tmdb-key"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        cverse_images::db::settings::get_provider_api_key(&pool, ProviderKind::Tmdb)
            .await
            .unwrap()
            .as_deref(),
        Some("tmdb-key")
    );
    assert_eq!(keys.read().await.tmdb.as_deref(), Some("tmdb-key"));
}

#[tokio::test]
async fn test_set_provider_key_validation() {
    let server = MockProviderServer::start(MockResponses::default()).await;
    let pool = create_test_db().await;

    for (provider, key) in [("pexels", "   "), ("wikimedia", "abc"), ("flickr", "abc")] {
        let app = build_router(test_state(pool.clone(), &server));
        let (status, body) = send(
            app,
            post_json(
                &format!("/api/settings/api-keys/{}", provider),
                json!({"api_key": key}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "provider {}", provider);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM settings")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, 0);
}
