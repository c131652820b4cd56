//! End-to-end tests for the apishape response layer.
//!
//! Each test spawns an ephemeral in-process demo service (real TCP, real
//! HTTP) via [`apishape_conformance::spawn_demo`] and checks the wire format
//! with a `reqwest` client.
//!
//! # Coverage
//!
//! | Test | Behavior |
//! |------|----------|
//! | `list_is_paginated_with_meta` | pagination meta, caller meta, default include |
//! | `pagination_links_preserve_query` | link generation |
//! | `last_page_has_no_next_link` | link bounds |
//! | `show_unknown_project_returns_404_envelope` | exception translation |
//! | `unknown_route_returns_404_envelope` | route-not-found kind |
//! | `create_returns_201_with_header` | created path, header merge |
//! | `create_invalid_returns_422_field_map` | validation responder |
//! | `update_and_delete_return_success_envelopes` | success template |
//! | `method_override_via_query` | `_method` input |
//! | `include_and_exclude_negotiation` | include negotiation |
//! | `jsonp_callback_wraps_body` | JSONP |
//! | `invalid_jsonp_callback_is_ignored` | JSONP guard |
//! | `custom_templates_and_default_headers` | configured envelopes |
//! | `data_array_serializer_wraps_items` | serializer strategy |
//! | `unix_timestamps` | timestamp coercion |

use apishape::{ApiConfig, ErrorEnvelope, SerializerKind, SuccessEnvelope, TimestampFormat};
use apishape_conformance::{spawn_demo, spawn_demo_with};
use apishape_demo::Store;
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .unwrap()
}

async fn get_json(client: &reqwest::Client, url: &str) -> (u16, Value) {
    let resp = client.get(url).send().await.unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

// ---------------------------------------------------------------------------
// Listing and pagination
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_is_paginated_with_meta() {
    let (base, _) = spawn_demo().await;
    let (status, body) = get_json(&make_client(), &format!("{base}/v1/projects")).await;

    assert_eq!(status, 200);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 25);
    assert!(data.iter().all(|p| p.get("manager").is_some()));
    assert_eq!(body["meta"]["foo"], "bar");

    let pagination = &body["meta"]["pagination"];
    assert_eq!(pagination["total"], 100);
    assert_eq!(pagination["count"], 25);
    assert_eq!(pagination["per_page"], 25);
    assert_eq!(pagination["current_page"], 1);
    assert_eq!(pagination["total_pages"], 4);
    assert!(pagination["links"].get("previous").is_none());
    assert_eq!(pagination["links"]["next"], format!("{base}/v1/projects?page=2"));
}

#[tokio::test]
async fn pagination_links_preserve_query() {
    let (base, _) = spawn_demo().await;
    let url = format!("{base}/v1/projects?include=manager&page=3");
    let (_, body) = get_json(&make_client(), &url).await;

    let links = &body["meta"]["pagination"]["links"];
    assert_eq!(links["previous"], format!("{base}/v1/projects?include=manager&page=2"));
    assert_eq!(links["next"], format!("{base}/v1/projects?include=manager&page=4"));
}

#[tokio::test]
async fn last_page_has_no_next_link() {
    let (base, _) = spawn_demo().await;
    let (_, body) = get_json(&make_client(), &format!("{base}/v1/projects?page=4")).await;

    let links = &body["meta"]["pagination"]["links"];
    assert!(links.get("next").is_none());
    assert_eq!(links["previous"], format!("{base}/v1/projects?page=3"));
    assert_eq!(body["data"].as_array().unwrap().last().unwrap()["id"], 1);
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn show_unknown_project_returns_404_envelope() {
    let (base, _) = spawn_demo().await;
    let resp = make_client()
        .get(format!("{base}/v1/projects/4242"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let envelope: ErrorEnvelope = resp.json().await.unwrap();
    assert_eq!(envelope, ErrorEnvelope::new(404, "No query results for project 4242"));
}

#[tokio::test]
async fn unknown_route_returns_404_envelope() {
    let (base, _) = spawn_demo().await;
    let resp = make_client()
        .get(format!("{base}/v1/does-not-exist"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let envelope: ErrorEnvelope = resp.json().await.unwrap();
    assert_eq!(envelope.error.code, 404);
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_returns_201_with_header() {
    let (base, store) = spawn_demo().await;
    let resp = make_client()
        .post(format!("{base}/v1/projects"))
        .json(&json!({"title": "Conformance", "description": "Created over HTTP"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 201);
    assert_eq!(resp.headers()["x-additional-header"], "value");
    assert_eq!(resp.headers()["content-type"], "application/json");
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["title"], "Conformance");
    assert_eq!(body["manager"]["id"], 1);

    let id = body["id"].as_u64().unwrap();
    let stored = store.find_project(id).await.unwrap();
    assert_eq!(stored.description.as_deref(), Some("Created over HTTP"));
}

#[tokio::test]
async fn create_invalid_returns_422_field_map() {
    let (base, _) = spawn_demo().await;
    let resp = make_client()
        .post(format!("{base}/v1/projects"))
        .json(&json!({"description": "x"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 422);
    let envelope: ErrorEnvelope = resp.json().await.unwrap();
    assert_eq!(envelope.error.code, 422);
    assert_eq!(
        envelope.error.message,
        json!({
            "description": ["The description must be at least 2 characters."],
            "title": ["The title field is required."]
        })
    );
}

#[tokio::test]
async fn update_and_delete_return_success_envelopes() {
    let (base, store) = spawn_demo().await;
    let client = make_client();

    let resp = client
        .patch(format!("{base}/v1/projects/10"))
        .json(&json!({"title": "Patched", "deprecated": true}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let envelope: SuccessEnvelope = resp.json().await.unwrap();
    assert_eq!(envelope, SuccessEnvelope::new(200, "Updated"));
    let project = store.find_project(10).await.unwrap();
    assert_eq!(project.title, "Patched");
    assert!(project.deprecated);

    let resp = client
        .delete(format!("{base}/v1/projects/10"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let envelope: SuccessEnvelope = resp.json().await.unwrap();
    assert_eq!(envelope.success.message_str(), Some("Deleted"));
    assert!(store.find_project(10).await.is_err());
}

#[tokio::test]
async fn method_override_via_query() {
    let (base, store) = spawn_demo().await;
    let resp = make_client()
        .post(format!("{base}/v1/projects/11?_method=DELETE"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(store.find_project(11).await.is_err());
}

// ---------------------------------------------------------------------------
// Negotiation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn include_and_exclude_negotiation() {
    let (base, _) = spawn_demo().await;
    let client = make_client();

    let (_, body) = get_json(&client, &format!("{base}/v1/projects/1")).await;
    assert_eq!(body["manager"]["name"], "manager1");

    let (_, body) = get_json(&client, &format!("{base}/v1/projects/1?exclude=manager")).await;
    assert!(body.get("manager").is_none());

    // Unknown includes are ignored.
    let (status, body) = get_json(&client, &format!("{base}/v1/projects/1?include=owner")).await;
    assert_eq!(status, 200);
    assert!(body.get("owner").is_none());
}

#[tokio::test]
async fn jsonp_callback_wraps_body() {
    let (base, _) = spawn_demo().await;
    let resp = make_client()
        .get(format!("{base}/v1/projects/1?callback=handle"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["content-type"], "text/javascript");
    let text = resp.text().await.unwrap();
    assert!(text.starts_with("/**/handle({"), "{text}");
    assert!(text.ends_with("});"), "{text}");
}

#[tokio::test]
async fn invalid_jsonp_callback_is_ignored() {
    let (base, _) = spawn_demo().await;
    let resp = make_client()
        .get(format!("{base}/v1/projects/1?callback=alert(1)"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["content-type"], "application/json");
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["id"], 1);
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[tokio::test]
async fn custom_templates_and_default_headers() {
    let api = ApiConfig::from_json_str(
        r#"{
            "errorFormat": {"status": "error", "detail": {"http": ":code", "text": ":message"}},
            "successFormat": {"ok": true, "result": ":message"},
            "defaultHeaders": {"x-api-version": "1"}
        }"#,
    )
    .unwrap();
    let (base, _) = spawn_demo_with(api).await;
    let client = make_client();

    let resp = client
        .get(format!("{base}/v1/projects/999"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(resp.headers()["x-api-version"], "1");
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({"status": "error", "detail": {"http": 404, "text": "No query results for project 999"}})
    );

    let resp = client
        .delete(format!("{base}/v1/projects/2"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"ok": true, "result": "Deleted"}));
}

#[tokio::test]
async fn data_array_serializer_wraps_items() {
    let api = ApiConfig {
        serializer: SerializerKind::DataArray,
        ..ApiConfig::default()
    };
    let (base, _) = spawn_demo_with(api).await;
    let (_, body) = get_json(&make_client(), &format!("{base}/v1/projects/1")).await;

    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["manager"]["data"]["id"], 1);
    assert_eq!(body["meta"]["foo"], "bar");
}

#[tokio::test]
async fn unix_timestamps() {
    let api = ApiConfig {
        timestamps: TimestampFormat::Unix,
        ..ApiConfig::default()
    };
    let (base, _) = spawn_demo_with(api).await;
    let (_, body) = get_json(&make_client(), &format!("{base}/v1/projects/1")).await;

    assert!(body["created_at"].is_i64());
    assert!(body["manager"]["created_at"].is_i64());
}
