//! Integration tests for API endpoints
//!
//! These tests verify that:
//! - Check ingestion endpoints persist, synthesize and publish correctly
//! - Invalid input is rejected without side effects
//! - Site, alert, uptime and insight resources behave as documented
//! - Error responses carry the right status codes

use alertify::{broadcast::ChannelEvent, seed::demo_store};
use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{Value, json};

use crate::helpers::{create_ingestor, create_ingestor_with_store, spawn_test_hub};

async fn post(addr: std::net::SocketAddr, path: &str, body: Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://{addr}/api{path}"))
        .json(&body)
        .send()
        .await
        .unwrap()
}

async fn get(addr: std::net::SocketAddr, path: &str) -> reqwest::Response {
    reqwest::get(format!("http://{addr}/api{path}")).await.unwrap()
}

#[tokio::test]
async fn test_health_endpoint_returns_ok() {
    let addr = spawn_test_hub(create_ingestor()).await;

    let response = get(addr, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json: Value = response.json().await.unwrap();
    assert_eq!(json["status"], "ok");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_healthy_monitor_submission_creates_no_alert() {
    let ingestor = create_ingestor();
    let mut sub = ingestor.broadcaster().register().await;
    ingestor.broadcaster().mark_open(sub.id).await;
    let addr = spawn_test_hub(ingestor.clone()).await;

    let response = post(
        addr,
        "/monitor",
        json!({
            "siteId": 1,
            "url": "https://x.test",
            "statusCode": 200,
            "responseTime": 150,
            "success": true
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json: Value = response.json().await.unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["checkResult"]["status"], "success");
    assert_eq!(json["checkResult"]["siteId"], 1);

    let counts = ingestor.store().counts().await.unwrap();
    assert_eq!(counts.check_results, 1);
    assert_eq!(counts.alerts, 0);
    assert!(sub.events.try_recv().is_err());
}

#[tokio::test]
async fn test_failing_monitor_submission_creates_and_publishes_alert() {
    let ingestor = create_ingestor();
    let mut sub = ingestor.broadcaster().register().await;
    ingestor.broadcaster().mark_open(sub.id).await;
    let addr = spawn_test_hub(ingestor.clone()).await;

    let response = post(
        addr,
        "/monitor",
        json!({ "siteId": 1, "url": "https://x.test", "statusCode": 503 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json: Value = response.json().await.unwrap();
    assert_eq!(json["checkResult"]["status"], "error");
    assert_eq!(json["checkResult"]["success"], false);

    let alerts: Value = get(addr, "/sites/1/alerts").await.json().await.unwrap();
    let alerts = alerts.as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["type"], "error");
    assert_eq!(alerts[0]["status"], "active");
    assert_eq!(alerts[0]["message"], "HTTP 503 error at https://x.test");

    assert_matches!(
        sub.events.try_recv(),
        Ok(ChannelEvent::Alert { data }) if data.id == 1
    );
    assert!(sub.events.try_recv().is_err());
}

#[tokio::test]
async fn test_missing_site_id_is_rejected() {
    let ingestor = create_ingestor();
    let mut sub = ingestor.broadcaster().register().await;
    ingestor.broadcaster().mark_open(sub.id).await;
    let addr = spawn_test_hub(ingestor.clone()).await;

    let response = post(
        addr,
        "/monitor",
        json!({ "url": "https://x.test", "statusCode": 503 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json: Value = response.json().await.unwrap();
    assert!(json["error"].as_str().unwrap().contains("siteId"));

    let response = post(addr, "/check-results", json!({ "success": false })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(ingestor.store().counts().await.unwrap().total(), 0);
    assert!(sub.events.try_recv().is_err());
}

#[tokio::test]
async fn test_check_results_endpoint() {
    let addr = spawn_test_hub(create_ingestor()).await;

    let response = post(
        addr,
        "/check-results",
        json!({ "siteId": 2, "statusCode": 404, "responseTime": 80, "success": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json: Value = response.json().await.unwrap();
    assert_eq!(json["status"], "warning");

    let response = post(
        addr,
        "/check-results",
        json!({ "siteId": 2, "statusCode": 200, "responseTime": 90, "success": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let results: Vec<Value> = get(addr, "/sites/2/check-results").await.json().await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["id"], 2);

    let limited: Vec<Value> = get(addr, "/sites/2/check-results?limit=1")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(limited.len(), 1);

    let alerts: Vec<Value> = get(addr, "/sites/2/alerts").await.json().await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["message"], "Warning: Status code 404");
}

#[tokio::test]
async fn test_site_crud() {
    let addr = spawn_test_hub(create_ingestor()).await;
    let client = reqwest::Client::new();

    let response = post(
        addr,
        "/sites",
        json!({ "name": "Shop", "url": "https://shop.test", "type": "api" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let site: Value = response.json().await.unwrap();
    assert_eq!(site["id"], 1);
    assert_eq!(site["type"], "api");
    assert_eq!(site["checkFrequency"], 5);

    let response = post(addr, "/sites", json!({ "name": "No url" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let updated: Value = client
        .put(format!("http://{addr}/api/sites/1"))
        .json(&json!({ "active": false }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["active"], false);
    assert_eq!(updated["name"], "Shop");

    let details: Value = get(addr, "/sites/1").await.json().await.unwrap();
    assert_eq!(details["site"]["id"], 1);
    assert!(details["stats"].is_null());
    assert_eq!(details["activeAlerts"], json!([]));
    assert_eq!(details["checkResults"], json!([]));

    let response = client
        .delete(format!("http://{addr}/api/sites/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client
        .delete(format!("http://{addr}/api/sites/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(get(addr, "/sites/1").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_alert_transitions() {
    let addr = spawn_test_hub(create_ingestor_with_store(demo_store())).await;
    let client = reqwest::Client::new();
    let patch = |id: u64, body: Value| {
        client
            .patch(format!("http://{addr}/api/alerts/{id}"))
            .json(&body)
            .send()
    };

    let response = patch(2, json!({ "status": "acknowledged", "acknowledgedBy": 1 }))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let alert: Value = response.json().await.unwrap();
    assert_eq!(alert["acknowledgedBy"], 1);

    let response = patch(2, json!({ "status": "resolved" })).await.unwrap();
    let alert: Value = response.json().await.unwrap();
    assert_eq!(alert["status"], "resolved");
    assert!(alert["resolvedAt"].is_string());

    let response = patch(2, json!({ "status": "active" })).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = patch(99, json!({ "status": "resolved" })).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let active: Vec<Value> = get(addr, "/alerts").await.json().await.unwrap();
    assert_eq!(active.len(), 3);

    let resolved: Vec<Value> = get(addr, "/alerts?status=resolved").await.json().await.unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0]["id"], 2);
}

#[tokio::test]
async fn test_manual_alert_creation() {
    let ingestor = create_ingestor();
    let mut sub = ingestor.broadcaster().register().await;
    ingestor.broadcaster().mark_open(sub.id).await;
    let addr = spawn_test_hub(ingestor).await;

    let response = post(
        addr,
        "/alerts",
        json!({ "siteId": 4, "type": "critical", "message": "Memory Usage High" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let alert: Value = response.json().await.unwrap();
    assert_eq!(alert["type"], "critical");
    assert_eq!(alert["status"], "active");

    assert_matches!(
        sub.events.try_recv(),
        Ok(ChannelEvent::Alert { data }) if data.message == "Memory Usage High"
    );

    let response = post(addr, "/alerts", json!({ "siteId": 4, "type": "critical", "message": "" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stats_and_sites_with_demo_data() {
    let addr = spawn_test_hub(create_ingestor_with_store(demo_store())).await;

    let stats: Value = get(addr, "/stats").await.json().await.unwrap();
    assert_eq!(stats["websitesCount"], 5);
    assert_eq!(stats["alertsCount"], 4);
    assert_eq!(stats["averageUptime"], 99.1);
    assert_eq!(stats["avgResponseTime"], 567);
    assert_eq!(stats["subscribers"], 0);

    let sites: Vec<Value> = get(addr, "/sites").await.json().await.unwrap();
    assert_eq!(sites.len(), 5);
    assert_eq!(sites[0]["name"], "Main E-commerce Website");
    assert_eq!(sites[1]["type"], "mobile_app");
    assert_eq!(sites[4]["stats"]["uptimePercentage"], 97.5);
}

#[tokio::test]
async fn test_uptime_and_insights() {
    let addr = spawn_test_hub(create_ingestor()).await;
    let client = reqwest::Client::new();

    let response = post(
        addr,
        "/uptime-stats",
        json!({
            "siteId": 1,
            "period": "hourly",
            "uptimePercentage": 99.5,
            "avgResponseTime": 210.0,
            "checksCount": 60,
            "failedChecksCount": 0
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let stats: Vec<Value> = get(addr, "/sites/1/uptime-stats").await.json().await.unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0]["period"], "hourly");

    let response = post(
        addr,
        "/ai-insights",
        json!({
            "siteId": 1,
            "type": "anomaly",
            "message": "Response times doubled since the last deploy",
            "confidence": 0.6
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let insight: Value = response.json().await.unwrap();
    assert_eq!(insight["status"], "new");

    let updated: Value = client
        .patch(format!("http://{addr}/api/ai-insights/1"))
        .json(&json!({ "status": "reviewed" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["status"], "reviewed");
    assert_eq!(updated["confidence"], 0.6);

    let all: Vec<Value> = get(addr, "/ai-insights?limit=5").await.json().await.unwrap();
    assert_eq!(all.len(), 1);
    let by_site: Vec<Value> = get(addr, "/sites/1/ai-insights").await.json().await.unwrap();
    assert_eq!(by_site.len(), 1);

    let response = client
        .patch(format!("http://{addr}/api/ai-insights/9"))
        .json(&json!({ "status": "dismissed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
