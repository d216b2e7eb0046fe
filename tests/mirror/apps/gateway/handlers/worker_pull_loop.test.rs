// [tests/mirror/apps/gateway/handlers/worker_pull_loop.test.rs]
/*!
 * =================================================================
 * APARATO: WORKER PULL LOOP HAPPY PATH TEST
 * OBJETIVO: Certificar heartbeat -> claim -> executing -> upload ->
 *           report-completion de punta a punta sobre el router real.
 * =================================================================
 */

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use cascade_gateway::routes::create_sovereign_router;
use cascade_gateway::services::scheduler::CascadeScheduler;
use cascade_gateway::state::AppState;
use cascade_domain_models::{CreateTaskPayload, NodeKind};
use cascade_infra_store::repositories::{NodeRepository, TaskRepository};
use cascade_infra_store::CascadeStoreClient;
use std::sync::Arc;
use tower::ServiceExt;

fn authorized_request(method: &str, uri: &str, access_key: &str, secret: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("AK-SK {}:{}", access_key, secret))
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn claim_execute_and_complete_an_allocation() {
    let database_client = CascadeStoreClient::connect("file::memory:", None).await.unwrap();
    let scheduler = Arc::new(CascadeScheduler::new(database_client.clone()));
    let state = AppState::new(database_client.clone(), scheduler);

    let node_repository = NodeRepository::new(database_client.get_connection().unwrap());
    let (_coordinator, _coordinator_credentials) = node_repository
        .register_node(NodeKind::Coordinator, "root-coordinator", None)
        .await
        .unwrap();
    let (worker_node, worker_credentials) = node_repository
        .register_node(NodeKind::Worker, "worker-one", None)
        .await
        .unwrap();

    let task = TaskRepository::new(database_client.get_connection().unwrap())
        .create_task(CreateTaskPayload {
            name: "nightly-sync".to_string(),
            cron_expression: "0 0 * * * *".to_string(),
            feed_ids: vec!["feed-alpha".to_string()],
            enabled: true,
            webhook_url: None,
            headers: None,
            cookies: None,
        })
        .await
        .unwrap();

    cascade_gateway::services::dispatcher::dispatch_task(&database_client, &task, "run-001")
        .await
        .unwrap();

    let app = create_sovereign_router(state);

    // 1. HEARTBEAT
    let heartbeat_request = authorized_request(
        "POST",
        "/cascade/heartbeat",
        &worker_credentials.access_key,
        &worker_credentials.secret,
        serde_json::json!({}),
    );
    let response = app.clone().oneshot(heartbeat_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // 2. CLAIM
    let claim_request = authorized_request(
        "POST",
        "/cascade/claim-task",
        &worker_credentials.access_key,
        &worker_credentials.secret,
        serde_json::json!({}),
    );
    let response = app.clone().oneshot(claim_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let envelope: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
    let allocation_id = envelope["data"]["allocation_id"].as_str().unwrap().to_string();
    assert_eq!(envelope["data"]["task_id"].as_str().unwrap(), task.id);

    // 3. EXECUTING
    let status_request = authorized_request(
        "PUT",
        "/cascade/task-status",
        &worker_credentials.access_key,
        &worker_credentials.secret,
        serde_json::json!({ "allocation_id": allocation_id, "status": "executing", "error_message": null }),
    );
    let response = app.clone().oneshot(status_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // 4. UPLOAD ARTICLES
    let upload_request = authorized_request(
        "POST",
        "/cascade/upload-articles",
        &worker_credentials.access_key,
        &worker_credentials.secret,
        serde_json::json!({
            "allocation_id": allocation_id,
            "articles": [
                { "feed_id": "feed-alpha", "title": "headline", "url": "https://example.com/a", "publish_time": null, "digest": null, "content": null }
            ]
        }),
    );
    let response = app.clone().oneshot(upload_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // 5. REPORT COMPLETION
    let completion_request = authorized_request(
        "POST",
        "/cascade/report-completion",
        &worker_credentials.access_key,
        &worker_credentials.secret,
        serde_json::json!({
            "allocation_id": allocation_id,
            "task_id": task.id,
            "results": [
                { "feed_id": "feed-alpha", "article_count": 1, "new_article_count": 1, "status": "success", "error_message": null }
            ],
            "article_count": 1
        }),
    );
    let response = app.clone().oneshot(completion_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // 6. VERIFY FINAL STATE AS OPERATOR
    let list_request = authorized_request(
        "GET",
        &format!("/cascade/allocations?task_id={}", task.id),
        &_coordinator_credentials.access_key,
        &_coordinator_credentials.secret,
        serde_json::json!({}),
    );
    let response = app.oneshot(list_request).await.unwrap();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let envelope: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
    let allocations = envelope["data"].as_array().unwrap();
    assert_eq!(allocations.len(), 1);
    assert_eq!(allocations[0]["status"], "completed");
    assert_eq!(allocations[0]["article_count"], 1);
    assert_eq!(allocations[0]["node_id"].as_str().unwrap(), worker_node.id);
}
