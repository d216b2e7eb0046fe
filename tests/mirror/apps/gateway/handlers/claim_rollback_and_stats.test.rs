// [tests/mirror/apps/gateway/handlers/claim_rollback_and_stats.test.rs]
/*!
 * =================================================================
 * APARATO: CLAIM ROLLBACK & STATS CERTIFICATION TEST
 * OBJETIVO: Certificar que un claim cuya tarea desapareció o fue
 *           deshabilitada se sella como 'failed' sin exponer un error
 *           al worker, y que el bloque de estadísticas refleja nodos
 *           en línea derivados en vivo.
 * =================================================================
 */

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use cascade_domain_models::{CreateTaskPayload, NodeKind};
use cascade_gateway::routes::create_sovereign_router;
use cascade_gateway::services::scheduler::CascadeScheduler;
use cascade_gateway::state::AppState;
use cascade_infra_store::repositories::{AllocationRepository, NodeRepository, TaskRepository};
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
async fn claiming_an_allocation_whose_task_was_deleted_seals_it_as_failed_with_empty_data() {
    let database_client = CascadeStoreClient::connect("file::memory:", None).await.unwrap();
    let scheduler = Arc::new(CascadeScheduler::new(database_client.clone()));
    let state = AppState::new(database_client.clone(), scheduler);

    let node_repository = NodeRepository::new(database_client.get_connection().unwrap());
    let (_coordinator, coordinator_credentials) = node_repository
        .register_node(NodeKind::Coordinator, "root-coordinator", None)
        .await
        .unwrap();
    let (_worker_node, worker_credentials) = node_repository
        .register_node(NodeKind::Worker, "worker-vanishing-task", None)
        .await
        .unwrap();

    let task = TaskRepository::new(database_client.get_connection().unwrap())
        .create_task(CreateTaskPayload {
            name: "soon-to-vanish".to_string(),
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

    TaskRepository::new(database_client.get_connection().unwrap())
        .delete_task(&task.id)
        .await
        .unwrap();

    let app = create_sovereign_router(state);

    let claim_request = authorized_request(
        "POST",
        "/cascade/claim-task",
        &worker_credentials.access_key,
        &worker_credentials.secret,
        serde_json::json!({}),
    );
    let response = app.clone().oneshot(claim_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK, "a vanished task must present as no eligible work, not an error");
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let envelope: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(envelope["code"], 0);
    assert!(envelope["data"].is_null());

    let list_request = authorized_request(
        "GET",
        &format!("/cascade/allocations?task_id={}", task.id),
        &coordinator_credentials.access_key,
        &coordinator_credentials.secret,
        serde_json::json!({}),
    );
    let response = app.oneshot(list_request).await.unwrap();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let envelope: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
    let allocations = envelope["data"].as_array().unwrap();
    assert_eq!(allocations.len(), 1);
    assert_eq!(allocations[0]["status"], "failed");
    assert_eq!(allocations[0]["error_message"].as_str().unwrap(), "task missing");
}

#[tokio::test]
async fn claiming_an_allocation_whose_task_was_disabled_seals_it_as_failed() {
    let database_client = CascadeStoreClient::connect("file::memory:", None).await.unwrap();
    let scheduler = Arc::new(CascadeScheduler::new(database_client.clone()));
    let state = AppState::new(database_client.clone(), scheduler);

    let node_repository = NodeRepository::new(database_client.get_connection().unwrap());
    let (_worker_node, worker_credentials) = node_repository
        .register_node(NodeKind::Worker, "worker-disabled-task", None)
        .await
        .unwrap();

    let task = TaskRepository::new(database_client.get_connection().unwrap())
        .create_task(CreateTaskPayload {
            name: "soon-to-be-disabled".to_string(),
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

    TaskRepository::new(database_client.get_connection().unwrap())
        .set_enabled(&task.id, false)
        .await
        .unwrap();

    let app = create_sovereign_router(state);

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
    assert!(envelope["data"].is_null(), "a disabled task must never reach the worker as a dispatched package");

    let repository = AllocationRepository::new(database_client.get_connection().unwrap());
    let allocations = repository.list_by_task(&task.id, 10, 0).await.unwrap();
    assert_eq!(allocations.len(), 1);
    assert_eq!(allocations[0].status.as_str(), "failed");
}

#[tokio::test]
async fn pending_allocation_stats_reflects_only_nodes_heartbeating_within_the_window() {
    let database_client = CascadeStoreClient::connect("file::memory:", None).await.unwrap();
    let scheduler = Arc::new(CascadeScheduler::new(database_client.clone()));
    let state = AppState::new(database_client.clone(), scheduler);

    let node_repository = NodeRepository::new(database_client.get_connection().unwrap());
    let (_coordinator, coordinator_credentials) = node_repository
        .register_node(NodeKind::Coordinator, "root-coordinator", None)
        .await
        .unwrap();
    let (_worker_node, worker_credentials) = node_repository
        .register_node(NodeKind::Worker, "worker-alive", None)
        .await
        .unwrap();
    let (_idle_worker_node, _idle_worker_credentials) = node_repository
        .register_node(NodeKind::Worker, "worker-never-heartbeat", None)
        .await
        .unwrap();

    let app = create_sovereign_router(state);

    let heartbeat_request = authorized_request(
        "POST",
        "/cascade/heartbeat",
        &worker_credentials.access_key,
        &worker_credentials.secret,
        serde_json::json!({}),
    );
    let response = app.clone().oneshot(heartbeat_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stats_request = authorized_request(
        "GET",
        "/cascade/pending-allocations",
        &coordinator_credentials.access_key,
        &coordinator_credentials.secret,
        serde_json::json!({}),
    );
    let response = app.oneshot(stats_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let envelope: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    // The coordinator heartbeats implicitly on every authenticated request
    // (via auth_guard), so it and the heartbeating worker both classify
    // online; the worker that never spoke never does.
    assert_eq!(envelope["data"]["online_nodes"], 2);
}
