// [tests/mirror/apps/gateway/handlers/dispatch_allocation_binding.test.rs]
/*!
 * =================================================================
 * APARATO: ALLOCATION/NODE BINDING ENFORCEMENT TEST
 * OBJETIVO: Certificar que un nodo trabajador distinto del que reclamó
 *           una allocation no puede mutar su estado, subir artículos ni
 *           sellar su cierre — el guardia SQL `WHERE node_id = ?`
 *           colapsa el intento en `StoreError::InvalidState`.
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
async fn a_foreign_node_cannot_mutate_another_nodes_claimed_allocation() {
    let database_client = CascadeStoreClient::connect("file::memory:", None).await.unwrap();
    let scheduler = Arc::new(CascadeScheduler::new(database_client.clone()));
    let state = AppState::new(database_client.clone(), scheduler);

    let node_repository = NodeRepository::new(database_client.get_connection().unwrap());
    node_repository
        .register_node(NodeKind::Coordinator, "root-coordinator", None)
        .await
        .unwrap();
    let (_owner_node, owner_credentials) = node_repository
        .register_node(NodeKind::Worker, "worker-owner", None)
        .await
        .unwrap();
    let (_intruder_node, intruder_credentials) = node_repository
        .register_node(NodeKind::Worker, "worker-intruder", None)
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

    // The owner claims the only pending allocation.
    let claim_request = authorized_request(
        "POST",
        "/cascade/claim-task",
        &owner_credentials.access_key,
        &owner_credentials.secret,
        serde_json::json!({}),
    );
    let response = app.clone().oneshot(claim_request).await.unwrap();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let envelope: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
    let allocation_id = envelope["data"]["allocation_id"].as_str().unwrap().to_string();

    // The intruder has nothing left to claim.
    let intruder_claim_request = authorized_request(
        "POST",
        "/cascade/claim-task",
        &intruder_credentials.access_key,
        &intruder_credentials.secret,
        serde_json::json!({}),
    );
    let response = app.clone().oneshot(intruder_claim_request).await.unwrap();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let envelope: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
    assert!(envelope["data"].is_null());

    // The intruder tries to transition the owner's allocation anyway.
    let status_request = authorized_request(
        "PUT",
        "/cascade/task-status",
        &intruder_credentials.access_key,
        &intruder_credentials.secret,
        serde_json::json!({ "allocation_id": allocation_id, "status": "executing", "error_message": null }),
    );
    let response = app.clone().oneshot(status_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The intruder tries to upload articles against it.
    let upload_request = authorized_request(
        "POST",
        "/cascade/upload-articles",
        &intruder_credentials.access_key,
        &intruder_credentials.secret,
        serde_json::json!({ "allocation_id": allocation_id, "articles": [] }),
    );
    let response = app.clone().oneshot(upload_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The intruder tries to seal it as completed.
    let completion_request = authorized_request(
        "POST",
        "/cascade/report-completion",
        &intruder_credentials.access_key,
        &intruder_credentials.secret,
        serde_json::json!({
            "allocation_id": allocation_id,
            "task_id": task.id,
            "results": [],
            "article_count": 0
        }),
    );
    let response = app.clone().oneshot(completion_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The true owner can still legitimately transition its own allocation.
    let owner_status_request = authorized_request(
        "PUT",
        "/cascade/task-status",
        &owner_credentials.access_key,
        &owner_credentials.secret,
        serde_json::json!({ "allocation_id": allocation_id, "status": "executing", "error_message": null }),
    );
    let response = app.oneshot(owner_status_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
