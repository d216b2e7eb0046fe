// [tests/mirror/libs/infra/worker_client/claim_cycle.test.rs]
/*!
 * =================================================================
 * APARATO: CLAIM CYCLE ROUND-TRIP TEST
 * OBJETIVO: Certificar que `WorkerClient::claim_task` desempaqueta
 *           correctamente tanto un `TaskPackage` como la ausencia de
 *           trabajo elegible, y que un `code != 0` se traduce en
 *           `ClientError::GatewayRejection`.
 * =================================================================
 */

use axum::{routing::post, Json, Router};
use cascade_domain_models::{Envelope, FeedSnapshot, TaskPackage};
use cascade_infra_worker_client::{ClientError, WorkerClient};
use chrono::Utc;

async fn spawn_stub_gateway(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", address)
}

#[tokio::test]
async fn claim_task_unwraps_an_assembled_package() {
    let package = TaskPackage {
        allocation_id: "alloc-001".to_string(),
        task_id: "task-001".to_string(),
        task_name: "nightly-sync".to_string(),
        web_hook_url: None,
        cron_exp: "0 0 * * * *".to_string(),
        headers: None,
        cookies: None,
        feeds: vec![FeedSnapshot {
            id: "feed-001".to_string(),
            faker_id: None,
            mp_name: None,
            mp_cover: None,
            mp_intro: None,
            status: None,
        }],
        dispatched_at: Utc::now(),
    };

    let router = Router::new().route(
        "/cascade/claim-task",
        post(move || {
            let package = package.clone();
            async move { Json(Envelope::ok(package)) }
        }),
    );
    let base_url = spawn_stub_gateway(router).await;

    let client = WorkerClient::new(base_url, "CNtest".to_string(), "CStest".to_string());
    let claimed = client.claim_task().await.unwrap();

    let claimed = claimed.expect("expected an assembled task package");
    assert_eq!(claimed.allocation_id, "alloc-001");
    assert_eq!(claimed.feeds.len(), 1);
}

#[tokio::test]
async fn claim_task_returns_none_on_empty_queue() {
    let router = Router::new().route(
        "/cascade/claim-task",
        post(|| async { Json(Envelope::<TaskPackage>::ok_empty()) }),
    );
    let base_url = spawn_stub_gateway(router).await;

    let client = WorkerClient::new(base_url, "CNtest".to_string(), "CStest".to_string());
    let claimed = client.claim_task().await.unwrap();

    assert!(claimed.is_none());
}

#[tokio::test]
async fn non_zero_envelope_code_becomes_gateway_rejection() {
    let router = Router::new().route(
        "/cascade/claim-task",
        post(|| async { Json(Envelope::<TaskPackage>::error(409, "allocation race lost")) }),
    );
    let base_url = spawn_stub_gateway(router).await;

    let client = WorkerClient::new(base_url, "CNtest".to_string(), "CStest".to_string());
    let outcome = client.claim_task().await;

    match outcome {
        Err(ClientError::GatewayRejection { code, .. }) => assert_eq!(code, 409),
        other => panic!("expected a gateway rejection, got: {:?}", other),
    }
}
