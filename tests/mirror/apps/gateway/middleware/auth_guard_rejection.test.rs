// [tests/mirror/apps/gateway/middleware/auth_guard_rejection.test.rs]
/*!
 * =================================================================
 * APARATO: AUTHENTICATION GUARD REJECTION TEST
 * OBJETIVO: Certificar que toda forma de fallo de autenticación
 *           colapsa en un 401 genérico sin fuga de información, y que
 *           un llamante autenticado pero no-operador recibe 403 en una
 *           ruta de autoridad exclusiva de coordinador.
 * =================================================================
 */

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use cascade_gateway::routes::create_sovereign_router;
use cascade_gateway::services::scheduler::CascadeScheduler;
use cascade_gateway::state::AppState;
use cascade_domain_models::NodeKind;
use cascade_infra_store::repositories::NodeRepository;
use cascade_infra_store::CascadeStoreClient;
use std::sync::Arc;
use tower::ServiceExt;

async fn build_app_with_one_worker() -> (axum::Router, String, String) {
    let database_client = CascadeStoreClient::connect("file::memory:", None).await.unwrap();
    let scheduler = Arc::new(CascadeScheduler::new(database_client.clone()));
    let state = AppState::new(database_client.clone(), scheduler);

    let node_repository = NodeRepository::new(database_client.get_connection().unwrap());
    let (_worker_node, worker_credentials) = node_repository
        .register_node(NodeKind::Worker, "worker-one", None)
        .await
        .unwrap();

    let app = create_sovereign_router(state);
    (app, worker_credentials.access_key, worker_credentials.secret)
}

fn request_with_header(uri: &str, header_value: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri).header("content-type", "application/json");
    if let Some(value) = header_value {
        builder = builder.header("authorization", value);
    }
    builder.body(Body::from("{}")).unwrap()
}

#[tokio::test]
async fn missing_authorization_header_is_rejected() {
    let (app, _access_key, _secret) = build_app_with_one_worker().await;

    let request = request_with_header("/cascade/heartbeat", None);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_scheme_prefix_is_rejected() {
    let (app, access_key, secret) = build_app_with_one_worker().await;

    let request = request_with_header("/cascade/heartbeat", Some(&format!("Bearer {}:{}", access_key, secret)));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_separator_is_rejected() {
    let (app, access_key, _secret) = build_app_with_one_worker().await;

    let request = request_with_header("/cascade/heartbeat", Some(&format!("AK-SK {}", access_key)));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_secret_is_rejected() {
    let (app, access_key, _secret) = build_app_with_one_worker().await;

    let request = request_with_header("/cascade/heartbeat", Some(&format!("AK-SK {}:wrong-secret", access_key)));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_access_key_is_rejected() {
    let (app, _access_key, _secret) = build_app_with_one_worker().await;

    let request = request_with_header("/cascade/heartbeat", Some("AK-SK CNghost:CSghost"));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn authenticated_non_operator_is_forbidden_on_an_operator_route() {
    let (app, access_key, secret) = build_app_with_one_worker().await;

    let request = Request::builder()
        .method("GET")
        .uri("/cascade/nodes")
        .header("authorization", format!("AK-SK {}:{}", access_key, secret))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
