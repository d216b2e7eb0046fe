// [tests/mirror/libs/infra/worker_client/auth_header.test.rs]
/*!
 * =================================================================
 * APARATO: UPLINK AUTHENTICATION HEADER TEST
 * OBJETIVO: Certificar que `WorkerClient` adjunta `Authorization:
 *           AK-SK <access_key>:<secret>` en toda petición, y que un
 *           HTTP 401 del gateway se traduce en `ClientError::Unauthorized`.
 * =================================================================
 */

use axum::{
    extract::Request,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use cascade_domain_models::Envelope;
use cascade_infra_worker_client::{ClientError, WorkerClient};

#[tokio::test]
async fn heartbeat_carries_the_ak_sk_authorization_header() {
    let router = Router::new().route(
        "/cascade/heartbeat",
        post(|request: Request| async move {
            let header_value = request
                .headers()
                .get(axum::http::header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default()
                .to_string();

            assert_eq!(header_value, "AK-SK CNfixture:CSfixture");
            Json(Envelope::<()>::ok_empty())
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let client = WorkerClient::new(
        format!("http://{}", address),
        "CNfixture".to_string(),
        "CSfixture".to_string(),
    );

    client.heartbeat().await.unwrap();
}

#[tokio::test]
async fn unauthorized_response_becomes_client_error() {
    let router = Router::new().route(
        "/cascade/heartbeat",
        post(|| async { StatusCode::UNAUTHORIZED }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let client = WorkerClient::new(
        format!("http://{}", address),
        "CNrevoked".to_string(),
        "CSrevoked".to_string(),
    );

    let outcome = client.heartbeat().await;

    assert!(matches!(outcome, Err(ClientError::Unauthorized)));
}
