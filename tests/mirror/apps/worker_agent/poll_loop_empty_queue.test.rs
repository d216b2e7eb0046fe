// [tests/mirror/apps/worker_agent/poll_loop_empty_queue.test.rs]
/*!
 * =================================================================
 * APARATO: POLL LOOP BACK-OFF TEST
 * OBJETIVO: Certificar que un gateway inalcanzable se traduce en un
 *           fallo de red explícito, nunca en un panic del worker.
 * =================================================================
 */

use cascade_infra_worker_client::{ClientError, WorkerClient};

#[tokio::test]
async fn claim_against_unreachable_gateway_yields_network_fault() {
    // Puerto 0 nunca acepta conexiones entrantes reales; cualquier intento
    // de handshake debe fallar de inmediato en vez de colgarse.
    let client = WorkerClient::new(
        "http://127.0.0.1:0".to_string(),
        "CNtest".to_string(),
        "CStest".to_string(),
    );

    let outcome = client.claim_task().await;

    assert!(
        matches!(outcome, Err(ClientError::NetworkFault(_))),
        "expected a network fault when the gateway is unreachable, got: {:?}",
        outcome.err()
    );
}
