// [tests/mirror/libs/infra/store/node_credentials.test.rs]
/*!
 * =================================================================
 * APARATO: CERTIFICADOR DE CICLO DE VIDA DE CREDENCIALES (V1.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L3-MIRROR
 * RESPONSABILIDAD: EMISIÓN, VERIFICACIÓN Y RECHAZO DE PARES AK/SK
 * =================================================================
 */

use cascade_domain_models::NodeKind;
use cascade_infra_store::repositories::NodeRepository;
use cascade_infra_store::CascadeStoreClient;

#[tokio::test]
async fn minted_credentials_verify_and_record_heartbeat() {
    let database_client = CascadeStoreClient::connect("file:mem_node_credentials?mode=memory&cache=shared", None)
        .await
        .expect("CRITICAL_FAULT: Failed to anchor in-memory registry.");

    let repository = NodeRepository::new(database_client.get_connection().expect("POOL_FAULT: allocation failed"));

    let (node, credentials) = repository
        .register_node(NodeKind::Worker, "edge-worker-1", None)
        .await
        .expect("REGISTER_FAULT: node registration rejected");

    assert!(credentials.access_key.starts_with("CN"));
    assert!(credentials.secret.starts_with("CS"));

    let verified = repository
        .verify_credentials(&credentials.access_key, &credentials.secret)
        .await
        .expect("VERIFY_FAULT: legitimate credentials were rejected");

    assert_eq!(verified.id, node.id);
    assert!(verified.last_heartbeat_at.is_some(), "verification should record a heartbeat");
}

#[tokio::test]
async fn wrong_secret_is_rejected() {
    let database_client = CascadeStoreClient::connect("file:mem_node_credentials_reject?mode=memory&cache=shared", None)
        .await
        .expect("CRITICAL_FAULT: Failed to anchor in-memory registry.");

    let repository = NodeRepository::new(database_client.get_connection().expect("POOL_FAULT: allocation failed"));

    let (_node, credentials) = repository
        .register_node(NodeKind::Worker, "edge-worker-2", None)
        .await
        .expect("REGISTER_FAULT: node registration rejected");

    let result = repository.verify_credentials(&credentials.access_key, "CS-not-the-real-secret").await;

    assert!(result.is_err(), "a forged secret must never verify successfully");
}

#[tokio::test]
async fn credentials_surrounded_by_whitespace_and_quotes_still_verify() {
    let database_client = CascadeStoreClient::connect("file:mem_node_credentials_trim?mode=memory&cache=shared", None)
        .await
        .expect("CRITICAL_FAULT: Failed to anchor in-memory registry.");

    let repository = NodeRepository::new(database_client.get_connection().expect("POOL_FAULT: allocation failed"));

    let (node, credentials) = repository
        .register_node(NodeKind::Worker, "edge-worker-3", None)
        .await
        .expect("REGISTER_FAULT: node registration rejected");

    let padded_access_key = format!("  \"{}\"  ", credentials.access_key);
    let padded_secret = format!(" '{}' ", credentials.secret);

    let verified = repository
        .verify_credentials(&padded_access_key, &padded_secret)
        .await
        .expect("VERIFY_FAULT: whitespace/quote-padded credentials from a hand-edited config should still verify");

    assert_eq!(verified.id, node.id);
}
