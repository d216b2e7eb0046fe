// [tests/mirror/libs/infra/store/allocation_fifo_order.test.rs]
/*!
 * =================================================================
 * APARATO: CERTIFICADOR DE ORDEN FIFO DE DESPACHO (V1.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L3-MIRROR
 * RESPONSABILIDAD: VALIDAR QUE EL CLAIM RESPETA dispatched_at ASC
 * =================================================================
 */

use cascade_infra_store::repositories::AllocationRepository;
use cascade_infra_store::CascadeStoreClient;
use chrono::{Duration, Utc};

#[tokio::test]
async fn oldest_dispatched_allocation_is_claimed_first() {
    let database_client = CascadeStoreClient::connect("file:mem_fifo_order?mode=memory&cache=shared", None)
        .await
        .expect("CRITICAL_FAULT: Failed to anchor in-memory dispatch ledger.");

    let repository =
        AllocationRepository::new(database_client.get_connection().expect("POOL_FAULT: allocation failed"));

    let now = Utc::now();
    let oldest = repository
        .dispatch_pending("task-1", "daily-digest", "0 0 * * * *", &["feed-a".to_string()], now - Duration::minutes(5), "run-1")
        .await
        .expect("DISPATCH_FAULT: oldest allocation rejected");

    repository
        .dispatch_pending("task-1", "daily-digest", "0 0 * * * *", &["feed-b".to_string()], now, "run-2")
        .await
        .expect("DISPATCH_FAULT: newest allocation rejected");

    let claimed = repository
        .claim_next_for_node("node-alpha")
        .await
        .expect("CLAIM_FAULT: expected an eligible allocation");

    assert_eq!(claimed.id, oldest.id, "the claim did not respect FIFO dispatch order");
}
