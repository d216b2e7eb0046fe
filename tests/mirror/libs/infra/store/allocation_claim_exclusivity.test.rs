// [tests/mirror/libs/infra/store/allocation_claim_exclusivity.test.rs]
/*!
 * =================================================================
 * APARATO: CERTIFICADOR DE EXCLUSIVIDAD DE CLAIM (V1.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L3-MIRROR
 * RESPONSABILIDAD: AUDITORÍA DE LA RECLAMACIÓN ATÓMICA DE ALLOCATIONS
 *
 * # Mathematical Proof (ACID Claim Exclusivity):
 * El test certifica que, ante N nodos reclamando concurrentemente una
 * única allocation pendiente, exactamente uno tiene éxito y el resto
 * recibe `ClaimRaceLost` o `NoEligibleAllocation`.
 * =================================================================
 */

use cascade_infra_store::repositories::AllocationRepository;
use cascade_infra_store::CascadeStoreClient;
use chrono::Utc;
use futures::future::join_all;

#[tokio::test(flavor = "multi_thread")]
async fn exactly_one_concurrent_claimant_wins_the_race() {
    let database_client =
        CascadeStoreClient::connect("file:mem_claim_exclusivity?mode=memory&cache=shared", None)
            .await
            .expect("CRITICAL_FAULT: Failed to anchor in-memory dispatch ledger.");

    let setup_repository = AllocationRepository::new(
        database_client.get_connection().expect("POOL_FAULT: connection allocation failed"),
    );

    setup_repository
        .dispatch_pending(
            "task-1",
            "daily-digest",
            "0 0 * * * *",
            &["feed-a".to_string(), "feed-b".to_string()],
            Utc::now(),
            "run-1",
        )
        .await
        .expect("DISPATCH_FAULT: seed allocation rejected");

    let claim_attempts = (0..8).map(|index| {
        let client = database_client.clone();
        async move {
            let repository = AllocationRepository::new(
                client.get_connection().expect("POOL_FAULT: connection allocation failed"),
            );
            repository.claim_next_for_node(&format!("node-{index}")).await
        }
    });

    let results = join_all(claim_attempts).await;
    let successes = results.iter().filter(|r| r.is_ok()).count();

    assert_eq!(successes, 1, "more than one node was able to claim the same allocation");
}
