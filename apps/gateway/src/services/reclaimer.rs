// [apps/gateway/src/services/reclaimer.rs]
/*!
 * =================================================================
 * APARATO: THE RECLAIMER SYSTEM SERVICE (V1.0 - CASCADE)
 * CLASIFICACIÓN: BACKGROUND INFRASTRUCTURE (ESTRATO L4)
 * RESPONSABILIDAD: BARRIDO PERIÓDICO DE ALLOCATIONS EXPIRADAS
 *
 * Grounded en el ticker del antiguo servicio Reaper: un `interval`
 * lanzado una sola vez al arranque del kernel, sin reentrancia.
 *
 * No marca nodos offline: `reported_status` sólo cambia por latido o
 * desactivación explícita del operador; la condición "en línea" se
 * deriva en vivo vía `Node::classify`.
 * =================================================================
 */

use cascade_infra_store::repositories::AllocationRepository;
use cascade_infra_store::CascadeStoreClient;
use chrono::Duration as ChronoDuration;
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info, warn};

/// Ventana por defecto: una allocation en `claimed`/`executing` que
/// supera este umbral desde su despacho se considera abandonada.
pub const DEFAULT_RECLAIM_THRESHOLD_MINUTES: i64 = 30;

/**
 * Inicia el barrido perpetuo de reclamación en el runtime de Tokio.
 *
 * Cada tick: reclama las allocations en vuelo expiradas desde el último
 * despacho.
 */
pub async fn spawn_reclaimer(database_client: CascadeStoreClient, threshold_minutes: i64) {
    let mut maintenance_ticker = interval(Duration::from_secs(60));

    tokio::spawn(async move {
        info!("⏰ [RECLAIMER_ACTIVE]: Expired allocation sweep daemon initiated.");

        loop {
            maintenance_ticker.tick().await;

            let cutoff = chrono::Utc::now() - ChronoDuration::minutes(threshold_minutes);

            let connection = match database_client.get_connection() {
                Ok(connection) => connection,
                Err(fault) => {
                    error!("💀 [RECLAIMER_FATAL]: Connection allocation failed: {}", fault);
                    continue;
                }
            };

            let allocation_repository = AllocationRepository::new(connection);
            match allocation_repository.reclaim_expired(cutoff).await {
                Ok(reclaimed) if !reclaimed.is_empty() => {
                    warn!("⏰ [RECLAIMER]: {} allocation(s) timed out and reclaimed.", reclaimed.len());
                }
                Ok(_) => {}
                Err(fault) => error!("💀 [RECLAIMER_FAULT]: Allocation sweep failed: {}", fault),
            }
        }
    });
}
