// [apps/gateway/src/services/dispatcher.rs]
/*!
 * =================================================================
 * APARATO: CASCADE DISPATCHER (V1.0)
 * CLASIFICACIÓN: APPLICATION SERVICE (ESTRATO L4)
 * RESPONSABILIDAD: MATERIALIZACIÓN DE ALLOCATIONS PENDIENTES POR TAREA
 *
 * Invocado tanto por el disparador cron como manualmente vía
 * `POST /cascade/dispatch-task`. Una sola corrida (`schedule_run_id`)
 * produce como máximo una allocation por tarea habilitada con feeds.
 * =================================================================
 */

use crate::services::reclaimer::DEFAULT_RECLAIM_THRESHOLD_MINUTES;
use cascade_domain_models::Task;
use cascade_infra_store::repositories::{AllocationRepository, TaskRepository};
use cascade_infra_store::{CascadeStoreClient, StoreError};
use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Despacha una única tarea, creando una allocation pendiente. No crea
/// fila alguna si la tarea está deshabilitada o no tiene feeds.
#[instrument(skip(database_client, task, schedule_run_id))]
pub async fn dispatch_task(
    database_client: &CascadeStoreClient,
    task: &Task,
    schedule_run_id: &str,
) -> Result<Option<String>, StoreError> {
    if !task.enabled || task.feed_ids.is_empty() {
        info!("⏭️  [DISPATCH_SKIP]: Task [{}] has no eligible feeds or is disabled.", task.id);
        return Ok(None);
    }

    let repository = AllocationRepository::new(database_client.get_connection()?);
    let allocation = repository
        .dispatch_pending(
            &task.id,
            &task.name,
            &task.cron_expression,
            &task.feed_ids,
            Utc::now(),
            schedule_run_id,
        )
        .await?;

    Ok(Some(allocation.id))
}

/// Itera las tareas habilitadas (opcionalmente filtradas a una sola),
/// despachando cada una bajo una `schedule_run_id` compartida, y cierra
/// la corrida invocando un barrido inmediato del Reclamador.
#[instrument(skip(database_client))]
pub async fn execute_dispatch(
    database_client: &CascadeStoreClient,
    task_id_filter: Option<&str>,
) -> Result<Vec<String>, StoreError> {
    let task_repository = TaskRepository::new(database_client.get_connection()?);
    let mut enabled_tasks = task_repository.list_enabled().await?;

    if let Some(task_id) = task_id_filter {
        enabled_tasks.retain(|task| task.id == task_id);
    }

    enabled_tasks.sort_by(|a, b| a.id.cmp(&b.id));

    let schedule_run_id = Uuid::new_v4().to_string();
    let mut dispatched_allocation_ids = Vec::new();

    for task in &enabled_tasks {
        match dispatch_task(database_client, task, &schedule_run_id).await {
            Ok(Some(allocation_id)) => dispatched_allocation_ids.push(allocation_id),
            Ok(None) => {}
            Err(fault) => warn!("⚠️  [DISPATCH_FAULT]: Task [{}] rejected: {}", task.id, fault),
        }
    }

    run_reclaim_sweep(database_client).await;

    info!(
        "📦 [DISPATCH_RUN]: Schedule run [{}] produced {} allocation(s).",
        schedule_run_id,
        dispatched_allocation_ids.len()
    );

    Ok(dispatched_allocation_ids)
}

async fn run_reclaim_sweep(database_client: &CascadeStoreClient) {
    let cutoff = Utc::now() - chrono::Duration::minutes(DEFAULT_RECLAIM_THRESHOLD_MINUTES);

    let Ok(connection) = database_client.get_connection() else {
        return;
    };
    if let Err(fault) = AllocationRepository::new(connection).reclaim_expired(cutoff).await {
        warn!("⚠️  [RECLAIM_FAULT]: Post-dispatch sweep failed: {}", fault);
    }
}
