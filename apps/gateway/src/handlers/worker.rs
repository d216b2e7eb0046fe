// [apps/gateway/src/handlers/worker.rs]
/*!
 * =================================================================
 * APARATO: WORKER LIFECYCLE HANDLERS (V1.0 - CASCADE)
 * CLASIFICACIÓN: API ADAPTER LAYER (ESTRATO L3)
 * RESPONSABILIDAD: CLAIM, PROGRESO Y CIERRE DE ALLOCATIONS
 *
 * VISION HIPER-HOLÍSTICA:
 * El nodo llamante se resuelve en `auth_guard` y llega inyectado en las
 * extensiones de la petición. Salvo en `claim_task`, toda mutación de
 * una allocation exige que su `node_id` coincida con esa identidad; la
 * coincidencia se aplica en el guardia SQL (`WHERE node_id = ?`), no en
 * una comprobación previa — un fallo de propiedad y un fallo de estado
 * colapsan en el mismo `StoreError::InvalidState`.
 * =================================================================
 */

use crate::errors::store_error_response;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use cascade_domain_models::{
    AllocationStatus, Envelope, FeedSnapshot, Node, ReportCompletionPayload, SyncType, TaskPackage,
    TaskStatusPayload, UploadArticlesPayload,
};
use cascade_infra_store::repositories::{AllocationRepository, NodeRepository, SyncLogRepository, TaskRepository};
use chrono::Utc;
use tracing::{info, instrument, warn};

/// `POST /cascade/heartbeat` — latido explícito de vida. `auth_guard` ya
/// registra un latido implícito en cada petición autenticada; este
/// endpoint existe para los workers que no emiten tráfico de otro tipo.
#[instrument(skip(state, caller), fields(node_id = %caller.id))]
pub async fn heartbeat(State(state): State<AppState>, Extension(caller): Extension<Node>) -> impl IntoResponse {
    let connection = match state.database_client.get_connection() {
        Ok(connection) => connection,
        Err(fault) => return store_error_response(fault),
    };

    match NodeRepository::new(connection).record_heartbeat(&caller.id, 1).await {
        Ok(()) => (StatusCode::OK, Json(Envelope::<()>::ok_empty())).into_response(),
        Err(fault) => store_error_response(fault),
    }
}

/// `POST /cascade/claim-task` — reclama atómicamente la allocation
/// pendiente más antigua y ensambla su paquete de tarea. `200` con
/// `data: null` cuando no hay trabajo elegible; nunca un error.
#[instrument(skip(state, caller), fields(node_id = %caller.id))]
pub async fn claim_task(State(state): State<AppState>, Extension(caller): Extension<Node>) -> impl IntoResponse {
    let connection = match state.database_client.get_connection() {
        Ok(connection) => connection,
        Err(fault) => return store_error_response(fault),
    };

    let allocation = match AllocationRepository::new(connection).claim_next_for_node(&caller.id).await {
        Ok(allocation) => allocation,
        Err(cascade_infra_store::StoreError::NoEligibleAllocation) => {
            return (StatusCode::OK, Json(Envelope::<()>::ok_empty())).into_response();
        }
        Err(fault) => return store_error_response(fault),
    };

    let connection = match state.database_client.get_connection() {
        Ok(connection) => connection,
        Err(fault) => return store_error_response(fault),
    };
    let task = match TaskRepository::new(connection).find_by_id(&allocation.task_id).await {
        Ok(Some(task)) if task.enabled => task,
        Ok(_) => {
            warn!(
                "⚠️  [CLAIM_ROLLBACK]: Task [{}] missing or disabled; failing allocation [{}].",
                allocation.task_id, allocation.id
            );
            if let Ok(connection) = state.database_client.get_connection() {
                if let Err(fault) = AllocationRepository::new(connection)
                    .fail_claimed(&allocation.id, &caller.id, "task missing")
                    .await
                {
                    warn!("⚠️  [CLAIM_ROLLBACK_FAULT]: Failed to seal allocation [{}]: {}", allocation.id, fault);
                }
            }
            return (StatusCode::OK, Json(Envelope::<()>::ok_empty())).into_response();
        }
        Err(fault) => return store_error_response(fault),
    };

    let feeds = allocation
        .feed_ids
        .iter()
        .map(|feed_id| FeedSnapshot {
            id: feed_id.clone(),
            faker_id: None,
            mp_name: None,
            mp_cover: None,
            mp_intro: None,
            status: None,
        })
        .collect();

    let task_package = TaskPackage::assemble(&allocation, &task, feeds);

    if let Ok(connection) = state.database_client.get_connection() {
        if let Err(fault) = SyncLogRepository::new(connection)
            .record(
                &allocation.id,
                &allocation.task_id,
                Some(&caller.id),
                SyncType::Incremental,
                &allocation.feed_ids,
                0,
                0,
                "claimed",
                None,
                Some(Utc::now()),
            )
            .await
        {
            warn!("⚠️  [AUDIT_FAULT]: Failed to write claim audit for allocation [{}]: {}", allocation.id, fault);
        }
    }

    info!("🎯 [WORKER]: Node [{}] claimed allocation [{}]", caller.id, allocation.id);
    (StatusCode::OK, Json(Envelope::ok(task_package))).into_response()
}

/// `PUT /cascade/task-status` — transiciona una allocation propia a
/// `executing` o `failed`. `completed` se cierra exclusivamente vía
/// `report-completion`; cualquier otro destino es rechazado.
#[instrument(skip(state, caller, payload), fields(node_id = %caller.id, allocation_id = %payload.allocation_id))]
pub async fn update_task_status(
    State(state): State<AppState>,
    Extension(caller): Extension<Node>,
    Json(payload): Json<TaskStatusPayload>,
) -> impl IntoResponse {
    let connection = match state.database_client.get_connection() {
        Ok(connection) => connection,
        Err(fault) => return store_error_response(fault),
    };
    let repository = AllocationRepository::new(connection);

    let result = match payload.status {
        AllocationStatus::Executing => repository.mark_executing(&payload.allocation_id, &caller.id).await,
        AllocationStatus::Failed => {
            let error_message = payload.error_message.as_deref().unwrap_or("worker reported failure");
            repository.mark_failed(&payload.allocation_id, &caller.id, error_message).await
        }
        _ => Err(cascade_infra_store::StoreError::InvalidState),
    };

    match result {
        Ok(()) => (StatusCode::OK, Json(Envelope::<()>::ok_empty())).into_response(),
        Err(fault) => store_error_response(fault),
    }
}

/// `POST /cascade/upload-articles` — incrementa el contador de artículos
/// nuevos de una allocation propia sin tocar su estado.
#[instrument(skip(state, caller, payload), fields(node_id = %caller.id, allocation_id = %payload.allocation_id))]
pub async fn upload_articles(
    State(state): State<AppState>,
    Extension(caller): Extension<Node>,
    Json(payload): Json<UploadArticlesPayload>,
) -> impl IntoResponse {
    let connection = match state.database_client.get_connection() {
        Ok(connection) => connection,
        Err(fault) => return store_error_response(fault),
    };

    let article_count = payload.articles.len() as u32;
    match AllocationRepository::new(connection)
        .record_new_articles(&payload.allocation_id, &caller.id, article_count)
        .await
    {
        Ok(()) => (StatusCode::OK, Json(Envelope::ok(serde_json::json!({ "accepted": article_count })))).into_response(),
        Err(fault) => store_error_response(fault),
    }
}

/// `POST /cascade/report-completion` — sella una allocation propia como
/// `completed`, fijando `article_count` y un resumen por feed; escribe
/// la entrada de auditoría final en `sync_logs`.
#[instrument(skip(state, caller, payload), fields(node_id = %caller.id, allocation_id = %payload.allocation_id))]
pub async fn report_completion(
    State(state): State<AppState>,
    Extension(caller): Extension<Node>,
    Json(payload): Json<ReportCompletionPayload>,
) -> impl IntoResponse {
    let result_summary = match serde_json::to_value(&payload.results) {
        Ok(value) => value,
        Err(fault) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(Envelope::<()>::error(400, format!("malformed results payload: {fault}"))),
            )
                .into_response()
        }
    };

    let connection = match state.database_client.get_connection() {
        Ok(connection) => connection,
        Err(fault) => return store_error_response(fault),
    };

    let completion_outcome = AllocationRepository::new(connection)
        .complete_allocation(&payload.allocation_id, &caller.id, payload.article_count, &result_summary)
        .await;

    if let Err(fault) = completion_outcome {
        return store_error_response(fault);
    }

    let new_article_total: u32 = payload.results.iter().map(|result| result.new_article_count).sum();
    let overall_status = if payload.results.iter().any(|result| result.status != "success") {
        "partial_failure"
    } else {
        "completed"
    };
    let feed_ids: Vec<String> = payload.results.iter().map(|result| result.feed_id.clone()).collect();

    if let Ok(connection) = state.database_client.get_connection() {
        if let Err(fault) = SyncLogRepository::new(connection)
            .record(
                &payload.allocation_id,
                &payload.task_id,
                Some(&caller.id),
                SyncType::Incremental,
                &feed_ids,
                payload.article_count,
                new_article_total,
                overall_status,
                None,
                None,
            )
            .await
        {
            warn!(
                "⚠️  [AUDIT_FAULT]: Failed to write completion audit for allocation [{}]: {}",
                payload.allocation_id, fault
            );
        }
    }

    info!("✅ [WORKER]: Node [{}] completed allocation [{}]", caller.id, payload.allocation_id);
    (StatusCode::OK, Json(Envelope::<()>::ok_empty())).into_response()
}
