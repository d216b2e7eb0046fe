// [apps/gateway/src/handlers/dispatch.rs]
/*!
 * =================================================================
 * APARATO: DISPATCH & OBSERVABILITY HANDLERS (V1.0 - CASCADE)
 * CLASIFICACIÓN: API ADAPTER LAYER (ESTRATO L3)
 * RESPONSABILIDAD: DISPARO MANUAL, CONSULTA DE ALLOCATIONS Y CONTROL
 *                  DEL PLANIFICADOR CRON
 *
 * Todos los endpoints de este módulo son de autoridad de operador.
 * =================================================================
 */

use crate::errors::store_error_response;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use cascade_domain_models::{AllocationFilters, Envelope, Node, NodeKind};
use cascade_infra_store::repositories::{AllocationRepository, NodeRepository, SyncLogRepository};
use serde::Deserialize;
use tracing::{error, info, instrument};

const DEFAULT_LIST_LIMIT: u32 = 50;
const FEED_STATUS_SCAN_WINDOW: u32 = 500;

fn require_operator(caller: &Node) -> Result<(), axum::response::Response> {
    if caller.kind != NodeKind::Coordinator {
        return Err((
            StatusCode::FORBIDDEN,
            Json(Envelope::<()>::error(403, "operator authority required")),
        )
            .into_response());
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct DispatchTaskQuery {
    pub task_id: Option<String>,
}

/// `POST /cascade/dispatch-task` — dispara una corrida de despacho,
/// opcionalmente restringida a una sola tarea.
#[instrument(skip(state, caller))]
pub async fn dispatch_task(
    State(state): State<AppState>,
    Extension(caller): Extension<Node>,
    Query(query): Query<DispatchTaskQuery>,
) -> impl IntoResponse {
    if let Err(response) = require_operator(&caller) {
        return response;
    }

    match crate::services::dispatcher::execute_dispatch(&state.database_client, query.task_id.as_deref()).await {
        Ok(allocation_ids) => {
            info!(
                "📦 [DISPATCH_API]: Operator [{}] triggered dispatch producing {} allocation(s).",
                caller.id,
                allocation_ids.len()
            );
            (StatusCode::OK, Json(Envelope::ok(allocation_ids))).into_response()
        }
        Err(fault) => store_error_response(fault),
    }
}

/// `GET /cascade/allocations` — lista filtrada de allocations.
#[instrument(skip(state, caller))]
pub async fn list_allocations(
    State(state): State<AppState>,
    Extension(caller): Extension<Node>,
    Query(filters): Query<AllocationFilters>,
) -> impl IntoResponse {
    if let Err(response) = require_operator(&caller) {
        return response;
    }

    let connection = match state.database_client.get_connection() {
        Ok(connection) => connection,
        Err(fault) => return store_error_response(fault),
    };
    let repository = AllocationRepository::new(connection);
    let limit = filters.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    let offset = filters.offset.unwrap_or(0);

    let allocations = match &filters.task_id {
        Some(task_id) => repository.list_by_task(task_id, limit, offset).await,
        None => repository.list_all(limit, offset).await,
    };

    match allocations {
        Ok(mut allocations) => {
            if let Some(node_id) = &filters.node_id {
                allocations.retain(|allocation| allocation.node_id.as_deref() == Some(node_id.as_str()));
            }
            if let Some(status) = &filters.status {
                allocations.retain(|allocation| allocation.status.as_str() == status);
            }
            (StatusCode::OK, Json(Envelope::ok(allocations))).into_response()
        }
        Err(fault) => store_error_response(fault),
    }
}

/// `GET /cascade/pending-allocations` — bloque de estadísticas agregadas
/// del despacho (pendientes, en vuelo, completadas/fallidas de hoy).
#[instrument(skip(state, caller))]
pub async fn pending_allocation_stats(
    State(state): State<AppState>,
    Extension(caller): Extension<Node>,
) -> impl IntoResponse {
    if let Err(response) = require_operator(&caller) {
        return response;
    }

    let connection = match state.database_client.get_connection() {
        Ok(connection) => connection,
        Err(fault) => return store_error_response(fault),
    };
    let online_nodes = match NodeRepository::new(connection).count_online().await {
        Ok(count) => count,
        Err(fault) => return store_error_response(fault),
    };

    let connection = match state.database_client.get_connection() {
        Ok(connection) => connection,
        Err(fault) => return store_error_response(fault),
    };
    match AllocationRepository::new(connection).stats(online_nodes).await {
        Ok(stats) => (StatusCode::OK, Json(Envelope::ok(stats))).into_response(),
        Err(fault) => store_error_response(fault),
    }
}

/// `GET /cascade/feed-status` — vista de frescura por feed, derivada del
/// rastro de auditoría de `sync_logs`.
#[instrument(skip(state, caller))]
pub async fn feed_status(State(state): State<AppState>, Extension(caller): Extension<Node>) -> impl IntoResponse {
    if let Err(response) = require_operator(&caller) {
        return response;
    }

    let connection = match state.database_client.get_connection() {
        Ok(connection) => connection,
        Err(fault) => return store_error_response(fault),
    };

    match SyncLogRepository::new(connection).feed_status(FEED_STATUS_SCAN_WINDOW).await {
        Ok(statuses) => (StatusCode::OK, Json(Envelope::ok(statuses))).into_response(),
        Err(fault) => store_error_response(fault),
    }
}

/// `POST /cascade/start-scheduler` — arranca el planificador cron.
#[instrument(skip(state, caller))]
pub async fn start_scheduler(State(state): State<AppState>, Extension(caller): Extension<Node>) -> impl IntoResponse {
    if let Err(response) = require_operator(&caller) {
        return response;
    }
    scheduler_control_response(state.scheduler.start().await)
}

/// `POST /cascade/stop-scheduler` — detiene el planificador cron.
#[instrument(skip(state, caller))]
pub async fn stop_scheduler(State(state): State<AppState>, Extension(caller): Extension<Node>) -> impl IntoResponse {
    if let Err(response) = require_operator(&caller) {
        return response;
    }
    scheduler_control_response(state.scheduler.stop().await)
}

/// `POST /cascade/reload-scheduler` — reconstruye el planificador cron
/// desde el catálogo de tareas habilitadas más reciente.
#[instrument(skip(state, caller))]
pub async fn reload_scheduler(State(state): State<AppState>, Extension(caller): Extension<Node>) -> impl IntoResponse {
    if let Err(response) = require_operator(&caller) {
        return response;
    }
    scheduler_control_response(state.scheduler.reload().await)
}

fn scheduler_control_response(outcome: anyhow::Result<()>) -> axum::response::Response {
    match outcome {
        Ok(()) => (StatusCode::OK, Json(Envelope::<()>::ok_empty())).into_response(),
        Err(fault) => {
            error!("💀 [SCHEDULER_CONTROL_FAULT]: {}", fault);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Envelope::<()>::error(500, fault.to_string())),
            )
                .into_response()
        }
    }
}
