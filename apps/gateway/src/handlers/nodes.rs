// [apps/gateway/src/handlers/nodes.rs]
/*!
 * =================================================================
 * APARATO: NODE REGISTRY HANDLERS (V1.0 - CASCADE)
 * CLASIFICACIÓN: API ADAPTER LAYER (ESTRATO L3)
 * RESPONSABILIDAD: CICLO DE VIDA ADMINISTRATIVO DE NODOS
 *
 * Todos los endpoints de este módulo son de autoridad de operador: el
 * nodo llamante debe resolverse con `NodeKind::Coordinator`.
 * =================================================================
 */

use crate::errors::store_error_response;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use cascade_domain_models::{Envelope, IssuedCredentials, Node, NodeKind, RegisterNodePayload, UpdateNodePayload};
use cascade_infra_store::repositories::NodeRepository;
use serde::Deserialize;
use tracing::{info, instrument};

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
pub struct NodeListFilter {
    pub kind: Option<NodeKind>,
}

/// `POST /cascade/nodes` — registra un nodo y emite su primer par AK/SK.
#[instrument(skip(state, caller, payload), fields(display_name = %payload.display_name))]
pub async fn register_node(
    State(state): State<AppState>,
    Extension(caller): Extension<Node>,
    Json(payload): Json<RegisterNodePayload>,
) -> impl IntoResponse {
    if let Err(response) = require_operator(&caller) {
        return response;
    }

    let connection = match state.database_client.get_connection() {
        Ok(connection) => connection,
        Err(fault) => return store_error_response(fault),
    };
    let repository = NodeRepository::new(connection);

    match repository
        .register_node(payload.kind, &payload.display_name, payload.api_url.as_deref())
        .await
    {
        Ok((node, minted)) => {
            info!("🔑 [NODES]: Node [{}] registered by operator [{}]", node.id, caller.id);
            (
                StatusCode::OK,
                Json(Envelope::ok(IssuedCredentials {
                    access_key: minted.access_key,
                    secret: minted.secret,
                })),
            )
                .into_response()
        }
        Err(fault) => store_error_response(fault),
    }
}

/// `GET /cascade/nodes` — lista todos los nodos, opcionalmente filtrados por `kind`.
#[instrument(skip(state, caller))]
pub async fn list_nodes(
    State(state): State<AppState>,
    Extension(caller): Extension<Node>,
    Query(filter): Query<NodeListFilter>,
) -> impl IntoResponse {
    if let Err(response) = require_operator(&caller) {
        return response;
    }

    let connection = match state.database_client.get_connection() {
        Ok(connection) => connection,
        Err(fault) => return store_error_response(fault),
    };
    let repository = NodeRepository::new(connection);

    match repository.list_all().await {
        Ok(mut nodes) => {
            if let Some(kind) = filter.kind {
                nodes.retain(|node| node.kind == kind);
            }
            (StatusCode::OK, Json(Envelope::ok(nodes))).into_response()
        }
        Err(fault) => store_error_response(fault),
    }
}

/// `PUT /cascade/nodes/«id»` — actualiza los campos mutables de un nodo.
#[instrument(skip(state, caller, payload), fields(node_id = %node_id))]
pub async fn update_node(
    State(state): State<AppState>,
    Extension(caller): Extension<Node>,
    Path(node_id): Path<String>,
    Json(payload): Json<UpdateNodePayload>,
) -> impl IntoResponse {
    if let Err(response) = require_operator(&caller) {
        return response;
    }

    let connection = match state.database_client.get_connection() {
        Ok(connection) => connection,
        Err(fault) => return store_error_response(fault),
    };
    let repository = NodeRepository::new(connection);

    match repository.update_node(&node_id, payload).await {
        Ok(node) => (StatusCode::OK, Json(Envelope::ok(node))).into_response(),
        Err(fault) => store_error_response(fault),
    }
}

/// `DELETE /cascade/nodes/«id»` — elimina un nodo del registro.
#[instrument(skip(state, caller), fields(node_id = %node_id))]
pub async fn delete_node(
    State(state): State<AppState>,
    Extension(caller): Extension<Node>,
    Path(node_id): Path<String>,
) -> impl IntoResponse {
    if let Err(response) = require_operator(&caller) {
        return response;
    }

    let connection = match state.database_client.get_connection() {
        Ok(connection) => connection,
        Err(fault) => return store_error_response(fault),
    };
    let repository = NodeRepository::new(connection);

    match repository.delete_node(&node_id).await {
        Ok(()) => (StatusCode::OK, Json(Envelope::<()>::ok_empty())).into_response(),
        Err(fault) => store_error_response(fault),
    }
}

/// `POST /cascade/nodes/«id»/credentials` — reemite el par AK/SK de un
/// nodo existente, invalidando el anterior.
#[instrument(skip(state, caller), fields(node_id = %node_id))]
pub async fn reissue_credentials(
    State(state): State<AppState>,
    Extension(caller): Extension<Node>,
    Path(node_id): Path<String>,
) -> impl IntoResponse {
    if let Err(response) = require_operator(&caller) {
        return response;
    }

    let connection = match state.database_client.get_connection() {
        Ok(connection) => connection,
        Err(fault) => return store_error_response(fault),
    };
    let repository = NodeRepository::new(connection);

    match repository.reissue_credentials(&node_id).await {
        Ok(minted) => (
            StatusCode::OK,
            Json(Envelope::ok(IssuedCredentials {
                access_key: minted.access_key,
                secret: minted.secret,
            })),
        )
            .into_response(),
        Err(fault) => store_error_response(fault),
    }
}
