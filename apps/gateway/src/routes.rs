// INICIO DEL ARCHIVO [apps/gateway/src/routes.rs]
/*!
 * =================================================================
 * APARATO: SOVEREIGN ROUTING MATRIX (V1.0 - CASCADE)
 * CLASIFICACIÓN: API ADAPTER LAYER (ESTRATO L3)
 * RESPONSABILIDAD: TOPOLOGÍA DE RUTAS DEL GATEWAY DE DESPACHO
 *
 * Toda ruta bajo `/cascade` exige autenticación AK/SK; `/health` queda
 * fuera de ambos guardianes para que los balanceadores de carga no
 * necesiten credenciales.
 * =================================================================
 */

use crate::handlers::{dispatch, nodes, worker};
use crate::middleware::{auth_guard, health_guard};
use crate::state::AppState;
use axum::{
    http::{header, Method},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn create_sovereign_router(application_shared_state: AppState) -> Router {
    let network_security_shield = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    let node_registry_stratum = Router::new()
        .route("/", post(nodes::register_node).get(nodes::list_nodes))
        .route("/:id", put(nodes::update_node).delete(nodes::delete_node))
        .route("/:id/credentials", post(nodes::reissue_credentials));

    let worker_lifecycle_stratum = Router::new()
        .route("/heartbeat", post(worker::heartbeat))
        .route("/claim-task", post(worker::claim_task))
        .route("/task-status", put(worker::update_task_status))
        .route("/upload-articles", post(worker::upload_articles))
        .route("/report-completion", post(worker::report_completion));

    let dispatch_control_stratum = Router::new()
        .route("/dispatch-task", post(dispatch::dispatch_task))
        .route("/allocations", get(dispatch::list_allocations))
        .route("/pending-allocations", get(dispatch::pending_allocation_stats))
        .route("/feed-status", get(dispatch::feed_status))
        .route("/start-scheduler", post(dispatch::start_scheduler))
        .route("/stop-scheduler", post(dispatch::stop_scheduler))
        .route("/reload-scheduler", post(dispatch::reload_scheduler));

    let cascade_stratum = Router::new()
        .nest("/nodes", node_registry_stratum)
        .merge(worker_lifecycle_stratum)
        .merge(dispatch_control_stratum)
        .layer(middleware::from_fn_with_state(application_shared_state.clone(), health_guard))
        .layer(middleware::from_fn_with_state(application_shared_state.clone(), auth_guard));

    Router::new()
        .route("/health", get(|| async { "STATUS_OK" }))
        .nest("/cascade", cascade_stratum)
        .layer(TraceLayer::new_for_http())
        .layer(network_security_shield)
        .with_state(application_shared_state)
}
// FIN DEL ARCHIVO [apps/gateway/src/routes.rs]
