// [apps/gateway/src/middleware.rs]
/*!
 * =================================================================
 * APARATO: NODE AUTHENTICATION GUARD (V1.0 - CASCADE)
 * CLASIFICACIÓN: SECURITY STRATUM (ESTRATO L4)
 * RESPONSABILIDAD: VALIDACIÓN DE CREDENCIALES AK/SK E INYECCIÓN DE IDENTIDAD
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. UNIFIED IDENTITY: Un único esquema de autenticación para workers y
 *    para el nodo coordinador; ambos son filas de la tabla `nodes`.
 * 2. EXTENSION INJECTION: Inyecta el `Node` resuelto en el flujo
 *    asíncrono de la petición para consumo en los handlers.
 * 3. NO LEAKAGE: El rechazo nunca distingue si falló la clave de acceso
 *    o el secreto; siempre 401 genérico.
 * =================================================================
 */

use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use cascade_infra_store::repositories::NodeRepository;
use serde_json::json;
use tracing::{debug, warn};

/**
 * Guardia de Salud: Bloquea el acceso si el sistema está en mantenimiento.
 */
pub async fn health_guard(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if let Err(reason) = state.is_operational() {
        warn!("⛔ [ACCESS_DENIED]: Gateway under maintenance: {}", reason);
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "error": "CASCADE_MAINTENANCE_ACTIVE",
                "reason": reason,
                "retry_after": 60
            })),
        )
            .into_response();
    }
    next.run(req).await
}

/**
 * Guardia de Autenticación: valida el encabezado `Authorization: AK-SK
 * <access_key>:<secret>` contra el registro de nodos. Resuelve el nodo
 * llamante e inyecta `cascade_domain_models::Node` en las extensiones
 * de la petición para que los handlers verifiquen pertenencia.
 */
pub async fn auth_guard(State(state): State<AppState>, mut req: Request, next: Next) -> Result<Response, StatusCode> {
    let auth_header_content = req.headers().get(header::AUTHORIZATION).and_then(|h| h.to_str().ok());

    let credentials_raw = match auth_header_content {
        Some(header_value) if header_value.starts_with("AK-SK ") => &header_value[6..],
        _ => {
            warn!("❌ [AUTH_REJECTION]: Missing or malformed Authorization header.");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    let (access_key, secret) = match credentials_raw.split_once(':') {
        Some(parts) => parts,
        None => {
            warn!("❌ [AUTH_REJECTION]: Credentials missing the access_key:secret separator.");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    let connection = state.database_client.get_connection().map_err(|_| StatusCode::SERVICE_UNAVAILABLE)?;
    let node_repository = NodeRepository::new(connection);

    match node_repository.verify_credentials(access_key, secret).await {
        Ok(node) if node.active => {
            debug!("🔑 [AUTH]: Node [{}] authenticated.", node.id);
            req.extensions_mut().insert(node);
            Ok(next.run(req).await)
        }
        Ok(_) => {
            warn!("❌ [AUTH_REJECTION]: Credentials valid but node is inactive.");
            Err(StatusCode::UNAUTHORIZED)
        }
        Err(_) => {
            warn!("❌ [AUTH_REJECTION]: Credentials rejected.");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}
