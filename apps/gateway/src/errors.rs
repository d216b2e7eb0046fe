// [apps/gateway/src/errors.rs]
/*!
 * =================================================================
 * APARATO: WIRE ERROR TRANSLATION (V1.0 - CASCADE)
 * CLASIFICACIÓN: API ADAPTER LAYER (ESTRATO L3)
 * RESPONSABILIDAD: MAPEO DETERMINISTA DE STOREERROR A RESPUESTA HTTP
 * =================================================================
 */

use axum::{http::StatusCode, response::IntoResponse, Json};
use cascade_domain_models::Envelope;
use cascade_infra_store::StoreError;

/// Traduce un fallo de persistencia a su par `(StatusCode, Envelope)`.
/// Centraliza la decisión para que los handlers nunca improvisen un
/// código HTTP distinto para el mismo fallo semántico.
pub fn store_error_response(error: StoreError) -> axum::response::Response {
    let (status, code) = match &error {
        StoreError::NodeNotFound | StoreError::TaskNotFound | StoreError::AllocationNotFound => {
            (StatusCode::NOT_FOUND, 404)
        }
        StoreError::CredentialRejected => (StatusCode::UNAUTHORIZED, 401),
        StoreError::NoEligibleAllocation => (StatusCode::OK, 0),
        StoreError::ClaimRaceLost => (StatusCode::CONFLICT, 409),
        StoreError::InvalidState => (StatusCode::CONFLICT, 409),
        StoreError::ConfigurationError(_) | StoreError::ConnectionError(_) => {
            (StatusCode::SERVICE_UNAVAILABLE, 503)
        }
        StoreError::QueryError(_) | StoreError::MappingError(_) | StoreError::TransactionError => {
            (StatusCode::INTERNAL_SERVER_ERROR, 500)
        }
    };

    (status, Json(Envelope::<()>::error(code, error.to_string()))).into_response()
}
