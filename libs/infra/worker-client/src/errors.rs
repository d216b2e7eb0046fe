// INICIO DEL ARCHIVO [libs/infra/worker-client/src/errors.rs]
//! =================================================================
//! APARATO: WORKER CLIENT ERRORS (V1.0 - CASCADE)
//! RESPONSABILIDAD: CATALOGACIÓN DE FALLOS DE COMUNICACIÓN CON EL GATEWAY
//! =================================================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("NETWORK_UNREACHABLE: Failed to reach the gateway: {0}")]
    NetworkFault(#[from] reqwest::Error),

    #[error("ENVELOPE_CORRUPTION: Failed to decode response envelope: {0}")]
    DecodingFault(#[from] serde_json::Error),

    #[error("GATEWAY_REJECTION: Server returned {code}: {message}")]
    GatewayRejection { code: i32, message: String },

    #[error("CREDENTIALS_REJECTED: Gateway returned HTTP 401")]
    Unauthorized,
}
// FIN DEL ARCHIVO [libs/infra/worker-client/src/errors.rs]
