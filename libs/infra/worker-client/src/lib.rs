// INICIO DEL ARCHIVO [libs/infra/worker-client/src/lib.rs]
/*!
 * =================================================================
 * APARATO: WORKER CLIENT LIBRARY BARREL (V1.0 - CASCADE)
 * CLASIFICACIÓN: INFRASTRUCTURE LIB (ESTRATO L3)
 * RESPONSABILIDAD: EXPOSICIÓN PÚBLICA DEL CLIENTE DE UPLINK
 * =================================================================
 */

pub mod client;
pub mod errors;

pub use client::WorkerClient;
pub use errors::ClientError;
// FIN DEL ARCHIVO [libs/infra/worker-client/src/lib.rs]
