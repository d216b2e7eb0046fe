// [libs/infra/store/src/lib.rs]
/*!
 * =================================================================
 * APARATO: PERSISTENCE ADAPTER BARREL (V1.0)
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L3)
 * RESPONSABILIDAD: SUPERFICIE PÚBLICA DEL ADAPTADOR LIBSQL
 * =================================================================
 */

pub mod client;
pub mod errors;
pub mod repositories;
pub mod schema;

pub use client::CascadeStoreClient;
pub use errors::StoreError;
pub use repositories::{AllocationRepository, NodeRepository, SyncLogRepository, TaskRepository};
