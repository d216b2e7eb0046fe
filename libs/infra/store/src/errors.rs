// [libs/infra/store/src/errors.rs]
/*!
 * =================================================================
 * APARATO: DATABASE ERROR CATALOG (V1.0 - CASCADE SOBERANO)
 * CLASIFICACIÓN: INFRASTRUCTURE CORE (ESTRATO L3)
 * RESPONSABILIDAD: CATALOGACIÓN SEMÁNTICA DE FALLOS DE PERSISTENCIA
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. CONFIGURATION AWARENESS: Inyecta 'ConfigurationError' para distinguir
 *    entre fallos de red y variables de entorno vacías.
 * 2. DISPATCH SEMANTICS: Catálogo propio para conflictos de claim y
 *    credenciales, mapeado de forma determinista a códigos HTTP en la
 *    frontera del gateway.
 * 3. ZERO ABBREVIATIONS: Nomenclatura nominal absoluta.
 * =================================================================
 */

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// Error de enlace físico o de red con el motor de persistencia.
    #[error("[L3_DB_NET_FAULT]: DATABASE_UPLINK_SEVERED -> {0}")]
    ConnectionError(String),

    /// Fallo en la configuración del entorno (Variables vacías o malformadas).
    #[error("[L3_DB_CONFIG_FAULT]: STRATEGIC_ENV_VOID -> {0}")]
    ConfigurationError(String),

    /// Error de sintaxis o ejecución devuelto por el motor libSQL.
    #[error("[L3_DB_QUERY_FAULT]: SQL_QUERY_REJECTED -> {0}")]
    QueryError(#[from] libsql::Error),

    /// Fallo en la transformación de tipos entre SQLite y el Dominio Rust.
    #[error("[L3_DB_MAPPING_FAULT]: DATA_MAPPING_VIOLATION -> {0}")]
    MappingError(String),

    /// Error al comprometer cambios en una secuencia multi-tabla.
    #[error("[L3_DB_FAULT]: TRANSACTION_COLLAPSE")]
    TransactionError,

    // --- ESTRATO DE DESPACHO (ALLOCATIONS) ---

    /// La allocation solicitada no existe en las tablas activas.
    #[error("[L3_ALLOCATION_FAULT]: IDENTIFIER_NOT_FOUND")]
    AllocationNotFound,

    /// No había allocations pendientes elegibles en el momento del claim.
    #[error("[L3_ALLOCATION_FAULT]: NO_ELIGIBLE_ALLOCATION")]
    NoEligibleAllocation,

    /// Conflicto de propiedad: otro nodo ganó la reclamación concurrente.
    #[error("[L3_ALLOCATION_FAULT]: CLAIM_RACE_LOST")]
    ClaimRaceLost,

    /// La allocation no se encuentra en un estado apto para la transición solicitada.
    #[error("[L3_ALLOCATION_FAULT]: INVALID_STATE_TRANSITION")]
    InvalidState,

    // --- ESTRATO DE REGISTRO DE NODOS ---

    /// El nodo solicitado no existe en el registro.
    #[error("[L3_REGISTRY_FAULT]: NODE_NOT_FOUND")]
    NodeNotFound,

    /// La tarea programada solicitada no existe.
    #[error("[L3_REGISTRY_FAULT]: TASK_NOT_FOUND")]
    TaskNotFound,

    /// El par de credenciales presentado no corresponde a ningún nodo activo.
    #[error("[L3_SECURITY_FAULT]: CREDENTIAL_REJECTED")]
    CredentialRejected,
}
