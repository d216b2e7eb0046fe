// [libs/infra/store/src/repositories/node/queries.rs]
/*!
 * =================================================================
 * APARATO: NODE REGISTRY SQL STORE (V1.0)
 * CLASIFICACIÓN: INFRASTRUCTURE SQL (ESTRATO L3)
 * RESPONSABILIDAD: DEFINICIÓN DE SENTENCIAS PARA EL REGISTRO DE NODOS
 * =================================================================
 */

pub const INSERT_NODE: &str = r#"
    INSERT INTO nodes (
        id, kind, display_name, api_url, access_key, secret_hash,
        reported_status, active, sync_config_json, created_at, updated_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, 1, ?7, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
"#;

/// Todas las consultas de lectura comparten el mismo orden de columnas
/// (`secret_hash` incluido) para que el mapeo de filas sea uniforme;
/// el repositorio decide si lo expone según el llamador.
pub const FIND_NODE_BY_ID: &str = r#"
    SELECT id, kind, display_name, api_url, access_key, secret_hash, reported_status,
           active, last_heartbeat_at, sync_config_json, created_at, updated_at
    FROM nodes WHERE id = ?1
"#;

pub const FIND_NODE_BY_ACCESS_KEY: &str = r#"
    SELECT id, kind, display_name, api_url, access_key, secret_hash, reported_status,
           active, last_heartbeat_at, sync_config_json, created_at, updated_at
    FROM nodes WHERE access_key = ?1
"#;

pub const LIST_NODES: &str = r#"
    SELECT id, kind, display_name, api_url, access_key, secret_hash, reported_status,
           active, last_heartbeat_at, sync_config_json, created_at, updated_at
    FROM nodes ORDER BY created_at ASC
"#;

pub const UPDATE_HEARTBEAT: &str = r#"
    UPDATE nodes
    SET last_heartbeat_at = CURRENT_TIMESTAMP,
        reported_status = ?2,
        updated_at = CURRENT_TIMESTAMP
    WHERE id = ?1
"#;

pub const UPDATE_NODE: &str = r#"
    UPDATE nodes
    SET display_name = COALESCE(?2, display_name),
        api_url = COALESCE(?3, api_url),
        active = COALESCE(?4, active),
        sync_config_json = COALESCE(?5, sync_config_json),
        updated_at = CURRENT_TIMESTAMP
    WHERE id = ?1
"#;

/// Invalida el par AK/SK previo: una credencial vieja jamás vuelve a
/// verificar contra el resumen nuevo.
pub const REISSUE_CREDENTIALS: &str = r#"
    UPDATE nodes
    SET access_key = ?2, secret_hash = ?3, updated_at = CURRENT_TIMESTAMP
    WHERE id = ?1
"#;

pub const DELETE_NODE: &str = "DELETE FROM nodes WHERE id = ?1";
