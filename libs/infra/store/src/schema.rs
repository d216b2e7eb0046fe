// [libs/infra/store/src/schema.rs]
/*!
 * =================================================================
 * APARATO: CASCADE DATABASE SCHEMA (V1.0 - DISPATCH STRATA)
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L3)
 * RESPONSABILIDAD: GOBERNANZA ESTRUCTURAL E IDEMPOTENCIA TOTAL
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. NODE REGISTRY: Nodos coordinador/worker con par de credenciales AK/SK.
 * 2. DISPATCH LEDGER: Allocations como unidad central de claim y ejecución.
 * 3. IDEMPOTENCIA: Creación de tablas tolerante a re-ejecución en caliente.
 * 4. PERFORMANCE: Índices sobre las rutas de consulta del despachador y
 *    del reclamador de expirados.
 * =================================================================
 */

use anyhow::{Context, Result};
use libsql::Connection;
use tracing::{debug, info, instrument};

const TACTICAL_TABLES: &[(&str, &str)] = &[
    ("TABLE_NODES", r#"
        CREATE TABLE IF NOT EXISTS nodes (
            id TEXT PRIMARY KEY,
            kind TEXT NOT NULL,
            display_name TEXT NOT NULL,
            api_url TEXT,
            access_key TEXT NOT NULL UNIQUE,
            secret_hash TEXT NOT NULL,
            reported_status INTEGER NOT NULL DEFAULT 0,
            active INTEGER NOT NULL DEFAULT 1,
            last_heartbeat_at DATETIME,
            sync_config_json TEXT NOT NULL DEFAULT '{}',
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );
    "#),
    ("TABLE_TASKS", r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            cron_expression TEXT NOT NULL,
            feed_ids_json TEXT NOT NULL DEFAULT '[]',
            enabled INTEGER NOT NULL DEFAULT 1,
            webhook_url TEXT,
            headers TEXT,
            cookies TEXT,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );
    "#),
    ("TABLE_ALLOCATIONS", r#"
        CREATE TABLE IF NOT EXISTS allocations (
            id TEXT PRIMARY KEY,
            task_id TEXT NOT NULL,
            task_name_snapshot TEXT NOT NULL,
            cron_snapshot TEXT NOT NULL,
            node_id TEXT,
            feed_ids_json TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            result_summary_json TEXT,
            error_message TEXT,
            dispatched_at DATETIME NOT NULL,
            claimed_at DATETIME,
            started_at DATETIME,
            completed_at DATETIME,
            schedule_run_id TEXT NOT NULL,
            article_count INTEGER NOT NULL DEFAULT 0,
            new_article_count INTEGER NOT NULL DEFAULT 0
        );
    "#),
    ("TABLE_SYNC_LOGS", r#"
        CREATE TABLE IF NOT EXISTS sync_logs (
            id TEXT PRIMARY KEY,
            allocation_id TEXT NOT NULL,
            task_id TEXT NOT NULL,
            node_id TEXT,
            sync_type TEXT NOT NULL,
            feed_ids_json TEXT NOT NULL,
            article_count INTEGER NOT NULL DEFAULT 0,
            new_article_count INTEGER NOT NULL DEFAULT 0,
            status TEXT NOT NULL,
            error_message TEXT,
            started_at DATETIME,
            completed_at DATETIME NOT NULL
        );
    "#),
];

const ACCELERATION_INDEXES: &[(&str, &str)] = &[
    ("IDX_ALLOCATIONS_CLAIM", "CREATE INDEX IF NOT EXISTS idx_allocations_claim ON allocations(status, dispatched_at);"),
    ("IDX_ALLOCATIONS_NODE", "CREATE INDEX IF NOT EXISTS idx_allocations_node ON allocations(node_id);"),
    ("IDX_ALLOCATIONS_TASK", "CREATE INDEX IF NOT EXISTS idx_allocations_task ON allocations(task_id);"),
    ("IDX_ALLOCATIONS_SCHEDULE_RUN", "CREATE INDEX IF NOT EXISTS idx_allocations_schedule_run ON allocations(schedule_run_id);"),
    ("IDX_NODES_ACCESS_KEY", "CREATE INDEX IF NOT EXISTS idx_nodes_access_key ON nodes(access_key);"),
    ("IDX_SYNC_LOGS_TASK", "CREATE INDEX IF NOT EXISTS idx_sync_logs_task ON sync_logs(task_id);"),
];

/**
 * Ejecuta la secuencia maestra de sincronización del esquema estructural.
 *
 * # Errors:
 * Retorna error si alguna tabla base falla en solidificarse, indicando
 * un colapso en el enlace con el motor de persistencia.
 */
#[instrument(skip(database_connection))]
pub async fn apply_full_sovereign_schema(database_connection: &Connection) -> Result<()> {
    info!("🏗️ [SCHEMA_ENGINE]: Initiating structural synchronization (Cascade V1.0)...");

    solidify_base_strata(database_connection).await?;
    harden_access_layer(database_connection).await?;

    info!("✅ [SCHEMA_ENGINE]: Cascade dispatch ledger level and certified.");
    Ok(())
}

async fn solidify_base_strata(db: &Connection) -> Result<()> {
    for (identifier, sql) in TACTICAL_TABLES {
        debug!("  ↳ Solidifying: {}", identifier);
        db.execute(*sql, ()).await
            .with_context(|| format!("CRITICAL_SOLIDIFICATION_FAULT: {}", identifier))?;
    }
    Ok(())
}

async fn harden_access_layer(db: &Connection) -> Result<()> {
    for (identifier, sql) in ACCELERATION_INDEXES {
        debug!("  ↳ Hardening: {}", identifier);
        db.execute(*sql, ()).await
            .with_context(|| format!("CRITICAL_HARDENING_FAULT: {}", identifier))?;
    }
    Ok(())
}
