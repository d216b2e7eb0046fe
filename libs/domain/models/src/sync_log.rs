// [libs/domain/models/src/sync_log.rs]
/*!
 * =================================================================
 * APARATO: SYNC LOG DOMAIN MODEL (V1.0 - AUDIT STRATA)
 * CLASIFICACIÓN: DOMAIN ENTITIES (ESTRATO L2)
 * RESPONSABILIDAD: REGISTRO DE AUDITORIA POR ALOCACION FINALIZADA
 *
 * Escrito una vez por Allocation al llegar a un estado terminal; nunca
 * mutado después. `sync_type` distingue una corrida que reprocesa el
 * historial completo del feed de una que sólo trae artículos nuevos,
 * detalle tomado de `jobs/cascade_task_dispatcher.py` en el código de
 * origen.
 * =================================================================
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SyncType {
    Full,
    Incremental,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncLog {
    pub id: String,
    pub allocation_id: String,
    pub task_id: String,
    pub node_id: Option<String>,
    pub sync_type: SyncType,
    pub feed_ids: Vec<String>,
    pub article_count: u32,
    pub new_article_count: u32,
    pub status: String,
    pub error_message: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: DateTime<Utc>,
}

/// Per-feed freshness row surfaced by `GET /cascade/feed-status`, derived
/// by folding the sync log audit trail over each feed it touched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedStatus {
    pub feed_id: String,
    pub last_synced_at: DateTime<Utc>,
    pub last_status: String,
    pub last_task_id: String,
}
