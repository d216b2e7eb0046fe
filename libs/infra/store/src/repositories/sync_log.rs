// [libs/infra/store/src/repositories/sync_log.rs]
/*!
 * =================================================================
 * APARATO: SYNC LOG REPOSITORY (V1.0 - AUDIT WRITER)
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L3)
 * RESPONSABILIDAD: ESCRITURA DE AUDITORÍA POR ALLOCATION FINALIZADA
 *
 * Escribe una única fila, nunca mutada, al llegar una allocation a un
 * estado terminal.
 * =================================================================
 */

use crate::errors::StoreError;
use cascade_domain_models::{FeedStatus, SyncLog, SyncType};
use libsql::{params, Connection};
use std::collections::HashMap;
use tracing::instrument;
use uuid::Uuid;

const INSERT_SYNC_LOG: &str = r#"
    INSERT INTO sync_logs (
        id, allocation_id, task_id, node_id, sync_type, feed_ids_json,
        article_count, new_article_count, status, error_message,
        started_at, completed_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, CURRENT_TIMESTAMP)
"#;

const LIST_BY_TASK: &str = r#"
    SELECT id, allocation_id, task_id, node_id, sync_type, feed_ids_json,
           article_count, new_article_count, status, error_message,
           started_at, completed_at
    FROM sync_logs WHERE task_id = ?1 ORDER BY completed_at DESC LIMIT ?2
"#;

const RECENT_LOGS_FOR_FEED_STATUS: &str = r#"
    SELECT task_id, feed_ids_json, status, completed_at
    FROM sync_logs ORDER BY completed_at DESC LIMIT ?1
"#;

pub struct SyncLogRepository {
    database_connection: Connection,
}

impl SyncLogRepository {
    pub fn new(connection: Connection) -> Self {
        Self {
            database_connection: connection,
        }
    }

    #[allow(clippy::too_many_arguments)]
    #[instrument(skip(self, feed_ids))]
    pub async fn record(
        &self,
        allocation_id: &str,
        task_id: &str,
        node_id: Option<&str>,
        sync_type: SyncType,
        feed_ids: &[String],
        article_count: u32,
        new_article_count: u32,
        status: &str,
        error_message: Option<&str>,
        started_at: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<(), StoreError> {
        let feed_ids_json = serde_json::to_string(feed_ids).map_err(|e| StoreError::MappingError(e.to_string()))?;
        let sync_type_wire = match sync_type {
            SyncType::Full => "full",
            SyncType::Incremental => "incremental",
        };

        self.database_connection
            .execute(
                INSERT_SYNC_LOG,
                params![
                    Uuid::new_v4().to_string(),
                    allocation_id.to_string(),
                    task_id.to_string(),
                    node_id.map(|s| s.to_string()),
                    sync_type_wire.to_string(),
                    feed_ids_json,
                    article_count as i64,
                    new_article_count as i64,
                    status.to_string(),
                    error_message.map(|s| s.to_string()),
                    started_at.map(|ts| ts.to_rfc3339())
                ],
            )
            .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_by_task(&self, task_id: &str, limit: u32) -> Result<Vec<SyncLog>, StoreError> {
        let mut rows = self
            .database_connection
            .query(LIST_BY_TASK, params![task_id.to_string(), limit as i64])
            .await?;

        let mut logs = Vec::new();
        while let Some(row) = rows.next().await? {
            logs.push(map_row_to_sync_log(&row)?);
        }
        Ok(logs)
    }

    /// Folds the most recent sync log rows over each feed they touched,
    /// keeping only the freshest entry per `feed_id`. Backs
    /// `GET /cascade/feed-status`.
    #[instrument(skip(self))]
    pub async fn feed_status(&self, scan_window: u32) -> Result<Vec<FeedStatus>, StoreError> {
        let mut rows = self
            .database_connection
            .query(RECENT_LOGS_FOR_FEED_STATUS, params![scan_window as i64])
            .await?;

        let mut freshest_by_feed: HashMap<String, FeedStatus> = HashMap::new();
        while let Some(row) = rows.next().await? {
            let task_id: String = row.get(0)?;
            let feed_ids_json: String = row.get(1)?;
            let status: String = row.get(2)?;
            let completed_at = parse_timestamp(&row.get::<String>(3)?)?;

            let feed_ids: Vec<String> =
                serde_json::from_str(&feed_ids_json).map_err(|e| StoreError::MappingError(e.to_string()))?;

            for feed_id in feed_ids {
                freshest_by_feed.entry(feed_id.clone()).or_insert_with(|| FeedStatus {
                    feed_id,
                    last_synced_at: completed_at,
                    last_status: status.clone(),
                    last_task_id: task_id.clone(),
                });
            }
        }

        let mut feed_statuses: Vec<FeedStatus> = freshest_by_feed.into_values().collect();
        feed_statuses.sort_by(|a, b| b.last_synced_at.cmp(&a.last_synced_at));
        Ok(feed_statuses)
    }
}

fn map_row_to_sync_log(row: &libsql::Row) -> Result<SyncLog, StoreError> {
    let feed_ids_json: String = row.get(5)?;
    let feed_ids: Vec<String> =
        serde_json::from_str(&feed_ids_json).map_err(|e| StoreError::MappingError(e.to_string()))?;

    let sync_type_raw: String = row.get(4)?;
    let sync_type = match sync_type_raw.as_str() {
        "full" => SyncType::Full,
        _ => SyncType::Incremental,
    };

    let started_raw: Option<String> = row.get(10)?;
    let started_at = started_raw.map(|raw| parse_timestamp(&raw)).transpose()?;
    let completed_at = parse_timestamp(&row.get::<String>(11)?)?;

    Ok(SyncLog {
        id: row.get(0)?,
        allocation_id: row.get(1)?,
        task_id: row.get(2)?,
        node_id: row.get(3)?,
        sync_type,
        feed_ids,
        article_count: row.get::<i64>(6)? as u32,
        new_article_count: row.get::<i64>(7)? as u32,
        status: row.get(8)?,
        error_message: row.get(9)?,
        started_at,
        completed_at,
    })
}

fn parse_timestamp(raw: &str) -> Result<chrono::DateTime<chrono::Utc>, StoreError> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .map(|naive| chrono::DateTime::from_naive_utc_and_offset(naive, chrono::Utc))
        })
        .map_err(|e| StoreError::MappingError(format!("timestamp parse fault: {e}")))
}
