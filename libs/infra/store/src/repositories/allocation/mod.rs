// [libs/infra/store/src/repositories/allocation/mod.rs]
/*!
 * =================================================================
 * APARATO: ALLOCATION REPOSITORY (V1.0 - DISPATCH LEDGER GUARD)
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L3)
 * RESPONSABILIDAD: GESTIÓN DEL CICLO DE VIDA DE ALLOCATIONS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. SEMANTIC ERROR HANDLING: Utiliza 'StoreError' para reportar
 *    fallos de transacción y conflictos de propiedad.
 * 2. ATOMIC CLAIM: El despacho FIFO por 'dispatched_at' se resuelve
 *    dentro de una transacción serializable sobre el motor libSQL.
 * 3. ZERO ABBREVIATIONS: Nomenclatura nominal absoluta.
 *
 * # Mathematical Proof (Transactional Exclusivity):
 * El repositorio implementa un semáforo ACID. Al encapsular la
 * búsqueda y el guardia de estado `status = 'pending'` dentro de una
 * única transacción, se garantiza que ninguna allocation pendiente
 * pueda ser reclamada por dos nodos simultáneamente.
 * =================================================================
 */

pub mod queries;

use crate::errors::StoreError;
use cascade_domain_models::{Allocation, AllocationStats, AllocationStatus};
use chrono::{DateTime, Utc};
use libsql::{params, Connection};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use self::queries as sql_registry;

pub struct AllocationRepository {
    database_connection: Connection,
}

impl AllocationRepository {
    pub fn new(connection: Connection) -> Self {
        Self {
            database_connection: connection,
        }
    }

    /// Crea una allocation pendiente para un disparo del cron. Tomada
    /// una vez por el Despachador al materializar la corrida programada.
    #[instrument(skip(self, feed_ids))]
    pub async fn dispatch_pending(
        &self,
        task_id: &str,
        task_name_snapshot: &str,
        cron_snapshot: &str,
        feed_ids: &[String],
        dispatched_at: DateTime<Utc>,
        schedule_run_id: &str,
    ) -> Result<Allocation, StoreError> {
        let allocation_id = Uuid::new_v4().to_string();
        let feed_ids_json = serde_json::to_string(feed_ids).map_err(|e| StoreError::MappingError(e.to_string()))?;

        self.database_connection
            .execute(
                sql_registry::INSERT_PENDING_ALLOCATION,
                params![
                    allocation_id.clone(),
                    task_id.to_string(),
                    task_name_snapshot.to_string(),
                    cron_snapshot.to_string(),
                    feed_ids_json,
                    dispatched_at.to_rfc3339(),
                    schedule_run_id.to_string()
                ],
            )
            .await?;

        info!("📦 [DISPATCH]: Allocation [{}] queued for task [{}]", allocation_id, task_id);
        self.find_by_id(&allocation_id).await?.ok_or(StoreError::AllocationNotFound)
    }

    /// Reclama de forma atómica la allocation pendiente más antigua
    /// (FIFO por `dispatched_at`) para el nodo dado. Grounded en
    /// `job/mod.rs`'s `assign_mission_to_worker`.
    #[instrument(skip(self))]
    pub async fn claim_next_for_node(&self, node_id: &str) -> Result<Allocation, StoreError> {
        let transaction = self
            .database_connection
            .transaction()
            .await
            .map_err(|_| StoreError::TransactionError)?;

        let mut candidate_rows = transaction.query(sql_registry::FIND_OLDEST_PENDING, ()).await?;
        let candidate_id: String = match candidate_rows.next().await? {
            Some(row) => row.get(0)?,
            None => {
                transaction.commit().await.map_err(|_| StoreError::TransactionError)?;
                return Err(StoreError::NoEligibleAllocation);
            }
        };
        drop(candidate_rows);

        let affected = transaction
            .execute(sql_registry::CLAIM_ALLOCATION, params![candidate_id.clone(), node_id.to_string()])
            .await?;

        if affected == 0 {
            transaction.commit().await.map_err(|_| StoreError::TransactionError)?;
            warn!("⚠️  [CLAIM_RACE]: Allocation [{}] lost to a concurrent claimant.", candidate_id);
            return Err(StoreError::ClaimRaceLost);
        }

        transaction.commit().await.map_err(|_| StoreError::TransactionError)?;

        info!("🎯 [CLAIM]: Allocation [{}] claimed by node [{}]", candidate_id, node_id);
        self.find_by_id(&candidate_id).await?.ok_or(StoreError::AllocationNotFound)
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, allocation_id: &str) -> Result<Option<Allocation>, StoreError> {
        let mut rows = self
            .database_connection
            .query(sql_registry::FIND_ALLOCATION_BY_ID, params![allocation_id.to_string()])
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(map_row_to_allocation(&row)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    pub async fn mark_executing(&self, allocation_id: &str, node_id: &str) -> Result<(), StoreError> {
        let affected = self
            .database_connection
            .execute(
                sql_registry::SET_STATUS_EXECUTING,
                params![allocation_id.to_string(), node_id.to_string()],
            )
            .await?;

        if affected == 0 {
            return Err(StoreError::InvalidState);
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn mark_failed(
        &self,
        allocation_id: &str,
        node_id: &str,
        error_message: &str,
    ) -> Result<(), StoreError> {
        let affected = self
            .database_connection
            .execute(
                sql_registry::SET_STATUS_FAILED,
                params![allocation_id.to_string(), node_id.to_string(), error_message.to_string()],
            )
            .await?;

        if affected == 0 {
            return Err(StoreError::InvalidState);
        }
        Ok(())
    }

    /// Retira una allocation recién reclamada cuyo `Task` ya no existe o
    /// fue deshabilitada entre el despacho y el claim. Grounded en §4.3's
    /// "the claim is rolled back" rule — seals the row as `failed` with
    /// `"task missing"` instead of leaving it stranded in `claimed`.
    #[instrument(skip(self))]
    pub async fn fail_claimed(&self, allocation_id: &str, node_id: &str, error_message: &str) -> Result<(), StoreError> {
        let affected = self
            .database_connection
            .execute(
                sql_registry::FAIL_CLAIMED_ALLOCATION,
                params![allocation_id.to_string(), node_id.to_string(), error_message.to_string()],
            )
            .await?;

        if affected == 0 {
            return Err(StoreError::InvalidState);
        }
        Ok(())
    }

    /// `upload-articles` únicamente incrementa `new_article_count`;
    /// `article_count` sólo lo fija `report-completion`.
    #[instrument(skip(self))]
    pub async fn record_new_articles(
        &self,
        allocation_id: &str,
        node_id: &str,
        count: u32,
    ) -> Result<(), StoreError> {
        let affected = self
            .database_connection
            .execute(
                sql_registry::RECORD_NEW_ARTICLES,
                params![allocation_id.to_string(), node_id.to_string(), count as i64],
            )
            .await?;

        if affected == 0 {
            return Err(StoreError::InvalidState);
        }
        Ok(())
    }

    #[instrument(skip(self, result_summary))]
    pub async fn complete_allocation(
        &self,
        allocation_id: &str,
        node_id: &str,
        article_count: u32,
        result_summary: &serde_json::Value,
    ) -> Result<(), StoreError> {
        let summary_json =
            serde_json::to_string(result_summary).map_err(|e| StoreError::MappingError(e.to_string()))?;

        let affected = self
            .database_connection
            .execute(
                sql_registry::COMPLETE_ALLOCATION,
                params![allocation_id.to_string(), node_id.to_string(), article_count as i64, summary_json],
            )
            .await?;

        if affected == 0 {
            return Err(StoreError::InvalidState);
        }

        info!("✅ [SEALED]: Allocation [{}] completed by node [{}]", allocation_id, node_id);
        Ok(())
    }

    /// Invocado por el Reclamador: cualquier allocation en `claimed` o
    /// `executing` cuya ventana de despacho supere el umbral configurado
    /// pasa a `timeout`, liberando al nodo sin reabrirla.
    #[instrument(skip(self))]
    pub async fn reclaim_expired(&self, cutoff: DateTime<Utc>) -> Result<Vec<String>, StoreError> {
        let mut rows = self
            .database_connection
            .query(sql_registry::FIND_EXPIRED_IN_FLIGHT, params![cutoff.to_rfc3339()])
            .await?;

        let mut expired_ids = Vec::new();
        while let Some(row) = rows.next().await? {
            expired_ids.push(row.get::<String>(0)?);
        }

        let mut reclaimed = Vec::new();
        for allocation_id in expired_ids {
            let affected = self
                .database_connection
                .execute(sql_registry::MARK_TIMED_OUT, params![allocation_id.clone()])
                .await?;
            if affected > 0 {
                warn!("⏰ [RECLAIM]: Allocation [{}] timed out and reclaimed.", allocation_id);
                reclaimed.push(allocation_id);
            }
        }

        Ok(reclaimed)
    }

    /// Ensambla el bloque de estadísticas. `online_nodes` llega ya
    /// calculado por el llamador (vía `NodeRepository::count_online`) —
    /// este repositorio no tiene dependencia alguna sobre el registro
    /// de nodos.
    #[instrument(skip(self))]
    pub async fn stats(&self, online_nodes: u64) -> Result<AllocationStats, StoreError> {
        let today_start = Utc::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always a valid time")
            .and_utc();

        let mut pending_rows = self.database_connection.query(sql_registry::COUNT_PENDING, ()).await?;
        let pending = Self::read_scalar_count(&mut pending_rows).await?;

        let mut in_flight_rows = self.database_connection.query(sql_registry::COUNT_IN_FLIGHT, ()).await?;
        let in_flight = Self::read_scalar_count(&mut in_flight_rows).await?;

        let mut completed_rows = self
            .database_connection
            .query(sql_registry::COUNT_COMPLETED_TODAY, params![today_start.to_rfc3339()])
            .await?;
        let completed_today = Self::read_scalar_count(&mut completed_rows).await?;

        let mut failed_rows = self
            .database_connection
            .query(sql_registry::COUNT_FAILED_TODAY, params![today_start.to_rfc3339()])
            .await?;
        let failed_today = Self::read_scalar_count(&mut failed_rows).await?;

        Ok(AllocationStats {
            pending,
            in_flight,
            completed_today,
            failed_today,
            online_nodes,
        })
    }

    async fn read_scalar_count(rows: &mut libsql::Rows) -> Result<u64, StoreError> {
        match rows.next().await? {
            Some(row) => Ok(row.get::<i64>(0)? as u64),
            None => Ok(0),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_by_task(&self, task_id: &str, limit: u32, offset: u32) -> Result<Vec<Allocation>, StoreError> {
        let mut rows = self
            .database_connection
            .query(sql_registry::LIST_BY_TASK, params![task_id.to_string(), limit as i64, offset as i64])
            .await?;

        let mut allocations = Vec::new();
        while let Some(row) = rows.next().await? {
            allocations.push(map_row_to_allocation(&row)?);
        }
        Ok(allocations)
    }

    #[instrument(skip(self))]
    pub async fn list_all(&self, limit: u32, offset: u32) -> Result<Vec<Allocation>, StoreError> {
        let mut rows = self
            .database_connection
            .query(sql_registry::LIST_ALL, params![limit as i64, offset as i64])
            .await?;

        let mut allocations = Vec::new();
        while let Some(row) = rows.next().await? {
            allocations.push(map_row_to_allocation(&row)?);
        }
        Ok(allocations)
    }
}

fn map_row_to_allocation(row: &libsql::Row) -> Result<Allocation, StoreError> {
    let feed_ids_json: String = row.get(5)?;
    let feed_ids: Vec<String> =
        serde_json::from_str(&feed_ids_json).map_err(|e| StoreError::MappingError(e.to_string()))?;

    let status_raw: String = row.get(6)?;
    let status = AllocationStatus::from_str_opt(&status_raw)
        .ok_or_else(|| StoreError::MappingError(format!("unknown allocation status: {status_raw}")))?;

    let result_summary_raw: Option<String> = row.get(7)?;
    let result_summary = result_summary_raw
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(|e| StoreError::MappingError(e.to_string()))?;

    Ok(Allocation {
        id: row.get(0)?,
        task_id: row.get(1)?,
        task_name_snapshot: row.get(2)?,
        cron_snapshot: row.get(3)?,
        node_id: row.get(4)?,
        feed_ids,
        status,
        result_summary,
        error_message: row.get(8)?,
        dispatched_at: parse_timestamp(&row.get::<String>(9)?)?,
        claimed_at: optional_timestamp(row.get::<Option<String>>(10)?)?,
        started_at: optional_timestamp(row.get::<Option<String>>(11)?)?,
        completed_at: optional_timestamp(row.get::<Option<String>>(12)?)?,
        schedule_run_id: row.get(13)?,
        article_count: row.get::<i64>(14)? as u32,
        new_article_count: row.get::<i64>(15)? as u32,
    })
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
        })
        .map_err(|e| StoreError::MappingError(format!("timestamp parse fault: {e}")))
}

fn optional_timestamp(raw: Option<String>) -> Result<Option<DateTime<Utc>>, StoreError> {
    raw.map(|value| parse_timestamp(&value)).transpose()
}
