// [libs/infra/store/src/repositories/task/mod.rs]
/*!
 * =================================================================
 * APARATO: TASK REPOSITORY (V1.0 - SCHEDULE DEFINITIONS)
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L3)
 * RESPONSABILIDAD: ADMINISTRACIÓN DE DEFINICIONES PROGRAMABLES
 * =================================================================
 */

pub mod queries;

use crate::errors::StoreError;
use cascade_domain_models::{CreateTaskPayload, Task};
use libsql::{params, Connection};
use tracing::{info, instrument};
use uuid::Uuid;

use self::queries as sql_registry;

pub struct TaskRepository {
    database_connection: Connection,
}

impl TaskRepository {
    pub fn new(connection: Connection) -> Self {
        Self {
            database_connection: connection,
        }
    }

    #[instrument(skip(self, payload))]
    pub async fn create_task(&self, payload: CreateTaskPayload) -> Result<Task, StoreError> {
        let task_id = Uuid::new_v4().to_string();
        let feed_ids_json =
            serde_json::to_string(&payload.feed_ids).map_err(|e| StoreError::MappingError(e.to_string()))?;

        self.database_connection
            .execute(
                sql_registry::INSERT_TASK,
                params![
                    task_id.clone(),
                    payload.name,
                    payload.cron_expression,
                    feed_ids_json,
                    payload.enabled as i64,
                    payload.webhook_url,
                    payload.headers,
                    payload.cookies
                ],
            )
            .await?;

        info!("🗓️  [TASKS]: Task [{}] registered.", task_id);
        self.find_by_id(&task_id).await?.ok_or(StoreError::TaskNotFound)
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, task_id: &str) -> Result<Option<Task>, StoreError> {
        let mut rows = self
            .database_connection
            .query(sql_registry::FIND_TASK_BY_ID, params![task_id.to_string()])
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(map_row_to_task(&row)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Task>, StoreError> {
        let mut rows = self.database_connection.query(sql_registry::LIST_ALL_TASKS, ()).await?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next().await? {
            tasks.push(map_row_to_task(&row)?);
        }
        Ok(tasks)
    }

    /// Usado por el Planificador Cron al arrancar y al recargar, para
    /// conocer exactamente qué tareas deben tener un disparador activo.
    #[instrument(skip(self))]
    pub async fn list_enabled(&self) -> Result<Vec<Task>, StoreError> {
        let mut rows = self
            .database_connection
            .query(sql_registry::LIST_ENABLED_TASKS, ())
            .await?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next().await? {
            tasks.push(map_row_to_task(&row)?);
        }
        Ok(tasks)
    }

    #[instrument(skip(self))]
    pub async fn set_enabled(&self, task_id: &str, enabled: bool) -> Result<(), StoreError> {
        let affected = self
            .database_connection
            .execute(sql_registry::SET_TASK_ENABLED, params![task_id.to_string(), enabled as i64])
            .await?;

        if affected == 0 {
            return Err(StoreError::TaskNotFound);
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_task(&self, task_id: &str) -> Result<(), StoreError> {
        let affected = self
            .database_connection
            .execute(sql_registry::DELETE_TASK, params![task_id.to_string()])
            .await?;

        if affected == 0 {
            return Err(StoreError::TaskNotFound);
        }
        Ok(())
    }
}

fn map_row_to_task(row: &libsql::Row) -> Result<Task, StoreError> {
    let feed_ids_json: String = row.get(3)?;
    let feed_ids: Vec<String> =
        serde_json::from_str(&feed_ids_json).map_err(|e| StoreError::MappingError(e.to_string()))?;

    Ok(Task {
        id: row.get(0)?,
        name: row.get(1)?,
        cron_expression: row.get(2)?,
        feed_ids,
        enabled: row.get::<i64>(4)? != 0,
        webhook_url: row.get(5)?,
        headers: row.get(6)?,
        cookies: row.get(7)?,
    })
}
