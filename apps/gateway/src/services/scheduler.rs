// [apps/gateway/src/services/scheduler.rs]
/*!
 * =================================================================
 * APARATO: CASCADE CRON SCHEDULER (V1.0)
 * CLASIFICACIÓN: BACKGROUND INFRASTRUCTURE (ESTRATO L4)
 * RESPONSABILIDAD: DISPARO AUTÓNOMO DE DESPACHOS SEGÚN CRON_EXPRESSION
 *
 * Cada tarea habilitada obtiene un disparador propio. El identificador
 * de tarea se captura por valor (String propio) al construir el job,
 * nunca por referencia al iterador: una referencia prestada moriría
 * antes de que el disparador se ejecute por primera vez.
 *
 * Un disparo que encuentra la tarea todavía en ejecución (el guardia
 * de no-solapamiento no se puede adquirir) se descarta, no se encola.
 * =================================================================
 */

use cascade_infra_store::repositories::TaskRepository;
use cascade_infra_store::CascadeStoreClient;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

pub struct CascadeScheduler {
    database_client: CascadeStoreClient,
    inner: RwLock<Option<JobScheduler>>,
    registered_jobs: Mutex<HashMap<String, Uuid>>,
    in_flight_guards: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl CascadeScheduler {
    pub fn new(database_client: CascadeStoreClient) -> Self {
        Self {
            database_client,
            inner: RwLock::new(None),
            registered_jobs: Mutex::new(HashMap::new()),
            in_flight_guards: Mutex::new(HashMap::new()),
        }
    }

    /// Arranca el planificador y registra un disparador por tarea habilitada.
    #[instrument(skip(self))]
    pub async fn start(&self) -> anyhow::Result<()> {
        let scheduler = JobScheduler::new().await?;
        {
            let mut inner_guard = self.inner.write().await;
            *inner_guard = Some(scheduler);
        }

        self.register_enabled_tasks().await?;

        let inner_guard = self.inner.read().await;
        if let Some(scheduler) = inner_guard.as_ref() {
            scheduler.start().await?;
        }

        info!("🗓️  [SCHEDULER]: Cron scheduler online.");
        Ok(())
    }

    /// Detiene el planificador sin destruir el estado de registro de tareas.
    #[instrument(skip(self))]
    pub async fn stop(&self) -> anyhow::Result<()> {
        let mut inner_guard = self.inner.write().await;
        if let Some(mut scheduler) = inner_guard.take() {
            scheduler.shutdown().await?;
        }
        self.registered_jobs.lock().await.clear();
        info!("🛑 [SCHEDULER]: Cron scheduler stopped.");
        Ok(())
    }

    /// Detiene y reconstruye completamente el planificador, recogiendo
    /// cualquier tarea creada, editada o deshabilitada desde el último arranque.
    #[instrument(skip(self))]
    pub async fn reload(&self) -> anyhow::Result<()> {
        self.stop().await?;
        self.start().await?;
        info!("🔄 [SCHEDULER]: Cron scheduler reloaded.");
        Ok(())
    }

    async fn register_enabled_tasks(&self) -> anyhow::Result<()> {
        let connection = self.database_client.get_connection()?;
        let enabled_tasks = TaskRepository::new(connection).list_enabled().await?;

        let inner_guard = self.inner.read().await;
        let scheduler = inner_guard
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("scheduler not initialized"))?;

        for task in enabled_tasks {
            let task_id = task.id.clone();
            let database_client = self.database_client.clone();
            let guard = self.guard_for(&task_id).await;

            let job = Job::new_async(task.cron_expression.as_str(), move |_uuid, _locked| {
                let task_id = task_id.clone();
                let database_client = database_client.clone();
                let guard = guard.clone();
                Box::pin(async move {
                    let Ok(_permit) = guard.try_lock() else {
                        warn!("⏭️  [SCHEDULER_SKIP]: Task [{}] still in flight; firing dropped.", task_id);
                        return;
                    };

                    match crate::services::dispatcher::execute_dispatch(&database_client, Some(&task_id)).await {
                        Ok(allocations) => {
                            info!("🗓️  [SCHEDULER_FIRE]: Task [{}] produced {} allocation(s).", task_id, allocations.len());
                        }
                        Err(fault) => error!("💀 [SCHEDULER_FAULT]: Task [{}] dispatch failed: {}", task_id, fault),
                    }
                })
            })?;

            let job_id = scheduler.add(job).await?;
            self.registered_jobs.lock().await.insert(task.id, job_id);
        }

        Ok(())
    }

    async fn guard_for(&self, task_id: &str) -> Arc<Mutex<()>> {
        let mut guards = self.in_flight_guards.lock().await;
        guards
            .entry(task_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
