// [apps/worker-agent/src/engine.rs]
/*!
 * =================================================================
 * APARATO: DISPATCH EXECUTION ENGINE (V1.0 - CASCADE)
 * CLASIFICACIÓN: WORKER EXECUTION LAYER (ESTRATO L1-WORKER)
 * RESPONSABILIDAD: CICLO HEARTBEAT -> CLAIM -> EXECUTE -> REPORT
 *
 * El motor no paraleliza claims: en la configuración por defecto corre
 * un único loop secuencial. `max_capacity > 1` se resolvería corriendo
 * N instancias de este motor, cada una con su propio loop.
 * =================================================================
 */

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

use cascade_domain_models::{AllocationStatus, ExternalJobExecutor, NullJobExecutor, TaskPackage};
use cascade_infra_worker_client::WorkerClient;

/// Intervalo entre ciclos de claim cuando la cola de allocations está vacía.
const POLL_INTERVAL_SECONDS: u64 = 30;
/// Intervalo del heartbeat independiente, además del piggyback en cada claim.
const HEARTBEAT_INTERVAL_SECONDS: u64 = 60;
/// Techo de pared sobre la ejecución completa de un paquete de feeds. La
/// granularidad por-feed queda del lado del `ExternalJobExecutor`; este
/// techo cubre el caso en que el ejecutor entero se cuelga.
const EXECUTION_WALL_CLOCK_TIMEOUT_SECONDS: u64 = 120;

pub struct DispatchEngine {
    gateway_uplink: Arc<WorkerClient>,
    is_operational_signal: Arc<AtomicBool>,
    worker_node_identifier: String,
    job_executor: Arc<dyn ExternalJobExecutor>,
}

impl DispatchEngine {
    pub fn new(
        client: Arc<WorkerClient>,
        operational_signal: Arc<AtomicBool>,
        node_id: String,
    ) -> Self {
        Self {
            gateway_uplink: client,
            is_operational_signal: operational_signal,
            worker_node_identifier: node_id,
            job_executor: Arc::new(NullJobExecutor),
        }
    }

    /// Sustituye el ejecutor por defecto (`NullJobExecutor`) por uno real.
    pub fn with_job_executor(mut self, executor: Arc<dyn ExternalJobExecutor>) -> Self {
        self.job_executor = executor;
        self
    }

    #[instrument(skip(self), fields(node = %self.worker_node_identifier))]
    pub async fn run_poll_loop(&self) {
        info!("🚀 [ENGINE]: Dispatch poll loop starting.");

        let heartbeat_uplink = Arc::clone(&self.gateway_uplink);
        let heartbeat_stop_signal = Arc::clone(&self.is_operational_signal);
        tokio::spawn(async move {
            while heartbeat_stop_signal.load(Ordering::SeqCst) {
                sleep(Duration::from_secs(HEARTBEAT_INTERVAL_SECONDS)).await;
                if let Err(fault) = heartbeat_uplink.heartbeat().await {
                    warn!("💔 [HEARTBEAT_TIMER]: Heartbeat failed: {}", fault);
                }
            }
        });

        while self.is_operational_signal.load(Ordering::SeqCst) {
            if let Err(fault) = self.gateway_uplink.heartbeat().await {
                warn!("💔 [HEARTBEAT]: Piggyback heartbeat failed: {}", fault);
            }

            match self.gateway_uplink.claim_task().await {
                Ok(Some(package)) => {
                    info!("🎯 [CLAIMED]: allocation {}", package.allocation_id);
                    if let Err(fault) = self.execute_allocation(package).await {
                        error!("⚠️ [ALLOCATION_ABORTED]: {}", fault);
                    }
                }
                Ok(None) => {
                    debug!("💤 [STANDBY]: No eligible allocation. Sleeping {}s.", POLL_INTERVAL_SECONDS);
                    sleep(Duration::from_secs(POLL_INTERVAL_SECONDS)).await;
                }
                Err(fault) => {
                    warn!("🚫 [CLAIM_FAULT]: {}. Pulsing in {}s.", fault, POLL_INTERVAL_SECONDS);
                    sleep(Duration::from_secs(POLL_INTERVAL_SECONDS)).await;
                }
            }
        }
    }

    /// Orquesta el ciclo de vida de una allocation ya reclamada: marca
    /// `executing`, ejecuta el trabajo externo, sube artículos y sella
    /// la finalización, o reporta `failed` ante cualquier fallo.
    #[instrument(skip_all, fields(allocation_id = %package.allocation_id, task_id = %package.task_id))]
    async fn execute_allocation(&self, package: TaskPackage) -> anyhow::Result<()> {
        self.gateway_uplink
            .report_task_status(&package.allocation_id, AllocationStatus::Executing, None)
            .await?;

        let feed_ids: Vec<String> = package.feeds.iter().map(|feed| feed.id.clone()).collect();

        let execution_outcome = tokio::time::timeout(
            Duration::from_secs(EXECUTION_WALL_CLOCK_TIMEOUT_SECONDS),
            self.job_executor.execute(&feed_ids, package.headers.as_deref(), package.cookies.as_deref()),
        )
        .await;

        let (articles, results) = match execution_outcome {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(executor_fault)) => {
                self.gateway_uplink
                    .report_task_status(&package.allocation_id, AllocationStatus::Failed, Some(&executor_fault))
                    .await?;
                return Ok(());
            }
            Err(_timed_out) => {
                let timeout_message = format!(
                    "execution wall-clock timeout after {}s",
                    EXECUTION_WALL_CLOCK_TIMEOUT_SECONDS
                );
                self.gateway_uplink
                    .report_task_status(&package.allocation_id, AllocationStatus::Failed, Some(&timeout_message))
                    .await?;
                return Ok(());
            }
        };

        if !articles.is_empty() {
            self.gateway_uplink
                .upload_articles(&package.allocation_id, &articles)
                .await?;
        }

        let article_count: u32 = results.iter().map(|result| result.article_count).sum();

        self.gateway_uplink
            .report_completion(&package.allocation_id, &package.task_id, &results, article_count)
            .await?;

        info!("✅ [SEALED]: allocation {} reported complete.", package.allocation_id);
        Ok(())
    }
}
