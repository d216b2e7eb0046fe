// [apps/gateway/src/state/mod.rs]
/*!
 * =================================================================
 * APARATO: SOVEREIGN STATE CONTAINER (V1.0 - CASCADE)
 * CLASIFICACIÓN: APPLICATION STATE (ESTRATO L1-APP)
 * RESPONSABILIDAD: ESTADO COMPARTIDO, MODO OPERATIVO Y ACCESO A DATOS
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. NOMINAL PURITY: Erradicación total de abreviaciones.
 * 2. COMPOSITION ROOT: Única fuente de verdad para el cliente de
 *    persistencia y el manejador del programador cron.
 * =================================================================
 */

use crate::services::scheduler::CascadeScheduler;
use cascade_infra_store::CascadeStoreClient;
use std::sync::{Arc, RwLock};
use tracing::{error, info, instrument, warn};

/// Modos de salud del sistema para la interceptación de middleware perimetral.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemMode {
    /// El sistema procesa ráfagas de red y asigna tareas de forma nominal.
    Operational,
    /// El sistema ha suspendido el despacho por mantenimiento.
    Maintenance(String),
}

/**
 * Contenedor de estado compartido (Thread-Safe) para el Gateway.
 */
#[derive(Clone)]
pub struct AppState {
    /// Cliente táctico para el Motor A (Turso Cloud / libSQL).
    pub database_client: CascadeStoreClient,
    /// Estado de liveness para guardias perimetrales de la API.
    pub current_system_mode: Arc<RwLock<SystemMode>>,
    /// Programador cron que despacha tareas habilitadas.
    pub scheduler: Arc<CascadeScheduler>,
}

impl AppState {
    pub fn new(database_client: CascadeStoreClient, scheduler: Arc<CascadeScheduler>) -> Self {
        info!("🧬 [APP_STATE]: Executing gateway state ignition sequence...");

        Self {
            database_client,
            current_system_mode: Arc::new(RwLock::new(SystemMode::Operational)),
            scheduler,
        }
    }

    /**
     * Sincroniza el modo operativo del servidor para el control de acceso.
     */
    #[instrument(skip(self, target_system_mode))]
    pub fn set_mode(&self, target_system_mode: SystemMode) {
        match self.current_system_mode.write() {
            Ok(mut mode_guard) => {
                info!("🔄 [STATE_SHIFT]: System transitioning to mode: {:?}", target_system_mode);
                *mode_guard = target_system_mode;
            }
            Err(lock_poison_fault) => {
                error!("💀 [KERNEL_CRASH]: System mode lock poisoned: {}", lock_poison_fault);
            }
        }
    }

    /**
     * Evalúa la capacidad operativa ante ráfagas HTTP entrantes.
     */
    #[instrument(skip(self), level = "debug")]
    pub fn is_operational(&self) -> Result<(), String> {
        let mode_guard = self
            .current_system_mode
            .read()
            .map_err(|e| format!("LOCK_POISON_FAULT: {}", e))?;

        match &*mode_guard {
            SystemMode::Operational => Ok(()),
            SystemMode::Maintenance(rejection_reason) => {
                warn!("⛔ [ACCESS_DENIED]: Gateway maintenance active: {}", rejection_reason);
                Err(rejection_reason.clone())
            }
        }
    }
}
