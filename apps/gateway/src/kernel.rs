// INICIO DEL ARCHIVO [apps/gateway/src/kernel.rs]
/**
 * =================================================================
 * APARATO: GATEWAY SOVEREIGN KERNEL (V1.0 - CASCADE)
 * CLASIFICACIÓN: COMPOSITION ROOT (ESTRATO L1-APP)
 * RESPONSABILIDAD: BOOTSTRAP DE INFRAESTRUCTURA E IGNICIÓN SEGURA
 *
 * VISION HIPER-HOLÍSTICA:
 * Actúa como la placa base donde se conectan la persistencia, el
 * planificador cron y el transporte HTTP.
 * =================================================================
 */

use crate::routes::create_sovereign_router;
use crate::services::{reclaimer, spawn_reclaimer, CascadeScheduler};
use crate::state::AppState;
use cascade_infra_store::CascadeStoreClient;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::{error, info, instrument};

pub struct GatewayKernel {
    pub server_network_port: u16,
    pub application_state: AppState,
}

impl GatewayKernel {
    /**
     * Realiza la ignición del cliente táctico y el estado compartido.
     * Establece la conexión a la base de datos antes de levantar servicios.
     */
    #[instrument(skip(database_access_token))]
    pub async fn ignite(
        database_connection_url: &str,
        database_access_token: Option<String>,
        listening_port: u16,
    ) -> Self {
        let database_client = CascadeStoreClient::connect(database_connection_url, database_access_token)
            .await
            .expect("FATAL: Database link collapse. Ignition aborted.");

        let scheduler = Arc::new(CascadeScheduler::new(database_client.clone()));

        Self {
            server_network_port: listening_port,
            application_state: AppState::new(database_client, scheduler),
        }
    }

    /**
     * Lanza la ejecución de todas las operaciones autónomas del coordinador.
     * Configura los daemons de fondo y el servidor HTTP principal.
     */
    pub async fn launch_sovereign_operations(self) {
        let shared_application_state = self.application_state.clone();

        // --- 1. PLANIFICADOR CRON ---
        if let Err(fault) = shared_application_state.scheduler.start().await {
            error!("💀 [KERNEL_FAULT]: Cron scheduler failed to start: {}", fault);
        }

        // --- 2. RECLAMADOR DE ALLOCATIONS EXPIRADAS ---
        spawn_reclaimer(
            shared_application_state.database_client.clone(),
            reclaimer::DEFAULT_RECLAIM_THRESHOLD_MINUTES,
        )
        .await;

        // --- 3. IGNICIÓN DEL TRANSPORTE HTTP (AXUM) ---
        let sovereign_router = create_sovereign_router(shared_application_state);

        let bind_address = SocketAddr::new("0.0.0.0".parse::<IpAddr>().unwrap(), self.server_network_port);

        info!("🚀 [KERNEL_ONLINE]: Cascade Gateway listening at {}", bind_address);

        let tcp_listener = tokio::net::TcpListener::bind(bind_address)
            .await
            .expect("CRITICAL_FAULT: Failed to bind network port.");

        if let Err(server_error) = axum::serve(tcp_listener, sovereign_router).await {
            error!("💀 [KERNEL_COLLAPSE]: Runtime failure: {}", server_error);
            std::process::exit(1);
        }
    }
}
// FIN DEL ARCHIVO [apps/gateway/src/kernel.rs]
