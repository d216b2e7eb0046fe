// [apps/worker-agent/src/main.rs]
/*!
 * =================================================================
 * APARATO: WORKER AGENT SHELL (V1.0 - CASCADE)
 * CLASIFICACIÓN: APPLICATION LAYER (ENTRY POINT)
 * RESPONSABILIDAD: BOOTSTRAP DE ENTORNO E IGNICIÓN DEL MOTOR
 *
 * Switchboard puro de configuración y señales: parsea directivas,
 * instala el manejador de ctrl-c y delega el ciclo de vida completo
 * al `DispatchEngine`.
 * =================================================================
 */

use anyhow::Result;
use clap::Parser;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

use cascade_infra_worker_client::WorkerClient;
use cascade_worker_agent_lib::engine::DispatchEngine;

/// Directivas de mando para el nodo trabajador. Inyectadas vía CLI o
/// variables de entorno.
#[derive(Parser, Debug)]
#[command(
    author = "Raz Podesta <metaShark Tech>",
    version,
    about = "Cascade Worker Agent // heartbeat-claim-execute-report loop"
)]
struct WorkerDirectives {
    /// Endpoint base del gateway de despacho.
    #[arg(long, env = "GATEWAY_URL")]
    gateway_url: String,

    /// Access key emitida por el gateway para este nodo.
    #[arg(long, env = "WORKER_ACCESS_KEY")]
    access_key: String,

    /// Secret emitido por el gateway para este nodo.
    #[arg(long, env = "WORKER_SECRET")]
    secret: String,

    /// Identificador legible del nodo, usado solo en logs locales.
    #[arg(long, env = "WORKER_NODE_IDENTIFIER", default_value = "worker-node-alpha")]
    worker_node_identifier: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    info!("💠 [SHELL]: Worker agent initiation sequence starting...");

    let worker_directives = WorkerDirectives::parse();

    // PROTOCOLO DE SEÑALES DE SISTEMA (Terminación Ordenada)
    let termination_signal_atomic = Arc::new(AtomicBool::new(true));
    let signal_flag_reference = Arc::clone(&termination_signal_atomic);

    ctrlc::set_handler(move || {
        warn!("⚠️ [SIGNAL]: Termination requested by host. Sealing current cycle...");
        signal_flag_reference.store(false, std::sync::atomic::Ordering::SeqCst);
    })
    .expect("FATAL: Unable to install ctrl-c signal handler.");

    let uplink = Arc::new(WorkerClient::new(
        worker_directives.gateway_url,
        worker_directives.access_key,
        worker_directives.secret,
    ));

    let engine = DispatchEngine::new(
        uplink,
        termination_signal_atomic,
        worker_directives.worker_node_identifier,
    );

    info!("🚀 [SHELL]: Handing control to DispatchEngine. Transitioning to OPERATIONAL.");

    engine.run_poll_loop().await;

    info!("🏁 [SHELL]: Shutdown sequence concluded. Worker node offline.");

    Ok(())
}
