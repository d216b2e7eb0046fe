// INICIO DEL ARCHIVO [apps/gateway/src/bin/migrator.rs]
/**
 * =================================================================
 * APARATO: DB MIGRATOR CLI (V1.0 - CASCADE)
 * CLASIFICACIÓN: OPS INFRASTRUCTURE (ESTRATO L6)
 * RESPONSABILIDAD: EJECUCIÓN DE MANTENIMIENTO Y NIVELACIÓN DE ESQUEMA
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. RESOLUCIÓN STACK_OVERFLOW: Configura un runtime de Tokio con
 *    soberanía de memoria (4MB stack) para procesar el esquema atómico.
 * 2. Handshake determinista con el Motor A vía TLS 1.3.
 * =================================================================
 */

use cascade_infra_store::schema::apply_full_sovereign_schema;
use cascade_infra_store::CascadeStoreClient;
use cascade_shared_heimdall::init_tracing;
use dotenvy::dotenv;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    // 1. CARGA DE ENTORNO OPERATIVO
    dotenv().ok();
    init_tracing("cascade_migrator");

    // 2. CONFIGURACIÓN DEL RUNTIME SOBERANO
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_stack_size(4 * 1024 * 1024)
        .build()?;

    runtime.block_on(async {
        info!("🚀 [MIGRATOR]: Initiating structural audit of the dispatch ledger...");

        // 3. ADQUISICIÓN DE CREDENCIALES ESTRATÉGICAS
        let database_url = std::env::var("DATABASE_URL")
            .expect("CRITICAL_FAULT: DATABASE_URL undefined in terminal context.");
        let database_token = std::env::var("TURSO_AUTH_TOKEN").ok();

        // 4. HANDSHAKE CON EL MOTOR A
        let database_client = match CascadeStoreClient::connect(&database_url, database_token).await {
            Ok(client) => client,
            Err(connection_error) => {
                error!("❌ [UPLINK_FAULT]: Failed to establish link: {}", connection_error);
                return Err(anyhow::anyhow!(connection_error));
            }
        };

        let database_connection = database_client
            .get_connection()
            .map_err(|error| anyhow::anyhow!("POOL_EXHAUSTED: {}", error))?;

        // 5. EJECUCIÓN DEL PROTOCOLO DE ESQUEMA
        match apply_full_sovereign_schema(&database_connection).await {
            Ok(_) => {
                info!("✨ [MIGRATOR_SUCCESS]: Dispatch ledger schema is up to date.");
                Ok(())
            }
            Err(schema_fault) => {
                error!("💀 [SCHEMA_COLLAPSE]: Fatal structural error: {}", schema_fault);
                std::process::exit(1);
            }
        }
    })
}
// FIN DEL ARCHIVO [apps/gateway/src/bin/migrator.rs]
