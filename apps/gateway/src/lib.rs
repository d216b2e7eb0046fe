// [apps/gateway/src/lib.rs]
/*!
 * =================================================================
 * APARATO: GATEWAY LIBRARY ROOT (V1.0 - CASCADE)
 * CLASIFICACIÓN: CRATE ROOT (ESTRATO L3)
 * RESPONSABILIDAD: DEFINICIÓN SUPREMA DEL ÁRBOL DE MÓDULOS
 *
 * VISION HIPER-HOLÍSTICA:
 * Centraliza el árbol de módulos del coordinador: estado compartido,
 * adaptadores HTTP, daemons de fondo y el kernel que los conecta.
 * =================================================================
 */

// --- ESTRATO DE DATOS Y ESTADO (L1-APP) ---
/// Gestor del estado compartido del coordinador.
pub mod state;

// --- ESTRATO DE TRANSPORTE Y ACCIÓN ---
/// Traducción uniforme de fallos de persistencia a la forma de sobre HTTP.
pub mod errors;
/// Adaptadores de entrada para ráfagas HTTP.
pub mod handlers;
/// Núcleo de mando y control para la ignición de servicios.
pub mod kernel;
/// El túnel de mando: Definición de rutas y topología de red.
pub mod routes;

// --- ESTRATO DE SEGURIDAD Y SOPORTE ---
/// Guardianes perimetrales de salud y autenticación.
pub mod middleware;
/// Daemons de fondo: despacho cron y reclamación de timeouts.
pub mod services;

/**
 * PRELUDIO DEL GATEWAY
 *
 * Re-exportación estratégica de los componentes necesarios para
 * la ignición mínima del sistema. Reduce el acoplamiento en 'main.rs'.
 */
pub mod prelude {
    pub use crate::kernel::GatewayKernel;
    pub use crate::state::AppState;
    pub use crate::state::SystemMode;
}
