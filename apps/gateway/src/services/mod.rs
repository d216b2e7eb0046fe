// [apps/gateway/src/services/mod.rs]
/*!
 * =================================================================
 * APARATO: BACKGROUND SERVICE HUB (V1.0 - CASCADE)
 * CLASIFICACIÓN: APPLICATION SERVICES (ESTRATO L4)
 * RESPONSABILIDAD: EXPOSICIÓN NOMINAL DE DAEMONS Y MOTORES DE DESPACHO
 *
 * # Topología de Módulos:
 * - dispatcher:  Materialización de allocations pendientes por tarea.
 * - reclaimer:   Barrido periódico de allocations y nodos expirados.
 * - scheduler:   Planificador cron que dispara el despacho autónomo.
 * =================================================================
 */

pub mod dispatcher;
pub mod reclaimer;
pub mod scheduler;

pub use reclaimer::spawn_reclaimer;
pub use scheduler::CascadeScheduler;
