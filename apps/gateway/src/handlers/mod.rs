// INICIO DEL ARCHIVO [apps/gateway/src/handlers/mod.rs]
/*!
 * =================================================================
 * APARATO: CASCADE HANDLER HUB (V1.0)
 * CLASIFICACIÓN: APPLICATION ADAPTERS (ESTRATO L4)
 * RESPONSABILIDAD: EXPOSICIÓN NOMINAL DE PUNTOS DE ENTRADA (HANDLERS)
 *
 * # Topología de Módulos:
 * - nodes:    Registro, actualización y emisión de credenciales.
 * - worker:   Ciclo de vida de allocations desde la óptica del worker.
 * - dispatch: Disparo de despacho, consulta de allocations y control
 *             del planificador cron.
 * =================================================================
 */

pub mod dispatch;
pub mod nodes;
pub mod worker;
// FIN DEL ARCHIVO [apps/gateway/src/handlers/mod.rs]
