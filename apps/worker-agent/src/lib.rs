// [apps/worker-agent/src/lib.rs]
/*!
 * =================================================================
 * APARATO: WORKER AGENT LIBRARY ROOT (V1.0 - CASCADE)
 * CLASIFICACIÓN: ESTRATO L1-WORKER
 * RESPONSABILIDAD: EXPOSICIÓN NOMINAL DEL MOTOR DE DESPACHO
 * =================================================================
 */

pub mod engine;

pub mod prelude {
    pub use crate::engine::DispatchEngine;
}

pub use engine::DispatchEngine;
