// [libs/infra/store/src/repositories/mod.rs]
/*!
 * =================================================================
 * APARATO: REPOSITORY ACCESS MATRIX (V1.0 - CASCADE TOPOLOGY)
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L3)
 * RESPONSABILIDAD: ORQUESTACIÓN DE SUBSISTEMAS DE PERSISTENCIA
 *
 * # Mathematical Proof (Modular Encapsulation):
 * El barrel file actúa como una interfaz galvánica. Los sub-módulos
 * permanecen aislados, y solo las estructuras de autoridad (Repositories)
 * son expuestas al exterior, reduciendo el acoplamiento sistémico.
 * =================================================================
 */

/// Reclamación atómica de allocations y ciclo de vida de despacho.
pub mod allocation;
/// Registro de nodos y emisión/verificación de credenciales AK/SK.
pub mod node;
/// Auditoría de corridas finalizadas.
pub mod sync_log;
/// Definiciones de tareas programables.
pub mod task;

pub use allocation::AllocationRepository;
pub use node::NodeRepository;
pub use sync_log::SyncLogRepository;
pub use task::TaskRepository;
