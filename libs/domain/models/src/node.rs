// [libs/domain/models/src/node.rs]
/*!
 * =================================================================
 * APARATO: NODE DOMAIN MODELS (V1.0 - REGISTRY STRATA)
 * CLASIFICACIÓN: DOMAIN ENTITIES (ESTRATO L2)
 * RESPONSABILIDAD: REPRESENTACIÓN DE PARTICIPANTES DEL CASCADE
 *
 * Un nodo es el coordinador o uno de sus workers directos. El coordinador
 * existe en singular; todo lo demás es un worker que se autentica con un
 * par AK/SK y reporta latido de vida.
 * =================================================================
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Coordinator,
    Worker,
}

/// Estado reportado por el propio nodo en su último latido.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[repr(u8)]
pub enum ReportedStatus {
    Offline = 0,
    Online = 1,
    Disabled = 2,
}

/// Cuota de despacho por nodo, validada contra un esquema cerrado.
///
/// Se rechazan claves desconocidas en el wire DTO (`deny_unknown_fields`)
/// antes de normalizar al tipo interno.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SyncConfig {
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u16,
    #[serde(default)]
    pub feed_quota: std::collections::HashMap<String, u16>,
}

fn default_max_capacity() -> u16 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub display_name: String,
    pub api_url: Option<String>,
    pub access_key: String,
    /// Never populated from storage reads; present only on the DTO path
    /// that issues fresh credentials.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_hash: Option<String>,
    pub reported_status: u8,
    pub active: bool,
    pub last_heartbeat_at: Option<DateTime<Utc>>,
    pub sync_config: SyncConfig,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Node {
    /// Grounded in `jobs/cascade_task_dispatcher.py`'s `NodeStatus.is_online`:
    /// active AND reported_status == online AND heartbeat age within window.
    pub fn classify(&self, now: DateTime<Utc>, heartbeat_window: chrono::Duration) -> bool {
        if !self.active || self.reported_status != ReportedStatus::Online as u8 {
            return false;
        }
        match self.last_heartbeat_at {
            Some(last) => now - last <= heartbeat_window,
            None => false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterNodePayload {
    pub kind: NodeKind,
    pub display_name: String,
    pub api_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateNodePayload {
    pub display_name: Option<String>,
    pub api_url: Option<String>,
    pub active: Option<bool>,
    pub sync_config: Option<SyncConfig>,
}

/// Returned exactly once by the credential-issuance endpoint.
#[derive(Debug, Serialize)]
pub struct IssuedCredentials {
    pub access_key: String,
    pub secret: String,
}
