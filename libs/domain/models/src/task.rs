// [libs/domain/models/src/task.rs]
/*!
 * =================================================================
 * APARATO: TASK DOMAIN MODELS (V1.0 - SCHEDULABLE DEFINITIONS)
 * CLASIFICACIÓN: DOMAIN ENTITIES (ESTRATO L2)
 * RESPONSABILIDAD: DEFINICIÓN ADMINISTRATIVA DE TRABAJOS PROGRAMABLES
 * =================================================================
 */

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub cron_expression: String,
    pub feed_ids: Vec<String>,
    pub enabled: bool,
    pub webhook_url: Option<String>,
    pub headers: Option<String>,
    pub cookies: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTaskPayload {
    pub name: String,
    pub cron_expression: String,
    pub feed_ids: Vec<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub webhook_url: Option<String>,
    pub headers: Option<String>,
    pub cookies: Option<String>,
}

fn default_enabled() -> bool {
    true
}
