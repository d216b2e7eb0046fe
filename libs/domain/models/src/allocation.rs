// [libs/domain/models/src/allocation.rs]
/*!
 * =================================================================
 * APARATO: ALLOCATION DOMAIN MODELS (V1.0 - DISPATCH LEDGER)
 * CLASIFICACIÓN: DOMAIN ENTITIES (ESTRATO L2)
 * RESPONSABILIDAD: REPRESENTACIÓN DEL OBJETO CENTRAL DEL DESPACHO
 *
 * Una Allocation es la unidad de claim, ejecución y finalización. Su
 * máquina de estados es monótona; ver `AllocationStatus::allowed_next`.
 * =================================================================
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::article::FeedResult;
use crate::task::Task;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStatus {
    Pending,
    Claimed,
    Executing,
    Completed,
    Failed,
    Timeout,
}

impl AllocationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationStatus::Pending => "pending",
            AllocationStatus::Claimed => "claimed",
            AllocationStatus::Executing => "executing",
            AllocationStatus::Completed => "completed",
            AllocationStatus::Failed => "failed",
            AllocationStatus::Timeout => "timeout",
        }
    }

    pub fn from_str_opt(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(AllocationStatus::Pending),
            "claimed" => Some(AllocationStatus::Claimed),
            "executing" => Some(AllocationStatus::Executing),
            "completed" => Some(AllocationStatus::Completed),
            "failed" => Some(AllocationStatus::Failed),
            "timeout" => Some(AllocationStatus::Timeout),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AllocationStatus::Completed | AllocationStatus::Failed | AllocationStatus::Timeout
        )
    }

    /// Enforces the monotonic state machine of `SPEC_FULL.md` §3/§4.7.
    /// Timeout is reachable from any non-terminal state via the Reclaimer
    /// only, never via a worker-submitted status update.
    pub fn can_transition_to(&self, next: AllocationStatus) -> bool {
        use AllocationStatus::*;
        matches!(
            (self, next),
            (Pending, Claimed)
                | (Claimed, Executing)
                | (Executing, Completed)
                | (Executing, Failed)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Allocation {
    pub id: String,
    pub task_id: String,
    pub task_name_snapshot: String,
    pub cron_snapshot: String,
    pub node_id: Option<String>,
    pub feed_ids: Vec<String>,
    pub status: AllocationStatus,
    pub result_summary: Option<serde_json::Value>,
    pub error_message: Option<String>,
    pub dispatched_at: DateTime<Utc>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub schedule_run_id: String,
    pub article_count: u32,
    pub new_article_count: u32,
}

/// The JSON bundle a worker receives from `claim-task`, assembled by
/// enriching a freshly claimed allocation with its task definition and
/// feed snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskPackage {
    pub allocation_id: String,
    pub task_id: String,
    pub task_name: String,
    pub web_hook_url: Option<String>,
    pub cron_exp: String,
    pub headers: Option<String>,
    pub cookies: Option<String>,
    pub feeds: Vec<FeedSnapshot>,
    pub dispatched_at: DateTime<Utc>,
}

impl TaskPackage {
    pub fn assemble(allocation: &Allocation, task: &Task, feeds: Vec<FeedSnapshot>) -> Self {
        Self {
            allocation_id: allocation.id.clone(),
            task_id: task.id.clone(),
            task_name: task.name.clone(),
            web_hook_url: task.webhook_url.clone(),
            cron_exp: task.cron_expression.clone(),
            headers: task.headers.clone(),
            cookies: task.cookies.clone(),
            feeds,
            dispatched_at: allocation.dispatched_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSnapshot {
    pub id: String,
    pub faker_id: Option<String>,
    pub mp_name: Option<String>,
    pub mp_cover: Option<String>,
    pub mp_intro: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskStatusPayload {
    pub allocation_id: String,
    pub status: AllocationStatus,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UploadArticlesPayload {
    pub allocation_id: String,
    pub articles: Vec<crate::article::Article>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportCompletionPayload {
    pub allocation_id: String,
    pub task_id: String,
    pub results: Vec<FeedResult>,
    pub article_count: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct AllocationFilters {
    pub task_id: Option<String>,
    pub node_id: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct AllocationStats {
    pub pending: u64,
    pub in_flight: u64,
    pub completed_today: u64,
    pub failed_today: u64,
    pub online_nodes: u64,
}
