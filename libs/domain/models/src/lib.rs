
pub mod allocation;
pub mod article;
pub mod envelope;
pub mod node;
pub mod sync_log;
pub mod task;

pub use allocation::{
    Allocation, AllocationFilters, AllocationStats, AllocationStatus, FeedSnapshot,
    ReportCompletionPayload, TaskPackage, TaskStatusPayload, UploadArticlesPayload,
};
pub use article::{Article, ExternalJobExecutor, FeedResult, NullJobExecutor};
pub use envelope::Envelope;
pub use node::{
    IssuedCredentials, Node, NodeKind, RegisterNodePayload, ReportedStatus, SyncConfig,
    UpdateNodePayload,
};
pub use sync_log::{FeedStatus, SyncLog, SyncType};
pub use task::{CreateTaskPayload, Task};
