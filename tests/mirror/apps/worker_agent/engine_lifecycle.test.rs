// [tests/mirror/apps/worker_agent/engine_lifecycle.test.rs]
/*!
 * =================================================================
 * APARATO: DISPATCH ENGINE LIFECYCLE TEST
 * OBJETIVO: Certificar el contrato del ejecutor por defecto y el
 *           builder de sustitución de `DispatchEngine`.
 * =================================================================
 */

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use cascade_domain_models::{ExternalJobExecutor, NullJobExecutor};
use cascade_infra_worker_client::WorkerClient;
use cascade_worker_agent_lib::engine::DispatchEngine;

#[tokio::test]
async fn null_job_executor_reports_completed_with_zero_articles() {
    let executor = NullJobExecutor;
    let feed_ids = vec!["feed-alpha".to_string(), "feed-beta".to_string()];

    let (articles, results) = executor.execute(&feed_ids, None, None).await.unwrap();

    assert!(articles.is_empty(), "stub executor must not synthesize articles");
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|result| result.status == "completed"));
    assert!(results.iter().all(|result| result.new_article_count == 0));
}

#[test]
fn engine_accepts_a_substituted_job_executor() {
    struct AlwaysFailingExecutor;

    #[async_trait::async_trait]
    impl ExternalJobExecutor for AlwaysFailingExecutor {
        async fn execute(
            &self,
            _feed_ids: &[String],
            _headers: Option<&str>,
            _cookies: Option<&str>,
        ) -> Result<(Vec<cascade_domain_models::Article>, Vec<cascade_domain_models::FeedResult>), String> {
            Err("upstream scraper unreachable".to_string())
        }
    }

    let uplink = Arc::new(WorkerClient::new(
        "http://localhost:0".to_string(),
        "CNtest".to_string(),
        "CStest".to_string(),
    ));
    let operational_signal = Arc::new(AtomicBool::new(true));

    let _engine = DispatchEngine::new(uplink, operational_signal, "test-node".to_string())
        .with_job_executor(Arc::new(AlwaysFailingExecutor));
}
