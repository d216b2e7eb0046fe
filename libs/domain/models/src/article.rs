// [libs/domain/models/src/article.rs]
/*!
 * =================================================================
 * APARATO: ARTICLE & EXECUTION CONTRACT MODELS (V1.0)
 * CLASIFICACIÓN: DOMAIN ENTITIES (ESTRATO L2)
 * RESPONSABILIDAD: FORMA DE LOS ARTEFACTOS QUE UN WORKER SUBE Y
 *                  EL CONTRATO CON EL EJECUTOR EXTERNO DE TAREAS
 * =================================================================
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub feed_id: String,
    pub title: String,
    pub url: String,
    pub publish_time: Option<String>,
    pub digest: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResult {
    pub feed_id: String,
    pub article_count: u32,
    pub new_article_count: u32,
    pub status: String,
    pub error_message: Option<String>,
}

/// The boundary between the dispatch system and whatever actually does
/// the scraping/fetching work for a feed. The worker agent depends on
/// this trait, not on a concrete implementation; production deployments
/// wire in a real executor, tests and the stub binary use
/// `NullJobExecutor`.
#[async_trait]
pub trait ExternalJobExecutor: Send + Sync {
    /// Returns the raw articles discovered across all requested feeds
    /// alongside a per-feed summary. The dispatcher forwards both
    /// verbatim; it does not interpret either.
    async fn execute(
        &self,
        feed_ids: &[String],
        headers: Option<&str>,
        cookies: Option<&str>,
    ) -> Result<(Vec<Article>, Vec<FeedResult>), String>;
}

/// Deterministic stand-in used where no real scraping backend is wired
/// up. Reports each feed as completed with zero articles.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullJobExecutor;

#[async_trait]
impl ExternalJobExecutor for NullJobExecutor {
    async fn execute(
        &self,
        feed_ids: &[String],
        _headers: Option<&str>,
        _cookies: Option<&str>,
    ) -> Result<(Vec<Article>, Vec<FeedResult>), String> {
        let results = feed_ids
            .iter()
            .map(|feed_id| FeedResult {
                feed_id: feed_id.clone(),
                article_count: 0,
                new_article_count: 0,
                status: "completed".to_string(),
                error_message: None,
            })
            .collect();
        Ok((Vec::new(), results))
    }
}
