// [libs/infra/worker-client/src/client.rs]
/*!
 * =================================================================
 * APARATO: WORKER UPLINK CLIENT (V1.0 - CASCADE)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: COMUNICACIÓN HTTP DEL WORKER CON EL GATEWAY
 *
 * Cada método traduce una llamada al contrato de `/cascade/*` y
 * desempaqueta el `Envelope` uniforme. Un `code != 0` en una respuesta
 * `200 OK` se traduce en `ClientError::GatewayRejection`.
 * =================================================================
 */

use crate::errors::ClientError;
use cascade_domain_models::{
    AllocationStatus, Article, Envelope, FeedResult, TaskPackage,
};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::json;
use tracing::{info, instrument, warn};

pub struct WorkerClient {
    network_session_client: Client,
    gateway_base_endpoint: String,
}

impl WorkerClient {
    /// Inicializa el cliente con el encabezado `Authorization: AK-SK
    /// <access_key>:<secret>` fijo para toda la sesión.
    pub fn new(base_url: String, access_key: String, secret: String) -> Self {
        let mut header_map = reqwest::header::HeaderMap::new();
        let auth_value = reqwest::header::HeaderValue::from_str(&format!("AK-SK {}:{}", access_key, secret))
            .expect("CRITICAL: Invalid credential format for Authorization header.");
        header_map.insert(reqwest::header::AUTHORIZATION, auth_value);

        Self {
            network_session_client: Client::builder()
                .default_headers(header_map)
                .user_agent("Cascade-Worker-Agent/1.0")
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .expect("FATAL: HTTP client initialization failed."),
            gateway_base_endpoint: base_url.trim_end_matches('/').to_string(),
        }
    }

    #[instrument(skip(self))]
    pub async fn heartbeat(&self) -> Result<(), ClientError> {
        self.post_envelope::<(), ()>("/cascade/heartbeat", &()).await?;
        Ok(())
    }

    /// `POST /cascade/claim-task` — `None` cuando no hay trabajo elegible.
    #[instrument(skip(self))]
    pub async fn claim_task(&self) -> Result<Option<TaskPackage>, ClientError> {
        let envelope: Envelope<TaskPackage> = self.post_envelope("/cascade/claim-task", &()).await?;
        Ok(envelope.data)
    }

    #[instrument(skip(self))]
    pub async fn report_task_status(
        &self,
        allocation_id: &str,
        status: AllocationStatus,
        error_message: Option<&str>,
    ) -> Result<(), ClientError> {
        let payload = json!({
            "allocation_id": allocation_id,
            "status": status,
            "error_message": error_message,
        });
        self.put_envelope::<_, ()>("/cascade/task-status", &payload).await?;
        Ok(())
    }

    #[instrument(skip(self, articles))]
    pub async fn upload_articles(&self, allocation_id: &str, articles: &[Article]) -> Result<(), ClientError> {
        let payload = json!({ "allocation_id": allocation_id, "articles": articles });
        self.post_envelope::<_, serde_json::Value>("/cascade/upload-articles", &payload).await?;
        Ok(())
    }

    #[instrument(skip(self, results))]
    pub async fn report_completion(
        &self,
        allocation_id: &str,
        task_id: &str,
        results: &[FeedResult],
        article_count: u32,
    ) -> Result<(), ClientError> {
        let payload = json!({
            "allocation_id": allocation_id,
            "task_id": task_id,
            "results": results,
            "article_count": article_count,
        });
        self.post_envelope::<_, ()>("/cascade/report-completion", &payload).await?;
        Ok(())
    }

    async fn post_envelope<P: Serialize + ?Sized, D: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        payload: &P,
    ) -> Result<Envelope<D>, ClientError> {
        let target_url = format!("{}{}", self.gateway_base_endpoint, path);
        let response = self.network_session_client.post(&target_url).json(payload).send().await?;
        Self::unwrap_envelope(response).await
    }

    async fn put_envelope<P: Serialize + ?Sized, D: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        payload: &P,
    ) -> Result<Envelope<D>, ClientError> {
        let target_url = format!("{}{}", self.gateway_base_endpoint, path);
        let response = self.network_session_client.put(&target_url).json(payload).send().await?;
        Self::unwrap_envelope(response).await
    }

    async fn unwrap_envelope<D: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<Envelope<D>, ClientError> {
        if response.status() == StatusCode::UNAUTHORIZED {
            warn!("🚫 [UPLINK]: Gateway rejected credentials.");
            return Err(ClientError::Unauthorized);
        }

        let envelope: Envelope<D> = response.json().await?;
        if envelope.code != 0 {
            return Err(ClientError::GatewayRejection {
                code: envelope.code,
                message: envelope.message,
            });
        }

        info!("📡 [UPLINK]: Gateway accepted request.");
        Ok(envelope)
    }
}
