//! ChatTransport trait implementation for OpenAiClient.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{FailureKind, TransportFailure};
use crate::{ChatCompletion, ChatRequest, ChatTransport};

use super::client::OpenAiClient;

/// Fixed deadline for the availability probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[async_trait]
impl ChatTransport for OpenAiClient {
    async fn send_chat(
        &self,
        request: ChatRequest,
        deadline: Duration,
    ) -> Result<ChatCompletion, TransportFailure> {
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            deadline_ms = deadline.as_millis() as u64,
            "chat completion request"
        );

        let response = self
            .http
            .post(self.chat_url())
            .bearer_auth(&self.config.api_key)
            .timeout(deadline)
            .json(&request)
            .send()
            .await
            .map_err(TransportFailure::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportFailure::from_status(status.as_u16(), &body));
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            TransportFailure::new(
                FailureKind::Validation,
                format!("malformed response body: {e}"),
            )
        })?;

        Ok(self.parse_response(json))
    }

    async fn is_available(&self) -> bool {
        let result = self
            .http
            .get(self.models_url())
            .bearer_auth(&self.config.api_key)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("availability probe failed: {e}");
                false
            }
        }
    }
}
