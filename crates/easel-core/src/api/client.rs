use serde::Serialize;
use url::Url;

use crate::api::error::ApiError;
use crate::session::message::Message;
use crate::session::types::{SessionId, ToolCallId};

/// Body of a tool-confirmation decision.
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmationRequest {
    pub session_id: SessionId,
    pub tool_call_id: ToolCallId,
    pub confirmed: bool,
}

/// Thin client for the agent backend's session endpoints.
#[derive(Debug, Clone)]
pub struct AgentApi {
    http: reqwest::Client,
    base_url: Url,
}

impl AgentApi {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    /// Authoritative message list for a session, used at session open
    /// and on explicit resynchronization.
    pub async fn fetch_session(&self, session_id: &SessionId) -> Result<Vec<Message>, ApiError> {
        let url = self.endpoint(&format!("api/chat_session/{session_id}"))?;
        let messages = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(messages)
    }

    /// Submit an approve/decline decision for a gated tool call. The
    /// backend answers through the event stream, not this response.
    pub async fn submit_tool_confirmation(
        &self,
        request: &ConfirmationRequest,
    ) -> Result<(), ApiError> {
        let url = self.endpoint("api/tool_confirmation")?;
        self.http
            .post(url)
            .json(request)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Ask the backend to stop generating for this session. Best effort;
    /// the local pending indicator is cleared optimistically.
    pub async fn cancel_session(&self, session_id: &SessionId) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("api/cancel/{session_id}"))?;
        self.http.post(url).send().await?.error_for_status()?;
        Ok(())
    }
}
