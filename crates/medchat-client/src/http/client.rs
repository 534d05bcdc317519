// HTTP implementation of the conversation API

use async_trait::async_trait;
use medchat_types::{HistoryPage, Session};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::wire::{
    CreateSessionBody, CreateSessionResponse, HistoryResponse, SendMessageBody,
    SendMessageResponse,
};
use crate::auth::{AuthState, Credential};
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::traits::{AssistantReply, ChatApi, CreateSessionRequest, HistoryQuery, SendMessageRequest};

const IDEMPOTENCY_KEY: &str = "Idempotency-Key";

/// Conversation API client (reqwest, bearer auth)
#[derive(Debug)]
pub struct HttpChatApi {
    http_client: reqwest::Client,
    base_url: String,
    auth: AuthState,
}

impl HttpChatApi {
    pub fn new(config: &ClientConfig, auth: AuthState) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(ApiError::InvalidConfig("base_url must not be empty".to_string()));
        }
        if config.timeout_ms == 0 {
            return Err(ApiError::InvalidConfig("timeout_ms must be at least 1".to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| ApiError::InvalidConfig("user_agent is not a valid header".to_string()))?;
        headers.insert(USER_AGENT, user_agent);

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Checked before every request is built
    fn credential(&self) -> Result<&Credential> {
        self.auth.credential().ok_or(ApiError::Unauthenticated)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map non-success statuses to `ApiError::Status`, then decode the body
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "API request rejected");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn create_session(&self, request: CreateSessionRequest) -> Result<Session> {
        let credential = self.credential()?;

        let response = self
            .http_client
            .post(self.url("/chat/session"))
            .bearer_auth(credential.token())
            .json(&CreateSessionBody { title: &request.title })
            .send()
            .await?;

        let raw: CreateSessionResponse = Self::decode(response).await?;
        Ok(raw.chat_session.into())
    }

    async fn send_message(&self, request: SendMessageRequest) -> Result<AssistantReply> {
        let credential = self.credential()?;

        let body = SendMessageBody {
            session_id: request.session_id.as_str(),
            message: &request.message,
            kind: request.kind,
        };

        let mut builder = self
            .http_client
            .post(self.url("/chat/message"))
            .bearer_auth(credential.token())
            .json(&body);

        if let Some(key) = &request.idempotency_key {
            builder = builder.header(IDEMPOTENCY_KEY, key);
        }

        let response = builder.send().await?;
        let raw: SendMessageResponse = Self::decode(response).await?;
        Ok(raw.ai_message.into())
    }

    async fn list_history(&self, query: HistoryQuery) -> Result<HistoryPage> {
        let credential = self.credential()?;

        let response = self
            .http_client
            .get(self.url("/chat/history"))
            .bearer_auth(credential.token())
            .query(&[("limit", query.limit.to_string()), ("offset", query.offset.to_string())])
            .send()
            .await?;

        let raw: HistoryResponse = Self::decode(response).await?;
        Ok(raw.into())
    }
}
