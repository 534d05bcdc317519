// Client configuration and factory

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::AuthState;
use crate::error::Result;
use crate::http::HttpChatApi;
use crate::traits::ChatApi;

const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

/// Connection settings for the conversation API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_user_agent() -> String {
    concat!("medchat/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Factory for creating API clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    pub fn create_api(config: &ClientConfig, auth: AuthState) -> Result<Arc<dyn ChatApi>> {
        let client = HttpChatApi::new(config, auth)?;
        Ok(Arc::new(client))
    }
}
