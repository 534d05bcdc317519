use medchat_client::{AuthState, ChatApi, ClientConfig, ClientFactory};
use medchat_types::ChatEvent;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::config::EngineConfig;
use crate::engine::ChatEngine;
use crate::error::{EngineError, Result};
use crate::events::{EventSender, EventSink};
use crate::history::HistoryPaginator;
use crate::resume::{NoopResumer, SessionResumer};
use crate::session::ChatSession;

/// Builder for a [`ChatEngine`]
///
/// The credential is injected here; the engine never reads ambient state.
pub struct ChatEngineBuilder {
    api: Option<Arc<dyn ChatApi>>,
    client_config: Option<ClientConfig>,
    auth: AuthState,
    config: EngineConfig,
    events: Option<EventSender>,
    resumer: Option<Arc<dyn SessionResumer>>,
}

impl ChatEngineBuilder {
    pub fn new() -> Self {
        Self {
            api: None,
            client_config: None,
            auth: AuthState::Unauthenticated,
            config: EngineConfig::default(),
            events: None,
            resumer: None,
        }
    }

    /// Use an existing API implementation
    pub fn api(mut self, api: Arc<dyn ChatApi>) -> Self {
        self.api = Some(api);
        self
    }

    /// Build an HTTP client from this config (ignored when `api` is set)
    pub fn client_config(mut self, config: ClientConfig) -> Self {
        self.client_config = Some(config);
        self
    }

    pub fn auth(mut self, auth: AuthState) -> Self {
        self.auth = auth;
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn events(mut self, tx: EventSender) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn resumer(mut self, resumer: Arc<dyn SessionResumer>) -> Self {
        self.resumer = Some(resumer);
        self
    }

    /// Build with a fresh event channel sized by `event_buffer`
    pub fn build_with_events(mut self) -> Result<(ChatEngine, mpsc::Receiver<ChatEvent>)> {
        let (tx, rx) = mpsc::channel(self.config.event_buffer.max(1));
        self.events = Some(tx);
        Ok((self.build()?, rx))
    }

    pub fn build(self) -> Result<ChatEngine> {
        self.config.validate().map_err(EngineError::Config)?;

        let api = match (self.api, self.client_config) {
            (Some(api), _) => api,
            (None, Some(client_config)) => ClientFactory::create_api(&client_config, self.auth.clone())?,
            (None, None) => {
                return Err(EngineError::Config(
                    "either api or client_config is required".to_string(),
                ))
            }
        };

        let events = self.events.map_or_else(EventSink::disabled, EventSink::new);
        let resumer = self.resumer.unwrap_or_else(|| Arc::new(NoopResumer));

        let session = Arc::new(ChatSession::new(
            Arc::clone(&api),
            self.auth.clone(),
            self.config.clone(),
            events.clone(),
        ));
        let history = Arc::new(HistoryPaginator::new(api, self.auth, self.config.clone(), events));

        Ok(ChatEngine::new(session, history, resumer, self.config))
    }
}

impl Default for ChatEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
