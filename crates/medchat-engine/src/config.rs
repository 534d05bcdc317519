use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::format::{is_valid_format, DEFAULT_DATE_FORMAT, DEFAULT_TIME_FORMAT};

/// Tunables of the chat engine; every field has a default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Title requested when a new session is created
    pub default_session_title: String,
    pub history_page_size: u32,
    /// Character budget of a history preview before the ellipsis
    pub preview_chars: usize,
    /// Distance from the bottom edge that triggers the next history page
    pub load_more_threshold: f64,
    pub autoscroll_delay_ms: u64,
    /// Capacity of the event channel
    pub event_buffer: usize,
    pub time_format: String,
    pub date_format: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_session_title: "New Chat".to_string(),
            history_page_size: 10,
            preview_chars: 60,
            load_more_threshold: 100.0,
            autoscroll_delay_ms: 100,
            event_buffer: 256,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session_title(mut self, title: impl Into<String>) -> Self {
        self.default_session_title = title.into();
        self
    }

    pub fn with_page_size(mut self, size: u32) -> Self {
        self.history_page_size = size;
        self
    }

    pub fn with_preview_chars(mut self, chars: usize) -> Self {
        self.preview_chars = chars;
        self
    }

    pub fn with_autoscroll_delay(mut self, delay: Duration) -> Self {
        self.autoscroll_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn autoscroll_delay(&self) -> Duration {
        Duration::from_millis(self.autoscroll_delay_ms)
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.history_page_size == 0 {
            return Err("history_page_size must be at least 1".to_string());
        }
        if self.preview_chars == 0 {
            return Err("preview_chars must be at least 1".to_string());
        }
        if self.event_buffer == 0 {
            return Err("event_buffer must be at least 1".to_string());
        }
        if !is_valid_format(&self.time_format) {
            return Err(format!("time_format {:?} is not a valid strftime pattern", self.time_format));
        }
        if !is_valid_format(&self.date_format) {
            return Err(format!("date_format {:?} is not a valid strftime pattern", self.date_format));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"history_page_size": 20}"#).unwrap();
        assert_eq!(config.history_page_size, 20);
        assert_eq!(config.preview_chars, 60);
        assert_eq!(config.autoscroll_delay(), Duration::from_millis(100));
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let config = EngineConfig::new().with_page_size(0);
        assert!(config.validate().is_err());
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_bad_time_formats_are_rejected() {
        let config = EngineConfig {
            date_format: "%Q".to_string(),
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().contains("date_format"));

        let config = EngineConfig {
            time_format: "%H:%".to_string(),
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().contains("time_format"));
    }
}
