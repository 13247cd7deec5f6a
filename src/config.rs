//! Configuration management for Editor Session
//!
//! Holds the tunables of a session: assistant reply latency and content,
//! and defaults for newly opened documents. The library never reads files
//! or the environment on its own; callers hand over a JSON string or use
//! the defaults.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Application name for logging and help output
pub const APP_NAME: &str = "editor-session";

/// Default lower bound of the simulated assistant latency
pub const DEFAULT_MIN_REPLY_DELAY_MS: u64 = 1000;

/// Default upper bound of the simulated assistant latency
pub const DEFAULT_MAX_REPLY_DELAY_MS: u64 = 3000;

/// Default indentation width
pub const DEFAULT_TAB_SIZE: usize = 2;

/// Greeting shown in a fresh conversation
pub const DEFAULT_GREETING: &str = "Hello! I'm your coding assistant. I can help you write, debug, and improve your code. What would you like to work on today?";

/// Session configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Assistant panel configuration
    pub assistant: AssistantConfig,

    /// Editor configuration
    pub editor: EditorConfig,
}

impl SessionConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> ConfigResult<()> {
        self.assistant.validate()?;
        self.editor.validate()
    }
}

/// Assistant-specific configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Shortest simulated reply latency in milliseconds
    pub min_delay_ms: u64,

    /// Longest simulated reply latency in milliseconds
    pub max_delay_ms: u64,

    /// Canned replies picked at random
    pub replies: Vec<String>,

    /// Optional greeting seeded into a fresh conversation
    pub greeting: Option<String>,

    /// Fixed RNG seed for reproducible latency and reply choice
    pub seed: Option<u64>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: DEFAULT_MIN_REPLY_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_REPLY_DELAY_MS,
            replies: default_replies(),
            greeting: Some(DEFAULT_GREETING.to_string()),
            seed: None,
        }
    }
}

impl AssistantConfig {
    /// Lower latency bound as a duration
    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay_ms)
    }

    /// Upper latency bound as a duration
    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.max_delay_ms == 0 || self.min_delay_ms > self.max_delay_ms {
            return Err(ConfigError::InvalidDelay {
                min_ms: self.min_delay_ms,
                max_ms: self.max_delay_ms,
            });
        }
        if self.replies.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "assistant.replies".to_string(),
                reason: "at least one canned reply is required".to_string(),
            });
        }
        Ok(())
    }
}

/// Defaults for documents opened in a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Language tag given to new documents
    pub default_language: String,

    /// Name prefix for new documents, followed by a counter
    pub untitled_prefix: String,

    /// Indentation width shown in the status bar
    pub tab_size: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_language: "typescript".to_string(),
            untitled_prefix: "Untitled".to_string(),
            tab_size: DEFAULT_TAB_SIZE,
        }
    }
}

impl EditorConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.untitled_prefix.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "editor.untitled_prefix".to_string(),
                reason: "must not be blank".to_string(),
            });
        }
        if self.tab_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "editor.tab_size".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn default_replies() -> Vec<String> {
    [
        "I'd be happy to help you with that! Let me analyze your code and provide some suggestions.",
        "That's a great question! Here's how I would approach this problem:",
        "I can see what you're trying to achieve. Let me help you implement this feature.",
        "This looks like a common pattern. I'll show you the best practices for handling this.",
        "I notice a few areas where we can optimize this code. Let me walk you through the improvements.",
        "Here's a clean and efficient solution for your use case:",
        "That's an interesting challenge! Let me break this down step by step for you.",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.assistant.min_delay(), Duration::from_secs(1));
        assert_eq!(config.assistant.max_delay(), Duration::from_secs(3));
        assert_eq!(config.assistant.replies.len(), 7);
        assert_eq!(config.editor.default_language, "typescript");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config =
            SessionConfig::from_json_str(r#"{ "assistant": { "seed": 7 } }"#).unwrap();
        assert_eq!(config.assistant.seed, Some(7));
        assert_eq!(config.assistant.min_delay_ms, DEFAULT_MIN_REPLY_DELAY_MS);
        assert_eq!(config.editor.untitled_prefix, "Untitled");
    }

    #[test]
    fn test_inverted_delay_rejected() {
        let err = SessionConfig::from_json_str(
            r#"{ "assistant": { "min_delay_ms": 5000, "max_delay_ms": 100 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDelay { .. }));
    }

    #[test]
    fn test_empty_replies_rejected() {
        let err = SessionConfig::from_json_str(r#"{ "assistant": { "replies": [] } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = SessionConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_zero_tab_size_rejected() {
        let config = SessionConfig::from_json_str(r#"{ "editor": { "tab_size": 4 } }"#).unwrap();
        assert_eq!(config.editor.tab_size, 4);

        let err = SessionConfig::from_json_str(r#"{ "editor": { "tab_size": 0 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
