//! Configuration types for the roleplay chat.
//!
//! This module provides CLI argument parsing via `arrrg` and the resolved
//! configuration the binary builds its client and catalog from.

use std::path::PathBuf;
use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::catalog::Catalog;
use crate::client::HttpChatClient;
use crate::error::Result;

/// Command-line arguments for the roleplay-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Chat endpoint URL.
    #[arrrg(optional, "Chat endpoint (default: $ROLEPLAY_CHAT_URL or localhost)", "URL")]
    pub endpoint: Option<String>,

    /// YAML file replacing the built-in catalog.
    #[arrrg(optional, "YAML catalog of topics and subtopics", "FILE")]
    pub catalog: Option<String>,

    /// Per-request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 60)", "SECS")]
    pub timeout_secs: Option<u64>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// Log request lifecycle at debug level.
    #[arrrg(flag, "Enable debug logging on stderr")]
    pub verbose: bool,
}

/// Configuration for a roleplay session.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Explicit endpoint; `None` defers to the environment, then the default.
    pub endpoint: Option<String>,

    /// Catalog file; `None` uses the built-in catalog.
    pub catalog_path: Option<PathBuf>,

    /// Per-request timeout; `None` uses the client default.
    pub timeout: Option<Duration>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Whether to log at debug level.
    pub verbose: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    pub fn new() -> Self {
        Self {
            endpoint: None,
            catalog_path: None,
            timeout: None,
            use_color: true,
            verbose: false,
        }
    }

    /// Sets the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the catalog file.
    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Loads the configured catalog.
    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog_path {
            Some(path) => Catalog::load(path),
            None => Ok(Catalog::builtin()),
        }
    }

    /// Builds the HTTP client for the configured endpoint.
    pub fn build_client(&self) -> Result<HttpChatClient> {
        HttpChatClient::with_options(self.endpoint.clone(), self.timeout)
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        ChatConfig {
            endpoint: args.endpoint,
            catalog_path: args.catalog.map(PathBuf::from),
            timeout: args.timeout_secs.map(Duration::from_secs),
            use_color: !args.no_color,
            verbose: args.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert!(config.endpoint.is_none());
        assert!(config.catalog_path.is_none());
        assert!(config.timeout.is_none());
        assert!(config.use_color);
        assert!(!config.verbose);
        assert_eq!(config.load_catalog().unwrap(), Catalog::builtin());
    }

    #[test]
    fn config_from_args_defaults() {
        let config = ChatConfig::from(ChatArgs::default());
        assert!(config.endpoint.is_none());
        assert!(config.use_color);
        assert!(config.timeout.is_none());
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            endpoint: Some("http://10.0.0.2:8080/api/chat".to_string()),
            catalog: Some("scenarios.yaml".to_string()),
            timeout_secs: Some(15),
            no_color: true,
            verbose: true,
        };
        let config = ChatConfig::from(args);
        assert_eq!(
            config.endpoint.as_deref(),
            Some("http://10.0.0.2:8080/api/chat")
        );
        assert_eq!(config.catalog_path, Some(PathBuf::from("scenarios.yaml")));
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
        assert!(!config.use_color);
        assert!(config.verbose);
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_endpoint("https://chat.example.com/api/chat")
            .with_timeout(Duration::from_secs(3))
            .without_color();
        let client = config.build_client().unwrap();
        assert_eq!(client.endpoint().as_str(), "https://chat.example.com/api/chat");
        assert_eq!(client.timeout(), Duration::from_secs(3));
        assert!(!config.use_color);
    }

    #[test]
    fn missing_catalog_file_is_an_error() {
        let config = ChatConfig::new().with_catalog_path("/nonexistent/catalog.yaml");
        assert!(config.load_catalog().is_err());
    }
}
