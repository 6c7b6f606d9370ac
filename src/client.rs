use std::env;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, header};
use url::Url;

use crate::error::{Error, Result};
use crate::observability::{CHAT_REQUEST_DURATION, CHAT_REQUEST_ERRORS, CHAT_REQUESTS};
use crate::types::{ChatReply, ChatRequest};

/// Endpoint used when neither a flag nor the environment provides one.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/api/chat";

/// Environment variable consulted for the endpoint.
pub const ENDPOINT_ENV_VAR: &str = "ROLEPLAY_CHAT_URL";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Something that can answer a chat request.
///
/// The session only talks to the backend through this trait, so tests can
/// script replies and failures without a server.
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    /// Sends one request and waits for the reply.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply>;
}

/// Client for the roleplay chat endpoint.
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    client: ReqwestClient,
    endpoint: Url,
    timeout: Duration,
}

impl HttpChatClient {
    /// Create a new chat client.
    ///
    /// The endpoint can be provided directly or read from the
    /// `ROLEPLAY_CHAT_URL` environment variable, falling back to the local
    /// development server.
    pub fn new(endpoint: Option<String>) -> Result<Self> {
        Self::with_options(endpoint, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(endpoint: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let endpoint = parse_endpoint(&resolve_endpoint(endpoint, env::var(ENDPOINT_ENV_VAR).ok()))?;
        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .default_headers(default_headers())
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    /// The URL requests are POSTed to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// POST a request and parse the `reply` out of the response.
    pub async fn send(&self, request: &ChatRequest) -> Result<ChatReply> {
        CHAT_REQUESTS.click();
        let started = Instant::now();
        let result = self.send_inner(request).await;
        CHAT_REQUEST_DURATION.add(started.elapsed().as_secs_f64());
        if let Err(err) = &result {
            CHAT_REQUEST_ERRORS.click();
            tracing::debug!(endpoint = %self.endpoint, error = %err, "chat request failed");
        }
        result
    }

    async fn send_inner(&self, request: &ChatRequest) -> Result<ChatReply> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::timeout(
                        format!("Request timed out: {}", e),
                        Some(self.timeout.as_secs_f64()),
                    )
                } else if e.is_connect() {
                    Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
                } else {
                    Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            Error::http_client(format!("Failed to read response: {}", e), Some(Box::new(e)))
        })?;

        if !status.is_success() {
            return Err(Error::api(status.as_u16(), body));
        }

        serde_json::from_str::<ChatReply>(&body).map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }
}

#[async_trait::async_trait]
impl ChatBackend for HttpChatClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        self.send(request).await
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// Picks the endpoint: explicit value, then environment, then the default.
pub fn resolve_endpoint(explicit: Option<String>, from_env: Option<String>) -> String {
    explicit
        .or(from_env)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
}

fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::url(
            format!("unsupported scheme {other:?} in endpoint {endpoint}"),
            None,
        )),
    }
}
