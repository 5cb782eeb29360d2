use std::fmt;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{self, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, StatusCode};
use tokio_util::io::StreamReader;
use tracing::{debug, warn};
use url::Url;

use crate::client_logger::ClientLogger;
use crate::error::{Error, Result};
use crate::observability::{
    CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS, HEALTH_CHECK_FAILURES,
    HEALTH_CHECKS,
};
use crate::stream::{DEFAULT_CHUNK_CAPACITY, TextStream, text_chunks};
use crate::types::{ChatRequest, ChatResponse, Endpoint};

/// Where an Agno server listens unless told otherwise.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// The operations a chat session needs from a server.
///
/// [`AgnoClient`] is the HTTP implementation; sessions are generic over this
/// trait so they can run against any backend.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Returns true when the server is reachable and healthy. Never errors.
    async fn check_health(&self) -> bool;

    /// Sends `message` and returns the complete reply.
    async fn send(&self, message: &str) -> Result<String>;

    /// Sends `message` and returns the reply as a stream of text chunks.
    async fn stream(&self, message: &str) -> Result<TextStream>;
}

/// Client for an Agno chat server.
#[derive(Clone)]
pub struct AgnoClient {
    client: ReqwestClient,
    base_url: Url,
    timeout: Option<Duration>,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl fmt::Debug for AgnoClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgnoClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

impl AgnoClient {
    /// Create a new client for the server at `base_url`, with no request timeout.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_options(base_url, None)
    }

    /// Create a new client with custom settings.
    ///
    /// A `timeout` bounds each whole exchange, including reading a streamed body.
    pub fn with_options(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;

        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            Error::transport(
                format!("Failed to build HTTP client: {}", e),
                Some(Box::new(e)),
            )
        })?;

        Ok(Self {
            client,
            base_url,
            timeout,
            logger: None,
        })
    }

    /// Attach a logger that observes every request, response, and streamed chunk.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The normalized base URL, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The per-request timeout, if one was configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Full URL of `endpoint` on this client's server.
    pub fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url> {
        Ok(self.base_url.join(endpoint.path())?)
    }

    fn timeout_secs(&self) -> Option<f64> {
        self.timeout.map(|t| t.as_secs_f64())
    }

    /// Process a non-success response into a status error.
    async fn process_error_response(response: Response) -> Error {
        let status = response.status();
        // The body is informational only; a failed read leaves it empty.
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "server rejected chat request");
        Error::status(status.as_u16(), body)
    }

    /// POST `{"message": ...}` to `endpoint` and return the successful response.
    async fn post_message(&self, endpoint: Endpoint, message: &str) -> Result<Response> {
        let request = ChatRequest::new(message);
        if let Some(logger) = &self.logger {
            logger.log_request(endpoint, &request);
        }

        let body = serde_json::to_vec(&request).map_err(|e| {
            Error::serialization(format!("Failed to encode request: {}", e), Some(Box::new(e)))
        })?;
        let url = self.endpoint_url(endpoint)?;
        debug!(%url, bytes = body.len(), "sending chat request");

        CLIENT_REQUESTS.click();
        let start = Instant::now();
        let result = self
            .client
            .post(url)
            .header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )
            .body(body)
            .send()
            .await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());

        let response = result.map_err(|e| {
            CLIENT_REQUEST_ERRORS.click();
            warn!(%endpoint, error = %e, "chat request failed");
            Error::from_reqwest(e, self.timeout_secs())
        })?;

        if !response.status().is_success() {
            CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }
        Ok(response)
    }

    /// Send a message to `/chat` and get the complete response text.
    pub async fn send(&self, message: &str) -> Result<String> {
        let response = self.post_message(Endpoint::Chat, message).await?;

        let body = response.bytes().await.map_err(|e| {
            CLIENT_REQUEST_ERRORS.click();
            Error::from_reqwest(e, self.timeout_secs())
        })?;

        let decoded: ChatResponse = serde_json::from_slice(&body).map_err(|e| {
            CLIENT_REQUEST_ERRORS.click();
            Error::decode(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })?;

        if let Some(logger) = &self.logger {
            logger.log_response(&decoded);
        }
        Ok(decoded.response)
    }

    /// Send a message to `/chat/stream` and get the reply as it arrives.
    ///
    /// The returned stream yields text in arrival order and ends when the server
    /// closes the body. Nothing is read from the body until the stream is polled.
    pub async fn stream(&self, message: &str) -> Result<TextStream> {
        let response = self.post_message(Endpoint::ChatStream, message).await?;

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(io::Error::other));
        let chunks = text_chunks(StreamReader::new(body), DEFAULT_CHUNK_CAPACITY);

        match &self.logger {
            Some(logger) => {
                let logger = Arc::clone(logger);
                Ok(Box::pin(chunks.inspect(move |chunk| {
                    if let Ok(text) = chunk {
                        logger.log_stream_chunk(text);
                    }
                })))
            }
            None => Ok(Box::pin(chunks)),
        }
    }

    /// Check whether the server answers `/health` with 200 OK.
    ///
    /// Connection failures, timeouts, and any other status fold into `false`.
    pub async fn check_health(&self) -> bool {
        HEALTH_CHECKS.click();
        let healthy = match self.endpoint_url(Endpoint::Health) {
            Ok(url) => match self.client.get(url).send().await {
                Ok(response) if response.status() == StatusCode::OK => true,
                Ok(response) => {
                    warn!(status = response.status().as_u16(), "health check failed");
                    false
                }
                Err(e) => {
                    warn!(error = %e, "health check could not reach server");
                    false
                }
            },
            Err(e) => {
                warn!(error = %e, "health check URL is invalid");
                false
            }
        };
        if !healthy {
            HEALTH_CHECK_FAILURES.click();
        }
        healthy
    }
}

#[async_trait]
impl ChatBackend for AgnoClient {
    async fn check_health(&self) -> bool {
        AgnoClient::check_health(self).await
    }

    async fn send(&self, message: &str) -> Result<String> {
        AgnoClient::send(self, message).await
    }

    async fn stream(&self, message: &str) -> Result<TextStream> {
        AgnoClient::stream(self, message).await
    }
}

/// Parse `base_url` and make sure endpoint paths append to it.
fn normalize_base_url(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url.trim())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::url(
            format!("unsupported scheme {:?} in {base_url}", url.scheme()),
            None,
        ));
    }
    if url.cannot_be_a_base() {
        return Err(Error::url(format!("{base_url} cannot be a base URL"), None));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
