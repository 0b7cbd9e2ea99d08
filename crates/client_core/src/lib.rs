use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder};
use serde_json::Value;
use shared::{
    error::ErrorBody,
    protocol::{BulkDeleteRequest, ContactDraft, ContactUpdate, ExportQuery, ListQuery, SearchQuery},
};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub mod session;

pub use reqwest::{Method, StatusCode};

const CONTACTS_RESOURCE: &str = "contacts";

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("invalid api base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("{method} {path} failed: {source}")]
    Transport {
        method: Method,
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} {path} returned {status}{}", message_suffix(.message))]
    Status {
        method: Method,
        path: String,
        status: StatusCode,
        message: Option<String>,
    },
    #[error("{method} {path} returned an undecodable body: {source}")]
    Decode {
        method: Method,
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl ApiClientError {
    /// Message the backend attached to a failed response, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Best human-facing text: the server's message when it sent one,
    /// otherwise the full error chain.
    pub fn user_message(&self) -> String {
        match self.server_message() {
            Some(message) => message.to_string(),
            None => self.to_string(),
        }
    }
}

/// Named operations of the `/contacts` REST resource. Every call returns the
/// decoded response body; interpreting it is the caller's job.
#[async_trait]
pub trait ContactsApi: Send + Sync {
    async fn get_all(&self, query: &ListQuery) -> Result<Value, ApiClientError>;
    async fn get_by_id(&self, id: &str) -> Result<Value, ApiClientError>;
    async fn create(&self, draft: &ContactDraft) -> Result<Value, ApiClientError>;
    async fn update(&self, id: &str, update: &ContactUpdate) -> Result<Value, ApiClientError>;
    async fn delete(&self, id: &str) -> Result<Value, ApiClientError>;
    async fn bulk_delete(&self, ids: &[String]) -> Result<Value, ApiClientError>;
    async fn search(&self, query: &str) -> Result<Value, ApiClientError>;
    async fn import(&self, payload: &Value) -> Result<Value, ApiClientError>;
    async fn export(&self, query: &ExportQuery) -> Result<Value, ApiClientError>;
    async fn get_stats(&self) -> Result<Value, ApiClientError>;
}

pub struct HttpContactsClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpContactsClient {
    pub fn new(base_url: &str) -> Result<Self, ApiClientError> {
        let parsed = Url::parse(base_url.trim()).map_err(|err| ApiClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: err.to_string(),
        })?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiClientError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "expected an http(s) url".to_string(),
            });
        }

        Ok(Self {
            http: Client::new(),
            base_url: parsed,
            token: None,
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> (String, RequestBuilder) {
        let url = self.endpoint(segments);
        let path = url.path().to_string();
        let mut builder = self.http.request(method, url);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        (path, builder)
    }

    async fn send(
        &self,
        method: Method,
        path: String,
        builder: RequestBuilder,
    ) -> Result<Value, ApiClientError> {
        debug!(method = %method, path = %path, "contacts api request");
        let transport = |source| ApiClientError::Transport {
            method: method.clone(),
            path: path.clone(),
            source,
        };

        let response = builder.send().await.map_err(transport)?;
        let status = response.status();
        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("json"))
            .unwrap_or(true);
        let bytes = response.bytes().await.map_err(transport)?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(ErrorBody::into_message);
            warn!(method = %method, path = %path, status = status.as_u16(), "contacts api request failed");
            return Err(ApiClientError::Status {
                method,
                path,
                status,
                message,
            });
        }

        decode_body(&bytes, is_json).map_err(|source| ApiClientError::Decode {
            method,
            path,
            source,
        })
    }
}

/// Empty bodies (e.g. `204 No Content` on delete) decode to `null`; non-JSON
/// bodies such as a CSV export are returned as a JSON string.
fn decode_body(bytes: &[u8], is_json: bool) -> Result<Value, serde_json::Error> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    if !is_json {
        return Ok(Value::String(String::from_utf8_lossy(bytes).into_owned()));
    }
    serde_json::from_slice(bytes)
}

#[async_trait]
impl ContactsApi for HttpContactsClient {
    async fn get_all(&self, query: &ListQuery) -> Result<Value, ApiClientError> {
        let (path, builder) = self.request(Method::GET, &[CONTACTS_RESOURCE]);
        self.send(Method::GET, path, builder.query(query)).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Value, ApiClientError> {
        let (path, builder) = self.request(Method::GET, &[CONTACTS_RESOURCE, id]);
        self.send(Method::GET, path, builder).await
    }

    async fn create(&self, draft: &ContactDraft) -> Result<Value, ApiClientError> {
        let (path, builder) = self.request(Method::POST, &[CONTACTS_RESOURCE]);
        self.send(Method::POST, path, builder.json(draft)).await
    }

    async fn update(&self, id: &str, update: &ContactUpdate) -> Result<Value, ApiClientError> {
        let (path, builder) = self.request(Method::PUT, &[CONTACTS_RESOURCE, id]);
        self.send(Method::PUT, path, builder.json(update)).await
    }

    async fn delete(&self, id: &str) -> Result<Value, ApiClientError> {
        let (path, builder) = self.request(Method::DELETE, &[CONTACTS_RESOURCE, id]);
        self.send(Method::DELETE, path, builder).await
    }

    async fn bulk_delete(&self, ids: &[String]) -> Result<Value, ApiClientError> {
        let (path, builder) = self.request(Method::POST, &[CONTACTS_RESOURCE, "bulk-delete"]);
        let body = BulkDeleteRequest { ids: ids.to_vec() };
        self.send(Method::POST, path, builder.json(&body)).await
    }

    async fn search(&self, query: &str) -> Result<Value, ApiClientError> {
        let (path, builder) = self.request(Method::GET, &[CONTACTS_RESOURCE, "search"]);
        self.send(Method::GET, path, builder.query(&SearchQuery { q: query }))
            .await
    }

    async fn import(&self, payload: &Value) -> Result<Value, ApiClientError> {
        let (path, builder) = self.request(Method::POST, &[CONTACTS_RESOURCE, "import"]);
        self.send(Method::POST, path, builder.json(payload)).await
    }

    async fn export(&self, query: &ExportQuery) -> Result<Value, ApiClientError> {
        let (path, builder) = self.request(Method::GET, &[CONTACTS_RESOURCE, "export"]);
        self.send(Method::GET, path, builder.query(query)).await
    }

    async fn get_stats(&self) -> Result<Value, ApiClientError> {
        let (path, builder) = self.request(Method::GET, &[CONTACTS_RESOURCE, "stats"]);
        self.send(Method::GET, path, builder).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
