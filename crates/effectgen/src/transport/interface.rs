use bytes::Bytes;
use core::future::Future;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// `Accept` header sent with every JSON exchange.
pub const ACCEPT_JSON: &str = "application/json, text/plain, */*";

/// HTTP verbs used by the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
    Post,
}

/// A fully materialised outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<Bytes>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::Put, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    #[must_use]
    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Case-insensitive header lookup.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A fully buffered response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Reason phrase, when the transport knows one.
    pub reason: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            reason: None,
            content_type: None,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// The reason phrase, falling back to the numeric code.
    pub fn status_text(&self) -> String {
        match &self.reason {
            Some(reason) if !reason.is_empty() => reason.clone(),
            _ => format!("HTTP {}", self.status),
        }
    }

    /// The body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }
}

/// Failure to complete an exchange at all: no response to inspect.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request could not be sent or the connection dropped.
    #[error("network error: {message}")]
    Network { message: String },

    /// The response body could not be read.
    #[error("failed to read response body: {message}")]
    Body { message: String },
}

/// A trait that abstracts over how a single HTTP exchange is performed.
///
/// Every client in this crate talks to the network through this trait only,
/// so the workflow can run against a real HTTP stack in production and a
/// scripted transport in tests. Non-2xx responses are *not* errors at this
/// level; callers inspect [`HttpResponse::is_success`].
pub trait HttpTransport: Send + Sync {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

impl<T: HttpTransport> HttpTransport for Arc<T> {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        (**self).send(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_text_prefers_reason_phrase() {
        let res = HttpResponse::new(404, "").with_reason("Not Found");
        assert_eq!(res.status_text(), "Not Found");
        assert!(!res.is_success());

        let res = HttpResponse::new(502, "");
        assert_eq!(res.status_text(), "HTTP 502");
    }

    #[test]
    fn success_is_2xx_only() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(199, "").is_success());
        assert!(!HttpResponse::new(301, "").is_success());
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = HttpRequest::put("https://storage.test/x").header("Content-Type", "image/png");
        assert_eq!(req.header_value("content-type"), Some("image/png"));
        assert_eq!(req.header_value("accept"), None);
    }
}
