use super::{HttpRequest, HttpResponse, HttpTransport, Method, TransportError};
use core::future::Future;

/// [`HttpTransport`] backed by a shared [`reqwest::Client`].
///
/// Cloning is cheap; clones share the client's connection pool.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub const fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        let client = self.client.clone();
        async move {
            let method = match request.method {
                Method::Get => reqwest::Method::GET,
                Method::Put => reqwest::Method::PUT,
                Method::Post => reqwest::Method::POST,
            };

            let mut builder = client.request(method, request.url.as_str());
            for (name, value) in &request.headers {
                builder = builder.header(*name, value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await.map_err(|e| TransportError::Network {
                message: e.to_string(),
            })?;

            let status = response.status();
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let body = response.bytes().await.map_err(|e| TransportError::Body {
                message: e.to_string(),
            })?;

            Ok(HttpResponse {
                status: status.as_u16(),
                reason: status.canonical_reason().map(str::to_owned),
                content_type,
                body,
            })
        }
    }
}
