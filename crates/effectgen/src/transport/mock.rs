//! Scripted in-memory transport for tests.

use super::{HttpRequest, HttpResponse, HttpTransport, Method, TransportError};
use core::future::Future;
use parking_lot::Mutex;
use std::collections::VecDeque;

pub(crate) enum Reply {
    Response(HttpResponse),
    NetworkError(String),
    /// Never resolves; only a cancellation gets the caller out.
    Hang,
}

impl From<HttpResponse> for Reply {
    fn from(res: HttpResponse) -> Self {
        Self::Response(res)
    }
}

struct Route {
    method: Method,
    prefix: String,
    replies: VecDeque<Reply>,
}

/// Replies are queued per `(method, url prefix)` and consumed in order. A
/// request with no queued reply fails with a network error.
#[derive(Default)]
pub(crate) struct MockTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on(&self, method: Method, prefix: &str, reply: impl Into<Reply>) -> &Self {
        let mut routes = self.routes.lock();
        let reply = reply.into();
        match routes
            .iter_mut()
            .find(|r| r.method == method && r.prefix == prefix)
        {
            Some(route) => route.replies.push_back(reply),
            None => routes.push(Route {
                method,
                prefix: prefix.to_owned(),
                replies: VecDeque::from([reply]),
            }),
        }
        self
    }

    pub(crate) fn on_times(&self, method: Method, prefix: &str, n: usize, res: HttpResponse) -> &Self {
        for _ in 0..n {
            self.on(method, prefix, res.clone());
        }
        self
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub(crate) fn count(&self, method: Method, prefix: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.method == method && r.url.starts_with(prefix))
            .count()
    }

    fn next_reply(&self, request: &HttpRequest) -> Option<Reply> {
        self.routes
            .lock()
            .iter_mut()
            .find(|r| r.method == request.method && request.url.starts_with(&r.prefix))
            .and_then(|r| r.replies.pop_front())
    }
}

impl HttpTransport for MockTransport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        let reply = self.next_reply(&request);
        let unmatched = format!("no mock reply for {:?} {}", request.method, request.url);
        self.requests.lock().push(request);
        async move {
            match reply {
                Some(Reply::Response(res)) => Ok(res),
                Some(Reply::NetworkError(message)) => Err(TransportError::Network { message }),
                Some(Reply::Hang) => std::future::pending().await,
                None => Err(TransportError::Network { message: unmatched }),
            }
        }
    }
}

pub(crate) fn json(status: u16, value: serde_json::Value) -> HttpResponse {
    HttpResponse::new(status, value.to_string()).with_content_type("application/json")
}

pub(crate) fn text(status: u16, body: &str) -> HttpResponse {
    HttpResponse::new(status, body.to_owned()).with_content_type("text/plain")
}
