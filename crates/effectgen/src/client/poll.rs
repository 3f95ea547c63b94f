use super::until_cancelled;
use crate::{
    config::{Endpoints, JobKind, PollConfig},
    error::{Error, Result},
    futures::{SleepProvider, TokioSleep},
    media::JobResult,
    status::JobStatus,
    transport::{ACCEPT_JSON, HttpRequest, HttpTransport},
};
use core::marker::PhantomData;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Message used when a job fails without saying why.
const DEFAULT_FAILURE: &str = "Job processing failed";

/// One reply from the status endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusResponse {
    /// Missing or `null` reads as [`JobStatus::Processing`].
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl StatusResponse {
    /// Server-supplied failure message, if any.
    pub fn error_message(&self) -> Option<String> {
        match self.error.as_ref()? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// The produced media URL. `result` is either one item or a list whose
    /// first item counts; the URL is the first non-empty of `mediaUrl`,
    /// `video` and `image`.
    pub fn media_url(&self) -> Option<&str> {
        let item = match self.result.as_ref()? {
            Value::Array(items) => items.first()?,
            item => item,
        };
        ["mediaUrl", "video", "image"]
            .into_iter()
            .filter_map(|key| item.get(key)?.as_str())
            .find(|url| !url.is_empty())
    }

    pub fn into_result(self) -> Result<JobResult> {
        self.media_url()
            .map(JobResult::new)
            .ok_or(Error::MissingResultUrl)
    }
}

/// Polls a submitted job until it reaches a terminal status.
///
/// A non-terminal reply reports the attempt number through `on_progress` and
/// then suspends for the configured interval through `S`. After
/// [`PollConfig::max_polls`] non-terminal replies the job is abandoned with
/// [`Error::JobTimeout`]; no further request is made.
pub struct JobPoller<T, S = TokioSleep> {
    transport: Arc<T>,
    endpoints: Endpoints,
    user_id: String,
    poll: PollConfig,
    _sleep: PhantomData<fn() -> S>,
}

impl<T, S> JobPoller<T, S>
where
    T: HttpTransport,
    S: SleepProvider,
{
    pub fn new(
        transport: Arc<T>,
        endpoints: Endpoints,
        user_id: impl Into<String>,
        poll: PollConfig,
    ) -> Self {
        Self {
            transport,
            endpoints,
            user_id: user_id.into(),
            poll,
            _sleep: PhantomData,
        }
    }

    /// Polls `job_id` to completion.
    ///
    /// # Errors
    ///
    /// - [`Error::PollTransport`] if a status request fails.
    /// - [`Error::JobFailed`] if the service reports `failed` or `error`.
    /// - [`Error::JobTimeout`] once the poll budget is spent.
    /// - [`Error::MissingResultUrl`] if the completed job names no media.
    pub async fn poll<F>(&self, job_id: &str, kind: JobKind, on_progress: F) -> Result<JobResult>
    where
        F: FnMut(u32) + Send,
    {
        self.poll_until_cancelled(job_id, kind, on_progress, &CancellationToken::new())
            .await
    }

    /// Same as [`Self::poll`], checking `token` at every request and every
    /// sleep.
    pub async fn poll_until_cancelled<F>(
        &self,
        job_id: &str,
        kind: JobKind,
        mut on_progress: F,
        token: &CancellationToken,
    ) -> Result<JobResult>
    where
        F: FnMut(u32) + Send,
    {
        let url = self.endpoints.status_endpoint(kind, &self.user_id, job_id);
        let mut polls = 0;

        while polls < self.poll.max_polls {
            let status = self.fetch_status(&url, token).await?;
            #[cfg(feature = "tracing")]
            tracing::debug!(job_id, poll = polls + 1, status = status.status.as_str(), "Polled job");

            if status.status.is_terminal() {
                return if status.status == JobStatus::Completed {
                    status.into_result()
                } else {
                    Err(Error::JobFailed {
                        message: status
                            .error_message()
                            .unwrap_or_else(|| DEFAULT_FAILURE.to_owned()),
                    })
                };
            }

            on_progress(polls + 1);
            until_cancelled(token, S::sleep_for(self.poll.interval)).await?;
            polls += 1;
        }

        #[cfg(feature = "tracing")]
        tracing::warn!(job_id, polls, "Job timed out");
        Err(Error::JobTimeout { polls })
    }

    async fn fetch_status(&self, url: &str, token: &CancellationToken) -> Result<StatusResponse> {
        let request = HttpRequest::get(url).header("Accept", ACCEPT_JSON);
        let res = until_cancelled(token, self.transport.send(request))
            .await?
            .map_err(|e| Error::PollTransport {
                status: e.to_string(),
            })?;
        if !res.is_success() {
            return Err(Error::PollTransport {
                status: res.status_text(),
            });
        }
        res.json().map_err(|e| Error::json("job status", e))
    }
}
