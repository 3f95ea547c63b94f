//! Error types for the effect job workflow.
//!
//! Every remote step owns exactly one failure variant carrying the HTTP status
//! text (or the network error message when no response arrived). None of them
//! are retried: the first failure aborts the current operation and is handed
//! back to the caller unmodified.
//!
//! ## Error Cases
//! - `SignedUrl` / `UploadPut`: the two halves of an upload.
//! - `Submission`: the job POST was rejected.
//! - `PollTransport`: a status GET failed at the HTTP level.
//! - `JobFailed`: the service reported `failed` or `error`.
//! - `JobTimeout`: the poll budget ran out on a pending job.
//! - `Cancelled`: a reset made the in-flight operation stale.

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Unified error type for the effect job workflow.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The backend refused to issue a signed upload URL.
    #[error("Failed to get signed URL: {status}")]
    SignedUrl { status: String },

    /// The PUT of the raw file bytes to the signed URL failed.
    #[error("Failed to upload file: {status}")]
    UploadPut { status: String },

    /// The generation job could not be submitted.
    #[error("Failed to submit job: {status}")]
    Submission { status: String },

    /// A status request failed before a job status could be read.
    #[error("Failed to check status: {status}")]
    PollTransport { status: String },

    /// The service reported the job as `failed` or `error`.
    #[error("{message}")]
    JobFailed { message: String },

    /// The job was still pending after the maximum number of polls.
    #[error("Job timed out after {polls} polls")]
    JobTimeout { polls: u32 },

    /// The job completed but its payload carried no media URL.
    #[error("No media URL in job result")]
    MissingResultUrl,

    /// A JSON body could not be encoded or decoded.
    #[error("Malformed {context} JSON: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A request URL could not be built from the configured origins.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Fetching the current asset failed.
    #[error("Failed to fetch file: {status}")]
    Download { status: String },

    /// The operation was abandoned by a reset.
    #[error("Operation cancelled")]
    Cancelled,
}

/// Coarse classification of an [`Error`] along the workflow's failure
/// taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Upload,
    Submission,
    PollTransport,
    JobFailed,
    JobTimeout,
    Download,
    Cancelled,
    Other,
}

impl Error {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::SignedUrl { .. } | Self::UploadPut { .. } => ErrorKind::Upload,
            Self::Submission { .. } => ErrorKind::Submission,
            Self::PollTransport { .. } => ErrorKind::PollTransport,
            Self::JobFailed { .. } => ErrorKind::JobFailed,
            Self::JobTimeout { .. } => ErrorKind::JobTimeout,
            Self::Download { .. } => ErrorKind::Download,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::MissingResultUrl | Self::Json { .. } | Self::InvalidUrl(_) => ErrorKind::Other,
        }
    }

    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_steps_share_a_kind() {
        let signed = Error::SignedUrl {
            status: "Forbidden".into(),
        };
        let put = Error::UploadPut {
            status: "Bad Gateway".into(),
        };
        assert_eq!(signed.kind(), ErrorKind::Upload);
        assert_eq!(put.kind(), ErrorKind::Upload);
        assert_eq!(signed.to_string(), "Failed to get signed URL: Forbidden");
    }

    #[test]
    fn job_failed_displays_server_message_verbatim() {
        let err = Error::JobFailed {
            message: "bad input".into(),
        };
        assert_eq!(err.to_string(), "bad input");
        assert_eq!(err.kind(), ErrorKind::JobFailed);
    }

    #[test]
    fn timeout_mentions_poll_budget() {
        let err = Error::JobTimeout { polls: 60 };
        assert_eq!(err.to_string(), "Job timed out after 60 polls");
        assert!(!err.is_cancelled());
        assert!(Error::Cancelled.is_cancelled());
    }
}
