use serde::Deserialize;

/// Lifecycle status of a remote generation job, as reported by the status
/// endpoint.
///
/// - [`JobStatus::Completed`], [`JobStatus::Failed`] and [`JobStatus::Errored`]
///   are terminal: polling any further is pointless.
/// - Any status string the service sends that is not `queued` or terminal is
///   treated as [`JobStatus::Processing`], so new intermediate states never
///   break the poll loop. So is a reply with no status at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JobStatus {
    Queued,
    #[default]
    Processing,
    Completed,
    Failed,
    Errored,
}

impl JobStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            "error" => Self::Errored,
            "queued" => Self::Queued,
            _ => Self::Processing,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Errored)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Errored => "error",
        }
    }
}

impl<'de> Deserialize<'de> for JobStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map_or(Self::Processing, Self::parse))
    }
}
