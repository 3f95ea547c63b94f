use core::fmt;

/// Lifecycle phase of a [`crate::JobController`]. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Idle,
    Uploading,
    Ready,
    Submitting,
    Queued,
    /// Polling; `attempt` is the number of pending replies seen so far.
    Processing {
        attempt: u32,
    },
    Complete,
    Error,
}

impl Phase {
    /// An upload or a job is in flight.
    pub const fn is_busy(self) -> bool {
        matches!(
            self,
            Self::Uploading | Self::Submitting | Self::Queued | Self::Processing { .. }
        )
    }

    /// A new source file may be selected.
    pub const fn accepts_file(self) -> bool {
        !self.is_busy()
    }

    /// Text shown to the user for this phase.
    pub fn status_text(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => Ok(()),
            Self::Uploading => f.write_str("UPLOADING..."),
            Self::Ready => f.write_str("READY"),
            Self::Submitting => f.write_str("SUBMITTING JOB..."),
            Self::Queued => f.write_str("JOB QUEUED..."),
            Self::Processing { attempt } => write!(f, "PROCESSING... ({attempt})"),
            Self::Complete => f.write_str("COMPLETE"),
            Self::Error => f.write_str("ERROR"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_text_per_phase() {
        assert_eq!(Phase::Idle.status_text(), "");
        assert_eq!(Phase::Uploading.status_text(), "UPLOADING...");
        assert_eq!(Phase::Queued.status_text(), "JOB QUEUED...");
        assert_eq!(
            Phase::Processing { attempt: 7 }.status_text(),
            "PROCESSING... (7)"
        );
        assert_eq!(Phase::Error.status_text(), "ERROR");
    }

    #[test]
    fn busy_phases_refuse_files() {
        for phase in [Phase::Idle, Phase::Ready, Phase::Complete, Phase::Error] {
            assert!(phase.accepts_file(), "{phase:?}");
        }
        for phase in [
            Phase::Uploading,
            Phase::Submitting,
            Phase::Queued,
            Phase::Processing { attempt: 1 },
        ] {
            assert!(phase.is_busy(), "{phase:?}");
        }
    }
}
