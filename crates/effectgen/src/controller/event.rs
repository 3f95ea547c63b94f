use super::Phase;
use crate::media::{JobResult, UploadedAsset};

/// A state change reported to view collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    PhaseChanged(Phase),
    /// The poller saw its `attempt`-th pending reply.
    Progress { attempt: u32 },
    /// A selected file finished uploading and is now the current asset.
    AssetReady(UploadedAsset),
    /// A job finished; its media is now the current asset.
    Completed(JobResult),
    Failed { message: String },
    Reset,
}
