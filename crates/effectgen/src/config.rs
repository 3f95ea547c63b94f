//! Deployment configuration for the effect service.
//!
//! The origins the clients talk to, the effect being applied on whose behalf,
//! and the poll budget. None of these appear as literals in the clients.

use core::time::Duration;

/// Default origin of the job and upload-URL API.
pub const DEFAULT_API_ORIGIN: &str = "https://api.chromastudio.ai";

/// Default origin that serves uploaded files.
pub const DEFAULT_CONTENT_ORIGIN: &str = "https://contents.maxstudio.ai";

/// Maximum number of status requests made for a single job.
pub const MAX_POLLS: u32 = 60;

/// Delay between two status requests.
pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Model name every video job is submitted with.
pub const VIDEO_MODEL: &str = "video-effects";

/// Base origins the clients talk to. Values carry no trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api_origin: String,
    pub content_origin: String,
}

impl Endpoints {
    pub fn new(api_origin: impl Into<String>, content_origin: impl Into<String>) -> Self {
        Self {
            api_origin: trim_origin(api_origin.into()),
            content_origin: trim_origin(content_origin.into()),
        }
    }

    /// `GET` target issuing signed upload URLs.
    pub fn signed_url_endpoint(&self) -> String {
        format!("{}/get-emd-upload-url", self.api_origin)
    }

    /// Public URL a file uploaded under `file_name` is served from.
    pub fn public_url(&self, file_name: &str) -> String {
        format!("{}/{}", self.content_origin, file_name)
    }

    /// Collection endpoint for jobs of the given kind.
    pub fn job_endpoint(&self, kind: JobKind) -> String {
        format!("{}/{}", self.api_origin, kind.path())
    }

    /// Status endpoint of one job.
    pub fn status_endpoint(&self, kind: JobKind, user_id: &str, job_id: &str) -> String {
        format!("{}/{}/{}/status", self.job_endpoint(kind), user_id, job_id)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_API_ORIGIN, DEFAULT_CONTENT_ORIGIN)
    }
}

fn trim_origin(mut origin: String) -> String {
    while origin.ends_with('/') {
        origin.pop();
    }
    origin
}

/// What a generation job produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    Image,
    Video,
}

impl JobKind {
    pub const fn path(self) -> &'static str {
        match self {
            Self::Image => "image-gen",
            Self::Video => "video-gen",
        }
    }
}

/// The effect applied to every submitted asset.
///
/// Fixed per deployment rather than per request; it is injected into the
/// submission client and the poller instead of being compiled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectConfig {
    /// Model name for image jobs. Video jobs always use [`VIDEO_MODEL`].
    pub model: String,
    /// Tool type for image jobs; not sent for video jobs.
    pub tool_type: String,
    pub effect_id: String,
    pub is_video: bool,
    /// Account the jobs are submitted and polled under.
    pub user_id: String,
    pub remove_watermark: bool,
    pub is_private: bool,
}

impl EffectConfig {
    /// An image effect with watermark removal and private results, the
    /// service's usual settings.
    pub fn image(effect_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            model: "image-effects".to_owned(),
            tool_type: "image-effects".to_owned(),
            effect_id: effect_id.into(),
            is_video: false,
            user_id: user_id.into(),
            remove_watermark: true,
            is_private: true,
        }
    }

    /// Same as [`EffectConfig::image`] but producing a video.
    pub fn video(effect_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            model: VIDEO_MODEL.to_owned(),
            is_video: true,
            ..Self::image(effect_id, user_id)
        }
    }

    pub const fn kind(&self) -> JobKind {
        if self.is_video {
            JobKind::Video
        } else {
            JobKind::Image
        }
    }
}

/// Poll budget for a single job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_polls: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: POLL_INTERVAL,
            max_polls: MAX_POLLS,
        }
    }
}

/// Everything a [`crate::JobController`] needs besides its transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub endpoints: Endpoints,
    pub effect: EffectConfig,
    pub poll: PollConfig,
}

impl Config {
    pub fn new(effect: EffectConfig) -> Self {
        Self {
            endpoints: Endpoints::default(),
            effect,
            poll: PollConfig::default(),
        }
    }

    #[must_use]
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    #[must_use]
    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_strip_trailing_slashes() {
        let endpoints = Endpoints::new("https://api.test//", "https://cdn.test/");
        assert_eq!(
            endpoints.signed_url_endpoint(),
            "https://api.test/get-emd-upload-url"
        );
        assert_eq!(endpoints.public_url("abc.png"), "https://cdn.test/abc.png");
    }

    #[test]
    fn status_endpoint_follows_job_kind() {
        let endpoints = Endpoints::new("https://api.test", "https://cdn.test");
        assert_eq!(
            endpoints.status_endpoint(JobKind::Image, "u1", "j1"),
            "https://api.test/image-gen/u1/j1/status"
        );
        assert_eq!(
            endpoints.status_endpoint(JobKind::Video, "u1", "j1"),
            "https://api.test/video-gen/u1/j1/status"
        );
    }

    #[test]
    fn video_effect_uses_video_model() {
        let effect = EffectConfig::video("mugshot", "user-1");
        assert_eq!(effect.kind(), JobKind::Video);
        assert_eq!(effect.model, VIDEO_MODEL);
        assert_eq!(EffectConfig::image("mugshot", "user-1").kind(), JobKind::Image);
    }

    #[test]
    fn poll_defaults_match_budget() {
        let poll = PollConfig::default();
        assert_eq!(poll.max_polls, 60);
        assert_eq!(poll.interval, Duration::from_secs(2));
    }
}
