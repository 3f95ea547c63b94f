use bytes::Bytes;

/// Extension used for uploads whose filename carries none.
pub const DEFAULT_EXTENSION: &str = "jpg";

/// Kind of media a URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classifies a URL by its file extension: `.mp4` and `.webm` (optionally
    /// followed by a query string) are videos, anything else is an image.
    pub fn from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url).to_ascii_lowercase();
        if path.ends_with(".mp4") || path.ends_with(".webm") {
            Self::Video
        } else {
            Self::Image
        }
    }

    pub const fn is_video(self) -> bool {
        matches!(self, Self::Video)
    }
}

/// A local file handed over by the view layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryPayload {
    /// Local filename, used only to derive the extension.
    pub name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

impl BinaryPayload {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Text after the last `.` of the filename, or [`DEFAULT_EXTENSION`] when
    /// there is no dot or nothing follows it.
    pub fn extension(&self) -> &str {
        match self.name.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => ext,
            _ => DEFAULT_EXTENSION,
        }
    }
}

/// A file that now lives at a public URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    pub remote_url: String,
    pub extension: String,
}

/// The media a completed job produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResult {
    pub media_url: String,
    pub media_kind: MediaKind,
}

impl JobResult {
    pub fn new(media_url: impl Into<String>) -> Self {
        let media_url = media_url.into();
        let media_kind = MediaKind::from_url(&media_url);
        Self {
            media_url,
            media_kind,
        }
    }
}
