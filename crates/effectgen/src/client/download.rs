use super::until_cancelled;
use crate::{
    error::{Error, Result},
    id::NanoIdGenerator,
    media::MediaKind,
    rand::{RandSource, ThreadRandom},
    transport::{HttpRequest, HttpTransport},
};
use bytes::Bytes;
use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tokio_util::sync::CancellationToken;

/// Length of the random part of a downloaded file's name.
pub const DOWNLOAD_ID_LEN: usize = 8;

/// A fetched asset, ready to be written wherever the caller wants it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedMedia {
    /// Suggested local name: `{prefix}_{id}.{ext}`.
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
    pub media_kind: MediaKind,
}

/// Fetches the current asset so it can be saved locally.
pub struct DownloadClient<T, R = ThreadRandom> {
    transport: Arc<T>,
    ids: NanoIdGenerator<R>,
    prefix: String,
}

impl<T, R> DownloadClient<T, R>
where
    T: HttpTransport,
    R: RandSource<u64>,
{
    pub fn new(transport: Arc<T>, ids: NanoIdGenerator<R>, prefix: impl Into<String>) -> Self {
        Self {
            transport,
            ids,
            prefix: prefix.into(),
        }
    }

    /// Fetches `url`, bypassing intermediate caches.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Download`] on a network failure or non-2xx response.
    pub async fn download(&self, url: &str) -> Result<DownloadedMedia> {
        self.download_until_cancelled(url, &CancellationToken::new())
            .await
    }

    pub async fn download_until_cancelled(
        &self,
        url: &str,
        token: &CancellationToken,
    ) -> Result<DownloadedMedia> {
        let request = HttpRequest::get(cache_busted(url, unix_millis()));
        let res = until_cancelled(token, self.transport.send(request))
            .await?
            .map_err(|e| Error::Download {
                status: e.to_string(),
            })?;
        if !res.is_success() {
            return Err(Error::Download {
                status: res.status_text(),
            });
        }

        let extension = extension_for(url, res.content_type.as_deref().unwrap_or_default());
        let file_name = format!(
            "{}_{}.{}",
            self.prefix,
            self.ids.generate_with_len(DOWNLOAD_ID_LEN),
            extension
        );
        #[cfg(feature = "tracing")]
        tracing::info!(%file_name, bytes = res.body.len(), "Downloaded asset");

        Ok(DownloadedMedia {
            file_name,
            media_kind: if extension == "mp4" {
                MediaKind::Video
            } else {
                MediaKind::Image
            },
            content_type: res.content_type,
            bytes: res.body,
        })
    }
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

fn cache_busted(url: &str, millis: u128) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}t={millis}")
}

/// Local extension for a download. The content type wins over the URL; anything
/// unrecognised is saved as `jpg`.
fn extension_for(url: &str, content_type: &str) -> &'static str {
    let url = url.to_ascii_lowercase();
    if content_type.contains("video") || url.contains(".mp4") || url.contains(".webm") {
        "mp4"
    } else if content_type.contains("png") || url.contains(".png") {
        "png"
    } else if content_type.contains("webp") || url.contains(".webp") {
        "webp"
    } else {
        "jpg"
    }
}
