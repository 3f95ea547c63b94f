use super::until_cancelled;
use crate::{
    config::Endpoints,
    error::{Error, Result},
    id::NanoIdGenerator,
    media::{BinaryPayload, UploadedAsset},
    rand::{RandSource, ThreadRandom},
    transport::{HttpRequest, HttpTransport},
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Exchanges a local file for a durable public URL.
///
/// The upload is a two-step signed-URL protocol:
///
/// 1. ask the API for a signed URL under a fresh `{id}.{ext}` filename;
/// 2. `PUT` the raw bytes to that URL.
///
/// The public URL is derived from the filename alone, so nothing from the
/// `PUT` response is needed. Neither step is retried.
pub struct UploadClient<T, R = ThreadRandom> {
    transport: Arc<T>,
    endpoints: Endpoints,
    ids: NanoIdGenerator<R>,
}

impl<T, R> UploadClient<T, R>
where
    T: HttpTransport,
    R: RandSource<u64>,
{
    pub const fn new(transport: Arc<T>, endpoints: Endpoints, ids: NanoIdGenerator<R>) -> Self {
        Self {
            transport,
            endpoints,
            ids,
        }
    }

    /// Uploads `file` and returns where it is now served from.
    ///
    /// # Errors
    ///
    /// - [`Error::SignedUrl`] if no signed URL could be obtained.
    /// - [`Error::UploadPut`] if the bytes were not accepted.
    pub async fn upload(&self, file: &BinaryPayload) -> Result<UploadedAsset> {
        self.upload_until_cancelled(file, &CancellationToken::new())
            .await
    }

    /// Same as [`Self::upload`], abandoning the upload with
    /// [`Error::Cancelled`] once `token` is cancelled.
    pub async fn upload_until_cancelled(
        &self,
        file: &BinaryPayload,
        token: &CancellationToken,
    ) -> Result<UploadedAsset> {
        let extension = file.extension();
        let file_name = format!("{}.{}", self.ids.generate(), extension);

        let signed_url = self.request_signed_url(&file_name, token).await?;
        #[cfg(feature = "tracing")]
        tracing::debug!(%file_name, "Got signed URL");

        let mut put = HttpRequest::put(signed_url);
        if !file.mime_type.is_empty() {
            put = put.header("Content-Type", file.mime_type.as_str());
        }
        let put = put.body(file.bytes.clone());

        let res = until_cancelled(token, self.transport.send(put))
            .await?
            .map_err(|e| Error::UploadPut {
                status: e.to_string(),
            })?;
        if !res.is_success() {
            return Err(Error::UploadPut {
                status: res.status_text(),
            });
        }

        let remote_url = self.endpoints.public_url(&file_name);
        #[cfg(feature = "tracing")]
        tracing::info!(%remote_url, bytes = file.bytes.len(), "Uploaded file");

        Ok(UploadedAsset {
            remote_url,
            extension: extension.to_owned(),
        })
    }

    async fn request_signed_url(&self, file_name: &str, token: &CancellationToken) -> Result<String> {
        let url = Url::parse_with_params(
            &self.endpoints.signed_url_endpoint(),
            &[("fileName", file_name)],
        )?;

        let res = until_cancelled(token, self.transport.send(HttpRequest::get(url.to_string())))
            .await?
            .map_err(|e| Error::SignedUrl {
                status: e.to_string(),
            })?;
        if !res.is_success() {
            return Err(Error::SignedUrl {
                status: res.status_text(),
            });
        }

        Ok(res.text().trim().to_owned())
    }
}
