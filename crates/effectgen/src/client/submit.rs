use super::until_cancelled;
use crate::{
    config::{EffectConfig, Endpoints, JobKind, VIDEO_MODEL},
    error::{Error, Result},
    transport::{ACCEPT_JSON, HttpRequest, HttpTransport},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Job descriptor returned by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescriptor {
    pub job_id: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageJobRequest<'a> {
    model: &'a str,
    tool_type: &'a str,
    effect_id: &'a str,
    image_url: &'a str,
    user_id: &'a str,
    remove_watermark: bool,
    is_private: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoJobRequest<'a> {
    image_url: [&'a str; 1],
    effect_id: &'a str,
    user_id: &'a str,
    remove_watermark: bool,
    model: &'static str,
    is_private: bool,
}

/// Submits generation jobs for the configured effect.
pub struct SubmissionClient<T> {
    transport: Arc<T>,
    endpoints: Endpoints,
    effect: EffectConfig,
}

impl<T> SubmissionClient<T>
where
    T: HttpTransport,
{
    pub const fn new(transport: Arc<T>, endpoints: Endpoints, effect: EffectConfig) -> Self {
        Self {
            transport,
            endpoints,
            effect,
        }
    }

    pub const fn effect(&self) -> &EffectConfig {
        &self.effect
    }

    /// JSON body for a job on `asset_url`.
    ///
    /// Video jobs take the image URL as a one-element list and always use
    /// [`VIDEO_MODEL`]; image jobs take it as a scalar and carry the tool type.
    pub fn request_body(&self, asset_url: &str) -> Result<Vec<u8>> {
        let effect = &self.effect;
        let body = match effect.kind() {
            JobKind::Video => serde_json::to_vec(&VideoJobRequest {
                image_url: [asset_url],
                effect_id: &effect.effect_id,
                user_id: &effect.user_id,
                remove_watermark: effect.remove_watermark,
                model: VIDEO_MODEL,
                is_private: effect.is_private,
            }),
            JobKind::Image => serde_json::to_vec(&ImageJobRequest {
                model: &effect.model,
                tool_type: &effect.tool_type,
                effect_id: &effect.effect_id,
                image_url: asset_url,
                user_id: &effect.user_id,
                remove_watermark: effect.remove_watermark,
                is_private: effect.is_private,
            }),
        };
        body.map_err(|e| Error::json("job submission", e))
    }

    /// Submits one job for `asset_url`.
    ///
    /// # Errors
    ///
    /// - [`Error::Submission`] on a network failure or non-2xx response.
    /// - [`Error::Json`] if the response is not a job descriptor.
    pub async fn submit(&self, asset_url: &str) -> Result<JobDescriptor> {
        self.submit_until_cancelled(asset_url, &CancellationToken::new())
            .await
    }

    pub async fn submit_until_cancelled(
        &self,
        asset_url: &str,
        token: &CancellationToken,
    ) -> Result<JobDescriptor> {
        let request = HttpRequest::post(self.endpoints.job_endpoint(self.effect.kind()))
            .header("Accept", ACCEPT_JSON)
            .header("Content-Type", "application/json")
            .body(self.request_body(asset_url)?);

        let res = until_cancelled(token, self.transport.send(request))
            .await?
            .map_err(|e| Error::Submission {
                status: e.to_string(),
            })?;
        if !res.is_success() {
            return Err(Error::Submission {
                status: res.status_text(),
            });
        }

        let job: JobDescriptor = res.json().map_err(|e| Error::json("job submission", e))?;
        #[cfg(feature = "tracing")]
        tracing::info!(job_id = %job.job_id, status = %job.status, "Job submitted");
        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorKind,
        transport::{
            HttpResponse, Method,
            mock::{MockTransport, json},
        },
    };
    use serde_json::{Value, json};

    fn client(transport: &Arc<MockTransport>, effect: EffectConfig) -> SubmissionClient<MockTransport> {
        SubmissionClient::new(
            transport.clone(),
            Endpoints::new("https://api.test", "https://cdn.test"),
            effect,
        )
    }

    fn sent_body(transport: &MockTransport) -> Value {
        let requests = transport.requests();
        serde_json::from_slice(requests[0].body.as_deref().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn image_job_posts_scalar_url_with_tool_type() {
        let transport = Arc::new(MockTransport::new());
        transport.on(
            Method::Post,
            "https://api.test/image-gen",
            json(200, json!({ "jobId": "job-1", "status": "queued" })),
        );

        let job = client(&transport, EffectConfig::image("mugshot", "user-1"))
            .submit("https://cdn.test/a.png")
            .await
            .unwrap();
        assert_eq!(job.job_id, "job-1");
        assert_eq!(job.status, "queued");

        assert_eq!(
            sent_body(&transport),
            json!({
                "model": "image-effects",
                "toolType": "image-effects",
                "effectId": "mugshot",
                "imageUrl": "https://cdn.test/a.png",
                "userId": "user-1",
                "removeWatermark": true,
                "isPrivate": true,
            })
        );
        let request = &transport.requests()[0];
        assert_eq!(request.url, "https://api.test/image-gen");
        assert_eq!(request.header_value("content-type"), Some("application/json"));
    }

    #[tokio::test]
    async fn video_job_posts_url_list_without_tool_type() {
        let transport = Arc::new(MockTransport::new());
        transport.on(
            Method::Post,
            "https://api.test/video-gen",
            json(200, json!({ "jobId": "job-9", "status": "queued" })),
        );

        let mut effect = EffectConfig::video("dance", "user-2");
        effect.model = "ignored-for-video".into();
        effect.is_private = false;
        client(&transport, effect)
            .submit("https://cdn.test/a.png")
            .await
            .unwrap();

        assert_eq!(
            sent_body(&transport),
            json!({
                "imageUrl": ["https://cdn.test/a.png"],
                "effectId": "dance",
                "userId": "user-2",
                "removeWatermark": true,
                "model": "video-effects",
                "isPrivate": false,
            })
        );
    }

    #[tokio::test]
    async fn rejected_submission_is_a_submission_error() {
        let transport = Arc::new(MockTransport::new());
        transport.on(
            Method::Post,
            "https://api.test/image-gen",
            HttpResponse::new(429, "").with_reason("Too Many Requests"),
        );

        let err = client(&transport, EffectConfig::image("mugshot", "u"))
            .submit("https://cdn.test/a.png")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Submission);
        assert_eq!(err.to_string(), "Failed to submit job: Too Many Requests");
    }

    #[tokio::test]
    async fn descriptor_without_job_id_is_malformed() {
        let transport = Arc::new(MockTransport::new());
        transport.on(
            Method::Post,
            "https://api.test/image-gen",
            json(200, json!({ "status": "queued" })),
        );

        let err = client(&transport, EffectConfig::image("mugshot", "u"))
            .submit("https://cdn.test/a.png")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Json { .. }));
    }
}
