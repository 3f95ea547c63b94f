use super::{ControllerEvent, Phase};
use crate::{
    client::{DownloadClient, DownloadedMedia, JobPoller, SubmissionClient, UploadClient},
    config::{Config, JobKind},
    error::{Error, Result},
    futures::{SleepProvider, TokioSleep},
    id::NanoIdGenerator,
    media::{BinaryPayload, JobResult, UploadedAsset},
    rand::{RandSource, ThreadRandom},
    status::JobStatus,
    transport::HttpTransport,
};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Events buffered per subscriber before the slowest one starts lagging.
pub const EVENT_CAPACITY: usize = 64;

/// The job currently being submitted or polled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationJob {
    pub job_id: String,
    pub kind: JobKind,
    pub status: JobStatus,
}

/// Point-in-time copy of the controller state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControllerSnapshot {
    pub phase: Phase,
    /// URL of the current asset: the last upload, or the last job result.
    pub asset: Option<String>,
    pub job: Option<GenerationJob>,
}

#[derive(Default)]
struct ControllerState {
    phase: Phase,
    asset: Option<String>,
    job: Option<GenerationJob>,
    /// Token of the operation allowed to settle the state, if any.
    in_flight: Option<CancellationToken>,
}

/// Exclusive access to the state plus the means to report what changed.
struct Transition<'a> {
    state: MutexGuard<'a, ControllerState>,
    events: &'a broadcast::Sender<ControllerEvent>,
}

impl Transition<'_> {
    fn emit(&self, event: ControllerEvent) {
        // no subscribers is fine
        self.events.send(event).ok();
    }

    fn enter(&mut self, phase: Phase) {
        if !phase.is_busy() {
            self.state.in_flight = None;
        }
        if self.state.phase != phase {
            self.state.phase = phase;
            self.emit(ControllerEvent::PhaseChanged(phase));
        }
    }
}

/// Drives one file through upload, job submission and polling.
///
/// At most one operation is in flight. [`Self::select_file`] and
/// [`Self::generate`] return `Ok(None)` when the current phase does not admit
/// them. [`Self::reset`] is always admitted: it cancels whatever is in flight,
/// and the cancelled operation resolves to [`Error::Cancelled`] without
/// touching the state again.
///
/// The state lock is never held across an `.await`, so `reset` and the
/// accessors stay responsive while a job is being polled.
pub struct JobController<T, S = TokioSleep, R = ThreadRandom> {
    state: Mutex<ControllerState>,
    events: broadcast::Sender<ControllerEvent>,
    uploader: UploadClient<T, R>,
    submitter: SubmissionClient<T>,
    poller: JobPoller<T, S>,
    downloader: DownloadClient<T, R>,
}

/// A [`JobController`] sleeping on the Tokio timer between polls.
pub type TokioJobController<T> = JobController<T, TokioSleep, ThreadRandom>;

impl<T, S, R> JobController<T, S, R>
where
    T: HttpTransport,
    S: SleepProvider,
    R: RandSource<u64> + Clone + Send + Sync,
{
    pub fn new(transport: Arc<T>, config: Config, rng: R) -> Self {
        let Config {
            endpoints,
            effect,
            poll,
        } = config;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            state: Mutex::default(),
            events,
            uploader: UploadClient::new(
                transport.clone(),
                endpoints.clone(),
                NanoIdGenerator::new(rng.clone()),
            ),
            poller: JobPoller::new(transport.clone(), endpoints.clone(), effect.user_id.clone(), poll),
            downloader: DownloadClient::new(
                transport.clone(),
                NanoIdGenerator::new(rng),
                effect.effect_id.clone(),
            ),
            submitter: SubmissionClient::new(transport, endpoints, effect),
        }
    }

    /// Receives every event emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub fn phase(&self) -> Phase {
        self.state.lock().phase
    }

    pub fn current_asset(&self) -> Option<String> {
        self.state.lock().asset.clone()
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        let state = self.state.lock();
        ControllerSnapshot {
            phase: state.phase,
            asset: state.asset.clone(),
            job: state.job.clone(),
        }
    }

    /// Uploads `file` and makes it the current asset.
    ///
    /// Admitted from `Idle`, `Ready`, `Complete` and `Error`. On failure the
    /// controller enters `Error` and the previous asset is kept.
    ///
    /// # Errors
    ///
    /// Any upload error, or [`Error::Cancelled`] after a reset.
    pub async fn select_file(&self, file: BinaryPayload) -> Result<Option<UploadedAsset>> {
        let Some((token, ())) =
            self.begin(Phase::Uploading, |state| state.phase.accepts_file().then_some(()))
        else {
            #[cfg(feature = "tracing")]
            tracing::debug!(name = %file.name, "Ignoring file selected while busy");
            return Ok(None);
        };

        let asset = self.uploader.upload_until_cancelled(&file, &token).await;
        self.settle(&token, asset, |tx, asset| {
            tx.state.asset = Some(asset.remote_url.clone());
            tx.emit(ControllerEvent::AssetReady(asset.clone()));
            tx.enter(Phase::Ready);
        })
        .map(Some)
    }

    /// Submits a job for the current asset and polls it to completion. The
    /// job's media then replaces the current asset.
    ///
    /// A no-op unless the controller is `Ready`. On failure the controller
    /// enters `Error` and the uploaded asset is kept; [`Self::recover`] makes
    /// it generatable again without a new upload.
    ///
    /// # Errors
    ///
    /// Any submission or poll error, or [`Error::Cancelled`] after a reset.
    pub async fn generate(&self) -> Result<Option<JobResult>> {
        let Some((token, asset)) = self.begin(Phase::Submitting, |state| {
            (state.phase == Phase::Ready).then(|| state.asset.clone()).flatten()
        }) else {
            #[cfg(feature = "tracing")]
            tracing::debug!("Ignoring generate outside of the ready phase");
            return Ok(None);
        };

        let kind = self.submitter.effect().kind();
        let job = self.submitter.submit_until_cancelled(&asset, &token).await;
        let job = self.settle(&token, job, |tx, job| {
            tx.state.job = Some(GenerationJob {
                job_id: job.job_id.clone(),
                kind,
                status: JobStatus::Queued,
            });
            tx.enter(Phase::Queued);
        })?;

        let on_progress = |attempt| {
            let mut tx = self.transition();
            if token.is_cancelled() {
                return;
            }
            if let Some(job) = tx.state.job.as_mut() {
                job.status = JobStatus::Processing;
            }
            tx.enter(Phase::Processing { attempt });
            tx.emit(ControllerEvent::Progress { attempt });
        };
        let result = self
            .poller
            .poll_until_cancelled(&job.job_id, kind, on_progress, &token)
            .await;

        self.settle(&token, result, |tx, result| {
            tx.state.asset = Some(result.media_url.clone());
            tx.state.job = None;
            tx.emit(ControllerEvent::Completed(result.clone()));
            tx.enter(Phase::Complete);
        })
        .map(Some)
    }

    /// Returns to `Idle` from any phase, dropping the current asset and
    /// cancelling whatever is in flight.
    pub fn reset(&self) {
        let mut tx = self.transition();
        if let Some(token) = tx.state.in_flight.take() {
            #[cfg(feature = "tracing")]
            tracing::info!(phase = %tx.state.phase, "Cancelling in-flight operation");
            token.cancel();
        }
        tx.state.asset = None;
        tx.state.job = None;
        tx.emit(ControllerEvent::Reset);
        tx.enter(Phase::Idle);
    }

    /// Leaves `Error` for `Ready` when the failed step left an asset behind.
    /// Returns whether the controller is now `Ready`.
    pub fn recover(&self) -> bool {
        let mut tx = self.transition();
        if tx.state.phase == Phase::Error && tx.state.asset.is_some() {
            tx.enter(Phase::Ready);
        }
        tx.state.phase == Phase::Ready
    }

    /// Fetches the current asset. Returns `Ok(None)` when there is none; the
    /// phase is left alone either way.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Download`] if the asset could not be fetched.
    pub async fn download(&self) -> Result<Option<DownloadedMedia>> {
        let Some(url) = self.current_asset() else {
            return Ok(None);
        };
        self.downloader.download(&url).await.map(Some)
    }

    fn transition(&self) -> Transition<'_> {
        Transition {
            state: self.state.lock(),
            events: &self.events,
        }
    }

    /// Claims the controller for a new operation if `admit` accepts the
    /// current state, entering `phase`.
    fn begin<A>(
        &self,
        phase: Phase,
        admit: impl FnOnce(&ControllerState) -> Option<A>,
    ) -> Option<(CancellationToken, A)> {
        let mut tx = self.transition();
        let admitted = admit(&tx.state)?;
        let token = CancellationToken::new();
        tx.state.in_flight = Some(token.clone());
        tx.enter(phase);
        Some((token, admitted))
    }

    /// Applies the outcome of one step, unless a reset got there first.
    fn settle<V>(
        &self,
        token: &CancellationToken,
        result: Result<V>,
        apply: impl FnOnce(&mut Transition<'_>, &V),
    ) -> Result<V> {
        let mut tx = self.transition();
        // checked under the lock: reset cancels under the same lock
        if token.is_cancelled() {
            return Err(Error::Cancelled);
        }
        match &result {
            Ok(value) => apply(&mut tx, value),
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(phase = %tx.state.phase, error = %err, "Operation failed");
                tx.state.job = None;
                tx.emit(ControllerEvent::Failed {
                    message: err.to_string(),
                });
                tx.enter(Phase::Error);
            }
        }
        result
    }
}
