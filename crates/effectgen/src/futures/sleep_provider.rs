use core::{future::Future, time::Duration};

/// A trait that abstracts over how to sleep for a given [`Duration`] in async
/// contexts.
///
/// The poller suspends through this trait between status requests, which keeps
/// it generic over runtimes like `Tokio` or `Smol` and lets tests swap the
/// timer for an immediate yield.
pub trait SleepProvider {
    /// We require `Send` so that the future can be safely moved across threads
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send;
}
