use crate::futures::SleepProvider;
use core::{future::Future, time::Duration};

/// An implementation of [`SleepProvider`] using Tokio's timer.
///
/// This is the default provider for the poll delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleep;
impl SleepProvider for TokioSleep {
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(dur)
    }
}

/// An implementation of [`SleepProvider`] using Tokio's yield.
///
/// The requested duration is ignored: the poll loop gives the scheduler one
/// turn and carries on. Useful against local or mocked backends where waiting
/// out the full interval only slows things down.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioYield;
impl SleepProvider for TokioYield {
    fn sleep_for(_dur: Duration) -> impl Future<Output = ()> + Send {
        tokio::task::yield_now()
    }
}
