//! One client per remote step of the workflow.
//!
//! Each client owns a shared handle to the transport and the slice of
//! configuration it needs. Every method has a plain form and an
//! `_until_cancelled` form; the latter races each suspension point against a
//! [`CancellationToken`] and gives up with [`Error::Cancelled`].

mod download;
mod poll;
mod submit;
mod upload;

pub use download::*;
pub use poll::*;
pub use submit::*;
pub use upload::*;

use crate::error::{Error, Result};
use core::future::Future;
use tokio_util::sync::CancellationToken;

/// Drives `fut` to completion unless `token` is cancelled first.
pub(crate) async fn until_cancelled<F>(token: &CancellationToken, fut: F) -> Result<F::Output>
where
    F: Future,
{
    tokio::select! {
        biased;
        () = token.cancelled() => Err(Error::Cancelled),
        out = fut => Ok(out),
    }
}
