//! The job lifecycle state machine.
//!
//! [`JobController`] is the single owner of the current asset and the current
//! [`Phase`]. It drives the upload, submission, poll and download clients and
//! reports every transition as a [`ControllerEvent`] on a broadcast channel, so
//! a view layer only ever renders what it is sent.

mod event;
mod lifecycle;
mod phase;

pub use event::*;
pub use lifecycle::*;
pub use phase::*;
