//! # effectgen
//!
//! Client-side job lifecycle for a remote effect-generation service: upload a
//! local image through a signed URL, submit an image or video effect job
//! against it, poll the job until it reaches a terminal status, and expose the
//! whole workflow as a single cancellable state machine.
//!
//! ## Layers
//!
//! - [`NanoIdGenerator`] - short random alphanumeric identifiers used for
//!   destination filenames.
//! - [`HttpTransport`] - the one seam every client talks through. The
//!   `reqwest` feature provides [`ReqwestTransport`].
//! - [`UploadClient`], [`SubmissionClient`], [`JobPoller`],
//!   [`DownloadClient`] - one client per remote step.
//! - [`JobController`] - owns the current asset and phase, drives the clients
//!   and broadcasts [`ControllerEvent`]s to any view that subscribes.
//!
//! ## Features
//!
//! - `reqwest`: HTTP transport backed by `reqwest` (rustls).
//! - `tracing`: emit `tracing` events from every step.
//! - `async-smol`: [`SmolSleep`] provider for the poll delay.

mod client;
mod config;
mod controller;
mod error;
mod futures;
mod id;
mod media;
mod rand;
mod status;
mod transport;

pub use crate::client::*;
pub use crate::config::*;
pub use crate::controller::*;
pub use crate::error::*;
pub use crate::futures::*;
pub use crate::id::*;
pub use crate::media::*;
pub use crate::rand::*;
pub use crate::status::*;
pub use crate::transport::*;
