#[cfg(feature = "async-smol")]
mod smol;
mod tokio;

#[cfg(feature = "async-smol")]
pub use self::smol::*;
pub use self::tokio::*;
