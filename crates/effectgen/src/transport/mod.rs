mod interface;
#[cfg(test)]
pub(crate) mod mock;
#[cfg(feature = "reqwest")]
mod reqwest;

pub use self::interface::*;
#[cfg(feature = "reqwest")]
pub use self::reqwest::*;
