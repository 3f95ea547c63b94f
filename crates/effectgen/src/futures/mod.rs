mod runtime;
mod sleep_provider;

pub use runtime::*;
pub use sleep_provider::*;
