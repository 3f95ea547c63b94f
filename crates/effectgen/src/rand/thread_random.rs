use crate::RandSource;
use rand::{Rng, rng};

/// A `RandSource` backed by the thread-local RNG (`rand::rng()`).
///
/// The type stores nothing; each call reaches for the calling thread's
/// generator, so it is `Send + Sync` and free to share across tasks.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandSource<u64> for ThreadRandom {
    fn rand(&self) -> u64 {
        rng().random()
    }
}
