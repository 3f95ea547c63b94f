use crate::rand::{RandSource, ThreadRandom};

/// The 62-character alphanumeric alphabet identifiers are drawn from.
pub const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Identifier length used for uploaded filenames.
pub const DEFAULT_ID_LEN: usize = 21;

/// Largest multiple of the alphabet size that fits in a byte. Bytes at or above
/// it are discarded so every character stays equally likely.
const ACCEPT_BELOW: u8 = (u8::MAX as usize / ALPHABET.len() * ALPHABET.len()) as u8;

/// Generator of short random alphanumeric identifiers.
///
/// Identifiers are meant for collision avoidance in filenames, not as secrets:
/// the quality of the output is exactly the quality of the [`RandSource`].
///
/// Each 64-bit draw is split into eight bytes; accepted bytes are reduced
/// modulo 62 and mapped onto [`ALPHABET`].
///
/// # Example
/// ```
/// use effectgen::{ALPHABET, NanoIdGenerator, ThreadRandom};
///
/// let ids = NanoIdGenerator::new(ThreadRandom);
/// let id = ids.generate();
/// assert_eq!(id.len(), 21);
/// assert!(id.bytes().all(|b| ALPHABET.contains(&b)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct NanoIdGenerator<R = ThreadRandom> {
    rng: R,
}

impl<R> NanoIdGenerator<R>
where
    R: RandSource<u64>,
{
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Returns an identifier of [`DEFAULT_ID_LEN`] characters.
    pub fn generate(&self) -> String {
        self.generate_with_len(DEFAULT_ID_LEN)
    }

    /// Returns an identifier of exactly `len` characters.
    pub fn generate_with_len(&self, len: usize) -> String {
        let mut id = String::with_capacity(len);
        while id.len() < len {
            for byte in self.rng.rand().to_le_bytes() {
                if byte >= ACCEPT_BELOW {
                    continue;
                }
                id.push(char::from(ALPHABET[usize::from(byte) % ALPHABET.len()]));
                if id.len() == len {
                    break;
                }
            }
        }
        id
    }
}
