/// Source of the 64-bit words [`crate::NanoIdGenerator`] turns into filename
/// identifiers.
///
/// Production code uses [`crate::ThreadRandom`]; tests and benches plug in
/// fixed or counting sources to get reproducible names.
///
/// # Example
/// ```
/// use effectgen::{NanoIdGenerator, RandSource};
///
/// // every byte is 0, which maps to the first alphabet character
/// struct Zeros;
/// impl RandSource<u64> for Zeros {
///     fn rand(&self) -> u64 {
///         0
///     }
/// }
///
/// let ids = NanoIdGenerator::new(Zeros);
/// assert_eq!(ids.generate_with_len(4), "AAAA");
/// ```
pub trait RandSource<T> {
    fn rand(&self) -> T;
}

impl<T, R> RandSource<T> for &R
where
    R: RandSource<T> + ?Sized,
{
    fn rand(&self) -> T {
        R::rand(*self)
    }
}
