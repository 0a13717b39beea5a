//! `GhostToken` - the brand tying one solving attempt together.
//!
//! A token is a zero-sized capability created by [`GhostToken::new`]. Every
//! structure built inside the closure carries the same invariant `'brand`
//! lifetime, so the occupancy bitmap, the ancestry table and the barrier of one
//! attempt cannot be handed to the workers of another.
//!
//! ## Core invariant
//!
//! `GhostToken<'brand>` is intentionally **not** `Copy`/`Clone`. Workers only
//! ever receive `&GhostToken<'brand>`; the shared structures synchronize through
//! their own atomics, never through the token.

use core::marker::PhantomData;

/// A marker type that is invariant in its lifetime parameter `'id`.
///
/// Invariance stops the compiler from shrinking two different brands into a
/// common one, which would let structures of unrelated attempts unify.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InvariantLifetime<'id>(PhantomData<fn(&'id ()) -> &'id ()>);

impl<'id> InvariantLifetime<'id> {
    /// Creates a new invariant lifetime marker.
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

/// A zero-sized token that brands the shared state of one solving attempt.
#[derive(Debug)]
pub struct GhostToken<'brand>(InvariantLifetime<'brand>);

impl<'brand> GhostToken<'brand> {
    /// Creates a fresh brand and runs `f` with its token.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cuckoo::GhostToken;
    ///
    /// let threads = GhostToken::new(|token| {
    ///     let barrier = cuckoo::concurrency::sync::GhostBarrier::new(1);
    ///     barrier.wait(&token).unwrap();
    ///     barrier.participants()
    /// });
    /// assert_eq!(threads, 1);
    /// ```
    pub fn new<F, R>(f: F) -> R
    where
        F: for<'new_brand> FnOnce(GhostToken<'new_brand>) -> R,
    {
        f(GhostToken(InvariantLifetime::new()))
    }
}
