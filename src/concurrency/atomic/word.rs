//! Word-level sharing policy.
//!
//! The occupancy bitmap and the ancestry table are written against
//! [`GhostWord`], so the same code runs over lock-free atomics when several
//! workers sweep one partition, or over plain cells when a single thread owns
//! the search. The [`Sharing`] type parameter picks one at build time:
//!
//! - [`Atomic`]: `GhostAtomicU32` / `GhostAtomicU64`, `Sync`, every operation is
//!   a relaxed hardware RMW.
//! - [`Plain`]: [`GhostPlainCell`], `!Sync`, every operation is a load and a
//!   store. The compiler rejects sharing it across threads.

use core::cell::Cell;
use core::marker::PhantomData;
use core::sync::atomic::Ordering;

use super::{GhostAtomicU32, GhostAtomicU64};

/// A fixed-width word supporting the read-modify-write operations the sweep needs.
pub trait GhostWord<'brand>: Sized {
    /// The integer type held by the word.
    type Value: Copy + Ord;

    /// Creates a word holding zero.
    fn zeroed() -> Self;

    /// Reads the current value.
    fn load(&self) -> Self::Value;

    /// Overwrites the current value.
    fn store(&self, value: Self::Value);

    /// ORs `value` into the word, returning the previous value.
    fn fetch_or(&self, value: Self::Value) -> Self::Value;

    /// Adds `value` to the word (wrapping), returning the previous value.
    fn fetch_add(&self, value: Self::Value) -> Self::Value;

    /// Keeps the smaller of the held value and `value`, returning the previous value.
    fn fetch_min(&self, value: Self::Value) -> Self::Value;

    /// Replaces `current` with `new`; on mismatch returns the value actually held.
    ///
    /// # Errors
    /// Returns `Err(actual)` when the word did not hold `current`.
    fn compare_exchange(&self, current: Self::Value, new: Self::Value) -> Result<Self::Value, Self::Value>;
}

macro_rules! atomic_word {
    ($atomic:ident, $value:ty) => {
        impl<'brand> GhostWord<'brand> for $atomic<'brand> {
            type Value = $value;

            #[inline(always)]
            fn zeroed() -> Self {
                Self::new(0)
            }

            #[inline(always)]
            fn load(&self) -> $value {
                $atomic::load(self, Ordering::Relaxed)
            }

            #[inline(always)]
            fn store(&self, value: $value) {
                $atomic::store(self, value, Ordering::Relaxed);
            }

            #[inline(always)]
            fn fetch_or(&self, value: $value) -> $value {
                $atomic::fetch_or(self, value, Ordering::Relaxed)
            }

            #[inline(always)]
            fn fetch_add(&self, value: $value) -> $value {
                $atomic::fetch_add(self, value, Ordering::Relaxed)
            }

            #[inline(always)]
            fn fetch_min(&self, value: $value) -> $value {
                $atomic::fetch_min(self, value, Ordering::Relaxed)
            }

            #[inline(always)]
            fn compare_exchange(&self, current: $value, new: $value) -> Result<$value, $value> {
                $atomic::compare_exchange(self, current, new, Ordering::Relaxed, Ordering::Relaxed)
            }
        }
    };
}

atomic_word!(GhostAtomicU32, u32);
atomic_word!(GhostAtomicU64, u64);

/// A branded, non-atomic word for single-threaded sweeps.
///
/// Wraps a `Cell`, so it is `Send` but never `Sync`.
#[repr(transparent)]
pub struct GhostPlainCell<'brand, T> {
    inner: Cell<T>,
    _brand: PhantomData<&'brand mut ()>,
}

impl<'brand, T> GhostPlainCell<'brand, T> {
    /// Creates a new plain cell.
    #[inline(always)]
    pub const fn new(value: T) -> Self {
        Self {
            inner: Cell::new(value),
            _brand: PhantomData,
        }
    }
}

macro_rules! plain_word {
    ($value:ty) => {
        impl<'brand> GhostWord<'brand> for GhostPlainCell<'brand, $value> {
            type Value = $value;

            #[inline(always)]
            fn zeroed() -> Self {
                Self::new(0)
            }

            #[inline(always)]
            fn load(&self) -> $value {
                self.inner.get()
            }

            #[inline(always)]
            fn store(&self, value: $value) {
                self.inner.set(value);
            }

            #[inline(always)]
            fn fetch_or(&self, value: $value) -> $value {
                let old = self.inner.get();
                self.inner.set(old | value);
                old
            }

            #[inline(always)]
            fn fetch_add(&self, value: $value) -> $value {
                let old = self.inner.get();
                self.inner.set(old.wrapping_add(value));
                old
            }

            #[inline(always)]
            fn fetch_min(&self, value: $value) -> $value {
                let old = self.inner.get();
                self.inner.set(old.min(value));
                old
            }

            #[inline(always)]
            fn compare_exchange(&self, current: $value, new: $value) -> Result<$value, $value> {
                let old = self.inner.get();
                if old == current {
                    self.inner.set(new);
                    Ok(old)
                } else {
                    Err(old)
                }
            }
        }
    };
}

plain_word!(u32);
plain_word!(u64);

/// Selects the word types used by the shared search structures.
pub trait Sharing<'brand> {
    /// Word backing the occupancy bitmap and counters.
    type Word32: GhostWord<'brand, Value = u32>;
    /// Word backing one ancestry table slot.
    type Word64: GhostWord<'brand, Value = u64>;
}

/// Lock-free atomic words; required for multi-threaded sweeps.
#[derive(Debug, Clone, Copy)]
pub enum Atomic {}

/// Plain `Cell` words; single-threaded sweeps only.
#[derive(Debug, Clone, Copy)]
pub enum Plain {}

impl<'brand> Sharing<'brand> for Atomic {
    type Word32 = GhostAtomicU32<'brand>;
    type Word64 = GhostAtomicU64<'brand>;
}

impl<'brand> Sharing<'brand> for Plain {
    type Word32 = GhostPlainCell<'brand, u32>;
    type Word64 = GhostPlainCell<'brand, u64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise<'brand, W: GhostWord<'brand, Value = u64>>() {
        let w = W::zeroed();
        assert_eq!(w.fetch_or(0b01), 0);
        assert_eq!(w.fetch_or(0b10), 0b01);
        assert_eq!(w.load(), 0b11);
        assert_eq!(w.compare_exchange(0, 9), Err(0b11));
        assert_eq!(w.compare_exchange(0b11, 9), Ok(0b11));
        assert_eq!(w.fetch_add(1), 9);
        assert_eq!(w.fetch_min(4), 10);
        assert_eq!(w.fetch_min(7), 4);
        assert_eq!(w.load(), 4);
        w.store(0);
        assert_eq!(w.load(), 0);
    }

    #[test]
    fn atomic_and_plain_words_agree() {
        exercise::<GhostAtomicU64<'static>>();
        exercise::<GhostPlainCell<'static, u64>>();
    }

    #[test]
    fn plain_add_wraps() {
        let w: GhostPlainCell<'static, u32> = GhostPlainCell::new(u32::MAX);
        assert_eq!(w.fetch_add(2), u32::MAX);
        assert_eq!(w.load(), 1);
    }
}
