//! Branded fixed-width atomics.
//!
//! The brand ties a word to one solving attempt; it has no runtime
//! representation and does not change how the atomic behaves.

use core::marker::PhantomData;
use core::sync::atomic::{AtomicU32, AtomicU64, Ordering};

macro_rules! branded_atomic {
    ($(#[$doc:meta])* $name:ident, $atomic:ty, $value:ty) => {
        $(#[$doc])*
        #[repr(transparent)]
        pub struct $name<'brand> {
            inner: $atomic,
            _brand: PhantomData<&'brand mut ()>,
        }

        impl<'brand> $name<'brand> {
            /// Creates a new atomic value.
            #[inline(always)]
            pub const fn new(value: $value) -> Self {
                Self {
                    inner: <$atomic>::new(value),
                    _brand: PhantomData,
                }
            }

            /// Loads the current value.
            #[inline(always)]
            pub fn load(&self, order: Ordering) -> $value {
                self.inner.load(order)
            }

            /// Stores a new value.
            #[inline(always)]
            pub fn store(&self, value: $value, order: Ordering) {
                self.inner.store(value, order);
            }

            /// Bitwise OR with the current value, returning the previous value.
            #[inline(always)]
            pub fn fetch_or(&self, value: $value, order: Ordering) -> $value {
                self.inner.fetch_or(value, order)
            }

            /// Adds to the current value (wrapping), returning the previous value.
            #[inline(always)]
            pub fn fetch_add(&self, value: $value, order: Ordering) -> $value {
                self.inner.fetch_add(value, order)
            }

            /// Keeps the minimum of the current value and `value`, returning the previous value.
            #[inline(always)]
            pub fn fetch_min(&self, value: $value, order: Ordering) -> $value {
                self.inner.fetch_min(value, order)
            }

            /// Stores `new` if the current value equals `current`.
            ///
            /// # Errors
            /// Returns `Err(actual)` when the value was not `current`.
            #[inline(always)]
            pub fn compare_exchange(
                &self,
                current: $value,
                new: $value,
                success: Ordering,
                failure: Ordering,
            ) -> Result<$value, $value> {
                self.inner.compare_exchange(current, new, success, failure)
            }
        }

        impl core::fmt::Debug for $name<'_> {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.load(Ordering::Relaxed)).finish()
            }
        }
    };
}

branded_atomic!(
    /// A branded `AtomicU32`: the packed two-bit occupancy words and the
    /// ancestry table's stored-entry counter.
    GhostAtomicU32,
    AtomicU32,
    u32
);

branded_atomic!(
    /// A branded `AtomicU64`: one ancestry table slot, or the candidate edge.
    GhostAtomicU64,
    AtomicU64,
    u64
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_and_cas_report_previous_values() {
        let a = GhostAtomicU64::new(u64::MAX);
        assert_eq!(a.fetch_min(40, Ordering::Relaxed), u64::MAX);
        assert_eq!(a.fetch_min(50, Ordering::Relaxed), 40);
        assert_eq!(a.compare_exchange(41, 0, Ordering::Relaxed, Ordering::Relaxed), Err(40));
        assert_eq!(a.compare_exchange(40, 0, Ordering::Relaxed, Ordering::Relaxed), Ok(40));
        assert_eq!(format!("{a:?}"), "GhostAtomicU64(0)");

        let b = GhostAtomicU32::new(0b01);
        assert_eq!(b.fetch_or(0b10, Ordering::Relaxed), 0b01);
        assert_eq!(b.fetch_add(1, Ordering::Relaxed), 0b11);
        assert_eq!(b.load(Ordering::Relaxed), 4);
    }
}
