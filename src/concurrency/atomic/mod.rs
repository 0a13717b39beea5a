//! Branded, lock-free atomic primitives.
//!
//! These types provide **concurrent writer** access using hardware atomics while
//! keeping the *ghost/brand* aspect purely compile-time.
//!
//! Important:
//! - Atomic RMW operations have inherent hardware cost; the sweep relies on
//!   `Relaxed` ordering and gets its cross-thread visibility from the phase
//!   barrier instead.
//! - [`word`] lets the bitmap and table run over plain cells when a single
//!   thread owns the whole search.

pub mod int;
/// Atomic vs. plain word policy.
pub mod word;

pub use int::{GhostAtomicU32, GhostAtomicU64};
pub use word::{Atomic, GhostPlainCell, GhostWord, Plain, Sharing};
