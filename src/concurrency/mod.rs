//! Concurrency primitives for the partitioned sweep.
//!
//! Ghost brands enforce which attempt a structure belongs to, not
//! synchronization. Synchronization comes from the atomics in [`atomic`] and
//! the phase barrier in [`sync`]; [`scoped`] launches the worker pool.

pub mod atomic;
pub mod scoped;
pub mod sync;

pub use crossbeam_utils::CachePadded;
