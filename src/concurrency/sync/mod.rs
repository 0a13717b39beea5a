//! Blocking synchronization for the phase lockstep.

pub mod ghost_barrier;

pub use ghost_barrier::{BarrierPoisoned, GhostBarrier, PoisonOnUnwind};
