//! `GhostBarrier` - a token-gated, reusable rendezvous that can be poisoned.
//!
//! A plain cyclic barrier leaves the surviving workers blocked forever once a
//! peer panics. Here a panicking participant poisons the barrier on its way
//! out (see [`GhostBarrier::poison_on_unwind`]), which wakes every waiter with
//! [`BarrierPoisoned`] so the scope can join and re-raise the panic.

use std::marker::PhantomData;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::GhostToken;

/// A peer left the barrier group by panicking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("barrier poisoned by a panicking participant")]
pub struct BarrierPoisoned;

#[derive(Debug, Default)]
struct State {
    arrived: usize,
    generation: u64,
    poisoned: bool,
}

/// A cyclic barrier for exactly `participants` threads of one branded attempt.
///
/// Every sweep phase ends with a [`wait`](Self::wait); no worker starts the next
/// phase until all of them have finished the current one. The barrier also
/// carries the memory ordering: writes made with `Relaxed` atomics before the
/// wait are visible to every participant after it.
pub struct GhostBarrier<'brand> {
    state: Mutex<State>,
    released: Condvar,
    participants: usize,
    _brand: PhantomData<fn(&'brand ()) -> &'brand ()>,
}

impl<'brand> GhostBarrier<'brand> {
    /// Creates a barrier that releases once `participants` threads are waiting.
    ///
    /// # Panics
    /// Panics if `participants == 0`.
    pub fn new(participants: usize) -> Self {
        assert!(participants != 0, "barrier needs at least one participant");
        Self {
            state: Mutex::new(State::default()),
            released: Condvar::new(),
            participants,
            _brand: PhantomData,
        }
    }

    /// Number of threads each round waits for.
    #[inline]
    pub fn participants(&self) -> usize {
        self.participants
    }

    /// Blocks until all participants have arrived.
    ///
    /// Returns `Ok(true)` on exactly one thread per round. The `_token`
    /// argument proves the caller belongs to this barrier's attempt.
    ///
    /// # Errors
    /// [`BarrierPoisoned`] if a participant panicked before the round
    /// completed, or at any earlier round.
    pub fn wait(&self, _token: &GhostToken<'brand>) -> Result<bool, BarrierPoisoned> {
        let mut state = self.lock();
        if state.poisoned {
            return Err(BarrierPoisoned);
        }
        state.arrived += 1;
        if state.arrived == self.participants {
            state.arrived = 0;
            state.generation = state.generation.wrapping_add(1);
            self.released.notify_all();
            return Ok(true);
        }

        let generation = state.generation;
        while state.generation == generation && !state.poisoned {
            state = self.released.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
        if state.generation == generation {
            Err(BarrierPoisoned)
        } else {
            Ok(false)
        }
    }

    /// Releases every current and future waiter with [`BarrierPoisoned`].
    pub fn poison(&self) {
        self.lock().poisoned = true;
        self.released.notify_all();
    }

    /// Whether [`poison`](Self::poison) has been called.
    pub fn is_poisoned(&self) -> bool {
        self.lock().poisoned
    }

    /// A guard that poisons the barrier if it is dropped during a panic.
    pub fn poison_on_unwind(&self) -> PoisonOnUnwind<'_, 'brand> {
        PoisonOnUnwind { barrier: self }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// See [`GhostBarrier::poison_on_unwind`].
pub struct PoisonOnUnwind<'a, 'brand> {
    barrier: &'a GhostBarrier<'brand>,
}

impl Drop for PoisonOnUnwind<'_, '_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.barrier.poison();
        }
    }
}
