//! The scoped worker pool.
//!
//! One solving attempt runs its workers inside a `std::thread::scope`, so they
//! borrow the search context and share `&GhostToken<'brand>` without reference
//! counting. The context outlives every worker by construction.

use crate::GhostToken;

/// Runs `work(token, id)` on `threads` scoped threads and collects the results
/// in thread-id order.
///
/// A panicking worker is re-raised on the calling thread once the scope has
/// joined. Workers that meet at a [`GhostBarrier`](super::sync::GhostBarrier)
/// must hold its [`poison_on_unwind`](super::sync::GhostBarrier::poison_on_unwind)
/// guard, or their peers never reach the join.
///
/// # Panics
/// Panics if `threads == 0`, or if any worker panicked.
pub fn spawn_workers<'brand, W, F>(token: &GhostToken<'brand>, threads: usize, work: F) -> Vec<W>
where
    W: Send,
    F: Fn(&GhostToken<'brand>, usize) -> W + Sync,
{
    assert!(threads != 0, "threads must be > 0");

    let work = &work;
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..threads).map(|id| scope.spawn(move || work(token, id))).collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|payload| std::panic::resume_unwind(payload)))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn workers_report_in_id_order() {
        GhostToken::new(|token| {
            let ran = AtomicUsize::new(0);
            let ids = spawn_workers(&token, 6, |_t, id| {
                ran.fetch_add(1, Ordering::Relaxed);
                id * 10
            });
            assert_eq!(ids, vec![0, 10, 20, 30, 40, 50]);
            assert_eq!(ran.load(Ordering::Relaxed), 6);
        });
    }

    #[test]
    #[should_panic(expected = "worker exploded")]
    fn worker_panic_propagates() {
        GhostToken::new(|token| {
            spawn_workers(&token, 2, |_t, id| {
                if id == 1 {
                    panic!("worker exploded");
                }
            });
        });
    }
}
